// View state for the deals page.
//
// The state has a single owner. It changes only through the manifest
// completion, the offers completion and the user's category selection.

use crate::error::{CoreError, Result};
use hqdeals_fetch::{Category, CategoryManifest, FetchError, Offer};
use tracing::{debug, warn};

/// Tag of an issued offers request. Only the most recently issued ticket
/// may change the offer list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferTicket {
    pub seq: u64,
    pub directory: String,
    pub category: String,
}

#[derive(Debug)]
pub struct DealsState {
    loading: bool,
    manifest: CategoryManifest,
    offers: Vec<Offer>,
    selected: Option<String>,
    issued: u64,
    pending: Option<OfferTicket>,
}

impl DealsState {
    /// A fresh page is loading until the manifest arrives.
    pub fn new() -> Self {
        Self {
            loading: true,
            manifest: CategoryManifest::default(),
            offers: Vec::new(),
            selected: None,
            issued: 0,
            pending: None,
        }
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn manifest(&self) -> &CategoryManifest {
        &self.manifest
    }

    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_category(&self) -> Option<&Category> {
        self.selected
            .as_deref()
            .and_then(|value| self.manifest.find(value))
    }

    /// Ticket of the offers request still in flight, if any.
    pub fn pending(&self) -> Option<&OfferTicket> {
        self.pending.as_ref()
    }

    pub fn is_current(&self, ticket: &OfferTicket) -> bool {
        self.pending.as_ref() == Some(ticket)
    }

    pub fn begin_manifest_load(&mut self) {
        self.loading = true;
    }

    /// Apply a finished manifest fetch.
    ///
    /// On success the manifest is replaced and the first category becomes
    /// the selection. The returned ticket is the offers request that the
    /// change requires, if any. On failure the previous state is kept.
    pub fn apply_manifest(
        &mut self,
        result: std::result::Result<CategoryManifest, FetchError>,
    ) -> Option<OfferTicket> {
        match result {
            Ok(manifest) => self.replace_manifest(manifest),
            Err(e) => {
                self.manifest_failed(&e);
                None
            }
        }
    }

    /// Record a failed manifest fetch; the previous state is kept.
    pub fn manifest_failed(&mut self, error: &FetchError) {
        warn!("Failed to load categories: {}", error);
        self.loading = false;
    }

    fn replace_manifest(&mut self, manifest: CategoryManifest) -> Option<OfferTicket> {
        self.loading = false;

        let directory_changed = manifest.directory != self.manifest.directory;
        let first = manifest.first_category().map(|c| c.value.clone());
        self.manifest = manifest;

        match first {
            Some(value) => {
                let selection_changed = self.selected.as_deref() != Some(value.as_str());
                self.selected = Some(value);
                if selection_changed || directory_changed {
                    Some(self.issue_offer_request())
                } else {
                    None
                }
            }
            None => {
                debug!("Manifest has no categories, nothing to select");
                self.selected = None;
                self.pending = None;
                self.offers.clear();
                None
            }
        }
    }

    /// Select a category by value. Returns the offers request to issue, or
    /// `None` when the category is already selected.
    pub fn select_category(&mut self, value: &str) -> Result<Option<OfferTicket>> {
        if !self.manifest.contains(value) {
            return Err(CoreError::UnknownCategory(value.to_string()));
        }

        if self.selected.as_deref() == Some(value) {
            debug!("Category {} already selected", value);
            return Ok(None);
        }

        self.selected = Some(value.to_string());
        Ok(Some(self.issue_offer_request()))
    }

    /// Re-request the offers of the current selection.
    pub fn reload(&mut self) -> Option<OfferTicket> {
        self.selected.as_ref()?;
        Some(self.issue_offer_request())
    }

    /// Apply a finished offers fetch. Completions of superseded tickets are
    /// dropped; returns whether the result was applied.
    pub fn apply_offers(
        &mut self,
        ticket: &OfferTicket,
        result: std::result::Result<Vec<Offer>, FetchError>,
    ) -> bool {
        if !self.is_current(ticket) {
            debug!(
                "Discarding stale offers for {} (request #{})",
                ticket.category, ticket.seq
            );
            return false;
        }

        match result {
            Ok(offers) => {
                self.offers = offers;
                self.pending = None;
                self.loading = false;
                true
            }
            Err(e) => self.offers_failed(ticket, &e),
        }
    }

    /// Record a failed offers fetch, the offer list becomes empty.
    pub fn offers_failed(&mut self, ticket: &OfferTicket, error: &FetchError) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        warn!("Failed to load offers for {}: {}", ticket.category, error);
        self.offers.clear();
        self.pending = None;
        self.loading = false;
        true
    }

    fn issue_offer_request(&mut self) -> OfferTicket {
        self.issued += 1;
        let ticket = OfferTicket {
            seq: self.issued,
            directory: self.manifest.directory.clone(),
            category: self.selected.clone().unwrap_or_default(),
        };
        self.pending = Some(ticket.clone());
        self.loading = true;
        ticket
    }
}

impl Default for DealsState {
    fn default() -> Self {
        Self::new()
    }
}
