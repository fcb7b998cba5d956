use crate::error::{CoreError, Result};
use crate::state::{DealsState, OfferTicket};
use hqdeals_fetch::{CategoryManifest, DealsClient, FetchError, Offer};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Completion of a fetch started with [`DealsLoader::spawn_manifest`] or
/// [`DealsLoader::spawn_offers`].
#[derive(Debug)]
pub enum LoadEvent {
    Manifest(std::result::Result<CategoryManifest, FetchError>),
    Offers {
        ticket: OfferTicket,
        result: std::result::Result<Vec<Offer>, FetchError>,
    },
}

/// What applying a [`LoadEvent`] did to the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The offers request the new manifest requires, if any
    Manifest(Option<OfferTicket>),
    /// `applied` is false when the ticket was superseded
    Offers { ticket: OfferTicket, applied: bool },
}

impl LoadEvent {
    pub fn error(&self) -> Option<&FetchError> {
        match self {
            LoadEvent::Manifest(result) => result.as_ref().err(),
            LoadEvent::Offers { result, .. } => result.as_ref().err(),
        }
    }

    /// Apply the completion to the state.
    pub fn apply(self, state: &mut DealsState) -> LoadOutcome {
        match self {
            LoadEvent::Manifest(result) => LoadOutcome::Manifest(state.apply_manifest(result)),
            LoadEvent::Offers { ticket, result } => {
                let applied = state.apply_offers(&ticket, result);
                LoadOutcome::Offers { ticket, applied }
            }
        }
    }
}

/// Runs the category and offer loaders against a [`DealsClient`].
#[derive(Debug, Clone)]
pub struct DealsLoader {
    client: DealsClient,
}

impl DealsLoader {
    pub fn new(client: DealsClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &DealsClient {
        &self.client
    }

    pub fn site_url(&self) -> String {
        self.client.endpoints().base().to_string()
    }

    /// Fetch the manifest and apply it. Returns the offers request the new
    /// selection requires. A failure keeps the previous state.
    pub async fn load_categories(
        &self,
        state: &mut DealsState,
    ) -> std::result::Result<Option<OfferTicket>, FetchError> {
        state.begin_manifest_load();
        match self.client.fetch_manifest().await {
            Ok(manifest) => Ok(state.apply_manifest(Ok(manifest))),
            Err(e) => {
                state.manifest_failed(&e);
                Err(e)
            }
        }
    }

    /// Fetch the offers for `ticket` and apply them. Returns whether the
    /// result was still current. A failure empties the offer list.
    pub async fn load_offers(
        &self,
        state: &mut DealsState,
        ticket: OfferTicket,
    ) -> std::result::Result<bool, FetchError> {
        match self.fetch_offers(&ticket).await {
            Ok(offers) => Ok(state.apply_offers(&ticket, Ok(offers))),
            Err(e) => {
                state.offers_failed(&ticket, &e);
                Err(e)
            }
        }
    }

    /// Load the manifest, then the offers of `category` (or of the first
    /// category). Only the offers of the final selection are fetched.
    pub async fn load_page(&self, state: &mut DealsState, category: Option<&str>) -> Result<()> {
        let mut ticket = self.load_categories(state).await?;

        if state.manifest().categories.is_empty() {
            return Err(CoreError::NoCategories);
        }

        if let Some(value) = category
            && let Some(next) = state.select_category(value)?
        {
            ticket = Some(next);
        }

        if let Some(ticket) = ticket {
            self.load_offers(state, ticket).await?;
        }
        Ok(())
    }

    pub fn spawn_manifest(&self, tx: mpsc::UnboundedSender<LoadEvent>) -> JoinHandle<()> {
        let client = self.client.clone();
        tokio::spawn(async move {
            let result = client.fetch_manifest().await;
            if tx.send(LoadEvent::Manifest(result)).is_err() {
                debug!("Manifest loaded after the receiver went away");
            }
        })
    }

    pub fn spawn_offers(
        &self,
        ticket: OfferTicket,
        tx: mpsc::UnboundedSender<LoadEvent>,
    ) -> JoinHandle<()> {
        let loader = self.clone();
        tokio::spawn(async move {
            let result = loader.fetch_offers(&ticket).await;
            if tx.send(LoadEvent::Offers { ticket, result }).is_err() {
                debug!("Offers loaded after the receiver went away");
            }
        })
    }

    async fn fetch_offers(
        &self,
        ticket: &OfferTicket,
    ) -> std::result::Result<Vec<Offer>, FetchError> {
        info!(
            "Loading offers for {} (request #{})",
            ticket.category, ticket.seq
        );
        self.client
            .fetch_offers(&ticket.directory, &ticket.category)
            .await
    }
}

/// Create a channel pair for load completions
pub fn create_load_channel() -> (
    mpsc::UnboundedSender<LoadEvent>,
    mpsc::UnboundedReceiver<LoadEvent>,
) {
    mpsc::unbounded_channel()
}
