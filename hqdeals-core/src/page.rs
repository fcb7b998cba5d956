use crate::card::{OfferCard, format_timestamp};
use crate::state::DealsState;
use serde::Serialize;

pub const TITLE: &str = "HQ Deals";
pub const UNDER_CONSTRUCTION: &str = "⚠️ Under construction ⚠️";
pub const DESCRIPTION: &str =
    "Ausgewählte Angebote mit deutlichen Preisreduzierungen von vertrauenswürdigen Händlern.";
pub const LAST_UPDATED: &str = "Zuletzt aktualisiert:";
pub const CATEGORY: &str = "Kategorie:";
pub const LOADING: &str = "Angebote werden geladen...";

#[derive(Debug, Clone, Serialize)]
pub struct PageLabels {
    pub title: &'static str,
    pub under_construction: &'static str,
    pub description: &'static str,
    pub last_updated: &'static str,
    pub category: &'static str,
    pub loading: &'static str,
}

pub const LABELS: PageLabels = PageLabels {
    title: TITLE,
    under_construction: UNDER_CONSTRUCTION,
    description: DESCRIPTION,
    last_updated: LAST_UPDATED,
    category: CATEGORY,
    loading: LOADING,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Snapshot of everything the page shows.
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub site_url: String,
    pub timestamp: i64,
    pub last_updated: String,
    pub directory: String,
    pub categories: Vec<CategoryOption>,
    pub selected: Option<String>,
    pub loading: bool,
    pub offers: Vec<OfferCard>,
}

impl PageView {
    pub fn from_state(state: &DealsState, site_url: &str) -> Self {
        let manifest = state.manifest();
        let categories = manifest
            .categories
            .iter()
            .map(|c| CategoryOption {
                value: c.value.clone(),
                label: c.label.clone(),
                selected: state.selected() == Some(c.value.as_str()),
            })
            .collect();

        Self {
            site_url: site_url.to_string(),
            timestamp: manifest.timestamp,
            last_updated: format_timestamp(manifest.timestamp),
            directory: manifest.directory.clone(),
            categories,
            selected: state.selected().map(str::to_string),
            loading: state.loading(),
            offers: state.offers().iter().map(OfferCard::from).collect(),
        }
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.selected)
            .map(|c| c.label.as_str())
    }
}
