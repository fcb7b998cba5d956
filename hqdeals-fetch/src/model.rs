use crate::error::{FetchError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The `categories.json` payload: available categories and the directory
/// their offer files live in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryManifest {
    /// Publication time in epoch milliseconds.
    pub timestamp: i64,
    #[serde(rename = "dir")]
    pub directory: String,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub value: String,
    #[serde(rename = "text")]
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub title: String,
    pub asin: String,
    pub reviews: Reviews,
    pub price: Price,
    pub image: String,
    pub link: Link,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reviews {
    pub rating: f64,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub current: f64,
    pub original: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    #[serde(rename = "ref")]
    pub href: String,
    /// Display name of the shop the link points to.
    pub rel: String,
}

impl CategoryManifest {
    pub fn first_category(&self) -> Option<&Category> {
        self.categories.first()
    }

    pub fn find(&self, value: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.value == value)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.find(value).is_some()
    }

    /// Category values must be unique, they double as file names.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for category in &self.categories {
            if !seen.insert(category.value.as_str()) {
                return Err(FetchError::DuplicateCategory(category.value.clone()));
            }
        }
        Ok(())
    }
}
