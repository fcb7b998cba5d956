use crate::error::{FetchError, Result};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://hqdeals.github.io/";

/// Builds the two resource URLs below a deals site root.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(format!(
                "{}: expected an http(s) site root",
                base_url
            )));
        }

        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `{base}/offers/categories.json?t={now_millis}`
    pub fn categories_url(&self, now_millis: i64) -> Result<Url> {
        let mut url = self.with_segments(&["offers", "categories.json"])?;
        url.query_pairs_mut()
            .append_pair("t", &now_millis.to_string());
        Ok(url)
    }

    /// `{base}/offers/{directory}/{category}.json`
    pub fn offers_url(&self, directory: &str, category: &str) -> Result<Url> {
        let file_name = format!("{}.json", category);
        let mut segments = vec!["offers"];
        segments.extend(directory.split('/').filter(|s| !s.is_empty()));
        segments.push(&file_name);
        self.with_segments(&segments)
    }

    fn with_segments(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| FetchError::InvalidUrl(self.base.to_string()))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            base: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
        }
    }
}
