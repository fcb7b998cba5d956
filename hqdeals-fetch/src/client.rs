use crate::endpoints::{DEFAULT_BASE_URL, Endpoints};
use crate::error::{FetchError, Result};
use crate::model::{CategoryManifest, Offer};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

/// Read-only client for the published offer files.
#[derive(Debug, Clone)]
pub struct DealsClient {
    client: Client,
    endpoints: Endpoints,
}

impl DealsClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let endpoints = Endpoints::new(&config.base_url)?;
        let timeout_secs = config.timeout_secs.max(1);

        let client = Client::builder()
            .user_agent(concat!("hqdeals/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs((timeout_secs / 2).max(1)))
            .pool_idle_timeout(Duration::from_secs(90))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Fetch the manifest, cache-busted with the current time.
    pub async fn fetch_manifest(&self) -> Result<CategoryManifest> {
        let now_millis = chrono::Utc::now().timestamp_millis();
        let url = self.endpoints.categories_url(now_millis)?;

        let manifest: CategoryManifest = self.get_json(url).await?;
        manifest.validate()?;

        info!(
            "Loaded manifest with {} categories (dir: {})",
            manifest.categories.len(),
            manifest.directory
        );
        Ok(manifest)
    }

    pub async fn fetch_offers(&self, directory: &str, category: &str) -> Result<Vec<Offer>> {
        let url = self.endpoints.offers_url(directory, category)?;
        let offers: Vec<Offer> = self.get_json(url).await?;

        info!("Loaded {} offers for {}", offers.len(), category);
        Ok(offers)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("Fetching {}", url);

        let start = Instant::now();
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        debug!(
            "Fetched {} ({} bytes in {:?})",
            url,
            body.len(),
            start.elapsed()
        );

        serde_json::from_slice(&body).map_err(|source| FetchError::Malformed {
            url: url.to_string(),
            source,
        })
    }
}
