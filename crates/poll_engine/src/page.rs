use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::decode::{decode_page, DecodedPage};
use crate::fetch::{build_client, map_reqwest_error, read_limited, FetchSettings};
use crate::{FailureKind, PollError};

/// Upper bound for a fetched page; status payloads use `FetchSettings::max_bytes`.
const MAX_PAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Fetches the page that carries the job markup.
#[derive(Debug, Clone)]
pub struct PageLoader {
    settings: FetchSettings,
    client: reqwest::Client,
}

impl PageLoader {
    pub fn new(settings: FetchSettings) -> Result<Self, PollError> {
        let client = build_client(&settings)?;
        Ok(Self { settings, client })
    }

    /// GET `path` relative to the base URL and decode it.
    pub async fn load(&self, path: &str) -> Result<DecodedPage, PollError> {
        let url = self.settings.resolve(path)?;
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "text/html")
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = read_limited(response, MAX_PAGE_BYTES).await?;
        Ok(decode_page(&bytes, content_type.as_deref()))
    }
}

/// Loads a page from a synchronous caller on a short-lived runtime.
pub fn load_page_blocking(settings: FetchSettings, path: &str) -> Result<DecodedPage, PollError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| PollError::new(FailureKind::Network, err.to_string()))?;
    let loader = PageLoader::new(settings)?;
    runtime.block_on(loader.load(path))
}
