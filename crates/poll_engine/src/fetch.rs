use std::time::Duration;

use futures_util::StreamExt;
use poll_core::{JobKey, JobKind, StatusReport};
use reqwest::header::ACCEPT;
use url::Url;

use crate::wire::decode_status;
use crate::{FailureKind, PollError};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Server origin the endpoint paths are joined onto.
    pub base_url: String,
    pub preview_path: String,
    pub status_path: String,
    pub connect_timeout: Option<Duration>,
    /// Per-request timeout. `None` lets a hung request run until the next tick overlaps it.
    pub request_timeout: Option<Duration>,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:6543".to_string(),
            preview_path: JobKind::Preview.default_endpoint().to_string(),
            status_path: JobKind::FullRender.default_endpoint().to_string(),
            connect_timeout: Some(Duration::from_secs(10)),
            request_timeout: None,
            max_bytes: 64 * 1024,
        }
    }
}

impl FetchSettings {
    pub fn endpoint_path(&self, kind: JobKind) -> &str {
        match kind {
            JobKind::Preview => &self.preview_path,
            JobKind::FullRender => &self.status_path,
        }
    }

    /// `<base_url><endpoint>?jobid=<id>`
    pub fn status_url(&self, key: &JobKey) -> Result<Url, PollError> {
        let mut url = self.resolve(self.endpoint_path(key.kind))?;
        url.query_pairs_mut().append_pair("jobid", &key.job_id);
        Ok(url)
    }

    pub(crate) fn resolve(&self, path: &str) -> Result<Url, PollError> {
        Url::parse(&self.base_url)
            .and_then(|base| base.join(path))
            .map_err(|err| PollError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

#[async_trait::async_trait]
pub trait StatusFetcher: Send + Sync {
    async fn fetch_status(&self, key: &JobKey) -> Result<StatusReport, PollError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestStatusFetcher {
    settings: FetchSettings,
    client: reqwest::Client,
}

impl ReqwestStatusFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, PollError> {
        let client = build_client(&settings)?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }
}

#[async_trait::async_trait]
impl StatusFetcher for ReqwestStatusFetcher {
    async fn fetch_status(&self, key: &JobKey) -> Result<StatusReport, PollError> {
        let url = self.settings.status_url(key)?;
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body = read_limited(response, self.settings.max_bytes).await?;
        decode_status(&body)
    }
}

pub(crate) fn build_client(settings: &FetchSettings) -> Result<reqwest::Client, PollError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = settings.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }
    if let Some(timeout) = settings.request_timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|err| PollError::new(FailureKind::Network, err.to_string()))
}

/// Checks the status code and reads the body, refusing more than `max_bytes`.
pub(crate) async fn read_limited(
    response: reqwest::Response,
    max_bytes: u64,
) -> Result<Vec<u8>, PollError> {
    let status = response.status();
    if !status.is_success() {
        return Err(PollError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }

    if let Some(content_len) = response.content_length() {
        if content_len > max_bytes {
            return Err(PollError::new(
                FailureKind::TooLarge {
                    max_bytes,
                    actual: Some(content_len),
                },
                "response too large",
            ));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_reqwest_error)?;
        let next_len = bytes.len() as u64 + chunk.len() as u64;
        if next_len > max_bytes {
            return Err(PollError::new(
                FailureKind::TooLarge {
                    max_bytes,
                    actual: Some(next_len),
                },
                "response too large",
            ));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> PollError {
    if err.is_timeout() {
        return PollError::new(FailureKind::Timeout, err.to_string());
    }
    PollError::new(FailureKind::Network, err.to_string())
}
