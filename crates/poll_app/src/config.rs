use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use log::LevelFilter;
use poll_core::{JobKey, JobKind, PollerOptions};
use poll_engine::FetchSettings;
use serde::{Deserialize, Serialize};

/// Poller settings, loaded from a RON file. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    pub base_url: String,
    pub preview_path: String,
    pub status_path: String,
    pub preview_interval_ms: u64,
    pub full_interval_ms: u64,
    pub connect_timeout_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
    pub max_body_bytes: u64,
    /// Stop a session when a response carries `bool: false`.
    pub honor_stop_flag: bool,
    pub output_dir: PathBuf,
    pub snapshot_file: String,
    pub log_level: String,
}

impl Default for PollerConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        let options = PollerOptions::default();
        Self {
            base_url: fetch.base_url,
            preview_path: fetch.preview_path,
            status_path: fetch.status_path,
            preview_interval_ms: millis(options.interval_for(JobKind::Preview)),
            full_interval_ms: millis(options.interval_for(JobKind::FullRender)),
            connect_timeout_ms: fetch.connect_timeout.map(millis),
            request_timeout_ms: fetch.request_timeout.map(millis),
            max_body_bytes: fetch.max_bytes,
            honor_stop_flag: options.honor_stop_flag,
            output_dir: PathBuf::from("output"),
            snapshot_file: "jobs.html".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl PollerConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(ron::from_str(text)?)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.preview_interval_ms == 0 || self.full_interval_ms == 0 {
            bail!("poll intervals must be at least 1 ms");
        }
        if self.snapshot_file.trim().is_empty() {
            bail!("snapshot_file must not be empty");
        }
        self.fetch_settings()
            .status_url(&JobKey::preview("0"))
            .with_context(|| format!("invalid base_url {:?}", self.base_url))?;
        self.level()?;
        Ok(())
    }

    pub fn level(&self) -> anyhow::Result<LevelFilter> {
        poll_logging::parse_level(&self.log_level)
            .with_context(|| format!("unknown log_level {:?}", self.log_level))
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            base_url: self.base_url.clone(),
            preview_path: self.preview_path.clone(),
            status_path: self.status_path.clone(),
            connect_timeout: self.connect_timeout_ms.map(Duration::from_millis),
            request_timeout: self.request_timeout_ms.map(Duration::from_millis),
            max_bytes: self.max_body_bytes,
        }
    }

    pub fn poller_options(&self) -> PollerOptions {
        PollerOptions {
            preview_interval: Duration::from_millis(self.preview_interval_ms),
            full_interval: Duration::from_millis(self.full_interval_ms),
            honor_stop_flag: self.honor_stop_flag,
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
