use std::fmt;

use poll_core::{JobKey, StatusReport, Tick};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Outcome of the request issued at `tick` for one session.
    Status {
        key: JobKey,
        tick: Tick,
        result: Result<StatusReport, PollError>,
    },
    /// The session's timer stopped after issuing `ticks` requests.
    SessionEnded { key: JobKey, ticks: Tick },
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start poll runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("failed to build status client: {0}")]
    Client(#[from] PollError),
    /// The engine thread is gone; no further events will arrive.
    #[error("poll engine stopped")]
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct PollError {
    pub kind: FailureKind,
    pub message: String,
}

impl PollError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    /// Body was not the expected JSON shape.
    Malformed,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Malformed => write!(f, "malformed status payload"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
