//! Render poll engine: page scanning, status fetching and per-job poll timers.
mod decode;
mod engine;
mod fetch;
mod page;
mod persist;
mod scan;
mod types;
mod wire;

pub use decode::{decode_page, DecodedPage};
pub use engine::EngineHandle;
pub use fetch::{FetchSettings, ReqwestStatusFetcher, StatusFetcher};
pub use page::{load_page_blocking, PageLoader};
pub use persist::{ensure_output_dir, PersistError, SnapshotWriter};
pub use scan::{scan_page, ScanOutcome, SkipReason, SkippedElement, STATUS_NODE_ID};
pub use types::{EngineError, EngineEvent, FailureKind, PollError};
pub use wire::decode_status;
