use std::time::Duration;

use crate::JobKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start a recurring poll for one job. The first request fires after one `interval`.
    StartPolling { key: JobKey, interval: Duration },
    /// Cancel the recurring poll for one job.
    StopPolling { key: JobKey },
}
