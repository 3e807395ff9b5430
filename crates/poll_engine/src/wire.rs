use poll_core::{JobStatus, StatusReport};
use serde::Deserialize;

use crate::{FailureKind, PollError};

/// `{ "job_info": { "jobstatus": ..., "renderurl": ... }, "bool": ... }`
#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    job_info: JobInfo,
    #[serde(default, rename = "bool")]
    stop_flag: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct JobInfo {
    jobstatus: String,
    #[serde(default)]
    renderurl: Option<String>,
}

/// Decodes a status endpoint body. Unknown fields are ignored.
pub fn decode_status(body: &[u8]) -> Result<StatusReport, PollError> {
    let envelope: StatusEnvelope = serde_json::from_slice(body)
        .map_err(|err| PollError::new(FailureKind::Malformed, err.to_string()))?;
    Ok(StatusReport {
        status: JobStatus::from_label(&envelope.job_info.jobstatus),
        render_url: envelope.job_info.renderurl,
        stop_flag: envelope.stop_flag,
    })
}
