use std::fmt;
use std::time::Duration;

/// Per-session sequence number of a poll request, starting at 1.
pub type Tick = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JobKind {
    /// Image preview generation, polled every second.
    Preview,
    /// Full render/composite, polled every ten seconds.
    FullRender,
}

impl JobKind {
    pub const ALL: [JobKind; 2] = [JobKind::Preview, JobKind::FullRender];

    /// CSS class marking an element that awaits this kind of job.
    pub fn marker_class(self) -> &'static str {
        match self {
            JobKind::Preview => "js-nopreview",
            JobKind::FullRender => "js-nofull",
        }
    }

    pub fn default_interval(self) -> Duration {
        match self {
            JobKind::Preview => Duration::from_millis(1_000),
            JobKind::FullRender => Duration::from_millis(10_000),
        }
    }

    pub fn default_endpoint(self) -> &'static str {
        match self {
            JobKind::Preview => "/preview_poll",
            JobKind::FullRender => "/status_poll",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobKind::Preview => write!(f, "preview"),
            JobKind::FullRender => write!(f, "full"),
        }
    }
}

/// Identifies one polling session: the job id plus which endpoint it is polled on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobKey {
    pub kind: JobKind,
    pub job_id: String,
}

impl JobKey {
    pub fn new(kind: JobKind, job_id: impl Into<String>) -> Self {
        Self {
            kind,
            job_id: job_id.into(),
        }
    }

    pub fn preview(job_id: impl Into<String>) -> Self {
        Self::new(JobKind::Preview, job_id)
    }

    pub fn full_render(job_id: impl Into<String>) -> Self {
        Self::new(JobKind::FullRender, job_id)
    }
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.job_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Any label other than the two terminal ones, e.g. "Queued" or "Rendering".
    InProgress(String),
    Done,
    Failed,
}

impl JobStatus {
    /// Maps a server label to a status. Matching is exact and case-sensitive.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Done" => JobStatus::Done,
            "Failed" => JobStatus::Failed,
            other => JobStatus::InProgress(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            JobStatus::InProgress(label) => label,
            JobStatus::Done => "Done",
            JobStatus::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Failed)
    }
}

/// Decoded body of one status response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub status: JobStatus,
    pub render_url: Option<String>,
    /// Top-level `bool` field; only consulted when the stop flag is opted into.
    pub stop_flag: Option<bool>,
}

impl StatusReport {
    pub fn new(status: JobStatus) -> Self {
        Self {
            status,
            render_url: None,
            stop_flag: None,
        }
    }

    pub fn in_progress(label: impl Into<String>) -> Self {
        Self::new(JobStatus::InProgress(label.into()))
    }

    pub fn done(render_url: impl Into<String>) -> Self {
        Self::new(JobStatus::Done).with_render_url(render_url)
    }

    pub fn failed() -> Self {
        Self::new(JobStatus::Failed)
    }

    pub fn with_render_url(mut self, render_url: impl Into<String>) -> Self {
        self.render_url = Some(render_url.into());
        self
    }

    pub fn with_stop_flag(mut self, flag: bool) -> Self {
        self.stop_flag = Some(flag);
        self
    }
}
