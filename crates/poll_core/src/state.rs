use std::collections::BTreeMap;
use std::time::Duration;

use crate::view_model::{PollerViewModel, SessionView};
use crate::{ElementContent, JobElement, JobKey, JobKind, JobStatus, StatusReport, Tick};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// No terminal status seen yet. `last_status` is the most recent in-progress label.
    Pending { last_status: Option<String> },
    Succeeded { render_url: String },
    Failed,
    /// Stopped by a `false` stop flag (opt-in).
    Stopped,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Phase::Pending { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerOptions {
    pub preview_interval: Duration,
    pub full_interval: Duration,
    /// Stop a session when a response carries `bool: false`.
    pub honor_stop_flag: bool,
}

impl Default for PollerOptions {
    fn default() -> Self {
        Self {
            preview_interval: JobKind::Preview.default_interval(),
            full_interval: JobKind::FullRender.default_interval(),
            honor_stop_flag: false,
        }
    }
}

impl PollerOptions {
    pub fn interval_for(&self, kind: JobKind) -> Duration {
        match kind {
            JobKind::Preview => self.preview_interval,
            JobKind::FullRender => self.full_interval,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Session {
    element: JobElement,
    phase: Phase,
    last_applied_tick: Tick,
    failed_ticks: u32,
    last_error: Option<String>,
}

impl Session {
    fn new(element: JobElement) -> Self {
        Self {
            element,
            phase: Phase::Pending { last_status: None },
            last_applied_tick: 0,
            failed_ticks: 0,
            last_error: None,
        }
    }
}

/// What applying a status report did to its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReportOutcome {
    UnknownJob,
    AlreadyTerminal,
    Stale,
    Pending,
    Terminal,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PollerState {
    options: PollerOptions,
    initialized: bool,
    /// Sessions in page order.
    sessions: Vec<Session>,
    index: BTreeMap<JobKey, usize>,
    dirty: bool,
}

impl PollerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: PollerOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &PollerOptions {
        &self.options
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn element(&self, key: &JobKey) -> Option<&JobElement> {
        self.index.get(key).map(|&i| &self.sessions[i].element)
    }

    pub fn phase(&self, key: &JobKey) -> Option<&Phase> {
        self.index.get(key).map(|&i| &self.sessions[i].phase)
    }

    /// Job elements in page order.
    pub fn elements(&self) -> impl Iterator<Item = &JobElement> {
        self.sessions.iter().map(|session| &session.element)
    }

    pub fn view(&self) -> PollerViewModel {
        let sessions: Vec<SessionView> = self
            .sessions
            .iter()
            .map(|session| SessionView {
                key: session.element.key().clone(),
                phase: session.phase.clone(),
                last_applied_tick: session.last_applied_tick,
                failed_ticks: session.failed_ticks,
                last_error: session.last_error.clone(),
            })
            .collect();
        let all_terminal = sessions.iter().all(|s| s.phase.is_terminal());
        PollerViewModel {
            sessions,
            all_terminal,
            dirty: self.dirty,
        }
    }

    /// Returns whether any element changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Registers one session per distinct key, keeping the first element for duplicates.
    /// Returns the keys that were registered, in page order.
    pub(crate) fn initialize(&mut self, elements: Vec<JobElement>) -> Vec<JobKey> {
        self.initialized = true;
        let mut registered = Vec::with_capacity(elements.len());
        for element in elements {
            let key = element.key().clone();
            if key.job_id.is_empty() || self.index.contains_key(&key) {
                continue;
            }
            self.index.insert(key.clone(), self.sessions.len());
            self.sessions.push(Session::new(element));
            registered.push(key);
        }
        registered
    }

    pub(crate) fn apply_report(
        &mut self,
        key: &JobKey,
        tick: Tick,
        report: StatusReport,
    ) -> ReportOutcome {
        let honor_stop_flag = self.options.honor_stop_flag;
        let Some(&i) = self.index.get(key) else {
            return ReportOutcome::UnknownJob;
        };
        let session = &mut self.sessions[i];
        if session.phase.is_terminal() {
            return ReportOutcome::AlreadyTerminal;
        }
        // A late Done/Failed still settles the job: the engine stops polling on it.
        if tick <= session.last_applied_tick && !report.status.is_terminal() {
            return ReportOutcome::Stale;
        }
        session.last_applied_tick = session.last_applied_tick.max(tick);
        session.last_error = None;

        let kind = key.kind;
        let (changed, outcome) = match report.status {
            JobStatus::Done => {
                let url = report.render_url.unwrap_or_default();
                let content = match kind {
                    JobKind::Preview => ElementContent::PreviewImage { url: url.clone() },
                    JobKind::FullRender => ElementContent::DownloadLink { url: url.clone() },
                };
                session.phase = Phase::Succeeded { render_url: url };
                (session.element.replace_content(content), ReportOutcome::Terminal)
            }
            JobStatus::Failed => {
                session.phase = Phase::Failed;
                (
                    session
                        .element
                        .replace_content(ElementContent::Failure { kind }),
                    ReportOutcome::Terminal,
                )
            }
            JobStatus::InProgress(_) if honor_stop_flag && report.stop_flag == Some(false) => {
                session.phase = Phase::Stopped;
                (false, ReportOutcome::Terminal)
            }
            JobStatus::InProgress(label) => {
                let changed = match kind {
                    JobKind::Preview => session.element.replace_content(ElementContent::Loading),
                    JobKind::FullRender => session.element.set_status_text(&label),
                };
                session.phase = Phase::Pending {
                    last_status: Some(label),
                };
                (changed, ReportOutcome::Pending)
            }
        };
        if changed {
            self.dirty = true;
        }
        outcome
    }

    /// Counts a failed tick. The element is never touched.
    pub(crate) fn record_failure(&mut self, key: &JobKey, reason: String) {
        if let Some(&i) = self.index.get(key) {
            let session = &mut self.sessions[i];
            if !session.phase.is_terminal() {
                session.failed_ticks = session.failed_ticks.saturating_add(1);
                session.last_error = Some(reason);
            }
        }
    }
}
