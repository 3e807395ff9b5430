use crate::{JobKey, Phase, Tick};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PollerViewModel {
    pub sessions: Vec<SessionView>,
    /// True once every session is terminal (vacuously true with no sessions).
    pub all_terminal: bool,
    pub dirty: bool,
}

impl PollerViewModel {
    pub fn pending_count(&self) -> usize {
        self.sessions
            .iter()
            .filter(|s| !s.phase.is_terminal())
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub key: JobKey,
    pub phase: Phase,
    pub last_applied_tick: Tick,
    pub failed_ticks: u32,
    pub last_error: Option<String>,
}
