use crate::state::ReportOutcome;
use crate::{Effect, Msg, PollerState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: PollerState, msg: Msg) -> (PollerState, Vec<Effect>) {
    let effects = match msg {
        Msg::Initialize(elements) => {
            // Initialization is one-shot per page render.
            if state.is_initialized() {
                return (state, Vec::new());
            }
            state
                .initialize(elements)
                .into_iter()
                .map(|key| {
                    let interval = state.options().interval_for(key.kind);
                    Effect::StartPolling { key, interval }
                })
                .collect()
        }
        Msg::StatusReceived { key, tick, report } => {
            match state.apply_report(&key, tick, report) {
                ReportOutcome::Terminal => vec![Effect::StopPolling { key }],
                ReportOutcome::Pending
                | ReportOutcome::Stale
                | ReportOutcome::AlreadyTerminal
                | ReportOutcome::UnknownJob => Vec::new(),
            }
        }
        Msg::PollFailed { key, reason, .. } => {
            state.record_failure(&key, reason);
            Vec::new()
        }
    };

    (state, effects)
}
