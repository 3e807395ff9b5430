use std::time::Duration;

use anyhow::bail;
use poll_core::{Effect, Msg, PollerState};
use poll_engine::{EngineEvent, EngineHandle};
use poll_logging::{poll_debug, poll_info, poll_warn};

/// Executes core effects against the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn apply(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartPolling { key, interval } => {
                    poll_info!("Start polling {} every {:?}", key, interval);
                    self.engine.start(key, interval);
                }
                Effect::StopPolling { key } => {
                    poll_info!("Stop polling {}", key);
                    self.engine.stop(key);
                }
            }
        }
    }

    /// Waits up to `timeout` for the next engine event that maps to a message.
    ///
    /// Fails once the engine is gone, or when it stops a session `state` still considers pending.
    pub fn next_msg(&self, state: &PollerState, timeout: Duration) -> anyhow::Result<Option<Msg>> {
        match self.engine.recv_timeout(timeout)? {
            Some(event) => to_msg(state, event),
            None => Ok(None),
        }
    }
}

fn to_msg(state: &PollerState, event: EngineEvent) -> anyhow::Result<Option<Msg>> {
    match event {
        EngineEvent::Status {
            key,
            tick,
            result: Ok(report),
        } => {
            poll_debug!("{} tick={} status={}", key, tick, report.status.label());
            Ok(Some(Msg::StatusReceived { key, tick, report }))
        }
        EngineEvent::Status {
            key,
            tick,
            result: Err(err),
        } => {
            poll_warn!("{} tick={} failed: {}", key, tick, err);
            Ok(Some(Msg::PollFailed {
                key,
                tick,
                reason: err.to_string(),
            }))
        }
        EngineEvent::SessionEnded { key, ticks } => {
            poll_debug!("{} timer stopped after {} requests", key, ticks);
            // Every status of a session arrives before its end, so the job must be settled by now.
            if state.phase(&key).is_some_and(|phase| !phase.is_terminal()) {
                bail!("polling for {key} stopped before a final status");
            }
            Ok(None)
        }
    }
}
