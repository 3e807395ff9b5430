use std::path::PathBuf;
use std::time::Duration;

use poll_core::{update, Msg, Phase, PollerState};
use poll_engine::{scan_page, EngineHandle, SkipReason, SnapshotWriter};
use poll_logging::{poll_error, poll_info, poll_warn};

use crate::config::PollerConfig;
use crate::effects::EffectRunner;

const EVENT_WAIT: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub stopped: usize,
    pub snapshot: Option<PathBuf>,
}

/// Scans `html` once, then polls every job found until all of them are terminal.
pub fn run(config: &PollerConfig, html: &str) -> anyhow::Result<RunSummary> {
    let outcome = scan_page(html);
    for skipped in &outcome.skipped {
        match &skipped.reason {
            SkipReason::MissingId => {
                poll_warn!("Skipping {} element without id", skipped.kind)
            }
            SkipReason::DuplicateId(id) => {
                poll_warn!("Skipping repeated {} element id={}", skipped.kind, id)
            }
        }
    }
    poll_info!("Found {} job elements", outcome.elements.len());

    let runner = EffectRunner::new(EngineHandle::new(config.fetch_settings())?);
    let writer = SnapshotWriter::new(config.output_dir.clone(), config.snapshot_file.clone());

    let state = PollerState::with_options(config.poller_options());
    let (mut state, effects) = update(state, Msg::Initialize(outcome.elements));
    runner.apply(effects);
    let mut snapshot = write_snapshot(&writer, &state);

    while !state.view().all_terminal {
        let Some(msg) = runner.next_msg(&state, EVENT_WAIT)? else {
            continue;
        };
        let (next, effects) = update(state, msg);
        state = next;
        runner.apply(effects);
        if state.consume_dirty() {
            snapshot = write_snapshot(&writer, &state).or(snapshot);
        }
    }

    let mut summary = RunSummary {
        snapshot,
        ..RunSummary::default()
    };
    for session in state.view().sessions {
        match session.phase {
            Phase::Succeeded { render_url } => {
                poll_info!("{} done: {}", session.key, render_url);
                summary.succeeded += 1;
            }
            Phase::Failed => {
                poll_warn!("{} failed", session.key);
                summary.failed += 1;
            }
            Phase::Stopped => {
                poll_info!("{} stopped by server flag", session.key);
                summary.stopped += 1;
            }
            Phase::Pending { .. } => {}
        }
    }
    Ok(summary)
}

fn write_snapshot(writer: &SnapshotWriter, state: &PollerState) -> Option<PathBuf> {
    match writer.write(state.elements()) {
        Ok(path) => Some(path),
        Err(err) => {
            poll_error!("Failed to write snapshot to {:?}: {}", writer.path(), err);
            None
        }
    }
}
