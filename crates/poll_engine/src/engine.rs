use std::collections::HashMap;
use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use poll_core::{JobKey, Tick};
use poll_logging::{poll_debug, poll_trace};
use tokio::task::JoinSet;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::fetch::{FetchSettings, ReqwestStatusFetcher, StatusFetcher};
use crate::{EngineError, EngineEvent};

const MIN_INTERVAL: Duration = Duration::from_millis(1);

enum EngineCommand {
    Start { key: JobKey, interval: Duration },
    Stop { key: JobKey },
}

/// Owns one recurring poll task per job on a background tokio runtime.
///
/// Every status event of a session is delivered before its `SessionEnded`.
/// Dropping the handle cancels every session.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: FetchSettings) -> Result<Self, EngineError> {
        let fetcher = ReqwestStatusFetcher::new(settings)?;
        Self::with_fetcher(Arc::new(fetcher))
    }

    pub fn with_fetcher(fetcher: Arc<dyn StatusFetcher>) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Runtime::new().map_err(EngineError::Runtime)?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let mut sessions: HashMap<JobKey, CancellationToken> = HashMap::new();
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Start { key, interval } => {
                        if sessions.get(&key).is_some_and(|token| !token.is_cancelled()) {
                            poll_debug!("Session {} already running", key);
                            continue;
                        }
                        let token = CancellationToken::new();
                        sessions.insert(key.clone(), token.clone());
                        runtime.spawn(run_session(
                            fetcher.clone(),
                            key,
                            interval.max(MIN_INTERVAL),
                            token,
                            event_tx.clone(),
                        ));
                    }
                    EngineCommand::Stop { key } => {
                        if let Some(token) = sessions.remove(&key) {
                            token.cancel();
                        }
                    }
                }
            }
            for token in sessions.values() {
                token.cancel();
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn start(&self, key: JobKey, interval: Duration) {
        let _ = self.cmd_tx.send(EngineCommand::Start { key, interval });
    }

    pub fn stop(&self, key: JobKey) {
        let _ = self.cmd_tx.send(EngineCommand::Stop { key });
    }

    /// Returns `Ok(None)` when no event is ready, `Err(Closed)` once the engine thread is gone.
    pub fn try_recv(&self) -> Result<Option<EngineEvent>, EngineError> {
        match self.event_rx.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(EngineError::Closed),
        }
    }

    /// Waits up to `timeout`; `Ok(None)` means nothing arrived in time.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineError> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(EngineError::Closed),
        }
    }
}

async fn run_session(
    fetcher: Arc<dyn StatusFetcher>,
    key: JobKey,
    interval: Duration,
    token: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    // Like a browser interval, the first request goes out one period after start.
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut tick: Tick = 0;
    let mut requests = JoinSet::new();

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            Some(_) = requests.join_next(), if !requests.is_empty() => {}
            _ = ticker.tick() => {
                tick += 1;
                poll_trace!("Polling {} tick={}", key, tick);
                // Each request runs on its own so a slow one never delays the timer.
                requests.spawn(poll_once(
                    fetcher.clone(),
                    key.clone(),
                    tick,
                    token.clone(),
                    event_tx.clone(),
                ));
            }
        }
    }

    // In-flight requests either bail on the token or deliver their answer first.
    while requests.join_next().await.is_some() {}

    poll_debug!("Session {} ended after {} ticks", key, tick);
    let _ = event_tx.send(EngineEvent::SessionEnded { key, ticks: tick });
}

async fn poll_once(
    fetcher: Arc<dyn StatusFetcher>,
    key: JobKey,
    tick: Tick,
    token: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let result = tokio::select! {
        biased;
        _ = token.cancelled() => return,
        result = fetcher.fetch_status(&key) => result,
    };
    // A terminal answer ends the session right away, whatever its tick; the core
    // applies it the same way, so its StopPolling is then a no-op.
    if matches!(&result, Ok(report) if report.status.is_terminal()) {
        token.cancel();
    }
    let _ = event_tx.send(EngineEvent::Status { key, tick, result });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle_with_channels() -> (EngineHandle, mpsc::Sender<EngineEvent>) {
        let (cmd_tx, _cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        (EngineHandle { cmd_tx, event_rx }, event_tx)
    }

    #[test]
    fn quiet_engine_times_out_without_error() {
        let (engine, _event_tx) = handle_with_channels();
        assert!(matches!(engine.recv_timeout(Duration::from_millis(10)), Ok(None)));
        assert!(matches!(engine.try_recv(), Ok(None)));
    }

    #[test]
    fn vanished_engine_thread_is_reported_as_closed() {
        let (engine, event_tx) = handle_with_channels();
        event_tx
            .send(EngineEvent::SessionEnded {
                key: JobKey::preview("1"),
                ticks: 0,
            })
            .unwrap();
        drop(event_tx);

        // Queued events are still delivered before the close is reported.
        assert!(matches!(engine.try_recv(), Ok(Some(_))));
        assert!(matches!(
            engine.recv_timeout(Duration::from_secs(5)),
            Err(EngineError::Closed)
        ));
        assert!(matches!(engine.try_recv(), Err(EngineError::Closed)));
    }
}
