//! Poll Scheduler
//!
//! Drives one immediate tick and then a fixed-interval loop. Every tick
//! probes the status endpoint and fetches each tracked source concurrently;
//! outcomes flow to the reducer as events.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Notify, RwLock};

use super::client::ConsoleClient;
use super::state::{spawn_reducer, ConsoleState, SharedState, SyncEvent};
use super::{DEFAULT_SOURCES, REFRESH_INTERVAL};
use crate::backend::config::DEFAULT_PORT;

/// Poll schedule configuration. The defaults match the original console:
/// two sources, five minute cadence, local backend.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub base_url: String,
    pub sources: Vec<String>,
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            base_url: format!("http://127.0.0.1:{}", DEFAULT_PORT),
            sources: DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
            interval: REFRESH_INTERVAL,
        }
    }
}

/// Schedules ticks and owns the synchronizer's observable state.
pub struct Poller {
    config: PollerConfig,
    client: ConsoleClient,
    state: SharedState,
    running: Arc<AtomicBool>,
    cancel: Arc<Notify>,
    ticks: Arc<AtomicU64>,
    seq: Arc<AtomicU64>,
}

impl Poller {
    pub fn new(config: PollerConfig) -> Self {
        let client = ConsoleClient::new(config.base_url.clone());
        let state = Arc::new(RwLock::new(ConsoleState::new(&config.sources)));

        Self {
            config,
            client,
            state,
            running: Arc::new(AtomicBool::new(false)),
            cancel: Arc::new(Notify::new()),
            ticks: Arc::new(AtomicU64::new(0)),
            seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Snapshot of the observable state for the rendering surface.
    pub async fn snapshot(&self) -> ConsoleState {
        self.state.read().await.clone()
    }

    /// Number of completed ticks since start.
    pub fn ticks_completed(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    /// Start the schedule: one tick immediately, then one per interval.
    pub fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            log::warn!("[Sync] Poller already running");
            return;
        }

        let events = spawn_reducer(self.state.clone());
        let client = self.client.clone();
        let sources = self.config.sources.clone();
        let interval = self.config.interval;
        let running = self.running.clone();
        let cancel = self.cancel.clone();
        let ticks = self.ticks.clone();
        let seq = self.seq.clone();

        tokio::spawn(async move {
            log::info!(
                "[Sync] Poller started ({} sources, every {:?})",
                sources.len(),
                interval
            );

            loop {
                if !running.load(Ordering::SeqCst) {
                    break;
                }

                run_tick(&client, &sources, &events, &seq).await;
                ticks.fetch_add(1, Ordering::SeqCst);

                tokio::select! {
                    _ = cancel.notified() => {},
                    _ = tokio::time::sleep(interval) => {},
                }
            }

            log::info!(
                "[Sync] Poller stopped after {} ticks",
                ticks.load(Ordering::SeqCst)
            );
        });
    }

    /// Cancel the schedule.
    ///
    /// No tick starts after the cancellation is observed; a tick already in
    /// flight completes and its results still apply.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.cancel.notify_one();
    }
}

/// One round: status probe plus one fetch per source, all concurrent.
///
/// Each fetch carries a fresh sequence number so the reducer can discard
/// completions that arrive out of order across ticks.
async fn run_tick(
    client: &ConsoleClient,
    sources: &[String],
    events: &mpsc::UnboundedSender<SyncEvent>,
    seq: &Arc<AtomicU64>,
) {
    let mut handles = Vec::with_capacity(sources.len() + 1);

    let probe_client = client.clone();
    let probe_events = events.clone();
    handles.push(tokio::spawn(async move {
        let message = probe_client.probe_status().await;
        let _ = probe_events.send(SyncEvent::Status(message));
    }));

    for source in sources {
        let fetch_client = client.clone();
        let fetch_events = events.clone();
        let source = source.clone();
        let seq = seq.fetch_add(1, Ordering::SeqCst) + 1;

        handles.push(tokio::spawn(async move {
            let outcome = fetch_client.fetch_latest(&source).await;
            let _ = fetch_events.send(SyncEvent::Fetch {
                source,
                seq,
                outcome,
            });
        }));
    }

    for handle in handles {
        let _ = handle.await;
    }
}
