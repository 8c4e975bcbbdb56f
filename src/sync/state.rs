//! Synchronizer State
//!
//! One slot per tracked source plus a single connectivity string. All writes
//! flow through the reducer task, which holds exclusive write access; the
//! rendering surface reads snapshots through a shared lock.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{mpsc, RwLock};

use super::client::FetchOutcome;

/// Initial connectivity display, before the first probe completes.
pub const CONNECTING: &str = "Connecting...";

/// Latest known state of one data feed.
#[derive(Debug, Clone)]
pub enum SourceState {
    Pending,
    Loaded(Value),
    Errored(String),
}

/// One tracked source slot.
///
/// `applied_seq` is the sequence number of the fetch whose result currently
/// occupies `state`; older completions are discarded so a slow stale
/// response cannot overwrite a newer one.
#[derive(Debug, Clone)]
pub struct LayerSlot {
    pub applied_seq: u64,
    pub state: SourceState,
}

impl LayerSlot {
    fn pending() -> Self {
        Self {
            applied_seq: 0,
            state: SourceState::Pending,
        }
    }
}

/// Everything the rendering surface observes.
#[derive(Debug, Clone)]
pub struct ConsoleState {
    pub connectivity: String,
    pub layers: HashMap<String, LayerSlot>,
}

impl ConsoleState {
    pub fn new(sources: &[String]) -> Self {
        let layers = sources
            .iter()
            .map(|source| (source.clone(), LayerSlot::pending()))
            .collect();

        Self {
            connectivity: CONNECTING.to_string(),
            layers,
        }
    }
}

/// Events emitted by probe/fetch tasks, consumed by the reducer.
#[derive(Debug)]
pub enum SyncEvent {
    /// Connectivity probe finished; carries the string to display.
    Status(String),
    /// One fetch completed for one source.
    Fetch {
        source: String,
        seq: u64,
        outcome: FetchOutcome,
    },
}

pub type SharedState = Arc<RwLock<ConsoleState>>;

/// Spawn the single-writer reducer.
///
/// Returns the event sender. The task ends once every sender is dropped,
/// which lets results from in-flight fetches land even after the poll
/// schedule was cancelled.
pub fn spawn_reducer(state: SharedState) -> mpsc::UnboundedSender<SyncEvent> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            apply(&mut *state.write().await, event);
        }
        log::info!("[Sync] Reducer drained, exiting");
    });

    tx
}

/// Fold one event into the state.
///
/// A fetch result touches exactly one slot; every other entry is left
/// unchanged. Connectivity and per-source states never affect each other.
pub fn apply(state: &mut ConsoleState, event: SyncEvent) {
    match event {
        SyncEvent::Status(message) => state.connectivity = message,
        SyncEvent::Fetch {
            source,
            seq,
            outcome,
        } => {
            let Some(slot) = state.layers.get_mut(&source) else {
                log::warn!("[Sync] Result for untracked source '{}', dropping", source);
                return;
            };

            if seq < slot.applied_seq {
                log::info!(
                    "[Sync] Stale result for '{}' (seq {} < {}), dropping",
                    source,
                    seq,
                    slot.applied_seq
                );
                return;
            }

            slot.applied_seq = seq;
            slot.state = match outcome {
                FetchOutcome::Loaded(payload) => SourceState::Loaded(payload),
                FetchOutcome::Errored(detail) => SourceState::Errored(detail),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tracked(sources: &[&str]) -> ConsoleState {
        let sources: Vec<String> = sources.iter().map(|s| s.to_string()).collect();
        ConsoleState::new(&sources)
    }

    fn fetch(source: &str, seq: u64, outcome: FetchOutcome) -> SyncEvent {
        SyncEvent::Fetch {
            source: source.to_string(),
            seq,
            outcome,
        }
    }

    #[test]
    fn starts_connecting_with_pending_sources() {
        let state = tracked(&["earthquakes_usgs", "wildfires_firms"]);
        assert_eq!(state.connectivity, CONNECTING);
        assert_eq!(state.layers.len(), 2);
        assert!(matches!(
            state.layers["earthquakes_usgs"].state,
            SourceState::Pending
        ));
    }

    #[test]
    fn failure_for_one_source_leaves_others_untouched() {
        let mut state = tracked(&["earthquakes_usgs", "wildfires_firms"]);

        apply(
            &mut state,
            fetch(
                "wildfires_firms",
                1,
                FetchOutcome::Loaded(json!({"features": [1, 2]})),
            ),
        );
        apply(
            &mut state,
            fetch(
                "earthquakes_usgs",
                2,
                FetchOutcome::Errored("rate limited".to_string()),
            ),
        );

        assert!(matches!(
            state.layers["earthquakes_usgs"].state,
            SourceState::Errored(_)
        ));
        match &state.layers["wildfires_firms"].state {
            SourceState::Loaded(payload) => {
                assert_eq!(payload["features"].as_array().map(|f| f.len()), Some(2));
            }
            other => panic!("wildfires slot changed: {:?}", other),
        }
    }

    #[test]
    fn status_update_does_not_touch_layers() {
        let mut state = tracked(&["earthquakes_usgs"]);
        apply(&mut state, SyncEvent::Status("OK".to_string()));
        assert_eq!(state.connectivity, "OK");
        assert!(matches!(
            state.layers["earthquakes_usgs"].state,
            SourceState::Pending
        ));
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut state = tracked(&["earthquakes_usgs"]);

        apply(
            &mut state,
            fetch(
                "earthquakes_usgs",
                5,
                FetchOutcome::Loaded(json!({"features": [1]})),
            ),
        );
        // A slow response from an earlier tick arrives late
        apply(
            &mut state,
            fetch(
                "earthquakes_usgs",
                3,
                FetchOutcome::Errored("timeout".to_string()),
            ),
        );

        assert_eq!(state.layers["earthquakes_usgs"].applied_seq, 5);
        assert!(matches!(
            state.layers["earthquakes_usgs"].state,
            SourceState::Loaded(_)
        ));
    }

    #[test]
    fn untracked_source_is_dropped() {
        let mut state = tracked(&["earthquakes_usgs"]);
        apply(
            &mut state,
            fetch("volcanoes", 1, FetchOutcome::Errored("nope".to_string())),
        );
        assert_eq!(state.layers.len(), 1);
    }
}
