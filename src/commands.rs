//! Tauri Commands
//!
//! Exposes console state and backend supervision status to the frontend.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tauri::{AppHandle, State};

use crate::backend::BackendSupervisor;
use crate::sync::projection::render_feature_count;
use crate::sync::Poller;

/// Managed state wrapper for the supervisor.
pub struct SupervisorState(pub Arc<BackendSupervisor>);

/// Managed state wrapper for the poller.
pub struct PollerState(pub Arc<Poller>);

/// What the sidebar renders: connectivity plus one label per layer.
#[derive(Debug, Serialize)]
pub struct ConsoleView {
    pub status: String,
    pub layers: HashMap<String, String>,
    pub ticks_completed: u64,
}

/// Current console state, projected to display labels.
#[tauri::command]
pub async fn console_state(state: State<'_, PollerState>) -> Result<ConsoleView, String> {
    let snapshot = state.0.snapshot().await;

    let layers = snapshot
        .layers
        .iter()
        .map(|(source, slot)| (source.clone(), render_feature_count(&slot.state)))
        .collect();

    Ok(ConsoleView {
        status: snapshot.connectivity,
        layers,
        ticks_completed: state.0.ticks_completed(),
    })
}

/// Whether the supervised backend process is alive.
#[tauri::command]
pub async fn backend_running(state: State<'_, SupervisorState>) -> Result<bool, String> {
    Ok(state.0.is_running().await)
}

/// Quit the application, tearing down the poller and backend first.
#[tauri::command]
pub async fn quit_app(
    app: AppHandle,
    supervisor: State<'_, SupervisorState>,
    poller: State<'_, PollerState>,
) -> Result<(), String> {
    poller.0.stop();
    supervisor.0.stop().await;
    app.exit(0);
    Ok(())
}
