use std::sync::Arc;

use tauri::Manager;

pub mod backend;
mod commands;
pub mod sync;

use backend::{config, BackendSupervisor, LaunchConfig};
use commands::{backend_running, console_state, quit_app, PollerState, SupervisorState};
use sync::{Poller, PollerConfig};

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .setup(|app| {
            // Logging
            if cfg!(debug_assertions) {
                app.handle().plugin(
                    tauri_plugin_log::Builder::default()
                        .level(log::LevelFilter::Info)
                        .build(),
                )?;
            }

            let supervisor = Arc::new(BackendSupervisor::new());
            let poller = Arc::new(Poller::new(PollerConfig::default()));
            app.manage(SupervisorState(supervisor.clone()));
            app.manage(PollerState(poller.clone()));

            // Launch the backend only when packaged; in development it is
            // managed externally (`flask run` in a terminal). The window
            // opens either way — the poller reports disconnection until the
            // backend answers.
            let is_packaged = config::is_packaged();
            tauri::async_runtime::spawn(async move {
                if is_packaged {
                    supervisor.start(LaunchConfig::resolve(true)).await;
                } else {
                    log::info!("[Backend] Development mode, expecting external backend");
                }
                poller.start();
            });

            log::info!("Skyglass Console started");
            Ok(())
        })
        .on_window_event(|window, event| {
            if let tauri::WindowEvent::Destroyed = event {
                // Teardown: cancel the poll schedule, terminate the backend.
                // In-flight fetches finish on their own; their results are
                // moot once the window is gone.
                let app = window.app_handle();
                if let Some(poller) = app.try_state::<PollerState>() {
                    poller.0.stop();
                }
                if let Some(supervisor) = app.try_state::<SupervisorState>() {
                    let supervisor = supervisor.0.clone();
                    tauri::async_runtime::spawn(async move {
                        supervisor.stop().await;
                    });
                }
            }
        })
        .invoke_handler(tauri::generate_handler![
            console_state,
            backend_running,
            quit_app,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
