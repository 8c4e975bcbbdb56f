//! Polling Synchronizer
//!
//! Probes the backend status endpoint and fetches the latest payload for
//! every tracked source on a fixed cadence. Each source degrades and heals
//! independently; an unreachable backend never takes the shell down.

pub mod client;
pub mod poller;
pub mod projection;
pub mod state;

use std::time::Duration;

/// Fixed refresh cadence (5 minutes, matching the original console).
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(300);

/// Data feeds tracked by default. The set is static per run.
pub const DEFAULT_SOURCES: &[&str] = &["earthquakes_usgs", "wildfires_firms"];

pub use client::ConsoleClient;
pub use poller::{Poller, PollerConfig};
pub use state::{ConsoleState, SourceState};
