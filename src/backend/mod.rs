//! Backend Process Supervision
//!
//! Launches the bundled Flask backend as a child process and ties its
//! lifetime to the application run.

pub mod config;
pub mod process;
pub mod supervisor;

pub use config::LaunchConfig;
pub use supervisor::BackendSupervisor;
