//! Backend Launch Configuration
//!
//! Resolves where the Flask backend lives (packaged vs development) and how
//! it is launched.

use std::env;
use std::path::{Path, PathBuf};

/// Default port the backend binds to.
pub const DEFAULT_PORT: u16 = 5555;

/// Everything needed to launch the backend process.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// Path to the flask executable inside the backend's venv.
    pub executable: PathBuf,
    /// Directory the backend runs from.
    pub working_dir: PathBuf,
    /// Arguments passed to the executable.
    pub args: Vec<String>,
    /// Port the backend is told to bind.
    pub port: u16,
}

impl LaunchConfig {
    /// Build the default launch configuration for the current runtime mode.
    pub fn resolve(is_packaged: bool) -> Self {
        Self::resolve_on_port(is_packaged, DEFAULT_PORT)
    }

    /// Same as [`resolve`](Self::resolve) with an explicit port.
    pub fn resolve_on_port(is_packaged: bool, port: u16) -> Self {
        let working_dir = get_backend_dir(is_packaged);
        let executable = get_flask_path(&working_dir);

        Self {
            executable,
            working_dir,
            args: vec!["run".to_string(), format!("--port={}", port)],
            port,
        }
    }
}

/// Whether the app runs as a packaged build.
///
/// Development builds expect an externally managed backend (`flask run` in a
/// terminal) and never spawn their own.
pub fn is_packaged() -> bool {
    !cfg!(debug_assertions)
}

/// Get the directory containing the backend service.
pub fn get_backend_dir(is_packaged: bool) -> PathBuf {
    if is_packaged {
        // Packaged: backend ships in the resources folder next to the executable
        if let Ok(exe_path) = env::current_exe() {
            if let Some(parent) = exe_path.parent() {
                let resources = parent.join("resources").join("backend");
                if resources.exists() {
                    return resources;
                }
                return parent.join("backend");
            }
        }
    }

    // Development: backend checked out next to the shell
    env::current_dir()
        .map(|cwd| cwd.join("backend"))
        .unwrap_or_else(|_| PathBuf::from("backend"))
}

/// Get the flask executable inside the backend's venv.
pub fn get_flask_path(backend_dir: &Path) -> PathBuf {
    if cfg!(target_os = "windows") {
        backend_dir.join("venv").join("Scripts").join("flask.exe")
    } else {
        backend_dir.join("venv").join("bin").join("flask")
    }
}
