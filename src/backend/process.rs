//! Backend Process Spawning
//!
//! Spawns the Flask backend with piped stdio and forwards its output streams
//! to the log sink.

use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};

use super::config::LaunchConfig;

/// Spawn the backend process described by `config`.
///
/// Fire-and-forget: the caller must not assume the backend is ready to serve
/// requests when this returns. The polling loop discovers readiness on its
/// own.
pub fn spawn_backend(config: &LaunchConfig) -> std::io::Result<Child> {
    log::info!("[Backend] Executable: {}", config.executable.display());
    log::info!("[Backend] Working directory: {}", config.working_dir.display());
    log::info!("[Backend] Port: {}", config.port);

    let mut cmd = Command::new(&config.executable);
    cmd.args(&config.args)
        .current_dir(&config.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    // Windows-specific: hide console window
    #[cfg(target_os = "windows")]
    {
        use std::os::windows::process::CommandExt;
        cmd.creation_flags(0x08000000); // CREATE_NO_WINDOW
    }

    cmd.spawn()
}

/// Wire the child's stdout/stderr to the log sink on background threads.
///
/// The sink is append-only: a log write never raises back into the reader
/// threads, and the threads end on their own once the pipes close.
pub fn forward_output(child: &mut Child) {
    if let Some(stdout) = child.stdout.take() {
        let reader = BufReader::new(stdout);
        std::thread::spawn(move || {
            for line in reader.lines().map_while(Result::ok) {
                if !line.is_empty() {
                    log::info!("[Backend] {}", line);
                }
            }
        });
    }

    if let Some(stderr) = child.stderr.take() {
        let reader = BufReader::new(stderr);
        std::thread::spawn(move || {
            for line in reader.lines().map_while(Result::ok) {
                if !line.is_empty() {
                    if line.contains("ERROR") || line.contains("Traceback") {
                        log::error!("[Backend Error] {}", line);
                    } else {
                        log::info!("[Backend] {}", line);
                    }
                }
            }
        });
    }
}
