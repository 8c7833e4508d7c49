//! Scratch directory lifecycle.
//!
//! The transfer runs on a blocking thread while the main thread waits for
//! either its completion or SIGINT/SIGTERM. In both cases the scratch
//! directory is removed before control returns.

use std::path::Path;

use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::error::CliError;

/// Run `job` with a fresh scratch directory.
///
/// Returns [`CliError::Interrupted`] if a termination signal arrives first;
/// the job thread is abandoned and the directory removed anyway.
pub(crate) fn run_in_scratch<T, F>(job: F) -> Result<T, CliError>
where
    F: FnOnce(&Path) -> T + Send + 'static,
    T: Send + 'static,
{
    let scratch = TempDir::with_prefix("attsync-")?;
    debug!(path = %scratch.path().display(), "Created scratch directory");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(async {
        let path = scratch.path().to_path_buf();
        let task = tokio::task::spawn_blocking(move || job(&path));
        tokio::select! {
            joined = task => joined.map_err(CliError::from),
            () = shutdown_signal() => Err(CliError::Interrupted),
        }
    });
    runtime.shutdown_background();

    let path = scratch.path().to_path_buf();
    if let Err(err) = scratch.close() {
        warn!("Failed to remove scratch directory {}: {err}", path.display());
    }

    result
}

/// Wait for Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    info!("Shutdown signal received, removing scratch directory...");
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_scratch_removed_after_job() {
        let (seen, existed): (PathBuf, bool) = run_in_scratch(|dir| {
            std::fs::write(dir.join("partial"), b"data").unwrap();
            (dir.to_path_buf(), dir.is_dir())
        })
        .unwrap();

        assert!(existed);
        assert!(!seen.exists());
    }

    #[test]
    fn test_job_result_is_returned() {
        let value = run_in_scratch(|_| 42).unwrap();
        assert_eq!(value, 42);
    }
}
