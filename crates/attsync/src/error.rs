//! CLI error types.

use attsync_config::ConfigError;
use attsync_confluence::TransferError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Transfer(#[from] TransferError),

    /// Pull rejected for bad credentials; ends the run without usage text.
    #[error("{0}")]
    FatalAuth(TransferError),

    #[error("transfer task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("interrupted")]
    Interrupted,
}
