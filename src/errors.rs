use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by git operations, tagged so callers can react to
/// specific kinds instead of matching on message text.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("branch {0} already exists")]
    BranchAlreadyExists(String),

    /// The remote rejected our credentials.
    #[error("remote rejected credentials: {0}")]
    Unauthorized(String),

    /// The remote refused a non-fast-forward push. No merge or rebase is
    /// attempted; the caller decides how to reconcile.
    #[error("push rejected as non-fast-forward: {0}")]
    NonFastForward(String),

    #[error("git command failed: {0}")]
    Command(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Input problems detected before an action starts its side-effecting phase.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("no token credentials provided for {url}")]
    MissingCredentials { url: String },

    #[error("invalid input: {0}")]
    Invalid(String),

    #[error("path {} is outside of the workspace root", .path.display())]
    PathOutsideWorkspace { path: PathBuf },
}
