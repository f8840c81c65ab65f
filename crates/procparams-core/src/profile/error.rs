use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::keyfile::KeyFileError;

/// Failure of a whole profile load or save.
///
/// Problems with individual fields are not errors; they are reported in
/// [`LoadReport`](super::LoadReport).
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("cannot read profile {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed profile {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: KeyFileError,
    },

    #[error("cannot write profile {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ProfileError {
    /// Path the failed operation was working on.
    pub fn path(&self) -> &std::path::Path {
        match self {
            ProfileError::NotFound { path }
            | ProfileError::Unreadable { path, .. }
            | ProfileError::Malformed { path, .. }
            | ProfileError::WriteFailure { path, .. } => path,
        }
    }
}
