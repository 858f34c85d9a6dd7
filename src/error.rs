//! Error taxonomy for the backup orchestrator
//!
//! Distinguishes precondition failures (detected before any mutation, each with
//! a fixed exit code) from fatal filesystem errors raised mid-walk (whose exit
//! code is the wrapped OS `errno`).

use std::path::PathBuf;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BackupError>;

/// Errors that can terminate a backup run.
#[derive(thiserror::Error, Debug)]
pub enum BackupError {
    /// `tgtdir` exists and is not a directory.
    #[error("target {path} exists and is not a directory")]
    TargetNotADirectory {
        /// The offending target path.
        path: PathBuf,
    },

    /// `tgtdir` exists and is non-empty.
    #[error("target directory {path} is not empty")]
    TargetNotEmpty {
        /// The offending target path.
        path: PathBuf,
    },

    /// `refdir` and `tgtdir` are on different filesystem devices.
    #[error("reference directory {refdir} and target directory {tgtdir} are on different devices")]
    DeviceMismatch {
        /// The reference root.
        refdir: PathBuf,
        /// The target root.
        tgtdir: PathBuf,
    },

    /// A fatal filesystem error raised anywhere in the walk.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BackupError {
    /// Maps this error to the process exit code specified by the event contract.
    ///
    /// Precondition failures get their own fixed codes; a fatal I/O error
    /// exits with its OS `errno`, falling back to 1 when the OS did not supply one.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::TargetNotADirectory { .. } => 2,
            Self::TargetNotEmpty { .. } => 3,
            Self::DeviceMismatch { .. } => 5,
            Self::Io(err) => err.raw_os_error().unwrap_or(1),
        }
    }
}
