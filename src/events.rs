//! Event bus
//!
//! The event sink is a single-method capability (`EventSink::emit`), not a
//! class hierarchy to subclass: no observer registration, no plugin
//! discovery. Losing an event never corrupts the backup — the stream is
//! purely observational.

use std::path::PathBuf;
use std::time::SystemTime;

use crate::context::Counters;

/// One entry in the closed event-tag set described by the event contract.
///
/// `StartedBackup` and `FinishedBackup` are emitted unconditionally; every
/// other variant is only emitted when the run is in verbose mode.
#[derive(Debug, Clone)]
pub enum Event {
    /// First event of every run.
    StartedBackup {
        /// Wall-clock time the run began.
        start_time: SystemTime,
        /// Whether the run is a dry run.
        dryrun: bool,
        /// Whether the run is verbose.
        verbose: bool,
        /// Source root.
        srcdir: PathBuf,
        /// Reference root.
        refdir: PathBuf,
        /// Target root.
        tgtdir: PathBuf,
    },
    /// Last event of every run, success or failure.
    FinishedBackup {
        /// Wall-clock time the run began.
        start_time: SystemTime,
        /// Wall-clock time the run ended.
        finish_time: SystemTime,
        /// Final counter snapshot.
        counters: Counters,
        /// `0` on success, else the captured `errno`.
        status: i32,
        /// Populated only when `status != 0`.
        error: Option<FinishedBackupError>,
    },
    /// A directory was entered (pre-order).
    EnteredDirectory {
        /// The directory's source-side path.
        name: PathBuf,
    },
    /// A directory was pruned by the ignore set.
    SkippedDirectory {
        /// The directory's source-side path.
        name: PathBuf,
    },
    /// A directory's children (and its own attribute copy) have completed.
    ExitedDirectory {
        /// The directory's source-side path.
        name: PathBuf,
    },
    /// `.waybackup.ignore` was found in a directory.
    FoundIgnoreFile {
        /// The directory that contains the ignore file.
        name: PathBuf,
    },
    /// One entry from an ignore file was added to the effective ignore set.
    AddedIgnoredDirectory {
        /// The absolute path that was added.
        name: PathBuf,
    },
    /// A file was pruned by the ignore set.
    SkippedFile {
        /// The file's source-side path.
        name: PathBuf,
    },
    /// A regular file was freshly copied.
    CopiedFile {
        /// The file's source-side path.
        name: PathBuf,
        /// The file's size in bytes.
        size: u64,
    },
    /// A symlink was recreated at the target.
    CopiedSymlink {
        /// The symlink's source-side path.
        name: PathBuf,
    },
    /// A hard link was created at the target.
    CreatedLink {
        /// The file's source-side path.
        name: PathBuf,
    },
    /// Attributes were refreshed on a file or directory.
    CopiedAttributes {
        /// The entry's source-side path.
        name: PathBuf,
    },
}

/// The error-related payload fields attached to a failed `FinishedBackup`.
#[derive(Debug, Clone)]
pub struct FinishedBackupError {
    /// The captured OS `errno`.
    pub errno: i32,
    /// The captured OS error message.
    pub strerror: String,
    /// The last directory entered before the fault.
    pub last_directory_entered: Option<PathBuf>,
}

/// A capability that receives the structured event stream.
///
/// The core has no knowledge of what an implementor does with an event —
/// log it, print it, persist it to a database. `emit` must not be allowed
/// to abort the backup; sinks that can fail should swallow their own errors.
pub trait EventSink {
    /// Observes one event. May block (e.g. a sink that performs I/O).
    fn emit(&self, event: Event);
}

/// A sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn emit(&self, _event: Event) {}
}

/// The reference sink: renders every event through `tracing`.
///
/// Lifecycle events (`StartedBackup`/`FinishedBackup`) log at `info`; all
/// other, verbose-gated events log at `debug`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: Event) {
        match event {
            Event::StartedBackup {
                dryrun,
                verbose,
                srcdir,
                refdir,
                tgtdir,
                ..
            } => {
                tracing::info!(
                    srcdir = %srcdir.display(),
                    refdir = %refdir.display(),
                    tgtdir = %tgtdir.display(),
                    dryrun,
                    verbose,
                    "started backup"
                );
            }
            Event::FinishedBackup {
                counters, status, error, ..
            } => {
                if let Some(error) = error {
                    tracing::info!(
                        status,
                        errno = error.errno,
                        strerror = %error.strerror,
                        last_directory_entered = ?error.last_directory_entered,
                        files_copied = counters.files_copied,
                        links_created = counters.links_created,
                        bytes_copied = counters.bytes_copied,
                        "finished backup with errors"
                    );
                } else {
                    tracing::info!(
                        status,
                        files_copied = counters.files_copied,
                        links_created = counters.links_created,
                        symlinks_copied = counters.symlinks_copied,
                        files_skipped = counters.files_skipped,
                        bytes_copied = counters.bytes_copied,
                        directories_processed = counters.directories_processed,
                        directories_skipped = counters.directories_skipped,
                        file_attributes_copied = counters.file_attributes_copied,
                        "finished backup"
                    );
                }
            }
            Event::EnteredDirectory { name } => tracing::debug!(name = %name.display(), "entered directory"),
            Event::SkippedDirectory { name } => tracing::debug!(name = %name.display(), "skipped directory"),
            Event::ExitedDirectory { name } => tracing::debug!(name = %name.display(), "exited directory"),
            Event::FoundIgnoreFile { name } => tracing::debug!(name = %name.display(), "found ignore file"),
            Event::AddedIgnoredDirectory { name } => {
                tracing::debug!(name = %name.display(), "added ignored directory");
            }
            Event::SkippedFile { name } => tracing::debug!(name = %name.display(), "skipped file"),
            Event::CopiedFile { name, size } => {
                tracing::debug!(name = %name.display(), size, "copied file");
            }
            Event::CopiedSymlink { name } => tracing::debug!(name = %name.display(), "copied symlink"),
            Event::CreatedLink { name } => tracing::debug!(name = %name.display(), "created link"),
            Event::CopiedAttributes { name } => {
                tracing::debug!(name = %name.display(), "copied attributes");
            }
        }
    }
}

/// Returns the event's tag name, used by tests that assert on event ordering
/// without matching the full payload.
#[must_use]
pub fn tag_name(event: &Event) -> &'static str {
    match event {
        Event::StartedBackup { .. } => "StartedBackup",
        Event::FinishedBackup { .. } => "FinishedBackup",
        Event::EnteredDirectory { .. } => "EnteredDirectory",
        Event::SkippedDirectory { .. } => "SkippedDirectory",
        Event::ExitedDirectory { .. } => "ExitedDirectory",
        Event::FoundIgnoreFile { .. } => "FoundIgnoreFile",
        Event::AddedIgnoredDirectory { .. } => "AddedIgnoredDirectory",
        Event::SkippedFile { .. } => "SkippedFile",
        Event::CopiedFile { .. } => "CopiedFile",
        Event::CopiedSymlink { .. } => "CopiedSymlink",
        Event::CreatedLink { .. } => "CreatedLink",
        Event::CopiedAttributes { .. } => "CopiedAttributes",
    }
}
