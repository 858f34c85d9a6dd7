//! Run context
//!
//! Holds everything the recursive walk needs to carry: counters, fault
//! state, and the event sink. A fresh context is constructed at each
//! top-level call; nothing here is ambient or global.

use std::path::PathBuf;

use crate::events::EventSink;

/// Monotonically non-decreasing counters accumulated over one run.
///
/// Not atomics: the walk is single-threaded, so a plain `&mut` reference
/// threaded through the recursion is sufficient (a deliberate departure
/// from lock-free/atomic counters, which exist only to support concurrent
/// access this design never has).
#[derive(Debug, Clone, Copy, Default)]
pub struct Counters {
    /// Directories fully processed (post-order, after all children).
    pub directories_processed: u64,
    /// Directories pruned by the ignore set.
    pub directories_skipped: u64,
    /// Files pruned by the ignore set.
    pub files_skipped: u64,
    /// Files freshly copied (content changed or no reference counterpart).
    pub files_copied: u64,
    /// Total bytes copied across all freshly-copied regular files.
    pub bytes_copied: u64,
    /// Number of times attributes were refreshed on a regular file.
    pub file_attributes_copied: u64,
    /// Symlinks recreated at the target.
    pub symlinks_copied: u64,
    /// Hard links created at the target.
    pub links_created: u64,
}

/// Fault state populated at most once: the first fatal OS error aborts the
/// walk and is captured here for the `FinishedBackup` event.
#[derive(Debug, Clone, Default)]
pub struct Fault {
    /// The last directory entered before the fault (or ever, on success).
    pub last_directory_entered: Option<PathBuf>,
    /// `0` on success, else the captured `errno`.
    pub errno: i32,
    /// The captured OS error message.
    pub strerror: Option<String>,
}

/// Per-run mutable state threaded through the recursive walk.
///
/// Owns the counters and fault state exclusively; the ignore set is
/// propagated separately (see [`crate::ignore::IgnoreSet`]) since its
/// lifetime is scoped to a stack frame, not the whole run.
pub struct RunContext<'a> {
    /// Suppress all filesystem mutation when set.
    pub dryrun: bool,
    /// Emit per-entry events when set.
    pub verbose: bool,
    /// The capability that receives the event stream.
    pub sink: &'a dyn EventSink,
    /// Accumulated counters.
    pub counters: Counters,
    /// Fault state, populated at most once.
    pub fault: Fault,
}

impl<'a> RunContext<'a> {
    /// Builds a fresh run context with all counters and fault state zeroed.
    #[must_use]
    pub fn new(dryrun: bool, verbose: bool, sink: &'a dyn EventSink) -> Self {
        Self {
            dryrun,
            verbose,
            sink,
            counters: Counters::default(),
            fault: Fault::default(),
        }
    }

    /// Emits `event` only if `verbose` is set.
    pub fn emit_verbose(&self, event: crate::events::Event) {
        if self.verbose {
            self.sink.emit(event);
        }
    }

    /// Emits `event` unconditionally (used for the two lifecycle events).
    pub fn emit(&self, event: crate::events::Event) {
        self.sink.emit(event);
    }
}
