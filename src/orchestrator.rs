//! Backup orchestrator
//!
//! Runs the pre-flight invariants, then drives the root walk: resets
//! counters, emits the two lifecycle events, and maps the walk's outcome to
//! a process exit code.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use crate::context::RunContext;
use crate::error::{BackupError, Result};
use crate::events::{Event, EventSink, FinishedBackupError};
use crate::ignore;
use crate::metadata::device_of_nearest_ancestor;
use crate::walker::walk_directory;

/// Verifies the two invariants without which hardlinking cannot work:
/// `tgtdir` is absent or empty, and `refdir`/`tgtdir` share a device.
///
/// # Errors
///
/// Returns [`BackupError::TargetNotADirectory`], [`BackupError::TargetNotEmpty`],
/// or [`BackupError::DeviceMismatch`] if the corresponding invariant fails.
pub fn preflight(refdir: &Path, tgtdir: &Path) -> Result<()> {
    if tgtdir.exists() {
        if !tgtdir.is_dir() {
            return Err(BackupError::TargetNotADirectory {
                path: tgtdir.to_path_buf(),
            });
        }
        let mut entries = fs::read_dir(tgtdir)?;
        if entries.next().is_some() {
            return Err(BackupError::TargetNotEmpty {
                path: tgtdir.to_path_buf(),
            });
        }
    }

    let ref_dev = device_of_nearest_ancestor(refdir)?;
    let tgt_dev = device_of_nearest_ancestor(tgtdir)?;
    if ref_dev != tgt_dev {
        return Err(BackupError::DeviceMismatch {
            refdir: refdir.to_path_buf(),
            tgtdir: tgtdir.to_path_buf(),
        });
    }

    Ok(())
}

/// Runs one complete backup: pre-flight checks, the root walk, and the
/// lifecycle event pair. Returns the process exit code (`0` on success).
///
/// Fatal filesystem errors encountered mid-walk are captured rather than
/// propagated: the partial target tree is left in place, `FinishedBackup` is
/// still emitted, and the mapped `errno` is returned. Pre-flight failures,
/// by contrast, propagate directly since no mutation and no events have
/// occurred yet.
///
/// # Errors
///
/// Returns an error only for pre-flight failures (§7); mid-walk faults are
/// captured in the returned exit code instead.
pub fn run(
    srcdir: &Path,
    refdir: &Path,
    tgtdir: &Path,
    dryrun: bool,
    verbose: bool,
    sink: &dyn EventSink,
) -> Result<i32> {
    preflight(refdir, tgtdir)?;

    let mut ctx = RunContext::new(dryrun, verbose, sink);
    let start_time = SystemTime::now();

    ctx.emit(Event::StartedBackup {
        start_time,
        dryrun,
        verbose,
        srcdir: srcdir.to_path_buf(),
        refdir: refdir.to_path_buf(),
        tgtdir: tgtdir.to_path_buf(),
    });

    let outcome = walk_directory(srcdir, refdir, tgtdir, &ignore::empty(), &mut ctx);

    if let Err(err) = &outcome {
        let BackupError::Io(io_err) = err else {
            unreachable!("walk_directory only ever returns BackupError::Io");
        };
        ctx.fault.errno = io_err.raw_os_error().unwrap_or(1);
        ctx.fault.strerror = Some(io_err.to_string());
    }

    let finish_time = SystemTime::now();
    let status = ctx.fault.errno;

    ctx.emit(Event::FinishedBackup {
        start_time,
        finish_time,
        counters: ctx.counters,
        status,
        error: outcome.is_err().then(|| FinishedBackupError {
            errno: ctx.fault.errno,
            strerror: ctx.fault.strerror.clone().unwrap_or_default(),
            last_directory_entered: ctx.fault.last_directory_entered.clone(),
        }),
    });

    Ok(status)
}
