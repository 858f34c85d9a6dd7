//! Attribute copier
//!
//! Replicates `(uid, gid, mode, atime, mtime)` from a source path to a
//! target path, in that order. Ownership uses a raw `lchown`/`chown` call
//! (not exposed by `std`); timestamps use the `filetime` crate for
//! nanosecond precision.

use std::ffi::CString;
use std::fs;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::Path;

use filetime::FileTime;

use crate::error::{BackupError, Result};

/// Copies owner, mode, and access/modification times from `src` to `tgt`,
/// in that order.
///
/// A no-op under `dryrun`. `follow_symlinks` selects `chown` vs `lchown`
/// and whether `set_permissions` runs at all; pass `false` when `tgt` is
/// itself a symlink, since symlink attributes are not replicated (§4.3).
///
/// # Errors
///
/// Returns an error if any of the underlying syscalls fail.
pub fn copy_attributes(src: &Path, tgt: &Path, follow_symlinks: bool, dryrun: bool) -> Result<()> {
    if dryrun {
        return Ok(());
    }

    let src_meta = fs::metadata(src)?;

    chown(tgt, src_meta.uid(), src_meta.gid(), follow_symlinks)?;

    if follow_symlinks {
        fs::set_permissions(tgt, fs::Permissions::from_mode(src_meta.mode() & 0o7777))?;

        let atime = FileTime::from_unix_time(src_meta.atime(), src_meta.atime_nsec() as u32);
        let mtime = FileTime::from_unix_time(src_meta.mtime(), src_meta.mtime_nsec() as u32);
        filetime::set_file_times(tgt, atime, mtime)?;
    }

    Ok(())
}

fn chown(path: &Path, uid: u32, gid: u32, follow_symlinks: bool) -> Result<()> {
    let c_path = CString::new(path.as_os_str().as_bytes()).map_err(|_| {
        BackupError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path contains a NUL byte",
        ))
    })?;

    let ret = if follow_symlinks {
        unsafe { libc::chown(c_path.as_ptr(), uid as libc::uid_t, gid as libc::gid_t) }
    } else {
        unsafe { libc::lchown(c_path.as_ptr(), uid as libc::uid_t, gid as libc::gid_t) }
    };

    if ret != 0 {
        return Err(BackupError::Io(std::io::Error::last_os_error()));
    }

    Ok(())
}
