//! Stat/compare primitive
//!
//! Extracts the `(mtime, ctime, size, mode, uid, gid)` tuple of a path and
//! implements the metadata-equivalence predicate that decides link-vs-copy.

use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

use crate::error::Result;

/// A snapshot of the metadata fields the equivalence predicate cares about.
///
/// Times are combined seconds+nanoseconds so that two stats can be compared
/// with ordinary integer `>`/`!=` at nanosecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMetadata {
    /// Modification time in nanoseconds since the epoch.
    pub mtime_ns: i128,
    /// Inode-change time in nanoseconds since the epoch.
    pub ctime_ns: i128,
    /// File size in bytes.
    pub size: u64,
    /// Full `st_mode` bits, including the file-type bits.
    pub mode: u32,
    /// Owning user id.
    pub uid: u32,
    /// Owning group id.
    pub gid: u32,
    /// Device id the file resides on (used for the cross-device pre-flight check).
    pub dev: u64,
}

impl EntryMetadata {
    fn from_std(meta: &fs::Metadata) -> Self {
        Self {
            mtime_ns: combine_ns(meta.mtime(), meta.mtime_nsec()),
            ctime_ns: combine_ns(meta.ctime(), meta.ctime_nsec()),
            size: meta.size(),
            mode: meta.mode(),
            uid: meta.uid(),
            gid: meta.gid(),
            dev: meta.dev(),
        }
    }
}

fn combine_ns(secs: i64, nsec: i64) -> i128 {
    i128::from(secs) * 1_000_000_000 + i128::from(nsec)
}

/// Stats `path`, following symlinks.
///
/// # Errors
///
/// Returns an error if `path` does not exist or is not statable.
pub fn stat(path: &Path) -> Result<EntryMetadata> {
    Ok(EntryMetadata::from_std(&fs::metadata(path)?))
}

/// Stats `path` without following a trailing symlink.
///
/// # Errors
///
/// Returns an error if `path` does not exist or is not statable.
pub fn lstat(path: &Path) -> Result<EntryMetadata> {
    Ok(EntryMetadata::from_std(&fs::symlink_metadata(path)?))
}

/// Returns whether `mode`'s file-type bits (`st_mode & S_IFMT`) indicate a
/// symbolic link. Classification reads type bits off an already-captured
/// [`lstat`] result rather than re-stat'ing with `std::fs::FileType`.
#[must_use]
pub fn is_symlink_mode(mode: u32) -> bool {
    mode & libc::S_IFMT as u32 == libc::S_IFLNK as u32
}

/// Returns whether `mode`'s file-type bits indicate a regular file.
#[must_use]
pub fn is_regular_file_mode(mode: u32) -> bool {
    mode & libc::S_IFMT as u32 == libc::S_IFREG as u32
}

/// Returns whether `mode`'s file-type bits indicate a directory.
#[must_use]
pub fn is_directory_mode(mode: u32) -> bool {
    mode & libc::S_IFMT as u32 == libc::S_IFDIR as u32
}

/// Decides whether `src` and `ref_` are metadata-equivalent.
///
/// True iff none of the following hold, evaluated in order with short-circuit:
/// 1. `src.mtime > ref.mtime`
/// 2. `src.size != ref.size`
/// 3. `src.ctime > ref.ctime`
/// 4. `src.mode != ref.mode`
/// 5. `src.uid != ref.uid`
/// 6. `src.gid != ref.gid`
///
/// Only `>` is used for times, never `!=`, so that a source older than the
/// reference (e.g. a restored file) does not force an unnecessary copy.
#[must_use]
pub fn equivalent(src: &EntryMetadata, ref_: &EntryMetadata) -> bool {
    !(content_changed(src, ref_) || attrs_changed(src, ref_))
}

/// Content or size changed enough that a hardlink can never be used;
/// used by the file handler to short-circuit straight to a copy (§4.2 step 3).
#[must_use]
pub fn content_changed(src: &EntryMetadata, ref_: &EntryMetadata) -> bool {
    src.mtime_ns > ref_.mtime_ns || src.size != ref_.size
}

/// Metadata-only drift that still permits hardlinking but requires an
/// attribute refresh on the shared inode (§4.2 step 5).
#[must_use]
pub fn attrs_changed(src: &EntryMetadata, ref_: &EntryMetadata) -> bool {
    src.ctime_ns > ref_.ctime_ns
        || src.mode != ref_.mode
        || src.uid != ref_.uid
        || src.gid != ref_.gid
}

/// Determines the device id of `path` or its nearest existing ancestor.
///
/// Mirrors the original `get_device_number`: a target that does not yet
/// exist is still checkable because `mkdir` will create it on the same
/// filesystem as its existing parent.
///
/// # Errors
///
/// Returns an error only if no ancestor of `path` (including `/`) can be stat'd.
pub fn device_of_nearest_ancestor(path: &Path) -> Result<u64> {
    let mut candidate = path.to_path_buf();
    loop {
        if candidate.exists() {
            return Ok(stat(&candidate)?.dev);
        }
        match candidate.parent() {
            Some(parent) if parent != candidate => candidate = parent.to_path_buf(),
            _ => return Ok(stat(Path::new("/"))?.dev),
        }
    }
}
