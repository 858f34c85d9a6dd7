//! Ignore loader
//!
//! Reads the per-directory opt-in exclusion file (`.waybackup.ignore`) and
//! merges its entries into the set inherited from the enclosing directory.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::Result;
use crate::events::{Event, EventSink};

/// Name of the per-directory ignore file.
pub const IGNORE_FILE_NAME: &str = ".waybackup.ignore";

/// Set of absolute source-side paths to prune from the walk.
///
/// Wrapped in an `Rc` so that a directory without its own ignore file can
/// hand the exact same set down to its children in O(1), with no allocation
/// and no risk of a child frame's additions leaking back to a sibling.
pub type IgnoreSet = Rc<HashSet<PathBuf>>;

/// Returns an empty ignore set, used as the root of the recursion.
#[must_use]
pub fn empty() -> IgnoreSet {
    Rc::new(HashSet::new())
}

/// Loads `dir/.waybackup.ignore` (if present) and unions its entries into
/// `inherited`, returning the inherited set unchanged when the file is
/// absent or empty.
///
/// # Errors
///
/// Returns an error if the ignore file exists but cannot be read.
pub fn load(dir: &Path, inherited: &IgnoreSet, sink: &dyn EventSink, verbose: bool) -> Result<IgnoreSet> {
    let ignore_file = dir.join(IGNORE_FILE_NAME);
    if !ignore_file.is_file() {
        return Ok(Rc::clone(inherited));
    }

    if verbose {
        sink.emit(Event::FoundIgnoreFile { name: dir.to_path_buf() });
    }

    let contents = fs::read_to_string(&ignore_file)?;
    let mut additions = Vec::new();
    for line in contents.lines() {
        if line.is_empty() {
            continue;
        }
        let path = if Path::new(line).is_absolute() {
            PathBuf::from(line)
        } else {
            dir.join(line)
        };
        if verbose {
            sink.emit(Event::AddedIgnoredDirectory { name: path.clone() });
        }
        additions.push(path);
    }

    if additions.is_empty() {
        return Ok(Rc::clone(inherited));
    }

    let mut merged = (**inherited).clone();
    merged.extend(additions);
    Ok(Rc::new(merged))
}
