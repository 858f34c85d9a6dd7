//! Directory walker
//!
//! Pre-order recursion over the source tree: for each source directory,
//! creates the corresponding target directory, dispatches each child to the
//! file handler or recurses, then restores directory attributes post-order.

use std::fs;
use std::path::Path;

use crate::attrs::copy_attributes;
use crate::context::RunContext;
use crate::events::Event;
use crate::error::Result;
use crate::file_handler::{classify, handle_entry, EntryKind};
use crate::ignore::{self, IgnoreSet};

/// Walks `srcdir`, mirroring it into `tgtdir` against the inode donor `refdir`.
///
/// # Errors
///
/// Returns an error on the first fatal filesystem error encountered anywhere
/// in the subtree; the partial target tree is left in place.
pub fn walk_directory(
    srcdir: &Path,
    refdir: &Path,
    tgtdir: &Path,
    inherited_ignore: &IgnoreSet,
    ctx: &mut RunContext,
) -> Result<()> {
    let ignore = ignore::load(srcdir, inherited_ignore, ctx.sink, ctx.verbose)?;

    if ignore.contains(srcdir) {
        ctx.counters.directories_skipped += 1;
        ctx.emit_verbose(Event::SkippedDirectory {
            name: srcdir.to_path_buf(),
        });
        return Ok(());
    }

    ctx.fault.last_directory_entered = Some(srcdir.to_path_buf());
    ctx.emit_verbose(Event::EnteredDirectory {
        name: srcdir.to_path_buf(),
    });

    if !ctx.dryrun {
        fs::create_dir(tgtdir)?;
    }

    let entries: Vec<_> = fs::read_dir(srcdir)?.collect::<std::io::Result<Vec<_>>>()?;

    for entry in entries {
        let name = entry.file_name();
        let srcpath = srcdir.join(&name);
        let refpath = refdir.join(&name);
        let tgtpath = tgtdir.join(&name);

        match classify(&srcpath)? {
            EntryKind::Symlink | EntryKind::RegularFile => {
                handle_entry(&srcpath, &refpath, &tgtpath, &ignore, ctx)?;
            }
            EntryKind::Directory => {
                walk_directory(&srcpath, &refpath, &tgtpath, &ignore, ctx)?;
            }
            EntryKind::Other => {}
        }
    }

    copy_attributes(srcdir, tgtdir, true, ctx.dryrun)?;

    ctx.counters.directories_processed += 1;
    ctx.emit_verbose(Event::ExitedDirectory {
        name: srcdir.to_path_buf(),
    });

    Ok(())
}
