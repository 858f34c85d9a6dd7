//! `hardsnap`: space-efficient, incremental full-tree backup via hardlinks.
//!
//! Given a source tree `S`, a reference snapshot `R`, and an empty target
//! `T`, [`orchestrator::run`] produces at `T` a complete shadow of `S` in
//! which every file that is byte-identical and metadata-equivalent to its
//! counterpart under `R` is hard-linked into `R`'s inode; changed or new
//! files are freshly copied. Modeled on the `rsnapshot` hardlink-snapshot
//! idiom.
//!
//! Refreshing attributes on a hardlink also mutates the reference
//! snapshot's inode in place — this is a deliberate consequence of the
//! shared-inode model, not a bug. Do not treat `R` as immutable across
//! runs.

pub mod attrs;
pub mod cli;
pub mod context;
pub mod error;
pub mod events;
pub mod file_handler;
pub mod ignore;
pub mod metadata;
pub mod orchestrator;
pub mod walker;
