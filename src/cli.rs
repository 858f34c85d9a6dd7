//! Command-line interface definitions
//!
//! This module organizes CLI arguments by **functional usage** - each group
//! contains the options needed by a specific component or subsystem.

use std::path::PathBuf;

use clap::Parser;

/// Incremental, hardlink-based filesystem snapshot backup tool
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Source, reference, and target directories
    #[command(flatten)]
    pub paths: PathArgs,

    /// Run-mode flags
    #[command(flatten)]
    pub run_mode: RunModeArgs,
}

/// Paths configuration
///
/// Used by: `main()`, the orchestrator's pre-flight checks.
#[derive(clap::Args, Debug, Clone)]
pub struct PathArgs {
    /// Directory to back up
    #[arg(long)]
    pub srcdir: PathBuf,

    /// Previous complete snapshot, donor of inodes for unchanged files
    #[arg(long)]
    pub refdir: PathBuf,

    /// Destination directory; must not exist or must be empty
    #[arg(long)]
    pub tgtdir: PathBuf,
}

/// Run-mode configuration
///
/// Used by: the orchestrator, the event sink.
#[derive(clap::Args, Debug, Clone)]
pub struct RunModeArgs {
    /// Emit per-entry events in addition to the two lifecycle events
    #[arg(long)]
    pub verbose: bool,

    /// Suppress all filesystem mutation; events and counters are still produced
    #[arg(long)]
    pub dryrun: bool,
}
