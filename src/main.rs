//! CLI entry point.
//!
//! Parses arguments, wires up a `tracing` subscriber controlled by
//! `RUST_LOG`, runs the orchestrator, and maps its outcome to a process
//! exit code per the event contract (§6).

use clap::Parser;

use hardsnap::cli::Args;
use hardsnap::events::TracingEventSink;
use hardsnap::orchestrator;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // `--help`/`--version` exit 0 via clap's own Display{Help,Version}
    // paths; any other usage error is remapped from clap's default (2,
    // which collides with this crate's TargetNotADirectory code) to 1, the
    // code this spec reserves for CLI usage errors.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            use clap::error::ErrorKind;
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) {
                err.exit();
            }
            eprint!("{err}");
            std::process::exit(1);
        }
    };

    let status = orchestrator::run(
        &args.paths.srcdir,
        &args.paths.refdir,
        &args.paths.tgtdir,
        args.run_mode.dryrun,
        args.run_mode.verbose,
        &TracingEventSink,
    );

    match status {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("hardsnap: {err}");
            std::process::exit(err.exit_code());
        }
    }
}
