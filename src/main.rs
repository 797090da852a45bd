use std::{fs, io, process::ExitCode};

use arbor::{RunOptions, execute};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

/// arbor builds a document tree from a tiny numeric statement language and
/// runs it.
///
/// By default only the effect lines are printed, one per declaration and
/// assignment. The token sequence and the tree dump are printed ahead of them
/// on request.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells arbor to look at a file instead of a script.
    #[arg(short, long)]
    file: bool,

    /// Prints the token sequence, followed by a blank line, before running.
    /// Off by default.
    #[arg(short, long)]
    tokens: bool,

    /// Prints the tree dump before running. Off by default.
    #[arg(short, long)]
    dump: bool,

    /// Raises the log level; repeat for more detail. `RUST_LOG` takes
    /// precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    contents: String,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt().with_env_filter(filter)
         .with_target(false)
         .with_writer(io::stderr)
         .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let script = if args.file {
        match fs::read_to_string(&args.contents) {
            Ok(script) => script,
            Err(e) => {
                eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist? \
                           ({e})",
                          &args.contents);
                return ExitCode::FAILURE;
            },
        }
    } else {
        args.contents
    };

    let options = RunOptions { show_tokens: args.tokens,
                               show_tree:   args.dump, };
    let stdout = io::stdout();
    if let Err(e) = execute(&script, options, &mut stdout.lock()) {
        tracing::debug!(error = ?e, "run aborted");
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
