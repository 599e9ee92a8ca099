//! Step-through viewer for PL/0 P-code execution logs.

mod commands;
mod formatter;
mod repl;
mod session;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pcode_trace::{init_logger, init_logger_with, PcodeTrace};

use crate::session::Session;

/// Reconstructs a P-code interpreter's execution trace from its log and
/// steps through it interactively.
#[derive(Parser)]
#[command(name = "pcode-viewer", version, about)]
struct Args {
    /// Path to the interpreter's log file.
    #[arg(default_value = "pcode_output.txt")]
    log: PathBuf,

    /// Enable debug-level logging.
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    if args.verbose {
        init_logger_with("debug");
    } else {
        init_logger();
    }

    let trace = match PcodeTrace::load(&args.log) {
        Ok(trace) => trace,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let session = Session::new(trace);
    println!("{}\n", formatter::format_info(&session));

    match repl::start(session) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::Parser;

    use super::Args;

    #[test]
    fn defaults_to_interpreter_log_name() {
        let args = Args::try_parse_from(["pcode-viewer"]).unwrap();
        assert_eq!(args.log, Path::new("pcode_output.txt"));
        assert!(!args.verbose);
    }

    #[test]
    fn verbose_flag_parses_long_and_short() {
        let args = Args::try_parse_from(["pcode-viewer", "--verbose"]).unwrap();
        assert!(args.verbose);

        let args = Args::try_parse_from(["pcode-viewer", "-v", "run.log"]).unwrap();
        assert!(args.verbose);
        assert_eq!(args.log, Path::new("run.log"));
    }
}
