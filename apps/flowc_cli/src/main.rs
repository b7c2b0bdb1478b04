//! flowc CLI - standalone binary
//!
//! This is the entry point for the `flowc` command-line tool.
//!
//! The binary is a thin wrapper around [`flowc_cli::run_cli`], handling
//! error display and exit codes. All command logic is implemented in the
//! library crate for testability.
//!
//! # Exit Codes
//!
//! - `0` - Success
//! - `1` - Error (message printed to stderr)

fn main() {
    env_logger::init();
    if let Err(e) = flowc_cli::run_cli() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
