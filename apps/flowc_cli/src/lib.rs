//! flowc CLI
//!
//! A thin command-line wrapper around [`flowc_compile`] for ad hoc
//! compilation: feed it a pipeline source file, get back the compiled DAG
//! (or a structured error) as JSON.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `flowc check` | Parse and type-check only, report errors/warnings |
//! | `flowc compile` | Compile to a DAG and print it as JSON |
//!
//! # Library Usage
//!
//! The argument parsing and dispatch live in [`cli`]; `main` is just
//! `run_cli()` plus exit-code handling.

pub mod cli;

pub use cli::run_cli;
