//! Command-line argument parsing and dispatch for `flowc`.

use clap::{Parser, Subcommand};
use flowc_compile::Compiler;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "flowc")]
#[command(about = "Pipeline DAG compiler", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse and type-check a pipeline source file, reporting errors and
    /// warnings without building a DAG.
    Check {
        /// Path to the pipeline source file.
        path: PathBuf,
    },
    /// Compile a pipeline source file to a DAG and print a JSON summary.
    Compile {
        /// Path to the pipeline source file.
        path: PathBuf,
        /// Name to give the compiled DAG.
        #[arg(long, default_value = "main")]
        dag_name: String,
    },
}

pub fn run_cli() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Check { path } => check(&path),
        Commands::Compile { path, dag_name } => compile(&path, &dag_name),
    }
}

fn read_source(path: &PathBuf) -> Result<String, Box<dyn std::error::Error>> {
    Ok(fs::read_to_string(path)?)
}

fn check(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let source = read_source(path)?;
    let compiler = Compiler::empty();
    match compiler.compile_to_ir(&source, "check") {
        Ok(ir) => {
            println!("ok: {} node(s), {} output(s)", ir.nodes.len(), ir.outputs.len());
            Ok(())
        }
        Err(errors) => {
            print_errors(&errors);
            Err("type checking failed".into())
        }
    }
}

fn compile(path: &PathBuf, dag_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let source = read_source(path)?;
    let compiler = Compiler::empty();
    match compiler.compile(&source, dag_name) {
        Ok(output) => {
            let dag = &output.pipeline.dag;
            let summary = serde_json::json!({
                "dag_name": dag.name,
                "data_nodes": dag.data_nodes.len(),
                "module_nodes": dag.module_nodes.len(),
                "outputs": dag.outputs,
                "warnings": output.warnings.iter().map(|w| w.message.clone()).collect::<Vec<_>>(),
                "synthetic_modules": output.synthetic_modules.len(),
                "source_hash": output.pipeline.source_hash,
                "structural_hash": output.pipeline.structural_hash,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        Err(errors) => {
            print_errors(&errors);
            Err("compilation failed".into())
        }
    }
}

fn print_errors(errors: &[flowc_compile::CompileError]) {
    for error in errors {
        eprintln!("{}", error);
        if !error.suggestions.is_empty() {
            eprintln!("  did you mean: {}", error.suggestions.join(", "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_source(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("creates temp file");
        file.write_all(contents.as_bytes()).expect("writes source");
        file
    }

    #[test]
    fn check_accepts_a_well_typed_pipeline() {
        let file = write_source("in x: Int\nout x");
        assert!(check(&file.path().to_path_buf()).is_ok());
    }

    #[test]
    fn check_rejects_an_undefined_variable() {
        let file = write_source("in customer: String\nout custmer");
        assert!(check(&file.path().to_path_buf()).is_err());
    }

    #[test]
    fn compile_builds_a_dag_for_a_well_typed_pipeline() {
        let file = write_source("a = 1\nout a");
        assert!(compile(&file.path().to_path_buf(), "test").is_ok());
    }

    #[test]
    fn compile_reports_a_missing_file() {
        let missing = std::path::PathBuf::from("/nonexistent/does-not-exist.flow");
        assert!(compile(&missing, "test").is_err());
    }
}
