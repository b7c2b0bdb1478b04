//! `CompilationOutput`/`PipelineImage` (`spec.md` §6, SPEC_FULL.md §2):
//! what a successful compile returns to collaborators.

use crate::hashing::{source_hash, structural_hash, syntactic_hash};
use crate::warning::CompileWarning;
use flowc_dag::{DagSpec, ModuleId, ModuleNodeSpec};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// The compiled artifact: the DAG shape plus its per-module options table
/// and three content hashes.
#[derive(Debug, Clone)]
pub struct PipelineImage {
    pub dag: DagSpec,
    pub structural_hash: String,
    pub syntactic_hash: String,
    pub source_hash: String,
    /// Milliseconds since the Unix epoch, captured once at the end of the
    /// DAG-build phase.
    pub compiled_at: u64,
}

impl PipelineImage {
    pub fn build(dag: DagSpec, source: &str) -> Self {
        let structural = structural_hash(&dag);
        Self {
            structural_hash: structural,
            syntactic_hash: syntactic_hash(source),
            source_hash: source_hash(source),
            compiled_at: now_millis(),
            dag,
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
}

#[derive(Debug, Clone)]
pub struct CompilationOutput {
    pub pipeline: PipelineImage,
    pub warnings: Vec<CompileWarning>,
    /// Branch (and only branch — see `DESIGN.md`) synthetic modules the
    /// runtime must supply an implementation for.
    pub synthetic_modules: HashMap<ModuleId, ModuleNodeSpec>,
}
