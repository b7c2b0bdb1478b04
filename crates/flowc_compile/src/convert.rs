//! Lifts each phase's local error type into the unified [`crate::error::CompileError`]
//! taxonomy (`spec.md` §7), attaching suggestions from `flowc-suggest` (§4.9).
//!
//! This conversion lives here rather than as `From` impls on the phase error
//! types themselves because a useful suggestion needs context the error
//! alone doesn't carry — the set of declared variable names, the registry's
//! namespaces, the source text a span resolves against.

use crate::error::{CodeSpan, CompileError, ErrorCategory};
use flowc_base::{SpannedError, Span};
use flowc_check::CheckError;
use flowc_dag::DagError;
use flowc_ir::IrError;
use flowc_parser::{Declaration, Pipeline};
use flowc_registry::FunctionRegistry;

fn build(category: ErrorCategory, message: String, span: Span, source: &str, suggestions: Vec<String>) -> CompileError {
    CompileError {
        category,
        message,
        span: Some(CodeSpan::resolve(span, source)),
        code_context: crate::error::line_context(source, span),
        suggestions,
    }
}

pub fn parser_errors(errors: Vec<SpannedError>, source: &str) -> Vec<CompileError> {
    errors
        .into_iter()
        .map(|e| build(ErrorCategory::Syntax, e.message.clone(), e.span, source, Vec::new()))
        .collect()
}

/// Every `in`/assignment name declared anywhere in the pipeline, in source
/// order — the candidate pool for "did you mean" on an undefined variable.
fn declared_variable_names(pipeline: &Pipeline) -> Vec<String> {
    pipeline
        .declarations
        .iter()
        .filter_map(|d| match d {
            Declaration::InputDecl { name, .. } | Declaration::Assignment { name, .. } => Some(name.clone()),
            _ => None,
        })
        .collect()
}

/// Every `type` name declared anywhere in the pipeline — the user-defined
/// half of the candidate pool for an undefined type name.
fn declared_type_names(pipeline: &Pipeline) -> Vec<String> {
    pipeline
        .declarations
        .iter()
        .filter_map(|d| match d {
            Declaration::TypeDef { name, .. } => Some(name.clone()),
            _ => None,
        })
        .collect()
}

const BUILTIN_TYPE_NAMES: [&str; 4] = ["String", "Int", "Float", "Boolean"];

pub fn check_errors(errors: Vec<CheckError>, source: &str, pipeline: &Pipeline, registry: &FunctionRegistry) -> Vec<CompileError> {
    let variable_names = declared_variable_names(pipeline);
    let type_names = declared_type_names(pipeline);
    let function_names: Vec<String> = {
        let mut names: Vec<String> = registry.all().into_iter().map(|s| s.name).collect();
        names.sort();
        names.dedup();
        names
    };
    let namespaces = registry.namespaces();

    errors
        .into_iter()
        .map(|e| {
            let span = e.span();
            match &e {
                CheckError::UndefinedVariable { name, .. } => {
                    let suggestions = flowc_suggest::undefined_variable(name, &variable_names);
                    build(ErrorCategory::Reference, e.to_string(), span, source, suggestions)
                }
                CheckError::UndefinedFunction { name, .. } => {
                    let suggestions = flowc_suggest::undefined_function(name, &function_names, &namespaces);
                    build(ErrorCategory::Reference, e.to_string(), span, source, suggestions)
                }
                CheckError::UndefinedType { name, .. } => {
                    let suggestions = flowc_suggest::undefined_type(name, &BUILTIN_TYPE_NAMES.iter().map(|s| s.to_string()).collect::<Vec<_>>(), &type_names);
                    build(ErrorCategory::Reference, e.to_string(), span, source, suggestions)
                }
                CheckError::UndefinedNamespace { name, .. } => {
                    let suggestions = flowc_suggest::undefined_namespace(name, &namespaces);
                    build(ErrorCategory::Reference, e.to_string(), span, source, suggestions)
                }
                CheckError::AmbiguousFunction { candidates, .. } => {
                    let suggestions = flowc_suggest::ambiguous_function(candidates);
                    build(ErrorCategory::Reference, e.to_string(), span, source, suggestions)
                }
                CheckError::TypeMismatch { expected, actual, .. } => {
                    let suggestions = flowc_suggest::type_mismatch(expected, actual);
                    build(ErrorCategory::Type, e.to_string(), span, source, suggestions)
                }
                CheckError::InvalidProjection { field, available, .. } | CheckError::InvalidFieldAccess { field, available, .. } => {
                    let suggestions = if available.is_empty() { Vec::new() } else { flowc_suggest::invalid_field(field, available) };
                    build(ErrorCategory::Type, e.to_string(), span, source, suggestions)
                }
                CheckError::IncompatibleMerge { .. } | CheckError::ArityMismatch { .. } | CheckError::InvalidLambdaContext { .. } => {
                    build(ErrorCategory::Type, e.to_string(), span, source, Vec::new())
                }
                CheckError::UnknownHigherOrderFunction { .. } => build(ErrorCategory::Type, e.to_string(), span, source, Vec::new()),
            }
        })
        .collect()
}

/// IR/DAG-phase errors don't carry a span — they indicate an internal
/// inconsistency rather than a user mistake (`spec.md` §7), so there's no
/// source position to resolve and no suggestion to attach.
fn unspanned(category: ErrorCategory, message: String) -> CompileError {
    CompileError { category, message, span: None, code_context: None, suggestions: Vec::new() }
}

pub fn ir_error(e: IrError) -> CompileError {
    unspanned(ErrorCategory::Runtime, e.to_string())
}

pub fn dag_error(e: DagError) -> CompileError {
    unspanned(ErrorCategory::Runtime, e.to_string())
}
