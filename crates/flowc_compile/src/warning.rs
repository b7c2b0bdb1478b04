//! `CompileWarning` (`spec.md` §7, expanded per this repo's supplemental
//! decisions): collected alongside a successful output, never fatal.

use crate::error::CodeSpan;
use flowc_ir::{IRNode, IRPipeline};
use flowc_parser::{Declaration, Literal, Pipeline};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    UnusedVariable,
    DeprecatedOption,
    /// A guard whose condition the constant folder proved always-true or
    /// always-false before folding it away — surfaced because the fold
    /// pass already has this information as a side effect.
    RedundantGuard,
}

#[derive(Debug, Clone)]
pub struct CompileWarning {
    pub kind: WarningKind,
    pub message: String,
    pub span: Option<CodeSpan>,
}

/// Every node reachable backward (through producer edges, including a
/// `ModuleCall`'s `with fallback:` edge) from a declared output.
///
/// A binding referenced only as the fallback of an otherwise-dead call is
/// *not* reachable here and so is still reported unused — resolving the
/// open question in `spec.md` §9 ("whether warnings include unused
/// variables that appear only in with-fallbacks") in favor of following
/// the same reachability the optimizer's own DCE pass uses, rather than
/// special-casing fallback references as inherently "used".
fn reachable_from_outputs(ir: &IRPipeline) -> HashSet<flowc_ir::NodeId> {
    let mut reachable = HashSet::new();
    let mut stack: Vec<flowc_ir::NodeId> = ir.outputs.iter().filter_map(|name| ir.bindings.get(name)).copied().collect();
    while let Some(id) = stack.pop() {
        if reachable.insert(id) {
            if let Some(node) = ir.nodes.get(&id) {
                stack.extend(node.producers());
            }
        }
    }
    reachable
}

/// `spec.md` §7 warnings: unused `in`/assignment bindings, surfaced against
/// the *unoptimized* IR (DCE would otherwise have already erased the very
/// nodes this needs to inspect).
pub fn unused_variables(pipeline: &Pipeline, ir: &IRPipeline, source: &str) -> Vec<CompileWarning> {
    let reachable = reachable_from_outputs(ir);
    let mut warnings = Vec::new();
    for decl in &pipeline.declarations {
        let (name, span) = match decl {
            Declaration::InputDecl { name, span, .. } => (name, *span),
            Declaration::Assignment { name, span, .. } => (name, *span),
            Declaration::TypeDef { .. } | Declaration::OutputDecl { .. } | Declaration::UseDecl { .. } => continue,
        };
        let Some(&id) = ir.bindings.get(name) else { continue };
        if !reachable.contains(&id) {
            warnings.push(CompileWarning {
                kind: WarningKind::UnusedVariable,
                message: format!("variable '{}' is never used", name),
                span: Some(CodeSpan::resolve(span, source)),
            });
        }
    }
    warnings
}

/// A `Guard` node whose condition is *directly* a literal boolean in the
/// unoptimized graph — the same information `flowc_ir::optimize::fold`
/// would need to fold it, surfaced here without requiring a full constant
/// propagation pass (`SPEC_FULL.md` §2).
pub fn redundant_guards(pipeline: &Pipeline, ir: &IRPipeline, source: &str) -> Vec<CompileWarning> {
    let mut warnings = Vec::new();
    for decl in &pipeline.declarations {
        let Declaration::Assignment { name, span, .. } = decl else { continue };
        let Some(&id) = ir.bindings.get(name) else { continue };
        let Some(IRNode::Guard { cond, .. }) = ir.nodes.get(&id) else { continue };
        if let Some(IRNode::Literal { value: Literal::Bool(b), .. }) = ir.nodes.get(cond) {
            warnings.push(CompileWarning {
                kind: WarningKind::RedundantGuard,
                message: format!("guard on '{}' has a condition that is always {}", name, b),
                span: Some(CodeSpan::resolve(*span, source)),
            });
        }
    }
    warnings
}

pub fn collect(pipeline: &Pipeline, ir: &IRPipeline, source: &str) -> Vec<CompileWarning> {
    let mut warnings = unused_variables(pipeline, ir, source);
    warnings.extend(redundant_guards(pipeline, ir, source));
    warnings
}
