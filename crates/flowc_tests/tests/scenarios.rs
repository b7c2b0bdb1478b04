//! End-to-end scenarios (`spec.md` §8 A–F), each driven through the public
//! `flowc_compile::Compiler` facade rather than any single phase crate.
//! Scenarios A, B, C and F already have focused coverage alongside the
//! facade itself (`flowc_compile::compile` unit tests); this file covers
//! D and E, which need the parser, checker, IR builder and DAG builder
//! working together, plus a couple of cross-cutting checks the facade
//! tests don't reach.

use flowc_compile::Compiler;
use flowc_dag::InlineTransform;
use flowc_types::SemanticType;

/// Scenario D: record merge + projection. `full = user + extra` merges two
/// record types (right-biased on overlapping fields, `spec.md` §3), and
/// `picked = full[id, email]` projects a subset of the merged fields.
#[test]
fn scenario_d_record_merge_and_projection() {
    let compiler = Compiler::empty();
    let source = "in user: { id: Int, name: String }\nin extra: { email: String }\nfull = user + extra\npicked = full[id, email]\nout picked";
    let output = compiler.compile(source, "merge_project").expect("compiles");

    let picked_id = *output.pipeline.dag.output_bindings.get("picked").expect("picked is bound");
    let picked = &output.pipeline.dag.data_nodes[&picked_id];
    assert_eq!(picked.ty, SemanticType::record(vec![("id".to_string(), SemanticType::SInt), ("email".to_string(), SemanticType::SString)]));
    assert!(matches!(picked.inline_transform, Some(InlineTransform::Project { .. })), "picked should be a Project transform, got {:?}", picked.inline_transform);

    // The projection's single input is the merge itself.
    let merge_id = *picked.transform_inputs.values().next().expect("project has one input");
    let merge_node = &output.pipeline.dag.data_nodes[&merge_id];
    assert!(matches!(merge_node.inline_transform, Some(InlineTransform::Merge { .. })), "full should be a Merge transform, got {:?}", merge_node.inline_transform);
    assert_eq!(merge_node.transform_inputs.len(), 2, "merge takes both user and extra as inputs");
}

/// Scenario E: match on a union, one record-destructuring arm and one
/// wildcard arm, compiled down to a single inline `Match` transform.
#[test]
fn scenario_e_match_on_union() {
    let compiler = Compiler::empty();
    let source = r#"
        type R = { kind: String, value: Int }
        in r: R
        x = match r {
            { kind, value } -> value;
            _ -> 0
        }
        out x
    "#;
    let output = compiler.compile(source, "match_union").expect("compiles");

    let x_id = *output.pipeline.dag.output_bindings.get("x").expect("x is bound");
    let x_node = &output.pipeline.dag.data_nodes[&x_id];
    match &x_node.inline_transform {
        Some(InlineTransform::Match { arms, .. }) => {
            assert_eq!(arms.len(), 2);
        }
        other => panic!("expected a Match transform, got {:?}", other),
    }
}

/// A compilation with both an unused binding and a literally-constant
/// guard produces both warning kinds, confirmed against real source rather
/// than synthesized IR (unlike `flowc_compile::warning`'s own unit tests).
#[test]
fn unused_variable_and_redundant_guard_warnings_surface_together() {
    let compiler = Compiler::empty();
    let source = "in x: Int\nin unused: Int\nresult = x when true\nout result";
    let output = compiler.compile(source, "warnings").expect("compiles");

    use flowc_compile::WarningKind;
    assert!(output.warnings.iter().any(|w| w.kind == WarningKind::UnusedVariable));
    assert!(output.warnings.iter().any(|w| w.kind == WarningKind::RedundantGuard));
}
