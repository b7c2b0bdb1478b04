//! The three content hashes carried on a [`crate::image::PipelineImage`]
//! (SPEC_FULL.md §2): `source_hash` over raw bytes, `syntactic_hash` over a
//! comment/whitespace-normalized token stream, `structural_hash` over the
//! DAG's shape with node identity erased.

use flowc_cache::hash_bytes;
use flowc_dag::{DagSpec, InlineTransform};
use flowc_parser::Lexer;
use flowc_registry::FunctionRegistry;
use std::collections::HashMap;

pub fn source_hash(source: &str) -> String {
    hash_bytes(source.as_bytes())
}

/// Content hash over the registry's signatures, sorted by qualified name so
/// registration order never changes the hash — the cache key's second
/// invalidation input alongside `source_hash` (`spec.md` §4.10).
pub fn registry_hash(registry: &FunctionRegistry) -> String {
    let mut sigs = registry.all();
    sigs.sort_by_key(|s| s.qualified_name());
    let joined = sigs
        .iter()
        .map(|s| {
            let params: Vec<String> = s.params.iter().map(|(n, t)| format!("{}:{}", n, t)).collect();
            format!("{}({})->{}", s.qualified_name(), params.join(","), s.returns)
        })
        .collect::<Vec<_>>()
        .join(";");
    hash_bytes(joined.as_bytes())
}

/// Re-lexes `source` and joins the resulting tokens' debug representation
/// with single spaces, so reformatting (different whitespace, different
/// comments) never changes the hash.
pub fn syntactic_hash(source: &str) -> String {
    let tokens = Lexer::new(source).tokenize().unwrap_or_default();
    let joined = tokens.iter().map(|t| format!("{:?}", t.kind)).collect::<Vec<_>>().join(" ");
    hash_bytes(joined.as_bytes())
}

/// A canonical JSON value for `dag`, with every `DataId`/`ModuleId`
/// replaced by its position in a topological walk — two structurally
/// identical DAGs built with different random UUIDs must hash the same
/// (`spec.md` §5 "Ordering guarantees").
///
/// Ties within a topological layer are broken by each node's own
/// deterministic `name`/transform-kind rather than its UUID; a DAG with two
/// indistinguishable sibling nodes (same name, same transform, same
/// dependencies) is a degenerate case this doesn't fully canonicalize —
/// noted as a known simplification in `DESIGN.md`.
pub fn structural_hash(dag: &DagSpec) -> String {
    let order = canonical_order(dag);
    let doc = serde_json::json!({
        "data": order.data.iter().map(|id| data_node_json(dag, *id, &order.data_index)).collect::<Vec<_>>(),
        "modules": order.modules.iter().map(|id| module_node_json(dag, *id, &order.data_index)).collect::<Vec<_>>(),
        "in_edges": sorted_edge_strings(dag.in_edges.iter().map(|(d, m)| (order.data_index[d], order.module_index[m]))),
        "out_edges": sorted_edge_strings(dag.out_edges.iter().map(|(m, d)| (order.module_index[m], order.data_index[d]))),
        "outputs": dag.outputs,
        "output_bindings": {
            let mut entries: Vec<(String, usize)> = dag.output_bindings.iter().map(|(name, id)| (name.clone(), order.data_index[id])).collect();
            entries.sort();
            entries
        },
    });
    hash_bytes(doc.to_string().as_bytes())
}

fn sorted_edge_strings(edges: impl Iterator<Item = (usize, usize)>) -> Vec<String> {
    let mut strings: Vec<String> = edges.map(|(a, b)| format!("{}:{}", a, b)).collect();
    strings.sort();
    strings
}

struct CanonicalOrder {
    data: Vec<flowc_dag::DataId>,
    modules: Vec<flowc_dag::ModuleId>,
    data_index: HashMap<flowc_dag::DataId, usize>,
    module_index: HashMap<flowc_dag::ModuleId, usize>,
}

/// Kahn-style topological walk over the combined data/module graph, ties
/// broken by `(kind tag, data node name)` rather than node identity.
fn canonical_order(dag: &DagSpec) -> CanonicalOrder {
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    enum Ref {
        Data(flowc_dag::DataId),
        Module(flowc_dag::ModuleId),
    }

    let mut deps: HashMap<Ref, Vec<Ref>> = HashMap::new();
    let mut dependents: HashMap<Ref, Vec<Ref>> = HashMap::new();

    for id in dag.data_nodes.keys() {
        deps.entry(Ref::Data(*id)).or_default();
    }
    for id in dag.module_nodes.keys() {
        deps.entry(Ref::Module(*id)).or_default();
    }

    for (data_id, spec) in &dag.data_nodes {
        for producer in spec.transform_inputs.values() {
            deps.get_mut(&Ref::Data(*data_id)).unwrap().push(Ref::Data(*producer));
        }
    }
    for (data_id, module_id) in &dag.in_edges {
        deps.get_mut(&Ref::Module(*module_id)).unwrap().push(Ref::Data(*data_id));
    }
    for (module_id, data_id) in &dag.out_edges {
        deps.get_mut(&Ref::Data(*data_id)).unwrap().push(Ref::Module(*module_id));
    }
    for (node, its_deps) in &deps {
        for dep in its_deps {
            dependents.entry(*dep).or_default().push(*node);
        }
    }

    let sort_key = |r: &Ref| -> (u8, String) {
        match r {
            Ref::Data(id) => (0, dag.data_nodes[id].name.clone()),
            Ref::Module(id) => (1, dag.module_nodes[id].metadata.name.clone()),
        }
    };

    let mut in_degree: HashMap<Ref, usize> = deps.iter().map(|(k, v)| (*k, v.len())).collect();
    let mut ready: Vec<Ref> = in_degree.iter().filter(|(_, &d)| d == 0).map(|(k, _)| *k).collect();
    ready.sort_by_key(&sort_key);

    let mut data = Vec::new();
    let mut modules = Vec::new();

    while !ready.is_empty() {
        let next: Vec<Ref> = std::mem::take(&mut ready);
        for node in next {
            match node {
                Ref::Data(id) => data.push(id),
                Ref::Module(id) => modules.push(id),
            }
            if let Some(dependent_nodes) = dependents.get(&node) {
                for &dependent in dependent_nodes {
                    let degree = in_degree.get_mut(&dependent).unwrap();
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push(dependent);
                    }
                }
            }
        }
        ready.sort_by_key(&sort_key);
    }

    let data_index = data.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    let module_index = modules.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    CanonicalOrder { data, modules, data_index, module_index }
}

fn data_node_json(dag: &DagSpec, id: flowc_dag::DataId, data_index: &HashMap<flowc_dag::DataId, usize>) -> serde_json::Value {
    let node = &dag.data_nodes[&id];
    let mut inputs: Vec<(String, usize)> = node.transform_inputs.iter().map(|(k, v)| (k.clone(), data_index[v])).collect();
    inputs.sort();
    serde_json::json!({
        "name": node.name,
        "ty": node.ty.to_string(),
        "transform": node.inline_transform.as_ref().map(transform_tag),
        "inputs": inputs,
    })
}

fn module_node_json(dag: &DagSpec, id: flowc_dag::ModuleId, data_index: &HashMap<flowc_dag::DataId, usize>) -> serde_json::Value {
    let node = &dag.module_nodes[&id];
    let mut consumes: Vec<(String, String)> = node.consumes.iter().map(|(k, v)| (k.clone(), v.to_string())).collect();
    consumes.sort();
    let mut produces: Vec<(String, String)> = node.produces.iter().map(|(k, v)| (k.clone(), v.to_string())).collect();
    produces.sort();
    let _ = data_index;
    serde_json::json!({
        "name": node.metadata.name,
        "consumes": consumes,
        "produces": produces,
    })
}

/// A short, stable tag for an inline transform's kind plus its literal
/// payload where one exists — full lambda bodies are deliberately excluded
/// since their internal node IDs are not stably orderable here.
fn transform_tag(transform: &InlineTransform) -> String {
    match transform {
        InlineTransform::Merge { .. } => "merge".to_string(),
        InlineTransform::Project { fields, .. } => format!("project:{}", fields.join(",")),
        InlineTransform::FieldAccess { field, .. } => format!("field:{}", field),
        InlineTransform::Conditional => "conditional".to_string(),
        InlineTransform::Literal(lit) => format!("literal:{:?}", lit),
        InlineTransform::And => "and".to_string(),
        InlineTransform::Or => "or".to_string(),
        InlineTransform::Not => "not".to_string(),
        InlineTransform::Guard => "guard".to_string(),
        InlineTransform::Coalesce => "coalesce".to_string(),
        InlineTransform::Equality => "equality".to_string(),
        InlineTransform::StringInterpolation { text_parts, expr_parts } => format!("string_interp:{}:{}", text_parts, expr_parts),
        InlineTransform::ListLiteral { size } => format!("list:{}", size),
        InlineTransform::RecordBuild { field_names } => format!("record:{}", field_names.join(",")),
        InlineTransform::HigherOrder { op, .. } => format!("higher_order:{:?}", op),
        InlineTransform::Match { arms, .. } => format!("match:{}", arms.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_hash_is_deterministic() {
        assert_eq!(source_hash("a = 1"), source_hash("a = 1"));
        assert_ne!(source_hash("a = 1"), source_hash("a = 2"));
    }

    #[test]
    fn syntactic_hash_ignores_comments_and_whitespace() {
        let a = "a = 1\nout a";
        let b = "a   =   1  # comment\nout a";
        assert_eq!(syntactic_hash(a), syntactic_hash(b));
    }
}
