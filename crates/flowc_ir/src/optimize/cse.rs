//! Common-subexpression elimination (`spec.md` §4.6): nodes with an
//! identical canonical content-key (variant tag + producers + payload) are
//! merged, redirecting every reference from the later occurrence to the
//! first.

use crate::graph::IRPipeline;
use crate::node::{IRNode, IRPattern, IRStringPart, NodeId};
use std::collections::HashMap;

pub fn eliminate_common_subexpressions(ir: &IRPipeline) -> (IRPipeline, bool) {
    let order = ir.topological_order();
    let mut rebuilt: HashMap<NodeId, IRNode> = HashMap::new();
    let mut replace: HashMap<NodeId, NodeId> = HashMap::new();
    let mut seen: HashMap<String, NodeId> = HashMap::new();
    let mut changed = false;

    for id in order {
        let node = &ir.nodes[&id];
        let remapped = node.map_producers(|p| resolve(p, &replace));
        let key = content_key(&remapped);

        match seen.get(&key) {
            Some(&existing) => {
                replace.insert(id, existing);
                changed = true;
            }
            None => {
                seen.insert(key, id);
                rebuilt.insert(id, remapped);
            }
        }
    }

    let inputs = ir.inputs.iter().map(|id| resolve(*id, &replace)).collect();
    let bindings = ir.bindings.iter().map(|(n, id)| (n.clone(), resolve(*id, &replace))).collect();

    (
        IRPipeline { nodes: rebuilt, inputs, outputs: ir.outputs.clone(), bindings },
        changed,
    )
}

fn resolve(id: NodeId, replace: &HashMap<NodeId, NodeId>) -> NodeId {
    let mut current = id;
    while let Some(&next) = replace.get(&current) {
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// `Input` nodes key on their name alone so two references to the same
/// binding always collide; every other variant's key embeds its already
/// *resolved* producer IDs, so a node is only ever merged with another one
/// that computes the same thing from the same upstream values.
///
/// Operand order is semantically significant for most variants (field
/// access order, branch order, …) and is kept as-is; only the genuinely
/// commutative boolean/equality operators sort their two operands so
/// `a == b` and `b == a` dedupe together.
fn content_key(node: &IRNode) -> String {
    match node {
        IRNode::Input { name, .. } => format!("Input|{}", name),
        IRNode::Literal { value, .. } => format!("Literal|{:?}", value),
        IRNode::ModuleCall { module_name, function_name, param_names, args, options, .. } => {
            format!(
                "ModuleCall|{}|{}|{:?}|{}|{}",
                module_name,
                function_name,
                param_names,
                ids(args),
                options_key(options),
            )
        }
        IRNode::Merge { left, right, .. } => format!("Merge|{}|{}", left, right),
        IRNode::Projection { source, fields, .. } => format!("Projection|{}|{:?}", source, fields),
        IRNode::FieldAccess { source, field, .. } => format!("FieldAccess|{}|{}", source, field),
        IRNode::Conditional { cond, then_branch, else_branch, .. } => {
            format!("Conditional|{}|{}|{}", cond, then_branch, else_branch)
        }
        IRNode::BoolBinary { op, left, right, .. } => format!("BoolBinary|{:?}|{}", op, sorted_pair(*left, *right)),
        IRNode::Not { operand, .. } => format!("Not|{}", operand),
        IRNode::Guard { expr, cond, .. } => format!("Guard|{}|{}", expr, cond),
        IRNode::Coalesce { left, right, .. } => format!("Coalesce|{}|{}", left, right),
        IRNode::Equality { left, right, .. } => format!("Equality|{}", sorted_pair(*left, *right)),
        IRNode::Branch { cases, otherwise, .. } => {
            let cases: Vec<String> = cases.iter().map(|(c, b)| format!("{}:{}", c, b)).collect();
            format!("Branch|{}|{}", cases.join(","), otherwise)
        }
        IRNode::StringInterpolation { parts, .. } => {
            let parts: Vec<String> = parts
                .iter()
                .map(|p| match p {
                    IRStringPart::Text(t) => format!("T:{}", t),
                    IRStringPart::Expr(id) => format!("E:{}", id),
                })
                .collect();
            format!("StringInterpolation|{}", parts.join("|"))
        }
        IRNode::ListLiteral { items, .. } => format!("ListLiteral|{}", ids(items)),
        IRNode::RecordLiteral { fields, .. } => {
            let fields: Vec<String> = fields.iter().map(|(n, id)| format!("{}={}", n, id)).collect();
            format!("RecordLiteral|{}", fields.join(","))
        }
        IRNode::Match { scrutinee, cases, .. } => {
            let cases: Vec<String> = cases.iter().map(|c| format!("{}:{}", pattern_key(&c.pattern), c.body)).collect();
            format!("Match|{}|{}", scrutinee, cases.join(","))
        }
        // A lambda sub-graph closes over captures by identity; two
        // higher-order calls are the same subexpression only if they share
        // a source and every captured outer value, so the sub-graph's own
        // contents don't need folding into the key.
        IRNode::HigherOrder { operation, source, lambda, .. } => {
            let captures: Vec<String> = lambda.captures.iter().map(|(n, id)| format!("{}={}", n, id)).collect();
            format!("HigherOrder|{}|{}|{}", operation, source, captures.join(","))
        }
    }
}

fn ids(xs: &[NodeId]) -> String {
    xs.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(",")
}

fn sorted_pair(a: NodeId, b: NodeId) -> String {
    let mut pair = [a.to_string(), b.to_string()];
    pair.sort();
    pair.join(",")
}

fn pattern_key(pattern: &IRPattern) -> String {
    match pattern {
        IRPattern::Record { fields } => format!("Record:{:?}", fields),
        IRPattern::TypeTest { type_name, .. } => format!("TypeTest:{}", type_name),
        IRPattern::Wildcard => "Wildcard".to_string(),
    }
}

fn options_key(options: &crate::options::IRModuleCallOptions) -> String {
    format!("{:?}", options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowc_parser::Literal;
    use flowc_types::SemanticType;
    use std::collections::HashMap as Map;

    #[test]
    fn merges_two_identical_literal_nodes() {
        let a = NodeId::new();
        let b = NodeId::new();
        let mut nodes = Map::new();
        nodes.insert(a, IRNode::Literal { value: Literal::Int(7), ty: SemanticType::SInt });
        nodes.insert(b, IRNode::Literal { value: Literal::Int(7), ty: SemanticType::SInt });
        let mut bindings = Map::new();
        bindings.insert("x".to_string(), a);
        bindings.insert("y".to_string(), b);
        let ir = IRPipeline { nodes, inputs: vec![], outputs: vec!["x".to_string(), "y".to_string()], bindings };

        let (deduped, changed) = eliminate_common_subexpressions(&ir);
        assert!(changed);
        assert_eq!(deduped.nodes.len(), 1);
        assert_eq!(deduped.bindings["x"], deduped.bindings["y"]);
    }

    #[test]
    fn distinct_field_names_do_not_collide() {
        let source = NodeId::new();
        let a = NodeId::new();
        let b = NodeId::new();
        let mut nodes = Map::new();
        nodes.insert(source, IRNode::Input { name: "s".to_string(), ty: SemanticType::SInt });
        nodes.insert(a, IRNode::FieldAccess { source, field: "left".to_string(), ty: SemanticType::SInt });
        nodes.insert(b, IRNode::FieldAccess { source, field: "right".to_string(), ty: SemanticType::SInt });
        let mut bindings = Map::new();
        bindings.insert("a".to_string(), a);
        bindings.insert("b".to_string(), b);
        let ir = IRPipeline { nodes, inputs: vec![source], outputs: vec!["a".to_string(), "b".to_string()], bindings };

        let (deduped, _) = eliminate_common_subexpressions(&ir);
        assert_ne!(deduped.bindings["a"], deduped.bindings["b"]);
    }
}
