//! Constant folding (`spec.md` §4.6): when every input to a node is a
//! literal, evaluate the operation at compile time and replace it.
//!
//! `Coalesce`, `Conditional`, and `Branch` don't necessarily reduce to a
//! fresh literal (their selected branch may itself be a non-literal
//! sub-graph), so those fold by *aliasing* the node to whichever producer
//! it statically resolves to rather than by synthesizing a new node.

use crate::graph::IRPipeline;
use crate::node::{IRNode, NodeId};
use flowc_parser::{BoolOp, Literal};
use std::collections::HashMap;

enum Fold {
    Literal(Literal),
    Alias(NodeId),
}

pub fn fold_constants(ir: &IRPipeline) -> (IRPipeline, bool) {
    let order = ir.topological_order();
    let mut rebuilt: HashMap<NodeId, IRNode> = HashMap::new();
    let mut replace: HashMap<NodeId, NodeId> = HashMap::new();
    let mut changed = false;

    for id in order {
        let node = &ir.nodes[&id];
        let remapped = remap_producers(node, &replace);

        match try_fold(&remapped, &rebuilt) {
            Some(Fold::Literal(value)) => {
                let ty = remapped.ty().clone();
                rebuilt.insert(id, IRNode::Literal { value, ty });
                changed = true;
            }
            Some(Fold::Alias(target)) => {
                replace.insert(id, resolve(target, &replace));
                changed = true;
            }
            None => {
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

fn literal_of<'a>(id: NodeId, rebuilt: &'a HashMap<NodeId, IRNode>) -> Option<&'a Literal> {
    match rebuilt.get(&id) {
        Some(IRNode::Literal { value, .. }) => Some(value),
        _ => None,
    }
}

fn numeric(lit: &Literal) -> Option<f64> {
    match lit {
        Literal::Int(i) => Some(*i as f64),
        Literal::Float(f) => Some(*f),
        _ => None,
    }
}

fn is_int(lit: &Literal) -> bool {
    matches!(lit, Literal::Int(_))
}

/// A fixed vocabulary of built-in arithmetic/comparison functions folded
/// by name regardless of which module implements them, matching the
/// constant-folding scenario in `spec.md` §8 Scenario B.
fn fold_builtin_call(function_name: &str, args: &[&Literal]) -> Option<Literal> {
    let name = function_name.to_ascii_lowercase();
    match (name.as_str(), args) {
        ("add", [a, b]) => {
            let (x, y) = (numeric(a)?, numeric(b)?);
            Some(if is_int(a) && is_int(b) { Literal::Int((x + y) as i64) } else { Literal::Float(x + y) })
        }
        ("sub" | "subtract", [a, b]) => {
            let (x, y) = (numeric(a)?, numeric(b)?);
            Some(if is_int(a) && is_int(b) { Literal::Int((x - y) as i64) } else { Literal::Float(x - y) })
        }
        ("mul" | "multiply", [a, b]) => {
            let (x, y) = (numeric(a)?, numeric(b)?);
            Some(if is_int(a) && is_int(b) { Literal::Int((x * y) as i64) } else { Literal::Float(x * y) })
        }
        ("div" | "divide", [a, b]) => {
            let (x, y) = (numeric(a)?, numeric(b)?);
            if y == 0.0 {
                None
            } else {
                Some(if is_int(a) && is_int(b) { Literal::Int((x / y) as i64) } else { Literal::Float(x / y) })
            }
        }
        ("lt", [a, b]) => Some(Literal::Bool(numeric(a)? < numeric(b)?)),
        ("gt", [a, b]) => Some(Literal::Bool(numeric(a)? > numeric(b)?)),
        ("lte", [a, b]) => Some(Literal::Bool(numeric(a)? <= numeric(b)?)),
        ("gte", [a, b]) => Some(Literal::Bool(numeric(a)? >= numeric(b)?)),
        ("not", [a]) => match a {
            Literal::Bool(b) => Some(Literal::Bool(!b)),
            _ => None,
        },
        _ => None,
    }
}

fn try_fold(node: &IRNode, rebuilt: &HashMap<NodeId, IRNode>) -> Option<Fold> {
    match node {
        IRNode::ModuleCall { function_name, args, .. } => {
            let lits: Option<Vec<&Literal>> = args.iter().map(|a| literal_of(*a, rebuilt)).collect();
            fold_builtin_call(function_name, &lits?).map(Fold::Literal)
        }
        IRNode::BoolBinary { op, left, right, .. } => {
            let (Literal::Bool(l), Literal::Bool(r)) = (literal_of(*left, rebuilt)?, literal_of(*right, rebuilt)?) else {
                return None;
            };
            let result = match op {
                BoolOp::And => *l && *r,
                BoolOp::Or => *l || *r,
            };
            Some(Fold::Literal(Literal::Bool(result)))
        }
        IRNode::Not { operand, .. } => match literal_of(*operand, rebuilt)? {
            Literal::Bool(b) => Some(Fold::Literal(Literal::Bool(!b))),
            _ => None,
        },
        IRNode::Equality { left, right, .. } => {
            let l = literal_of(*left, rebuilt)?;
            let r = literal_of(*right, rebuilt)?;
            Some(Fold::Literal(Literal::Bool(l == r)))
        }
        // `Literal` can never represent an absent/null value, so a literal
        // left operand is always the coalesce's answer.
        IRNode::Coalesce { left, .. } if literal_of(*left, rebuilt).is_some() => Some(Fold::Alias(*left)),
        IRNode::Conditional { cond, then_branch, else_branch, .. } => match literal_of(*cond, rebuilt)? {
            Literal::Bool(true) => Some(Fold::Alias(*then_branch)),
            Literal::Bool(false) => Some(Fold::Alias(*else_branch)),
            _ => None,
        },
        IRNode::Branch { cases, otherwise, .. } => {
            for (cond, body) in cases {
                match literal_of(*cond, rebuilt)? {
                    Literal::Bool(true) => return Some(Fold::Alias(*body)),
                    Literal::Bool(false) => continue,
                    _ => return None,
                }
            }
            Some(Fold::Alias(*otherwise))
        }
        _ => None,
    }
}

fn remap_producers(node: &IRNode, replace: &HashMap<NodeId, NodeId>) -> IRNode {
    node.map_producers(|id| resolve(id, replace))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowc_types::SemanticType;
    use std::collections::HashMap as Map;

    #[test]
    fn folds_add_of_two_literals() {
        let a = NodeId::new();
        let b = NodeId::new();
        let c = NodeId::new();
        let mut nodes = Map::new();
        nodes.insert(a, IRNode::Literal { value: Literal::Int(2), ty: SemanticType::SInt });
        nodes.insert(b, IRNode::Literal { value: Literal::Int(3), ty: SemanticType::SInt });
        nodes.insert(
            c,
            IRNode::ModuleCall {
                module_name: "Add".into(),
                function_name: "add".into(),
                param_names: vec!["a".into(), "b".into()],
                args: vec![a, b],
                options: Default::default(),
                ty: SemanticType::SInt,
            },
        );
        let mut bindings = Map::new();
        bindings.insert("c".to_string(), c);
        let ir = IRPipeline { nodes, inputs: vec![], outputs: vec!["c".to_string()], bindings };

        let (folded, changed) = fold_constants(&ir);
        assert!(changed);
        let c_resolved = folded.bindings["c"];
        match &folded.nodes[&c_resolved] {
            IRNode::Literal { value: Literal::Int(5), .. } => {}
            other => panic!("expected Literal(5), got {:?}", other),
        }
    }
}
