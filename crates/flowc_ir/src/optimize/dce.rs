//! Dead-code elimination (`spec.md` §4.6): keep only nodes reachable
//! backward from a declared output.

use crate::graph::IRPipeline;
use crate::node::NodeId;
use std::collections::{HashMap, HashSet, VecDeque};

pub fn eliminate(ir: &IRPipeline) -> (IRPipeline, bool) {
    let roots: Vec<NodeId> = ir.outputs.iter().filter_map(|name| ir.bindings.get(name).copied()).collect();

    let mut reachable: HashSet<NodeId> = HashSet::new();
    let mut queue: VecDeque<NodeId> = roots.into_iter().collect();
    while let Some(id) = queue.pop_front() {
        if !reachable.insert(id) {
            continue;
        }
        if let Some(node) = ir.nodes.get(&id) {
            for producer in node.producers() {
                if !reachable.contains(&producer) {
                    queue.push_back(producer);
                }
            }
        }
    }

    let changed = reachable.len() != ir.nodes.len();
    let nodes: HashMap<NodeId, _> = ir.nodes.iter().filter(|(id, _)| reachable.contains(id)).map(|(id, n)| (*id, n.clone())).collect();
    let inputs = ir.inputs.iter().copied().filter(|id| reachable.contains(id)).collect();
    let bindings = ir.bindings.iter().filter(|(_, id)| reachable.contains(id)).map(|(n, id)| (n.clone(), *id)).collect();

    (
        IRPipeline { nodes, inputs, outputs: ir.outputs.clone(), bindings },
        changed,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::IRNode;
    use flowc_parser::Literal;
    use flowc_types::SemanticType;

    #[test]
    fn drops_nodes_not_reachable_from_outputs() {
        let used = NodeId::new();
        let unused = NodeId::new();
        let mut nodes = HashMap::new();
        nodes.insert(used, IRNode::Literal { value: Literal::Int(1), ty: SemanticType::SInt });
        nodes.insert(unused, IRNode::Literal { value: Literal::Int(2), ty: SemanticType::SInt });
        let mut bindings = HashMap::new();
        bindings.insert("a".to_string(), used);
        bindings.insert("b".to_string(), unused);
        let ir = IRPipeline { nodes, inputs: Vec::new(), outputs: vec!["a".to_string()], bindings };

        let (optimized, changed) = eliminate(&ir);
        assert!(changed);
        assert_eq!(optimized.nodes.len(), 1);
        assert!(optimized.nodes.contains_key(&used));
    }
}
