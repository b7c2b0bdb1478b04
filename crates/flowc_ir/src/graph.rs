//! The IR graph itself (`spec.md` §3, invariants a–f) and the topological
//! analyses the optimizer and DAG builder both need.

use crate::node::{IRNode, NodeId};
use std::collections::{HashMap, HashSet, VecDeque};

#[derive(Debug, Clone)]
pub struct IRPipeline {
    pub nodes: HashMap<NodeId, IRNode>,
    pub inputs: Vec<NodeId>,
    pub outputs: Vec<String>,
    pub bindings: HashMap<String, NodeId>,
}

impl IRPipeline {
    /// Kahn-style traversal over the producer-dependency edges: a node is
    /// emitted once every node it depends on has been emitted.
    pub fn topological_order(&self) -> Vec<NodeId> {
        let mut in_degree: HashMap<NodeId, usize> = HashMap::with_capacity(self.nodes.len());
        let mut dependents: HashMap<NodeId, Vec<NodeId>> = HashMap::new();

        for (&id, node) in &self.nodes {
            in_degree.entry(id).or_insert(0);
            for producer in node.producers() {
                *in_degree.entry(id).or_insert(0) += 1;
                dependents.entry(producer).or_default().push(id);
            }
        }

        let mut ready: VecDeque<NodeId> = in_degree
            .iter()
            .filter(|(_, &deg)| deg == 0)
            .map(|(&id, _)| id)
            .collect();
        // Deterministic-ish ordering within a layer for readability; node
        // identity itself need not be deterministic (`spec.md` §5).
        let mut ordered_ready: Vec<NodeId> = ready.drain(..).collect();
        ordered_ready.sort_by_key(|id| id.0);
        let mut queue: VecDeque<NodeId> = ordered_ready.into();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(id) = queue.pop_front() {
            order.push(id);
            if let Some(deps) = dependents.get(&id) {
                let mut newly_ready = Vec::new();
                for &dep in deps {
                    let deg = in_degree.get_mut(&dep).expect("dependent must have an in-degree entry");
                    *deg -= 1;
                    if *deg == 0 {
                        newly_ready.push(dep);
                    }
                }
                newly_ready.sort_by_key(|id| id.0);
                for id in newly_ready {
                    queue.push_back(id);
                }
            }
        }
        order
    }

    /// Partitions nodes into minimum-depth parallel layers: the unique
    /// earliest-possible schedule (`spec.md` §4.5, invariant e).
    pub fn topological_layers(&self) -> Vec<Vec<NodeId>> {
        let mut remaining: HashSet<NodeId> = self.nodes.keys().copied().collect();
        let mut layers = Vec::new();

        while !remaining.is_empty() {
            let mut layer: Vec<NodeId> = remaining
                .iter()
                .filter(|&&id| {
                    self.nodes[&id]
                        .producers()
                        .iter()
                        .all(|p| !remaining.contains(p))
                })
                .copied()
                .collect();
            if layer.is_empty() {
                // A cycle would stall progress; invariant (a) rules this out
                // for well-formed IR, but break rather than loop forever.
                break;
            }
            layer.sort_by_key(|id| id.0);
            for id in &layer {
                remaining.remove(id);
            }
            layers.push(layer);
        }
        layers
    }

    pub fn critical_path_length(&self) -> usize {
        self.topological_layers().len()
    }

    pub fn max_parallelism(&self) -> usize {
        self.topological_layers().iter().map(Vec::len).max().unwrap_or(0)
    }
}
