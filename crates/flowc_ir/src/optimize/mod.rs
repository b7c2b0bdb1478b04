//! The fixpoint optimizer driver (`spec.md` §4.6): iterated dead-code
//! elimination, constant folding, and common-subexpression elimination.

mod cse;
mod dce;
mod fold;

use crate::graph::IRPipeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizerConfig {
    pub dce: bool,
    pub constant_folding: bool,
    pub cse: bool,
    pub max_iterations: u32,
}

impl OptimizerConfig {
    pub fn none() -> Self {
        Self { dce: false, constant_folding: false, cse: false, max_iterations: 1 }
    }

    pub fn default_preset() -> Self {
        Self { dce: true, constant_folding: true, cse: true, max_iterations: 3 }
    }

    pub fn aggressive() -> Self {
        Self { dce: true, constant_folding: true, cse: true, max_iterations: 10 }
    }

    pub fn dce_only() -> Self {
        Self { dce: true, constant_folding: false, cse: false, max_iterations: 1 }
    }

    pub fn constant_folding_only() -> Self {
        Self { dce: false, constant_folding: true, cse: false, max_iterations: 3 }
    }

    pub fn cse_only() -> Self {
        Self { dce: false, constant_folding: false, cse: true, max_iterations: 1 }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::default_preset()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptimizerStats {
    pub nodes_before: usize,
    pub nodes_after: usize,
    pub nodes_eliminated: usize,
    pub iterations: u32,
}

impl OptimizerStats {
    pub fn elimination_percentage(&self) -> f64 {
        if self.nodes_before == 0 {
            0.0
        } else {
            (self.nodes_eliminated as f64 / self.nodes_before as f64) * 100.0
        }
    }
}

/// Runs the configured passes in declared order (DCE, fold, CSE),
/// repeating the whole sequence until a pass reports no change or
/// `max_iterations` is reached (`spec.md` §4.6).
pub fn optimize(ir: IRPipeline, config: &OptimizerConfig) -> (IRPipeline, OptimizerStats) {
    let nodes_before = ir.nodes.len();
    let mut current = ir;
    let mut iterations = 0;

    for i in 0..config.max_iterations {
        iterations = i + 1;
        let mut changed = false;

        if config.dce {
            let (next, pass_changed) = dce::eliminate(&current);
            current = next;
            changed |= pass_changed;
        }
        if config.constant_folding {
            let (next, pass_changed) = fold::fold_constants(&current);
            current = next;
            changed |= pass_changed;
        }
        if config.cse {
            let (next, pass_changed) = cse::eliminate_common_subexpressions(&current);
            current = next;
            changed |= pass_changed;
        }

        if !changed {
            break;
        }
    }

    // A final DCE sweep picks up anything folding/CSE made unreachable on
    // the last changed iteration, without counting as an extra iteration.
    if config.dce {
        let (next, _) = dce::eliminate(&current);
        current = next;
    }

    let nodes_after = current.nodes.len();
    let stats = OptimizerStats {
        nodes_before,
        nodes_after,
        nodes_eliminated: nodes_before.saturating_sub(nodes_after),
        iterations,
    };
    (current, stats)
}
