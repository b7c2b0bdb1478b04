//! The lambda interpreter for higher-order calls (`spec.md` §4.7, §9):
//! a lambda body is validated at compile time against a restricted node
//! vocabulary, then can be interpreted by a runtime over a per-call
//! bindings map via [`LambdaEvaluator::eval`].
//!
//! This module never calls `eval` itself — evaluating a lambda is
//! evaluating pipeline data, which the compiler core does not do
//! (`spec.md` §1 Non-goals). `eval` exists so the runtime this crate's
//! output targets has something to call.

use crate::error::DagError;
use flowc_ir::{IRNode, LambdaGraph, NodeId};
use flowc_parser::BoolOp;
use std::collections::HashMap;

/// `spec.md` §9's tagged dynamic value, used only inside the lambda
/// interpreter boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum LambdaValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Record(HashMap<String, LambdaValue>),
    List(Vec<LambdaValue>),
}

/// A validated, self-contained lambda sub-graph ready to interpret.
#[derive(Debug, Clone)]
pub struct LambdaEvaluator {
    pub params: Vec<String>,
    nodes: HashMap<NodeId, IRNode>,
    body: NodeId,
}

/// Built-in functions a lambda body may call, over and above the node
/// variants `spec.md` §4.7 allows directly.
fn is_builtin_lambda_fn(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "add" | "sub" | "subtract" | "mul" | "multiply" | "div" | "divide" | "lt" | "gt" | "lte" | "gte" | "eq" | "equals"
    )
}

fn check_allowed(node: &IRNode) -> Result<(), DagError> {
    match node {
        IRNode::Input { .. }
        | IRNode::Literal { .. }
        | IRNode::FieldAccess { .. }
        | IRNode::Conditional { .. }
        | IRNode::ListLiteral { .. }
        | IRNode::BoolBinary { .. }
        | IRNode::Not { .. }
        | IRNode::Equality { .. } => Ok(()),
        IRNode::ModuleCall { function_name, .. } if is_builtin_lambda_fn(function_name) => Ok(()),
        IRNode::ModuleCall { module_name, function_name, .. } => {
            Err(DagError::UnsupportedFunction { module: module_name.clone(), name: function_name.clone() })
        }
        other => Err(DagError::UnsupportedNodeType { context: format!("lambda body ({:?})", std::mem::discriminant(other)) }),
    }
}

impl LambdaEvaluator {
    pub fn validate(lambda: &LambdaGraph) -> Result<Self, DagError> {
        for node in lambda.nodes.values() {
            check_allowed(node)?;
        }
        Ok(LambdaEvaluator {
            params: lambda.params.iter().map(|(name, _)| name.clone()).collect(),
            nodes: lambda.nodes.clone(),
            body: lambda.body,
        })
    }

    pub fn eval(&self, bindings: &HashMap<String, LambdaValue>) -> Result<LambdaValue, DagError> {
        self.eval_node(self.body, bindings)
    }

    fn eval_node(&self, id: NodeId, bindings: &HashMap<String, LambdaValue>) -> Result<LambdaValue, DagError> {
        let node = self.nodes.get(&id).ok_or_else(|| DagError::NodeNotFound { id, context: "lambda evaluator".to_string() })?;
        match node {
            IRNode::Input { name, .. } => {
                bindings.get(name).cloned().ok_or_else(|| DagError::LambdaParameterNotBound { name: name.clone() })
            }
            IRNode::Literal { value, .. } => Ok(literal_value(value)),
            IRNode::FieldAccess { source, field, .. } => match self.eval_node(*source, bindings)? {
                LambdaValue::Record(fields) => fields
                    .get(field)
                    .cloned()
                    .ok_or_else(|| DagError::InvalidFieldAccess { field: field.clone(), available: fields.keys().cloned().collect() }),
                _ => Err(DagError::InvalidFieldAccess { field: field.clone(), available: Vec::new() }),
            },
            IRNode::Conditional { cond, then_branch, else_branch, .. } => match self.eval_node(*cond, bindings)? {
                LambdaValue::Bool(true) => self.eval_node(*then_branch, bindings),
                LambdaValue::Bool(false) => self.eval_node(*else_branch, bindings),
                _ => Err(DagError::UnsupportedNodeType { context: "conditional with non-boolean condition".to_string() }),
            },
            IRNode::ListLiteral { items, .. } => {
                let values = items.iter().map(|i| self.eval_node(*i, bindings)).collect::<Result<Vec<_>, _>>()?;
                Ok(LambdaValue::List(values))
            }
            IRNode::BoolBinary { op, left, right, .. } => {
                let (l, r) = (self.eval_node(*left, bindings)?, self.eval_node(*right, bindings)?);
                match (l, r) {
                    (LambdaValue::Bool(l), LambdaValue::Bool(r)) => Ok(LambdaValue::Bool(match op {
                        BoolOp::And => l && r,
                        BoolOp::Or => l || r,
                    })),
                    _ => Err(DagError::UnsupportedNodeType { context: "boolean op over non-boolean operands".to_string() }),
                }
            }
            IRNode::Not { operand, .. } => match self.eval_node(*operand, bindings)? {
                LambdaValue::Bool(b) => Ok(LambdaValue::Bool(!b)),
                _ => Err(DagError::UnsupportedNodeType { context: "not over non-boolean operand".to_string() }),
            },
            IRNode::Equality { left, right, .. } => {
                let (l, r) = (self.eval_node(*left, bindings)?, self.eval_node(*right, bindings)?);
                Ok(LambdaValue::Bool(l == r))
            }
            IRNode::ModuleCall { function_name, args, .. } => {
                let values = args.iter().map(|a| self.eval_node(*a, bindings)).collect::<Result<Vec<_>, _>>()?;
                eval_builtin(function_name, &values)
            }
            other => Err(DagError::UnsupportedNodeType { context: format!("lambda body ({:?})", std::mem::discriminant(other)) }),
        }
    }
}

fn literal_value(lit: &flowc_parser::Literal) -> LambdaValue {
    match lit {
        flowc_parser::Literal::Int(i) => LambdaValue::Int(*i),
        flowc_parser::Literal::Float(f) => LambdaValue::Float(*f),
        flowc_parser::Literal::Str(s) => LambdaValue::Str(s.clone()),
        flowc_parser::Literal::Bool(b) => LambdaValue::Bool(*b),
    }
}

fn numeric(v: &LambdaValue) -> Option<f64> {
    match v {
        LambdaValue::Int(i) => Some(*i as f64),
        LambdaValue::Float(f) => Some(*f),
        _ => None,
    }
}

fn both_int(a: &LambdaValue, b: &LambdaValue) -> bool {
    matches!((a, b), (LambdaValue::Int(_), LambdaValue::Int(_)))
}

fn eval_builtin(name: &str, args: &[LambdaValue]) -> Result<LambdaValue, DagError> {
    let unsupported = || DagError::UnsupportedFunction { module: "<lambda>".to_string(), name: name.to_string() };
    let name = name.to_ascii_lowercase();
    match (name.as_str(), args) {
        ("add", [a, b]) => {
            let (x, y) = (numeric(a).ok_or_else(unsupported)?, numeric(b).ok_or_else(unsupported)?);
            Ok(if both_int(a, b) { LambdaValue::Int((x + y) as i64) } else { LambdaValue::Float(x + y) })
        }
        ("sub" | "subtract", [a, b]) => {
            let (x, y) = (numeric(a).ok_or_else(unsupported)?, numeric(b).ok_or_else(unsupported)?);
            Ok(if both_int(a, b) { LambdaValue::Int((x - y) as i64) } else { LambdaValue::Float(x - y) })
        }
        ("mul" | "multiply", [a, b]) => {
            let (x, y) = (numeric(a).ok_or_else(unsupported)?, numeric(b).ok_or_else(unsupported)?);
            Ok(if both_int(a, b) { LambdaValue::Int((x * y) as i64) } else { LambdaValue::Float(x * y) })
        }
        ("div" | "divide", [a, b]) => {
            let (x, y) = (numeric(a).ok_or_else(unsupported)?, numeric(b).ok_or_else(unsupported)?);
            Ok(if both_int(a, b) { LambdaValue::Int((x / y) as i64) } else { LambdaValue::Float(x / y) })
        }
        ("lt", [a, b]) => Ok(LambdaValue::Bool(numeric(a).ok_or_else(unsupported)? < numeric(b).ok_or_else(unsupported)?)),
        ("gt", [a, b]) => Ok(LambdaValue::Bool(numeric(a).ok_or_else(unsupported)? > numeric(b).ok_or_else(unsupported)?)),
        ("lte", [a, b]) => Ok(LambdaValue::Bool(numeric(a).ok_or_else(unsupported)? <= numeric(b).ok_or_else(unsupported)?)),
        ("gte", [a, b]) => Ok(LambdaValue::Bool(numeric(a).ok_or_else(unsupported)? >= numeric(b).ok_or_else(unsupported)?)),
        ("eq" | "equals", [a, b]) => Ok(LambdaValue::Bool(a == b)),
        _ => Err(unsupported()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowc_ir::IRNode;
    use flowc_types::SemanticType;

    #[test]
    fn evaluates_a_filter_predicate_lambda() {
        let param = NodeId::new();
        let lit = NodeId::new();
        let body = NodeId::new();
        let mut nodes = HashMap::new();
        nodes.insert(param, IRNode::Input { name: "x".to_string(), ty: SemanticType::SInt });
        nodes.insert(lit, IRNode::Literal { value: flowc_parser::Literal::Int(0), ty: SemanticType::SInt });
        nodes.insert(
            body,
            IRNode::ModuleCall {
                module_name: "Gt".to_string(),
                function_name: "gt".to_string(),
                param_names: vec!["a".to_string(), "b".to_string()],
                args: vec![param, lit],
                options: Default::default(),
                ty: SemanticType::SBoolean,
            },
        );
        let lambda = LambdaGraph { params: vec![("x".to_string(), param)], captures: vec![], nodes, body };

        let evaluator = LambdaEvaluator::validate(&lambda).expect("validates");
        let mut bindings = HashMap::new();
        bindings.insert("x".to_string(), LambdaValue::Int(5));
        assert_eq!(evaluator.eval(&bindings).unwrap(), LambdaValue::Bool(true));
    }

    #[test]
    fn rejects_a_lambda_body_calling_an_unknown_function() {
        let param = NodeId::new();
        let body = NodeId::new();
        let mut nodes = HashMap::new();
        nodes.insert(param, IRNode::Input { name: "x".to_string(), ty: SemanticType::SInt });
        nodes.insert(
            body,
            IRNode::ModuleCall {
                module_name: "Sort".to_string(),
                function_name: "sort_by".to_string(),
                param_names: vec!["a".to_string()],
                args: vec![param],
                options: Default::default(),
                ty: SemanticType::SInt,
            },
        );
        let lambda = LambdaGraph { params: vec![("x".to_string(), param)], captures: vec![], nodes, body };

        assert!(LambdaEvaluator::validate(&lambda).is_err());
    }
}
