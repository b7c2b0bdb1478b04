//! IR/DAG error taxonomy (`spec.md` §7). These indicate either an upstream
//! compiler bug or a registered-module mismatch, not a user authoring
//! mistake — the DAG builder fails fast on the first one rather than
//! accumulating, per the propagation policy in §7.

use flowc_ir::NodeId;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum DagError {
    NodeNotFound { id: NodeId, context: String },
    UnsupportedNodeType { context: String },
    UnsupportedFunction { module: String, name: String },
    UnsupportedOperation { name: String },
    LambdaParameterNotBound { name: String },
    InvalidFieldAccess { field: String, available: Vec<String> },
}

impl fmt::Display for DagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DagError::NodeNotFound { id, context } => write!(f, "node {} not found while building {}", id, context),
            DagError::UnsupportedNodeType { context } => write!(f, "unsupported node type in {}", context),
            DagError::UnsupportedFunction { module, name } => write!(f, "module '{}' has no registered function '{}'", module, name),
            DagError::UnsupportedOperation { name } => write!(f, "unsupported higher-order operation '{}'", name),
            DagError::LambdaParameterNotBound { name } => write!(f, "lambda parameter '{}' has no bound value", name),
            DagError::InvalidFieldAccess { field, available } => {
                write!(f, "no field '{}' (available: {})", field, available.join(", "))
            }
        }
    }
}

impl std::error::Error for DagError {}
