//! IR-phase errors (`spec.md` §7's IR/DAG category). Unlike the parser and
//! checker, the IR builder fails fast: these indicate an internal
//! inconsistency (an upstream-bug class), not a user-facing mistake.

use std::fmt;

#[derive(Debug, Clone)]
pub enum IrError {
    /// A declared output name has no binding after the walk. The checker is
    /// expected to have already rejected this; surfacing it here as a
    /// fail-fast error guards against a checker/builder mismatch.
    UnboundOutput { name: String },
}

impl fmt::Display for IrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrError::UnboundOutput { name } => write!(f, "output '{}' has no bound IR node", name),
        }
    }
}

impl std::error::Error for IrError {}
