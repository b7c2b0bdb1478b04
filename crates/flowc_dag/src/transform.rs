//! Inline transforms (`spec.md` §3, §4.7): pure compile-time functions
//! attached to a data node so the runtime can evaluate it without a
//! separate module node.

use crate::lambda::LambdaEvaluator;
use crate::spec::{CType, DataId};
use flowc_parser::Literal;

#[derive(Debug, Clone)]
pub enum PatternMatcher {
    /// Matches any record-shaped value carrying at least these fields.
    Record { fields: Vec<String> },
    /// Matches a value of this primitive/named type.
    TypeTest { type_name: String },
    Wildcard,
}

#[derive(Debug, Clone)]
pub struct MatchArm {
    pub pattern: PatternMatcher,
    /// The already-built data node computing this arm's body. For a
    /// `Record` pattern, `transform_inputs` on that data node (or its
    /// ancestors) already reference `FieldAccess` nodes off the scrutinee —
    /// the arm doesn't need its own binding list.
    pub body: DataId,
}

/// Higher-order operations the DAG builder actually supports (`spec.md`
/// §4.7: anything else, e.g. `SortBy`, is rejected as unsupported).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HigherOrderOp {
    Filter,
    Map,
    All,
    Any,
}

impl HigherOrderOp {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "filter" => Some(Self::Filter),
            "map" => Some(Self::Map),
            "all" => Some(Self::All),
            "any" => Some(Self::Any),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum InlineTransform {
    Merge { left_ty: CType, right_ty: CType },
    Project { fields: Vec<String>, source_ty: CType },
    FieldAccess { field: String, source_ty: CType },
    Conditional,
    Literal(Literal),
    And,
    Or,
    Not,
    Guard,
    Coalesce,
    /// Added alongside `And`/`Or` for the `==` operator (`spec.md` §9 open
    /// question on `Branch`/equality behavior; resolved in `DESIGN.md`).
    Equality,
    StringInterpolation { text_parts: usize, expr_parts: usize },
    ListLiteral { size: usize },
    RecordBuild { field_names: Vec<String> },
    HigherOrder { op: HigherOrderOp, evaluator: LambdaEvaluator },
    Match { scrutinee_ty: CType, arms: Vec<MatchArm> },
}
