//! Graph-shaped IR nodes (`spec.md` §3, §4.5). Each [`IRNode`] mirrors a
//! [`flowc_check::TypedExpression`] variant but stores producer [`NodeId`]s
//! instead of owning its operands, so the graph can be shared, reordered,
//! and rewritten by the optimizer.

use crate::options::IRModuleCallOptions;
use flowc_parser::{BoolOp, Literal};
use flowc_types::SemanticType;
use std::fmt;

/// A stable node identity. Builders are free to allocate these from random
/// UUIDs (`spec.md` §5) — only the DAG's *structural* hash, not node
/// identity, is required to be deterministic across compilations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub uuid::Uuid);

impl NodeId {
    pub fn new() -> Self {
        NodeId(uuid::Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub enum IRStringPart {
    Text(String),
    Expr(NodeId),
}

#[derive(Debug, Clone)]
pub enum IRPattern {
    Record { fields: Vec<String> },
    TypeTest { type_name: String, ty: SemanticType },
    Wildcard,
}

#[derive(Debug, Clone)]
pub struct IRMatchCase {
    pub pattern: IRPattern,
    pub body: NodeId,
}

/// A self-contained lambda body compiled into its own node map. Every free
/// variable reference inside the body becomes a parameter-binding `Input`
/// node here *and* an entry in the enclosing [`IRNode::HigherOrder`]'s
/// `captured_inputs`, so the DAG builder can wire a real data dependency
/// for it (`spec.md` §4.5).
#[derive(Debug, Clone)]
pub struct LambdaGraph {
    /// Lambda parameter name → its `Input` node inside this sub-graph.
    pub params: Vec<(String, NodeId)>,
    /// Free variables captured from the enclosing scope, in the same form.
    pub captures: Vec<(String, NodeId)>,
    pub nodes: std::collections::HashMap<NodeId, IRNode>,
    pub body: NodeId,
}

#[derive(Debug, Clone)]
pub enum IRNode {
    Input { name: String, ty: SemanticType },
    Literal { value: Literal, ty: SemanticType },
    ModuleCall {
        module_name: String,
        function_name: String,
        param_names: Vec<String>,
        args: Vec<NodeId>,
        options: IRModuleCallOptions,
        ty: SemanticType,
    },
    Merge { left: NodeId, right: NodeId, ty: SemanticType },
    Projection { source: NodeId, fields: Vec<String>, ty: SemanticType },
    FieldAccess { source: NodeId, field: String, ty: SemanticType },
    Conditional { cond: NodeId, then_branch: NodeId, else_branch: NodeId, ty: SemanticType },
    BoolBinary { op: BoolOp, left: NodeId, right: NodeId, ty: SemanticType },
    Not { operand: NodeId, ty: SemanticType },
    Guard { expr: NodeId, cond: NodeId, ty: SemanticType },
    Coalesce { left: NodeId, right: NodeId, ty: SemanticType },
    Equality { left: NodeId, right: NodeId, ty: SemanticType },
    Branch { cases: Vec<(NodeId, NodeId)>, otherwise: NodeId, ty: SemanticType },
    StringInterpolation { parts: Vec<IRStringPart>, ty: SemanticType },
    ListLiteral { items: Vec<NodeId>, ty: SemanticType },
    RecordLiteral { fields: Vec<(String, NodeId)>, ty: SemanticType },
    Match { scrutinee: NodeId, cases: Vec<IRMatchCase>, ty: SemanticType },
    /// A higher-order call over a list (`filter`, `map`, `all`, `any`, …).
    /// `operation` is the signature's simple name; the DAG builder decides
    /// which operations it actually supports (`spec.md` §4.7).
    HigherOrder {
        operation: String,
        source: NodeId,
        lambda: LambdaGraph,
        ty: SemanticType,
    },
}

impl IRNode {
    pub fn ty(&self) -> &SemanticType {
        match self {
            IRNode::Input { ty, .. }
            | IRNode::Literal { ty, .. }
            | IRNode::ModuleCall { ty, .. }
            | IRNode::Merge { ty, .. }
            | IRNode::Projection { ty, .. }
            | IRNode::FieldAccess { ty, .. }
            | IRNode::Conditional { ty, .. }
            | IRNode::BoolBinary { ty, .. }
            | IRNode::Not { ty, .. }
            | IRNode::Guard { ty, .. }
            | IRNode::Coalesce { ty, .. }
            | IRNode::Equality { ty, .. }
            | IRNode::Branch { ty, .. }
            | IRNode::StringInterpolation { ty, .. }
            | IRNode::ListLiteral { ty, .. }
            | IRNode::RecordLiteral { ty, .. }
            | IRNode::Match { ty, .. }
            | IRNode::HigherOrder { ty, .. } => ty,
        }
    }

    /// Direct producer node IDs in the *outer* graph (a `HigherOrder`
    /// node's lambda sub-graph is walked separately; only its captures
    /// reach back into the outer graph).
    pub fn producers(&self) -> Vec<NodeId> {
        match self {
            IRNode::Input { .. } | IRNode::Literal { .. } => Vec::new(),
            IRNode::ModuleCall { args, options, .. } => {
                let mut p = args.clone();
                p.extend(options.fallback);
                p
            }
            IRNode::Merge { left, right, .. } | IRNode::Coalesce { left, right, .. } | IRNode::Equality { left, right, .. } => {
                vec![*left, *right]
            }
            IRNode::Projection { source, .. } | IRNode::FieldAccess { source, .. } => vec![*source],
            IRNode::Conditional { cond, then_branch, else_branch, .. } => vec![*cond, *then_branch, *else_branch],
            IRNode::BoolBinary { left, right, .. } => vec![*left, *right],
            IRNode::Not { operand, .. } => vec![*operand],
            IRNode::Guard { expr, cond, .. } => vec![*expr, *cond],
            IRNode::Branch { cases, otherwise, .. } => {
                let mut p: Vec<NodeId> = cases.iter().flat_map(|(c, b)| [*c, *b]).collect();
                p.push(*otherwise);
                p
            }
            IRNode::StringInterpolation { parts, .. } => parts
                .iter()
                .filter_map(|p| match p {
                    IRStringPart::Expr(id) => Some(*id),
                    IRStringPart::Text(_) => None,
                })
                .collect(),
            IRNode::ListLiteral { items, .. } => items.clone(),
            IRNode::RecordLiteral { fields, .. } => fields.iter().map(|(_, id)| *id).collect(),
            IRNode::Match { scrutinee, cases, .. } => {
                let mut p = vec![*scrutinee];
                p.extend(cases.iter().map(|c| c.body));
                p
            }
            IRNode::HigherOrder { source, lambda, .. } => {
                let mut p = vec![*source];
                p.extend(lambda.captures.iter().map(|(_, id)| *id));
                p
            }
        }
    }

    /// Rebuilds this node with every producer `NodeId` rewritten through
    /// `f`, leaving the variant, payload, and the node's own identity
    /// untouched. Shared by the optimizer passes that redirect references
    /// after folding or deduplicating a producer.
    pub fn map_producers(&self, f: impl Fn(NodeId) -> NodeId) -> IRNode {
        match self {
            IRNode::Input { .. } | IRNode::Literal { .. } => self.clone(),
            IRNode::ModuleCall { module_name, function_name, param_names, args, options, ty } => {
                let mut options = options.clone();
                options.fallback = options.fallback.map(&f);
                IRNode::ModuleCall {
                    module_name: module_name.clone(),
                    function_name: function_name.clone(),
                    param_names: param_names.clone(),
                    args: args.iter().map(|a| f(*a)).collect(),
                    options,
                    ty: ty.clone(),
                }
            }
            IRNode::Merge { left, right, ty } => IRNode::Merge { left: f(*left), right: f(*right), ty: ty.clone() },
            IRNode::Projection { source, fields, ty } => {
                IRNode::Projection { source: f(*source), fields: fields.clone(), ty: ty.clone() }
            }
            IRNode::FieldAccess { source, field, ty } => {
                IRNode::FieldAccess { source: f(*source), field: field.clone(), ty: ty.clone() }
            }
            IRNode::Conditional { cond, then_branch, else_branch, ty } => IRNode::Conditional {
                cond: f(*cond),
                then_branch: f(*then_branch),
                else_branch: f(*else_branch),
                ty: ty.clone(),
            },
            IRNode::BoolBinary { op, left, right, ty } => {
                IRNode::BoolBinary { op: *op, left: f(*left), right: f(*right), ty: ty.clone() }
            }
            IRNode::Not { operand, ty } => IRNode::Not { operand: f(*operand), ty: ty.clone() },
            IRNode::Guard { expr, cond, ty } => IRNode::Guard { expr: f(*expr), cond: f(*cond), ty: ty.clone() },
            IRNode::Coalesce { left, right, ty } => IRNode::Coalesce { left: f(*left), right: f(*right), ty: ty.clone() },
            IRNode::Equality { left, right, ty } => IRNode::Equality { left: f(*left), right: f(*right), ty: ty.clone() },
            IRNode::Branch { cases, otherwise, ty } => IRNode::Branch {
                cases: cases.iter().map(|(c, b)| (f(*c), f(*b))).collect(),
                otherwise: f(*otherwise),
                ty: ty.clone(),
            },
            IRNode::StringInterpolation { parts, ty } => IRNode::StringInterpolation {
                parts: parts
                    .iter()
                    .map(|p| match p {
                        IRStringPart::Text(t) => IRStringPart::Text(t.clone()),
                        IRStringPart::Expr(id) => IRStringPart::Expr(f(*id)),
                    })
                    .collect(),
                ty: ty.clone(),
            },
            IRNode::ListLiteral { items, ty } => IRNode::ListLiteral { items: items.iter().map(|i| f(*i)).collect(), ty: ty.clone() },
            IRNode::RecordLiteral { fields, ty } => {
                IRNode::RecordLiteral { fields: fields.iter().map(|(n, id)| (n.clone(), f(*id))).collect(), ty: ty.clone() }
            }
            IRNode::Match { scrutinee, cases, ty } => IRNode::Match {
                scrutinee: f(*scrutinee),
                cases: cases.iter().map(|c| IRMatchCase { pattern: c.pattern.clone(), body: f(c.body) }).collect(),
                ty: ty.clone(),
            },
            IRNode::HigherOrder { operation, source, lambda, ty } => {
                let mut lambda = lambda.clone();
                lambda.captures = lambda.captures.iter().map(|(n, id)| (n.clone(), f(*id))).collect();
                IRNode::HigherOrder { operation: operation.clone(), source: f(*source), lambda, ty: ty.clone() }
            }
        }
    }
}
