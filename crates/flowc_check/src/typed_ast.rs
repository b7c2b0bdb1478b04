//! Typed AST produced by the checker (`spec.md` §3). Every node carries its
//! resolved [`SemanticType`] and [`Span`]; consumed by `flowc-ir` and
//! discarded after.

use flowc_base::Span;
use flowc_parser::{BoolOp, JoinSpec, Literal, WindowSpec};
use flowc_registry::FunctionSignature;
use flowc_types::SemanticType;

#[derive(Debug, Clone)]
pub struct TypedPipeline {
    pub declarations: Vec<TypedDeclaration>,
    pub outputs: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum TypedDeclaration {
    TypeDef { name: String, ty: SemanticType },
    InputDecl { name: String, ty: SemanticType },
    Assignment { name: String, expr: TypedExpression },
    OutputDecl { name: String },
    UseDecl { namespace: String },
}

#[derive(Debug, Clone)]
pub struct TypedOptionEntry {
    pub name: String,
    pub value: TypedOptionValue,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum TypedOptionValue {
    Int(i64),
    Duration(u64),
    Ident(String),
    Bool(bool),
    Throttle(u64, u64),
    Window(WindowSpec),
    Join(JoinSpec),
    Expr(Box<TypedExpression>),
}

#[derive(Debug, Clone)]
pub enum TypedStringPart {
    Text(String),
    Expr(TypedExpression),
}

#[derive(Debug, Clone)]
pub enum TypedPattern {
    /// Binds the listed fields, each typed from the scrutinee's record shape.
    Record { fields: Vec<(String, SemanticType)>, span: Span },
    TypeTest { type_name: String, ty: SemanticType, span: Span },
    Wildcard { span: Span },
}

#[derive(Debug, Clone)]
pub struct TypedMatchCase {
    pub pattern: TypedPattern,
    pub body: TypedExpression,
}

#[derive(Debug, Clone)]
pub enum TypedExpression {
    VarRef { name: String, ty: SemanticType, span: Span },
    Literal { value: Literal, ty: SemanticType, span: Span },
    FunctionCall {
        signature: FunctionSignature,
        args: Vec<TypedExpression>,
        options: Vec<TypedOptionEntry>,
        ty: SemanticType,
        span: Span,
    },
    Merge { left: Box<TypedExpression>, right: Box<TypedExpression>, ty: SemanticType, span: Span },
    Projection { source: Box<TypedExpression>, fields: Vec<String>, ty: SemanticType, span: Span },
    FieldAccess { source: Box<TypedExpression>, field: String, ty: SemanticType, span: Span },
    Conditional {
        cond: Box<TypedExpression>,
        then_branch: Box<TypedExpression>,
        else_branch: Box<TypedExpression>,
        ty: SemanticType,
        span: Span,
    },
    BoolBinary { op: BoolOp, left: Box<TypedExpression>, right: Box<TypedExpression>, ty: SemanticType, span: Span },
    Not { operand: Box<TypedExpression>, ty: SemanticType, span: Span },
    Guard { expr: Box<TypedExpression>, cond: Box<TypedExpression>, ty: SemanticType, span: Span },
    Coalesce { left: Box<TypedExpression>, right: Box<TypedExpression>, ty: SemanticType, span: Span },
    Equality { left: Box<TypedExpression>, right: Box<TypedExpression>, ty: SemanticType, span: Span },
    Branch {
        cases: Vec<(TypedExpression, TypedExpression)>,
        otherwise: Box<TypedExpression>,
        ty: SemanticType,
        span: Span,
    },
    StringInterpolation { parts: Vec<TypedStringPart>, ty: SemanticType, span: Span },
    ListLiteral { items: Vec<TypedExpression>, ty: SemanticType, span: Span },
    RecordLiteral { fields: Vec<(String, TypedExpression)>, ty: SemanticType, span: Span },
    Lambda { params: Vec<(String, SemanticType)>, body: Box<TypedExpression>, ty: SemanticType, span: Span },
    Match { scrutinee: Box<TypedExpression>, cases: Vec<TypedMatchCase>, ty: SemanticType, span: Span },
}

impl TypedExpression {
    pub fn ty(&self) -> &SemanticType {
        match self {
            TypedExpression::VarRef { ty, .. }
            | TypedExpression::Literal { ty, .. }
            | TypedExpression::FunctionCall { ty, .. }
            | TypedExpression::Merge { ty, .. }
            | TypedExpression::Projection { ty, .. }
            | TypedExpression::FieldAccess { ty, .. }
            | TypedExpression::Conditional { ty, .. }
            | TypedExpression::BoolBinary { ty, .. }
            | TypedExpression::Not { ty, .. }
            | TypedExpression::Guard { ty, .. }
            | TypedExpression::Coalesce { ty, .. }
            | TypedExpression::Equality { ty, .. }
            | TypedExpression::Branch { ty, .. }
            | TypedExpression::StringInterpolation { ty, .. }
            | TypedExpression::ListLiteral { ty, .. }
            | TypedExpression::RecordLiteral { ty, .. }
            | TypedExpression::Lambda { ty, .. }
            | TypedExpression::Match { ty, .. } => ty,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            TypedExpression::VarRef { span, .. }
            | TypedExpression::Literal { span, .. }
            | TypedExpression::FunctionCall { span, .. }
            | TypedExpression::Merge { span, .. }
            | TypedExpression::Projection { span, .. }
            | TypedExpression::FieldAccess { span, .. }
            | TypedExpression::Conditional { span, .. }
            | TypedExpression::BoolBinary { span, .. }
            | TypedExpression::Not { span, .. }
            | TypedExpression::Guard { span, .. }
            | TypedExpression::Coalesce { span, .. }
            | TypedExpression::Equality { span, .. }
            | TypedExpression::Branch { span, .. }
            | TypedExpression::StringInterpolation { span, .. }
            | TypedExpression::ListLiteral { span, .. }
            | TypedExpression::RecordLiteral { span, .. }
            | TypedExpression::Lambda { span, .. }
            | TypedExpression::Match { span, .. } => *span,
        }
    }
}
