//! Parse-time AST (`spec.md` §3, §4.3). Consumed by `flowc-check` and
//! discarded after; every node carries a [`Span`].

use flowc_base::Span;

#[derive(Debug, Clone)]
pub struct Pipeline {
    pub declarations: Vec<Declaration>,
    pub outputs: Vec<(String, Span)>,
}

#[derive(Debug, Clone)]
pub enum Declaration {
    TypeDef { name: String, ty: TypeExpr, span: Span },
    InputDecl { name: String, ty: TypeExpr, span: Span },
    Assignment { name: String, expr: Expression, span: Span },
    OutputDecl { name: String, span: Span },
    UseDecl { namespace: String, span: Span },
}

impl Declaration {
    pub fn span(&self) -> Span {
        match self {
            Declaration::TypeDef { span, .. }
            | Declaration::InputDecl { span, .. }
            | Declaration::Assignment { span, .. }
            | Declaration::OutputDecl { span, .. }
            | Declaration::UseDecl { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone)]
pub enum TypeExpr {
    Named(String, Span),
    Record(Vec<(String, TypeExpr)>, Span),
    List(Box<TypeExpr>, Span),
    Candidates(Box<TypeExpr>, Span),
    MapTy(Box<TypeExpr>, Box<TypeExpr>, Span),
    Optional(Box<TypeExpr>, Span),
    Merge(Box<TypeExpr>, Box<TypeExpr>, Span),
}

impl TypeExpr {
    pub fn span(&self) -> Span {
        match self {
            TypeExpr::Named(_, s)
            | TypeExpr::Record(_, s)
            | TypeExpr::List(_, s)
            | TypeExpr::Candidates(_, s)
            | TypeExpr::MapTy(_, _, s)
            | TypeExpr::Optional(_, s)
            | TypeExpr::Merge(_, _, s) => *s,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoolOp {
    And,
    Or,
}

#[derive(Debug, Clone)]
pub enum StringPart {
    Text(String),
    Expr(Expression),
}

#[derive(Debug, Clone)]
pub struct OptionEntry {
    pub name: String,
    pub value: OptionValue,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum OptionValue {
    Int(i64),
    Duration(u64),
    Ident(String),
    Bool(bool),
    Throttle(u64, u64),
    Window(WindowSpec),
    Join(JoinSpec),
    Expr(Box<Expression>),
}

#[derive(Debug, Clone)]
pub enum WindowSpec {
    Tumbling(u64),
    Sliding(u64, u64),
    Count(u64),
}

#[derive(Debug, Clone)]
pub enum JoinSpec {
    CombineLatest,
    Zip,
    Buffer(u64),
}

#[derive(Debug, Clone)]
pub enum Pattern {
    Record(Vec<String>, Span),
    TypeTest(String, Span),
    Wildcard(Span),
}

impl Pattern {
    pub fn span(&self) -> Span {
        match self {
            Pattern::Record(_, s) | Pattern::TypeTest(_, s) | Pattern::Wildcard(s) => *s,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchCase {
    pub pattern: Pattern,
    pub body: Expression,
}

#[derive(Debug, Clone)]
pub enum Expression {
    VarRef(String, Span),
    Literal(Literal, Span),
    FunctionCall {
        name: String,
        args: Vec<Expression>,
        with_opts: Vec<OptionEntry>,
        span: Span,
    },
    Merge(Box<Expression>, Box<Expression>, Span),
    Projection {
        source: Box<Expression>,
        fields: Vec<String>,
        span: Span,
    },
    FieldAccess {
        source: Box<Expression>,
        field: String,
        span: Span,
    },
    Conditional {
        cond: Box<Expression>,
        then_branch: Box<Expression>,
        else_branch: Box<Expression>,
        span: Span,
    },
    BoolBinary {
        op: BoolOp,
        left: Box<Expression>,
        right: Box<Expression>,
        span: Span,
    },
    Not(Box<Expression>, Span),
    Guard {
        expr: Box<Expression>,
        cond: Box<Expression>,
        span: Span,
    },
    Coalesce(Box<Expression>, Box<Expression>, Span),
    Equality(Box<Expression>, Box<Expression>, Span),
    Branch {
        cases: Vec<(Expression, Expression)>,
        otherwise: Box<Expression>,
        span: Span,
    },
    StringInterpolation {
        parts: Vec<StringPart>,
        span: Span,
    },
    ListLiteral(Vec<Expression>, Span),
    RecordLiteral(Vec<(String, Expression)>, Span),
    Lambda {
        params: Vec<String>,
        body: Box<Expression>,
        span: Span,
    },
    Match {
        scrutinee: Box<Expression>,
        cases: Vec<MatchCase>,
        span: Span,
    },
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::VarRef(_, s)
            | Expression::Literal(_, s)
            | Expression::FunctionCall { span: s, .. }
            | Expression::Merge(_, _, s)
            | Expression::Projection { span: s, .. }
            | Expression::FieldAccess { span: s, .. }
            | Expression::Conditional { span: s, .. }
            | Expression::BoolBinary { span: s, .. }
            | Expression::Not(_, s)
            | Expression::Guard { span: s, .. }
            | Expression::Coalesce(_, _, s)
            | Expression::Equality(_, _, s)
            | Expression::Branch { span: s, .. }
            | Expression::StringInterpolation { span: s, .. }
            | Expression::ListLiteral(_, s)
            | Expression::RecordLiteral(_, s)
            | Expression::Lambda { span: s, .. }
            | Expression::Match { span: s, .. } => *s,
        }
    }
}
