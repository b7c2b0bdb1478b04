//! Typed AST → IR graph (`spec.md` §4.5).

use crate::error::IrError;
use crate::graph::IRPipeline;
use crate::node::{IRMatchCase, IRNode, IRPattern, IRStringPart, LambdaGraph, NodeId};
use crate::options::convert_options;
use flowc_check::{TypedDeclaration, TypedExpression, TypedMatchCase, TypedPattern, TypedPipeline, TypedStringPart};
use std::collections::HashMap;

/// Signatures whose `module_name` carries this prefix are higher-order
/// calls over a list; the remainder of the name (lower-cased) is the
/// operation (`spec.md` §4.5's "signature convention").
const HIGHER_ORDER_PREFIX: &str = "HigherOrder.";

pub fn build(pipeline: &TypedPipeline) -> Result<IRPipeline, IrError> {
    let mut builder = Builder { nodes: HashMap::new(), bindings: HashMap::new(), inputs: Vec::new() };

    for decl in &pipeline.declarations {
        builder.build_declaration(decl);
    }

    for name in &pipeline.outputs {
        if !builder.bindings.contains_key(name) {
            return Err(IrError::UnboundOutput { name: name.clone() });
        }
    }

    Ok(IRPipeline {
        nodes: builder.nodes,
        inputs: builder.inputs,
        outputs: pipeline.outputs.clone(),
        // Full variable → producing-node map (`spec.md` §3); output
        // bindings are resolved by looking up `outputs` names in here.
        bindings: builder.bindings,
    })
}

struct Builder {
    nodes: HashMap<NodeId, IRNode>,
    bindings: HashMap<String, NodeId>,
    inputs: Vec<NodeId>,
}

impl Builder {
    fn insert(&mut self, node: IRNode) -> NodeId {
        let id = NodeId::new();
        self.nodes.insert(id, node);
        id
    }

    fn build_declaration(&mut self, decl: &TypedDeclaration) {
        match decl {
            TypedDeclaration::TypeDef { .. } | TypedDeclaration::OutputDecl { .. } | TypedDeclaration::UseDecl { .. } => {}
            TypedDeclaration::InputDecl { name, ty } => {
                let id = self.insert(IRNode::Input { name: name.clone(), ty: ty.clone() });
                self.inputs.push(id);
                self.bindings.insert(name.clone(), id);
            }
            TypedDeclaration::Assignment { name, expr } => {
                let id = self.build_expr(expr);
                self.bindings.insert(name.clone(), id);
            }
        }
    }

    fn build_expr(&mut self, expr: &TypedExpression) -> NodeId {
        match expr {
            TypedExpression::VarRef { name, .. } => *self
                .bindings
                .get(name)
                .unwrap_or_else(|| panic!("IR builder: unbound variable '{}' (checker should have rejected this)", name)),
            TypedExpression::Literal { value, ty, .. } => self.insert(IRNode::Literal { value: value.clone(), ty: ty.clone() }),
            TypedExpression::FunctionCall { signature, args, options, ty, .. } => {
                if let Some(operation) = signature.module_name.strip_prefix(HIGHER_ORDER_PREFIX) {
                    self.build_higher_order(operation, args, ty)
                } else {
                    let arg_ids: Vec<NodeId> = args.iter().map(|a| self.build_expr(a)).collect();
                    let param_names = signature.params.iter().map(|(n, _)| n.clone()).collect();
                    let opts = convert_options(options, |fallback| self.build_expr(fallback));
                    self.insert(IRNode::ModuleCall {
                        module_name: signature.module_name.clone(),
                        function_name: signature.name.clone(),
                        param_names,
                        args: arg_ids,
                        options: opts,
                        ty: ty.clone(),
                    })
                }
            }
            TypedExpression::Merge { left, right, ty, .. } => {
                let left = self.build_expr(left);
                let right = self.build_expr(right);
                self.insert(IRNode::Merge { left, right, ty: ty.clone() })
            }
            TypedExpression::Projection { source, fields, ty, .. } => {
                let source = self.build_expr(source);
                self.insert(IRNode::Projection { source, fields: fields.clone(), ty: ty.clone() })
            }
            TypedExpression::FieldAccess { source, field, ty, .. } => {
                let source = self.build_expr(source);
                self.insert(IRNode::FieldAccess { source, field: field.clone(), ty: ty.clone() })
            }
            TypedExpression::Conditional { cond, then_branch, else_branch, ty, .. } => {
                let cond = self.build_expr(cond);
                let then_branch = self.build_expr(then_branch);
                let else_branch = self.build_expr(else_branch);
                self.insert(IRNode::Conditional { cond, then_branch, else_branch, ty: ty.clone() })
            }
            TypedExpression::BoolBinary { op, left, right, ty, .. } => {
                let left = self.build_expr(left);
                let right = self.build_expr(right);
                self.insert(IRNode::BoolBinary { op: *op, left, right, ty: ty.clone() })
            }
            TypedExpression::Not { operand, ty, .. } => {
                let operand = self.build_expr(operand);
                self.insert(IRNode::Not { operand, ty: ty.clone() })
            }
            TypedExpression::Guard { expr, cond, ty, .. } => {
                let expr = self.build_expr(expr);
                let cond = self.build_expr(cond);
                self.insert(IRNode::Guard { expr, cond, ty: ty.clone() })
            }
            TypedExpression::Coalesce { left, right, ty, .. } => {
                let left = self.build_expr(left);
                let right = self.build_expr(right);
                self.insert(IRNode::Coalesce { left, right, ty: ty.clone() })
            }
            TypedExpression::Equality { left, right, ty, .. } => {
                let left = self.build_expr(left);
                let right = self.build_expr(right);
                self.insert(IRNode::Equality { left, right, ty: ty.clone() })
            }
            TypedExpression::Branch { cases, otherwise, ty, .. } => {
                let cases = cases.iter().map(|(c, b)| (self.build_expr(c), self.build_expr(b))).collect();
                let otherwise = self.build_expr(otherwise);
                self.insert(IRNode::Branch { cases, otherwise, ty: ty.clone() })
            }
            TypedExpression::StringInterpolation { parts, ty, .. } => {
                let parts = parts
                    .iter()
                    .map(|p| match p {
                        TypedStringPart::Text(t) => IRStringPart::Text(t.clone()),
                        TypedStringPart::Expr(e) => IRStringPart::Expr(self.build_expr(e)),
                    })
                    .collect();
                self.insert(IRNode::StringInterpolation { parts, ty: ty.clone() })
            }
            TypedExpression::ListLiteral { items, ty, .. } => {
                let items = items.iter().map(|i| self.build_expr(i)).collect();
                self.insert(IRNode::ListLiteral { items, ty: ty.clone() })
            }
            TypedExpression::RecordLiteral { fields, ty, .. } => {
                let fields = fields.iter().map(|(n, e)| (n.clone(), self.build_expr(e))).collect();
                self.insert(IRNode::RecordLiteral { fields, ty: ty.clone() })
            }
            TypedExpression::Lambda { body, ty, .. } => {
                // Only reachable for a malformed lambda the checker already
                // flagged `InvalidLambdaContext` for; compile its body so
                // later phases still see a well-formed graph.
                let body = self.build_expr(body);
                let _ = body;
                self.insert(IRNode::Literal { value: flowc_parser::Literal::Bool(false), ty: ty.clone() })
            }
            TypedExpression::Match { scrutinee, cases, ty, .. } => {
                let scrutinee = self.build_expr(scrutinee);
                let cases = cases.iter().map(|c| self.build_match_case(scrutinee, c)).collect();
                self.insert(IRNode::Match { scrutinee, cases, ty: ty.clone() })
            }
        }
    }

    /// A `Record` pattern's field names are ordinary variable bindings
    /// inside the case body (checked that way by the type checker via
    /// `TypeEnvironment::push_bindings`), so before compiling the body here
    /// each field name is bound to a `FieldAccess` off the scrutinee, then
    /// restored to whatever it shadowed once the body is built.
    fn build_match_case(&mut self, scrutinee: NodeId, case: &TypedMatchCase) -> IRMatchCase {
        match &case.pattern {
            TypedPattern::Record { fields, .. } => {
                let saved: Vec<(String, Option<NodeId>)> = fields
                    .iter()
                    .map(|(name, ty)| {
                        let field_id = self.insert(IRNode::FieldAccess { source: scrutinee, field: name.clone(), ty: ty.clone() });
                        (name.clone(), self.bindings.insert(name.clone(), field_id))
                    })
                    .collect();

                let body = self.build_expr(&case.body);

                for (name, previous) in saved {
                    match previous {
                        Some(id) => {
                            self.bindings.insert(name, id);
                        }
                        None => {
                            self.bindings.remove(&name);
                        }
                    }
                }

                IRMatchCase { pattern: IRPattern::Record { fields: fields.iter().map(|(n, _)| n.clone()).collect() }, body }
            }
            TypedPattern::TypeTest { type_name, ty, .. } => {
                let body = self.build_expr(&case.body);
                IRMatchCase { pattern: IRPattern::TypeTest { type_name: type_name.clone(), ty: ty.clone() }, body }
            }
            TypedPattern::Wildcard { .. } => {
                let body = self.build_expr(&case.body);
                IRMatchCase { pattern: IRPattern::Wildcard, body }
            }
        }
    }

    /// Compiles a lambda argument into its own node map: its parameters
    /// become `Input` nodes, and every free variable reference becomes
    /// both an `Input` node inside and a `captures` entry pointing at the
    /// outer binding (`spec.md` §4.5).
    fn build_higher_order(&mut self, operation: &str, args: &[TypedExpression], ty: &flowc_types::SemanticType) -> NodeId {
        let source = self.build_expr(&args[0]);
        let lambda_expr = &args[1];
        let TypedExpression::Lambda { params, body, .. } = lambda_expr else {
            panic!("IR builder: higher-order call's second argument must be a lambda (checker should have rejected this)");
        };

        let mut sub = Builder { nodes: HashMap::new(), bindings: HashMap::new(), inputs: Vec::new() };
        let mut lambda_params = Vec::with_capacity(params.len());
        for (name, param_ty) in params {
            let id = sub.insert(IRNode::Input { name: name.clone(), ty: param_ty.clone() });
            sub.bindings.insert(name.clone(), id);
            lambda_params.push((name.clone(), id));
        }

        let mut captures = Vec::new();
        for (name, &outer_id) in &self.bindings {
            if sub.bindings.contains_key(name) {
                continue;
            }
            if !expr_references(body, name) {
                continue;
            }
            let ty = self.nodes[&outer_id].ty().clone();
            let inner_id = sub.insert(IRNode::Input { name: name.clone(), ty });
            sub.bindings.insert(name.clone(), inner_id);
            captures.push((name.clone(), outer_id));
        }

        let body_id = sub.build_expr(body);
        let lambda = LambdaGraph { params: lambda_params, captures, nodes: sub.nodes, body: body_id };

        self.insert(IRNode::HigherOrder { operation: operation.to_string(), source, lambda, ty: ty.clone() })
    }
}

/// Conservative free-variable scan: true if `name` might be referenced
/// anywhere in `expr`'s subtree. Used only to decide which outer bindings
/// a lambda needs captured as inputs; over-approximating is harmless.
fn expr_references(expr: &TypedExpression, name: &str) -> bool {
    match expr {
        TypedExpression::VarRef { name: n, .. } => n == name,
        TypedExpression::Literal { .. } => false,
        TypedExpression::FunctionCall { args, options, .. } => {
            args.iter().any(|a| expr_references(a, name))
                || options.iter().any(|o| match &o.value {
                    flowc_check::TypedOptionValue::Expr(e) => expr_references(e, name),
                    _ => false,
                })
        }
        TypedExpression::Merge { left, right, .. }
        | TypedExpression::Coalesce { left, right, .. }
        | TypedExpression::Equality { left, right, .. }
        | TypedExpression::BoolBinary { left, right, .. } => expr_references(left, name) || expr_references(right, name),
        TypedExpression::Projection { source, .. } | TypedExpression::FieldAccess { source, .. } => expr_references(source, name),
        TypedExpression::Conditional { cond, then_branch, else_branch, .. } => {
            expr_references(cond, name) || expr_references(then_branch, name) || expr_references(else_branch, name)
        }
        TypedExpression::Not { operand, .. } => expr_references(operand, name),
        TypedExpression::Guard { expr, cond, .. } => expr_references(expr, name) || expr_references(cond, name),
        TypedExpression::Branch { cases, otherwise, .. } => {
            cases.iter().any(|(c, b)| expr_references(c, name) || expr_references(b, name)) || expr_references(otherwise, name)
        }
        TypedExpression::StringInterpolation { parts, .. } => parts.iter().any(|p| match p {
            TypedStringPart::Text(_) => false,
            TypedStringPart::Expr(e) => expr_references(e, name),
        }),
        TypedExpression::ListLiteral { items, .. } => items.iter().any(|i| expr_references(i, name)),
        TypedExpression::RecordLiteral { fields, .. } => fields.iter().any(|(_, e)| expr_references(e, name)),
        TypedExpression::Lambda { body, .. } => expr_references(body, name),
        TypedExpression::Match { scrutinee, cases, .. } => {
            expr_references(scrutinee, name) || cases.iter().any(|c| expr_references(&c.body, name))
        }
    }
}
