//! The type checker itself (`spec.md` §4.4): AST → typed AST, accumulating
//! [`CheckError`]s instead of stopping at the first one.
//!
//! Error recovery convention: whenever a sub-expression fails to type
//! check, the checker records the error and substitutes `SNothing` (the
//! bottom type) as that sub-expression's type. Because `SNothing` is a
//! subtype of everything, surrounding checks that consume it succeed
//! silently instead of cascading into a flood of secondary errors.

use crate::env::TypeEnvironment;
use crate::error::CheckError;
use crate::typed_ast::*;
use flowc_parser::{
    ast::{Declaration, Expression, OptionEntry, OptionValue, Pattern, Pipeline, TypeExpr},
    Literal,
};
use flowc_registry::{FunctionRegistry, FunctionSignature};
use flowc_types::{common_type, is_subtype, lub, merge_types, SemanticType};

pub fn check_pipeline(pipeline: &Pipeline, registry: &FunctionRegistry) -> (TypedPipeline, Vec<CheckError>) {
    let mut checker = Checker { env: TypeEnvironment::new(registry), errors: Vec::new() };
    let declarations: Vec<TypedDeclaration> = pipeline.declarations.iter().map(|d| checker.check_declaration(d)).collect();

    for (name, span) in &pipeline.outputs {
        if checker.env.lookup_variable(name).is_none() {
            checker.errors.push(CheckError::UndefinedVariable { name: name.clone(), span: *span });
        }
    }
    let outputs = pipeline.outputs.iter().map(|(name, _)| name.clone()).collect();

    (TypedPipeline { declarations, outputs }, checker.errors)
}

struct Checker<'a> {
    env: TypeEnvironment<'a>,
    errors: Vec<CheckError>,
}

impl<'a> Checker<'a> {
    fn check_declaration(&mut self, decl: &Declaration) -> TypedDeclaration {
        match decl {
            Declaration::TypeDef { name, ty, .. } => {
                let resolved = self.resolve_type_expr(ty);
                self.env.define_type(name.clone(), resolved.clone());
                TypedDeclaration::TypeDef { name: name.clone(), ty: resolved }
            }
            Declaration::InputDecl { name, ty, .. } => {
                let resolved = self.resolve_type_expr(ty);
                self.env.bind_variable(name.clone(), resolved.clone());
                TypedDeclaration::InputDecl { name: name.clone(), ty: resolved }
            }
            Declaration::Assignment { name, expr, .. } => {
                let typed = self.check_expression(expr);
                self.env.bind_variable(name.clone(), typed.ty().clone());
                TypedDeclaration::Assignment { name: name.clone(), expr: typed }
            }
            Declaration::OutputDecl { name, .. } => TypedDeclaration::OutputDecl { name: name.clone() },
            Declaration::UseDecl { namespace, span } => {
                if !self.env.registry.namespaces().contains(namespace) {
                    self.errors.push(CheckError::UndefinedNamespace { name: namespace.clone(), span: *span });
                } else {
                    self.env.import_namespace(namespace.clone());
                }
                TypedDeclaration::UseDecl { namespace: namespace.clone() }
            }
        }
    }

    fn resolve_type_expr(&mut self, ty: &TypeExpr) -> SemanticType {
        match ty {
            TypeExpr::Named(name, span) => self.resolve_named_type(name, *span),
            TypeExpr::Record(fields, _) => {
                SemanticType::record(fields.iter().map(|(n, t)| (n.clone(), self.resolve_type_expr(t))).collect())
            }
            TypeExpr::List(inner, _) => SemanticType::list(self.resolve_type_expr(inner)),
            TypeExpr::Candidates(inner, _) => SemanticType::candidates(self.resolve_type_expr(inner)),
            TypeExpr::Optional(inner, _) => SemanticType::optional(self.resolve_type_expr(inner)),
            TypeExpr::MapTy(k, v, _) => SemanticType::SMap(Box::new(self.resolve_type_expr(k)), Box::new(self.resolve_type_expr(v))),
            TypeExpr::Merge(l, r, span) => {
                let lt = self.resolve_type_expr(l);
                let rt = self.resolve_type_expr(r);
                match merge_types(&lt, &rt, *span) {
                    Ok(ty) => ty,
                    Err(e) => {
                        self.errors.push(CheckError::IncompatibleMerge { left: e.left, right: e.right, span: *span });
                        SemanticType::SNothing
                    }
                }
            }
        }
    }

    fn resolve_named_type(&mut self, name: &str, span: flowc_base::Span) -> SemanticType {
        match name {
            "String" => SemanticType::SString,
            "Int" => SemanticType::SInt,
            "Float" => SemanticType::SFloat,
            "Boolean" => SemanticType::SBoolean,
            other => self.env.lookup_type(other).cloned().unwrap_or_else(|| {
                self.errors.push(CheckError::UndefinedType { name: other.to_string(), span });
                SemanticType::SNothing
            }),
        }
    }

    fn check_expression(&mut self, expr: &Expression) -> TypedExpression {
        match expr {
            Expression::VarRef(name, span) => match self.env.lookup_variable(name).cloned() {
                Some(ty) => TypedExpression::VarRef { name: name.clone(), ty, span: *span },
                None => {
                    self.errors.push(CheckError::UndefinedVariable { name: name.clone(), span: *span });
                    TypedExpression::VarRef { name: name.clone(), ty: SemanticType::SNothing, span: *span }
                }
            },
            Expression::Literal(lit, span) => {
                let ty = match lit {
                    Literal::Int(_) => SemanticType::SInt,
                    Literal::Float(_) => SemanticType::SFloat,
                    Literal::Str(_) => SemanticType::SString,
                    Literal::Bool(_) => SemanticType::SBoolean,
                };
                TypedExpression::Literal { value: lit.clone(), ty, span: *span }
            }
            Expression::FunctionCall { name, args, with_opts, span } => self.check_call(name, args, with_opts, *span),
            Expression::Merge(l, r, span) => {
                let tl = self.check_expression(l);
                let tr = self.check_expression(r);
                let ty = match merge_types(tl.ty(), tr.ty(), *span) {
                    Ok(ty) => ty,
                    Err(e) => {
                        self.errors.push(CheckError::IncompatibleMerge { left: e.left, right: e.right, span: *span });
                        SemanticType::SNothing
                    }
                };
                TypedExpression::Merge { left: Box::new(tl), right: Box::new(tr), ty, span: *span }
            }
            Expression::Projection { source, fields, span } => self.check_projection(source, fields, *span),
            Expression::FieldAccess { source, field, span } => self.check_field_access(source, field, *span),
            Expression::Conditional { cond, then_branch, else_branch, span } => {
                let tc = self.check_expression(cond);
                self.require_boolean(&tc);
                let tt = self.check_expression(then_branch);
                let te = self.check_expression(else_branch);
                let ty = if tt.ty() == te.ty() {
                    tt.ty().clone()
                } else {
                    self.errors.push(CheckError::TypeMismatch { expected: tt.ty().clone(), actual: te.ty().clone(), span: *span });
                    SemanticType::SNothing
                };
                TypedExpression::Conditional { cond: Box::new(tc), then_branch: Box::new(tt), else_branch: Box::new(te), ty, span: *span }
            }
            Expression::BoolBinary { op, left, right, span } => {
                let tl = self.check_expression(left);
                self.require_boolean(&tl);
                let tr = self.check_expression(right);
                self.require_boolean(&tr);
                TypedExpression::BoolBinary { op: *op, left: Box::new(tl), right: Box::new(tr), ty: SemanticType::SBoolean, span: *span }
            }
            Expression::Not(operand, span) => {
                let to = self.check_expression(operand);
                self.require_boolean(&to);
                TypedExpression::Not { operand: Box::new(to), ty: SemanticType::SBoolean, span: *span }
            }
            Expression::Guard { expr, cond, span } => {
                let te = self.check_expression(expr);
                let tc = self.check_expression(cond);
                self.require_boolean(&tc);
                let ty = SemanticType::optional(te.ty().clone());
                TypedExpression::Guard { expr: Box::new(te), cond: Box::new(tc), ty, span: *span }
            }
            Expression::Coalesce(l, r, span) => self.check_coalesce(l, r, *span),
            Expression::Equality(l, r, span) => {
                let tl = self.check_expression(l);
                let tr = self.check_expression(r);
                if !is_subtype(tl.ty(), tr.ty()) && !is_subtype(tr.ty(), tl.ty()) {
                    self.errors.push(CheckError::TypeMismatch { expected: tl.ty().clone(), actual: tr.ty().clone(), span: *span });
                }
                TypedExpression::Equality { left: Box::new(tl), right: Box::new(tr), ty: SemanticType::SBoolean, span: *span }
            }
            Expression::Branch { cases, otherwise, span } => {
                let typed_cases: Vec<(TypedExpression, TypedExpression)> = cases
                    .iter()
                    .map(|(c, b)| {
                        let tc = self.check_expression(c);
                        self.require_boolean(&tc);
                        let tb = self.check_expression(b);
                        (tc, tb)
                    })
                    .collect();
                let typed_otherwise = self.check_expression(otherwise);
                let mut ty = typed_otherwise.ty().clone();
                for (_, body) in &typed_cases {
                    ty = lub(&ty, body.ty());
                }
                TypedExpression::Branch { cases: typed_cases, otherwise: Box::new(typed_otherwise), ty, span: *span }
            }
            Expression::StringInterpolation { parts, span } => {
                let typed_parts = parts
                    .iter()
                    .map(|p| match p {
                        flowc_parser::ast::StringPart::Text(t) => TypedStringPart::Text(t.clone()),
                        flowc_parser::ast::StringPart::Expr(e) => TypedStringPart::Expr(self.check_expression(e)),
                    })
                    .collect();
                TypedExpression::StringInterpolation { parts: typed_parts, ty: SemanticType::SString, span: *span }
            }
            Expression::ListLiteral(items, span) => {
                let typed_items: Vec<TypedExpression> = items.iter().map(|i| self.check_expression(i)).collect();
                let elem_types: Vec<SemanticType> = typed_items.iter().map(|i| i.ty().clone()).collect();
                let ty = SemanticType::list(common_type(&elem_types));
                TypedExpression::ListLiteral { items: typed_items, ty, span: *span }
            }
            Expression::RecordLiteral(fields, span) => {
                let typed_fields: Vec<(String, TypedExpression)> =
                    fields.iter().map(|(n, e)| (n.clone(), self.check_expression(e))).collect();
                let ty = SemanticType::record(typed_fields.iter().map(|(n, e)| (n.clone(), e.ty().clone())).collect());
                TypedExpression::RecordLiteral { fields: typed_fields, ty, span: *span }
            }
            Expression::Lambda { params, body, span } => {
                self.errors.push(CheckError::InvalidLambdaContext { span: *span });
                let typed_body = self.check_expression(body);
                TypedExpression::Lambda {
                    params: params.iter().map(|p| (p.clone(), SemanticType::SNothing)).collect(),
                    body: Box::new(typed_body),
                    ty: SemanticType::SNothing,
                    span: *span,
                }
            }
            Expression::Match { scrutinee, cases, span } => self.check_match(scrutinee, cases, *span),
        }
    }

    fn require_boolean(&mut self, typed: &TypedExpression) {
        if typed.ty() != &SemanticType::SBoolean {
            self.errors.push(CheckError::TypeMismatch { expected: SemanticType::SBoolean, actual: typed.ty().clone(), span: typed.span() });
        }
    }

    fn check_coalesce(&mut self, l: &Expression, r: &Expression, span: flowc_base::Span) -> TypedExpression {
        let tl = self.check_expression(l);
        let tr = self.check_expression(r);
        let ty = match tl.ty().clone() {
            SemanticType::SOptional(inner) => {
                if is_subtype(tr.ty(), &inner) {
                    *inner
                } else if tr.ty() == &SemanticType::optional((*inner).clone()) {
                    SemanticType::optional(*inner)
                } else {
                    self.errors.push(CheckError::TypeMismatch { expected: (*inner).clone(), actual: tr.ty().clone(), span });
                    *inner
                }
            }
            other => {
                self.errors.push(CheckError::TypeMismatch { expected: SemanticType::optional(other.clone()), actual: other.clone(), span });
                other
            }
        };
        TypedExpression::Coalesce { left: Box::new(tl), right: Box::new(tr), ty, span }
    }

    fn check_projection(&mut self, source: &Expression, fields: &[String], span: flowc_base::Span) -> TypedExpression {
        let typed_source = self.check_expression(source);
        let source_ty = typed_source.ty().clone();

        let (record_fields, wrap): (Option<Vec<(String, SemanticType)>>, Option<fn(SemanticType) -> SemanticType>) = match &source_ty {
            SemanticType::SRecord(fields) => (Some(fields.clone()), None),
            SemanticType::SCandidates(inner) if inner.is_record() => {
                (inner.as_record_fields().map(|f| f.to_vec()), Some(SemanticType::candidates as fn(SemanticType) -> SemanticType))
            }
            SemanticType::SList(inner) if inner.is_record() => {
                (inner.as_record_fields().map(|f| f.to_vec()), Some(SemanticType::list as fn(SemanticType) -> SemanticType))
            }
            _ => (None, None),
        };

        let ty = match record_fields {
            None => {
                self.errors.push(CheckError::InvalidProjection { field: fields.first().cloned().unwrap_or_default(), available: Vec::new(), span });
                SemanticType::SNothing
            }
            Some(available_fields) => {
                let available: Vec<String> = available_fields.iter().map(|(n, _)| n.clone()).collect();
                let mut selected = Vec::new();
                let mut missing = None;
                for f in fields {
                    match available_fields.iter().find(|(n, _)| n == f) {
                        Some((_, t)) => selected.push((f.clone(), t.clone())),
                        None => {
                            missing = Some(f.clone());
                            break;
                        }
                    }
                }
                match missing {
                    Some(f) => {
                        self.errors.push(CheckError::InvalidProjection { field: f, available, span });
                        SemanticType::SNothing
                    }
                    None => {
                        let record = SemanticType::record(selected);
                        match wrap {
                            Some(wrap_fn) => wrap_fn(record),
                            None => record,
                        }
                    }
                }
            }
        };

        TypedExpression::Projection { source: Box::new(typed_source), fields: fields.to_vec(), ty, span }
    }

    fn check_field_access(&mut self, source: &Expression, field: &str, span: flowc_base::Span) -> TypedExpression {
        let typed_source = self.check_expression(source);
        let ty = match typed_source.ty().as_record_fields() {
            Some(fields) => match fields.iter().find(|(n, _)| n == field) {
                Some((_, t)) => t.clone(),
                None => {
                    let available = fields.iter().map(|(n, _)| n.clone()).collect();
                    self.errors.push(CheckError::InvalidFieldAccess { field: field.to_string(), available, span });
                    SemanticType::SNothing
                }
            },
            None => {
                self.errors.push(CheckError::InvalidFieldAccess { field: field.to_string(), available: Vec::new(), span });
                SemanticType::SNothing
            }
        };
        TypedExpression::FieldAccess { source: Box::new(typed_source), field: field.to_string(), ty, span }
    }

    fn resolve_function(&mut self, name: &str, span: flowc_base::Span) -> Option<FunctionSignature> {
        if name.contains('.') {
            let sig = self.env.registry.lookup_qualified(name);
            if sig.is_none() {
                self.errors.push(CheckError::UndefinedFunction { name: name.to_string(), span });
            }
            sig
        } else {
            let candidates: Vec<FunctionSignature> = self
                .env
                .registry
                .lookup_simple(name)
                .into_iter()
                .filter(|s| s.namespace.as_ref().map_or(true, |ns| self.env.imported_namespaces.contains(ns)))
                .collect();
            match candidates.len() {
                0 => {
                    self.errors.push(CheckError::UndefinedFunction { name: name.to_string(), span });
                    None
                }
                1 => candidates.into_iter().next(),
                _ => {
                    let names = candidates.iter().map(|s| s.qualified_name()).collect();
                    self.errors.push(CheckError::AmbiguousFunction { name: name.to_string(), candidates: names, span });
                    None
                }
            }
        }
    }

    fn check_call(&mut self, name: &str, args: &[Expression], with_opts: &[OptionEntry], span: flowc_base::Span) -> TypedExpression {
        let Some(sig) = self.resolve_function(name, span) else {
            for a in args {
                self.check_expression(a);
            }
            return TypedExpression::FunctionCall {
                signature: FunctionSignature::new(name, Vec::new(), SemanticType::SNothing, ""),
                args: Vec::new(),
                options: Vec::new(),
                ty: SemanticType::SNothing,
                span,
            };
        };

        if args.len() != sig.params.len() {
            self.errors.push(CheckError::ArityMismatch { expected: sig.params.len(), actual: args.len(), span });
        }

        let mut typed_args = Vec::with_capacity(args.len());
        for (i, arg) in args.iter().enumerate() {
            let param_ty = sig.params.get(i).map(|(_, t)| t.clone());
            match (&param_ty, arg) {
                (Some(pty), Expression::Lambda { params, body, span: lspan }) => {
                    typed_args.push(self.check_lambda_arg(params, body, pty, *lspan));
                }
                _ => {
                    let typed = self.check_expression(arg);
                    if let Some(pty) = &param_ty {
                        if !is_subtype(typed.ty(), pty) {
                            self.errors.push(CheckError::TypeMismatch { expected: pty.clone(), actual: typed.ty().clone(), span: typed.span() });
                        }
                    }
                    typed_args.push(typed);
                }
            }
        }

        let options = with_opts.iter().map(|o| self.check_option_entry(o, &sig)).collect();
        let ty = sig.returns.clone();
        TypedExpression::FunctionCall { signature: sig, args: typed_args, options, ty, span }
    }

    fn check_lambda_arg(&mut self, params: &[String], body: &Expression, expected: &SemanticType, span: flowc_base::Span) -> TypedExpression {
        match expected.desugared().clone() {
            SemanticType::SFunction(ptypes, ret) => {
                if ptypes.len() != params.len() {
                    self.errors.push(CheckError::ArityMismatch { expected: ptypes.len(), actual: params.len(), span });
                }
                let bindings: Vec<(String, SemanticType)> = params.iter().cloned().zip(ptypes.into_iter()).collect();
                let saved = self.env.push_bindings(&bindings);
                let typed_body = self.check_expression(body);
                self.env.pop_bindings(saved);
                if !is_subtype(typed_body.ty(), &ret) {
                    self.errors.push(CheckError::TypeMismatch { expected: (*ret).clone(), actual: typed_body.ty().clone(), span: typed_body.span() });
                }
                let ty = SemanticType::function(bindings.iter().map(|(_, t)| t.clone()).collect(), (*ret).clone());
                TypedExpression::Lambda { params: bindings, body: Box::new(typed_body), ty, span }
            }
            _ => {
                self.errors.push(CheckError::InvalidLambdaContext { span });
                let typed_body = self.check_expression(body);
                TypedExpression::Lambda {
                    params: params.iter().map(|p| (p.clone(), SemanticType::SNothing)).collect(),
                    body: Box::new(typed_body),
                    ty: SemanticType::SNothing,
                    span,
                }
            }
        }
    }

    fn check_option_entry(&mut self, opt: &OptionEntry, sig: &FunctionSignature) -> TypedOptionEntry {
        let value = match &opt.value {
            OptionValue::Expr(e) => {
                let typed = self.check_expression(e);
                if opt.name == "fallback" && !is_subtype(typed.ty(), &sig.returns) {
                    self.errors.push(CheckError::TypeMismatch { expected: sig.returns.clone(), actual: typed.ty().clone(), span: typed.span() });
                }
                TypedOptionValue::Expr(Box::new(typed))
            }
            OptionValue::Int(v) => TypedOptionValue::Int(*v),
            OptionValue::Duration(v) => TypedOptionValue::Duration(*v),
            OptionValue::Ident(s) => TypedOptionValue::Ident(s.clone()),
            OptionValue::Bool(b) => TypedOptionValue::Bool(*b),
            OptionValue::Throttle(a, b) => TypedOptionValue::Throttle(*a, *b),
            OptionValue::Window(w) => TypedOptionValue::Window(w.clone()),
            OptionValue::Join(j) => TypedOptionValue::Join(j.clone()),
        };
        TypedOptionEntry { name: opt.name.clone(), value, span: opt.span }
    }

    fn check_match(&mut self, scrutinee: &Expression, cases: &[flowc_parser::ast::MatchCase], span: flowc_base::Span) -> TypedExpression {
        let typed_scrutinee = self.check_expression(scrutinee);
        let scrutinee_ty = typed_scrutinee.ty().clone();
        let mut typed_cases = Vec::with_capacity(cases.len());

        for case in cases {
            match &case.pattern {
                Pattern::Record(fields, pspan) => {
                    let bindings = self.resolve_record_pattern_fields(&scrutinee_ty, fields, *pspan);
                    let saved = self.env.push_bindings(&bindings);
                    let body = self.check_expression(&case.body);
                    self.env.pop_bindings(saved);
                    typed_cases.push(TypedMatchCase { pattern: TypedPattern::Record { fields: bindings, span: *pspan }, body });
                }
                Pattern::TypeTest(name, pspan) => {
                    let ty = self.resolve_named_type(name, *pspan);
                    let body = self.check_expression(&case.body);
                    typed_cases.push(TypedMatchCase { pattern: TypedPattern::TypeTest { type_name: name.clone(), ty, span: *pspan }, body });
                }
                Pattern::Wildcard(pspan) => {
                    let body = self.check_expression(&case.body);
                    typed_cases.push(TypedMatchCase { pattern: TypedPattern::Wildcard { span: *pspan }, body });
                }
            }
        }

        let case_types: Vec<SemanticType> = typed_cases.iter().map(|c| c.body.ty().clone()).collect();
        let ty = common_type(&case_types);

        TypedExpression::Match { scrutinee: Box::new(typed_scrutinee), cases: typed_cases, ty, span }
    }

    /// Locates a record shape (possibly behind a union) exposing every
    /// requested field and returns their bindings; for a union, any member
    /// whose fields are a superset of `requested` is used (runtime pattern
    /// matching narrows which member actually matched).
    fn resolve_record_pattern_fields(&mut self, ty: &SemanticType, requested: &[String], span: flowc_base::Span) -> Vec<(String, SemanticType)> {
        let candidates: Vec<SemanticType> = match ty.desugared() {
            SemanticType::SUnion(members) => members.clone(),
            other => vec![other.clone()],
        };

        for cand in &candidates {
            if let Some(fields) = cand.as_record_fields() {
                if requested.iter().all(|r| fields.iter().any(|(n, _)| n == r)) {
                    return requested
                        .iter()
                        .map(|r| (r.clone(), fields.iter().find(|(n, _)| n == r).unwrap().1.clone()))
                        .collect();
                }
            }
        }

        let available: Vec<String> =
            candidates.iter().filter_map(|c| c.as_record_fields()).flatten().map(|(n, _)| n.clone()).collect();
        self.errors.push(CheckError::InvalidFieldAccess { field: requested.first().cloned().unwrap_or_default(), available, span });
        requested.iter().map(|r| (r.clone(), SemanticType::SNothing)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowc_parser::parse;

    fn registry_with_test_module() -> FunctionRegistry {
        let reg = FunctionRegistry::new();
        reg.register(FunctionSignature::new("TestModule", vec![("x".into(), SemanticType::SInt)], SemanticType::SInt, "TestModule"));
        reg.register(FunctionSignature::new("add", vec![("a".into(), SemanticType::SInt), ("b".into(), SemanticType::SInt)], SemanticType::SInt, "Add"));
        reg
    }

    fn check(src: &str, reg: &FunctionRegistry) -> (TypedPipeline, Vec<CheckError>) {
        let pipeline = parse(src).unwrap();
        check_pipeline(&pipeline, reg)
    }

    #[test]
    fn happy_path_has_no_errors() {
        let reg = registry_with_test_module();
        let (_, errors) = check("in x: Int\nresult = TestModule(x) with retry: 3\nout result", &reg);
        assert!(errors.is_empty(), "{:?}", errors);
    }

    #[test]
    fn undefined_variable_reports_error() {
        let reg = FunctionRegistry::new();
        let (_, errors) = check("in customer: String\nout custmer", &reg);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], CheckError::UndefinedVariable { .. }));
    }

    #[test]
    fn record_merge_and_projection_types_correctly() {
        let reg = FunctionRegistry::new();
        let src = "in user: { id: Int, name: String }\nin extra: { email: String }\nfull = user + extra\npicked = full[id, email]\nout picked";
        let (typed, errors) = check(src, &reg);
        assert!(errors.is_empty(), "{:?}", errors);
        match typed.declarations.last().unwrap() {
            TypedDeclaration::Assignment { expr, .. } => {
                assert_eq!(expr.ty(), &SemanticType::record(vec![("id".into(), SemanticType::SInt), ("email".into(), SemanticType::SString)]));
            }
            other => panic!("unexpected declaration: {:?}", other),
        }
    }

    #[test]
    fn match_on_union_binds_record_fields() {
        let reg = FunctionRegistry::new();
        let src = r#"
            type R = { kind: String, value: Int }
            in r: R
            x = match r {
                { kind, value } -> value;
                _ -> 0
            }
            out x
        "#;
        let (typed, errors) = check(src, &reg);
        assert!(errors.is_empty(), "{:?}", errors);
        match typed.declarations.last().unwrap() {
            TypedDeclaration::Assignment { expr, .. } => assert_eq!(expr.ty(), &SemanticType::SInt),
            other => panic!("unexpected declaration: {:?}", other),
        }
    }

    #[test]
    fn ambiguous_function_reports_candidates() {
        let reg = FunctionRegistry::new();
        reg.register(FunctionSignature::new("round", vec![("x".into(), SemanticType::SFloat)], SemanticType::SInt, "M").with_namespace("math"));
        reg.register(FunctionSignature::new("round", vec![("x".into(), SemanticType::SFloat)], SemanticType::SInt, "C").with_namespace("currency"));
        let src = "use math\nuse currency\nin x: Float\ny = round(x)\nout y";
        let (_, errors) = check(src, &reg);
        assert!(errors.iter().any(|e| matches!(e, CheckError::AmbiguousFunction { .. })));
    }

    #[test]
    fn bare_lambda_outside_call_is_invalid() {
        let reg = FunctionRegistry::new();
        let (_, errors) = check("in x: Int\ny = \\z -> z\nout y", &reg);
        assert!(errors.iter().any(|e| matches!(e, CheckError::InvalidLambdaContext { .. })));
    }

    #[test]
    fn lambda_argument_to_higher_order_call_typechecks() {
        let reg = FunctionRegistry::new();
        reg.register(FunctionSignature::new(
            "filter",
            vec![("source".into(), SemanticType::list(SemanticType::SInt)), ("pred".into(), SemanticType::function(vec![SemanticType::SInt], SemanticType::SBoolean))],
            SemanticType::list(SemanticType::SInt),
            "HigherOrder.Filter",
        ));
        let src = "in xs: List<Int>\ny = filter(xs, \\n -> n == 1)\nout y";
        let (_, errors) = check(src, &reg);
        assert!(errors.is_empty(), "{:?}", errors);
    }
}
