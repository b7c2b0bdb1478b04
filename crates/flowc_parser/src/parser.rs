//! Recursive-descent parser: token stream → [`Pipeline`] AST
//! (`spec.md` §4.3, §6).
//!
//! Precedence, lowest to highest binding:
//! `when` guard < `??` coalesce (right-assoc) < `or` < `and` < `==` equality
//! < `+` merge < `not` (unary) < postfix (`[...]` projection, `.field`
//! access) < primary. The exact relative order of `and`/`or`/`not` against
//! `==`/`??`/`+` is not pinned down by the language description; this
//! ordering is a deliberate choice, recorded in `DESIGN.md`.

use crate::ast::*;
use crate::lexer::Lexer;
use crate::token::{StringChunk, Token, TokenKind};
use flowc_base::{SpannedError, Span};

pub fn parse(source: &str) -> Result<Pipeline, Vec<SpannedError>> {
    let tokens = Lexer::new(source).tokenize()?;
    Parser::new(tokens).parse_pipeline().map_err(|e| vec![e])
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

type PResult<T> = Result<T, SpannedError>;

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn peek_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn prev_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].span
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(kind)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> PResult<Token> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            Err(SpannedError::new(
                format!("expected {:?}, found {:?}", kind, self.peek()),
                self.peek_span(),
            ))
        }
    }

    fn expect_ident(&mut self) -> PResult<(String, Span)> {
        match self.peek().clone() {
            TokenKind::Ident(name) => {
                let span = self.peek_span();
                self.advance();
                Ok((name, span))
            }
            other => Err(SpannedError::new(format!("expected identifier, found {:?}", other), self.peek_span())),
        }
    }

    // ---- top level ---------------------------------------------------

    fn parse_pipeline(&mut self) -> PResult<Pipeline> {
        let mut declarations = Vec::new();
        let mut outputs = Vec::new();

        while !self.check(&TokenKind::Eof) {
            match self.peek().clone() {
                TokenKind::Type => declarations.push(self.parse_type_def()?),
                TokenKind::In => declarations.push(self.parse_input_decl()?),
                TokenKind::Use => declarations.push(self.parse_use_decl()?),
                TokenKind::Out => {
                    let (name, span) = self.parse_out_decl()?;
                    outputs.push((name.clone(), span));
                    declarations.push(Declaration::OutputDecl { name, span });
                }
                TokenKind::Ident(_) => declarations.push(self.parse_assignment()?),
                other => return Err(SpannedError::new(format!("unexpected token at top level: {:?}", other), self.peek_span())),
            }
        }

        Ok(Pipeline { declarations, outputs })
    }

    fn parse_type_def(&mut self) -> PResult<Declaration> {
        let start = self.expect(TokenKind::Type)?.span;
        let (name, _) = self.expect_ident()?;
        self.expect(TokenKind::Equals)?;
        let ty = self.parse_type_expr()?;
        let span = start.merge(ty.span());
        Ok(Declaration::TypeDef { name, ty, span })
    }

    fn parse_input_decl(&mut self) -> PResult<Declaration> {
        let start = self.expect(TokenKind::In)?.span;
        let (name, _) = self.expect_ident()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type_expr()?;
        let span = start.merge(ty.span());
        Ok(Declaration::InputDecl { name, ty, span })
    }

    fn parse_use_decl(&mut self) -> PResult<Declaration> {
        let start = self.expect(TokenKind::Use)?.span;
        let (namespace, ns_span) = self.expect_ident()?;
        Ok(Declaration::UseDecl { namespace, span: start.merge(ns_span) })
    }

    fn parse_out_decl(&mut self) -> PResult<(String, Span)> {
        let start = self.expect(TokenKind::Out)?.span;
        let (name, name_span) = self.expect_ident()?;
        Ok((name, start.merge(name_span)))
    }

    fn parse_assignment(&mut self) -> PResult<Declaration> {
        let (name, start) = self.expect_ident()?;
        self.expect(TokenKind::Equals)?;
        let expr = self.parse_expression()?;
        let span = start.merge(expr.span());
        Ok(Declaration::Assignment { name, expr, span })
    }

    // ---- types ---------------------------------------------------------

    fn parse_type_expr(&mut self) -> PResult<TypeExpr> {
        let mut left = self.parse_type_primary()?;
        while self.eat(&TokenKind::Plus) {
            let right = self.parse_type_primary()?;
            let span = left.span().merge(right.span());
            left = TypeExpr::Merge(Box::new(left), Box::new(right), span);
        }
        Ok(left)
    }

    fn parse_type_primary(&mut self) -> PResult<TypeExpr> {
        match self.peek().clone() {
            TokenKind::LBrace => self.parse_record_type(),
            TokenKind::Ident(name) => {
                let start = self.peek_span();
                self.advance();
                match name.as_str() {
                    "List" | "Candidates" | "Optional" => {
                        self.expect(TokenKind::Lt)?;
                        let inner = self.parse_type_expr()?;
                        let end = self.expect(TokenKind::Gt)?.span;
                        let span = start.merge(end);
                        Ok(match name.as_str() {
                            "List" => TypeExpr::List(Box::new(inner), span),
                            "Candidates" => TypeExpr::Candidates(Box::new(inner), span),
                            _ => TypeExpr::Optional(Box::new(inner), span),
                        })
                    }
                    "Map" => {
                        self.expect(TokenKind::Lt)?;
                        let key = self.parse_type_expr()?;
                        self.expect(TokenKind::Comma)?;
                        let value = self.parse_type_expr()?;
                        let end = self.expect(TokenKind::Gt)?.span;
                        Ok(TypeExpr::MapTy(Box::new(key), Box::new(value), start.merge(end)))
                    }
                    _ => Ok(TypeExpr::Named(name, start)),
                }
            }
            other => Err(SpannedError::new(format!("expected type, found {:?}", other), self.peek_span())),
        }
    }

    fn parse_record_type(&mut self) -> PResult<TypeExpr> {
        let start = self.expect(TokenKind::LBrace)?.span;
        let mut fields = Vec::new();
        if !self.check(&TokenKind::RBrace) {
            loop {
                let (name, _) = self.expect_ident()?;
                self.expect(TokenKind::Colon)?;
                let ty = self.parse_type_expr()?;
                fields.push((name, ty));
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        let end = self.expect(TokenKind::RBrace)?.span;
        Ok(TypeExpr::Record(fields, start.merge(end)))
    }

    // ---- expressions -----------------------------------------------------

    fn parse_expression(&mut self) -> PResult<Expression> {
        self.parse_guard_expr()
    }

    fn parse_guard_expr(&mut self) -> PResult<Expression> {
        let expr = self.parse_coalesce_expr()?;
        if self.eat(&TokenKind::When) {
            let cond = self.parse_coalesce_expr()?;
            let span = expr.span().merge(cond.span());
            Ok(Expression::Guard { expr: Box::new(expr), cond: Box::new(cond), span })
        } else {
            Ok(expr)
        }
    }

    fn parse_coalesce_expr(&mut self) -> PResult<Expression> {
        let left = self.parse_or_expr()?;
        if self.eat(&TokenKind::Coalesce) {
            let right = self.parse_coalesce_expr()?; // right-associative
            let span = left.span().merge(right.span());
            Ok(Expression::Coalesce(Box::new(left), Box::new(right), span))
        } else {
            Ok(left)
        }
    }

    fn parse_or_expr(&mut self) -> PResult<Expression> {
        let mut left = self.parse_and_expr()?;
        while self.eat(&TokenKind::Or) {
            let right = self.parse_and_expr()?;
            let span = left.span().merge(right.span());
            left = Expression::BoolBinary { op: BoolOp::Or, left: Box::new(left), right: Box::new(right), span };
        }
        Ok(left)
    }

    fn parse_and_expr(&mut self) -> PResult<Expression> {
        let mut left = self.parse_equality_expr()?;
        while self.eat(&TokenKind::And) {
            let right = self.parse_equality_expr()?;
            let span = left.span().merge(right.span());
            left = Expression::BoolBinary { op: BoolOp::And, left: Box::new(left), right: Box::new(right), span };
        }
        Ok(left)
    }

    fn parse_equality_expr(&mut self) -> PResult<Expression> {
        let left = self.parse_merge_expr()?;
        if self.eat(&TokenKind::EqEq) {
            let right = self.parse_merge_expr()?;
            let span = left.span().merge(right.span());
            Ok(Expression::Equality(Box::new(left), Box::new(right), span))
        } else {
            Ok(left)
        }
    }

    fn parse_merge_expr(&mut self) -> PResult<Expression> {
        let mut left = self.parse_unary_expr()?;
        while self.eat(&TokenKind::Plus) {
            let right = self.parse_unary_expr()?;
            let span = left.span().merge(right.span());
            left = Expression::Merge(Box::new(left), Box::new(right), span);
        }
        Ok(left)
    }

    fn parse_unary_expr(&mut self) -> PResult<Expression> {
        if self.check(&TokenKind::Not) {
            let start = self.advance().span;
            let operand = self.parse_unary_expr()?;
            let span = start.merge(operand.span());
            Ok(Expression::Not(Box::new(operand), span))
        } else {
            self.parse_postfix_expr()
        }
    }

    fn parse_postfix_expr(&mut self) -> PResult<Expression> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek().clone() {
                TokenKind::LBracket => {
                    self.advance();
                    let mut fields = Vec::new();
                    if !self.check(&TokenKind::RBracket) {
                        loop {
                            let (name, _) = self.expect_ident()?;
                            fields.push(name);
                            if !self.eat(&TokenKind::Comma) {
                                break;
                            }
                        }
                    }
                    let end = self.expect(TokenKind::RBracket)?.span;
                    let span = expr.span().merge(end);
                    expr = Expression::Projection { source: Box::new(expr), fields, span };
                }
                TokenKind::Dot => {
                    self.advance();
                    let (field, field_span) = self.expect_ident()?;
                    let span = expr.span().merge(field_span);
                    expr = Expression::FieldAccess { source: Box::new(expr), field, span };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> PResult<Expression> {
        match self.peek().clone() {
            TokenKind::IntLit(v) => {
                let span = self.advance().span;
                Ok(Expression::Literal(Literal::Int(v), span))
            }
            TokenKind::FloatLit(v) => {
                let span = self.advance().span;
                Ok(Expression::Literal(Literal::Float(v), span))
            }
            TokenKind::BoolLit(v) => {
                let span = self.advance().span;
                Ok(Expression::Literal(Literal::Bool(v), span))
            }
            TokenKind::StringLit(chunks) => {
                let span = self.advance().span;
                self.build_string_expr(chunks, span)
            }
            TokenKind::Ident(name) => {
                let start = self.peek_span();
                self.advance();
                if self.check(&TokenKind::LParen) {
                    self.parse_call(name, start)
                } else {
                    Ok(Expression::VarRef(name, start))
                }
            }
            TokenKind::If => self.parse_conditional(),
            TokenKind::LBracket => self.parse_list_literal(),
            TokenKind::LBrace => self.parse_record_literal(),
            TokenKind::Backslash => self.parse_lambda(),
            TokenKind::Match => self.parse_match(),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            other => Err(SpannedError::new(format!("unexpected token in expression: {:?}", other), self.peek_span())),
        }
    }

    fn build_string_expr(&self, chunks: Vec<StringChunk>, span: Span) -> PResult<Expression> {
        if chunks.len() == 1 {
            if let StringChunk::Text(text) = &chunks[0] {
                return Ok(Expression::Literal(Literal::Str(text.clone()), span));
            }
        }
        let mut parts = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            match chunk {
                StringChunk::Text(text) => parts.push(StringPart::Text(text)),
                StringChunk::Interp(src) => {
                    let sub_tokens = Lexer::new(&src).tokenize().map_err(|mut errs| errs.remove(0))?;
                    let mut sub_parser = Parser::new(sub_tokens);
                    let expr = sub_parser.parse_expression()?;
                    parts.push(StringPart::Expr(expr));
                }
            }
        }
        Ok(Expression::StringInterpolation { parts, span })
    }

    fn parse_call(&mut self, name: String, start: Span) -> PResult<Expression> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        let mut end = self.expect(TokenKind::RParen)?.span;

        let mut with_opts = Vec::new();
        if self.eat(&TokenKind::With) {
            loop {
                let (opt_name, opt_start) = self.expect_ident()?;
                self.expect(TokenKind::Colon)?;
                let value = self.parse_option_value(&opt_name)?;
                let opt_end = self.prev_span();
                let opt_span = opt_start.merge(opt_end);
                end = opt_span;
                with_opts.push(OptionEntry { name: opt_name, value, span: opt_span });
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }

        Ok(Expression::FunctionCall { name, args, with_opts, span: start.merge(end) })
    }

    fn parse_option_value(&mut self, name: &str) -> PResult<OptionValue> {
        match name {
            "fallback" => Ok(OptionValue::Expr(Box::new(self.parse_expression()?))),
            "throttle" => {
                let count = self.expect_int()?;
                self.expect(TokenKind::Slash)?;
                let window = self.expect_duration()?;
                Ok(OptionValue::Throttle(count as u64, window))
            }
            "window" => self.parse_window_value(),
            "join" => self.parse_join_value(),
            _ => self.parse_scalar_option_value(),
        }
    }

    fn parse_scalar_option_value(&mut self) -> PResult<OptionValue> {
        match self.peek().clone() {
            TokenKind::DurationLit(ms) => {
                self.advance();
                Ok(OptionValue::Duration(ms))
            }
            TokenKind::IntLit(v) => {
                self.advance();
                Ok(OptionValue::Int(v))
            }
            TokenKind::BoolLit(v) => {
                self.advance();
                Ok(OptionValue::Bool(v))
            }
            TokenKind::Ident(s) => {
                self.advance();
                Ok(OptionValue::Ident(s))
            }
            TokenKind::StringLit(chunks) => {
                self.advance();
                let text = chunks
                    .into_iter()
                    .map(|c| match c {
                        StringChunk::Text(t) => t,
                        StringChunk::Interp(t) => t,
                    })
                    .collect();
                Ok(OptionValue::Ident(text))
            }
            other => Err(SpannedError::new(format!("invalid option value: {:?}", other), self.peek_span())),
        }
    }

    fn parse_window_value(&mut self) -> PResult<OptionValue> {
        let (kind, _) = self.expect_ident()?;
        self.expect(TokenKind::LParen)?;
        let spec = match kind.as_str() {
            "tumbling" => WindowSpec::Tumbling(self.expect_duration()?),
            "sliding" => {
                let size = self.expect_duration()?;
                self.expect(TokenKind::Comma)?;
                let slide = self.expect_duration()?;
                WindowSpec::Sliding(size, slide)
            }
            "count" => WindowSpec::Count(self.expect_int()? as u64),
            other => return Err(SpannedError::new(format!("unknown window kind '{}'", other), self.prev_span())),
        };
        self.expect(TokenKind::RParen)?;
        Ok(OptionValue::Window(spec))
    }

    fn parse_join_value(&mut self) -> PResult<OptionValue> {
        let (kind, _) = self.expect_ident()?;
        let spec = match kind.as_str() {
            "combine-latest" => JoinSpec::CombineLatest,
            "zip" => JoinSpec::Zip,
            "buffer" => {
                self.expect(TokenKind::LParen)?;
                let d = self.expect_duration()?;
                self.expect(TokenKind::RParen)?;
                JoinSpec::Buffer(d)
            }
            other => return Err(SpannedError::new(format!("unknown join kind '{}'", other), self.prev_span())),
        };
        Ok(OptionValue::Join(spec))
    }

    fn expect_int(&mut self) -> PResult<i64> {
        match self.peek().clone() {
            TokenKind::IntLit(v) => {
                self.advance();
                Ok(v)
            }
            other => Err(SpannedError::new(format!("expected integer, found {:?}", other), self.peek_span())),
        }
    }

    fn expect_duration(&mut self) -> PResult<u64> {
        match self.peek().clone() {
            TokenKind::DurationLit(ms) => {
                self.advance();
                Ok(ms)
            }
            other => Err(SpannedError::new(format!("expected duration, found {:?}", other), self.peek_span())),
        }
    }

    /// Parses `if c1 then e1 (elif c2 then e2)* else eN`. A single arm
    /// parses directly to a `Conditional`; two or more arms parse to a
    /// `Branch` whose `cases` are the `(cond, then)` pairs and whose
    /// `otherwise` is the final `else` body — matching the typed AST's
    /// distinct `Conditional` vs `Branch` shapes (`spec.md` §3) rather than
    /// deriving `Branch` later from nested `Conditional`s.
    fn parse_conditional(&mut self) -> PResult<Expression> {
        let start = self.expect(TokenKind::If)?.span;

        let cond = self.parse_expression()?;
        self.expect(TokenKind::Then)?;
        let then_branch = self.parse_expression()?;
        let mut arms = vec![(cond, then_branch)];

        while self.eat(&TokenKind::Elif) {
            let cond = self.parse_expression()?;
            self.expect(TokenKind::Then)?;
            let then_branch = self.parse_expression()?;
            arms.push((cond, then_branch));
        }

        self.expect(TokenKind::Else)?;
        let otherwise = self.parse_expression()?;
        let span = start.merge(otherwise.span());

        if arms.len() == 1 {
            let (cond, then_branch) = arms.into_iter().next().unwrap();
            Ok(Expression::Conditional { cond: Box::new(cond), then_branch: Box::new(then_branch), else_branch: Box::new(otherwise), span })
        } else {
            Ok(Expression::Branch { cases: arms, otherwise: Box::new(otherwise), span })
        }
    }

    fn parse_list_literal(&mut self) -> PResult<Expression> {
        let start = self.expect(TokenKind::LBracket)?.span;
        let mut items = Vec::new();
        if !self.check(&TokenKind::RBracket) {
            loop {
                items.push(self.parse_expression()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        let end = self.expect(TokenKind::RBracket)?.span;
        Ok(Expression::ListLiteral(items, start.merge(end)))
    }

    fn parse_record_literal(&mut self) -> PResult<Expression> {
        let start = self.expect(TokenKind::LBrace)?.span;
        let mut fields = Vec::new();
        if !self.check(&TokenKind::RBrace) {
            loop {
                let (name, _) = self.expect_ident()?;
                self.expect(TokenKind::Colon)?;
                let value = self.parse_expression()?;
                fields.push((name, value));
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        let end = self.expect(TokenKind::RBrace)?.span;
        Ok(Expression::RecordLiteral(fields, start.merge(end)))
    }

    fn parse_lambda(&mut self) -> PResult<Expression> {
        let start = self.expect(TokenKind::Backslash)?.span;
        let mut params = Vec::new();
        loop {
            let (name, _) = self.expect_ident()?;
            params.push(name);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Arrow)?;
        let body = self.parse_expression()?;
        let span = start.merge(body.span());
        Ok(Expression::Lambda { params, body: Box::new(body), span })
    }

    fn parse_match(&mut self) -> PResult<Expression> {
        let start = self.expect(TokenKind::Match)?.span;
        let scrutinee = self.parse_postfix_expr()?;
        self.expect(TokenKind::LBrace)?;
        let mut cases = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            let pattern = self.parse_pattern()?;
            self.expect(TokenKind::Arrow)?;
            let body = self.parse_expression()?;
            cases.push(MatchCase { pattern, body });
            if !self.eat(&TokenKind::Semicolon) {
                break;
            }
        }
        let end = self.expect(TokenKind::RBrace)?.span;
        Ok(Expression::Match { scrutinee: Box::new(scrutinee), cases, span: start.merge(end) })
    }

    fn parse_pattern(&mut self) -> PResult<Pattern> {
        match self.peek().clone() {
            TokenKind::Underscore => {
                let span = self.advance().span;
                Ok(Pattern::Wildcard(span))
            }
            TokenKind::LBrace => {
                let start = self.advance().span;
                let mut fields = Vec::new();
                if !self.check(&TokenKind::RBrace) {
                    loop {
                        let (name, _) = self.expect_ident()?;
                        fields.push(name);
                        if !self.eat(&TokenKind::Comma) {
                            break;
                        }
                    }
                }
                let end = self.expect(TokenKind::RBrace)?.span;
                Ok(Pattern::Record(fields, start.merge(end)))
            }
            TokenKind::Ident(name) => {
                let span = self.advance().span;
                Ok(Pattern::TypeTest(name, span))
            }
            other => Err(SpannedError::new(format!("expected pattern, found {:?}", other), self.peek_span())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(src: &str) -> Pipeline {
        parse(src).unwrap_or_else(|e| panic!("parse error: {:?}", e))
    }

    #[test]
    fn parses_input_and_output() {
        let p = parse_ok("in x: Int\nout x");
        assert_eq!(p.declarations.len(), 2);
        assert_eq!(p.outputs.len(), 1);
    }

    #[test]
    fn parses_record_type_and_assignment() {
        let p = parse_ok("type Event = { kind: String, amount: Float }\nin e: Event\ny = e[kind]\nout y");
        assert_eq!(p.declarations.len(), 4);
    }

    #[test]
    fn parses_function_call_with_options() {
        let p = parse_ok("in x: Int\ny = transform(x) with retry: 3, timeout: 30s\nout y");
        match &p.declarations[1] {
            Declaration::Assignment { expr: Expression::FunctionCall { with_opts, .. }, .. } => {
                assert_eq!(with_opts.len(), 2);
            }
            other => panic!("unexpected declaration: {:?}", other),
        }
    }

    #[test]
    fn parses_plain_if_as_conditional() {
        let p = parse_ok("in x: Int\ny = if x == 1 then 1 else 2\nout y");
        assert!(matches!(
            p.declarations[1],
            Declaration::Assignment { expr: Expression::Conditional { .. }, .. }
        ));
    }

    #[test]
    fn parses_if_elif_else_chain_as_branch() {
        let p = parse_ok("in x: Int\ny = if x == 1 then 1 elif x == 2 then 2 else 3\nout y");
        match &p.declarations[1] {
            Declaration::Assignment { expr: Expression::Branch { cases, .. }, .. } => {
                assert_eq!(cases.len(), 2);
            }
            other => panic!("unexpected declaration: {:?}", other),
        }
    }

    #[test]
    fn parses_guard_and_coalesce() {
        let p = parse_ok("in x: Int\nin y: Int\nz = x when y == 1\nw = x ?? y\nout z");
        assert!(matches!(
            p.declarations[2],
            Declaration::Assignment { expr: Expression::Guard { .. }, .. }
        ));
        assert!(matches!(
            p.declarations[3],
            Declaration::Assignment { expr: Expression::Coalesce(..), .. }
        ));
    }

    #[test]
    fn parses_match_with_record_and_wildcard_patterns() {
        let src = r#"
            in e: String
            y = match e {
                { kind, value } -> value;
                _ -> "none"
            }
            out y
        "#;
        let p = parse_ok(src);
        match &p.declarations[1] {
            Declaration::Assignment { expr: Expression::Match { cases, .. }, .. } => {
                assert_eq!(cases.len(), 2);
                assert!(matches!(cases[0].pattern, Pattern::Record(..)));
                assert!(matches!(cases[1].pattern, Pattern::Wildcard(_)));
            }
            other => panic!("unexpected declaration: {:?}", other),
        }
    }

    #[test]
    fn parses_string_interpolation() {
        let p = parse_ok(r#"in name: String
            greeting = "hi ${name}!"
            out greeting"#);
        match &p.declarations[1] {
            Declaration::Assignment { expr: Expression::StringInterpolation { parts, .. }, .. } => {
                assert_eq!(parts.len(), 3);
            }
            other => panic!("unexpected declaration: {:?}", other),
        }
    }

    #[test]
    fn parses_lambda_argument() {
        let p = parse_ok("in xs: List<Int>\ny = filter(xs, \\x -> x == 1)\nout y");
        match &p.declarations[1] {
            Declaration::Assignment { expr: Expression::FunctionCall { args, .. }, .. } => {
                assert!(matches!(args[1], Expression::Lambda { .. }));
            }
            other => panic!("unexpected declaration: {:?}", other),
        }
    }
}
