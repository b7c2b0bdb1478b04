//! Hand-written lexer: source text → token stream.
//!
//! Follows the same structure as the teacher workspace's own lexer (a
//! `Peekable` byte/char walk producing spanned tokens) generalized from
//! English vocabulary tokens to this language's smaller, symbolic grammar.

use crate::token::{keyword, StringChunk, Token, TokenKind};
use flowc_base::{SpannedError, Span};

pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    len: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            len: source.len(),
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, Vec<SpannedError>> {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();

        loop {
            self.skip_whitespace_and_comments();
            let Some(&(start, ch)) = self.chars.peek() else {
                tokens.push(Token::new(TokenKind::Eof, Span::new(self.len, self.len)));
                break;
            };

            let result = match ch {
                c if c.is_ascii_digit() => self.lex_number(start),
                c if is_ident_start(c) => self.lex_ident_or_keyword(start),
                '"' => self.lex_string(start),
                _ => self.lex_punctuation(start),
            };

            match result {
                Ok(tok) => tokens.push(tok),
                Err(e) => {
                    errors.push(e);
                    self.chars.next();
                }
            }
        }

        if errors.is_empty() {
            Ok(tokens)
        } else {
            Err(errors)
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.chars.peek() {
                Some(&(_, c)) if c.is_whitespace() => {
                    self.chars.next();
                }
                Some(&(_, '#')) => {
                    while let Some(&(_, c)) = self.chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.chars.next();
                    }
                }
                _ => break,
            }
        }
    }

    fn lex_ident_or_keyword(&mut self, start: usize) -> Result<Token, SpannedError> {
        let end = self.consume_while(is_ident_continue);
        let text = &self.source[start..end];
        let kind = keyword(text).unwrap_or_else(|| TokenKind::Ident(text.to_string()));
        Ok(Token::new(kind, Span::new(start, end)))
    }

    fn lex_number(&mut self, start: usize) -> Result<Token, SpannedError> {
        let mut end = self.consume_while(|c| c.is_ascii_digit());
        let mut is_float = false;

        if matches!(self.chars.peek(), Some(&(_, '.'))) {
            let mut lookahead = self.chars.clone();
            lookahead.next();
            if matches!(lookahead.peek(), Some((_, c)) if c.is_ascii_digit()) {
                is_float = true;
                self.chars.next();
                end = self.consume_while(|c| c.is_ascii_digit());
            }
        }

        if !is_float {
            if let Some(unit_end) = self.try_duration_unit() {
                let value: u64 = self.source[start..end].parse().map_err(|_| {
                    SpannedError::new("invalid duration magnitude", Span::new(start, end))
                })?;
                let unit = &self.source[end..unit_end];
                let ms = duration_to_ms(value, unit).ok_or_else(|| {
                    SpannedError::new(format!("unknown duration unit '{}'", unit), Span::new(end, unit_end))
                })?;
                return Ok(Token::new(TokenKind::DurationLit(ms), Span::new(start, unit_end)));
            }
        }

        let text = &self.source[start..end];
        let kind = if is_float {
            TokenKind::FloatLit(text.parse().map_err(|_| SpannedError::new("invalid float literal", Span::new(start, end)))?)
        } else {
            TokenKind::IntLit(text.parse().map_err(|_| SpannedError::new("invalid int literal", Span::new(start, end)))?)
        };
        Ok(Token::new(kind, Span::new(start, end)))
    }

    /// Peeks ahead for a duration unit suffix (`ms|s|min|h|d`) directly
    /// following digits, with no whitespace. Returns the end offset of the
    /// unit if present, without consuming on failure.
    fn try_duration_unit(&mut self) -> Option<usize> {
        const UNITS: &[&str] = &["ms", "min", "s", "h", "d"];
        for unit in UNITS {
            let mut lookahead = self.chars.clone();
            let mut matched = true;
            for expected in unit.chars() {
                match lookahead.next() {
                    Some((_, c)) if c == expected => {}
                    _ => {
                        matched = false;
                        break;
                    }
                }
            }
            if matched {
                // Must not be followed by another identifier character
                // (so `5side` isn't misread as `5s` + `ide`).
                let boundary_ok = match lookahead.peek() {
                    Some(&(_, c)) => !is_ident_continue(c),
                    None => true,
                };
                if boundary_ok {
                    for _ in 0..unit.chars().count() {
                        self.chars.next();
                    }
                    let end = self.chars.peek().map(|&(i, _)| i).unwrap_or(self.len);
                    return Some(end);
                }
            }
        }
        None
    }

    fn lex_string(&mut self, start: usize) -> Result<Token, SpannedError> {
        self.chars.next(); // opening quote
        let mut chunks = Vec::new();
        let mut buf = String::new();

        loop {
            match self.chars.next() {
                None => return Err(SpannedError::new("unterminated string literal", Span::new(start, self.len))),
                Some((_, '"')) => break,
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, 'n')) => buf.push('\n'),
                    Some((_, 't')) => buf.push('\t'),
                    Some((_, '"')) => buf.push('"'),
                    Some((_, '\\')) => buf.push('\\'),
                    Some((pos, other)) => {
                        return Err(SpannedError::new(format!("invalid escape '\\{}'", other), Span::new(pos - 1, pos + 1)))
                    }
                    None => return Err(SpannedError::new("unterminated escape sequence", Span::new(start, self.len))),
                },
                Some((pos, '$')) if matches!(self.chars.peek(), Some(&(_, '{'))) => {
                    if !buf.is_empty() {
                        chunks.push(StringChunk::Text(std::mem::take(&mut buf)));
                    }
                    self.chars.next(); // `{`
                    let expr_start = pos + 2;
                    let mut depth = 1;
                    let mut expr_end = expr_start;
                    loop {
                        match self.chars.next() {
                            Some((i, '{')) => {
                                depth += 1;
                                expr_end = i + 1;
                            }
                            Some((i, '}')) => {
                                depth -= 1;
                                if depth == 0 {
                                    break;
                                }
                                expr_end = i + 1;
                            }
                            Some((i, _)) => expr_end = i + 1,
                            None => return Err(SpannedError::new("unterminated interpolation", Span::new(pos, self.len))),
                        }
                    }
                    chunks.push(StringChunk::Interp(self.source[expr_start..expr_end].to_string()));
                }
                Some((_, c)) => buf.push(c),
            }
        }

        if !buf.is_empty() || chunks.is_empty() {
            chunks.push(StringChunk::Text(buf));
        }

        let end = self.chars.peek().map(|&(i, _)| i).unwrap_or(self.len);
        Ok(Token::new(TokenKind::StringLit(chunks), Span::new(start, end)))
    }

    fn lex_punctuation(&mut self, start: usize) -> Result<Token, SpannedError> {
        let (_, c) = self.chars.next().unwrap();
        let kind = match c {
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '.' => TokenKind::Dot,
            '\\' => TokenKind::Backslash,
            '|' => TokenKind::Pipe,
            ';' => TokenKind::Semicolon,
            '/' => TokenKind::Slash,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            '_' if !matches!(self.chars.peek(), Some(&(_, c)) if is_ident_continue(c)) => TokenKind::Underscore,
            '+' => TokenKind::Plus,
            '?' => {
                if matches!(self.chars.peek(), Some(&(_, '?'))) {
                    self.chars.next();
                    TokenKind::Coalesce
                } else {
                    TokenKind::Question
                }
            }
            '=' => {
                if matches!(self.chars.peek(), Some(&(_, '='))) {
                    self.chars.next();
                    TokenKind::EqEq
                } else {
                    TokenKind::Equals
                }
            }
            '-' => {
                if matches!(self.chars.peek(), Some(&(_, '>'))) {
                    self.chars.next();
                    TokenKind::Arrow
                } else {
                    return Err(SpannedError::new("unexpected '-'", Span::new(start, start + 1)));
                }
            }
            other => return Err(SpannedError::new(format!("unexpected character '{}'", other), Span::new(start, start + 1))),
        };
        let end = self.chars.peek().map(|&(i, _)| i).unwrap_or(self.len);
        let end = if end > start + c.len_utf8() { start + c.len_utf8() } else { end.max(start + c.len_utf8()) };
        Ok(Token::new(kind, Span::new(start, end)))
    }

    fn consume_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let mut end = self.chars.peek().map(|&(i, _)| i).unwrap_or(self.len);
        while let Some(&(i, c)) = self.chars.peek() {
            if pred(c) {
                self.chars.next();
                end = i + c.len_utf8();
            } else {
                break;
            }
        }
        end
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Converts a duration magnitude+unit to whole milliseconds (`spec.md` §6).
pub fn duration_to_ms(value: u64, unit: &str) -> Option<u64> {
    match unit {
        "ms" => Some(value),
        "s" => Some(value * 1000),
        "min" => Some(value * 60_000),
        "h" => Some(value * 3_600_000),
        "d" => Some(value * 86_400_000),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src).tokenize().unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_keywords_and_identifiers() {
        let toks = kinds("in x out y");
        assert_eq!(
            toks,
            vec![
                TokenKind::In,
                TokenKind::Ident("x".into()),
                TokenKind::Out,
                TokenKind::Ident("y".into()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lexes_durations() {
        let toks = kinds("30s 5min 100ms 1h 1d");
        assert_eq!(
            toks,
            vec![
                TokenKind::DurationLit(30_000),
                TokenKind::DurationLit(300_000),
                TokenKind::DurationLit(100),
                TokenKind::DurationLit(3_600_000),
                TokenKind::DurationLit(86_400_000),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lexes_string_with_interpolation() {
        let toks = kinds(r#""hello ${name}!""#);
        match &toks[0] {
            TokenKind::StringLit(chunks) => {
                assert_eq!(
                    chunks,
                    &vec![
                        StringChunk::Text("hello ".into()),
                        StringChunk::Interp("name".into()),
                        StringChunk::Text("!".into()),
                    ]
                );
            }
            other => panic!("expected string literal, got {:?}", other),
        }
    }

    #[test]
    fn lexes_comment_to_end_of_line() {
        let toks = kinds("in x: Int # a comment\nout x");
        assert!(matches!(toks[0], TokenKind::In));
    }

    #[test]
    fn distinguishes_coalesce_from_question() {
        assert_eq!(kinds("a ?? b"), vec![TokenKind::Ident("a".into()), TokenKind::Coalesce, TokenKind::Ident("b".into()), TokenKind::Eof]);
    }

    #[test]
    fn rejects_unterminated_string() {
        let result = Lexer::new("\"unterminated").tokenize();
        assert!(result.is_err());
    }
}
