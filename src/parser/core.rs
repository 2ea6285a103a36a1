//! Core parser struct, error recovery and token helpers.

use crate::ast::*;
use crate::error::ParserError;
use crate::lexer::{Token, TokenKind};
use crate::span::Span;

pub type ParseResult<T> = Result<T, ParserError>;

/// Deepest allowed nesting of expressions and statements. Parsing, resolving
/// and compiling all recurse on the tree, so this bounds native stack use.
pub const MAX_NESTING: usize = 256;

/// The parser for Ferrule.
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) current: usize,
    pub(crate) errors: Vec<ParserError>,
    depth: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| &t.kind) != Some(&TokenKind::Eof) {
            let (pos, line) = tokens
                .last()
                .map(|t| (t.span.end, t.span.line))
                .unwrap_or((0, 1));
            tokens.push(Token::eof(pos, line, 0));
        }
        Self {
            tokens,
            current: 0,
            errors: Vec::new(),
            depth: 0,
        }
    }

    /// Parse a complete program, collecting every error instead of stopping at
    /// the first one.
    pub fn parse(&mut self) -> Result<Program, Vec<ParserError>> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if let Some(stmt) = self.declaration_or_recover() {
                statements.push(stmt);
            }
        }

        if self.errors.is_empty() {
            Ok(Program::new(statements))
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }

    // ===== Error recovery =====

    pub(crate) fn declaration_or_recover(&mut self) -> Option<Stmt> {
        let start = self.current;
        match self.declaration() {
            Ok(stmt) => Some(stmt),
            Err(err) => {
                self.errors.push(err);
                if self.current == start {
                    self.advance();
                }
                self.synchronize();
                None
            }
        }
    }

    /// Skip tokens until just after a `;` or just before something that can
    /// start a statement or close a block.
    pub(crate) fn synchronize(&mut self) {
        while !self.is_at_end() {
            if self.current > 0 && self.previous().kind == TokenKind::Semicolon {
                return;
            }
            if self.peek().kind.starts_statement() || self.check(&TokenKind::RightBrace) {
                return;
            }
            self.advance();
        }
    }

    /// Record an error without unwinding the current production.
    pub(crate) fn report(&mut self, err: ParserError) {
        self.errors.push(err);
    }

    /// Run `production` one nesting level deeper, failing once `MAX_NESTING`
    /// is reached.
    pub(crate) fn nested<T>(
        &mut self,
        what: &str,
        production: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.depth >= MAX_NESTING {
            return Err(ParserError::general(
                format!("{} nesting too deep", what),
                self.current_span(),
            ));
        }
        self.depth += 1;
        let result = production(self);
        self.depth -= 1;
        result
    }

    // ===== Token manipulation =====

    pub(crate) fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.tokens[self.current.saturating_sub(1)].clone()
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        if self.is_at_end() {
            false
        } else {
            std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
        }
    }

    pub(crate) fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: &TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParserError::unexpected_token(
                format!("'{}'", kind),
                format!("{}", self.peek().kind),
                self.current_span(),
            ))
        }
    }

    pub(crate) fn expect_identifier(&mut self) -> ParseResult<String> {
        match &self.peek().kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(ParserError::unexpected_token(
                "identifier",
                format!("{}", self.peek().kind),
                self.current_span(),
            )),
        }
    }

    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    pub(crate) fn previous_span(&self) -> Span {
        self.previous().span
    }
}
