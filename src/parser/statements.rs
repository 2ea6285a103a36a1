//! Declarations and statements: var, print, blocks, if, while, for.

use crate::ast::*;
use crate::lexer::TokenKind;

use super::core::{ParseResult, Parser};

impl Parser {
    pub(crate) fn declaration(&mut self) -> ParseResult<Stmt> {
        if self.check(&TokenKind::Var) {
            self.var_declaration()
        } else {
            self.statement()
        }
    }

    pub(crate) fn statement(&mut self) -> ParseResult<Stmt> {
        self.nested("Statement", Self::statement_inner)
    }

    fn statement_inner(&mut self) -> ParseResult<Stmt> {
        if self.check(&TokenKind::Print) {
            self.print_statement()
        } else if self.check(&TokenKind::If) {
            self.if_statement()
        } else if self.check(&TokenKind::While) {
            self.while_statement()
        } else if self.check(&TokenKind::For) {
            self.for_statement()
        } else if self.check(&TokenKind::LeftBrace) {
            self.block_statement()
        } else {
            self.expression_statement()
        }
    }

    fn var_declaration(&mut self) -> ParseResult<Stmt> {
        let start_span = self.current_span();
        self.expect(&TokenKind::Var)?;

        let type_annotation = self.type_annotation();
        let name = self.expect_identifier()?;

        let initializer = if self.match_token(&TokenKind::Equal) {
            Some(self.expression()?)
        } else {
            None
        };

        self.expect(&TokenKind::Semicolon)?;
        let span = start_span.merge(&self.previous_span());

        Ok(Stmt::new(
            StmtKind::Var {
                name,
                type_annotation,
                initializer,
            },
            span,
        ))
    }

    fn type_annotation(&mut self) -> Option<TypeAnnotation> {
        let kind = match self.peek().kind {
            TokenKind::Int => TypeKind::Int,
            TokenKind::Float => TypeKind::Float,
            TokenKind::Bool => TypeKind::Bool,
            _ => return None,
        };
        let token = self.advance();
        Some(TypeAnnotation::new(kind, token.span))
    }

    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let start_span = self.current_span();
        self.expect(&TokenKind::Print)?;
        let value = self.expression()?;
        self.expect(&TokenKind::Semicolon)?;
        let span = start_span.merge(&self.previous_span());

        Ok(Stmt::new(StmtKind::Print(value), span))
    }

    fn if_statement(&mut self) -> ParseResult<Stmt> {
        let start_span = self.current_span();
        self.expect(&TokenKind::If)?;

        self.expect(&TokenKind::LeftParen)?;
        let condition = self.expression()?;
        self.expect(&TokenKind::RightParen)?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.match_token(&TokenKind::Else) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };
        let span = start_span.merge(&self.previous_span());

        Ok(Stmt::new(
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            },
            span,
        ))
    }

    fn while_statement(&mut self) -> ParseResult<Stmt> {
        let start_span = self.current_span();
        self.expect(&TokenKind::While)?;

        self.expect(&TokenKind::LeftParen)?;
        let condition = self.expression()?;
        self.expect(&TokenKind::RightParen)?;

        let body = Box::new(self.statement()?);
        let span = start_span.merge(&self.previous_span());

        Ok(Stmt::new(StmtKind::While { condition, body }, span))
    }

    /// for i in limit body
    fn for_statement(&mut self) -> ParseResult<Stmt> {
        let start_span = self.current_span();
        self.expect(&TokenKind::For)?;

        let variable = self.expect_identifier()?;
        self.expect(&TokenKind::In)?;
        let limit = self.expression()?;

        let body = Box::new(self.statement()?);
        let span = start_span.merge(&self.previous_span());

        Ok(Stmt::new(
            StmtKind::For {
                variable,
                limit,
                body,
            },
            span,
        ))
    }

    fn block_statement(&mut self) -> ParseResult<Stmt> {
        let start_span = self.current_span();
        self.expect(&TokenKind::LeftBrace)?;

        let mut statements = Vec::new();
        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration_or_recover() {
                statements.push(stmt);
            }
        }

        self.expect(&TokenKind::RightBrace)?;
        let span = start_span.merge(&self.previous_span());

        Ok(Stmt::new(StmtKind::Block(statements), span))
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let start_span = self.current_span();
        let expr = self.expression()?;
        self.expect(&TokenKind::Semicolon)?;
        let span = start_span.merge(&self.previous_span());

        Ok(Stmt::new(StmtKind::Expression(expr), span))
    }
}
