//! Expression parsing using Pratt precedence.

use crate::ast::*;
use crate::error::ParserError;
use crate::lexer::TokenKind;
use crate::span::Span;

use super::core::{ParseResult, Parser};
use super::precedence::Precedence;

impl Parser {
    pub(crate) fn expression(&mut self) -> ParseResult<Expr> {
        self.parse_precedence(Precedence::Assignment)
    }

    pub(crate) fn parse_precedence(&mut self, min_precedence: Precedence) -> ParseResult<Expr> {
        self.nested("Expression", |parser| parser.parse_operands(min_precedence))
    }

    fn parse_operands(&mut self, min_precedence: Precedence) -> ParseResult<Expr> {
        let mut left = self.parse_prefix()?;

        while !self.is_at_end() {
            let precedence = Precedence::of(&self.peek().kind);
            if precedence < min_precedence || precedence == Precedence::None {
                break;
            }

            left = self.parse_infix(left, precedence)?;
        }

        Ok(left)
    }

    fn parse_prefix(&mut self) -> ParseResult<Expr> {
        let token = self.advance();
        let start_span = token.span;

        match &token.kind {
            TokenKind::NumberLiteral(n) => Ok(Expr::new(ExprKind::NumberLiteral(*n), start_span)),
            TokenKind::StringLiteral(s) => {
                Ok(Expr::new(ExprKind::StringLiteral(s.clone()), start_span))
            }
            TokenKind::BoolLiteral(b) => Ok(Expr::new(ExprKind::BoolLiteral(*b), start_span)),
            TokenKind::Nil => Ok(Expr::new(ExprKind::Nil, start_span)),

            TokenKind::Identifier(name) => {
                Ok(Expr::new(ExprKind::Variable(name.clone()), start_span))
            }

            TokenKind::LeftParen => {
                let expr = self.expression()?;
                self.expect(&TokenKind::RightParen)?;
                let span = start_span.merge(&self.previous_span());
                Ok(Expr::new(ExprKind::Grouping(Box::new(expr)), span))
            }

            TokenKind::Minus => self.unary_expr(UnaryOp::Negate, start_span),
            TokenKind::Bang => self.unary_expr(UnaryOp::Not, start_span),

            kind if kind.is_reserved() => Err(ParserError::general(
                format!("'{}' is reserved and cannot be used yet", kind),
                start_span,
            )),

            kind => Err(ParserError::unexpected_token(
                "expression",
                format!("{}", kind),
                start_span,
            )),
        }
    }

    fn unary_expr(&mut self, operator: UnaryOp, start_span: Span) -> ParseResult<Expr> {
        let operand = self.parse_precedence(Precedence::Unary)?;
        let span = start_span.merge(&operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                operator,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    fn parse_infix(&mut self, left: Expr, precedence: Precedence) -> ParseResult<Expr> {
        let token = self.advance();

        if let Some(operator) = binary_operator(&token.kind) {
            return self.binary_expr(left, operator, precedence);
        }

        match &token.kind {
            TokenKind::And | TokenKind::Or => {
                let right = self.parse_precedence(precedence.tighter())?;
                let span = left.span.merge(&right.span);
                let (left, right) = (Box::new(left), Box::new(right));
                let kind = if token.kind == TokenKind::And {
                    ExprKind::LogicalAnd { left, right }
                } else {
                    ExprKind::LogicalOr { left, right }
                };
                Ok(Expr::new(kind, span))
            }

            // Right-associative: a = b = c
            TokenKind::Equal => {
                let value = self.parse_precedence(Precedence::Assignment)?;
                let span = left.span.merge(&value.span);

                if let ExprKind::Variable(name) = left.kind {
                    let value = Box::new(value);
                    return Ok(Expr::new(ExprKind::Assign { name, value }, span));
                }
                self.report(ParserError::invalid_assignment_target(token.span));
                Ok(value)
            }

            kind => Err(ParserError::unexpected_token(
                "operator",
                kind.to_string(),
                token.span,
            )),
        }
    }

    fn binary_expr(
        &mut self,
        left: Expr,
        operator: BinaryOp,
        precedence: Precedence,
    ) -> ParseResult<Expr> {
        let right = self.parse_precedence(precedence.tighter())?;
        let span = left.span.merge(&right.span);
        Ok(Expr::new(
            ExprKind::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            },
            span,
        ))
    }
}

fn binary_operator(kind: &TokenKind) -> Option<BinaryOp> {
    let op = match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Subtract,
        TokenKind::Star => BinaryOp::Multiply,
        TokenKind::Slash => BinaryOp::Divide,
        TokenKind::EqualEqual => BinaryOp::Equal,
        TokenKind::BangEqual => BinaryOp::NotEqual,
        TokenKind::Less => BinaryOp::Less,
        TokenKind::LessEqual => BinaryOp::LessEqual,
        TokenKind::Greater => BinaryOp::Greater,
        TokenKind::GreaterEqual => BinaryOp::GreaterEqual,
        _ => return None,
    };
    Some(op)
}
