//! Binding powers for the Pratt expression parser.

use crate::lexer::TokenKind;

/// Precedence levels, loosest first. Derived `Ord` follows declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    None,
    Assignment,
    Or,
    And,
    Equality,
    Comparison,
    Term,
    Factor,
    Unary,
    Primary,
}

const LEVELS: [Precedence; 10] = [
    Precedence::None,
    Precedence::Assignment,
    Precedence::Or,
    Precedence::And,
    Precedence::Equality,
    Precedence::Comparison,
    Precedence::Term,
    Precedence::Factor,
    Precedence::Unary,
    Precedence::Primary,
];

impl Precedence {
    /// The level one step tighter; the right operand of a left-associative
    /// operator is parsed at this level.
    pub fn tighter(self) -> Precedence {
        LEVELS
            .get(self as usize + 1)
            .copied()
            .unwrap_or(Precedence::Primary)
    }

    /// Infix binding power of a token. `None` ends the current expression.
    pub fn of(kind: &TokenKind) -> Precedence {
        match kind {
            TokenKind::Equal => Precedence::Assignment,
            TokenKind::Or => Precedence::Or,
            TokenKind::And => Precedence::And,
            TokenKind::EqualEqual | TokenKind::BangEqual => Precedence::Equality,
            TokenKind::Less
            | TokenKind::LessEqual
            | TokenKind::Greater
            | TokenKind::GreaterEqual => Precedence::Comparison,
            TokenKind::Plus | TokenKind::Minus => Precedence::Term,
            TokenKind::Star | TokenKind::Slash => Precedence::Factor,
            _ => Precedence::None,
        }
    }
}
