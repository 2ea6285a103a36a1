//! Token definitions for the Ferrule lexer.

use crate::span::Span;

/// All token types in Ferrule.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    NumberLiteral(f64),
    StringLiteral(String),
    BoolLiteral(bool),

    Identifier(String),

    // Keywords
    And,
    Or,
    Var,
    Print,
    If,
    Else,
    While,
    For,
    In,
    Nil,

    // Reserved for future use; rejected by the parser
    Class,
    Fun,
    Return,
    Super,
    This,

    // Type keywords accepted in `var` declarations
    Int,
    Float,
    Bool,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Equal,
    EqualEqual,
    Bang,
    BangEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    // Delimiters
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Semicolon,

    Eof,
}

impl TokenKind {
    /// Check if this identifier is a keyword and return the corresponding kind.
    pub fn keyword(ident: &str) -> Option<TokenKind> {
        match ident {
            "and" => Some(TokenKind::And),
            "or" => Some(TokenKind::Or),
            "var" => Some(TokenKind::Var),
            "print" => Some(TokenKind::Print),
            "if" => Some(TokenKind::If),
            "else" => Some(TokenKind::Else),
            "while" => Some(TokenKind::While),
            "for" => Some(TokenKind::For),
            "in" => Some(TokenKind::In),
            "nil" => Some(TokenKind::Nil),
            "true" => Some(TokenKind::BoolLiteral(true)),
            "false" => Some(TokenKind::BoolLiteral(false)),
            "class" => Some(TokenKind::Class),
            "fun" => Some(TokenKind::Fun),
            "return" => Some(TokenKind::Return),
            "super" => Some(TokenKind::Super),
            "this" => Some(TokenKind::This),
            "int" => Some(TokenKind::Int),
            "float" => Some(TokenKind::Float),
            "bool" => Some(TokenKind::Bool),
            _ => None,
        }
    }

    /// Keywords that begin a statement; the parser resynchronizes on these.
    pub fn starts_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::Var
                | TokenKind::Print
                | TokenKind::If
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Class
                | TokenKind::Fun
                | TokenKind::Return
        )
    }

    pub fn is_reserved(&self) -> bool {
        matches!(
            self,
            TokenKind::Class | TokenKind::Fun | TokenKind::Return | TokenKind::Super | TokenKind::This
        )
    }

    /// Source spelling of a token with fixed text. Literal and identifier
    /// kinds have no single spelling and yield their category name.
    pub fn lexeme(&self) -> &'static str {
        match self {
            TokenKind::NumberLiteral(_) => "number",
            TokenKind::StringLiteral(_) => "string",
            TokenKind::BoolLiteral(true) => "true",
            TokenKind::BoolLiteral(false) => "false",
            TokenKind::Identifier(_) => "identifier",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Var => "var",
            TokenKind::Print => "print",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::For => "for",
            TokenKind::In => "in",
            TokenKind::Nil => "nil",
            TokenKind::Class => "class",
            TokenKind::Fun => "fun",
            TokenKind::Return => "return",
            TokenKind::Super => "super",
            TokenKind::This => "this",
            TokenKind::Int => "int",
            TokenKind::Float => "float",
            TokenKind::Bool => "bool",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Equal => "=",
            TokenKind::EqualEqual => "==",
            TokenKind::Bang => "!",
            TokenKind::BangEqual => "!=",
            TokenKind::Less => "<",
            TokenKind::LessEqual => "<=",
            TokenKind::Greater => ">",
            TokenKind::GreaterEqual => ">=",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Semicolon => ";",
            TokenKind::Eof => "EOF",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::NumberLiteral(n) => write!(f, "{}", n),
            TokenKind::StringLiteral(s) => write!(f, "\"{}\"", s),
            TokenKind::BoolLiteral(b) => write!(f, "{}", b),
            TokenKind::Identifier(s) => f.write_str(s),
            fixed => f.write_str(fixed.lexeme()),
        }
    }
}

/// A token with its kind and source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn eof(pos: usize, line: usize, column: usize) -> Self {
        Self {
            kind: TokenKind::Eof,
            span: Span::new(pos, pos, line, column),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_spelling_matches_lexeme() {
        for word in ["and", "or", "var", "print", "if", "else", "while", "for", "in", "nil", "true", "false", "fun"] {
            let kind = TokenKind::keyword(word).unwrap();
            assert_eq!(kind.lexeme(), word);
        }
        assert_eq!(TokenKind::keyword("variable"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(TokenKind::LeftBrace.to_string(), "{");
        assert_eq!(TokenKind::StringLiteral("hi".to_string()).to_string(), "\"hi\"");
        assert_eq!(TokenKind::Identifier("x".to_string()).to_string(), "x");
    }

    #[test]
    fn test_reserved_words() {
        assert!(TokenKind::Class.is_reserved());
        assert!(TokenKind::Fun.starts_statement());
        assert!(!TokenKind::Var.is_reserved());
    }
}
