//! Error types for every phase of the pipeline.

pub mod reporter;

pub use reporter::{CollectingReporter, ConsoleReporter, ErrorReporter};

use crate::span::Span;
use thiserror::Error;

/// Lexer errors.
#[derive(Debug, Error)]
pub enum LexerError {
    #[error("Unexpected character '{0}' at {1}")]
    UnexpectedChar(char, Span),

    #[error("Unterminated string at {0}")]
    UnterminatedString(Span),

    #[error("Invalid number '{0}' at {1}")]
    InvalidNumber(String, Span),
}

impl LexerError {
    pub fn unexpected_char(c: char, span: Span) -> Self {
        Self::UnexpectedChar(c, span)
    }

    pub fn unterminated_string(span: Span) -> Self {
        Self::UnterminatedString(span)
    }

    pub fn invalid_number(s: String, span: Span) -> Self {
        Self::InvalidNumber(s, span)
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedChar(_, span) => *span,
            Self::UnterminatedString(span) => *span,
            Self::InvalidNumber(_, span) => *span,
        }
    }
}

/// Parser errors.
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("Unexpected token '{found}', expected {expected} at {span}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("Invalid assignment target at {0}")]
    InvalidAssignmentTarget(Span),

    #[error("{message} at {span}")]
    General { message: String, span: Span },
}

impl ParserError {
    pub fn unexpected_token(
        expected: impl Into<String>,
        found: impl Into<String>,
        span: Span,
    ) -> Self {
        Self::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            span,
        }
    }

    pub fn invalid_assignment_target(span: Span) -> Self {
        Self::InvalidAssignmentTarget(span)
    }

    pub fn general(message: impl Into<String>, span: Span) -> Self {
        Self::General {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. } => *span,
            Self::InvalidAssignmentTarget(span) => *span,
            Self::General { span, .. } => *span,
        }
    }
}

impl From<LexerError> for ParserError {
    fn from(err: LexerError) -> Self {
        Self::General {
            message: err.to_string(),
            span: err.span(),
        }
    }
}

/// Static scope errors found before compilation.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Cannot read local variable '{name}' in its own initializer at {span}")]
    SelfReferentialInitializer { name: String, span: Span },

    #[error("Variable '{name}' is already declared in this scope at {span}")]
    Redeclared { name: String, span: Span },
}

impl ResolveError {
    pub fn self_referential(name: impl Into<String>, span: Span) -> Self {
        Self::SelfReferentialInitializer {
            name: name.into(),
            span,
        }
    }

    pub fn redeclared(name: impl Into<String>, span: Span) -> Self {
        Self::Redeclared {
            name: name.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::SelfReferentialInitializer { span, .. } => *span,
            Self::Redeclared { span, .. } => *span,
        }
    }
}

/// Bytecode compilation errors. Any of these aborts the compilation unit.
#[derive(Debug, Error, PartialEq)]
pub enum CompileError {
    #[error("Too many constants in one chunk")]
    TooManyConstants { line: usize },

    #[error("Too many local variables in scope")]
    TooManyLocals { line: usize },

    #[error("Jump distance {distance} exceeds 65535 bytes")]
    JumpTooFar { distance: usize, line: usize },
}

impl CompileError {
    pub fn line(&self) -> usize {
        match self {
            Self::TooManyConstants { line } => *line,
            Self::TooManyLocals { line } => *line,
            Self::JumpTooFar { line, .. } => *line,
        }
    }
}

/// Runtime errors raised by the VM.
#[derive(Debug, Error, PartialEq)]
pub enum RuntimeError {
    #[error("Type error: {message}")]
    TypeError { message: String, line: usize },

    #[error("Undefined variable '{name}'")]
    UndefinedVariable { name: String, line: usize },

    #[error("Instruction budget of {limit} exhausted")]
    BudgetExhausted { limit: u64, line: usize },

    #[error("Internal error: stack overflow")]
    StackOverflow { line: usize },

    #[error("Internal error: stack underflow")]
    StackUnderflow { line: usize },

    #[error("Internal error: {message}")]
    MalformedBytecode { message: String, line: usize },
}

impl RuntimeError {
    pub fn type_error(message: impl Into<String>, line: usize) -> Self {
        Self::TypeError {
            message: message.into(),
            line,
        }
    }

    pub fn undefined_variable(name: impl Into<String>, line: usize) -> Self {
        Self::UndefinedVariable {
            name: name.into(),
            line,
        }
    }

    pub fn malformed(message: impl Into<String>, line: usize) -> Self {
        Self::MalformedBytecode {
            message: message.into(),
            line,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            Self::TypeError { line, .. } => *line,
            Self::UndefinedVariable { line, .. } => *line,
            Self::BudgetExhausted { line, .. } => *line,
            Self::StackOverflow { line } => *line,
            Self::StackUnderflow { line } => *line,
            Self::MalformedBytecode { line, .. } => *line,
        }
    }

    /// Faults are VM invariant violations rather than errors in the user's program.
    pub fn is_fault(&self) -> bool {
        matches!(
            self,
            Self::StackOverflow { .. } | Self::StackUnderflow { .. } | Self::MalformedBytecode { .. }
        )
    }
}

/// Unified error type for the whole pipeline.
#[derive(Debug, Error)]
pub enum FerruleError {
    #[error("Lexer error: {0}")]
    Lexer(#[from] LexerError),

    #[error("Parser error: {0}")]
    Parser(#[from] ParserError),

    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FerruleError {
    /// Source line the error is attributed to, when it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Lexer(e) => Some(e.span().line),
            Self::Parser(e) => Some(e.span().line),
            Self::Resolve(e) => Some(e.span().line),
            Self::Compile(e) => Some(e.line()),
            Self::Runtime(e) => Some(e.line()),
            Self::Io(_) => None,
        }
    }

    pub fn is_runtime(&self) -> bool {
        matches!(self, Self::Runtime(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexer_error_converts_to_parser_error() {
        let err: ParserError = LexerError::unterminated_string(Span::new(3, 9, 2, 4)).into();
        assert_eq!(err.span().line, 2);
        assert!(err.to_string().contains("Unterminated string"));
    }

    #[test]
    fn test_runtime_error_faults() {
        assert!(RuntimeError::StackOverflow { line: 1 }.is_fault());
        assert!(RuntimeError::malformed("bad opcode", 1).is_fault());
        assert!(!RuntimeError::type_error("nope", 1).is_fault());
        assert!(!RuntimeError::undefined_variable("x", 1).is_fault());
    }

    #[test]
    fn test_unified_error_line() {
        let err: FerruleError = CompileError::TooManyLocals { line: 12 }.into();
        assert_eq!(err.line(), Some(12));
        let err: FerruleError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.line(), None);
    }
}
