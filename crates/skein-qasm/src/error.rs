//! Error types for the QASM reader.

use thiserror::Error;

/// Errors that can occur during parsing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Lexer error (invalid token).
    #[error("Lexer error at line {line}: {message}")]
    LexerError { line: usize, message: String },

    /// Unexpected token.
    #[error("Unexpected token at line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: String,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input: {0}")]
    UnexpectedEof(String),

    /// Invalid version.
    #[error("Invalid OPENQASM version: {0} (only 2.x is supported)")]
    InvalidVersion(String),

    /// Undefined identifier.
    #[error("Undefined register: {0}")]
    UndefinedIdentifier(String),

    /// Duplicate declaration.
    #[error("Duplicate declaration: {0}")]
    DuplicateDeclaration(String),

    /// Gate with more than two qubit operands.
    #[error("Gate '{gate}' at line {line} has {got} qubit operands; at most 2 are supported")]
    UnsupportedArity { gate: String, line: usize, got: usize },

    /// Statement outside the supported subset.
    #[error("Unsupported statement at line {line}: {what}")]
    Unsupported { line: usize, what: String },

    /// Index out of bounds.
    #[error("Index {index} out of bounds for register '{register}' of size {size}")]
    IndexOutOfBounds {
        register: String,
        index: u64,
        size: u32,
    },

    /// Routed circuit that cannot be written out.
    #[error("Cannot emit routed circuit: {0}")]
    Emit(String),

    /// IR error during dependency graph construction.
    #[error("Circuit error: {0}")]
    CircuitError(#[from] skein_ir::IrError),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
