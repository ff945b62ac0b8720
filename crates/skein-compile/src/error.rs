//! Error types for routing.

use skein_ir::{IrError, QubitId};
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that abort routing.
///
/// Local search failures (a segment that does not fit, a deepening round
/// that finds nothing) are ordinary control flow and never surface here.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// No coupling map in the property set.
    #[error("Coupling map is required for routing")]
    MissingCouplingMap,

    /// A pass needs segments that no earlier pass produced.
    #[error("Segments are required but no segmentation pass has run")]
    MissingSegments,

    /// More logical qubits than the target has physical qubits.
    #[error("Circuit requires {required} qubits but target only has {available}")]
    CircuitTooLarge {
        /// Logical qubits used by the circuit.
        required: u32,
        /// Physical qubits of the target.
        available: u32,
    },

    /// Malformed coupling map description.
    #[error("Invalid coupling map: {0}")]
    InvalidCouplingMap(String),

    /// A single gate could not be mapped: the topology cannot host it.
    #[error("Cannot map gate {position} ('{gate}') onto the coupling graph")]
    SegmentationStalled {
        /// Position of the gate.
        position: usize,
        /// Rendered gate.
        gate: String,
    },

    /// A qubit must cross between disconnected parts of the coupling graph.
    #[error("{qubit} cannot move from physical qubit {from} to {to}: no path in coupling graph")]
    UnreachableQubit {
        /// The logical qubit.
        qubit: QubitId,
        /// Its current physical qubit.
        from: u32,
        /// The physical qubit it must reach.
        to: u32,
    },

    /// Swap planning needs every logical qubit placed before the transition.
    #[error("{qubit} has no physical qubit before swap planning")]
    UnplacedQubit {
        /// The logical qubit.
        qubit: QubitId,
    },

    /// A routed result violates a routing invariant.
    #[error("Verification failed: {0}")]
    VerificationFailed(String),

    /// IR error.
    #[error("IR error: {0}")]
    Ir(#[from] IrError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for routing operations.
pub type CompileResult<T> = Result<T, CompileError>;
