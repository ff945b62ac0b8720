//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors raised while building or querying the gate dependency graph.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A two-qubit gate names the same qubit as control and target.
    #[error("Gate '{gate_name}' at position {position} uses {qubit} as both control and target")]
    ControlEqualsTarget {
        /// Name of the offending gate.
        gate_name: String,
        /// The repeated qubit.
        qubit: QubitId,
        /// Position of the gate in program order.
        position: usize,
    },

    /// A gate operand lies outside the declared qubit range.
    #[error(
        "Qubit {qubit} is out of range for {declared} declared qubits{}",
        format_gate_context(.gate_name)
    )]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Declared qubit count of the circuit.
        declared: u32,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Gate index outside the gate sequence.
    #[error("Gate index {index} is out of bounds for a sequence of {len} gates")]
    InvalidGateIndex {
        /// The requested index.
        index: usize,
        /// Length of the sequence.
        len: usize,
    },

    /// A layout assigns two logical qubits to one physical qubit.
    #[error("Physical qubit {physical} is already occupied by {occupant}")]
    PhysicalQubitOccupied {
        /// The contested physical qubit.
        physical: u32,
        /// The logical qubit already placed there.
        occupant: QubitId,
    },

    /// No free physical qubit is left for a logical qubit.
    #[error("No free physical qubit for {qubit} among {available}")]
    NoFreePhysicalQubit {
        /// The qubit left without a place.
        qubit: QubitId,
        /// Number of physical qubits.
        available: u32,
    },
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
