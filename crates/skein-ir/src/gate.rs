//! Gate records as produced by a circuit reader.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::qubit::QubitId;

/// One gate operation in program order.
///
/// Only the operand structure matters to routing: an optional control and a
/// target. Everything else (the opcode, its parameter text, a classical
/// destination for measurements) is carried through untouched so the
/// compiled circuit can be written back out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateRecord {
    /// Opcode, e.g. `cx`, `h`, `measure`.
    pub name: String,
    /// Raw parameter text between the parentheses, e.g. `pi/2`.
    pub params: Option<String>,
    /// Control qubit of a two-qubit gate.
    pub control: Option<QubitId>,
    /// Target qubit (the only operand of a single-qubit gate).
    pub target: QubitId,
    /// Classical destination of a measurement, e.g. `c[0]`.
    pub classical: Option<String>,
}

impl GateRecord {
    /// Create a single-qubit gate.
    pub fn single(name: impl Into<String>, target: QubitId) -> Self {
        Self {
            name: name.into(),
            params: None,
            control: None,
            target,
            classical: None,
        }
    }

    /// Create a two-qubit gate.
    pub fn controlled(name: impl Into<String>, control: QubitId, target: QubitId) -> Self {
        Self {
            name: name.into(),
            params: None,
            control: Some(control),
            target,
            classical: None,
        }
    }

    /// Shorthand for `cx control, target`.
    pub fn cx(control: u32, target: u32) -> Self {
        Self::controlled("cx", QubitId(control), QubitId(target))
    }

    /// Attach parameter text.
    #[must_use]
    pub fn with_params(mut self, params: impl Into<String>) -> Self {
        self.params = Some(params.into());
        self
    }

    /// Attach a classical destination.
    #[must_use]
    pub fn with_classical(mut self, classical: impl Into<String>) -> Self {
        self.classical = Some(classical.into());
        self
    }

    /// Whether this gate acts on two qubits.
    #[inline]
    pub fn is_two_qubit(&self) -> bool {
        self.control.is_some()
    }

    /// The interacting pair `(control, target)`, or `(target, target)` for
    /// single-qubit gates.
    #[inline]
    pub fn pair(&self) -> (QubitId, QubitId) {
        (self.control.unwrap_or(self.target), self.target)
    }

    /// Operand qubits, control first.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.control.into_iter().chain(std::iter::once(self.target))
    }
}

impl fmt::Display for GateRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(params) = &self.params {
            write!(f, "({params})")?;
        }
        match self.control {
            Some(control) => write!(f, " {control}, {}", self.target),
            None => write!(f, " {}", self.target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_of_single_qubit_gate() {
        let gate = GateRecord::single("h", QubitId(2));
        assert_eq!(gate.pair(), (QubitId(2), QubitId(2)));
        assert!(!gate.is_two_qubit());
        assert_eq!(gate.qubits().collect::<Vec<_>>(), vec![QubitId(2)]);
    }

    #[test]
    fn test_display() {
        let gate = GateRecord::cx(0, 1);
        assert_eq!(gate.to_string(), "cx q0, q1");

        let rz = GateRecord::single("rz", QubitId(3)).with_params("pi/4");
        assert_eq!(rz.to_string(), "rz(pi/4) q3");
    }
}
