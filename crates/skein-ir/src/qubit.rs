//! Logical qubit identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a logical qubit, as referenced by the input circuit.
///
/// Physical qubits are plain `u32` indices into the coupling map; the
/// newtype keeps the two index spaces from being mixed up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl QubitId {
    /// The index as a `usize`, for slice addressing.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

impl From<usize> for QubitId {
    fn from(id: usize) -> Self {
        QubitId(u32::try_from(id).expect("QubitId overflow: exceeds u32::MAX"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_display() {
        assert_eq!(format!("{}", QubitId(3)), "q3");
    }

    #[test]
    fn test_qubit_ordering() {
        let mut qubits = vec![QubitId(4), QubitId(0), QubitId(2)];
        qubits.sort();
        assert_eq!(qubits, vec![QubitId(0), QubitId(2), QubitId(4)]);
        assert_eq!(QubitId::from(7usize).index(), 7);
    }
}
