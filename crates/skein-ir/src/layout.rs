//! Logical-to-physical qubit layouts.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::qubit::QubitId;

/// A partial, injective mapping from logical qubits to physical qubits.
///
/// Every logical qubit in `[0, num_logical)` has a slot; an empty slot means
/// the qubit is not (yet) placed. The inverse map is kept in sync so both
/// directions are O(1).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Physical qubit of each logical qubit.
    logical_to_physical: Vec<Option<u32>>,
    /// Logical qubit placed on each occupied physical qubit.
    physical_to_logical: FxHashMap<u32, QubitId>,
}

impl Layout {
    /// Create a layout with `num_logical` empty slots.
    pub fn new(num_logical: u32) -> Self {
        Self {
            logical_to_physical: vec![None; num_logical as usize],
            physical_to_logical: FxHashMap::default(),
        }
    }

    /// Create a trivial layout (logical qubit i -> physical qubit i).
    pub fn trivial(num_qubits: u32) -> Self {
        let mut layout = Self::new(num_qubits);
        for i in 0..num_qubits {
            layout.logical_to_physical[i as usize] = Some(i);
            layout.physical_to_logical.insert(i, QubitId(i));
        }
        layout
    }

    /// Build a layout from `(logical, physical)` pairs.
    pub fn from_pairs(
        num_logical: u32,
        pairs: impl IntoIterator<Item = (QubitId, u32)>,
    ) -> IrResult<Self> {
        let mut layout = Self::new(num_logical);
        for (logical, physical) in pairs {
            layout.place(logical, physical)?;
        }
        Ok(layout)
    }

    /// Place `logical` on `physical`.
    ///
    /// Fails if `physical` already hosts a different logical qubit. A logical
    /// qubit that was placed elsewhere is moved.
    pub fn place(&mut self, logical: QubitId, physical: u32) -> IrResult<()> {
        if let Some(&occupant) = self.physical_to_logical.get(&physical) {
            if occupant != logical {
                return Err(IrError::PhysicalQubitOccupied { physical, occupant });
            }
            return Ok(());
        }
        if logical.index() >= self.logical_to_physical.len() {
            self.logical_to_physical.resize(logical.index() + 1, None);
        }
        if let Some(old) = self.logical_to_physical[logical.index()].replace(physical) {
            self.physical_to_logical.remove(&old);
        }
        self.physical_to_logical.insert(physical, logical);
        Ok(())
    }

    /// Remove `logical` from the layout, returning the physical qubit it held.
    pub fn remove(&mut self, logical: QubitId) -> Option<u32> {
        let physical = self.logical_to_physical.get_mut(logical.index())?.take()?;
        self.physical_to_logical.remove(&physical);
        Some(physical)
    }

    /// Get the physical qubit for a logical qubit.
    #[inline]
    pub fn get_physical(&self, logical: QubitId) -> Option<u32> {
        self.logical_to_physical.get(logical.index()).copied().flatten()
    }

    /// Get the logical qubit for a physical qubit.
    #[inline]
    pub fn get_logical(&self, physical: u32) -> Option<QubitId> {
        self.physical_to_logical.get(&physical).copied()
    }

    /// Whether `logical` is placed.
    #[inline]
    pub fn is_mapped(&self, logical: QubitId) -> bool {
        self.get_physical(logical).is_some()
    }

    /// Whether `physical` hosts a logical qubit.
    #[inline]
    pub fn is_occupied(&self, physical: u32) -> bool {
        self.physical_to_logical.contains_key(&physical)
    }

    /// Exchange the occupants of two physical qubits. Either may be empty.
    pub fn swap(&mut self, p1: u32, p2: u32) {
        let l1 = self.physical_to_logical.remove(&p1);
        let l2 = self.physical_to_logical.remove(&p2);

        if let Some(l1) = l1 {
            self.logical_to_physical[l1.index()] = Some(p2);
            self.physical_to_logical.insert(p2, l1);
        }
        if let Some(l2) = l2 {
            self.logical_to_physical[l2.index()] = Some(p1);
            self.physical_to_logical.insert(p1, l2);
        }
    }

    /// Number of logical slots.
    #[inline]
    pub fn num_logical(&self) -> u32 {
        self.logical_to_physical.len() as u32
    }

    /// Number of placed logical qubits.
    #[inline]
    pub fn len(&self) -> usize {
        self.physical_to_logical.len()
    }

    /// Whether no logical qubit is placed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.physical_to_logical.is_empty()
    }

    /// Whether every logical slot is filled.
    pub fn is_complete(&self) -> bool {
        self.len() == self.logical_to_physical.len()
    }

    /// Iterate over placed `(logical, physical)` pairs in logical order.
    pub fn iter(&self) -> impl Iterator<Item = (QubitId, u32)> + '_ {
        self.logical_to_physical
            .iter()
            .enumerate()
            .filter_map(|(l, p)| p.map(|p| (QubitId::from(l), p)))
    }

    /// Logical qubits without a physical qubit, ascending.
    pub fn unmapped(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.logical_to_physical
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_none())
            .map(|(l, _)| QubitId::from(l))
    }

    /// Place every unmapped logical qubit on the lowest free physical qubit,
    /// in ascending logical order.
    pub fn fill_unmapped(&mut self, num_physical: u32) -> IrResult<()> {
        let pending: Vec<QubitId> = self.unmapped().collect();
        let mut free = (0..num_physical).filter(|p| !self.is_occupied(*p)).collect::<Vec<_>>();
        free.reverse();
        for logical in pending {
            let physical = free.pop().ok_or(IrError::NoFreePhysicalQubit {
                qubit: logical,
                available: num_physical,
            })?;
            self.place(logical, physical)?;
        }
        Ok(())
    }
}

impl fmt::Display for Layout {
    /// Comma-separated physical qubits in logical order; `-` marks empty slots.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, slot) in self.logical_to_physical.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            match slot {
                Some(p) => write!(f, "{p}")?,
                None => write!(f, "-")?,
            }
        }
        Ok(())
    }
}
