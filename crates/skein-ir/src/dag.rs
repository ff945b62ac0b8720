//! Per-qubit gate dependency graph.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::error::{IrError, IrResult};
use crate::gate::GateRecord;
use crate::live_range::LiveRanges;
use crate::qubit::QubitId;

/// Position of a gate in program order; doubles as its arena index.
pub type GateIndex = usize;

/// A gate together with its neighbours on each operand wire.
///
/// Links are arena indices into the owning [`DependencyGraph`]. They only ever
/// point backwards (parents) or forwards (children) in program order, so the
/// graph is acyclic by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateNode {
    /// The gate itself.
    pub gate: GateRecord,
    control_parent: Option<GateIndex>,
    control_child: Option<GateIndex>,
    target_parent: Option<GateIndex>,
    target_child: Option<GateIndex>,
}

impl GateNode {
    fn new(gate: GateRecord) -> Self {
        Self {
            gate,
            control_parent: None,
            control_child: None,
            target_parent: None,
            target_child: None,
        }
    }

    /// The previous gate on the control wire.
    #[inline]
    pub fn control_parent(&self) -> Option<GateIndex> {
        self.control_parent
    }

    /// The next gate on the control wire.
    #[inline]
    pub fn control_child(&self) -> Option<GateIndex> {
        self.control_child
    }

    /// The previous gate on the target wire.
    #[inline]
    pub fn target_parent(&self) -> Option<GateIndex> {
        self.target_parent
    }

    /// The next gate on the target wire.
    #[inline]
    pub fn target_child(&self) -> Option<GateIndex> {
        self.target_child
    }

    /// Previous gate touching `qubit`, if `qubit` is an operand.
    pub fn parent_on(&self, qubit: QubitId) -> Option<GateIndex> {
        if self.gate.control == Some(qubit) {
            self.control_parent
        } else if self.gate.target == qubit {
            self.target_parent
        } else {
            None
        }
    }

    /// Next gate touching `qubit`, if `qubit` is an operand.
    pub fn child_on(&self, qubit: QubitId) -> Option<GateIndex> {
        if self.gate.control == Some(qubit) {
            self.control_child
        } else if self.gate.target == qubit {
            self.target_child
        } else {
            None
        }
    }

    /// Distinct parents in wire order (control first).
    pub fn parents(&self) -> impl Iterator<Item = GateIndex> + '_ {
        let target = self.target_parent.filter(|&t| Some(t) != self.control_parent);
        self.control_parent.into_iter().chain(target)
    }

    /// Whether no earlier gate touches any operand.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.control_parent.is_none() && self.target_parent.is_none()
    }
}

/// Gate sequence with per-qubit dependency links and a live-range index.
///
/// Built incrementally with [`apply`](Self::apply); the `wire_front` tracks
/// the last gate touching each qubit so each new gate is linked in O(1).
///
/// ```
/// use skein_ir::{DependencyGraph, GateRecord, QubitId};
///
/// let graph = DependencyGraph::from_records(
///     3,
///     [GateRecord::single("h", QubitId(0)), GateRecord::cx(0, 1), GateRecord::cx(1, 2)],
/// )
/// .unwrap();
///
/// assert_eq!(graph.len(), 3);
/// assert_eq!(graph.roots(), &[0]);
/// assert_eq!(graph.num_qubits(), 3);
/// assert_eq!(graph.depth(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    gates: Vec<GateNode>,
    roots: Vec<GateIndex>,
    /// Last gate touching each declared qubit, plus whether it used the
    /// qubit as control.
    wire_front: Vec<Option<(GateIndex, bool)>>,
    declared_qubits: u32,
    num_qubits: u32,
    live_ranges: LiveRanges,
}

impl DependencyGraph {
    /// Create an empty graph over `declared_qubits` qubits.
    pub fn new(declared_qubits: u32) -> Self {
        Self {
            gates: Vec::new(),
            roots: Vec::new(),
            wire_front: vec![None; declared_qubits as usize],
            declared_qubits,
            num_qubits: 0,
            live_ranges: LiveRanges::new(),
        }
    }

    /// Build a graph from gates in program order.
    pub fn from_records(
        declared_qubits: u32,
        records: impl IntoIterator<Item = GateRecord>,
    ) -> IrResult<Self> {
        let mut graph = Self::new(declared_qubits);
        for record in records {
            graph.apply(record)?;
        }
        Ok(graph)
    }

    /// Append a gate, linking it behind the last gate on each operand.
    pub fn apply(&mut self, gate: GateRecord) -> IrResult<GateIndex> {
        let position = self.gates.len();

        for qubit in gate.qubits() {
            if qubit.0 >= self.declared_qubits {
                return Err(IrError::QubitOutOfRange {
                    qubit,
                    declared: self.declared_qubits,
                    gate_name: Some(gate.name.clone()),
                });
            }
        }
        if gate.control == Some(gate.target) {
            return Err(IrError::ControlEqualsTarget {
                gate_name: gate.name.clone(),
                qubit: gate.target,
                position,
            });
        }

        let mut node = GateNode::new(gate);
        if let Some(control) = node.gate.control {
            node.control_parent = self.link(control, position, true);
        }
        node.target_parent = self.link(node.gate.target, position, false);

        if node.is_root() {
            self.roots.push(position);
        }

        let (a, b) = node.gate.pair();
        self.live_ranges.record(a, b, position);
        let highest = a.0.max(b.0) + 1;
        self.num_qubits = self.num_qubits.max(highest);

        self.gates.push(node);
        Ok(position)
    }

    /// Make `position` the new front of `qubit`'s wire and return the
    /// previous front.
    fn link(&mut self, qubit: QubitId, position: GateIndex, as_control: bool) -> Option<GateIndex> {
        let previous = self.wire_front[qubit.index()].replace((position, as_control));
        let (parent, parent_used_control) = previous?;
        let parent_node = &mut self.gates[parent];
        if parent_used_control {
            parent_node.control_child = Some(position);
        } else {
            parent_node.target_child = Some(position);
        }
        Some(parent)
    }

    /// Number of gates.
    #[inline]
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Whether the graph has no gates.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Gate at `index`.
    pub fn gate(&self, index: GateIndex) -> IrResult<&GateNode> {
        self.gates.get(index).ok_or(IrError::InvalidGateIndex {
            index,
            len: self.gates.len(),
        })
    }

    /// All gates in program order.
    pub fn gates(&self) -> &[GateNode] {
        &self.gates
    }

    /// Gates of a closed range.
    pub fn range(&self, range: RangeInclusive<GateIndex>) -> IrResult<&[GateNode]> {
        let (start, end) = range.into_inner();
        if end >= self.gates.len() || start > end {
            return Err(IrError::InvalidGateIndex {
                index: end,
                len: self.gates.len(),
            });
        }
        Ok(&self.gates[start..=end])
    }

    /// Gates with no predecessor on any operand.
    pub fn roots(&self) -> &[GateIndex] {
        &self.roots
    }

    /// Logical qubit count: highest referenced index plus one.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Qubit count declared by the source circuit.
    #[inline]
    pub fn declared_qubits(&self) -> u32 {
        self.declared_qubits
    }

    /// Positions of every qubit pair.
    pub fn live_ranges(&self) -> &LiveRanges {
        &self.live_ranges
    }

    /// Number of two-qubit gates.
    pub fn num_two_qubit_gates(&self) -> usize {
        self.gates.iter().filter(|n| n.gate.is_two_qubit()).count()
    }

    /// ASAP layering: a gate sits one layer after its latest parent.
    pub fn layers(&self) -> Vec<Vec<GateIndex>> {
        let mut layer_of = vec![0usize; self.gates.len()];
        let mut layers: Vec<Vec<GateIndex>> = Vec::new();

        for (index, node) in self.gates.iter().enumerate() {
            // Parents always precede the gate, so their layers are final.
            let layer = node
                .parents()
                .map(|p| layer_of[p] + 1)
                .max()
                .unwrap_or(0);
            layer_of[index] = layer;
            if layers.len() <= layer {
                layers.resize_with(layer + 1, Vec::new);
            }
            layers[layer].push(index);
        }

        layers
    }

    /// Circuit depth (number of ASAP layers).
    pub fn depth(&self) -> usize {
        let mut layer_of = vec![0usize; self.gates.len()];
        let mut depth = 0;
        for (index, node) in self.gates.iter().enumerate() {
            let layer = node.parents().map(|p| layer_of[p]).max().unwrap_or(0) + 1;
            layer_of[index] = layer;
            depth = depth.max(layer);
        }
        depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> DependencyGraph {
        DependencyGraph::from_records(
            3,
            [
                GateRecord::single("h", QubitId(0)),
                GateRecord::cx(0, 1),
                GateRecord::single("x", QubitId(2)),
                GateRecord::cx(1, 2),
                GateRecord::cx(0, 2),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_links_follow_wires() {
        let graph = chain();

        let cx01 = graph.gate(1).unwrap();
        assert_eq!(cx01.control_parent(), Some(0));
        assert_eq!(cx01.target_parent(), None);
        assert_eq!(cx01.control_child(), Some(4));
        assert_eq!(cx01.target_child(), Some(3));

        let h = graph.gate(0).unwrap();
        assert_eq!(h.target_child(), Some(1));
        assert_eq!(h.child_on(QubitId(0)), Some(1));
        assert_eq!(h.child_on(QubitId(1)), None);

        let cx02 = graph.gate(4).unwrap();
        assert_eq!(cx02.parent_on(QubitId(0)), Some(1));
        assert_eq!(cx02.parent_on(QubitId(2)), Some(3));
        assert_eq!(cx02.target_child(), None);
    }

    #[test]
    fn test_roots() {
        let graph = chain();
        assert_eq!(graph.roots(), &[0, 2]);
        assert!(graph.gate(2).unwrap().is_root());
    }

    #[test]
    fn test_repeated_pair_links_both_wires_to_same_parent() {
        let graph =
            DependencyGraph::from_records(2, [GateRecord::cx(0, 1), GateRecord::cx(1, 0)]).unwrap();
        let second = graph.gate(1).unwrap();
        assert_eq!(second.control_parent(), Some(0));
        assert_eq!(second.target_parent(), Some(0));
        assert_eq!(second.parents().collect::<Vec<_>>(), vec![0]);
        assert_eq!(graph.depth(), 2);
    }

    #[test]
    fn test_live_ranges_populated() {
        let graph = chain();
        let ranges = graph.live_ranges();
        assert_eq!(ranges.positions(QubitId(0), QubitId(0)), &[0]);
        assert_eq!(ranges.positions(QubitId(1), QubitId(0)), &[1]);
        assert_eq!(ranges.positions(QubitId(2), QubitId(0)), &[4]);
    }

    #[test]
    fn test_layers_and_depth() {
        let graph = chain();
        let layers = graph.layers();
        assert_eq!(layers, vec![vec![0, 2], vec![1], vec![3], vec![4]]);
        assert_eq!(graph.depth(), 4);
        assert_eq!(graph.num_two_qubit_gates(), 3);
    }

    #[test]
    fn test_num_qubits_counts_highest_index() {
        let graph = DependencyGraph::from_records(8, [GateRecord::cx(0, 4)]).unwrap();
        assert_eq!(graph.num_qubits(), 5);
        assert_eq!(graph.declared_qubits(), 8);
    }

    #[test]
    fn test_control_equals_target_rejected() {
        let err = DependencyGraph::from_records(2, [GateRecord::cx(1, 1)]).unwrap_err();
        assert!(matches!(
            err,
            IrError::ControlEqualsTarget {
                qubit: QubitId(1),
                position: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let err = DependencyGraph::from_records(2, [GateRecord::cx(0, 2)]).unwrap_err();
        assert!(matches!(
            err,
            IrError::QubitOutOfRange {
                qubit: QubitId(2),
                declared: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_range_bounds() {
        let graph = chain();
        assert_eq!(graph.range(1..=3).unwrap().len(), 3);
        assert!(graph.range(3..=5).is_err());
        assert!(DependencyGraph::new(1).is_empty());
    }
}
