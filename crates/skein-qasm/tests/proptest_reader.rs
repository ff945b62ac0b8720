//! Property-based tests for the QASM 2.0 reader and emitter.
//!
//! Random gate lists are printed as QASM, read back, and pushed through the
//! emitter with a trivial single-segment routing.

use proptest::prelude::*;
use skein_ir::{GateRecord, Layout, QubitId, RoutedCircuit, Segment};
use skein_qasm::{emit_routed, parse};

/// A printable gate: name, optional parameter text, operands.
#[derive(Debug, Clone)]
struct GateLine {
    name: &'static str,
    params: Option<&'static str>,
    qubits: Vec<u32>,
}

impl GateLine {
    fn render(&self) -> String {
        let operands: Vec<String> = self.qubits.iter().map(|q| format!("q[{q}]")).collect();
        match self.params {
            Some(p) => format!("{}({p}) {};", self.name, operands.join(", ")),
            None => format!("{} {};", self.name, operands.join(", ")),
        }
    }
}

fn arb_gate_line(num_qubits: u32) -> impl Strategy<Value = GateLine> {
    let single = (
        prop::sample::select(vec!["h", "x", "t", "sdg"]),
        0..num_qubits,
    )
        .prop_map(|(name, q)| GateLine {
            name,
            params: None,
            qubits: vec![q],
        });
    let rotation = (
        prop::sample::select(vec!["pi/2", "0.25", "-pi/8"]),
        0..num_qubits,
    )
        .prop_map(|(p, q)| GateLine {
            name: "rz",
            params: Some(p),
            qubits: vec![q],
        });
    let pair = (0..num_qubits, 1..num_qubits.max(2)).prop_map(move |(c, off)| GateLine {
        name: "cx",
        params: None,
        qubits: vec![c, (c + off) % num_qubits],
    });
    prop_oneof![single, rotation, pair]
}

fn arb_program() -> impl Strategy<Value = (u32, Vec<GateLine>)> {
    (2_u32..=6).prop_flat_map(|n| (Just(n), prop::collection::vec(arb_gate_line(n), 1..=25)))
}

fn render_program(num_qubits: u32, gates: &[GateLine]) -> String {
    let mut source = format!("OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg q[{num_qubits}];\n");
    for gate in gates {
        source.push_str(&gate.render());
        source.push('\n');
    }
    source
}

proptest! {
    #[test]
    fn reader_preserves_operands((n, gates) in arb_program()) {
        let circuit = parse(&render_program(n, &gates)).unwrap();
        prop_assert_eq!(circuit.gates.len(), gates.len());

        for (parsed, line) in circuit.gates.iter().zip(&gates) {
            prop_assert_eq!(parsed.name.as_str(), line.name);
            prop_assert_eq!(parsed.params.as_deref(), line.params);
            let expected = match line.qubits.as_slice() {
                &[t] => GateRecord::single(line.name, QubitId(t)),
                &[c, t] => GateRecord::controlled(line.name, QubitId(c), QubitId(t)),
                _ => unreachable!(),
            };
            prop_assert_eq!(parsed.control, expected.control);
            prop_assert_eq!(parsed.target, expected.target);
        }
    }

    #[test]
    fn trivial_routing_keeps_gate_count_and_depth((n, gates) in arb_program()) {
        let circuit = parse(&render_program(n, &gates)).unwrap();
        let graph = circuit.dependency_graph().unwrap();
        let routed = RoutedCircuit {
            segments: vec![Segment::new(0..=gates.len() - 1, Layout::trivial(n))],
            swap_plans: vec![],
            num_physical: n,
        };

        let emitted = emit_routed(&circuit, &routed).unwrap();
        prop_assert_eq!(emitted.summary.gates, graph.len());
        prop_assert_eq!(emitted.summary.depth, graph.depth());
        prop_assert_eq!(emitted.summary.swaps, 0);
        prop_assert_eq!(emitted.summary.mappings, 1);
    }
}
