//! QASM 2.0 emitter for routed circuits.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use skein_ir::{GateRecord, Layout, QubitId, RoutedCircuit, SwapPlan};

use crate::error::{ParseError, ParseResult};
use crate::parser::{ParsedCircuit, parse};

/// Name of the physical register in emitted circuits.
const PHYSICAL_REGISTER: &str = "q";

/// Figures written as a comment header above the emitted circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingSummary {
    /// Inserted swaps over all segment boundaries.
    pub swaps: usize,
    /// Number of segments, i.e. distinct initial mappings.
    pub mappings: usize,
    /// ASAP depth of the emitted circuit (swaps expanded to three CX).
    pub depth: usize,
    /// Gate count of the emitted circuit (swaps expanded to three CX).
    pub gates: usize,
}

/// An emitted routed circuit.
#[derive(Debug, Clone)]
pub struct EmittedCircuit {
    /// QASM 2.0 text, summary comments first.
    pub text: String,
    /// The summary written into the header.
    pub summary: RoutingSummary,
}

/// Emit a routed circuit as QASM 2.0 on the physical register.
///
/// Each segment starts with a `//Location of qubits:` comment listing the
/// physical qubit of every logical qubit. Swaps between segments are
/// announced with `//Inserted N Swap Gates` and written as three CX gates
/// each. Depth and gate count in the header are measured on the emitted
/// text itself.
pub fn emit_routed(circuit: &ParsedCircuit, routed: &RoutedCircuit) -> ParseResult<EmittedCircuit> {
    let mut emitter = Emitter::new();
    emitter.emit_body(circuit, routed)?;
    let body = emitter.output;

    let graph = parse(&body)?.dependency_graph()?;
    let summary = RoutingSummary {
        swaps: routed.total_swaps(),
        mappings: routed.num_mappings(),
        depth: graph.depth(),
        gates: graph.len(),
    };

    let mut text = String::with_capacity(body.len() + 128);
    let _ = writeln!(text, "//Number of Swaps: {}", summary.swaps);
    let _ = writeln!(text, "//Number of Mappings: {}", summary.mappings);
    let _ = writeln!(text, "//Depth: {}", summary.depth);
    let _ = writeln!(text, "//Number of Gates: {}", summary.gates);
    text.push_str(&body);

    Ok(EmittedCircuit { text, summary })
}

/// QASM 2.0 emitter.
struct Emitter {
    output: String,
}

impl Emitter {
    fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }

    fn emit_body(&mut self, circuit: &ParsedCircuit, routed: &RoutedCircuit) -> ParseResult<()> {
        if !routed.segments.is_empty() && routed.swap_plans.len() + 1 != routed.segments.len() {
            return Err(ParseError::Emit(format!(
                "{} segments need {} swap plans, got {}",
                routed.segments.len(),
                routed.segments.len() - 1,
                routed.swap_plans.len()
            )));
        }

        self.writeln("OPENQASM 2.0;");
        for include in &circuit.includes {
            self.writeln(&format!("include \"{include}\";"));
        }
        self.writeln(&format!("qreg {PHYSICAL_REGISTER}[{}];", routed.num_physical));
        for creg in &circuit.cregs {
            self.writeln(&format!("creg {}[{}];", creg.name, creg.size));
        }

        for (i, segment) in routed.segments.iter().enumerate() {
            self.writeln(&format!("//Location of qubits: {}", segment.layout));

            let gates = circuit.gates.get(segment.range()).ok_or_else(|| {
                ParseError::Emit(format!(
                    "segment {}..={} exceeds {} gates",
                    segment.start,
                    segment.end,
                    circuit.gates.len()
                ))
            })?;
            for gate in gates {
                self.emit_gate(gate, &segment.layout)?;
            }

            if let Some(plan) = routed.swap_plans.get(i) {
                self.emit_swaps(plan);
            }
        }

        Ok(())
    }

    fn emit_gate(&mut self, gate: &GateRecord, layout: &Layout) -> ParseResult<()> {
        let physical = |qubit: QubitId| {
            layout.get_physical(qubit).ok_or_else(|| {
                ParseError::Emit(format!("{qubit} has no physical qubit in layout {layout}"))
            })
        };

        let mut line = gate.name.clone();
        if let Some(params) = &gate.params {
            let _ = write!(line, "({params})");
        }
        if let Some(control) = gate.control {
            let _ = write!(line, " {PHYSICAL_REGISTER}[{}],", physical(control)?);
        }
        let _ = write!(line, " {PHYSICAL_REGISTER}[{}]", physical(gate.target)?);
        if let Some(classical) = &gate.classical {
            let _ = write!(line, " -> {classical}");
        }
        line.push(';');

        self.writeln(&line);
        Ok(())
    }

    fn emit_swaps(&mut self, plan: &SwapPlan) {
        self.writeln(&format!("//Inserted {} Swap Gates", plan.len()));
        for &(a, b) in plan.swaps() {
            self.writeln(&format!("//{a} <-> {b}"));
            self.writeln(&format!("cx {PHYSICAL_REGISTER}[{a}], {PHYSICAL_REGISTER}[{b}];"));
            self.writeln(&format!("cx {PHYSICAL_REGISTER}[{b}], {PHYSICAL_REGISTER}[{a}];"));
            self.writeln(&format!("cx {PHYSICAL_REGISTER}[{a}], {PHYSICAL_REGISTER}[{b}];"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skein_ir::Segment;

    fn three_cx() -> ParsedCircuit {
        parse(
            "OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg q[3];\ncreg c[1];\n\
             cx q[0], q[1];\ncx q[1], q[2];\ncx q[0], q[2];\nmeasure q[2] -> c[0];\n",
        )
        .unwrap()
    }

    fn routed() -> RoutedCircuit {
        let first = Layout::trivial(3);
        let second = Layout::from_pairs(3, [(QubitId(0), 0), (QubitId(1), 2), (QubitId(2), 1)])
            .unwrap();
        RoutedCircuit {
            segments: vec![Segment::new(0..=1, first), Segment::new(2..=3, second)],
            swap_plans: vec![SwapPlan::new(vec![(2, 1)])],
            num_physical: 3,
        }
    }

    #[test]
    fn test_emit_routed_layout() {
        let emitted = emit_routed(&three_cx(), &routed()).unwrap();
        let lines: Vec<&str> = emitted.text.lines().collect();

        assert_eq!(lines[0], "//Number of Swaps: 1");
        assert_eq!(lines[1], "//Number of Mappings: 2");
        assert_eq!(lines[4], "OPENQASM 2.0;");
        assert_eq!(lines[5], "include \"qelib1.inc\";");
        assert_eq!(lines[6], "qreg q[3];");
        assert_eq!(lines[7], "creg c[1];");
        assert_eq!(lines[8], "//Location of qubits: 0,1,2");
        assert_eq!(lines[9], "cx q[0], q[1];");
        assert_eq!(lines[11], "//Inserted 1 Swap Gates");
        assert_eq!(lines[12], "//2 <-> 1");
        assert_eq!(lines[13], "cx q[2], q[1];");
        assert_eq!(lines[14], "cx q[1], q[2];");
        assert_eq!(lines[16], "//Location of qubits: 0,2,1");
        assert_eq!(lines[17], "cx q[0], q[1];");
        assert_eq!(lines[18], "measure q[1] -> c[0];");
    }

    #[test]
    fn test_summary_measured_on_output() {
        let emitted = emit_routed(&three_cx(), &routed()).unwrap();
        // 4 original gates plus 3 CX for the swap.
        assert_eq!(emitted.summary.gates, 7);
        // cx01, cx12, then the swap chain on (1,2), cx01, measure q1.
        assert_eq!(emitted.summary.depth, 7);
        assert!(emitted.text.contains("//Depth: 7\n"));
        assert!(emitted.text.contains("//Number of Gates: 7\n"));
    }

    #[test]
    fn test_params_preserved() {
        let circuit = parse("qreg q[2]; rz(pi/4) q[1];").unwrap();
        let routed = RoutedCircuit {
            segments: vec![Segment::new(
                0..=0,
                Layout::from_pairs(2, [(QubitId(0), 1), (QubitId(1), 0)]).unwrap(),
            )],
            swap_plans: vec![],
            num_physical: 2,
        };
        let emitted = emit_routed(&circuit, &routed).unwrap();
        assert!(emitted.text.contains("rz(pi/4) q[0];"));
        assert_eq!(emitted.summary.swaps, 0);
    }

    #[test]
    fn test_missing_physical_qubit() {
        let circuit = parse("qreg q[2]; cx q[0], q[1];").unwrap();
        let routed = RoutedCircuit {
            segments: vec![Segment::new(
                0..=0,
                Layout::from_pairs(2, [(QubitId(0), 0)]).unwrap(),
            )],
            swap_plans: vec![],
            num_physical: 2,
        };
        assert!(matches!(
            emit_routed(&circuit, &routed),
            Err(ParseError::Emit(_))
        ));
    }

    #[test]
    fn test_plan_count_checked() {
        let mut bad = routed();
        bad.swap_plans.clear();
        assert!(matches!(emit_routed(&three_cx(), &bad), Err(ParseError::Emit(_))));
    }
}
