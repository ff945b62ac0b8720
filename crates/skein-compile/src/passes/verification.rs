//! Verification of routing results.
//!
//! Re-checks what segmentation and swap planning promise, against the
//! dependency graph and the coupling map, before anything is emitted.

use tracing::debug;

use skein_ir::{DependencyGraph, Segment, SwapPlan};

use crate::coupling::CouplingMap;
use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Result of routing verification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationResult {
    /// Whether the verification passed.
    pub passed: bool,
    /// Number of segments checked.
    pub segments_checked: usize,
    /// Number of two-qubit gates checked against the coupling map.
    pub gates_checked: usize,
    /// Number of swaps checked.
    pub swaps_checked: usize,
}

/// Verification pass over segments and swap plans.
///
/// Fails with [`CompileError::VerificationFailed`] on the first violated
/// property and stores a [`VerificationResult`] otherwise.
pub struct MappingVerification;

impl Pass for MappingVerification {
    fn name(&self) -> &'static str {
        "mapping_verification"
    }

    fn kind(&self) -> PassKind {
        PassKind::Verification
    }

    fn run(&self, graph: &DependencyGraph, properties: &mut PropertySet) -> CompileResult<()> {
        let coupling_map = properties.require_coupling_map()?;
        let segments = properties
            .segments
            .as_deref()
            .ok_or(CompileError::MissingSegments)?;
        let plans = properties.swap_plans.as_deref().unwrap_or_default();

        let result = verify_routing(graph, coupling_map, segments, plans)?;
        debug!(
            "Verified {} segments, {} gates, {} swaps",
            result.segments_checked, result.gates_checked, result.swaps_checked
        );
        properties.insert(result);
        Ok(())
    }

    fn should_run(&self, _graph: &DependencyGraph, properties: &PropertySet) -> bool {
        properties.segments.is_some()
    }
}

/// Check a routing result.
pub fn verify_routing(
    graph: &DependencyGraph,
    coupling_map: &CouplingMap,
    segments: &[Segment],
    plans: &[SwapPlan],
) -> CompileResult<VerificationResult> {
    let fail = |message: String| Err(CompileError::VerificationFailed(message));

    // Segments partition [0, len).
    let mut next = 0;
    for (i, segment) in segments.iter().enumerate() {
        if segment.start != next || segment.is_empty() {
            return fail(format!(
                "segment {i} covers {}..={} but gate {next} is next",
                segment.start, segment.end
            ));
        }
        next = segment.end + 1;
    }
    if next != graph.len() {
        return fail(format!(
            "segments cover {next} of {} gates",
            graph.len()
        ));
    }

    let mut result = VerificationResult {
        segments_checked: segments.len(),
        ..VerificationResult::default()
    };

    for (i, segment) in segments.iter().enumerate() {
        let layout = &segment.layout;
        if !layout.is_complete() || layout.num_logical() < graph.num_qubits() {
            return fail(format!("segment {i} layout is incomplete: {layout}"));
        }
        if let Some((qubit, physical)) = layout
            .iter()
            .find(|&(_, p)| p >= coupling_map.num_qubits())
        {
            return fail(format!(
                "segment {i} places {qubit} on missing physical qubit {physical}"
            ));
        }

        for (offset, node) in graph.range(segment.range())?.iter().enumerate() {
            if !node.gate.is_two_qubit() {
                continue;
            }
            let (a, b) = node.gate.pair();
            let (pa, pb) = (layout.get_physical(a), layout.get_physical(b));
            let connected = matches!((pa, pb), (Some(pa), Some(pb)) if coupling_map.is_connected(pa, pb));
            if !connected {
                return fail(format!(
                    "gate {} ('{}') runs on {pa:?}, {pb:?} which are not coupled",
                    segment.start + offset,
                    node.gate
                ));
            }
            result.gates_checked += 1;
        }
    }

    if plans.len() + 1 != segments.len().max(1) {
        return fail(format!(
            "{} segments but {} swap plans",
            segments.len(),
            plans.len()
        ));
    }
    for (i, plan) in plans.iter().enumerate() {
        if let Some(&(a, b)) = plan
            .swaps()
            .iter()
            .find(|&&(a, b)| !coupling_map.is_connected(a, b))
        {
            return fail(format!("swap plan {i} swaps uncoupled qubits {a} and {b}"));
        }

        let mut layout = segments[i].layout.clone();
        plan.apply(&mut layout);
        if layout != segments[i + 1].layout {
            return fail(format!(
                "swap plan {i} yields {layout}, segment {} expects {}",
                i + 1,
                segments[i + 1].layout
            ));
        }
        result.swaps_checked += plan.len();
    }

    result.passed = true;
    Ok(result)
}
