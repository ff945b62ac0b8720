//! Segmentation: cover the gate sequence with maximal mappable ranges.

use tracing::{debug, info};

use skein_ir::{DependencyGraph, Segment};

use crate::config::MapperConfig;
use crate::coupling::CouplingMap;
use crate::error::{CompileError, CompileResult};
use crate::mapper::{MappingOutcome, SegmentMapper};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Segmentation pass.
///
/// Splits the circuit into segments, each executable under one layout, and
/// stores them in [`PropertySet::segments`]. Qubits a segment does not touch
/// stay unmapped in its layout; the swap planning pass resolves them.
pub struct Segmentation;

impl Pass for Segmentation {
    fn name(&self) -> &'static str {
        "segmentation"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, graph: &DependencyGraph, properties: &mut PropertySet) -> CompileResult<()> {
        let coupling_map = properties.require_coupling_map()?;
        let segments = segment_circuit(graph, coupling_map, &properties.config)?;
        properties.segments = Some(segments);
        Ok(())
    }
}

/// Cover `graph` with maximal segments.
///
/// Each attempt maps `[lower, upper]`. On success the next attempt starts
/// right after it and reaches to the end again. On failure the upper bound
/// moves before the latest occurrence, inside the range, of any pair the
/// mapper reported as conflicting; if that would not shrink the range, it
/// drops by one gate, or by half when the attempt ran out of budget.
pub fn segment_circuit(
    graph: &DependencyGraph,
    coupling_map: &CouplingMap,
    config: &MapperConfig,
) -> CompileResult<Vec<Segment>> {
    let required = graph.num_qubits();
    let available = coupling_map.num_qubits();
    if required > available {
        return Err(CompileError::CircuitTooLarge {
            required,
            available,
        });
    }

    let mut segments = Vec::new();
    if graph.is_empty() {
        return Ok(segments);
    }

    let mapper = SegmentMapper::new(coupling_map, config);
    let last = graph.len() - 1;
    let (mut lower, mut upper) = (0, last);
    let mut attempts = 0usize;

    loop {
        attempts += 1;
        match mapper.map(graph, lower..=upper)? {
            MappingOutcome::Mapped(layout) => {
                info!(
                    "Segment {}: gates {}..={} ({} qubits placed)",
                    segments.len(),
                    lower,
                    upper,
                    layout.len()
                );
                segments.push(Segment::new(lower..=upper, layout));
                if upper == last {
                    break;
                }
                lower = upper + 1;
                upper = last;
            }
            MappingOutcome::Conflicted(report) => {
                if upper == lower {
                    return Err(CompileError::SegmentationStalled {
                        position: lower,
                        gate: graph.gate(lower)?.gate.to_string(),
                    });
                }

                let cut = report
                    .conflicts
                    .iter()
                    .filter_map(|&(a, b)| graph.live_ranges().latest_within(a, b, lower..=upper))
                    .max();
                upper = match cut {
                    Some(cut) if cut > lower => cut - 1,
                    // Out of budget with nothing to cut at: the range is too
                    // big to search, so halve it.
                    _ if report.budget_exhausted => lower + (upper - lower) / 2,
                    _ => upper - 1,
                };
                debug!(
                    "Conflicts {:?} at depth {}, retrying gates {}..={}",
                    report.conflicts, report.depth, lower, upper
                );
            }
        }
    }

    info!(
        "Segmentation finished: {} segments in {} attempts",
        segments.len(),
        attempts
    );
    Ok(segments)
}
