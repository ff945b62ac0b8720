//! Swap planning between consecutive segments.

use tracing::{debug, info};

use skein_ir::{DependencyGraph, Segment, SwapPlan};

use crate::config::SearchLimits;
use crate::coupling::CouplingMap;
use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;
use crate::swap::{PlanStrategy, SwapPlanner};

/// Swap planning pass.
///
/// Completes the first segment's layout (unmapped qubits take the lowest
/// free physical qubits in ascending logical order), then plans the swaps
/// into every following segment and resolves its unmapped qubits to wherever
/// the swaps leave them. Afterwards every segment layout is complete.
pub struct SwapPlanning;

/// Number of transitions that fell back to the constructive router.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstructiveFallbacks(pub usize);

impl Pass for SwapPlanning {
    fn name(&self) -> &'static str {
        "swap_planning"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, _graph: &DependencyGraph, properties: &mut PropertySet) -> CompileResult<()> {
        let coupling_map = properties
            .coupling_map
            .as_ref()
            .ok_or(CompileError::MissingCouplingMap)?;
        let mut segments = properties
            .segments
            .take()
            .ok_or(CompileError::MissingSegments)?;

        let (plans, fallbacks) =
            plan_transitions(&mut segments, coupling_map, &properties.config.limits)?;

        properties.segments = Some(segments);
        properties.swap_plans = Some(plans);
        properties.insert(ConstructiveFallbacks(fallbacks));
        Ok(())
    }
}

/// Resolve every segment layout and plan the swaps between them.
///
/// Returns the plans and how many of them came from the constructive router.
pub fn plan_transitions(
    segments: &mut [Segment],
    coupling_map: &CouplingMap,
    limits: &SearchLimits,
) -> CompileResult<(Vec<SwapPlan>, usize)> {
    let Some(first) = segments.first_mut() else {
        return Ok((Vec::new(), 0));
    };
    first.layout.fill_unmapped(coupling_map.num_qubits())?;

    let planner = SwapPlanner::new(coupling_map, limits);
    let mut plans = Vec::with_capacity(segments.len().saturating_sub(1));
    let mut fallbacks = 0;

    for i in 1..segments.len() {
        let transition = planner.plan(&segments[i - 1].layout, &segments[i].layout)?;
        debug!(
            "Transition {} -> {}: {} swaps ({:?})",
            i - 1,
            i,
            transition.plan.len(),
            transition.strategy
        );
        if transition.strategy == PlanStrategy::Constructive {
            fallbacks += 1;
        }
        segments[i].layout = transition.layout;
        plans.push(transition.plan);
    }

    info!(
        "Planned {} swaps over {} transitions",
        plans.iter().map(SwapPlan::len).sum::<usize>(),
        plans.len()
    );
    Ok((plans, fallbacks))
}
