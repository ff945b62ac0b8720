//! Swap sequences between consecutive segment layouts.
//!
//! A transition starts from a fully placed layout and must bring every
//! logical qubit that the next layout places onto its physical qubit. Qubits
//! the next layout leaves unmapped may end up anywhere; the next layout is
//! resolved to wherever they land.
//!
//! A constructive router that peels leaves off a spanning forest of the
//! coupling graph always yields a plan; its length caps an iterative-deepening
//! search that runs first. If the search runs out of its node budget, or finds
//! nothing within the cap, the constructive plan is used.

mod peel;
mod search;

use tracing::{debug, warn};

use skein_ir::{Layout, QubitId, SwapPlan};

use crate::config::SearchLimits;
use crate::coupling::CouplingMap;
use crate::error::{CompileError, CompileResult};

use search::DeepeningResult;

/// How a transition's plan was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStrategy {
    /// Iterative-deepening search.
    Search,
    /// Leaf peeling after the search gave up.
    Constructive,
}

/// A planned transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Swaps in execution order.
    pub plan: SwapPlan,
    /// The target layout with every qubit placed.
    pub layout: Layout,
    /// Which router produced the plan.
    pub strategy: PlanStrategy,
}

/// Plans swaps on one coupling map.
#[derive(Debug, Clone, Copy)]
pub struct SwapPlanner<'a> {
    coupling: &'a CouplingMap,
    node_limit: Option<u64>,
}

impl<'a> SwapPlanner<'a> {
    /// Create a planner bounded by `limits.swap_node_limit`.
    pub fn new(coupling: &'a CouplingMap, limits: &SearchLimits) -> Self {
        Self {
            coupling,
            node_limit: limits.swap_budget(),
        }
    }

    /// Plan the swaps taking `from` to `to`.
    ///
    /// `from` must place every logical qubit; `to` may leave some unmapped.
    pub fn plan(&self, from: &Layout, to: &Layout) -> CompileResult<Transition> {
        let mut tokens = Tokens::new(from, to, self.coupling.num_qubits())?;
        tokens.check_reachable(self.coupling)?;

        let mut fallback = tokens.clone();
        let constructive = peel::peel_leaves(self.coupling, &mut fallback);
        let max_depth = constructive.len();

        let (swaps, tokens, strategy) =
            match search::deepen(self.coupling, &mut tokens, max_depth, self.node_limit) {
                DeepeningResult::Found(swaps) => (swaps, tokens, PlanStrategy::Search),
                DeepeningResult::BudgetExhausted { nodes } => {
                    warn!(
                        "Swap search gave up after {} nodes, using {} constructive swaps",
                        nodes,
                        constructive.len()
                    );
                    (constructive, fallback, PlanStrategy::Constructive)
                }
                DeepeningResult::NotWithin => {
                    debug!(
                        "No searched swap plan within {} swaps, using the constructive plan",
                        constructive.len()
                    );
                    (constructive, fallback, PlanStrategy::Constructive)
                }
            };

        if let Some(qubit) = tokens.first_misplaced() {
            return Err(CompileError::VerificationFailed(format!(
                "swap plan leaves {qubit} off its target"
            )));
        }

        Ok(Transition {
            plan: SwapPlan::new(swaps),
            layout: tokens.into_layout()?,
            strategy,
        })
    }
}

/// Token positions during a transition.
///
/// Every logical qubit is a token on a physical qubit. Tokens with a target
/// must reach it; the others only fill positions.
#[derive(Debug, Clone)]
pub(crate) struct Tokens {
    position: Vec<u32>,
    occupant: Vec<Option<u32>>,
    target: Vec<Option<u32>>,
}

impl Tokens {
    fn new(from: &Layout, to: &Layout, num_physical: u32) -> CompileResult<Self> {
        let num_logical = from.num_logical();
        let mut position = Vec::with_capacity(num_logical as usize);
        let mut occupant = vec![None; num_physical as usize];
        let mut target = Vec::with_capacity(num_logical as usize);

        for logical in (0..num_logical).map(QubitId) {
            let physical = from
                .get_physical(logical)
                .ok_or(CompileError::UnplacedQubit { qubit: logical })?;
            let slot = occupant.get_mut(physical as usize).ok_or_else(|| {
                CompileError::InvalidCouplingMap(format!(
                    "physical qubit {physical} is outside the coupling map"
                ))
            })?;
            *slot = Some(logical.0);
            position.push(physical);
            target.push(to.get_physical(logical));
        }

        Ok(Self {
            position,
            occupant,
            target,
        })
    }

    fn check_reachable(&self, coupling: &CouplingMap) -> CompileResult<()> {
        for (logical, (&from, target)) in self.position.iter().zip(&self.target).enumerate() {
            if let Some(to) = *target {
                if coupling.distance(from, to).is_none() {
                    return Err(CompileError::UnreachableQubit {
                        qubit: QubitId::from(logical),
                        from,
                        to,
                    });
                }
            }
        }
        Ok(())
    }

    /// Exchange the tokens on two physical qubits.
    pub(crate) fn swap(&mut self, a: u32, b: u32) {
        let (a, b) = (a as usize, b as usize);
        self.occupant.swap(a, b);
        if let Some(q) = self.occupant[a] {
            self.position[q as usize] = a as u32;
        }
        if let Some(q) = self.occupant[b] {
            self.position[q as usize] = b as u32;
        }
    }

    pub(crate) fn num_logical(&self) -> usize {
        self.position.len()
    }

    pub(crate) fn num_physical(&self) -> usize {
        self.occupant.len()
    }

    pub(crate) fn position(&self, logical: usize) -> u32 {
        self.position[logical]
    }

    pub(crate) fn target(&self, logical: usize) -> Option<u32> {
        self.target[logical]
    }

    pub(crate) fn occupant(&self, physical: u32) -> Option<u32> {
        self.occupant[physical as usize]
    }

    /// Target of the token sitting on `physical`, if any.
    pub(crate) fn target_at(&self, physical: u32) -> Option<u32> {
        self.occupant(physical)
            .and_then(|q| self.target[q as usize])
    }

    fn first_misplaced(&self) -> Option<QubitId> {
        (0..self.num_logical())
            .find(|&q| self.target[q].is_some_and(|t| t != self.position[q]))
            .map(QubitId::from)
    }

    fn into_layout(self) -> CompileResult<Layout> {
        let num_logical = self.position.len() as u32;
        let pairs = self
            .position
            .into_iter()
            .enumerate()
            .map(|(l, p)| (QubitId::from(l), p));
        Ok(Layout::from_pairs(num_logical, pairs)?)
    }
}
