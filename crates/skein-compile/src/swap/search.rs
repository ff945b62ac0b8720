//! Iterative-deepening search for short swap plans.

use crate::coupling::CouplingMap;

use super::Tokens;

/// Outcome of [`deepen`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DeepeningResult {
    /// A plan; the tokens are left in its final state.
    Found(Vec<(u32, u32)>),
    /// No plan up to the maximum depth.
    NotWithin,
    /// The node budget ran out.
    BudgetExhausted { nodes: u64 },
}

/// Depth-bounded DFS state.
struct Deepening<'a> {
    coupling: &'a CouplingMap,
    tokens: &'a mut Tokens,
    path: Vec<(u32, u32)>,
    nodes: u64,
    budget: Option<u64>,
    exhausted: bool,
}

/// Search plans of increasing length, from the distance lower bound up to
/// `max_depth` swaps.
///
/// Tokens without a target are ignored by the cost, so they drift to wherever
/// the plan leaves them. On failure the tokens are restored.
pub(crate) fn deepen(
    coupling: &CouplingMap,
    tokens: &mut Tokens,
    max_depth: usize,
    budget: Option<u64>,
) -> DeepeningResult {
    let cost = total_cost(coupling, tokens);
    let mut search = Deepening {
        coupling,
        tokens,
        path: Vec::new(),
        nodes: 0,
        budget,
        exhausted: false,
    };

    for bound in lower_bound(cost)..=max_depth {
        if search.dfs(bound, cost, None) {
            return DeepeningResult::Found(search.path);
        }
        if search.exhausted {
            return DeepeningResult::BudgetExhausted {
                nodes: search.nodes,
            };
        }
    }
    DeepeningResult::NotWithin
}

/// Every swap moves at most two tokens one step each.
fn lower_bound(cost: i64) -> usize {
    usize::try_from((cost + 1) / 2).unwrap_or(0)
}

fn distance(coupling: &CouplingMap, from: u32, to: u32) -> i64 {
    coupling.distance(from, to).map_or(i64::from(u32::MAX), i64::from)
}

/// Sum of distances of every targeted token to its target.
fn total_cost(coupling: &CouplingMap, tokens: &Tokens) -> i64 {
    (0..tokens.num_logical())
        .filter_map(|q| {
            tokens
                .target(q)
                .map(|t| distance(coupling, tokens.position(q), t))
        })
        .sum()
}

impl Deepening<'_> {
    fn tick(&mut self) -> bool {
        self.nodes += 1;
        if self.budget.is_some_and(|budget| self.nodes > budget) {
            self.exhausted = true;
        }
        !self.exhausted
    }

    /// Change of the total cost if the tokens on `a` and `b` are exchanged.
    fn swap_delta(&self, a: u32, b: u32) -> i64 {
        let mut delta = 0;
        if let Some(t) = self.tokens.target_at(a) {
            delta += distance(self.coupling, b, t) - distance(self.coupling, a, t);
        }
        if let Some(t) = self.tokens.target_at(b) {
            delta += distance(self.coupling, a, t) - distance(self.coupling, b, t);
        }
        delta
    }

    fn dfs(&mut self, remaining: usize, cost: i64, last: Option<(u32, u32)>) -> bool {
        if cost == 0 {
            return true;
        }
        if lower_bound(cost) > remaining {
            return false;
        }
        if !self.tick() {
            return false;
        }

        let coupling = self.coupling;
        let mut tried: Vec<(u32, u32)> = Vec::new();

        for logical in 0..self.tokens.num_logical() {
            let Some(target) = self.tokens.target(logical) else {
                continue;
            };
            let from = self.tokens.position(logical);
            if from == target {
                continue;
            }

            for &to in coupling.neighbors(from) {
                let edge = (from.min(to), from.max(to));
                if last == Some(edge) || tried.contains(&edge) {
                    continue;
                }
                tried.push(edge);

                let delta = self.swap_delta(from, to);
                if delta > 0 {
                    continue;
                }

                self.tokens.swap(from, to);
                self.path.push((from, to));
                if self.dfs(remaining - 1, cost + delta, Some(edge)) {
                    return true;
                }
                self.path.pop();
                self.tokens.swap(from, to);

                if self.exhausted {
                    return false;
                }
            }
        }
        false
    }
}
