//! Constructive swap routing by leaf peeling.
//!
//! A BFS spanning forest of the coupling graph is shrunk one leaf at a time.
//! Before a leaf is removed it receives its final token: the token whose
//! target it is, or else the nearest token without a target (or nothing).
//! Tokens only travel along tree paths through nodes that are still present,
//! so a settled leaf is never disturbed again.

use std::collections::{BTreeSet, VecDeque};

use crate::coupling::CouplingMap;

use super::Tokens;

/// Route every targeted token home, returning the swaps in order.
pub(crate) fn peel_leaves(coupling: &CouplingMap, tokens: &mut Tokens) -> Vec<(u32, u32)> {
    let n = tokens.num_physical();
    let tree = spanning_forest(coupling, n);

    let mut demanded_by = vec![None; n];
    for logical in 0..tokens.num_logical() {
        if let Some(target) = tokens.target(logical) {
            demanded_by[target as usize] = Some(logical);
        }
    }

    let mut active = vec![true; n];
    let mut degree: Vec<usize> = tree.iter().map(Vec::len).collect();
    let mut leaves: BTreeSet<u32> = (0..n as u32).filter(|&p| degree[p as usize] <= 1).collect();
    let mut swaps = Vec::new();

    while let Some(leaf) = leaves.pop_first() {
        let source = match demanded_by[leaf as usize] {
            Some(logical) => Some(tokens.position(logical)),
            None => nearest(&tree, &active, leaf, |p| tokens.target_at(p).is_none()),
        };

        if let Some(source) = source {
            let path = tree_path(&tree, &active, source, leaf);
            for step in path.windows(2) {
                tokens.swap(step[0], step[1]);
                swaps.push((step[0], step[1]));
            }
        }

        active[leaf as usize] = false;
        for &next in &tree[leaf as usize] {
            if active[next as usize] {
                degree[next as usize] -= 1;
                if degree[next as usize] <= 1 {
                    leaves.insert(next);
                }
            }
        }
    }

    swaps
}

/// BFS forest, rooted at the lowest qubit of every component.
fn spanning_forest(coupling: &CouplingMap, n: usize) -> Vec<Vec<u32>> {
    let mut tree = vec![Vec::new(); n];
    let mut seen = vec![false; n];

    for root in 0..n {
        if seen[root] {
            continue;
        }
        seen[root] = true;
        let mut queue = VecDeque::from([root as u32]);
        while let Some(node) = queue.pop_front() {
            for &next in coupling.neighbors(node) {
                if !seen[next as usize] {
                    seen[next as usize] = true;
                    tree[node as usize].push(next);
                    tree[next as usize].push(node);
                    queue.push_back(next);
                }
            }
        }
    }
    tree
}

/// Closest active node to `from` (itself included) satisfying `accept`.
fn nearest(
    tree: &[Vec<u32>],
    active: &[bool],
    from: u32,
    accept: impl Fn(u32) -> bool,
) -> Option<u32> {
    let mut seen = vec![false; tree.len()];
    let mut queue = VecDeque::from([from]);
    seen[from as usize] = true;

    while let Some(node) = queue.pop_front() {
        if accept(node) {
            return Some(node);
        }
        for &next in &tree[node as usize] {
            if active[next as usize] && !seen[next as usize] {
                seen[next as usize] = true;
                queue.push_back(next);
            }
        }
    }
    None
}

/// Nodes on the tree path from `from` to `to`, both included.
fn tree_path(tree: &[Vec<u32>], active: &[bool], from: u32, to: u32) -> Vec<u32> {
    let mut parent: Vec<Option<u32>> = vec![None; tree.len()];
    let mut seen = vec![false; tree.len()];
    let mut queue = VecDeque::from([to]);
    seen[to as usize] = true;

    // Search from the destination so parents point towards it.
    while let Some(node) = queue.pop_front() {
        if node == from {
            break;
        }
        for &next in &tree[node as usize] {
            if active[next as usize] && !seen[next as usize] {
                seen[next as usize] = true;
                parent[next as usize] = Some(node);
                queue.push_back(next);
            }
        }
    }

    let mut path = vec![from];
    let mut current = from;
    while let Some(next) = parent[current as usize] {
        path.push(next);
        current = next;
    }
    if current == to { path } else { vec![from] }
}
