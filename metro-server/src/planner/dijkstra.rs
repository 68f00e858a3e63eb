//! Single-source, single-target Dijkstra over an implicit graph.
//!
//! The graph is supplied as a successor function, so the same search runs
//! over both the distance graph (`u64` metres) and the line graph
//! (`u32` hops plus penalties). Costs are integers so path sums are exact.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;
use std::ops::Add;
use std::time::Instant;

/// How many heap pops between deadline checks.
const DEADLINE_CHECK_INTERVAL: usize = 64;

/// Edge weight / path cost.
pub trait Cost: Copy + Ord + Add<Output = Self> {
    const ZERO: Self;
}

impl Cost for u32 {
    const ZERO: Self = 0;
}

impl Cost for u64 {
    const ZERO: Self = 0;
}

/// The search ran past its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("search deadline expired")]
pub struct DeadlineExpired;

/// A path found by [`shortest_path`].
#[derive(Debug, Clone, PartialEq)]
pub struct Found<N, C> {
    /// Nodes from start to goal, inclusive.
    pub path: Vec<N>,
    pub cost: C,
    /// Number of nodes settled before the goal was reached.
    pub settled: usize,
}

/// Heap entry, ordered so that `BinaryHeap` pops the cheapest first.
struct Frontier<C> {
    cost: C,
    node: usize,
}

impl<C: Cost> PartialEq for Frontier<C> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<C: Cost> Eq for Frontier<C> {}

impl<C: Cost> Ord for Frontier<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap; ties go to the node discovered first.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl<C: Cost> PartialOrd for Frontier<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Per-node search bookkeeping, indexed by discovery order.
struct Arena<N, C> {
    index: HashMap<N, usize>,
    nodes: Vec<N>,
    best: Vec<Option<C>>,
    parent: Vec<Option<usize>>,
    settled: Vec<bool>,
}

impl<N: Clone + Eq + Hash, C: Cost> Arena<N, C> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            nodes: Vec::new(),
            best: Vec::new(),
            parent: Vec::new(),
            settled: Vec::new(),
        }
    }

    fn intern(&mut self, node: N) -> usize {
        if let Some(&i) = self.index.get(&node) {
            return i;
        }
        let i = self.nodes.len();
        self.index.insert(node.clone(), i);
        self.nodes.push(node);
        self.best.push(None);
        self.parent.push(None);
        self.settled.push(false);
        i
    }

    fn path_to(&self, mut i: usize) -> Vec<N> {
        let mut path = vec![self.nodes[i].clone()];
        while let Some(p) = self.parent[i] {
            path.push(self.nodes[p].clone());
            i = p;
        }
        path.reverse();
        path
    }
}

/// Find a minimum-cost path from `start` to `goal`.
///
/// `successors` yields `(neighbour, edge cost)` pairs; repeated neighbours
/// (parallel edges) are fine, the cheapest wins during relaxation. Among
/// equal-cost paths the one discovered first is returned.
///
/// Returns `Ok(None)` when `goal` is unreachable, and `Err(DeadlineExpired)`
/// if `deadline` passes before the search finishes.
pub fn shortest_path<N, C, F, I>(
    start: &N,
    goal: &N,
    mut successors: F,
    deadline: Option<Instant>,
) -> Result<Option<Found<N, C>>, DeadlineExpired>
where
    N: Clone + Eq + Hash,
    C: Cost,
    F: FnMut(&N) -> I,
    I: IntoIterator<Item = (N, C)>,
{
    let mut arena: Arena<N, C> = Arena::new();
    let mut heap = BinaryHeap::new();

    let origin = arena.intern(start.clone());
    arena.best[origin] = Some(C::ZERO);
    heap.push(Frontier {
        cost: C::ZERO,
        node: origin,
    });

    let mut pops = 0usize;
    let mut settled = 0usize;

    while let Some(Frontier { cost, node }) = heap.pop() {
        pops += 1;
        if pops % DEADLINE_CHECK_INTERVAL == 0 && deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(DeadlineExpired);
        }

        if arena.settled[node] {
            continue;
        }
        arena.settled[node] = true;
        settled += 1;

        if arena.nodes[node] == *goal {
            return Ok(Some(Found {
                path: arena.path_to(node),
                cost,
                settled,
            }));
        }

        let current = arena.nodes[node].clone();
        for (next, weight) in successors(&current) {
            let candidate = cost + weight;
            let j = arena.intern(next);
            if arena.settled[j] {
                continue;
            }
            let improves = arena.best[j].is_none_or(|best| candidate < best);
            if improves {
                arena.best[j] = Some(candidate);
                arena.parent[j] = Some(node);
                heap.push(Frontier {
                    cost: candidate,
                    node: j,
                });
            }
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// Adjacency list over small integers, undirected.
    fn graph(edges: &[(u8, u8, u32)]) -> HashMap<u8, Vec<(u8, u32)>> {
        let mut adj: HashMap<u8, Vec<(u8, u32)>> = HashMap::new();
        for &(a, b, w) in edges {
            adj.entry(a).or_default().push((b, w));
            adj.entry(b).or_default().push((a, w));
        }
        adj
    }

    fn search(adj: &HashMap<u8, Vec<(u8, u32)>>, from: u8, to: u8) -> Option<Found<u8, u32>> {
        shortest_path(
            &from,
            &to,
            |n: &u8| adj.get(n).cloned().unwrap_or_default(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn finds_cheapest_path() {
        let adj = graph(&[(1, 2, 1), (2, 3, 1), (1, 3, 5)]);
        let found = search(&adj, 1, 3).unwrap();
        assert_eq!(found.path, vec![1, 2, 3]);
        assert_eq!(found.cost, 2);
    }

    #[test]
    fn start_is_goal() {
        let adj = graph(&[(1, 2, 1)]);
        let found = search(&adj, 1, 1).unwrap();
        assert_eq!(found.path, vec![1]);
        assert_eq!(found.cost, 0);
        assert_eq!(found.settled, 1);
    }

    #[test]
    fn unreachable_goal() {
        let adj = graph(&[(1, 2, 1), (3, 4, 1)]);
        assert!(search(&adj, 1, 4).is_none());
    }

    #[test]
    fn parallel_edges_prefer_cheapest() {
        let adj = graph(&[(1, 2, 7), (1, 2, 3), (1, 2, 9)]);
        assert_eq!(search(&adj, 1, 2).unwrap().cost, 3);
    }

    #[test]
    fn metre_costs_sum_exactly() {
        // 100 + 200 + 300 m in either direction.
        let adj: HashMap<u8, Vec<(u8, u64)>> = HashMap::from([
            (1, vec![(2, 100)]),
            (2, vec![(1, 100), (3, 200)]),
            (3, vec![(2, 200), (4, 300)]),
            (4, vec![(3, 300)]),
        ]);
        let run = |from: u8, to: u8| {
            shortest_path(
                &from,
                &to,
                |n: &u8| adj.get(n).cloned().unwrap_or_default(),
                None,
            )
            .unwrap()
            .unwrap()
        };
        assert_eq!(run(1, 4).cost, 600);
        assert_eq!(run(4, 1).cost, run(1, 4).cost);
        assert_eq!(run(4, 1).path, vec![4, 3, 2, 1]);
    }

    #[test]
    fn expired_deadline_aborts() {
        // A long chain so the search pops more than one check interval.
        let edges: Vec<(u8, u8, u32)> = (0..200).map(|i| (i, i + 1, 1)).collect();
        let adj = graph(&edges);
        let past = Instant::now() - Duration::from_secs(1);
        let result = shortest_path(
            &0,
            &200,
            |n: &u8| adj.get(n).cloned().unwrap_or_default(),
            Some(past),
        );
        assert_eq!(result, Err(DeadlineExpired));
    }

    #[test]
    fn generous_deadline_completes() {
        let adj = graph(&[(1, 2, 1)]);
        let later = Instant::now() + Duration::from_secs(60);
        let result = shortest_path(
            &1,
            &2,
            |n: &u8| adj.get(n).cloned().unwrap_or_default(),
            Some(later),
        );
        assert!(result.unwrap().is_some());
    }
}
