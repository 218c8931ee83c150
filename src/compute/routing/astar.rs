//! Time-bounded A* shortest-path search.
//!
//! One call to [`AStarSolver::solve`] runs the search to completion and
//! records the outcome; the solver is not resumable. The search is a small
//! state machine:
//!
//! ```text
//!            heap empty
//! Running ─────────────────────▶ Unsolvable
//!    │  heap minimum == goal
//!    ├─────────────────────────▶ Solved
//!    │  elapsed ≥ timeout (checked once per dequeue)
//!    └─────────────────────────▶ Timeout
//! ```
//!
//! ## Preconditions
//!
//! The heuristic must be admissible (never overestimate) and consistent
//! (`h(v) ≤ w(v, u) + h(u)` for every edge). Once a vertex is dequeued it is
//! marked visited and edges pointing back into it are never relaxed, so an
//! inconsistent heuristic can finalize a vertex at a non-optimal distance.
//! This is not checked.
//!
//! The timeout is cooperative: a vertex with a very large fan-out can
//! overrun the budget by the cost of relaxing its edges.

use super::graph::AStarGraph;
use crate::compute::heap::IndexedMinHeap;
use crate::error::Result;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Terminal state of one A* search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverOutcome {
    /// The goal was reached; the solution is a shortest path.
    Solved,
    /// The time budget ran out before the goal was dequeued.
    Timeout,
    /// The frontier emptied without reaching the goal.
    Unsolvable,
}

/// Result of one A* search.
///
/// All accessors are O(1); the work happens in [`AStarSolver::solve`].
#[derive(Debug, Clone)]
pub struct AStarSolver<V> {
    outcome: SolverOutcome,
    solution: Vec<V>,
    solution_weight: f64,
    num_states_explored: usize,
    exploration_time: Duration,
}

impl<V> AStarSolver<V>
where
    V: Clone + Eq + Hash,
{
    /// Search for a shortest path from `start` to `goal` using `heuristic`.
    ///
    /// Never fails for an unreachable goal or an exhausted budget; those are
    /// reported through [`AStarSolver::outcome`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use geonav::compute::routing::{AStarGraph, AStarSolver, SolverOutcome, WeightedEdge};
    /// use std::time::Duration;
    ///
    /// struct Line;
    ///
    /// impl AStarGraph for Line {
    ///     type Vertex = u32;
    ///
    ///     fn neighbors(&self, v: &u32) -> Vec<WeightedEdge<u32>> {
    ///         if *v < 5 { vec![WeightedEdge::new(*v, v + 1, 1.5)] } else { Vec::new() }
    ///     }
    /// }
    ///
    /// let solver = AStarSolver::solve(&Line, 0, 5, |_, _| 0.0, Duration::from_secs(1))?;
    /// assert_eq!(solver.outcome(), SolverOutcome::Solved);
    /// assert_eq!(solver.solution(), &[0, 1, 2, 3, 4, 5]);
    /// assert_eq!(solver.solution_weight(), 7.5);
    /// # Ok::<(), geonav::GeoNavError>(())
    /// ```
    pub fn solve<G, H>(graph: &G, start: V, goal: V, heuristic: H, timeout: Duration) -> Result<Self>
    where
        G: AStarGraph<Vertex = V> + ?Sized,
        H: Fn(&V, &V) -> f64,
    {
        let started = Instant::now();

        let mut heap = IndexedMinHeap::new();
        let mut dist_to: FxHashMap<V, f64> = FxHashMap::default();
        let mut edge_to: FxHashMap<V, V> = FxHashMap::default();
        let mut visited: FxHashSet<V> = FxHashSet::default();

        heap.add(start.clone(), heuristic(&start, &goal))?;
        dist_to.insert(start.clone(), 0.0);

        let mut num_states_explored = 0;
        let mut solution = Vec::new();
        let mut solution_weight = 0.0;

        let outcome = loop {
            let Ok(smallest) = heap.peek_min() else {
                break SolverOutcome::Unsolvable;
            };

            if *smallest == goal {
                solution = reconstruct_path(&edge_to, &start, &goal);
                solution_weight = dist_to.get(&goal).copied().unwrap_or_default();
                break SolverOutcome::Solved;
            }

            if started.elapsed() >= timeout {
                break SolverOutcome::Timeout;
            }

            let v = heap.remove_min()?;
            num_states_explored += 1;
            visited.insert(v.clone());
            let dist_to_v = dist_to.get(&v).copied().unwrap_or_default();

            for edge in graph.neighbors(&v) {
                let w = edge.to();
                if visited.contains(w) {
                    continue;
                }

                debug_assert!(edge.weight() >= 0.0, "A* requires non-negative edge weights");
                let candidate = dist_to_v + edge.weight();

                if heap.contains(w) {
                    let known = dist_to.get(w).copied().unwrap_or(f64::INFINITY);
                    if candidate < known {
                        dist_to.insert(w.clone(), candidate);
                        edge_to.insert(w.clone(), v.clone());
                        heap.change_priority(w, candidate + heuristic(w, &goal))?;
                    }
                } else {
                    dist_to.insert(w.clone(), candidate);
                    edge_to.insert(w.clone(), v.clone());
                    heap.add(w.clone(), candidate + heuristic(w, &goal))?;
                }
            }
        };

        let exploration_time = started.elapsed();
        log::debug!(
            "A* finished: {:?} after {} states in {:?}",
            outcome,
            num_states_explored,
            exploration_time
        );

        Ok(Self {
            outcome,
            solution,
            solution_weight,
            num_states_explored,
            exploration_time,
        })
    }

    /// Search using the graph's own
    /// [`estimated_distance_to_goal`](AStarGraph::estimated_distance_to_goal).
    pub fn solve_with_graph_heuristic<G>(
        graph: &G,
        start: V,
        goal: V,
        timeout: Duration,
    ) -> Result<Self>
    where
        G: AStarGraph<Vertex = V> + ?Sized,
    {
        Self::solve(
            graph,
            start,
            goal,
            |v, goal| graph.estimated_distance_to_goal(v, goal),
            timeout,
        )
    }

    pub fn outcome(&self) -> SolverOutcome {
        self.outcome
    }

    /// Vertices from start to goal; empty unless the outcome is `Solved`.
    pub fn solution(&self) -> &[V] {
        &self.solution
    }

    pub fn into_solution(self) -> Vec<V> {
        self.solution
    }

    /// Total edge weight of the solution; `0.0` unless `Solved`.
    pub fn solution_weight(&self) -> f64 {
        self.solution_weight
    }

    /// Number of heap dequeues performed.
    pub fn num_states_explored(&self) -> usize {
        self.num_states_explored
    }

    /// Wall-clock time spent in the search.
    pub fn exploration_time(&self) -> Duration {
        self.exploration_time
    }
}

fn reconstruct_path<V>(edge_to: &FxHashMap<V, V>, start: &V, goal: &V) -> Vec<V>
where
    V: Clone + Eq + Hash,
{
    let mut path = vec![goal.clone()];
    let mut current = goal;
    while current != start {
        match edge_to.get(current) {
            Some(previous) => {
                path.push(previous.clone());
                current = previous;
            }
            None => break,
        }
    }
    path.reverse();
    path
}
