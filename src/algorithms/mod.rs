//! Implementation of search algorithms.
//!
//! These algorithms can do path-finding on generic search problems. All of
//! them share one driver, [`driver::BestFirstSearch`], and differ on how they
//! order their Frontier and whether they suppress duplicate states.

use derive_more::Display;

pub mod astar;
pub mod bfs;
pub mod dfs;
pub mod driver;
pub mod ucs;

/// The Frontier ordering.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// FIFO queue.
    #[display("BFS")]
    Bfs,
    /// LIFO stack.
    #[display("DFS")]
    Dfs,
    /// Min-heap on `g`.
    #[display("UCS")]
    Ucs,
    /// Min-heap on `g + h`.
    #[display("A*")]
    AStar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::Ucs,
        Algorithm::AStar,
    ];
}

/// How a search deals with states it has already seen.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum Discipline {
    /// No closed set. The first parent found for a state is final, and a
    /// state never goes back to its own parent.
    ///
    /// Paths found this way are valid, but not optimal on grids with cycles.
    #[display("Tree")]
    Tree,
    /// Closed set with best-cost replacement of open states. Stale Frontier
    /// entries are discarded when popped.
    #[display("Graph")]
    Graph,
}

impl Discipline {
    pub const ALL: [Discipline; 2] = [Discipline::Tree, Discipline::Graph];
}
