//! Uniform-Cost Search (Dijkstra's algorithm).

use crate::algorithms::driver::BestFirstSearch;
use crate::cost::Cost;
use crate::frontier::HeapFrontier;
use crate::frontier::Insertion;
use crate::frontier::Rank;
use crate::problem::ZeroHeuristic;

/// The ranking tuple for UCS.
///
/// Cheaper states go first, and ties go to the earliest generated one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct UcsRank<C: Cost> {
    g: C,
    insertion: Insertion,
}

impl<C: Cost> UcsRank<C> {
    pub fn g(&self) -> C {
        self.g
    }
}

impl<C: Cost> Rank<C> for UcsRank<C> {
    #[inline(always)]
    fn new(g: C, _h: C, insertion: Insertion) -> Self {
        Self { g, insertion }
    }
}

pub type UcsFrontier<St, C> = HeapFrontier<UcsRank<C>, St, C>;

pub type UcsSearch<'p, P, Sp, St, A, C> =
    BestFirstSearch<'p, ZeroHeuristic, UcsFrontier<St, C>, P, Sp, St, A, C>;
