//! Depth-First Search.
//!
//! Always expands the latest generated state. Paths are valid, but neither
//! short nor cheap.

use crate::algorithms::driver::BestFirstSearch;
use crate::frontier::LifoFrontier;
use crate::problem::ZeroHeuristic;

pub type DfsSearch<'p, P, Sp, St, A, C> =
    BestFirstSearch<'p, ZeroHeuristic, LifoFrontier<St, C>, P, Sp, St, A, C>;
