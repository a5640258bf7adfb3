//! A* Search.

use crate::algorithms::driver::BestFirstSearch;
use crate::cost::Cost;
use crate::frontier::HeapFrontier;
use crate::frontier::Insertion;
use crate::frontier::Rank;

/// The ranking tuple for A*
///
/// We prefer better f-values, and tie break for lower h, and then for the
/// earliest generated state.
///
/// Intuition around higher g-value might be slightly easier, but keeping the
/// raw h value helps to avoid recomputing it later.
///
/// ```
/// use gridsearch::algorithms::astar::AStarRank;
/// use gridsearch::frontier::Rank;
///
/// assert!(AStarRank::<u32>::new(2, 0, 1) < AStarRank::new(1, 1, 0));
/// assert!(AStarRank::<u32>::new(1, 1, 0) < AStarRank::new(2, 1, 0));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct AStarRank<C: Cost> {
    f: C,
    h: C,
    insertion: Insertion,
}

impl<C: Cost> AStarRank<C> {
    pub fn f(&self) -> C {
        self.f
    }
    pub fn h(&self) -> C {
        self.h
    }
}

impl<C: Cost> Rank<C> for AStarRank<C> {
    #[inline(always)]
    fn new(g: C, h: C, insertion: Insertion) -> Self {
        Self {
            f: g.saturating_add(&h),
            h,
            insertion,
        }
    }
}

pub type AStarFrontier<St, C> = HeapFrontier<AStarRank<C>, St, C>;

pub type AStarSearch<'p, H, P, Sp, St, A, C> =
    BestFirstSearch<'p, H, AStarFrontier<St, C>, P, Sp, St, A, C>;

#[cfg(test)]
mod tests {
    use super::*;

    use crate::algorithms::Discipline;
    use crate::algorithms::driver::SearchResult;
    use crate::algorithms::ucs::UcsSearch;
    use crate::problem::Problem;
    use crate::problems::grid_2d::CostModel;
    use crate::problems::grid_2d::Grid2DHeuristicManhattan;
    use crate::problems::grid_2d::Grid2DCost;
    use crate::problems::grid_2d::Grid2DInstance;
    use crate::problems::grid_2d::Grid2DState;
    use crate::problems::grid_2d::fixtures;
    use crate::space::Space;

    fn astar(
        instance: &Grid2DInstance,
        discipline: Discipline,
    ) -> SearchResult<Grid2DState, Grid2DCost> {
        AStarSearch::<Grid2DHeuristicManhattan, _, _, _, _, _>::new(instance, discipline).run()
    }

    #[test]
    fn saturates_f() {
        let r = AStarRank::<u32>::new(u32::MAX, 3, 0);
        assert_eq!(r.f(), u32::MAX);
        assert_eq!(r.h(), 3);
    }

    #[test]
    fn around_the_wall() {
        let problem = fixtures::wall_5x5();
        let instance = problem.instance(CostModel::Uniform);

        let result = astar(&instance, Discipline::Graph);
        assert_eq!(result.total_cost, Some(8));
        assert_eq!(result.path.len(), 9);
        assert!(instance.space().valid_path(&result.path));
        // Straight down and then right.
        assert_eq!(result.nodes_expanded, 9);

        let ucs = UcsSearch::new(&instance, Discipline::Graph).run();
        assert_eq!(ucs.total_cost, result.total_cost);
        assert!(ucs.nodes_expanded > result.nodes_expanded);
    }

    #[test]
    fn agrees_with_ucs() {
        for problem in [fixtures::wall_5x5(), fixtures::detour(), fixtures::open_3x3()] {
            for cost_model in CostModel::ALL {
                let instance = problem.instance(cost_model);
                let a = astar(&instance, Discipline::Graph);
                let u = UcsSearch::new(&instance, Discipline::Graph).run();
                assert_eq!(a.total_cost, u.total_cost, "{problem}{cost_model}");
            }
        }
    }

    #[test]
    fn start_is_goal() {
        let problem = fixtures::detour();
        let start = problem.start();
        let instance = problem.instance_between(start, start, CostModel::Directional);

        for discipline in Discipline::ALL {
            let result = astar(&instance, discipline);
            assert_eq!(result.path.states(), &[instance.start()]);
            assert_eq!(result.total_cost, Some(0));
            assert_eq!(result.nodes_expanded, 1);
        }
    }
}
