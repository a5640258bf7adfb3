//! Breadth-First Search.
//!
//! Expands states in the order they were generated, so it finds paths with
//! the fewest moves, regardless of their cost.

use crate::algorithms::driver::BestFirstSearch;
use crate::frontier::FifoFrontier;
use crate::problem::ZeroHeuristic;

pub type BfsSearch<'p, P, Sp, St, A, C> =
    BestFirstSearch<'p, ZeroHeuristic, FifoFrontier<St, C>, P, Sp, St, A, C>;

#[cfg(test)]
mod tests {
    use super::*;

    use crate::algorithms::Discipline;
    use crate::problem::Problem;
    use crate::problems::grid_2d::CostModel;
    use crate::problems::grid_2d::Grid2DState;
    use crate::problems::grid_2d::fixtures;
    use crate::space::Space;

    fn state(row: usize, col: usize) -> Grid2DState {
        Grid2DState::new(row, col).unwrap()
    }

    #[test]
    fn open_grid() {
        let problem = fixtures::open_3x3();
        let instance = problem.instance(CostModel::Uniform);
        let result = BfsSearch::new(&instance, Discipline::Graph).run();

        assert!(result.nodes_expanded <= 9);
        assert_eq!(result.path.len(), 5);
        assert_eq!(result.total_cost, Some(8));
        assert!(instance.space().valid_path(&result.path));
        assert_eq!(
            result.path.states(),
            &[state(0, 0), state(1, 0), state(2, 0), state(2, 1), state(2, 2)]
        );
    }

    #[test]
    fn fewest_moves_over_cheapest() {
        let problem = fixtures::detour();
        let instance = problem.instance(CostModel::Uniform);

        for discipline in Discipline::ALL {
            let result = BfsSearch::new(&instance, discipline).run();
            assert_eq!(
                result.path.states(),
                &[state(0, 0), state(0, 1), state(0, 2)],
                "{discipline}"
            );
            assert_eq!(result.total_cost, Some(12));
        }
    }

    #[test]
    fn start_is_goal() {
        let problem = fixtures::open_3x3();
        let instance =
            problem.instance_between(state(1, 1), state(1, 1), CostModel::Directional);

        for discipline in Discipline::ALL {
            let result = BfsSearch::new(&instance, discipline).run();
            assert_eq!(result.path.states(), &[instance.start()]);
            assert_eq!(result.total_cost, Some(0));
            assert_eq!(result.nodes_expanded, 1);
        }
    }
}
