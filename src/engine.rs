//! Running searches on grids.

use thiserror::Error;

use crate::algorithms::Algorithm;
use crate::algorithms::Discipline;
use crate::algorithms::astar::AStarSearch;
use crate::algorithms::bfs::BfsSearch;
use crate::algorithms::dfs::DfsSearch;
use crate::algorithms::driver::SearchResult;
use crate::algorithms::ucs::UcsSearch;
use crate::config::SearchConfig;
use crate::cost::Cost;
use crate::problem::Heuristic;
use crate::problem::Problem;
use crate::problems::grid_2d::Grid2D;
use crate::problems::grid_2d::Grid2DCost;
use crate::problems::grid_2d::Grid2DHeuristicManhattan;
use crate::problems::grid_2d::Grid2DInstance;
use crate::problems::grid_2d::Grid2DProblem;
use crate::problems::grid_2d::Grid2DSpace;
use crate::problems::grid_2d::Grid2DState;
use crate::problems::grid_2d::GridError;
use crate::space::Action;
use crate::space::Space;
use crate::space::State;

#[derive(Debug, Error, PartialEq)]
pub enum SearchError {
    #[error(transparent)]
    OutOfBounds(#[from] GridError),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type Grid2DSearchResult = SearchResult<Grid2DState, Grid2DCost>;

/// Runs any algorithm on any problem.
///
/// `H` is only used by A*.
pub fn solve<H, P, Sp, St, A, C>(
    problem: &P,
    algorithm: Algorithm,
    discipline: Discipline,
) -> SearchResult<St, C>
where
    H: Heuristic<St, C>,
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    match algorithm {
        Algorithm::Bfs => BfsSearch::<P, Sp, St, A, C>::new(problem, discipline).run(),
        Algorithm::Dfs => DfsSearch::<P, Sp, St, A, C>::new(problem, discipline).run(),
        Algorithm::Ucs => UcsSearch::<P, Sp, St, A, C>::new(problem, discipline).run(),
        Algorithm::AStar => AStarSearch::<H, P, Sp, St, A, C>::new(problem, discipline).run(),
    }
}

/// Finds a path between two cells of a grid.
///
/// Coordinates are `(row, col)` and must lie within the grid. Not finding a
/// path is not an error, it's an empty path.
///
/// ```
/// use gridsearch::config::SearchConfig;
/// use gridsearch::engine::search;
/// use gridsearch::problems::grid_2d::Grid2D;
///
/// let grid = Grid2D::new_open(3, 3).unwrap();
/// let config = "astar-graph".parse::<SearchConfig>().unwrap();
///
/// let result = search((0, 0), (2, 2), &grid, config).unwrap();
/// assert_eq!(result.path.len(), 5);
/// assert_eq!(result.total_cost, Some(8));
///
/// assert!(search((0, 0), (3, 0), &grid, config).is_err());
/// ```
pub fn search(
    start: (usize, usize),
    goal: (usize, usize),
    grid: &Grid2D,
    config: SearchConfig,
) -> Result<Grid2DSearchResult, SearchError> {
    let start = grid.state(start.0, start.1)?;
    let goal = grid.state(goal.0, goal.1)?;
    let instance = Grid2DInstance::new(Grid2DSpace::new(grid, config.cost_model), start, goal);
    Ok(run(&instance, config))
}

fn run(instance: &Grid2DInstance, config: SearchConfig) -> Grid2DSearchResult {
    log::debug!("Running {config} on {:?}", instance.space().grid());
    solve::<Grid2DHeuristicManhattan, _, _, _, _, _>(instance, config.algorithm, config.discipline)
}

impl Grid2DProblem {
    /// Searches from the start to the goal.
    pub fn solve(&self, config: SearchConfig) -> Grid2DSearchResult {
        run(&self.instance(config.cost_model), config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;

    use crate::problems::grid_2d::CostModel;
    use crate::problems::grid_2d::MAX_ENTRY_COST;
    use crate::problems::grid_2d::fixtures;

    /// The cheapest cost over every simple path.
    fn brute_force(instance: &Grid2DInstance) -> Option<Grid2DCost> {
        fn go(
            space: &Grid2DSpace,
            s: Grid2DState,
            goal: Grid2DState,
            g: Grid2DCost,
            visited: &mut Vec<Grid2DState>,
            best: &mut Option<Grid2DCost>,
        ) {
            if s == goal {
                *best = Some(best.map_or(g, |b| b.min(g)));
                return;
            }
            for (n, a) in space.neighbours(&s) {
                if visited.contains(&n) {
                    continue;
                }
                visited.push(n);
                go(space, n, goal, g + space.cost(&s, &a), visited, best);
                visited.pop();
            }
        }

        let mut best = None;
        let start = instance.start();
        if instance.space().valid(&start) {
            let mut visited = vec![start];
            go(instance.space(), start, instance.goal(), 0, &mut visited, &mut best);
        }
        best
    }

    fn random_problems() -> impl Iterator<Item = Grid2DProblem> {
        (0..40u64).flat_map(|seed| {
            let mut r = ChaCha8Rng::seed_from_u64(seed);
            let p = Grid2DProblem::random(4, 4, 0.3, 4, &mut r).unwrap();
            let q = p.randomize(&mut r);
            std::iter::once(p).chain(q)
        })
    }

    #[test]
    fn wall_scenario() {
        let problem = fixtures::wall_5x5();
        let grid = problem.grid();

        let ucs = search((0, 0), (4, 4), grid, "ucs-graph".parse().unwrap()).unwrap();
        let astar = search((0, 0), (4, 4), grid, "astar-graph".parse().unwrap()).unwrap();
        for result in [&ucs, &astar] {
            assert_eq!(result.total_cost, Some(8));
            assert_eq!(result.path.len(), 9);
        }
        assert_eq!(ucs.total_cost, astar.total_cost);
    }

    #[test]
    fn open_scenario() {
        let problem = fixtures::open_3x3();
        let bfs = problem.solve("bfs-graph".parse().unwrap());
        let ucs = problem.solve("ucs-graph".parse().unwrap());

        assert!(bfs.nodes_expanded <= 9);
        assert_eq!(bfs.path.len(), 5);
        assert_eq!(bfs.total_cost, ucs.total_cost);
    }

    #[test]
    fn start_is_goal() {
        let problem = fixtures::detour();
        for cost_model in CostModel::ALL {
            for config in SearchConfig::all(cost_model) {
                let result = search((1, 1), (1, 1), problem.grid(), config).unwrap();
                assert_eq!(result.path.len(), 1, "{config}");
                assert_eq!(result.total_cost, Some(0), "{config}");
                assert_eq!(result.nodes_expanded, 1, "{config}");
            }
        }
    }

    #[test]
    fn out_of_bounds() {
        let problem = fixtures::wall_5x5();
        let config = SearchConfig::new(Algorithm::Bfs, Discipline::Graph, CostModel::Uniform);

        assert_eq!(
            search((5, 0), (0, 0), problem.grid(), config),
            Err(SearchError::OutOfBounds(GridError::OutOfBounds {
                row: 5,
                col: 0,
                rows: 5,
                cols: 5,
            }))
        );
        assert!(search((0, 0), (0, 7), problem.grid(), config).is_err());
    }

    #[test]
    fn no_path() {
        let problem = fixtures::zero_cost_endpoints("S#G\n.#.\n");
        for config in SearchConfig::all(CostModel::Uniform) {
            let result = problem.solve(config);
            assert!(!result.found(), "{config}");
            assert_eq!(result.total_cost, None);
            assert_eq!(result.nodes_expanded, 2, "{config}");
        }
    }

    #[test]
    fn large_entry_costs() {
        let problem =
            Grid2DProblem::from_tables("2 1 3\n", Some("0 3000000000 3000000000\n")).unwrap();
        for cost_model in CostModel::ALL {
            for config in SearchConfig::all(cost_model) {
                let result = problem.solve(config);
                assert!(result.found(), "{config}");
                assert_eq!(result.total_cost, Some(6_000_000_002), "{config}");
                assert!(result.total_cost.is_some_and(|c| c.valid()), "{config}");
            }
        }

        let costs = format!("{} ", MAX_ENTRY_COST).repeat(5);
        let problem = Grid2DProblem::from_tables("2 1 1 1 3\n", Some(&costs)).unwrap();
        let expected = 4 * (Grid2DCost::from(MAX_ENTRY_COST) + 1);
        for config in SearchConfig::all(CostModel::Directional) {
            let result = problem.solve(config);
            assert_eq!(result.path.len(), 5, "{config}");
            assert_eq!(result.total_cost, Some(expected), "{config}");
            assert_eq!(result.path.cost(), Some(expected), "{config}");
        }
    }

    #[test]
    fn optimal_on_random_grids() {
        for problem in random_problems() {
            for cost_model in CostModel::ALL {
                let instance = problem.instance(cost_model);
                let best = brute_force(&instance);

                for config in SearchConfig::all(cost_model) {
                    let result = problem.solve(config);
                    let context = format!("{config} on {problem}");

                    // Every discipline finds a path when there's one.
                    assert_eq!(result.found(), best.is_some(), "{context}");
                    assert!(result.nodes_expanded > 0, "{context}");

                    if result.found() {
                        assert!(instance.space().valid_path(&result.path), "{context}");
                        assert_eq!(result.path.start(), Some(&problem.start()));
                        assert_eq!(result.path.end(), Some(&problem.goal()));
                        assert!(result.total_cost >= best, "{context}");
                    }

                    let optimal = config.discipline == Discipline::Graph
                        && matches!(config.algorithm, Algorithm::Ucs | Algorithm::AStar);
                    if optimal {
                        assert_eq!(result.total_cost, best, "{context}");
                    }
                }
            }
        }
    }

    #[test]
    fn deterministic() {
        for problem in random_problems().take(10) {
            for config in SearchConfig::all(CostModel::Directional) {
                assert_eq!(problem.solve(config), problem.solve(config));
            }
        }
    }

    #[test]
    fn paths_to_visited_states_are_prefixes() {
        let problem = fixtures::wall_5x5();
        for cost_model in CostModel::ALL {
            let instance = problem.instance(cost_model);

            let mut ucs = UcsSearch::new(&instance, Discipline::Graph);
            let mut astar =
                AStarSearch::<Grid2DHeuristicManhattan, _, _, _, _, _>::new(&instance, Discipline::Tree);
            let paths = [
                (ucs.find_path(), ucs.path_to(problem.goal())),
                (astar.find_path(), astar.path_to(problem.goal())),
            ];

            for (path, reconstructed) in paths.iter() {
                assert!(!path.is_empty());
                assert_eq!(path, reconstructed);
            }

            let path = &paths[0].0;
            for (i, s) in path.states().iter().enumerate() {
                let prefix = ucs.path_to(*s);
                assert_eq!(prefix.states(), &path.states()[..=i]);
                assert!(instance.space().valid_path(&prefix));
            }
            let path = &paths[1].0;
            for (i, s) in path.states().iter().enumerate() {
                assert_eq!(astar.path_to(*s).states(), &path.states()[..=i]);
            }
        }
    }

    #[test]
    fn shared_grid_across_threads() {
        let mut r = ChaCha8Rng::seed_from_u64(11);
        let problem = Grid2DProblem::random(30, 30, 0.25, 5, &mut r).unwrap();
        let grid = problem.grid();
        let (rows, cols) = grid.dimensions();
        let configs: Vec<SearchConfig> = CostModel::ALL
            .into_iter()
            .flat_map(SearchConfig::all)
            .collect();

        let sequential: Vec<_> = configs
            .iter()
            .map(|c| search((0, 0), (rows - 1, cols - 1), grid, *c))
            .collect();
        let parallel: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = configs
                .iter()
                .map(|c| scope.spawn(move || search((0, 0), (rows - 1, cols - 1), grid, *c)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(sequential, parallel);
    }
}
