//! Choosing a search.

use std::str::FromStr;

use derive_more::Display;

use crate::algorithms::Algorithm;
use crate::algorithms::Discipline;
use crate::engine::SearchError;
use crate::problems::grid_2d::CostModel;

/// Which search to run, and how moves are priced.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
#[display("{algorithm}-{discipline} ({cost_model})")]
pub struct SearchConfig {
    pub algorithm: Algorithm,
    pub discipline: Discipline,
    pub cost_model: CostModel,
}

impl SearchConfig {
    pub fn new(algorithm: Algorithm, discipline: Discipline, cost_model: CostModel) -> Self {
        Self {
            algorithm,
            discipline,
            cost_model,
        }
    }

    /// Every algorithm with every discipline, algorithm first.
    ///
    /// ```
    /// use gridsearch::config::SearchConfig;
    /// use gridsearch::problems::grid_2d::CostModel;
    ///
    /// let all = SearchConfig::all(CostModel::Uniform);
    /// assert_eq!(all.len(), 8);
    /// assert_eq!(all[0].to_string(), "BFS-Tree (uniform)");
    /// assert_eq!(all[7].to_string(), "A*-Graph (uniform)");
    /// ```
    pub fn all(cost_model: CostModel) -> Vec<SearchConfig> {
        Algorithm::ALL
            .iter()
            .flat_map(|a| {
                Discipline::ALL
                    .iter()
                    .map(move |d| SearchConfig::new(*a, *d, cost_model))
            })
            .collect()
    }
}

fn invalid(kind: &str, s: &str) -> SearchError {
    SearchError::InvalidConfiguration(format!("Unknown {kind} '{s}'"))
}

impl FromStr for Algorithm {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bfs" | "breadth-first" => Ok(Algorithm::Bfs),
            "dfs" | "depth-first" => Ok(Algorithm::Dfs),
            "ucs" | "uniform-cost" | "dijkstra" => Ok(Algorithm::Ucs),
            "astar" | "a*" | "a-star" => Ok(Algorithm::AStar),
            _ => Err(invalid("algorithm", s)),
        }
    }
}

impl FromStr for Discipline {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tree" => Ok(Discipline::Tree),
            "graph" => Ok(Discipline::Graph),
            _ => Err(invalid("discipline", s)),
        }
    }
}

impl FromStr for CostModel {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniform" => Ok(CostModel::Uniform),
            "directional" => Ok(CostModel::Directional),
            _ => Err(invalid("cost model", s)),
        }
    }
}

/// Every way of cutting `s` in two around a separator.
fn splits(s: &str) -> impl Iterator<Item = (&str, &str)> {
    s.char_indices()
        .filter(|(_i, c)| *c == '-' || *c == ':')
        .map(move |(i, c)| (&s[..i], &s[i + c.len_utf8()..]))
}

impl FromStr for SearchConfig {
    type Err = SearchError;

    /// Parses `<algorithm>-<discipline>[-<cost model>]`. `:` works as a
    /// separator too, and the cost model defaults to uniform.
    ///
    /// ```
    /// use gridsearch::algorithms::Algorithm;
    /// use gridsearch::algorithms::Discipline;
    /// use gridsearch::config::SearchConfig;
    /// use gridsearch::problems::grid_2d::CostModel;
    ///
    /// let c: SearchConfig = "a-star:tree:directional".parse().unwrap();
    /// assert_eq!(
    ///     c,
    ///     SearchConfig::new(Algorithm::AStar, Discipline::Tree, CostModel::Directional)
    /// );
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Algorithm names may have separators in them.
        for (algorithm, rest) in splits(s) {
            let Ok(algorithm) = algorithm.parse::<Algorithm>() else {
                continue;
            };
            if let Ok(discipline) = rest.parse::<Discipline>() {
                return Ok(SearchConfig::new(
                    algorithm,
                    discipline,
                    CostModel::default(),
                ));
            }
            for (discipline, cost_model) in splits(rest) {
                if let (Ok(discipline), Ok(cost_model)) = (
                    discipline.parse::<Discipline>(),
                    cost_model.parse::<CostModel>(),
                ) {
                    return Ok(SearchConfig::new(algorithm, discipline, cost_model));
                }
            }
        }
        Err(invalid("search configuration", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        for (s, a) in [
            ("bfs", Algorithm::Bfs),
            ("Breadth-First", Algorithm::Bfs),
            ("dfs", Algorithm::Dfs),
            ("depth-first", Algorithm::Dfs),
            ("UCS", Algorithm::Ucs),
            ("uniform-cost", Algorithm::Ucs),
            ("dijkstra", Algorithm::Ucs),
            ("astar", Algorithm::AStar),
            ("A*", Algorithm::AStar),
            ("a-star", Algorithm::AStar),
        ] {
            assert_eq!(s.parse::<Algorithm>(), Ok(a), "{s}");
        }
        assert_eq!("Tree".parse::<Discipline>(), Ok(Discipline::Tree));
        assert_eq!("graph".parse::<Discipline>(), Ok(Discipline::Graph));
        assert_eq!("uniform".parse::<CostModel>(), Ok(CostModel::Uniform));
        assert_eq!(
            "Directional".parse::<CostModel>(),
            Ok(CostModel::Directional)
        );
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(
            "greedy".parse::<Algorithm>(),
            Err(SearchError::InvalidConfiguration(
                "Unknown algorithm 'greedy'".to_string()
            ))
        );
        assert!("forest".parse::<Discipline>().is_err());
        assert!("free".parse::<CostModel>().is_err());
    }

    #[test]
    fn parses_compact_names() {
        let c = |a, d, m| SearchConfig::new(a, d, m);

        assert_eq!(
            "ucs-graph".parse::<SearchConfig>(),
            Ok(c(Algorithm::Ucs, Discipline::Graph, CostModel::Uniform))
        );
        assert_eq!(
            "breadth-first:tree".parse::<SearchConfig>(),
            Ok(c(Algorithm::Bfs, Discipline::Tree, CostModel::Uniform))
        );
        assert_eq!(
            "uniform-cost-tree-directional".parse::<SearchConfig>(),
            Ok(c(Algorithm::Ucs, Discipline::Tree, CostModel::Directional))
        );
        assert_eq!(
            "a*:graph:uniform".parse::<SearchConfig>(),
            Ok(c(Algorithm::AStar, Discipline::Graph, CostModel::Uniform))
        );

        for bad in ["", "ucs", "ucs-", "ucs-forest", "greedy-graph", "bfs-graph-free"] {
            assert!(
                matches!(
                    bad.parse::<SearchConfig>(),
                    Err(SearchError::InvalidConfiguration(_))
                ),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn all_configurations() {
        let all = SearchConfig::all(CostModel::Directional);
        assert_eq!(all.len(), 8);
        for (i, a) in all.iter().enumerate() {
            assert_eq!(a.cost_model, CostModel::Directional);
            for b in all.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
