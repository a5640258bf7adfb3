//! Measuring searches.
//!
//! Memory is estimated from the peak Frontier size and the Search Table size,
//! which is what dominates a search's footprint.

use std::io::Write;
use std::time::Duration;

use hrsw::Stopwatch;
use human_duration::human_duration;
use size::Size;
use thousands::Separable;

use crate::algorithms::driver::SearchStats;
use crate::config::SearchConfig;
use crate::engine::Grid2DSearchResult;
use crate::engine::SearchError;
use crate::problems::grid_2d::Grid2DProblem;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStats {
    /// Largest Frontier length.
    pub peak_open: usize,
    pub peak_open_bytes: usize,
    /// Search Table length.
    pub records: usize,
    pub table_bytes: usize,
}

impl MemoryStats {
    pub fn peak_bytes(&self) -> usize {
        self.peak_open_bytes + self.table_bytes
    }
}

impl From<&SearchStats> for MemoryStats {
    fn from(stats: &SearchStats) -> Self {
        Self {
            peak_open: stats.peak_open,
            peak_open_bytes: stats.peak_open_bytes(),
            records: stats.records,
            table_bytes: stats.table_bytes(),
        }
    }
}

impl std::fmt::Display for MemoryStats {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} (|Open|*: {}, |Table|: {})",
            Size::from_bytes(self.peak_bytes()),
            self.peak_open.separate_with_commas(),
            self.records.separate_with_commas(),
        )
    }
}

/// A single timed search.
#[derive(Clone, Debug)]
pub struct Measurement {
    pub config: SearchConfig,
    pub result: Grid2DSearchResult,
    pub elapsed: Duration,
    pub memory: MemoryStats,
}

/// Runs and times a search.
pub fn measure(problem: &Grid2DProblem, config: SearchConfig) -> Measurement {
    let mut stopwatch = Stopwatch::new_started();
    let result = problem.solve(config);
    stopwatch.stop();

    let memory = MemoryStats::from(&result.stats);
    Measurement {
        config,
        result,
        elapsed: stopwatch.elapsed(),
        memory,
    }
}

fn write_cost<W: Write>(out: &mut W, result: &Grid2DSearchResult) -> std::io::Result<()> {
    match result.total_cost {
        Some(c) => write!(out, "{}", c.separate_with_commas()),
        None => write!(out, "-"),
    }
}

impl Measurement {
    /// Writes an org-mode section.
    pub fn write_org<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "*** {}", self.config)?;
        writeln!(out, "- Found: {}", self.result.found())?;
        writeln!(out, "- Path length: {}", self.result.path.len())?;
        writeln!(
            out,
            "- Nodes expanded: {}",
            self.result.nodes_expanded.separate_with_commas()
        )?;
        write!(out, "- Total cost: ")?;
        write_cost(out, &self.result)?;
        writeln!(out)?;
        writeln!(out, "- Elapsed: {}", human_duration(&self.elapsed))?;
        writeln!(out, "- Peak memory: {}", self.memory)?;
        writeln!(out, "#+begin_src text")?;
        self.result.stats.write_memory_stats(&mut *out)?;
        writeln!(out, "#+end_src")?;
        Ok(())
    }
}

/// Averages over repeated runs of the same search.
#[derive(Clone, Debug)]
pub struct Simulation {
    pub iterations: usize,
    pub mean_elapsed: Duration,
    pub min_elapsed: Duration,
    pub max_elapsed: Duration,
    pub mean_peak_bytes: usize,
    pub max_peak_bytes: usize,
    /// The last run. Searches are deterministic, so this is every run's
    /// result.
    pub last: Measurement,
}

/// Repeats a search `iterations` times.
pub fn simulate(
    problem: &Grid2DProblem,
    config: SearchConfig,
    iterations: usize,
) -> Result<Simulation, SearchError> {
    if iterations == 0 {
        return Err(SearchError::InvalidConfiguration(
            "Simulations need at least one iteration".to_string(),
        ));
    }

    let mut total = Duration::ZERO;
    let mut min_elapsed = Duration::MAX;
    let mut max_elapsed = Duration::ZERO;
    let mut total_bytes = 0usize;
    let mut max_peak_bytes = 0usize;

    let mut last = measure(problem, config);
    for i in 0..iterations {
        if i > 0 {
            last = measure(problem, config);
        }
        total += last.elapsed;
        min_elapsed = min_elapsed.min(last.elapsed);
        max_elapsed = max_elapsed.max(last.elapsed);
        total_bytes += last.memory.peak_bytes();
        max_peak_bytes = max_peak_bytes.max(last.memory.peak_bytes());
    }

    let simulation = Simulation {
        iterations,
        mean_elapsed: total.div_f64(iterations as f64),
        min_elapsed,
        max_elapsed,
        mean_peak_bytes: total_bytes / iterations,
        max_peak_bytes,
        last,
    };
    log::debug!(
        "Simulated {config} {iterations} times. Mean={}",
        human_duration(&simulation.mean_elapsed)
    );
    Ok(simulation)
}

impl Simulation {
    pub fn config(&self) -> SearchConfig {
        self.last.config
    }

    /// Writes an org-mode section.
    pub fn write_org<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        self.last.write_org(out)?;
        writeln!(out, "**** Simulation")?;
        writeln!(out, "- Iterations: {}", self.iterations.separate_with_commas())?;
        writeln!(
            out,
            "- Elapsed: {} (min: {}, max: {})",
            human_duration(&self.mean_elapsed),
            human_duration(&self.min_elapsed),
            human_duration(&self.max_elapsed),
        )?;
        writeln!(
            out,
            "- Peak memory: {} (max: {})",
            Size::from_bytes(self.mean_peak_bytes),
            Size::from_bytes(self.max_peak_bytes),
        )?;
        Ok(())
    }
}

/// Writes an org-mode table comparing simulations.
pub fn write_org_table<W: Write>(out: &mut W, simulations: &[Simulation]) -> std::io::Result<()> {
    writeln!(
        out,
        "| {:28} | {:6} | {:6} | {:10} | {:10} | {:16} | {:12} |",
        "Search", "Found", "Length", "Expanded", "Cost", "Mean time", "Peak memory"
    )?;
    writeln!(out, "|{:-<30}+{:-<8}+{:-<8}+{:-<12}+{:-<12}+{:-<18}+{:-<14}|", "", "", "", "", "", "", "")?;
    for s in simulations {
        let result = &s.last.result;
        let mut cost = Vec::new();
        write_cost(&mut cost, result)?;
        writeln!(
            out,
            "| {:28} | {:6} | {:6} | {:>10} | {:>10} | {:16} | {:12} |",
            s.config().to_string(),
            result.found(),
            result.path.len(),
            result.nodes_expanded.separate_with_commas(),
            String::from_utf8_lossy(&cost),
            human_duration(&s.mean_elapsed),
            Size::from_bytes(s.mean_peak_bytes).to_string(),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::problems::grid_2d::CostModel;
    use crate::problems::grid_2d::fixtures;

    #[test]
    fn measures_searches() {
        let problem = fixtures::wall_5x5();
        let config = "ucs-graph".parse().unwrap();
        let m = measure(&problem, config);

        assert_eq!(m.result, problem.solve(config));
        assert_eq!(m.memory, MemoryStats::from(&m.result.stats));
        assert!(m.memory.peak_bytes() > 0);
        assert!(m.memory.records >= m.result.nodes_expanded);

        let mut out = Vec::new();
        m.write_org(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("*** UCS-Graph (uniform)\n"));
        assert!(out.contains("- Found: true\n"));
        assert!(out.contains("- Path length: 9\n"));
        assert!(out.contains("- Total cost: 8\n"));
        assert!(out.contains("Search Stats:"));
    }

    #[test]
    fn simulates_searches() {
        let problem = fixtures::wall_5x5();
        let config = "astar-tree-directional".parse().unwrap();

        let s = simulate(&problem, config, 5).unwrap();
        assert_eq!(s.iterations, 5);
        assert_eq!(s.config(), config);
        assert!(s.min_elapsed <= s.mean_elapsed);
        assert!(s.mean_elapsed <= s.max_elapsed);
        assert_eq!(s.mean_peak_bytes, s.max_peak_bytes);
        assert_eq!(s.last.result, problem.solve(config));

        let mut out = Vec::new();
        s.write_org(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("- Iterations: 5\n"));
    }

    #[test]
    fn needs_iterations() {
        let problem = fixtures::open_3x3();
        let config = "bfs-graph".parse().unwrap();
        assert!(matches!(
            simulate(&problem, config, 0),
            Err(SearchError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn compares_searches() {
        let problem = fixtures::zero_cost_endpoints("S#G\n.#.\n");
        let simulations: Vec<_> = SearchConfig::all(CostModel::Uniform)
            .into_iter()
            .map(|c| simulate(&problem, c, 1).unwrap())
            .collect();

        let mut out = Vec::new();
        write_org_table(&mut out, &simulations).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.lines().count(), 2 + 8);
        assert!(out.contains("| A*-Graph (uniform)"));
        assert!(out.lines().skip(2).all(|l| l.contains("| false ")));
    }
}
