use std::fs::File;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;

use anstream::println;
use clap::Parser;
use human_duration::human_duration;
use indoc::indoc;
use owo_colors::OwoColorize;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use gridsearch::algorithms::Algorithm;
use gridsearch::algorithms::Discipline;
use gridsearch::config::SearchConfig;
use gridsearch::problems::grid_2d::CostModel;
use gridsearch::problems::grid_2d::Grid2DProblem;
use gridsearch::render;
use gridsearch::report;
use gridsearch::report::Simulation;

#[cfg(feature = "mem_profile")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;
#[cfg(all(not(feature = "mem_profile"), not(target_env = "msvc")))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Searches taking longer than this get a warning.
const SLOW_SEARCH: Duration = Duration::from_secs(1);
/// Width of the search column in summaries.
const CONFIG_WIDTH: usize = 28;

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(long_version = gridsearch::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Org file where runs are appended.
    #[arg(
        short,
        long,
        env = "GRIDSEARCH_LOGS",
        default_value = "logs/gridsearch.org"
    )]
    pub output: PathBuf,

    /// Table of cell codes (0: obstacle, 1: free, 2: start, 3: goal).
    #[arg(long, group = "input")]
    pub codes: Option<PathBuf>,
    /// Table of entry costs matching the codes table.
    #[arg(long, requires = "codes")]
    pub costs: Option<PathBuf>,
    /// ASCII map.
    #[arg(long, group = "input")]
    pub map: Option<PathBuf>,
    /// Maze image.
    #[arg(long, group = "input")]
    pub image: Option<PathBuf>,
    /// Random grid of ROWSxCOLS cells.
    #[arg(long, group = "input", value_parser = parse_dimensions)]
    pub random: Option<(usize, usize)>,
    /// Ratio of walls on random grids.
    #[arg(long, default_value_t = 0.2)]
    pub obstacles: f64,
    /// Largest entry cost on random grids.
    #[arg(long, default_value_t = 1u32)]
    pub max_entry_cost: u32,
    #[arg(long, default_value_t = 0u64)]
    pub seed: u64,

    #[arg(short, long, default_value = "astar")]
    pub algorithm: Algorithm,
    #[arg(short, long, default_value = "graph")]
    pub discipline: Discipline,
    #[arg(short = 'm', long, default_value = "uniform")]
    pub cost_model: CostModel,
    /// Runs every algorithm with every discipline.
    #[arg(long)]
    pub all: bool,
    /// Runs of each search to average over.
    #[arg(short = 'n', long, default_value_t = 1usize)]
    pub iterations: usize,

    /// Image to draw the first path found on.
    #[arg(long)]
    pub render: Option<PathBuf>,
    /// Pixels per cell when rendering.
    #[arg(long, default_value_t = 8u32)]
    pub scale: u32,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

fn parse_dimensions(s: &str) -> Result<(usize, usize), String> {
    let (rows, cols) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("Expected ROWSxCOLS, got '{s}'"))?;
    let parse = |n: &str| {
        n.trim()
            .parse::<usize>()
            .map_err(|e| format!("Invalid dimension '{n}'. {e}"))
    };
    Ok((parse(rows)?, parse(cols)?))
}

/// Loads the problem from whichever input was given.
fn load(args: &Args) -> std::io::Result<(String, Grid2DProblem)> {
    if let Some(codes) = &args.codes {
        let problem = Grid2DProblem::from_table_files(codes, args.costs.as_deref())
            .map_err(std::io::Error::other)?;
        return Ok((codes.display().to_string(), problem));
    }
    if let Some(map) = &args.map {
        let s = std::fs::read_to_string(map)?;
        let problem = Grid2DProblem::try_from(s.as_str()).map_err(std::io::Error::other)?;
        return Ok((map.display().to_string(), problem));
    }
    if let Some(image) = &args.image {
        let problem = Grid2DProblem::try_from(image.as_path()).map_err(std::io::Error::other)?;
        return Ok((image.display().to_string(), problem));
    }
    if let Some((rows, cols)) = args.random {
        let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
        let problem = Grid2DProblem::random(
            rows,
            cols,
            args.obstacles,
            args.max_entry_cost,
            &mut rng,
        )
        .map_err(std::io::Error::other)?;
        return Ok((format!("random {rows}x{cols} (seed {})", args.seed), problem));
    }

    let maze_str = indoc! {"
      S..#......
      .#.#.####.
      .#...#....
      .#####.##.
      ...2...#.G
    "};
    let problem = Grid2DProblem::try_from(maze_str).map_err(std::io::Error::other)?;
    Ok(("demo".to_string(), problem))
}

/// The search name, right-aligned so summaries line up.
fn config_label(config: SearchConfig) -> String {
    format!("{:>CONFIG_WIDTH$}", config.to_string())
}

fn print_summary(s: &Simulation) {
    let result = &s.last.result;
    let outcome = if result.found() {
        format!(
            "cost {} over {} cells",
            result.total_cost.map_or("?".to_string(), |c| c.to_string()),
            result.path.len()
        )
        .green()
        .to_string()
    } else {
        "no path".red().to_string()
    };
    println!(
        "{}: {outcome}, {} expanded in {} ({})",
        config_label(s.config()).bold(),
        result.nodes_expanded,
        human_duration(&s.mean_elapsed).cyan(),
        s.last.memory,
    );
}

fn write_header<W: Write>(out: &mut W, name: &str, problem: &Grid2DProblem) -> std::io::Result<()> {
    writeln!(out, "* {name}")?;
    writeln!(out, ":PROPERTIES:")?;
    writeln!(out, ":VERSION: {:?}", gridsearch::build::PKG_VERSION)?;
    writeln!(out, ":BUILD_IS_DEBUG: {}", shadow_rs::is_debug())?;
    writeln!(out, ":END:")?;
    writeln!(out, "** Problem")?;
    writeln!(out, "#+begin_quote\n{problem}#+end_quote")?;
    writeln!(out, "** Runs")?;
    Ok(())
}

fn main() -> std::io::Result<()> {
    #[cfg(feature = "coz_profile")]
    coz::thread_init();

    let args = Args::parse();
    args.color.write_global();

    let (name, problem) = load(&args)?;
    println!("{} {}", "Problem".bold(), name.yellow());
    println!("{problem}");

    let configs = if args.all {
        SearchConfig::all(args.cost_model)
    } else {
        vec![SearchConfig::new(
            args.algorithm,
            args.discipline,
            args.cost_model,
        )]
    };

    let mut simulations = Vec::with_capacity(configs.len());
    for config in configs {
        let simulation =
            report::simulate(&problem, config, args.iterations).map_err(std::io::Error::other)?;
        if simulation.mean_elapsed > SLOW_SEARCH {
            log::warn!(
                "{config} is slow on {name} ({})",
                human_duration(&simulation.mean_elapsed)
            );
        }
        print_summary(&simulation);
        simulations.push(simulation);
    }

    if let Some(file) = &args.render {
        let path = simulations
            .iter()
            .map(|s| &s.last.result.path)
            .find(|p| !p.is_empty());
        if let Some(path) = path {
            println!("{}", problem.display_path(path));
            render::save(&problem, path, args.scale, file).map_err(std::io::Error::other)?;
            println!("Rendered to {}", file.display().yellow());
        } else {
            println!("{}", "Nothing to render, no path was found".red());
        }
    }

    if let Some(dir) = args.output.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let file: File = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&args.output)?;
    let mut out = BufWriter::new(file);
    write_header(&mut out, &name, &problem)?;
    for s in &simulations {
        s.write_org(&mut out)?;
    }
    if simulations.len() > 1 {
        writeln!(out, "** Comparison")?;
        report::write_org_table(&mut out, &simulations)?;
    }
    out.flush()?;
    println!("Logged to {}", args.output.display().yellow());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_line_up() {
        for cost_model in CostModel::ALL {
            for config in SearchConfig::all(cost_model) {
                let label = config_label(config);
                assert_eq!(label.chars().count(), CONFIG_WIDTH, "{label:?}");
                assert!(label.ends_with(&config.to_string()));
            }
        }
    }

    #[test]
    fn dimensions() {
        assert_eq!(parse_dimensions("3x4"), Ok((3, 4)));
        assert_eq!(parse_dimensions("10X2"), Ok((10, 2)));
        assert!(parse_dimensions("3").is_err());
        assert!(parse_dimensions("ax4").is_err());
    }
}
