use std::time::Duration;

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use glob::glob;
use hrsw::Stopwatch;
use human_duration::human_duration;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use gridsearch::config::SearchConfig;
use gridsearch::problems::grid_2d::CostModel;
use gridsearch::problems::grid_2d::Grid2DProblem;

const MAX_INSTANCE_TIME: Duration = Duration::from_millis(500);

fn instances() -> Vec<(String, Grid2DProblem)> {
    let mut instances = vec![];

    for path in glob("data/grids/*.txt")
        .unwrap()
        .filter_map(std::result::Result::ok)
    {
        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        let map = std::fs::read_to_string(&path).unwrap();
        let base_problem = Grid2DProblem::try_from(map.as_str()).unwrap();
        let (rows, cols) = base_problem.grid().dimensions();

        for i in 0..3 {
            let mut rng = ChaCha8Rng::seed_from_u64(i);
            if let Some(problem) = base_problem.randomize(&mut rng) {
                instances.push((format!("{name}[{rows}x{cols}]:{i}"), problem));
            }
        }
    }

    for (i, size) in [32usize, 128].into_iter().enumerate() {
        let mut rng = ChaCha8Rng::seed_from_u64(i as u64);
        let problem = Grid2DProblem::random(size, size, 0.25, 9, &mut rng).unwrap();
        instances.push((format!("random[{size}x{size}]:{i}"), problem));
    }

    instances
}

fn compare_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("Grid2D Search");

    for (instance_name, problem) in instances() {
        for cost_model in CostModel::ALL {
            for config in SearchConfig::all(cost_model) {
                let mut stopwatch = Stopwatch::new_started();
                let result = problem.solve(config);
                stopwatch.stop();

                let elapsed = stopwatch.elapsed();
                if elapsed > MAX_INSTANCE_TIME {
                    log::warn!(
                        "Skipping {instance_name} as it takes too long with {config} ({})",
                        human_duration(&elapsed)
                    );
                    continue;
                }
                if !result.found() {
                    continue;
                }

                group.bench_with_input(
                    BenchmarkId::new(config.to_string(), &instance_name),
                    &problem,
                    |b, p| b.iter(|| p.solve(config)),
                );
            }
        }
    }
    group.finish();
}

criterion_group!(benches, compare_search);
criterion_main!(benches);
