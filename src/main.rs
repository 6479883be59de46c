//! Command-line entry point: optimize one dataset and save the result.

use antenna_placement::config::{CandidateSampling, Config};
use antenna_placement::problem::Problem;
use antenna_placement::scorer::{ReferenceScorer, Scorer};
use antenna_placement::utils::{format_duration, load_solution, save_solution};
use antenna_placement::PlacementAlgorithm;
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "antenna-placement", about = "Place antennas at minimum cost")]
struct Args {
    /// Dataset JSON with a `buildings` array
    dataset: PathBuf,

    /// Where to write the solution (defaults to `solution_<dataset>_<cost>.json`)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON configuration file; command-line flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Existing solution to improve instead of constructing one
    #[arg(long)]
    seed_solution: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u64>,

    /// Annealing iteration budget
    #[arg(long)]
    iterations: Option<u64>,

    #[arg(long)]
    restarts: Option<usize>,

    /// Time limit per annealing run, in seconds
    #[arg(long)]
    time_limit: Option<u64>,

    /// Greedy candidate sample size; 0 scans every uncovered building
    #[arg(long)]
    sample: Option<usize>,
}

impl Args {
    fn config(&self) -> Result<Config, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::new(),
        };
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(iterations) = self.iterations {
            config = config.with_max_iterations(iterations);
        }
        if let Some(restarts) = self.restarts {
            config = config.with_restarts(restarts);
        }
        if let Some(secs) = self.time_limit {
            config = config.with_time_limit(Duration::from_secs(secs));
        }
        match self.sample {
            Some(0) => config = config.with_candidate_sampling(CandidateSampling::Full),
            Some(n) => config = config.with_candidate_sampling(CandidateSampling::Sample(n)),
            None => {}
        }
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.config()?;

    info!("Loading dataset from: {}", args.dataset.display());
    let problem = Problem::from_file(&args.dataset)?;
    info!(
        "Loaded dataset: {} with {} buildings",
        problem.name,
        problem.building_count()
    );

    let mut algorithm = PlacementAlgorithm::new(problem, config);
    let solution = match &args.seed_solution {
        Some(path) => {
            let seed = load_solution(path, &algorithm.problem)?;
            info!("Improving seed solution with cost {}", seed.cost());
            algorithm.run_from(seed)?.clone()
        }
        None => algorithm.run()?.clone(),
    };

    if let Some(stats) = &algorithm.statistics {
        println!("{}", stats.format());
    }

    let score = ReferenceScorer.score(&solution.to_output(&algorithm.problem), &algorithm.problem);
    println!("{}", score.message);
    println!("Completed in {}", format_duration(algorithm.run_time));

    if score.valid {
        let output = args.output.clone().unwrap_or_else(|| {
            PathBuf::from(format!(
                "solution_{}_{}.json",
                algorithm.problem.name, score.cost
            ))
        });
        save_solution(&solution, &algorithm.problem, &output)?;
        println!("Saved to: {}", output.display());
    }

    Ok(())
}
