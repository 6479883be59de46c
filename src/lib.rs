//! # Antenna Placement
//!
//! A heuristic solver for capacitated antenna placement: every building must
//! be served by exactly one antenna whose type covers it in range and whose
//! total served demand stays within capacity, at minimum total activation
//! cost.
//!
//! The pipeline builds an initial solution greedily, refines it with
//! simulated annealing over a family of local search operators (type
//! downgrade, merge, absorption, reposition, relocate, split), polishes the
//! result by hill climbing, and finally hands it to a [`scorer::Scorer`] for
//! an authoritative verdict.

pub mod annealing;
pub mod antenna;
pub mod config;
pub mod error;
pub mod greedy;
pub mod local_search;
pub mod problem;
pub mod scorer;
pub mod solution;
pub mod spatial;
pub mod utils;

use crate::annealing::{Annealing, AnnealingOutcome};
use crate::config::Config;
use crate::error::{PlacementError, Result};
use crate::greedy::Greedy;
use crate::local_search::LocalSearch;
use crate::problem::Problem;
use crate::scorer::{ReferenceScorer, Scorer};
use crate::solution::Solution;
use crate::spatial::SpatialIndex;
use crate::utils::SearchStatistics;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::{Duration, Instant};

/// Result of one construct/anneal/polish run.
#[derive(Clone)]
pub struct RunOutcome {
    pub seed: u64,
    pub solution: Solution,
    pub initial_cost: u64,
    pub annealing: Option<AnnealingOutcome>,
    pub polish_moves: usize,
}

impl RunOutcome {
    pub fn cost(&self) -> u64 {
        self.solution.cost()
    }
}

/// The main algorithm structure that orchestrates construction and search.
pub struct PlacementAlgorithm {
    pub problem: Problem,
    pub config: Config,
    pub index: SpatialIndex,
    pub best_solution: Option<Solution>,
    pub statistics: Option<SearchStatistics>,
    pub run_time: Duration,
}

impl PlacementAlgorithm {
    /// Create a new instance for the given problem and configuration.
    pub fn new(problem: Problem, config: Config) -> Self {
        let index = SpatialIndex::new(&problem, config.cell_size);
        if index.is_empty() {
            debug!("Problem {} has no buildings", problem.name);
        } else {
            debug!(
                "Spatial index over {} buildings, cell size {}",
                index.len(),
                index.cell_size()
            );
        }
        PlacementAlgorithm {
            problem,
            config,
            index,
            best_solution: None,
            statistics: None,
            run_time: Duration::from_secs(0),
        }
    }

    /// Operator family bound to this instance.
    pub fn local_search(&self) -> LocalSearch<'_> {
        LocalSearch::new(&self.problem, &self.index, &self.config)
    }

    /// Build an initial solution with the greedy constructor.
    pub fn construct(&self, rng: &mut ChaCha8Rng) -> Result<Solution> {
        Greedy::construct(
            &self.problem,
            &self.index,
            self.config.candidate_sampling,
            rng,
        )
    }

    /// Anneal and then polish a feasible solution.
    pub fn optimize(&self, initial: Solution, seed: u64, rng: &mut ChaCha8Rng) -> RunOutcome {
        let initial_cost = initial.cost();

        let (mut solution, annealing) = if initial.antenna_count() == 0 {
            (initial, None)
        } else {
            let annealing = Annealing::new(self.local_search(), &self.config);
            let outcome = annealing.run(initial, rng);
            (outcome.best.clone(), Some(outcome))
        };

        let polish_moves = if self.config.polish {
            let moves = self.local_search().improve(&mut solution);
            info!("Polish: {} moves, cost {}", moves, solution.cost());
            moves
        } else {
            0
        };

        RunOutcome {
            seed,
            solution,
            initial_cost,
            annealing,
            polish_moves,
        }
    }

    /// One full run from scratch with the given seed.
    pub fn single_run(&self, seed: u64) -> Result<RunOutcome> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let initial = self.construct(&mut rng)?;
        Ok(self.optimize(initial, seed, &mut rng))
    }

    /// Run all restarts and return the best scorer-approved solution, using
    /// the reference scorer.
    pub fn run(&mut self) -> Result<&Solution> {
        self.run_with_scorer(&ReferenceScorer)
    }

    /// Run all restarts and return the best solution the scorer accepts.
    pub fn run_with_scorer<S: Scorer>(&mut self, scorer: &S) -> Result<&Solution> {
        let start = Instant::now();
        self.problem.check_feasible_demands()?;

        let outcomes = self
            .run_restarts()
            .into_iter()
            .collect::<Result<Vec<_>>>()?;

        self.finish(outcomes, scorer, start)
    }

    /// Optimize a previously found solution instead of constructing one,
    /// using the reference scorer.
    pub fn run_from(&mut self, seed_solution: Solution) -> Result<&Solution> {
        self.run_from_with_scorer(seed_solution, &ReferenceScorer)
    }

    /// Optimize a previously found solution and return the result if the
    /// scorer accepts it.
    pub fn run_from_with_scorer<S: Scorer>(
        &mut self,
        seed_solution: Solution,
        scorer: &S,
    ) -> Result<&Solution> {
        let start = Instant::now();
        seed_solution.check(&self.problem)?;

        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let outcome = self.optimize(seed_solution, self.config.seed, &mut rng);

        self.finish(vec![outcome], scorer, start)
    }

    fn run_restarts(&self) -> Vec<Result<RunOutcome>> {
        let seeds: Vec<u64> = (0..self.config.restarts.max(1) as u64)
            .map(|r| self.config.seed.wrapping_add(r))
            .collect();

        #[cfg(feature = "parallel")]
        let outcomes: Vec<Result<RunOutcome>> = {
            use rayon::prelude::*;
            seeds.into_par_iter().map(|s| self.single_run(s)).collect()
        };

        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<Result<RunOutcome>> =
            seeds.into_iter().map(|s| self.single_run(s)).collect();

        outcomes
    }

    /// Keep the cheapest outcome the scorer accepts and record statistics.
    fn finish<S: Scorer>(
        &mut self,
        mut outcomes: Vec<RunOutcome>,
        scorer: &S,
        start: Instant,
    ) -> Result<&Solution> {
        outcomes.sort_by_key(|o| (o.cost(), o.seed));

        let mut rejection = None;
        let mut chosen = None;
        for outcome in &outcomes {
            let score = scorer.score(&outcome.solution.to_output(&self.problem), &self.problem);
            if score.valid {
                if score.cost != outcome.cost() {
                    warn!(
                        "Scorer cost {} differs from engine cost {}",
                        score.cost,
                        outcome.cost()
                    );
                }
                info!("Seed {}: {}", outcome.seed, score.message);
                chosen = Some(outcome);
                break;
            }
            warn!("Seed {}: scorer rejected solution: {}", outcome.seed, score.message);
            rejection.get_or_insert(PlacementError::Rejected {
                cost: outcome.cost(),
                message: score.message,
            });
        }

        let Some(best) = chosen else {
            return Err(rejection.unwrap_or(PlacementError::Rejected {
                cost: 0,
                message: "no run produced a solution".to_string(),
            }));
        };

        self.run_time = start.elapsed();
        self.statistics = Some(SearchStatistics {
            restarts: outcomes.len(),
            iterations: outcomes
                .iter()
                .filter_map(|o| o.annealing.as_ref())
                .map(|a| a.iterations)
                .sum(),
            accepted_moves: best.annealing.as_ref().map_or(0, |a| a.accepted),
            improvements: best.annealing.as_ref().map_or(0, |a| a.improvements),
            polish_moves: best.polish_moves,
            runtime: self.run_time,
            initial_cost: best.initial_cost,
            best_cost: best.cost(),
            best_antennas: best.solution.antenna_count(),
            best_singletons: best.solution.singleton_count(),
        });

        Ok(self.best_solution.insert(best.solution.clone()))
    }
}
