//! Configuration parameters for the placement engine.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use crate::error::Result;

/// Which uncovered buildings the greedy constructor considers as antenna
/// positions in each round.
///
/// Scanning every uncovered building is quadratic in the instance size;
/// sampling bounds each round at the price of possibly missing the best
/// position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidateSampling {
    /// Every uncovered building is a candidate
    Full,
    /// At most this many uncovered buildings, drawn at random each round
    Sample(usize),
}

/// Relative selection weights for the annealing operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorWeights {
    pub relocate: f64,
    pub merge: f64,
    pub multi_merge: f64,
    pub absorb: f64,
    pub downgrade: f64,
    pub reposition: f64,
    pub split: f64,
}

impl Default for OperatorWeights {
    fn default() -> Self {
        OperatorWeights {
            relocate: 0.40,
            merge: 0.25,
            multi_merge: 0.05,
            absorb: 0.10,
            downgrade: 0.05,
            reposition: 0.10,
            split: 0.05,
        }
    }
}

/// Configuration settings for the placement engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Edge length of a spatial index cell in metres
    pub cell_size: u64,
    /// Candidate positions per greedy round
    pub candidate_sampling: CandidateSampling,
    /// Starting annealing temperature
    pub initial_temperature: f64,
    /// Geometric cooling factor applied every iteration
    pub cooling_rate: f64,
    /// Annealing stops once the temperature falls below this floor
    pub min_temperature: f64,
    /// Maximum number of annealing iterations
    pub max_iterations: u64,
    /// Optional wall-clock limit for one annealing run
    pub time_limit: Option<Duration>,
    /// Operator selection weights
    pub operator_weights: OperatorWeights,
    /// Radius around an antenna searched for new positions by reposition
    pub reposition_radius: u64,
    /// Nearby antennas examined per operator application
    pub neighbor_limit: usize,
    /// Number of independent construct + anneal runs
    pub restarts: usize,
    /// Base random seed; restart `r` uses `seed + r`
    pub seed: u64,
    /// Run a hill-climbing pass after annealing
    pub polish: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cell_size: 150,
            candidate_sampling: CandidateSampling::Sample(500),
            initial_temperature: 10_000.0,
            cooling_rate: 0.99997,
            min_temperature: 0.01,
            max_iterations: 300_000,
            time_limit: None,
            operator_weights: OperatorWeights::default(),
            reposition_radius: 150,
            neighbor_limit: 30,
            restarts: 1,
            seed: 42,
            polish: true,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Load a configuration from a JSON file; missing fields take defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Set the spatial index cell size.
    pub fn with_cell_size(mut self, size: u64) -> Self {
        self.cell_size = size;
        self
    }

    /// Set the greedy candidate sampling policy.
    pub fn with_candidate_sampling(mut self, sampling: CandidateSampling) -> Self {
        self.candidate_sampling = sampling;
        self
    }

    /// Set the initial temperature.
    pub fn with_initial_temperature(mut self, temperature: f64) -> Self {
        self.initial_temperature = temperature;
        self
    }

    /// Set the cooling rate.
    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    /// Set the temperature floor.
    pub fn with_min_temperature(mut self, temperature: f64) -> Self {
        self.min_temperature = temperature;
        self
    }

    /// Set the iteration budget.
    pub fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Set the time limit.
    pub fn with_time_limit(mut self, duration: Duration) -> Self {
        self.time_limit = Some(duration);
        self
    }

    /// Set the operator weights.
    pub fn with_operator_weights(mut self, weights: OperatorWeights) -> Self {
        self.operator_weights = weights;
        self
    }

    /// Set the reposition search radius.
    pub fn with_reposition_radius(mut self, radius: u64) -> Self {
        self.reposition_radius = radius;
        self
    }

    /// Set the number of nearby antennas examined per operator call.
    pub fn with_neighbor_limit(mut self, limit: usize) -> Self {
        self.neighbor_limit = limit;
        self
    }

    /// Set the number of restarts.
    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    /// Set the base random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable the final hill-climbing pass.
    pub fn with_polish(mut self, polish: bool) -> Self {
        self.polish = polish;
        self
    }
}
