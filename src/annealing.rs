//! Simulated annealing over the local search operators.

use log::{debug, info, trace};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use std::time::{Duration, Instant};

use crate::config::{Config, OperatorWeights};
use crate::local_search::{LocalSearch, OperatorKind};
use crate::problem::Problem;
use crate::solution::Solution;

/// Iterations between progress reports.
const REPORT_INTERVAL: u64 = 20_000;

/// Why an annealing run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The temperature fell below its floor
    Frozen,
    /// The iteration budget was exhausted
    IterationBudget,
    /// The wall-clock limit was reached
    TimeLimit,
}

/// Driver state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnealingState {
    Exploring,
    Terminated(Termination),
}

/// Result of one annealing run.
#[derive(Clone)]
pub struct AnnealingOutcome {
    /// Best solution seen, which may differ from the final working solution
    pub best: Solution,
    pub initial_cost: u64,
    pub best_cost: u64,
    pub iterations: u64,
    /// Moves accepted, improving or not
    pub accepted: u64,
    /// Times the best solution improved
    pub improvements: u64,
    pub final_temperature: f64,
    pub termination: Termination,
    pub run_time: Duration,
}

/// Metropolis acceptance: always for improving moves, otherwise with
/// probability `exp(-delta / temperature)`.
pub fn accept<R: Rng>(delta: i64, temperature: f64, rng: &mut R) -> bool {
    if delta < 0 {
        return true;
    }
    if temperature <= 0.0 {
        return false;
    }
    rng.gen::<f64>() < (-(delta as f64) / temperature).exp()
}

/// Simulated annealing driver.
pub struct Annealing<'a> {
    pub local_search: LocalSearch<'a>,
    pub problem: &'a Problem,
    pub initial_temperature: f64,
    pub cooling_rate: f64,
    pub min_temperature: f64,
    pub max_iterations: u64,
    pub time_limit: Option<Duration>,
    operators: Vec<OperatorKind>,
    weights: Vec<f64>,
}

impl<'a> Annealing<'a> {
    /// Create a driver from the configuration.
    pub fn new(local_search: LocalSearch<'a>, config: &Config) -> Self {
        let (operators, weights) = Self::operator_table(&config.operator_weights);
        Annealing {
            problem: local_search.problem,
            local_search,
            initial_temperature: config.initial_temperature,
            cooling_rate: config.cooling_rate,
            min_temperature: config.min_temperature,
            max_iterations: config.max_iterations,
            time_limit: config.time_limit,
            operators,
            weights,
        }
    }

    /// Operators with a positive weight; all operators equally if none has.
    fn operator_table(weights: &OperatorWeights) -> (Vec<OperatorKind>, Vec<f64>) {
        let table: Vec<(OperatorKind, f64)> = OperatorKind::ALL
            .into_iter()
            .map(|kind| {
                let w = match kind {
                    OperatorKind::Relocate => weights.relocate,
                    OperatorKind::Merge => weights.merge,
                    OperatorKind::MultiMerge => weights.multi_merge,
                    OperatorKind::Absorb => weights.absorb,
                    OperatorKind::Downgrade => weights.downgrade,
                    OperatorKind::Reposition => weights.reposition,
                    OperatorKind::Split => weights.split,
                };
                (kind, w)
            })
            .filter(|&(_, w)| w.is_finite() && w > 0.0)
            .collect();

        if table.is_empty() {
            (OperatorKind::ALL.to_vec(), vec![1.0; OperatorKind::ALL.len()])
        } else {
            table.into_iter().unzip()
        }
    }

    /// Anneal from `initial`, which must be feasible, and return the best
    /// solution seen.
    pub fn run<R: Rng>(&self, initial: Solution, rng: &mut R) -> AnnealingOutcome {
        let start = Instant::now();
        let chooser = WeightedIndex::new(&self.weights).ok();

        let initial_cost = initial.cost();
        let mut current = initial;
        let mut current_cost = initial_cost;
        let mut best = current.clone();
        let mut best_cost = current_cost;

        let mut temperature = self.initial_temperature;
        let mut iterations = 0u64;
        let mut accepted = 0u64;
        let mut improvements = 0u64;
        let mut state = AnnealingState::Exploring;

        info!(
            "Annealing: start cost {}, {} antennas, T0 = {:.1}",
            initial_cost,
            current.antenna_count(),
            temperature
        );

        while state == AnnealingState::Exploring {
            state = self.next_state(temperature, iterations, start);
            if state != AnnealingState::Exploring {
                break;
            }

            let kind = match &chooser {
                Some(dist) => self.operators[dist.sample(rng)],
                None => self.operators[rng.gen_range(0..self.operators.len())],
            };

            if let Some(mv) = self.local_search.propose(kind, &current, rng) {
                if mv.verify(&current, self.problem) && accept(mv.delta, temperature, rng) {
                    trace!("Iter {}: {} delta {}", iterations, mv.kind, mv.delta);
                    current_cost = (current_cost as i64 + mv.delta) as u64;
                    mv.apply(&mut current);
                    accepted += 1;

                    if current_cost < best_cost {
                        best = current.clone();
                        best_cost = current_cost;
                        improvements += 1;
                        debug!(
                            "Iter {}: new best {} (T = {:.1})",
                            iterations, best_cost, temperature
                        );
                    }
                }
            }

            iterations += 1;
            temperature *= self.cooling_rate;

            if iterations % REPORT_INTERVAL == 0 {
                debug!(
                    "Iter {}: current {}, best {}, T = {:.2}",
                    iterations, current_cost, best_cost, temperature
                );
            }
        }

        let termination = match state {
            AnnealingState::Terminated(t) => t,
            AnnealingState::Exploring => Termination::IterationBudget,
        };

        info!(
            "Annealing done: {} iterations, {} accepted, {} improvements, best {} ({:?})",
            iterations, accepted, improvements, best_cost, termination
        );

        AnnealingOutcome {
            best,
            initial_cost,
            best_cost,
            iterations,
            accepted,
            improvements,
            final_temperature: temperature,
            termination,
            run_time: start.elapsed(),
        }
    }

    fn next_state(&self, temperature: f64, iterations: u64, start: Instant) -> AnnealingState {
        if temperature < self.min_temperature {
            return AnnealingState::Terminated(Termination::Frozen);
        }
        if iterations >= self.max_iterations {
            return AnnealingState::Terminated(Termination::IterationBudget);
        }
        if let Some(limit) = self.time_limit {
            if start.elapsed() >= limit {
                return AnnealingState::Terminated(Termination::TimeLimit);
            }
        }
        AnnealingState::Exploring
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_accept_improving_always() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            assert!(accept(-1, 0.0, &mut rng));
        }
    }

    #[test]
    fn test_accept_worsening_at_zero_temperature_never() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            assert!(!accept(1, 0.0, &mut rng));
        }
    }

    #[test]
    fn test_accept_rate_matches_metropolis() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let trials = 20_000;
        // exp(-1) ~ 0.368
        let hits = (0..trials).filter(|_| accept(1_000, 1_000.0, &mut rng)).count();
        let rate = hits as f64 / trials as f64;
        assert!((rate - (-1.0f64).exp()).abs() < 0.02, "rate {}", rate);
    }

    #[test]
    fn test_operator_table_drops_zero_weights() {
        let weights = OperatorWeights {
            relocate: 1.0,
            merge: 0.0,
            multi_merge: 0.0,
            absorb: 2.0,
            downgrade: 0.0,
            reposition: 0.0,
            split: 0.0,
        };
        let (ops, w) = Annealing::operator_table(&weights);
        assert_eq!(ops, vec![OperatorKind::Relocate, OperatorKind::Absorb]);
        assert_eq!(w, vec![1.0, 2.0]);
    }

    #[test]
    fn test_operator_table_all_zero_falls_back_to_uniform() {
        let weights = OperatorWeights {
            relocate: 0.0,
            merge: 0.0,
            multi_merge: 0.0,
            absorb: 0.0,
            downgrade: 0.0,
            reposition: 0.0,
            split: 0.0,
        };
        let (ops, w) = Annealing::operator_table(&weights);
        assert_eq!(ops.len(), OperatorKind::ALL.len());
        assert!(w.iter().all(|&x| x == 1.0));
    }
}
