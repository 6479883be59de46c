//! Authoritative cost and validity verdicts for finished solutions.

use std::collections::HashSet;

use crate::problem::Problem;
use crate::solution::SolutionOutput;

/// A scorer's verdict on a solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    pub cost: u64,
    pub valid: bool,
    pub message: String,
}

impl Score {
    fn invalid(message: String) -> Self {
        Score {
            cost: 0,
            valid: false,
            message,
        }
    }
}

/// An oracle judging a solution in its external form.
///
/// The engine consults it once per finished run, never inside the search.
pub trait Scorer {
    fn score(&self, solution: &SolutionOutput, problem: &Problem) -> Score;
}

/// Independent reference scorer.
///
/// Checks each of the three population periods against capacity separately
/// and charges the off-building cost for antennas not placed on a building.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceScorer;

impl Scorer for ReferenceScorer {
    fn score(&self, solution: &SolutionOutput, problem: &Problem) -> Score {
        let mut seen = HashSet::with_capacity(problem.building_count());
        let mut cost = 0u64;

        for (i, antenna) in solution.antennas.iter().enumerate() {
            if antenna.buildings.is_empty() {
                return Score::invalid(format!("Antenna {} serves no buildings", i));
            }

            let spec = antenna.kind.spec();
            let mut totals = [0u64; 3];

            for &id in &antenna.buildings {
                let Some(idx) = problem.index_of(id) else {
                    return Score::invalid(format!("Antenna {} references unknown building {}", i, id));
                };
                if !seen.insert(id) {
                    return Score::invalid(format!("Building {} is covered more than once", id));
                }

                let b = &problem.buildings[idx];
                if b.distance_sq(antenna.x, antenna.y) > spec.range_sq() {
                    return Score::invalid(format!(
                        "Building {} is out of range of antenna {} ({})",
                        id, i, antenna.kind
                    ));
                }
                totals[0] += b.population_peak_hours;
                totals[1] += b.population_off_peak_hours;
                totals[2] += b.population_night;
            }

            if let Some(&over) = totals.iter().find(|&&t| t > spec.capacity) {
                return Score::invalid(format!(
                    "Antenna {} ({}) is over capacity: {} > {}",
                    i, antenna.kind, over, spec.capacity
                ));
            }

            cost += if problem.is_building_position(antenna.x, antenna.y) {
                spec.cost
            } else {
                spec.off_building_cost
            };
        }

        if seen.len() != problem.building_count() {
            return Score::invalid(format!(
                "{} of {} buildings are not covered",
                problem.building_count() - seen.len(),
                problem.building_count()
            ));
        }

        Score {
            cost,
            valid: true,
            message: format!(
                "Valid solution: {} antennas, total cost {} EUR",
                solution.antennas.len(),
                cost
            ),
        }
    }
}
