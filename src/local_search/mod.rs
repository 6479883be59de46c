//! Local search operators over feasible solutions.
//!
//! Every operator reads a [`Solution`] and either returns `None` or a
//! [`Move`]: a self-contained patch that, once applied, yields another
//! feasible solution. Nothing is mutated until [`Move::apply`] runs, so an
//! operator can never leave a solution half-updated.

pub mod absorb;
pub mod downgrade;
pub mod merge;
pub mod relocate;
pub mod reposition;
pub mod split;
pub mod utils;

use log::trace;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Config;
use crate::problem::Problem;
use crate::solution::{Antenna, Solution};
use crate::spatial::SpatialIndex;

/// The operator families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatorKind {
    Relocate,
    Merge,
    MultiMerge,
    Absorb,
    Downgrade,
    Reposition,
    Split,
}

impl OperatorKind {
    pub const ALL: [OperatorKind; 7] = [
        OperatorKind::Relocate,
        OperatorKind::Merge,
        OperatorKind::MultiMerge,
        OperatorKind::Absorb,
        OperatorKind::Downgrade,
        OperatorKind::Reposition,
        OperatorKind::Split,
    ];
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A pending change to a solution together with its cost delta.
#[derive(Debug, Clone)]
pub struct Move {
    pub kind: OperatorKind,
    /// Antennas overwritten in place
    pub replace: Vec<(usize, Antenna)>,
    /// Antennas appended
    pub insert: Vec<Antenna>,
    /// Antennas deleted; their buildings must appear in `replace` or `insert`
    pub remove: Vec<usize>,
    /// Change in total cost
    pub delta: i64,
}

impl Move {
    pub fn new(kind: OperatorKind) -> Self {
        Move {
            kind,
            replace: Vec::new(),
            insert: Vec::new(),
            remove: Vec::new(),
            delta: 0,
        }
    }

    /// Check that applying this move to `solution` keeps it feasible.
    ///
    /// Only the antennas the move touches are examined: the buildings
    /// released by replaced and removed antennas must be exactly the
    /// buildings claimed by the new ones, and each new antenna must be
    /// non-empty, on a building, within range and within capacity.
    pub fn verify(&self, solution: &Solution, problem: &Problem) -> bool {
        let count = solution.antenna_count();
        let mut touched: Vec<usize> = self
            .replace
            .iter()
            .map(|(i, _)| *i)
            .chain(self.remove.iter().copied())
            .collect();
        touched.sort_unstable();
        if touched.windows(2).any(|w| w[0] == w[1]) || touched.iter().any(|&i| i >= count) {
            return false;
        }

        let mut released: Vec<usize> = touched
            .iter()
            .flat_map(|&i| solution.antenna(i).buildings.iter().copied())
            .collect();

        let new_antennas = self.replace.iter().map(|(_, a)| a).chain(self.insert.iter());
        let mut claimed = Vec::new();
        for antenna in new_antennas {
            if antenna.buildings.is_empty()
                || !problem.is_building_position(antenna.x, antenna.y)
                || antenna.load != problem.load_of(&antenna.buildings)
                || !antenna.fits_type(antenna.kind, problem)
            {
                return false;
            }
            claimed.extend(antenna.buildings.iter().copied());
        }

        released.sort_unstable();
        claimed.sort_unstable();
        if released != claimed {
            return false;
        }

        let old_cost: i64 = touched.iter().map(|&i| solution.antenna(i).cost() as i64).sum();
        let new_cost: i64 = self
            .replace
            .iter()
            .map(|(_, a)| a.cost() as i64)
            .chain(self.insert.iter().map(|a| a.cost() as i64))
            .sum();
        new_cost - old_cost == self.delta
    }

    /// Apply the move in place.
    pub fn apply(self, solution: &mut Solution) {
        for (idx, antenna) in self.replace {
            solution.replace(idx, antenna);
        }
        for antenna in self.insert {
            solution.push(antenna);
        }
        let mut remove = self.remove;
        remove.sort_unstable_by(|a, b| b.cmp(a));
        for idx in remove {
            solution.remove(idx);
        }
    }

    /// The solution obtained by applying this move to a copy of `solution`.
    pub fn applied_to(&self, solution: &Solution) -> Solution {
        let mut candidate = solution.clone();
        self.clone().apply(&mut candidate);
        candidate
    }
}

/// Operator family bound to one problem instance.
pub struct LocalSearch<'a> {
    pub problem: &'a Problem,
    pub index: &'a SpatialIndex,
    /// Nearby antennas examined per operator application
    pub neighbor_limit: usize,
    /// Radius searched for new positions by reposition
    pub reposition_radius: u64,
}

impl<'a> LocalSearch<'a> {
    /// Create a new local search instance.
    pub fn new(problem: &'a Problem, index: &'a SpatialIndex, config: &Config) -> Self {
        LocalSearch {
            problem,
            index,
            neighbor_limit: config.neighbor_limit.max(1),
            reposition_radius: config.reposition_radius,
        }
    }

    /// Propose a random move of the given family.
    pub fn propose<R: Rng>(
        &self,
        kind: OperatorKind,
        solution: &Solution,
        rng: &mut R,
    ) -> Option<Move> {
        if solution.antenna_count() == 0 {
            return None;
        }
        match kind {
            OperatorKind::Relocate => self.propose_relocate(solution, rng),
            OperatorKind::Merge => self.propose_merge(solution, rng),
            OperatorKind::MultiMerge => self.propose_multi_merge(solution, rng),
            OperatorKind::Absorb => self.propose_absorb(solution, rng),
            OperatorKind::Downgrade => {
                let a = rng.gen_range(0..solution.antenna_count());
                self.downgrade(solution, a)
            }
            OperatorKind::Reposition => {
                let a = rng.gen_range(0..solution.antenna_count());
                self.reposition(solution, a)
            }
            OperatorKind::Split => self.propose_split(solution, rng),
        }
    }

    /// Deterministic hill climbing: sweep every antenna with the improving
    /// operators until a full sweep finds nothing. Returns the number of
    /// moves applied.
    pub fn improve(&self, solution: &mut Solution) -> usize {
        let mut applied = 0;
        let mut improvement = true;

        while improvement {
            improvement = false;

            let mut a = 0;
            while a < solution.antenna_count() {
                let candidate = self
                    .downgrade(solution, a)
                    .or_else(|| self.best_merge_with_neighbors(solution, a))
                    .or_else(|| self.best_absorb_around(solution, a))
                    .or_else(|| self.best_multi_merge_around(solution, a))
                    .or_else(|| self.reposition(solution, a));

                match candidate {
                    Some(mv) if mv.delta < 0 => {
                        trace!("Improve: {} saves {}", mv.kind, -mv.delta);
                        mv.apply(solution);
                        applied += 1;
                        improvement = true;
                        // The slot may now hold another antenna; revisit it.
                    }
                    _ => a += 1,
                }
            }
        }

        applied
    }
}
