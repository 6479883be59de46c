//! Absorption: fold a single-building antenna into a nearby multi-building
//! antenna.

use rand::Rng;

use super::utils::{cheapest_antenna, nearby_antennas};
use super::{LocalSearch, Move, OperatorKind};
use crate::antenna::AntennaType;
use crate::solution::Solution;

impl LocalSearch<'_> {
    /// Move the sole building of antenna `single` into antenna `multi`,
    /// retyping `multi` as needed, and drop `single`.
    ///
    /// Accepted only if the retyped receiver costs less than both antennas
    /// together.
    pub fn absorb(&self, solution: &Solution, single: usize, multi: usize) -> Option<Move> {
        if single == multi {
            return None;
        }
        let donor = solution.antenna(single);
        let receiver = solution.antenna(multi);
        if !donor.is_singleton() || receiver.is_singleton() {
            return None;
        }

        let mut buildings = receiver.buildings.clone();
        buildings.push(donor.buildings[0]);
        let absorbed = cheapest_antenna(self.problem, receiver.x, receiver.y, buildings)?;

        let old_cost = donor.cost() + receiver.cost();
        if absorbed.cost() >= old_cost {
            return None;
        }

        let mut mv = Move::new(OperatorKind::Absorb);
        mv.delta = absorbed.cost() as i64 - old_cost as i64;
        mv.replace.push((multi, absorbed));
        mv.remove.push(single);
        Some(mv)
    }

    /// Cheapest absorption involving antenna `a`, either as the donor (if it
    /// serves one building) or as the receiver.
    pub fn best_absorb_around(&self, solution: &Solution, a: usize) -> Option<Move> {
        let antenna = solution.antenna(a);
        let neighbors = nearby_antennas(
            solution,
            self.index,
            antenna.x,
            antenna.y,
            AntennaType::max_range(),
            a,
            self.neighbor_limit,
        );

        if antenna.is_singleton() {
            neighbors
                .into_iter()
                .filter_map(|m| self.absorb(solution, a, m))
                .min_by_key(|mv| mv.delta)
        } else {
            neighbors
                .into_iter()
                .filter_map(|s| self.absorb(solution, s, a))
                .min_by_key(|mv| mv.delta)
        }
    }

    /// Absorption around a random antenna.
    pub(crate) fn propose_absorb<R: Rng>(&self, solution: &Solution, rng: &mut R) -> Option<Move> {
        let a = rng.gen_range(0..solution.antenna_count());
        self.best_absorb_around(solution, a)
    }
}
