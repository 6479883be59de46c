//! Split: detach one building into its own antenna.

use rand::seq::SliceRandom;
use rand::Rng;

use super::utils::{cheapest_antenna, without};
use super::{LocalSearch, Move, OperatorKind};
use crate::antenna::AntennaType;
use crate::solution::{Antenna, Solution};

impl LocalSearch<'_> {
    /// Take `building` out of antenna `a` and serve it with a new antenna of
    /// the cheapest sufficient type placed on it. The remainder of `a` is
    /// retyped. Mostly raises the cost; annealing uses it to leave local
    /// optima.
    pub fn split(&self, solution: &Solution, a: usize, building: usize) -> Option<Move> {
        if solution.owner_of(building) != Some(a) {
            return None;
        }
        let antenna = solution.antenna(a);
        let remaining = without(&antenna.buildings, building)?;

        let kind = AntennaType::cheapest_for_demand(self.problem.demand(building))?;
        let detached = Antenna::singleton(kind, building, self.problem);
        let rest = cheapest_antenna(self.problem, antenna.x, antenna.y, remaining)?;

        let mut mv = Move::new(OperatorKind::Split);
        mv.delta = (detached.cost() + rest.cost()) as i64 - antenna.cost() as i64;
        mv.replace.push((a, rest));
        mv.insert.push(detached);
        Some(mv)
    }

    /// Split a random building off a random antenna.
    pub(crate) fn propose_split<R: Rng>(&self, solution: &Solution, rng: &mut R) -> Option<Move> {
        let a = rng.gen_range(0..solution.antenna_count());
        let building = *solution.antenna(a).buildings.choose(rng)?;
        self.split(solution, a, building)
    }
}
