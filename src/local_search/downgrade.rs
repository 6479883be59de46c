//! Type downgrade: retype an antenna to the cheapest type that still serves
//! its buildings.

use super::utils::cheapest_type_for;
use super::{LocalSearch, Move, OperatorKind};
use crate::solution::Solution;

impl LocalSearch<'_> {
    /// Retype antenna `a` to the cheapest valid type, if that is cheaper.
    /// Never changes which buildings are served.
    pub fn downgrade(&self, solution: &Solution, a: usize) -> Option<Move> {
        let antenna = solution.antenna(a);
        let kind = cheapest_type_for(antenna.reach_sq(self.problem), antenna.load)?;

        if kind.cost() >= antenna.cost() {
            return None;
        }

        let mut retyped = antenna.clone();
        retyped.kind = kind;

        let mut mv = Move::new(OperatorKind::Downgrade);
        mv.delta = kind.cost() as i64 - antenna.cost() as i64;
        mv.replace.push((a, retyped));
        Some(mv)
    }
}
