//! Relocate neighborhood: move one building to another antenna.

use rand::seq::SliceRandom;
use rand::Rng;

use super::utils::{cheapest_antenna, nearby_antennas, without};
use super::{LocalSearch, Move, OperatorKind};
use crate::antenna::AntennaType;
use crate::solution::Solution;

/// Attempts at finding a multi-building source antenna per proposal.
const SOURCE_ATTEMPTS: usize = 8;

impl LocalSearch<'_> {
    /// Move `building` from antenna `source` to antenna `target`, retyping
    /// both to their cheapest valid types.
    ///
    /// The move may raise the total cost; callers decide whether to take it.
    pub fn relocate(
        &self,
        solution: &Solution,
        source: usize,
        building: usize,
        target: usize,
    ) -> Option<Move> {
        if source == target || solution.owner_of(building) != Some(source) {
            return None;
        }
        let src = solution.antenna(source);
        let tgt = solution.antenna(target);

        let remaining = without(&src.buildings, building)?;
        let mut grown = tgt.buildings.clone();
        grown.push(building);

        let new_tgt = cheapest_antenna(self.problem, tgt.x, tgt.y, grown)?;
        let new_src = cheapest_antenna(self.problem, src.x, src.y, remaining)?;

        let mut mv = Move::new(OperatorKind::Relocate);
        mv.delta = (new_src.cost() + new_tgt.cost()) as i64 - (src.cost() + tgt.cost()) as i64;
        mv.replace.push((source, new_src));
        mv.replace.push((target, new_tgt));
        Some(mv)
    }

    /// Move a random building of a random multi-building antenna to a
    /// random nearby antenna that can take it.
    pub(crate) fn propose_relocate<R: Rng>(
        &self,
        solution: &Solution,
        rng: &mut R,
    ) -> Option<Move> {
        let source = (0..SOURCE_ATTEMPTS)
            .map(|_| rng.gen_range(0..solution.antenna_count()))
            .find(|&a| !solution.antenna(a).is_singleton())?;

        let building = *solution.antenna(source).buildings.choose(rng)?;
        let b = &self.problem.buildings[building];

        let mut targets = nearby_antennas(
            solution,
            self.index,
            b.x,
            b.y,
            AntennaType::max_range(),
            source,
            self.neighbor_limit,
        );
        targets.shuffle(rng);

        targets
            .into_iter()
            .find_map(|target| self.relocate(solution, source, building, target))
    }
}
