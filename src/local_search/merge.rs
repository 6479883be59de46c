//! Merge neighborhood: replace several antennas by one serving all of their
//! buildings.

use itertools::Itertools;
use rand::Rng;

use super::utils::{cheapest_antenna, nearby_antennas};
use super::{LocalSearch, Move, OperatorKind};
use crate::antenna::AntennaType;
use crate::solution::{Antenna, Solution};

/// Neighbors considered when looking for a third antenna to merge.
const MULTI_MERGE_NEIGHBORS: usize = 8;

impl LocalSearch<'_> {
    /// Merge `members` into a single antenna placed at one of their
    /// positions, if that is strictly cheaper than keeping them apart.
    ///
    /// The merged antenna keeps the slot of the member whose position it
    /// takes; the other members are removed.
    pub fn merge(&self, solution: &Solution, members: &[usize]) -> Option<Move> {
        if members.len() < 2 {
            return None;
        }
        let mut sorted = members.to_vec();
        sorted.sort_unstable();
        if sorted.windows(2).any(|w| w[0] == w[1]) {
            return None;
        }

        let old_cost: u64 = members.iter().map(|&m| solution.antenna(m).cost()).sum();
        let union: Vec<usize> = members
            .iter()
            .flat_map(|&m| solution.antenna(m).buildings.iter().copied())
            .collect();

        if AntennaType::cheapest_for_demand(self.problem.load_of(&union)).is_none() {
            return None;
        }

        let mut best: Option<(usize, Antenna)> = None;
        for &m in members {
            let site = solution.antenna(m);
            if let Some(merged) = cheapest_antenna(self.problem, site.x, site.y, union.clone()) {
                if best.as_ref().map_or(true, |(_, b)| merged.cost() < b.cost()) {
                    best = Some((m, merged));
                }
            }
        }

        let (keep, merged) = best?;
        if merged.cost() >= old_cost {
            return None;
        }

        let mut mv = Move::new(if members.len() == 2 {
            OperatorKind::Merge
        } else {
            OperatorKind::MultiMerge
        });
        mv.delta = merged.cost() as i64 - old_cost as i64;
        mv.replace.push((keep, merged));
        mv.remove.extend(members.iter().copied().filter(|&m| m != keep));
        Some(mv)
    }

    /// Cheapest pairwise merge of antenna `a` with a nearby antenna.
    pub fn best_merge_with_neighbors(&self, solution: &Solution, a: usize) -> Option<Move> {
        let antenna = solution.antenna(a);
        nearby_antennas(
            solution,
            self.index,
            antenna.x,
            antenna.y,
            AntennaType::max_range(),
            a,
            self.neighbor_limit,
        )
        .into_iter()
        .filter_map(|b| self.merge(solution, &[a, b]))
        .min_by_key(|mv| mv.delta)
    }

    /// Cheapest three-way merge of antenna `a` with two nearby antennas.
    pub fn best_multi_merge_around(&self, solution: &Solution, a: usize) -> Option<Move> {
        let antenna = solution.antenna(a);
        nearby_antennas(
            solution,
            self.index,
            antenna.x,
            antenna.y,
            AntennaType::max_range(),
            a,
            self.neighbor_limit.min(MULTI_MERGE_NEIGHBORS),
        )
        .into_iter()
        .tuple_combinations()
        .filter_map(|(b, c)| self.merge(solution, &[a, b, c]))
        .min_by_key(|mv| mv.delta)
    }

    /// Merge a random antenna with the first nearby antenna that admits it.
    pub(crate) fn propose_merge<R: Rng>(&self, solution: &Solution, rng: &mut R) -> Option<Move> {
        let a = rng.gen_range(0..solution.antenna_count());
        let antenna = solution.antenna(a);
        nearby_antennas(
            solution,
            self.index,
            antenna.x,
            antenna.y,
            AntennaType::max_range(),
            a,
            self.neighbor_limit,
        )
        .into_iter()
        .find_map(|b| self.merge(solution, &[a, b]))
    }

    /// Three-way merge around a random antenna.
    pub(crate) fn propose_multi_merge<R: Rng>(
        &self,
        solution: &Solution,
        rng: &mut R,
    ) -> Option<Move> {
        let a = rng.gen_range(0..solution.antenna_count());
        self.best_multi_merge_around(solution, a)
    }
}
