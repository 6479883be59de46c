//! Greedy constructive heuristic producing an initial feasible solution.

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;

use crate::antenna::AntennaType;
use crate::config::CandidateSampling;
use crate::error::{PlacementError, Result};
use crate::problem::Problem;
use crate::solution::{Antenna, Solution};
use crate::spatial::SpatialIndex;

/// Weight of one covered building in the placement score. Large enough that
/// covering one more building always beats any difference in covered demand.
const BUILDING_WEIGHT: f64 = 10_000.0;

/// Score of a placement: buildings covered per unit cost, with covered
/// demand as a tie breaker.
pub fn placement_score(covered: usize, load: u64, kind: AntennaType) -> f64 {
    (covered as f64 * BUILDING_WEIGHT + load as f64) / kind.cost() as f64
}

/// A scored candidate placement.
#[derive(Debug, Clone)]
struct Placement {
    kind: AntennaType,
    site: usize,
    selected: Vec<usize>,
    score: f64,
}

/// Builds one feasible solution from scratch.
pub struct Greedy;

impl Greedy {
    /// Construct a feasible solution.
    ///
    /// Fails only when some building's demand exceeds every antenna capacity.
    pub fn construct<R: Rng>(
        problem: &Problem,
        index: &SpatialIndex,
        sampling: CandidateSampling,
        rng: &mut R,
    ) -> Result<Solution> {
        let n = problem.building_count();
        let mut solution = Solution::new(n);
        let mut covered = vec![false; n];

        Self::place_forced(problem, &mut solution, &mut covered)?;
        let forced = solution.antenna_count();

        let mut uncovered: BTreeSet<usize> = (0..n).filter(|&i| !covered[i]).collect();
        info!(
            "Greedy construction: {} buildings, {} forced singletons",
            n, forced
        );

        while !uncovered.is_empty() {
            let candidates = Self::candidates(&uncovered, sampling, rng);

            let placement = candidates
                .iter()
                .filter_map(|&site| Self::best_at(problem, index, &covered, site))
                .fold(None::<Placement>, |best, p| match best {
                    Some(b) if b.score >= p.score => Some(b),
                    _ => Some(p),
                });

            let antenna = match placement {
                Some(p) => {
                    let site = &problem.buildings[p.site];
                    Antenna::new(p.kind, site.x, site.y, p.selected, problem)
                }
                None => match uncovered.iter().next() {
                    Some(&idx) => Self::fallback(problem, idx)?,
                    None => break,
                },
            };

            for &b in &antenna.buildings {
                covered[b] = true;
                uncovered.remove(&b);
            }
            solution.push(antenna);

            if n > 1000 && solution.antenna_count() % 100 == 0 {
                debug!(
                    "Greedy progress: {}/{} buildings covered",
                    n - uncovered.len(),
                    n
                );
            }
        }

        info!(
            "Greedy construction finished: {} antennas, cost {}",
            solution.antenna_count(),
            solution.cost()
        );

        Ok(solution)
    }

    /// Give every building that only one type can carry its own antenna of
    /// that type.
    fn place_forced(
        problem: &Problem,
        solution: &mut Solution,
        covered: &mut [bool],
    ) -> Result<()> {
        for idx in 0..problem.building_count() {
            let types = problem.feasible_types(idx);
            match types.as_slice() {
                [] => {
                    return Err(PlacementError::InfeasibleBuilding {
                        id: problem.buildings[idx].id,
                        demand: problem.demand(idx),
                    })
                }
                [only] => {
                    solution.push(Antenna::singleton(*only, idx, problem));
                    covered[idx] = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Candidate sites for this round, in ascending index order.
    fn candidates<R: Rng>(
        uncovered: &BTreeSet<usize>,
        sampling: CandidateSampling,
        rng: &mut R,
    ) -> Vec<usize> {
        match sampling {
            CandidateSampling::Sample(limit) if uncovered.len() > limit => {
                let pool: Vec<usize> = uncovered.iter().copied().collect();
                let mut picked: Vec<usize> = pool.choose_multiple(rng, limit).copied().collect();
                picked.sort_unstable();
                picked
            }
            _ => uncovered.iter().copied().collect(),
        }
    }

    /// Best placement at building `site` over all types, packing uncovered
    /// in-range buildings smallest demand first.
    fn best_at(
        problem: &Problem,
        index: &SpatialIndex,
        covered: &[bool],
        site: usize,
    ) -> Option<Placement> {
        let b = &problem.buildings[site];
        let mut nearby: Vec<(usize, i64)> = index
            .query_with_distance(b.x, b.y, AntennaType::max_range())
            .into_iter()
            .filter(|&(i, _)| !covered[i])
            .collect();
        nearby.sort_by_key(|&(i, _)| (problem.demand(i), i));

        let mut best: Option<Placement> = None;
        for kind in AntennaType::ALL {
            let r_sq = kind.spec().range_sq();
            let capacity = kind.capacity();

            let mut selected = Vec::new();
            let mut load = 0;
            for &(i, d2) in &nearby {
                if d2 > r_sq {
                    continue;
                }
                let demand = problem.demand(i);
                if load + demand <= capacity {
                    selected.push(i);
                    load += demand;
                }
            }

            if selected.is_empty() {
                continue;
            }

            let score = placement_score(selected.len(), load, kind);
            if best.as_ref().map_or(true, |p| score > p.score) {
                best = Some(Placement {
                    kind,
                    site,
                    selected,
                    score,
                });
            }
        }
        best
    }

    /// Cover building `idx` alone with the cheapest type that
    /// carries it.
    fn fallback(problem: &Problem, idx: usize) -> Result<Antenna> {
        let demand = problem.demand(idx);
        let kind = AntennaType::cheapest_for_demand(demand).ok_or(
            PlacementError::InfeasibleBuilding {
                id: problem.buildings[idx].id,
                demand,
            },
        )?;
        Ok(Antenna::singleton(kind, idx, problem))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_prefers_more_buildings() {
        let two = placement_score(2, 10, AntennaType::Nano);
        let one = placement_score(1, 200, AntennaType::Nano);
        assert!(two > one);
    }

    #[test]
    fn test_score_prefers_cheaper_type() {
        let nano = placement_score(3, 150, AntennaType::Nano);
        let spot = placement_score(3, 150, AntennaType::Spot);
        assert!(nano > spot);
    }
}
