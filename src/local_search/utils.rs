//! Helpers shared by the local search operators.

use crate::antenna::AntennaType;
use crate::problem::Problem;
use crate::solution::{Antenna, Solution};
use crate::spatial::SpatialIndex;

/// Squared distance from `(x, y)` to the furthest of `buildings`.
pub fn max_distance_sq(problem: &Problem, x: i64, y: i64, buildings: &[usize]) -> i64 {
    buildings
        .iter()
        .map(|&b| problem.buildings[b].distance_sq(x, y))
        .max()
        .unwrap_or(0)
}

/// Cheapest type whose squared range is at least `reach_sq` and whose
/// capacity carries `load`.
pub fn cheapest_type_for(reach_sq: i64, load: u64) -> Option<AntennaType> {
    AntennaType::BY_COST
        .into_iter()
        .find(|t| t.capacity() >= load && t.spec().range_sq() >= reach_sq)
}

/// Cheapest antenna at `(x, y)` serving exactly `buildings`.
pub fn cheapest_antenna(
    problem: &Problem,
    x: i64,
    y: i64,
    buildings: Vec<usize>,
) -> Option<Antenna> {
    let load = problem.load_of(&buildings);
    let reach_sq = max_distance_sq(problem, x, y, &buildings);
    let kind = cheapest_type_for(reach_sq, load)?;
    Some(Antenna {
        kind,
        x,
        y,
        buildings,
        load,
    })
}

/// Antennas serving buildings within `radius` of `(x, y)`, nearest first,
/// excluding `exclude` and capped at `limit`.
pub fn nearby_antennas(
    solution: &Solution,
    index: &SpatialIndex,
    x: i64,
    y: i64,
    radius: u64,
    exclude: usize,
    limit: usize,
) -> Vec<usize> {
    let mut hits = index.query_with_distance(x, y, radius);
    hits.sort_by_key(|&(b, d2)| (d2, b));

    let mut result: Vec<usize> = Vec::new();
    for (b, _) in hits {
        let Some(owner) = solution.owner_of(b) else {
            continue;
        };
        if owner != exclude && !result.contains(&owner) {
            result.push(owner);
            if result.len() >= limit {
                break;
            }
        }
    }
    result
}

/// `buildings` without `removed`, or `None` if nothing would be left.
pub fn without(buildings: &[usize], removed: usize) -> Option<Vec<usize>> {
    let rest: Vec<usize> = buildings.iter().copied().filter(|&b| b != removed).collect();
    (!rest.is_empty()).then_some(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cheapest_type_for_respects_range_and_capacity() {
        assert_eq!(cheapest_type_for(0, 100), Some(AntennaType::Nano));
        assert_eq!(cheapest_type_for(60 * 60, 100), Some(AntennaType::Spot));
        assert_eq!(cheapest_type_for(0, 4_000), Some(AntennaType::Density));
        assert_eq!(cheapest_type_for(300 * 300, 1_000), Some(AntennaType::MaxRange));
        assert_eq!(cheapest_type_for(300 * 300, 4_000), None);
    }

    #[test]
    fn test_without() {
        assert_eq!(without(&[1, 2, 3], 2), Some(vec![1, 3]));
        assert_eq!(without(&[4], 4), None);
    }
}
