//! Reposition: move an antenna to another building position, possibly with
//! another type, picking up nearby single-building antennas on the way.

use super::utils::max_distance_sq;
use super::{LocalSearch, Move, OperatorKind};
use crate::antenna::AntennaType;
use crate::solution::{Antenna, Solution};

/// A candidate position/type pair for one antenna.
struct Placement {
    site: usize,
    kind: AntennaType,
    /// Buildings picked up from single-building antennas
    extra: Vec<usize>,
    delta: i64,
}

impl LocalSearch<'_> {
    /// Search building positions around the centroid of antenna `a`.
    ///
    /// At each position and type, every current building must stay in range
    /// and within capacity; buildings now served alone by a nearby antenna
    /// are added smallest demand first while capacity allows, and their
    /// antennas are dropped. A pair is acceptable when it covers more
    /// buildings at no higher type cost, or the same buildings at a lower
    /// one. The acceptable pair with the lowest total delta wins.
    pub fn reposition(&self, solution: &Solution, a: usize) -> Option<Move> {
        let antenna = solution.antenna(a);
        let (cx, cy) = self.centroid(antenna);

        let mut sites = self.index.query_with_distance(cx, cy, self.reposition_radius);
        sites.sort_by_key(|&(b, d2)| (d2, b));
        sites.truncate(self.neighbor_limit);

        let mut best: Option<Placement> = None;
        for (site, _) in sites {
            let (sx, sy) = {
                let b = &self.problem.buildings[site];
                (b.x, b.y)
            };
            let reach_sq = max_distance_sq(self.problem, sx, sy, &antenna.buildings);

            // Single-building antennas within reach of this site, by demand.
            let mut loose: Vec<(usize, i64)> = self
                .index
                .query_with_distance(sx, sy, AntennaType::max_range())
                .into_iter()
                .filter(|&(b, _)| {
                    solution
                        .owner_of(b)
                        .map_or(false, |o| o != a && solution.antenna(o).is_singleton())
                })
                .collect();
            loose.sort_by_key(|&(b, _)| (self.problem.demand(b), b));

            for kind in AntennaType::ALL {
                let spec = kind.spec();
                if antenna.load > spec.capacity || reach_sq > spec.range_sq() {
                    continue;
                }

                let mut load = antenna.load;
                let mut extra = Vec::new();
                let mut freed = 0i64;
                for &(b, d2) in &loose {
                    let demand = self.problem.demand(b);
                    if d2 <= spec.range_sq() && load + demand <= spec.capacity {
                        load += demand;
                        extra.push(b);
                        if let Some(owner) = solution.owner_of(b) {
                            freed += solution.antenna(owner).cost() as i64;
                        }
                    }
                }

                let covers_more = !extra.is_empty() && kind.cost() <= antenna.cost();
                let cheaper = extra.is_empty() && kind.cost() < antenna.cost();
                if !(covers_more || cheaper) {
                    continue;
                }

                let delta = kind.cost() as i64 - antenna.cost() as i64 - freed;
                if best.as_ref().map_or(true, |p| delta < p.delta) {
                    best = Some(Placement {
                        site,
                        kind,
                        extra,
                        delta,
                    });
                }
            }
        }

        let placement = best?;
        let site = &self.problem.buildings[placement.site];

        let mut mv = Move::new(OperatorKind::Reposition);
        mv.remove = placement
            .extra
            .iter()
            .filter_map(|&b| solution.owner_of(b))
            .collect();

        let mut buildings = antenna.buildings.clone();
        buildings.extend(placement.extra);
        mv.replace.push((
            a,
            Antenna::new(placement.kind, site.x, site.y, buildings, self.problem),
        ));
        mv.delta = placement.delta;
        Some(mv)
    }

    /// Integer centroid of the buildings served by `antenna`.
    fn centroid(&self, antenna: &Antenna) -> (i64, i64) {
        let n = antenna.buildings.len().max(1) as i64;
        let (sx, sy) = antenna.buildings.iter().fold((0i64, 0i64), |(sx, sy), &b| {
            let building = &self.problem.buildings[b];
            (sx + building.x, sy + building.y)
        });
        (sx.div_euclid(n), sy.div_euclid(n))
    }
}
