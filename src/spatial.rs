//! Uniform grid index over building coordinates.

use std::collections::HashMap;

use crate::problem::{distance_sq, Problem};

/// Buckets buildings by grid cell and answers radius queries.
///
/// Built once per problem; buildings never move, so the index is read-only
/// afterwards.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    cell_size: i64,
    cells: HashMap<(i64, i64), Vec<usize>>,
    coords: Vec<(i64, i64)>,
}

impl SpatialIndex {
    /// Build an index over all buildings of `problem`.
    ///
    /// `cell_size` is clamped to at least 1.
    pub fn new(problem: &Problem, cell_size: u64) -> Self {
        let cell_size = cell_size.max(1) as i64;
        let mut cells: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
        let mut coords = Vec::with_capacity(problem.building_count());

        for (idx, b) in problem.buildings.iter().enumerate() {
            let cell = (b.x.div_euclid(cell_size), b.y.div_euclid(cell_size));
            cells.entry(cell).or_default().push(idx);
            coords.push((b.x, b.y));
        }

        SpatialIndex {
            cell_size,
            cells,
            coords,
        }
    }

    pub fn cell_size(&self) -> u64 {
        self.cell_size as u64
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Building indices within `radius` of `(x, y)`, in ascending index order.
    pub fn query(&self, x: i64, y: i64, radius: u64) -> Vec<usize> {
        let mut result = Vec::new();
        self.for_each_within(x, y, radius, |idx, _| result.push(idx));
        result.sort_unstable();
        result
    }

    /// Like [`SpatialIndex::query`] but also returns each squared distance.
    pub fn query_with_distance(&self, x: i64, y: i64, radius: u64) -> Vec<(usize, i64)> {
        let mut result = Vec::new();
        self.for_each_within(x, y, radius, |idx, d2| result.push((idx, d2)));
        result.sort_unstable_by_key(|&(idx, _)| idx);
        result
    }

    fn for_each_within<F: FnMut(usize, i64)>(&self, x: i64, y: i64, radius: u64, mut f: F) {
        let r = radius as i64;
        let r_sq = r * r;
        let (cx0, cy0) = self.cell_of(x - r, y - r);
        let (cx1, cy1) = self.cell_of(x + r, y + r);

        for cx in cx0..=cx1 {
            for cy in cy0..=cy1 {
                let Some(bucket) = self.cells.get(&(cx, cy)) else {
                    continue;
                };
                for &idx in bucket {
                    let (bx, by) = self.coords[idx];
                    let d2 = distance_sq(bx, by, x, y);
                    if d2 <= r_sq {
                        f(idx, d2);
                    }
                }
            }
        }
    }

    fn cell_of(&self, x: i64, y: i64) -> (i64, i64) {
        (x.div_euclid(self.cell_size), y.div_euclid(self.cell_size))
    }
}
