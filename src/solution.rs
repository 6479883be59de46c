//! Solution representation: placed antennas and their building assignments.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::antenna::AntennaType;
use crate::error::{InvariantViolation, PlacementError, Result};
use crate::problem::Problem;

const UNASSIGNED: usize = usize::MAX;

/// A placed antenna.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Antenna {
    pub kind: AntennaType,
    pub x: i64,
    pub y: i64,
    /// Indices of the buildings served by this antenna
    pub buildings: Vec<usize>,
    /// Total demand of `buildings`
    pub load: u64,
}

impl Antenna {
    /// Create an antenna, computing its load from `problem`.
    pub fn new(kind: AntennaType, x: i64, y: i64, buildings: Vec<usize>, problem: &Problem) -> Self {
        let load = problem.load_of(&buildings);
        Antenna {
            kind,
            x,
            y,
            buildings,
            load,
        }
    }

    /// Create an antenna placed on building `idx` serving only that building.
    pub fn singleton(kind: AntennaType, idx: usize, problem: &Problem) -> Self {
        let b = &problem.buildings[idx];
        Antenna::new(kind, b.x, b.y, vec![idx], problem)
    }

    pub fn cost(&self) -> u64 {
        self.kind.cost()
    }

    pub fn is_singleton(&self) -> bool {
        self.buildings.len() == 1
    }

    /// Whether an antenna of type `kind` at this position could serve the
    /// current assignment.
    pub fn fits_type(&self, kind: AntennaType, problem: &Problem) -> bool {
        if self.load > kind.capacity() {
            return false;
        }
        let r_sq = kind.spec().range_sq();
        self.buildings
            .iter()
            .all(|&i| problem.buildings[i].distance_sq(self.x, self.y) <= r_sq)
    }

    /// Squared distance from this antenna to its furthest building.
    pub fn reach_sq(&self, problem: &Problem) -> i64 {
        self.buildings
            .iter()
            .map(|&i| problem.buildings[i].distance_sq(self.x, self.y))
            .max()
            .unwrap_or(0)
    }
}

/// A complete or partial assignment of buildings to antennas.
///
/// `owner[b]` is the index into `antennas` of the antenna serving building
/// `b`, kept in sync by every mutating method.
#[derive(Clone)]
pub struct Solution {
    antennas: Vec<Antenna>,
    owner: Vec<usize>,
}

impl Solution {
    /// Create an empty solution for a problem with `building_count` buildings.
    pub fn new(building_count: usize) -> Self {
        Solution {
            antennas: Vec::new(),
            owner: vec![UNASSIGNED; building_count],
        }
    }

    pub fn antennas(&self) -> &[Antenna] {
        &self.antennas
    }

    pub fn antenna(&self, idx: usize) -> &Antenna {
        &self.antennas[idx]
    }

    pub fn antenna_count(&self) -> usize {
        self.antennas.len()
    }

    /// Total activation cost.
    pub fn cost(&self) -> u64 {
        self.antennas.iter().map(Antenna::cost).sum()
    }

    /// Index of the antenna serving building `building`, if any.
    pub fn owner_of(&self, building: usize) -> Option<usize> {
        match self.owner.get(building) {
            Some(&a) if a != UNASSIGNED => Some(a),
            _ => None,
        }
    }

    pub fn singleton_count(&self) -> usize {
        self.antennas.iter().filter(|a| a.is_singleton()).count()
    }

    /// Append an antenna and claim its buildings.
    pub fn push(&mut self, antenna: Antenna) -> usize {
        let idx = self.antennas.len();
        for &b in &antenna.buildings {
            self.owner[b] = idx;
        }
        self.antennas.push(antenna);
        idx
    }

    /// Overwrite antenna `idx` and claim its buildings.
    ///
    /// Buildings dropped from the old antenna must be claimed elsewhere by the
    /// caller.
    pub fn replace(&mut self, idx: usize, antenna: Antenna) {
        for &b in &antenna.buildings {
            self.owner[b] = idx;
        }
        self.antennas[idx] = antenna;
    }

    /// Remove antenna `idx`; the last antenna takes its slot.
    pub fn remove(&mut self, idx: usize) -> Antenna {
        let removed = self.antennas.swap_remove(idx);
        for &b in &removed.buildings {
            if self.owner[b] == idx {
                self.owner[b] = UNASSIGNED;
            }
        }
        if let Some(moved) = self.antennas.get(idx) {
            for &b in &moved.buildings {
                self.owner[b] = idx;
            }
        }
        removed
    }

    /// Verify the partition, range and capacity invariants, plus that every
    /// antenna is non-empty and sits on a building.
    pub fn check(&self, problem: &Problem) -> std::result::Result<(), InvariantViolation> {
        let mut seen = vec![false; problem.building_count()];

        for (a_idx, antenna) in self.antennas.iter().enumerate() {
            if antenna.buildings.is_empty() {
                return Err(InvariantViolation::EmptyAntenna { antenna: a_idx });
            }
            if !problem.is_building_position(antenna.x, antenna.y) {
                return Err(InvariantViolation::OffBuilding { antenna: a_idx });
            }

            let r_sq = antenna.kind.spec().range_sq();
            let mut load = 0;
            for &b in &antenna.buildings {
                let building = &problem.buildings[b];
                if std::mem::replace(&mut seen[b], true) {
                    return Err(InvariantViolation::DuplicateAssignment {
                        building: building.id,
                    });
                }
                if building.distance_sq(antenna.x, antenna.y) > r_sq {
                    return Err(InvariantViolation::OutOfRange {
                        antenna: a_idx,
                        building: building.id,
                    });
                }
                load += problem.demand(b);
            }

            if load > antenna.kind.capacity() {
                return Err(InvariantViolation::OverCapacity {
                    antenna: a_idx,
                    load,
                    capacity: antenna.kind.capacity(),
                });
            }
        }

        if let Some(b) = seen.iter().position(|&s| !s) {
            return Err(InvariantViolation::Uncovered {
                building: problem.buildings[b].id,
            });
        }

        Ok(())
    }

    pub fn is_feasible(&self, problem: &Problem) -> bool {
        self.check(problem).is_ok()
    }

    /// Convert to the external form, with building ids instead of indices.
    pub fn to_output(&self, problem: &Problem) -> SolutionOutput {
        SolutionOutput {
            antennas: self
                .antennas
                .iter()
                .map(|a| AntennaOutput {
                    kind: a.kind,
                    x: a.x,
                    y: a.y,
                    buildings: a.buildings.iter().map(|&b| problem.buildings[b].id).collect(),
                })
                .collect(),
        }
    }

    /// Rebuild a solution from its external form and verify it.
    pub fn from_output(output: &SolutionOutput, problem: &Problem) -> Result<Self> {
        let mut solution = Solution::new(problem.building_count());

        for a in &output.antennas {
            let buildings = a
                .buildings
                .iter()
                .map(|&id| problem.index_of(id).ok_or(PlacementError::UnknownBuilding(id)))
                .collect::<Result<Vec<_>>>()?;
            solution.push(Antenna::new(a.kind, a.x, a.y, buildings, problem));
        }

        solution.check(problem)?;
        Ok(solution)
    }
}

impl fmt::Debug for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solution:")?;
        writeln!(f, "  Cost: {}", self.cost())?;
        writeln!(f, "  Antennas: {}", self.antennas.len())?;

        for (i, a) in self.antennas.iter().enumerate() {
            writeln!(
                f,
                "  Antenna {}: {} at ({}, {}) {:?} (Load: {})",
                i, a.kind, a.x, a.y, a.buildings, a.load
            )?;
        }

        Ok(())
    }
}

/// One antenna in the external solution format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AntennaOutput {
    #[serde(rename = "type")]
    pub kind: AntennaType,
    pub x: i64,
    pub y: i64,
    pub buildings: Vec<u64>,
}

/// The external solution format handed to persistence and scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionOutput {
    pub antennas: Vec<AntennaOutput>,
}
