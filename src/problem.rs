//! Problem definition: buildings, demand extraction and dataset loading.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::antenna::AntennaType;
use crate::error::{PlacementError, Result};

/// A demand point with three population readings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    pub id: u64,
    pub x: i64,
    pub y: i64,
    pub population_peak_hours: u64,
    pub population_off_peak_hours: u64,
    pub population_night: u64,
}

impl Building {
    /// Create a new building.
    pub fn new(id: u64, x: i64, y: i64, peak: u64, off_peak: u64, night: u64) -> Self {
        Building {
            id,
            x,
            y,
            population_peak_hours: peak,
            population_off_peak_hours: off_peak,
            population_night: night,
        }
    }

    /// Create a building whose three readings are all `demand`.
    pub fn with_demand(id: u64, x: i64, y: i64, demand: u64) -> Self {
        Building::new(id, x, y, demand, demand, demand)
    }

    /// The maximum of the three population readings.
    pub fn demand(&self) -> u64 {
        self.population_peak_hours
            .max(self.population_off_peak_hours)
            .max(self.population_night)
    }

    /// Squared Euclidean distance to a point.
    pub fn distance_sq(&self, x: i64, y: i64) -> i64 {
        distance_sq(self.x, self.y, x, y)
    }
}

/// Squared Euclidean distance between two integer points.
pub fn distance_sq(x1: i64, y1: i64, x2: i64, y2: i64) -> i64 {
    let dx = x1 - x2;
    let dy = y1 - y2;
    dx * dx + dy * dy
}

#[derive(Debug, Deserialize)]
struct Dataset {
    buildings: Vec<Building>,
}

/// A placement problem instance.
///
/// Buildings are addressed internally by their position in `buildings`;
/// external ids only appear at the boundaries (loading, output, scoring).
#[derive(Debug, Clone)]
pub struct Problem {
    pub name: String,
    pub buildings: Vec<Building>,
    /// Cached `demand()` per building index
    pub demands: Vec<u64>,
    index_by_id: HashMap<u64, usize>,
    positions: HashSet<(i64, i64)>,
}

impl Problem {
    /// Create a new problem, rejecting duplicate building ids.
    pub fn new(name: impl Into<String>, buildings: Vec<Building>) -> Result<Self> {
        let mut index_by_id = HashMap::with_capacity(buildings.len());
        for (idx, building) in buildings.iter().enumerate() {
            if index_by_id.insert(building.id, idx).is_some() {
                return Err(PlacementError::DuplicateBuilding(building.id));
            }
        }

        let demands = buildings.iter().map(Building::demand).collect();
        let positions = buildings.iter().map(|b| (b.x, b.y)).collect();

        Ok(Problem {
            name: name.into(),
            buildings,
            demands,
            index_by_id,
            positions,
        })
    }

    /// Load a problem from a JSON dataset of the form `{ "buildings": [...] }`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let dataset: Dataset = serde_json::from_reader(reader)?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".to_string());

        Problem::new(name, dataset.buildings)
    }

    pub fn building_count(&self) -> usize {
        self.buildings.len()
    }

    /// Internal index of the building with external id `id`.
    pub fn index_of(&self, id: u64) -> Option<usize> {
        self.index_by_id.get(&id).copied()
    }

    pub fn demand(&self, idx: usize) -> u64 {
        self.demands[idx]
    }

    /// Total demand of a set of building indices.
    pub fn load_of(&self, indices: &[usize]) -> u64 {
        indices.iter().map(|&i| self.demands[i]).sum()
    }

    /// Whether `(x, y)` coincides with some building.
    pub fn is_building_position(&self, x: i64, y: i64) -> bool {
        self.positions.contains(&(x, y))
    }

    /// Antenna types able to carry building `idx` on its own.
    pub fn feasible_types(&self, idx: usize) -> Vec<AntennaType> {
        AntennaType::able_to_carry(self.demands[idx]).collect()
    }

    /// Report the first building no antenna type can carry.
    pub fn check_feasible_demands(&self) -> Result<()> {
        for (idx, building) in self.buildings.iter().enumerate() {
            if AntennaType::cheapest_for_demand(self.demands[idx]).is_none() {
                return Err(PlacementError::InfeasibleBuilding {
                    id: building.id,
                    demand: self.demands[idx],
                });
            }
        }
        Ok(())
    }
}
