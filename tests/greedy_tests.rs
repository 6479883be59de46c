//! Tests for the greedy constructor.

use antenna_placement::antenna::AntennaType;
use antenna_placement::config::CandidateSampling;
use antenna_placement::error::PlacementError;
use antenna_placement::greedy::Greedy;
use antenna_placement::problem::{Building, Problem};
use antenna_placement::spatial::SpatialIndex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn construct(problem: &Problem, sampling: CandidateSampling, seed: u64) -> Result<u64, PlacementError> {
    let index = SpatialIndex::new(problem, 150);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let solution = Greedy::construct(problem, &index, sampling, &mut rng)?;
    assert!(solution.is_feasible(problem));
    Ok(solution.cost())
}

fn create_random_problem(n: usize, seed: u64) -> Problem {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let buildings = (0..n)
        .map(|i| {
            Building::new(
                i as u64,
                rng.gen_range(0..2_000),
                rng.gen_range(0..2_000),
                rng.gen_range(0..300),
                rng.gen_range(0..300),
                rng.gen_range(0..300),
            )
        })
        .collect();
    Problem::new("Random", buildings).unwrap()
}

#[test]
fn test_two_clusters() {
    let buildings = vec![
        Building::with_demand(1, 0, 0, 100),
        Building::with_demand(2, 30, 0, 100),
        Building::with_demand(3, 400, 0, 100),
    ];
    let problem = Problem::new("Clusters", buildings).unwrap();
    let index = SpatialIndex::new(&problem, 150);
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    let solution = Greedy::construct(&problem, &index, CandidateSampling::Full, &mut rng).unwrap();

    // A Nano over the close pair beats one MaxRange over everything.
    assert_eq!(solution.cost(), 10_000);
    assert_eq!(solution.antenna_count(), 2);
    assert!(solution.antennas().iter().all(|a| a.kind == AntennaType::Nano));
    assert_eq!(solution.owner_of(0), solution.owner_of(1));
    assert!(solution.is_feasible(&problem));
}

#[test]
fn test_infeasible_building_is_reported() {
    let buildings = vec![
        Building::with_demand(1, 0, 0, 100),
        Building::new(2, 10, 0, 10, 6_000, 10),
    ];
    let problem = Problem::new("TooDense", buildings).unwrap();

    assert!(matches!(
        construct(&problem, CandidateSampling::Full, 1),
        Err(PlacementError::InfeasibleBuilding { id: 2, demand: 6_000 })
    ));
}

#[test]
fn test_forced_density_singleton() {
    // Demand 4000 only fits a Density antenna; the small pair shares a Nano.
    let buildings = vec![
        Building::with_demand(1, 0, 0, 4_000),
        Building::with_demand(2, 10, 0, 50),
        Building::with_demand(3, 20, 0, 50),
    ];
    let problem = Problem::new("Forced", buildings.clone()).unwrap();
    assert_eq!(construct(&problem, CandidateSampling::Full, 1).unwrap(), 35_000);

    let reversed: Vec<Building> = buildings.into_iter().rev().collect();
    let problem = Problem::new("ForcedReversed", reversed).unwrap();
    assert_eq!(construct(&problem, CandidateSampling::Full, 1).unwrap(), 35_000);
}

#[test]
fn test_forced_singleton_owns_only_itself() {
    let buildings = vec![
        Building::with_demand(1, 0, 0, 4_000),
        Building::with_demand(2, 10, 0, 50),
    ];
    let problem = Problem::new("Forced", buildings).unwrap();
    let index = SpatialIndex::new(&problem, 150);
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let solution = Greedy::construct(&problem, &index, CandidateSampling::Full, &mut rng).unwrap();

    let heavy = solution.antenna(solution.owner_of(0).unwrap());
    assert_eq!(heavy.kind, AntennaType::Density);
    assert_eq!(heavy.buildings, vec![0]);
}

#[test]
fn test_random_problems_are_covered() {
    let problem = create_random_problem(300, 9);

    let full = construct(&problem, CandidateSampling::Full, 1).unwrap();
    let sampled = construct(&problem, CandidateSampling::Sample(20), 1).unwrap();

    assert!(full > 0);
    assert!(sampled > 0);
}

#[test]
fn test_same_seed_same_result() {
    let problem = create_random_problem(200, 21);

    let first = construct(&problem, CandidateSampling::Sample(15), 99).unwrap();
    let second = construct(&problem, CandidateSampling::Sample(15), 99).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_empty_problem() {
    let problem = Problem::new("Empty", Vec::new()).unwrap();
    assert_eq!(construct(&problem, CandidateSampling::Full, 1).unwrap(), 0);
}
