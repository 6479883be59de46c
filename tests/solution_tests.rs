//! Unit tests for the Antenna and Solution structures.

use antenna_placement::antenna::AntennaType;
use antenna_placement::error::{InvariantViolation, PlacementError};
use antenna_placement::problem::{Building, Problem};
use antenna_placement::solution::{Antenna, Solution};

/// Creates a small problem with four buildings along the x axis.
fn create_test_problem() -> Problem {
    let buildings = vec![
        // Building 10 at (0, 0) with demand 100
        Building::with_demand(10, 0, 0, 100),
        // Building 11 at (30, 0) with demand 100
        Building::with_demand(11, 30, 0, 100),
        // Building 12 at (400, 0) with demand 100
        Building::with_demand(12, 400, 0, 100),
        // Building 13 at (0, 40), peak 20 but night 150
        Building::new(13, 0, 40, 20, 30, 150),
    ];

    Problem::new("TestProblem", buildings).unwrap()
}

/// A feasible solution: Spot covering 0, 1, 3 and Nano on 2.
fn create_test_solution(problem: &Problem) -> Solution {
    let mut solution = Solution::new(problem.building_count());
    solution.push(Antenna::new(AntennaType::Spot, 0, 0, vec![0, 1, 3], problem));
    solution.push(Antenna::singleton(AntennaType::Nano, 2, problem));
    solution
}

#[test]
fn test_antenna_creation() {
    let problem = create_test_problem();

    let antenna = Antenna::new(AntennaType::Spot, 0, 0, vec![0, 3], &problem);
    assert_eq!(antenna.load, 250); // 100 + max(20, 30, 150)
    assert_eq!(antenna.cost(), 15_000);
    assert!(!antenna.is_singleton());

    let single = Antenna::singleton(AntennaType::Nano, 2, &problem);
    assert_eq!((single.x, single.y), (400, 0));
    assert_eq!(single.buildings, vec![2]);
    assert!(single.is_singleton());
}

#[test]
fn test_antenna_fits_type() {
    let problem = create_test_problem();
    let antenna = Antenna::new(AntennaType::MaxRange, 0, 0, vec![0, 1], &problem);

    // 30m away, 200 demand: Nano is just enough.
    assert!(antenna.fits_type(AntennaType::Nano, &problem));
    assert_eq!(antenna.reach_sq(&problem), 900);

    let wide = Antenna::new(AntennaType::MaxRange, 0, 0, vec![0, 2], &problem);
    assert!(!wide.fits_type(AntennaType::Density, &problem));
    assert!(wide.fits_type(AntennaType::MaxRange, &problem));
}

#[test]
fn test_solution_cost_and_feasibility() {
    let problem = create_test_problem();
    let solution = create_test_solution(&problem);

    assert_eq!(solution.cost(), 20_000);
    assert_eq!(solution.antenna_count(), 2);
    assert_eq!(solution.singleton_count(), 1);
    assert!(solution.is_feasible(&problem));
}

#[test]
fn test_owner_tracking_after_remove() {
    let problem = create_test_problem();
    let mut solution = Solution::new(problem.building_count());
    solution.push(Antenna::singleton(AntennaType::Nano, 0, &problem));
    solution.push(Antenna::singleton(AntennaType::Nano, 1, &problem));
    solution.push(Antenna::singleton(AntennaType::Nano, 2, &problem));

    let removed = solution.remove(0);
    assert_eq!(removed.buildings, vec![0]);

    // The last antenna took slot 0.
    assert_eq!(solution.owner_of(0), None);
    assert_eq!(solution.owner_of(2), Some(0));
    assert_eq!(solution.owner_of(1), Some(1));
    assert_eq!(solution.antenna(0).buildings, vec![2]);
}

#[test]
fn test_owner_tracking_after_replace() {
    let problem = create_test_problem();
    let mut solution = Solution::new(problem.building_count());
    solution.push(Antenna::singleton(AntennaType::Nano, 0, &problem));
    solution.push(Antenna::singleton(AntennaType::Nano, 1, &problem));

    solution.replace(0, Antenna::new(AntennaType::Nano, 0, 0, vec![0, 1], &problem));
    solution.remove(1);

    assert_eq!(solution.owner_of(0), Some(0));
    assert_eq!(solution.owner_of(1), Some(0));
    assert_eq!(solution.antenna_count(), 1);
}

#[test]
fn test_check_detects_uncovered_building() {
    let problem = create_test_problem();
    let mut solution = create_test_solution(&problem);
    solution.remove(1);

    assert_eq!(
        solution.check(&problem),
        Err(InvariantViolation::Uncovered { building: 12 })
    );
}

#[test]
fn test_check_detects_duplicate_assignment() {
    let problem = create_test_problem();
    let mut solution = create_test_solution(&problem);
    solution.push(Antenna::singleton(AntennaType::Nano, 0, &problem));

    assert_eq!(
        solution.check(&problem),
        Err(InvariantViolation::DuplicateAssignment { building: 10 })
    );
}

#[test]
fn test_check_detects_out_of_range() {
    let problem = create_test_problem();
    let mut solution = create_test_solution(&problem);
    // Fold the far building into the Density antenna at the origin.
    solution.remove(1);
    solution.replace(
        0,
        Antenna::new(AntennaType::Density, 0, 0, vec![0, 1, 3, 2], &problem),
    );

    assert_eq!(
        solution.check(&problem),
        Err(InvariantViolation::OutOfRange {
            antenna: 0,
            building: 12
        })
    );
}

#[test]
fn test_check_detects_over_capacity() {
    let problem = create_test_problem();
    let mut solution = create_test_solution(&problem);
    solution.replace(0, Antenna::new(AntennaType::Nano, 0, 0, vec![0, 1, 3], &problem));

    // Load 350 exceeds Nano's 200 before any range problem: all within 50m.
    assert_eq!(
        solution.check(&problem),
        Err(InvariantViolation::OverCapacity {
            antenna: 0,
            load: 350,
            capacity: 200
        })
    );
}

#[test]
fn test_check_detects_off_building_position() {
    let problem = create_test_problem();
    let mut solution = create_test_solution(&problem);
    solution.replace(1, Antenna::new(AntennaType::Nano, 401, 0, vec![2], &problem));

    assert_eq!(
        solution.check(&problem),
        Err(InvariantViolation::OffBuilding { antenna: 1 })
    );
}

#[test]
fn test_output_uses_building_ids() {
    let problem = create_test_problem();
    let solution = create_test_solution(&problem);

    let output = solution.to_output(&problem);
    assert_eq!(output.antennas.len(), 2);
    assert_eq!(output.antennas[0].buildings, vec![10, 11, 13]);
    assert_eq!(output.antennas[1].buildings, vec![12]);

    let json = serde_json::to_string(&output).unwrap();
    assert!(json.contains("\"type\":\"Spot\""));

    let rebuilt = Solution::from_output(&output, &problem).unwrap();
    assert_eq!(rebuilt.cost(), solution.cost());
    assert_eq!(rebuilt.owner_of(3), Some(0));
}

#[test]
fn test_from_output_rejects_unknown_building() {
    let problem = create_test_problem();
    let mut output = create_test_solution(&problem).to_output(&problem);
    output.antennas[1].buildings = vec![99];

    assert!(matches!(
        Solution::from_output(&output, &problem),
        Err(PlacementError::UnknownBuilding(99))
    ));
}

#[test]
fn test_from_output_rejects_infeasible_solution() {
    let problem = create_test_problem();
    let mut output = create_test_solution(&problem).to_output(&problem);
    output.antennas.pop();

    assert!(matches!(
        Solution::from_output(&output, &problem),
        Err(PlacementError::InvalidSeed(InvariantViolation::Uncovered { building: 12 }))
    ));
}
