//! End-to-end tests of the placement pipeline.

use antenna_placement::antenna::AntennaType;
use antenna_placement::config::{CandidateSampling, Config};
use antenna_placement::error::PlacementError;
use antenna_placement::problem::{Building, Problem};
use antenna_placement::scorer::{ReferenceScorer, Score, Scorer};
use antenna_placement::solution::{Antenna, Solution, SolutionOutput};
use antenna_placement::PlacementAlgorithm;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn create_random_problem(n: usize, seed: u64) -> Problem {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let buildings = (0..n)
        .map(|i| {
            Building::new(
                1_000 + i as u64,
                rng.gen_range(0..2_000),
                rng.gen_range(0..2_000),
                rng.gen_range(0..250),
                rng.gen_range(0..250),
                rng.gen_range(0..250),
            )
        })
        .collect();
    Problem::new("Random", buildings).unwrap()
}

fn quick_config() -> Config {
    Config::new()
        .with_candidate_sampling(CandidateSampling::Full)
        .with_max_iterations(2_000)
        .with_cooling_rate(0.999)
}

/// Scorer that turns every solution down.
struct RejectAll;

impl Scorer for RejectAll {
    fn score(&self, _solution: &SolutionOutput, _problem: &Problem) -> Score {
        Score {
            cost: 0,
            valid: false,
            message: "nothing is good enough".to_string(),
        }
    }
}

#[test]
fn test_two_clusters_end_to_end() {
    let buildings = vec![
        Building::with_demand(1, 0, 0, 100),
        Building::with_demand(2, 30, 0, 100),
        Building::with_demand(3, 400, 0, 100),
    ];
    let problem = Problem::new("Clusters", buildings).unwrap();
    let mut algorithm = PlacementAlgorithm::new(problem, quick_config());

    let solution = algorithm.run().unwrap().clone();

    assert_eq!(solution.cost(), 10_000);
    assert_eq!(solution.antenna_count(), 2);
    assert!(solution.is_feasible(&algorithm.problem));
}

#[test]
fn test_infeasible_demand_fails_fast() {
    let buildings = vec![
        Building::with_demand(1, 0, 0, 100),
        Building::new(2, 50, 50, 7_000, 0, 0),
    ];
    let problem = Problem::new("TooDense", buildings).unwrap();
    let mut algorithm = PlacementAlgorithm::new(problem, quick_config());

    assert!(matches!(
        algorithm.run(),
        Err(PlacementError::InfeasibleBuilding { id: 2, demand: 7_000 })
    ));
    assert!(algorithm.best_solution.is_none());
}

#[test]
fn test_random_problem_is_scored_valid() {
    let problem = create_random_problem(250, 8);
    let mut algorithm = PlacementAlgorithm::new(problem, quick_config());

    let solution = algorithm.run().unwrap().clone();

    let score = ReferenceScorer.score(&solution.to_output(&algorithm.problem), &algorithm.problem);
    assert!(score.valid, "{}", score.message);
    assert_eq!(score.cost, solution.cost());

    let stats = algorithm.statistics.as_ref().unwrap();
    assert_eq!(stats.restarts, 1);
    assert_eq!(stats.best_cost, solution.cost());
    assert!(stats.best_cost <= stats.initial_cost);
    assert_eq!(stats.best_antennas, solution.antenna_count());
}

#[test]
fn test_restarts_never_worse_than_first_seed() {
    let problem = create_random_problem(150, 12);

    let mut single = PlacementAlgorithm::new(problem.clone(), quick_config().with_seed(5));
    let single_cost = single.run().unwrap().cost();

    let mut multi = PlacementAlgorithm::new(
        problem,
        quick_config().with_seed(5).with_restarts(3),
    );
    let multi_cost = multi.run().unwrap().cost();

    // Restart 0 reuses the base seed, so it reproduces the single run.
    assert!(multi_cost <= single_cost);
    assert_eq!(multi.statistics.as_ref().unwrap().restarts, 3);
}

#[test]
fn test_same_seed_same_cost() {
    let problem = create_random_problem(150, 13);

    let mut first = PlacementAlgorithm::new(problem.clone(), quick_config().with_seed(9));
    let mut second = PlacementAlgorithm::new(problem, quick_config().with_seed(9));

    let a = first.run().unwrap().clone();
    let b = second.run().unwrap().clone();
    assert_eq!(a.to_output(&first.problem), b.to_output(&second.problem));
}

#[test]
fn test_rejecting_scorer() {
    let problem = create_random_problem(40, 14);
    let mut algorithm = PlacementAlgorithm::new(problem, quick_config());

    match algorithm.run_with_scorer(&RejectAll) {
        Err(PlacementError::Rejected { message, .. }) => {
            assert_eq!(message, "nothing is good enough");
        }
        other => panic!("expected a rejection, got {:?}", other.map(|s| s.cost())),
    }
    assert!(algorithm.best_solution.is_none());
}

#[test]
fn test_run_from_improves_seed_solution() {
    let problem = create_random_problem(120, 15);
    let mut seed = Solution::new(problem.building_count());
    for i in 0..problem.building_count() {
        seed.push(Antenna::singleton(AntennaType::Density, i, &problem));
    }
    let seed_cost = seed.cost();

    let mut algorithm = PlacementAlgorithm::new(problem, quick_config());
    let solution = algorithm.run_from(seed).unwrap().clone();

    assert!(solution.cost() < seed_cost);
    assert!(solution.is_feasible(&algorithm.problem));
}

#[test]
fn test_run_from_with_rejecting_scorer() {
    let problem = create_random_problem(30, 18);
    let mut seed = Solution::new(problem.building_count());
    for i in 0..problem.building_count() {
        seed.push(Antenna::singleton(AntennaType::Spot, i, &problem));
    }

    let mut algorithm = PlacementAlgorithm::new(problem, quick_config());
    assert!(matches!(
        algorithm.run_from_with_scorer(seed.clone(), &RejectAll),
        Err(PlacementError::Rejected { .. })
    ));
    assert!(algorithm.best_solution.is_none());

    // The reference scorer accepts the same seeded run.
    let solution = algorithm.run_from_with_scorer(seed, &ReferenceScorer).unwrap().clone();
    assert!(solution.is_feasible(&algorithm.problem));
}

#[test]
fn test_run_from_rejects_broken_seed() {
    let problem = create_random_problem(10, 16);
    let mut seed = Solution::new(problem.building_count());
    seed.push(Antenna::singleton(AntennaType::Density, 0, &problem));

    let mut algorithm = PlacementAlgorithm::new(problem, quick_config());
    assert!(matches!(
        algorithm.run_from(seed),
        Err(PlacementError::InvalidSeed(_))
    ));
}

#[test]
fn test_empty_problem() {
    let problem = Problem::new("Empty", Vec::new()).unwrap();
    let mut algorithm = PlacementAlgorithm::new(problem, quick_config());

    let solution = algorithm.run().unwrap();
    assert_eq!(solution.cost(), 0);
    assert_eq!(solution.antenna_count(), 0);
}

#[test]
fn test_without_polish() {
    let problem = create_random_problem(80, 17);
    let mut algorithm = PlacementAlgorithm::new(problem, quick_config().with_polish(false));

    let solution = algorithm.run().unwrap().clone();
    assert!(solution.is_feasible(&algorithm.problem));
    assert_eq!(algorithm.statistics.as_ref().unwrap().polish_moves, 0);
}
