//! Utility functions: formatting, persistence and run statistics.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::time::Duration;

use crate::error::Result;
use crate::problem::Problem;
use crate::solution::{Solution, SolutionOutput};

/// Format a duration as hours, minutes, and seconds.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}h {:02}m {:02}s", hours, minutes, seconds)
}

/// Save a solution as `{ "antennas": [...] }` JSON.
pub fn save_solution<P: AsRef<Path>>(
    solution: &Solution,
    problem: &Problem,
    path: P,
) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &solution.to_output(problem))?;
    Ok(())
}

/// Load a solution previously written by [`save_solution`].
pub fn load_solution<P: AsRef<Path>>(path: P, problem: &Problem) -> Result<Solution> {
    let reader = BufReader::new(File::open(path)?);
    let output: SolutionOutput = serde_json::from_reader(reader)?;
    Solution::from_output(&output, problem)
}

/// Statistics about a completed search.
#[derive(Debug, Clone)]
pub struct SearchStatistics {
    pub restarts: usize,
    pub iterations: u64,
    pub accepted_moves: u64,
    pub improvements: u64,
    pub polish_moves: usize,
    pub runtime: Duration,
    pub initial_cost: u64,
    pub best_cost: u64,
    pub best_antennas: usize,
    pub best_singletons: usize,
}

impl SearchStatistics {
    /// Format the statistics as a string.
    pub fn format(&self) -> String {
        format!(
            "Search Statistics:
- Restarts: {}
- Iterations: {}
- Accepted Moves: {}
- Improvements: {}
- Polish Moves: {}
- Runtime: {}
- Initial Cost: {}
- Best Cost: {}
- Antennas: {} ({} serving a single building)",
            self.restarts,
            self.iterations,
            self.accepted_moves,
            self.improvements,
            self.polish_moves,
            format_duration(self.runtime),
            self.initial_cost,
            self.best_cost,
            self.best_antennas,
            self.best_singletons
        )
    }
}
