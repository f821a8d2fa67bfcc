//! Performance statistics collection for `--stats` output.

use std::time::{Duration, Instant};

/// Collects performance counters and phase timings.
///
/// Created when `--stats` is passed, threaded as `Option<&mut Stats>`.
/// Zero cost when `None`: no timing calls, no counter increments.
pub struct Stats {
    total_start: Instant,
    phases: Vec<(&'static str, Duration)>,
    // Newton-Raphson
    pub newton_iterations: u32,
    pub newton_retries: u32,
    // Sub-phase accumulators
    pub assembly: Duration,
    pub linear_solve: Duration,
    // Transient
    pub substeps_accepted: u32,
    pub samples_recorded: u32,
    pub linear_solves: u32,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    pub fn new() -> Self {
        Self {
            total_start: Instant::now(),
            phases: Vec::new(),
            newton_iterations: 0,
            newton_retries: 0,
            assembly: Duration::ZERO,
            linear_solve: Duration::ZERO,
            substeps_accepted: 0,
            samples_recorded: 0,
            linear_solves: 0,
        }
    }

    /// Record a completed phase with its duration.
    pub fn add_phase(&mut self, name: &'static str, duration: Duration) {
        self.phases.push((name, duration));
    }

    pub fn phases(&self) -> &[(&'static str, Duration)] {
        &self.phases
    }

    /// Print the stats table to stderr.
    pub fn display(&self) {
        let total = self.total_start.elapsed();
        eprintln!();
        eprintln!("=== amspice Performance Stats ===");

        for (name, dur) in &self.phases {
            eprintln!("  {:<24} {:>8.3}s", name, dur.as_secs_f64());
        }

        if self.newton_iterations > 0 {
            eprintln!("  Newton iterations:      {}", self.newton_iterations);
            eprintln!("    Randomized retries:   {}", self.newton_retries);
            eprintln!("    Assembly:             {:>8.3}s", self.assembly.as_secs_f64());
            eprintln!("    Linear solve:         {:>8.3}s", self.linear_solve.as_secs_f64());
        }

        if self.substeps_accepted > 0 {
            eprintln!(
                "  Sub-steps:              accepted={}  samples={}",
                self.substeps_accepted, self.samples_recorded
            );
        }

        if self.linear_solves > 0 {
            eprintln!("  Linear solves:          {}", self.linear_solves);
        }

        eprintln!("  ─────────────────────────────────");
        eprintln!("  Total:                  {:>8.3}s", total.as_secs_f64());
    }
}
