//! Newton-Raphson iteration for a single transient sub-step.
//!
//! Each pass stamps every element around the previous trial, solves the
//! linear system and compares the new trial against the old one. When the
//! iteration stalls, the components that keep moving are thrown to random
//! values and the iteration starts over, up to a fixed number of times.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::LinearSolver;
use crate::compiler::StampContext;
use crate::elements::Element;
use crate::error::{AmspiceError, Result};
use crate::stats::Stats;
use crate::Scalar;

/// Iterations allowed before the trial is reseeded.
pub const NEWTON_RAPHSON_CYCLE_LIMIT: usize = 40;
/// Randomized restarts allowed per sub-step.
pub const NEWTON_RAPHSON_IA_RETRIES: usize = 10;
/// Largest per-component change accepted as converged.
pub const ACCEPTABLE_NR_ERROR: Scalar = 1e-6;
/// Reseeded components are drawn uniformly from `[-MAX_NR_GUESS, MAX_NR_GUESS]`.
pub const MAX_NR_GUESS: Scalar = 1e3;

/// Parameters for the Newton-Raphson iteration.
#[derive(Debug, Clone)]
pub struct NewtonParams {
    pub cycle_limit: usize,
    pub max_retries: usize,
    pub tolerance: Scalar,
    pub max_guess: Scalar,
    /// Seed for the restart generator; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for NewtonParams {
    fn default() -> Self {
        Self {
            cycle_limit: NEWTON_RAPHSON_CYCLE_LIMIT,
            max_retries: NEWTON_RAPHSON_IA_RETRIES,
            tolerance: ACCEPTABLE_NR_ERROR,
            max_guess: MAX_NR_GUESS,
            seed: None,
        }
    }
}

/// Newton-Raphson driver shared by every sub-step of a simulation.
pub struct NewtonSolver {
    params: NewtonParams,
    rng: StdRng,
}

impl NewtonSolver {
    pub fn new(params: NewtonParams) -> Self {
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { params, rng }
    }

    /// Solve the system at `ctx.time` starting from the last solution `ctx.x`.
    ///
    /// `aux_offsets[i]` is the first auxiliary unknown of `elements[i]`. On
    /// success the converged solution is in `ctx.x` and `use_ic` is cleared.
    /// Returns the number of linear solves it took.
    pub fn solve(
        &mut self,
        elements: &mut [Element],
        aux_offsets: &[usize],
        ctx: &mut StampContext,
        linear: &dyn LinearSolver,
        mut stats: Option<&mut Stats>,
    ) -> Result<usize> {
        let tol = self.params.tolerance;
        let mut iterations = 0;
        let mut retries = 0;
        let mut solves = 0;

        ctx.last_trial.copy_from_slice(&ctx.x);
        ctx.new_nr_cycle = true;

        loop {
            if ctx.new_nr_cycle {
                for (element, &offset) in elements.iter_mut().zip(aux_offsets) {
                    ctx.aux_start = offset;
                    element.begin_cycle(ctx)?;
                }
            }

            let t = Instant::now();
            ctx.clear();
            for (element, &offset) in elements.iter().zip(aux_offsets) {
                ctx.aux_start = offset;
                element.stamp(ctx);
            }
            if let Some(ref mut s) = stats { s.assembly += t.elapsed(); }

            let t = Instant::now();
            linear.solve(&mut ctx.a, &mut ctx.b)?;
            solves += 1;
            if let Some(ref mut s) = stats {
                s.linear_solve += t.elapsed();
                s.linear_solves += 1;
                s.newton_iterations += 1;
            }

            let converged = ctx
                .b
                .iter()
                .zip(&ctx.last_trial)
                .all(|(new, old)| (new - old).abs() <= tol);
            if converged {
                std::mem::swap(&mut ctx.x, &mut ctx.b);
                ctx.use_ic = false;
                return Ok(solves);
            }

            iterations += 1;
            if iterations == self.params.cycle_limit {
                if retries == self.params.max_retries {
                    return Err(AmspiceError::NewtonRaphsonFailed {
                        time: ctx.time,
                        retries,
                    });
                }
                retries += 1;
                iterations = 0;
                if let Some(ref mut s) = stats { s.newton_retries += 1; }

                let guess = self.params.max_guess;
                let mut reseeded = 0;
                for (new, old) in ctx.b.iter_mut().zip(&ctx.last_trial) {
                    // NaN components count as diverging too.
                    if !((*new - *old).abs() <= tol) {
                        *new = self.rng.gen_range(-guess..=guess);
                        reseeded += 1;
                    }
                }
                tracing::debug!(time = ctx.time, retry = retries, reseeded, "newton-raphson reseed");
            }

            ctx.new_nr_cycle = false;
            std::mem::swap(&mut ctx.b, &mut ctx.last_trial);
        }
    }
}
