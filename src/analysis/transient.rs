//! Transient (time-domain) analysis engine.
//!
//! Records one sample every `step` seconds from t=0 up to `stop_time`. Between
//! samples the circuit is integrated with `internal_steps` fixed sub-steps of
//! `h = step / internal_steps`; each sub-step is a full Newton-Raphson solve
//! in which reactive elements contribute their Adams-Moulton companion
//! models. Sub-step i of sample k runs at `k*step + i*h`.

use std::time::Instant;

use super::TranResult;
use crate::compiler::{self, StampContext};
use crate::error::{AmspiceError, Result};
use crate::ir::{Netlist, TranConfig};
use crate::solver::{LinearSolver, NewtonParams, NewtonSolver};
use crate::stats::Stats;
use crate::Scalar;

/// Run the first `.TRAN` directive of a netlist.
///
/// Elements are cloned so that the netlist keeps its pristine integration
/// history and can be simulated again.
pub fn run(
    netlist: &Netlist,
    solver: &dyn LinearSolver,
    params: &NewtonParams,
    mut stats: Option<&mut Stats>,
) -> Result<TranResult> {
    let config = *netlist.first_tran().ok_or_else(|| {
        AmspiceError::IncompleteNetList("no transient analysis (.TRAN) statement".to_string())
    })?;
    let sample_count = validate(&config)?;

    let _span = tracing::info_span!(
        "transient_analysis",
        stop = config.stop_time,
        step = config.step,
        order = config.integration_order
    )
    .entered();

    let t = Instant::now();
    let mut elements = netlist.elements.clone();
    let layout = compiler::compile(&elements, netlist.node_count());
    let size = layout.size();
    let h = config.sub_step();
    tracing::debug!(
        nodes = layout.node_count,
        aux = layout.aux_count,
        size,
        samples = sample_count,
        sub_step = h,
        "system sized"
    );

    let mut ctx = StampContext::new(
        size,
        config.integration_order,
        h,
        config.use_initial_conditions,
    );
    let mut newton = NewtonSolver::new(params.clone());
    let mut samples: Vec<Vec<Scalar>> = Vec::new();
    if let Some(ref mut s) = stats { s.add_phase("Setup", t.elapsed()); }

    let t = Instant::now();
    for k in 0..sample_count {
        let t_k = k as Scalar * config.step;
        for i in 0..config.internal_steps {
            ctx.time = t_k + i as Scalar * h;
            newton.solve(
                &mut elements,
                &layout.aux_offsets,
                &mut ctx,
                solver,
                stats.as_deref_mut(),
            )?;
            if let Some(ref mut s) = stats { s.substeps_accepted += 1; }
        }

        let mut row = Vec::with_capacity(size);
        row.push(t_k);
        row.extend_from_slice(&ctx.x[1..]);
        samples.push(row);
        if let Some(ref mut s) = stats { s.samples_recorded += 1; }
    }
    if let Some(ref mut s) = stats { s.add_phase("Transient", t.elapsed()); }

    tracing::info!(samples = samples.len(), size, "transient analysis complete");

    Ok(TranResult {
        labels: layout.labels,
        samples,
    })
}

/// Check the directive and return its sample count.
fn validate(config: &TranConfig) -> Result<usize> {
    if !(config.step > 0.0 && config.step.is_finite()) {
        return Err(AmspiceError::InvalidAnalysis(format!(
            "time step must be positive, got {}",
            config.step
        )));
    }
    if !(config.stop_time >= 0.0 && config.stop_time.is_finite()) {
        return Err(AmspiceError::InvalidAnalysis(format!(
            "stop time must be finite and not negative, got {}",
            config.stop_time
        )));
    }
    if config.internal_steps == 0 {
        return Err(AmspiceError::InvalidAnalysis(
            "at least one internal step per sample is required".to_string(),
        ));
    }
    config.sample_count().ok_or_else(|| {
        AmspiceError::InvalidAnalysis(format!(
            "too many samples for stop time {} and step {}",
            config.stop_time, config.step
        ))
    })
}
