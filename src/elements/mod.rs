//! Circuit elements and their MNA stamps.
//!
//! Every element knows how many auxiliary current unknowns it adds to the
//! system and how to add its contribution into the shared [`StampContext`].
//! Stamps only ever add into `A` and `b`; the driver clears them between
//! passes.
//!
//! Reactive elements carry integration history. That history moves forward
//! only in [`Element::begin_cycle`], which the driver calls once at the start
//! of every Newton-Raphson cycle; [`Element::stamp`] borrows the element
//! immutably and may run any number of times within the cycle.

mod controlled;
mod passive;
mod reactive;
mod sources;

pub use controlled::{ControlledSource, ControlledSourceKind, IdealOpAmp};
pub use passive::{NonlinearResistor, Resistor, VoltageControlledSwitch};
pub use reactive::{Capacitor, Inductor};
pub use sources::Source;

use crate::compiler::StampContext;
use crate::error::{AmspiceError, Result};
use crate::ir::NodeIndex;

/// A circuit element from the netlist.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Resistor(Resistor),
    NonlinearResistor(NonlinearResistor),
    Switch(VoltageControlledSwitch),
    Inductor(Inductor),
    Capacitor(Capacitor),
    /// E, F, G and H sources.
    Controlled(ControlledSource),
    CurrentSource(Source),
    VoltageSource(Source),
    OpAmp(IdealOpAmp),
}

impl Element {
    pub fn name(&self) -> &str {
        match self {
            Element::Resistor(e) => &e.name,
            Element::NonlinearResistor(e) => &e.name,
            Element::Switch(e) => &e.name,
            Element::Inductor(e) => &e.name,
            Element::Capacitor(e) => &e.name,
            Element::Controlled(e) => &e.name,
            Element::CurrentSource(e) | Element::VoltageSource(e) => &e.name,
            Element::OpAmp(e) => &e.name,
        }
    }

    /// Every node the element touches, ground included.
    pub fn nodes(&self) -> &[NodeIndex] {
        match self {
            Element::Resistor(e) => &e.nodes,
            Element::NonlinearResistor(e) => &e.nodes,
            Element::Switch(e) => &e.nodes,
            Element::Inductor(e) => &e.nodes,
            Element::Capacitor(e) => &e.nodes,
            Element::Controlled(e) => &e.nodes,
            Element::CurrentSource(e) | Element::VoltageSource(e) => &e.nodes,
            Element::OpAmp(e) => &e.nodes,
        }
    }

    /// Number of auxiliary current unknowns appended to the system.
    pub fn aux_count(&self) -> usize {
        match self {
            Element::Resistor(_)
            | Element::NonlinearResistor(_)
            | Element::Switch(_)
            | Element::Capacitor(_)
            | Element::CurrentSource(_) => 0,
            Element::Inductor(_) | Element::VoltageSource(_) | Element::OpAmp(_) => 1,
            Element::Controlled(e) => e.kind.aux_count(),
        }
    }

    /// Advance integration history at the start of a Newton-Raphson cycle.
    ///
    /// `ctx.x` must hold the last converged solution and `ctx.aux_start` the
    /// element's first auxiliary unknown.
    pub fn begin_cycle(&mut self, ctx: &StampContext) -> Result<()> {
        match self {
            Element::Inductor(e) => e.begin_cycle(ctx),
            Element::Capacitor(e) => e.begin_cycle(ctx),
            _ => Ok(()),
        }
    }

    /// Add the element's contribution into `ctx.a` and `ctx.b`.
    pub fn stamp(&self, ctx: &mut StampContext) {
        match self {
            Element::Resistor(e) => e.stamp(ctx),
            Element::NonlinearResistor(e) => e.stamp(ctx),
            Element::Switch(e) => e.stamp(ctx),
            Element::Inductor(e) => e.stamp(ctx),
            Element::Capacitor(e) => e.stamp(ctx),
            Element::Controlled(e) => e.stamp(ctx),
            Element::CurrentSource(e) => e.stamp_current(ctx),
            Element::VoltageSource(e) => e.stamp_voltage(ctx),
            Element::OpAmp(e) => e.stamp(ctx),
        }
    }
}

/// Reject Adams-Moulton orders the companion models do not cover.
pub(crate) fn check_order(order: u32) -> Result<u32> {
    if (1..=4).contains(&order) {
        Ok(order)
    } else {
        Err(AmspiceError::InvalidIntegrationMethod(order))
    }
}
