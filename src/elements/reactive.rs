//! Inductor and capacitor companion models.
//!
//! Both are discretized with Adams-Moulton formulas of order 1 to 4
//! (order 1 is backward Euler, order 2 trapezoidal). Order k needs the
//! derivative at the k-1 previous accepted points, so each element keeps the
//! last three of them.
//!
//! | order | factor | history term |
//! |---|---|---|
//! | 1 | 1 | 0 |
//! | 2 | 2 | y0 |
//! | 3 | 12/5 | 8/5 y0 - 1/5 y1 |
//! | 4 | 8/3 | 19/9 y0 - 5/9 y1 + 1/9 y2 |
//!
//! For the inductor y is the branch voltage, for the capacitor the branch
//! current.

use super::check_order;
use crate::compiler::StampContext;
use crate::error::Result;
use crate::ir::NodeIndex;
use crate::Scalar;

/// Leading coefficient and history contribution for an Adams-Moulton step.
fn adams_moulton(order: u32, history: &[Scalar; 3]) -> (Scalar, Scalar) {
    let [y0, y1, y2] = *history;
    match order {
        1 => (1.0, 0.0),
        2 => (2.0, y0),
        3 => (12.0 / 5.0, 8.0 * y0 / 5.0 - y1 / 5.0),
        _ => (8.0 / 3.0, y2 / 9.0 - 5.0 * y1 / 9.0 + 19.0 * y0 / 9.0),
    }
}

/// Inductor, stamped as a series resistance and voltage source on its
/// auxiliary current: `v(a) - v(b) = r*j - v`.
#[derive(Debug, Clone, PartialEq)]
pub struct Inductor {
    pub name: String,
    pub nodes: [NodeIndex; 2],
    pub inductance: Scalar,
    /// Branch current imposed on the first sub-step when initial conditions are used.
    pub initial_current: Scalar,
    voltage_history: [Scalar; 3],
    last_current: Scalar,
    companion_r: Scalar,
    companion_v: Scalar,
}

impl Inductor {
    pub fn new(
        name: impl Into<String>,
        n1: NodeIndex,
        n2: NodeIndex,
        inductance: Scalar,
        initial_current: Scalar,
    ) -> Self {
        Self {
            name: name.into(),
            nodes: [n1, n2],
            inductance,
            initial_current,
            voltage_history: [0.0; 3],
            last_current: 0.0,
            companion_r: 0.0,
            companion_v: 0.0,
        }
    }

    /// Branch voltages at the last three accepted points, newest first.
    pub fn voltage_history(&self) -> [Scalar; 3] {
        self.voltage_history
    }

    /// Companion resistance and voltage for the current cycle.
    pub fn companion(&self) -> (Scalar, Scalar) {
        (self.companion_r, self.companion_v)
    }

    pub(super) fn begin_cycle(&mut self, ctx: &StampContext) -> Result<()> {
        let mut order = check_order(ctx.order)?;
        let [a, b] = self.nodes;

        let h = &mut self.voltage_history;
        *h = [ctx.solved_voltage(a, b), h[0], h[1]];

        if ctx.use_ic {
            order = 1;
            self.last_current = self.initial_current;
        } else {
            self.last_current = ctx.x[ctx.aux(0)];
        }

        let (factor, history) = adams_moulton(order, &self.voltage_history);
        self.companion_r = factor * self.inductance / ctx.step;
        self.companion_v = self.companion_r * self.last_current + history;
        Ok(())
    }

    pub(super) fn stamp(&self, ctx: &mut StampContext) {
        let [a, b] = self.nodes;
        let j = ctx.aux(0);
        ctx.add(a, j, 1.0);
        ctx.add(b, j, -1.0);
        ctx.add(j, a, -1.0);
        ctx.add(j, b, 1.0);
        ctx.add(j, j, self.companion_r);
        ctx.add_rhs(j, self.companion_v);
    }
}

/// Capacitor, stamped as a parallel conductance and current source:
/// `i = g*v - i_src`.
#[derive(Debug, Clone, PartialEq)]
pub struct Capacitor {
    pub name: String,
    pub nodes: [NodeIndex; 2],
    pub capacitance: Scalar,
    /// Branch voltage imposed on the first sub-step when initial conditions are used.
    pub initial_voltage: Scalar,
    current_history: [Scalar; 3],
    last_voltage: Scalar,
    companion_g: Scalar,
    companion_i: Scalar,
}

impl Capacitor {
    pub fn new(
        name: impl Into<String>,
        n1: NodeIndex,
        n2: NodeIndex,
        capacitance: Scalar,
        initial_voltage: Scalar,
    ) -> Self {
        Self {
            name: name.into(),
            nodes: [n1, n2],
            capacitance,
            initial_voltage,
            current_history: [0.0; 3],
            last_voltage: 0.0,
            companion_g: 0.0,
            companion_i: 0.0,
        }
    }

    /// Branch currents at the last three accepted points, newest first.
    pub fn current_history(&self) -> [Scalar; 3] {
        self.current_history
    }

    /// Companion conductance and current for the current cycle.
    pub fn companion(&self) -> (Scalar, Scalar) {
        (self.companion_g, self.companion_i)
    }

    pub(super) fn begin_cycle(&mut self, ctx: &StampContext) -> Result<()> {
        let mut order = check_order(ctx.order)?;
        let [a, b] = self.nodes;
        let v_solved = ctx.solved_voltage(a, b);

        // Current through the previous companion at the accepted point.
        let i_solved = self.companion_g * v_solved - self.companion_i;
        let h = &mut self.current_history;
        *h = [i_solved, h[0], h[1]];

        if ctx.use_ic {
            order = 1;
            self.last_voltage = self.initial_voltage;
        } else {
            self.last_voltage = v_solved;
        }

        let (factor, history) = adams_moulton(order, &self.current_history);
        self.companion_g = factor * self.capacitance / ctx.step;
        self.companion_i = self.companion_g * self.last_voltage + history;
        Ok(())
    }

    pub(super) fn stamp(&self, ctx: &mut StampContext) {
        let [a, b] = self.nodes;
        ctx.stamp_conductance(a, b, self.companion_g);
        ctx.add_rhs(a, self.companion_i);
        ctx.add_rhs(b, -self.companion_i);
    }
}
