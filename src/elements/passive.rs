use crate::compiler::StampContext;
use crate::error::{AmspiceError, Result};
use crate::ir::NodeIndex;
use crate::Scalar;

/// Linear resistor.
#[derive(Debug, Clone, PartialEq)]
pub struct Resistor {
    pub name: String,
    pub nodes: [NodeIndex; 2],
    pub resistance: Scalar,
}

impl Resistor {
    pub fn new(name: impl Into<String>, n1: NodeIndex, n2: NodeIndex, resistance: Scalar) -> Self {
        Self {
            name: name.into(),
            nodes: [n1, n2],
            resistance,
        }
    }

    pub(super) fn stamp(&self, ctx: &mut StampContext) {
        let [a, b] = self.nodes;
        ctx.stamp_conductance(a, b, 1.0 / self.resistance);
    }
}

/// Piecewise-linear resistor given as (voltage, current) breakpoints.
///
/// Linearized around the Newton-Raphson trial: the segment bracketing the
/// trial voltage becomes a conductance plus a parallel current source.
/// Outside the table the first or last segment is extended.
#[derive(Debug, Clone, PartialEq)]
pub struct NonlinearResistor {
    pub name: String,
    pub nodes: [NodeIndex; 2],
    points: Vec<(Scalar, Scalar)>,
}

impl NonlinearResistor {
    /// Breakpoints are sorted by voltage. At least two points with distinct
    /// voltages are required.
    pub fn new(
        name: impl Into<String>,
        n1: NodeIndex,
        n2: NodeIndex,
        mut points: Vec<(Scalar, Scalar)>,
    ) -> Result<Self> {
        let name = name.into();
        if points.len() < 2 {
            return Err(AmspiceError::BadElementString(format!(
                "{name}: nonlinear resistor needs at least two (v, i) points"
            )));
        }
        points.sort_by(|p, q| p.0.total_cmp(&q.0));
        if points.windows(2).any(|w| w[0].0 == w[1].0) {
            return Err(AmspiceError::BadElementString(format!(
                "{name}: nonlinear resistor has repeated breakpoint voltages"
            )));
        }
        Ok(Self {
            name,
            nodes: [n1, n2],
            points,
        })
    }

    pub fn points(&self) -> &[(Scalar, Scalar)] {
        &self.points
    }

    /// Conductance and current offset of the segment covering `v`: i = g*v + i0.
    pub fn segment(&self, v: Scalar) -> (Scalar, Scalar) {
        let upper = self.points.partition_point(|&(pv, _)| pv <= v);
        let k = upper.saturating_sub(1).min(self.points.len() - 2);
        let (v1, i1) = self.points[k];
        let (v2, i2) = self.points[k + 1];
        let g = (i2 - i1) / (v2 - v1);
        (g, i2 - g * v2)
    }

    pub(super) fn stamp(&self, ctx: &mut StampContext) {
        let [a, b] = self.nodes;
        let (g, i0) = self.segment(ctx.trial_voltage(a, b));
        ctx.stamp_conductance(a, b, g);
        ctx.stamp_current(a, b, i0);
    }
}

/// Switch between `nodes[0]` and `nodes[1]`, closed while the control voltage
/// `v(nodes[2]) - v(nodes[3])` is at least `v_ref`.
#[derive(Debug, Clone, PartialEq)]
pub struct VoltageControlledSwitch {
    pub name: String,
    pub nodes: [NodeIndex; 4],
    pub g_on: Scalar,
    pub g_off: Scalar,
    pub v_ref: Scalar,
}

impl VoltageControlledSwitch {
    pub fn new(
        name: impl Into<String>,
        nodes: [NodeIndex; 4],
        g_on: Scalar,
        g_off: Scalar,
        v_ref: Scalar,
    ) -> Self {
        Self {
            name: name.into(),
            nodes,
            g_on,
            g_off,
            v_ref,
        }
    }

    pub(super) fn stamp(&self, ctx: &mut StampContext) {
        let [a, b, cp, cn] = self.nodes;
        let g = if ctx.trial_voltage(cp, cn) >= self.v_ref {
            self.g_on
        } else {
            self.g_off
        };
        ctx.stamp_conductance(a, b, g);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_resistor_four_entry_stamp() {
        let mut ctx = StampContext::new(4, 1, 1e-3, false);
        Resistor::new("R1", 1, 3, 4.0).stamp(&mut ctx);
        assert_eq!(ctx.a[(1, 1)], 0.25);
        assert_eq!(ctx.a[(3, 3)], 0.25);
        assert_eq!(ctx.a[(1, 3)], -0.25);
        assert_eq!(ctx.a[(3, 1)], -0.25);
        let touched = (0..4)
            .flat_map(|r| (0..4).map(move |c| (r, c)))
            .filter(|&rc| ctx.a[rc] != 0.0)
            .count();
        assert_eq!(touched, 4);
        assert!(ctx.b.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_resistor_stamps_accumulate() {
        let mut ctx = StampContext::new(2, 1, 1e-3, false);
        let r = Resistor::new("R1", 1, 0, 2.0);
        r.stamp(&mut ctx);
        r.stamp(&mut ctx);
        assert_eq!(ctx.a[(1, 1)], 1.0);
    }

    fn diode_like() -> NonlinearResistor {
        // Given unsorted on purpose.
        NonlinearResistor::new("N1", 1, 0, vec![(1.0, 2.0), (0.0, 0.0), (2.0, 10.0)]).unwrap()
    }

    #[test]
    fn test_nonlinear_points_sorted() {
        assert_eq!(diode_like().points(), &[(0.0, 0.0), (1.0, 2.0), (2.0, 10.0)]);
    }

    #[test]
    fn test_nonlinear_segment_lookup() {
        let n = diode_like();
        let (g, i0) = n.segment(0.5);
        assert_abs_diff_eq!(g, 2.0);
        assert_abs_diff_eq!(i0, 0.0);

        let (g, i0) = n.segment(1.5);
        assert_abs_diff_eq!(g, 8.0);
        assert_abs_diff_eq!(i0, -6.0);
    }

    #[test]
    fn test_nonlinear_segment_clamped_outside_table() {
        let n = diode_like();
        assert_eq!(n.segment(-5.0), n.segment(0.5));
        assert_eq!(n.segment(7.0), n.segment(1.5));
        assert_eq!(n.segment(2.0), n.segment(1.5));
    }

    #[test]
    fn test_nonlinear_stamp_uses_trial() {
        let mut ctx = StampContext::new(2, 1, 1e-3, false);
        ctx.last_trial[1] = 1.5;
        diode_like().stamp(&mut ctx);
        assert_abs_diff_eq!(ctx.a[(1, 1)], 8.0);
        // i = 8v - 6: the -6 offset moves to the right-hand side
        assert_abs_diff_eq!(ctx.b[1], 6.0);
        assert_abs_diff_eq!(ctx.b[0], -6.0);
    }

    #[test]
    fn test_nonlinear_rejects_bad_tables() {
        assert!(NonlinearResistor::new("N1", 1, 0, vec![(0.0, 0.0)]).is_err());
        assert!(NonlinearResistor::new("N1", 1, 0, vec![(1.0, 0.0), (1.0, 2.0)]).is_err());
    }

    #[test]
    fn test_switch_follows_control_voltage() {
        let sw = VoltageControlledSwitch::new("$1", [1, 0, 2, 0], 1e3, 1e-6, 0.5);

        let mut ctx = StampContext::new(3, 1, 1e-3, false);
        ctx.last_trial[2] = 0.5;
        sw.stamp(&mut ctx);
        assert_eq!(ctx.a[(1, 1)], 1e3);

        let mut ctx = StampContext::new(3, 1, 1e-3, false);
        ctx.last_trial[2] = 0.49;
        sw.stamp(&mut ctx);
        assert_eq!(ctx.a[(1, 1)], 1e-6);
    }
}
