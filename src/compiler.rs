//! MNA (Modified Nodal Analysis) system layout and stamp context.
//!
//! Sizes the dense system for a netlist and owns the matrices every element
//! stamps into.
//!
//! # MNA System
//!
//! For n non-ground nodes and m auxiliary unknowns the system is
//! (1+n+m) x (1+n+m):
//!
//! ```text
//! [A] * [x] = [b]
//! ```
//!
//! where x = [ground; node_voltages; auxiliary_currents]. Row and column 0
//! belong to ground: elements may stamp into them, but the solver never
//! eliminates them and `x[0]` is always 0.
//!
//! Auxiliary unknowns are handed out in element order, as one contiguous
//! block per element, right after the node columns.

use crate::dense::DenseMatrix;
use crate::elements::Element;
use crate::ir::NodeIndex;
use crate::Scalar;

/// Where every unknown of the system lives.
#[derive(Debug, Clone, PartialEq)]
pub struct MnaLayout {
    /// Number of non-ground nodes.
    pub node_count: usize,
    /// Total auxiliary unknowns (sum of every element's count).
    pub aux_count: usize,
    /// Index of the first auxiliary unknown for each element, in element order.
    /// Elements without auxiliary unknowns get the position the next one would use.
    pub aux_offsets: Vec<usize>,
    /// Column label for every unknown except ground:
    /// `1..=node_count` followed by `j<k><name>` for auxiliary currents.
    pub labels: Vec<String>,
}

impl MnaLayout {
    /// Total system size, ground row included.
    pub fn size(&self) -> usize {
        1 + self.node_count + self.aux_count
    }
}

/// Compute the system layout for an element list.
pub fn compile(elements: &[Element], node_count: usize) -> MnaLayout {
    let mut labels: Vec<String> = (1..=node_count).map(|n| n.to_string()).collect();
    let mut aux_offsets = Vec::with_capacity(elements.len());
    let mut next = 1 + node_count;

    for element in elements {
        aux_offsets.push(next);
        let count = element.aux_count();
        if count == 1 {
            labels.push(format!("j{}", element.name()));
        } else {
            for k in 1..=count {
                labels.push(format!("j{}{}", k, element.name()));
            }
        }
        next += count;
    }

    MnaLayout {
        node_count,
        aux_count: next - 1 - node_count,
        aux_offsets,
        labels,
    }
}

/// Shared state lent to each element while it stamps.
///
/// Owned by the transient driver for the whole simulation. `a` and `b` are
/// cleared before every stamp pass; elements only ever add into them.
#[derive(Debug, Clone)]
pub struct StampContext {
    /// Coefficient matrix.
    pub a: DenseMatrix,
    /// Right-hand side; the solver overwrites it with the new trial.
    pub b: Vec<Scalar>,
    /// Last converged solution (previous sub-step).
    pub x: Vec<Scalar>,
    /// Newton-Raphson trial the current pass linearizes around.
    pub last_trial: Vec<Scalar>,
    /// Sub-step time.
    pub time: Scalar,
    /// Adams-Moulton order requested by the analysis.
    pub order: u32,
    /// Sub-step size.
    pub step: Scalar,
    /// First pass of a Newton-Raphson cycle.
    pub new_nr_cycle: bool,
    /// First sub-step of the simulation with initial conditions requested.
    pub use_ic: bool,
    /// First auxiliary unknown of the element being stamped.
    pub aux_start: usize,
}

impl StampContext {
    pub fn new(size: usize, order: u32, step: Scalar, use_ic: bool) -> Self {
        Self {
            a: DenseMatrix::zeros(size),
            b: vec![0.0; size],
            x: vec![0.0; size],
            last_trial: vec![0.0; size],
            time: 0.0,
            order,
            step,
            new_nr_cycle: false,
            use_ic,
            aux_start: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.b.len()
    }

    /// Zero `a` and `b` ahead of a stamp pass.
    pub fn clear(&mut self) {
        self.a.clear();
        self.b.fill(0.0);
    }

    /// `a[row][col] += value`
    #[inline]
    pub fn add(&mut self, row: usize, col: usize, value: Scalar) {
        self.a[(row, col)] += value;
    }

    /// `b[row] += value`
    #[inline]
    pub fn add_rhs(&mut self, row: usize, value: Scalar) {
        self.b[row] += value;
    }

    /// Four-entry conductance pattern between two nodes.
    pub fn stamp_conductance(&mut self, n1: NodeIndex, n2: NodeIndex, g: Scalar) {
        self.add(n1, n1, g);
        self.add(n2, n2, g);
        self.add(n1, n2, -g);
        self.add(n2, n1, -g);
    }

    /// Current `value` flowing out of `from` and into `to` through the element.
    pub fn stamp_current(&mut self, from: NodeIndex, to: NodeIndex, value: Scalar) {
        self.add_rhs(from, -value);
        self.add_rhs(to, value);
    }

    /// Auxiliary unknown `k` (0-based) of the element being stamped.
    pub fn aux(&self, k: usize) -> usize {
        self.aux_start + k
    }

    /// `v(p) - v(n)` in the trial being linearized around.
    pub fn trial_voltage(&self, p: NodeIndex, n: NodeIndex) -> Scalar {
        self.last_trial[p] - self.last_trial[n]
    }

    /// `v(p) - v(n)` in the last converged solution.
    pub fn solved_voltage(&self, p: NodeIndex, n: NodeIndex) -> Scalar {
        self.x[p] - self.x[n]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ControlledSource, ControlledSourceKind, Resistor, Source};
    use crate::signal::Signal;

    fn sample_elements() -> Vec<Element> {
        vec![
            Element::VoltageSource(Source::new("V1", 1, 0, Signal::Constant(1.0))),
            Element::Resistor(Resistor::new("R1", 1, 2, 1e3)),
            Element::Controlled(ControlledSource::new(
                ControlledSourceKind::CurrentControlledVoltage,
                "H1",
                [3, 0, 2, 0],
                10.0,
            )),
            Element::Resistor(Resistor::new("R2", 3, 0, 1e3)),
        ]
    }

    #[test]
    fn test_layout_sizes() {
        let layout = compile(&sample_elements(), 3);
        assert_eq!(layout.node_count, 3);
        assert_eq!(layout.aux_count, 3);
        assert_eq!(layout.size(), 7);
        assert_eq!(layout.aux_offsets, vec![4, 5, 5, 7]);
    }

    #[test]
    fn test_layout_labels() {
        let layout = compile(&sample_elements(), 3);
        assert_eq!(layout.labels, vec!["1", "2", "3", "jV1", "j1H1", "j2H1"]);
    }

    #[test]
    fn test_empty_layout() {
        let layout = compile(&[], 0);
        assert_eq!(layout.size(), 1);
        assert!(layout.labels.is_empty());
    }

    #[test]
    fn test_stamp_conductance_pattern() {
        let mut ctx = StampContext::new(3, 1, 1e-3, false);
        ctx.stamp_conductance(1, 2, 0.5);
        assert_eq!(ctx.a[(1, 1)], 0.5);
        assert_eq!(ctx.a[(2, 2)], 0.5);
        assert_eq!(ctx.a[(1, 2)], -0.5);
        assert_eq!(ctx.a[(2, 1)], -0.5);
        ctx.clear();
        assert_eq!(ctx.a, DenseMatrix::zeros(3));
    }
}
