//! Circuit intermediate representation.
//!
//! The parser produces a `Netlist` containing elements and statements.
//! The transient driver consumes it to size and solve the MNA system.

use crate::elements::Element;
use crate::Scalar;

/// Node number in the netlist. Node 0 is ground and is never solved.
pub type NodeIndex = usize;

/// Transient analysis directive (`.TRAN stop step ADMO<k> internal_steps [UIC]`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranConfig {
    /// Last recorded sample time, in seconds.
    pub stop_time: Scalar,
    /// Spacing between recorded samples, in seconds.
    pub step: Scalar,
    /// Adams-Moulton order used by reactive elements (1-4).
    pub integration_order: u32,
    /// Number of integration sub-steps per recorded sample.
    pub internal_steps: usize,
    /// Seed reactive elements from their `IC=` values on the first sub-step.
    pub use_initial_conditions: bool,
}

impl TranConfig {
    /// Integration step used by every sub-step.
    pub fn sub_step(&self) -> Scalar {
        self.step / self.internal_steps as Scalar
    }

    /// Number of recorded samples: t = 0, step, 2*step, ... <= stop_time.
    ///
    /// The ratio is nudged up before flooring so that `0.3 / 0.1` still
    /// yields four samples. `None` when the ratio is not finite or does not
    /// fit in a `usize`.
    pub fn sample_count(&self) -> Option<usize> {
        let ratio = (self.stop_time / self.step * (1.0 + 1e-12)).floor();
        if !(ratio >= 0.0 && ratio < usize::MAX as Scalar) {
            return None;
        }
        (ratio as usize).checked_add(1)
    }
}

/// A simulation control statement from the netlist.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Tran(TranConfig),
}

/// A parsed circuit: title line, elements in netlist order, statements.
#[derive(Debug, Clone, Default)]
pub struct Netlist {
    pub title: String,
    pub elements: Vec<Element>,
    pub statements: Vec<Statement>,
}

impl Netlist {
    /// Highest node number referenced by any element; nodes 1..=count are unknowns.
    pub fn node_count(&self) -> usize {
        self.elements
            .iter()
            .flat_map(|e| e.nodes().iter().copied())
            .max()
            .unwrap_or(0)
    }

    /// The first transient directive, if the netlist has one.
    pub fn first_tran(&self) -> Option<&TranConfig> {
        self.statements.iter().find_map(|s| match s {
            Statement::Tran(cfg) => Some(cfg),
        })
    }
}
