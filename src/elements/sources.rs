use crate::compiler::StampContext;
use crate::ir::NodeIndex;
use crate::signal::Signal;
use crate::Scalar;

/// Independent source between `p` and `n`, driven by a signal.
///
/// The same data backs current and voltage sources; the [`Element`] variant
/// decides which stamp applies.
///
/// [`Element`]: super::Element
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub name: String,
    /// `[p, n]`
    pub nodes: [NodeIndex; 2],
    pub signal: Signal,
}

impl Source {
    pub fn new(name: impl Into<String>, p: NodeIndex, n: NodeIndex, signal: Signal) -> Self {
        Self {
            name: name.into(),
            nodes: [p, n],
            signal,
        }
    }

    pub fn value(&self, t: Scalar) -> Scalar {
        self.signal.value(t)
    }

    /// Current `s(t)` flowing from `p` through the source to `n`.
    pub(super) fn stamp_current(&self, ctx: &mut StampContext) {
        let [p, n] = self.nodes;
        let i = self.value(ctx.time);
        ctx.stamp_current(p, n, i);
    }

    /// `v(p) - v(n) = s(t)` on the source's auxiliary row.
    pub(super) fn stamp_voltage(&self, ctx: &mut StampContext) {
        let [p, n] = self.nodes;
        let j = ctx.aux(0);
        ctx.add(p, j, 1.0);
        ctx.add(n, j, -1.0);
        ctx.add(j, p, -1.0);
        ctx.add(j, n, 1.0);
        ctx.add_rhs(j, -self.value(ctx.time));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_source_rhs() {
        let mut ctx = StampContext::new(3, 1, 1e-3, false);
        Source::new("I1", 1, 2, Signal::Constant(3.0)).stamp_current(&mut ctx);
        assert_eq!(ctx.b, vec![0.0, -3.0, 3.0]);
        assert_eq!(ctx.a, crate::dense::DenseMatrix::zeros(3));
    }

    #[test]
    fn test_voltage_source_stamp() {
        let mut ctx = StampContext::new(3, 1, 1e-3, false);
        ctx.aux_start = 2;
        Source::new("V1", 1, 0, Signal::Constant(10.0)).stamp_voltage(&mut ctx);
        assert_eq!(ctx.a[(1, 2)], 1.0);
        assert_eq!(ctx.a[(0, 2)], -1.0);
        assert_eq!(ctx.a[(2, 1)], -1.0);
        assert_eq!(ctx.a[(2, 0)], 1.0);
        assert_eq!(ctx.b[2], -10.0);
    }

    #[test]
    fn test_source_evaluated_at_context_time() {
        let pulse = Signal::PulseTrain {
            initial: 0.0,
            pulsed: 1.0,
            delay: 1.0,
            rise: 0.0,
            fall: 0.0,
            width: 1.0,
            period: 4.0,
            cycles: 1,
        };
        let src = Source::new("I1", 1, 0, pulse);
        let mut ctx = StampContext::new(2, 1, 1e-3, false);
        ctx.time = 0.5;
        src.stamp_current(&mut ctx);
        assert_eq!(ctx.b[1], 0.0);
        ctx.clear();
        ctx.time = 1.5;
        src.stamp_current(&mut ctx);
        assert_eq!(ctx.b[1], -1.0);
    }
}
