use crate::compiler::StampContext;
use crate::ir::NodeIndex;
use crate::Scalar;

/// Which quantity controls the source and which one it drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlledSourceKind {
    /// `E`: output voltage = gain * control voltage.
    VoltageControlledVoltage,
    /// `F`: output current = gain * control current.
    CurrentControlledCurrent,
    /// `G`: output current = gain * control voltage.
    VoltageControlledCurrent,
    /// `H`: output voltage = gain * control current.
    CurrentControlledVoltage,
}

impl ControlledSourceKind {
    /// Netlist prefix letter.
    pub fn prefix(self) -> char {
        match self {
            ControlledSourceKind::VoltageControlledVoltage => 'E',
            ControlledSourceKind::CurrentControlledCurrent => 'F',
            ControlledSourceKind::VoltageControlledCurrent => 'G',
            ControlledSourceKind::CurrentControlledVoltage => 'H',
        }
    }

    pub fn from_prefix(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'E' => Some(ControlledSourceKind::VoltageControlledVoltage),
            'F' => Some(ControlledSourceKind::CurrentControlledCurrent),
            'G' => Some(ControlledSourceKind::VoltageControlledCurrent),
            'H' => Some(ControlledSourceKind::CurrentControlledVoltage),
            _ => None,
        }
    }

    pub fn aux_count(self) -> usize {
        match self {
            ControlledSourceKind::VoltageControlledCurrent => 0,
            ControlledSourceKind::VoltageControlledVoltage
            | ControlledSourceKind::CurrentControlledCurrent => 1,
            ControlledSourceKind::CurrentControlledVoltage => 2,
        }
    }
}

/// Linear controlled source with output nodes `p, n` and control nodes `cp, cn`.
///
/// Current-controlled kinds measure their control current through a short
/// between the control nodes. `H` uses two auxiliary unknowns: the control
/// current first, then the output current.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlledSource {
    pub kind: ControlledSourceKind,
    pub name: String,
    /// `[p, n, cp, cn]`
    pub nodes: [NodeIndex; 4],
    pub gain: Scalar,
}

impl ControlledSource {
    pub fn new(
        kind: ControlledSourceKind,
        name: impl Into<String>,
        nodes: [NodeIndex; 4],
        gain: Scalar,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            nodes,
            gain,
        }
    }

    pub(super) fn stamp(&self, ctx: &mut StampContext) {
        let [a, b, c, d] = self.nodes;
        let gain = self.gain;
        match self.kind {
            ControlledSourceKind::VoltageControlledVoltage => {
                let jx = ctx.aux(0);
                ctx.add(a, jx, 1.0);
                ctx.add(b, jx, -1.0);
                ctx.add(jx, a, -1.0);
                ctx.add(jx, b, 1.0);
                ctx.add(jx, c, gain);
                ctx.add(jx, d, -gain);
            }
            ControlledSourceKind::CurrentControlledCurrent => {
                let jx = ctx.aux(0);
                ctx.add(a, jx, gain);
                ctx.add(b, jx, -gain);
                ctx.add(c, jx, 1.0);
                ctx.add(d, jx, -1.0);
                ctx.add(jx, c, -1.0);
                ctx.add(jx, d, 1.0);
            }
            ControlledSourceKind::VoltageControlledCurrent => {
                ctx.add(a, c, gain);
                ctx.add(b, d, gain);
                ctx.add(a, d, -gain);
                ctx.add(b, c, -gain);
            }
            ControlledSourceKind::CurrentControlledVoltage => {
                let jx = ctx.aux(0);
                let jy = ctx.aux(1);
                ctx.add(a, jy, 1.0);
                ctx.add(b, jy, -1.0);
                ctx.add(c, jx, 1.0);
                ctx.add(d, jx, -1.0);
                ctx.add(jy, a, -1.0);
                ctx.add(jy, b, 1.0);
                ctx.add(jx, c, -1.0);
                ctx.add(jx, d, 1.0);
                ctx.add(jy, jx, gain);
            }
        }
    }
}

/// Ideal operational amplifier with infinite gain.
///
/// Its auxiliary row forces `v(in_p) = v(in_n)`; the output current needed
/// to hold that is absorbed by the output nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct IdealOpAmp {
    pub name: String,
    /// `[out_p, out_n, in_p, in_n]`
    pub nodes: [NodeIndex; 4],
}

impl IdealOpAmp {
    pub fn new(name: impl Into<String>, nodes: [NodeIndex; 4]) -> Self {
        Self {
            name: name.into(),
            nodes,
        }
    }

    pub(super) fn stamp(&self, ctx: &mut StampContext) {
        let [a, b, c, d] = self.nodes;
        let jx = ctx.aux(0);
        ctx.add(a, jx, 1.0);
        ctx.add(b, jx, -1.0);
        ctx.add(jx, c, 1.0);
        ctx.add(jx, d, -1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Nodes 1..=4, aux unknowns from 5.
    fn ctx() -> StampContext {
        let mut ctx = StampContext::new(7, 1, 1e-3, false);
        ctx.aux_start = 5;
        ctx
    }

    fn nonzero(ctx: &StampContext) -> Vec<(usize, usize, Scalar)> {
        let n = ctx.size();
        (0..n)
            .flat_map(|r| (0..n).map(move |c| (r, c)))
            .filter(|&rc| ctx.a[rc] != 0.0)
            .map(|(r, c)| (r, c, ctx.a[(r, c)]))
            .collect()
    }

    fn source(kind: ControlledSourceKind) -> ControlledSource {
        ControlledSource::new(kind, "X1", [1, 2, 3, 4], 10.0)
    }

    #[test]
    fn test_prefix_roundtrip() {
        for c in ['E', 'F', 'G', 'H'] {
            let kind = ControlledSourceKind::from_prefix(c).unwrap();
            assert_eq!(kind.prefix(), c);
        }
        assert_eq!(
            ControlledSourceKind::from_prefix('h'),
            Some(ControlledSourceKind::CurrentControlledVoltage)
        );
        assert_eq!(ControlledSourceKind::from_prefix('R'), None);
    }

    #[test]
    fn test_vcvs_stamp() {
        let mut c = ctx();
        source(ControlledSourceKind::VoltageControlledVoltage).stamp(&mut c);
        assert_eq!(
            nonzero(&c),
            vec![
                (1, 5, 1.0),
                (2, 5, -1.0),
                (5, 1, -1.0),
                (5, 2, 1.0),
                (5, 3, 10.0),
                (5, 4, -10.0),
            ]
        );
    }

    #[test]
    fn test_cccs_stamp() {
        let mut c = ctx();
        source(ControlledSourceKind::CurrentControlledCurrent).stamp(&mut c);
        assert_eq!(
            nonzero(&c),
            vec![
                (1, 5, 10.0),
                (2, 5, -10.0),
                (3, 5, 1.0),
                (4, 5, -1.0),
                (5, 3, -1.0),
                (5, 4, 1.0),
            ]
        );
    }

    #[test]
    fn test_vccs_stamp() {
        let mut c = ctx();
        source(ControlledSourceKind::VoltageControlledCurrent).stamp(&mut c);
        assert_eq!(
            nonzero(&c),
            vec![(1, 3, 10.0), (1, 4, -10.0), (2, 3, -10.0), (2, 4, 10.0)]
        );
    }

    #[test]
    fn test_ccvs_stamp() {
        let mut c = ctx();
        source(ControlledSourceKind::CurrentControlledVoltage).stamp(&mut c);
        assert_eq!(
            nonzero(&c),
            vec![
                (1, 6, 1.0),
                (2, 6, -1.0),
                (3, 5, 1.0),
                (4, 5, -1.0),
                (5, 3, -1.0),
                (5, 4, 1.0),
                (6, 1, -1.0),
                (6, 2, 1.0),
                (6, 5, 10.0),
            ]
        );
    }

    #[test]
    fn test_opamp_stamp() {
        let mut c = ctx();
        IdealOpAmp::new("O1", [1, 2, 3, 4]).stamp(&mut c);
        assert_eq!(
            nonzero(&c),
            vec![(1, 5, 1.0), (2, 5, -1.0), (5, 3, 1.0), (5, 4, -1.0)]
        );
        assert!(c.b.iter().all(|&v| v == 0.0));
    }
}
