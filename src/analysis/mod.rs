//! Analysis engine: drives the transient simulation.

pub mod transient;

use crate::Scalar;

/// Transient analysis results.
#[derive(Debug, Clone, PartialEq)]
pub struct TranResult {
    /// Column label for every unknown except ground: node numbers, then
    /// `j<k><name>` for auxiliary currents.
    pub labels: Vec<String>,
    /// One row per recorded sample: time, then every unknown in label order.
    pub samples: Vec<Vec<Scalar>>,
}

impl TranResult {
    /// Time of every recorded sample.
    pub fn times(&self) -> Vec<Scalar> {
        self.samples.iter().map(|row| row[0]).collect()
    }

    /// Waveform of the unknown called `label` (e.g. `"2"` or `"jV1"`).
    pub fn column(&self, label: &str) -> Option<Vec<Scalar>> {
        let idx = self.labels.iter().position(|l| l == label)?;
        Some(self.samples.iter().map(|row| row[idx + 1]).collect())
    }
}
