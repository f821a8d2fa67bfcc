//! Results output formatting.

use crate::analysis::TranResult;
use crate::error::Result;
use std::io::Write;

/// Write transient results as a whitespace-separated table.
///
/// Format:
/// ```text
/// t 1 2 jV1
/// 0 10 5 -0.005
/// 0.01 10 5 -0.005
/// ```
pub fn write_tran_table<W: Write>(result: &TranResult, writer: &mut W) -> Result<()> {
    // Header row
    write!(writer, "t")?;
    for label in &result.labels {
        write!(writer, " {}", label)?;
    }
    writeln!(writer)?;

    // Data rows
    for row in &result.samples {
        let mut values = row.iter();
        if let Some(t) = values.next() {
            write!(writer, "{}", t)?;
        }
        for v in values {
            write!(writer, " {}", v)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
