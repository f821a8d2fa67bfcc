use thiserror::Error;

#[derive(Debug, Error)]
pub enum AmspiceError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Bad netlist, line {line}: {source}")]
    BadFile {
        line: usize,
        #[source]
        source: Box<AmspiceError>,
    },

    #[error("Bad element string: {0}")]
    BadElementString(String),

    #[error("Incomplete netlist: {0}")]
    IncompleteNetList(String),

    #[error("Invalid analysis: {0}")]
    InvalidAnalysis(String),

    #[error("Invalid integration method: Adams-Moulton order {0} is not supported (expected 1-4)")]
    InvalidIntegrationMethod(u32),

    #[error("Singular system: no usable pivot for row {row}")]
    SingularSystem { row: usize },

    #[error("Newton-Raphson failed to converge at t={time:e} after {retries} randomized retries")]
    NewtonRaphsonFailed { time: f64, retries: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AmspiceError>;
