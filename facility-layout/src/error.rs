use thiserror::Error;

/// Errors produced by the placement pipeline.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The given relation matrices and facility size admit no valid placement.
    /// Recovered per restart by the controller, never fatal on its own.
    #[error("no valid placement exists: {0}")]
    Infeasible(String),
    /// Every restart of the run failed.
    #[error("no solution found: facility too small, or increase the number of restarts")]
    NoSolutionFound,
    /// Malformed run parameter, reported before any solving starts.
    #[error("invalid configuration: {0}")]
    Config(String),
}
