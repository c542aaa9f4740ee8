/// Indicates whether the search converged or hit the iteration limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Converged according to the configured tolerances.
    Converged,

    /// Reached the iteration limit without converging.
    MaxIters,
}

/// The result of a Nelder-Mead search.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Final search status.
    pub status: Status,

    /// Best vertex found.
    pub x: Vec<f64>,

    /// Objective value at the reported x.
    pub objective: f64,

    /// Iteration count when the search finished.
    pub iters: usize,

    /// Total number of objective evaluations.
    pub evals: usize,
}
