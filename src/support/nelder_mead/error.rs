/// Errors that can occur before a Nelder-Mead search starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("starting point is empty")]
    Empty,

    #[error("starting point has {x0} values but {bounds} bounds were given")]
    DimensionMismatch { x0: usize, bounds: usize },
}
