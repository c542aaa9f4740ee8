mod geometry;
mod inlets;

pub use geometry::{HxGeometry, PlateWall};
pub use inlets::Inlets;

/// Relative direction of the two streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowArrangement {
    Parallel,
    #[default]
    Counter,
}
