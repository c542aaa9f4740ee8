//! Parallel-flow effectiveness-NTU relationship.

use crate::support::hx::{
    Effectiveness, NodeStreams, Ntu,
    effectiveness_ntu::{EffectivenessRelation, effectiveness_via},
};

/// Parallel-flow arrangement: both streams enter at the same end.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelFlow;

impl EffectivenessRelation for ParallelFlow {
    fn effectiveness(&self, ntu: Ntu, streams: NodeStreams) -> Effectiveness {
        effectiveness_via(ntu, streams, |ntu, cr| {
            (1. - (-ntu * (1. + cr)).exp()) / (1. + cr)
        })
    }
}
