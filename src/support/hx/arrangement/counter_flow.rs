//! Counter-flow effectiveness-NTU relationship.

use crate::support::hx::{
    Effectiveness, NodeStreams, Ntu,
    effectiveness_ntu::{EffectivenessRelation, effectiveness_via},
};

/// Counter-flow arrangement: the coolant enters at the exhaust outlet end.
#[derive(Debug, Clone, Copy, Default)]
pub struct CounterFlow;

impl EffectivenessRelation for CounterFlow {
    fn effectiveness(&self, ntu: Ntu, streams: NodeStreams) -> Effectiveness {
        effectiveness_via(ntu, streams, |ntu, cr| {
            if cr < 1. {
                (1. - (-ntu * (1. - cr)).exp()) / (1. - cr * (-ntu * (1. - cr)).exp())
            } else {
                // cr == 1
                ntu / (1. + ntu)
            }
        })
    }
}
