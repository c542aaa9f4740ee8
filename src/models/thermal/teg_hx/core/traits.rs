//! Internal traits for marching the exchanger node by node.

use crate::support::hx::{
    EffectivenessRelation,
    arrangement::{CounterFlow, ParallelFlow},
};

use super::DomainError;

/// Arrangement contract for the marching solver.
///
/// This trait extends [`EffectivenessRelation`] with the coolant flow
/// direction. The exhaust always enters node 0 and leaves node N-1.
///
/// Each node is solved from its exhaust-inlet face, where the coolant
/// temperature is known: it is the coolant inlet in parallel flow and the
/// coolant outlet in counter flow.
#[doc(hidden)]
pub trait MarchingArrangement: EffectivenessRelation + Default {
    /// True if the coolant flows from node 0 to node N-1.
    const COOLANT_FLOWS_WITH_EXHAUST: bool;

    /// Selects a value based on coolant flow direction.
    #[inline]
    fn coolant_select<T>(forward: T, reverse: T) -> T {
        if Self::COOLANT_FLOWS_WITH_EXHAUST {
            forward
        } else {
            reverse
        }
    }

    /// Node heat rate in W from the effectiveness and the face temperatures.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError`] if the arrangement's closure has no solution.
    fn heat_rate(
        effectiveness: f64,
        c_min: f64,
        c_coolant: f64,
        t_exhaust_in: f64,
        t_coolant_face: f64,
    ) -> Result<f64, DomainError>;

    /// Coolant temperature at the far face of a node.
    #[inline]
    fn coolant_far_face(t_coolant_face: f64, heat_rate: f64, c_coolant: f64) -> f64 {
        t_coolant_face + Self::coolant_select(1.0, -1.0) * heat_rate / c_coolant
    }

    /// Orders the near and far coolant temperatures as `(inlet, outlet)`.
    #[inline]
    fn coolant_inlet_outlet(near: f64, far: f64) -> (f64, f64) {
        Self::coolant_select((near, far), (far, near))
    }
}

impl MarchingArrangement for ParallelFlow {
    const COOLANT_FLOWS_WITH_EXHAUST: bool = true;

    fn heat_rate(
        effectiveness: f64,
        c_min: f64,
        _c_coolant: f64,
        t_exhaust_in: f64,
        t_coolant_in: f64,
    ) -> Result<f64, DomainError> {
        Ok(effectiveness * c_min * (t_exhaust_in - t_coolant_in))
    }
}

impl MarchingArrangement for CounterFlow {
    const COOLANT_FLOWS_WITH_EXHAUST: bool = false;

    fn heat_rate(
        effectiveness: f64,
        c_min: f64,
        c_coolant: f64,
        t_exhaust_in: f64,
        t_coolant_out: f64,
    ) -> Result<f64, DomainError> {
        let denominator = 1.0 - effectiveness * c_min / c_coolant;
        if !(denominator > 0.0) {
            return Err(DomainError::non_physical(format!(
                "counter-flow node closure is singular (1 - εC_min/C_cool = {denominator})"
            )));
        }
        Ok(effectiveness * c_min * (t_exhaust_in - t_coolant_out) / denominator)
    }
}
