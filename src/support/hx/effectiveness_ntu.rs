use std::ops::Deref;

use crate::support::constraint::{Constrained, ConstraintResult, NonNegative, UnitInterval};
use uom::si::{
    f64::{Ratio, ThermalConductance},
    ratio::ratio,
};

use super::NodeStreams;

/// Trait for computing heat exchanger effectiveness from NTU.
pub trait EffectivenessRelation {
    /// Effectiveness of a node with the given [NTU](Ntu) and streams.
    fn effectiveness(&self, ntu: Ntu, streams: NodeStreams) -> Effectiveness;
}

/// The effectiveness of a heat exchanger node.
///
/// Ratio of the heat actually transferred to the largest amount the two
/// streams could exchange. Always in the interval [0, 1].
#[derive(Debug, Clone, Copy)]
pub struct Effectiveness(Constrained<Ratio, UnitInterval>);

impl Effectiveness {
    /// Create an [`Effectiveness`] from a scalar value.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the value lies outside the interval [0, 1].
    pub fn new(value: f64) -> ConstraintResult<Self> {
        let quantity = Ratio::new::<ratio>(value);
        Self::from_quantity(quantity)
    }

    /// Create an [`Effectiveness`] from a ratio quantity.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the quantity lies outside the interval [0, 1].
    pub fn from_quantity(quantity: Ratio) -> ConstraintResult<Self> {
        Ok(Self(UnitInterval::new(quantity)?))
    }
}

impl Deref for Effectiveness {
    type Target = Ratio;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

/// The number of transfer units (`UA / C_min`) of a heat exchanger node.
///
/// Must be >= 0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Ntu(Constrained<Ratio, NonNegative>);

impl Ntu {
    /// Create an [`Ntu`] from a scalar value.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the value is negative.
    pub fn new(value: f64) -> ConstraintResult<Self> {
        let quantity = Ratio::new::<ratio>(value);
        Self::from_quantity(quantity)
    }

    /// Create an [`Ntu`] from a ratio quantity.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the quantity is negative.
    pub fn from_quantity(quantity: Ratio) -> ConstraintResult<Self> {
        Ok(Self(NonNegative::new(quantity)?))
    }

    /// `UA / C_min` for a node.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `ua` is negative or not a number.
    pub fn from_conductance(
        ua: ThermalConductance,
        streams: NodeStreams,
    ) -> ConstraintResult<Self> {
        Self::from_quantity(ua / streams.c_min())
    }
}

impl Deref for Ntu {
    type Target = Ratio;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

/// Evaluates a raw `(ntu, cr)` relation, using the single-stream limit when
/// one capacitance rate is unbounded.
#[inline]
pub(crate) fn effectiveness_via(
    ntu: Ntu,
    streams: NodeStreams,
    fn_raw: impl Fn(f64, f64) -> f64,
) -> Effectiveness {
    let cr = streams.capacity_ratio();
    let ntu = ntu.get::<ratio>();
    let raw = if cr == 0.0 {
        1. - (-ntu).exp()
    } else {
        fn_raw(ntu, cr)
    };
    Effectiveness::new(raw.clamp(0.0, 1.0)).expect("clamped effectiveness is in the unit interval")
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use uom::si::thermal_conductance::watt_per_kelvin;

    use super::{super::CapacitanceRate, *};

    #[test]
    fn ntu_uses_smaller_capacitance_rate() -> ConstraintResult<()> {
        let ua = ThermalConductance::new::<watt_per_kelvin>(15.);
        let streams = NodeStreams::new(
            CapacitanceRate::new::<watt_per_kelvin>(75.)?,
            CapacitanceRate::new::<watt_per_kelvin>(4179.)?,
        );

        let ntu = Ntu::from_conductance(ua, streams)?;

        assert_relative_eq!(ntu.get::<ratio>(), 0.2);
        Ok(())
    }

    #[test]
    fn negative_conductance_is_rejected() -> ConstraintResult<()> {
        let ua = ThermalConductance::new::<watt_per_kelvin>(-1.);
        let streams = NodeStreams::new(
            CapacitanceRate::new::<watt_per_kelvin>(10.)?,
            CapacitanceRate::new::<watt_per_kelvin>(20.)?,
        );

        assert!(Ntu::from_conductance(ua, streams).is_err());
        Ok(())
    }

    #[test]
    fn effectiveness_outside_unit_interval() {
        assert!(Effectiveness::new(1.2).is_err());
        assert!(Effectiveness::new(-0.1).is_err());
    }
}
