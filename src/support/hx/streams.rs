use std::ops::Deref;

use uom::si::f64::ThermalConductance;

use crate::support::constraint::{Constrained, ConstraintResult, StrictlyPositive};

/// Capacitance rate (`m_dot * c_p`) of one stream, strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct CapacitanceRate(Constrained<ThermalConductance, StrictlyPositive>);

impl CapacitanceRate {
    /// Creates a [`CapacitanceRate`] from a value in unit `U`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the value is not strictly positive.
    pub fn new<U>(value: f64) -> ConstraintResult<Self>
    where
        U: uom::si::thermal_conductance::Unit + uom::Conversion<f64, T = f64>,
    {
        Self::from_quantity(ThermalConductance::new::<U>(value))
    }

    /// # Errors
    ///
    /// Returns `Err` if the quantity is not strictly positive.
    pub fn from_quantity(quantity: ThermalConductance) -> ConstraintResult<Self> {
        Ok(Self(StrictlyPositive::new(quantity)?))
    }
}

impl Deref for CapacitanceRate {
    type Target = ThermalConductance;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

/// The exhaust and coolant streams crossing one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeStreams {
    pub exhaust: CapacitanceRate,
    pub coolant: CapacitanceRate,
}

impl NodeStreams {
    #[must_use]
    pub fn new(exhaust: CapacitanceRate, coolant: CapacitanceRate) -> Self {
        Self { exhaust, coolant }
    }

    #[must_use]
    pub fn c_min(&self) -> ThermalConductance {
        self.exhaust.min(*self.coolant)
    }

    #[must_use]
    pub fn c_max(&self) -> ThermalConductance {
        self.exhaust.max(*self.coolant)
    }

    /// `C_min / C_max`, in `[0, 1]`.
    ///
    /// Zero when one stream has an unbounded capacitance rate.
    #[must_use]
    pub fn capacity_ratio(&self) -> f64 {
        (self.c_min() / self.c_max()).value
    }
}
