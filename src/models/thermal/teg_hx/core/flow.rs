//! Convection and pressure drop on one side of the exchanger.
//!
//! A [`FlowSide`] is a bank of identical parallel-plate ducts carrying the
//! exhaust or the coolant. Each node asks it for a film coefficient, a
//! pressure drop and a pumping power at the local bulk temperature.
//!
//! The bare duct and every enhancement implement [`EnhancementModel`], so the
//! side solver does not care which one it is driving. Coefficients returned by
//! an enhancement are referred to the heated plate area, with fins treated as
//! ideal.

mod bare;
mod enhancement;
mod fluid;

use uom::si::{
    f64::{
        HeatTransfer, Length, MassRate, Power, Pressure, ThermalConductance,
        ThermodynamicTemperature, Velocity,
    },
    heat_transfer::watt_per_square_meter_kelvin,
    length::meter,
    mass_rate::kilogram_per_second,
    power::watt,
    pressure::pascal,
    thermal_conductance::watt_per_kelvin,
    thermodynamic_temperature::kelvin,
    velocity::meter_per_second,
};

use crate::support::{constraint::StrictlyPositive, hx::CapacitanceRate};

use super::{ConfigError, DomainError, SolveError};

pub use bare::BareDuct;
pub use enhancement::{Enhancement, IdealFin, JetArray, MeshPorous, OffsetStripFin};
pub use fluid::{FluidModel, FluidProperties};

/// Number of duct walls that exchange heat with the thermoelectric modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeatedSides {
    One,
    #[default]
    Two,
}

impl HeatedSides {
    #[must_use]
    pub fn count(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

/// Rectangular duct approximated as parallel plates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Duct {
    pub height: Length,
    pub width: Length,
    pub sides: HeatedSides,
    /// Ducts on this side per exhaust duct.
    pub count: usize,
}

impl Duct {
    /// Open cross-section of one duct.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a dimension is not strictly positive or the
    /// duct count is zero.
    pub fn geometry(&self) -> Result<FlowGeometry, ConfigError> {
        let height = StrictlyPositive::new(self.height)
            .map_err(|e| e.named("duct.height"))?
            .into_inner()
            .get::<meter>();
        let width = StrictlyPositive::new(self.width)
            .map_err(|e| e.named("duct.width"))?
            .into_inner()
            .get::<meter>();
        if self.count == 0 {
            return Err(ConfigError::invalid("duct.count", "need at least one duct"));
        }

        let flow_area = height * width;
        let perimeter = 2.0 * (height + width);
        Ok(FlowGeometry {
            height,
            width,
            sides: self.sides,
            flow_area,
            perimeter,
            hydraulic_diameter: 4.0 * flow_area / perimeter,
        })
    }
}

/// Cross-section seen by the flow in one duct, raw SI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowGeometry {
    pub height: f64,
    pub width: f64,
    pub sides: HeatedSides,
    /// Free-flow area in m².
    pub flow_area: f64,
    /// Wetted perimeter in m.
    pub perimeter: f64,
    pub hydraulic_diameter: f64,
}

/// Flow through one duct over one node, raw SI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DuctFlow {
    /// Mass rate through this duct in kg/s.
    pub mass_rate: f64,
    pub fluid: FluidProperties,
    pub geometry: FlowGeometry,
    pub node_length: f64,
}

impl DuctFlow {
    /// Mean velocity in the free-flow area.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.mass_rate / (self.fluid.density * self.geometry.flow_area)
    }

    /// Reynolds number on the hydraulic diameter.
    #[must_use]
    pub fn reynolds(&self) -> f64 {
        self.velocity() * self.geometry.hydraulic_diameter / self.fluid.kinematic_viscosity()
    }

    /// Dynamic pressure `½ρv²` in Pa.
    #[must_use]
    pub fn dynamic_pressure(&self) -> f64 {
        0.5 * self.fluid.density * self.velocity().powi(2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowRegime {
    Laminar,
    Turbulent,
}

impl FlowRegime {
    /// Transition Reynolds number for parallel-plate ducts.
    pub const TRANSITION: f64 = 2300.0;

    #[must_use]
    pub fn from_reynolds(reynolds: f64) -> Self {
        if reynolds > Self::TRANSITION {
            Self::Turbulent
        } else {
            Self::Laminar
        }
    }
}

/// Convective state returned by an [`EnhancementModel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Convection {
    pub reynolds: f64,
    pub nusselt: f64,
    /// Fanning friction factor, or the loss coefficient of models without one.
    pub friction_factor: f64,
    /// Film coefficient on the heated plate area in W/(m²·K).
    pub h: f64,
    pub regime: FlowRegime,
}

/// Capability shared by the bare duct and every enhancement.
pub trait EnhancementModel {
    /// Cross-section of one duct as modified by this model.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the model's dimensions are missing or do
    /// not fit inside the duct.
    fn geometry(&self, duct: &Duct) -> Result<FlowGeometry, ConfigError>;

    /// Film coefficient and friction for a duct flow.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError`] when the flow state is outside the model's
    /// definition, such as a zero Reynolds number.
    fn convection(&self, flow: &DuctFlow) -> Result<Convection, DomainError>;

    /// Pressure drop across one node in Pa.
    fn pressure_drop(&self, flow: &DuctFlow, convection: &Convection) -> f64;
}

/// One side of the exchanger: ducts, fluid and flow rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowSide {
    pub duct: Duct,
    /// Total mass rate, shared evenly between ducts.
    pub mass_rate: MassRate,
    pub fluid: FluidModel,
    pub enhancement: Option<Enhancement>,
}

/// Solved state of a [`FlowSide`] over one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowSolution {
    pub regime: FlowRegime,
    pub reynolds: f64,
    pub nusselt: f64,
    pub friction_factor: f64,
    pub h: HeatTransfer,
    pub velocity: Velocity,
    pub pressure_drop: Pressure,
    /// Pumping power of all ducts on this side.
    pub pumping_power: Power,
    pub capacitance_rate: CapacitanceRate,
    pub fluid: FluidProperties,
}

impl FlowSide {
    /// Checks geometry without solving.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the duct or enhancement geometry is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.model().geometry(&self.duct).map(|_| ())
    }

    /// Solves the side at a bulk temperature for one node of the given length.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError`] for invalid geometry, a non-positive mass rate or
    /// temperature, or a flow the active model cannot evaluate.
    pub fn solve(
        &self,
        t_bulk: ThermodynamicTemperature,
        node_length: Length,
    ) -> Result<FlowSolution, SolveError> {
        let model = self.model();
        let geometry = model.geometry(&self.duct)?;
        let node_length = StrictlyPositive::new(node_length)
            .map_err(|e| e.named("node_length"))?
            .into_inner()
            .get::<meter>();

        let total_rate = self.mass_rate.get::<kilogram_per_second>();
        if !(total_rate > 0.0) {
            return Err(DomainError::UndefinedFlow {
                context: "mass rate must be strictly positive",
            }
            .into());
        }

        let fluid = self.fluid.properties(t_bulk.get::<kelvin>())?;
        let flow = DuctFlow {
            mass_rate: total_rate / self.duct.count as f64,
            fluid,
            geometry,
            node_length,
        };
        if !(flow.reynolds() > 0.0 && flow.reynolds().is_finite()) {
            return Err(DomainError::UndefinedFlow {
                context: "Reynolds number is not positive and finite",
            }
            .into());
        }

        let convection = model.convection(&flow)?;
        let pressure_drop = model.pressure_drop(&flow, &convection);
        if !(convection.h > 0.0 && pressure_drop.is_finite()) {
            return Err(DomainError::non_physical(format!(
                "film coefficient {} W/m²K with pressure drop {pressure_drop} Pa",
                convection.h
            ))
            .into());
        }

        let capacity = ThermalConductance::new::<watt_per_kelvin>(total_rate * fluid.specific_heat);
        let capacitance_rate = CapacitanceRate::from_quantity(capacity)
            .map_err(|e| DomainError::non_physical(format!("capacitance rate: {e}")))?;

        Ok(FlowSolution {
            regime: convection.regime,
            reynolds: convection.reynolds,
            nusselt: convection.nusselt,
            friction_factor: convection.friction_factor,
            h: HeatTransfer::new::<watt_per_square_meter_kelvin>(convection.h),
            velocity: Velocity::new::<meter_per_second>(flow.velocity()),
            pressure_drop: Pressure::new::<pascal>(pressure_drop),
            pumping_power: Power::new::<watt>(total_rate / fluid.density * pressure_drop),
            capacitance_rate,
            fluid,
        })
    }

    fn model(&self) -> &dyn EnhancementModel {
        match &self.enhancement {
            Some(enhancement) => enhancement,
            None => &BareDuct,
        }
    }
}
