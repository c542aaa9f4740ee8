use uom::si::{f64::Pressure, pressure::pascal};

use super::super::DomainError;

/// Transport properties of a flowing fluid at its bulk temperature, raw SI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidProperties {
    /// Density in kg/m³.
    pub density: f64,
    /// Specific heat in J/(kg·K).
    pub specific_heat: f64,
    /// Dynamic viscosity in Pa·s.
    pub viscosity: f64,
    /// Thermal conductivity in W/(m·K).
    pub conductivity: f64,
    pub prandtl: f64,
}

impl FluidProperties {
    /// Liquid water near 325 K.
    pub const WATER: Self = Self {
        density: 1000.0,
        specific_heat: 4179.0,
        viscosity: 5.3e-4,
        conductivity: 0.646,
        prandtl: 6.22,
    };

    /// Kinematic viscosity in m²/s.
    #[must_use]
    pub fn kinematic_viscosity(&self) -> f64 {
        self.viscosity / self.density
    }
}

/// How fluid properties respond to the bulk temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FluidModel {
    /// Temperature-independent properties.
    Constant(FluidProperties),
    /// Dry air as an ideal gas at a fixed pressure.
    ///
    /// Viscosity and conductivity follow Sutherland's law.
    Air { pressure: Pressure },
}

impl Default for FluidModel {
    fn default() -> Self {
        Self::Constant(FluidProperties::WATER)
    }
}

const AIR_GAS_CONSTANT: f64 = 287.05;
const SUTHERLAND_T_REF: f64 = 273.15;

impl FluidModel {
    /// Evaluates properties at a bulk temperature in kelvin.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError`] for a non-positive temperature or a
    /// non-positive air pressure.
    pub fn properties(&self, t: f64) -> Result<FluidProperties, DomainError> {
        if !(t > 0.0) {
            return Err(DomainError::NonPositiveTemperature {
                context: "fluid bulk",
                kelvin: t,
            });
        }

        match *self {
            Self::Constant(props) => Ok(props),
            Self::Air { pressure } => {
                let p = pressure.get::<pascal>();
                if !(p > 0.0) {
                    return Err(DomainError::non_physical(format!(
                        "air pressure {p} Pa is not positive"
                    )));
                }

                let sutherland = |c: f64| {
                    (t / SUTHERLAND_T_REF).powf(1.5) * (SUTHERLAND_T_REF + c) / (t + c)
                };
                let viscosity = 1.716e-5 * sutherland(110.4);
                let conductivity = 0.0241 * sutherland(194.0);
                let specific_heat = 1002.5 + 275e-6 * (t - 200.0).powi(2);

                Ok(FluidProperties {
                    density: p / (AIR_GAS_CONSTANT * t),
                    specific_heat,
                    viscosity,
                    conductivity,
                    prandtl: specific_heat * viscosity / conductivity,
                })
            }
        }
    }
}
