//! Thermoelectric material property correlations.

use std::{fmt, str::FromStr};

use uom::si::{
    f64::{ThermalConductivity, ThermodynamicTemperature},
    thermal_conductivity::watt_per_meter_kelvin,
    thermodynamic_temperature::kelvin,
};

use super::{ConfigError, DomainError};

/// Transport properties of a thermoelectric material at one temperature.
///
/// Fields are raw SI values because the leg integrator evaluates them at
/// every Runge-Kutta stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeProperties {
    /// Thermal conductivity in W/(m·K).
    pub k: f64,
    /// Seebeck coefficient in V/K. Positive for p-type, negative for n-type.
    pub alpha: f64,
    /// Electrical conductivity in S/m.
    pub sigma: f64,
}

impl TeProperties {
    /// Electrical resistivity in Ω·m.
    #[must_use]
    pub fn rho(&self) -> f64 {
        1.0 / self.sigma
    }

    #[must_use]
    pub fn thermal_conductivity(&self) -> ThermalConductivity {
        ThermalConductivity::new::<watt_per_meter_kelvin>(self.k)
    }

    /// Power factor `α²σ` in W/(m·K²).
    #[must_use]
    pub fn power_factor(&self) -> f64 {
        self.alpha * self.alpha * self.sigma
    }

    /// Dimensionless figure of merit `ZT = α²σT/k`.
    #[must_use]
    pub fn figure_of_merit(&self, temperature: f64) -> f64 {
        self.power_factor() * temperature / self.k
    }
}

/// A thermoelectric material.
///
/// `Hms` and `MgSi` are fixed measured values. The `Ex*` variants are the
/// CRC Handbook of Thermoelectrics example correlations in absolute
/// temperature. [`Material::Constant`] holds user-supplied properties.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Higher manganese silicide, p-type.
    ///
    /// k = 4 W/(m·K), α = 150 µV/K, σ = 1000 S/cm, from Xi Chen's HMS
    /// property measurements.
    Hms,
    /// Magnesium silicide, n-type.
    ///
    /// k = 3 W/(m·K), α = −150 µV/K, σ = 1500 S/cm, from Gao et al.
    MgSi,
    Ex1NType,
    Ex1PType,
    Ex2NType,
    Ex2PType,
    Ex3NType,
    Ex3PType,
    Constant(TeProperties),
}

/// Correlations below give σ in S/cm.
const PER_CM: f64 = 100.0;

impl Material {
    /// Evaluates the material's properties at an absolute temperature in kelvin.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError`] if the temperature is not strictly positive, or
    /// if a correlation yields a non-positive conductivity there.
    pub fn properties(&self, t: f64) -> Result<TeProperties, DomainError> {
        if !(t > 0.0) {
            return Err(DomainError::NonPositiveTemperature {
                context: "material properties",
                kelvin: t,
            });
        }

        let props = match *self {
            Self::Hms => TeProperties {
                k: 4.0,
                alpha: 150e-6,
                sigma: 1.0e3 * PER_CM,
            },
            Self::MgSi => TeProperties {
                k: 3.0,
                alpha: -150e-6,
                sigma: 1.5e3 * PER_CM,
            },
            Self::Ex1NType => TeProperties {
                k: 54.0 / t * PER_CM,
                alpha: (0.268 * t - 329.0) * 1e-6,
                sigma: (t - 310.0) / 0.1746 * PER_CM,
            },
            Self::Ex1PType => TeProperties {
                k: 3.194 / t * PER_CM,
                alpha: (0.150 * t + 211.0) * 1e-6,
                sigma: 25.0 * PER_CM,
            },
            Self::Ex2NType => TeProperties {
                k: 300.0 / t,
                alpha: (0.20 * t - 400.0) * 1e-6,
                sigma: 1.0e5 / t * PER_CM,
            },
            Self::Ex2PType => TeProperties {
                k: 1000.0 / t,
                alpha: 200e-6,
                sigma: t * PER_CM,
            },
            Self::Ex3NType => TeProperties {
                k: 300.0 / t,
                alpha: 0.20 * t * 1e-6,
                sigma: 1.0e3 * PER_CM,
            },
            Self::Ex3PType => TeProperties {
                k: 1000.0 / t,
                alpha: 200e-6,
                sigma: t * PER_CM,
            },
            Self::Constant(props) => props,
        };

        if !(props.k > 0.0 && props.sigma > 0.0) || !props.alpha.is_finite() {
            return Err(DomainError::NonPhysicalProperties {
                material: self.to_string(),
                kelvin: t,
            });
        }

        Ok(props)
    }

    /// Evaluates properties at a [`ThermodynamicTemperature`].
    ///
    /// # Errors
    ///
    /// See [`Material::properties`].
    pub fn properties_at(&self, t: ThermodynamicTemperature) -> Result<TeProperties, DomainError> {
        self.properties(t.get::<kelvin>())
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hms => "HMS",
            Self::MgSi => "MgSi",
            Self::Ex1NType => "ex1 n-type",
            Self::Ex1PType => "ex1 p-type",
            Self::Ex2NType => "ex2 n-type",
            Self::Ex2PType => "ex2 p-type",
            Self::Ex3NType => "ex3 n-type",
            Self::Ex3PType => "ex3 p-type",
            Self::Constant(_) => "constant",
        };
        f.write_str(name)
    }
}

impl FromStr for Material {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "HMS" => Ok(Self::Hms),
            "MgSi" => Ok(Self::MgSi),
            "ex1 n-type" => Ok(Self::Ex1NType),
            "ex1 p-type" => Ok(Self::Ex1PType),
            "ex2 n-type" => Ok(Self::Ex2NType),
            "ex2 p-type" => Ok(Self::Ex2PType),
            "ex3 n-type" => Ok(Self::Ex3NType),
            "ex3 p-type" => Ok(Self::Ex3PType),
            other => Err(ConfigError::UnknownMaterial {
                name: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn hms_is_temperature_independent() {
        let cold = Material::Hms.properties(300.0).unwrap();
        let hot = Material::Hms.properties(800.0).unwrap();

        assert_eq!(cold, hot);
        assert_relative_eq!(cold.k, 4.0);
        assert_relative_eq!(cold.alpha, 150e-6);
        assert_relative_eq!(cold.sigma, 1.0e5);
        assert_relative_eq!(cold.rho(), 1.0e-5);
    }

    #[test]
    fn mgsi_is_n_type() {
        let props = Material::MgSi.properties(500.0).unwrap();
        assert!(props.alpha < 0.0);
        assert_relative_eq!(props.k, 3.0);
        assert_relative_eq!(props.alpha, -150e-6);
        assert_relative_eq!(props.sigma, 1.5e5);
    }

    #[test]
    fn ex1_n_type_at_400_kelvin() {
        let props = Material::Ex1NType.properties(400.0).unwrap();

        assert_relative_eq!(props.k, 13.5);
        assert_relative_eq!(props.alpha, (0.268 * 400.0 - 329.0) * 1e-6);
        assert_relative_eq!(props.sigma, 90.0 / 0.1746 * 100.0);
    }

    #[test]
    fn ex1_n_type_conductivity_vanishes_below_310_kelvin() {
        assert!(matches!(
            Material::Ex1NType.properties(300.0),
            Err(DomainError::NonPhysicalProperties { .. })
        ));
    }

    #[test]
    fn temperature_dependent_p_types() {
        let ex2 = Material::Ex2PType.properties(500.0).unwrap();
        assert_relative_eq!(ex2.k, 2.0);
        assert_relative_eq!(ex2.sigma, 5.0e4);

        let ex3 = Material::Ex3NType.properties(500.0).unwrap();
        assert_relative_eq!(ex3.alpha, 100e-6);
    }

    #[test]
    fn non_positive_temperature_is_a_domain_error() {
        for t in [0.0, -10.0, f64::NAN] {
            assert!(matches!(
                Material::Hms.properties(t),
                Err(DomainError::NonPositiveTemperature { .. })
            ));
        }
    }

    #[test]
    fn names_round_trip_through_display() {
        for material in [
            Material::Hms,
            Material::MgSi,
            Material::Ex1NType,
            Material::Ex2PType,
            Material::Ex3PType,
        ] {
            assert_eq!(material.to_string().parse::<Material>().unwrap(), material);
        }
    }

    #[test]
    fn unknown_name_is_a_config_error() {
        assert!(matches!(
            "Bi2Te3".parse::<Material>(),
            Err(ConfigError::UnknownMaterial { .. })
        ));
    }

    #[test]
    fn figure_of_merit() {
        let props = Material::Hms.properties(600.0).unwrap();
        let expected = (150e-6_f64).powi(2) * 1.0e5 * 600.0 / 4.0;
        assert_relative_eq!(props.figure_of_merit(600.0), expected);
    }
}
