//! One-dimensional thermoelectric leg.
//!
//! A leg is solved between a fixed cold-face temperature and a target
//! hot-face temperature for a given current. Two interchangeable methods are
//! available through [`LegMethod`]:
//!
//! - [`LegMethod::Analytical`] evaluates properties once at the mean
//!   temperature and uses the closed-form Seebeck, Joule and conduction
//!   balance.
//! - [`LegMethod::Numerical`] integrates the coupled temperature, heat flux
//!   and potential equations with properties evaluated locally, shooting on
//!   the cold-face heat flux until the hot face hits its target.
//!
//! # Conventions
//!
//! Position `x` runs from the cold face (`x = 0`) to the hot face (`x = L`).
//! Heat flux is positive toward the cold face. Current is positive when it
//! flows from the hot face to the cold face inside the leg. The terminal
//! voltage is `φ_hot − φ_cold` and electrical power output is `P = −V I`, so a
//! generating leg has voltage and current of opposite sign.

mod analytical;
mod numerical;

use std::str::FromStr;

use uom::si::{
    area::square_meter,
    electric_current::ampere,
    electric_potential::volt,
    electrical_resistance::ohm,
    f64::{
        Area, ElectricCurrent, ElectricPotential, ElectricalResistance, HeatFluxDensity, Length,
        Power, ThermodynamicTemperature,
    },
    heat_flux_density::watt_per_square_meter,
    length::meter,
    power::watt,
    thermodynamic_temperature::kelvin,
};

use crate::support::{constraint::StrictlyPositive, convergence::ConvergenceLoop};

use super::{ConfigError, DomainError, Material, SolveError};

use analytical::Analytical;
use numerical::Numerical;

/// A single p-type or n-type thermoelectric element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    pub material: Material,
    /// Cross-sectional area normal to heat flow.
    pub area: Area,
    pub length: Length,
    /// Number of profile points, including both faces.
    pub nodes: usize,
}

impl Leg {
    /// Creates a leg after checking its geometry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the area or length is not strictly positive,
    /// or if fewer than two profile points are requested.
    pub fn new(
        material: Material,
        area: Area,
        length: Length,
        nodes: usize,
    ) -> Result<Self, ConfigError> {
        let leg = Self {
            material,
            area,
            length,
            nodes,
        };
        leg.validate()?;
        Ok(leg)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        StrictlyPositive::new(self.area).map_err(|e| e.named("leg.area"))?;
        StrictlyPositive::new(self.length).map_err(|e| e.named("leg.length"))?;
        if self.nodes < 2 {
            return Err(ConfigError::invalid(
                "leg.nodes",
                format!("need at least 2 profile points, got {}", self.nodes),
            ));
        }
        Ok(())
    }

    /// Solves the leg for a current and pair of face temperatures.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError`] if the leg geometry is invalid, a face
    /// temperature is not strictly positive, properties are non-physical
    /// along the leg, or numerical shooting fails to converge.
    pub fn solve(
        &self,
        method: &LegMethod,
        current: ElectricCurrent,
        t_hot: ThermodynamicTemperature,
        t_cold: ThermodynamicTemperature,
    ) -> Result<LegSolution, SolveError> {
        self.validate()?;
        let conditions = Conditions::new(current, t_hot, t_cold)?;
        method.solve_leg(&self.kernel(), &conditions)
    }

    /// Dimensionless figure of merit at the mean of two face temperatures.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError`] if properties are undefined at the mean temperature.
    pub fn figure_of_merit(
        &self,
        t_hot: ThermodynamicTemperature,
        t_cold: ThermodynamicTemperature,
    ) -> Result<f64, DomainError> {
        let t_mean = 0.5 * (t_hot.get::<kelvin>() + t_cold.get::<kelvin>());
        Ok(self.material.properties(t_mean)?.figure_of_merit(t_mean))
    }

    /// Load-matched operating point using mean-temperature properties.
    ///
    /// With the load resistance equal to the internal resistance the leg
    /// delivers `(α ΔT)² / 4R` at a current of `α ΔT / 2R`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError`] if properties are undefined at the mean temperature.
    pub fn matched_load(
        &self,
        t_hot: ThermodynamicTemperature,
        t_cold: ThermodynamicTemperature,
    ) -> Result<MatchedLoad, DomainError> {
        let (t_h, t_c) = (t_hot.get::<kelvin>(), t_cold.get::<kelvin>());
        let props = self.material.properties(0.5 * (t_h + t_c))?;
        let resistance = props.rho() * self.length.get::<meter>() / self.area.get::<square_meter>();
        let emf = props.alpha * (t_h - t_c);

        Ok(MatchedLoad {
            current: ElectricCurrent::new::<ampere>(emf / (2.0 * resistance)),
            power: Power::new::<watt>(emf * emf / (4.0 * resistance)),
            resistance: ElectricalResistance::new::<ohm>(resistance),
        })
    }

    fn kernel(&self) -> LegKernel {
        LegKernel {
            material: self.material,
            area: self.area.get::<square_meter>(),
            length: self.length.get::<meter>(),
            nodes: self.nodes,
        }
    }
}

/// Operating point where the external load equals the internal resistance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchedLoad {
    pub current: ElectricCurrent,
    pub power: Power,
    pub resistance: ElectricalResistance,
}

/// Method used to solve a leg.
///
/// Parses from `"analytical"` or `"numerical"`; the numerical variant parses
/// with default shooting settings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LegMethod {
    #[default]
    Analytical,
    Numerical(NumericalConfig),
}

impl LegMethod {
    fn solve_leg(
        &self,
        leg: &LegKernel,
        conditions: &Conditions,
    ) -> Result<LegSolution, SolveError> {
        match self {
            Self::Analytical => Analytical.solve(leg, conditions),
            Self::Numerical(config) => Numerical::new(*config).solve(leg, conditions),
        }
    }

    /// Returns true for the numerical method.
    #[must_use]
    pub fn is_numerical(&self) -> bool {
        matches!(self, Self::Numerical(_))
    }
}

impl FromStr for LegMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "analytical" => Ok(Self::Analytical),
            "numerical" => Ok(Self::Numerical(NumericalConfig::default())),
            _ => Err(ConfigError::UnknownLegMethod {
                name: s.to_string(),
            }),
        }
    }
}

/// Shooting settings for [`LegMethod::Numerical`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericalConfig {
    /// Secant iteration control; the tolerance is the hot-face error in kelvin.
    pub shooting: ConvergenceLoop,
}

impl Default for NumericalConfig {
    fn default() -> Self {
        Self {
            shooting: ConvergenceLoop {
                max_iters: 10,
                tolerance: 0.01,
                warm_up: 0,
            },
        }
    }
}

/// Solved state of a leg.
///
/// Profiles have one entry per profile point, index 0 at the cold face.
#[derive(Debug, Clone, PartialEq)]
pub struct LegSolution {
    pub positions: Vec<Length>,
    pub temperatures: Vec<ThermodynamicTemperature>,
    pub heat_fluxes: Vec<HeatFluxDensity>,
    /// Potential relative to the cold face.
    pub voltages: Vec<ElectricPotential>,

    pub current: ElectricCurrent,
    pub t_hot: ThermodynamicTemperature,
    pub t_cold: ThermodynamicTemperature,
    /// Heat flux entering the hot face.
    pub q_hot: HeatFluxDensity,
    /// Heat flux leaving the cold face.
    pub q_cold: HeatFluxDensity,
    /// Terminal voltage `φ_hot − φ_cold`.
    pub voltage: ElectricPotential,
    /// Electrical power delivered, `−V I`.
    pub power: Power,
    pub internal_resistance: ElectricalResistance,
    /// External load resistance `−V / I`; infinite at open circuit.
    pub load_resistance: ElectricalResistance,
    /// Power over hot-face heat input.
    pub efficiency: f64,
    /// Shooting iterations; zero for the analytical method.
    pub iters: usize,
}

/// Capability shared by the leg methods.
trait LegSolver {
    fn solve(&self, leg: &LegKernel, conditions: &Conditions) -> Result<LegSolution, SolveError>;
}

/// Leg geometry in raw SI units.
#[derive(Debug, Clone, Copy)]
struct LegKernel {
    pub material: Material,
    pub area: f64,
    pub length: f64,
    pub nodes: usize,
}

impl LegKernel {
    /// Profile positions from the cold face to the hot face.
    fn positions(&self) -> Vec<f64> {
        let segments = (self.nodes - 1) as f64;
        (0..self.nodes)
            .map(|i| self.length * i as f64 / segments)
            .collect()
    }
}

/// Boundary conditions in raw SI units.
#[derive(Debug, Clone, Copy)]
struct Conditions {
    pub current: f64,
    pub t_hot: f64,
    pub t_cold: f64,
}

impl Conditions {
    fn new(
        current: ElectricCurrent,
        t_hot: ThermodynamicTemperature,
        t_cold: ThermodynamicTemperature,
    ) -> Result<Self, DomainError> {
        let conditions = Self {
            current: current.get::<ampere>(),
            t_hot: t_hot.get::<kelvin>(),
            t_cold: t_cold.get::<kelvin>(),
        };
        for (context, t) in [
            ("leg hot face", conditions.t_hot),
            ("leg cold face", conditions.t_cold),
        ] {
            if !(t > 0.0) {
                return Err(DomainError::NonPositiveTemperature { context, kelvin: t });
            }
        }
        if !conditions.current.is_finite() {
            return Err(DomainError::non_physical("leg current is not finite"));
        }
        Ok(conditions)
    }

    fn current_density(&self, leg: &LegKernel) -> f64 {
        self.current / leg.area
    }
}

/// Raw profile shared by both methods, index 0 at the cold face.
#[derive(Debug, Clone, Default)]
struct Profile {
    pub x: Vec<f64>,
    pub t: Vec<f64>,
    pub q: Vec<f64>,
    pub v: Vec<f64>,
    pub r: Vec<f64>,
}

impl Profile {
    fn with_capacity(n: usize) -> Self {
        Self {
            x: Vec::with_capacity(n),
            t: Vec::with_capacity(n),
            q: Vec::with_capacity(n),
            v: Vec::with_capacity(n),
            r: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, x: f64, [t, q, v, r]: [f64; 4]) {
        self.x.push(x);
        self.t.push(t);
        self.q.push(q);
        self.v.push(v);
        self.r.push(r);
    }

    fn hot_face(&self) -> [f64; 4] {
        let last = self.t.len() - 1;
        [self.t[last], self.q[last], self.v[last], self.r[last]]
    }

    /// Builds the public solution from a complete profile.
    fn into_solution(self, leg: &LegKernel, current: f64, iters: usize) -> LegSolution {
        let [t_hot, q_hot, voltage, resistance] = self.hot_face();
        let (t_cold, q_cold) = (self.t[0], self.q[0]);

        let power = -voltage * current;
        let efficiency = if q_hot == 0.0 {
            0.0
        } else {
            power / (q_hot * leg.area)
        };
        let load_resistance = if current == 0.0 {
            f64::INFINITY
        } else {
            -voltage / current
        };

        LegSolution {
            positions: self.x.iter().map(|&x| Length::new::<meter>(x)).collect(),
            temperatures: self
                .t
                .iter()
                .map(|&t| ThermodynamicTemperature::new::<kelvin>(t))
                .collect(),
            heat_fluxes: self
                .q
                .iter()
                .map(|&q| HeatFluxDensity::new::<watt_per_square_meter>(q))
                .collect(),
            voltages: self
                .v
                .iter()
                .map(|&v| ElectricPotential::new::<volt>(v))
                .collect(),
            current: ElectricCurrent::new::<ampere>(current),
            t_hot: ThermodynamicTemperature::new::<kelvin>(t_hot),
            t_cold: ThermodynamicTemperature::new::<kelvin>(t_cold),
            q_hot: HeatFluxDensity::new::<watt_per_square_meter>(q_hot),
            q_cold: HeatFluxDensity::new::<watt_per_square_meter>(q_cold),
            voltage: ElectricPotential::new::<volt>(voltage),
            power: Power::new::<watt>(power),
            internal_resistance: ElectricalResistance::new::<ohm>(resistance),
            load_resistance: ElectricalResistance::new::<ohm>(load_resistance),
            efficiency,
            iters,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use uom::si::{area::square_millimeter, length::millimeter};

    use super::*;

    /// p-type leg with k = 4 W/m·K, α = 150 µV/K, σ = 1000 S/cm.
    fn hms_leg(nodes: usize) -> Leg {
        Leg::new(
            Material::Hms,
            Area::new::<square_millimeter>(9.0),
            Length::new::<millimeter>(1.0),
            nodes,
        )
        .unwrap()
    }

    fn k(t: f64) -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<kelvin>(t)
    }

    #[test]
    fn concrete_generating_leg() {
        let leg = hms_leg(11);
        let current = ElectricCurrent::new::<ampere>(4.5);

        let sol = leg
            .solve(&LegMethod::Analytical, current, k(550.0), k(350.0))
            .unwrap();

        let carnot = 1.0 - 350.0 / 550.0;
        assert!(sol.efficiency.is_finite());
        assert!(sol.efficiency > 0.0);
        assert!(sol.efficiency < carnot);
        assert_relative_eq!(sol.efficiency, 12_500.0 / 840_000.0, max_relative = 1e-12);

        assert!(sol.voltage.get::<volt>() < 0.0);
        assert_relative_eq!(sol.voltage.get::<volt>(), -0.025, max_relative = 1e-12);
        assert_relative_eq!(sol.power.get::<watt>(), 0.1125, max_relative = 1e-12);
        assert_relative_eq!(
            sol.q_hot.get::<watt_per_square_meter>(),
            840_000.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn both_methods_agree_for_constant_properties() {
        let leg = hms_leg(41);
        let current = ElectricCurrent::new::<ampere>(4.5);

        let lumped = leg
            .solve(&LegMethod::Analytical, current, k(550.0), k(350.0))
            .unwrap();
        let marched = leg
            .solve(&"numerical".parse().unwrap(), current, k(550.0), k(350.0))
            .unwrap();

        assert_relative_eq!(
            marched.q_hot.get::<watt_per_square_meter>(),
            lumped.q_hot.get::<watt_per_square_meter>(),
            max_relative = 0.01
        );
        assert_relative_eq!(
            marched.voltage.get::<volt>(),
            lumped.voltage.get::<volt>(),
            max_relative = 0.01
        );
    }

    #[test]
    fn methods_agree_for_small_temperature_span() {
        let leg = Leg::new(
            Material::Ex2PType,
            Area::new::<square_millimeter>(4.0),
            Length::new::<millimeter>(1.0),
            21,
        )
        .unwrap();
        let current = ElectricCurrent::new::<ampere>(1.0);

        let lumped = leg
            .solve(&LegMethod::Analytical, current, k(520.0), k(500.0))
            .unwrap();
        let marched = leg
            .solve(
                &LegMethod::Numerical(NumericalConfig::default()),
                current,
                k(520.0),
                k(500.0),
            )
            .unwrap();

        assert_relative_eq!(
            marched.q_hot.get::<watt_per_square_meter>(),
            lumped.q_hot.get::<watt_per_square_meter>(),
            max_relative = 0.03
        );
        assert_relative_eq!(
            marched.voltage.get::<volt>(),
            lumped.voltage.get::<volt>(),
            max_relative = 0.03
        );
    }

    #[test]
    fn open_circuit_has_infinite_load() {
        let sol = hms_leg(5)
            .solve(
                &LegMethod::Analytical,
                ElectricCurrent::new::<ampere>(0.0),
                k(500.0),
                k(400.0),
            )
            .unwrap();

        assert_eq!(sol.power.get::<watt>(), 0.0);
        assert!(sol.load_resistance.get::<ohm>().is_infinite());
        assert_relative_eq!(sol.voltage.get::<volt>(), -150e-6 * 100.0, max_relative = 1e-12);
    }

    #[test]
    fn profile_has_one_entry_per_node() {
        let sol = hms_leg(7)
            .solve(
                &LegMethod::Analytical,
                ElectricCurrent::new::<ampere>(2.0),
                k(600.0),
                k(400.0),
            )
            .unwrap();

        assert_eq!(sol.temperatures.len(), 7);
        assert_eq!(sol.heat_fluxes.len(), 7);
        assert_eq!(sol.voltages.len(), 7);
        assert_relative_eq!(sol.temperatures[0].get::<kelvin>(), 400.0);
        assert_relative_eq!(sol.temperatures[6].get::<kelvin>(), 600.0, max_relative = 1e-12);
        assert_relative_eq!(sol.positions[6].get::<millimeter>(), 1.0);
    }

    #[test]
    fn invalid_geometry_is_a_config_error() {
        let err = Leg::new(
            Material::Hms,
            Area::new::<square_millimeter>(0.0),
            Length::new::<millimeter>(1.0),
            5,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { name: "leg.area", .. }));

        assert!(
            Leg::new(
                Material::Hms,
                Area::new::<square_millimeter>(1.0),
                Length::new::<millimeter>(1.0),
                1,
            )
            .is_err()
        );
    }

    #[test]
    fn non_positive_face_temperature_is_a_domain_error() {
        let err = hms_leg(5)
            .solve(
                &LegMethod::Analytical,
                ElectricCurrent::new::<ampere>(1.0),
                k(500.0),
                k(0.0),
            )
            .unwrap_err();
        assert!(matches!(err, SolveError::Domain(_)));
    }

    #[test]
    fn method_names() {
        assert_eq!("analytical".parse::<LegMethod>().unwrap(), LegMethod::Analytical);
        assert!("Numerical".parse::<LegMethod>().unwrap().is_numerical());
        assert!(matches!(
            "spectral".parse::<LegMethod>(),
            Err(ConfigError::UnknownLegMethod { .. })
        ));
    }

    #[test]
    fn matched_load_halves_the_open_circuit_voltage() {
        let leg = hms_leg(5);
        let point = leg.matched_load(k(550.0), k(350.0)).unwrap();

        let resistance = 1e-5 * 1e-3 / 9e-6;
        assert_relative_eq!(point.resistance.get::<ohm>(), resistance, max_relative = 1e-12);
        assert_relative_eq!(
            point.current.get::<ampere>(),
            0.03 / (2.0 * resistance),
            max_relative = 1e-12
        );
        assert_relative_eq!(
            point.power.get::<watt>(),
            0.03 * 0.03 / (4.0 * resistance),
            max_relative = 1e-12
        );
    }
}
