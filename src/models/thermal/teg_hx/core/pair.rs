//! Thermoelectric couple and its homogenized module properties.

use uom::si::{
    area::square_meter,
    f64::{
        Area, ElectricCurrent, ElectricPotential, HeatFluxDensity, HeatTransfer, Length, Power,
        ThermodynamicTemperature,
    },
    heat_flux_density::watt_per_square_meter,
    heat_transfer::watt_per_square_meter_kelvin,
    length::meter,
    power::watt,
    thermodynamic_temperature::kelvin,
};

use crate::support::constraint::{NonNegative, StrictlyPositive, UnitIntervalLowerOpen};

use super::{ConfigError, DomainError, Leg, LegMethod, LegSolution, Material, SolveError};

/// A p-type and an n-type leg wired as one thermoelectric couple.
///
/// Both legs share the face temperatures and length. The p-type leg carries
/// `+I` and the n-type leg `−I`. The module footprint is the two leg areas
/// plus any void area between couples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermoelectricPair {
    pub p_leg: Leg,
    pub n_leg: Leg,
    pub void_area: Area,
    pub method: LegMethod,
}

/// Geometry used to build a [`ThermoelectricPair`] the way the optimizer sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairGeometry {
    pub p_material: Material,
    pub n_material: Material,
    pub p_area: Area,
    /// n-type area divided by p-type area.
    pub leg_area_ratio: f64,
    /// Leg area divided by module footprint, in `(0, 1]`.
    pub fill_fraction: f64,
    pub length: Length,
    /// Profile points per leg.
    pub nodes: usize,
}

impl ThermoelectricPair {
    /// Builds a pair from a p-type leg area, an area ratio and a fill fraction.
    ///
    /// The void area is `(1 − F) / F · (A_p + A_n)`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any dimension is not strictly positive or
    /// the fill fraction is outside `(0, 1]`.
    pub fn from_geometry(geometry: PairGeometry, method: LegMethod) -> Result<Self, ConfigError> {
        let ratio = StrictlyPositive::new(geometry.leg_area_ratio)
            .map_err(|e| e.named("te_pair.leg_area_ratio"))?
            .into_inner();
        let fill = UnitIntervalLowerOpen::new(geometry.fill_fraction)
            .map_err(|e| e.named("te_pair.fill_fraction"))?
            .into_inner();

        let p_leg = Leg::new(
            geometry.p_material,
            geometry.p_area,
            geometry.length,
            geometry.nodes,
        )?;
        let n_leg = Leg::new(
            geometry.n_material,
            geometry.p_area * ratio,
            geometry.length,
            geometry.nodes,
        )?;

        Ok(Self {
            p_leg,
            n_leg,
            void_area: (p_leg.area + n_leg.area) * ((1.0 - fill) / fill),
            method,
        })
    }

    /// Checks leg geometry and the void area.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on invalid legs, a negative void area, or legs
    /// of unequal length.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.p_leg.validate()?;
        self.n_leg.validate()?;
        NonNegative::new(self.void_area).map_err(|e| e.named("te_pair.void_area"))?;
        if self.p_leg.length != self.n_leg.length {
            return Err(ConfigError::invalid(
                "te_pair.length",
                "p-type and n-type legs must share one length",
            ));
        }
        Ok(())
    }

    /// Footprint of one couple: both legs plus void.
    #[must_use]
    pub fn module_area(&self) -> Area {
        self.p_leg.area + self.n_leg.area + self.void_area
    }

    #[must_use]
    pub fn leg_area_ratio(&self) -> f64 {
        (self.n_leg.area / self.p_leg.area).value
    }

    #[must_use]
    pub fn fill_fraction(&self) -> f64 {
        ((self.p_leg.area + self.n_leg.area) / self.module_area()).value
    }

    #[must_use]
    pub fn length(&self) -> Length {
        self.p_leg.length
    }

    /// Returns the geometry this pair was (or could have been) built from.
    #[must_use]
    pub fn geometry(&self) -> PairGeometry {
        PairGeometry {
            p_material: self.p_leg.material,
            n_material: self.n_leg.material,
            p_area: self.p_leg.area,
            leg_area_ratio: self.leg_area_ratio(),
            fill_fraction: self.fill_fraction(),
            length: self.length(),
            nodes: self.p_leg.nodes,
        }
    }

    /// Solves both legs at shared face temperatures.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError`] if either leg fails, or if the face temperatures
    /// are equal so no effective coefficient exists.
    pub fn solve(
        &self,
        current: ElectricCurrent,
        t_hot: ThermodynamicTemperature,
        t_cold: ThermodynamicTemperature,
    ) -> Result<PairSolution, SolveError> {
        self.validate()?;

        let p = self.p_leg.solve(&self.method, current, t_hot, t_cold)?;
        let n = self.n_leg.solve(&self.method, -current, t_hot, t_cold)?;

        let a_p = self.p_leg.area.get::<square_meter>();
        let a_n = self.n_leg.area.get::<square_meter>();
        let a_module = self.module_area().get::<square_meter>();

        let q_hot = (p.q_hot.get::<watt_per_square_meter>() * a_p
            + n.q_hot.get::<watt_per_square_meter>() * a_n)
            / a_module;
        let q_cold = (p.q_cold.get::<watt_per_square_meter>() * a_p
            + n.q_cold.get::<watt_per_square_meter>() * a_n)
            / a_module;

        let power = p.power.get::<watt>() + n.power.get::<watt>();
        let delta_t = t_hot.get::<kelvin>() - t_cold.get::<kelvin>();
        if delta_t == 0.0 {
            return Err(DomainError::non_physical(
                "equal module face temperatures leave no effective coefficient",
            )
            .into());
        }
        let h_effective = q_hot / delta_t;
        if !(h_effective > 0.0) {
            return Err(DomainError::non_physical(format!(
                "module conductance {h_effective} W/m²K is not positive"
            ))
            .into());
        }

        let efficiency = if q_hot == 0.0 {
            0.0
        } else {
            power / (q_hot * a_module)
        };

        Ok(PairSolution {
            voltage: p.voltage - n.voltage,
            current,
            power: Power::new::<watt>(power),
            q_hot: HeatFluxDensity::new::<watt_per_square_meter>(q_hot),
            q_cold: HeatFluxDensity::new::<watt_per_square_meter>(q_cold),
            h_effective: HeatTransfer::new::<watt_per_square_meter_kelvin>(h_effective),
            efficiency,
            module_area: self.module_area(),
            t_hot,
            t_cold,
            p,
            n,
        })
    }
}

/// Solved state of a thermoelectric couple.
#[derive(Debug, Clone, PartialEq)]
pub struct PairSolution {
    pub p: LegSolution,
    pub n: LegSolution,
    pub t_hot: ThermodynamicTemperature,
    pub t_cold: ThermodynamicTemperature,
    /// Couple voltage `V_p − V_n`, opposite in sign to a generating current.
    pub voltage: ElectricPotential,
    pub current: ElectricCurrent,
    pub power: Power,
    /// Hot-face heat flux averaged over the module footprint.
    pub q_hot: HeatFluxDensity,
    /// Cold-face heat flux averaged over the module footprint.
    pub q_cold: HeatFluxDensity,
    /// `q_hot / (T_h − T_c)` over the module footprint.
    pub h_effective: HeatTransfer,
    pub efficiency: f64,
    pub module_area: Area,
}

/// Conduction-only reference module with an ideal figure-of-merit efficiency.
///
/// Useful as a quick bound on what a couple of the same footprint could
/// deliver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarnotModule {
    /// Thermal conductivity of the leg material in W/(m·K).
    pub conductivity: f64,
    /// Device figure of merit `ZT` at the mean temperature.
    pub zt: f64,
    pub fill_fraction: f64,
    pub length: Length,
}

/// Solution of a [`CarnotModule`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarnotSolution {
    pub h_effective: HeatTransfer,
    pub q_hot: HeatFluxDensity,
    /// Power per unit module area.
    pub power_density: HeatFluxDensity,
    pub efficiency: f64,
}

impl CarnotModule {
    /// Solves the reference module between two face temperatures.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for non-positive conductivity, length or fill
    /// fraction, and [`DomainError`] for non-positive face temperatures.
    pub fn solve(
        &self,
        t_hot: ThermodynamicTemperature,
        t_cold: ThermodynamicTemperature,
    ) -> Result<CarnotSolution, SolveError> {
        let k = StrictlyPositive::new(self.conductivity)
            .map_err(|e| e.named("carnot.conductivity"))?
            .into_inner();
        let fill = UnitIntervalLowerOpen::new(self.fill_fraction)
            .map_err(|e| e.named("carnot.fill_fraction"))?
            .into_inner();
        let length = StrictlyPositive::new(self.length)
            .map_err(|e| e.named("carnot.length"))?
            .into_inner()
            .get::<meter>();

        let (t_h, t_c) = (t_hot.get::<kelvin>(), t_cold.get::<kelvin>());
        if !(t_h > 0.0 && t_c > 0.0) {
            return Err(DomainError::NonPositiveTemperature {
                context: "carnot module",
                kelvin: t_h.min(t_c),
            }
            .into());
        }

        let h = k * fill / length;
        let q_hot = h * (t_h - t_c);
        let root = (1.0 + self.zt).sqrt();
        let efficiency = (t_h - t_c) * (root - 1.0) / (t_h * (root + t_c / t_h));

        Ok(CarnotSolution {
            h_effective: HeatTransfer::new::<watt_per_square_meter_kelvin>(h),
            q_hot: HeatFluxDensity::new::<watt_per_square_meter>(q_hot),
            power_density: HeatFluxDensity::new::<watt_per_square_meter>(efficiency * q_hot),
            efficiency,
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use uom::si::{
        area::square_millimeter, electric_current::ampere, electric_potential::volt,
        electrical_resistance::ohm, length::millimeter,
    };

    use super::*;

    fn geometry() -> PairGeometry {
        PairGeometry {
            p_material: Material::Hms,
            n_material: Material::MgSi,
            p_area: Area::new::<square_millimeter>(9.0),
            leg_area_ratio: 0.71,
            fill_fraction: 0.02,
            length: Length::new::<millimeter>(1.0),
            nodes: 11,
        }
    }

    fn k(t: f64) -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<kelvin>(t)
    }

    #[test]
    fn geometry_round_trips() {
        let pair = ThermoelectricPair::from_geometry(geometry(), LegMethod::Analytical).unwrap();

        assert_relative_eq!(pair.leg_area_ratio(), 0.71, max_relative = 1e-12);
        assert_relative_eq!(pair.fill_fraction(), 0.02, max_relative = 1e-12);
        assert_relative_eq!(
            pair.module_area().get::<square_millimeter>(),
            9.0 * 1.71 / 0.02,
            max_relative = 1e-12
        );
    }

    #[test]
    fn generating_couple() {
        let pair = ThermoelectricPair::from_geometry(geometry(), LegMethod::Analytical).unwrap();
        let current = ElectricCurrent::new::<ampere>(4.5);

        let sol = pair.solve(current, k(550.0), k(350.0)).unwrap();

        assert!(sol.power.get::<watt>() > 0.0);
        assert!(sol.voltage.get::<volt>() < 0.0);
        assert!(sol.efficiency > 0.0 && sol.efficiency < 1.0 - 350.0 / 550.0);
        assert_relative_eq!(
            sol.power.get::<watt>(),
            -sol.voltage.get::<volt>() * 4.5,
            max_relative = 1e-12
        );
        assert!(sol.h_effective.get::<watt_per_square_meter_kelvin>() > 0.0);
    }

    #[test]
    fn module_flux_is_diluted_by_void() {
        let dense = ThermoelectricPair::from_geometry(
            PairGeometry {
                fill_fraction: 1.0,
                ..geometry()
            },
            LegMethod::Analytical,
        )
        .unwrap();
        let sparse = ThermoelectricPair::from_geometry(geometry(), LegMethod::Analytical).unwrap();
        let current = ElectricCurrent::new::<ampere>(2.0);

        let q_dense = dense.solve(current, k(500.0), k(350.0)).unwrap().q_hot;
        let q_sparse = sparse.solve(current, k(500.0), k(350.0)).unwrap().q_hot;

        assert_relative_eq!(
            q_sparse.get::<watt_per_square_meter>(),
            0.02 * q_dense.get::<watt_per_square_meter>(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn legs_carry_opposite_currents() {
        let pair = ThermoelectricPair::from_geometry(geometry(), LegMethod::Analytical).unwrap();
        let sol = pair
            .solve(ElectricCurrent::new::<ampere>(3.0), k(500.0), k(350.0))
            .unwrap();

        assert_relative_eq!(sol.p.current.get::<ampere>(), 3.0);
        assert_relative_eq!(sol.n.current.get::<ampere>(), -3.0);
        assert!(sol.p.power.get::<watt>() > 0.0);
        assert!(sol.n.power.get::<watt>() > 0.0);
        assert!(sol.p.internal_resistance.get::<ohm>() > 0.0);
    }

    #[test]
    fn equal_face_temperatures_are_a_domain_error() {
        let pair = ThermoelectricPair::from_geometry(geometry(), LegMethod::Analytical).unwrap();
        let err = pair
            .solve(ElectricCurrent::new::<ampere>(1.0), k(400.0), k(400.0))
            .unwrap_err();
        assert!(matches!(err, SolveError::Domain(_)));
    }

    #[test]
    fn invalid_fill_fraction() {
        let err = ThermoelectricPair::from_geometry(
            PairGeometry {
                fill_fraction: 0.0,
                ..geometry()
            },
            LegMethod::Analytical,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "te_pair.fill_fraction",
                ..
            }
        ));
    }

    #[test]
    fn carnot_reference_is_below_carnot() {
        let module = CarnotModule {
            conductivity: 4.0,
            zt: 1.0,
            fill_fraction: 0.5,
            length: Length::new::<millimeter>(2.0),
        };

        let sol = module.solve(k(600.0), k(300.0)).unwrap();

        assert_relative_eq!(sol.h_effective.get::<watt_per_square_meter_kelvin>(), 1000.0);
        assert!(sol.efficiency > 0.0 && sol.efficiency < 0.5);
        let root = 2.0_f64.sqrt();
        assert_relative_eq!(
            sol.efficiency,
            300.0 * (root - 1.0) / (600.0 * (root + 0.5)),
            max_relative = 1e-12
        );
    }
}
