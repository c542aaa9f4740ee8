//! Thermoelectric generator heat exchanger modeling.
//!
//! The exchanger is a stack of parallel-plate ducts: exhaust in the middle,
//! coolant on the outside, and thermoelectric couples sandwiched between the
//! plates. It is split along the flow into nodes, each treated as a small
//! two-stream exchanger whose conductance includes the modules. The modules'
//! conductance depends on their face temperatures, so every node iterates
//! until the two agree, and the nodes are marched from the exhaust inlet.

mod error;
mod flow;
mod input;
mod leg;
mod march;
mod material;
mod node;
mod optimize;
mod pair;
mod results;
mod traits;

#[cfg(test)]
mod test_support;

pub use error::{ConfigError, ConvergenceError, DomainError, SolveError};
pub use flow::{
    BareDuct, Convection, Duct, DuctFlow, Enhancement, EnhancementModel, FlowGeometry,
    FlowRegime, FlowSide, FlowSolution, FluidModel, FluidProperties, HeatedSides, IdealFin,
    JetArray, MeshPorous, OffsetStripFin,
};
pub use input::{FlowArrangement, HxGeometry, Inlets, PlateWall};
pub use leg::{Leg, LegMethod, LegSolution, MatchedLoad, NumericalConfig};
pub use march::MarchConfig;
pub use material::{Material, TeProperties};
pub use node::{NodeConfig, NodeResult};
pub use optimize::{
    DesignBounds, DesignVector, OptimizationOutcome, OptimizeError, OptimizerConfig,
    ParameterStore, ParameterStoreError, Parameters, StageReport, optimize, optimize_persisted,
};
pub use pair::{CarnotModule, CarnotSolution, PairGeometry, PairSolution, ThermoelectricPair};
pub use results::HxResults;

use uom::si::{
    electric_current::ampere,
    f64::{ElectricCurrent, ThermodynamicTemperature},
    length::meter,
    thermodynamic_temperature::kelvin,
};

use node::NodeStack;

/// A thermoelectric generator heat exchanger ready to solve.
///
/// Every field is a plain value, so a configuration can be cloned, tweaked and
/// solved again. Solving never mutates the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TegHx {
    pub geometry: HxGeometry,
    pub arrangement: FlowArrangement,
    pub exhaust: FlowSide,
    pub coolant: FlowSide,
    pub pair: ThermoelectricPair,
    /// Current through every couple.
    pub current: ElectricCurrent,
    pub wall: PlateWall,
    /// Dead-state temperature for available heat and exergy.
    pub reference_temperature: ThermodynamicTemperature,
    pub node: NodeConfig,
    pub march: MarchConfig,
}

impl TegHx {
    /// Creates a counter-flow exchanger with default geometry and settings.
    #[must_use]
    pub fn new(exhaust: FlowSide, coolant: FlowSide, pair: ThermoelectricPair) -> Self {
        Self {
            geometry: HxGeometry::default(),
            arrangement: FlowArrangement::default(),
            exhaust,
            coolant,
            pair,
            current: ElectricCurrent::new::<ampere>(4.5),
            wall: PlateWall::default(),
            reference_temperature: ThermodynamicTemperature::new::<kelvin>(300.0),
            node: NodeConfig::default(),
            march: MarchConfig::default(),
        }
    }

    /// Checks the whole configuration without solving.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for invalid geometry on any layer, a duct whose
    /// width differs from the exchanger width, a node warm-up below 2, a
    /// non-finite current, or a non-positive reference temperature.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.geometry.validate()?;
        self.exhaust.validate()?;
        self.coolant.validate()?;
        self.pair.validate()?;
        self.wall.h()?;

        let width = self.geometry.width.get::<meter>();
        for (name, duct) in [
            ("exhaust.duct.width", &self.exhaust.duct),
            ("coolant.duct.width", &self.coolant.duct),
        ] {
            let duct_width = duct.width.get::<meter>();
            if (duct_width - width).abs() > 1e-9 * width {
                return Err(ConfigError::invalid(
                    name,
                    format!("{duct_width} m differs from exchanger width {width} m"),
                ));
            }
        }

        if self.node.fixed_point.warm_up < 2 {
            return Err(ConfigError::invalid(
                "node.fixed_point.warm_up",
                "the first node pass has no previous conductance to compare with",
            ));
        }
        if !self.current.get::<ampere>().is_finite() {
            return Err(ConfigError::invalid("te_pair.I", "current is not finite"));
        }
        if !(self.reference_temperature.get::<kelvin>() > 0.0) {
            return Err(ConfigError::invalid(
                "reference_temperature",
                "must be a positive absolute temperature",
            ));
        }
        Ok(())
    }

    /// Solves the exchanger for a pair of inlet temperatures.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError`] if the configuration is invalid, a node leaves
    /// a model's domain or fails to converge, or the counter-flow search does
    /// not converge. A failed node discards the whole march.
    pub fn solve(&self, inlets: &Inlets) -> Result<HxResults, SolveError> {
        march::solve(self, inlets)
    }

    fn node_stack(&self) -> Result<NodeStack<'_>, ConfigError> {
        Ok(NodeStack {
            exhaust: &self.exhaust,
            coolant: &self.coolant,
            pair: &self.pair,
            current: self.current,
            h_wall: self.wall.h()?,
            area: self.geometry.node_area(self.coolant.duct.count),
            node_length: self.geometry.node_length(),
            config: self.node,
        })
    }
}
