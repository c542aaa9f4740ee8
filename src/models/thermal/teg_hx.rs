//! Thermoelectric generator heat exchanger models.
//!
//! This module provides [`twine_core::Model`] implementations for an exhaust
//! heat exchanger with thermoelectric modules between the exhaust and coolant
//! plates. The computational core is in the internal [`core`] module.
//!
//! - [`TegHeatExchanger`] solves a fixed configuration for inlet temperatures.
//! - [`TegDesign`] solves a fixed operating point for a [`DesignVector`].
//!
//! [`optimize`] searches the design space for maximum net power.

pub(crate) mod core;

pub use core::{
    BareDuct, CarnotModule, CarnotSolution, ConfigError, Convection, ConvergenceError,
    DesignBounds, DesignVector, DomainError, Duct, DuctFlow, Enhancement, EnhancementModel,
    FlowArrangement, FlowGeometry, FlowRegime, FlowSide, FlowSolution, FluidModel,
    FluidProperties, HeatedSides, HxGeometry, HxResults, IdealFin, Inlets, JetArray, Leg,
    LegMethod, LegSolution, MarchConfig, MatchedLoad, Material, MeshPorous, NodeConfig,
    NodeResult, NumericalConfig, OffsetStripFin, OptimizationOutcome, OptimizeError,
    OptimizerConfig, PairGeometry, PairSolution, ParameterStore, ParameterStoreError,
    Parameters, PlateWall, SolveError, StageReport, TeProperties, TegHx, ThermoelectricPair,
    optimize, optimize_persisted,
};

use twine_core::Model;

/// Solves a configured exchanger for a pair of inlet temperatures.
#[derive(Debug, Clone, PartialEq)]
pub struct TegHeatExchanger {
    hx: TegHx,
}

impl TegHeatExchanger {
    /// Wraps a configuration after checking it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is invalid.
    pub fn new(hx: TegHx) -> Result<Self, ConfigError> {
        hx.validate()?;
        Ok(Self { hx })
    }

    #[must_use]
    pub fn exchanger(&self) -> &TegHx {
        &self.hx
    }
}

impl Model for TegHeatExchanger {
    type Input = Inlets;
    type Output = HxResults;
    type Error = SolveError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.hx.solve(input)
    }
}

/// Solves one operating point for different designs.
#[derive(Debug, Clone, PartialEq)]
pub struct TegDesign {
    hx: TegHx,
    inlets: Inlets,
}

impl TegDesign {
    #[must_use]
    pub fn new(hx: TegHx, inlets: Inlets) -> Self {
        Self { hx, inlets }
    }
}

impl Model for TegDesign {
    type Input = DesignVector;
    type Output = HxResults;
    type Error = SolveError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        input.apply(&self.hx)?.solve(&self.inlets)
    }
}
