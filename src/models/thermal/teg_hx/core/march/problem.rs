//! Problem formulation for the counter-flow coolant outlet search.

use std::convert::Infallible;

use twine_core::{EquationProblem, Model};
use uom::si::{f64::ThermodynamicTemperature, thermodynamic_temperature::kelvin};

use crate::support::hx::arrangement::CounterFlow;

use super::{
    super::{Inlets, SolveError, TegHx},
    Marched, march,
};

/// Model adapter that marches the exchanger from a coolant outlet guess.
pub(super) struct CounterFlowModel<'a> {
    hx: &'a TegHx,
    inlets: &'a Inlets,
}

impl<'a> CounterFlowModel<'a> {
    pub(super) fn new(hx: &'a TegHx, inlets: &'a Inlets) -> Self {
        Self { hx, inlets }
    }
}

impl Model for CounterFlowModel<'_> {
    type Input = ThermodynamicTemperature;
    type Output = Marched;
    type Error = SolveError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        march::<CounterFlow>(self.hx, self.inlets, *input)
    }
}

/// Residual is the marched coolant inlet minus the configured one.
pub(super) struct CoolantInletProblem {
    target: ThermodynamicTemperature,
}

impl CoolantInletProblem {
    pub(super) fn new(target: ThermodynamicTemperature) -> Self {
        Self { target }
    }
}

impl EquationProblem<1> for CoolantInletProblem {
    type Input = ThermodynamicTemperature;
    type Output = Marched;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(ThermodynamicTemperature::new::<kelvin>(x[0]))
    }

    fn residuals(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; 1], Self::Error> {
        Ok([output.coolant_inlet.get::<kelvin>() - self.target.get::<kelvin>()])
    }
}
