use twine_solvers::equation::bisection;
use uom::si::{f64::TemperatureInterval, temperature_interval::kelvin as delta_kelvin};

/// Solver configuration for the counter-flow coolant outlet search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchConfig {
    /// Maximum iteration count for the bisection solve.
    pub max_iters: usize,

    /// Absolute tolerance on the coolant outlet temperature.
    pub temp_tol: TemperatureInterval,

    /// Absolute tolerance on the marched coolant inlet error.
    pub inlet_tol: TemperatureInterval,
}

impl Default for MarchConfig {
    fn default() -> Self {
        Self {
            max_iters: 100,
            temp_tol: TemperatureInterval::new::<delta_kelvin>(1e-9),
            inlet_tol: TemperatureInterval::new::<delta_kelvin>(1e-6),
        }
    }
}

impl MarchConfig {
    /// Converts this configuration into a bisection solver configuration.
    pub(super) fn bisection(&self) -> bisection::Config {
        bisection::Config {
            max_iters: self.max_iters,
            x_abs_tol: self.temp_tol.get::<delta_kelvin>(),
            x_rel_tol: 0.0,
            residual_tol: self.inlet_tol.get::<delta_kelvin>(),
        }
    }
}
