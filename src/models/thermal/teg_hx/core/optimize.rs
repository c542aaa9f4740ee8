//! Design search for maximum net power.
//!
//! The search minimizes `1 / net_power` over the pair geometry, the couple
//! current and optionally the exhaust enhancement spacing with a bounded
//! Nelder-Mead simplex. A first stage solves the legs analytically and a
//! second stage refines that optimum with numerical legs.

mod params;

pub use params::{ParameterStore, ParameterStoreError, Parameters};

use thiserror::Error;
use tracing::{info, warn};
use uom::si::{
    electric_current::ampere,
    f64::{ElectricCurrent, Length, Power},
    length::{meter, millimeter},
    power::watt,
};

use crate::support::nelder_mead::{self, Bounds};

use params::{CURRENT, FILL_FRACTION, LEG_AREA_RATIO, LENGTH, SPACING};

use super::{
    ConfigError, FlowSide, HxResults, Inlets, LegMethod, NumericalConfig, SolveError, TegHx,
    ThermoelectricPair,
};

/// Errors that stop a design search.
#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("invalid design: {0}")]
    Design(#[from] ConfigError),

    #[error("invalid search settings: {0}")]
    Settings(#[from] nelder_mead::ConfigError),

    #[error("simplex setup failed: {0}")]
    Simplex(#[from] nelder_mead::Error),

    /// The best design found could not be solved again.
    #[error("optimum could not be solved: {0}")]
    Solve(#[from] SolveError),

    #[error(transparent)]
    Store(#[from] ParameterStoreError),
}

/// The variables the optimizer moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesignVector {
    pub leg_area_ratio: f64,
    pub fill_fraction: f64,
    pub length: Length,
    pub current: ElectricCurrent,
    /// Exhaust enhancement spacing, searched only when present.
    pub spacing: Option<Length>,
}

impl Default for DesignVector {
    fn default() -> Self {
        Self {
            leg_area_ratio: 0.71,
            fill_fraction: 0.02,
            length: Length::new::<millimeter>(1.0),
            current: ElectricCurrent::new::<ampere>(4.5),
            spacing: None,
        }
    }
}

impl DesignVector {
    /// Reads the design currently configured on an exchanger.
    #[must_use]
    pub fn from_exchanger(hx: &TegHx) -> Self {
        Self {
            leg_area_ratio: hx.pair.leg_area_ratio(),
            fill_fraction: hx.pair.fill_fraction(),
            length: hx.pair.length(),
            current: hx.current,
            spacing: hx.exhaust.enhancement.and_then(|e| e.spacing()),
        }
    }

    /// Returns a copy of `hx` with this design applied.
    ///
    /// The pair is rebuilt from its geometry so the void area follows the
    /// new fill fraction.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the pair cannot be built or a spacing is
    /// given for an exhaust side without a spaced enhancement.
    pub fn apply(&self, hx: &TegHx) -> Result<TegHx, ConfigError> {
        let mut geometry = hx.pair.geometry();
        geometry.leg_area_ratio = self.leg_area_ratio;
        geometry.fill_fraction = self.fill_fraction;
        geometry.length = self.length;
        let pair = ThermoelectricPair::from_geometry(geometry, hx.pair.method)?;

        let exhaust = match (self.spacing, hx.exhaust.enhancement) {
            (None, _) => hx.exhaust,
            (Some(spacing), Some(enhancement)) => FlowSide {
                enhancement: Some(enhancement.with_spacing(spacing)?),
                ..hx.exhaust
            },
            (Some(_), None) => {
                return Err(ConfigError::invalid(
                    "exh.enh.spacing",
                    "exhaust side has no enhancement",
                ));
            }
        };

        Ok(TegHx {
            pair,
            exhaust,
            current: self.current,
            ..hx.clone()
        })
    }

    /// Raw SI coordinates in search order.
    fn to_raw(self) -> Vec<f64> {
        let mut x = vec![
            self.leg_area_ratio,
            self.fill_fraction,
            self.length.get::<meter>(),
            self.current.get::<ampere>(),
        ];
        if let Some(spacing) = self.spacing {
            x.push(spacing.get::<meter>());
        }
        x
    }

    fn from_raw(x: &[f64]) -> Self {
        Self {
            leg_area_ratio: x[0],
            fill_fraction: x[1],
            length: Length::new::<meter>(x[2]),
            current: ElectricCurrent::new::<ampere>(x[3]),
            spacing: x.get(4).map(|&s| Length::new::<meter>(s)),
        }
    }

    #[must_use]
    pub fn to_parameters(&self) -> Parameters {
        let mut parameters = Parameters::new();
        parameters.insert_scalar(LEG_AREA_RATIO, self.leg_area_ratio);
        parameters.insert_scalar(FILL_FRACTION, self.fill_fraction);
        parameters.insert_scalar(LENGTH, self.length.get::<meter>());
        parameters.insert_scalar(CURRENT, self.current.get::<ampere>());
        if let Some(spacing) = self.spacing {
            parameters.insert_scalar(SPACING, spacing.get::<meter>());
        }
        parameters
    }

    /// Reads a design from stored parameters. The spacing is optional.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterStoreError::Missing`] if a required name is absent.
    pub fn from_parameters(parameters: &Parameters) -> Result<Self, ParameterStoreError> {
        Ok(Self {
            leg_area_ratio: parameters.scalar(LEG_AREA_RATIO)?,
            fill_fraction: parameters.scalar(FILL_FRACTION)?,
            length: Length::new::<meter>(parameters.scalar(LENGTH)?),
            current: ElectricCurrent::new::<ampere>(parameters.scalar(CURRENT)?),
            spacing: parameters.scalar(SPACING).ok().map(Length::new::<meter>),
        })
    }
}

/// Search limits for each design variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesignBounds {
    pub leg_area_ratio: (f64, f64),
    pub fill_fraction: (f64, f64),
    pub length: (Length, Length),
    pub current: (ElectricCurrent, ElectricCurrent),
    pub spacing: (Length, Length),
}

impl Default for DesignBounds {
    fn default() -> Self {
        Self {
            leg_area_ratio: (0.2, 1.5),
            fill_fraction: (0.001, 0.05),
            length: (
                Length::new::<millimeter>(0.5),
                Length::new::<millimeter>(10.0),
            ),
            current: (
                ElectricCurrent::new::<ampere>(1.0),
                ElectricCurrent::new::<ampere>(10.0),
            ),
            spacing: (
                Length::new::<millimeter>(1.0),
                Length::new::<millimeter>(20.0),
            ),
        }
    }
}

impl DesignBounds {
    fn to_raw(self, with_spacing: bool) -> Result<Vec<Bounds>, nelder_mead::ConfigError> {
        let mut bounds = vec![
            Bounds::new(self.leg_area_ratio.0, self.leg_area_ratio.1)?,
            Bounds::new(self.fill_fraction.0, self.fill_fraction.1)?,
            Bounds::new(self.length.0.get::<meter>(), self.length.1.get::<meter>())?,
            Bounds::new(self.current.0.get::<ampere>(), self.current.1.get::<ampere>())?,
        ];
        if with_spacing {
            bounds.push(Bounds::new(
                self.spacing.0.get::<meter>(),
                self.spacing.1.get::<meter>(),
            )?);
        }
        Ok(bounds)
    }
}

/// Settings for [`optimize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizerConfig {
    pub bounds: DesignBounds,
    pub simplex: nelder_mead::Config,
    /// Numerical leg settings for the refinement stage; `None` stops after
    /// the analytical stage.
    pub refine: Option<NumericalConfig>,
    /// Relative step applied to every coordinate before retrying a design
    /// whose solve did not converge.
    pub nudge: f64,
    /// Objective value for designs that cannot be evaluated.
    pub penalty: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            bounds: DesignBounds::default(),
            simplex: nelder_mead::Config::default(),
            refine: Some(NumericalConfig::default()),
            nudge: 0.01,
            penalty: 1e6,
        }
    }
}

/// Summary of one simplex stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageReport {
    pub method: LegMethod,
    pub status: nelder_mead::Status,
    pub iters: usize,
    pub evals: usize,
    /// Best design of the stage.
    pub design: DesignVector,
    /// Objective at the best design.
    pub objective: f64,
}

/// Result of a design search.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationOutcome {
    pub design: DesignVector,
    /// The input exchanger with the best design applied.
    pub exchanger: TegHx,
    /// Solution of `exchanger`.
    pub results: HxResults,
    pub stages: Vec<StageReport>,
}

impl OptimizationOutcome {
    #[must_use]
    pub fn net_power(&self) -> Power {
        self.results.net_power()
    }
}

/// Searches for the design with the highest net power.
///
/// The exhaust spacing is searched when `x0.spacing` is set. Evaluations that
/// fail are penalized rather than aborting the search.
///
/// # Errors
///
/// Returns [`OptimizeError`] if the settings or `x0` are invalid, or if the
/// final design cannot be solved.
pub fn optimize(
    hx: &TegHx,
    inlets: &Inlets,
    x0: DesignVector,
    config: &OptimizerConfig,
) -> Result<OptimizationOutcome, OptimizeError> {
    if !(config.nudge.is_finite() && config.penalty.is_finite() && config.penalty > 0.0) {
        return Err(ConfigError::invalid(
            "optimizer",
            "nudge and penalty must be finite with a positive penalty",
        )
        .into());
    }
    x0.apply(hx)?;
    let bounds = config.bounds.to_raw(x0.spacing.is_some())?;

    let mut stages = Vec::with_capacity(2);
    let mut design = x0;
    let mut method = LegMethod::Analytical;

    for stage_method in
        std::iter::once(LegMethod::Analytical).chain(config.refine.map(LegMethod::Numerical))
    {
        method = stage_method;
        let report = run_stage(&with_method(hx, method), inlets, design, &bounds, config, method)?;
        design = report.design;
        stages.push(report);
    }

    let exchanger = design.apply(&with_method(hx, method))?;
    let results = exchanger.solve(inlets)?;
    info!(
        net_power = results.net_power().get::<watt>(),
        leg_area_ratio = design.leg_area_ratio,
        fill_fraction = design.fill_fraction,
        length = design.length.get::<meter>(),
        current = design.current.get::<ampere>(),
        "optimization finished"
    );

    Ok(OptimizationOutcome {
        design,
        exchanger,
        results,
        stages,
    })
}

/// Runs [`optimize`] starting from, and saving to, a stored run.
///
/// The starting design is the run's stored parameters when present and the
/// exchanger's current design otherwise. The best design is written back to
/// the same run.
///
/// # Errors
///
/// Returns [`OptimizeError`] if stored parameters cannot be read or written,
/// or if [`optimize`] fails.
pub fn optimize_persisted(
    hx: &TegHx,
    inlets: &Inlets,
    store: &ParameterStore,
    run: &str,
    config: &OptimizerConfig,
) -> Result<OptimizationOutcome, OptimizeError> {
    let x0 = if store.exists(run) {
        DesignVector::from_parameters(&store.load(run)?)?
    } else {
        DesignVector::from_exchanger(hx)
    };

    let outcome = optimize(hx, inlets, x0, config)?;
    let path = store.save(run, &outcome.design.to_parameters())?;
    info!(run, path = %path.display(), "saved optimized parameters");
    Ok(outcome)
}

fn with_method(hx: &TegHx, method: LegMethod) -> TegHx {
    TegHx {
        pair: ThermoelectricPair { method, ..hx.pair },
        ..hx.clone()
    }
}

fn run_stage(
    hx: &TegHx,
    inlets: &Inlets,
    x0: DesignVector,
    bounds: &[Bounds],
    config: &OptimizerConfig,
    method: LegMethod,
) -> Result<StageReport, OptimizeError> {
    info!(numerical = method.is_numerical(), "optimization stage started");

    let evaluate = |x: &[f64]| objective(hx, inlets, x, bounds, config);
    let solution = nelder_mead::minimize(evaluate, &x0.to_raw(), bounds, &config.simplex)?;

    if solution.status != nelder_mead::Status::Converged {
        warn!(
            iters = solution.iters,
            objective = solution.objective,
            "simplex did not converge, keeping the best design found"
        );
    }
    info!(
        numerical = method.is_numerical(),
        iters = solution.iters,
        evals = solution.evals,
        objective = solution.objective,
        "optimization stage finished"
    );

    // The best vertex may only have scored through its nudged substitute.
    let best = solve_with_retry(&solution.x, bounds, config.nudge, |x| {
        net_power(hx, inlets, x)
    })
    .map_or(solution.x, |(solved, _)| solved);

    Ok(StageReport {
        method,
        status: solution.status,
        iters: solution.iters,
        evals: solution.evals,
        design: DesignVector::from_raw(&best),
        objective: solution.objective,
    })
}

/// Inverse net power of a raw design, with failures penalized.
fn objective(
    hx: &TegHx,
    inlets: &Inlets,
    x: &[f64],
    bounds: &[Bounds],
    config: &OptimizerConfig,
) -> f64 {
    match solve_with_retry(x, bounds, config.nudge, |x| net_power(hx, inlets, x)) {
        Ok((_, net)) => inverse_net(net, config.penalty),
        Err(error) => {
            warn!(%error, ?x, "design penalized");
            config.penalty
        }
    }
}

/// Solves a raw design, retrying once from a nudged point when the solve
/// does not converge.
///
/// Returns the point that was actually solved with its result.
fn solve_with_retry<T>(
    x: &[f64],
    bounds: &[Bounds],
    nudge: f64,
    solve: impl Fn(&[f64]) -> Result<T, SolveError>,
) -> Result<(Vec<f64>, T), SolveError> {
    match solve(x) {
        Ok(value) => Ok((x.to_vec(), value)),
        Err(error) if error.is_convergence() => {
            let nudged: Vec<f64> = x
                .iter()
                .zip(bounds)
                .map(|(&xi, b)| b.clamp(xi * (1.0 + nudge)))
                .collect();
            let value = solve(&nudged)?;
            Ok((nudged, value))
        }
        Err(error) => Err(error),
    }
}

fn net_power(hx: &TegHx, inlets: &Inlets, x: &[f64]) -> Result<f64, SolveError> {
    let results = DesignVector::from_raw(x).apply(hx)?.solve(inlets)?;
    Ok(results.net_power().get::<watt>())
}

/// `1 / net` for positive net power. Designs that consume power score above
/// the penalty and rise with the power consumed, so the simplex can still
/// climb out of them.
fn inverse_net(net: f64, penalty: f64) -> f64 {
    if net > 0.0 {
        1.0 / net
    } else {
        penalty * (1.0 - net)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use tempfile::TempDir;
    use uom::si::length::centimeter;

    use crate::support::convergence::ConvergenceLoop;

    use super::{
        super::{
            ConvergenceError, Enhancement, FlowArrangement, IdealFin, Material, NodeConfig,
            test_support::{exchanger, inlets},
        },
        *,
    };

    fn quick_config(refine: Option<NumericalConfig>) -> OptimizerConfig {
        OptimizerConfig {
            simplex: nelder_mead::Config::new(25, 0.05, 1e-4, 1e-12, 1e-6).unwrap(),
            refine,
            ..OptimizerConfig::default()
        }
    }

    fn small_exchanger() -> TegHx {
        let mut hx = exchanger(FlowArrangement::Parallel);
        hx.geometry.nodes = 4;
        hx
    }

    #[test]
    fn design_round_trips_through_an_exchanger() {
        let hx = small_exchanger();
        let design = DesignVector {
            leg_area_ratio: 0.9,
            fill_fraction: 0.03,
            length: Length::new::<millimeter>(2.0),
            current: ElectricCurrent::new::<ampere>(3.0),
            spacing: None,
        };

        let applied = design.apply(&hx).unwrap();
        let read = DesignVector::from_exchanger(&applied);

        assert_relative_eq!(read.leg_area_ratio, 0.9, max_relative = 1e-12);
        assert_relative_eq!(read.fill_fraction, 0.03, max_relative = 1e-12);
        assert_relative_eq!(read.length.get::<millimeter>(), 2.0, max_relative = 1e-12);
        assert_eq!(read.current, design.current);
        assert_eq!(applied.pair.p_leg.material, Material::Hms);
        assert_eq!(applied.geometry, hx.geometry);
    }

    #[test]
    fn spacing_requires_an_enhancement() {
        let hx = small_exchanger();
        let design = DesignVector {
            spacing: Some(Length::new::<millimeter>(4.0)),
            ..DesignVector::default()
        };
        assert!(matches!(
            design.apply(&hx),
            Err(ConfigError::InvalidParameter {
                name: "exh.enh.spacing",
                ..
            })
        ));

        let mut finned = hx.clone();
        finned.exhaust.enhancement = Some(Enhancement::IdealFin(IdealFin {
            spacing: Length::new::<millimeter>(8.0),
            ..IdealFin::default()
        }));
        let applied = design.apply(&finned).unwrap();
        assert_eq!(
            applied.exhaust.enhancement.and_then(|e| e.spacing()),
            Some(Length::new::<millimeter>(4.0))
        );
    }

    #[test]
    fn parameters_carry_the_design() {
        let design = DesignVector {
            spacing: Some(Length::new::<centimeter>(0.5)),
            ..DesignVector::default()
        };
        let parameters = design.to_parameters();

        assert_eq!(parameters.len(), 5);
        assert_relative_eq!(parameters.scalar(LENGTH).unwrap(), 1e-3);
        assert_eq!(DesignVector::from_parameters(&parameters).unwrap(), design);
    }

    #[test]
    fn losing_designs_score_above_the_penalty() {
        assert_relative_eq!(inverse_net(4.0, 1e6), 0.25);
        assert!(inverse_net(0.0, 1e6) >= 1e6);
        assert!(inverse_net(-2.0, 1e6) > inverse_net(-1.0, 1e6));
    }

    #[test]
    fn retry_reports_the_point_it_solved() {
        let bounds = [
            Bounds::new(0.0, 10.0).unwrap(),
            Bounds::new(0.0, 2.0).unwrap(),
        ];
        let stalls_at_start = |x: &[f64]| {
            if x == [1.0, 2.0] {
                Err(SolveError::from(ConvergenceError::Node {
                    node: 0,
                    iters: 20,
                    residual: 0.5,
                }))
            } else {
                Ok(x[0] + x[1])
            }
        };

        let (solved, value) =
            solve_with_retry(&[1.0, 2.0], &bounds, 0.1, stalls_at_start).unwrap();

        assert_relative_eq!(solved[0], 1.1);
        assert_relative_eq!(solved[1], 2.0);
        assert_relative_eq!(value, 3.1);
    }

    #[test]
    fn retry_is_only_for_convergence_failures() {
        let bounds = [Bounds::new(0.0, 10.0).unwrap()];
        let calls = std::cell::Cell::new(0);
        let invalid = |_: &[f64]| -> Result<f64, SolveError> {
            calls.set(calls.get() + 1);
            Err(SolveError::from(ConfigError::invalid(
                "te_pair.fill_fraction",
                "too high",
            )))
        };

        assert!(matches!(
            solve_with_retry(&[1.0], &bounds, 0.1, invalid),
            Err(SolveError::Config(_))
        ));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn search_never_loses_to_its_start() {
        let hx = small_exchanger();
        let x0 = DesignVector::default();
        let start = x0.apply(&hx).unwrap().solve(&inlets()).unwrap().net_power();

        let outcome = optimize(&hx, &inlets(), x0, &quick_config(None)).unwrap();

        assert_eq!(outcome.stages.len(), 1);
        assert_eq!(outcome.stages[0].method, LegMethod::Analytical);
        assert!(outcome.net_power() >= start * (1.0 - 1e-12));
        assert_relative_eq!(
            1.0 / outcome.net_power().get::<watt>(),
            outcome.stages[0].objective,
            max_relative = 1e-9
        );
    }

    #[test]
    fn refinement_uses_numerical_legs() {
        let hx = small_exchanger();
        let config = OptimizerConfig {
            simplex: nelder_mead::Config::new(8, 0.05, 1e-4, 1e-12, 1e-6).unwrap(),
            ..quick_config(Some(NumericalConfig::default()))
        };

        let outcome = optimize(&hx, &inlets(), DesignVector::default(), &config).unwrap();

        assert_eq!(outcome.stages.len(), 2);
        assert!(outcome.stages[1].method.is_numerical());
        assert!(outcome.exchanger.pair.method.is_numerical());
        assert!(outcome.net_power() > Power::new::<watt>(0.0));
    }

    #[test]
    fn unsolvable_optimum_is_reported() {
        let mut hx = small_exchanger();
        hx.node = NodeConfig {
            fixed_point: ConvergenceLoop {
                max_iters: 2,
                tolerance: 0.0,
                warm_up: 2,
            },
            ..NodeConfig::default()
        };

        let err = optimize(&hx, &inlets(), DesignVector::default(), &quick_config(None))
            .unwrap_err();
        assert!(matches!(err, OptimizeError::Solve(e) if e.is_convergence()));
    }

    #[test]
    fn persisted_run_saves_the_best_design() {
        let dir = TempDir::new().unwrap();
        let store = ParameterStore::new(dir.path());
        let hx = small_exchanger();

        let outcome =
            optimize_persisted(&hx, &inlets(), &store, "bare", &quick_config(None)).unwrap();

        let saved = DesignVector::from_parameters(&store.load("bare").unwrap()).unwrap();
        assert_eq!(saved, outcome.design);
    }
}
