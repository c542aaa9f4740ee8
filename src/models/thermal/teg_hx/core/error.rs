use thiserror::Error;
use twine_solvers::equation::bisection;

use crate::support::constraint::NamedConstraintError;

/// An input that cannot describe a physical exchanger.
///
/// Raised before any solve starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown material: {name:?}")]
    UnknownMaterial { name: String },

    #[error("unknown enhancement: {name:?}")]
    UnknownEnhancement { name: String },

    #[error("unknown leg method: {name:?}")]
    UnknownLegMethod { name: String },

    #[error("invalid `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

impl From<NamedConstraintError> for ConfigError {
    fn from(error: NamedConstraintError) -> Self {
        Self::invalid(error.name, error.source.to_string())
    }
}

/// A state reached during solving that falls outside a model's validity.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("non-positive absolute temperature in {context}: {kelvin} K")]
    NonPositiveTemperature { context: &'static str, kelvin: f64 },

    #[error("{material} properties are non-physical at {kelvin} K")]
    NonPhysicalProperties { material: String, kelvin: f64 },

    #[error("flow is undefined: {context}")]
    UndefinedFlow { context: &'static str },

    #[error("non-physical result: {context}")]
    NonPhysical { context: String },
}

impl DomainError {
    pub(crate) fn non_physical(context: impl Into<String>) -> Self {
        Self::NonPhysical {
            context: context.into(),
        }
    }
}

/// An iterative solve that ran out of iterations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvergenceError {
    /// Shooting on the cold-face heat flux did not reach the hot-face temperature.
    #[error(
        "leg shooting stalled after {iters} iterations: hot-face error {residual} K (node {node:?})"
    )]
    Leg {
        iters: usize,
        residual: f64,
        node: Option<usize>,
    },

    /// The node fixed point on thermoelectric conductance did not settle.
    #[error("node {node} did not converge after {iters} iterations: relative change {residual}")]
    Node {
        node: usize,
        iters: usize,
        residual: f64,
    },

    /// The counter-flow coolant outlet search did not hit the coolant inlet.
    #[error(
        "counter-flow march did not converge after {iters} iterations: inlet error {residual} K"
    )]
    CounterFlow { iters: usize, residual: f64 },
}

/// Errors that can occur while solving a thermoelectric heat exchanger.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("outside model domain: {0}")]
    Domain(#[from] DomainError),

    #[error("no convergence: {0}")]
    Convergence(#[from] ConvergenceError),

    /// The counter-flow bisection solver encountered an error.
    #[error("bisection solver error")]
    Bisection(#[from] bisection::Error),
}

impl From<NamedConstraintError> for SolveError {
    fn from(error: NamedConstraintError) -> Self {
        Self::Config(error.into())
    }
}

impl SolveError {
    /// Tags a leg convergence failure with the node that triggered it.
    pub(crate) fn at_node(self, node: usize) -> Self {
        match self {
            Self::Convergence(ConvergenceError::Leg {
                iters, residual, ..
            }) => Self::Convergence(ConvergenceError::Leg {
                iters,
                residual,
                node: Some(node),
            }),
            other => other,
        }
    }

    /// Returns true if an iterative solve gave up.
    ///
    /// The optimizer retries these once with nudged parameters.
    #[must_use]
    pub fn is_convergence(&self) -> bool {
        matches!(self, Self::Convergence(_))
    }
}
