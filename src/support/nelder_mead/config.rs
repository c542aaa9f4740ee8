use thiserror::Error;

/// Configuration for the Nelder-Mead search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    max_iters: usize,
    initial_step: f64,
    x_rel_tol: f64,
    f_abs_tol: f64,
    f_rel_tol: f64,
}

/// Errors that can occur when validating a search config or bounds.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("initial_step must be finite and in (0, 1]")]
    InitialStep,

    #[error("x_rel_tol must be finite and non-negative")]
    XRel,

    #[error("f_abs_tol must be finite and non-negative")]
    FAbs,

    #[error("f_rel_tol must be finite and non-negative")]
    FRel,

    #[error("bounds must be finite with lower < upper")]
    Bounds,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(400, 0.05, 1e-4, 1e-12, 1e-6).unwrap()
    }
}

impl Config {
    /// Creates a new config with validated settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the step is outside (0, 1] or any tolerance is
    /// negative or non-finite.
    pub fn new(
        max_iters: usize,
        initial_step: f64,
        x_rel_tol: f64,
        f_abs_tol: f64,
        f_rel_tol: f64,
    ) -> Result<Self, ConfigError> {
        if !initial_step.is_finite() || initial_step <= 0.0 || initial_step > 1.0 {
            return Err(ConfigError::InitialStep);
        }
        if !x_rel_tol.is_finite() || x_rel_tol < 0.0 {
            return Err(ConfigError::XRel);
        }
        if !f_abs_tol.is_finite() || f_abs_tol < 0.0 {
            return Err(ConfigError::FAbs);
        }
        if !f_rel_tol.is_finite() || f_rel_tol < 0.0 {
            return Err(ConfigError::FRel);
        }

        Ok(Self {
            max_iters,
            initial_step,
            x_rel_tol,
            f_abs_tol,
            f_rel_tol,
        })
    }

    /// Returns the maximum number of simplex iterations.
    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    /// Returns the initial simplex offset as a fraction of each bounds width.
    #[must_use]
    pub fn initial_step(&self) -> f64 {
        self.initial_step
    }

    /// Returns the vertex spread tolerance, relative to each bounds width.
    #[must_use]
    pub fn x_rel_tol(&self) -> f64 {
        self.x_rel_tol
    }

    /// Returns the absolute tolerance on objective spread.
    #[must_use]
    pub fn f_abs_tol(&self) -> f64 {
        self.f_abs_tol
    }

    /// Returns the relative tolerance on objective spread.
    #[must_use]
    pub fn f_rel_tol(&self) -> f64 {
        self.f_rel_tol
    }
}

/// Closed search interval for one variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub(crate) lower: f64,
    pub(crate) upper: f64,
}

impl Bounds {
    /// Creates bounds `[lower, upper]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Bounds`] unless both ends are finite and
    /// `lower < upper`.
    pub fn new(lower: f64, upper: f64) -> Result<Self, ConfigError> {
        if !lower.is_finite() || !upper.is_finite() || lower >= upper {
            return Err(ConfigError::Bounds);
        }
        Ok(Self { lower, upper })
    }

    #[must_use]
    pub fn lower(&self) -> f64 {
        self.lower
    }

    #[must_use]
    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub(crate) fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub(crate) fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.lower, self.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_settings() {
        assert_eq!(Config::new(10, 0.0, 0.0, 0.0, 0.0), Err(ConfigError::InitialStep));
        assert_eq!(Config::new(10, 0.1, -1.0, 0.0, 0.0), Err(ConfigError::XRel));
        assert_eq!(Config::new(10, 0.1, 0.0, f64::NAN, 0.0), Err(ConfigError::FAbs));
        assert_eq!(Config::new(10, 0.1, 0.0, 0.0, f64::INFINITY), Err(ConfigError::FRel));
    }

    #[test]
    fn bounds_must_be_ordered() {
        assert!(Bounds::new(0.0005, 0.01).is_ok());
        assert_eq!(Bounds::new(1.0, 1.0), Err(ConfigError::Bounds));
        assert_eq!(Bounds::new(0.0, f64::INFINITY), Err(ConfigError::Bounds));
    }
}
