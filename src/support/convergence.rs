//! Fixed-point iteration control.
//!
//! Several solvers in this crate repeat a calculation until some residual
//! settles: the node solver iterates on the thermoelectric conductance and the
//! numerical leg solver shoots on the cold-face heat flux. [`ConvergenceLoop`]
//! holds the shared settings and hands out a [`Tracker`] that decides, after
//! each iteration, whether to keep going.
//!
//! ```
//! use twine_teg::support::convergence::{ConvergenceLoop, Verdict};
//!
//! let settings = ConvergenceLoop {
//!     max_iters: 20,
//!     tolerance: 1e-9,
//!     warm_up: 2,
//! };
//!
//! let mut tracker = settings.tracker();
//! let mut x: f64 = 1.0;
//! let verdict = loop {
//!     let next = 0.5 * (x + 2.0 / x);
//!     let residual = ((next - x) / x).abs();
//!     x = next;
//!
//!     match tracker.record(residual) {
//!         Verdict::Continue => continue,
//!         done => break done,
//!     }
//! };
//!
//! assert_eq!(verdict, Verdict::Converged);
//! assert!((x - 2.0_f64.sqrt()).abs() < 1e-6);
//! ```

/// Settings shared by every fixed-point loop in the crate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceLoop {
    /// Maximum number of iterations before giving up.
    pub max_iters: usize,
    /// Residual at or below which the loop is converged.
    pub tolerance: f64,
    /// Number of leading iterations whose residual is never accepted.
    ///
    /// With a warm-up of 2 the earliest possible exit is after the second
    /// iteration, comparing it with the first.
    pub warm_up: usize,
}

impl ConvergenceLoop {
    /// Starts tracking a new loop.
    #[must_use]
    pub fn tracker(&self) -> Tracker {
        Tracker {
            settings: *self,
            iters: 0,
            residual: f64::INFINITY,
        }
    }
}

/// What the caller should do after recording an iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Iterate again.
    Continue,
    /// The residual is within tolerance.
    Converged,
    /// The iteration budget is spent without meeting the tolerance.
    Exhausted,
    /// The residual became `NaN` or infinite after warm-up.
    NonFinite,
}

/// Per-loop iteration state produced by [`ConvergenceLoop::tracker`].
#[derive(Debug, Clone, Copy)]
pub struct Tracker {
    settings: ConvergenceLoop,
    iters: usize,
    residual: f64,
}

impl Tracker {
    /// Records the residual of one completed iteration.
    ///
    /// The sign of the residual is ignored.
    pub fn record(&mut self, residual: f64) -> Verdict {
        self.iters += 1;
        self.residual = residual.abs();

        let warming_up = self.iters < self.settings.warm_up;

        if !warming_up {
            if !self.residual.is_finite() {
                return Verdict::NonFinite;
            }
            if self.residual <= self.settings.tolerance {
                return Verdict::Converged;
            }
        }

        if self.iters >= self.settings.max_iters {
            Verdict::Exhausted
        } else {
            Verdict::Continue
        }
    }

    /// Number of iterations recorded so far.
    #[must_use]
    pub fn iters(&self) -> usize {
        self.iters
    }

    /// Most recently recorded residual magnitude.
    #[must_use]
    pub fn residual(&self) -> f64 {
        self.residual
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(max_iters: usize, warm_up: usize) -> ConvergenceLoop {
        ConvergenceLoop {
            max_iters,
            tolerance: 0.01,
            warm_up,
        }
    }

    #[test]
    fn converges_immediately_without_warm_up() {
        let mut tracker = settings(10, 0).tracker();

        assert_eq!(tracker.record(0.001), Verdict::Converged);
        assert_eq!(tracker.iters(), 1);
    }

    #[test]
    fn warm_up_ignores_early_residuals() {
        let mut tracker = settings(10, 2).tracker();

        assert_eq!(tracker.record(f64::INFINITY), Verdict::Continue);
        assert_eq!(tracker.record(0.001), Verdict::Converged);
        assert_eq!(tracker.iters(), 2);
    }

    #[test]
    fn warm_up_suppresses_an_early_small_residual() {
        let mut tracker = settings(10, 3).tracker();

        assert_eq!(tracker.record(0.0), Verdict::Continue);
        assert_eq!(tracker.record(0.0), Verdict::Continue);
        assert_eq!(tracker.record(0.0), Verdict::Converged);
    }

    #[test]
    fn exhausts_the_budget() {
        let mut tracker = settings(3, 0).tracker();

        assert_eq!(tracker.record(0.5), Verdict::Continue);
        assert_eq!(tracker.record(0.4), Verdict::Continue);
        assert_eq!(tracker.record(0.3), Verdict::Exhausted);
        assert!((tracker.residual() - 0.3).abs() < 1e-15);
    }

    #[test]
    fn negative_residuals_use_magnitude() {
        let mut tracker = settings(5, 0).tracker();

        assert_eq!(tracker.record(-0.5), Verdict::Continue);
        assert_eq!(tracker.record(-0.005), Verdict::Converged);
    }

    #[test]
    fn nan_after_warm_up_is_reported() {
        let mut tracker = settings(5, 1).tracker();

        assert_eq!(tracker.record(f64::NAN), Verdict::NonFinite);
    }
}
