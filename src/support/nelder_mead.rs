//! Bounded Nelder-Mead simplex search for multi-variable minimization.
//!
//! # Algorithm
//!
//! The search keeps `n + 1` vertices in an `n`-dimensional space, repeatedly
//! replacing the worst vertex by reflecting it through the centroid of the
//! others. Successful reflections are expanded, failed ones are contracted,
//! and if nothing helps the whole simplex shrinks toward the best vertex.
//! Every trial point is clamped into its [`Bounds`] before evaluation.
//!
//! # When to Use
//!
//! - The objective is cheap enough to evaluate a few hundred times
//! - Derivatives are unavailable, as with a marched heat exchanger
//! - The variables have natural lower and upper limits
//!
//! Objective values that are `NaN` are treated as `+∞`, so a failed
//! evaluation steers the simplex away without aborting the search.

mod config;
mod error;
mod solution;

pub use config::{Bounds, Config, ConfigError};
pub use error::Error;
pub use solution::{Solution, Status};

/// Minimizes `objective` starting from `x0`.
///
/// `x0` is projected into `bounds` before the initial simplex is built. The
/// initial simplex offsets one coordinate per vertex by
/// [`Config::initial_step`] times that coordinate's bounds width.
///
/// # Errors
///
/// Returns an error if `x0` is empty or its length differs from `bounds`.
pub fn minimize<F>(
    mut objective: F,
    x0: &[f64],
    bounds: &[Bounds],
    config: &Config,
) -> Result<Solution, Error>
where
    F: FnMut(&[f64]) -> f64,
{
    let n = x0.len();
    if n == 0 {
        return Err(Error::Empty);
    }
    if bounds.len() != n {
        return Err(Error::DimensionMismatch {
            x0: n,
            bounds: bounds.len(),
        });
    }

    let mut evals = 0;
    let mut eval = |x: &[f64]| {
        evals += 1;
        let value = objective(x);
        if value.is_nan() { f64::INFINITY } else { value }
    };

    let start = project(x0, bounds);
    let mut simplex: Vec<Vertex> = Vec::with_capacity(n + 1);
    simplex.push(Vertex::new(start.clone(), eval(&start)));
    for (i, b) in bounds.iter().enumerate() {
        let mut x = start.clone();
        let step = config.initial_step() * b.width();
        x[i] = if x[i] + step <= b.upper {
            x[i] + step
        } else {
            x[i] - step
        };
        let value = eval(&x);
        simplex.push(Vertex::new(x, value));
    }

    let mut iters = 0;
    let status = loop {
        simplex.sort_by(|a, b| a.value.total_cmp(&b.value));

        if has_converged(&simplex, bounds, config) {
            break Status::Converged;
        }
        if iters >= config.max_iters() {
            break Status::MaxIters;
        }
        iters += 1;

        let centroid = centroid(&simplex[..n]);
        let worst = &simplex[n];
        let second_worst = simplex[n - 1].value;
        let best = simplex[0].value;

        let reflected = project(&affine(&centroid, &worst.x, -ALPHA), bounds);
        let f_reflected = eval(&reflected);

        if f_reflected < best {
            let expanded = project(&affine(&centroid, &reflected, GAMMA), bounds);
            let f_expanded = eval(&expanded);
            simplex[n] = if f_expanded < f_reflected {
                Vertex::new(expanded, f_expanded)
            } else {
                Vertex::new(reflected, f_reflected)
            };
            continue;
        }

        if f_reflected < second_worst {
            simplex[n] = Vertex::new(reflected, f_reflected);
            continue;
        }

        let (contracted, threshold) = if f_reflected < worst.value {
            (affine(&centroid, &reflected, RHO), f_reflected)
        } else {
            (affine(&centroid, &worst.x, RHO), worst.value)
        };
        let contracted = project(&contracted, bounds);
        let f_contracted = eval(&contracted);
        if f_contracted < threshold {
            simplex[n] = Vertex::new(contracted, f_contracted);
            continue;
        }

        let anchor = simplex[0].x.clone();
        for vertex in &mut simplex[1..] {
            let x = project(&affine(&anchor, &vertex.x, SIGMA), bounds);
            let value = eval(&x);
            *vertex = Vertex::new(x, value);
        }
    };

    let best = simplex.swap_remove(0);
    Ok(Solution {
        status,
        x: best.x,
        objective: best.value,
        iters,
        evals,
    })
}

const ALPHA: f64 = 1.0;
const GAMMA: f64 = 2.0;
const RHO: f64 = 0.5;
const SIGMA: f64 = 0.5;

#[derive(Debug, Clone)]
struct Vertex {
    x: Vec<f64>,
    value: f64,
}

impl Vertex {
    fn new(x: Vec<f64>, value: f64) -> Self {
        Self { x, value }
    }
}

/// Returns `origin + t * (target - origin)`.
fn affine(origin: &[f64], target: &[f64], t: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(target)
        .map(|(o, x)| o + t * (x - o))
        .collect()
}

fn centroid(vertices: &[Vertex]) -> Vec<f64> {
    let n = vertices.len() as f64;
    let dim = vertices[0].x.len();
    (0..dim)
        .map(|j| vertices.iter().map(|v| v.x[j]).sum::<f64>() / n)
        .collect()
}

fn project(x: &[f64], bounds: &[Bounds]) -> Vec<f64> {
    x.iter().zip(bounds).map(|(&v, b)| b.clamp(v)).collect()
}

fn has_converged(sorted: &[Vertex], bounds: &[Bounds], config: &Config) -> bool {
    let best = &sorted[0];

    let x_spread = sorted[1..]
        .iter()
        .flat_map(|v| {
            v.x.iter()
                .zip(&best.x)
                .zip(bounds)
                .map(|((x, x_best), b)| (x - x_best).abs() / b.width())
        })
        .fold(0.0, f64::max);

    let f_spread = sorted[1..]
        .iter()
        .map(|v| (v.value - best.value).abs())
        .fold(0.0, f64::max);

    x_spread <= config.x_rel_tol()
        && f_spread <= config.f_abs_tol() + config.f_rel_tol() * best.value.abs()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn tight() -> Config {
        Config::new(2000, 0.05, 1e-9, 1e-14, 1e-12).unwrap()
    }

    #[test]
    fn coupled_quadratic() {
        let objective = |x: &[f64]| {
            let (a, b) = (x[0] - 0.3, x[1] + 0.2);
            a * a + 10.0 * b * b + a * b
        };
        let bounds = [Bounds::new(-2.0, 2.0).unwrap(); 2];

        let solution = minimize(objective, &[1.0, 1.0], &bounds, &tight()).unwrap();

        assert_eq!(solution.status, Status::Converged);
        assert_relative_eq!(solution.x[0], 0.3, epsilon = 1e-4);
        assert_relative_eq!(solution.x[1], -0.2, epsilon = 1e-4);
        assert!(solution.objective < 1e-8);
    }

    #[test]
    fn optimum_outside_bounds_lands_on_the_boundary() {
        let objective = |x: &[f64]| (x[0] - 3.0).powi(2) + x[1] * x[1];
        let bounds = [
            Bounds::new(0.0, 1.0).unwrap(),
            Bounds::new(-1.0, 1.0).unwrap(),
        ];

        let solution = minimize(objective, &[0.5, 0.5], &bounds, &tight()).unwrap();

        assert_relative_eq!(solution.x[0], 1.0, epsilon = 1e-4);
        assert_relative_eq!(solution.x[1], 0.0, epsilon = 1e-3);
    }

    #[test]
    fn start_is_projected_into_bounds() {
        let mut first = None;
        let objective = |x: &[f64]| {
            first.get_or_insert(x[0]);
            x[0]
        };
        let bounds = [Bounds::new(0.2, 1.5).unwrap()];

        let _ = minimize(objective, &[7.0], &bounds, &Config::default()).unwrap();

        assert_eq!(first, Some(1.5));
    }

    #[test]
    fn nan_objective_is_avoided() {
        let objective = |x: &[f64]| {
            if x[0] > 0.5 {
                f64::NAN
            } else {
                (x[0] - 0.4).powi(2)
            }
        };
        let bounds = [Bounds::new(0.0, 1.0).unwrap()];

        let solution = minimize(objective, &[0.1], &bounds, &tight()).unwrap();

        assert_relative_eq!(solution.x[0], 0.4, epsilon = 1e-4);
    }

    #[test]
    fn reports_max_iters() {
        let config = Config::new(3, 0.05, 0.0, 0.0, 0.0).unwrap();
        let bounds = [Bounds::new(-1.0, 1.0).unwrap(); 3];

        let solution = minimize(|x| x.iter().map(|v| v * v).sum(), &[0.9; 3], &bounds, &config)
            .unwrap();

        assert_eq!(solution.status, Status::MaxIters);
        assert_eq!(solution.iters, 3);
        assert!(solution.evals >= 4 + 3);
    }

    #[test]
    fn mismatched_dimensions() {
        let bounds = [Bounds::new(0.0, 1.0).unwrap()];

        assert!(matches!(
            minimize(|_| 0.0, &[0.5, 0.5], &bounds, &Config::default()),
            Err(Error::DimensionMismatch { x0: 2, bounds: 1 })
        ));
        assert!(matches!(
            minimize(|_| 0.0, &[], &[], &Config::default()),
            Err(Error::Empty)
        ));
    }
}
