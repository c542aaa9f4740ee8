use tracing::debug;

use crate::{
    models::thermal::teg_hx::core::{ConvergenceError, DomainError, Material, SolveError},
    support::convergence::Verdict,
};

use super::{Conditions, LegKernel, LegSolution, LegSolver, NumericalConfig, Profile};

/// Shooting solver over the locally evaluated leg equations.
///
/// The state `[T, q, V, R]` is integrated from the cold face with fourth-order
/// Runge-Kutta. The unknown cold-face heat flux is adjusted by secant steps
/// until the integrated hot-face temperature matches its target.
#[derive(Debug, Clone, Copy)]
pub(super) struct Numerical {
    config: NumericalConfig,
}

impl Numerical {
    pub(super) fn new(config: NumericalConfig) -> Self {
        Self { config }
    }
}

impl LegSolver for Numerical {
    fn solve(&self, leg: &LegKernel, conditions: &Conditions) -> Result<LegSolution, SolveError> {
        let j = conditions.current_density(leg);
        let shoot = |q_cold: f64| integrate(leg, j, conditions.t_cold, q_cold);
        let miss = |profile: &Profile| profile.hot_face()[0] - conditions.t_hot;

        let mut tracker = self.config.shooting.tracker();

        let q0 = lumped_cold_flux(leg, conditions)?;
        let mut prev = (q0, shoot(q0)?);
        let mut prev_miss = miss(&prev.1);
        if prev_miss.abs() <= self.config.shooting.tolerance {
            return Ok(prev.1.into_solution(leg, conditions.current, 0));
        }

        let q1 = if q0 == 0.0 { 1.0 } else { 1.1 * q0 };
        let mut curr = (q1, shoot(q1)?);

        loop {
            let curr_miss = miss(&curr.1);
            debug!(
                q_cold = curr.0,
                hot_face_error = curr_miss,
                iter = tracker.iters(),
                "leg shooting"
            );

            match tracker.record(curr_miss) {
                Verdict::Converged => {
                    return Ok(curr.1.into_solution(leg, conditions.current, tracker.iters()));
                }
                Verdict::Exhausted | Verdict::NonFinite => {
                    return Err(ConvergenceError::Leg {
                        iters: tracker.iters(),
                        residual: tracker.residual(),
                        node: None,
                    }
                    .into());
                }
                Verdict::Continue => {}
            }

            let slope = (curr_miss - prev_miss) / (curr.0 - prev.0);
            if slope == 0.0 || !slope.is_finite() {
                return Err(ConvergenceError::Leg {
                    iters: tracker.iters(),
                    residual: curr_miss.abs(),
                    node: None,
                }
                .into());
            }

            let q_next = curr.0 - curr_miss / slope;
            prev_miss = curr_miss;
            prev = curr;
            curr = (q_next, shoot(q_next)?);
        }
    }
}

/// Cold-face flux of the lumped solution, used as the first shot.
fn lumped_cold_flux(leg: &LegKernel, conditions: &Conditions) -> Result<f64, DomainError> {
    let Conditions { t_hot, t_cold, .. } = *conditions;
    let props = leg.material.properties(0.5 * (t_hot + t_cold))?;
    let j = conditions.current_density(leg);
    Ok(props.alpha * t_cold * j
        + props.k * (t_hot - t_cold) / leg.length
        + 0.5 * props.rho() * j * j * leg.length)
}

/// Integrates from the cold face for a trial cold-face heat flux.
fn integrate(leg: &LegKernel, j: f64, t_cold: f64, q_cold: f64) -> Result<Profile, DomainError> {
    let positions = leg.positions();
    let mut profile = Profile::with_capacity(leg.nodes);

    let mut y = [t_cold, q_cold, 0.0, 0.0];
    profile.push(positions[0], y);

    for pair in positions.windows(2) {
        let h = pair[1] - pair[0];
        y = rk4_step(&leg.material, j, leg.area, y, h)?;
        profile.push(pair[1], y);
    }

    Ok(profile)
}

fn rk4_step(
    material: &Material,
    j: f64,
    area: f64,
    y: [f64; 4],
    h: f64,
) -> Result<[f64; 4], DomainError> {
    let shifted = |base: [f64; 4], k: [f64; 4], scale: f64| {
        let mut out = base;
        for (o, d) in out.iter_mut().zip(k) {
            *o += scale * d;
        }
        out
    };

    let k1 = derivatives(material, j, area, y)?;
    let k2 = derivatives(material, j, area, shifted(y, k1, 0.5 * h))?;
    let k3 = derivatives(material, j, area, shifted(y, k2, 0.5 * h))?;
    let k4 = derivatives(material, j, area, shifted(y, k3, h))?;

    let mut next = y;
    for i in 0..4 {
        next[i] += h / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
    }
    Ok(next)
}

/// Right-hand side of the leg equations with properties at the local temperature.
///
/// Thomson heat from a temperature-dependent Seebeck coefficient is neglected.
fn derivatives(
    material: &Material,
    j: f64,
    area: f64,
    [t, q, _, _]: [f64; 4],
) -> Result<[f64; 4], DomainError> {
    let props = material.properties(t)?;
    let (k, alpha, rho) = (props.k, props.alpha, props.rho());

    let dt = (q - alpha * j * t) / k;
    let dq = -rho * j * j * (1.0 + alpha * alpha * t / (rho * k)) + j * alpha * q / k;
    let dv = -alpha * dt + rho * j;
    let dr = rho / area;

    Ok([dt, dq, dv, dr])
}
