use super::{Conditions, LegKernel, LegSolution, LegSolver, Profile};
use crate::models::thermal::teg_hx::core::SolveError;

/// Lumped-property leg: properties at the mean face temperature.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct Analytical;

impl LegSolver for Analytical {
    fn solve(&self, leg: &LegKernel, conditions: &Conditions) -> Result<LegSolution, SolveError> {
        let Conditions {
            current,
            t_hot,
            t_cold,
        } = *conditions;

        let props = leg.material.properties(0.5 * (t_hot + t_cold))?;
        let (k, alpha, rho) = (props.k, props.alpha, props.rho());
        let j = conditions.current_density(leg);
        let l = leg.length;

        // Conduction with uniform Joule heating gives a parabolic profile:
        // k T'' = -ρ j².
        let joule = rho * j * j / k;
        let slope = (t_hot - t_cold) / l + 0.5 * joule * l;

        let mut profile = Profile::with_capacity(leg.nodes);
        for x in leg.positions() {
            let t = t_cold + slope * x - 0.5 * joule * x * x;
            let dt_dx = slope - joule * x;
            let q = k * dt_dx + alpha * j * t;
            let v = -alpha * (t - t_cold) + rho * j * x;
            let r = rho * x / leg.area;
            profile.push(x, [t, q, v, r]);
        }

        Ok(profile.into_solution(leg, current, 0))
    }
}
