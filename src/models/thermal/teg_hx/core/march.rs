//! Streamwise march over the nodes.
//!
//! The exhaust enters node 0 and each node hands its outlet temperatures to
//! the next. In parallel flow the coolant inlet is known at node 0, so one
//! pass solves the exchanger. In counter flow the coolant enters at node N-1;
//! the march starts from a coolant outlet guess at node 0 and bisection
//! adjusts the guess until the marched coolant inlet matches the real one.

mod config;
mod problem;

pub use config::MarchConfig;

use tracing::{debug, info};
use twine_solvers::equation::bisection;
use uom::si::{f64::ThermodynamicTemperature, power::watt, thermodynamic_temperature::kelvin};

use crate::support::hx::arrangement::ParallelFlow;

use super::{
    ConvergenceError, DomainError, FlowArrangement, HxResults, Inlets, SolveError, TegHx,
    traits::MarchingArrangement,
};

use problem::{CoolantInletProblem, CounterFlowModel};

/// Node results of one march with the coolant inlet it arrived at.
#[derive(Debug, Clone)]
struct Marched {
    results: HxResults,
    coolant_inlet: ThermodynamicTemperature,
}

/// Solves the exchanger for a pair of inlet temperatures.
///
/// # Errors
///
/// Returns [`SolveError`] on invalid configuration, inlets that cannot drive
/// heat from exhaust to coolant, any failed node, or a counter-flow search
/// that does not converge.
pub(super) fn solve(hx: &TegHx, inlets: &Inlets) -> Result<HxResults, SolveError> {
    hx.validate()?;
    check_inlets(inlets)?;

    let results = match hx.arrangement {
        FlowArrangement::Parallel => march::<ParallelFlow>(hx, inlets, inlets.coolant)?.results,
        FlowArrangement::Counter => counter_flow(hx, inlets)?,
    };

    info!(
        arrangement = ?results.arrangement,
        nodes = results.nodes.len(),
        heat_rate = results.heat_rate.get::<watt>(),
        te_power = results.te_power.get::<watt>(),
        pumping_power = results.pumping_power().get::<watt>(),
        net_power = results.net_power().get::<watt>(),
        "exchanger solved"
    );

    Ok(results)
}

fn check_inlets(inlets: &Inlets) -> Result<(), DomainError> {
    let (exhaust, coolant) = (inlets.exhaust.get::<kelvin>(), inlets.coolant.get::<kelvin>());
    for (context, value) in [("exhaust inlet", exhaust), ("coolant inlet", coolant)] {
        if !(value > 0.0) {
            return Err(DomainError::NonPositiveTemperature {
                context,
                kelvin: value,
            });
        }
    }
    if exhaust <= coolant {
        return Err(DomainError::non_physical(format!(
            "exhaust inlet {exhaust} K is not above coolant inlet {coolant} K"
        )));
    }
    Ok(())
}

/// Bisects on the coolant outlet between the two inlet temperatures.
fn counter_flow(hx: &TegHx, inlets: &Inlets) -> Result<HxResults, SolveError> {
    let model = CounterFlowModel::new(hx, inlets);
    let problem = CoolantInletProblem::new(inlets.coolant);

    let solution = bisection::solve(
        &model,
        &problem,
        [inlets.coolant.get::<kelvin>(), inlets.exhaust.get::<kelvin>()],
        &hx.march.bisection(),
        |event: &bisection::Event<'_, _, _>| {
            // An outlet guess near the exhaust inlet leaves no temperature
            // difference to drive the modules. Those marches fail, and the
            // outlet is too hot.
            if event.result().is_err() {
                return Some(bisection::Action::assume_positive());
            }
            None
        },
    )?;

    if solution.status != bisection::Status::Converged {
        return Err(ConvergenceError::CounterFlow {
            iters: solution.iters,
            residual: solution.residual,
        }
        .into());
    }

    Ok(solution.snapshot.output.results)
}

/// Marches every node once from the known coolant temperature at node 0.
fn march<A: MarchingArrangement>(
    hx: &TegHx,
    inlets: &Inlets,
    t_coolant_face: ThermodynamicTemperature,
) -> Result<Marched, SolveError> {
    let stack = hx.node_stack()?;

    let mut nodes = Vec::with_capacity(hx.geometry.nodes);
    let mut t_exhaust = inlets.exhaust.get::<kelvin>();
    let mut t_coolant = t_coolant_face.get::<kelvin>();

    for index in 0..hx.geometry.nodes {
        let node = stack.solve::<A>(index, t_exhaust, t_coolant)?;
        debug!(
            node = index,
            iters = node.iters,
            heat_rate = node.heat_rate.get::<watt>(),
            t_hot = node.t_hot.get::<kelvin>(),
            t_cold = node.t_cold.get::<kelvin>(),
            "node solved"
        );

        t_exhaust = node.exhaust_outlet.get::<kelvin>();
        t_coolant = A::coolant_select(node.coolant_outlet, node.coolant_inlet).get::<kelvin>();
        nodes.push(node);
    }

    let coolant_inlet = A::coolant_select(t_coolant_face.get::<kelvin>(), t_coolant);
    let arrangement = A::coolant_select(FlowArrangement::Parallel, FlowArrangement::Counter);
    let results = HxResults::from_nodes(arrangement, *inlets, hx.reference_temperature, nodes)?;

    Ok(Marched {
        results,
        coolant_inlet: ThermodynamicTemperature::new::<kelvin>(coolant_inlet),
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use uom::si::{
        f64::MassRate, mass_rate::kilogram_per_second,
        temperature_interval::kelvin as delta_kelvin,
    };

    use crate::support::units::TemperatureDifference;

    use super::{
        super::{
            NodeResult,
            test_support::{exchanger, inlets},
        },
        *,
    };

    fn temps(results: &HxResults, f: fn(&NodeResult) -> ThermodynamicTemperature) -> Vec<f64> {
        results.nodes.iter().map(|n| f(n).get::<kelvin>()).collect()
    }

    #[test]
    fn parallel_flow_heats_coolant_along_the_exchanger() {
        let results = exchanger(FlowArrangement::Parallel).solve(&inlets()).unwrap();

        let coolant = temps(&results, |n| n.coolant_outlet);
        let exhaust = temps(&results, |n| n.exhaust_outlet);
        assert!(coolant.windows(2).all(|w| w[1] > w[0]));
        assert!(exhaust.windows(2).all(|w| w[1] < w[0]));
        assert_relative_eq!(results.nodes[0].coolant_inlet.get::<kelvin>(), 300.0);
    }

    #[test]
    fn counter_flow_coolant_falls_with_node_index() {
        let results = exchanger(FlowArrangement::Counter).solve(&inlets()).unwrap();

        let coolant = temps(&results, |n| n.coolant_outlet);
        assert!(coolant.windows(2).all(|w| w[1] < w[0]));
        assert_eq!(results.coolant_outlet, results.nodes[0].coolant_outlet);

        // The march closes on the configured coolant inlet at the far end.
        let last = results.nodes.last().unwrap();
        assert_relative_eq!(last.coolant_inlet.get::<kelvin>(), 300.0, epsilon = 1e-5);
    }

    #[test]
    fn stream_gap_closes_faster_in_parallel_flow() {
        let gap_ratio = |arrangement| {
            let mut hx = exchanger(arrangement);
            hx.coolant.mass_rate = MassRate::new::<kilogram_per_second>(0.01);
            let results = hx.solve(&inlets()).unwrap();

            let gap = |n: &NodeResult| {
                n.exhaust_bulk()
                    .minus(n.coolant_bulk())
                    .get::<delta_kelvin>()
            };
            gap(&results.nodes[7]) / gap(&results.nodes[0])
        };

        let parallel = gap_ratio(FlowArrangement::Parallel);
        let counter = gap_ratio(FlowArrangement::Counter);
        assert!(parallel < 1.0 && counter < 1.0);
        assert!(counter > parallel);
    }

    #[test]
    fn repeated_solves_are_identical() {
        let hx = exchanger(FlowArrangement::Counter);
        let first = hx.solve(&inlets()).unwrap();
        let second = hx.solve(&inlets()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn inverted_inlets_are_a_domain_error() {
        let hot_coolant = Inlets {
            exhaust: ThermodynamicTemperature::new::<kelvin>(300.0),
            coolant: ThermodynamicTemperature::new::<kelvin>(350.0),
        };
        let err = exchanger(FlowArrangement::Parallel).solve(&hot_coolant).unwrap_err();
        assert!(matches!(err, SolveError::Domain(DomainError::NonPhysical { .. })));
    }

    #[test]
    fn non_positive_inlet_is_named() {
        let frozen = Inlets {
            exhaust: ThermodynamicTemperature::new::<kelvin>(800.0),
            coolant: ThermodynamicTemperature::new::<kelvin>(0.0),
        };
        let err = exchanger(FlowArrangement::Parallel).solve(&frozen).unwrap_err();
        assert!(matches!(
            err,
            SolveError::Domain(DomainError::NonPositiveTemperature {
                context: "coolant inlet",
                kelvin: value,
            }) if value == 0.0
        ));
    }

    #[test]
    fn counter_flow_search_reports_exhaustion() {
        let mut hx = exchanger(FlowArrangement::Counter);
        hx.march.max_iters = 2;

        let err = hx.solve(&inlets()).unwrap_err();
        assert!(matches!(
            err,
            SolveError::Convergence(ConvergenceError::CounterFlow { .. })
        ));
    }
}
