//! One streamwise slice of the exchanger.
//!
//! A node couples the two flow sides, the plate walls and a patch of
//! thermoelectric modules through a series resistance network. The module
//! conductance depends on the face temperatures, which in turn depend on the
//! heat rate, so the node iterates on the module conductance until it settles:
//!
//! ```text
//! GuessBoundaryTemps -> SolveLayers -> CheckConvergence -> Converged
//!                            ^                 |        -> Failed
//!                            +-----------------+
//! ```

use tracing::debug;
use uom::si::{
    area::square_meter,
    f64::{
        Area, ElectricCurrent, HeatTransfer, Length, Power, TemperatureInterval,
        ThermalConductance, ThermodynamicTemperature,
    },
    heat_transfer::watt_per_square_meter_kelvin,
    power::watt,
    ratio::ratio,
    temperature_interval::kelvin as delta_kelvin,
    thermal_conductance::watt_per_kelvin,
    thermodynamic_temperature::kelvin,
};

use crate::support::{
    convergence::{ConvergenceLoop, Verdict},
    hx::{NodeStreams, Ntu},
    units::TemperatureDifference,
};

use super::{
    ConvergenceError, DomainError, FlowSide, FlowSolution, PairSolution, SolveError,
    ThermoelectricPair, traits::MarchingArrangement,
};

/// Settings for the node fixed point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeConfig {
    /// Iteration control on the relative change of the module conductance.
    ///
    /// The first pass has nothing to compare against, so `warm_up` must be at
    /// least 2.
    pub fixed_point: ConvergenceLoop,
    /// Exhaust temperature drop assumed across a node before the first solve.
    pub exhaust_drop_guess: TemperatureInterval,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            fixed_point: ConvergenceLoop {
                max_iters: 20,
                tolerance: 0.01,
                warm_up: 2,
            },
            exhaust_drop_guess: TemperatureInterval::new::<delta_kelvin>(5.0),
        }
    }
}

/// Solved state of one node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeResult {
    pub index: usize,
    pub exhaust_inlet: ThermodynamicTemperature,
    pub exhaust_outlet: ThermodynamicTemperature,
    pub coolant_inlet: ThermodynamicTemperature,
    pub coolant_outlet: ThermodynamicTemperature,
    /// Hot face of the modules.
    pub t_hot: ThermodynamicTemperature,
    /// Cold face of the modules.
    pub t_cold: ThermodynamicTemperature,
    /// Heat leaving the exhaust, equal to the heat reaching the coolant.
    pub heat_rate: Power,
    pub h_exhaust: HeatTransfer,
    pub h_wall: HeatTransfer,
    pub h_te: HeatTransfer,
    pub h_coolant: HeatTransfer,
    /// Overall coefficient of the series network.
    pub u: HeatTransfer,
    pub ntu: f64,
    pub effectiveness: f64,
    /// Electrical power of all couples in the node.
    pub te_power: Power,
    /// Plate area of the node.
    pub area: Area,
    pub exhaust: FlowSolution,
    pub coolant: FlowSolution,
    pub pair: PairSolution,
    pub iters: usize,
}

impl NodeResult {
    #[must_use]
    pub fn exhaust_bulk(&self) -> ThermodynamicTemperature {
        mean(self.exhaust_inlet, self.exhaust_outlet)
    }

    #[must_use]
    pub fn coolant_bulk(&self) -> ThermodynamicTemperature {
        mean(self.coolant_inlet, self.coolant_outlet)
    }

    /// Temperature difference across the modules.
    #[must_use]
    pub fn module_delta_t(&self) -> TemperatureInterval {
        self.t_hot.minus(self.t_cold)
    }

    #[must_use]
    pub fn pumping_power(&self) -> Power {
        self.exhaust.pumping_power + self.coolant.pumping_power
    }

    /// Number of couples that fit on the node plate.
    #[must_use]
    pub fn couples(&self) -> f64 {
        (self.area / self.pair.module_area).get::<ratio>()
    }
}

fn mean(a: ThermodynamicTemperature, b: ThermodynamicTemperature) -> ThermodynamicTemperature {
    ThermodynamicTemperature::new::<kelvin>(0.5 * (a.get::<kelvin>() + b.get::<kelvin>()))
}

/// Everything a node needs besides its face temperatures.
#[derive(Debug, Clone, Copy)]
pub(super) struct NodeStack<'a> {
    pub(super) exhaust: &'a FlowSide,
    pub(super) coolant: &'a FlowSide,
    pub(super) pair: &'a ThermoelectricPair,
    pub(super) current: ElectricCurrent,
    pub(super) h_wall: HeatTransfer,
    pub(super) area: Area,
    pub(super) node_length: Length,
    pub(super) config: NodeConfig,
}

/// Temperatures assumed by one pass through the layers, raw kelvin.
#[derive(Debug, Clone, Copy)]
struct Guess {
    t_exhaust_out: f64,
    t_coolant_far: f64,
    t_hot: f64,
    t_cold: f64,
}

/// Layer solutions from one pass, raw SI.
#[derive(Debug)]
struct Layers {
    exhaust: FlowSolution,
    coolant: FlowSolution,
    pair: PairSolution,
    u: f64,
    ntu: f64,
    effectiveness: f64,
    heat_rate: f64,
}

enum State {
    GuessBoundaryTemps,
    SolveLayers(Guess),
    CheckConvergence { next: Guess, layers: Layers },
    Converged(Layers),
    Failed(ConvergenceError),
}

impl NodeStack<'_> {
    /// Solves node `index` from the temperatures at its exhaust-inlet face.
    ///
    /// `t_coolant_face` is the coolant inlet in parallel flow and the coolant
    /// outlet in counter flow.
    pub(super) fn solve<A: MarchingArrangement>(
        &self,
        index: usize,
        t_exhaust_in: f64,
        t_coolant_face: f64,
    ) -> Result<NodeResult, SolveError> {
        let mut tracker = self.config.fixed_point.tracker();
        let mut h_te_previous: Option<f64> = None;
        let mut state = State::GuessBoundaryTemps;

        loop {
            state = match state {
                State::GuessBoundaryTemps => {
                    let drop = self.config.exhaust_drop_guess.get::<delta_kelvin>();
                    let t_exhaust_out = t_exhaust_in - drop;
                    State::SolveLayers(Guess {
                        t_exhaust_out,
                        t_coolant_far: t_coolant_face,
                        t_hot: 0.5 * (t_exhaust_in + t_exhaust_out),
                        t_cold: t_coolant_face,
                    })
                }

                State::SolveLayers(guess) => {
                    let layers =
                        self.solve_layers::<A>(index, t_exhaust_in, t_coolant_face, guess)?;
                    let next = self.next_guess::<A>(t_exhaust_in, t_coolant_face, &layers);
                    State::CheckConvergence { next, layers }
                }

                State::CheckConvergence { next, layers } => {
                    let h_te = layers
                        .pair
                        .h_effective
                        .get::<watt_per_square_meter_kelvin>();
                    let residual = h_te_previous
                        .map_or(f64::INFINITY, |previous| (h_te - previous) / previous);
                    h_te_previous = Some(h_te);

                    debug!(
                        node = index,
                        iter = tracker.iters() + 1,
                        h_te,
                        heat_rate = layers.heat_rate,
                        residual,
                        "node iteration"
                    );

                    match tracker.record(residual) {
                        Verdict::Continue => State::SolveLayers(next),
                        Verdict::Converged => State::Converged(layers),
                        Verdict::Exhausted | Verdict::NonFinite => {
                            State::Failed(ConvergenceError::Node {
                                node: index,
                                iters: tracker.iters(),
                                residual: tracker.residual(),
                            })
                        }
                    }
                }

                State::Converged(layers) => {
                    return Ok(self.result::<A>(
                        index,
                        t_exhaust_in,
                        t_coolant_face,
                        layers,
                        tracker.iters(),
                    ));
                }

                State::Failed(error) => return Err(error.into()),
            };
        }
    }

    fn solve_layers<A: MarchingArrangement>(
        &self,
        index: usize,
        t_exhaust_in: f64,
        t_coolant_face: f64,
        guess: Guess,
    ) -> Result<Layers, SolveError> {
        let exhaust = self.exhaust.solve(
            ThermodynamicTemperature::new::<kelvin>(0.5 * (t_exhaust_in + guess.t_exhaust_out)),
            self.node_length,
        )?;
        let coolant = self.coolant.solve(
            ThermodynamicTemperature::new::<kelvin>(0.5 * (t_coolant_face + guess.t_coolant_far)),
            self.node_length,
        )?;
        let pair = self
            .pair
            .solve(
                self.current,
                ThermodynamicTemperature::new::<kelvin>(guess.t_hot),
                ThermodynamicTemperature::new::<kelvin>(guess.t_cold),
            )
            .map_err(|e| e.at_node(index))?;

        let resistance = 1.0 / exhaust.h.get::<watt_per_square_meter_kelvin>()
            + 2.0 / self.h_wall.get::<watt_per_square_meter_kelvin>()
            + 1.0 / pair.h_effective.get::<watt_per_square_meter_kelvin>()
            + 1.0 / coolant.h.get::<watt_per_square_meter_kelvin>();
        let u = 1.0 / resistance;

        let streams = NodeStreams::new(exhaust.capacitance_rate, coolant.capacitance_rate);
        let ua = ThermalConductance::new::<watt_per_kelvin>(u * self.area.get::<square_meter>());
        let ntu = Ntu::from_conductance(ua, streams)
            .map_err(|e| DomainError::non_physical(format!("node NTU: {e}")))?;
        let effectiveness = A::default().effectiveness(ntu, streams).get::<ratio>();

        let heat_rate = A::heat_rate(
            effectiveness,
            streams.c_min().get::<watt_per_kelvin>(),
            streams.coolant.get::<watt_per_kelvin>(),
            t_exhaust_in,
            t_coolant_face,
        )?;

        Ok(Layers {
            exhaust,
            coolant,
            pair,
            u,
            ntu: ntu.get::<ratio>(),
            effectiveness,
            heat_rate,
        })
    }

    /// Re-derives the module face temperatures from the heat rate.
    fn next_guess<A: MarchingArrangement>(
        &self,
        t_exhaust_in: f64,
        t_coolant_face: f64,
        layers: &Layers,
    ) -> Guess {
        let (t_exhaust_out, t_coolant_far) =
            self.outlets::<A>(t_exhaust_in, t_coolant_face, layers);

        let flux = layers.heat_rate / self.area.get::<square_meter>();
        let r_wall = 1.0 / self.h_wall.get::<watt_per_square_meter_kelvin>();
        let r_exhaust = 1.0 / layers.exhaust.h.get::<watt_per_square_meter_kelvin>();
        let r_coolant = 1.0 / layers.coolant.h.get::<watt_per_square_meter_kelvin>();

        Guess {
            t_exhaust_out,
            t_coolant_far,
            t_hot: 0.5 * (t_exhaust_in + t_exhaust_out) - flux * (r_exhaust + r_wall),
            t_cold: 0.5 * (t_coolant_face + t_coolant_far) + flux * (r_wall + r_coolant),
        }
    }

    /// Exhaust outlet and far-face coolant temperature for a heat rate.
    fn outlets<A: MarchingArrangement>(
        &self,
        t_exhaust_in: f64,
        t_coolant_face: f64,
        layers: &Layers,
    ) -> (f64, f64) {
        let c_exhaust = layers.exhaust.capacitance_rate.get::<watt_per_kelvin>();
        let c_coolant = layers.coolant.capacitance_rate.get::<watt_per_kelvin>();
        (
            t_exhaust_in - layers.heat_rate / c_exhaust,
            A::coolant_far_face(t_coolant_face, layers.heat_rate, c_coolant),
        )
    }

    fn result<A: MarchingArrangement>(
        &self,
        index: usize,
        t_exhaust_in: f64,
        t_coolant_face: f64,
        layers: Layers,
        iters: usize,
    ) -> NodeResult {
        let (t_exhaust_out, t_coolant_far) =
            self.outlets::<A>(t_exhaust_in, t_coolant_face, &layers);
        let (t_coolant_in, t_coolant_out) = A::coolant_inlet_outlet(t_coolant_face, t_coolant_far);
        let couples = (self.area / layers.pair.module_area).get::<ratio>();

        NodeResult {
            index,
            exhaust_inlet: ThermodynamicTemperature::new::<kelvin>(t_exhaust_in),
            exhaust_outlet: ThermodynamicTemperature::new::<kelvin>(t_exhaust_out),
            coolant_inlet: ThermodynamicTemperature::new::<kelvin>(t_coolant_in),
            coolant_outlet: ThermodynamicTemperature::new::<kelvin>(t_coolant_out),
            t_hot: layers.pair.t_hot,
            t_cold: layers.pair.t_cold,
            heat_rate: Power::new::<watt>(layers.heat_rate),
            h_exhaust: layers.exhaust.h,
            h_wall: self.h_wall,
            h_te: layers.pair.h_effective,
            h_coolant: layers.coolant.h,
            u: HeatTransfer::new::<watt_per_square_meter_kelvin>(layers.u),
            ntu: layers.ntu,
            effectiveness: layers.effectiveness,
            te_power: layers.pair.power * couples,
            area: self.area,
            exhaust: layers.exhaust,
            coolant: layers.coolant,
            pair: layers.pair,
            iters,
        }
    }
}
