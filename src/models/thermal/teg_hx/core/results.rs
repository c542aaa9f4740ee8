//! Results types for a marched exchanger.

use uom::{
    ConstZero,
    si::{
        f64::{Power, ThermodynamicTemperature},
        power::watt,
        ratio::ratio,
        temperature_interval::kelvin as delta_kelvin,
        thermal_conductance::watt_per_kelvin,
        thermodynamic_temperature::kelvin,
    },
};

use crate::support::units::TemperatureDifference;

use super::{DomainError, FlowArrangement, Inlets, NodeResult};

/// Node results and totals for the whole exchanger.
///
/// Nodes are ordered from the exhaust inlet (0) to the exhaust outlet (N-1).
/// The coolant flows from node 0 to node N-1 in parallel flow and from node
/// N-1 to node 0 in counter flow.
#[derive(Debug, Clone, PartialEq)]
pub struct HxResults {
    pub arrangement: FlowArrangement,
    /// Inlet temperatures the exchanger was solved for.
    pub inlets: Inlets,
    pub exhaust_outlet: ThermodynamicTemperature,
    pub coolant_outlet: ThermodynamicTemperature,
    pub nodes: Vec<NodeResult>,
    pub heat_rate: Power,
    pub te_power: Power,
    pub exhaust_pumping_power: Power,
    pub coolant_pumping_power: Power,
    /// Heat the exhaust would give up cooling to the reference temperature.
    pub available_heat: Power,
    pub reference_temperature: ThermodynamicTemperature,
}

impl HxResults {
    /// Sums node results into exchanger totals.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError`] if `nodes` is empty or the exhaust inlet is not
    /// above the reference temperature.
    pub(super) fn from_nodes(
        arrangement: FlowArrangement,
        inlets: Inlets,
        reference_temperature: ThermodynamicTemperature,
        nodes: Vec<NodeResult>,
    ) -> Result<Self, DomainError> {
        let (Some(first), Some(last)) = (nodes.first(), nodes.last()) else {
            return Err(DomainError::non_physical("exchanger has no nodes"));
        };

        let lift = inlets
            .exhaust
            .minus(reference_temperature)
            .get::<delta_kelvin>();
        if !(lift > 0.0) {
            return Err(DomainError::non_physical(format!(
                "exhaust inlet is {lift} K above the reference temperature"
            )));
        }
        let c_exhaust = first.exhaust.capacitance_rate.get::<watt_per_kelvin>();

        let exhaust_outlet = last.exhaust_outlet;
        let coolant_outlet = match arrangement {
            FlowArrangement::Parallel => last.coolant_outlet,
            FlowArrangement::Counter => first.coolant_outlet,
        };

        let mut heat_rate = Power::ZERO;
        let mut te_power = Power::ZERO;
        let mut exhaust_pumping_power = Power::ZERO;
        let mut coolant_pumping_power = Power::ZERO;
        for node in &nodes {
            heat_rate += node.heat_rate;
            te_power += node.te_power;
            exhaust_pumping_power += node.exhaust.pumping_power;
            coolant_pumping_power += node.coolant.pumping_power;
        }

        Ok(Self {
            arrangement,
            inlets,
            exhaust_outlet,
            coolant_outlet,
            nodes,
            heat_rate,
            te_power,
            exhaust_pumping_power,
            coolant_pumping_power,
            available_heat: Power::new::<watt>(c_exhaust * lift),
            reference_temperature,
        })
    }

    /// Pumping power of both streams.
    #[must_use]
    pub fn pumping_power(&self) -> Power {
        self.exhaust_pumping_power + self.coolant_pumping_power
    }

    /// Electrical power minus pumping power.
    #[must_use]
    pub fn net_power(&self) -> Power {
        self.te_power - self.pumping_power()
    }

    /// Heat rate over available heat.
    #[must_use]
    pub fn effectiveness(&self) -> f64 {
        (self.heat_rate / self.available_heat).get::<ratio>()
    }

    /// Net power over heat rate.
    #[must_use]
    pub fn first_law_efficiency(&self) -> f64 {
        (self.net_power() / self.heat_rate).get::<ratio>()
    }

    /// Net power over available heat.
    #[must_use]
    pub fn modified_first_law_efficiency(&self) -> f64 {
        (self.net_power() / self.available_heat).get::<ratio>()
    }

    /// Flow exergy of the exhaust at each node's bulk temperature.
    ///
    /// `C (T − T₀ − T₀ ln(T / T₀))` with `T₀` the reference temperature.
    #[must_use]
    pub fn exhaust_availability(&self) -> Vec<Power> {
        let t0 = self.reference_temperature.get::<kelvin>();
        self.nodes
            .iter()
            .map(|node| {
                let c = node.exhaust.capacitance_rate.get::<watt_per_kelvin>();
                let t = node.exhaust_bulk().get::<kelvin>();
                Power::new::<watt>(c * (t - t0 - t0 * (t / t0).ln()))
            })
            .collect()
    }

    /// Node temperatures as `(exhaust, t_hot, t_cold, coolant)` bulk profiles in K.
    #[must_use]
    pub fn temperature_profiles(&self) -> [Vec<f64>; 4] {
        let collect = |f: fn(&NodeResult) -> ThermodynamicTemperature| -> Vec<f64> {
            self.nodes.iter().map(|n| f(n).get::<kelvin>()).collect()
        };
        [
            collect(NodeResult::exhaust_bulk),
            collect(|n| n.t_hot),
            collect(|n| n.t_cold),
            collect(NodeResult::coolant_bulk),
        ]
    }
}
