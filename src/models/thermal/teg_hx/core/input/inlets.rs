use uom::si::f64::ThermodynamicTemperature;

/// Inlet temperatures of the two streams.
///
/// In counter flow the coolant inlet is at the far end of the exchanger,
/// next to the exhaust outlet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inlets {
    pub exhaust: ThermodynamicTemperature,
    pub coolant: ThermodynamicTemperature,
}
