use uom::si::{
    f64::{TemperatureInterval, ThermodynamicTemperature},
    temperature_interval::kelvin as delta_kelvin,
    thermodynamic_temperature::kelvin as abs_kelvin,
};

/// Extension trait for computing temperature differences.
///
/// This trait provides a [`minus`](Self::minus) method that subtracts two
/// [`ThermodynamicTemperature`] values (absolute temperatures) and returns a
/// [`TemperatureInterval`] (temperature difference).
///
/// For background on this distinction and why this extension is needed:
/// [#380](https://github.com/iliekturtles/uom/issues/380),
/// [#289](https://github.com/iliekturtles/uom/issues/289),
/// [#403](https://github.com/iliekturtles/uom/issues/403).
///
/// [`TemperatureInterval`]: uom::si::f64::TemperatureInterval
/// [`ThermodynamicTemperature`]: uom::si::f64::ThermodynamicTemperature
pub trait TemperatureDifference {
    /// Returns the temperature difference `self - other`.
    fn minus(self, other: Self) -> TemperatureInterval;
}

impl TemperatureDifference for ThermodynamicTemperature {
    fn minus(self, other: Self) -> TemperatureInterval {
        TemperatureInterval::new::<delta_kelvin>(
            self.get::<abs_kelvin>() - other.get::<abs_kelvin>(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        f64::ThermodynamicTemperature,
        temperature_interval::{degree_celsius as delta_celsius, kelvin as delta_kelvin},
        thermodynamic_temperature::{degree_celsius, kelvin as abs_kelvin},
    };

    #[test]
    fn leg_face_difference() {
        let cold_face = ThermodynamicTemperature::new::<abs_kelvin>(350.0);
        let hot_face = ThermodynamicTemperature::new::<abs_kelvin>(600.0);

        assert_relative_eq!(hot_face.minus(cold_face).get::<delta_kelvin>(), 250.0);
        assert_relative_eq!(cold_face.minus(hot_face).get::<delta_celsius>(), -250.0);
    }

    #[test]
    fn mixed_scales_agree() {
        let exhaust = ThermodynamicTemperature::new::<degree_celsius>(526.85);
        let coolant = ThermodynamicTemperature::new::<abs_kelvin>(300.0);

        assert_relative_eq!(
            exhaust.minus(coolant).get::<delta_kelvin>(),
            500.0,
            epsilon = 1e-9
        );
    }
}
