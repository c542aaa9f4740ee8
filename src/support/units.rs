//! Extensions to [`uom`].
//!
//! This crate uses [`uom`] for physical quantities at its public boundaries.
//! This module provides extensions that are useful for modeling but aren't
//! included in [`uom`].
//!
//! ## Temperature differences
//!
//! The [`TemperatureDifference`] trait provides a [`minus`](TemperatureDifference::minus) method
//! for subtracting one absolute temperature from another to get a temperature interval:
//!
//! ```
//! use uom::si::f64::ThermodynamicTemperature;
//! use uom::si::thermodynamic_temperature::kelvin;
//! use twine_teg::support::units::TemperatureDifference;
//!
//! let hot_face = ThermodynamicTemperature::new::<kelvin>(600.0);
//! let cold_face = ThermodynamicTemperature::new::<kelvin>(350.0);
//! let across_leg = hot_face.minus(cold_face);
//! // across_leg is a TemperatureInterval, not a ThermodynamicTemperature
//! ```

mod temperature_difference;

pub use temperature_difference::TemperatureDifference;
