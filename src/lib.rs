//! # twine-teg
//!
//! Thermoelectric generator heat exchanger models built on
//! [Twine](https://github.com/isentropic-dev/twine).
//!
//! The main entry point is [`models::thermal::teg_hx`]: a marched exhaust to
//! coolant heat exchanger with thermoelectric couples between the plates, and
//! an optimizer that tunes the couples for maximum net power.
//!
//! ## Crate layout
//!
//! - [`models`]: Domain-specific [`twine_core::Model`] implementations.
//! - [`support`]: Supporting utilities used by models.
//!
//! ## Support modules
//!
//! Modules in [`support`] are public because they are useful on their own:
//!
//! - [`support::hx`]: effectiveness-NTU relations for one exchanger node
//! - [`support::nelder_mead`]: bounded simplex minimization
//! - [`support::convergence`]: iteration caps and tolerance checks
//! - [`support::constraint`] and [`support::units`]: checked numbers and
//!   temperature differences
//!
//! Their APIs are not stable. Helpers used by a single model stay in that
//! model's private `core` module until a second user appears.

pub mod models;
pub mod support;
