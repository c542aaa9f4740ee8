//! Effectiveness-NTU toolkit.
//!
//! Every node of a thermoelectric heat exchanger is treated as a small
//! two-stream exchanger. This module provides the pieces needed for that:
//!
//! - **Core types**: [`CapacitanceRate`], [`NodeStreams`], [`Effectiveness`], [`Ntu`]
//! - **Flow arrangements**: [`CounterFlow`], [`ParallelFlow`]
//!
//! # Example
//!
//! ```
//! use twine_teg::support::constraint::ConstraintResult;
//! use twine_teg::support::hx::{
//!     CapacitanceRate, CounterFlow, EffectivenessRelation, NodeStreams, Ntu,
//! };
//! use uom::si::{ratio::ratio, thermal_conductance::watt_per_kelvin};
//!
//! fn main() -> ConstraintResult<()> {
//!     let exhaust = CapacitanceRate::new::<watt_per_kelvin>(75.0)?;
//!     let coolant = CapacitanceRate::new::<watt_per_kelvin>(4179.0)?;
//!
//!     let streams = NodeStreams::new(exhaust, coolant);
//!     let effectiveness = CounterFlow.effectiveness(Ntu::new(0.2)?, streams);
//!     assert!(effectiveness.get::<ratio>() > 0.18);
//!
//!     Ok(())
//! }
//! ```

pub mod arrangement;
mod effectiveness_ntu;
mod streams;

pub use arrangement::{CounterFlow, ParallelFlow};
pub use effectiveness_ntu::{Effectiveness, EffectivenessRelation, Ntu};
pub use streams::{CapacitanceRate, NodeStreams};
