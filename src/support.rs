//! Supporting utilities used by models.
//!
//! These modules are public because they are useful on their own, but their
//! APIs are not stable.

pub mod constraint;
pub mod convergence;
pub mod hx;
pub mod nelder_mead;
pub mod units;
