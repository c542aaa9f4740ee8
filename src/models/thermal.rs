//! Thermal systems models.
//!
//! This module contains models for thermal systems, currently a heat
//! exchanger with thermoelectric generators between its plates.

pub mod teg_hx;
