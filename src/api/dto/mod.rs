//! Data Transfer Objects for REST response serialization.
//!
//! Amounts keep their pipeline representation: reference-currency totals
//! are integer smallest units, per-currency totals are display units.

pub mod stats_dto;

pub use stats_dto::*;
