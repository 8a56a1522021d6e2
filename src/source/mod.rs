//! Raw event sources.
//!
//! The publisher only depends on an `mpsc::Receiver<Event>`; this module
//! provides the synthetic generator used when running the service on its
//! own.

pub mod generator;

pub use generator::{EventGenerator, GeneratorConfig};
