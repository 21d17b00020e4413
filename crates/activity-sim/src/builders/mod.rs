//! Fluent builder APIs for simulation runs.
//!
//! The [`SimulationBuilder`] is the driver loop: it creates every user and
//! steps each one through the simulated days.

mod simulation;

pub use simulation::{SimulationBuilder, SimulationMetrics, SimulationResult};
