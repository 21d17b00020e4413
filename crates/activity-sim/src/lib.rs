//! Synthetic running activity generation.
//!
//! This crate simulates users following one of five runner personas, day by
//! day, and produces a labeled table of running activities for analytics and
//! model development without touching real user data.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use activity_sim::prelude::*;
//!
//! let result = SimulationBuilder::new()
//!     .with_users(250)
//!     .with_days(120)
//!     .with_seed(12345)
//!     .build()?;
//!
//! ActivityWriter::new().write_to_path(&result.activities, "activities.csv")?;
//! ```

pub mod builders;
pub mod config;
pub mod generators;
pub mod output;
pub mod profiles;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::builders::{SimulationBuilder, SimulationMetrics, SimulationResult};
    pub use crate::config::{ConfigError, DEFAULT_START_DATE, SimulationConfig};
    pub use crate::generators::{ActivityGenerator, ActivityRecord, UserGenerator, UserState};
    pub use crate::output::{ActivityWriter, OutputError};
    pub use crate::profiles::{PersonaKind, PersonaSpec, TrainingState, lookup, registry};
}
