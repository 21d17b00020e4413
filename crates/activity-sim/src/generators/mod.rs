//! Entity generators for the simulation.
//!
//! - [`UserGenerator`]: assign personas, start dates and initial state
//! - [`ActivityGenerator`]: step a user through one simulated day

pub mod activity;
pub mod user;

pub use activity::{ActivityGenerator, ActivityRecord, moving_time_sec};
pub use user::{UserGenerator, UserState};
