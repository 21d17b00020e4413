//! Persistence of generated activities.
//!
//! The [`ActivityWriter`] writes [`ActivityRecord`](crate::generators::ActivityRecord)s
//! as a flat CSV table, one row per activity.

mod writer;

pub use writer::{ActivityWriter, COLUMNS, OutputError};
