//! CSV export of generated activities.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use time::Date;
use tracing::{debug, info};

use crate::generators::ActivityRecord;
use crate::profiles::PersonaKind;

/// Output columns, in order.
pub const COLUMNS: [&str; 7] = [
    "activity_id",
    "user_id",
    "persona",
    "activity_date",
    "distance_km",
    "pace_min_km",
    "moving_time_sec",
];

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One output row. Distance and pace are rounded to hundredths here only;
/// records keep full precision.
#[derive(Serialize)]
struct CsvRow<'a> {
    activity_id: &'a str,
    user_id: u64,
    persona: PersonaKind,
    activity_date: Date,
    distance_km: f64,
    pace_min_km: f64,
    moving_time_sec: u64,
}

impl<'a> From<&'a ActivityRecord> for CsvRow<'a> {
    fn from(record: &'a ActivityRecord) -> Self {
        Self {
            activity_id: &record.activity_id,
            user_id: record.user_id,
            persona: record.persona,
            activity_date: record.activity_date,
            distance_km: round_hundredths(record.distance_km),
            pace_min_km: round_hundredths(record.pace_min_per_km),
            moving_time_sec: record.moving_time_sec,
        }
    }
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rows written between progress log lines.
const PROGRESS_INTERVAL: usize = 5_000;

/// Writes activities as CSV.
pub struct ActivityWriter;

impl ActivityWriter {
    pub fn new() -> Self {
        Self
    }

    /// Writes the header and one row per activity. Returns the row count.
    pub fn write<W: Write>(
        &self,
        activities: &[ActivityRecord],
        out: W,
    ) -> Result<usize, OutputError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(out);

        writer.write_record(COLUMNS)?;

        for (i, activity) in activities.iter().enumerate() {
            writer.serialize(CsvRow::from(activity))?;

            if (i + 1) % PROGRESS_INTERVAL == 0 {
                debug!("Wrote {}/{} activities", i + 1, activities.len());
            }
        }

        writer.flush()?;
        Ok(activities.len())
    }

    /// Creates (or truncates) `path` and writes the activities to it.
    pub fn write_to_path(
        &self,
        activities: &[ActivityRecord],
        path: impl AsRef<Path>,
    ) -> Result<usize, OutputError> {
        let path = path.as_ref();
        info!("Writing {} activities to {}", activities.len(), path.display());

        let file = File::create(path)?;
        let rows = self.write(activities, BufWriter::new(file))?;

        info!("Wrote {rows} activities to {}", path.display());
        Ok(rows)
    }
}

impl Default for ActivityWriter {
    fn default() -> Self {
        Self::new()
    }
}
