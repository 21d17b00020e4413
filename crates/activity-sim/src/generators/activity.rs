//! Daily activity generation.
//!
//! [`ActivityGenerator::step`] simulates one user for one day: the training
//! load gate, the run/no-run draw, base stat sampling, the persona behavior
//! rule, and the physical plausibility floors.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;
use time::{Date, Duration, Weekday};

use crate::config::ConfigError;
use crate::generators::user::UserState;
use crate::profiles::{DayContext, DayGate, PersonaKind, PersonaSpec, RunStats, registry};

/// Shortest distance an emitted activity can have (km).
pub const MIN_DISTANCE_KM: f64 = 1.0;

/// Fastest pace an emitted activity can have (min/km).
pub const MIN_PACE_MIN_PER_KM: f64 = 3.0;

/// One simulated run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityRecord {
    /// `act_<user_id>_<day>`
    pub activity_id: String,
    pub user_id: u64,
    pub persona: PersonaKind,
    pub activity_date: Date,
    pub distance_km: f64,
    pub pace_min_per_km: f64,
    pub moving_time_sec: u64,
}

impl ActivityRecord {
    /// Builds a record from final (already floored) stats.
    fn new(user: &UserState, day: u32, activity_date: Date, stats: RunStats) -> Self {
        Self {
            activity_id: format!("act_{}_{day}", user.user_id),
            user_id: user.user_id,
            persona: user.persona,
            activity_date,
            distance_km: stats.distance_km,
            pace_min_per_km: stats.pace_min_per_km,
            moving_time_sec: moving_time_sec(stats.pace_min_per_km, stats.distance_km),
        }
    }
}

/// Moving time in whole seconds for a run at `pace_min_per_km` over `distance_km`.
pub fn moving_time_sec(pace_min_per_km: f64, distance_km: f64) -> u64 {
    (pace_min_per_km * 60.0 * distance_km).round() as u64
}

/// Distance and pace distributions for one persona.
#[derive(Debug, Clone, Copy)]
struct RunSampler {
    distance: Normal<f64>,
    pace: Normal<f64>,
}

impl RunSampler {
    fn for_spec(spec: &PersonaSpec) -> Result<Self, ConfigError> {
        let distance = Normal::new(spec.dist_mean, spec.dist_std).map_err(|source| {
            ConfigError::InvalidDistribution {
                persona: spec.kind,
                what: "distance",
                source,
            }
        })?;
        let pace = Normal::new(spec.pace_mean, spec.pace_std).map_err(|source| {
            ConfigError::InvalidDistribution {
                persona: spec.kind,
                what: "pace",
                source,
            }
        })?;
        Ok(Self { distance, pace })
    }

    /// Distance is drawn first, then pace.
    fn sample(&self, rng: &mut impl Rng) -> RunStats {
        let distance_km = self.distance.sample(rng);
        let pace_min_per_km = self.pace.sample(rng);
        RunStats {
            distance_km,
            pace_min_per_km,
        }
    }
}

/// Simulates users day by day.
pub struct ActivityGenerator {
    /// Indexed by [`PersonaKind::index`].
    samplers: Vec<RunSampler>,
}

impl ActivityGenerator {
    /// Creates a generator for every persona in the registry.
    pub fn new() -> Result<Self, ConfigError> {
        let samplers = registry()
            .iter()
            .map(RunSampler::for_spec)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { samplers })
    }

    /// Simulates day `day` for `user`, returning the run if one happened.
    ///
    /// May update the user's training load. No randomness is consumed on days
    /// the training load gate forces a rest.
    pub fn step(
        &self,
        user: &mut UserState,
        day: u32,
        rng: &mut impl Rng,
    ) -> Option<ActivityRecord> {
        let current_date = user.start_date + Duration::days(i64::from(day));
        let weekday = current_date.weekday();
        let is_weekend = matches!(weekday, Weekday::Saturday | Weekday::Sunday);
        let current_week = current_date.iso_week();

        if user.persona == PersonaKind::BoomAndBust
            && user.training.gate(weekday, current_week) == DayGate::Rest
        {
            return None;
        }

        let spec = user.persona.spec();
        if rng.r#gen::<f64>() >= spec.run_probability(is_weekend) {
            return None;
        }

        let raw = self.samplers[user.persona.index()].sample(rng);

        let ctx = DayContext {
            day,
            is_weekend,
            race_day: user.race_day,
        };
        let mut stats = user.persona.modify(&ctx, raw)?;
        stats.distance_km *= user.training.distance_factor();

        let stats = RunStats {
            distance_km: stats.distance_km.max(MIN_DISTANCE_KM),
            pace_min_per_km: stats.pace_min_per_km.max(MIN_PACE_MIN_PER_KM),
        };
        let record = ActivityRecord::new(user, day, current_date, stats);

        if user.persona == PersonaKind::BoomAndBust {
            user.training.record_run(current_week, stats.distance_km);
        }

        Some(record)
    }

    /// Simulates `days` consecutive days for one user.
    pub fn simulate_user(
        &self,
        user: &mut UserState,
        days: u32,
        rng: &mut impl Rng,
    ) -> Vec<ActivityRecord> {
        (0..days)
            .filter_map(|day| self.step(user, day, rng))
            .collect()
    }
}
