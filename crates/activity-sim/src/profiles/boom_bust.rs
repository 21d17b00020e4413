//! Training load state machine for the Boom-and-Bust runner.
//!
//! ```text
//!   Training ──overtrained──▶ Injured ──cooldown expired──▶ Recovering
//!       ▲                        ▲                              │
//!       └────────────────────────┴─────────overtrained──────────┘
//! ```
//!
//! Recovering is terminal unless the runner overtrains again. Guards are plain
//! functions so they can be checked without any random sampling.

use std::collections::BTreeMap;

use time::Weekday;

/// Length of the forced layoff after an injury, in days.
pub const INJURY_LAYOFF_DAYS: u32 = 21;

/// Week-over-week mileage growth above which the runner gets injured.
pub const OVERTRAINING_RATIO: f64 = 1.5;

/// Distance multiplier while recovering.
const RECOVERY_DISTANCE_FACTOR: f64 = 0.5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrainingState {
    #[default]
    Training,
    Injured,
    Recovering,
}

/// Events that drive [`TrainingState`] transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadEvent {
    /// Last week's mileage jumped too far over the week before.
    Overtrained,
    /// The injury layoff is over.
    CooldownExpired,
}

impl TrainingState {
    /// Transition table. Events that don't apply leave the state unchanged.
    pub fn on(self, event: LoadEvent) -> TrainingState {
        match (self, event) {
            (TrainingState::Training | TrainingState::Recovering, LoadEvent::Overtrained) => {
                TrainingState::Injured
            }
            (TrainingState::Injured, LoadEvent::CooldownExpired) => TrainingState::Recovering,
            (state, _) => state,
        }
    }
}

/// Overtraining guard. Weeks with no mileage never trigger it.
pub fn is_overtrained(last_week_km: f64, week_before_km: f64) -> bool {
    week_before_km > 0.0 && last_week_km > week_before_km * OVERTRAINING_RATIO
}

/// Cooldown guard.
pub fn cooldown_expired(remaining_days: u32) -> bool {
    remaining_days == 0
}

/// Outcome of the start-of-day check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayGate {
    /// The day proceeds to the normal run decision.
    Open,
    /// No run today.
    Rest,
}

/// Kilometers logged per ISO week. Weeks never logged read as zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeeklyMileage(BTreeMap<i32, f64>);

impl WeeklyMileage {
    pub fn get(&self, week: i32) -> f64 {
        self.0.get(&week).copied().unwrap_or(0.0)
    }

    pub fn add(&mut self, week: i32, km: f64) {
        *self.0.entry(week).or_insert(0.0) += km;
    }

    /// Total over all weeks.
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }
}

impl FromIterator<(i32, f64)> for WeeklyMileage {
    fn from_iter<I: IntoIterator<Item = (i32, f64)>>(iter: I) -> Self {
        let mut mileage = WeeklyMileage::default();
        for (week, km) in iter {
            mileage.add(week, km);
        }
        mileage
    }
}

/// Per-user training load: state, layoff counter and mileage history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingLoad {
    pub state: TrainingState,
    /// Days left in the current layoff; 0 when not injured.
    pub injury_cooldown: u32,
    pub weekly_mileage: WeeklyMileage,
}

impl TrainingLoad {
    /// Runs the start-of-day transitions.
    ///
    /// An injured runner burns one day of cooldown and rests. Otherwise, on
    /// Sundays, the two previous ISO weeks are compared and an overtrained
    /// runner becomes injured and rests.
    pub fn gate(&mut self, weekday: Weekday, iso_week: u8) -> DayGate {
        if self.state == TrainingState::Injured {
            self.injury_cooldown = self.injury_cooldown.saturating_sub(1);
            if cooldown_expired(self.injury_cooldown) {
                self.state = self.state.on(LoadEvent::CooldownExpired);
            }
            return DayGate::Rest;
        }

        if weekday == Weekday::Sunday {
            let week = i32::from(iso_week);
            let last_week = self.weekly_mileage.get(week - 1);
            let week_before = self.weekly_mileage.get(week - 2);

            if is_overtrained(last_week, week_before) {
                self.state = self.state.on(LoadEvent::Overtrained);
                self.injury_cooldown = INJURY_LAYOFF_DAYS;
                return DayGate::Rest;
            }
        }

        DayGate::Open
    }

    /// Multiplier applied to a run's distance in the current state.
    pub fn distance_factor(&self) -> f64 {
        match self.state {
            TrainingState::Recovering => RECOVERY_DISTANCE_FACTOR,
            TrainingState::Training | TrainingState::Injured => 1.0,
        }
    }

    /// Logs a completed run.
    pub fn record_run(&mut self, iso_week: u8, distance_km: f64) {
        self.weekly_mileage.add(i32::from(iso_week), distance_km);
    }
}
