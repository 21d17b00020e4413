//! Training plan phases for the Event-Driven Racer.

/// Race distance in kilometers.
pub const MARATHON_KM: f64 = 42.2;

/// Where a racer is relative to race day.
///
/// Phases are resolved from days-until-race in a fixed order; see
/// [`RacePhase::for_days_until`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RacePhase {
    /// More than a week after the race: light maintenance running.
    Maintenance,
    /// Race day and the following week: no running.
    Recovery,
    /// The race itself. Never produced, see [`RacePhase::for_days_until`].
    RaceDay,
    /// Last two weeks before the race.
    Taper,
    /// Twelve-week peak block with weekend long runs.
    Peak,
    /// Base building before the peak block.
    Base,
}

impl RacePhase {
    /// Resolves the phase for `days_until_race = race_day - day`.
    ///
    /// The recovery check runs before the race-day check and also matches
    /// zero, so [`RacePhase::RaceDay`] is unreachable. This ordering is the
    /// observed behavior of the generator and is kept as is.
    pub fn for_days_until(days_until_race: i64) -> Self {
        if days_until_race < -7 {
            RacePhase::Maintenance
        } else if days_until_race <= 0 {
            RacePhase::Recovery
        } else if days_until_race == 0 {
            RacePhase::RaceDay
        } else if days_until_race <= 14 {
            RacePhase::Taper
        } else if days_until_race <= 84 {
            RacePhase::Peak
        } else {
            RacePhase::Base
        }
    }

    /// Adjusts a raw sampled distance. `None` means no run.
    pub fn adjust_distance(self, distance_km: f64, is_weekend: bool) -> Option<f64> {
        match self {
            RacePhase::Maintenance => Some(distance_km * 0.4),
            RacePhase::Recovery => None,
            RacePhase::RaceDay => Some(MARATHON_KM),
            RacePhase::Taper => Some(distance_km * 0.6),
            RacePhase::Peak if is_weekend => Some(distance_km + 10.0),
            RacePhase::Peak | RacePhase::Base => Some(distance_km),
        }
    }
}
