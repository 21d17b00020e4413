//! Runner personas.
//!
//! A persona bundles run probabilities, distance and pace distributions, and a
//! behavior rule. The registry is a constant table indexed by [`PersonaKind`];
//! behavior rules are dispatched in one place by [`PersonaKind::modify`].

mod boom_bust;
mod racer;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

pub use boom_bust::{
    DayGate, INJURY_LAYOFF_DAYS, LoadEvent, OVERTRAINING_RATIO, TrainingLoad, TrainingState,
    WeeklyMileage, cooldown_expired, is_overtrained,
};
pub use racer::{MARATHON_KM, RacePhase};

// Baseline parameters, taken from a real runner's activity history.
pub const BASE_DIST_MEAN: f64 = 8.47;
pub const BASE_DIST_STD: f64 = 5.51;
pub const BASE_PACE_MEAN: f64 = 4.77; // ~4:45/km
pub const BASE_PACE_STD: f64 = 0.60;

/// Pace improvement per simulated day for the Consistent Trainer (min/km).
pub const FITNESS_GAIN_PER_DAY: f64 = 0.0015;

/// First day on which the Lapsed Newcomer no longer runs.
pub const CHURN_DAY: u32 = 28;

/// The five archetypal runners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PersonaKind {
    /// Steady, frequent schedule with gradual fitness gains.
    #[serde(rename = "Consistent Trainer")]
    ConsistentTrainer,
    /// Mostly weekend long runs.
    #[serde(rename = "Weekend Warrior")]
    WeekendWarrior,
    /// Enthusiastic start, drops off completely after four weeks.
    #[serde(rename = "Lapsed Newcomer")]
    LapsedNewcomer,
    /// Build-up, taper and post-race slump around a single race.
    #[serde(rename = "Event-Driven Racer")]
    EventDrivenRacer,
    /// Ramps up too fast, gets injured, comes back tentatively.
    #[serde(rename = "Boom-and-Bust")]
    BoomAndBust,
}

impl PersonaKind {
    /// All personas in registry order.
    pub const ALL: [PersonaKind; 5] = [
        PersonaKind::ConsistentTrainer,
        PersonaKind::WeekendWarrior,
        PersonaKind::LapsedNewcomer,
        PersonaKind::EventDrivenRacer,
        PersonaKind::BoomAndBust,
    ];

    /// Display name, as written to the output table.
    pub fn name(self) -> &'static str {
        match self {
            PersonaKind::ConsistentTrainer => "Consistent Trainer",
            PersonaKind::WeekendWarrior => "Weekend Warrior",
            PersonaKind::LapsedNewcomer => "Lapsed Newcomer",
            PersonaKind::EventDrivenRacer => "Event-Driven Racer",
            PersonaKind::BoomAndBust => "Boom-and-Bust",
        }
    }

    /// Position in [`REGISTRY`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Generative parameters for this persona.
    pub fn spec(self) -> &'static PersonaSpec {
        &REGISTRY[self.index()]
    }

    /// Applies this persona's behavior rule to a day's raw sampled stats.
    ///
    /// Returns `None` when the rule decides there is no run today. That is a
    /// normal outcome, not an error.
    pub fn modify(self, ctx: &DayContext, stats: RunStats) -> Option<RunStats> {
        match self {
            PersonaKind::ConsistentTrainer => Some(RunStats {
                pace_min_per_km: stats.pace_min_per_km - f64::from(ctx.day) * FITNESS_GAIN_PER_DAY,
                ..stats
            }),
            PersonaKind::WeekendWarrior => Some(stats),
            PersonaKind::LapsedNewcomer => (ctx.day < CHURN_DAY).then_some(stats),
            PersonaKind::EventDrivenRacer => RacePhase::for_days_until(ctx.days_until_race())
                .adjust_distance(stats.distance_km, ctx.is_weekend)
                .map(|distance_km| RunStats {
                    distance_km,
                    ..stats
                }),
            // Load is handled by the training state machine, not here.
            PersonaKind::BoomAndBust => Some(stats),
        }
    }
}

impl fmt::Display for PersonaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PersonaKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PersonaKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ConfigError::UnknownPersona(s.to_string()))
    }
}

/// Generative parameters for one persona.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersonaSpec {
    pub kind: PersonaKind,
    /// Probability of a run on Monday-Friday.
    pub run_prob_weekday: f64,
    /// Probability of a run on Saturday or Sunday.
    pub run_prob_weekend: f64,
    /// Raw distance distribution (km).
    pub dist_mean: f64,
    pub dist_std: f64,
    /// Raw pace distribution (min/km).
    pub pace_mean: f64,
    pub pace_std: f64,
}

impl PersonaSpec {
    pub fn run_probability(&self, is_weekend: bool) -> f64 {
        if is_weekend {
            self.run_prob_weekend
        } else {
            self.run_prob_weekday
        }
    }
}

/// Persona parameters, in [`PersonaKind::ALL`] order.
pub static REGISTRY: [PersonaSpec; 5] = [
    PersonaSpec {
        kind: PersonaKind::ConsistentTrainer,
        run_prob_weekday: 0.45, // ~3 weekday runs
        run_prob_weekend: 0.6,
        dist_mean: BASE_DIST_MEAN,
        dist_std: BASE_DIST_STD,
        pace_mean: BASE_PACE_MEAN,
        pace_std: BASE_PACE_STD,
    },
    PersonaSpec {
        kind: PersonaKind::WeekendWarrior,
        run_prob_weekday: 0.1,
        run_prob_weekend: 0.8,
        dist_mean: BASE_DIST_MEAN + 4.0, // long run focus, ~12.5km
        dist_std: BASE_DIST_STD + 1.5,
        pace_mean: BASE_PACE_MEAN + 0.2,
        pace_std: BASE_PACE_STD,
    },
    PersonaSpec {
        kind: PersonaKind::LapsedNewcomer,
        run_prob_weekday: 0.6,
        run_prob_weekend: 0.5,
        dist_mean: BASE_DIST_MEAN - 4.0, // beginner distance, ~4.5km
        dist_std: BASE_DIST_STD * 0.5,
        pace_mean: BASE_PACE_MEAN + 1.2, // ~6:00/km
        pace_std: BASE_PACE_STD * 0.8,
    },
    PersonaSpec {
        kind: PersonaKind::EventDrivenRacer,
        run_prob_weekday: 0.5,
        run_prob_weekend: 0.7,
        dist_mean: BASE_DIST_MEAN,
        dist_std: BASE_DIST_STD,
        pace_mean: BASE_PACE_MEAN - 0.25, // ~4:30/km
        pace_std: BASE_PACE_STD * 0.9,
    },
    PersonaSpec {
        kind: PersonaKind::BoomAndBust,
        run_prob_weekday: 0.7,
        run_prob_weekend: 0.8,
        dist_mean: BASE_DIST_MEAN - 2.0,
        dist_std: BASE_DIST_STD * 0.7,
        pace_mean: BASE_PACE_MEAN,
        pace_std: BASE_PACE_STD,
    },
];

/// The whole registry.
pub fn registry() -> &'static [PersonaSpec] {
    &REGISTRY
}

/// Looks up a persona by display name.
pub fn lookup(name: &str) -> Result<&'static PersonaSpec, ConfigError> {
    name.parse::<PersonaKind>().map(PersonaKind::spec)
}

/// What a behavior rule knows about the day being simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayContext {
    /// Day index since the user's start date.
    pub day: u32,
    pub is_weekend: bool,
    /// Race day index (only meaningful for the racer).
    pub race_day: u32,
}

impl DayContext {
    /// Negative once the race is over.
    pub fn days_until_race(&self) -> i64 {
        i64::from(self.race_day) - i64::from(self.day)
    }
}

/// Distance and pace for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunStats {
    pub distance_km: f64,
    pub pace_min_per_km: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(day: u32) -> DayContext {
        DayContext {
            day,
            is_weekend: false,
            race_day: 90,
        }
    }

    const STATS: RunStats = RunStats {
        distance_km: 8.0,
        pace_min_per_km: 5.0,
    };

    #[test]
    fn test_registry_order_matches_kinds() {
        assert_eq!(registry().len(), 5);
        for kind in PersonaKind::ALL {
            assert_eq!(kind.spec().kind, kind);
        }
    }

    #[test]
    fn test_registry_parameters_are_valid() {
        for spec in registry() {
            assert!((0.0..=1.0).contains(&spec.run_prob_weekday));
            assert!((0.0..=1.0).contains(&spec.run_prob_weekend));
            assert!(spec.dist_std > 0.0);
            assert!(spec.pace_std > 0.0);
        }
    }

    #[test]
    fn test_lookup_by_name() {
        let spec = lookup("Weekend Warrior").unwrap();
        assert_eq!(spec.kind, PersonaKind::WeekendWarrior);
        assert!((spec.dist_mean - 12.47).abs() < 1e-9);
        assert_eq!(spec.run_probability(true), 0.8);
        assert_eq!(spec.run_probability(false), 0.1);
    }

    #[test]
    fn test_lookup_unknown_name() {
        assert!(matches!(
            lookup("Marathon Monk"),
            Err(ConfigError::UnknownPersona(_))
        ));
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for kind in PersonaKind::ALL {
            assert_eq!(kind.to_string().parse::<PersonaKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_consistent_trainer_gets_faster() {
        let out = PersonaKind::ConsistentTrainer
            .modify(&ctx(100), STATS)
            .unwrap();
        assert!((out.pace_min_per_km - 4.85).abs() < 1e-9);
        assert_eq!(out.distance_km, STATS.distance_km);
    }

    #[test]
    fn test_weekend_warrior_unchanged() {
        let out = PersonaKind::WeekendWarrior.modify(&ctx(60), STATS);
        assert_eq!(out, Some(STATS));
    }

    #[test]
    fn test_lapsed_newcomer_churns() {
        assert_eq!(
            PersonaKind::LapsedNewcomer.modify(&ctx(27), STATS),
            Some(STATS)
        );
        assert_eq!(PersonaKind::LapsedNewcomer.modify(&ctx(28), STATS), None);
        assert_eq!(PersonaKind::LapsedNewcomer.modify(&ctx(119), STATS), None);
    }

    #[test]
    fn test_racer_modifies_distance_only() {
        // 80 days out: peak block, weekday
        let out = PersonaKind::EventDrivenRacer
            .modify(&ctx(10), STATS)
            .unwrap();
        assert_eq!(out, STATS);

        // 5 days out: taper
        let out = PersonaKind::EventDrivenRacer
            .modify(&ctx(85), STATS)
            .unwrap();
        assert!((out.distance_km - 4.8).abs() < 1e-9);
        assert_eq!(out.pace_min_per_km, STATS.pace_min_per_km);
    }

    #[test]
    fn test_racer_rests_after_race() {
        assert_eq!(PersonaKind::EventDrivenRacer.modify(&ctx(90), STATS), None);
        assert_eq!(PersonaKind::EventDrivenRacer.modify(&ctx(91), STATS), None);
        assert_eq!(PersonaKind::EventDrivenRacer.modify(&ctx(97), STATS), None);

        let out = PersonaKind::EventDrivenRacer
            .modify(&ctx(98), STATS)
            .unwrap();
        assert!((out.distance_km - 3.2).abs() < 1e-9);
    }

    #[test]
    fn test_boom_and_bust_modifier_is_identity() {
        assert_eq!(
            PersonaKind::BoomAndBust.modify(&ctx(50), STATS),
            Some(STATS)
        );
    }
}
