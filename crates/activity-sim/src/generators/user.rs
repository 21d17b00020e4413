//! User generation: persona assignment and initial state.

use std::ops::Range;

use rand::Rng;
use time::{Date, Duration};
use tracing::debug;

use crate::config::{ConfigError, DEFAULT_START_DATE};
use crate::profiles::{PersonaKind, TrainingLoad, TrainingState};

/// Users start up to this many days (exclusive) after the global start.
pub const START_OFFSET_DAYS: i64 = 30;

/// Range race days are drawn from.
pub const RACE_DAY_RANGE: Range<u32> = 80..110;

/// Mutable per-user simulation state.
#[derive(Debug, Clone, PartialEq)]
pub struct UserState {
    pub user_id: u64,
    pub persona: PersonaKind,
    pub start_date: Date,
    /// Day index of the race (Event-Driven Racer only).
    pub race_day: u32,
    /// Training load (Boom-and-Bust only; stays at Training otherwise).
    pub training: TrainingLoad,
}

impl UserState {
    pub fn new(user_id: u64, persona: PersonaKind, start_date: Date, race_day: u32) -> Self {
        Self {
            user_id,
            persona,
            start_date,
            race_day,
            training: TrainingLoad::default(),
        }
    }

    pub fn training_state(&self) -> TrainingState {
        self.training.state
    }

    pub fn injury_cooldown(&self) -> u32 {
        self.training.injury_cooldown
    }
}

/// Creates users with a random persona and start date.
pub struct UserGenerator {
    global_start: Date,
    personas: Vec<PersonaKind>,
}

impl UserGenerator {
    /// Creates a generator drawing from every persona.
    pub fn new(global_start: Date) -> Self {
        Self {
            global_start,
            personas: PersonaKind::ALL.to_vec(),
        }
    }

    /// Creates a generator drawing from a restricted persona pool.
    pub fn with_personas(
        global_start: Date,
        personas: Vec<PersonaKind>,
    ) -> Result<Self, ConfigError> {
        if personas.is_empty() {
            return Err(ConfigError::NoPersonas);
        }
        Ok(Self {
            global_start,
            personas,
        })
    }

    /// Generates a user with a persona drawn uniformly from the pool.
    pub fn generate(&self, user_id: u64, rng: &mut impl Rng) -> UserState {
        let persona = self.personas[rng.gen_range(0..self.personas.len())];
        self.generate_as(user_id, persona, rng)
    }

    /// Generates a user with a fixed persona.
    pub fn generate_as(&self, user_id: u64, persona: PersonaKind, rng: &mut impl Rng) -> UserState {
        let offset = rng.gen_range(0..START_OFFSET_DAYS);
        let start_date = self.global_start + Duration::days(offset);
        let race_day = rng.gen_range(RACE_DAY_RANGE);

        debug!(user_id, %persona, %start_date, race_day, "Assigned persona");

        UserState::new(user_id, persona, start_date, race_day)
    }

    /// Generates users with ids `1..=count`.
    pub fn generate_batch(&self, count: usize, rng: &mut impl Rng) -> Vec<UserState> {
        (1..=count as u64).map(|id| self.generate(id, rng)).collect()
    }
}

impl Default for UserGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_START_DATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    #[test]
    fn test_generate_user() {
        let user_gen = UserGenerator::default();
        let mut rng = rand::thread_rng();
        let user = user_gen.generate(7, &mut rng);

        assert_eq!(user.user_id, 7);
        assert!(user.start_date >= DEFAULT_START_DATE);
        assert!(user.start_date < DEFAULT_START_DATE + Duration::days(START_OFFSET_DAYS));
        assert!(RACE_DAY_RANGE.contains(&user.race_day));
        assert_eq!(user.training_state(), TrainingState::Training);
        assert_eq!(user.injury_cooldown(), 0);
        assert_eq!(user.training.weekly_mileage.total(), 0.0);
    }

    #[test]
    fn test_generate_batch() {
        let user_gen = UserGenerator::default();
        let mut rng = rand::thread_rng();
        let users = user_gen.generate_batch(10, &mut rng);

        assert_eq!(users.len(), 10);
        let ids: Vec<u64> = users.iter().map(|u| u.user_id).collect();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_persona_assignment_covers_registry() {
        let user_gen = UserGenerator::default();
        let mut rng = StdRng::seed_from_u64(12345);
        let users = user_gen.generate_batch(1000, &mut rng);

        let mut counts: HashMap<PersonaKind, usize> = HashMap::new();
        for user in &users {
            *counts.entry(user.persona).or_default() += 1;
        }

        // Uniform draw: ~200 each
        assert_eq!(counts.len(), 5);
        for (persona, count) in counts {
            assert!(
                (120..=280).contains(&count),
                "{persona} assigned {count} times"
            );
        }
    }

    #[test]
    fn test_restricted_pool() {
        let user_gen =
            UserGenerator::with_personas(DEFAULT_START_DATE, vec![PersonaKind::BoomAndBust])
                .unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        for user in user_gen.generate_batch(20, &mut rng) {
            assert_eq!(user.persona, PersonaKind::BoomAndBust);
        }
    }

    #[test]
    fn test_empty_pool_rejected() {
        assert!(matches!(
            UserGenerator::with_personas(DEFAULT_START_DATE, Vec::new()),
            Err(ConfigError::NoPersonas)
        ));
    }

    #[test]
    fn test_same_seed_same_users() {
        let user_gen = UserGenerator::default();
        let a = user_gen.generate_batch(25, &mut StdRng::seed_from_u64(42));
        let b = user_gen.generate_batch(25, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
