//! Fluent builder that drives a whole simulation run.

use std::collections::BTreeMap;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use time::Date;
use tracing::info;

use crate::config::{ConfigError, SimulationConfig};
use crate::generators::{ActivityGenerator, ActivityRecord, UserGenerator, UserState};
use crate::profiles::PersonaKind;

/// Result of a simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// Users in id order, with their state at the end of the simulation.
    pub users: Vec<UserState>,
    /// Emitted activities, user-major then day-minor.
    pub activities: Vec<ActivityRecord>,
    /// Metrics from the run (populated if metrics tracking enabled).
    pub metrics: Option<SimulationMetrics>,
}

/// Summary metrics from a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationMetrics {
    /// Time spent generating data (milliseconds).
    pub generation_time_ms: u64,
    pub user_count: usize,
    pub activity_count: usize,
    /// Users assigned to each persona.
    pub users_per_persona: BTreeMap<PersonaKind, usize>,
    /// Activities emitted per persona.
    pub activities_per_persona: BTreeMap<PersonaKind, usize>,
}

impl SimulationMetrics {
    fn collect(users: &[UserState], activities: &[ActivityRecord], start: Instant) -> Self {
        let mut users_per_persona = BTreeMap::new();
        for user in users {
            *users_per_persona.entry(user.persona).or_insert(0) += 1;
        }

        let mut activities_per_persona = BTreeMap::new();
        for activity in activities {
            *activities_per_persona.entry(activity.persona).or_insert(0) += 1;
        }

        Self {
            generation_time_ms: start.elapsed().as_millis() as u64,
            user_count: users.len(),
            activity_count: activities.len(),
            users_per_persona,
            activities_per_persona,
        }
    }
}

/// Builder for simulation runs.
///
/// # Example
///
/// ```rust,ignore
/// let result = SimulationBuilder::new()
///     .with_users(50)
///     .with_days(90)
///     .with_seed(12345)
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct SimulationBuilder {
    config: SimulationConfig,
    track_metrics: bool,
}

impl Default for SimulationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationBuilder {
    /// Creates a builder with default settings (250 users, 120 days).
    pub fn new() -> Self {
        Self::from_config(SimulationConfig::default())
    }

    pub fn from_config(config: SimulationConfig) -> Self {
        Self {
            config,
            track_metrics: false,
        }
    }

    /// Sets the number of users to generate.
    pub fn with_users(mut self, count: usize) -> Self {
        self.config.user_count = count;
        self
    }

    /// Sets the global simulation start date.
    pub fn with_start_date(mut self, date: Date) -> Self {
        self.config.start_date = date;
        self
    }

    /// Sets the number of simulated days per user.
    pub fn with_days(mut self, days: u32) -> Self {
        self.config.simulation_days = days;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Restricts the personas users are drawn from.
    pub fn with_personas(mut self, personas: impl Into<Vec<PersonaKind>>) -> Self {
        self.config.personas = personas.into();
        self
    }

    /// Enables metrics tracking.
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.track_metrics = enabled;
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Runs the simulation with a random stream seeded from the configured
    /// seed, or from OS entropy if there is none.
    pub fn build(&self) -> Result<SimulationResult, ConfigError> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.build_data(&mut rng)
    }

    /// Runs the simulation with the given random stream.
    ///
    /// The configuration is validated before any randomness is consumed.
    pub fn build_data(&self, rng: &mut impl Rng) -> Result<SimulationResult, ConfigError> {
        self.config.validate()?;

        let start_time = self.track_metrics.then(Instant::now);

        let user_gen =
            UserGenerator::with_personas(self.config.start_date, self.config.personas.clone())?;
        let activity_gen = ActivityGenerator::new()?;

        let mut users = Vec::with_capacity(self.config.user_count);
        let mut activities = Vec::new();

        for user_id in 1..=self.config.user_count as u64 {
            let mut user = user_gen.generate(user_id, rng);
            let emitted =
                activity_gen.simulate_user(&mut user, self.config.simulation_days, rng);
            activities.extend(emitted);
            users.push(user);
        }

        info!(
            "Generated {} activities for {} users",
            activities.len(),
            users.len()
        );

        let metrics =
            start_time.map(|start| SimulationMetrics::collect(&users, &activities, start));

        Ok(SimulationResult {
            users,
            activities,
            metrics,
        })
    }
}
