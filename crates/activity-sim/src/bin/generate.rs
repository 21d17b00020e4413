//! Generates the synthetic running dataset and writes it as CSV.
//!
//! Run with:
//! ```
//! SIM_SEED=12345 cargo run -p activity-sim --bin generate
//! ```
//!
//! `SIM_CONFIG` may point at a JSON configuration file; the other `SIM_*`
//! variables override individual settings.

use std::env;

use activity_sim::builders::SimulationBuilder;
use activity_sim::config::SimulationConfig;
use activity_sim::output::ActivityWriter;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match env::var("SIM_CONFIG") {
        Ok(path) => {
            tracing::info!("Loading configuration from {path}");
            SimulationConfig::from_json_file(&path)?
        }
        Err(_) => SimulationConfig::default(),
    };
    let config = config.with_env_overrides(|key| env::var(key).ok())?;
    let output_path = config.output_path.clone();

    tracing::info!(
        "Generating {} users over {} days from {}...",
        config.user_count,
        config.simulation_days,
        config.start_date
    );

    let result = SimulationBuilder::from_config(config)
        .with_metrics(true)
        .build()?;

    ActivityWriter::new().write_to_path(&result.activities, &output_path)?;

    // Summary output
    if let Some(metrics) = &result.metrics {
        tracing::info!("Simulation completed in {} ms", metrics.generation_time_ms);
        tracing::info!("  Users: {}", metrics.user_count);
        tracing::info!("  Activities: {}", metrics.activity_count);
        for (persona, users) in &metrics.users_per_persona {
            let activities = metrics
                .activities_per_persona
                .get(persona)
                .copied()
                .unwrap_or(0);
            tracing::info!("  {persona}: {users} users, {activities} activities");
        }
    }

    Ok(())
}
