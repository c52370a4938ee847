mod autopilot;
mod config;
mod session;

use tracing_subscriber::EnvFilter;

use whisker_adventure::CatAdventure;
use whisker_adventure::config::AdventureConfig;
use whisker_core::game_trait::WhiskerGame;

use crate::config::RunnerConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let adventure_config = AdventureConfig::load();
    let runner_config = RunnerConfig::from_env();

    let mut game = CatAdventure::with_config(adventure_config);
    let meta = game.metadata();
    tracing::info!(
        game = %meta.name,
        round_secs = meta.estimated_round_duration.as_secs_f32(),
        realtime = runner_config.realtime,
        frame_hz = runner_config.frame_hz,
        seed = runner_config.seed,
        "Whisker runner starting"
    );

    let summary = session::run_session(&mut game, &runner_config).await;
    match whisker_core::snapshot::to_json_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!(error = %e, "Failed to encode session summary"),
    }
}
