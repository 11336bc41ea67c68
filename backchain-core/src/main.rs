use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use bevy::app::{AppExit, ScheduleRunnerPlugin};
use bevy::prelude::*;
use tracing::info;

use backchain_core::engine::plugin::RunEventMessage;
use backchain_core::engine::{BackchainPlugin, GameConfig};
use backchain_core::gameflow::{format_time, GameMode, RunEvent};
use backchain_core::logging::init_tracing_default;

const DEFAULT_CONFIG_PATH: &str = "config/backchain.ron";
const DEFAULT_SAVE_DIR: &str = "saves";

fn main() -> anyhow::Result<()> {
    init_tracing_default();

    let mode = match std::env::args().nth(1).as_deref() {
        None | Some("classic") => GameMode::Classic,
        Some("adaptive") => GameMode::Adaptive,
        Some("speedrun") => GameMode::Speedrun,
        Some(other) => bail!("unknown mode `{other}` (expected classic, adaptive or speedrun)"),
    };

    let config_path = std::env::var("BACKCHAIN_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = GameConfig::load_or_default(&config_path);
    let save_dir = PathBuf::from(std::env::var("BACKCHAIN_SAVE_DIR").unwrap_or_else(|_| DEFAULT_SAVE_DIR.to_string()));
    std::fs::create_dir_all(&save_dir)
        .with_context(|| format!("creating save directory {}", save_dir.display()))?;

    info!("Backchain headless run: mode={}, config={}", mode.as_str(), config_path);

    App::new()
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / 60.0))))
        .add_plugins(BackchainPlugin {
            config,
            save_dir: Some(save_dir),
            autostart: Some(mode),
        })
        .add_systems(Update, report_run_events)
        .run();

    Ok(())
}

/// Log run transitions and exit once the run is decided
fn report_run_events(mut events: EventReader<RunEventMessage>, mut exit: EventWriter<AppExit>) {
    for RunEventMessage(event) in events.read() {
        match event {
            RunEvent::RunStarted { run, total_rooms, budget, .. } => {
                info!("Run {} started with {} rooms, budget {:?}", run, total_rooms, budget);
            }
            RunEvent::RoomCompleted { index, template_id, split, .. } => {
                info!("Room {} ({}) cleared in {}", index + 1, template_id, format_time(*split));
            }
            RunEvent::Victory(outcome) => {
                info!("Victory: {:?}", outcome);
                exit.send(AppExit::Success);
            }
            RunEvent::SpeedrunComplete(outcome) => {
                info!("Speedrun complete in {}", format_time(outcome.final_time));
                exit.send(AppExit::Success);
            }
            RunEvent::GameOver(outcome) => {
                info!("Game over: {:?} in room {} of {}", outcome.reason, outcome.room_reached, outcome.rooms_total);
                exit.send(AppExit::Success);
            }
            RunEvent::Stopped => {
                exit.send(AppExit::Success);
            }
        }
    }
}
