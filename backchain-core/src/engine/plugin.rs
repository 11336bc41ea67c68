use bevy::prelude::*;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tracing::warn;

use crate::cues::Cue;
use crate::engine::config::GameConfig;
use crate::engine::Simulation;
use crate::gameflow::{GameMode, HudSnapshot, RunEvent, RunPhase};
use crate::persistence::{FileStore, Records};
use crate::rooms::TemplateRegistry;

/// Runs a [`Simulation`] inside a bevy app
#[derive(Debug, Clone, Default)]
pub struct BackchainPlugin {
    pub config: GameConfig,
    /// Directory for save files; records stay in memory when unset
    pub save_dir: Option<PathBuf>,
    /// Mode to start immediately
    pub autostart: Option<GameMode>,
}

impl Plugin for BackchainPlugin {
    fn build(&self, app: &mut App) {
        let mut records = match &self.save_dir {
            Some(dir) => Records::new(Box::new(FileStore::new(dir.clone()))),
            None => Records::in_memory(),
        };
        records.load();

        let mut sim = Simulation::new(self.config.clone(), TemplateRegistry::with_builtin(), records);
        if let Some(mode) = self.autostart {
            if let Err(e) = sim.start_game(mode) {
                warn!("Backchain: could not start {} game: {}", mode.as_str(), e);
            }
        }

        app.insert_resource(SimulationResource(Arc::new(RwLock::new(sim))))
            .init_resource::<PlayerView>()
            .add_event::<CueEvent>()
            .add_event::<RunEventMessage>()
            .add_systems(
                Update,
                (
                    read_keyboard_input,
                    simulation_tick_system,
                    forward_sim_events,
                    sync_player_view,
                )
                    .chain(),
            );
    }
}

#[derive(Resource, Clone)]
pub struct SimulationResource(pub Arc<RwLock<Simulation>>);

/// Audio/visual cue raised by the simulation
#[derive(Event, Debug, Clone, PartialEq)]
pub struct CueEvent(pub Cue);

/// Run transition raised by the simulation
#[derive(Event, Debug, Clone, PartialEq)]
pub struct RunEventMessage(pub RunEvent);

/// Camera-facing copy of the player, refreshed every frame
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerView {
    pub transform: Transform,
    pub grounded: bool,
    pub phase: RunPhase,
    pub hud: Option<HudSnapshot>,
}

fn read_keyboard_input(keys: Option<Res<ButtonInput<KeyCode>>>, sim_res: Res<SimulationResource>) {
    let Some(keys) = keys else {
        return;
    };
    if let Ok(mut sim) = sim_res.0.write() {
        sim.apply_keys(keys.get_pressed());
    }
}

fn simulation_tick_system(time: Res<Time>, sim_res: Res<SimulationResource>) {
    if let Ok(mut sim) = sim_res.0.write() {
        sim.frame(time.delta_secs());
    }
}

fn forward_sim_events(
    sim_res: Res<SimulationResource>,
    mut cue_events: EventWriter<CueEvent>,
    mut run_events: EventWriter<RunEventMessage>,
) {
    let Ok(mut sim) = sim_res.0.write() else {
        return;
    };
    for cue in sim.drain_cues() {
        cue_events.send(CueEvent(cue));
    }
    for event in sim.drain_events() {
        run_events.send(RunEventMessage(event));
    }
}

fn sync_player_view(sim_res: Res<SimulationResource>, mut view: ResMut<PlayerView>) {
    let Ok(sim) = sim_res.0.read() else {
        return;
    };
    let player = sim.orchestrator().player();
    view.transform = Transform::from_translation(player.position())
        .with_rotation(player.orientation.rotation());
    view.grounded = player.is_grounded();
    view.phase = sim.phase();
    view.hud = match view.phase {
        RunPhase::Playing => Some(sim.hud()),
        _ => None,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Action;

    fn app(autostart: Option<GameMode>) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(BackchainPlugin {
            autostart,
            ..Default::default()
        });
        app
    }

    #[test]
    fn test_autostart_forwards_events() {
        let mut app = app(Some(GameMode::Classic));
        app.update();

        let runs = app.world().resource::<Events<RunEventMessage>>();
        assert!(!runs.is_empty());
        let cues = app.world().resource::<Events<CueEvent>>();
        assert!(!cues.is_empty());

        let view = app.world().resource::<PlayerView>();
        assert_eq!(view.phase, RunPhase::Playing);
        assert_eq!(view.hud.as_ref().map(|h| h.total_rooms), Some(1));
        // spawn eye height above the first room's start anchor
        assert!((view.transform.translation.y - 2.2).abs() < 1e-4);
    }

    #[test]
    fn test_idle_without_autostart() {
        let mut app = app(None);
        app.update();
        let view = app.world().resource::<PlayerView>();
        assert_eq!(view.phase, RunPhase::Inactive);
        assert!(view.hud.is_none());
    }

    #[test]
    fn test_keyboard_bindings_reach_input() {
        let mut app = app(Some(GameMode::Speedrun));
        app.init_resource::<ButtonInput<KeyCode>>();
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyW);
        app.update();

        let sim = app.world().resource::<SimulationResource>().0.clone();
        let sim = sim.read().unwrap();
        assert!(sim.input().is_pressed(Action::Forward));
        assert!(!sim.input().is_pressed(Action::Jump));
    }
}
