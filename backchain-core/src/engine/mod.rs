//! Simulation context and host integration.
//!
//! [`Simulation`] owns everything a running game needs: the run orchestrator
//! (which owns level, player and records), the input snapshot, the pause
//! flag and the frame scheduler. Hosts feed it frame deltas and drain cues
//! and run events afterwards. Nothing here is global.

pub mod config;
pub mod plugin;
pub mod scheduler;

pub use config::{GameConfig, SchedulerConfig, StepMode};
pub use plugin::{BackchainPlugin, SimulationResource};
pub use scheduler::FrameScheduler;

use bevy::input::keyboard::KeyCode;
use tracing::{debug, info};

use crate::cues::Cue;
use crate::error::RegistryError;
use crate::gameflow::{GameMode, HudSnapshot, RunEvent, RunOrchestrator, RunPhase};
use crate::persistence::Records;
use crate::player::{InputBindings, InputState};
use crate::rooms::TemplateRegistry;

#[derive(Debug)]
pub struct Simulation {
    orchestrator: RunOrchestrator,
    input: InputState,
    bindings: InputBindings,
    scheduler: FrameScheduler,
    paused: bool,
    cues: Vec<Cue>,
    events: Vec<RunEvent>,
}

impl Simulation {
    pub fn new(config: GameConfig, registry: TemplateRegistry, records: Records) -> Self {
        Self {
            scheduler: FrameScheduler::new(config.scheduler.clone()),
            orchestrator: RunOrchestrator::new(config, registry, records),
            input: InputState::new(),
            bindings: InputBindings::default(),
            paused: false,
            cues: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Default config, built-in rooms, in-memory records
    pub fn with_defaults() -> Self {
        Self::new(
            GameConfig::default(),
            TemplateRegistry::with_builtin(),
            Records::in_memory(),
        )
    }

    // =====================================================
    // Stepping
    // =====================================================

    /// Advance by one host frame; returns how many steps ran
    pub fn frame(&mut self, frame_delta: f32) -> usize {
        if self.paused {
            self.input.clear_mouse_delta();
            return 0;
        }
        let steps = self.scheduler.steps(frame_delta);
        for &dt in &steps {
            self.step(dt);
        }
        steps.len()
    }

    /// One simulation tick of `dt` seconds, ignoring the scheduler
    pub fn step(&mut self, dt: f32) {
        if self.paused {
            return;
        }
        self.orchestrator.tick(dt, &self.input, &mut self.cues);
        self.input.clear_mouse_delta();
        self.collect_events();
    }

    fn collect_events(&mut self) {
        self.events.extend(self.orchestrator.take_events());
    }

    // =====================================================
    // Pause
    // =====================================================

    pub fn pause(&mut self) {
        if !self.paused {
            debug!("simulation paused");
            self.paused = true;
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            debug!("simulation resumed");
            self.paused = false;
            self.scheduler.reset();
        }
    }

    pub fn toggle_pause(&mut self) -> bool {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
        self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    // =====================================================
    // Run control
    // =====================================================

    pub fn start_game(&mut self, mode: GameMode) -> Result<(), RegistryError> {
        self.paused = false;
        self.scheduler.reset();
        self.input.release_all();
        let result = self.orchestrator.start_game(mode, &mut self.cues);
        self.collect_events();
        result
    }

    pub fn continue_run(&mut self) -> Result<(), RegistryError> {
        self.paused = false;
        self.scheduler.reset();
        let result = self.orchestrator.continue_run(&mut self.cues);
        self.collect_events();
        result
    }

    pub fn restart(&mut self) -> Result<(), RegistryError> {
        self.paused = false;
        self.scheduler.reset();
        let result = self.orchestrator.restart(&mut self.cues);
        self.collect_events();
        result
    }

    pub fn stop(&mut self) {
        self.orchestrator.stop(&mut self.cues);
        self.paused = false;
        self.collect_events();
        info!("simulation stopped");
    }

    // =====================================================
    // Host access
    // =====================================================

    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    pub fn drain_events(&mut self) -> Vec<RunEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn bindings(&self) -> &InputBindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut InputBindings {
        &mut self.bindings
    }

    /// Rebuild keyboard actions from the keys currently held
    pub fn apply_keys<'a>(&mut self, held: impl IntoIterator<Item = &'a KeyCode>) {
        self.bindings.apply(held, &mut self.input);
    }

    pub fn phase(&self) -> RunPhase {
        self.orchestrator.phase()
    }

    pub fn hud(&self) -> HudSnapshot {
        self.orchestrator.hud()
    }

    pub fn orchestrator(&self) -> &RunOrchestrator {
        &self.orchestrator
    }

    pub fn orchestrator_mut(&mut self) -> &mut RunOrchestrator {
        &mut self.orchestrator
    }
}

// =====================================================
// Tests
// =====================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Action;
    use bevy::math::Vec2;

    fn running() -> Simulation {
        let mut sim = Simulation::with_defaults();
        sim.start_game(GameMode::Classic).unwrap();
        sim
    }

    #[test]
    fn test_start_emits_cues_and_event() {
        let mut sim = running();
        assert_eq!(sim.phase(), RunPhase::Playing);
        assert_eq!(sim.drain_cues().len(), 2);
        let events = sim.drain_events();
        assert!(matches!(events[0], RunEvent::RunStarted { run: 1, total_rooms: 1, .. }));
        assert!(sim.drain_cues().is_empty());
    }

    #[test]
    fn test_frame_clamps_large_delta() {
        let mut sim = running();
        assert_eq!(sim.frame(5.0), 1);
        let remaining = sim.orchestrator().state().timer.remaining().unwrap();
        assert!((remaining - 14.9).abs() < 1e-4);
    }

    #[test]
    fn test_paused_frame_freezes_world() {
        let mut sim = running();
        sim.frame(0.1);
        sim.pause();
        let before = sim.orchestrator().state().clone();
        let position = sim.orchestrator().player().position();
        sim.input_mut().press(Action::Forward);
        for _ in 0..10 {
            assert_eq!(sim.frame(0.1), 0);
        }
        assert_eq!(sim.orchestrator().state(), &before);
        assert_eq!(sim.orchestrator().player().position(), position);

        assert!(!sim.toggle_pause());
        sim.frame(0.1);
        assert_ne!(sim.orchestrator().player().position(), position);
    }

    #[test]
    fn test_mouse_delta_consumed_each_step() {
        let mut sim = running();
        sim.input_mut().pointer_captured = true;
        sim.input_mut().add_mouse_delta(Vec2::new(100.0, 0.0));
        sim.frame(0.016);
        assert_eq!(sim.input().mouse_delta, Vec2::ZERO);
        let yaw = sim.orchestrator().player().orientation.yaw;
        assert!((yaw - (std::f32::consts::PI - 0.2)).abs() < 1e-5);
    }

    #[test]
    fn test_stop_then_frames_are_noops() {
        let mut sim = running();
        sim.stop();
        assert_eq!(sim.phase(), RunPhase::Inactive);
        sim.drain_events();
        sim.frame(0.1);
        assert!(sim.drain_events().is_empty());
    }
}
