//! Run orchestration: mode rules, timers, scoring and the run state machine.
//!
//! Inactive → Playing → {Victory | GameOver}; `stop` returns to Inactive from
//! anywhere. Pausing lives outside the orchestrator: a paused host simply
//! stops calling [`RunOrchestrator::tick`], which freezes the split clock too.
//!
//! Modes:
//! - classic: the chain grows by one room per run, newest template first,
//!   countdown budget `rooms × base + run × bonus`
//! - adaptive: a randomly grown sequence with no immediate repeats, budget
//!   derived from recorded best times
//! - speedrun: every template once in registry order against a stopwatch

pub mod sequence;
pub mod timer;

pub use sequence::AdaptiveSequence;
pub use timer::{format_time, RunTimer, TimerKind, TimerTick};

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cues::{Cue, CueSink};
use crate::engine::config::GameConfig;
use crate::error::RegistryError;
use crate::logging::TimingSpan;
use crate::persistence::{Records, RoomTime};
use crate::player::{InputState, PlayerController};
use crate::rooms::{RoomTemplate, TemplateRegistry};
use crate::world::{create_room, LevelManager, TriggerKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameMode {
    #[default]
    Classic,
    Adaptive,
    Speedrun,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Adaptive => "adaptive",
            GameMode::Speedrun => "speedrun",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunPhase {
    #[default]
    Inactive,
    Playing,
    Victory,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameOverReason {
    TimeUp,
    Fell,
}

/// Time spent in one room of the current run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub template_id: String,
    pub symbol: String,
    pub time: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum VictoryOutcome {
    Classic {
        time_remaining: f32,
        rooms_cleared: usize,
    },
    Adaptive {
        par_time: f32,
        used_time: f32,
        /// `max(0, 100 − used/par × 100)`
        efficiency: f32,
        under_par: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedrunOutcome {
    pub final_time: f32,
    pub room_count: usize,
    pub previous_best: Option<f32>,
    pub new_personal_best: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameOverOutcome {
    pub reason: GameOverReason,
    pub mode: GameMode,
    /// One-based room the run ended in
    pub room_reached: usize,
    pub rooms_total: usize,
    pub run: u32,
    /// Stopwatch time, or countdown time used
    pub elapsed: f32,
}

/// Transitions reported to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum RunEvent {
    RunStarted {
        mode: GameMode,
        run: u32,
        total_rooms: usize,
        budget: Option<f32>,
    },
    RoomCompleted {
        index: usize,
        template_id: String,
        split: f32,
        record: RoomTime,
    },
    Victory(VictoryOutcome),
    SpeedrunComplete(SpeedrunOutcome),
    GameOver(GameOverOutcome),
    Stopped,
}

/// State of one playthrough attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub mode: GameMode,
    pub phase: RunPhase,
    pub run: u32,
    pub total_rooms: usize,
    pub room_index: usize,
    pub splits: Vec<Split>,
    pub timer: RunTimer,
    /// Simulated seconds since the run started
    pub clock: f32,
    pub room_started_at: f32,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            mode: GameMode::Classic,
            phase: RunPhase::Inactive,
            run: 1,
            total_rooms: 1,
            room_index: 0,
            splits: Vec::new(),
            timer: RunTimer::stopwatch(),
            clock: 0.0,
            room_started_at: 0.0,
        }
    }
}

/// Data a HUD needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub mode: GameMode,
    pub phase: RunPhase,
    pub run: u32,
    pub room_name: String,
    pub room_symbol: String,
    pub room_index: usize,
    pub total_rooms: usize,
    pub accent: u32,
    pub fog: u32,
    pub timer: f32,
    pub timer_kind: TimerKind,
    pub timer_text: String,
    /// Adaptive only: recorded best for the current room
    pub par_time: Option<f32>,
    pub splits: Vec<Split>,
    pub best_display: String,
}

/// Key under which a speedrun personal best is stored
pub fn personal_best_key(room_count: usize) -> String {
    format!("speedrun_{room_count}")
}

#[derive(Debug)]
pub struct RunOrchestrator {
    config: GameConfig,
    registry: TemplateRegistry,
    level: LevelManager,
    player: PlayerController,
    records: Records,
    sequence: AdaptiveSequence,
    state: RunState,
    events: Vec<RunEvent>,
}

impl RunOrchestrator {
    pub fn new(config: GameConfig, registry: TemplateRegistry, records: Records) -> Self {
        Self {
            player: PlayerController::new(config.physics.clone(), config.look.clone()),
            sequence: AdaptiveSequence::new(config.adaptive_seed),
            config,
            registry,
            level: LevelManager::new(),
            records,
            state: RunState::default(),
            events: Vec::new(),
        }
    }

    // =====================================================
    // Lifecycle
    // =====================================================

    /// Begin a fresh game in `mode` at run 1
    pub fn start_game(&mut self, mode: GameMode, cues: &mut impl CueSink) -> Result<(), RegistryError> {
        if self.registry.is_empty() {
            return Err(RegistryError::Empty);
        }
        self.state.mode = mode;
        self.state.run = 1;
        self.sequence.clear();
        self.state.total_rooms = match mode {
            GameMode::Speedrun => self.registry.len(),
            _ => 1,
        };
        self.start_run(cues)
    }

    /// Tear down the level and build the current run from scratch
    pub fn start_run(&mut self, cues: &mut impl CueSink) -> Result<(), RegistryError> {
        self.registry.first()?;
        self.level.clear();

        let state = &mut self.state;
        state.phase = RunPhase::Playing;
        state.room_index = 0;
        state.splits.clear();
        state.clock = 0.0;
        state.room_started_at = 0.0;

        self.build_rooms()?;

        if let Some(start) = self.level.room(0).map(|r| r.start_position) {
            self.player.init(start, PI);
        }

        let timing = &self.config.timing;
        self.state.timer = match self.state.mode {
            GameMode::Classic => RunTimer::countdown(self.classic_budget(), &timing.warning_thresholds),
            GameMode::Adaptive => RunTimer::countdown(self.adaptive_budget(), &timing.warning_thresholds),
            GameMode::Speedrun => RunTimer::stopwatch(),
        };

        let budget = self.state.timer.remaining();
        info!(
            mode = self.state.mode.as_str(),
            run = self.state.run,
            rooms = self.state.total_rooms,
            ?budget,
            "run started"
        );
        self.enter_room(0, cues);
        self.events.push(RunEvent::RunStarted {
            mode: self.state.mode,
            run: self.state.run,
            total_rooms: self.state.total_rooms,
            budget,
        });
        Ok(())
    }

    /// Next run: one more room, except in speedrun
    pub fn continue_run(&mut self, cues: &mut impl CueSink) -> Result<(), RegistryError> {
        self.state.run += 1;
        if self.state.mode != GameMode::Speedrun {
            self.state.total_rooms += 1;
        }
        self.start_run(cues)
    }

    /// Same mode from the beginning
    pub fn restart(&mut self, cues: &mut impl CueSink) -> Result<(), RegistryError> {
        if self.state.mode == GameMode::Speedrun {
            self.state.total_rooms = self.registry.len();
        } else {
            self.state.run = 1;
            self.state.total_rooms = 1;
            self.sequence.clear();
        }
        self.start_run(cues)
    }

    /// Abandon the run and release the level
    pub fn stop(&mut self, cues: &mut impl CueSink) {
        self.state.phase = RunPhase::Inactive;
        self.level.clear();
        cues.cue(Cue::MusicStop);
        info!(mode = self.state.mode.as_str(), run = self.state.run, "run stopped");
        self.events.push(RunEvent::Stopped);
    }

    fn build_rooms(&mut self) -> Result<(), RegistryError> {
        let total = self.state.total_rooms;
        let order: Vec<&'static str> = match self.state.mode {
            GameMode::Classic => {
                let mut ids = (0..total)
                    .map(|i| self.registry.at(i).map(|t| t.id))
                    .collect::<Result<Vec<_>, _>>()?;
                ids.reverse();
                ids
            }
            GameMode::Adaptive => {
                self.sequence.grow_to(total, &self.registry);
                self.sequence.rooms().to_vec()
            }
            GameMode::Speedrun => self.registry.ids(),
        };

        let _span = TimingSpan::new("assemble_run");
        let dims = self.config.room;
        for slot in 0..total {
            let template = match order.get(slot) {
                Some(id) => self.registry.get_or_first(id)?,
                None => {
                    warn!(slot, "no template for room slot, using first");
                    self.registry.first()?
                }
            };
            let room = create_room(
                template,
                dims,
                slot as f32 * dims.length,
                slot,
                slot == 0,
                slot + 1 == total,
            );
            self.level.add_room(room);
        }
        Ok(())
    }

    // =====================================================
    // Budgets
    // =====================================================

    fn classic_budget(&self) -> f32 {
        let timing = &self.config.timing;
        self.state.total_rooms as f32 * timing.base_time_per_room
            + self.state.run as f32 * timing.time_bonus_per_run
    }

    /// Sum of buffered best times over the built rooms, floored per room
    pub fn adaptive_budget(&self) -> f32 {
        let timing = &self.config.timing;
        let total: f32 = self
            .level
            .rooms()
            .iter()
            .map(|room| match self.records.room_time(&room.template_id) {
                Some(record) if record.best > 0.0 => record.best * timing.adaptive_buffer,
                _ => timing.adaptive_base_time,
            })
            .sum();
        total.max(self.state.total_rooms as f32 * timing.adaptive_min_time)
    }

    // =====================================================
    // Tick
    // =====================================================

    /// One simulation step: player, platforms, timer, triggers, fall check
    pub fn tick(&mut self, dt: f32, input: &InputState, cues: &mut impl CueSink) {
        if self.state.phase != RunPhase::Playing {
            return;
        }
        self.state.clock += dt;

        self.player.update(dt, input, &self.level, cues);
        self.level.update_moving_platforms(dt);

        let timer = self.state.timer.tick(dt);
        for _ in 0..timer.warnings {
            cues.cue(Cue::Warning);
        }
        if timer.expired {
            self.game_over(GameOverReason::TimeUp, cues);
            return;
        }

        self.check_triggers(cues);
        if self.state.phase != RunPhase::Playing {
            return;
        }

        if self.player.has_fallen() {
            self.game_over(GameOverReason::Fell, cues);
        }
    }

    fn check_triggers(&mut self, cues: &mut impl CueSink) {
        let probe = self.player.trigger_probe();
        let current = self.state.room_index;
        let reached = self
            .level
            .check_triggers(probe)
            .iter()
            .any(|t| t.kind == TriggerKind::RoomEnd && t.room_index == current);
        if reached {
            self.complete_room(cues);
        }
    }

    fn complete_room(&mut self, cues: &mut impl CueSink) {
        let index = self.state.room_index;
        let Some(template_id) = self.level.room(index).map(|r| r.template_id.clone()) else {
            return;
        };
        let symbol = self
            .registry
            .get(&template_id)
            .map(|t| t.theme.symbol)
            .unwrap_or_default();

        let split = self.state.clock - self.state.room_started_at;
        self.state.splits.push(Split {
            template_id: template_id.clone(),
            symbol: symbol.to_string(),
            time: split,
        });
        let record = self.records.record_room_time(&template_id, split);
        self.records.save();
        info!(room = %template_id, index, split, best = record.best, "room complete");
        self.events.push(RunEvent::RoomCompleted {
            index,
            template_id,
            split,
            record,
        });

        self.state.room_index += 1;
        self.state.room_started_at = self.state.clock;

        if self.state.room_index >= self.state.total_rooms {
            cues.cue(Cue::MusicStop);
            match self.state.mode {
                GameMode::Speedrun => self.finish_speedrun(cues),
                _ => self.finish_victory(cues),
            }
        } else {
            self.enter_room(self.state.room_index, cues);
        }
    }

    fn enter_room(&self, index: usize, cues: &mut impl CueSink) {
        let Some(template) = self.room_template(index) else {
            return;
        };
        debug!(room = template.id, index, "entering room");
        cues.cue(Cue::RoomEnter {
            color: template.theme.accent,
        });
        cues.cue(Cue::MusicStart {
            template_id: template.id.to_string(),
        });
    }

    fn room_template(&self, index: usize) -> Option<&RoomTemplate> {
        let room = self.level.room(index)?;
        self.registry.get(&room.template_id).ok()
    }

    // =====================================================
    // Outcomes
    // =====================================================

    fn finish_victory(&mut self, cues: &mut impl CueSink) {
        let remaining = self.state.timer.value();
        let outcome = match self.state.mode {
            GameMode::Adaptive => {
                // records now include this run's splits
                let par_time = self.adaptive_budget();
                let used_time = par_time - remaining;
                let efficiency = if par_time > 0.0 {
                    (100.0 - used_time / par_time * 100.0).max(0.0)
                } else {
                    0.0
                };
                VictoryOutcome::Adaptive {
                    par_time,
                    used_time,
                    efficiency,
                    under_par: remaining > 0.0,
                }
            }
            _ => VictoryOutcome::Classic {
                time_remaining: remaining,
                rooms_cleared: self.state.total_rooms,
            },
        };

        self.state.phase = RunPhase::Victory;
        cues.cue(Cue::Victory);
        info!(mode = self.state.mode.as_str(), run = self.state.run, ?outcome, "victory");
        self.level.clear();
        self.events.push(RunEvent::Victory(outcome));
    }

    fn finish_speedrun(&mut self, cues: &mut impl CueSink) {
        let room_count = self.state.total_rooms;
        let key = personal_best_key(room_count);
        let final_time = self.state.timer.elapsed();
        let previous_best = self.records.personal_best(&key);
        let new_personal_best = self.records.submit_personal_best(&key, final_time);
        if new_personal_best {
            self.records.save();
        }

        self.state.phase = RunPhase::Victory;
        cues.cue(Cue::Victory);
        info!(final_time, ?previous_best, new_personal_best, "speedrun complete");
        self.level.clear();
        self.events.push(RunEvent::SpeedrunComplete(SpeedrunOutcome {
            final_time,
            room_count,
            previous_best,
            new_personal_best,
        }));
    }

    fn game_over(&mut self, reason: GameOverReason, cues: &mut impl CueSink) {
        self.state.phase = RunPhase::GameOver;
        cues.cue(Cue::GameOver);
        cues.cue(Cue::MusicStop);

        if self.state.mode == GameMode::Classic && self.records.raise_best_run(self.state.run) {
            self.records.save();
        }

        let outcome = GameOverOutcome {
            reason,
            mode: self.state.mode,
            room_reached: self.state.room_index + 1,
            rooms_total: self.state.total_rooms,
            run: self.state.run,
            elapsed: self.state.timer.elapsed(),
        };
        info!(?reason, room = outcome.room_reached, run = outcome.run, "game over");
        self.level.clear();
        self.events.push(RunEvent::GameOver(outcome));
    }

    // =====================================================
    // Queries
    // =====================================================

    pub fn hud(&self) -> HudSnapshot {
        let index = self
            .state
            .room_index
            .min(self.state.total_rooms.saturating_sub(1));
        let template = self
            .room_template(index)
            .or_else(|| self.registry.first().ok());

        let (room_name, room_symbol, accent, fog, template_id) = match template {
            Some(t) => (t.name, t.theme.symbol, t.theme.accent, t.theme.fog, Some(t.id)),
            None => ("", "", 0, 0, None),
        };

        let par_time = match (self.state.mode, template_id) {
            (GameMode::Adaptive, Some(id)) => self.records.room_time(id).map(|r| r.best),
            _ => None,
        };

        let best_display = match self.state.mode {
            GameMode::Speedrun => match self.records.personal_best(&personal_best_key(self.state.total_rooms)) {
                Some(pb) => format!("PB: {}", format_time(pb)),
                None => "PB: --".to_string(),
            },
            _ => match self.records.best_run() {
                0 => "BEST: --".to_string(),
                best => format!("BEST: Run {best}"),
            },
        };

        let timer = self.state.timer.value();
        HudSnapshot {
            mode: self.state.mode,
            phase: self.state.phase,
            run: self.state.run,
            room_name: room_name.to_string(),
            room_symbol: room_symbol.to_string(),
            room_index: self.state.room_index,
            total_rooms: self.state.total_rooms,
            accent,
            fog,
            timer,
            timer_kind: self.state.timer.kind(),
            timer_text: format_time(timer),
            par_time,
            splits: self.state.splits.clone(),
            best_display,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn phase(&self) -> RunPhase {
        self.state.phase
    }

    pub fn mode(&self) -> GameMode {
        self.state.mode
    }

    pub fn level(&self) -> &LevelManager {
        &self.level
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerController {
        &mut self.player
    }

    pub fn records(&self) -> &Records {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut Records {
        &mut self.records
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn sequence(&self) -> &AdaptiveSequence {
        &self.sequence
    }

    /// Take the events emitted since the last call
    pub fn take_events(&mut self) -> Vec<RunEvent> {
        std::mem::take(&mut self.events)
    }
}
