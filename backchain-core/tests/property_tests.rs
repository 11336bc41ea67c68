//! Property-based tests using proptest
//!
//! Invariants that must hold for ALL inputs:
//! - Layout generation: same (difficulty, seed) → same layout
//! - Validation: any pattern outside the player's reach is rejected
//! - Maze generation: perfect for any grid ≥ 1
//! - Adaptive sequence: no room follows itself
//! - Player controller: any input stream keeps the body finite

use bevy::math::Vec2;
use proptest::prelude::*;

use backchain_core::cues::NullSink;
use backchain_core::engine::config::{LookConfig, PhysicsConfig, RoomDimensions};
use backchain_core::gameflow::AdaptiveSequence;
use backchain_core::generation::{
    generate_3d_maze, generate_corridor, generate_room_layout, pattern_count, validate_room, Pattern,
    RoomLayout,
};
use backchain_core::player::{Action, InputState, Joystick, PlayerController};
use backchain_core::rooms::TemplateRegistry;
use backchain_core::world::{create_room, LevelManager};

// ============================================================
// Layout Generation Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_layout_is_deterministic(difficulty in 0.0f32..=1.0, seed in any::<u64>()) {
        let a = generate_room_layout(difficulty, seed);
        let b = generate_room_layout(difficulty, seed);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_layout_size_follows_difficulty(difficulty in 0.0f32..=1.0, seed in any::<u64>()) {
        let layout = generate_room_layout(difficulty, seed);
        prop_assert_eq!(layout.patterns.len(), pattern_count(difficulty));
        prop_assert!(layout.patterns.iter().all(|p| p.kind().is_some()));
    }

    #[test]
    fn prop_validation_verdict_matches_patterns(difficulty in 0.0f32..=1.0, seed in any::<u64>()) {
        let layout = generate_room_layout(difficulty, seed);
        let report = validate_room(&layout);
        if layout.patterns.iter().any(|p| !p.is_traversable()) {
            prop_assert!(!report.valid);
        }
        if report.valid {
            prop_assert!(report.par_time.unwrap_or(f32::INFINITY) <= 120.0);
        }
    }

    #[test]
    fn prop_wide_gaps_are_rejected(platform_count in 0u32..6, excess in 0.01f32..20.0) {
        let gap_length = 4.5 * (platform_count as f32 + 1.0) + excess;
        let layout = RoomLayout {
            patterns: vec![Pattern::GapJump {
                gap_length,
                platform_count,
                platform_size: 2.0,
                platform_spacing: 3.0,
            }],
            difficulty: 0.5,
            seed: 0,
        };
        prop_assert!(!validate_room(&layout).valid);
    }

    #[test]
    fn prop_tall_steps_are_rejected(step_height in 1.81f32..10.0, step_count in 1u32..12) {
        let layout = RoomLayout {
            patterns: vec![Pattern::Staircase {
                step_count,
                step_height,
                step_width: 2.0,
                alternating: false,
            }],
            difficulty: 0.5,
            seed: 0,
        };
        prop_assert!(!validate_room(&layout).valid);
    }

    #[test]
    fn prop_thin_bridges_are_rejected(width in 0.0f32..0.99, length in 1.0f32..30.0) {
        let layout = RoomLayout {
            patterns: vec![Pattern::NarrowBridge { width, length }],
            difficulty: 0.5,
            seed: 0,
        };
        prop_assert!(!validate_room(&layout).valid);
    }

    #[test]
    fn prop_corridor_length_within_jitter(seed in any::<u64>()) {
        let corridor = generate_corridor(seed);
        let base = corridor.kind.base_length();
        prop_assert!((base - 2..=base + 2).contains(&corridor.length));
    }
}

// ============================================================
// Maze Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_maze_is_perfect(w in 1usize..6, h in 1usize..4, d in 1usize..6, seed in any::<u64>()) {
        let maze = generate_3d_maze(w, h, d, seed);
        prop_assert_eq!(maze.cell_count(), w * h * d);
        prop_assert_eq!(maze.passage_count(), w * h * d - 1);
        prop_assert_eq!(maze.reachable_count(), w * h * d);
        prop_assert!(maze.is_perfect());
    }
}

// ============================================================
// Adaptive Sequence Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_adaptive_never_repeats(seed in any::<u64>(), len in 1usize..=8) {
        let registry = TemplateRegistry::with_builtin();
        let mut seq = AdaptiveSequence::new(seed);
        for total in 1..=len {
            seq.grow_to(total, &registry);
        }
        prop_assert_eq!(seq.len(), len);
        for pair in seq.rooms().windows(2) {
            prop_assert_ne!(pair[0], pair[1]);
        }
    }
}

// ============================================================
// Player Controller Properties
// ============================================================

fn arb_input() -> impl Strategy<Value = InputState> {
    (
        prop::collection::vec(0usize..9, 0..4),
        -200.0f32..200.0,
        -200.0f32..200.0,
        any::<bool>(),
        -1.0f32..=1.0,
        -1.0f32..=1.0,
    )
        .prop_map(|(actions, mx, my, captured, jx, jy)| {
            const ACTIONS: [Action; 9] = [
                Action::Forward,
                Action::Backward,
                Action::Left,
                Action::Right,
                Action::Jump,
                Action::TurnLeft,
                Action::TurnRight,
                Action::LookUp,
                Action::LookDown,
            ];
            let mut input = InputState::new();
            for i in actions {
                input.press(ACTIONS[i]);
            }
            input.pointer_captured = captured;
            input.add_mouse_delta(Vec2::new(mx, my));
            input.joystick = Joystick {
                active: jx.abs() > 0.5,
                delta: Vec2::new(jx, jy),
            };
            input
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_controller_stays_finite(
        room in 0usize..8,
        inputs in prop::collection::vec(arb_input(), 1..120),
    ) {
        let registry = TemplateRegistry::with_builtin();
        let template = registry.at(room).unwrap();
        let mut level = LevelManager::new();
        level.add_room(create_room(template, RoomDimensions::default(), 0.0, 0, true, true));
        let start = level.room(0).unwrap().start_position;

        let physics = PhysicsConfig::default();
        let mut player = PlayerController::new(physics.clone(), LookConfig::default());
        player.init(start, std::f32::consts::PI);

        for input in &inputs {
            player.update(1.0 / 60.0, input, &level, &mut NullSink);
            level.update_moving_platforms(1.0 / 60.0);
            let p = player.position();
            prop_assert!(p.is_finite());
            prop_assert!(player.orientation.pitch.abs() <= physics.max_pitch);
            if player.is_grounded() {
                prop_assert_eq!(player.body.velocity.y, 0.0);
            }
        }
    }
}
