use bevy::math::Vec3;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use backchain_core::cues::NullSink;
use backchain_core::engine::config::{LookConfig, PhysicsConfig, RoomDimensions};
use backchain_core::generation::{generate_3d_maze, generate_corridor, generate_room_layout, validate_room};
use backchain_core::player::{Action, InputState, PlayerController};
use backchain_core::rooms::TemplateRegistry;
use backchain_core::world::{create_room, LevelManager};
use backchain_core::{GameMode, Simulation};

fn bench_layout_generation(c: &mut Criterion) {
    c.bench_function("generate_room_layout", |b| {
        b.iter(|| generate_room_layout(black_box(0.6), black_box(42)))
    });

    c.bench_function("generate_and_validate_layout", |b| {
        b.iter(|| {
            let layout = generate_room_layout(black_box(1.0), black_box(7));
            validate_room(&layout)
        })
    });

    c.bench_function("generate_corridor", |b| {
        b.iter(|| generate_corridor(black_box(1234)))
    });
}

fn bench_maze(c: &mut Criterion) {
    c.bench_function("generate_3d_maze_8x3x8", |b| {
        b.iter(|| generate_3d_maze(black_box(8), black_box(3), black_box(8), black_box(99)))
    });
}

fn bench_room_assembly(c: &mut Criterion) {
    let registry = TemplateRegistry::with_builtin();
    let dims = RoomDimensions::default();

    c.bench_function("assemble_all_rooms", |b| {
        b.iter(|| {
            let mut level = LevelManager::new();
            for (i, template) in registry.iter().enumerate() {
                let room = create_room(
                    template,
                    dims,
                    i as f32 * dims.length,
                    i,
                    i == 0,
                    i + 1 == registry.len(),
                );
                level.add_room(room);
            }
            black_box(level.colliders().len())
        })
    });
}

fn bench_physics_tick(c: &mut Criterion) {
    let registry = TemplateRegistry::with_builtin();
    let dims = RoomDimensions::default();
    let mut level = LevelManager::new();
    for (i, template) in registry.iter().enumerate() {
        level.add_room(create_room(template, dims, i as f32 * dims.length, i, i == 0, false));
    }
    let mut input = InputState::new();
    input.press(Action::Forward);

    c.bench_function("player_update_full_level", |b| {
        let mut player = PlayerController::new(PhysicsConfig::default(), LookConfig::default());
        player.init(Vec3::new(0.0, 0.5, 3.0), std::f32::consts::PI);
        b.iter(|| {
            player.update(black_box(1.0 / 60.0), &input, &level, &mut NullSink);
            level.update_moving_platforms(1.0 / 60.0);
        })
    });

    c.bench_function("simulation_frame_speedrun", |b| {
        let mut sim = Simulation::with_defaults();
        let _ = sim.start_game(GameMode::Speedrun);
        b.iter(|| {
            sim.frame(black_box(1.0 / 60.0));
            sim.drain_cues();
        })
    });
}

criterion_group!(
    benches,
    bench_layout_generation,
    bench_maze,
    bench_room_assembly,
    bench_physics_tick
);
criterion_main!(benches);
