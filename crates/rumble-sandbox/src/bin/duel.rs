//! duel: two scripted brawlers in a sandbox arena.
//!
//! Usage:
//!   cargo run --bin duel -- [--seed N] [--ticks N] [--config arena.json]
//!
//! Each bot walks toward its opponent and, at random, jumps, dashes or
//! slams. Impacts are logged as they happen; the final arena snapshot is
//! printed to stdout as JSON. `RUST_LOG` overrides the default `info` filter.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rumble_core::{EntityId, EventLog, MovementController, MovementEvent, MovementState};
use rumble_sandbox::{hash_arena, ActorSpawn, Arena, ArenaConfig};
use tracing::{debug, info};

#[derive(Debug)]
struct Args {
    seed: u64,
    ticks: u64,
    config: Option<PathBuf>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            seed: 7,
            ticks: 1500,
            config: None,
        }
    }
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(flag) = it.next() {
        match flag.as_str() {
            "--seed" => {
                let value = it.next().context("--seed needs a value")?;
                args.seed = value
                    .parse()
                    .with_context(|| format!("invalid seed '{value}'"))?;
            }
            "--ticks" => {
                let value = it.next().context("--ticks needs a value")?;
                args.ticks = value
                    .parse()
                    .with_context(|| format!("invalid tick count '{value}'"))?;
            }
            "--config" => {
                args.config = Some(it.next().context("--config needs a path")?.into());
            }
            other => bail!("unknown argument '{other}'"),
        }
    }
    Ok(args)
}

fn load_config(path: Option<&PathBuf>) -> Result<ArenaConfig> {
    let Some(path) = path else {
        return Ok(ArenaConfig::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("read arena config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse arena config {}", path.display()))
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Per-tick odds of each bot action.
const JUMP_CHANCE: f64 = 0.02;
const DASH_CHANCE: f64 = 0.03;
const SLAM_CHANCE: f64 = 0.2;

/// Bots stop closing in once this near.
const ENGAGE_DISTANCE: f32 = 0.8;

fn drive_bot(controller: &mut MovementController, toward: Vec3, rng: &mut ChaCha8Rng) {
    let flat = Vec3::new(toward.x, 0.0, toward.z);
    if flat.length() > ENGAGE_DISTANCE {
        let heading = flat.normalize();
        controller.request_move_right(heading.x);
        controller.request_move_forward(heading.z);
    }

    match controller.current_state() {
        MovementState::Grounding => {
            if rng.gen_bool(JUMP_CHANCE) {
                controller.request_jump();
            } else if rng.gen_bool(DASH_CHANCE) {
                controller.request_dash();
            }
        }
        MovementState::Jumping => {
            if rng.gen_bool(SLAM_CHANCE) {
                controller.request_slam();
            } else if rng.gen_bool(DASH_CHANCE) {
                controller.request_dash();
            }
        }
        MovementState::Dashing | MovementState::Slamming => {}
    }
}

fn position(arena: &Arena, id: EntityId) -> Result<Vec3> {
    arena
        .world()
        .body(id)
        .map(|body| body.position)
        .with_context(|| format!("actor {id} vanished"))
}

fn main() -> Result<()> {
    init_tracing();
    let args = parse_args()?;
    let config = load_config(args.config.as_ref())?;

    let mut arena = Arena::new(config).context("build arena")?;
    let red = arena.spawn_actor(ActorSpawn::standing_at(-4.0, 0.0))?;
    let blue = arena.spawn_actor(ActorSpawn::standing_at(4.0, 0.0))?;

    let log = EventLog::new();
    for id in [red, blue] {
        arena
            .controller_mut(id)
            .with_context(|| format!("no controller for {id}"))?
            .add_observer(log.clone());
    }

    info!(seed = args.seed, ticks = args.ticks, %red, %blue, "duel started");
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut impacts = 0usize;
    let mut transitions = 0usize;

    for _ in 0..args.ticks {
        for (me, them) in [(red, blue), (blue, red)] {
            let toward = position(&arena, them)? - position(&arena, me)?;
            if let Some(controller) = arena.controller_mut(me) {
                drive_bot(controller, toward, &mut rng);
            }
        }
        arena.step();

        for event in log.take_events() {
            match event {
                MovementEvent::ImpactApplied(impact) => {
                    impacts += 1;
                    info!(
                        tick = arena.tick(),
                        kind = %impact.kind,
                        attacker = %impact.attacker,
                        target = %impact.target,
                        damage = impact.damage,
                        push = ?impact.push,
                        "impact"
                    );
                }
                MovementEvent::Entered { entity, state } => {
                    transitions += 1;
                    debug!(tick = arena.tick(), %entity, ?state, "entered");
                }
                MovementEvent::Exited { .. } => {}
            }
        }
    }

    let snapshot = arena.snapshot();
    for actor in &snapshot.actors {
        info!(id = %actor.id, state = ?actor.state, rage = actor.rage, "final");
    }
    info!(
        ticks = arena.tick(),
        impacts,
        transitions,
        hash = %format!("{:016x}", hash_arena(&arena)),
        "duel finished"
    );

    println!(
        "{}",
        serde_json::to_string_pretty(&snapshot).context("serialize snapshot")?
    );
    Ok(())
}
