//! # engine_app demo
//!
//! Registers a handful of systems across phases, builds a pipeline over the
//! selected phases and prints the resulting plan.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use engine_app::{World, WorldConfig};
use engine_builder::{ON_SET, Phase, PipelinePlan, Runtime};
use engine_component::component;

#[derive(Parser)]
#[command(name = "engine_app", about = "Build a demo pipeline and print its plan")]
struct Args {
    /// Phases the pipeline runs (comma separated). Defaults to all phases.
    #[arg(short, long, value_delimiter = ',')]
    phases: Vec<Phase>,

    /// Require components to be registered up front.
    #[arg(long)]
    no_auto_register: bool,

    /// Print the plan as JSON.
    #[arg(long)]
    json: bool,
}

struct Position {
    _x: f32,
    _y: f32,
}
struct Velocity {
    _x: f32,
    _y: f32,
}
struct Health {
    _current: f32,
}
struct Player;

component!(Position, Velocity, Health, Player);

/// Register the demo's systems and observer in `world`.
fn populate(world: &mut World) -> Result<()> {
    if !world.registry().auto_register() {
        let registry = world.registry_mut();
        registry.register_type::<Position>();
        registry.register_type::<Velocity>();
        registry.register_type::<Health>();
        registry.register_type::<Player>();
    }

    world
        .system::<(&Player,)>()
        .name("poll_input")?
        .kind(Phase::OnLoad)?
        .build()?;
    world
        .system::<(Position, &Velocity)>()
        .name("integrate")?
        .build()?;
    world
        .system::<(Velocity,)>()
        .name("damping")?
        .build()?;
    world
        .system::<(&Health,)>()
        .name("check_alive")?
        .kind(Phase::OnValidate)?
        .build()?;
    world
        .system::<(&Position, Option<&Player>)>()
        .name("render")?
        .kind(Phase::OnStore)?
        .build()?;
    world
        .observer::<(&Health,)>()
        .name("on_health_set")?
        .event(ON_SET)?
        .build()?;
    Ok(())
}

fn print_plan(world: &World, plan: &PipelinePlan) {
    for bucket in plan.buckets() {
        let systems: Vec<String> = bucket
            .systems
            .iter()
            .map(|handle| {
                world
                    .system_desc(*handle)
                    .and_then(|desc| desc.query.name.clone())
                    .unwrap_or_else(|| handle.entity().to_string())
            })
            .collect();
        println!("{:<12} {}", bucket.phase, systems.join(", "));
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = WorldConfig::from_env()?;
    if args.no_auto_register {
        config.auto_register = false;
    }
    let mut world = World::new(config);

    populate(&mut world)?;

    let pipeline = world.pipeline().name("main")?.phases(args.phases)?.build()?;
    info!(
        buckets = pipeline.plan().len(),
        systems = pipeline.plan().systems().count(),
        "pipeline ready"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(pipeline.plan())?);
    } else {
        print_plan(&world, pipeline.plan());
    }

    Ok(())
}
