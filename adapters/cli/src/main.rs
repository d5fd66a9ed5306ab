#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives the Turret Defence turret subsystem.

mod board;
mod config;
mod script;

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use turret_defence_catalog::TurretCatalog;
use turret_defence_core::Command;
use turret_defence_system_builder::Builder;
use turret_defence_world::{self as world, query, World};

use crate::{board::TextBoard, config::GameConfig, script::Step};

#[derive(Parser)]
#[command(author, version, about = "Turret pool and template catalog tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print every template stored in a turret catalog
    Catalog {
        /// Path to a `turrets.dat` file.
        path: PathBuf,
    },
    /// Replay a session script against a configured world
    Play {
        /// Game configuration file.
        #[arg(short, long, default_value = "assets/game.toml")]
        config: PathBuf,
        /// Script to replay; read from stdin when omitted.
        script: Option<PathBuf>,
    },
}

/// Entry point for the Turret Defence command-line interface.
fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();

    match Cli::parse().cmd {
        Cmd::Catalog { path } => print_catalog(&path),
        Cmd::Play { config, script } => play(&config, script.as_deref()),
    }
}

fn print_catalog(path: &Path) -> Result<()> {
    let catalog = TurretCatalog::load(path)?;
    println!(
        "{:>4} {:>5} {:>8} {:>6} {:>8} {:>6} {:>6} {:>6}",
        "kind", "level", "upgrade", "sprite", "purchase", "rate", "damage", "radius"
    );
    for stats in catalog.iter() {
        println!(
            "{:>4} {:>5} {:>8} {:>6} {:>8} {:>6.2} {:>6} {:>6}",
            stats.kind,
            stats.level,
            stats.upgrade_cost,
            stats.sprite_index,
            stats.purchase_cost,
            stats.fire_rate,
            stats.damage,
            stats.radius,
        );
    }
    Ok(())
}

fn play(config_path: &Path, script_path: Option<&Path>) -> Result<()> {
    let config = GameConfig::load(config_path)?;
    let mut world = config.build_world()?;

    let contents = match script_path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read script at {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            let _ = io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read script from stdin")?;
            buffer
        }
    };
    let steps = script::parse(&contents)?;

    let mut builder = Builder::new();
    let mut commands = Vec::new();
    let mut events = Vec::new();
    for step in steps {
        match step {
            Step::Input(input) => {
                builder.handle(
                    input,
                    |cell| query::turret_at(&world, cell).is_some(),
                    &mut commands,
                );
            }
            Step::Tick(dt) => commands.push(Command::Tick { dt }),
            Step::Earn(amount) => commands.push(Command::Earn { amount }),
            Step::Show => show(&world),
        }

        for command in commands.drain(..) {
            world::apply(&mut world, command, &mut events);
        }
        for event in events.drain(..) {
            println!("{}", board::describe(&event));
        }
    }

    show(&world);
    Ok(())
}

fn show(world: &World) {
    let mut board = TextBoard::default();
    query::render(world, &mut board);
    print!("{}", board.compose(query::grid(world)));
    println!(
        "money {} | turrets {}/{}",
        query::balance(world),
        query::turret_view(world).len(),
        query::capacity(world)
    );
}
