//! # Emberfell World Generator CLI
//!
//! Generates a world from a seed and prints ASCII previews of the overworld
//! and the linked dungeon, plus generation statistics. Snapshots can be
//! saved to and restored from JSON.

use clap::Parser;
use emberfell::{
    DungeonStyle, GenerationConfig, LocationKind, Theme, World, WorldError, WorldResult,
    WorldSnapshot,
};
use std::path::PathBuf;

/// Command line arguments for the world generator.
#[derive(Parser, Debug)]
#[command(name = "emberfell")]
#[command(about = "Procedural world generator for a tile-based RPG")]
#[command(version)]
struct Args {
    /// Random seed for world generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Overworld width in tiles
    #[arg(long)]
    width: Option<u32>,

    /// Overworld height in tiles
    #[arg(long)]
    height: Option<u32>,

    /// Dungeon theme (classic, caves, temple, city, crypts, random)
    #[arg(short, long, default_value = "classic")]
    theme: String,

    /// Use the Wave Function Collapse dungeon generator
    #[arg(long)]
    wfc: bool,

    /// Write the generated world to a JSON snapshot
    #[arg(long)]
    save: Option<PathBuf>,

    /// Restore a world from a JSON snapshot instead of generating
    #[arg(long)]
    load: Option<PathBuf>,

    /// Print the dungeon map as well as the overworld
    #[arg(long)]
    show_dungeon: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> WorldResult<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .parse_filters(&args.log_level)
        .init();

    log::info!("Emberfell world core v{}", emberfell::VERSION);

    let world = if let Some(path) = &args.load {
        log::info!("restoring world from {}", path.display());
        let snapshot = WorldSnapshot::load_from_json(path)?;
        World::from_snapshot(snapshot)
    } else {
        let seed = args.seed.unwrap_or(12345);
        let mut config = GenerationConfig::new(seed);
        if let Some(width) = args.width {
            config.world_width = width;
        }
        if let Some(height) = args.height {
            config.world_height = height;
        }
        let theme = parse_theme(&args.theme, seed)?;
        config.dungeon_style = if args.wfc {
            DungeonStyle::Wfc(theme)
        } else {
            DungeonStyle::Classic(theme)
        };

        log::info!("generating world with seed {seed}");
        World::generate(config)
    };

    print_overworld(&world);
    if args.show_dungeon {
        print_dungeon(&world);
    }
    print_stats(&world);

    if let Some(path) = &args.save {
        world.snapshot().save_to_json(path)?;
        log::info!("world saved to {}", path.display());
        println!("Saved snapshot to {}", path.display());
    }

    Ok(())
}

fn parse_theme(name: &str, seed: u64) -> WorldResult<Theme> {
    match name.to_lowercase().as_str() {
        "classic" => Ok(Theme::ClassicDungeon),
        "caves" => Ok(Theme::NaturalCaves),
        "temple" => Ok(Theme::AncientTemple),
        "city" => Ok(Theme::UndergroundCity),
        "crypts" => Ok(Theme::Crypts),
        "random" => {
            use rand::{Rng, SeedableRng};
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            Ok(Theme::ALL[rng.gen_range(0..Theme::ALL.len())])
        }
        other => Err(WorldError::InvalidState(format!(
            "unknown theme '{other}', expected classic, caves, temple, city, crypts, or random"
        ))),
    }
}

fn print_overworld(world: &World) {
    let terrain = world.terrain();
    println!("Overworld ({}x{}):", terrain.width(), terrain.height());
    for y in 0..terrain.height() as i32 {
        let mut line = String::with_capacity(terrain.width() as usize);
        for x in 0..terrain.width() as i32 {
            line.push(world.tile_render_info(x, y, LocationKind::Overworld).glyph);
        }
        println!("{line}");
    }
}

fn print_dungeon(world: &World) {
    let dungeon = world.dungeon();
    println!(
        "\nDungeon, {} theme ({}x{}):",
        dungeon.theme.name(),
        dungeon.tiles.width(),
        dungeon.tiles.height()
    );
    for y in 0..dungeon.tiles.height() as i32 {
        let mut line = String::with_capacity(dungeon.tiles.width() as usize);
        for x in 0..dungeon.tiles.width() as i32 {
            line.push(world.tile_render_info(x, y, LocationKind::Dungeon).glyph);
        }
        println!("{line}");
    }
}

fn print_stats(world: &World) {
    let dungeon = world.dungeon();
    println!("\nSeed: {}", world.config().seed);
    println!("Settlements: {}", world.settlements().len());
    for settlement in world.settlements() {
        println!(
            "  {:?} at ({}, {}) with {} buildings",
            settlement.category,
            settlement.center.x,
            settlement.center.y,
            settlement.buildings.len()
        );
    }
    println!("Dungeon theme: {}", dungeon.theme.name());
    println!("Dungeon rooms: {}", dungeon.rooms.len());
    println!("Dungeon entrances: {}", dungeon.entrances.len());
    println!("Treasure chests: {}", dungeon.chests.len());
    println!(
        "Start position: ({}, {})",
        world.start_position().x,
        world.start_position().y
    );
}
