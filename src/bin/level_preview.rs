//! Level Preview
//!
//! Loads the room prefabs and generation config from `data/`, builds a level and
//! prints it as an ASCII floor plan (north up) or as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use room_weaver::core::GenerationConfig;
use room_weaver::generation::{generate, LevelState};
use room_weaver::rooms::{RoomCatalog, RoomRole};

/// Level Preview - generate a level and draw it in the terminal
#[derive(Parser, Debug)]
#[command(name = "level_preview")]
#[command(about = "Generate a level from room prefabs and print its floor plan")]
struct Args {
    /// Directory of room prefab TOML files
    #[arg(long, default_value = "data/rooms")]
    rooms: PathBuf,

    /// Generation config file; defaults are used if it does not exist
    #[arg(long, default_value = "data/generation.toml")]
    config: PathBuf,

    /// Seed overriding the config
    #[arg(long)]
    seed: Option<u64>,

    /// Print the level as JSON instead of the floor plan
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("room_weaver=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("level_preview: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut catalog = RoomCatalog::new();
    catalog.load_directory(&args.rooms)?;

    let mut config = if args.config.exists() {
        GenerationConfig::load(&args.config)?
    } else {
        tracing::warn!("No config at {}, using defaults", args.config.display());
        GenerationConfig::default()
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }

    let level = generate(&catalog, &config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&level)?);
        return Ok(());
    }

    println!("{}", render(&level));
    println!("seed {} | {} rooms | {} open passages", level.seed, level.len(), level.unconnected_passage_count());
    if let Some(spawn) = level.spawn_point() {
        println!("player spawn at ({:.1}, {:.1}, {:.1})", spawn.x, spawn.y, spawn.z);
    }

    let overlaps = level.find_overlaps();
    if overlaps.is_empty() {
        println!("overlap audit: clean");
    } else {
        println!("overlap audit: {} problems", overlaps.len());
        for report in overlaps {
            println!("  {} overlaps {}", report.first, report.second);
        }
    }
    Ok(())
}

/// Character used for a room's cells
fn glyph(role: RoomRole, index: usize) -> char {
    match role {
        RoomRole::Start => 'S',
        RoomRole::End => 'E',
        _ => (b'a' + (index % 26) as u8) as char,
    }
}

/// Draw rooms and open passage footprints onto a character grid
fn render(level: &LevelState) -> String {
    let Some(bounds) = level.bounds() else {
        return String::new();
    };
    let width = bounds.size.x as usize;
    let height = bounds.size.y as usize;
    let mut grid = vec![vec![' '; width]; height];

    let mut paint = |min: glam::IVec2, size: glam::IVec2, c: char| {
        for z in min.y..min.y + size.y {
            for x in min.x..min.x + size.x {
                let col = (x - bounds.min.x) as usize;
                let row = (z - bounds.min.y) as usize;
                grid[row][col] = c;
            }
        }
    };

    for (i, room) in level.rooms().iter().enumerate() {
        let b = room.room_box();
        paint(b.min, b.size, glyph(room.role, i));
    }
    for room in level.rooms() {
        for index in room.unconnected_passages() {
            let b = room.passage_box(index);
            paint(b.min, b.size, '+');
        }
    }

    grid.iter()
        .rev()
        .map(|row| row.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
