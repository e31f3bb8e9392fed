//! Life sandbox CLI - Run a session headless from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use life_sandbox::{
    schema::{SandboxConfig, Seed},
    session::Session,
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "--example" {
        print_example_config();
        return;
    }

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [generations] [pattern.rle]", args[0]);
        eprintln!();
        eprintln!("Run a Game of Life session from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to sandbox configuration file");
        eprintln!("  generations  Number of generations to run (default: 100)");
        eprintln!("  pattern.rle  RLE pattern to place at the grid center");
        eprintln!();
        eprintln!("Example configuration is printed with the --example flag.");
        std::process::exit(1);
    }

    let config_path = PathBuf::from(&args[1]);
    let generations: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);

    let config = SandboxConfig::load(&config_path).unwrap_or_else(|e| {
        eprintln!("Error loading config: {}", e);
        std::process::exit(1);
    });

    // An explicit RLE file wins over the sibling seed file
    let seed: Seed = if let Some(rle_path) = args.get(3) {
        let text = fs::read_to_string(rle_path).unwrap_or_else(|e| {
            eprintln!("Error reading pattern file: {}", e);
            std::process::exit(1);
        });
        Seed::Rle { text }
    } else {
        let seed_path = config_path.with_extension("seed.json");
        if seed_path.exists() {
            let seed_str = fs::read_to_string(&seed_path).unwrap_or_else(|e| {
                eprintln!("Error reading seed file: {}", e);
                std::process::exit(1);
            });
            serde_json::from_str(&seed_str).unwrap_or_else(|e| {
                eprintln!("Error parsing seed: {}", e);
                std::process::exit(1);
            })
        } else {
            Seed::default()
        }
    };

    let mut session = Session::with_seed(config, &seed).unwrap_or_else(|e| {
        eprintln!("Error creating session: {}", e);
        std::process::exit(1);
    });

    let (height, width) = session.grid().dimensions();
    println!("Life Sandbox");
    println!("============");
    println!("Grid: {}x{}", height, width);
    println!("Generations: {}", generations);
    println!("Initial: {}", session.stats());
    println!();

    let start = Instant::now();
    for i in 0..generations {
        session.step();

        // Print progress every 10%
        if (i + 1) % (generations / 10).max(1) == 0 {
            let elapsed = start.elapsed().as_secs_f32();
            println!(
                "  {} ({:.1} gen/s)",
                session.stats(),
                (i + 1) as f32 / elapsed.max(f32::EPSILON)
            );
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("Final: {}", session.stats());
    println!(
        "Time: {:.3}s ({:.1} gen/s)",
        elapsed.as_secs_f32(),
        generations as f32 / elapsed.as_secs_f32().max(f32::EPSILON)
    );
    println!();

    let (row, col) = session.viewport().origin();
    let (rows, cols) = session.viewport().size();
    println!("View {}x{} at ({}, {}):", rows, cols, row, col);
    for line in session.visible_cells() {
        let text: String = line.iter().map(|&c| if c { 'o' } else { '.' }).collect();
        println!("{}", text);
    }
    println!();
    println!("{}", session.export_rle());
}

fn print_example_config() {
    let config = SandboxConfig::default();
    let seed = Seed::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
    println!();
    println!("Example seed (config.seed.json):");
    match serde_json::to_string_pretty(&seed) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing seed: {}", e),
    }
}
