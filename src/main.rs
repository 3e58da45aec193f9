// Import the clap Parser derive macro for CLI argument parsing
use clap::Parser;

// Import our library types
use flies::{
    render_frame, Checkpoint, GenerationSummary, Population, RenderStyle, SeededRandom,
    SimulationConfig, TickOutcome,
};

// Import indicatif for progress bars
use indicatif::{ProgressBar, ProgressStyle};

// Logging facade; env_logger decides what gets printed
use log::{debug, info};

// Import standard library modules
use std::fs;
use std::path::Path;

/// Flies - evolve a swarm toward a goal with a genetic algorithm
///
/// Every fly follows a genome of per-tick moves. When the whole generation
/// has run out of moves, the fly that ended up closest to the goal becomes
/// the only parent of the next generation, and its children replay its moves
/// with occasional mutations.
///
/// **Rust Concept: Derive macros for CLI parsing**
/// The `#[derive(Parser)]` macro automatically generates argument parsing code
/// The doc comments become help text!
#[derive(Parser)]
#[command(name = "flies")]
#[command(about = "Evolve flies toward a goal using a genetic algorithm", long_about = None)]
#[command(version)]
struct Args {
    /// JSON configuration file
    ///
    /// Any field left out falls back to the built-in defaults
    /// (600x600 bounds, 500 flies, 90 moves, speed 7, 5% mutation).
    #[arg(short, long)]
    config: Option<String>,

    /// Resume from a checkpoint written by --checkpoint
    ///
    /// The checkpoint's configuration is used; --config and the overrides
    /// below are ignored.
    #[arg(long, conflicts_with = "config")]
    resume: Option<String>,

    /// Number of flies per generation (overrides the config file)
    #[arg(short, long)]
    population: Option<usize>,

    /// Moves per fly lifetime (overrides the config file)
    #[arg(long)]
    max_moves: Option<usize>,

    /// Largest step per axis per tick (overrides the config file)
    #[arg(long)]
    speed: Option<i32>,

    /// Chance in percent of re-rolling an inherited move (overrides the config file)
    #[arg(long)]
    mutation_rate: Option<u8>,

    /// Seed for the random number generator
    ///
    /// Runs with the same seed and configuration are identical.
    /// A random seed is chosen (and logged) when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of generations to run
    #[arg(short, long, default_value_t = 100)]
    generations: u64,

    /// Output directory for rendered frames
    #[arg(short, long, default_value = "./output")]
    output: String,

    /// Save a frame every N generations
    ///
    /// The final generation is always saved.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    save_interval: u64,

    /// Write a checkpoint file when the run finishes
    #[arg(long)]
    checkpoint: Option<String>,

    /// Number of threads for parallel fitness evaluation
    ///
    /// Limits Rayon's thread pool size. By default, uses all available CPU cores.
    #[arg(short = 't', long)]
    threads: Option<usize>,
}

/// Main entry point for the CLI application
fn main() {
    // `RUST_LOG=debug` shows a line per generation
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command line arguments
    // If parsing fails (invalid args), clap automatically prints help and exits
    let args = Args::parse();

    // Run the simulation and handle any errors
    // Using a separate function keeps main() clean
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Build the configuration from the file (if any) plus command line overrides
fn load_config(args: &Args) -> Result<SimulationConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => {
            if !Path::new(path).exists() {
                return Err(format!("Config file not found: {}", path).into());
            }
            SimulationConfig::from_json_file(path)?
        }
        None => SimulationConfig::default(),
    };

    if let Some(population) = args.population {
        config.population_size = population;
    }
    if let Some(max_moves) = args.max_moves {
        config.max_moves = max_moves;
    }
    if let Some(speed) = args.speed {
        config.speed = speed;
    }
    if let Some(mutation_rate) = args.mutation_rate {
        config.mutation_rate = mutation_rate;
    }

    // Overrides can break a valid file, so check again
    config.validate()?;
    Ok(config)
}

/// Run the genetic algorithm with given arguments
fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    // Step 0: Configure Rayon thread pool if thread limit is specified
    if let Some(num_threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
        info!("Using {} thread(s) for fitness evaluation", num_threads);
    }

    // Step 1: Create output directory if it doesn't exist
    fs::create_dir_all(&args.output)?;

    // Step 2: Seed the random source
    let seed = args.seed.unwrap_or_else(rand::random);
    info!("Random seed: {}", seed);
    let rng = SeededRandom::new(seed);

    // Step 3: Create the population, fresh or from a checkpoint
    let mut pop = match &args.resume {
        Some(path) => {
            let checkpoint = Checkpoint::load(path)?;
            info!("Resuming from {} at generation {}", path, checkpoint.generation);
            Population::from_checkpoint(checkpoint, rng)?
        }
        None => Population::new(load_config(&args)?, rng)?,
    };

    let config = pop.config().clone();
    info!("Population size: {}", config.population_size);
    info!("Moves per fly: {}", config.max_moves);
    info!("Speed: {}", config.speed);
    info!("Mutation rate: {}%", config.mutation_rate);
    info!(
        "Bounds: {}x{}, start ({}, {}), {} goal(s)",
        config.width,
        config.height,
        config.start.x,
        config.start.y,
        config.goals.len()
    );

    // Step 4: Setup progress bar
    let pb = ProgressBar::new(args.generations);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} (ETA: {eta}) | {msg}")?
            .progress_chars("=>-"),
    );

    let style = RenderStyle::default();
    let mut completed = 0;
    let mut best_overall = f64::NEG_INFINITY;

    // Step 5: Tick until enough generations have finished
    while completed < args.generations {
        let summary = match pop.tick() {
            TickOutcome::Continued => continue,
            TickOutcome::NewGeneration(summary) => summary,
        };
        completed += 1;
        best_overall = best_overall.max(summary.best_fitness);

        debug!(
            "generation {}: best {:.2}, mean {:.2}, goals {}, parent {:?}",
            summary.generation,
            summary.best_fitness,
            summary.mean_fitness,
            summary.best_goals_reached,
            summary.parent_index
        );

        pb.set_message(format!(
            "Gen {} | Best: {:.2}, Avg: {:.2}, Goals: {}",
            summary.generation, summary.best_fitness, summary.mean_fitness, summary.best_goals_reached
        ));
        pb.inc(1);

        if completed % args.save_interval == 0 || completed == args.generations {
            save_frame(&config, &summary, &style, &args.output)?;
        }
    }

    pb.finish_with_message("Evolution complete!");

    // Step 6: Optionally persist the run so it can be resumed
    if let Some(path) = &args.checkpoint {
        pop.checkpoint().save(path)?;
        info!("Checkpoint written to {}", path);
    }

    info!("Best fitness seen: {:.2}", best_overall);
    info!("Now at generation {}", pop.generation());
    info!("Frames saved in {} (latest.png is the final one)", args.output);

    Ok(())
}

/// Render the final state of a finished generation and save it
fn save_frame(
    config: &SimulationConfig,
    summary: &GenerationSummary,
    style: &RenderStyle,
    output_dir: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let img = render_frame(config, &summary.final_flies, &config.goals, style);

    // Format: generation_00001.png, generation_00010.png, etc.
    let filename = format!("{}/generation_{:05}.png", output_dir, summary.generation);
    img.save(&filename)?;

    // Also save as "latest.png" for easy viewing
    let latest = format!("{}/latest.png", output_dir);
    img.save(&latest)?;

    debug!("Saved {}", filename);
    Ok(())
}
