//! flapper - Flappy Bird in the terminal, played by hand or by evolved
//! neural networks.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use flapper::build_info;
use flapper::constants::{CONFIG_FILE_NAME, LOG_FILE_NAME, SOLO_FPS};
use flapper::frontend::{Frontend, Headless};
use flapper::game::{SpawnPolicy, SpriteSet};
use flapper::genome_store::{data_dir, GenomeStore, StoredGenome};
use flapper::logging::{self, LogTarget};
use flapper::neuro::{Engine, NeuroGenome};
use flapper::play::run_solo;
use flapper::training::{replay, TrainingConfig, TrainingSession};
use flapper::ui::TerminalFrontend;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "flapper")]
#[command(about = "Flappy Bird in the terminal, with neuro-evolved players")]
#[command(disable_version_flag = true)]
struct Cli {
    /// Show version information
    #[arg(short = 'V', long)]
    version: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play with the keyboard (default)
    Play {
        /// Randomize where new pipes enter the screen
        #[arg(long)]
        hard: bool,

        /// Frames per second
        #[arg(long, default_value_t = SOLO_FPS)]
        fps: u32,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Evolve a population and save the best genome
    Train {
        /// Configuration file (JSON); defaults to the data directory
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Where to write the winner; defaults to the data directory
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Override the configured generation limit
        #[arg(short, long)]
        generations: Option<u32>,

        /// Override the configured seed
        #[arg(long)]
        seed: Option<u64>,

        /// Run without drawing, as fast as possible
        #[arg(long)]
        headless: bool,

        /// Draw lines from each bird to its target gap
        #[arg(long)]
        lines: bool,
    },

    /// Watch a saved genome play
    Replay {
        /// Genome file; defaults to the data directory
        #[arg(short, long)]
        genome: Option<PathBuf>,

        /// Configuration file for spawn policy and frame rate
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Stop after this many pipes (headless runs never stop otherwise)
        #[arg(long)]
        max_score: Option<u32>,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(long)]
        headless: bool,

        #[arg(long)]
        lines: bool,
    },

    /// Write the default configuration file
    InitConfig {
        #[arg(short, long, default_value = CONFIG_FILE_NAME)]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!(
            "flapper {} ({} {})",
            env!("CARGO_PKG_VERSION"),
            build_info::BUILD_DATE,
            build_info::BUILD_COMMIT
        );
        return Ok(());
    }

    let command = cli.command.unwrap_or(Commands::Play {
        hard: false,
        fps: SOLO_FPS,
        seed: None,
    });

    match command {
        Commands::Play { hard, fps, seed } => play(hard, fps, seed),
        Commands::Train {
            config,
            out,
            generations,
            seed,
            headless,
            lines,
        } => train(config, out, generations, seed, headless, lines),
        Commands::Replay {
            genome,
            config,
            max_score,
            seed,
            headless,
            lines,
        } => watch(genome, config, max_score, seed, headless, lines),
        Commands::InitConfig { output } => init_config(output),
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn init_logging(headless: bool) -> anyhow::Result<()> {
    let target = if headless {
        LogTarget::Stderr
    } else {
        LogTarget::File(data_dir()?.join(LOG_FILE_NAME))
    };
    logging::init(&target).context("starting logger")?;
    Ok(())
}

/// Explicit path, else the data-directory file if present, else defaults.
fn load_config(path: Option<PathBuf>) -> anyhow::Result<TrainingConfig> {
    let path = match path {
        Some(path) => path,
        None => {
            let default = data_dir()?.join(CONFIG_FILE_NAME);
            if !default.exists() {
                return Ok(TrainingConfig::default());
            }
            default
        }
    };
    TrainingConfig::from_file(&path).with_context(|| format!("loading {}", path.display()))
}

fn frontend(title: &str, headless: bool, lines: bool) -> anyhow::Result<Box<dyn Frontend>> {
    Ok(if headless {
        Box::new(Headless::new())
    } else {
        Box::new(
            TerminalFrontend::new(title, false)
                .context("setting up terminal")?
                .with_lines(lines),
        )
    })
}

fn play(hard: bool, fps: u32, seed: Option<u64>) -> anyhow::Result<()> {
    init_logging(false)?;
    let policy = if hard {
        SpawnPolicy::randomized()
    } else {
        SpawnPolicy::fixed()
    };
    let sprites = SpriteSet::standard();
    let mut rng = make_rng(seed);

    let summary = {
        let mut terminal = TerminalFrontend::new("Flapper", true).context("setting up terminal")?;
        run_solo(policy, fps, &mut rng, &sprites, &mut terminal)?
    };

    println!(
        "Best score: {} over {} run(s). Goodbye!",
        summary.best_score, summary.runs
    );
    Ok(())
}

fn train(
    config: Option<PathBuf>,
    out: Option<PathBuf>,
    generations: Option<u32>,
    seed: Option<u64>,
    headless: bool,
    lines: bool,
) -> anyhow::Result<()> {
    init_logging(headless)?;
    let mut config = load_config(config)?;
    if let Some(generations) = generations {
        config.generations = generations;
    }
    if seed.is_some() {
        config.seed = seed;
    }
    if headless {
        config.fps = 0;
    }
    config.validate().context("checking configuration")?;

    let store = match out {
        Some(path) => GenomeStore::at(path),
        None => GenomeStore::new()?,
    };
    let sprites = SpriteSet::standard();
    let mut rng = make_rng(config.seed);
    let mut engine = Engine::new(
        config.evolution.clone(),
        make_rng(config.seed.map(|s| s.wrapping_add(1))),
    )?;
    let mut session = TrainingSession::new(config);

    let summary = {
        let mut frontend = frontend("Flapper - Training", headless, lines)?;
        session.run(&mut engine, &mut rng, &sprites, frontend.as_mut())?
    };

    print!("{}", session.reporter.to_text());
    if summary.interrupted {
        println!("\nTraining interrupted; nothing saved.");
        return Ok(());
    }
    let Some(best) = summary.best else {
        bail!("training finished without evaluating a generation");
    };

    println!("\nBest genome: fitness {:.2}", best.fitness);
    store
        .save(&StoredGenome::new(best, summary.generations))
        .with_context(|| format!("saving {}", store.path().display()))?;
    println!("Saved to {}", store.path().display());
    Ok(())
}

fn watch(
    genome: Option<PathBuf>,
    config: Option<PathBuf>,
    max_score: Option<u32>,
    seed: Option<u64>,
    headless: bool,
    lines: bool,
) -> anyhow::Result<()> {
    init_logging(headless)?;
    let config = load_config(config)?;
    let store = match genome {
        Some(path) => GenomeStore::at(path),
        None => GenomeStore::new()?,
    };
    let stored: StoredGenome<NeuroGenome> = store
        .load()
        .with_context(|| format!("loading {}", store.path().display()))?;

    let sprites = SpriteSet::standard();
    let mut rng = make_rng(seed);
    let fps = if headless { 0 } else { config.fps };

    let (genome, outcome) = {
        let mut frontend = frontend("Flapper - Replay", headless, lines)?;
        replay(
            stored.genome,
            config.spawn_policy,
            fps,
            max_score,
            &mut rng,
            &sprites,
            frontend.as_mut(),
        )?
    };

    println!(
        "Replay: {} pipes, fitness {:.2} (trained for {} generations)",
        outcome.score, genome.fitness, stored.generations
    );
    Ok(())
}

fn init_config(output: PathBuf) -> anyhow::Result<()> {
    if output.exists() {
        bail!("{} already exists", output.display());
    }
    TrainingConfig::default()
        .save(&output)
        .with_context(|| format!("writing {}", output.display()))?;
    println!("Wrote default configuration to {}", output.display());
    Ok(())
}
