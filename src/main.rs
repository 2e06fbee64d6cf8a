//! Command-line front end for the cube solver.
//!
//! `snapcube solve` reads a state from the command line or a JSON file,
//! runs the selected strategy, and prints (and optionally saves) the
//! solution. `snapcube scramble` and `snapcube bench` generate random
//! scrambles and time a solver over a batch of them.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use snapcube::{format_sequence, solve, Heuristic, Move, SolveConfig, Strategy};

#[derive(Parser)]
#[command(name = "snapcube", about = "Rubik's cube solver", version)]
struct Cli {
    /// Log search progress
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a cube state
    Solve {
        /// 54-character state string over W, O, G, R, B, Y
        #[arg(short, long, conflicts_with = "file")]
        state: Option<String>,

        /// JSON file containing a "state" key
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "ida")]
        method: Method,

        /// Heuristic for the iterative-deepening search
        #[arg(long, value_enum, default_value = "misplaced")]
        heuristic: HeuristicChoice,

        /// Give up after examining this many states
        #[arg(long)]
        node_budget: Option<u64>,

        /// Give up after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Write the solution as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a random scramble and the state it produces
    Scramble {
        /// Number of moves
        #[arg(short, long, default_value_t = 25)]
        length: usize,

        /// Seed for a reproducible scramble
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Time a solver over a batch of random scrambles
    Bench {
        #[arg(long, default_value_t = 10)]
        scrambles: usize,

        /// Moves per scramble
        #[arg(short, long, default_value_t = 6)]
        length: usize,

        #[arg(short, long, value_enum, default_value = "two-phase")]
        method: Method,

        /// Seed for a reproducible batch
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Method {
    Bfs,
    Ida,
    TwoPhase,
}

impl From<Method> for Strategy {
    fn from(method: Method) -> Strategy {
        match method {
            Method::Bfs => Strategy::Bfs,
            Method::Ida => Strategy::IdaStar,
            Method::TwoPhase => Strategy::TwoPhase,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum HeuristicChoice {
    Misplaced,
    WrongFace,
}

impl From<HeuristicChoice> for Heuristic {
    fn from(choice: HeuristicChoice) -> Heuristic {
        match choice {
            HeuristicChoice::Misplaced => Heuristic::Misplaced,
            HeuristicChoice::WrongFace => Heuristic::WrongFace,
        }
    }
}

#[derive(Deserialize)]
struct StateFile {
    state: String,
}

#[derive(Serialize)]
struct SolutionOutput {
    moves: Vec<String>,
    num_moves: usize,
    nodes_examined: u64,
    solution_string: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    simple_logger::init_with_level(level)?;

    match cli.command {
        Commands::Solve {
            state,
            file,
            method,
            heuristic,
            node_budget,
            timeout,
            output,
        } => {
            let state = match (state, file) {
                (Some(state), _) => state,
                (None, Some(path)) => load_state(&path)?,
                (None, None) => anyhow::bail!("provide a state with --state or --file"),
            };
            let config = SolveConfig {
                strategy: method.into(),
                heuristic: heuristic.into(),
                node_budget,
                timeout: timeout.map(Duration::from_secs),
                ..SolveConfig::default()
            };
            run_solve(&state, &config, output.as_deref())
        }
        Commands::Scramble { length, seed } => {
            let scramble = random_scramble(length, &mut rng_from(seed));
            println!("{}", format_sequence(&scramble));
            println!(
                "{}",
                snapcube::Cube::solved().apply_all(scramble).to_state_string()
            );
            Ok(())
        }
        Commands::Bench {
            scrambles,
            length,
            method,
            seed,
        } => run_bench(scrambles, length, method, seed),
    }
}

fn load_state(path: &std::path::Path) -> anyhow::Result<String> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading state file {}", path.display()))?;
    let parsed: StateFile = serde_json::from_str(&text)
        .with_context(|| format!("parsing state file {}", path.display()))?;
    Ok(parsed.state)
}

fn run_solve(
    state: &str,
    config: &SolveConfig,
    output: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    let started = Instant::now();
    let solution = solve(state, config)?;
    log::info!(
        "solved in {:?}: {} moves, {} states examined",
        started.elapsed(),
        solution.moves.len(),
        solution.nodes_examined
    );

    if solution.moves.is_empty() {
        println!("already solved");
    } else {
        println!("{}", solution);
    }

    if let Some(path) = output {
        let report = SolutionOutput {
            moves: solution.moves.iter().map(|m| m.to_string()).collect(),
            num_moves: solution.moves.len(),
            nodes_examined: solution.nodes_examined,
            solution_string: solution.to_string(),
        };
        fs::write(path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("writing solution to {}", path.display()))?;
        log::info!("solution written to {}", path.display());
    }
    Ok(())
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Uniform random moves, never turning the same face twice in a row.
fn random_scramble(length: usize, rng: &mut StdRng) -> Vec<Move> {
    let all: Vec<Move> = Move::all().collect();
    let mut moves: Vec<Move> = Vec::with_capacity(length);
    while moves.len() < length {
        let candidate = all[rng.gen_range(0..all.len())];
        if moves.last().is_some_and(|prev| prev.face == candidate.face) {
            continue;
        }
        moves.push(candidate);
    }
    moves
}

fn run_bench(scrambles: usize, length: usize, method: Method, seed: Option<u64>) -> anyhow::Result<()> {
    let mut rng = rng_from(seed);
    let config = SolveConfig {
        strategy: method.into(),
        ..SolveConfig::default()
    };

    let mut total_moves = 0usize;
    let mut total_nodes = 0u64;
    let mut max_nodes = 0u64;
    let started = Instant::now();

    for i in 0..scrambles {
        let scramble = random_scramble(length, &mut rng);
        let state = snapcube::Cube::solved()
            .apply_all(scramble.iter().copied())
            .to_state_string();
        let solve_started = Instant::now();
        let solution = solve(&state, &config)
            .with_context(|| format!("scramble {}: {}", i + 1, format_sequence(&scramble)))?;
        log::info!(
            "scramble {}/{}: {} -> {} moves, {} states, {:?}",
            i + 1,
            scrambles,
            format_sequence(&scramble),
            solution.moves.len(),
            solution.nodes_examined,
            solve_started.elapsed(),
        );
        total_moves += solution.moves.len();
        total_nodes += solution.nodes_examined;
        max_nodes = max_nodes.max(solution.nodes_examined);
    }

    println!(
        "{} scrambles of length {} via {:?}",
        scrambles, length, method
    );
    println!(
        "mean solution length: {:.1}",
        total_moves as f64 / scrambles as f64
    );
    println!(
        "mean states examined: {:.0} (max {})",
        total_nodes as f64 / scrambles as f64,
        max_nodes
    );
    println!("total time: {:?}", started.elapsed());
    Ok(())
}
