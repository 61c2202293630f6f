use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use clap::Parser;
use crossbeam_channel::RecvTimeoutError;
use cube::{facelet::FaceletCube, moves::parse_algorithm};
use owo_colors::OwoColorize;
use solver::{Solver, random_scramble, validate};

/// Finds short solutions to scrambled 3x3 cubes with a two-phase search
#[derive(Parser)]
#[command(version, about)]
enum Commands {
    /// Stream ever-shorter solutions for a scrambled state
    Solve {
        /// The scrambled state as a 54 character facelet string
        facelets: String,
        /// Where the lookup tables are cached; generated on first use
        #[arg(long, default_value = "tables")]
        table_dir: PathBuf,
        /// Stop after this many solutions
        #[arg(long)]
        limit: Option<usize>,
        /// Stop searching after this many seconds
        #[arg(long)]
        timeout: Option<f64>,
    },
    /// Print a uniformly random scrambled state
    Scramble,
    /// Check that a facelet string describes a reachable state
    Validate {
        /// The state as a 54 character facelet string
        facelets: String,
    },
    /// Replay an algorithm on a state and print the result
    Apply {
        /// The starting state as a 54 character facelet string
        facelets: String,
        /// Whitespace separated move tokens, e.g. "R U R' U2"
        algorithm: String,
    },
}

fn main() -> color_eyre::Result<()> {
    pretty_env_logger::init();
    let args = Commands::parse();

    match args {
        Commands::Solve {
            facelets,
            table_dir,
            limit,
            timeout,
        } => solve(&facelets, &table_dir, limit, timeout),
        Commands::Scramble => {
            let facelets = random_scramble();
            println!("{facelets}");
            print!("{}", facelets.parse::<FaceletCube>()?.net());
            Ok(())
        }
        Commands::Validate { facelets } => {
            validate(&facelets)?;
            println!("{}", "OK".green());
            Ok(())
        }
        Commands::Apply { facelets, algorithm } => {
            let mut cube = validate(&facelets)?;
            let algorithm = parse_algorithm(&algorithm)?;
            cube.apply_algorithm(&algorithm);
            let facelets = FaceletCube::from(&cube);
            println!("{facelets}");
            print!("{}", facelets.net());
            if cube.is_solved() {
                println!("{}", "SOLVED".green());
            }
            Ok(())
        }
    }
}

fn solve(
    facelets: &str,
    table_dir: &Path,
    limit: Option<usize>,
    timeout: Option<f64>,
) -> color_eyre::Result<()> {
    let solver = Solver::from_table_dir(table_dir)?;
    let solutions = solver.solve(facelets)?;
    let deadline = timeout.map(|seconds| Instant::now() + Duration::from_secs_f64(seconds));
    let mut printed = 0;

    loop {
        let received = match deadline {
            Some(deadline) => solutions.receiver().recv_deadline(deadline),
            None => solutions
                .receiver()
                .recv()
                .map_err(|_| RecvTimeoutError::Disconnected),
        };
        match received {
            Ok(rendered) => {
                println!("{rendered}");
                printed += 1;
                if limit.is_some_and(|limit| printed >= limit) {
                    solutions.cancel();
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                solutions.cancel();
                // The search never finishes empty handed, so this drain blocks
                // until the first solution if none arrived before the deadline.
                for rendered in solutions.receiver().iter() {
                    println!("{rendered}");
                    printed += 1;
                    if limit.is_some_and(|limit| printed >= limit) {
                        break;
                    }
                }
                break;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    Ok(())
}
