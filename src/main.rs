use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;

use kudoku::console;
use kudoku::generate::{create_puzzle, generate_solved};
use kudoku::grid::Grid;
use kudoku::io::{load_grid, save_grid};
use kudoku::solver;

#[derive(Parser, Debug)]
#[command(name = "kudoku", version, about = "Iterative Sudoku solver, generator, and puzzle carver")]
struct Cli {
    /// Seed for the random number generator (entropy-seeded if omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve a puzzle from a file, or from stdin if no file is given
    Solve {
        /// Puzzle file: 9 lines of 9 tokens (1-9, 0 or '.')
        input: Option<PathBuf>,
    },
    /// Generate a fully filled valid grid
    Generate {
        /// Write the grid to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Remove cells from a solved grid to produce a puzzle
    Carve {
        /// Solved grid file; a fresh grid is generated if omitted
        input: Option<PathBuf>,
        /// How many cells to empty (0..=81)
        #[arg(short, long, default_value_t = 40)]
        remove: usize,
        /// Accept every removal without checking solvability
        #[arg(long)]
        unchecked: bool,
        /// Write the puzzle to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Check a grid and report the first constraint violation
    Check {
        input: Option<PathBuf>,
    },
    /// Interactive console session (the default)
    Play,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match cli.command {
        Some(Command::Solve { input }) => cmd_solve(input),
        Some(Command::Generate { out }) => cmd_generate(&mut rng, out),
        Some(Command::Carve { input, remove, unchecked, out }) => {
            cmd_carve(&mut rng, input, remove, !unchecked, out)
        }
        Some(Command::Check { input }) => cmd_check(input),
        Some(Command::Play) | None => play(&mut rng),
    }
}

fn read_input(input: Option<PathBuf>) -> Result<Grid> {
    match input {
        Some(path) => load_grid(path),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Grid::parse(&text).context("parsing stdin")
        }
    }
}

fn cmd_solve(input: Option<PathBuf>) -> Result<()> {
    let mut grid = read_input(input)?;
    if let Err(reason) = grid.validate() {
        bail!("invalid grid: {reason}");
    }
    match solver::solve(&mut grid) {
        Ok(()) => {
            println!("{grid}");
            Ok(())
        }
        Err(err) => bail!("{err}"),
    }
}

fn cmd_generate(rng: &mut StdRng, out: Option<PathBuf>) -> Result<()> {
    let grid = generate_solved(rng);
    match out {
        Some(path) => {
            save_grid(&path, &grid)?;
            println!("Saved to {}", path.display());
        }
        None => println!("{grid}"),
    }
    Ok(())
}

fn cmd_carve(
    rng: &mut StdRng,
    input: Option<PathBuf>,
    remove: usize,
    ensure_solvable: bool,
    out: Option<PathBuf>,
) -> Result<()> {
    if remove > 81 {
        bail!("--remove must be in 0..=81, got {remove}");
    }

    let solved = match input {
        Some(path) => {
            let grid = load_grid(path)?;
            if !grid.is_complete() {
                bail!("the input grid is not completely filled");
            }
            if let Err(reason) = grid.validate() {
                bail!("the input grid is not a valid solution: {reason}");
            }
            grid
        }
        None => generate_solved(rng),
    };

    let carved = create_puzzle(&solved, remove, ensure_solvable, rng);
    match out {
        Some(path) => {
            save_grid(&path, &carved.grid)?;
            println!("Saved to {}", path.display());
        }
        None => println!("{}", carved.grid),
    }
    println!("Removed {} of {} requested cells.", carved.removed, remove);
    Ok(())
}

fn cmd_check(input: Option<PathBuf>) -> Result<()> {
    let grid = read_input(input)?;
    match grid.validate() {
        Ok(()) => {
            println!("{}", "Grid is valid.".green());
            Ok(())
        }
        Err(reason) => bail!("invalid grid: {reason}"),
    }
}

fn print_menu() {
    println!();
    println!("{}", "===== SUDOKU =====".bold());
    println!("1) Show the current grid");
    println!("2) Enter a grid manually (9 rows)");
    println!("3) Load from a file");
    println!("4) Save to a file");
    println!("5) Check the grid");
    println!("6) Solve (iteratively, no recursion)");
    println!("7) Generate a filled valid grid");
    println!("8) Carve a puzzle (remove digits)");
    println!("0) Quit");
}

/// Menu loop. Every failed operation leaves the last-known-good grid in
/// place and returns to the menu.
fn play(rng: &mut StdRng) -> Result<()> {
    let mut grid = Grid::new();

    loop {
        print_menu();

        let Ok(choice) = console::read_int_in_range("Select an option: ", 0, 8) else {
            // stdin closed; leave quietly
            println!();
            return Ok(());
        };

        match choice {
            0 => {
                println!("Bye.");
                return Ok(());
            }
            1 => println!("{grid}"),
            2 => {
                println!("Enter 9 rows of 9 characters: digits 1-9, with 0 or '.' for empty.");
                match console::read_grid_from_stdin() {
                    Ok(entered) => match entered.validate() {
                        Ok(()) => {
                            grid = entered;
                            println!("{}", "Grid updated.".green());
                        }
                        Err(reason) => {
                            println!("{} {reason}", "Grid rejected:".red());
                        }
                    },
                    Err(err) => println!("{} {err}", "Could not read the grid:".red()),
                }
            }
            3 => {
                let Ok(path) = console::read_line("File to load: ") else {
                    continue;
                };
                match load_grid(&path) {
                    Ok(loaded) => match loaded.validate() {
                        Ok(()) => {
                            grid = loaded;
                            println!("{}", "Loaded.".green());
                        }
                        Err(reason) => {
                            println!("{} {reason}", "File loaded, but the grid is invalid:".red());
                        }
                    },
                    Err(err) => println!("{} {err:#}", "Load failed:".red()),
                }
            }
            4 => {
                let Ok(path) = console::read_line("File to save to: ") else {
                    continue;
                };
                match save_grid(&path, &grid) {
                    Ok(()) => println!("{}", "Saved.".green()),
                    Err(err) => println!("{} {err:#}", "Save failed:".red()),
                }
            }
            5 => match grid.validate() {
                Ok(()) => println!("{}", "Grid is valid.".green()),
                Err(reason) => println!("{} {reason}", "Grid is invalid:".red()),
            },
            6 => {
                if let Err(reason) = grid.validate() {
                    println!("{} {reason}", "Fix the grid first:".red());
                    continue;
                }
                let mut attempt = grid.clone();
                match solver::solve(&mut attempt) {
                    Ok(()) => {
                        grid = attempt;
                        println!("{}", "Solved:".green());
                        println!("{grid}");
                    }
                    Err(_) => {
                        println!("{}", "No solution found (or the grid is contradictory).".red());
                    }
                }
            }
            7 => {
                grid = generate_solved(rng);
                println!("Generated a filled valid grid:");
                println!("{grid}");
            }
            8 => {
                let Ok(remove) =
                    console::read_int_in_range("How many cells to remove (0..81): ", 0, 81)
                else {
                    continue;
                };
                let Ok(ensure) = console::read_int_in_range(
                    "Check solvability after each removal? 1 - yes, 0 - no: ",
                    0,
                    1,
                ) else {
                    continue;
                };

                if !grid.is_complete() {
                    println!(
                        "The current grid is not filled. Generate one (option 7) or load a finished solution first."
                    );
                    continue;
                }
                if let Err(reason) = grid.validate() {
                    println!("{} {reason}", "Cannot carve: the current solution is invalid:".red());
                    continue;
                }

                let carved = create_puzzle(&grid, remove as usize, ensure == 1, rng);
                grid = carved.grid;
                println!("Puzzle ready: removed {} of {}.", carved.removed, remove);
                println!("{grid}");
            }
            _ => unreachable!("menu range is 0..=8"),
        }
    }
}
