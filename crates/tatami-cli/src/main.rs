//! Tatamibari solver command line.

mod render;

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use tatami_core::{solve, CluePolicy, CornerPolicy, CoverPolicy, Puzzle, Rect, SolveConfig};

#[derive(Parser)]
#[command(name = "tatami", version, about = "Tatamibari puzzle solver")]
struct Cli {
    /// Puzzle file: space = inactive cell, `+`/`|`/`-` = clues, any other
    /// character = plain active cell
    puzzle: PathBuf,

    /// Max number of solutions to search for (default 2, to check
    /// uniqueness)
    #[arg(long, default_value_t = 2)]
    solutions: usize,

    /// row,col,height,width of a rectangle to be forced in all solutions
    /// (may be passed multiple times)
    #[arg(long = "force", value_name = "R,C,H,W")]
    force: Vec<Rect>,

    /// Interpretation of clue constraints on the shape of their containing
    /// rectangle
    #[arg(long, default_value = "hard")]
    clues: CluePolicy,

    /// Interpretation of covering constraints
    #[arg(long, default_value = "exact")]
    covers: CoverPolicy,

    /// Interpretation of four-corner constraints
    #[arg(long, default_value = "hard")]
    corners: CornerPolicy,

    /// Impose the three-corner constraint at reflex corners near holes
    #[arg(long, alias = "reflex-corners")]
    reflex_three_corners: bool,

    /// Output filename pattern (use {} for index substitution)
    #[arg(long, alias = "output-template")]
    output_pattern: Option<String>,

    /// Emit each solution as a JSON array of rectangles instead of the text
    /// grid
    #[arg(long)]
    json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    if let Some(pattern) = &cli.output_pattern {
        probe_output_pattern(pattern, cli.solutions)?;
    }
    if cli.clues == CluePolicy::Hard
        && matches!(cli.covers, CoverPolicy::Superset | CoverPolicy::Incomparable)
    {
        tracing::warn!("because clue constraints are hard, clues cannot be multiply-covered");
    }

    let text = fs::read_to_string(&cli.puzzle)
        .with_context(|| format!("reading puzzle file {}", cli.puzzle.display()))?;
    let puzzle = Puzzle::from_text(&text);
    tracing::info!(
        "puzzle: {} cells, {} clues, {}x{} grid",
        puzzle.cell_count(),
        puzzle.clue_count(),
        puzzle.rows(),
        puzzle.cols()
    );

    let config = SolveConfig {
        forced: cli.force.clone(),
        clues: cli.clues,
        covers: cli.covers,
        corners: cli.corners,
        reflex_three_corners: cli.reflex_three_corners,
    };

    let mut found = 0;
    for item in solve(&puzzle, &config)?.take(cli.solutions) {
        let solution = item?;
        let rendered = if cli.json {
            serde_json::to_string(&solution)?
        } else {
            render::format_solution(&puzzle, &solution)
        };
        match &cli.output_pattern {
            Some(pattern) => {
                let path = pattern.replace("{}", &found.to_string());
                fs::write(&path, &rendered)
                    .with_context(|| format!("writing solution to {}", path))?;
            }
            None => {
                if found > 0 && !cli.json {
                    println!();
                }
                println!("{}", rendered);
            }
        }
        found += 1;
    }

    let outcome = if found == cli.solutions {
        ", so there may be more"
    } else if found > 0 {
        ", so that's all of them"
    } else {
        ""
    };
    println!(
        "{}: found {} solutions ({} requested{})",
        cli.puzzle.display(),
        found,
        cli.solutions,
        outcome
    );
    Ok(())
}

/// Fails fast on unwritable output locations and warns about patterns that
/// would overwrite themselves, before any solver time is spent.
fn probe_output_pattern(pattern: &str, solutions: usize) -> anyhow::Result<()> {
    if solutions > 1 && !pattern.contains("{}") {
        tracing::warn!(
            "output pattern {:?} contains no substitution, but multiple solutions ({}) possible",
            pattern,
            solutions
        );
    }
    let first = pattern.replace("{}", "0");
    fs::write(&first, "").with_context(|| format!("probing output file {}", first))?;
    fs::remove_file(&first).with_context(|| format!("removing probe file {}", first))?;
    Ok(())
}
