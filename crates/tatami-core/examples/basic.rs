//! Basic example of using the Tatamibari engine

use tatami_core::{solve, Puzzle, SolveConfig};

fn main() {
    // A 3x3 puzzle: three full-width rows, one horizontal clue each.
    let text = "-__\n_-_\n__-";
    let puzzle = Puzzle::from_text(text);

    println!("Puzzle:\n{}\n", text);
    println!("Active cells: {}", puzzle.cell_count());
    println!("Clues: {}\n", puzzle.clue_count());

    // Ask for up to two solutions to check uniqueness.
    let solutions: Vec<_> = solve(&puzzle, &SolveConfig::default())
        .expect("forced-rectangle validation cannot fail without forced rectangles")
        .take(2)
        .collect::<Result<_, _>>()
        .expect("default backend does not fail");

    match solutions.len() {
        0 => println!("No solution."),
        1 => println!("Unique solution:"),
        _ => println!("Multiple solutions; first one:"),
    }
    for (i, rect) in solutions.first().into_iter().flat_map(|s| s.iter()).enumerate() {
        println!("  rectangle {}: {}", i, rect);
    }
}
