//! Text-grid rendering of solutions.

use tatami_core::{Puzzle, Solution};

/// Renders a solution as a tab-separated grid: each active cell shows the
/// index (within the solution) of the rectangle covering it, clue cells get
/// their clue symbol appended, and inactive cells stay blank. Active cells
/// no rectangle covers render as a single space.
pub fn format_solution(puzzle: &Puzzle, solution: &Solution) -> String {
    let mut grid: Vec<Vec<String>> = (0..puzzle.rows())
        .map(|row| {
            (0..puzzle.cols())
                .map(|col| {
                    if puzzle.is_active(tatami_core::Point::new(row, col)) {
                        " ".to_string()
                    } else {
                        String::new()
                    }
                })
                .collect()
        })
        .collect();
    for (index, rect) in solution.iter().enumerate() {
        for p in rect.points() {
            grid[p.row][p.col] = index.to_string();
        }
    }
    for (cell, clue) in puzzle.clues() {
        grid[cell.row][cell.col].push(clue.symbol());
    }
    grid.into_iter()
        .map(|row| row.join("\t"))
        .collect::<Vec<String>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tatami_core::{solve, SolveConfig};

    fn first_solution(text: &str) -> (Puzzle, Solution) {
        let puzzle = Puzzle::from_text(text);
        let solution = solve(&puzzle, &SolveConfig::default())
            .unwrap()
            .next()
            .unwrap()
            .unwrap();
        (puzzle, solution)
    }

    #[test]
    fn test_render_single_cell() {
        let (puzzle, solution) = first_solution("+");
        assert_eq!(format_solution(&puzzle, &solution), "0+");
    }

    #[test]
    fn test_render_column() {
        let (puzzle, solution) = first_solution("|\n_");
        assert_eq!(format_solution(&puzzle, &solution), "0|\n0");
    }

    #[test]
    fn test_render_rows_with_indices_and_clues() {
        let (puzzle, solution) = first_solution("-_\n-_");
        assert_eq!(format_solution(&puzzle, &solution), "0-\t0\n1-\t1");
    }

    #[test]
    fn test_render_blank_inactive_cell() {
        let (puzzle, solution) = first_solution("-_\n+");
        assert_eq!(format_solution(&puzzle, &solution), "0-\t0\n1+\t");
    }
}
