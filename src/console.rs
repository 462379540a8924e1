use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};

use crate::grid::{Grid, SIZE};

/// Prints `prompt`, flushes, and reads one line. Fails on end of input.
pub fn read_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        bail!("end of input");
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Prompts until the user types an integer inside `[min, max]`. Fails
/// only on end of input.
pub fn read_int_in_range(prompt: &str, min: i64, max: i64) -> Result<i64> {
    loop {
        let line = read_line(prompt)?;
        let value: i64 = match line.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                println!("Please enter a whole number.");
                continue;
            }
        };
        if value < min || value > max {
            println!("Please enter a number in [{min}..{max}].");
            continue;
        }
        return Ok(value);
    }
}

/// Reads a grid as 9 prompted rows. Each row must carry exactly 9
/// significant characters (1-9, or 0/'.' for empty); whitespace between
/// them is ignored.
pub fn read_grid_from_stdin() -> Result<Grid> {
    let mut grid = Grid::new();
    for row in 0..SIZE {
        let line = read_line(&format!("Row {}: ", row + 1))?;

        let mut col = 0;
        for ch in line.chars() {
            if ch.is_whitespace() {
                continue;
            }
            if col >= SIZE {
                bail!("row {} has more than 9 cells", row + 1);
            }
            let value = match ch {
                '.' | '0' => 0,
                '1'..='9' => ch as u8 - b'0',
                _ => bail!("invalid character {ch:?} in row {}", row + 1),
            };
            grid.set(row, col, value)?;
            col += 1;
        }
        if col != SIZE {
            bail!("row {} has {} cells, expected 9", row + 1, col);
        }
    }
    Ok(grid)
}
