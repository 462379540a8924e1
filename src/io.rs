use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::grid::Grid;

pub fn load_grid(path: impl AsRef<Path>) -> Result<Grid> {
    let path = path.as_ref();
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let grid = Grid::parse(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(grid)
}

pub fn save_grid(path: impl AsRef<Path>, grid: &Grid) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, grid.to_text()).with_context(|| format!("writing {}", path.display()))
}
