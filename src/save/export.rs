//! Grid JSON export
//!
//! A grid is stored as a row-major JSON array of arrays of cell codes
//! (`0` wall, `1` floor), one inner array per row in increasing y.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::world::{Grid, GridError};

/// Export error types
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid grid data: {0}")]
    Grid(#[from] GridError),
}

/// Render a grid as JSON, one row per line
pub fn to_json_string(grid: &Grid) -> Result<String, ExportError> {
    let rows = grid
        .to_rows()
        .iter()
        .map(serde_json::to_string)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("[{}]", rows.join(",\n")))
}

/// Parse a grid from its JSON form
pub fn from_json_str(json: &str) -> Result<Grid, ExportError> {
    let rows: Vec<Vec<u8>> = serde_json::from_str(json)?;
    Ok(Grid::try_from(rows)?)
}

/// Write a grid to disk
pub fn save_grid(path: &Path, grid: &Grid) -> Result<(), ExportError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, to_json_string(grid)?)?;
    log::info!("Grid saved to {}", path.display());
    Ok(())
}

/// Read a grid from disk
pub fn load_grid(path: &Path) -> Result<Grid, ExportError> {
    let data = fs::read_to_string(path)?;
    let grid = from_json_str(&data)?;
    log::info!("Grid loaded from {}", path.display());
    Ok(grid)
}
