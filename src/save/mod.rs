//! Export/import system
//!
//! Writes and reads the JSON interchange format for generated grids.

pub mod export;

pub use export::{from_json_str, load_grid, save_grid, to_json_string, ExportError};
