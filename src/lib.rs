//! Dungeongen - seeded room-and-maze dungeon layouts
//!
//! Places rooms by rejection sampling, grows a maze through the space
//! between them, verifies wall connectivity with a flood fill, and thickens
//! corridors by pruning dead ends. The same configuration and seed always
//! produce the same grid.

pub mod world;
pub mod save;

// Re-export commonly used types
pub use world::generation::{
    generate, DungeonGenerator, GenerationConfig, GenerationError, GenerationResult,
};
pub use world::{Cell, Grid, Room};
