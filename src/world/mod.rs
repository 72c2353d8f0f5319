//! World module
//!
//! Grid data structures, room geometry, and procedural generation.

pub mod cell;
pub mod grid;
pub mod room;
pub mod generation;

pub use cell::Cell;
pub use grid::{Grid, GridError, Position};
pub use room::{AabbOverlap, OverlapTest, Rect, Room};
