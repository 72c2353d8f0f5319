//! Step notifications and cancellation
//!
//! Hooks that let a caller watch a generation run progress or stop it
//! between phases. Neither affects the generated layout.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::world::{Grid, Position, Room};

/// A single observable step of generation
#[derive(Debug, Clone, PartialEq)]
pub enum StepEvent {
    /// A room candidate passed placement
    RoomAccepted(Room),
    /// All accepted rooms were written into the grid
    RoomsStamped,
    /// The maze carver opened a cell
    MazeCell(Position),
    /// The outer rim was forced to floor
    MazeBorder,
    /// The flood fill reached a cell
    FillVisit(Position),
    /// A fill attempt covered too little of the grid
    FillRejected { fraction: f64 },
    /// One dead-end pruning sweep finished
    PrunePass { pass: usize, converted: usize },
}

/// Receives step notifications with the grid as it stands
pub trait StepObserver {
    fn on_step(&mut self, event: &StepEvent, grid: &Grid);
}

impl<F> StepObserver for F
where
    F: FnMut(&StepEvent, &Grid),
{
    fn on_step(&mut self, event: &StepEvent, grid: &Grid) {
        self(event, grid)
    }
}

/// Observer that ignores every step
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl StepObserver for NoopObserver {
    fn on_step(&mut self, _event: &StepEvent, _grid: &Grid) {}
}

/// Shared flag a caller can set to stop generation at the next phase boundary
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
