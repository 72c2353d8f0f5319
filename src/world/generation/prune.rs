//! Dead-end pruning
//!
//! A fixed number of in-place cellular-automaton sweeps that open wall cells
//! surrounded by floor. Cells opened earlier in a sweep count toward later
//! cells in the same sweep. Floor never turns back into wall.

use super::config::GenerationConfig;
use super::observer::{StepEvent, StepObserver};
use crate::world::{Cell, Grid, Position};

/// Run `prune_passes` sweeps over the grid
pub fn prune_dead_ends(grid: &mut Grid, config: &GenerationConfig, observer: &mut dyn StepObserver) {
    let passes = config.prune_passes.max(0) as usize;
    let threshold = config.prune_neighbor_threshold.max(0) as usize;
    let mut total = 0;

    for pass in 0..passes {
        let converted = prune_pass(grid, threshold);
        total += converted;
        observer.on_step(&StepEvent::PrunePass { pass, converted }, grid);
    }

    log::debug!("Pruned {} wall cells over {} passes", total, passes);
}

/// One sweep, x outer and y inner; returns the number of cells opened
fn prune_pass(grid: &mut Grid, threshold: usize) -> usize {
    let mut converted = 0;
    for x in 0..grid.width() {
        for y in 0..grid.height() {
            if grid[(x, y)] != Cell::Wall {
                continue;
            }
            if grid.count_cardinal(Position::new(x, y), Cell::Floor) >= threshold {
                grid[(x, y)] = Cell::Floor;
                converted += 1;
            }
        }
    }
    converted
}
