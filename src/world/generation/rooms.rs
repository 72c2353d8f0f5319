//! Room placement
//!
//! Rejection-samples non-overlapping rooms and stamps their footprints
//! into the grid. Accepted rooms are never removed.

use rand::rngs::StdRng;
use rand::Rng;

use super::config::GenerationConfig;
use super::observer::{StepEvent, StepObserver};
use crate::world::{Cell, Grid, OverlapTest, Position, Rect, Room};

/// Sample rooms until the retry budget is spent, then stamp them into the grid
pub fn place_rooms(
    grid: &mut Grid,
    config: &GenerationConfig,
    rng: &mut StdRng,
    overlap: &dyn OverlapTest,
    observer: &mut dyn StepObserver,
) -> Vec<Room> {
    // The outer ring is always reserved
    let interior = Rect::new(1, 1, grid.width() - 2, grid.height() - 2);
    let separation = config.min_room_separation;

    let mut rooms: Vec<Room> = Vec::new();
    let mut rejections = 0;

    while rejections < config.placement_retry_budget {
        let candidate = sample_room(grid, config, rng);
        let inflated = candidate.inflated(separation);

        let overlaps = rooms
            .iter()
            .any(|r| overlap.overlaps(&inflated, &r.inflated(separation)));

        if !overlaps && is_room_in_bounds(&candidate, &interior) {
            observer.on_step(&StepEvent::RoomAccepted(candidate), grid);
            rooms.push(candidate);
        } else {
            rejections += 1;
        }
    }

    log::debug!(
        "Placed {} rooms after {} rejected candidates",
        rooms.len(),
        rejections
    );

    stamp_rooms(grid, &rooms);
    observer.on_step(&StepEvent::RoomsStamped, grid);

    rooms
}

/// Write every room footprint into the grid as `RoomInterior`
pub fn stamp_rooms(grid: &mut Grid, rooms: &[Room]) {
    for room in rooms {
        for pos in room.footprint() {
            if grid.in_bounds(pos.x, pos.y) {
                grid[(pos.x, pos.y)] = Cell::RoomInterior;
            }
        }
    }
}

/// Draw one candidate: odd center inside the rim, odd dimensions in range
fn sample_room(grid: &Grid, config: &GenerationConfig, rng: &mut StdRng) -> Room {
    let x = random_odd(rng, 1, grid.width() - 2);
    let y = random_odd(rng, 1, grid.height() - 2);
    let width = random_odd(rng, config.room_min_dimension, config.room_max_dimension);
    let height = random_odd(rng, config.room_min_dimension, config.room_max_dimension);
    Room::new(Position::new(x, y), width, height)
}

/// Uniform odd integer in `[min, max]`; `min` must be odd
fn random_odd(rng: &mut StdRng, min: i32, max: i32) -> i32 {
    let steps = ((max - min) / 2).max(0);
    min + 2 * rng.gen_range(0..=steps)
}

/// All four corners must fall inside the interior
fn is_room_in_bounds(room: &Room, interior: &Rect) -> bool {
    room.rect()
        .corners()
        .iter()
        .all(|c| c.x >= interior.x1 && c.x <= interior.x2 && c.y >= interior.y1 && c.y <= interior.y2)
}
