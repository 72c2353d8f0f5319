//! Connectivity verification
//!
//! Flood-fills the wall region from a random wall cell and measures how much
//! of the grid it covers. A well-formed layout yields one large connected
//! wall mass; anything the fill never reaches is opened up as floor.

use rand::rngs::StdRng;
use rand::Rng;

use super::config::GenerationConfig;
use super::observer::{StepEvent, StepObserver};
use crate::world::{Cell, Grid, Position};

/// Result of a single flood-fill attempt
#[derive(Debug, Clone, PartialEq)]
pub enum FillAttempt {
    /// The filled region met the quality threshold
    Accepted { grid: Grid, fraction: f64 },
    /// The filled region was too small; the input grid is unchanged
    Rejected { fraction: f64 },
}

/// Result of filling with retries
///
/// `rejected` counts every rejected attempt on this maze, including the one
/// that used up the last retry.
#[derive(Debug, Clone, PartialEq)]
pub enum FillOutcome {
    Accepted { grid: Grid, rejected: usize },
    /// Retries ran out; the whole dungeon has to be rebuilt
    Regenerate { rejected: usize },
}

/// What to do after a rejected attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Fill the same maze again; `retries_left` remain after this one
    Retry { retries_left: usize },
    /// No retries remain
    Regenerate,
}

/// Retries available on a freshly carved maze
pub fn retry_budget(config: &GenerationConfig) -> usize {
    config.max_fill_retries.max(0) as usize
}

/// Report a rejected attempt and decide between another fill and a rebuild
pub fn handle_rejection(
    grid: &Grid,
    fraction: f64,
    retries_left: usize,
    config: &GenerationConfig,
    observer: &mut dyn StepObserver,
) -> RetryDecision {
    observer.on_step(&StepEvent::FillRejected { fraction }, grid);
    if retries_left == 0 {
        return RetryDecision::Regenerate;
    }
    log::info!(
        "Fill quality {:.3} below threshold {:.3}, restarting fill",
        fraction,
        config.fill_quality_threshold
    );
    RetryDecision::Retry { retries_left: retries_left - 1 }
}

/// Fill, retrying up to `max_fill_retries` times before asking for a rebuild
pub fn fill_and_verify(
    grid: &Grid,
    config: &GenerationConfig,
    rng: &mut StdRng,
    observer: &mut dyn StepObserver,
) -> FillOutcome {
    let mut retries_left = retry_budget(config);
    let mut rejected = 0;

    loop {
        match flood_fill_attempt(grid, config, rng, observer) {
            FillAttempt::Accepted { grid, .. } => return FillOutcome::Accepted { grid, rejected },
            FillAttempt::Rejected { fraction } => {
                rejected += 1;
                match handle_rejection(grid, fraction, retries_left, config, observer) {
                    RetryDecision::Retry { retries_left: left } => retries_left = left,
                    RetryDecision::Regenerate => return FillOutcome::Regenerate { rejected },
                }
            }
        }
    }
}

/// Resample random coordinates until one lands on a wall
fn pick_wall_seed(grid: &Grid, rng: &mut StdRng) -> Option<Position> {
    if grid.count(Cell::Wall) == 0 {
        return None;
    }
    loop {
        let x = rng.gen_range(0..grid.width());
        let y = rng.gen_range(0..grid.height());
        if grid[(x, y)] == Cell::Wall {
            return Some(Position::new(x, y));
        }
    }
}

/// 4-connected reachability over wall cells, returned as a visited mask
fn flood_fill(grid: &Grid, start: Position, observer: &mut dyn StepObserver) -> Vec<bool> {
    let mut visited = vec![false; grid.area()];
    let mut stack = vec![start];

    while let Some(pos) = stack.pop() {
        let idx = grid.xy_to_idx(pos.x, pos.y);
        if visited[idx] {
            continue;
        }
        visited[idx] = true;
        observer.on_step(&StepEvent::FillVisit(pos), grid);

        for next in grid.cardinal_neighbors(pos) {
            if grid[(next.x, next.y)] == Cell::Wall && !visited[grid.xy_to_idx(next.x, next.y)] {
                stack.push(next);
            }
        }
    }

    visited
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::generation::observer::NoopObserver;
    use rand::SeedableRng;

    /// Floor grid with two separate wall blocks
    fn two_pockets() -> Grid {
        let mut grid = Grid::new(11, 11).unwrap();
        for y in 0..11 {
            for x in 0..11 {
                grid[(x, y)] = Cell::Floor;
            }
        }
        // 3x3 block on the left, 3x1 strip on the right
        for y in 2..5 {
            for x in 1..4 {
                grid[(x, y)] = Cell::Wall;
            }
        }
        for y in 6..9 {
            grid[(8, y)] = Cell::Wall;
        }
        grid
    }

    fn config(threshold: f64, retries: i32) -> GenerationConfig {
        GenerationConfig {
            fill_quality_threshold: threshold,
            max_fill_retries: retries,
            ..GenerationConfig::with_size(11, 11)
        }
    }

    #[test]
    fn test_flood_fill_stays_in_component() {
        let grid = two_pockets();
        let visited = flood_fill(&grid, Position::new(2, 3), &mut NoopObserver);
        assert_eq!(visited.iter().filter(|&&v| v).count(), 9);
        assert!(!visited[grid.xy_to_idx(8, 7)]);
    }

    #[test]
    fn test_accepted_fill_leaves_single_wall_component() {
        let grid = two_pockets();
        let mut rng = StdRng::seed_from_u64(5);
        match flood_fill_attempt(&grid, &config(0.0, 0), &mut rng, &mut NoopObserver) {
            FillAttempt::Accepted { grid: filled, .. } => {
                let walls = filled.count(Cell::Wall);
                assert!(walls == 9 || walls == 3);
                assert_eq!(filled.count(Cell::Floor), 121 - walls);
            }
            other => panic!("expected acceptance, got {:?}", other),
        }
        // Input is never mutated
        assert_eq!(grid, two_pockets());
    }

    #[test]
    fn test_small_region_rejected() {
        let grid = two_pockets();
        let mut rng = StdRng::seed_from_u64(5);
        // Neither pocket reaches half the grid
        let attempt = flood_fill_attempt(&grid, &config(0.5, 0), &mut rng, &mut NoopObserver);
        assert!(matches!(attempt, FillAttempt::Rejected { fraction } if fraction < 0.5));
    }

    #[test]
    fn test_retries_then_regenerate() {
        let grid = two_pockets();
        let mut rng = StdRng::seed_from_u64(5);
        let mut rejected = 0;
        let outcome = {
            let mut observer = |event: &StepEvent, _: &Grid| {
                if matches!(event, StepEvent::FillRejected { .. }) {
                    rejected += 1;
                }
            };
            fill_and_verify(&grid, &config(0.5, 3), &mut rng, &mut observer)
        };
        assert_eq!(outcome, FillOutcome::Regenerate { rejected: 4 });
        assert_eq!(rejected, 4);
    }

    #[test]
    fn test_zero_retries_is_single_attempt() {
        let grid = two_pockets();
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = fill_and_verify(&grid, &config(0.5, 0), &mut rng, &mut NoopObserver);
        assert_eq!(outcome, FillOutcome::Regenerate { rejected: 1 });
    }

    #[test]
    fn test_handle_rejection_spends_budget() {
        let grid = two_pockets();
        let config = config(0.5, 2);
        let mut events = 0;
        {
            let mut observer = |event: &StepEvent, _: &Grid| {
                if matches!(event, StepEvent::FillRejected { .. }) {
                    events += 1;
                }
            };
            assert_eq!(
                handle_rejection(&grid, 0.1, retry_budget(&config), &config, &mut observer),
                RetryDecision::Retry { retries_left: 1 }
            );
            assert_eq!(
                handle_rejection(&grid, 0.1, 0, &config, &mut observer),
                RetryDecision::Regenerate
            );
        }
        assert_eq!(events, 2);
    }

    #[test]
    fn test_accepted_reports_prior_rejections() {
        // Tiny threshold: the first attempt always succeeds
        let grid = two_pockets();
        let mut rng = StdRng::seed_from_u64(3);
        let outcome = fill_and_verify(&grid, &config(0.01, 5), &mut rng, &mut NoopObserver);
        assert!(matches!(outcome, FillOutcome::Accepted { rejected: 0, .. }));
    }

    #[test]
    fn test_grid_without_walls_is_rejected() {
        let mut grid = Grid::new(5, 5).unwrap();
        for y in 0..5 {
            for x in 0..5 {
                grid[(x, y)] = Cell::Floor;
            }
        }
        let mut rng = StdRng::seed_from_u64(0);
        let attempt = flood_fill_attempt(&grid, &config(0.045, 0), &mut rng, &mut NoopObserver);
        assert_eq!(attempt, FillAttempt::Rejected { fraction: 0.0 });
    }

    #[test]
    fn test_threshold_boundary() {
        // 9 walls / 121 cells is about 0.074
        let mut grid = two_pockets();
        for y in 6..9 {
            grid[(8, y)] = Cell::Floor;
        }
        let mut rng = StdRng::seed_from_u64(2);
        let accepted = flood_fill_attempt(&grid, &config(0.07, 0), &mut rng, &mut NoopObserver);
        assert!(matches!(accepted, FillAttempt::Accepted { .. }));
        let rejected = flood_fill_attempt(&grid, &config(0.08, 0), &mut rng, &mut NoopObserver);
        assert!(matches!(rejected, FillAttempt::Rejected { .. }));
    }
}
