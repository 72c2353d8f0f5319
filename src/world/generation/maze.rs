//! Maze carving
//!
//! Grows randomized corridor walks through the space rooms left empty.
//! Walks only land on even coordinates, so odd cells between them stay as
//! the wall lattice. Cells that are not `Wall` are never written.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use super::config::GenerationConfig;
use super::observer::{StepEvent, StepObserver};
use crate::world::{Cell, Grid, Position};

/// Iteration bounds derived from grid size and the configured factors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MazeParams {
    /// Steps per growth walk
    pub complexity: usize,
    /// Number of growth seeds
    pub density: usize,
}

impl MazeParams {
    pub fn new(width: i32, height: i32, complexity_factor: f64, density_factor: f64) -> Self {
        let complexity = (complexity_factor * 5.0 * (width + height) as f64) as usize;
        let density = (density_factor * ((width / 2) * (height / 2)) as f64) as usize;
        Self { complexity, density }
    }

    pub fn for_grid(grid: &Grid, config: &GenerationConfig) -> Self {
        Self::new(
            grid.width(),
            grid.height(),
            config.maze_complexity_factor,
            config.maze_density_factor,
        )
    }
}

/// Fill the empty space with corridors, then open the outer rim
pub fn carve_maze(
    grid: &mut Grid,
    config: &GenerationConfig,
    rng: &mut StdRng,
    observer: &mut dyn StepObserver,
) {
    let params = MazeParams::for_grid(grid, config);
    let mut carved = 0usize;

    for _ in 0..params.density {
        let x = rng.gen_range(0..grid.width() / 2) * 2;
        let y = rng.gen_range(0..grid.height() / 2) * 2;
        if grid[(x, y)] != Cell::Wall {
            continue;
        }

        let mut current = Position::new(x, y);
        open(grid, current, observer, &mut carved);

        for _ in 0..params.complexity {
            let neighbors = walk_neighbors(grid, current);
            let Some(&next) = neighbors.choose(rng) else {
                break;
            };

            if grid[(next.x, next.y)] == Cell::Wall {
                open(grid, next, observer, &mut carved);
                let between = Position::new((current.x + next.x) / 2, (current.y + next.y) / 2);
                if grid[(between.x, between.y)] == Cell::Wall {
                    open(grid, between, observer, &mut carved);
                }
                current = next;
            }
        }
    }

    seal_border(grid);
    observer.on_step(&StepEvent::MazeBorder, grid);

    log::debug!(
        "Carved {} maze cells from {} seeds ({} steps each)",
        carved,
        params.density,
        params.complexity
    );
}

/// In-bounds cells two steps away along each axis
fn walk_neighbors(grid: &Grid, pos: Position) -> Vec<Position> {
    [(-2, 0), (2, 0), (0, -2), (0, 2)]
        .iter()
        .map(|&(dx, dy)| pos.offset(dx, dy))
        .filter(|p| grid.in_bounds(p.x, p.y))
        .collect()
}

fn open(grid: &mut Grid, pos: Position, observer: &mut dyn StepObserver, carved: &mut usize) {
    grid[(pos.x, pos.y)] = Cell::Floor;
    *carved += 1;
    observer.on_step(&StepEvent::MazeCell(pos), grid);
}

/// Force every rim cell to floor
fn seal_border(grid: &mut Grid) {
    let (w, h) = (grid.width(), grid.height());
    for x in 0..w {
        grid[(x, 0)] = Cell::Floor;
        grid[(x, h - 1)] = Cell::Floor;
    }
    for y in 0..h {
        grid[(0, y)] = Cell::Floor;
        grid[(w - 1, y)] = Cell::Floor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::generation::observer::NoopObserver;
    use crate::world::Room;
    use crate::world::generation::rooms::stamp_rooms;
    use rand::SeedableRng;

    fn carve(grid: &mut Grid, seed: u64) {
        let config = GenerationConfig::with_size(grid.width(), grid.height());
        let mut rng = StdRng::seed_from_u64(seed);
        carve_maze(grid, &config, &mut rng, &mut NoopObserver);
    }

    #[test]
    fn test_params_follow_grid_size() {
        let params = MazeParams::new(21, 21, 0.95, 0.95);
        assert_eq!(params.complexity, 199);
        assert_eq!(params.density, 95);

        let params = MazeParams::new(5, 5, 0.0, 0.0);
        assert_eq!(params, MazeParams { complexity: 0, density: 0 });
    }

    #[test]
    fn test_rim_is_floor() {
        let mut grid = Grid::new(21, 15).unwrap();
        carve(&mut grid, 9);
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                if grid.is_rim(x, y) {
                    assert_eq!(grid[(x, y)], Cell::Floor, "rim cell ({}, {})", x, y);
                }
            }
        }
    }

    #[test]
    fn test_odd_lattice_untouched_inside() {
        let mut grid = Grid::new(21, 21).unwrap();
        carve(&mut grid, 4);
        for y in (1..20).step_by(2) {
            for x in (1..20).step_by(2) {
                assert_eq!(grid[(x, y)], Cell::Wall);
            }
        }
    }

    #[test]
    fn test_room_cells_are_preserved() {
        let mut grid = Grid::new(21, 21).unwrap();
        let room = Room::new(Position::new(9, 9), 5, 5);
        stamp_rooms(&mut grid, &[room]);
        carve(&mut grid, 11);
        assert!(room.footprint().all(|p| grid[(p.x, p.y)] == Cell::RoomInterior));
        assert_eq!(grid.count(Cell::RoomInterior), 25);
    }

    #[test]
    fn test_zero_density_only_seals_border() {
        let mut grid = Grid::new(7, 7).unwrap();
        let config = GenerationConfig {
            maze_density_factor: 0.0,
            ..GenerationConfig::with_size(7, 7)
        };
        let mut rng = StdRng::seed_from_u64(0);
        carve_maze(&mut grid, &config, &mut rng, &mut NoopObserver);
        assert_eq!(grid.count(Cell::Floor), 24);
        assert_eq!(grid.count(Cell::Wall), 25);
    }

    #[test]
    fn test_same_seed_same_maze() {
        let mut a = Grid::new(31, 21).unwrap();
        let mut b = Grid::new(31, 21).unwrap();
        carve(&mut a, 1234);
        carve(&mut b, 1234);
        assert_eq!(a, b);
    }
}
