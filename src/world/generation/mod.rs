//! Procedural dungeon generation
//!
//! Room placement, maze carving, connectivity repair, and dead-end pruning,
//! sequenced by [`DungeonGenerator`] into one seeded run.

pub mod config;
pub mod fill;
pub mod maze;
pub mod observer;
pub mod prune;
pub mod rooms;

pub use config::{load_config, write_config, ConfigError, GenerationConfig};
pub use fill::{
    fill_and_verify, flood_fill_attempt, handle_rejection, retry_budget, FillAttempt, FillOutcome,
    RetryDecision,
};
pub use maze::{carve_maze, MazeParams};
pub use observer::{CancelToken, NoopObserver, StepEvent, StepObserver};
pub use prune::prune_dead_ends;
pub use rooms::{place_rooms, stamp_rooms};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{AabbOverlap, Grid, GridError, OverlapTest, Room};

/// The finished layout of one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub grid: Grid,
    pub rooms: Vec<Room>,
    /// Full restarts from room placement
    pub regenerations: usize,
    /// Rejected fill attempts across the run, including those that ran out
    /// of retries and forced a regeneration
    pub fill_retries: usize,
    pub seed: u64,
}

/// Errors that stop a generation run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("grid error: {0}")]
    Grid(#[from] GridError),

    #[error("generation failed after {regenerations} regenerations")]
    GenerationFailed { regenerations: usize },

    #[error("generation cancelled after {phase}")]
    Cancelled { phase: &'static str },
}

/// Orchestrator state; each phase owns the data the next one needs
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationPhase {
    Idle,
    PlacingRooms,
    /// Rooms are committed and stamped
    Carving { rooms: Vec<Room>, grid: Grid },
    /// The maze is committed and room cells are merged
    Filling { rooms: Vec<Room>, grid: Grid, retries_left: usize },
    /// The fill was accepted
    Pruning { rooms: Vec<Room>, grid: Grid },
    Done(GenerationResult),
}

impl GenerationPhase {
    pub fn name(&self) -> &'static str {
        match self {
            GenerationPhase::Idle => "idle",
            GenerationPhase::PlacingRooms => "placing rooms",
            GenerationPhase::Carving { .. } => "carving",
            GenerationPhase::Filling { .. } => "filling",
            GenerationPhase::Pruning { .. } => "pruning",
            GenerationPhase::Done(_) => "done",
        }
    }
}

/// Runs the generation pipeline for a validated configuration
pub struct DungeonGenerator<'a> {
    config: GenerationConfig,
    overlap: Box<dyn OverlapTest + 'a>,
    observer: Box<dyn StepObserver + 'a>,
    cancel: CancelToken,
}

impl<'a> DungeonGenerator<'a> {
    /// Validate the configuration; nothing is allocated if it is rejected
    pub fn new(config: GenerationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            overlap: Box::new(AabbOverlap),
            observer: Box::new(NoopObserver),
            cancel: CancelToken::new(),
        })
    }

    pub fn with_observer(mut self, observer: impl StepObserver + 'a) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn with_overlap_test(mut self, overlap: impl OverlapTest + 'a) -> Self {
        self.overlap = Box::new(overlap);
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Handle for stopping this generator from elsewhere
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generate a complete, connectivity-verified dungeon for `seed`
    pub fn generate(&mut self, seed: u64) -> Result<GenerationResult, GenerationError> {
        log::info!(
            "Generating {}x{} dungeon with seed {}",
            self.config.width,
            self.config.height,
            seed
        );

        let mut rng = StdRng::seed_from_u64(seed);
        let mut regenerations = 0;
        let mut fill_retries = 0;
        let mut phase = GenerationPhase::Idle;

        loop {
            let previous = phase.name();

            let next = match phase {
                GenerationPhase::Idle => GenerationPhase::PlacingRooms,

                GenerationPhase::PlacingRooms => {
                    let mut grid = Grid::new(self.config.width, self.config.height)?;
                    let rooms = place_rooms(
                        &mut grid,
                        &self.config,
                        &mut rng,
                        self.overlap.as_ref(),
                        self.observer.as_mut(),
                    );
                    self.checkpoint("room placement")?;
                    GenerationPhase::Carving { rooms, grid }
                }

                GenerationPhase::Carving { rooms, mut grid } => {
                    carve_maze(&mut grid, &self.config, &mut rng, self.observer.as_mut());
                    grid.normalize();
                    self.checkpoint("maze carving")?;
                    GenerationPhase::Filling {
                        rooms,
                        grid,
                        retries_left: retry_budget(&self.config),
                    }
                }

                GenerationPhase::Filling { rooms, grid, retries_left } => {
                    let attempt =
                        flood_fill_attempt(&grid, &self.config, &mut rng, self.observer.as_mut());
                    self.checkpoint("connectivity fill")?;

                    match attempt {
                        FillAttempt::Accepted { grid: filled, fraction } => {
                            log::debug!("Fill accepted covering {:.3} of the grid", fraction);
                            GenerationPhase::Pruning { rooms, grid: filled }
                        }
                        FillAttempt::Rejected { fraction } => {
                            fill_retries += 1;
                            let decision = handle_rejection(
                                &grid,
                                fraction,
                                retries_left,
                                &self.config,
                                self.observer.as_mut(),
                            );

                            match decision {
                                RetryDecision::Retry { retries_left } => {
                                    GenerationPhase::Filling { rooms, grid, retries_left }
                                }
                                RetryDecision::Regenerate => {
                                    regenerations += 1;
                                    if regenerations > self.config.max_regenerations.max(0) as usize {
                                        log::warn!(
                                            "Giving up after {} regenerations (seed {})",
                                            regenerations - 1,
                                            seed
                                        );
                                        return Err(GenerationError::GenerationFailed {
                                            regenerations: regenerations - 1,
                                        });
                                    }
                                    log::warn!(
                                        "Refill attempts exhausted, restarting dungeon generation ({})",
                                        regenerations
                                    );
                                    GenerationPhase::PlacingRooms
                                }
                            }
                        }
                    }
                }

                GenerationPhase::Pruning { rooms, mut grid } => {
                    prune_dead_ends(&mut grid, &self.config, self.observer.as_mut());
                    GenerationPhase::Done(GenerationResult {
                        grid,
                        rooms,
                        regenerations,
                        fill_retries,
                        seed,
                    })
                }

                GenerationPhase::Done(result) => {
                    log::info!(
                        "Generated dungeon with {} rooms ({} regenerations, {} fill retries)",
                        result.rooms.len(),
                        result.regenerations,
                        result.fill_retries
                    );
                    return Ok(result);
                }
            };

            log::debug!("Phase transition: {} -> {}", previous, next.name());
            phase = next;
        }
    }

    fn checkpoint(&self, phase: &'static str) -> Result<(), GenerationError> {
        if self.cancel.is_cancelled() {
            log::info!("Generation cancelled after {}", phase);
            return Err(GenerationError::Cancelled { phase });
        }
        Ok(())
    }
}

/// Validate `config` and generate one dungeon for `seed`
pub fn generate(config: GenerationConfig, seed: u64) -> Result<GenerationResult, GenerationError> {
    DungeonGenerator::new(config)?.generate(seed)
}
