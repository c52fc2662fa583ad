use alloc::collections::VecDeque;
use alloc::collections::vec_deque::Drain;
use alloc::vec::Vec;
use rand::{SeedableRng, rngs::SmallRng};
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapStage {
    /// Swap accepted, tiles not exchanged yet.
    Exchange,
    /// Tiles exchanged and animated, waiting for detection.
    Check,
    /// No match, tiles exchanged back and animating home.
    RollingBack,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CascadePhase {
    Removing,
    Dropping,
    Refilling,
    Detecting,
}

/// Valid transitions:
/// - Idle -> Selected
/// - Selected -> Idle | Selected | Swapping
/// - Swapping -> Resolving | Idle (after rollback)
/// - Resolving -> Resolving | Idle
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    Idle,
    Selected(Coord2),
    Swapping {
        from: Coord2,
        to: Coord2,
        stage: SwapStage,
    },
    Resolving(CascadePhase),
}

impl EngineState {
    /// Whether a swap or cascade is in flight, during which input is ignored.
    pub const fn is_processing(self) -> bool {
        matches!(self, Self::Swapping { .. } | Self::Resolving(_))
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Notifications for scoring and presentation, queued in firing order.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BoardEvent {
    Selected(Coord2),
    Deselected(Coord2),
    /// A matched tile, reported before its cell is cleared.
    TileRemoved(TileEntry),
    /// Tiles removed by one cascade iteration.
    ScoreChanged(CellCount),
    /// A swap sequence, rollback or cascade included, has fully completed.
    BoardStable { removed: CellCount, cascades: u16 },
}

/// Outcome of a click
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ClickOutcome {
    /// A swap or cascade is in flight.
    Ignored,
    Selected,
    Deselected,
    SwapStarted,
}

impl ClickOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Move engine: selection, swaps, rollback and the cascade loop over one board.
///
/// Work is split into phases. [`MoveEngine::advance`] runs one phase and hands back the
/// [`Step`] the presentation has to play before the next call.
#[derive(Clone, Debug)]
pub struct MoveEngine {
    config: GameConfig,
    board: Board,
    detector: MatchDetector,
    rng: SmallRng,
    state: EngineState,
    events: VecDeque<BoardEvent>,
    cascades: u16,
    removed: CellCount,
}

impl MoveEngine {
    /// Engine over a freshly generated match-free board.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let board = SafeBoardGenerator.generate(&config, &mut rng)?;
        Ok(Self::from_parts(config, board, rng))
    }

    /// Engine over an existing, fully populated board. `seed` drives refills.
    pub fn with_board(config: GameConfig, board: Board, seed: u64) -> Result<Self> {
        config.validate()?;
        if board.size() != config.size {
            return Err(GameError::InvalidBoardShape);
        }
        if !board.is_full() {
            return Err(GameError::IncompleteBoard);
        }
        Ok(Self::from_parts(
            config,
            board,
            SmallRng::seed_from_u64(seed),
        ))
    }

    fn from_parts(config: GameConfig, board: Board, rng: SmallRng) -> Self {
        Self {
            detector: MatchDetector::new(config.match_count),
            config,
            board,
            rng,
            state: EngineState::Idle,
            events: VecDeque::new(),
            cascades: 0,
            removed: 0,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn detector(&self) -> MatchDetector {
        self.detector
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_processing(&self) -> bool {
        self.state.is_processing()
    }

    pub fn size(&self) -> Coord {
        self.board.size()
    }

    pub fn selected(&self) -> Option<Coord2> {
        match self.state {
            EngineState::Selected(coords) => Some(coords),
            _ => None,
        }
    }

    /// Tile at `coords`, `None` when empty or outside the board.
    pub fn tile_at(&self, coords: Coord2) -> Option<&TileEntry> {
        if self.board.is_valid(coords) {
            self.board.get(coords)
        } else {
            None
        }
    }

    /// First swap that would produce a match, if any.
    pub fn hint(&self) -> Option<(Coord2, Coord2)> {
        self.detector.find_swaps(&self.board).into_iter().next()
    }

    pub fn drain_events(&mut self) -> Drain<'_, BoardEvent> {
        self.events.drain(..)
    }

    /// Handles a click on `coords`.
    pub fn click(&mut self, coords: Coord2) -> Result<ClickOutcome> {
        use EngineState::*;

        if self.is_processing() {
            log::trace!("Ignoring click at {:?} while processing", coords);
            return Ok(ClickOutcome::Ignored);
        }
        let coords = self.board.validate_coords(coords)?;

        Ok(match self.state {
            Swapping { .. } | Resolving(_) => ClickOutcome::Ignored,
            Idle => {
                self.select(coords);
                ClickOutcome::Selected
            }
            Selected(current) if current == coords => {
                self.deselect();
                ClickOutcome::Deselected
            }
            Selected(current) if is_neighbor(current, coords) => {
                self.begin_swap(current, coords);
                ClickOutcome::SwapStarted
            }
            Selected(_) => {
                self.select(coords);
                ClickOutcome::Selected
            }
        })
    }

    /// Starts a swap between two cells directly, bypassing selection. Returns `false` when the
    /// engine is busy or the cells are not adjacent.
    pub fn attempt_swap(&mut self, from: Coord2, to: Coord2) -> Result<bool> {
        let from = self.board.validate_coords(from)?;
        let to = self.board.validate_coords(to)?;

        if self.is_processing() || !is_neighbor(from, to) {
            return Ok(false);
        }
        self.begin_swap(from, to);
        Ok(true)
    }

    fn select(&mut self, coords: Coord2) {
        self.deselect();
        self.state = EngineState::Selected(coords);
        self.events.push_back(BoardEvent::Selected(coords));
    }

    fn deselect(&mut self) {
        if let EngineState::Selected(current) = self.state {
            self.state = EngineState::Idle;
            self.events.push_back(BoardEvent::Deselected(current));
        }
    }

    fn begin_swap(&mut self, from: Coord2, to: Coord2) {
        self.deselect();
        self.cascades = 0;
        self.removed = 0;
        self.state = EngineState::Swapping {
            from,
            to,
            stage: SwapStage::Exchange,
        };
    }

    /// Runs the next phase of the in-flight swap or cascade.
    pub fn advance(&mut self) -> Step {
        use CascadePhase::*;
        use EngineState::*;

        match self.state {
            Idle | Selected(_) => Step::Stable,
            Swapping {
                from,
                to,
                stage: SwapStage::Exchange,
            } => {
                log::debug!("Swapping {:?} with {:?}", from, to);
                self.board.swap(from, to);
                self.state = Swapping {
                    from,
                    to,
                    stage: SwapStage::Check,
                };
                Step::Animate(self.swap_motions(from, to))
            }
            Swapping {
                from,
                to,
                stage: SwapStage::Check,
            } => {
                if self.detector.scan(&mut self.board).has_match() {
                    self.state = Resolving(Removing);
                    Step::Wait(self.config.match_delay)
                } else {
                    log::debug!("No match, rolling back {:?} and {:?}", from, to);
                    self.board.swap(to, from);
                    self.state = Swapping {
                        from,
                        to,
                        stage: SwapStage::RollingBack,
                    };
                    Step::Animate(self.swap_motions(from, to))
                }
            }
            Swapping {
                stage: SwapStage::RollingBack,
                ..
            } => self.stabilize(),
            Resolving(Removing) => {
                self.remove_matched();
                self.state = Resolving(Dropping);
                Step::Wait(self.config.match_delay)
            }
            Resolving(Dropping) => {
                let motions = self.compact();
                self.state = Resolving(Refilling);
                Step::Animate(motions)
            }
            Resolving(Refilling) => {
                let motions = self.refill();
                self.state = Resolving(Detecting);
                Step::Animate(motions)
            }
            Resolving(Detecting) => {
                if !self.detector.scan(&mut self.board).has_match() {
                    self.stabilize()
                } else if self.cascades >= self.config.max_cascades {
                    log::warn!(
                        "Cascade stopped after {} iterations with matches left",
                        self.cascades
                    );
                    self.board.clear_matched_flags();
                    self.stabilize()
                } else {
                    self.state = Resolving(Removing);
                    Step::Wait(self.config.match_delay)
                }
            }
        }
    }

    /// Advances until the board is stable, playing every step on `driver`.
    pub fn run_until_stable<D: AnimationDriver + ?Sized>(&mut self, driver: &mut D) {
        loop {
            match self.advance() {
                Step::Animate(motions) => driver.animate(&motions),
                Step::Wait(duration) => driver.wait(duration),
                Step::Stable => break,
            }
        }
    }

    fn swap_motions(&self, a: Coord2, b: Coord2) -> Vec<Motion> {
        [(b, a), (a, b)]
            .into_iter()
            .filter_map(|(from, to)| {
                self.board.get(to).map(|entry| Motion {
                    tile: entry.id,
                    from: self.config.world_position(from),
                    to: self.config.world_position(to),
                    duration: self.config.swap_duration,
                })
            })
            .collect()
    }

    fn remove_matched(&mut self) {
        let matched = self.board.matched_coords();
        for &coords in &matched {
            if let Some(entry) = self.board.get(coords) {
                self.events.push_back(BoardEvent::TileRemoved(*entry));
            }
            self.board.take(coords);
        }

        let count = matched.len() as CellCount;
        self.cascades += 1;
        self.removed = self.removed.saturating_add(count);
        self.events.push_back(BoardEvent::ScoreChanged(count));
        log::debug!("Cascade {} removed {} tiles", self.cascades, count);
    }

    /// Gravity: moves the surviving tiles of every column down to the lowest rows, keeping their
    /// order.
    fn compact(&mut self) -> Vec<Motion> {
        let size = self.board.size();
        let mut motions = Vec::new();

        for col in 0..size {
            let mut write = 0;
            for row in 0..size {
                let Some(entry) = self.board.take((row, col)) else {
                    continue;
                };
                if write != row {
                    motions.push(Motion {
                        tile: entry.id,
                        from: self.config.world_position((row, col)),
                        to: self.config.world_position((write, col)),
                        duration: self.config.fall_duration,
                    });
                }
                self.board.set((write, col), Some(entry));
                write += 1;
            }
        }

        log::trace!("Dropped {} tiles", motions.len());
        motions
    }

    /// Fills every empty cell with a random ordinary kind, falling in from above the board.
    fn refill(&mut self) -> Vec<Motion> {
        let size = self.board.size();
        let mut motions = Vec::new();

        for col in 0..size {
            for row in 0..size {
                if self.board.get((row, col)).is_some() {
                    continue;
                }
                let kind = random_kind(self.config.tile_kinds, &mut self.rng);
                let entry = self.board.spawn((row, col), kind);
                motions.push(Motion {
                    tile: entry.id,
                    from: self.config.spawn_position((row, col)),
                    to: self.config.world_position((row, col)),
                    duration: self.config.fall_duration,
                });
            }
        }

        log::trace!("Refilled {} tiles", motions.len());
        motions
    }

    fn stabilize(&mut self) -> Step {
        self.state = EngineState::Idle;
        self.events.push_back(BoardEvent::BoardStable {
            removed: self.removed,
            cascades: self.cascades,
        });
        log::debug!(
            "Board stable after {} cascades, {} tiles removed",
            self.cascades,
            self.removed
        );
        Step::Stable
    }
}
