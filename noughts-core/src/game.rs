//! Game sessions: the human plays, the engine answers
//!
//! A [`Game`] is the collaborator between a front end and the engine. It
//! validates human moves, re-checks the position after every mark, and only
//! asks the engine for a reply while the game is still open.

use serde::{Deserialize, Serialize};

use crate::ai::{Engine, Move, SearchMode};
use crate::board::{Board, Side, CELLS};
use crate::error::GameError;
use crate::eval::{evaluate, outcome, Outcome};

/// Session settings
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// The computer places the first mark
    #[serde(default)]
    pub computer_first: bool,
    #[serde(default)]
    pub mode: SearchMode,
}

impl GameConfig {
    pub fn computer_first(mut self) -> Self {
        self.computer_first = true;
        self
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }
}

/// A mark placed during the game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub side: Side,
    pub index: usize,
}

/// What happened in response to one human move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub human: usize,
    /// The engine's reply, absent if the human move ended the game
    pub computer: Option<usize>,
    pub outcome: Outcome,
}

/// One game between a human and the engine
#[derive(Clone, Debug)]
pub struct Game {
    config: GameConfig,
    engine: Engine,
    board: Board,
    history: Vec<Placement>,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let mut game = Self {
            config,
            engine: Engine::new(config.mode),
            board: Board::empty(),
            history: Vec::with_capacity(CELLS),
        };
        game.open();
        game
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn history(&self) -> &[Placement] {
        &self.history
    }

    /// Current verdict, recomputed from the board
    pub fn outcome(&self) -> Outcome {
        outcome(&self.board)
    }

    pub fn is_over(&self) -> bool {
        self.outcome().is_terminal()
    }

    /// Side whose mark comes next, or `None` once the game is over
    pub fn to_move(&self) -> Option<Side> {
        if self.is_over() {
            return None;
        }
        Some(match self.history.last() {
            Some(last) => last.side.opponent(),
            None if self.config.computer_first => Side::Computer,
            None => Side::Human,
        })
    }

    /// Apply a human move and, if the game continues, the engine's reply
    pub fn play(&mut self, index: usize) -> Result<Turn, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        if index >= CELLS {
            return Err(GameError::OutOfRange(index));
        }
        if !self.board.is_empty_at(index) {
            return Err(GameError::Occupied(index));
        }

        let verdict = self.apply(index, Side::Human);
        if verdict.is_terminal() {
            tracing::debug!(?verdict, "game ended on human move");
            return Ok(Turn {
                human: index,
                computer: None,
                outcome: verdict,
            });
        }

        let reply = self.engine.best_move(&self.board, Side::Computer);
        let (computer, verdict) = match reply {
            Some(mv) => (Some(mv.index), self.apply(mv.index, Side::Computer)),
            None => (None, self.outcome()),
        };

        Ok(Turn {
            human: index,
            computer,
            outcome: verdict,
        })
    }

    /// Engine suggestion for the human side
    pub fn hint(&self) -> Option<Move> {
        if self.to_move() != Some(Side::Human) {
            return None;
        }
        self.engine.best_move(&self.board, Side::Human)
    }

    /// Start over with the same settings
    pub fn reset(&mut self) {
        self.board = Board::empty();
        self.history.clear();
        self.open();
        tracing::debug!("game reset");
    }

    fn open(&mut self) {
        if !self.config.computer_first {
            return;
        }
        if let Some(mv) = self.engine.best_move(&self.board, Side::Computer) {
            self.apply(mv.index, Side::Computer);
        }
    }

    /// Place a mark and evaluate the board for the mover
    fn apply(&mut self, index: usize, side: Side) -> Outcome {
        self.board.place(index, side);
        self.history.push(Placement { side, index });
        tracing::debug!(%side, index, board = %self.board, "mark placed");
        evaluate(&self.board, side)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
