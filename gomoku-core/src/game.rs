use crate::{
    board::{Board, Cell, Position, BOARD_CELLS},
    reward::RewardPolicy,
};
use log::debug;
use std::fmt::Display;
use thiserror::Error;

/// Number of stones in a line needed to win.
pub const WIN_LENGTH: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Turn {
    Black,
    White,
}

impl Turn {
    pub fn name(self) -> &'static str {
        match self {
            Turn::Black => "black",
            Turn::White => "white",
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Turn::Black => 'X',
            Turn::White => 'O',
        }
    }

    pub fn next(self) -> Self {
        match self {
            Turn::Black => Turn::White,
            Turn::White => Turn::Black,
        }
    }
}

impl From<Turn> for Cell {
    fn from(turn: Turn) -> Self {
        match turn {
            Turn::Black => Cell::Black,
            Turn::White => Cell::White,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GameStatus {
    InProgress,
    Won(Turn),
    Drawn,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    pub fn winner(self) -> Option<Turn> {
        match self {
            GameStatus::Won(turn) => Some(turn),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Game {
    turn: Turn,
    move_count: usize,
    status: GameStatus,
    last_move: Option<Position>,
    rewards: RewardPolicy,
    board: Board,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self::with_rewards(RewardPolicy::default())
    }

    pub fn with_rewards(rewards: RewardPolicy) -> Self {
        Self {
            turn: Turn::Black,
            move_count: 0,
            status: GameStatus::InProgress,
            last_move: None,
            rewards,
            board: Board::new(),
        }
    }

    /// Player to move. Frozen on the player who ended the game once it is terminal.
    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn move_count(&self) -> usize {
        self.move_count
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn winner(&self) -> Option<Turn> {
        self.status.winner()
    }

    pub fn last_move(&self) -> Option<Position> {
        self.last_move
    }

    pub fn rewards(&self) -> &RewardPolicy {
        &self.rewards
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn available_moves(&self) -> Vec<Position> {
        self.board.available_moves()
    }

    /// Clears the board and hands the first move to black.
    pub fn reset(&mut self) {
        self.turn = Turn::Black;
        self.move_count = 0;
        self.status = GameStatus::InProgress;
        self.last_move = None;
        self.board = Board::new();
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaceStoneResult {
    pub position: Position,
    pub turn_was: Turn,
    /// Longest line through the placed stone.
    pub longest_run: usize,
    /// The placed stone completed an unblocked line of exactly three.
    pub open_three: bool,
    pub status: GameStatus,
    /// Reward earned by the player who placed the stone.
    pub reward: f64,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaceStoneError {
    #[error("position {position:?} is outside the board")]
    InvalidPosition { position: Position },
    #[error("{} stone already placed at {position}", .stone.name())]
    StoneAlreadyPlaced { position: Position, stone: Cell },
    #[error("game is already finished ({status:?})")]
    GameFinished { status: GameStatus },
}

/// Outcome of [`Game::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub reward: f64,
    pub done: bool,
    /// `false` when the move was rejected and nothing changed.
    pub accepted: bool,
}

impl Game {
    pub fn place_stone(&mut self, position: Position) -> Result<PlaceStoneResult, PlaceStoneError> {
        if self.status.is_terminal() {
            return Err(PlaceStoneError::GameFinished {
                status: self.status,
            });
        }

        let cell = match self.board.get_cell(position) {
            Some(cell) => cell,
            None => {
                return Err(PlaceStoneError::InvalidPosition { position });
            }
        };

        if !cell.is_empty() {
            return Err(PlaceStoneError::StoneAlreadyPlaced {
                position,
                stone: cell,
            });
        }

        let turn_was = self.turn;
        self.board.set_cell(position, turn_was.into());
        self.move_count += 1;
        self.last_move = Some(position);

        // open threes are measured before a win can take over the reward
        let open_three = self.board.forms_open_three(position);
        let longest_run = self.board.longest_run(position);

        let reward = if WIN_LENGTH <= longest_run {
            self.status = GameStatus::Won(turn_was);
            self.rewards.win
        } else if self.move_count == BOARD_CELLS {
            self.status = GameStatus::Drawn;
            self.rewards.draw
        } else {
            self.turn = turn_was.next();
            self.rewards.shaped_step(open_three)
        };

        Ok(PlaceStoneResult {
            position,
            turn_was,
            longest_run,
            open_three,
            status: self.status,
            reward,
        })
    }

    /// Places a stone, silently rejecting illegal moves with a zero reward.
    pub fn step(&mut self, position: Position) -> Step {
        match self.place_stone(position) {
            Ok(result) => Step {
                reward: result.reward,
                done: result.status.is_terminal(),
                accepted: true,
            },
            Err(err) => {
                debug!("rejected move: {}", err);
                Step {
                    reward: 0.0,
                    done: self.status.is_terminal(),
                    accepted: false,
                }
            }
        }
    }
}

impl Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "turn: {} ({:3})", self.turn.name(), self.move_count + 1)?;
        writeln!(
            f,
            "state: {}",
            match self.status {
                GameStatus::Won(turn) => format!("{} wins", turn.name()),
                GameStatus::Drawn => "draw".to_string(),
                GameStatus::InProgress => "in progress".to_string(),
            }
        )?;
        write!(f, "{}", self.board)
    }
}
