use crate::{
    agent::Agent,
    stats::{GameSummary, TrainingStats},
};
use gomoku_core::{
    board::Position,
    game::{Game, GameStatus, Turn},
};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// A stone was placed and the game goes on.
    Moved {
        turn: Turn,
        position: Position,
        reward: f64,
    },
    /// The engine refused the move; board and turn are unchanged.
    Rejected { turn: Turn, position: Position },
    /// The agent to move had nothing to play.
    NoMove { turn: Turn },
    /// The move ended the game. Both agents have learned from it and been reset.
    Finished(GameSummary),
}

/// Alternates two agents on one game and routes every reward to the right agent.
///
/// After a game ends the final board stays readable through [`SelfPlay::game`]
/// until the next [`SelfPlay::step`] starts a fresh game.
#[derive(Debug)]
pub struct SelfPlay<B, W> {
    game: Game,
    black: B,
    white: W,
    stats: TrainingStats,
}

impl<B, W> SelfPlay<B, W>
where
    B: Agent,
    W: Agent,
{
    pub fn new(game: Game, black: B, white: W) -> Self {
        debug_assert_eq!(black.turn(), Turn::Black);
        debug_assert_eq!(white.turn(), Turn::White);

        Self {
            game,
            black,
            white,
            stats: TrainingStats::new(),
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn black(&self) -> &B {
        &self.black
    }

    pub fn white(&self) -> &W {
        &self.white
    }

    pub fn black_mut(&mut self) -> &mut B {
        &mut self.black
    }

    pub fn white_mut(&mut self) -> &mut W {
        &mut self.white
    }

    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    pub fn into_agents(self) -> (B, W) {
        (self.black, self.white)
    }

    /// Abandons the game in progress and clears both agents.
    pub fn reset(&mut self) {
        self.game.reset();
        self.black.reset();
        self.white.reset();
    }

    /// Lets the agent to move play once.
    pub fn step(&mut self) -> StepOutcome {
        if self.game.is_terminal() {
            self.game.reset();
        }

        let turn = self.game.turn();
        let board = self.game.board();
        let action = match turn {
            Turn::Black => self.black.choose_action(board),
            Turn::White => self.white.choose_action(board),
        };

        let position = match action {
            Some(position) => position,
            None => return StepOutcome::NoMove { turn },
        };

        let step = self.game.step(position);

        if !step.accepted {
            let agent_name = match turn {
                Turn::Black => self.black.name(),
                Turn::White => self.white.name(),
            };
            debug!("{} ({}) move {} rejected", agent_name, turn.name(), position);
            return StepOutcome::Rejected { turn, position };
        }

        if step.done {
            return StepOutcome::Finished(self.finish_game(step.reward));
        }

        let board = self.game.board();
        match turn {
            Turn::Black => self.black.learn(board, step.reward),
            Turn::White => self.white.learn(board, step.reward),
        }

        StepOutcome::Moved {
            turn,
            position,
            reward: step.reward,
        }
    }

    /// Plays until the current game ends.
    ///
    /// Returns `None` if an agent could not produce a move, in which case the game is abandoned.
    pub fn play_game(&mut self) -> Option<GameSummary> {
        loop {
            match self.step() {
                StepOutcome::Finished(summary) => return Some(summary),
                StepOutcome::NoMove { turn } => {
                    debug!("{} had no move, abandoning game", turn.name());
                    self.reset();
                    return None;
                }
                StepOutcome::Moved { .. } | StepOutcome::Rejected { .. } => {}
            }
        }
    }

    /// Sends each agent its terminal reward exactly once, then records and clears the game.
    fn finish_game(&mut self, mover_reward: f64) -> GameSummary {
        let rewards = *self.game.rewards();
        let board = self.game.board();

        match self.game.status() {
            GameStatus::Won(Turn::Black) => {
                self.black.learn(board, mover_reward);
                self.white.learn(board, rewards.loss);
            }
            GameStatus::Won(Turn::White) => {
                self.white.learn(board, mover_reward);
                self.black.learn(board, rewards.loss);
            }
            GameStatus::Drawn => match self.game.turn() {
                Turn::Black => {
                    self.black.learn(board, mover_reward);
                    self.white.learn(board, rewards.draw);
                }
                Turn::White => {
                    self.white.learn(board, mover_reward);
                    self.black.learn(board, rewards.draw);
                }
            },
            GameStatus::InProgress => {}
        }

        let summary = GameSummary {
            status: self.game.status(),
            move_count: self.game.move_count(),
            black: self.black.summary(),
            white: self.white.summary(),
        };

        debug!(
            "game {} finished after {} moves: {:?}",
            self.stats.games_played() + 1,
            summary.move_count,
            summary.status
        );

        self.black.reset();
        self.white.reset();
        self.stats.record(summary);

        summary
    }
}
