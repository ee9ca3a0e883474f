use crate::stats::AgentSummary;
use gomoku_core::{
    board::{Board, Position},
    game::Turn,
};

/// A player that picks moves from a board and learns from the rewards routed back to it.
pub trait Agent {
    fn name(&self) -> &str;

    /// The colour this agent plays.
    fn turn(&self) -> Turn;

    /// Picks a move on `board`, or `None` when no empty cell is left.
    fn choose_action(&mut self, board: &Board) -> Option<Position>;

    /// Learns from the board observed after the agent's last move and the reward it earned.
    fn learn(&mut self, next_board: &Board, reward: f64);

    /// Figures for the game in progress. Read before [`Agent::reset`] clears them.
    fn summary(&self) -> AgentSummary;

    /// Forgets the current game so a new one can start.
    fn reset(&mut self);
}

impl<T> Agent for &mut T
where
    T: ?Sized + Agent,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn turn(&self) -> Turn {
        (**self).turn()
    }

    fn choose_action(&mut self, board: &Board) -> Option<Position> {
        (**self).choose_action(board)
    }

    fn learn(&mut self, next_board: &Board, reward: f64) {
        (**self).learn(next_board, reward)
    }

    fn summary(&self) -> AgentSummary {
        (**self).summary()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

impl<T> Agent for Box<T>
where
    T: ?Sized + Agent,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn turn(&self) -> Turn {
        (**self).turn()
    }

    fn choose_action(&mut self, board: &Board) -> Option<Position> {
        (**self).choose_action(board)
    }

    fn learn(&mut self, next_board: &Board, reward: f64) {
        (**self).learn(next_board, reward)
    }

    fn summary(&self) -> AgentSummary {
        (**self).summary()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}
