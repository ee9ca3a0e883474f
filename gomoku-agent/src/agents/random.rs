use crate::{agent::Agent, stats::AgentSummary};
use gomoku_core::{
    board::{Board, Position},
    game::Turn,
};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Plays a uniformly random empty cell and never learns. Used as an evaluation baseline.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    turn: Turn,
    rng: StdRng,
}

impl RandomAgent {
    pub fn new(turn: Turn, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self { turn, rng }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        "random"
    }

    fn turn(&self) -> Turn {
        self.turn
    }

    fn choose_action(&mut self, board: &Board) -> Option<Position> {
        board.available_moves().choose(&mut self.rng).copied()
    }

    fn learn(&mut self, _next_board: &Board, _reward: f64) {}

    fn summary(&self) -> AgentSummary {
        AgentSummary {
            exploration_rate: 1.0,
            ..AgentSummary::default()
        }
    }

    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use gomoku_core::game::Game;

    #[test]
    fn test_random_agent_plays_empty_cells() {
        let mut agent = RandomAgent::new(Turn::White, Some(11));
        let mut game = Game::new();

        for _ in 0..100 {
            let action = agent.choose_action(game.board()).unwrap();
            assert!(game.step(action).accepted);

            if game.is_terminal() {
                break;
            }
        }
    }

    #[test]
    fn test_same_seed_same_moves() {
        let board = Board::new();
        let mut first = RandomAgent::new(Turn::Black, Some(5));
        let mut second = RandomAgent::new(Turn::Black, Some(5));

        for _ in 0..10 {
            assert_eq!(first.choose_action(&board), second.choose_action(&board));
        }
    }
}
