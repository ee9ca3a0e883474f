use super::q_table::{QTable, StateKey};
use crate::{agent::Agent, error::TrainError, stats::AgentSummary};
use gomoku_core::{
    board::{Board, Position},
    game::Turn,
};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::Deserialize;

pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
pub const DEFAULT_DISCOUNT_FACTOR: f64 = 0.9;
pub const DEFAULT_EXPLORATION_RATE: f64 = 0.45;
pub const DEFAULT_EXPLORATION_DECAY: f64 = 0.9995;
pub const DEFAULT_EXPLORATION_MIN: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct QLearningConfig {
    pub learning_rate: f64,
    pub discount_factor: f64,
    /// Starting probability of playing a random move.
    pub exploration_rate: f64,
    /// Multiplier applied to the exploration rate after every update.
    pub exploration_decay: f64,
    pub exploration_min: f64,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            discount_factor: DEFAULT_DISCOUNT_FACTOR,
            exploration_rate: DEFAULT_EXPLORATION_RATE,
            exploration_decay: DEFAULT_EXPLORATION_DECAY,
            exploration_min: DEFAULT_EXPLORATION_MIN,
        }
    }
}

impl QLearningConfig {
    pub fn validate(&self) -> Result<(), TrainError> {
        let unit_ranges = [
            ("learning_rate", self.learning_rate),
            ("discount_factor", self.discount_factor),
            ("exploration_rate", self.exploration_rate),
            ("exploration_min", self.exploration_min),
        ];

        for (name, value) in unit_ranges {
            if !(0.0..=1.0).contains(&value) {
                return Err(TrainError::InvalidOption(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }

        if !(self.exploration_decay > 0.0 && self.exploration_decay <= 1.0) {
            return Err(TrainError::InvalidOption(format!(
                "exploration_decay must be in (0, 1], got {}",
                self.exploration_decay
            )));
        }

        if self.exploration_rate < self.exploration_min {
            return Err(TrainError::InvalidOption(
                "exploration_min must be <= exploration_rate".to_owned(),
            ));
        }

        Ok(())
    }
}

/// Tabular epsilon-greedy Q-learning player for one colour.
///
/// The update for a move is deferred until [`Agent::learn`] is called with the
/// board that followed it, so the agent keeps the state and action of its most
/// recent move.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    turn: Turn,
    config: QLearningConfig,
    exploration_rate: f64,
    training: bool,
    q_table: QTable,
    last_move: Option<(StateKey, Position)>,
    q_trace: Vec<f64>,
    reward_trace: Vec<f64>,
    q_history: Vec<Option<f64>>,
    reward_history: Vec<Option<f64>>,
    rng: StdRng,
}

impl QLearningAgent {
    pub fn new(turn: Turn, config: QLearningConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            turn,
            config,
            exploration_rate: config.exploration_rate,
            training: true,
            q_table: QTable::new(),
            last_move: None,
            q_trace: vec![],
            reward_trace: vec![],
            q_history: vec![],
            reward_history: vec![],
            rng,
        }
    }

    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }

    pub fn exploration_rate(&self) -> f64 {
        self.exploration_rate
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn is_training(&self) -> bool {
        self.training
    }

    /// Switches between training and pure greedy play.
    ///
    /// Outside training the agent never explores, never updates its table and
    /// keeps nothing for the statistics history.
    pub fn set_training(&mut self, training: bool) {
        self.training = training;
    }

    /// Per-game maximum of the greedy Q-values, one entry per finished game.
    pub fn q_history(&self) -> &[Option<f64>] {
        &self.q_history
    }

    /// Per-game final reward, one entry per finished game.
    pub fn reward_history(&self) -> &[Option<f64>] {
        &self.reward_history
    }

    /// Never raises the rate, even when it already starts below the floor.
    fn decay_exploration(&mut self) {
        let decayed =
            (self.exploration_rate * self.config.exploration_decay).max(self.config.exploration_min);
        self.exploration_rate = decayed.min(self.exploration_rate);
    }
}

impl Agent for QLearningAgent {
    fn name(&self) -> &str {
        "q-learning"
    }

    fn turn(&self) -> Turn {
        self.turn
    }

    fn choose_action(&mut self, board: &Board) -> Option<Position> {
        let available_moves = board.available_moves();

        if available_moves.is_empty() {
            return None;
        }

        let state = StateKey::from_board(board);
        let action = if self.training && self.rng.gen::<f64>() < self.exploration_rate {
            *available_moves.choose(&mut self.rng)?
        } else {
            let (action, value) = self.q_table.best_action(&state, &available_moves)?;

            if self.training {
                self.q_trace.push(value);
            }

            action
        };

        self.last_move = Some((state, action));
        Some(action)
    }

    fn learn(&mut self, next_board: &Board, reward: f64) {
        if !self.training {
            return;
        }

        let (state, action) = match self.last_move {
            Some(last_move) => last_move,
            None => return,
        };

        let next_state = StateKey::from_board(next_board);
        let max_next = self
            .q_table
            .max_value(&next_state, &next_board.available_moves());

        self.q_table.update(
            state,
            action,
            reward,
            max_next,
            self.config.learning_rate,
            self.config.discount_factor,
        );
        self.reward_trace.push(reward);
        self.decay_exploration();
    }

    fn summary(&self) -> AgentSummary {
        let max_q_value = self.q_trace.iter().copied().reduce(f64::max);
        let mean_q_value = if self.q_trace.is_empty() {
            None
        } else {
            Some(self.q_trace.iter().sum::<f64>() / self.q_trace.len() as f64)
        };

        AgentSummary {
            exploration_rate: self.exploration_rate,
            max_q_value,
            mean_q_value,
            final_reward: self.reward_trace.last().copied(),
        }
    }

    fn reset(&mut self) {
        if self.training {
            let summary = self.summary();
            self.q_history.push(summary.max_q_value);
            self.reward_history.push(summary.final_reward);
        }

        self.last_move = None;
        self.q_trace.clear();
        self.reward_trace.clear();
    }
}
