use gomoku_core::game::{GameStatus, Turn};

/// What one agent reports about a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AgentSummary {
    pub exploration_rate: f64,
    /// Highest greedy Q-value seen during the game.
    pub max_q_value: Option<f64>,
    /// Mean of the greedy Q-values seen during the game.
    pub mean_q_value: Option<f64>,
    /// The last reward the agent learned from, i.e. its terminal reward.
    pub final_reward: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameSummary {
    pub status: GameStatus,
    pub move_count: usize,
    pub black: AgentSummary,
    pub white: AgentSummary,
}

impl GameSummary {
    pub fn winner(&self) -> Option<Turn> {
        self.status.winner()
    }

    pub fn agent(&self, turn: Turn) -> &AgentSummary {
        match turn {
            Turn::Black => &self.black,
            Turn::White => &self.white,
        }
    }
}

/// Running win/draw counts plus the full per-game history.
#[derive(Debug, Clone, Default)]
pub struct TrainingStats {
    black_wins: usize,
    white_wins: usize,
    draws: usize,
    games: Vec<GameSummary>,
}

impl TrainingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, summary: GameSummary) {
        match summary.status {
            GameStatus::Won(Turn::Black) => self.black_wins += 1,
            GameStatus::Won(Turn::White) => self.white_wins += 1,
            GameStatus::Drawn => self.draws += 1,
            GameStatus::InProgress => {}
        }

        self.games.push(summary);
    }

    pub fn games_played(&self) -> usize {
        self.games.len()
    }

    pub fn games(&self) -> &[GameSummary] {
        &self.games
    }

    pub fn last_game(&self) -> Option<&GameSummary> {
        self.games.last()
    }

    pub fn wins(&self, turn: Turn) -> usize {
        match turn {
            Turn::Black => self.black_wins,
            Turn::White => self.white_wins,
        }
    }

    pub fn draws(&self) -> usize {
        self.draws
    }

    pub fn win_rate(&self, turn: Turn) -> f64 {
        ratio(self.wins(turn), self.games_played())
    }

    pub fn draw_rate(&self) -> f64 {
        ratio(self.draws, self.games_played())
    }

    pub fn average_length(&self) -> f64 {
        self.recent_average_length(self.games.len())
    }

    /// Average move count over the last `window` games.
    pub fn recent_average_length(&self, window: usize) -> f64 {
        let recent = &self.games[self.games.len().saturating_sub(window)..];

        if recent.is_empty() {
            return 0.0;
        }

        recent.iter().map(|game| game.move_count as f64).sum::<f64>() / recent.len() as f64
    }

    /// Cumulative `(black wins, white wins, draws)` after each game, starting from game zero.
    pub fn cumulative_results(&self) -> Vec<(usize, usize, usize)> {
        let mut totals = (0, 0, 0);
        let mut curve = Vec::with_capacity(self.games.len() + 1);
        curve.push(totals);

        for game in &self.games {
            match game.status {
                GameStatus::Won(Turn::Black) => totals.0 += 1,
                GameStatus::Won(Turn::White) => totals.1 += 1,
                GameStatus::Drawn => totals.2 += 1,
                GameStatus::InProgress => {}
            }
            curve.push(totals);
        }

        curve
    }

    /// Terminal reward of one side for each game, in order.
    pub fn final_rewards(&self, turn: Turn) -> Vec<Option<f64>> {
        self.games
            .iter()
            .map(|game| game.agent(turn).final_reward)
            .collect()
    }

    /// Exploration rate of one side at the end of each game.
    pub fn exploration_rates(&self, turn: Turn) -> Vec<f64> {
        self.games
            .iter()
            .map(|game| game.agent(turn).exploration_rate)
            .collect()
    }
}

fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }

    count as f64 / total as f64
}
