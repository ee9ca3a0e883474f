use super::agent::{QLearningAgent, QLearningConfig};
use crate::{error::TrainError, self_play::SelfPlay};
use figment::Figment;
use gomoku_core::{
    game::{Game, Turn},
    reward::RewardPolicy,
};
use log::info;
use serde::Deserialize;

pub type QLearningSession = SelfPlay<QLearningAgent, QLearningAgent>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrainOptions {
    /// Number of self-play games to train for.
    pub games: usize,
    /// Log progress every this many games; `0` turns progress logs off.
    pub log_interval: usize,
    /// Games played against a random opponent at each progress log.
    pub eval_games: usize,
    pub seed: Option<u64>,
    pub agent: QLearningConfig,
    pub rewards: RewardPolicy,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            games: 1000,
            log_interval: 100,
            eval_games: 20,
            seed: None,
            agent: QLearningConfig::default(),
            rewards: RewardPolicy::default(),
        }
    }
}

impl TrainOptions {
    pub fn validate(&self) -> Result<(), TrainError> {
        if self.games == 0 {
            return Err(TrainError::InvalidOption("games must be > 0".to_owned()));
        }

        self.agent.validate()
    }
}

pub struct QLearningTrainer {
    options: TrainOptions,
}

impl QLearningTrainer {
    pub fn new(options: TrainOptions) -> Result<Self, TrainError> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn from_figment(figment: &Figment) -> Result<Self, TrainError> {
        let options: TrainOptions = figment.extract()?;
        Self::new(options)
    }

    pub fn options(&self) -> &TrainOptions {
        &self.options
    }

    /// A fresh game with two untrained agents, one per colour.
    pub fn create_session(&self) -> QLearningSession {
        let black_seed = self.options.seed;
        let white_seed = black_seed.map(|seed| seed.wrapping_add(1));

        SelfPlay::new(
            Game::with_rewards(self.options.rewards),
            QLearningAgent::new(Turn::Black, self.options.agent, black_seed),
            QLearningAgent::new(Turn::White, self.options.agent, white_seed),
        )
    }

    pub fn train(&self) -> QLearningSession {
        let mut session = self.create_session();
        self.train_session(&mut session, self.options.games);
        session
    }

    /// Plays `games` more self-play games on an existing session.
    pub fn train_session(&self, session: &mut QLearningSession, games: usize) {
        let log_interval = self.options.log_interval;

        for game in 1..=games {
            session.play_game();

            if log_interval != 0 && game % log_interval == 0 {
                self.log_progress(session);
            }
        }
    }

    fn log_progress(&self, session: &mut QLearningSession) {
        let stats = session.stats();
        let window = self.options.log_interval;

        info!(
            "games: {}, black wins: {:.1}%, white wins: {:.1}%, draws: {:.1}%, avg length: {:.1} (last {}: {:.1})",
            stats.games_played(),
            stats.win_rate(Turn::Black) * 100.0,
            stats.win_rate(Turn::White) * 100.0,
            stats.draw_rate() * 100.0,
            stats.average_length(),
            window,
            stats.recent_average_length(window),
        );
        info!(
            "exploration: black {:.3}, white {:.3}; q-table entries: black {}, white {}",
            session.black().exploration_rate(),
            session.white().exploration_rate(),
            session.black().q_table().len(),
            session.white().q_table().len(),
        );

        if self.options.eval_games == 0 {
            return;
        }

        let played = session.stats().games_played();
        let rewards = self.options.rewards;
        let games = self.options.eval_games;
        let black_seed = eval::opponent_seed(self.options.seed, played, Turn::Black);
        let white_seed = eval::opponent_seed(self.options.seed, played, Turn::White);
        let black = eval::evaluate_many(session.black_mut(), games, rewards, black_seed);
        let white = eval::evaluate_many(session.white_mut(), games, rewards, white_seed);

        info!(
            "vs random: black {}/{}/{} (w/l/d), white {}/{}/{} (w/l/d)",
            black.agent_wins,
            black.opponent_wins,
            black.draws,
            white.agent_wins,
            white.opponent_wins,
            white.draws,
        );
    }
}

pub mod eval {
    use crate::{
        agent::Agent,
        agents::{q_learning::QLearningAgent, random::RandomAgent},
        self_play::SelfPlay,
    };
    use gomoku_core::{
        game::{Game, GameStatus, Turn},
        reward::RewardPolicy,
    };

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EvalResult {
        pub agent_wins: usize,
        pub opponent_wins: usize,
        pub draws: usize,
    }

    /// Seed for the random opponent of an evaluation run, distinct per colour and per
    /// training checkpoint so successive evaluations face different move streams.
    pub fn opponent_seed(base: Option<u64>, games_played: usize, agent_turn: Turn) -> Option<u64> {
        let colour = match agent_turn {
            Turn::Black => 0,
            Turn::White => 1,
        };

        base.map(|seed| {
            seed.wrapping_add((games_played as u64).wrapping_mul(2))
                .wrapping_add(colour)
        })
    }

    /// Plays `games` greedy games against a random opponent without changing the agent.
    pub fn evaluate_many(
        agent: &mut QLearningAgent,
        games: usize,
        rewards: RewardPolicy,
        seed: Option<u64>,
    ) -> EvalResult {
        let was_training = agent.is_training();
        agent.set_training(false);

        let agent_turn = agent.turn();
        let opponent = RandomAgent::new(agent_turn.next(), seed);
        let game = Game::with_rewards(rewards);

        let result = match agent_turn {
            Turn::Black => play(SelfPlay::new(game, &mut *agent, opponent), agent_turn, games),
            Turn::White => play(SelfPlay::new(game, opponent, &mut *agent), agent_turn, games),
        };

        agent.set_training(was_training);
        result
    }

    fn play<B, W>(mut session: SelfPlay<B, W>, agent_turn: Turn, games: usize) -> EvalResult
    where
        B: Agent,
        W: Agent,
    {
        let mut result = EvalResult::default();

        for _ in 0..games {
            let summary = match session.play_game() {
                Some(summary) => summary,
                None => continue,
            };

            match summary.status {
                GameStatus::Won(winner) if winner == agent_turn => result.agent_wins += 1,
                GameStatus::Won(_) => result.opponent_wins += 1,
                GameStatus::Drawn => result.draws += 1,
                GameStatus::InProgress => {}
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::providers::{Format, Toml};

    fn small_options() -> TrainOptions {
        TrainOptions {
            games: 20,
            log_interval: 10,
            eval_games: 2,
            seed: Some(42),
            ..TrainOptions::default()
        }
    }

    #[test]
    fn test_options_from_toml() {
        let figment = Figment::new().merge(Toml::string(
            r#"
            games = 50
            seed = 7

            [agent]
            learning_rate = 0.2

            [rewards]
            draw = 0.1
            "#,
        ));
        let trainer = QLearningTrainer::from_figment(&figment).unwrap();
        let options = trainer.options();

        assert_eq!(options.games, 50);
        assert_eq!(options.seed, Some(7));
        assert_eq!(options.agent.learning_rate, 0.2);
        assert_eq!(options.agent.discount_factor, 0.9);
        assert_eq!(options.rewards.draw, 0.1);
        assert_eq!(options.rewards.win, 1.0);
    }

    #[test]
    fn test_empty_figment_uses_defaults() {
        let trainer = QLearningTrainer::from_figment(&Figment::new()).unwrap();
        assert_eq!(trainer.options(), &TrainOptions::default());
    }

    #[test]
    fn test_invalid_options_are_rejected() {
        let options = TrainOptions {
            games: 0,
            ..TrainOptions::default()
        };
        assert!(matches!(
            QLearningTrainer::new(options),
            Err(TrainError::InvalidOption(_))
        ));

        let figment = Figment::new().merge(Toml::string("games = \"many\""));
        assert!(matches!(
            QLearningTrainer::from_figment(&figment),
            Err(TrainError::Config(_))
        ));
    }

    #[test]
    fn test_training_plays_requested_games() {
        let trainer = QLearningTrainer::new(small_options()).unwrap();
        let session = trainer.train();

        assert_eq!(session.stats().games_played(), 20);
        assert_eq!(session.black().reward_history().len(), 20);
        assert_eq!(session.white().reward_history().len(), 20);
        assert_eq!(session.stats().cumulative_results().len(), 21);
        assert!(session.black().is_training());
    }

    #[test]
    fn test_evaluation_leaves_agent_untouched() {
        let trainer = QLearningTrainer::new(small_options()).unwrap();
        let mut session = trainer.train();

        let table_size = session.white().q_table().len();
        let exploration = session.white().exploration_rate();
        let history = session.white().reward_history().len();

        let result = eval::evaluate_many(session.white_mut(), 3, RewardPolicy::default(), Some(1));

        assert_eq!(result.agent_wins + result.opponent_wins + result.draws, 3);
        assert_eq!(session.white().q_table().len(), table_size);
        assert_eq!(session.white().exploration_rate(), exploration);
        assert_eq!(session.white().reward_history().len(), history);
        assert!(session.white().is_training());
    }

    #[test]
    fn test_opponent_seed_varies_per_checkpoint_and_colour() {
        let seeds = [
            eval::opponent_seed(Some(42), 10, Turn::Black),
            eval::opponent_seed(Some(42), 10, Turn::White),
            eval::opponent_seed(Some(42), 20, Turn::Black),
            eval::opponent_seed(Some(42), 20, Turn::White),
        ];

        for (i, a) in seeds.iter().enumerate() {
            assert!(a.is_some());
            for b in &seeds[i + 1..] {
                assert_ne!(a, b);
            }
        }

        assert_eq!(
            eval::opponent_seed(Some(42), 10, Turn::Black),
            eval::opponent_seed(Some(42), 10, Turn::Black)
        );
        assert_eq!(eval::opponent_seed(None, 10, Turn::White), None);
    }
}
