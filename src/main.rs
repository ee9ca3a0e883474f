use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use gomoku_agent::agents::q_learning::QLearningTrainer;
use gomoku_core::game::Turn;
use log::info;
use std::error::Error;

const CONFIG_PATH: &str = "gomoku.toml";

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Figment::new()
        .merge(Toml::file(CONFIG_PATH))
        .merge(Env::prefixed("GOMOKU_").split("__"));
    let trainer = QLearningTrainer::from_figment(&config)?;

    info!("training for {} games", trainer.options().games);
    let session = trainer.train();
    let stats = session.stats();

    info!(
        "done: {} games, black {} wins, white {} wins, {} draws, avg length {:.1}",
        stats.games_played(),
        stats.wins(Turn::Black),
        stats.wins(Turn::White),
        stats.draws(),
        stats.average_length(),
    );

    if let Some(last) = stats.last_game() {
        for (turn, summary) in [(Turn::Black, &last.black), (Turn::White, &last.white)] {
            info!(
                "{}: exploration {:.3}, max q {:?}, mean q {:?}, final reward {:?}",
                turn.name(),
                summary.exploration_rate,
                summary.max_q_value,
                summary.mean_q_value,
                summary.final_reward,
            );
        }

        println!("{}", session.game());
    }

    Ok(())
}
