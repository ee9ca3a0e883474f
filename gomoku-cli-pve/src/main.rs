use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use gomoku_agent::{
    agent::Agent,
    agents::q_learning::QLearningTrainer,
    self_play::{SelfPlay, StepOutcome},
    stats::AgentSummary,
};
use gomoku_core::{
    board::{Board, Position},
    game::{Game, GameStatus, Turn},
};
use std::{error::Error, io::Write};

const CONFIG_PATH: &str = "gomoku.toml";

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Figment::new()
        .merge(Toml::file(CONFIG_PATH))
        .merge(Env::prefixed("GOMOKU_").split("__"));
    let trainer = QLearningTrainer::from_figment(&config)?;

    println!(
        "training the opponent for {} self-play games...",
        trainer.options().games
    );
    let (_, opponent) = trainer.train().into_agents();

    let game = Game::with_rewards(trainer.options().rewards);
    let mut session = SelfPlay::new(game, HumanAgent, opponent);

    loop {
        match session.step() {
            StepOutcome::Moved {
                turn: Turn::White,
                position,
                ..
            } => {
                println!("{} plays {}", Turn::White.name(), position);
            }
            StepOutcome::Moved { .. } => {}
            StepOutcome::Rejected { position, .. } => {
                println!("move {} was rejected", position);
            }
            StepOutcome::NoMove { .. } => {
                println!("bye");
                return Ok(());
            }
            StepOutcome::Finished(summary) => {
                println!("===========================");
                println!("{}", session.game());
                println!(
                    "game result: {}",
                    match summary.status {
                        GameStatus::Won(winner) => format!("{} wins", winner.name()),
                        _ => "draw".to_owned(),
                    }
                );

                if !ask_play_again() {
                    return Ok(());
                }
            }
        }
    }
}

/// Reads moves from stdin. Typing `quit` or closing stdin ends the session.
struct HumanAgent;

impl Agent for HumanAgent {
    fn name(&self) -> &str {
        "human"
    }

    fn turn(&self) -> Turn {
        Turn::Black
    }

    fn choose_action(&mut self, board: &Board) -> Option<Position> {
        println!("===========================");
        println!("{}", board);

        loop {
            println!();
            print!(
                "enter position to place stone for {} ({}): ",
                Turn::Black.name(),
                Turn::Black.symbol()
            );
            std::io::stdout().flush().ok()?;

            let input = read_line()?;

            if input.trim().eq_ignore_ascii_case("quit") {
                return None;
            }

            let position = match board.parse_position(&input) {
                Some(position) => position,
                None => {
                    println!("invalid position");
                    continue;
                }
            };

            match board.get_cell(position) {
                Some(cell) if cell.is_empty() => return Some(position),
                _ => println!("stone already placed at {}", position),
            }
        }
    }

    fn learn(&mut self, _next_board: &Board, _reward: f64) {}

    fn summary(&self) -> AgentSummary {
        AgentSummary::default()
    }

    fn reset(&mut self) {}
}

fn read_line() -> Option<String> {
    let mut input = String::new();

    match std::io::stdin().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input),
    }
}

fn ask_play_again() -> bool {
    print!("play again? [y/N]: ");

    if std::io::stdout().flush().is_err() {
        return false;
    }

    read_line()
        .map(|input| input.trim().eq_ignore_ascii_case("y"))
        .unwrap_or(false)
}
