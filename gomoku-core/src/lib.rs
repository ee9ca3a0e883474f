//! Gomoku rules engine: a 15×15 board, move legality, five-in-a-row detection
//! and the shaped rewards a learning agent trains on.

pub mod board;
pub mod game;
pub mod reward;
