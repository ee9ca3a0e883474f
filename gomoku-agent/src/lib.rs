//! Tabular Q-learning agents for Gomoku and the self-play driver that trains them.

pub mod agent;
pub mod agents;
pub mod error;
pub mod self_play;
pub mod stats;
