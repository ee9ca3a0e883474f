mod agent;
mod q_table;
mod trainer;

pub use agent::*;
pub use q_table::*;
pub use trainer::*;
