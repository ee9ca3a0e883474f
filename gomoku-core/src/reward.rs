use serde::Deserialize;

/// Reward values handed out by the engine (to the mover) and by the driver (to the opponent).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RewardPolicy {
    /// Any accepted move that does not end the game.
    pub step: f64,
    /// Added to `step` when the move forms an open three.
    pub open_three_bonus: f64,
    pub win: f64,
    pub loss: f64,
    /// Given to both sides when the board fills up.
    pub draw: f64,
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self {
            step: 0.01,
            open_three_bonus: 0.05,
            win: 1.0,
            loss: -1.0,
            draw: 0.5,
        }
    }
}

impl RewardPolicy {
    /// Reward for an accepted move that did not end the game.
    pub fn shaped_step(&self, open_three: bool) -> f64 {
        if open_three {
            self.step + self.open_three_bonus
        } else {
            self.step
        }
    }
}
