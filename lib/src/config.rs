#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The default number of previously recorded guesses after which an attempt closes.
pub const DEFAULT_GUESS_LIMIT: usize = 4;

/// Tunable rules for a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// When a new guess arrives and at least this many guesses were already recorded, the new
    /// guess is still recorded but the attempt closes. With the default of 4, a player gets five
    /// guesses in total.
    pub guess_limit: usize,
}

impl GameConfig {
    pub fn with_guess_limit(mut self, guess_limit: usize) -> Self {
        self.guess_limit = guess_limit;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            guess_limit: DEFAULT_GUESS_LIMIT,
        }
    }
}
