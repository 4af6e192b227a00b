use crate::config::GameConfig;
use crate::data::*;
use crate::engine::evaluate;
use crate::lifecycle::AttemptLifecycle;
use crate::results::*;
use crate::store::GameStore;
use crate::validation::{validate_guess, GuessRequest};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{instrument, warn};

/// Everything a player sees for one word: the attempt, its guesses, and a hint for each guess.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Board {
    pub word_id: i64,
    pub attempt: Attempt,
    pub guesses: Vec<Guess>,
    /// One hint per guess, in the same order as `guesses`.
    pub hints: Vec<Hint>,
}

impl Board {
    /// Builds the board, recomputing every hint from the current answer.
    fn new(word: &Word, attempt: Attempt, guesses: Vec<Guess>) -> Board {
        let hints = guesses
            .iter()
            .map(|guess| evaluate(&word.answer, &guess.submission).hint)
            .collect();
        Board {
            word_id: word.id,
            attempt,
            guesses,
            hints,
        }
    }

    pub fn is_solved(&self) -> bool {
        self.attempt.is_solved
    }

    pub fn is_open(&self) -> bool {
        self.attempt.is_open
    }
}

struct GameState {
    word: Word,
    attempt: Attempt,
    guesses: Vec<Guess>,
}

/// The user-facing game operations: fetch the board, submit a guess, and expire an attempt.
///
/// Construct one per store and share it between request handlers.
pub struct GameSession<S> {
    store: Arc<S>,
    lifecycle: AttemptLifecycle<S>,
}

impl<S> Clone for GameSession<S> {
    fn clone(&self) -> Self {
        GameSession {
            store: Arc::clone(&self.store),
            lifecycle: self.lifecycle.clone(),
        }
    }
}

impl<S: GameStore> GameSession<S> {
    pub fn new(store: Arc<S>, config: GameConfig) -> Self {
        GameSession {
            lifecycle: AttemptLifecycle::new(Arc::clone(&store), config),
            store,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn lifecycle(&self) -> &AttemptLifecycle<S> {
        &self.lifecycle
    }

    /// Returns the current board for the word, creating its attempt if needed.
    #[instrument(skip(self))]
    pub fn fetch_state(&self, word_id: i64) -> Result<Board, GameError> {
        let state = self.load(word_id)?;
        Ok(Board::new(&state.word, state.attempt, state.guesses))
    }

    /// Evaluates and records a guess, then returns the updated board.
    ///
    /// If the attempt is already closed the guess is neither validated nor stored, and the
    /// unchanged board is returned. A guess racing another writer that closes the attempt is
    /// dropped, and the board reflects whatever the store holds afterwards.
    #[instrument(skip(self, request), fields(submission = %request.submission))]
    pub fn submit_guess(&self, word_id: i64, request: &GuessRequest) -> Result<Board, GameError> {
        let GameState {
            word,
            attempt,
            guesses,
        } = self.load(word_id)?;
        if !attempt.is_open {
            return Ok(Board::new(&word, attempt, guesses));
        }

        validate_guess(word_id, request).map_err(GameError::ValidationFailed)?;
        let guess = NewGuess {
            word_id,
            attempt_id: attempt.id,
            submission: request.submission.to_lowercase(),
            // Validation guarantees a positive time.
            submission_time: request.submission_time.unwrap_or_default(),
        };

        let evaluation = evaluate(&word.answer, &guess.submission);
        let outcome = self
            .lifecycle
            .record_guess(&attempt, &guess, evaluation.solved)
            .map_err(|err| infrastructure(word_id, "record guess", err))?;
        // Other writers may have recorded guesses since the board was loaded.
        let guesses = self
            .store
            .list_guesses_by_attempt_id(outcome.attempt.id)
            .map_err(|err| infrastructure(word_id, "load guesses", err))?;
        Ok(Board::new(&word, outcome.attempt, guesses))
    }

    /// Closes the word's attempt and returns the updated board.
    #[instrument(skip(self))]
    pub fn expire_attempt(&self, word_id: i64) -> Result<Board, GameError> {
        let state = self.load(word_id)?;
        let attempt = self
            .lifecycle
            .expire(&state.attempt)
            .map_err(|err| infrastructure(word_id, "expire attempt", err))?;
        let guesses = self
            .store
            .list_guesses_by_attempt_id(attempt.id)
            .map_err(|err| infrastructure(word_id, "load guesses", err))?;
        Ok(Board::new(&state.word, attempt, guesses))
    }

    fn load(&self, word_id: i64) -> Result<GameState, GameError> {
        let word = match self.store.get_word(word_id) {
            Ok(word) => word,
            Err(StoreError::NotFound) => return Err(GameError::NotFound),
            Err(err) => return Err(infrastructure(word_id, "load word", err)),
        };
        let attempt = self
            .lifecycle
            .get_or_create(word_id)
            .map_err(|err| infrastructure(word_id, "load attempt", err))?;
        let guesses = self
            .store
            .list_guesses_by_attempt_id(attempt.id)
            .map_err(|err| infrastructure(word_id, "load guesses", err))?;
        Ok(GameState {
            word,
            attempt,
            guesses,
        })
    }
}

fn infrastructure(word_id: i64, operation: &str, err: StoreError) -> GameError {
    warn!(word_id, operation, error = %err, "store operation failed");
    GameError::Infrastructure(err)
}
