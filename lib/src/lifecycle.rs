use crate::config::GameConfig;
use crate::data::*;
use crate::results::*;
use crate::store::GameStore;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// Number of lock stripes guarding attempt updates. Words are spread across them by id.
const LOCK_STRIPES: usize = 32;

/// The result of offering a guess to an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessOutcome {
    /// The attempt after the guess was applied.
    pub attempt: Attempt,
    /// The stored guess, or `None` if the attempt was already closed.
    pub guess: Option<Guess>,
}

/// Computes the flags `(is_solved, is_open)` an open attempt moves to after accepting a guess.
///
/// Closure from the guess limit is judged against the guesses recorded *before* this one, so the
/// guess that triggers it is still accepted. A solving guess always wins over the limit.
pub fn next_flags(prior_guesses: usize, solved: bool, config: &GameConfig) -> (bool, bool) {
    if solved {
        return (true, false);
    }
    (false, prior_guesses < config.guess_limit)
}

/// Owns the open/closed/solved state of the single attempt for each word.
///
/// Clones share their locks, so every clone serializes guesses and expiry on the same word.
pub struct AttemptLifecycle<S> {
    store: Arc<S>,
    config: GameConfig,
    locks: Arc<[Mutex<()>]>,
}

impl<S> Clone for AttemptLifecycle<S> {
    fn clone(&self) -> Self {
        AttemptLifecycle {
            store: Arc::clone(&self.store),
            config: self.config,
            locks: Arc::clone(&self.locks),
        }
    }
}

impl<S: GameStore> AttemptLifecycle<S> {
    pub fn new(store: Arc<S>, config: GameConfig) -> Self {
        AttemptLifecycle {
            store,
            config,
            locks: (0..LOCK_STRIPES).map(|_| Mutex::new(())).collect(),
        }
    }

    fn lock(&self, word_id: i64) -> Result<MutexGuard<'_, ()>, StoreError> {
        let stripe = word_id.rem_euclid(self.locks.len() as i64) as usize;
        self.locks[stripe]
            .lock()
            .map_err(|_| StoreError::Backend(String::from("attempt lock poisoned")))
    }

    /// Re-reads the attempt so decisions never rest on a copy loaded before another writer.
    fn reload(&self, attempt: &Attempt) -> Result<Attempt, StoreError> {
        self.store.get_attempt_by_word_id(attempt.word_id)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Returns the attempt for the word, creating an open one if none exists yet.
    ///
    /// If a concurrent caller creates the attempt first, the store's uniqueness constraint
    /// rejects this insert and the winner's attempt is read back instead.
    pub fn get_or_create(&self, word_id: i64) -> Result<Attempt, StoreError> {
        match self.store.get_attempt_by_word_id(word_id) {
            Err(StoreError::NotFound) => {}
            found => return found,
        }
        match self.store.insert_attempt(word_id) {
            Ok(attempt) => {
                debug!(word_id, attempt_id = attempt.id, "created attempt");
                Ok(attempt)
            }
            Err(StoreError::UniqueViolation { .. }) => {
                debug!(word_id, "attempt created concurrently, reading it back");
                self.store.get_attempt_by_word_id(word_id)
            }
            Err(err) => Err(err),
        }
    }

    /// Stores the guess and then the attempt's new flags, in that order.
    ///
    /// The attempt's flags and guess count are re-read from the store while holding the word's
    /// lock, so `attempt` may be stale. A guess offered to an attempt that is closed in the store
    /// is dropped and the stored attempt is returned unchanged.
    pub fn record_guess(
        &self,
        attempt: &Attempt,
        guess: &NewGuess,
        solved: bool,
    ) -> Result<GuessOutcome, StoreError> {
        let _guard = self.lock(attempt.word_id)?;
        let current = self.reload(attempt)?;
        if !current.is_open {
            debug!(attempt_id = current.id, "attempt closed, guess dropped");
            return Ok(GuessOutcome {
                attempt: current,
                guess: None,
            });
        }

        let prior_guesses = self.store.list_guesses_by_attempt_id(current.id)?.len();
        let (is_solved, is_open) = next_flags(prior_guesses, solved, &self.config);
        let stored = self.store.insert_guess(guess)?;
        self.store.update_attempt(current.id, is_solved, is_open)?;

        let updated = Attempt {
            is_solved,
            is_open,
            ..current
        };
        match updated.state() {
            AttemptState::ClosedSolved => {
                info!(attempt_id = updated.id, guesses = prior_guesses + 1, "attempt solved")
            }
            AttemptState::ClosedUnsolved => {
                info!(attempt_id = updated.id, guesses = prior_guesses + 1, "guess limit reached")
            }
            AttemptState::Open => {}
        }
        Ok(GuessOutcome {
            attempt: updated,
            guess: Some(stored),
        })
    }

    /// Closes the attempt without touching `is_solved`. Attempts already closed in the store are
    /// returned as stored.
    pub fn expire(&self, attempt: &Attempt) -> Result<Attempt, StoreError> {
        let _guard = self.lock(attempt.word_id)?;
        let current = self.reload(attempt)?;
        if !current.is_open {
            return Ok(current);
        }
        self.store
            .update_attempt(current.id, current.is_solved, false)?;
        info!(attempt_id = current.id, "attempt expired");
        Ok(Attempt {
            is_open: false,
            ..current
        })
    }
}
