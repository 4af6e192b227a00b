use crate::data::*;
use crate::results::*;
use chrono::Utc;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io::{self, BufRead};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

/// Name of the uniqueness constraint on attempt word ids.
pub const ATTEMPTS_WORD_ID_KEY: &str = "attempts_word_id_key";

/// Durable storage of words, attempts and guesses.
///
/// Implementations must enforce at most one attempt per word id, returning
/// [`StoreError::UniqueViolation`] from [`GameStore::insert_attempt`] when one already exists.
pub trait GameStore: Send + Sync {
    fn get_word(&self, id: i64) -> Result<Word, StoreError>;

    fn get_attempt_by_word_id(&self, word_id: i64) -> Result<Attempt, StoreError>;

    /// Creates a new open, unsolved attempt for the word.
    fn insert_attempt(&self, word_id: i64) -> Result<Attempt, StoreError>;

    fn update_attempt(&self, id: i64, is_solved: bool, is_open: bool) -> Result<(), StoreError>;

    /// Returns the attempt's guesses in submission order.
    fn list_guesses_by_attempt_id(&self, attempt_id: i64) -> Result<Vec<Guess>, StoreError>;

    /// Stores the guess, assigning its id and creation time.
    fn insert_guess(&self, guess: &NewGuess) -> Result<Guess, StoreError>;
}

/// Indicates that a word list could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read word list: {0}")]
    Io(#[from] io::Error),
    /// The answer at the given one-based position of the input (its line, for a reader) is not a
    /// valid answer. Skipped blank entries still count towards the position.
    #[error("line {line}: answer {answer:?} must be {} letters", WORD_LENGTH)]
    InvalidAnswer { line: usize, answer: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Every record held by a [`MemoryStore`], in id order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StoreSnapshot {
    pub words: Vec<Word>,
    pub attempts: Vec<Attempt>,
    pub guesses: Vec<Guess>,
}

#[derive(Debug, Default)]
struct Tables {
    words: BTreeMap<i64, Word>,
    attempts: BTreeMap<i64, Attempt>,
    attempt_ids_by_word_id: HashMap<i64, i64>,
    guesses: BTreeMap<i64, Guess>,
    last_attempt_id: i64,
    last_guess_id: i64,
}

/// A [`GameStore`] held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a store by reading answers from the given reader.
    ///
    /// The reader should provide one answer per line. Blank lines are skipped, and each answer is
    /// trimmed and converted to lower case. Word ids are assigned from 1 in line order.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, LoadError> {
        let store = MemoryStore::new();
        let mut next_id = 1;
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let answer = line.trim();
            if answer.is_empty() {
                continue;
            }
            store.add_answer(next_id, index + 1, answer)?;
            next_id += 1;
        }
        Ok(store)
    }

    /// Constructs a store from the given answers. Empty answers are skipped, and word ids are
    /// assigned from 1 in order.
    pub fn from_iterator<S, I>(answers: I) -> Result<Self, LoadError>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S>,
    {
        let store = MemoryStore::new();
        let mut next_id = 1;
        for (index, answer) in answers.into_iter().enumerate() {
            let answer = answer.as_ref().trim();
            if answer.is_empty() {
                continue;
            }
            store.add_answer(next_id, index + 1, answer)?;
            next_id += 1;
        }
        Ok(store)
    }

    fn add_answer(&self, id: i64, line: usize, answer: &str) -> Result<(), LoadError> {
        if answer.len() != WORD_LENGTH || !answer.bytes().all(|letter| letter.is_ascii_alphabetic()) {
            return Err(LoadError::InvalidAnswer {
                line,
                answer: answer.to_string(),
            });
        }
        self.lock()?.words.insert(id, Word::new(id, answer));
        Ok(())
    }

    /// Restores a store from a snapshot, re-checking the one-attempt-per-word constraint.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self, StoreError> {
        let mut tables = Tables::default();
        for word in snapshot.words {
            tables.words.insert(word.id, word);
        }
        for attempt in snapshot.attempts {
            if tables
                .attempt_ids_by_word_id
                .insert(attempt.word_id, attempt.id)
                .is_some()
            {
                return Err(StoreError::UniqueViolation {
                    constraint: ATTEMPTS_WORD_ID_KEY,
                });
            }
            tables.last_attempt_id = tables.last_attempt_id.max(attempt.id);
            tables.attempts.insert(attempt.id, attempt);
        }
        for guess in snapshot.guesses {
            tables.last_guess_id = tables.last_guess_id.max(guess.id);
            tables.guesses.insert(guess.id, guess);
        }
        Ok(MemoryStore {
            tables: Mutex::new(tables),
        })
    }

    pub fn snapshot(&self) -> Result<StoreSnapshot, StoreError> {
        let tables = self.lock()?;
        Ok(StoreSnapshot {
            words: tables.words.values().cloned().collect(),
            attempts: tables.attempts.values().cloned().collect(),
            guesses: tables.guesses.values().cloned().collect(),
        })
    }

    /// Returns the number of words in the store.
    pub fn num_words(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.words.len())
    }

    /// Returns the number of attempts in the store.
    pub fn num_attempts(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.attempts.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Backend(String::from("store lock poisoned")))
    }
}

impl GameStore for MemoryStore {
    fn get_word(&self, id: i64) -> Result<Word, StoreError> {
        self.lock()?
            .words
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn get_attempt_by_word_id(&self, word_id: i64) -> Result<Attempt, StoreError> {
        let tables = self.lock()?;
        tables
            .attempt_ids_by_word_id
            .get(&word_id)
            .and_then(|id| tables.attempts.get(id))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn insert_attempt(&self, word_id: i64) -> Result<Attempt, StoreError> {
        let mut tables = self.lock()?;
        if tables.attempt_ids_by_word_id.contains_key(&word_id) {
            return Err(StoreError::UniqueViolation {
                constraint: ATTEMPTS_WORD_ID_KEY,
            });
        }
        tables.last_attempt_id += 1;
        let attempt = Attempt {
            id: tables.last_attempt_id,
            word_id,
            is_open: true,
            is_solved: false,
            created_at: Utc::now(),
        };
        tables.attempt_ids_by_word_id.insert(word_id, attempt.id);
        tables.attempts.insert(attempt.id, attempt.clone());
        Ok(attempt)
    }

    fn update_attempt(&self, id: i64, is_solved: bool, is_open: bool) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        let attempt = tables.attempts.get_mut(&id).ok_or(StoreError::NotFound)?;
        attempt.is_solved = is_solved;
        attempt.is_open = is_open;
        Ok(())
    }

    fn list_guesses_by_attempt_id(&self, attempt_id: i64) -> Result<Vec<Guess>, StoreError> {
        Ok(self
            .lock()?
            .guesses
            .values()
            .filter(|guess| guess.attempt_id == attempt_id)
            .cloned()
            .collect())
    }

    fn insert_guess(&self, guess: &NewGuess) -> Result<Guess, StoreError> {
        let mut tables = self.lock()?;
        tables.last_guess_id += 1;
        let stored = Guess {
            id: tables.last_guess_id,
            word_id: guess.word_id,
            attempt_id: guess.attempt_id,
            submission: guess.submission.clone(),
            submission_time: guess.submission_time,
            created_at: Utc::now(),
        };
        tables.guesses.insert(stored.id, stored.clone());
        Ok(stored)
    }
}
