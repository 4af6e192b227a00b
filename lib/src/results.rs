#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// The number of letters in every answer and every submission.
pub const WORD_LENGTH: usize = 5;

/// The result of a given letter at a specific location.
#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "u8", try_from = "u8"))]
pub enum HintCode {
    /// The letter is not in the answer (or every occurrence was already claimed).
    Absent,
    /// The letter is in the answer, but somewhere else.
    Present,
    /// The letter is in the answer at exactly this location.
    Exact,
}

impl HintCode {
    /// The numeric check code sent to clients: 0, 1, or 2.
    pub fn check(self) -> u8 {
        match self {
            HintCode::Absent => 0,
            HintCode::Present => 1,
            HintCode::Exact => 2,
        }
    }
}

impl From<HintCode> for u8 {
    fn from(code: HintCode) -> u8 {
        code.check()
    }
}

impl TryFrom<u8> for HintCode {
    type Error = String;

    fn try_from(check: u8) -> Result<Self, Self::Error> {
        match check {
            0 => Ok(HintCode::Absent),
            1 => Ok(HintCode::Present),
            2 => Ok(HintCode::Exact),
            other => Err(format!("invalid hint check code {other}")),
        }
    }
}

/// Feedback for a single submitted letter.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LetterHint {
    #[cfg_attr(feature = "serde", serde(rename = "char"))]
    pub letter: char,
    pub check: HintCode,
}

/// The per-letter feedback for one guess, in the same letter order as the guess.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Hint(pub [LetterHint; WORD_LENGTH]);

impl Hint {
    /// Returns `true` iff every letter is an exact match.
    pub fn is_solved(&self) -> bool {
        self.0.iter().all(|lh| lh.check == HintCode::Exact)
    }

    /// The check codes of each letter, in order.
    pub fn codes(&self) -> [HintCode; WORD_LENGTH] {
        self.0.map(|lh| lh.check)
    }

    pub fn letters(&self) -> &[LetterHint] {
        &self.0
    }
}

/// The outcome of evaluating one submission against an answer.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct Evaluation {
    pub solved: bool,
    pub hint: Hint,
}

/// Field name to human-readable message, one entry per violated rule.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` for `field` unless the field already has one.
    pub fn add(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    /// Records `message` for `field` when `ok` is false.
    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Indicates that a persistence operation failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("record not found")]
    NotFound,
    /// A uniqueness constraint rejected the write.
    #[error("duplicate key violates unique constraint \"{constraint}\"")]
    UniqueViolation { constraint: &'static str },
    /// The operation did not complete in time.
    #[error("store operation timed out")]
    Timeout,
    /// Any other failure of the backing store.
    #[error("store failure: {0}")]
    Backend(String),
}

/// Indicates that a game operation could not be completed.
#[derive(Debug, Error)]
pub enum GameError {
    /// The referenced word does not exist.
    #[error("the requested resource could not be found")]
    NotFound,
    /// The submitted guess is malformed.
    #[error("failed validation: {0}")]
    ValidationFailed(ValidationErrors),
    /// The store failed. Displays an opaque message; the cause is kept as the source.
    #[error("the server encountered an unexpected error")]
    Infrastructure(#[source] StoreError),
}

impl From<StoreError> for GameError {
    fn from(err: StoreError) -> Self {
        GameError::Infrastructure(err)
    }
}
