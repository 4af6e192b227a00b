use crate::results::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The body of a guess submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(rename_all = "camelCase", deny_unknown_fields)
)]
pub struct GuessRequest {
    #[cfg_attr(feature = "serde", serde(default))]
    pub submission: String,
    /// Client-side time of the submission, in epoch milliseconds.
    #[cfg_attr(feature = "serde", serde(default))]
    pub submission_time: Option<i64>,
}

impl GuessRequest {
    pub fn new(submission: &str, submission_time: i64) -> Self {
        GuessRequest {
            submission: submission.to_string(),
            submission_time: Some(submission_time),
        }
    }
}

/// Checks the shape of a guess, reporting every violated rule rather than just the first.
///
/// Each field carries at most one message, so an empty submission is reported as missing rather
/// than also as the wrong length.
pub fn validate_guess(word_id: i64, request: &GuessRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    errors.check(
        !request.submission.is_empty(),
        "submission",
        "must be provided",
    );
    errors.check(
        request.submission.chars().count() == WORD_LENGTH,
        "submission",
        "must be exactly 5 letters",
    );
    errors.check(
        request
            .submission
            .chars()
            .all(|letter| letter.is_ascii_alphabetic()),
        "submission",
        "must only contain letters",
    );
    errors.check(word_id > 0, "word_id", "must be a positive word id");
    errors.check(
        request.submission_time.map_or(false, |time| time > 0),
        "submission_time",
        "must be provided as a positive timestamp",
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
