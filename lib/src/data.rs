use chrono::{DateTime, Utc};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// A puzzle: the answer players are trying to guess, plus aggregate solve statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Word {
    pub id: i64,
    /// Always lower case and exactly [`crate::WORD_LENGTH`] letters.
    pub answer: String,
    pub solve_count: u32,
    pub solve_time: SolveTime,
}

impl Word {
    pub fn new(id: i64, answer: &str) -> Word {
        Word {
            id,
            answer: answer.to_lowercase(),
            solve_count: 0,
            solve_time: SolveTime::default(),
        }
    }
}

/// The average time taken to solve a word, in milliseconds.
///
/// Displays as e.g. `"1 hours 2 minutes 3 seconds"`, omitting any zero components.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "String", try_from = "String"))]
pub struct SolveTime(pub u64);

impl fmt::Display for SolveTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_seconds = self.0 / 1000;
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        let mut parts = Vec::with_capacity(3);
        if hours > 0 {
            parts.push(format!("{hours} hours"));
        }
        if minutes > 0 {
            parts.push(format!("{minutes} minutes"));
        }
        if seconds > 0 {
            parts.push(format!("{seconds} seconds"));
        }
        f.write_str(&parts.join(" "))
    }
}

impl From<SolveTime> for String {
    fn from(time: SolveTime) -> String {
        time.to_string()
    }
}

impl TryFrom<String> for SolveTime {
    type Error = String;

    /// Parses the display form back into milliseconds, at second precision.
    fn try_from(value: String) -> Result<Self, Self::Error> {
        let mut seconds = 0;
        let mut tokens = value.split_whitespace();
        while let Some(amount) = tokens.next() {
            let amount: u64 = amount
                .parse()
                .map_err(|_| format!("invalid solve time: {value:?}"))?;
            let scale = match tokens.next() {
                Some("hours") => 3600,
                Some("minutes") => 60,
                Some("seconds") => 1,
                _ => return Err(format!("invalid solve time: {value:?}")),
            };
            seconds += amount * scale;
        }
        Ok(SolveTime(seconds * 1000))
    }
}

/// Where an attempt is in its lifecycle. Both closed states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Open,
    ClosedUnsolved,
    ClosedSolved,
}

/// The single record of progress on one word.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Attempt {
    pub id: i64,
    pub word_id: i64,
    pub is_open: bool,
    pub is_solved: bool,
    pub created_at: DateTime<Utc>,
}

impl Attempt {
    pub fn state(&self) -> AttemptState {
        match (self.is_open, self.is_solved) {
            (true, _) => AttemptState::Open,
            (false, true) => AttemptState::ClosedSolved,
            (false, false) => AttemptState::ClosedUnsolved,
        }
    }
}

/// A guess as submitted, before it has been stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGuess {
    pub word_id: i64,
    pub attempt_id: i64,
    pub submission: String,
    /// Client-supplied time of the submission, in epoch milliseconds.
    pub submission_time: i64,
}

/// One stored submission. Never edited once stored.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Guess {
    pub id: i64,
    pub word_id: i64,
    pub attempt_id: i64,
    pub submission: String,
    pub submission_time: i64,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn solve_time_display_omits_zero_components() {
        assert_eq!(SolveTime(0).to_string(), "");
        assert_eq!(SolveTime(999).to_string(), "");
        assert_eq!(SolveTime(42_000).to_string(), "42 seconds");
        assert_eq!(SolveTime(3_600_000).to_string(), "1 hours");
        assert_eq!(SolveTime(3_723_000).to_string(), "1 hours 2 minutes 3 seconds");
        assert_eq!(SolveTime(120_500).to_string(), "2 minutes");
    }

    #[test]
    fn solve_time_parses_display_form() {
        assert_eq!(
            SolveTime::try_from(String::from("1 hours 2 minutes 3 seconds")),
            Ok(SolveTime(3_723_000))
        );
        assert_eq!(SolveTime::try_from(String::new()), Ok(SolveTime(0)));
        assert!(SolveTime::try_from(String::from("soon")).is_err());
        assert!(SolveTime::try_from(String::from("3 fortnights")).is_err());
    }

    #[test]
    fn word_new_lowercases_answer() {
        let word = Word::new(7, "CRANE");

        assert_eq!(word.answer, "crane");
        assert_eq!(word.solve_count, 0);
    }

    #[test]
    fn attempt_state_follows_flags() {
        let mut attempt = Attempt {
            id: 1,
            word_id: 1,
            is_open: true,
            is_solved: false,
            created_at: Utc::now(),
        };
        assert_eq!(attempt.state(), AttemptState::Open);

        attempt.is_open = false;
        assert_eq!(attempt.state(), AttemptState::ClosedUnsolved);

        attempt.is_solved = true;
        assert_eq!(attempt.state(), AttemptState::ClosedSolved);
    }
}
