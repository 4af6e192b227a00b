#[macro_use]
extern crate assert_matches;

use wordle_game_engine::*;

use std::io::Cursor;
use std::result::Result;

#[test]
fn memory_store_from_reader_succeeds() -> Result<(), LoadError> {
    let mut cursor = Cursor::new(String::from("\n\ncrane\n Slate\n"));

    let store = MemoryStore::from_reader(&mut cursor)?;

    assert_eq!(store.num_words()?, 2);
    assert_eq!(store.get_word(1)?, Word::new(1, "crane"));
    assert_eq!(store.get_word(2)?.answer, "slate");
    Ok(())
}

#[test]
fn memory_store_from_iterator_succeeds() -> Result<(), LoadError> {
    let store = MemoryStore::from_iterator(vec!["", "crane", "Slate "])?;

    assert_eq!(store.num_words()?, 2);
    assert_eq!(store.get_word(2)?.answer, "slate");
    assert_matches!(store.get_word(3), Err(StoreError::NotFound));
    Ok(())
}

#[test]
fn memory_store_from_reader_wrong_length_fails() {
    let mut cursor = Cursor::new(String::from("crane\nslates\n"));

    assert_matches!(
        MemoryStore::from_reader(&mut cursor),
        Err(LoadError::InvalidAnswer { line: 2, .. })
    );
}

#[test]
fn memory_store_from_iterator_non_letters_fails() {
    assert_matches!(
        MemoryStore::from_iterator(vec!["crane", "cr4ne"]),
        Err(LoadError::InvalidAnswer { ref answer, .. }) if answer == "cr4ne"
    );
}

#[test]
fn memory_store_from_iterator_reports_position_of_invalid_answer() {
    assert_matches!(
        MemoryStore::from_iterator(vec!["", "crane", "cr4ne"]),
        Err(LoadError::InvalidAnswer { line: 3, ref answer }) if answer == "cr4ne"
    );
}

#[test]
fn memory_store_starts_without_attempts() -> Result<(), LoadError> {
    let store = MemoryStore::from_iterator(vec!["crane"])?;

    assert_eq!(store.num_attempts()?, 0);
    assert_matches!(store.get_attempt_by_word_id(1), Err(StoreError::NotFound));
    Ok(())
}

#[test]
fn memory_store_snapshot_round_trip() -> Result<(), StoreError> {
    let store = MemoryStore::new();
    let attempt = store.insert_attempt(1)?;
    store.insert_guess(&NewGuess {
        word_id: 1,
        attempt_id: attempt.id,
        submission: String::from("crane"),
        submission_time: 42,
    })?;
    store.update_attempt(attempt.id, true, false)?;

    let snapshot = store.snapshot()?;
    let restored = MemoryStore::from_snapshot(snapshot.clone())?;

    assert_eq!(restored.snapshot()?, snapshot);
    assert_eq!(snapshot.attempts.len(), 1);
    assert!(snapshot.attempts[0].is_solved);
    assert!(!snapshot.attempts[0].is_open);
    Ok(())
}

#[test]
fn memory_store_from_snapshot_duplicate_attempt_fails() -> Result<(), StoreError> {
    let store = MemoryStore::new();
    let attempt = store.insert_attempt(1)?;
    let mut snapshot = store.snapshot()?;
    snapshot.attempts.push(Attempt { id: 2, ..attempt });

    assert_matches!(
        MemoryStore::from_snapshot(snapshot),
        Err(StoreError::UniqueViolation { constraint: ATTEMPTS_WORD_ID_KEY })
    );
    Ok(())
}
