use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use wordle_game_engine::*;

use HintCode::*;

#[test]
fn evaluate_answer_is_solved() {
    let evaluation = evaluate("crane", "crane");

    assert!(evaluation.solved);
    assert_eq!(evaluation.hint.codes(), [Exact; WORD_LENGTH]);
}

#[test]
fn evaluate_partial() {
    let evaluation = evaluate("piano", "amino");

    assert!(!evaluation.solved);
    assert_eq!(
        evaluation.hint.codes(),
        [Present, Absent, Present, Exact, Exact]
    );
}

#[test]
fn evaluate_none_match() {
    let evaluation = evaluate("crane", "moist");

    assert!(!evaluation.solved);
    assert_eq!(evaluation.hint.codes(), [Absent; WORD_LENGTH]);
}

#[test]
fn evaluate_duplicate_letters_in_both_words() {
    // `speed` has two e's, so both e's of `erase` are credited.
    let evaluation = evaluate("SPEED", "ERASE");

    assert_eq!(
        evaluation.hint.codes(),
        [Present, Absent, Absent, Present, Present]
    );
}

#[test]
fn evaluate_credits_no_more_letters_than_answer_has() {
    let evaluation = evaluate("SPEED", "EERIE");

    assert_eq!(
        evaluation.hint.codes(),
        [Present, Present, Absent, Absent, Absent]
    );

    let evaluation = evaluate("THOSE", "EERIE");

    assert_eq!(
        evaluation.hint.codes(),
        [Absent, Absent, Absent, Absent, Exact]
    );
}

#[test]
fn evaluate_exact_match_takes_precedence() {
    let evaluation = evaluate("ALLOY", "LOLLY");

    assert_eq!(
        evaluation.hint.codes(),
        [Present, Present, Exact, Absent, Exact]
    );
    let credited_ls = evaluation
        .hint
        .letters()
        .iter()
        .filter(|lh| lh.letter == 'L' && lh.check != Absent)
        .count();
    assert_eq!(credited_ls, 2);
}

#[test]
fn evaluate_hint_carries_submitted_letters() {
    let evaluation = evaluate("crane", "trace");

    assert_eq!(
        evaluation.hint.letters(),
        &[
            LetterHint { letter: 't', check: Absent },
            LetterHint { letter: 'r', check: Exact },
            LetterHint { letter: 'a', check: Exact },
            LetterHint { letter: 'c', check: Present },
            LetterHint { letter: 'e', check: Exact },
        ]
    );
}

fn random_word(rng: &mut StdRng) -> String {
    // A small alphabet makes repeated letters common.
    (0..WORD_LENGTH)
        .map(|_| rng.gen_range(b'a'..=b'e') as char)
        .collect()
}

fn count(word: &str, letter: char) -> usize {
    word.chars().filter(|other| *other == letter).count()
}

#[test]
fn evaluate_random_words_properties() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..2000 {
        let answer = random_word(&mut rng);
        let submission = random_word(&mut rng);

        let evaluation = evaluate(&answer, &submission);
        assert_eq!(evaluation, evaluate(&answer, &submission));
        assert_eq!(evaluation.solved, answer == submission);
        assert!(evaluate(&answer, &answer).solved);

        let letters = evaluation.hint.letters();
        for (index, (lh, expected)) in letters.iter().zip(answer.chars()).enumerate() {
            assert_eq!(
                lh.check == Exact,
                lh.letter == expected,
                "{answer} {submission} @{index}"
            );
        }
        for letter in 'a'..='e' {
            let credited = evaluation
                .hint
                .letters()
                .iter()
                .filter(|lh| lh.letter == letter && lh.check != Absent)
                .count();
            assert_eq!(
                credited,
                count(&answer, letter).min(count(&submission, letter)),
                "{answer} {submission} {letter}"
            );
        }
    }
}

#[test]
fn hint_code_check_values() {
    assert_eq!(Absent.check(), 0);
    assert_eq!(Present.check(), 1);
    assert_eq!(Exact.check(), 2);
    assert_eq!(HintCode::try_from(2u8), Ok(Exact));
    assert!(HintCode::try_from(3u8).is_err());
}
