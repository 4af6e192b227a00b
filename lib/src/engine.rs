use crate::results::*;

/// Marks an answer letter that has already been claimed by a submitted letter.
const CONSUMED: char = '\0';

fn to_letters(word: &str) -> [char; WORD_LENGTH] {
    let mut letters = [CONSUMED; WORD_LENGTH];
    for (slot, letter) in letters.iter_mut().zip(word.chars()) {
        *slot = letter;
    }
    letters
}

/// Determines the hint for the given `submission` when applied to the given `answer`.
///
/// Exact matches are claimed first, so a letter is only ever credited as many times as it
/// appears in the answer. For example, guessing `lolly` against `alloy` marks the middle `l`
/// exact, the first `l` present, and the fourth `l` absent.
///
/// Both words must be exactly [`WORD_LENGTH`] characters long. Callers are expected to validate
/// submissions first; see [`crate::validate_guess`].
///
/// ```
/// use wordle_game_engine::*;
///
/// let evaluation = evaluate("piano", "amino");
/// assert!(!evaluation.solved);
/// assert_eq!(
///     evaluation.hint.codes(),
///     [
///         HintCode::Present,
///         HintCode::Absent,
///         HintCode::Present,
///         HintCode::Exact,
///         HintCode::Exact,
///     ]
/// );
/// ```
pub fn evaluate(answer: &str, submission: &str) -> Evaluation {
    debug_assert_eq!(answer.chars().count(), WORD_LENGTH, "answer: {answer}");
    debug_assert_eq!(
        submission.chars().count(),
        WORD_LENGTH,
        "submission: {submission}"
    );

    // Scratch copy of the answer; claimed letters are overwritten.
    let mut remaining = to_letters(answer);
    let guessed = to_letters(submission);
    let mut codes = [HintCode::Absent; WORD_LENGTH];

    for (index, letter) in guessed.iter().enumerate() {
        if *letter != CONSUMED && remaining[index] == *letter {
            codes[index] = HintCode::Exact;
            remaining[index] = CONSUMED;
        }
    }

    for (index, letter) in guessed.iter().enumerate() {
        if codes[index] == HintCode::Exact || *letter == CONSUMED {
            continue;
        }
        if let Some(position) = remaining.iter().position(|other| other == letter) {
            codes[index] = HintCode::Present;
            remaining[position] = CONSUMED;
        }
    }

    let mut letters = [LetterHint {
        letter: CONSUMED,
        check: HintCode::Absent,
    }; WORD_LENGTH];
    for ((slot, letter), check) in letters.iter_mut().zip(guessed).zip(codes) {
        *slot = LetterHint { letter, check };
    }

    let hint = Hint(letters);
    Evaluation {
        solved: hint.is_solved(),
        hint,
    }
}
