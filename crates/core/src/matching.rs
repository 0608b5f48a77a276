//! Guess evaluation for quiz answers.

/// Punctuation stripped from both guess and answer before comparison.
const PUNCTUATION: [char; 21] = [
    '.', ',', '/', '#', '!', '$', '%', '^', '&', '*', ';', ':', '{', '}', '=', '-', '_', '`', '~',
    '(', ')',
];

/// Strip punctuation and lowercase, leaving whitespace intact.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|ch| !PUNCTUATION.contains(ch))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Judge a guess against an answer.
///
/// Both sides are normalized, the answer is split into whitespace tokens, and
/// the guess is correct iff every token appears as a substring of the guess,
/// in any order.
///
/// Matching is containment, not word-anchored: a token hiding inside a longer
/// word still counts ("catomic" matches the token "cat"). That leniency is
/// the shipped behavior and is kept on purpose.
#[must_use]
pub fn guess_matches_answer(guess: &str, answer: &str) -> bool {
    let guess = normalize(guess);
    normalize(answer)
        .split_whitespace()
        .all(|token| guess.contains(token))
}
