//! Name normalization and the correctness rule.
//!
//! Equality between a guess and an answer is always decided on the
//! normalized form: lowercase, NFD-decomposed, combining marks stripped,
//! surrounding whitespace trimmed and inner runs collapsed to one space.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

pub fn normalize_name(s: &str) -> String {
    s.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Last whitespace-delimited token of an already normalized name.
pub fn surname(normalized: &str) -> Option<&str> {
    normalized.split_whitespace().last()
}

/// A guess is correct if it names the full target or its surname
/// ("Monet" for "Claude Monet"). Surnames with particles are accepted with
/// or without them: "van gogh" and "gogh" both name "Vincent van Gogh".
pub fn is_correct_guess(target_name: &str, guess: &str) -> bool {
    let target = normalize_name(target_name);
    let guess = normalize_name(guess);
    if guess.is_empty() || target.is_empty() {
        return false;
    }
    if guess == target || surname(&target) == Some(guess.as_str()) {
        return true;
    }
    let target_tokens: Vec<&str> = target.split_whitespace().collect();
    let guess_tokens: Vec<&str> = guess.split_whitespace().collect();
    // Trailing runs of whole tokens; a leading given name never matches.
    guess_tokens.len() < target_tokens.len()
        && target_tokens.ends_with(&guess_tokens)
}

/// Normalized equality for free-text fields such as movement or country.
pub fn same_text(a: &str, b: &str) -> bool {
    normalize_name(a) == normalize_name(b)
}
