//! Cell tokenizer: turns loosely formatted roster cells into person tokens

use regex::Regex;
use std::sync::OnceLock;

fn delimiter() -> &'static Regex {
    static DELIMITER: OnceLock<Regex> = OnceLock::new();
    DELIMITER.get_or_init(|| Regex::new(r"[^A-Za-z]+").unwrap())
}

/// Split a raw cell such as `"ST/VB"` or `"RR-LW"` into its alphabetic tokens.
///
/// Any run of non-letters (digits, punctuation, whitespace, `/`, `-`, `,`)
/// acts as a single delimiter. Empty fragments are dropped, so a missing cell
/// or one without letters yields no tokens. Case is preserved.
pub fn tokenize(cell: Option<&str>) -> Vec<String> {
    let Some(cell) = cell else {
        return Vec::new();
    };

    delimiter()
        .split(cell)
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Check whether `person` appears as a whole token in `cell`
pub fn contains_person(cell: Option<&str>, person: &str) -> bool {
    let Some(cell) = cell else {
        return false;
    };
    delimiter()
        .split(cell)
        .any(|fragment| !fragment.is_empty() && fragment == person)
}
