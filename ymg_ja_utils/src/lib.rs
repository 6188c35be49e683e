use regex::Regex;

lazy_static::lazy_static! {
    /// Maximal runs of ASCII letters alternating with runs of anything else.
    /// The two alternatives are exhaustive, so the matches tile the input.
    pub static ref SCRIPT_RUN_REGEX: Regex = Regex::new(r"[A-Za-z]+|[^A-Za-z]+").unwrap();
    pub static ref LATIN_WORD_REGEX: Regex = Regex::new(r"^[A-Za-z]+$").unwrap();
}

pub const HIRA_START: char = '\u{3041}';
pub const HIRA_END: char = '\u{309F}';
pub const KATA_START: char = '\u{30A1}';
pub const KATA_END: char = '\u{30FF}';
pub const KATA_SHIFTABLE_START: char = '\u{30A1}';
pub const KATA_SHIFTABLE_END: char = '\u{30F6}';

// The analyzer hands back katakana readings; everything downstream wants
// hiragana. Only the shiftable block moves; ー, ヽ etc stay as they are.
pub fn kata_to_hira(c: char) -> char {
    if KATA_SHIFTABLE_START <= c && c <= KATA_SHIFTABLE_END {
        let z = c as u32 + HIRA_START as u32 - KATA_START as u32;
        char::from_u32(z).unwrap()
    } else {
        c
    }
}

pub fn kata_to_hira_str(s: &str) -> String {
    s.chars().map(kata_to_hira).collect()
}

/// Split text into runs that are either entirely ASCII letters or entirely
/// free of them, in input order. Concatenating the runs yields the input.
pub fn script_runs(text: &str) -> impl Iterator<Item = &str> {
    SCRIPT_RUN_REGEX.find_iter(text).map(|m| m.as_str())
}

#[inline]
pub fn is_latin(word: &str) -> bool {
    LATIN_WORD_REGEX.is_match(word)
}
