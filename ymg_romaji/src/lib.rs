//! Romaji to hiragana transliteration.
//!
//! A single greedy scan over the word: the longest syllable-table match wins,
//! then the moraic nasal, then gemination, and anything else is copied through
//! untouched.

use std::sync::OnceLock;

mod table;

const MORAIC_NASAL: char = 'ん';
const SOKUON: char = 'っ';

/// Longest-match index over the syllable table, bucketed by initial letter.
/// Buckets are sorted longest key first, so the first hit of a linear scan
/// is the longest match.
pub struct SyllableTable {
    buckets: [Vec<(&'static str, &'static str)>; 26],
}

impl SyllableTable {
    fn build() -> Self {
        let mut buckets: [Vec<(&'static str, &'static str)>; 26] =
            std::array::from_fn(|_| Vec::new());
        for &(key, kana) in table::SYLLABLES {
            let ix = (key.as_bytes()[0] - b'a') as usize;
            buckets[ix].push((key, kana));
        }
        for bucket in &mut buckets {
            bucket.sort_by_key(|(key, _)| std::cmp::Reverse(key.len()));
        }
        SyllableTable { buckets }
    }

    /// The shared table, built on first use.
    pub fn global() -> &'static SyllableTable {
        static TABLE: OnceLock<SyllableTable> = OnceLock::new();
        TABLE.get_or_init(SyllableTable::build)
    }

    fn longest_match(&self, rest: &str) -> Option<(&'static str, &'static str)> {
        let first = *rest.as_bytes().first()?;
        if !first.is_ascii_lowercase() {
            return None;
        }
        self.buckets[(first - b'a') as usize]
            .iter()
            .find(|(key, _)| rest.starts_with(key))
            .copied()
    }

    /// Transliterates one word. Every position is resolved by exactly one of
    /// the four rules, so any input string is accepted and the output never
    /// has more characters than the input.
    pub fn transliterate(&self, word: &str) -> String {
        let mut reading = String::with_capacity(word.len());
        let mut rest = word;
        while let Some(c) = rest.chars().next() {
            if let Some((key, kana)) = self.longest_match(rest) {
                reading.push_str(kana);
                rest = &rest[key.len()..];
            } else if c == 'n' && !glues_to_next_syllable(&rest.as_bytes()[1..]) {
                reading.push(MORAIC_NASAL);
                rest = &rest[1..];
            } else if starts_with_double_consonant(rest) {
                // only the first of the pair becomes っ; the second letter is
                // rescanned as the start of the next syllable, so "sshi" is っし
                reading.push(SOKUON);
                rest = &rest[1..];
            } else {
                reading.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
        reading
    }
}

/// Transliterates a romaji word to hiragana using the shared table.
///
/// Characters no rule recognises pass through unchanged, so mixed input like
/// `"kax"` comes back as `"かx"` rather than an error.
pub fn transliterate(word: &str) -> String {
    SyllableTable::global().transliterate(word)
}

fn is_vowel(b: u8) -> bool {
    matches!(b, b'a' | b'i' | b'u' | b'e' | b'o')
}

/// A bare n glues onto the following letters when they spell a syllable the
/// table owns: n plus a vowel, or n plus y plus a vowel. At the end of the
/// word there is nothing to glue to, so a trailing n is the moraic nasal.
fn glues_to_next_syllable(after: &[u8]) -> bool {
    match after {
        [v, ..] if is_vowel(*v) => true,
        [b'y', v, ..] if is_vowel(*v) => true,
        _ => false,
    }
}

fn starts_with_double_consonant(rest: &str) -> bool {
    match rest.as_bytes() {
        [a, b, ..] => a == b && a.is_ascii_alphabetic() && !is_vowel(*a) && *a != b'n',
        _ => false,
    }
}
