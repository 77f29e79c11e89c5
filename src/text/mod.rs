//! Text module — tokenizer-facing helpers
//!
//! Small pure helpers used when assembling tokenizers and slicing
//! documents: affix rule compilation (spaCy-style prefix/suffix/infix
//! alternations) and slice-bound normalization.

use regex::Regex;

/// Convert optional, possibly negative slice bounds into clamped
/// `(start, stop)` indices with `start <= stop <= length`.
///
/// Negative bounds count from the end, so `(-4, -1)` on a document of
/// length 6 becomes `(2, 5)`. Out-of-range bounds clamp instead of
/// failing.
pub fn normalize_slice(length: usize, start: Option<isize>, stop: Option<isize>) -> (usize, usize) {
    let len = length as isize;

    let mut start = start.unwrap_or(0);
    if start < 0 {
        start += len;
    }
    let start = start.clamp(0, len) as usize;

    let mut stop = stop.unwrap_or(len);
    if stop < 0 {
        stop += len;
    }
    let stop = stop.clamp(start as isize, len) as usize;

    (start, stop)
}

// The three affix compilers follow spaCy's rule-list format: each entry is
// a regex fragment, blank entries are skipped, and the fragments are joined
// into one alternation anchored for the affix position.

/// Compile prefix rules into a start-anchored alternation.
///
/// Rule lists from the legacy data format contain a literal `"("` entry;
/// when present every piece is escaped instead of being treated as a
/// pattern.
pub fn compile_prefix_regex(entries: &[&str]) -> Result<Regex, regex::Error> {
    let pieces: Vec<String> = if entries.iter().any(|entry| *entry == "(") {
        entries
            .iter()
            .filter(|entry| !entry.trim().is_empty())
            .map(|entry| format!("^{}", regex::escape(entry)))
            .collect()
    } else {
        entries
            .iter()
            .filter(|entry| !entry.trim().is_empty())
            .map(|entry| format!("^{}", entry))
            .collect()
    };
    Regex::new(&pieces.join("|"))
}

/// Compile suffix rules into an end-anchored alternation.
pub fn compile_suffix_regex(entries: &[&str]) -> Result<Regex, regex::Error> {
    let pieces: Vec<String> = entries
        .iter()
        .filter(|entry| !entry.trim().is_empty())
        .map(|entry| format!("{}$", entry))
        .collect();
    Regex::new(&pieces.join("|"))
}

/// Compile infix rules into an unanchored alternation.
pub fn compile_infix_regex(entries: &[&str]) -> Result<Regex, regex::Error> {
    let pieces: Vec<String> = entries
        .iter()
        .filter(|entry| !entry.trim().is_empty())
        .cloned()
        .map(str::to_string)
        .collect();
    Regex::new(&pieces.join("|"))
}
