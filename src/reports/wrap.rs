//! Greedy word wrapping against a width metric

use super::metrics::TextMeasure;

/// Wrap `text` into lines no wider than `max_width`
///
/// Words are packed greedily. A word that is wider than a full line on its
/// own is split at the longest prefix that fits, found by binary search, so
/// the measure must be monotonic. A single character wider than `max_width`
/// is still emitted on its own line. Always returns at least one line.
pub fn wrap<M: TextMeasure + ?Sized>(text: &str, max_width: f64, measure: &M) -> Vec<String> {
    let fits = |s: &str| measure.text_width(s) <= max_width;

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() {
            let candidate = format!("{} {}", current, word);
            if fits(&candidate) {
                current = candidate;
                continue;
            }
            lines.push(std::mem::take(&mut current));
        }

        let mut rest = word;
        while !rest.is_empty() && !fits(rest) {
            let cut = longest_fitting_prefix(rest, &fits);
            lines.push(rest[..cut].to_string());
            rest = &rest[cut..];
        }
        current.push_str(rest);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Byte length of the longest prefix of `word` that fits, at least one char
fn longest_fitting_prefix(word: &str, fits: &impl Fn(&str) -> bool) -> usize {
    let boundaries: Vec<usize> = word
        .char_indices()
        .map(|(i, _)| i)
        .skip(1)
        .chain(std::iter::once(word.len()))
        .collect();

    // boundaries[k] is the end of the first k + 1 chars
    let (mut lo, mut hi) = (0usize, boundaries.len());
    while lo < hi {
        let mid = (lo + hi) / 2;
        if fits(&word[..boundaries[mid]]) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    boundaries[lo.saturating_sub(1)]
}
