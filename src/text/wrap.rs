/// Result of greedy word-wrapping a block of content.
#[derive(Clone, Debug, PartialEq)]
pub struct WrappedText {
    pub lines: Vec<String>,
    /// True when some single word was wider than the box on its own.
    pub has_wide_word: bool,
}

/// Greedy word-wrap over an arbitrary width measure.
///
/// Words accumulate onto the current line while the measured line width stays
/// within `box_width`; the first overflowing word starts a new line. A word
/// that does not fit even alone occupies its own line and is flagged.
/// Explicit `\n` characters are hard breaks.
///
/// The measure is a closure so layout logic stays independent of any font
/// backend; production measurement shapes the candidate line with Parley.
pub fn wrap_greedy(
    content: &str,
    box_width: f32,
    mut measure: impl FnMut(&str) -> f32,
) -> WrappedText {
    let mut lines = Vec::new();
    let mut has_wide_word = false;

    for paragraph in content.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                if measure(word) > box_width {
                    has_wide_word = true;
                }
                current.push_str(word);
                continue;
            }

            let candidate_len = current.len() + 1 + word.len();
            let mut candidate = String::with_capacity(candidate_len);
            candidate.push_str(&current);
            candidate.push(' ');
            candidate.push_str(word);

            if measure(&candidate) <= box_width {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                if measure(word) > box_width {
                    has_wide_word = true;
                }
                current.push_str(word);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    WrappedText {
        lines,
        has_wide_word,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
