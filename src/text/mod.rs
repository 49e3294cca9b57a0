//! # Text Layout
//!
//! Greedy, metric-driven word wrapping.
//!
//! Words are separated by whitespace and joined with a single space. A word
//! joins the current line only if the measured width of the candidate line
//! stays within bound. A word that is wider than the whole line on its own
//! is cut one character at a time: the head shrinks until head + `-` fits,
//! the hyphenated head becomes a line, and the remainder is tried again.
//! Every cut consumes at least one character, so splitting terminates for
//! any input.
//!
//! The only way to exceed `max_width` is a line narrower than a single
//! glyph, where the glyph is emitted on its own.

/// A line of text after wrapping.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLine {
    pub text: String,
    /// Measured width in points.
    pub width: f64,
}

pub struct TextLayout;

impl Default for TextLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayout {
    pub fn new() -> Self {
        Self
    }

    /// Wrap `text` into lines no wider than `max_width`, measuring every
    /// candidate with `measure`.
    pub fn wrap<F>(&self, text: &str, max_width: f64, measure: F) -> Vec<WrappedLine>
    where
        F: Fn(&str) -> f64,
    {
        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if measure(&candidate) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current = if measure(word) <= max_width {
                word.to_string()
            } else {
                self.break_word(word, max_width, &measure, &mut lines)
            };
        }

        if !current.is_empty() {
            lines.push(current);
        }

        lines
            .into_iter()
            .map(|text| WrappedLine {
                width: measure(&text),
                text,
            })
            .collect()
    }

    /// Emit hyphenated heads of an oversized word into `lines` and return the
    /// tail, which fits (or is a single glyph).
    fn break_word<F>(&self, word: &str, max_width: f64, measure: &F, lines: &mut Vec<String>) -> String
    where
        F: Fn(&str) -> f64,
    {
        let mut rest: Vec<char> = word.chars().collect();

        while rest.len() > 1 && measure(&rest.iter().collect::<String>()) > max_width {
            let mut take = rest.len() - 1;
            let piece = loop {
                let head: String = rest[..take].iter().collect();
                let hyphenated = format!("{}-", head);
                if measure(&hyphenated) <= max_width {
                    break hyphenated;
                }
                if take == 1 {
                    break head;
                }
                take -= 1;
            };
            lines.push(piece);
            rest.drain(..take);
        }

        rest.into_iter().collect()
    }

    /// Number of lines `text` wraps into. Used for lookahead without drawing.
    pub fn count_lines<F>(&self, text: &str, max_width: f64, measure: F) -> usize
    where
        F: Fn(&str) -> f64,
    {
        self.wrap(text, max_width, measure).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::StandardFontMetrics;
    use proptest::prelude::*;

    fn helvetica(size: f64) -> impl Fn(&str) -> f64 {
        move |s: &str| StandardFontMetrics::HELVETICA.measure_string(s, size)
    }

    /// Every character is exactly 1pt wide.
    fn mono(s: &str) -> f64 {
        s.chars().count() as f64
    }

    #[test]
    fn short_sentence_is_one_line() {
        let tl = TextLayout::new();
        let lines = tl.wrap("This is a short sentence.", 200.0, helvetica(12.0));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "This is a short sentence.");
    }

    #[test]
    fn words_move_to_next_line() {
        let tl = TextLayout::new();
        let lines = tl.wrap("aaa bbb ccc", 7.0, mono);
        let texts: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["aaa bbb", "ccc"]);
    }

    #[test]
    fn whitespace_runs_collapse() {
        let tl = TextLayout::new();
        let lines = tl.wrap("  a   b  ", 10.0, mono);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "a b");
    }

    #[test]
    fn oversized_word_is_hyphenated() {
        let tl = TextLayout::new();
        let lines = tl.wrap("abcdefghij", 4.0, mono);
        let texts: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["abc-", "def-", "ghij"]);
    }

    #[test]
    fn tail_of_split_word_shares_a_line() {
        let tl = TextLayout::new();
        let lines = tl.wrap("ok abcdefg hi", 5.0, mono);
        let texts: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["ok", "abcd-", "efg", "hi"]);
    }

    #[test]
    fn degenerate_width_still_terminates() {
        let tl = TextLayout::new();
        let lines = tl.wrap("abc", 0.5, mono);
        let texts: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_text_has_no_lines() {
        let tl = TextLayout::new();
        assert!(tl.wrap("   ", 100.0, mono).is_empty());
        assert_eq!(tl.count_lines("", 100.0, mono), 0);
    }

    proptest! {
        #[test]
        fn prop_lines_never_exceed_width(
            words in prop::collection::vec("[a-zA-Z@W]{1,40}", 1..30),
            size in 8.0f64..24.0,
            factor in 1.5f64..40.0,
        ) {
            let tl = TextLayout::new();
            let text = words.join(" ");
            let width = size * factor;
            for line in tl.wrap(&text, width, helvetica(size)) {
                prop_assert!(line.width <= width + 1e-9, "{:?} is {} wide, limit {}", line.text, line.width, width);
            }
        }

        #[test]
        fn prop_wrapping_loses_no_characters(
            words in prop::collection::vec("[a-z]{1,25}", 1..20),
            factor in 1.5f64..20.0,
        ) {
            let tl = TextLayout::new();
            let text = words.join(" ");
            let rebuilt: String = tl
                .wrap(&text, 12.0 * factor, helvetica(12.0))
                .iter()
                .flat_map(|l| l.text.chars())
                .filter(|c| *c != '-' && *c != ' ')
                .collect();
            prop_assert_eq!(rebuilt, words.concat());
        }
    }
}
