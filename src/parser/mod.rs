//! # Block Parser
//!
//! Turns raw input lines into an ordered list of [`Block`]s. Classification
//! is per line, in priority order:
//!
//! ```text
//! blank line                 → Blank (only between two rendered lines)
//! decorative rule            → Skip
//! > quote  /  "whole line"   → Dialogue
//! # Title                    → Heading(Title)     not rendered
//! ## / ### <Weekday> ...     → Heading(Day)       text = "Weekday"
//! ## / ### anything else     → Skip
//! #### ...                   → Heading(Minor)     not rendered
//! - / * / + / N. item        → ListItem
//! anything else              → Paragraph
//! ```
//!
//! Every non-blank line runs through [`inline::normalize_inline`] before it
//! is stored.

pub mod inline;
pub mod normalize;

use crate::model::{Block, BlockKind, HeadingLevel};

pub use inline::normalize_inline;
pub use normalize::fold_typography;

const WEEKDAYS: [(&str, &str); 7] = [
    ("monday", "Monday"),
    ("tuesday", "Tuesday"),
    ("wednesday", "Wednesday"),
    ("thursday", "Thursday"),
    ("friday", "Friday"),
    ("saturday", "Saturday"),
    ("sunday", "Sunday"),
];

/// Parse a whole document.
pub fn parse_text(text: &str) -> Vec<Block> {
    let lines: Vec<&str> = text.lines().collect();
    parse(&lines)
}

/// Parse a sequence of lines into blocks.
///
/// Source blank lines survive only as a single `Blank` between two rendered
/// lines; leading, trailing, and repeated blank lines are dropped. Blocks
/// that never render (titles, skipped headings) do not consume a pending
/// blank, so `text / blank / ## Not a day / blank / text` keeps exactly
/// one `Blank` between the two paragraphs.
pub fn parse<S: AsRef<str>>(lines: &[S]) -> Vec<Block> {
    let mut blocks = Vec::with_capacity(lines.len());
    let mut seen_content = false;
    let mut pending_blank = false;

    for line in lines {
        let block = classify(line.as_ref());
        match block.kind {
            BlockKind::Blank => {
                if seen_content {
                    pending_blank = true;
                }
            }
            kind if kind.is_rendered() => {
                if pending_blank {
                    blocks.push(Block::blank());
                    pending_blank = false;
                }
                seen_content = true;
                blocks.push(block);
            }
            _ => blocks.push(block),
        }
    }

    blocks
}

/// Classify one line.
pub fn classify(line: &str) -> Block {
    let raw = line.trim_end_matches(['\r', '\n']);
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Block::new(BlockKind::Blank, "", raw);
    }

    if inline::is_rule_line(trimmed) {
        return Block::new(BlockKind::Skip, "", raw);
    }

    if let Some(text) = dialogue_text(trimmed) {
        return finish(BlockKind::Dialogue, normalize_inline(text), raw);
    }

    if let Some((level, rest)) = heading(trimmed) {
        let kind = match level {
            1 => BlockKind::Heading(HeadingLevel::Title),
            2 | 3 => match leading_weekday(&normalize_inline(rest)) {
                Some(day) => return Block::new(BlockKind::Heading(HeadingLevel::Day), day, raw),
                None => BlockKind::Skip,
            },
            _ => BlockKind::Heading(HeadingLevel::Minor),
        };
        let text = if kind == BlockKind::Skip {
            String::new()
        } else {
            normalize_inline(rest)
        };
        return Block::new(kind, text, raw);
    }

    if let Some(item) = list_item(trimmed) {
        return finish(BlockKind::ListItem, normalize_inline(item), raw);
    }

    finish(BlockKind::Paragraph, normalize_inline(trimmed), raw)
}

/// Drop blocks whose text normalized away to nothing.
fn finish(kind: BlockKind, text: String, raw: &str) -> Block {
    if text.is_empty() {
        Block::new(BlockKind::Skip, text, raw)
    } else {
        Block::new(kind, text, raw)
    }
}

fn dialogue_text(trimmed: &str) -> Option<&str> {
    if let Some(rest) = trimmed.strip_prefix('>') {
        return Some(rest.trim_start_matches('>').trim());
    }

    let mut chars = trimmed.chars();
    let first = chars.next()?;
    let last = chars.next_back()?;
    let quoted = matches!((first, last), ('"', '"') | ('\u{201C}', '\u{201D}'));
    quoted.then_some(trimmed)
}

/// Count leading `#`s; a heading needs whitespace (or nothing) after them.
fn heading(trimmed: &str) -> Option<(usize, &str)> {
    let level = trimmed.chars().take_while(|&c| c == '#').count();
    if level == 0 {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((level, rest.trim()))
}

fn list_item(trimmed: &str) -> Option<&str> {
    let marker_len = if trimmed.starts_with(['-', '*', '+']) {
        1
    } else {
        let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 || trimmed[digits..].chars().next() != Some('.') {
            return None;
        }
        digits + 1
    };

    let rest = &trimmed[marker_len..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let item = rest.trim();
    (!item.is_empty()).then_some(item)
}

/// The capitalized weekday that `text` begins with, if any.
pub fn leading_weekday(text: &str) -> Option<&'static str> {
    let first = text.split_whitespace().next()?;
    let word: String = first
        .chars()
        .filter(|c| c.is_alphabetic())
        .collect::<String>()
        .to_lowercase();
    WEEKDAYS
        .iter()
        .find(|(lower, _)| *lower == word)
        .map(|(_, name)| *name)
}
