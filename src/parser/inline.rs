//! Inline normalization applied to every non-blank line.
//!
//! Emphasis markers become upper case (the handwritten way of shouting),
//! decorative rules and stray underscores disappear, and every dash variant
//! collapses to a plain hyphen.

/// Normalize the inline markup of a single line.
pub fn normalize_inline(text: &str) -> String {
    let folded = fold_dashes(text);
    let without_rules = remove_rule_runs(&folded);
    let emphasized = strip_emphasis(&without_rules);
    let cleaned: String = emphasized.chars().filter(|&c| c != '_').collect();
    collapse_whitespace(&cleaned)
}

/// Whether the line is nothing but a decorative rule (`---`, `***`, `___`).
pub fn is_rule_line(line: &str) -> bool {
    let marks: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
    marks.len() >= 3
        && matches!(marks[0], '-' | '*' | '_' | '=' | '~')
        && marks.iter().all(|&c| c == marks[0])
}

pub(crate) fn is_dash(c: char) -> bool {
    matches!(
        c,
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}' | '\u{2212}'
    )
}

fn fold_dashes(text: &str) -> String {
    text.chars().map(|c| if is_dash(c) { '-' } else { c }).collect()
}

/// Delete whitespace-delimited tokens made of three or more rule characters.
fn remove_rule_runs(text: &str) -> String {
    text.split(' ')
        .filter(|token| !is_rule_line(token))
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_emphasis(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c != '*' && c != '_' {
            out.push(c);
            i += 1;
            continue;
        }

        let width = if chars.get(i + 1) == Some(&c) { 2 } else { 1 };
        let opens_word = i == 0 || !chars[i - 1].is_alphanumeric();
        if c == '*' || opens_word {
            if let Some(end) = find_closing(&chars, i + width, c, width) {
                let inner: String = chars[i + width..end].iter().collect();
                out.push_str(&strip_emphasis(&inner).to_uppercase());
                i = end + width;
                continue;
            }
        }

        for _ in 0..width {
            out.push(c);
        }
        i += width;
    }

    out
}

/// Find the index of the closing marker run, if the emphasis is well formed.
fn find_closing(chars: &[char], start: usize, marker: char, width: usize) -> Option<usize> {
    if start >= chars.len() || chars[start].is_whitespace() {
        return None;
    }

    let mut j = start + 1;
    while j + width <= chars.len() {
        let is_run = chars[j..j + width].iter().all(|&ch| ch == marker);
        let after = chars.get(j + width).copied();
        let closes_word = marker == '*' || after.map_or(true, |a| !a.is_alphanumeric());
        if is_run && !chars[j - 1].is_whitespace() && after != Some(marker) && closes_word {
            return Some(j);
        }
        j += 1;
    }
    None
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
