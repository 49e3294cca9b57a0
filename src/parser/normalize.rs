//! Typography folding for text that arrives straight from a word processor
//! or a language model. The parser copes without it, but folded text keeps
//! the built-in font's WinAnsi encoding and the dialogue detector happy.

use super::inline::is_dash;

/// Fold smart quotes, dash variants, bullet glyphs, and exotic spaces to ASCII.
pub fn fold_typography(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        fold_line(line, &mut out);
    }
    out
}

fn fold_line(line: &str, out: &mut String) {
    let indent_len = line.len() - line.trim_start().len();
    let (indent, body) = line.split_at(indent_len);
    out.push_str(indent);

    let mut chars = body.chars().peekable();
    if let Some(&first) = chars.peek() {
        if is_bullet(first) {
            chars.next();
            out.push('-');
            if chars.peek().map_or(false, |c| !c.is_whitespace()) {
                out.push(' ');
            }
        }
    }

    for c in chars {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' => out.push('"'),
            '\u{2026}' => out.push_str("..."),
            '\u{00A0}' | '\u{2002}' | '\u{2003}' | '\u{2007}' | '\u{2009}' | '\u{202F}' => {
                out.push(' ')
            }
            '\u{200B}' | '\u{FEFF}' => {}
            c if is_dash(c) => out.push('-'),
            c => out.push(c),
        }
    }
}

fn is_bullet(c: char) -> bool {
    matches!(c, '\u{2022}' | '\u{25E6}' | '\u{25AA}' | '\u{2023}' | '\u{2043}')
}
