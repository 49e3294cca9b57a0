//! Built-in metrics for the standard Helvetica face.
//!
//! The built-in font is never embedded, so the widths come from the Adobe
//! AFM tables rather than from a font file. Widths are in 1/1000 em.

/// Widths for printable ASCII, 0x20..=0x7E.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n..z
    334, 260, 334, 584, // {..~
];

/// Characters encoded as `?` in WinAnsi get its width.
const FALLBACK_WIDTH: u16 = 556;

/// Width table for one of the standard, non-embedded PDF fonts.
#[derive(Debug, Clone, Copy)]
pub struct StandardFontMetrics {
    ascii: &'static [u16; 95],
}

impl StandardFontMetrics {
    pub const HELVETICA: StandardFontMetrics = StandardFontMetrics {
        ascii: &HELVETICA_ASCII,
    };

    fn units(&self, ch: char) -> u16 {
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) {
            return self.ascii[(cp - 0x20) as usize];
        }
        match ch {
            '\u{00A0}' => 278,
            '\u{2018}' | '\u{2019}' => 222,
            '\u{201C}' | '\u{201D}' => 333,
            '\u{2022}' => 350,
            '\u{2013}' => 556,
            '\u{2014}' | '\u{2026}' => 1000,
            'é' | 'è' | 'ê' | 'ë' | 'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 556,
            'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ú' | 'ù' | 'û' | 'ü' | 'ñ' => 556,
            'í' | 'ì' | 'î' | 'ï' => 278,
            'ç' => 500,
            _ => FALLBACK_WIDTH,
        }
    }

    /// Advance width of one character in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        self.units(ch) as f64 / 1000.0 * font_size
    }

    /// Advance width of a string in points.
    pub fn measure_string(&self, text: &str, font_size: f64) -> f64 {
        let units: u32 = text.chars().map(|c| self.units(c) as u32).sum();
        units as f64 / 1000.0 * font_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_matches_afm() {
        let m = StandardFontMetrics::HELVETICA;
        assert!((m.char_width(' ', 12.0) - 3.336).abs() < 0.001);
    }

    #[test]
    fn table_is_aligned() {
        let m = StandardFontMetrics::HELVETICA;
        assert_eq!(m.units('0'), 556);
        assert_eq!(m.units('@'), 1015);
        assert_eq!(m.units('W'), 944);
        assert_eq!(m.units('i'), 222);
        assert_eq!(m.units('~'), 584);
    }

    #[test]
    fn string_width_is_sum_of_chars() {
        let m = StandardFontMetrics::HELVETICA;
        let expected = m.char_width('H', 10.0) + m.char_width('i', 10.0);
        assert!((m.measure_string("Hi", 10.0) - expected).abs() < 1e-9);
    }
}
