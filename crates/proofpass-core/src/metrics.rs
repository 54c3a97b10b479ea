//! Font metrics for the PDF base-14 Helvetica family.
//!
//! Both the diagram layout (node sizing) and the PDF paginator (word
//! wrapping) measure text with these tables, so what is measured is exactly
//! what a PDF viewer draws with the built-in Helvetica fonts.
//!
//! Widths are in thousandths of the font size, as listed in the Adobe AFM
//! files. Characters outside printable ASCII fall back to the width of their
//! unaccented base letter, or to [`FALLBACK_WIDTH`].

/// Width used for glyphs without an entry in the tables.
pub const FALLBACK_WIDTH: u16 = 556;

/// Advance widths for Helvetica, code points 32 (space) through 126 (`~`).
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Advance widths for Helvetica-Bold, code points 32 (space) through 126 (`~`).
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    333, 333, 584, 584, 584, 611, 975, // ':'..'@'
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    333, 278, 333, 584, 556, 333, // '['..'`'
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // 'a'..'m'
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // 'n'..'z'
    389, 280, 389, 584, // '{'..'~'
];

/// One of the built-in PDF fonts used by ProofPass documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Font {
    #[default]
    Helvetica,
    HelveticaBold,
}

impl Font {
    /// The PostScript name used as the PDF `BaseFont`.
    pub fn base_font(self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// The CSS `font-weight` matching this font in SVG output.
    pub fn svg_weight(self) -> &'static str {
        match self {
            Self::Helvetica => "normal",
            Self::HelveticaBold => "bold",
        }
    }

    /// Returns the advance width of `ch` in thousandths of the font size.
    pub fn char_width(self, ch: char) -> u16 {
        let table = match self {
            Self::Helvetica => &HELVETICA,
            Self::HelveticaBold => &HELVETICA_BOLD,
        };

        let lookup = |c: char| {
            let code = c as u32;
            (32..=126)
                .contains(&code)
                .then(|| table[(code - 32) as usize])
        };

        lookup(ch)
            .or_else(|| base_letter(ch).and_then(lookup))
            .unwrap_or(match ch {
                '\u{2014}' => 1000, // em dash
                '\u{2013}' => 556,  // en dash
                '\u{2022}' => 350,  // bullet
                _ => FALLBACK_WIDTH,
            })
    }

    /// Measures `text` set at `size` points.
    ///
    /// # Examples
    ///
    /// ```
    /// use proofpass_core::metrics::Font;
    ///
    /// // "a" is 556/1000 em wide in Helvetica.
    /// assert_eq!(Font::Helvetica.text_width("a", 10.0), 5.56);
    /// assert!(Font::HelveticaBold.text_width("Redis", 10.0) > Font::Helvetica.text_width("Redis", 10.0));
    /// ```
    pub fn text_width(self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|ch| u32::from(self.char_width(ch))).sum();
        units as f32 * size / 1000.0
    }
}

/// Maps accented Latin letters used in Spanish text to their base letter.
fn base_letter(ch: char) -> Option<char> {
    let base = match ch {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'Á' | 'À' | 'Ä' | 'Â' => 'A',
        'É' | 'È' | 'Ë' | 'Ê' => 'E',
        'Í' | 'Ì' | 'Ï' | 'Î' => 'I',
        'Ó' | 'Ò' | 'Ö' | 'Ô' => 'O',
        'Ú' | 'Ù' | 'Ü' | 'Û' => 'U',
        'Ñ' => 'N',
        _ => return None,
    };
    Some(base)
}
