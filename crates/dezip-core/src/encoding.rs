//! Entry-name decoding for archives predating the UTF-8 flag.
//!
//! Modern archives flag their names as UTF-8 and the reader decodes them
//! transparently. Older archives carry names in whatever codepage the
//! packer used, most commonly IBM codepage 437, with no marker at all.

/// Character encoding used to decode archive-internal entry names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NameEncoding {
    /// Honor the entry's UTF-8 flag and fall back to CP437, as the
    /// reader does by default.
    #[default]
    Auto,
    /// Decode raw name bytes as UTF-8, replacing invalid sequences.
    Utf8,
    /// Decode raw name bytes as IBM codepage 437.
    Cp437,
}

impl NameEncoding {
    /// Decodes raw name bytes according to this encoding.
    ///
    /// `default_name` is the reader's own decoding of the same bytes,
    /// used verbatim for [`NameEncoding::Auto`].
    #[must_use]
    pub fn decode(self, raw: &[u8], default_name: &str) -> String {
        match self {
            Self::Auto => default_name.to_string(),
            Self::Utf8 => String::from_utf8_lossy(raw).into_owned(),
            Self::Cp437 => raw.iter().map(|&b| cp437_to_char(b)).collect(),
        }
    }
}

/// Upper half of codepage 437, indexed by `byte - 0x80`.
#[rustfmt::skip]
const CP437_HIGH: [char; 128] = [
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å',
    'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', '¢', '£', '¥', '₧', 'ƒ',
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '⌐', '¬', '½', '¼', '¡', '«', '»',
    '░', '▒', '▓', '│', '┤', '╡', '╢', '╖', '╕', '╣', '║', '╗', '╝', '╜', '╛', '┐',
    '└', '┴', '┬', '├', '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦', '╠', '═', '╬', '╧',
    '╨', '╤', '╥', '╙', '╘', '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐', '▀',
    'α', 'ß', 'Γ', 'π', 'Σ', 'σ', 'µ', 'τ', 'Φ', 'Θ', 'Ω', 'δ', '∞', 'φ', 'ε', '∩',
    '≡', '±', '≥', '≤', '⌠', '⌡', '÷', '≈', '°', '∙', '·', '√', 'ⁿ', '²', '■', '\u{a0}',
];

fn cp437_to_char(byte: u8) -> char {
    if byte < 0x80 {
        byte as char
    } else {
        CP437_HIGH[usize::from(byte - 0x80)]
    }
}
