//! Font metrics and font capability
//!
//! Text is measured with the Helvetica / Helvetica-Bold AFM advance widths
//! (units per 1000 em) converted to millimetres at the current point size.
//! When a TrueType font is embedded the same tables are used, scaled by a
//! fixed factor that approximates the wider DejaVu Sans glyphs.

use std::borrow::Cow;
use std::path::PathBuf;

/// Millimetres per PostScript point
pub const MM_PER_PT: f64 = 25.4 / 72.0;

/// Width used for characters without an entry in the tables
const DEFAULT_ADVANCE: u16 = 556;

/// Measures the rendered width of a string, in millimetres
///
/// Implementations must be monotonic: appending characters never makes a
/// string narrower.
pub trait TextMeasure {
    fn text_width(&self, text: &str) -> f64;
}

impl<F> TextMeasure for F
where
    F: Fn(&str) -> f64,
{
    fn text_width(&self, text: &str) -> f64 {
        self(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

/// Font style and size in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub style: FontStyle,
    pub size_pt: f64,
}

impl FontSpec {
    pub const fn regular(size_pt: f64) -> Self {
        Self {
            style: FontStyle::Regular,
            size_pt,
        }
    }

    pub const fn bold(size_pt: f64) -> Self {
        Self {
            style: FontStyle::Bold,
            size_pt,
        }
    }

    /// Font size in millimetres
    pub fn size_mm(&self) -> f64 {
        self.size_pt * MM_PER_PT
    }
}

/// Helvetica metrics for one font spec
#[derive(Debug, Clone, Copy)]
pub struct HelveticaMetrics {
    font: FontSpec,
    scale: f64,
}

impl HelveticaMetrics {
    pub fn new(font: FontSpec) -> Self {
        Self { font, scale: 1.0 }
    }

    /// Multiply every measured width by `scale`
    pub fn scaled(font: FontSpec, scale: f64) -> Self {
        Self { font, scale }
    }
}

impl TextMeasure for HelveticaMetrics {
    fn text_width(&self, text: &str) -> f64 {
        let units: u32 = text
            .chars()
            .map(|ch| u32::from(advance(self.font.style, ch)))
            .sum();
        f64::from(units) / 1000.0 * self.font.size_pt * MM_PER_PT * self.scale
    }
}

/// Advance width of `ch` in 1/1000 em
pub fn advance(style: FontStyle, ch: char) -> u16 {
    let ch = base_letter(ch);
    let table = match style {
        FontStyle::Regular => &HELVETICA,
        FontStyle::Bold => &HELVETICA_BOLD,
    };
    match ch {
        ' '..='~' => table[ch as usize - 0x20],
        '\u{a0}' => table[0],
        '°' => 400,
        'ª' => 370,
        'º' => 365,
        '¡' => table['!' as usize - 0x20],
        '¿' => table['?' as usize - 0x20],
        '«' | '»' => 556,
        _ => DEFAULT_ADVANCE,
    }
}

/// Accented Latin-1 letters are as wide as their base letter
fn base_letter(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ø' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' | 'Ø' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ç' => 'c',
        'Ç' => 'C',
        'ý' | 'ÿ' => 'y',
        'Ý' => 'Y',
        other => other,
    }
}

// Printable ASCII, 0x20 ..= 0x7E
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width factor applied to Helvetica metrics when DejaVu Sans is embedded
const EMBEDDED_WIDTH_FACTOR: f64 = 1.15;

/// How text is rendered in a report, resolved once per report
#[derive(Clone, PartialEq, Eq)]
pub enum FontCapability {
    /// A TrueType font with full Unicode coverage
    Embedded { name: String, bytes: Vec<u8> },
    /// The PDF base-14 Helvetica family; Latin-1 only
    Builtin,
}

impl std::fmt::Debug for FontCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Embedded { name, bytes } => f
                .debug_struct("Embedded")
                .field("name", name)
                .field("bytes", &bytes.len())
                .finish(),
            Self::Builtin => write!(f, "Builtin"),
        }
    }
}

impl FontCapability {
    /// Use the first readable font among `candidates`, else the builtin font
    pub fn resolve(candidates: &[PathBuf]) -> Self {
        for path in candidates {
            match std::fs::read(path) {
                Ok(bytes) if !bytes.is_empty() => {
                    let name = path
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "embedded".to_string());
                    tracing::debug!(font = %path.display(), "Embedding Unicode font");
                    return Self::Embedded { name, bytes };
                }
                Ok(_) => tracing::debug!(font = %path.display(), "Skipping empty font file"),
                Err(_) => continue,
            }
        }
        tracing::debug!("No Unicode font found, using builtin Helvetica");
        Self::Builtin
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, Self::Embedded { .. })
    }

    /// Text as it will be drawn
    pub fn prepare<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self {
            Self::Embedded { .. } => Cow::Borrowed(text),
            Self::Builtin => sanitize_latin1(text),
        }
    }

    /// Metrics for `font` under this capability
    ///
    /// An embedded font is a single face, so bold text is measured as regular.
    pub fn metrics(&self, font: FontSpec) -> HelveticaMetrics {
        match self {
            Self::Embedded { .. } => HelveticaMetrics::scaled(
                FontSpec::regular(font.size_pt),
                EMBEDDED_WIDTH_FACTOR,
            ),
            Self::Builtin => HelveticaMetrics::new(font),
        }
    }
}

/// Map text onto Latin-1 for the builtin font
///
/// Dashes and typographic quotes become their ASCII forms, the ellipsis
/// becomes three dots and anything else outside Latin-1 is dropped.
pub fn sanitize_latin1(text: &str) -> Cow<'_, str> {
    if text.chars().all(|c| (c as u32) <= 0xFF) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{2010}'..='\u{2015}' | '\u{2212}' => out.push('-'),
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => out.push('"'),
            '\u{2026}' => out.push_str("..."),
            '\u{2022}' => out.push('-'),
            c if (c as u32) <= 0xFF => out.push(c),
            _ => {}
        }
    }
    Cow::Owned(out)
}
