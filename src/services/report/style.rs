//! Report Styles
//!
//! Paragraph styles, colors and Helvetica font metrics used by the layout
//! pass. Text is encoded as WinAnsi for the standard Type1 fonts.

/// Standard Type1 fonts available without embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    pub fn base_font(&self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Resource name used in page content streams.
    pub fn resource_name(&self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
        }
    }

    /// Advance width of `c` in thousandths of the font size.
    pub fn glyph_width(&self, c: char) -> u16 {
        let c = fold_accent(c);
        let table = match self {
            Font::Helvetica => &HELVETICA_WIDTHS,
            Font::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        };
        match c as u32 {
            code @ 32..=126 => table[(code - 32) as usize],
            _ => match c {
                '•' => 350,
                '–' | '€' => 556,
                '—' | '…' => 1000,
                '“' | '”' => 333,
                '‘' | '’' => 222,
                '¿' | '¡' => 611,
                '°' => 400,
                _ => 556,
            },
        }
    }

    /// Width of `text` in points at `size`.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| u32::from(self.glyph_width(c))).sum();
        units as f32 * size / 1000.0
    }
}

/// RGB color with components in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
    pub const GREEN: Rgb = Rgb(0.0, 0.5, 0.0);
    pub const RED: Rgb = Rgb(1.0, 0.0, 0.0);

    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Rgb(channel(16), channel(8), channel(0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Paragraph style. Sizes and spacing are in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    pub size: f32,
    pub leading: f32,
    pub space_before: f32,
    pub space_after: f32,
    pub color: Rgb,
    pub align: Align,
    pub left_indent: f32,
}

impl TextStyle {
    /// Cover title.
    pub const TITLE: TextStyle = TextStyle {
        font: Font::HelveticaBold,
        size: 18.0,
        leading: 22.0,
        space_before: 0.0,
        space_after: 12.0,
        color: Rgb(46.0 / 255.0, 64.0 / 255.0, 83.0 / 255.0),
        align: Align::Center,
        left_indent: 0.0,
    };

    /// Plain first-level heading (index title).
    pub const HEADING: TextStyle = TextStyle {
        font: Font::HelveticaBold,
        size: 16.0,
        leading: 20.0,
        space_before: 12.0,
        space_after: 6.0,
        color: Rgb::BLACK,
        align: Align::Left,
        left_indent: 0.0,
    };

    /// Section heading without anomaly.
    pub const HEADING_OK: TextStyle = TextStyle {
        color: Rgb::GREEN,
        ..Self::HEADING
    };

    /// Section heading with anomaly.
    pub const HEADING_ERROR: TextStyle = TextStyle {
        color: Rgb::RED,
        ..Self::HEADING
    };

    pub const BODY: TextStyle = TextStyle {
        font: Font::Helvetica,
        size: 11.0,
        leading: 14.0,
        space_before: 0.0,
        space_after: 4.0,
        color: Rgb::BLACK,
        align: Align::Left,
        left_indent: 0.0,
    };

    /// Table of contents entry.
    pub const TOC_ENTRY: TextStyle = TextStyle {
        font: Font::Helvetica,
        size: 12.0,
        leading: 14.4,
        space_before: 5.0,
        space_after: 0.0,
        color: Rgb::BLACK,
        align: Align::Left,
        left_indent: 20.0,
    };

    /// Running footer.
    pub const FOOTER: TextStyle = TextStyle {
        font: Font::Helvetica,
        size: 9.0,
        leading: 11.0,
        space_before: 0.0,
        space_after: 0.0,
        color: Rgb::BLACK,
        align: Align::Right,
        left_indent: 0.0,
    };

    /// Heading style for a section verdict.
    pub fn section_heading(is_anomalous: bool) -> TextStyle {
        if is_anomalous {
            Self::HEADING_ERROR
        } else {
            Self::HEADING_OK
        }
    }

    pub fn text_width(&self, text: &str) -> f32 {
        self.font.text_width(text, self.size)
    }
}

/// Encode text for a WinAnsiEncoding font. Unmappable characters become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7e | 0xa0..=0xff => c as u32 as u8,
            0x09 => b' ',
            _ => match c {
                '€' => 0x80,
                '‚' => 0x82,
                '„' => 0x84,
                '…' => 0x85,
                '‘' => 0x91,
                '’' => 0x92,
                '“' => 0x93,
                '”' => 0x94,
                '•' => 0x95,
                '–' => 0x96,
                '—' => 0x97,
                '™' => 0x99,
                _ => b'?',
            },
        })
        .collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' => 'A',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => 'O',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'Ñ' => 'N',
        'Ç' => 'C',
        '\t' => ' ',
        other => other,
    }
}

// Widths for ' ' through '~' from the Adobe core font metrics.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];
