//! Static font metrics for the reference renderer.
//!
//! Widths are in em units for ASCII 0x20..=0x7E; index = (char as usize) - 32.
//! One base table (Inter) is stored and the other families are derived from it by a
//! fixed width ratio. Coarse; heights only need to be stable and roughly
//! proportional to text length.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFamily {
    Inter,
    EbGaramond,
    Lato,
    Oswald,
    ComputerModern,
}

impl FontFamily {
    /// Average glyph width relative to Inter.
    fn width_ratio(self) -> f32 {
        match self {
            FontFamily::Inter => 1.0,
            FontFamily::EbGaramond => 0.85,
            FontFamily::Lato => 1.05,
            FontFamily::Oswald => 0.68,
            FontFamily::ComputerModern => 0.90,
        }
    }
}

impl FromStr for FontFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "inter" => Ok(FontFamily::Inter),
            "eb_garamond" | "garamond" => Ok(FontFamily::EbGaramond),
            "lato" => Ok(FontFamily::Lato),
            "oswald" => Ok(FontFamily::Oswald),
            "computer_modern" | "cm" => Ok(FontFamily::ComputerModern),
            other => Err(format!("unknown font family '{other}'")),
        }
    }
}

#[rustfmt::skip]
static BASE_WIDTHS: [f32; 95] = [
    // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
    0.25, 0.30, 0.38, 0.56, 0.56, 0.89, 0.67, 0.22, 0.33, 0.33, 0.39, 0.59, 0.28, 0.33, 0.28, 0.31,
    // 0-9
    0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56,
    // :     ;     <     =     >     ?     @
    0.28, 0.28, 0.59, 0.59, 0.59, 0.50, 1.02,
    // A-M
    0.67, 0.61, 0.61, 0.67, 0.56, 0.50, 0.67, 0.67, 0.25, 0.39, 0.61, 0.53, 0.78,
    // N-Z
    0.67, 0.72, 0.56, 0.72, 0.61, 0.50, 0.56, 0.67, 0.67, 0.89, 0.61, 0.61, 0.56,
    // [     \     ]     ^     _     `
    0.28, 0.31, 0.28, 0.47, 0.56, 0.34,
    // a-m
    0.56, 0.56, 0.50, 0.56, 0.56, 0.31, 0.56, 0.56, 0.22, 0.22, 0.53, 0.22, 0.83,
    // n-z
    0.56, 0.56, 0.56, 0.56, 0.33, 0.44, 0.39, 0.56, 0.50, 0.72, 0.50, 0.50, 0.44,
    // {     |     }     ~
    0.33, 0.26, 0.33, 0.59,
];

/// Fallback for codepoints outside the table.
const BASE_AVERAGE_WIDTH: f32 = 0.52;

/// Font, size and leading used to lay out one kind of text run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font: FontFamily,
    pub font_size_px: f32,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
}

impl TextStyle {
    pub fn new(font: FontFamily, font_size_px: f32) -> Self {
        Self {
            font,
            font_size_px,
            line_height: 1.4,
        }
    }

    pub fn line_height_px(&self) -> f32 {
        self.font_size_px * self.line_height
    }

    /// Rendered width of `s` in pixels.
    pub fn measure_px(&self, s: &str) -> f32 {
        let em: f32 = s
            .chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    BASE_WIDTHS[code - 32]
                } else {
                    BASE_AVERAGE_WIDTH
                }
            })
            .sum();
        em * self.font.width_ratio() * self.font_size_px
    }

    /// Greedy word-wrap line count at `max_width_px`. Empty text takes 0 lines.
    pub fn wrap_lines(&self, text: &str, max_width_px: f32) -> u32 {
        let space = self.measure_px(" ");
        let mut lines = 0u32;
        let mut current = 0.0_f32;

        for word in text.split_whitespace() {
            let w = self.measure_px(word);
            if lines == 0 {
                lines = 1;
                current = w;
            } else if current + space + w > max_width_px {
                lines += 1;
                current = w;
            } else {
                current += space + w;
            }
        }
        lines
    }

    /// Height of `text` wrapped at `max_width_px`.
    pub fn block_height_px(&self, text: &str, max_width_px: f32) -> f32 {
        self.wrap_lines(text, max_width_px) as f32 * self.line_height_px()
    }
}
