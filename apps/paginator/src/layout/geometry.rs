//! Page geometry and the usable content budget per page.
//!
//! Page size and outer margins are fixed per paper standard. The renderer's inner
//! padding differs per template, so it is measured from a live surface and passed in.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported paper standards, at 96 DPI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStandard {
    A4,
    Letter,
}

impl FromStr for PageStandard {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a4" => Ok(PageStandard::A4),
            "letter" | "us-letter" => Ok(PageStandard::Letter),
            other => Err(format!("unknown page standard '{other}'")),
        }
    }
}

/// Physical page size and outer margins in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width_px: f32,
    pub height_px: f32,
    pub top_margin_px: f32,
    pub bottom_margin_px: f32,
}

impl PageGeometry {
    /// A4 is 210mm × 297mm → 794 × 1123 px.
    pub fn a4() -> Self {
        Self {
            width_px: 794.0,
            height_px: 1123.0,
            top_margin_px: 20.0,
            bottom_margin_px: 30.0,
        }
    }

    /// US Letter is 8.5in × 11in → 816 × 1056 px.
    pub fn letter() -> Self {
        Self {
            width_px: 816.0,
            height_px: 1056.0,
            top_margin_px: 20.0,
            bottom_margin_px: 30.0,
        }
    }
}

impl From<PageStandard> for PageGeometry {
    fn from(standard: PageStandard) -> Self {
        match standard {
            PageStandard::A4 => PageGeometry::a4(),
            PageStandard::Letter => PageGeometry::letter(),
        }
    }
}

/// Inner top/bottom padding a renderer reserves inside its outermost content box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InnerPadding {
    pub top_px: f32,
    pub bottom_px: f32,
}

/// `page height − top margin − bottom margin − renderer top padding − renderer bottom padding`,
/// never negative.
pub fn available_height(geometry: &PageGeometry, padding: &InnerPadding) -> f32 {
    (geometry.height_px
        - geometry.top_margin_px
        - geometry.bottom_margin_px
        - padding.top_px
        - padding.bottom_px)
        .max(0.0)
}

/// Accumulator value every page starts from: top margin plus renderer top padding.
pub fn starting_height(geometry: &PageGeometry, padding: &InnerPadding) -> f32 {
    geometry.top_margin_px + padding.top_px
}
