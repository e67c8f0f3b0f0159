//! Page fill analysis — how well each finished page uses its height budget.
//!
//! Computed from the painted page views after assignment, so it reflects what the
//! renderer actually produced rather than the assigner's accumulator.

use serde::{Deserialize, Serialize};

use crate::models::resume::PageNumber;

/// Non-final pages filled below this ratio are reported as underfilled.
const UNDERFILL_THRESHOLD: f32 = 0.5;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageFillVerdict {
    Acceptable,
    /// Less than half the budget used on a page that is not the last one.
    Underfilled,
    /// Content taller than the budget, from a unit forced onto an empty page.
    Overflow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageFill {
    pub page_number: PageNumber,
    pub used_px: f32,
    pub available_px: f32,
    pub fill_ratio: f32,
    pub verdict: PageFillVerdict,
}

// ────────────────────────────────────────────────────────────────────────────
// Core functions
// ────────────────────────────────────────────────────────────────────────────

pub fn analyze_page(
    page_number: PageNumber,
    used_px: f32,
    available_px: f32,
    is_last: bool,
) -> PageFill {
    let fill_ratio = if available_px > 0.0 {
        used_px / available_px
    } else {
        0.0
    };

    let verdict = if used_px > available_px {
        PageFillVerdict::Overflow
    } else if !is_last && fill_ratio < UNDERFILL_THRESHOLD {
        PageFillVerdict::Underfilled
    } else {
        PageFillVerdict::Acceptable
    };

    PageFill {
        page_number,
        used_px,
        available_px,
        fill_ratio,
        verdict,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
