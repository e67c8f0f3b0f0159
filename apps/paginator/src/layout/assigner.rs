//! Page assigner — decides which content units land on a given page.
//!
//! Units are visited in document order (header, profile, skills, experience,
//! projects, education, languages, achievements, certifications) and placed
//! first-fit against the page's height budget:
//!
//! - Header and profile are indivisible and only ever placed on page 1.
//! - Units frozen on an earlier page are never touched again.
//! - The first unit of a section on a page carries the section heading; a heading
//!   that would be stranded without its first unit moves to the next page with it.
//! - Once anything spills, the page is closed: every later candidate is deferred,
//!   so reading pages 1..N reproduces document order.
//! - A unit that does not fit on an otherwise empty page is placed anyway and
//!   reported as overflow, so every pass makes progress.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::layout::probe::Measurements;
use crate::models::resume::{PageNumber, ResumeContentModel, SectionKind, UnitRef};

/// Outcome of one assignment pass over page `page`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageAssignment {
    pub page: PageNumber,
    pub start_height_px: f32,
    /// Accumulator after the last unit placed on this page.
    pub end_height_px: f32,
    pub frozen: Vec<UnitRef>,
    /// Units provisionally moved to `page + 1`.
    pub deferred: Vec<UnitRef>,
    /// Units placed even though they exceed the budget.
    pub overflowed: Vec<UnitRef>,
}

impl PageAssignment {
    pub fn used_height_px(&self) -> f32 {
        self.end_height_px - self.start_height_px
    }
}

/// `current + height ≤ available`.
pub fn fits_on_page(current: f32, height: f32, available: f32) -> bool {
    current + height <= available
}

/// True if a section heading would fit but its first unit would not, leaving the
/// heading alone at the bottom of the page.
pub fn would_be_orphaned(heading: f32, first_unit: f32, current: f32, available: f32) -> bool {
    fits_on_page(current, heading, available) && !fits_on_page(current, heading + first_unit, available)
}

/// Assigns units to `page`, writing page numbers onto `model` in place.
pub fn assign_page(
    page: PageNumber,
    available: f32,
    start: f32,
    measurements: &Measurements,
    model: &mut ResumeContentModel,
) -> PageAssignment {
    let mut out = PageAssignment {
        page,
        start_height_px: start,
        end_height_px: start,
        frozen: Vec::new(),
        deferred: Vec::new(),
        overflowed: Vec::new(),
    };
    let mut closed = false;

    for section in SectionKind::VISIT_ORDER {
        if section.is_page_one_only() {
            if page != 1 {
                continue;
            }
            let unit = UnitRef::new(section, 0);
            let h = measurements.unit_height(unit);
            if !fits_on_page(out.end_height_px, h, available) {
                warn!(
                    section = %section,
                    height_px = h,
                    current_px = out.end_height_px,
                    available_px = available,
                    "Section does not fit page 1, pinning it there anyway"
                );
                out.overflowed.push(unit);
                closed = true;
            }
            model.set_page(unit, 1);
            out.end_height_px += h;
            out.frozen.push(unit);
            continue;
        }

        let heading = measurements.heading_height(section);
        let mut heading_on_page = false;

        for (index, assigned) in model.pages(section).into_iter().enumerate() {
            if assigned.map_or(false, |p| p < page) {
                continue;
            }
            let unit = UnitRef::new(section, index);

            if closed {
                model.set_page(unit, page + 1);
                out.deferred.push(unit);
                continue;
            }

            let h = measurements.unit_height(unit);
            let needed = if heading_on_page { h } else { heading + h };
            let orphaned =
                !heading_on_page && heading > 0.0 && would_be_orphaned(heading, h, out.end_height_px, available);

            if !orphaned && fits_on_page(out.end_height_px, needed, available) {
                model.set_page(unit, page);
                out.end_height_px += needed;
                out.frozen.push(unit);
                heading_on_page = true;
            } else if out.frozen.is_empty() {
                warn!(
                    page,
                    section = %section,
                    index,
                    height_px = needed,
                    available_px = available,
                    "Unit exceeds an empty page, placing it anyway"
                );
                model.set_page(unit, page);
                out.end_height_px += needed;
                out.frozen.push(unit);
                out.overflowed.push(unit);
                heading_on_page = true;
                closed = true;
            } else {
                if orphaned {
                    debug!(page, section = %section, "Heading would be orphaned, moving it with its first unit");
                }
                model.set_page(unit, page + 1);
                out.deferred.push(unit);
                closed = true;
            }
        }
    }

    debug!(
        page,
        frozen = out.frozen.len(),
        deferred = out.deferred.len(),
        end_px = out.end_height_px,
        "Page assignment pass complete"
    );
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
