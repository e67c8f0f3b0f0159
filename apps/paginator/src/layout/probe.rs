//! Geometry probe — reads real pixel heights of named fragments from a render surface.
//!
//! Fragments are located by structural hints: a `.section` wrapper whose
//! `.section-title` text contains a known label, falling back to class-name
//! conventions. A fragment that cannot be found measures 0; a missing surface
//! yields no measurements at all ("not painted yet, retry").

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout::geometry::InnerPadding;
use crate::models::resume::{ResumeContentModel, SectionKind, UnitRef};
use crate::render::surface::SurfaceNode;

/// One measured fragment. Produced fresh on every probe pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasuredBlock {
    pub kind: SectionKind,
    pub index: Option<usize>,
    pub height_px: f32,
}

/// Heights for one section: its heading and each of its units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionMeasurement {
    pub heading_px: f32,
    pub units_px: Vec<f32>,
    /// Unit heights were apportioned evenly from the container height.
    pub estimated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    pub sections: BTreeMap<SectionKind, SectionMeasurement>,
}

impl Measurements {
    pub fn unit_height(&self, unit: UnitRef) -> f32 {
        self.sections
            .get(&unit.section)
            .and_then(|s| s.units_px.get(unit.index))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn heading_height(&self, section: SectionKind) -> f32 {
        self.sections.get(&section).map_or(0.0, |s| s.heading_px)
    }

    /// Sum of every heading and unit height.
    pub fn total_height(&self) -> f32 {
        self.sections
            .values()
            .map(|s| s.heading_px + s.units_px.iter().sum::<f32>())
            .sum()
    }

    /// Flat view of every measured unit, in visitation order.
    pub fn blocks(&self) -> Vec<MeasuredBlock> {
        self.sections
            .iter()
            .flat_map(|(&kind, m)| {
                let indexed = !kind.is_page_one_only();
                m.units_px.iter().enumerate().map(move |(i, &h)| MeasuredBlock {
                    kind,
                    index: indexed.then_some(i),
                    height_px: h,
                })
            })
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Structural hints
// ────────────────────────────────────────────────────────────────────────────

/// Heading labels that identify a section wrapper (matched case-insensitively).
fn section_labels(kind: SectionKind) -> &'static [&'static str] {
    match kind {
        SectionKind::Header => &[],
        SectionKind::Profile => &["PROFILE", "SUMMARY"],
        SectionKind::Skills => &["SKILLS"],
        SectionKind::Experience => &["EXPERIENCE"],
        SectionKind::Projects => &["PROJECTS"],
        SectionKind::Education => &["EDUCATION"],
        SectionKind::Languages => &["LANGUAGES"],
        SectionKind::Achievements => &["ACHIEVEMENTS"],
        SectionKind::Certifications => &["CERTIFICATIONS"],
    }
}

/// Class-name fallbacks for a section container, tried in order.
fn container_classes(kind: SectionKind) -> &'static [&'static str] {
    match kind {
        SectionKind::Header => &["header"],
        SectionKind::Profile => &["profile", "summary"],
        SectionKind::Skills => &["skills-container", "skills-grid", "skills-list", "skill"],
        SectionKind::Experience => &["experience"],
        SectionKind::Projects => &["projects"],
        SectionKind::Education => &["education"],
        SectionKind::Languages => &["languages", "language"],
        SectionKind::Achievements => &["achievements", "achievement"],
        SectionKind::Certifications => &["certifications", "certification"],
    }
}

/// Class carried by each unit of a multi-unit section.
fn item_class(kind: SectionKind) -> Option<&'static str> {
    match kind {
        SectionKind::Header | SectionKind::Profile => None,
        SectionKind::Skills => Some("skill-item"),
        SectionKind::Experience => Some("experience-item"),
        SectionKind::Projects => Some("project-item"),
        SectionKind::Education => Some("education-item"),
        SectionKind::Languages => Some("language-item"),
        SectionKind::Achievements => Some("achievement-item"),
        SectionKind::Certifications => Some("certification-item"),
    }
}

fn titled_section(surface: &SurfaceNode, kind: SectionKind) -> Option<&SurfaceNode> {
    let labels = section_labels(kind);
    if labels.is_empty() {
        return None;
    }
    surface
        .find_all(|n| n.has_class("section"))
        .into_iter()
        .find(|section| {
            section
                .find_first(|n| n.has_class("section-title"))
                .map(|title| {
                    let text = title.text_content().to_uppercase();
                    labels.iter().any(|l| text.contains(l))
                })
                .unwrap_or(false)
        })
}

/// Marker attribute naming the section a container holds, e.g. `data-section="skills"`.
const SECTION_MARKER: &str = "data-section";

fn marked_section(surface: &SurfaceNode, kind: SectionKind) -> Option<&SurfaceNode> {
    surface.find_first(|n| {
        n.attr(SECTION_MARKER)
            .is_some_and(|v| v.eq_ignore_ascii_case(kind.as_str()))
    })
}

/// Section heading classes (`section-title`, `section-header`, …) never name a container.
fn is_heading(node: &SurfaceNode) -> bool {
    node.classes.iter().any(|c| c.starts_with("section-"))
}

/// Container located by class convention. Header and profile need an exact class;
/// other sections also accept a substring match. Nodes carrying the section's own
/// item class are skipped so an item is never mistaken for its container.
fn class_fallback(surface: &SurfaceNode, kind: SectionKind) -> Option<&SurfaceNode> {
    let not_item = |n: &SurfaceNode| item_class(kind).map_or(true, |c| !n.class_contains(c));
    let classes = container_classes(kind);
    let exact = classes
        .iter()
        .find_map(|class| surface.find_first(|n| n.has_class(class) && not_item(n)));
    if exact.is_some() || kind.is_page_one_only() {
        return exact;
    }
    classes.iter().find_map(|class| {
        surface.find_first(|n| n.class_contains(class) && not_item(n) && !is_heading(n))
    })
}

fn locate_section(surface: &SurfaceNode, kind: SectionKind) -> Option<&SurfaceNode> {
    if let Some(marked) = marked_section(surface, kind) {
        return Some(marked);
    }
    if kind == SectionKind::Header {
        return surface
            .find_first(|n| n.tag == "header")
            .or_else(|| class_fallback(surface, kind));
    }
    titled_section(surface, kind).or_else(|| class_fallback(surface, kind))
}

/// Unit nodes inside a located section: exact class match first, then
/// `data-entry` markers, then substring class match.
fn locate_items<'a>(section: &'a SurfaceNode, class: &str) -> Vec<&'a SurfaceNode> {
    let exact = section.find_all(|n| n.has_class(class));
    if !exact.is_empty() {
        return exact;
    }
    let marked = section.find_all(|n| n.has_attr("data-entry"));
    if !marked.is_empty() {
        return marked;
    }
    section.find_all(|n| n.class_contains(class))
}

/// Unit nodes anywhere on the surface when no section wrapper was found. Only the
/// section's own item class counts.
fn locate_loose_items<'a>(surface: &'a SurfaceNode, class: &str) -> Vec<&'a SurfaceNode> {
    let exact = surface.find_all(|n| n.has_class(class));
    if !exact.is_empty() {
        return exact;
    }
    surface.find_all(|n| n.class_contains(class))
}

// ────────────────────────────────────────────────────────────────────────────
// Measurement
// ────────────────────────────────────────────────────────────────────────────

fn measure_single(surface: &SurfaceNode, kind: SectionKind) -> SectionMeasurement {
    let height = match locate_section(surface, kind) {
        Some(node) => node.height_px,
        None => {
            debug!(section = %kind, "Fragment not found, measuring as 0px");
            0.0
        }
    };
    SectionMeasurement {
        heading_px: 0.0,
        units_px: vec![height],
        estimated: false,
    }
}

fn measure_items(
    surface: &SurfaceNode,
    kind: SectionKind,
    class: &str,
    count: usize,
) -> SectionMeasurement {
    if count == 0 {
        return SectionMeasurement::default();
    }

    let section = locate_section(surface, kind);
    let items = match section {
        Some(s) => {
            let found = locate_items(s, class);
            if found.is_empty() && !kind.is_entry_list() {
                s.children
                    .iter()
                    .filter(|c| !c.has_class("section-title"))
                    .collect()
            } else {
                found
            }
        }
        None => locate_loose_items(surface, class),
    };

    if kind.is_entry_list() && items.len() != count {
        // No per-entry geometry: apportion the container evenly across entries.
        let container = section.map_or(0.0, |s| s.height_px);
        if section.is_none() {
            debug!(section = %kind, "Fragment not found, measuring as 0px");
        }
        return SectionMeasurement {
            heading_px: 0.0,
            units_px: vec![container / count as f32; count],
            estimated: true,
        };
    }

    let units_px: Vec<f32> = (0..count)
        .map(|i| items.get(i).map_or(0.0, |n| n.height_px))
        .collect();
    if items.len() < count {
        debug!(
            section = %kind,
            found = items.len(),
            expected = count,
            "Missing items measure as 0px"
        );
    }

    let heading_px = section.map_or(0.0, |s| (s.height_px - units_px.iter().sum::<f32>()).max(0.0));
    SectionMeasurement {
        heading_px,
        units_px,
        estimated: false,
    }
}

/// Reads fragment heights and renderer padding off a painted surface.
pub struct GeometryProbe;

impl GeometryProbe {
    /// Measures every fragment of `model` on `surface`.
    ///
    /// Returns `None` if the surface is not attached yet.
    pub fn measure(
        surface: Option<&SurfaceNode>,
        model: &ResumeContentModel,
    ) -> Option<Measurements> {
        let surface = surface?;
        let mut sections = BTreeMap::new();

        for kind in SectionKind::VISIT_ORDER {
            let measured = match item_class(kind) {
                None => measure_single(surface, kind),
                Some(class) => measure_items(surface, kind, class, model.section_len(kind)),
            };
            sections.insert(kind, measured);
        }

        let units: usize = sections.values().map(|s| s.units_px.len()).sum();
        debug!(units, "Measurement complete");
        Some(Measurements { sections })
    }

    /// Top/bottom padding of the outermost `.resume` box; zero when unavailable.
    pub fn measure_padding(surface: Option<&SurfaceNode>) -> InnerPadding {
        let resume = surface.and_then(|s| s.find_first(|n| n.has_class("resume")));
        match resume {
            Some(node) => InnerPadding {
                top_px: node.padding_top_px,
                bottom_px: node.padding_bottom_px,
            },
            None => {
                debug!("Content box not found, using zero padding");
                InnerPadding::default()
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
