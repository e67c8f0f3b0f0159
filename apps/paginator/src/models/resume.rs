//! Resume content model: the document the pagination engine partitions into pages.
//!
//! Every content unit (header, profile, each skill, each experience entry, …) is
//! wrapped in [`Placed`], which carries the unit's own nullable page number. Scalar
//! list entries and structured items share that single representation, so there are
//! no parallel index-aligned page arrays to keep in sync.

use serde::{Deserialize, Serialize};

/// 1-based page number.
pub type PageNumber = u32;

// ────────────────────────────────────────────────────────────────────────────
// Placement wrapper
// ────────────────────────────────────────────────────────────────────────────

/// A content unit together with its page assignment.
///
/// `page_number == None` means the unit has not been considered yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Placed<T> {
    pub value: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<PageNumber>,
}

impl<T> Placed<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            page_number: None,
        }
    }

    pub fn on_page(value: T, page: PageNumber) -> Self {
        Self {
            value,
            page_number: Some(page),
        }
    }

    /// True if the unit is unassigned or provisionally points at `page` or later.
    pub fn is_candidate_for(&self, page: PageNumber) -> bool {
        self.page_number.map_or(true, |p| p >= page)
    }
}

impl<T> From<T> for Placed<T> {
    fn from(value: T) -> Self {
        Placed::new(value)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Section payloads
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub location: String,
}

/// Name, title and contact block. Page 1 only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub contact: Contact,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceItem {
    pub position: String,
    pub company: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub description: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectItem {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationItem {
    pub institution: String,
    pub degree: String,
    pub start_date: String,
    pub end_date: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Section kinds
// ────────────────────────────────────────────────────────────────────────────

/// Logical content sections, in the fixed order the page assigner visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Header,
    Profile,
    Skills,
    Experience,
    Projects,
    Education,
    Languages,
    Achievements,
    Certifications,
}

impl SectionKind {
    pub const VISIT_ORDER: [SectionKind; 9] = [
        SectionKind::Header,
        SectionKind::Profile,
        SectionKind::Skills,
        SectionKind::Experience,
        SectionKind::Projects,
        SectionKind::Education,
        SectionKind::Languages,
        SectionKind::Achievements,
        SectionKind::Certifications,
    ];

    /// Header and profile: indivisible and never placed after page 1.
    pub fn is_page_one_only(self) -> bool {
        matches!(self, SectionKind::Header | SectionKind::Profile)
    }

    /// Short text-entry lists (skills, languages, achievements, certifications).
    pub fn is_entry_list(self) -> bool {
        matches!(
            self,
            SectionKind::Skills
                | SectionKind::Languages
                | SectionKind::Achievements
                | SectionKind::Certifications
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Header => "header",
            SectionKind::Profile => "profile",
            SectionKind::Skills => "skills",
            SectionKind::Experience => "experience",
            SectionKind::Projects => "projects",
            SectionKind::Education => "education",
            SectionKind::Languages => "languages",
            SectionKind::Achievements => "achievements",
            SectionKind::Certifications => "certifications",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address of one content unit: a section plus the unit's index within it.
/// Header and profile always use index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitRef {
    pub section: SectionKind,
    pub index: usize,
}

impl UnitRef {
    pub fn new(section: SectionKind, index: usize) -> Self {
        Self { section, index }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Content model
// ────────────────────────────────────────────────────────────────────────────

/// The resume document handed to the pagination engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeContentModel {
    #[serde(default)]
    pub header: Placed<Header>,
    #[serde(default)]
    pub profile: Placed<String>,
    #[serde(default)]
    pub skills: Vec<Placed<String>>,
    #[serde(default)]
    pub experience: Vec<Placed<ExperienceItem>>,
    #[serde(default)]
    pub projects: Vec<Placed<ProjectItem>>,
    #[serde(default)]
    pub education: Vec<Placed<EducationItem>>,
    #[serde(default)]
    pub languages: Vec<Placed<String>>,
    #[serde(default)]
    pub achievements: Vec<Placed<String>>,
    #[serde(default)]
    pub certifications: Vec<Placed<String>>,
}

impl ResumeContentModel {
    /// Number of units in a section. Header and profile always count as one.
    pub fn section_len(&self, section: SectionKind) -> usize {
        match section {
            SectionKind::Header | SectionKind::Profile => 1,
            SectionKind::Skills => self.skills.len(),
            SectionKind::Experience => self.experience.len(),
            SectionKind::Projects => self.projects.len(),
            SectionKind::Education => self.education.len(),
            SectionKind::Languages => self.languages.len(),
            SectionKind::Achievements => self.achievements.len(),
            SectionKind::Certifications => self.certifications.len(),
        }
    }

    /// Page numbers of a section's units, in index order.
    pub fn pages(&self, section: SectionKind) -> Vec<Option<PageNumber>> {
        fn collect<T>(units: &[Placed<T>]) -> Vec<Option<PageNumber>> {
            units.iter().map(|u| u.page_number).collect()
        }
        match section {
            SectionKind::Header => vec![self.header.page_number],
            SectionKind::Profile => vec![self.profile.page_number],
            SectionKind::Skills => collect(&self.skills),
            SectionKind::Experience => collect(&self.experience),
            SectionKind::Projects => collect(&self.projects),
            SectionKind::Education => collect(&self.education),
            SectionKind::Languages => collect(&self.languages),
            SectionKind::Achievements => collect(&self.achievements),
            SectionKind::Certifications => collect(&self.certifications),
        }
    }

    /// Mutable handles to a section's page-number slots, in index order.
    pub fn pages_mut(&mut self, section: SectionKind) -> Vec<&mut Option<PageNumber>> {
        fn slots<T>(units: &mut [Placed<T>]) -> Vec<&mut Option<PageNumber>> {
            units.iter_mut().map(|u| &mut u.page_number).collect()
        }
        match section {
            SectionKind::Header => vec![&mut self.header.page_number],
            SectionKind::Profile => vec![&mut self.profile.page_number],
            SectionKind::Skills => slots(&mut self.skills),
            SectionKind::Experience => slots(&mut self.experience),
            SectionKind::Projects => slots(&mut self.projects),
            SectionKind::Education => slots(&mut self.education),
            SectionKind::Languages => slots(&mut self.languages),
            SectionKind::Achievements => slots(&mut self.achievements),
            SectionKind::Certifications => slots(&mut self.certifications),
        }
    }

    pub fn page_of(&self, unit: UnitRef) -> Option<PageNumber> {
        self.pages(unit.section).get(unit.index).copied().flatten()
    }

    /// Writes a page number onto one unit. Out-of-range addresses are ignored.
    pub fn set_page(&mut self, unit: UnitRef, page: PageNumber) {
        if let Some(slot) = self.pages_mut(unit.section).into_iter().nth(unit.index) {
            *slot = Some(page);
        }
    }

    /// Every unit with its page number, in visitation order.
    pub fn units(&self) -> Vec<(UnitRef, Option<PageNumber>)> {
        SectionKind::VISIT_ORDER
            .iter()
            .flat_map(|&section| {
                self.pages(section)
                    .into_iter()
                    .enumerate()
                    .map(move |(index, page)| (UnitRef::new(section, index), page))
            })
            .collect()
    }

    /// Strips all page annotations so pagination can start from a clean slate.
    pub fn clear_page_numbers(&mut self) {
        for section in SectionKind::VISIT_ORDER {
            for slot in self.pages_mut(section) {
                *slot = None;
            }
        }
    }

    /// Units that are unassigned or still point at `page` or later.
    pub fn pending_from(&self, page: PageNumber) -> usize {
        self.units()
            .iter()
            .filter(|(_, p)| p.map_or(true, |p| p >= page))
            .count()
    }

    pub fn has_content_from(&self, page: PageNumber) -> bool {
        self.pending_from(page) > 0
    }

    /// Highest assigned page, at least 1.
    pub fn total_pages(&self) -> PageNumber {
        self.units()
            .iter()
            .filter_map(|(_, p)| *p)
            .max()
            .unwrap_or(1)
            .max(1)
    }

    /// Units that still have no page.
    pub fn unassigned_count(&self) -> usize {
        self.units().iter().filter(|(_, p)| p.is_none()).count()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
