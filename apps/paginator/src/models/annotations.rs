//! Page annotations, the persistable part of a pagination result.
//!
//! Callers store these against their long-lived resume record and re-apply them on
//! the next load instead of recomputing.

use serde::{Deserialize, Serialize};

use crate::errors::PaginationError;
use crate::models::resume::{PageNumber, ResumeContentModel, SectionKind};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageAnnotations {
    pub header: Option<PageNumber>,
    pub profile: Option<PageNumber>,
    #[serde(default)]
    pub skills: Vec<Option<PageNumber>>,
    #[serde(default)]
    pub experience: Vec<Option<PageNumber>>,
    #[serde(default)]
    pub projects: Vec<Option<PageNumber>>,
    #[serde(default)]
    pub education: Vec<Option<PageNumber>>,
    #[serde(default)]
    pub languages: Vec<Option<PageNumber>>,
    #[serde(default)]
    pub achievements: Vec<Option<PageNumber>>,
    #[serde(default)]
    pub certifications: Vec<Option<PageNumber>>,
}

impl PageAnnotations {
    /// Snapshots every page number on the model.
    pub fn extract(model: &ResumeContentModel) -> Self {
        let single = |section| model.pages(section).first().copied().flatten();
        Self {
            header: single(SectionKind::Header),
            profile: single(SectionKind::Profile),
            skills: model.pages(SectionKind::Skills),
            experience: model.pages(SectionKind::Experience),
            projects: model.pages(SectionKind::Projects),
            education: model.pages(SectionKind::Education),
            languages: model.pages(SectionKind::Languages),
            achievements: model.pages(SectionKind::Achievements),
            certifications: model.pages(SectionKind::Certifications),
        }
    }

    fn section(&self, section: SectionKind) -> Vec<Option<PageNumber>> {
        match section {
            SectionKind::Header => vec![self.header],
            SectionKind::Profile => vec![self.profile],
            SectionKind::Skills => self.skills.clone(),
            SectionKind::Experience => self.experience.clone(),
            SectionKind::Projects => self.projects.clone(),
            SectionKind::Education => self.education.clone(),
            SectionKind::Languages => self.languages.clone(),
            SectionKind::Achievements => self.achievements.clone(),
            SectionKind::Certifications => self.certifications.clone(),
        }
    }

    /// Writes the annotations back onto `model`.
    ///
    /// Every section must have exactly as many entries as the model has units;
    /// on mismatch nothing is written.
    pub fn apply(&self, model: &mut ResumeContentModel) -> Result<(), PaginationError> {
        for section in SectionKind::VISIT_ORDER {
            let expected = model.section_len(section);
            let found = self.section(section).len();
            if expected != found {
                return Err(PaginationError::InvalidAnnotations {
                    section,
                    expected,
                    found,
                });
            }
        }

        for section in SectionKind::VISIT_ORDER {
            for (slot, page) in model
                .pages_mut(section)
                .into_iter()
                .zip(self.section(section))
            {
                *slot = page;
            }
        }
        Ok(())
    }

    /// Highest annotated page, at least 1.
    pub fn total_pages(&self) -> PageNumber {
        SectionKind::VISIT_ORDER
            .iter()
            .flat_map(|&s| self.section(s))
            .flatten()
            .max()
            .unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{Placed, UnitRef};

    fn make_model() -> ResumeContentModel {
        ResumeContentModel {
            skills: vec![Placed::new("Rust".to_string()), Placed::new("SQL".to_string())],
            languages: vec![Placed::new("English".to_string())],
            ..ResumeContentModel::default()
        }
    }

    #[test]
    fn test_extract_then_apply_restores_pages() {
        let mut model = make_model();
        model.set_page(UnitRef::new(SectionKind::Header, 0), 1);
        model.set_page(UnitRef::new(SectionKind::Skills, 1), 2);
        model.set_page(UnitRef::new(SectionKind::Languages, 0), 3);
        let annotations = PageAnnotations::extract(&model);

        let mut fresh = make_model();
        annotations.apply(&mut fresh).unwrap();
        assert_eq!(fresh, model);
        assert_eq!(annotations.total_pages(), 3);
    }

    #[test]
    fn test_apply_rejects_shape_mismatch() {
        let annotations = PageAnnotations {
            skills: vec![Some(1)],
            ..PageAnnotations::default()
        };
        let mut model = make_model();
        let err = annotations.apply(&mut model).unwrap_err();
        assert!(matches!(
            err,
            PaginationError::InvalidAnnotations {
                section: SectionKind::Skills,
                expected: 2,
                found: 1
            }
        ));
        assert!(model.skills.iter().all(|s| s.page_number.is_none()));
    }

    #[test]
    fn test_total_pages_empty_is_one() {
        assert_eq!(PageAnnotations::default().total_pages(), 1);
    }
}
