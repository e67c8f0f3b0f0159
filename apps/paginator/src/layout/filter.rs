//! Per-page views of an annotated content model.

use crate::models::resume::{PageNumber, Placed, ResumeContentModel, SectionKind};

fn on_page<T: Clone>(units: &[Placed<T>], page: PageNumber) -> Vec<Placed<T>> {
    units
        .iter()
        .filter(|u| u.page_number == Some(page))
        .cloned()
        .collect()
}

fn page_one_only<T: Clone + Default>(unit: &Placed<T>, page: PageNumber) -> Placed<T> {
    if page == 1 && unit.page_number == Some(1) {
        unit.clone()
    } else {
        Placed::default()
    }
}

/// The subset of `model` assigned to `page`.
///
/// Header and profile appear only on page 1; every other unit appears on the page
/// it is annotated with. Unassigned units appear nowhere.
pub fn filter_for_page(model: &ResumeContentModel, page: PageNumber) -> ResumeContentModel {
    ResumeContentModel {
        header: page_one_only(&model.header, page),
        profile: page_one_only(&model.profile, page),
        skills: on_page(&model.skills, page),
        experience: on_page(&model.experience, page),
        projects: on_page(&model.projects, page),
        education: on_page(&model.education, page),
        languages: on_page(&model.languages, page),
        achievements: on_page(&model.achievements, page),
        certifications: on_page(&model.certifications, page),
    }
}

/// Views for pages `1..=total_pages`, in page order.
pub fn paginate_views(model: &ResumeContentModel, total_pages: PageNumber) -> Vec<ResumeContentModel> {
    (1..=total_pages).map(|p| filter_for_page(model, p)).collect()
}

/// Sections carried over from the previous page: the section's first unit on
/// `page` directly follows one of its units placed on `page - 1`. Renderers use
/// this to repeat or soften the section heading.
pub fn continued_sections(model: &ResumeContentModel, page: PageNumber) -> Vec<SectionKind> {
    if page <= 1 {
        return Vec::new();
    }
    SectionKind::VISIT_ORDER
        .into_iter()
        .filter(|kind| !kind.is_page_one_only())
        .filter(|&kind| {
            let pages = model.pages(kind);
            pages
                .iter()
                .position(|p| *p == Some(page))
                .is_some_and(|i| i > 0 && pages[i - 1] == Some(page - 1))
        })
        .collect()
}

/// Everything on page 1. Used when pagination fails to converge.
pub fn single_page_view(model: &ResumeContentModel) -> ResumeContentModel {
    let mut view = model.clone();
    for section in SectionKind::VISIT_ORDER {
        for slot in view.pages_mut(section) {
            *slot = Some(1);
        }
    }
    view
}
