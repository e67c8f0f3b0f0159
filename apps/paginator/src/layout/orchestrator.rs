//! Pagination orchestrator — drives paint → settle → measure → assign until every
//! unit has a page, then paints and captures each page view.
//!
//! # Loop
//! 1. Strip annotations from a private copy of the model and paint it.
//! 2. For page p = 1, 2, …: wait for the paint to settle, measure the surface,
//!    compute the budget, assign units to p, repaint the annotated model.
//! 3. Stop once nothing is left unassigned or pointing at a page ≥ p.
//! 4. Paint each page view, capture its surface and report its fill.
//!
//! Every measure attempt counts toward `max_iterations`, including attempts that
//! found no measurable surface. Hitting the ceiling is `NonConvergence`.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::{sleep, timeout};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::PaginationSettings;
use crate::errors::PaginationError;
use crate::layout::assigner::assign_page;
use crate::layout::cache::{CacheKey, PaginationCache};
use crate::layout::filter::{continued_sections, paginate_views};
use crate::layout::geometry::{available_height, starting_height, InnerPadding, PageGeometry};
use crate::layout::page_fill::{analyze_page, PageFill, PageFillVerdict};
use crate::layout::probe::{GeometryProbe, Measurements};
use crate::models::annotations::PageAnnotations;
use crate::models::resume::{PageNumber, ResumeContentModel, SectionKind};
use crate::render::{PaintTicket, Renderer, SurfaceNode};

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// One finished page: its content view and the surface captured after painting it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedPage {
    pub page_number: PageNumber,
    pub view: ResumeContentModel,
    /// Sections whose units run on from the previous page.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub continued_sections: Vec<SectionKind>,
    pub surface: Option<SurfaceNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedDocument {
    pub run_id: Uuid,
    /// The input model with every unit annotated.
    pub model: ResumeContentModel,
    pub total_pages: PageNumber,
    pub pages: Vec<RenderedPage>,
    pub fills: Vec<PageFill>,
    /// Measure attempts used; 0 on a cache hit.
    pub iterations: u32,
    pub from_cache: bool,
}

impl PaginatedDocument {
    pub fn annotations(&self) -> PageAnnotations {
        PageAnnotations::extract(&self.model)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Paginator
// ────────────────────────────────────────────────────────────────────────────

/// Doubles a retry delay, saturating at `Duration::MAX`.
fn next_backoff(backoff: Duration) -> Duration {
    backoff.saturating_mul(2)
}

pub struct Paginator {
    settings: PaginationSettings,
    geometry: PageGeometry,
    cache: Option<Arc<PaginationCache>>,
}

impl Paginator {
    pub fn new(settings: PaginationSettings, geometry: PageGeometry) -> Self {
        Self {
            settings,
            geometry,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: Arc<PaginationCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn settings(&self) -> &PaginationSettings {
        &self.settings
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Partitions `model` into pages using `renderer` for measurement.
    ///
    /// The renderer is held exclusively for the whole run. Page numbers already
    /// present on `model` are ignored.
    pub async fn paginate<R>(
        &self,
        renderer: &mut R,
        model: &ResumeContentModel,
    ) -> Result<PaginatedDocument, PaginationError>
    where
        R: Renderer + ?Sized,
    {
        let run_id = Uuid::new_v4();
        let identity = renderer.identity();
        let span = info_span!(
            "paginate",
            %run_id,
            renderer = %identity.name,
            version = %identity.version
        );
        self.run(renderer, model, run_id).instrument(span).await
    }

    async fn run<R>(
        &self,
        renderer: &mut R,
        model: &ResumeContentModel,
        run_id: Uuid,
    ) -> Result<PaginatedDocument, PaginationError>
    where
        R: Renderer + ?Sized,
    {
        let mut working = model.clone();
        working.clear_page_numbers();

        let key = match &self.cache {
            Some(_) => Some(CacheKey::for_content(&working, &renderer.identity())?),
            None => None,
        };

        if let (Some(cache), Some(key)) = (&self.cache, &key) {
            if let Some(hit) = cache.get(key).await {
                hit.annotations.apply(&mut working)?;
                info!(
                    total_pages = hit.annotations.total_pages(),
                    computed_at = %hit.computed_at,
                    "Pagination cache hit"
                );
                return self.finalize(renderer, working, run_id, 0, true).await;
            }
        }

        let iterations = self.assign_all(renderer, &mut working).await?;

        if let (Some(cache), Some(key)) = (&self.cache, key) {
            cache.put(key, PageAnnotations::extract(&working)).await;
        }

        self.finalize(renderer, working, run_id, iterations, false).await
    }

    /// Runs measure-and-assign page by page. Returns the number of measure
    /// attempts used.
    async fn assign_all<R>(
        &self,
        renderer: &mut R,
        working: &mut ResumeContentModel,
    ) -> Result<u32, PaginationError>
    where
        R: Renderer + ?Sized,
    {
        let mut ticket = renderer.paint(working).await?;
        let mut page: PageNumber = 1;
        let mut iterations = 0u32;

        while working.has_content_from(page) {
            if iterations >= self.settings.max_iterations {
                let unassigned = working.pending_from(page);
                warn!(
                    iterations,
                    unassigned,
                    page,
                    "Pagination did not converge"
                );
                return Err(PaginationError::NonConvergence {
                    iterations,
                    unassigned,
                    last_page: page,
                });
            }
            iterations += 1;

            let Some((measurements, padding)) = self.measure_with_retry(renderer, working, ticket).await
            else {
                warn!(page, iteration = iterations, "Surface not measurable, retrying page");
                ticket = renderer.paint(working).await?;
                continue;
            };

            let available = available_height(&self.geometry, &padding);
            let start = starting_height(&self.geometry, &padding);
            let assignment = assign_page(page, available, start, &measurements, working);

            info!(
                page,
                iteration = iterations,
                placed = assignment.frozen.len(),
                deferred = assignment.deferred.len(),
                used_px = assignment.used_height_px(),
                available_px = available,
                "Page assigned"
            );

            ticket = renderer.paint(working).await?;
            page += 1;
        }

        info!(
            total_pages = working.total_pages(),
            iterations,
            "Pagination converged"
        );
        Ok(iterations)
    }

    /// Waits for the paint to settle and measures it, backing off between
    /// attempts. `None` once `measure_retries` extra attempts are exhausted.
    async fn measure_with_retry<R>(
        &self,
        renderer: &R,
        working: &ResumeContentModel,
        ticket: PaintTicket,
    ) -> Option<(Measurements, InnerPadding)>
    where
        R: Renderer + ?Sized,
    {
        let mut backoff = self.settings.retry_backoff;

        for attempt in 0..=self.settings.measure_retries {
            if attempt > 0 {
                debug!(attempt, backoff_ms = backoff.as_millis() as u64, "Retrying measurement");
                sleep(backoff).await;
                backoff = next_backoff(backoff);
            }
            if !self.settle(renderer, ticket).await {
                debug!(ticket = ticket.0, "Paint did not settle in time");
                continue;
            }
            let surface = renderer.surface();
            if let Some(measurements) = GeometryProbe::measure(surface, working) {
                return Some((measurements, GeometryProbe::measure_padding(surface)));
            }
        }
        None
    }

    /// True once the renderer reports the ticket's paint as complete.
    async fn settle<R>(&self, renderer: &R, ticket: PaintTicket) -> bool
    where
        R: Renderer + ?Sized,
    {
        let mut painted = renderer.painted();
        let waited = timeout(
            self.settings.settle_timeout,
            painted.wait_for(|generation| *generation >= ticket.0),
        )
        .await;
        matches!(waited, Ok(Ok(_)))
    }

    /// Paints every page view, captures its surface and reports its fill.
    async fn finalize<R>(
        &self,
        renderer: &mut R,
        working: ResumeContentModel,
        run_id: Uuid,
        iterations: u32,
        from_cache: bool,
    ) -> Result<PaginatedDocument, PaginationError>
    where
        R: Renderer + ?Sized,
    {
        let total_pages = working.total_pages();
        let mut pages = Vec::with_capacity(total_pages as usize);
        let mut fills = Vec::with_capacity(total_pages as usize);

        for (page_number, view) in (1..).zip(paginate_views(&working, total_pages)) {
            let ticket = renderer.paint(&view).await?;
            if !self.settle(renderer, ticket).await {
                warn!(page = page_number, "Page view did not settle before capture");
            }
            let surface = renderer.surface().cloned();

            let padding = GeometryProbe::measure_padding(surface.as_ref());
            let available = available_height(&self.geometry, &padding);
            let used = GeometryProbe::measure(surface.as_ref(), &view)
                .map_or(0.0, |m| m.total_height());
            let fill = analyze_page(page_number, used, available, page_number == total_pages);
            match fill.verdict {
                PageFillVerdict::Overflow => warn!(
                    page = page_number,
                    used_px = used,
                    available_px = available,
                    "Page content exceeds page height"
                ),
                PageFillVerdict::Underfilled => debug!(
                    page = page_number,
                    fill_ratio = fill.fill_ratio,
                    "Page is underfilled"
                ),
                PageFillVerdict::Acceptable => {}
            }

            pages.push(RenderedPage {
                page_number,
                view,
                continued_sections: continued_sections(&working, page_number),
                surface,
            });
            fills.push(fill);
        }

        Ok(PaginatedDocument {
            run_id,
            model: working,
            total_pages,
            pages,
            fills,
            iterations,
            from_cache,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::filter::single_page_view;
    use crate::models::mock::{generate_mock_data, MockDataSize};
    use crate::models::resume::{ExperienceItem, Header, Placed, UnitRef};
    use crate::render::font_metrics::FontFamily;
    use crate::render::metric::{MetricRenderer, MetricTemplate};
    use crate::render::testing::ScriptedRenderer;

    /// 1000px tall page, no margins, so the budget equals the page height.
    fn make_paginator() -> Paginator {
        let geometry = PageGeometry {
            width_px: 800.0,
            height_px: 1000.0,
            top_margin_px: 0.0,
            bottom_margin_px: 0.0,
        };
        Paginator::new(PaginationSettings::default(), geometry)
    }

    fn make_model(experience: &[&str], skills: usize) -> ResumeContentModel {
        ResumeContentModel {
            header: Placed::new(Header {
                name: "Jane Roe".into(),
                ..Header::default()
            }),
            profile: Placed::new("Systems engineer.".to_string()),
            skills: (0..skills).map(|i| Placed::new(format!("skill {i}"))).collect(),
            experience: experience
                .iter()
                .map(|p| {
                    Placed::new(ExperienceItem {
                        position: p.to_string(),
                        ..ExperienceItem::default()
                    })
                })
                .collect(),
            ..ResumeContentModel::default()
        }
    }

    fn assert_complete(doc: &PaginatedDocument, model: &ResumeContentModel) {
        for section in SectionKind::VISIT_ORDER {
            if section.is_page_one_only() {
                continue;
            }
            let total: usize = doc.pages.iter().map(|p| p.view.section_len(section)).sum();
            assert_eq!(total, model.section_len(section), "section {section}");
        }
        assert_eq!(doc.model.unassigned_count(), 0);
    }

    // ── scenarios ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_short_resume_fits_one_page() {
        let model = make_model(&["Engineer"], 0);
        let mut renderer = ScriptedRenderer::new()
            .with_header(200.0, 100.0)
            .with_height("Engineer", 200.0);

        let doc = make_paginator().paginate(&mut renderer, &model).await.unwrap();
        assert_eq!(doc.total_pages, 1);
        assert_eq!(doc.pages.len(), 1);
        assert_eq!(doc.iterations, 1);
        assert_eq!(doc.fills[0].verdict, PageFillVerdict::Acceptable);
    }

    #[tokio::test]
    async fn test_large_items_take_three_pages() {
        let model = make_model(&["A", "B", "C"], 0);
        let mut renderer = ScriptedRenderer::new()
            .with_header(200.0, 100.0)
            .with_height("A", 600.0)
            .with_height("B", 600.0)
            .with_height("C", 600.0);

        let doc = make_paginator().paginate(&mut renderer, &model).await.unwrap();
        assert_eq!(doc.total_pages, 3);
        let pages = doc.model.pages(SectionKind::Experience);
        assert_eq!(pages, vec![Some(1), Some(2), Some(3)]);
        assert_complete(&doc, &model);
    }

    #[tokio::test]
    async fn test_skills_split_across_pages() {
        let model = make_model(&[], 10);
        let mut renderer = ScriptedRenderer::new().with_header(500.0, 300.0);

        let doc = make_paginator().paginate(&mut renderer, &model).await.unwrap();
        assert_eq!(doc.pages[0].view.skills.len(), 4);
        assert_eq!(doc.pages[1].view.skills.len(), 6);
        assert_eq!(doc.total_pages, 2);
    }

    // ── invariants ───────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_header_and_profile_always_on_page_one() {
        let model = make_model(&["A", "B", "C", "D"], 12);
        let mut renderer = ScriptedRenderer::new()
            .with_header(150.0, 150.0)
            .with_default_unit(180.0)
            .with_heading(30.0);

        let doc = make_paginator().paginate(&mut renderer, &model).await.unwrap();
        assert_eq!(doc.model.header.page_number, Some(1));
        assert_eq!(doc.model.profile.page_number, Some(1));
        assert!(doc.pages[1..]
            .iter()
            .all(|p| p.view.header.value.name.is_empty() && p.view.profile.value.is_empty()));
    }

    #[tokio::test]
    async fn test_page_numbers_follow_document_order() {
        let model = make_model(&["A", "B", "C"], 8);
        let mut renderer = ScriptedRenderer::new()
            .with_header(100.0, 100.0)
            .with_default_unit(140.0)
            .with_heading(20.0);

        let doc = make_paginator().paginate(&mut renderer, &model).await.unwrap();
        let pages: Vec<PageNumber> = doc
            .model
            .units()
            .into_iter()
            .filter_map(|(_, p)| p)
            .collect();
        assert!(pages.windows(2).all(|w| w[0] <= w[1]), "pages {pages:?}");
        assert_complete(&doc, &model);
    }

    #[tokio::test]
    async fn test_input_annotations_are_ignored() {
        let mut model = make_model(&["A"], 0);
        model.experience[0].page_number = Some(7);
        let mut renderer = ScriptedRenderer::new().with_header(100.0, 100.0);

        let doc = make_paginator().paginate(&mut renderer, &model).await.unwrap();
        assert_eq!(doc.model.page_of(UnitRef::new(SectionKind::Experience, 0)), Some(1));
        assert_eq!(doc.total_pages, 1);
    }

    #[tokio::test]
    async fn test_oversized_item_reported_as_overflow() {
        let model = make_model(&["Huge", "Small"], 0);
        let mut renderer = ScriptedRenderer::new()
            .with_header(100.0, 100.0)
            .with_height("Huge", 1500.0)
            .with_height("Small", 100.0);

        let doc = make_paginator().paginate(&mut renderer, &model).await.unwrap();
        assert_eq!(doc.total_pages, 3);
        assert_eq!(doc.fills[1].verdict, PageFillVerdict::Overflow);
        assert_eq!(doc.pages[2].view.experience[0].value.position, "Small");
    }

    #[tokio::test]
    async fn test_split_section_marked_continued() {
        let model = make_model(&["A", "B"], 12);
        let mut renderer = ScriptedRenderer::new()
            .with_header(200.0, 100.0)
            .with_heading(20.0)
            .with_default_unit(60.0)
            .with_height("A", 600.0)
            .with_height("B", 600.0);

        let doc = make_paginator().paginate(&mut renderer, &model).await.unwrap();
        // Page 1: header, profile, skills heading + 11 skills. The 12th spills.
        assert_eq!(doc.model.pages(SectionKind::Skills)[11], Some(2));
        assert!(doc.pages[0].continued_sections.is_empty());
        assert_eq!(doc.pages[1].continued_sections, vec![SectionKind::Skills]);
        // Experience starts on page 2 and runs into page 3.
        assert_eq!(doc.pages[2].continued_sections, vec![SectionKind::Experience]);
    }

    // ── renderer padding ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_renderer_padding_shrinks_budget() {
        // Budget 1000 - 50 - 50 = 900, accumulator starts at 50: 50 + 300 + 600 > 900.
        let model = make_model(&["A"], 0);
        let mut renderer = ScriptedRenderer::new()
            .with_header(200.0, 100.0)
            .with_height("A", 600.0)
            .with_padding(50.0, 50.0);

        let doc = make_paginator().paginate(&mut renderer, &model).await.unwrap();
        assert_eq!(doc.total_pages, 2);
    }

    // ── measurement failures ─────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_detached_surface_is_retried() {
        let model = make_model(&["A"], 0);
        let mut renderer = ScriptedRenderer::new().with_header(100.0, 100.0).detached_for(1);

        let doc = make_paginator().paginate(&mut renderer, &model).await.unwrap();
        assert_eq!(doc.total_pages, 1);
        assert_eq!(doc.iterations, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_settling_renderer_does_not_converge() {
        let model = make_model(&["A"], 0);
        let mut renderer = ScriptedRenderer::new().never_settling();
        let settings = PaginationSettings {
            max_iterations: 3,
            settle_timeout: Duration::from_millis(50),
            measure_retries: 1,
            retry_backoff: Duration::from_millis(10),
        };
        let paginator = Paginator::new(settings, PageGeometry::a4());

        let err = paginator.paginate(&mut renderer, &model).await.unwrap_err();
        match err {
            PaginationError::NonConvergence {
                iterations,
                unassigned,
                last_page,
            } => {
                assert_eq!(iterations, 3);
                assert_eq!(unassigned, 3);
                assert_eq!(last_page, 1);
            }
            other => panic!("unexpected error: {other}"),
        }

        // Callers fall back to a single page.
        let fallback = single_page_view(&model);
        assert_eq!(fallback.total_pages(), 1);
    }

    #[test]
    fn test_backoff_doubles_and_saturates() {
        assert_eq!(next_backoff(Duration::from_millis(100)), Duration::from_millis(200));
        assert_eq!(next_backoff(Duration::MAX), Duration::MAX);
        assert_eq!(next_backoff(Duration::MAX / 2 + Duration::from_secs(1)), Duration::MAX);
    }

    #[tokio::test]
    async fn test_paint_failure_propagates() {
        let model = make_model(&["A"], 0);
        let mut renderer = ScriptedRenderer::new().failing();

        let err = make_paginator().paginate(&mut renderer, &model).await.unwrap_err();
        assert!(matches!(err, PaginationError::Render(_)));
    }

    // ── cache ────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_cache_hit_skips_measurement() {
        let cache = Arc::new(PaginationCache::new());
        let paginator = make_paginator().with_cache(cache.clone());
        let model = make_model(&["A", "B", "C"], 0);
        let make_renderer = || {
            ScriptedRenderer::new()
                .with_header(200.0, 100.0)
                .with_default_unit(600.0)
        };

        let mut first = make_renderer();
        let computed = paginator.paginate(&mut first, &model).await.unwrap();
        assert!(!computed.from_cache);
        assert_eq!(cache.len().await, 1);

        let mut second = make_renderer();
        let cached = paginator.paginate(&mut second, &model).await.unwrap();
        assert!(cached.from_cache);
        assert_eq!(cached.iterations, 0);
        assert_eq!(cached.annotations(), computed.annotations());
        // Only the three page views were painted.
        assert_eq!(second.paints.len(), 3);
    }

    #[tokio::test]
    async fn test_new_renderer_version_misses_cache() {
        let cache = Arc::new(PaginationCache::new());
        let paginator = make_paginator().with_cache(cache.clone());
        let model = make_model(&["A"], 0);

        let mut v1 = ScriptedRenderer::new().with_version("1");
        paginator.paginate(&mut v1, &model).await.unwrap();
        let mut v2 = ScriptedRenderer::new().with_version("2");
        let doc = paginator.paginate(&mut v2, &model).await.unwrap();

        assert!(!doc.from_cache);
        assert_eq!(cache.len().await, 2);
    }

    // ── end to end ───────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_metric_renderer_paginates_every_mock_size() {
        let paginator = Paginator::new(PaginationSettings::default(), PageGeometry::a4());
        for size in [
            MockDataSize::Small,
            MockDataSize::Medium,
            MockDataSize::Large,
            MockDataSize::XLarge,
        ] {
            let model = generate_mock_data(size);
            let mut renderer = MetricRenderer::new(MetricTemplate::classic(FontFamily::Inter));
            let doc = paginator.paginate(&mut renderer, &model).await.unwrap();

            assert_complete(&doc, &model);
            assert_eq!(doc.pages.len(), doc.total_pages as usize);
            assert!(doc.pages.iter().all(|p| p.surface.is_some()));
            assert!(doc.iterations <= paginator.settings().max_iterations);
        }
    }

    #[tokio::test]
    async fn test_larger_resume_never_needs_fewer_pages() {
        let paginator = Paginator::new(PaginationSettings::default(), PageGeometry::a4());
        let mut renderer = MetricRenderer::new(MetricTemplate::classic(FontFamily::Inter));

        let small = paginator
            .paginate(&mut renderer, &generate_mock_data(MockDataSize::Small))
            .await
            .unwrap();
        let xlarge = paginator
            .paginate(&mut renderer, &generate_mock_data(MockDataSize::XLarge))
            .await
            .unwrap();
        assert!(xlarge.total_pages > small.total_pages);
        assert!(xlarge.fills.iter().all(|f| f.verdict != PageFillVerdict::Overflow));
    }
}
