//! Scripted renderer for engine tests.
//!
//! Heights are looked up by a unit's label (name for the header, position for
//! experience, project name, degree, or the entry text itself), so the same
//! unit measures the same whether it is painted in the full document or in a
//! single page view. Failure modes are switched on per test.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::errors::RenderError;
use crate::layout::geometry::InnerPadding;
use crate::models::resume::{Placed, ResumeContentModel, SectionKind};
use crate::render::surface::SurfaceNode;
use crate::render::{PaintTicket, Renderer, RendererIdentity};

pub(crate) struct ScriptedRenderer {
    heights: HashMap<String, f32>,
    default_unit_px: f32,
    header_px: f32,
    profile_px: f32,
    heading_px: f32,
    padding: InnerPadding,
    version: String,
    /// Paints that leave the surface detached before it starts attaching.
    detached_paints: u32,
    never_settle: bool,
    fail_paint: bool,
    surface: Option<SurfaceNode>,
    generation: u64,
    painted: watch::Sender<u64>,
    pub(crate) paints: Vec<ResumeContentModel>,
}

impl ScriptedRenderer {
    pub(crate) fn new() -> Self {
        let (painted, _) = watch::channel(0);
        Self {
            heights: HashMap::new(),
            default_unit_px: 50.0,
            header_px: 0.0,
            profile_px: 0.0,
            heading_px: 0.0,
            padding: InnerPadding::default(),
            version: "1".to_string(),
            detached_paints: 0,
            never_settle: false,
            fail_paint: false,
            surface: None,
            generation: 0,
            painted,
            paints: Vec::new(),
        }
    }

    pub(crate) fn with_height(mut self, label: &str, height_px: f32) -> Self {
        self.heights.insert(label.to_string(), height_px);
        self
    }

    pub(crate) fn with_default_unit(mut self, height_px: f32) -> Self {
        self.default_unit_px = height_px;
        self
    }

    pub(crate) fn with_header(mut self, header_px: f32, profile_px: f32) -> Self {
        self.header_px = header_px;
        self.profile_px = profile_px;
        self
    }

    pub(crate) fn with_heading(mut self, heading_px: f32) -> Self {
        self.heading_px = heading_px;
        self
    }

    pub(crate) fn with_padding(mut self, top_px: f32, bottom_px: f32) -> Self {
        self.padding = InnerPadding { top_px, bottom_px };
        self
    }

    pub(crate) fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    pub(crate) fn detached_for(mut self, paints: u32) -> Self {
        self.detached_paints = paints;
        self
    }

    pub(crate) fn never_settling(mut self) -> Self {
        self.never_settle = true;
        self
    }

    pub(crate) fn failing(mut self) -> Self {
        self.fail_paint = true;
        self
    }

    fn unit_px(&self, label: &str) -> f32 {
        self.heights
            .get(label)
            .copied()
            .unwrap_or(self.default_unit_px)
    }

    fn section<T>(
        &self,
        kind: SectionKind,
        units: &[Placed<T>],
        label: impl Fn(&T) -> String,
    ) -> Option<SurfaceNode> {
        if units.is_empty() {
            return None;
        }
        let item_class = match kind {
            SectionKind::Skills => "skill-item",
            SectionKind::Experience => "experience-item",
            SectionKind::Projects => "project-item",
            SectionKind::Education => "education-item",
            SectionKind::Languages => "language-item",
            SectionKind::Achievements => "achievement-item",
            SectionKind::Certifications => "certification-item",
            SectionKind::Header | SectionKind::Profile => return None,
        };
        let items: Vec<SurfaceNode> = units
            .iter()
            .map(|u| {
                let text = label(&u.value);
                SurfaceNode::new("div")
                    .with_class(item_class)
                    .with_height(self.unit_px(&text))
                    .with_text(text)
            })
            .collect();
        let height = self.heading_px + items.iter().map(|i| i.height_px).sum::<f32>();
        Some(
            SurfaceNode::new("section")
                .with_class("section")
                .with_height(height)
                .with_child(
                    SurfaceNode::new("h2")
                        .with_class("section-title")
                        .with_text(kind.as_str().to_uppercase())
                        .with_height(self.heading_px),
                )
                .with_children(items),
        )
    }

    fn build(&self, view: &ResumeContentModel) -> SurfaceNode {
        let mut body = Vec::new();
        if !view.header.value.name.is_empty() {
            body.push(SurfaceNode::new("header").with_height(self.header_px));
        }
        if !view.profile.value.is_empty() {
            body.push(
                SurfaceNode::new("section")
                    .with_class("section")
                    .with_height(self.profile_px)
                    .with_child(SurfaceNode::new("h2").with_class("section-title").with_text("PROFILE")),
            );
        }
        let text = |s: &String| s.clone();
        body.extend(self.section(SectionKind::Skills, &view.skills, text));
        body.extend(self.section(SectionKind::Experience, &view.experience, |e| e.position.clone()));
        body.extend(self.section(SectionKind::Projects, &view.projects, |p| p.name.clone()));
        body.extend(self.section(SectionKind::Education, &view.education, |e| e.degree.clone()));
        body.extend(self.section(SectionKind::Languages, &view.languages, text));
        body.extend(self.section(SectionKind::Achievements, &view.achievements, text));
        body.extend(self.section(SectionKind::Certifications, &view.certifications, text));

        let content: f32 = body.iter().map(|n| n.height_px).sum();
        SurfaceNode::new("#shadow-root").with_child(
            SurfaceNode::new("div")
                .with_class("resume")
                .with_padding(self.padding.top_px, self.padding.bottom_px)
                .with_height(self.padding.top_px + content + self.padding.bottom_px)
                .with_children(body),
        )
    }
}

#[async_trait]
impl Renderer for ScriptedRenderer {
    fn identity(&self) -> RendererIdentity {
        RendererIdentity::new("scripted", self.version.clone())
    }

    async fn paint(&mut self, view: &ResumeContentModel) -> Result<PaintTicket, RenderError> {
        if self.fail_paint {
            return Err(RenderError::Paint("scripted failure".to_string()));
        }
        self.paints.push(view.clone());
        self.surface = if self.detached_paints > 0 {
            self.detached_paints -= 1;
            None
        } else {
            Some(self.build(view))
        };
        self.generation += 1;
        if !self.never_settle {
            self.painted.send_replace(self.generation);
        }
        Ok(PaintTicket(self.generation))
    }

    fn painted(&self) -> watch::Receiver<u64> {
        self.painted.subscribe()
    }

    fn surface(&self) -> Option<&SurfaceNode> {
        self.surface.as_ref()
    }
}
