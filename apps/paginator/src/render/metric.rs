//! Metric renderer — a reference template that lays out a resume with static font
//! metrics and greedy word wrap, and exposes the result as a [`SurfaceNode`] tree.
//!
//! It follows the same structural conventions real templates use (`.resume` root box,
//! `.section` wrappers with a `.section-title`, `.experience-item` etc.), so the
//! geometry probe locates fragments in it exactly as it would in any other template.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

use crate::errors::RenderError;
use crate::models::resume::{
    EducationItem, ExperienceItem, Header, Placed, ProjectItem, ResumeContentModel,
};
use crate::render::font_metrics::{FontFamily, TextStyle};
use crate::render::surface::SurfaceNode;
use crate::render::{PaintTicket, Renderer, RendererIdentity};

/// Visual parameters of a metric template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricTemplate {
    pub name: String,
    pub version: String,
    pub font: FontFamily,
    pub content_width_px: f32,
    pub padding_top_px: f32,
    pub padding_bottom_px: f32,
    pub body_size_px: f32,
    pub heading_size_px: f32,
    pub name_size_px: f32,
    /// Vertical gap after each item and after each section heading.
    pub item_gap_px: f32,
    pub section_gap_px: f32,
}

impl MetricTemplate {
    /// Single-column template sized for A4 at 96 DPI with 40px side padding.
    pub fn classic(font: FontFamily) -> Self {
        Self {
            name: "classic".to_string(),
            version: "1".to_string(),
            font,
            content_width_px: 714.0,
            padding_top_px: 24.0,
            padding_bottom_px: 24.0,
            body_size_px: 13.0,
            heading_size_px: 16.0,
            name_size_px: 28.0,
            item_gap_px: 8.0,
            section_gap_px: 14.0,
        }
    }

    fn body(&self) -> TextStyle {
        TextStyle::new(self.font, self.body_size_px)
    }

    fn heading(&self) -> TextStyle {
        TextStyle::new(self.font, self.heading_size_px)
    }

    fn name(&self) -> TextStyle {
        TextStyle::new(self.font, self.name_size_px)
    }
}

pub struct MetricRenderer {
    template: MetricTemplate,
    surface: Option<SurfaceNode>,
    mounted: bool,
    generation: u64,
    painted: watch::Sender<u64>,
}

impl MetricRenderer {
    pub fn new(template: MetricTemplate) -> Self {
        let (painted, _) = watch::channel(0);
        Self {
            template,
            surface: None,
            mounted: true,
            generation: 0,
            painted,
        }
    }

    pub fn template(&self) -> &MetricTemplate {
        &self.template
    }

    /// Unmounts the template. The surface is dropped and paints fail with
    /// `RenderError::Detached` until `mount` is called.
    pub fn detach(&mut self) {
        self.surface = None;
        self.mounted = false;
    }

    pub fn mount(&mut self) {
        self.mounted = true;
    }

    fn layout(&self, view: &ResumeContentModel) -> SurfaceNode {
        let t = &self.template;
        let mut body = Vec::new();

        if header_has_content(&view.header.value) {
            body.push(self.header_node(&view.header.value));
        }
        if !view.profile.value.trim().is_empty() {
            let text = self.text_node("p", "profile-text", &view.profile.value);
            body.push(self.section("profile", "PROFILE", vec![text]));
        }
        body.extend(self.entry_section("skills", "SKILLS", "skill-item", &view.skills));
        if !view.experience.is_empty() {
            let items = view.experience.iter().map(|e| self.experience_node(&e.value));
            body.push(self.section("experience", "WORK EXPERIENCE", items.collect()));
        }
        if !view.projects.is_empty() {
            let items = view.projects.iter().map(|p| self.project_node(&p.value));
            body.push(self.section("projects", "PROJECTS", items.collect()));
        }
        if !view.education.is_empty() {
            let items = view.education.iter().map(|e| self.education_node(&e.value));
            body.push(self.section("education", "EDUCATION", items.collect()));
        }
        body.extend(self.entry_section("languages", "LANGUAGES", "language-item", &view.languages));
        body.extend(self.entry_section(
            "achievements",
            "ACHIEVEMENTS",
            "achievement-item",
            &view.achievements,
        ));
        body.extend(self.entry_section(
            "certifications",
            "CERTIFICATIONS",
            "certification-item",
            &view.certifications,
        ));

        let content: f32 = body.iter().map(|n| n.height_px).sum();
        let resume = SurfaceNode::new("div")
            .with_class("resume")
            .with_padding(t.padding_top_px, t.padding_bottom_px)
            .with_height(t.padding_top_px + content + t.padding_bottom_px)
            .with_children(body);

        SurfaceNode::new("#shadow-root").with_child(resume)
    }

    fn text_node(&self, tag: &str, class: &str, text: &str) -> SurfaceNode {
        let height = self
            .template
            .body()
            .block_height_px(text, self.template.content_width_px);
        SurfaceNode::new(tag)
            .with_class(class)
            .with_text(text)
            .with_height(height)
    }

    fn header_node(&self, header: &Header) -> SurfaceNode {
        let t = &self.template;
        let contact = [
            header.contact.phone.as_str(),
            header.contact.email.as_str(),
            header.contact.website.as_str(),
            header.contact.location.as_str(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" | ");

        let name_h = t.name().block_height_px(&header.name, t.content_width_px);
        let children = vec![
            SurfaceNode::new("h1")
                .with_class("name")
                .with_text(header.name.clone())
                .with_height(name_h),
            self.text_node("div", "title", &header.title),
            self.text_node("div", "contact", &contact),
        ];
        let height = children.iter().map(|c| c.height_px).sum::<f32>() + t.section_gap_px;
        SurfaceNode::new("header")
            .with_class("header")
            .with_height(height)
            .with_children(children)
    }

    fn section(&self, key: &str, label: &str, items: Vec<SurfaceNode>) -> SurfaceNode {
        let t = &self.template;
        let title_h = t.heading().line_height_px() + t.item_gap_px;
        let title = SurfaceNode::new("h2")
            .with_class("section-title")
            .with_text(label)
            .with_height(title_h);
        let items_h: f32 = items.iter().map(|n| n.height_px).sum();
        SurfaceNode::new("section")
            .with_class("section")
            .with_class(key)
            .with_height(title_h + items_h + t.section_gap_px)
            .with_child(title)
            .with_children(items)
    }

    fn entry_section(
        &self,
        key: &str,
        label: &str,
        item_class: &str,
        entries: &[Placed<String>],
    ) -> Option<SurfaceNode> {
        if entries.is_empty() {
            return None;
        }
        let items: Vec<SurfaceNode> = entries
            .iter()
            .map(|e| self.text_node("li", item_class, &format!("• {}", e.value)))
            .collect();
        let container_h: f32 = items.iter().map(|n| n.height_px).sum();
        let container = SurfaceNode::new("ul")
            .with_class(format!("{key}-container"))
            .with_height(container_h)
            .with_children(items);
        Some(self.section(key, label, vec![container]))
    }

    fn experience_node(&self, item: &ExperienceItem) -> SurfaceNode {
        let heading = format!("{} — {}", item.position, item.company);
        let dates = format!("{} – {}", item.start_date, item.end_date);
        let mut children = vec![
            self.text_node("div", "position", &heading),
            self.text_node("div", "dates", &dates),
        ];
        children.extend(
            item.description
                .iter()
                .map(|d| self.text_node("li", "bullet", &format!("• {d}"))),
        );
        self.item("experience-item", children)
    }

    fn project_node(&self, item: &ProjectItem) -> SurfaceNode {
        let children = vec![
            self.text_node("div", "project-name", &item.name),
            self.text_node("p", "project-description", &item.description),
        ];
        self.item("project-item", children)
    }

    fn education_node(&self, item: &EducationItem) -> SurfaceNode {
        let dates = format!("{} – {}", item.start_date, item.end_date);
        let children = vec![
            self.text_node("div", "degree", &item.degree),
            self.text_node("div", "institution", &item.institution),
            self.text_node("div", "dates", &dates),
        ];
        self.item("education-item", children)
    }

    fn item(&self, class: &str, children: Vec<SurfaceNode>) -> SurfaceNode {
        let height = children.iter().map(|c| c.height_px).sum::<f32>() + self.template.item_gap_px;
        SurfaceNode::new("div")
            .with_class(class)
            .with_height(height)
            .with_children(children)
    }
}

fn header_has_content(header: &Header) -> bool {
    !(header.name.is_empty()
        && header.title.is_empty()
        && header.contact.phone.is_empty()
        && header.contact.email.is_empty()
        && header.contact.website.is_empty()
        && header.contact.location.is_empty())
}

#[async_trait]
impl Renderer for MetricRenderer {
    fn identity(&self) -> RendererIdentity {
        RendererIdentity::new(
            format!("metric-{}", self.template.name),
            self.template.version.clone(),
        )
    }

    async fn paint(&mut self, view: &ResumeContentModel) -> Result<PaintTicket, RenderError> {
        if !self.mounted {
            return Err(RenderError::Detached);
        }
        let tree = self.layout(view);
        debug!(
            template = %self.template.name,
            height_px = tree.children.first().map_or(0.0, |r| r.height_px),
            "Metric renderer painted view"
        );
        self.surface = Some(tree);
        self.generation += 1;
        self.painted.send_replace(self.generation);
        Ok(PaintTicket(self.generation))
    }

    fn painted(&self) -> watch::Receiver<u64> {
        self.painted.subscribe()
    }

    fn surface(&self) -> Option<&SurfaceNode> {
        self.surface.as_ref()
    }
}
