// Renderer contract consumed by the pagination engine, plus the reference
// metric-based renderer used by the preview binary and end-to-end tests.

pub mod font_metrics;
pub mod metric;
pub mod surface;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::errors::RenderError;
use crate::models::resume::ResumeContentModel;

pub use metric::MetricRenderer;
pub use surface::SurfaceNode;

/// Identifies a renderer build. Part of the pagination cache key: a new version of
/// the same template invalidates earlier results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RendererIdentity {
    pub name: String,
    pub version: String,
}

impl RendererIdentity {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Paint generation handed out by [`Renderer::paint`]. The paint is complete once
/// the renderer's [`Renderer::painted`] channel reports a generation ≥ this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PaintTicket(pub u64);

/// A visual template that paints a content view into a measurable surface.
///
/// `paint` takes `&mut self`: a pagination run holds the renderer exclusively, so two
/// runs can never interleave paints on the same mount.
#[async_trait]
pub trait Renderer: Send + Sync {
    fn identity(&self) -> RendererIdentity;

    /// Starts painting `view`. Returns the ticket to wait on.
    async fn paint(&mut self, view: &ResumeContentModel) -> Result<PaintTicket, RenderError>;

    /// Completed paint generations.
    fn painted(&self) -> watch::Receiver<u64>;

    /// The painted sub-tree, or `None` while nothing is attached.
    fn surface(&self) -> Option<&SurfaceNode>;
}
