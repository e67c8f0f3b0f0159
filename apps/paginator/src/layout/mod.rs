// Pagination engine: measures a painted resume, assigns every content unit to a
// page and produces one content view per page.
// Runs serially against a single renderer; the renderer is borrowed mutably for the
// whole run.

pub mod assigner;
pub mod cache;
pub mod filter;
pub mod geometry;
pub mod orchestrator;
pub mod page_fill;
pub mod probe;

// Re-export the public API consumed by callers and the preview binary.
pub use cache::{CacheKey, PaginationCache};
pub use filter::{continued_sections, filter_for_page, paginate_views, single_page_view};
pub use geometry::{PageGeometry, PageStandard};
pub use orchestrator::{PaginatedDocument, Paginator, RenderedPage};
pub use page_fill::{PageFill, PageFillVerdict};
pub use probe::GeometryProbe;
