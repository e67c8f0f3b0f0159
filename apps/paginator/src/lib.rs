pub mod config;
pub mod errors;
pub mod layout;
pub mod models;
pub mod render;

pub use errors::{PaginationError, RenderError};
pub use layout::{PaginatedDocument, Paginator};
pub use models::{PageAnnotations, ResumeContentModel};
pub use render::Renderer;
