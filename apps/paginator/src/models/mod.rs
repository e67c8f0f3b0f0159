pub mod annotations;
pub mod mock;
pub mod resume;

pub use annotations::PageAnnotations;
pub use resume::{PageNumber, Placed, ResumeContentModel, SectionKind, UnitRef};
