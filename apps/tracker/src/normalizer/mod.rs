// Resume normalizer: pure, I/O-free transforms from a loose result document
// to the canonical view model. Nothing in here returns an error; unresolvable
// input degrades to empty sections or serialized text.

pub mod classify;
pub mod fields;
pub mod path;
pub mod scalar;
pub mod sections;
pub mod tables;

pub use classify::{classify, Bucket, CategoryFamily};
pub use fields::{
    project_item, project_items, project_merged, resolve_field, Badge, DisplayItem, FieldSpec,
};
pub use path::{first_non_empty, is_empty_value, resolve_path};
pub use scalar::display_value;
pub use sections::{
    build_sections, build_view_model, resolve_section, ResolvedSection, SectionSpec, ViewModel,
    ViewModelSection,
};
pub use tables::{RESUME_SECTIONS, REVIEW_SECTIONS};
