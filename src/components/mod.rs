//! Built-in components
//!
//! The transformation library proper lives outside the engine; these are
//! the few components every bundle build needs.

pub mod import;
pub mod ordering;
pub mod output;
pub mod resource_info;
pub mod sanitize;

pub use import::{import_component, ManifestSource};
pub use ordering::field_ordering_component;
pub use output::output_component;
pub use resource_info::well_known_resources_component;
pub use sanitize::sanitize_component;
