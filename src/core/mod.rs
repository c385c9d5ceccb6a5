//! Core build engine
//!
//! This module defines the fundamental data structures of a build: steps,
//! components, documents, groups, the shared context and the builder that
//! drives them.

pub mod builder;
pub mod component;
pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod group;
pub mod step;

pub use builder::Builder;
pub use component::{Action, ActionFn, Component};
pub use config::{BundleConfig, GroupConfig};
pub use context::{BuildContext, KubernetesResourceInfo};
pub use document::Document;
pub use error::BuildError;
pub use group::{AdditionalFile, DocumentGroup};
pub use step::Step;
