//! Manifest import component

use crate::core::{Component, Document, Step};
use anyhow::Context;

/// A named piece of YAML manifest text to import
#[derive(Debug, Clone)]
pub struct ManifestSource {
    /// Origin label used in diagnostics, typically a file name
    pub name: String,
    /// Multi-document YAML text
    pub text: String,
}

impl ManifestSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Built-in populate-phase component importing manifest text into a group
///
/// Multi-document streams are split into one [`Document`] each.
pub fn import_component(group: impl Into<String>, sources: Vec<ManifestSource>) -> Component {
    let group = group.into();
    Component::named(format!("import:{group}"))
        .with_type("import")
        .with_action(Step::populate_resources(), move |ctx| {
            let target = ctx.ensure_group(&group);
            for source in &sources {
                let nodes = crate::tree::yaml::parse_documents(&source.text)
                    .with_context(|| format!("failed to parse '{}'", source.name))?;
                for node in nodes {
                    let root = node.as_mapping().cloned().with_context(|| {
                        format!("'{}' contains a non-mapping document", source.name)
                    })?;
                    target.add_document(Document::from_root(root));
                }
            }
            Ok(())
        })
}
