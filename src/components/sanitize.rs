//! Sanitize component

use crate::core::{Component, Step};

/// Built-in sanitize-phase component
///
/// Imported manifests often carry server-populated fields. This pass drops
/// the top-level `status` block and empty `metadata.labels` /
/// `metadata.annotations` scaffolding from every document.
pub fn sanitize_component() -> Component {
    Component::named("sanitize-documents")
        .with_type("sanitize")
        .with_action(Step::sanitize(), |ctx| {
            for group in ctx.groups_mut() {
                for document in group.documents_mut() {
                    document.root.remove("status");
                    if let Some(metadata) = document.root.get_mapping_mut("metadata") {
                        for key in ["labels", "annotations"] {
                            let empty = metadata
                                .get_mapping(key)
                                .is_some_and(|m| m.is_empty());
                            if empty {
                                metadata.remove(key);
                            }
                        }
                    }
                }
            }
            Ok(())
        })
}
