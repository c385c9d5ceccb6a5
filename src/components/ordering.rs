//! Field ordering component

use crate::core::{Component, Step};

/// Built-in modify-phase component pinning conventional field order
///
/// Moves `apiVersion`, `kind` and `metadata` to the front of every
/// document without rebuilding the tree, so emitted manifests read the way
/// hand-written ones do.
pub fn field_ordering_component() -> Component {
    Component::named("field-ordering")
        .with_type("ordering")
        .with_action(Step::modify(), |ctx| {
            for group in ctx.groups_mut() {
                for document in group.documents_mut() {
                    let root = &mut document.root;
                    let mut front = 0;
                    for key in ["apiVersion", "kind", "metadata"] {
                        if let Some(node) = root.remove(key) {
                            root.insert(front, key, node);
                            front += 1;
                        }
                    }
                }
            }
            Ok(())
        })
}
