//! Output component

use crate::core::{Component, Step};
use anyhow::Context;
use std::path::PathBuf;

/// Built-in output-phase component writing every group to disk
///
/// Runs `fix_name_clashes` per group first so emitted paths are unique,
/// then writes each document and additional file under the output
/// directory.
pub fn output_component(out_dir: impl Into<PathBuf>) -> Component {
    let out_dir = out_dir.into();
    Component::named("write-output")
        .with_type("output")
        .with_action(Step::output(), move |ctx| {
            for group in ctx.groups_mut() {
                group.fix_name_clashes()?;
            }
            for group in ctx.groups() {
                for document in group.documents() {
                    let path = out_dir.join(document.full_path());
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)
                            .with_context(|| format!("failed to create {}", parent.display()))?;
                    }
                    std::fs::write(&path, document.to_yaml()?)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                }
                for file in &group.additional_files {
                    let path = out_dir.join(&group.path).join(&file.path);
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)
                            .with_context(|| format!("failed to create {}", parent.display()))?;
                    }
                    std::fs::write(&path, &file.content)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                }
            }
            Ok(())
        })
}
