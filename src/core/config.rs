//! Bundle configuration from YAML

use crate::components::{
    field_ordering_component, import_component, output_component, sanitize_component,
    well_known_resources_component, ManifestSource,
};
use crate::core::{Builder, Component, Step};
use crate::provision::{default_dependency_component, DeployOptions};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level bundle configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Bundle name
    pub name: String,

    /// Document groups making up the bundle
    #[serde(default)]
    pub groups: Vec<GroupConfig>,

    /// Where to write the built manifests
    #[serde(default)]
    pub output_dir: Option<String>,

    /// Deadline for each wait node during deployment (in seconds)
    #[serde(default)]
    pub wait_timeout_secs: Option<u64>,
}

/// One document group as defined in YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Group name, also its output directory
    pub name: String,

    /// Manifest files imported into this group
    #[serde(default)]
    pub manifests: Vec<String>,

    /// Whether deployment waits for this group's resources to become ready
    #[serde(default)]
    pub wait: bool,

    /// Groups that must be provisioned before this one
    #[serde(default)]
    pub depends_on: Vec<String>,
}

impl BundleConfig {
    /// Load bundle configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse bundle configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: BundleConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the bundle configuration
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for group in &self.groups {
            if !seen.insert(&group.name) {
                anyhow::bail!("Duplicate group name: {}", group.name);
            }
        }

        let names: std::collections::HashSet<_> = self.groups.iter().map(|g| &g.name).collect();
        for group in &self.groups {
            for dep in &group.depends_on {
                if !names.contains(dep) {
                    anyhow::bail!(
                        "Group '{}' depends on non-existent group '{}'",
                        group.name,
                        dep
                    );
                }
            }
        }

        self.check_cycles()?;
        Ok(())
    }

    /// Check for cycles in the explicit group dependency declarations
    ///
    /// Inferred namespace/CRD edges are checked later at graph resolution;
    /// this catches the obvious configuration mistakes early.
    fn check_cycles(&self) -> Result<()> {
        let mut visited = std::collections::HashSet::new();
        let mut recursion_stack = std::collections::HashSet::new();

        for group in &self.groups {
            if !visited.contains(&group.name) {
                self.dfs_check(&group.name, &mut visited, &mut recursion_stack)?;
            }
        }

        Ok(())
    }

    fn dfs_check(
        &self,
        name: &str,
        visited: &mut std::collections::HashSet<String>,
        recursion_stack: &mut std::collections::HashSet<String>,
    ) -> Result<()> {
        visited.insert(name.to_string());
        recursion_stack.insert(name.to_string());

        if let Some(group) = self.groups.iter().find(|g| g.name == name) {
            for dep in &group.depends_on {
                if recursion_stack.contains(dep) {
                    anyhow::bail!("Cycle detected in group dependencies involving '{}'", dep);
                }
                if !visited.contains(dep) {
                    self.dfs_check(dep, visited, recursion_stack)?;
                }
            }
        }

        recursion_stack.remove(name);
        Ok(())
    }

    /// Assemble a builder implementing this bundle
    ///
    /// Reads every manifest file eagerly so missing inputs fail before the
    /// build starts. Adds the built-in import, sanitize, field-ordering,
    /// dependency and output components.
    pub fn to_builder(&self) -> Result<Builder> {
        let mut builder = Builder::new();
        builder.add_component(well_known_resources_component());

        for group in &self.groups {
            let mut sources = Vec::new();
            for manifest in &group.manifests {
                let text = std::fs::read_to_string(manifest)
                    .with_context(|| format!("failed to read manifest '{manifest}'"))?;
                sources.push(ManifestSource::new(manifest.clone(), text));
            }
            builder.add_component(import_component(group.name.clone(), sources));
        }

        builder.add_component(sanitize_component());
        builder.add_component(field_ordering_component());
        builder.add_component(self.dependency_component());
        builder.add_component(default_dependency_component());

        if let Some(out_dir) = &self.output_dir {
            builder.add_component(output_component(out_dir.clone()));
        }

        Ok(builder)
    }

    /// Deployment options derived from this configuration
    pub fn deploy_options(&self) -> DeployOptions {
        match self.wait_timeout_secs {
            Some(secs) => DeployOptions {
                wait_timeout: std::time::Duration::from_secs(secs),
            },
            None => DeployOptions::default(),
        }
    }

    /// Component declaring the configuration's explicit ordering edges
    ///
    /// Registered before the default inference component at the same step,
    /// so explicit edges land first.
    fn dependency_component(&self) -> Component {
        let groups = self.groups.clone();
        Component::named("bundle-dependencies")
            .with_type("provisioner-dependencies")
            .with_action(Step::specify_provisioner_dependencies(), move |ctx| {
                for group in &groups {
                    let apply = ctx.provisioning.apply(&group.name);
                    if group.wait {
                        ctx.provisioning.wait(&group.name);
                    }
                    for dep in &group.depends_on {
                        let upstream = groups.iter().find(|g| g.name == *dep);
                        let before = if upstream.is_some_and(|g| g.wait) {
                            ctx.provisioning.wait(dep)
                        } else {
                            ctx.provisioning.apply(dep)
                        };
                        ctx.provisioning.run_before(before, apply);
                    }
                }
                Ok(())
            })
    }
}
