//! The builder - merges, sorts and executes component actions

use crate::core::{component::Component, context::BuildContext, error::BuildError};
use crate::provision::DeployPlan;
use tracing::{debug, error, info};

/// Orchestrates one build
///
/// Holds the components, merges their actions, stable-sorts them by step
/// and executes the callbacks in order against one shared build context.
/// Given the same components added in the same order, two builds produce
/// byte-identical output.
#[derive(Debug, Default)]
pub struct Builder {
    components: Vec<Component>,
}

impl Builder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component; registration order is the sort tie-break
    pub fn add_component(&mut self, component: Component) {
        self.components.push(component);
    }

    /// Builder-style variant of [`Builder::add_component`]
    pub fn with_component(mut self, component: Component) -> Self {
        self.add_component(component);
        self
    }

    /// The registered components
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Run every action in step order against a fresh build context
    ///
    /// Fails fast on the first action error, attributing it to the
    /// originating component and step. Prior context mutations are not
    /// rolled back; the context is simply abandoned.
    pub fn build(&self) -> Result<BuildContext, BuildError> {
        let mut ctx = BuildContext::new();
        info!(
            build_id = %ctx.build_id,
            components = self.components.len(),
            "starting build"
        );

        // Flatten in registration order, then stable-sort by step so equal
        // steps keep (component index, action index) order.
        let mut order: Vec<(usize, usize)> = self
            .components
            .iter()
            .enumerate()
            .flat_map(|(ci, c)| (0..c.actions().len()).map(move |ai| (ci, ai)))
            .collect();
        order.sort_by(|&(ca, aa), &(cb, ab)| {
            self.components[ca].actions()[aa]
                .step()
                .cmp(self.components[cb].actions()[ab].step())
        });

        for (ci, ai) in order {
            let component = &self.components[ci];
            let action = &component.actions()[ai];
            debug!(
                component = component.display_name(),
                step = %action.step(),
                "executing action"
            );
            if let Err(source) = action.run(&mut ctx) {
                error!(
                    component = component.display_name(),
                    step = %action.step(),
                    "action failed, aborting build"
                );
                return Err(BuildError::ComponentFailure {
                    component: component.display_name().to_string(),
                    step: action.step().to_string(),
                    source,
                });
            }
        }

        info!(build_id = %ctx.build_id, groups = ctx.groups().len(), "build finished");
        Ok(ctx)
    }

    /// Run the build, then resolve the provisioner graph into a plan
    pub fn build_plan(&self) -> Result<(BuildContext, DeployPlan), BuildError> {
        let ctx = self.build()?;
        let plan = ctx.provisioning.resolve()?;
        Ok((ctx, plan))
    }
}
