//! Actions and components
//!
//! A `Component` is a named bundle of `(Step, callback)` pairs plus
//! metadata. Components are created once, added to a `Builder`, and never
//! re-owned by another builder.

use crate::core::{context::BuildContext, step::Step};
use std::collections::HashMap;
use std::fmt;

/// Callback signature for a build action
///
/// `Fn` rather than `FnOnce` so a builder can run the same component set
/// more than once (the determinism contract is verified that way).
pub type ActionFn = Box<dyn Fn(&mut BuildContext) -> anyhow::Result<()> + Send + Sync>;

/// A `(Step, callback)` pair owned by exactly one component
pub struct Action {
    step: Step,
    callback: ActionFn,
}

impl Action {
    /// Create an action scheduled at a step
    pub fn new<F>(step: Step, callback: F) -> Self
    where
        F: Fn(&mut BuildContext) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            step,
            callback: Box::new(callback),
        }
    }

    /// The step this action is scheduled at
    pub fn step(&self) -> &Step {
        &self.step
    }

    /// Run the callback against the shared build context
    pub fn run(&self, ctx: &mut BuildContext) -> anyhow::Result<()> {
        (self.callback)(ctx)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").field("step", &self.step).finish()
    }
}

/// A named bundle of actions plus metadata
///
/// `custom_data` is a free-form typed key-value store; independently
/// authored components should prefix their keys with their component type
/// to avoid collisions.
#[derive(Debug, Default)]
pub struct Component {
    actions: Vec<Action>,
    pub custom_data: HashMap<String, serde_json::Value>,
    pub metadata: HashMap<String, String>,
    pub identifier: Option<String>,
    pub component_type: Option<String>,
}

impl Component {
    /// Create an anonymous component
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a component with an identifier
    pub fn named(identifier: impl Into<String>) -> Self {
        Self {
            identifier: Some(identifier.into()),
            ..Self::default()
        }
    }

    /// Set the component type
    pub fn with_type(mut self, component_type: impl Into<String>) -> Self {
        self.component_type = Some(component_type.into());
        self
    }

    /// Append an action, preserving registration order
    ///
    /// Registration order is the tie-break when two actions share an equal
    /// step.
    pub fn add_action<F>(&mut self, step: Step, callback: F)
    where
        F: Fn(&mut BuildContext) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.actions.push(Action::new(step, callback));
    }

    /// Builder-style variant of [`Component::add_action`]
    pub fn with_action<F>(mut self, step: Step, callback: F) -> Self
    where
        F: Fn(&mut BuildContext) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.add_action(step, callback);
        self
    }

    /// The component's actions in registration order
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Identifier for diagnostics, falling back to the component type
    pub fn display_name(&self) -> &str {
        self.identifier
            .as_deref()
            .or(self.component_type.as_deref())
            .unwrap_or("<anonymous>")
    }
}
