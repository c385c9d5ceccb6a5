//! CLI output formatting

use crate::core::BuildContext;
use crate::provision::{DeployPlan, DeployReport, NodeReport, ProvisionKind, ProvisionState};
use console::Emoji;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Format a provision state for display
pub fn format_provision_state(state: ProvisionState) -> String {
    match state {
        ProvisionState::Unprovisioned => style("UNPROVISIONED").dim().to_string(),
        ProvisionState::DependenciesDeclared => style("DECLARED").dim().to_string(),
        ProvisionState::Ordered => style("ORDERED").yellow().to_string(),
        ProvisionState::Applied => style("APPLIED").green().to_string(),
        ProvisionState::Waited => style("READY").green().to_string(),
        ProvisionState::Failed => style("FAILED").red().to_string(),
    }
}

/// Format a resolved plan as a numbered list
pub fn format_plan(plan: &DeployPlan) -> String {
    let mut lines = Vec::new();
    for (index, node) in plan.nodes.iter().enumerate() {
        let label = match node.kind {
            ProvisionKind::Apply => format!("apply {}", style(&node.group).bold()),
            ProvisionKind::Wait => format!("wait  {}", style(&node.group).cyan()),
        };
        if node.deps.is_empty() {
            lines.push(format!("  {}. {}", index + 1, label));
        } else {
            let deps: Vec<String> = node
                .deps
                .iter()
                .map(|d| (d + 1).to_string())
                .collect();
            lines.push(format!(
                "  {}. {} (after {})",
                index + 1,
                label,
                style(deps.join(", ")).dim()
            ));
        }
    }
    lines.join("\n")
}

/// Format a single deployment node report line
pub fn format_node_report(report: &NodeReport) -> String {
    let icon = match report.state {
        ProvisionState::Applied | ProvisionState::Waited => CHECK,
        ProvisionState::Failed => CROSS,
        _ => WARN,
    };
    let mut line = format!(
        "{} {} {} - {}",
        icon,
        format!("{:?}", report.kind).to_lowercase(),
        style(&report.group).bold(),
        format_provision_state(report.state)
    );
    if let Some(error) = &report.error {
        line.push_str(&format!(" ({})", style(error).dim()));
    }
    line
}

/// Format the summary line after a deployment
pub fn format_report(report: &DeployReport) -> String {
    let mut lines: Vec<String> = report.nodes.iter().map(format_node_report).collect();
    let summary = report.summary();
    if report.is_success() {
        lines.push(format!(
            "\n{} Deployment {} ({})",
            CHECK,
            style("succeeded").green(),
            summary
        ));
    } else {
        lines.push(format!(
            "\n{} Deployment {} ({})",
            CROSS,
            style("failed").red(),
            summary
        ));
    }
    lines.join("\n")
}

/// Format the built groups for display after a build
pub fn format_build_summary(ctx: &BuildContext) -> String {
    let mut lines = Vec::new();
    for group in ctx.groups() {
        lines.push(format!(
            "  {} ({} documents)",
            style(&group.path).bold(),
            style(group.len()).cyan()
        ));
        for document in group.documents() {
            lines.push(format!("    {}", style(document.file_name()).dim()));
        }
    }
    lines.join("\n")
}
