//! CLI command definitions

use clap::Args;

/// Build a bundle and write the manifests
#[derive(Debug, Args, Clone)]
pub struct BuildCommand {
    /// Path to bundle YAML file
    #[arg(short, long)]
    pub file: String,

    /// Override the configured output directory
    #[arg(short, long)]
    pub out: Option<String>,
}

/// Show the provisioning order a bundle resolves to
#[derive(Debug, Args, Clone)]
pub struct PlanCommand {
    /// Path to bundle YAML file
    #[arg(short, long)]
    pub file: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Validate a bundle configuration
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to bundle YAML file
    #[arg(short, long)]
    pub file: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
