//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{BuildCommand, PlanCommand, ValidateCommand};

/// Staged Kubernetes manifest builder
#[derive(Debug, Parser, Clone)]
#[command(name = "kubeforge")]
#[command(author = "Kubeforge Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Build Kubernetes manifest bundles in ordered stages", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Build a bundle and write the manifests
    Build(BuildCommand),

    /// Show the provisioning order a bundle resolves to
    Plan(PlanCommand),

    /// Validate a bundle configuration
    Validate(ValidateCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}

use std::ffi::OsString;
