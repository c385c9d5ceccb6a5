use anyhow::{Context, Result};
use kubeforge::cli::commands::{BuildCommand, PlanCommand, ValidateCommand};
use kubeforge::cli::output::*;
use kubeforge::cli::{Cli, Command};
use kubeforge::core::BundleConfig;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    // Execute command
    match &cli.command {
        Command::Build(cmd) => build_bundle(cmd)?,
        Command::Plan(cmd) => plan_bundle(cmd)?,
        Command::Validate(cmd) => validate_bundle(cmd)?,
    }

    Ok(())
}

fn build_bundle(cmd: &BuildCommand) -> Result<()> {
    let mut config =
        BundleConfig::from_file(&cmd.file).context("Failed to load bundle config")?;

    if let Some(out) = &cmd.out {
        config.output_dir = Some(out.clone());
    }

    println!("{} Loaded bundle: {}", INFO, style(&config.name).bold());

    let builder = config.to_builder()?;
    let ctx = builder.build()?;

    println!("{}", format_build_summary(&ctx));
    println!(
        "\n{} {} built {}",
        CHECK,
        style(&config.name).bold(),
        style("successfully").green()
    );
    if let Some(out_dir) = &config.output_dir {
        println!("{} Manifests written to {}", INFO, style(out_dir).cyan());
    }

    Ok(())
}

fn plan_bundle(cmd: &PlanCommand) -> Result<()> {
    let config = BundleConfig::from_file(&cmd.file).context("Failed to load bundle config")?;

    let builder = config.to_builder()?;
    let (_ctx, plan) = builder.build_plan()?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!(
        "{} Provisioning order for {}:",
        ROCKET,
        style(&config.name).bold()
    );
    println!("{}", format_plan(&plan));

    Ok(())
}

fn validate_bundle(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating bundle...", INFO);

    let result = BundleConfig::from_file(&cmd.file);

    match result {
        Ok(config) => {
            println!("{} Bundle configuration is valid!", CHECK);
            println!("  Name: {}", style(&config.name).bold());
            println!("  Groups: {}", style(config.groups.len()).cyan());

            if cmd.json {
                let json = serde_json::to_string_pretty(&config)?;
                println!("\n{}", json);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(e).red());
            std::process::exit(1);
        }
    }
}
