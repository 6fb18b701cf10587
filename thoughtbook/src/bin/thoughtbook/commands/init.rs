use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::Colorize;
use thoughtbook::config::{AppConfig, DEFAULT_CONFIG_PATH};

use crate::theme::{ARROW, CHECK, PALETTE};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Where to write the configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

pub async fn handle_init(args: InitArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        bail!("{} already exists; pass --force to overwrite it", args.path.display());
    }

    let content = AppConfig::default().to_toml()?;
    tokio::fs::write(&args.path, content)
        .await
        .with_context(|| format!("Failed to write {}", args.path.display()))?;

    println!(
        "{} {} {}",
        CHECK.color(PALETTE.ok),
        "Wrote".color(PALETTE.text),
        args.path.display().to_string().color(PALETTE.label).bold()
    );
    println!(
        "  {} {}",
        ARROW.color(PALETTE.marker),
        "Start the service with 'thoughtbook serve'".color(PALETTE.dim)
    );
    Ok(())
}
