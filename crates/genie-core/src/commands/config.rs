//! `expo-genie config`: read and change global defaults

use super::{cancelled, confirm, Context};
use crate::global::{ConfigKey, GlobalConfig};
use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Change a setting
    Set {
        /// Setting name (e.g. defaultUILibrary)
        key: String,
        value: String,
    },
    /// Print one setting
    Get { key: String },
    /// Print every setting and the recent projects
    List,
    /// Restore the built-in defaults (recent projects are kept)
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.action {
        ConfigAction::Get { key } => {
            let key: ConfigKey = key.parse()?;
            println!("{}", ctx.global.load().await?.get(key));
        }
        ConfigAction::List => {
            let config = ctx.global.load().await?;
            for line in list_lines(&config) {
                println!("{}", line);
            }
        }
        ConfigAction::Set { key, value } => {
            let key: ConfigKey = key.parse()?;
            let _lock = ctx.lock()?;
            let mut config = ctx.global.load().await?;
            config.set(key, &value)?;
            ctx.global.save(&config).await?;
            println!("{} {} = {}", "✓".green(), key, config.get(key));
        }
        ConfigAction::Reset { yes } => {
            if !confirm("Reset all settings to their defaults?", yes)? {
                return cancelled("Settings unchanged.");
            }
            let _lock = ctx.lock()?;
            ctx.global.reset().await?;
            println!("{} Settings reset ({})", "✓".green(), ctx.global.config_path().display());
        }
    }
    Ok(())
}

fn list_lines(config: &GlobalConfig) -> Vec<String> {
    let mut lines: Vec<String> = ConfigKey::ALL
        .iter()
        .map(|key| format!("{:<24} {}", key.as_str().cyan(), config.get(*key)))
        .collect();
    lines.push(format!("{}", "recentProjects".cyan()));
    if config.recent_projects.is_empty() {
        lines.push(format!("  {}", "(none)".dimmed()));
    }
    lines.extend(config.recent_projects.iter().map(|path| format!("  {}", path)));
    lines
}
