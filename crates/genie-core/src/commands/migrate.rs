//! `expo-genie migrate`: switch the project-wide UI or state library

use super::{apply_library_setup, cancelled, choose, confirm, install_packages, skipped_install_hint, Context};
use crate::error::GenieError;
use crate::manifest;
use crate::registry::LibraryEntry;
use anyhow::Result;
use clap::{Args, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MigrateTarget {
    /// UI library
    Ui,
    /// State management library
    State,
}

#[derive(Args, Debug, Clone, Default)]
pub struct MigrateArgs {
    /// What to migrate
    #[arg(value_enum)]
    pub target: Option<MigrateTarget>,

    /// Library to migrate to
    #[arg(long = "to")]
    pub library: Option<String>,

    /// Do not install the new library's packages
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

pub async fn run(args: MigrateArgs, ctx: &Context) -> Result<()> {
    cliclack::intro("expo-genie migrate")?;
    let (root, project) = ctx.project().await?;

    let target = match args.target {
        Some(target) => target,
        None => cliclack::select("What do you want to migrate?")
            .item(MigrateTarget::Ui, "UI library", project.ui_library.display_name())
            .item(MigrateTarget::State, "State management", project.state_management.display_name())
            .interact()?,
    };

    let (registry, current) = match target {
        MigrateTarget::Ui => (&ctx.registries.ui, project.ui_library.as_str()),
        MigrateTarget::State => (&ctx.registries.state, project.state_management.as_str()),
    };
    let next = choose(registry, args.library.as_deref(), "Migrate to", Some(current))?;

    if next.key == current {
        cliclack::outro(format!("The project already uses {}", next.name))?;
        return Ok(());
    }
    if !confirm(
        &format!("Migrate from {} to {}?", current, next.key),
        args.yes,
    )? {
        return cancelled("Migration cancelled.");
    }

    let _lock = ctx.lock()?;
    let pm = project.preferences.package_manager;
    let (packages, dev_packages) = (next.package_list(), next.dev_package_list());
    if project.preferences.auto_install && !args.skip_install {
        install_packages(pm, &root, &packages, &dev_packages).await?;
    } else {
        skipped_install_hint(pm, &packages, &dev_packages)?;
    }
    apply_library_setup(&root, next).await?;

    match target {
        MigrateTarget::Ui => manifest::update_ui_library(&root, next.key.parse()?).await?,
        MigrateTarget::State => manifest::update_state_management(&root, next.key.parse()?).await?,
    }
    tracing::info!(from = current, to = next.key, "migrated project");

    let previous = match target {
        MigrateTarget::Ui => ctx.registries.ui_library(project.ui_library),
        MigrateTarget::State => ctx.registries.state_library(project.state_management),
    };
    if let Some(previous) = previous {
        leftover_hint(previous)?;
    }

    let updated = manifest::require(&root).await?;
    let stale = updated.stale_features();
    if !stale.is_empty() {
        cliclack::log::warning(format!(
            "Generated for the previous stack: {}. Run `expo-genie add <feature> --force` to regenerate.",
            stale.join(", ")
        ))?;
    }

    cliclack::outro(format!("Migrated to {}", next.name))?;
    Ok(())
}

fn leftover_hint(previous: &LibraryEntry) -> Result<(), GenieError> {
    let mut leftovers = previous.package_list();
    leftovers.extend(previous.dev_package_list());
    if !leftovers.is_empty() {
        cliclack::log::remark(format!(
            "{} packages are no longer needed: {}",
            previous.name,
            leftovers.join(" ")
        ))?;
    }
    Ok(())
}
