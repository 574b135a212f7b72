//! `expo-genie install`: add a registry library or any npm package

use super::{apply_library_setup, choose, install_packages, Context};
use crate::error::GenieError;
use crate::npm;
use crate::registry::{LibraryCategory, LibraryEntry, Registries, Registry};
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug, Clone, Default)]
pub struct InstallArgs {
    /// Registry key (e.g. zod, react-query) or npm package name
    pub package: Option<String>,

    /// Install an unknown npm package as a dev dependency
    #[arg(short = 'D', long)]
    pub dev: bool,
}

/// What an install request resolved to
#[derive(Debug)]
enum Target<'r> {
    Library(&'r LibraryEntry),
    Package(String),
}

pub async fn run(args: InstallArgs, ctx: &Context) -> Result<()> {
    cliclack::intro("expo-genie install")?;
    let (root, project) = ctx.project().await?;
    let pm = project.preferences.package_manager;

    let target = match &args.package {
        Some(key) => resolve(&ctx.registries, key)?,
        None => Target::Library(pick_library(&ctx.registries)?),
    };

    match target {
        Target::Library(library) => {
            let _lock = ctx.lock()?;
            install_packages(pm, &root, &library.package_list(), &library.dev_package_list()).await?;
            apply_library_setup(&root, library).await?;
            cliclack::outro(format!("{} installed", library.name))?;
        }
        Target::Package(spec) => {
            let spinner = cliclack::spinner();
            spinner.start(format!("Looking up {} on npm...", spec));
            match npm::latest_version(&spec).await {
                Ok(Some(version)) => spinner.stop(format!("{} {}", npm::package_name(&spec), version)),
                Ok(None) => {
                    spinner.error("Package not found");
                    return Err(GenieError::NotFound {
                        kind: "package",
                        key: spec,
                        available: "any library from `expo-genie info --libraries` or a published npm package"
                            .to_string(),
                    }
                    .into());
                }
                Err(e) => {
                    spinner.error("npm registry unreachable");
                    return Err(e);
                }
            }

            let _lock = ctx.lock()?;
            let packages = vec![spec.clone()];
            if args.dev {
                install_packages(pm, &root, &[], &packages).await?;
            } else {
                install_packages(pm, &root, &packages, &[]).await?;
            }
            cliclack::outro(format!("{} installed", spec))?;
        }
    }
    Ok(())
}

/// Registry libraries win over npm; UI and state libraries are switched with `migrate`
fn resolve<'r>(registries: &'r Registries, key: &str) -> Result<Target<'r>, GenieError> {
    if let Some(library) = registries.libraries.lookup(key) {
        return Ok(Target::Library(library));
    }
    if registries.ui.lookup(key).is_some() {
        return Err(GenieError::Unsupported(format!(
            "{} is a UI library. Run `expo-genie migrate ui` to switch the project to it.",
            key
        )));
    }
    if registries.state.lookup(key).is_some() {
        return Err(GenieError::Unsupported(format!(
            "{} is a state management library. Run `expo-genie migrate state` to switch the project to it.",
            key
        )));
    }
    Ok(Target::Package(key.trim().to_string()))
}

fn pick_library(registries: &Registries) -> Result<&LibraryEntry> {
    let mut select = cliclack::select("Select a category");
    for category in LibraryCategory::ALL {
        if !registries.libraries_in(category).is_empty() {
            select = select.item(category, category.display_name(), "");
        }
    }
    let category: LibraryCategory = select.interact()?;

    let entries: Vec<LibraryEntry> = registries
        .libraries_in(category)
        .into_iter()
        .cloned()
        .collect();
    let in_category = Registry::new("library", entries);
    let chosen = choose(&in_category, None, "Select a library", None)?;
    Ok(registries.libraries.require(chosen.key)?)
}
