//! CLI verbs driven by cliclack prompts
//!
//! Each submodule owns one verb: its clap arguments and its `run` function.
//! Mutating verbs take the global lock for their whole duration.

pub mod add;
pub mod clean;
pub mod config;
pub mod doctor;
pub mod generate;
pub mod info;
pub mod init;
pub mod install;
pub mod migrate;

use crate::error::GenieError;
use crate::global::{GlobalStore, LockGuard};
use crate::manifest::{self, ProjectManifest};
use crate::package_manager::PackageManager;
use crate::registry::{LibraryEntry, Registries, Registry, RegistryEntry};
use crate::{fsutil, generators::GeneratedFile};
use anyhow::Result;
use clap::Subcommand;
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new Expo project from a template
    Init(init::InitArgs),
    /// Add a feature module (auth, payments, chat, camera, maps)
    Add(add::AddArgs),
    /// Generate a screen, component, hook, API service, store or model
    #[command(alias = "g")]
    Generate(generate::GenerateArgs),
    /// Install a library from the registry (or any npm package)
    #[command(alias = "i")]
    Install(install::InstallArgs),
    /// Switch the project's UI or state management library
    Migrate(migrate::MigrateArgs),
    /// Check the development environment and the project
    Doctor(doctor::DoctorArgs),
    /// Show project, feature and registry information
    Info(info::InfoArgs),
    /// Remove caches and build output
    Clean(clean::CleanArgs),
    /// Read or change global defaults
    Config(config::ConfigArgs),
}

/// What every command runs against
#[derive(Debug, Clone)]
pub struct Context {
    pub registries: Registries,
    pub global: GlobalStore,
    /// Directory the command was started from
    pub cwd: PathBuf,
}

impl Context {
    pub fn new(registries: Registries, global: GlobalStore, cwd: PathBuf) -> Self {
        Self {
            registries,
            global,
            cwd,
        }
    }

    /// Built-in registries, default genie home, process working directory
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(
            Registries::builtin(),
            GlobalStore::open_default(),
            std::env::current_dir()?,
        ))
    }

    /// Nearest managed project at or above the working directory
    pub async fn project_root(&self) -> Result<PathBuf, GenieError> {
        manifest::find_project_root(&self.cwd)
            .await
            .ok_or_else(|| GenieError::NotManagedProject(self.cwd.clone()))
    }

    /// Project root and its manifest
    pub async fn project(&self) -> Result<(PathBuf, ProjectManifest), GenieError> {
        let root = self.project_root().await?;
        let manifest = manifest::require(&root).await?;
        Ok((root, manifest))
    }

    /// Hold the global lock until the guard is dropped
    pub fn lock(&self) -> Result<LockGuard, GenieError> {
        self.global.acquire()
    }
}

/// Dispatch a parsed command
pub async fn run(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Init(args) => init::run(args, ctx).await,
        Command::Add(args) => add::run(args, ctx).await,
        Command::Generate(args) => generate::run(args, ctx).await,
        Command::Install(args) => install::run(args, ctx).await,
        Command::Migrate(args) => migrate::run(args, ctx).await,
        Command::Doctor(args) => doctor::run(args, ctx).await,
        Command::Info(args) => info::run(args, ctx).await,
        Command::Clean(args) => clean::run(args, ctx).await,
        Command::Config(args) => config::run(args, ctx).await,
    }
}

/// Ask for confirmation; `--yes` answers for the user
pub(crate) fn confirm(message: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    Ok(cliclack::confirm(message).initial_value(true).interact()?)
}

/// A clean user cancellation: reported, exit code 0
pub(crate) fn cancelled(message: &str) -> Result<()> {
    cliclack::outro_cancel(message)?;
    Ok(())
}

/// Pick an entry from a registry, or resolve the one given on the command line
pub(crate) fn choose<'r, E: RegistryEntry>(
    registry: &'r Registry<E>,
    given: Option<&str>,
    message: &str,
    initial: Option<&str>,
) -> Result<&'r E> {
    if let Some(key) = given {
        return Ok(registry.require(key)?);
    }

    let mut select = cliclack::select(message.to_string());
    for (idx, entry) in registry.list_all().iter().enumerate() {
        select = select.item(idx, entry.name(), entry.description());
    }
    if let Some(position) = initial.and_then(|key| registry.keys().position(|k| k == key)) {
        select = select.initial_value(position);
    }
    let idx: usize = select.interact()?;
    registry
        .list_all()
        .get(idx)
        .ok_or_else(|| anyhow::anyhow!("Selection out of range"))
}

/// Add packages with a spinner, regular dependencies first
pub(crate) async fn install_packages(
    pm: PackageManager,
    project: &Path,
    packages: &[String],
    dev_packages: &[String],
) -> Result<()> {
    if packages.is_empty() && dev_packages.is_empty() {
        return Ok(());
    }

    let spinner = cliclack::spinner();
    let mut all: Vec<&str> = packages.iter().map(String::as_str).collect();
    all.extend(dev_packages.iter().map(String::as_str));
    spinner.start(format!("Installing {}...", all.join(", ")));

    let result = async {
        pm.add(project, packages, false).await?;
        pm.add(project, dev_packages, true).await
    }
    .await;

    match result {
        Ok(()) => {
            spinner.stop(format!("Installed {} package(s) with {}", all.len(), pm));
            Ok(())
        }
        Err(e) => {
            spinner.error("Installation failed");
            Err(e.into())
        }
    }
}

/// Tell the user how to install packages later
pub(crate) fn skipped_install_hint(pm: PackageManager, packages: &[String], dev_packages: &[String]) -> Result<()> {
    if !packages.is_empty() {
        cliclack::log::remark(format!("Install later with: {}", pm.add_command(packages, false)))?;
    }
    if !dev_packages.is_empty() {
        cliclack::log::remark(format!("Install later with: {}", pm.add_command(dev_packages, true)))?;
    }
    Ok(())
}

/// Write a library's config files and show its setup steps
pub(crate) async fn apply_library_setup(project: &Path, library: &LibraryEntry) -> Result<Vec<String>> {
    let files: Vec<GeneratedFile> = library
        .config_files
        .iter()
        .map(|file| GeneratedFile::new(file.path, file.contents))
        .collect();
    let written = crate::generators::write_files(project, &files).await?;
    for path in &written {
        cliclack::log::info(format!("Wrote {}", path))?;
    }
    for step in library.setup {
        cliclack::log::remark(*step)?;
    }
    Ok(written)
}

/// Delete previously generated files. Missing files are ignored; paths outside
/// the project and directories are left alone.
pub(crate) async fn remove_files(project: &Path, files: &[String]) -> Result<usize> {
    let mut removed = 0;
    for file in files {
        if !fsutil::is_contained(file) {
            tracing::warn!(file = %file, "not removing path outside the project");
            continue;
        }
        let path = project.join(file);
        if path.is_dir() {
            tracing::warn!(file = %file, "not removing directory");
            continue;
        }
        if fsutil::remove_file(&path).await? {
            removed += 1;
        }
    }
    Ok(removed)
}
