//! `expo-genie init`: create a project from a template

use super::{apply_library_setup, cancelled, choose, confirm, install_packages, Context};
use crate::manifest::{self, ProjectManifest};
use crate::naming;
use crate::package_manager::PackageManager;
use crate::stack::{StateManagement, UiLibrary};
use crate::templates::{self, version, TemplateInfo, TemplateRegistry};
use crate::{fsutil, CLI_VERSION};
use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Clone, Default)]
pub struct InitArgs {
    /// Project name, also used as the directory name
    pub name: Option<String>,

    /// Template name to use
    #[arg(short, long)]
    pub template: Option<String>,

    /// Local directory to use for templates instead of the cache or remote (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Directory to create the project in (defaults to ./<name>)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// UI library (nativewind, paper, nativebase, elements, tamagui, none)
    #[arg(long)]
    pub ui: Option<String>,

    /// State management library (zustand, redux, mobx, jotai, context, none)
    #[arg(long)]
    pub state: Option<String>,

    /// Package manager (npm, yarn, pnpm, bun)
    #[arg(short, long = "package-manager")]
    pub package_manager: Option<String>,

    /// Generate JavaScript instead of TypeScript
    #[arg(long)]
    pub javascript: bool,

    /// Do not install dependencies
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    /// Auto-confirm all prompts, using configured defaults (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

pub async fn run(args: InitArgs, ctx: &Context) -> Result<()> {
    cliclack::intro("expo-genie init")?;
    let defaults = ctx.global.load().await?;

    // Step 1: Name and directory
    let name = match &args.name {
        Some(name) => name.trim().to_string(),
        None if args.yes => "my-app".to_string(),
        None => cliclack::input("Project name")
            .placeholder("my-app")
            .default_input("my-app")
            .validate(|input: &String| naming::validate_project_name(input).map_err(|e| e.to_string()))
            .interact()?,
    };
    naming::validate_project_name(&name)?;
    let project_dir = target_dir(&ctx.cwd, &name, args.directory.as_deref());

    if manifest::is_managed_project(&project_dir).await {
        cliclack::log::warning(format!(
            "{} already holds an expo-genie project",
            project_dir.display()
        ))?;
    }
    if fsutil::entry_count(&project_dir).await? > 0 {
        cliclack::log::warning(format!("{} is not empty", project_dir.display()))?;
        if !confirm("Write the project into it anyway?", args.yes)? {
            return cancelled("Setup cancelled.");
        }
    }

    // Step 2: Template
    let spinner = cliclack::spinner();
    spinner.start("Loading templates...");
    let registry = match templates::resolve(args.template_dir.as_deref(), ctx.global.home()).await {
        Ok(registry) => registry,
        Err(e) => {
            spinner.error("Failed to load templates");
            return Err(e);
        }
    };
    spinner.stop(format!("{} template(s) available", registry.list_all().len()));

    let template = select_template(&registry, &args, &defaults.default_template)?;
    if let Some(warning) =
        version::check_compatibility(CLI_VERSION, &template.manifest.version, version::UPGRADE_COMMAND)
    {
        cliclack::log::warning(warning)?;
    }

    // Step 3: Stack
    let ui_entry = if args.yes && args.ui.is_none() {
        ctx.registries.ui.require(defaults.default_ui_library.as_str())?
    } else {
        choose(
            &ctx.registries.ui,
            args.ui.as_deref(),
            "Select a UI library",
            Some(defaults.default_ui_library.as_str()),
        )?
    };
    let ui_library: UiLibrary = ui_entry.key.parse()?;

    let state_entry = if args.yes && args.state.is_none() {
        ctx.registries.state.require(defaults.default_state_management.as_str())?
    } else {
        choose(
            &ctx.registries.state,
            args.state.as_deref(),
            "Select state management",
            Some(defaults.default_state_management.as_str()),
        )?
    };
    let state_management: StateManagement = state_entry.key.parse()?;

    let typescript = if args.javascript {
        false
    } else if args.yes {
        true
    } else {
        cliclack::confirm("Use TypeScript?").initial_value(true).interact()?
    };

    let pm: PackageManager = match &args.package_manager {
        Some(value) => value.parse()?,
        None => defaults.default_package_manager,
    };

    // Step 4: Write the project
    let _lock = ctx.lock()?;
    let spinner = cliclack::spinner();
    spinner.start("Creating project...");
    let copied = match templates::copy_template(
        template,
        registry.language_files(),
        &project_dir,
        &name,
        typescript,
    )
    .await
    {
        Ok(copied) => copied,
        Err(e) => {
            spinner.error("Failed to copy template");
            return Err(e);
        }
    };
    spinner.stop(format!(
        "Created {} files in {}",
        copied.len(),
        project_dir.display()
    ));

    apply_library_setup(&project_dir, ui_entry).await?;
    apply_library_setup(&project_dir, state_entry).await?;

    let mut project = ProjectManifest::new_default(
        &name,
        Some(&template.manifest.name),
        ui_library,
        state_management,
        pm,
    );
    project.preferences.typescript = typescript;
    project.preferences.auto_install = defaults.auto_install;
    project.preferences.git_commit = defaults.git_commit;
    project.preferences.dark_mode = defaults.dark_mode;
    manifest::save(&project_dir, &project).await?;
    ctx.global.add_recent_project(&project_dir).await?;
    tracing::info!(project = %project_dir.display(), template = %template.manifest.name, "initialized project");

    // Step 5: Dependencies
    let mut packages = ui_entry.package_list();
    packages.extend(state_entry.package_list());
    let mut dev_packages = ui_entry.dev_package_list();
    dev_packages.extend(state_entry.dev_package_list());

    let installed = if project.preferences.auto_install && !args.skip_install {
        let spinner = cliclack::spinner();
        spinner.start(format!("Running {}...", pm.install_command()));
        match pm.install_all(&project_dir).await {
            Ok(()) => spinner.stop("Template dependencies installed"),
            Err(e) => {
                spinner.error("Dependency installation failed");
                return Err(e.into());
            }
        }
        install_packages(pm, &project_dir, &packages, &dev_packages).await?;
        true
    } else {
        cliclack::log::info("Skipping dependency installation")?;
        false
    };

    print_next_steps(&next_steps(&ctx.cwd, &project_dir, pm, installed))?;
    Ok(())
}

/// `--directory` (relative to `cwd`) or `./<name>`
fn target_dir(cwd: &Path, name: &str, directory: Option<&Path>) -> PathBuf {
    match directory {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => cwd.join(dir),
        None => cwd.join(name),
    }
}

fn select_template<'r>(
    registry: &'r TemplateRegistry,
    args: &InitArgs,
    configured_default: &str,
) -> Result<&'r TemplateInfo> {
    if let Some(name) = &args.template {
        return Ok(registry.require(name)?);
    }

    let fallback = registry
        .lookup(configured_default)
        .or_else(|| registry.list_all().first())
        .ok_or_else(|| anyhow::anyhow!("No templates found."))?;

    if args.yes || registry.list_all().len() == 1 {
        cliclack::log::info(format!(
            "Using template: {} - {}",
            fallback.manifest.title(),
            fallback.manifest.description
        ))?;
        return Ok(fallback);
    }

    let mut select = cliclack::select("Select a template");
    for category in registry.categories() {
        for template in registry.by_category(category) {
            select = select.item(
                template.manifest.name.clone(),
                format!("{} ({})", template.manifest.title(), category),
                format!("{} · {}", template.manifest.description, template.manifest.complexity),
            );
        }
    }
    let chosen: String = select.initial_value(fallback.manifest.name.clone()).interact()?;
    Ok(registry.require(&chosen)?)
}

fn next_steps(cwd: &Path, project_dir: &Path, pm: PackageManager, installed: bool) -> Vec<String> {
    let mut steps = Vec::new();
    if cwd != project_dir {
        let shown = project_dir.strip_prefix(cwd).unwrap_or(project_dir);
        steps.push(format!("cd {}", shown.display()));
    }
    if !installed {
        steps.push(pm.install_command().to_string());
    }
    steps.push(pm.run_command("start"));
    steps.push("expo-genie add".to_string());
    steps
}

fn print_next_steps(steps: &[String]) -> Result<()> {
    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy coding!")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_dir() {
        let cwd = Path::new("/work");
        assert_eq!(target_dir(cwd, "demo", None), PathBuf::from("/work/demo"));
        assert_eq!(
            target_dir(cwd, "demo", Some(Path::new("apps/mobile"))),
            PathBuf::from("/work/apps/mobile")
        );
        assert_eq!(
            target_dir(cwd, "demo", Some(Path::new("/tmp/x"))),
            PathBuf::from("/tmp/x")
        );
    }

    #[test]
    fn test_next_steps() {
        let steps = next_steps(Path::new("/work"), Path::new("/work/demo"), PackageManager::Yarn, false);
        assert_eq!(steps, vec!["cd demo", "yarn", "yarn start", "expo-genie add"]);

        let steps = next_steps(Path::new("/work/demo"), Path::new("/work/demo"), PackageManager::Npm, true);
        assert_eq!(steps, vec!["npm run start", "expo-genie add"]);
    }
}
