//! `expo-genie info`: project summary and registry listings

use super::Context;
use crate::manifest::{self, ProjectManifest};
use crate::registry::{LibraryCategory, Registries, RegistryEntry};
use crate::templates;
use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

/// Documentation opened by `info --docs`
pub const DOCS_URL: &str = "https://github.com/expo-genie/expo-genie#readme";

#[derive(Args, Debug, Clone, Default)]
pub struct InfoArgs {
    /// List available features
    #[arg(long)]
    pub features: bool,

    /// List installable libraries by category
    #[arg(long)]
    pub libraries: bool,

    /// List available templates
    #[arg(long)]
    pub templates: bool,

    /// Local directory to list templates from (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Open the documentation in a browser
    #[arg(long)]
    pub docs: bool,
}

pub async fn run(args: InfoArgs, ctx: &Context) -> Result<()> {
    if args.docs {
        println!("Opening {}", DOCS_URL.cyan());
        open::that(DOCS_URL).with_context(|| format!("Failed to open {}", DOCS_URL))?;
        return Ok(());
    }

    let project = match manifest::find_project_root(&ctx.cwd).await {
        Some(root) => Some((root.clone(), manifest::require(&root).await?)),
        None => None,
    };
    let listing = args.features || args.libraries || args.templates;

    if !listing {
        match &project {
            Some((root, manifest)) => print_project(root, manifest),
            None => print_global(ctx).await?,
        }
        return Ok(());
    }

    if args.features {
        section("Features");
        for line in feature_lines(&ctx.registries, project.as_ref().map(|(_, m)| m)) {
            println!("{}", line);
        }
    }
    if args.libraries {
        print_libraries(&ctx.registries);
    }
    if args.templates {
        let registry = templates::resolve(args.template_dir.as_deref(), ctx.global.home()).await?;
        section("Templates");
        for category in registry.categories() {
            println!("  {}", category.bold());
            for template in registry.by_category(category) {
                println!(
                    "    {:<14} {} {}",
                    template.manifest.name.green(),
                    template.manifest.description,
                    format!("[{}]", template.manifest.complexity).dimmed()
                );
            }
        }
    }
    Ok(())
}

fn section(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
}

fn print_project(root: &std::path::Path, project: &ProjectManifest) {
    section(&project.project_name);
    let rows = [
        ("Path", root.display().to_string()),
        ("Template", project.template.clone().unwrap_or_else(|| "-".to_string())),
        ("UI library", project.ui_library.display_name().to_string()),
        ("State", project.state_management.display_name().to_string()),
        ("Package manager", project.preferences.package_manager.to_string()),
        (
            "Language",
            if project.preferences.typescript { "TypeScript" } else { "JavaScript" }.to_string(),
        ),
    ];
    for (label, value) in rows {
        println!("  {:<16} {}", label.dimmed(), value);
    }

    section("Features");
    if project.features.is_empty() {
        println!("  {}", "none (run `expo-genie add`)".dimmed());
    }
    for (name, record) in &project.features {
        let marker = if record.needs_regeneration(project.ui_library, project.state_management) {
            "needs regeneration".yellow()
        } else {
            "up to date".green()
        };
        println!(
            "  {:<12} {} files, {} deps, {}",
            name,
            record.files.len(),
            record.dependencies.len(),
            marker
        );
    }

    if !project.screens.is_empty() {
        section("Screens");
        for (name, screen) in &project.screens {
            println!("  {:<20} {:<10} {}", name, screen.kind, screen.file_path.dimmed());
        }
    }
    if !project.components.is_empty() {
        section("Components");
        for (name, component) in &project.components {
            println!("  {:<20} {:<10} {}", name, component.kind, component.file_path.dimmed());
        }
    }
}

async fn print_global(ctx: &Context) -> Result<()> {
    let config = ctx.global.load().await?;
    section("expo-genie");
    println!("  {:<16} {}", "Version".dimmed(), crate::CLI_VERSION);
    println!("  {:<16} {}", "Home".dimmed(), ctx.global.home().display());
    println!(
        "  {:<16} {} + {} with {}",
        "Defaults".dimmed(),
        config.default_ui_library,
        config.default_state_management,
        config.default_package_manager
    );

    section("Recent projects");
    if config.recent_projects.is_empty() {
        println!("  {}", "none".dimmed());
    }
    for path in &config.recent_projects {
        println!("  {}", path);
    }
    println!();
    println!("{}", "Not inside an expo-genie project. Run `expo-genie init` to create one.".dimmed());
    Ok(())
}

/// One line per registry feature, marking installed and stale ones
fn feature_lines(registries: &Registries, project: Option<&ProjectManifest>) -> Vec<String> {
    registries
        .features
        .list_all()
        .iter()
        .map(|feature| {
            let status = match project.and_then(|p| p.features.get(feature.key()).map(|r| (p, r))) {
                Some((p, record)) if record.needs_regeneration(p.ui_library, p.state_management) => {
                    "installed, needs regeneration".yellow().to_string()
                }
                Some(_) => "installed".green().to_string(),
                None => String::new(),
            };
            format!("  {:<10} {} {}", feature.key(), feature.description(), status)
                .trim_end()
                .to_string()
        })
        .collect()
}

fn print_libraries(registries: &Registries) {
    for category in LibraryCategory::ALL {
        let entries: Vec<_> = match category {
            LibraryCategory::Ui => registries.ui.list_all().iter().collect(),
            LibraryCategory::State => registries.state.list_all().iter().collect(),
            _ => registries.libraries_in(category),
        };
        if entries.is_empty() {
            continue;
        }
        section(category.display_name());
        for entry in entries {
            println!("  {:<18} {}", entry.key.green(), entry.description);
        }
    }
}
