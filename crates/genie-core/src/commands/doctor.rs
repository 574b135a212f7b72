//! `expo-genie doctor`: environment and project health checks

use super::Context;
use crate::manifest::{self, ProjectManifest};
use crate::package_manager::PackageManager;
use crate::runtime::{self, RuntimeInfo, MIN_NODE_VERSION};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;

#[derive(Args, Debug, Clone, Default)]
pub struct DoctorArgs {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Pass,
    Warn,
    Fail,
}

#[derive(Debug, Clone)]
struct Check {
    status: Status,
    label: String,
    detail: String,
}

impl Check {
    fn new(status: Status, label: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            status,
            label: label.into(),
            detail: detail.into(),
        }
    }

    fn print(&self) {
        let symbol = match self.status {
            Status::Pass => "✓".green(),
            Status::Warn => "⚠".yellow(),
            Status::Fail => "✗".red(),
        };
        if self.detail.is_empty() {
            println!("  {} {}", symbol, self.label);
        } else {
            println!("  {} {} {}", symbol, self.label, self.detail.dimmed());
        }
    }
}

pub async fn run(_args: DoctorArgs, ctx: &Context) -> Result<()> {
    println!("{}", "expo-genie doctor".cyan().bold());
    println!();

    let mut checks = Vec::new();

    println!("{}", "Environment".bold());
    let mut environment = vec![node_check(&runtime::check_node())];
    let project_root = manifest::find_project_root(&ctx.cwd).await;
    let project_pm = project_root.as_deref().map(PackageManager::detect);
    for pm in PackageManager::ALL {
        environment.push(package_manager_check(&pm.probe(), project_pm == Some(pm)));
    }
    let watchman = runtime::check_watchman();
    environment.push(match watchman.version {
        Some(version) => Check::new(Status::Pass, "Watchman", version),
        None => Check::new(Status::Warn, "Watchman", "not installed (optional, speeds up Metro)"),
    });
    print_all(&environment);
    checks.extend(environment);

    println!();
    println!("{}", "expo-genie".bold());
    let global = vec![
        match ctx.global.load().await {
            Ok(_) => Check::new(Status::Pass, "Global config", ctx.global.config_path().display().to_string()),
            Err(e) => Check::new(Status::Fail, "Global config", e.to_string()),
        },
        if ctx.global.is_locked() {
            let since = ctx
                .global
                .lock_acquired_at()
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "unknown".to_string());
            Check::new(
                Status::Warn,
                "Lock held",
                format!("since {} ({})", since, ctx.global.lock_path().display()),
            )
        } else {
            Check::new(Status::Pass, "No command holds the lock", "")
        },
    ];
    print_all(&global);
    checks.extend(global);

    if let Some(root) = project_root {
        println!();
        println!("{} {}", "Project".bold(), root.display().to_string().dimmed());
        let project = match manifest::load(&root).await {
            Ok(Some(project)) => project_checks(&root, &project),
            Ok(None) => vec![Check::new(Status::Fail, "Manifest", "missing")],
            Err(e) => vec![Check::new(Status::Fail, "Manifest", e.to_string())],
        };
        print_all(&project);
        checks.extend(project);
    }

    println!();
    let failures = checks.iter().filter(|c| c.status == Status::Fail).count();
    let warnings = checks.iter().filter(|c| c.status == Status::Warn).count();
    if failures > 0 {
        anyhow::bail!("{} problem(s) found, {} warning(s)", failures, warnings);
    }
    println!("{} ({} warning(s))", "Everything looks good".green().bold(), warnings);
    Ok(())
}

fn print_all(checks: &[Check]) {
    for check in checks {
        check.print();
    }
}

fn node_check(node: &RuntimeInfo) -> Check {
    match &node.version {
        Some(version) if runtime::meets_minimum(version, MIN_NODE_VERSION) => {
            Check::new(Status::Pass, node.name, version.clone())
        }
        Some(version) => Check::new(
            Status::Fail,
            node.name,
            format!("{} is older than the required {}", version, MIN_NODE_VERSION),
        ),
        None => Check::new(Status::Fail, node.name, "not installed (https://nodejs.org)"),
    }
}

/// Missing package managers only matter when the project uses them
fn package_manager_check(info: &RuntimeInfo, used_by_project: bool) -> Check {
    match (&info.version, used_by_project) {
        (Some(version), _) => Check::new(Status::Pass, info.name, version.clone()),
        (None, true) => Check::new(Status::Fail, info.name, "not installed, but the project lockfile uses it"),
        (None, false) => Check::new(Status::Warn, info.name, "not installed"),
    }
}

fn project_checks(root: &Path, project: &ProjectManifest) -> Vec<Check> {
    let mut checks = vec![Check::new(
        Status::Pass,
        "Manifest",
        format!(
            "{} ({} + {})",
            project.project_name, project.ui_library, project.state_management
        ),
    )];

    if !root.join("package.json").exists() {
        checks.push(Check::new(Status::Fail, "package.json", "missing"));
    } else if !root.join("node_modules").exists() {
        checks.push(Check::new(
            Status::Warn,
            "node_modules",
            format!("missing, run {}", project.preferences.package_manager.install_command()),
        ));
    }

    let detected = PackageManager::detect(root);
    if root.join(detected.lockfile()).exists() && detected != project.preferences.package_manager {
        checks.push(Check::new(
            Status::Warn,
            "Package manager",
            format!(
                "manifest says {}, lockfile belongs to {}",
                project.preferences.package_manager, detected
            ),
        ));
    }

    for (name, record) in &project.features {
        let missing: Vec<&str> = record
            .files
            .iter()
            .filter(|file| !root.join(file.as_str()).exists())
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            checks.push(Check::new(
                Status::Warn,
                format!("Feature {}", name),
                format!("missing {}", missing.join(", ")),
            ));
        } else if record.needs_regeneration(project.ui_library, project.state_management) {
            checks.push(Check::new(
                Status::Warn,
                format!("Feature {}", name),
                format!(
                    "generated for {} + {}, run `expo-genie add {} --force`",
                    record.ui_library, record.state_management, name
                ),
            ));
        } else {
            checks.push(Check::new(Status::Pass, format!("Feature {}", name), ""));
        }
    }
    checks
}
