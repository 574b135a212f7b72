//! `expo-genie clean`: remove caches and build output

use super::{cancelled, confirm, Context};
use crate::{fsutil, manifest, paths};
use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

/// Project-relative caches and build output removed by default
const PROJECT_CACHES: &[&str] = &[".expo", "node_modules/.cache", "dist", "web-build"];

#[derive(Args, Debug, Clone, Default)]
pub struct CleanArgs {
    /// Also remove node_modules and the downloaded template cache
    #[arg(long)]
    pub all: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

pub async fn run(args: CleanArgs, ctx: &Context) -> Result<()> {
    cliclack::intro("expo-genie clean")?;

    let root = manifest::find_project_root(&ctx.cwd).await;
    if root.is_none() && !args.all {
        return Err(crate::error::GenieError::NotManagedProject(ctx.cwd.clone()).into());
    }

    let candidates = targets(root.as_deref(), ctx.global.home(), args.all);
    let mut present = Vec::new();
    for path in candidates {
        if fsutil::exists(&path).await {
            let size = fsutil::dir_size(&path);
            present.push((path, size));
        }
    }

    if present.is_empty() {
        cliclack::outro("Nothing to clean")?;
        return Ok(());
    }

    for (path, size) in &present {
        cliclack::log::info(format!("{} ({})", path.display(), human_size(*size)))?;
    }
    let total: u64 = present.iter().map(|(_, size)| size).sum();
    if !confirm(&format!("Remove {} item(s), {}?", present.len(), human_size(total)), args.yes)? {
        return cancelled("Nothing removed.");
    }

    let _lock = ctx.lock()?;
    let spinner = cliclack::spinner();
    spinner.start("Cleaning...");
    for (path, _) in &present {
        if let Err(e) = fsutil::remove_path(path).await {
            spinner.error("Cleaning failed");
            return Err(e);
        }
    }
    spinner.stop(format!("Freed {}", human_size(total)));

    if args.all && root.is_some() {
        cliclack::log::remark("Run your package manager's install command before starting the app again")?;
    }
    cliclack::outro("Clean")?;
    Ok(())
}

/// Paths `clean` considers, whether or not they exist
fn targets(project: Option<&Path>, home: &Path, all: bool) -> Vec<PathBuf> {
    let mut targets = Vec::new();
    if let Some(root) = project {
        targets.extend(PROJECT_CACHES.iter().map(|dir| root.join(dir)));
        if all {
            targets.push(root.join("node_modules"));
        }
    }
    if all {
        targets.push(paths::template_cache(home));
    }
    targets
}

fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets() {
        let home = Path::new("/home/dev/.expo-genie");
        let project = Path::new("/work/demo");

        let default = targets(Some(project), home, false);
        assert!(default.contains(&project.join(".expo")));
        assert!(!default.contains(&project.join("node_modules")));

        let all = targets(Some(project), home, true);
        assert!(all.contains(&project.join("node_modules")));
        assert_eq!(all.last(), Some(&home.join("templates")));

        assert_eq!(targets(None, home, true), vec![home.join("templates")]);
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(1536), "1.5 KB");
        assert_eq!(human_size(5 * 1024 * 1024), "5.0 MB");
    }
}
