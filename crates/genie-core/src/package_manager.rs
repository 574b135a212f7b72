//! Package manager detection and invocation (npm, yarn, pnpm, bun)

use crate::error::GenieError;
use crate::runtime::RuntimeInfo;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::str::FromStr;
use tokio::process::Command as TokioCommand;

/// Supported package managers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Yarn,
    Pnpm,
    Bun,
}

/// Lockfile → package manager, checked in order
const LOCKFILES: &[(&str, PackageManager)] = &[
    ("package-lock.json", PackageManager::Npm),
    ("yarn.lock", PackageManager::Yarn),
    ("pnpm-lock.yaml", PackageManager::Pnpm),
    ("bun.lockb", PackageManager::Bun),
];

impl PackageManager {
    pub const ALL: [PackageManager; 4] = [
        PackageManager::Npm,
        PackageManager::Yarn,
        PackageManager::Pnpm,
        PackageManager::Bun,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Bun => "bun",
        }
    }

    /// Lockfile written by this package manager
    pub fn lockfile(&self) -> &'static str {
        LOCKFILES
            .iter()
            .find(|(_, pm)| pm == self)
            .map(|(file, _)| *file)
            .unwrap_or("package-lock.json")
    }

    /// Detect the package manager of a project from its lockfile (defaults to npm)
    pub fn detect(project: &Path) -> PackageManager {
        LOCKFILES
            .iter()
            .find(|(file, _)| project.join(file).exists())
            .map(|(_, pm)| *pm)
            .unwrap_or_default()
    }

    fn program(&self) -> String {
        if cfg!(windows) && !matches!(self, PackageManager::Bun) {
            format!("{}.cmd", self.as_str())
        } else {
            self.as_str().to_string()
        }
    }

    /// Arguments for adding packages (`dev` selects devDependencies)
    pub fn add_args(&self, packages: &[String], dev: bool) -> Vec<String> {
        let mut args: Vec<String> = match (self, dev) {
            (PackageManager::Npm, false) => vec!["install".into()],
            (PackageManager::Npm, true) => vec!["install".into(), "--save-dev".into()],
            (PackageManager::Yarn | PackageManager::Pnpm, false) => vec!["add".into()],
            (PackageManager::Yarn | PackageManager::Pnpm, true) => {
                vec!["add".into(), "-D".into()]
            }
            (PackageManager::Bun, false) => vec!["add".into()],
            (PackageManager::Bun, true) => vec!["add".into(), "-d".into()],
        };
        args.extend(packages.iter().cloned());
        args
    }

    /// Command line for adding packages, e.g. `yarn add -D jest`
    pub fn add_command(&self, packages: &[String], dev: bool) -> String {
        let mut parts = vec![self.as_str().to_string()];
        parts.extend(self.add_args(packages, dev));
        parts.join(" ")
    }

    /// Command line for installing everything in package.json
    pub fn install_command(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm install",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm install",
            PackageManager::Bun => "bun install",
        }
    }

    /// Command line for running a package.json script
    pub fn run_command(&self, script: &str) -> String {
        match self {
            PackageManager::Npm => format!("npm run {}", script),
            PackageManager::Yarn => format!("yarn {}", script),
            PackageManager::Pnpm => format!("pnpm {}", script),
            PackageManager::Bun => format!("bun run {}", script),
        }
    }

    /// Probe `<pm> --version`
    pub fn probe(&self) -> RuntimeInfo {
        crate::runtime::probe(self.as_str(), &self.program(), "--version")
    }

    pub fn is_available(&self) -> bool {
        self.probe().available
    }

    /// Install every dependency listed in package.json
    pub async fn install_all(&self, project: &Path) -> Result<(), GenieError> {
        let args: Vec<String> = self
            .install_command()
            .split_whitespace()
            .skip(1)
            .map(str::to_string)
            .collect();
        self.exec(project, &args).await
    }

    /// Add packages to the project. A no-op for an empty list.
    pub async fn add(
        &self,
        project: &Path,
        packages: &[String],
        dev: bool,
    ) -> Result<(), GenieError> {
        if packages.is_empty() {
            return Ok(());
        }
        self.exec(project, &self.add_args(packages, dev)).await
    }

    async fn exec(&self, project: &Path, args: &[String]) -> Result<(), GenieError> {
        if !self.is_available() {
            return Err(GenieError::PackageManagerUnavailable(
                self.as_str().to_string(),
            ));
        }

        let command_line = format!("{} {}", self.as_str(), args.join(" "));
        tracing::info!(cwd = %project.display(), command = %command_line, "running package manager");

        let output = TokioCommand::new(self.program())
            .args(args)
            .current_dir(project)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let lines: Vec<&str> = stderr.lines().collect();
            for line in &lines[lines.len().saturating_sub(20)..] {
                tracing::warn!("{}", line);
            }
            Err(GenieError::CommandFailed {
                command: command_line,
                code: output.status.code().unwrap_or(-1),
            })
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageManager {
    type Err = GenieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PackageManager::ALL
            .into_iter()
            .find(|pm| pm.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                GenieError::not_found(
                    "package manager",
                    s,
                    PackageManager::ALL.iter().map(|pm| pm.as_str()),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkgs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_detect_defaults_to_npm() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(PackageManager::detect(dir.path()), PackageManager::Npm);
    }

    #[test]
    fn test_detect_from_lockfile() {
        for (lockfile, expected) in [
            ("yarn.lock", PackageManager::Yarn),
            ("pnpm-lock.yaml", PackageManager::Pnpm),
            ("bun.lockb", PackageManager::Bun),
            ("package-lock.json", PackageManager::Npm),
        ] {
            let dir = tempfile::tempdir().unwrap();
            std::fs::write(dir.path().join(lockfile), "").unwrap();
            assert_eq!(PackageManager::detect(dir.path()), expected);
        }
    }

    #[test]
    fn test_add_command_strings() {
        let list = pkgs(&["expo-camera", "expo-media-library"]);
        assert_eq!(
            PackageManager::Npm.add_command(&list, false),
            "npm install expo-camera expo-media-library"
        );
        assert_eq!(
            PackageManager::Yarn.add_command(&pkgs(&["jest"]), true),
            "yarn add -D jest"
        );
        assert_eq!(
            PackageManager::Bun.add_command(&pkgs(&["jest"]), true),
            "bun add -d jest"
        );
    }

    #[test]
    fn test_run_command_strings() {
        assert_eq!(PackageManager::Npm.run_command("start"), "npm run start");
        assert_eq!(PackageManager::Pnpm.run_command("start"), "pnpm start");
        assert_eq!(PackageManager::Bun.run_command("ios"), "bun run ios");
    }

    #[test]
    fn test_lockfile_roundtrip_with_detect() {
        for pm in PackageManager::ALL {
            assert!(!pm.lockfile().is_empty());
            assert_eq!(pm.to_string().parse::<PackageManager>().unwrap(), pm);
        }
    }

    #[tokio::test]
    async fn test_add_with_no_packages_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        PackageManager::Npm.add(dir.path(), &[], false).await.unwrap();
    }
}
