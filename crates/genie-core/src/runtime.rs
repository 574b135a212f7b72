//! Runtime detection for Node.js and other external tools

use semver::Version;
use std::process::Command;

/// Minimum Node.js version supported by current Expo SDKs
pub const MIN_NODE_VERSION: &str = "18.0.0";

/// Runtime detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

impl RuntimeInfo {
    fn missing(name: &'static str) -> Self {
        RuntimeInfo {
            name,
            version: None,
            available: false,
        }
    }
}

/// Run `<program> <version_flag>` and report whether it succeeded
pub fn probe(name: &'static str, program: &str, version_flag: &str) -> RuntimeInfo {
    let output = Command::new(program).arg(version_flag).output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            RuntimeInfo {
                name,
                version: Some(version),
                available: true,
            }
        }
        _ => {
            tracing::debug!(program, "runtime probe failed");
            RuntimeInfo::missing(name)
        }
    }
}

/// Check if Node.js is available
pub fn check_node() -> RuntimeInfo {
    probe("Node.js", "node", "--version")
}

/// Check if the Watchman file watcher is available (optional for Expo)
pub fn check_watchman() -> RuntimeInfo {
    probe("Watchman", "watchman", "--version")
}

/// Parse version output such as `v20.11.1` or `10.2.4`
pub fn parse_version(raw: &str) -> Option<Version> {
    let cleaned = raw.trim().strip_prefix('v').unwrap_or(raw.trim());
    let core = cleaned.split(['-', '+', ' ']).next().unwrap_or(cleaned);
    Version::parse(core).ok()
}

/// True when a reported version satisfies `minimum`. Unparseable versions pass.
pub fn meets_minimum(raw: &str, minimum: &str) -> bool {
    match (parse_version(raw), Version::parse(minimum)) {
        (Some(found), Ok(min)) => found >= min,
        _ => true,
    }
}
