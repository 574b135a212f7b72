//! Filesystem layout for expo-genie.
//!
//! ```text
//! ~/.expo-genie/
//! ├── config.json     # Global config
//! ├── .lock           # Advisory lock (epoch millis)
//! └── templates/      # Downloaded template cache
//!
//! <project>/
//! └── expo-genie.json # Project manifest (the managed-project marker)
//! ```
//!
//! No I/O happens here apart from reading environment overrides.

use std::path::{Path, PathBuf};

/// Project manifest file name
pub const MANIFEST_FILE: &str = "expo-genie.json";

/// Environment variable overriding the global directory
pub const HOME_ENV: &str = "EXPO_GENIE_HOME";

/// Environment variable pointing at a local template directory
pub const TEMPLATE_DIR_ENV: &str = "EXPO_GENIE_TEMPLATE_DIR";

/// Environment variable overriding the remote template base URL
pub const TEMPLATE_URL_ENV: &str = "EXPO_GENIE_TEMPLATE_URL";

/// Global directory: `$EXPO_GENIE_HOME` or `~/.expo-genie/`
pub fn genie_home() -> PathBuf {
    if let Ok(dir) = std::env::var(HOME_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".expo-genie")
}

/// Global config file inside a genie home
pub fn config_path(home: &Path) -> PathBuf {
    home.join("config.json")
}

/// Lock file inside a genie home
pub fn lock_path(home: &Path) -> PathBuf {
    home.join(".lock")
}

/// Downloaded template cache inside a genie home
pub fn template_cache(home: &Path) -> PathBuf {
    home.join("templates")
}

/// Manifest path for a project root
pub fn manifest_path(project: &Path) -> PathBuf {
    project.join(MANIFEST_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_home() {
        let home = Path::new("/home/dev/.expo-genie");
        assert_eq!(config_path(home), home.join("config.json"));
        assert_eq!(lock_path(home), home.join(".lock"));
        assert_eq!(template_cache(home), home.join("templates"));
    }

    #[test]
    fn test_manifest_lives_at_project_root() {
        let path = manifest_path(Path::new("/work/demo"));
        assert_eq!(path, PathBuf::from("/work/demo/expo-genie.json"));
    }
}
