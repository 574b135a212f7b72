//! User-scoped configuration (`~/.expo-genie/config.json`) and the command lock

use crate::error::GenieError;
use crate::package_manager::PackageManager;
use crate::paths;
use crate::stack::{StateManagement, UiLibrary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Maximum number of entries kept in `recentProjects`
pub const MAX_RECENT_PROJECTS: usize = 10;

/// A lock older than this is assumed to belong to a dead process
pub const STALE_LOCK_AFTER: Duration = Duration::from_secs(10 * 60);

fn default_template() -> String {
    "blank".to_string()
}

fn default_ui_library() -> UiLibrary {
    UiLibrary::Nativewind
}

fn default_state_management() -> StateManagement {
    StateManagement::Zustand
}

fn default_true() -> bool {
    true
}

/// Defaults applied to new projects, plus the recent project list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalConfig {
    #[serde(default = "default_template")]
    pub default_template: String,
    #[serde(default)]
    pub default_package_manager: PackageManager,
    #[serde(rename = "defaultUILibrary", default = "default_ui_library")]
    pub default_ui_library: UiLibrary,
    #[serde(default = "default_state_management")]
    pub default_state_management: StateManagement,
    #[serde(default = "default_true")]
    pub auto_install: bool,
    #[serde(default)]
    pub git_commit: bool,
    #[serde(default)]
    pub dark_mode: bool,
    /// Absolute project paths, most recent first
    #[serde(default)]
    pub recent_projects: Vec<String>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            default_template: default_template(),
            default_package_manager: PackageManager::Npm,
            default_ui_library: default_ui_library(),
            default_state_management: default_state_management(),
            auto_install: true,
            git_commit: false,
            dark_mode: false,
            recent_projects: Vec::new(),
        }
    }
}

impl GlobalConfig {
    /// Move `path` to the front of the recent list, dropping duplicates and the overflow
    pub fn add_recent_project(&mut self, path: &str) {
        self.recent_projects.retain(|existing| existing != path);
        self.recent_projects.insert(0, path.to_string());
        self.recent_projects.truncate(MAX_RECENT_PROJECTS);
    }

    /// Read a setting as display text
    pub fn get(&self, key: ConfigKey) -> String {
        match key {
            ConfigKey::DefaultTemplate => self.default_template.clone(),
            ConfigKey::DefaultPackageManager => self.default_package_manager.to_string(),
            ConfigKey::DefaultUiLibrary => self.default_ui_library.to_string(),
            ConfigKey::DefaultStateManagement => self.default_state_management.to_string(),
            ConfigKey::AutoInstall => self.auto_install.to_string(),
            ConfigKey::GitCommit => self.git_commit.to_string(),
            ConfigKey::DarkMode => self.dark_mode.to_string(),
        }
    }

    /// Parse and apply a setting
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<(), GenieError> {
        match key {
            ConfigKey::DefaultTemplate => {
                if value.trim().is_empty() {
                    return Err(GenieError::InvalidName {
                        name: value.to_string(),
                        reason: "template name cannot be empty",
                    });
                }
                self.default_template = value.trim().to_string();
            }
            ConfigKey::DefaultPackageManager => self.default_package_manager = value.parse()?,
            ConfigKey::DefaultUiLibrary => self.default_ui_library = value.parse()?,
            ConfigKey::DefaultStateManagement => self.default_state_management = value.parse()?,
            ConfigKey::AutoInstall => self.auto_install = parse_bool(value)?,
            ConfigKey::GitCommit => self.git_commit = parse_bool(value)?,
            ConfigKey::DarkMode => self.dark_mode = parse_bool(value)?,
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Result<bool, GenieError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(GenieError::not_found("boolean", value, ["true", "false"])),
    }
}

/// Settable keys of the global config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    DefaultTemplate,
    DefaultPackageManager,
    DefaultUiLibrary,
    DefaultStateManagement,
    AutoInstall,
    GitCommit,
    DarkMode,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 7] = [
        ConfigKey::DefaultTemplate,
        ConfigKey::DefaultPackageManager,
        ConfigKey::DefaultUiLibrary,
        ConfigKey::DefaultStateManagement,
        ConfigKey::AutoInstall,
        ConfigKey::GitCommit,
        ConfigKey::DarkMode,
    ];

    /// Key as it appears in config.json
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::DefaultTemplate => "defaultTemplate",
            ConfigKey::DefaultPackageManager => "defaultPackageManager",
            ConfigKey::DefaultUiLibrary => "defaultUILibrary",
            ConfigKey::DefaultStateManagement => "defaultStateManagement",
            ConfigKey::AutoInstall => "autoInstall",
            ConfigKey::GitCommit => "gitCommit",
            ConfigKey::DarkMode => "darkMode",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = GenieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                GenieError::not_found("config key", s, ConfigKey::ALL.iter().map(|k| k.as_str()))
            })
    }
}

/// Access to the files under the genie home directory
#[derive(Debug, Clone)]
pub struct GlobalStore {
    home: PathBuf,
}

impl GlobalStore {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Store rooted at `$EXPO_GENIE_HOME` or `~/.expo-genie`
    pub fn open_default() -> Self {
        Self::new(paths::genie_home())
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn config_path(&self) -> PathBuf {
        paths::config_path(&self.home)
    }

    pub fn lock_path(&self) -> PathBuf {
        paths::lock_path(&self.home)
    }

    /// Load the config; built-in defaults when the file does not exist (nothing is written)
    pub async fn load(&self) -> Result<GlobalConfig, GenieError> {
        let path = self.config_path();
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(GlobalConfig::default());
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content).map_err(|source| GenieError::ConfigParse { path, source })
    }

    pub async fn save(&self, config: &GlobalConfig) -> Result<(), GenieError> {
        tokio::fs::create_dir_all(&self.home).await?;
        let mut content = serde_json::to_string_pretty(config)?;
        content.push('\n');
        tokio::fs::write(self.config_path(), content).await?;
        tracing::debug!(path = %self.config_path().display(), "saved global config");
        Ok(())
    }

    /// Overwrite the config with built-in defaults, keeping the recent project list
    pub async fn reset(&self) -> Result<GlobalConfig, GenieError> {
        let recent = match self.load().await {
            Ok(config) => config.recent_projects,
            Err(GenieError::ConfigParse { .. }) => Vec::new(),
            Err(e) => return Err(e),
        };
        let config = GlobalConfig {
            recent_projects: recent,
            ..GlobalConfig::default()
        };
        self.save(&config).await?;
        Ok(config)
    }

    /// Record a project as most recently used
    pub async fn add_recent_project(&self, project: &Path) -> Result<(), GenieError> {
        let mut config = self.load().await?;
        config.add_recent_project(&project.to_string_lossy());
        self.save(&config).await
    }

    /// Create the lock file if absent. Returns false when another holder owns it.
    pub fn create_lock(&self) -> Result<bool, GenieError> {
        std::fs::create_dir_all(&self.home)?;
        let path = self.lock_path();
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                write!(file, "{}", Utc::now().timestamp_millis())?;
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove the lock file (no-op when absent)
    pub fn release_lock(&self) -> Result<(), GenieError> {
        match std::fs::remove_file(self.lock_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.lock_path().exists()
    }

    /// When the current lock was taken, if it exists and is readable
    pub fn lock_acquired_at(&self) -> Option<DateTime<Utc>> {
        let content = std::fs::read_to_string(self.lock_path()).ok()?;
        let millis: i64 = content.trim().parse().ok()?;
        DateTime::<Utc>::from_timestamp_millis(millis)
    }

    /// How long the current lock has been held. Falls back to the file's
    /// modification time when its timestamp is missing or unreadable.
    fn lock_age(&self) -> Option<Duration> {
        if let Some(since) = self.lock_acquired_at() {
            return Some(Utc::now().signed_duration_since(since).to_std().unwrap_or_default());
        }
        std::fs::metadata(self.lock_path()).ok()?.modified().ok()?.elapsed().ok()
    }

    /// Acquire the lock for the duration of a mutating command.
    ///
    /// A lock older than [`STALE_LOCK_AFTER`] is reclaimed. A lock with no
    /// readable timestamp is aged by its modification time, so a holder still
    /// writing it is not mistaken for a dead one.
    pub fn acquire(&self) -> Result<LockGuard, GenieError> {
        if self.create_lock()? {
            return Ok(LockGuard::new(self.lock_path()));
        }

        let stale = match self.lock_age() {
            Some(age) => age > STALE_LOCK_AFTER,
            None => !self.is_locked(),
        };

        if stale {
            tracing::warn!(path = %self.lock_path().display(), "reclaiming stale lock");
            self.release_lock()?;
            if self.create_lock()? {
                return Ok(LockGuard::new(self.lock_path()));
            }
        }

        Err(GenieError::Locked {
            path: self.lock_path(),
            since: self
                .lock_acquired_at()
                .map(|since| since.to_rfc3339())
                .unwrap_or_else(|| "an unknown time".to_string()),
        })
    }
}

/// Removes the lock file when dropped
#[derive(Debug)]
pub struct LockGuard {
    path: PathBuf,
}

impl LockGuard {
    fn new(path: PathBuf) -> Self {
        tracing::debug!(path = %path.display(), "lock acquired");
        Self { path }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
        tracing::debug!(path = %self.path.display(), "lock released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_projects_move_to_front() {
        let mut config = GlobalConfig::default();
        config.add_recent_project("/a");
        config.add_recent_project("/b");
        config.add_recent_project("/a");

        assert_eq!(config.recent_projects, vec!["/a", "/b"]);
    }

    #[test]
    fn test_recent_projects_capped() {
        let mut config = GlobalConfig::default();
        for i in 0..11 {
            config.add_recent_project(&format!("/p{}", i));
        }

        assert_eq!(config.recent_projects.len(), MAX_RECENT_PROJECTS);
        assert_eq!(config.recent_projects[0], "/p10");
        assert!(!config.recent_projects.contains(&"/p0".to_string()));
    }

    #[test]
    fn test_ui_library_key_spelling() {
        let value = serde_json::to_value(GlobalConfig::default()).unwrap();
        assert_eq!(value["defaultUILibrary"], "nativewind");
        assert_eq!(value["defaultPackageManager"], "npm");
        assert_eq!(value["recentProjects"], serde_json::json!([]));
    }

    #[test]
    fn test_set_and_get_keys() {
        let mut config = GlobalConfig::default();
        config.set("defaultUILibrary".parse().unwrap(), "paper").unwrap();
        config.set(ConfigKey::AutoInstall, "no").unwrap();
        config.set(ConfigKey::DefaultPackageManager, "pnpm").unwrap();

        assert_eq!(config.get(ConfigKey::DefaultUiLibrary), "paper");
        assert_eq!(config.get(ConfigKey::AutoInstall), "false");
        assert_eq!(config.default_package_manager, PackageManager::Pnpm);
        assert!(config.set(ConfigKey::DarkMode, "maybe").is_err());
        assert!("colour".parse::<ConfigKey>().is_err());
    }

    #[tokio::test]
    async fn test_missing_file_yields_defaults_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let store = GlobalStore::new(dir.path().join("home"));

        assert_eq!(store.load().await.unwrap(), GlobalConfig::default());
        assert!(!store.config_path().exists());
    }

    #[tokio::test]
    async fn test_round_trip_and_recent_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let store = GlobalStore::new(dir.path());
        let mut config = GlobalConfig {
            default_template: "tabs".to_string(),
            default_package_manager: PackageManager::Pnpm,
            default_ui_library: UiLibrary::Tamagui,
            default_state_management: StateManagement::Redux,
            auto_install: false,
            git_commit: true,
            dark_mode: true,
            recent_projects: vec!["/work/old".to_string()],
        };
        assert_ne!(config, GlobalConfig::default());
        store.save(&config).await.unwrap();
        assert_eq!(store.load().await.unwrap(), config);

        store.add_recent_project(Path::new("/work/demo")).await.unwrap();
        store.add_recent_project(Path::new("/work/demo")).await.unwrap();

        config.recent_projects = vec!["/work/demo".to_string(), "/work/old".to_string()];
        assert_eq!(store.load().await.unwrap(), config);
    }

    #[tokio::test]
    async fn test_reset_keeps_recent_projects() {
        let dir = tempfile::tempdir().unwrap();
        let store = GlobalStore::new(dir.path());
        let mut config = GlobalConfig::default();
        config.git_commit = true;
        config.add_recent_project("/x");
        store.save(&config).await.unwrap();

        let reset = store.reset().await.unwrap();
        assert!(!reset.git_commit);
        assert_eq!(reset.recent_projects, vec!["/x"]);
    }

    #[tokio::test]
    async fn test_corrupt_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = GlobalStore::new(dir.path());
        std::fs::write(store.config_path(), "{oops").unwrap();
        assert!(matches!(
            store.load().await,
            Err(GenieError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_lock_primitives() {
        let dir = tempfile::tempdir().unwrap();
        let store = GlobalStore::new(dir.path());

        assert!(!store.is_locked());
        assert!(store.create_lock().unwrap());
        assert!(!store.create_lock().unwrap());
        assert!(store.is_locked());
        assert!(store.lock_acquired_at().is_some());

        store.release_lock().unwrap();
        assert!(!store.is_locked());
        store.release_lock().unwrap();
    }

    #[test]
    fn test_acquire_is_exclusive_and_released_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let store = GlobalStore::new(dir.path());

        let guard = store.acquire().unwrap();
        assert!(matches!(store.acquire(), Err(GenieError::Locked { .. })));
        drop(guard);

        assert!(!store.is_locked());
        assert!(store.acquire().is_ok());
    }

    #[test]
    fn test_stale_lock_is_reclaimed() {
        let dir = tempfile::tempdir().unwrap();
        let store = GlobalStore::new(dir.path());
        let old = Utc::now().timestamp_millis() - 11 * 60 * 1000;
        std::fs::write(store.lock_path(), old.to_string()).unwrap();

        let _guard = store.acquire().unwrap();
        let since = store.lock_acquired_at().unwrap();
        assert!(Utc::now().signed_duration_since(since).num_seconds() < 60);
    }

    #[test]
    fn test_lock_without_timestamp_ages_by_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let store = GlobalStore::new(dir.path());

        // Created but not yet written by its holder
        std::fs::write(store.lock_path(), "").unwrap();
        assert!(matches!(store.acquire(), Err(GenieError::Locked { .. })));
        assert!(store.is_locked());

        let old = std::time::SystemTime::now() - Duration::from_secs(11 * 60);
        std::fs::File::options()
            .write(true)
            .open(store.lock_path())
            .unwrap()
            .set_modified(old)
            .unwrap();

        let _guard = store.acquire().unwrap();
        assert!(store.lock_acquired_at().is_some());
    }
}
