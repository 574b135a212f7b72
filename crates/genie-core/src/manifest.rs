//! Project manifest (`expo-genie.json`) types and store
//!
//! The manifest records the project's stack choices plus everything expo-genie
//! has written into the project: features, screens and components. Its
//! presence at a directory is the only signal that the directory is a managed
//! project.
//!
//! Every mutation is a full read-modify-write of the document. Mutations
//! against a directory without a manifest are silent no-ops; commands gate on
//! [`is_managed_project`] (or [`require`]) before mutating.

use crate::error::GenieError;
use crate::fsutil;
use crate::package_manager::PackageManager;
use crate::paths;
use crate::stack::{StateManagement, UiLibrary};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Manifest schema version written by this CLI
pub const MANIFEST_VERSION: &str = "1.0.0";

/// Version stamped on feature records generated by this CLI
pub const FEATURE_VERSION: &str = "1.0.0";

/// Current time as an ISO-8601 UTC timestamp with millisecond precision
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn default_true() -> bool {
    true
}

/// Project-level preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub package_manager: PackageManager,
    #[serde(default = "default_true")]
    pub auto_install: bool,
    #[serde(default)]
    pub git_commit: bool,
    #[serde(default = "default_true")]
    pub typescript: bool,
    #[serde(default)]
    pub dark_mode: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            package_manager: PackageManager::Npm,
            auto_install: true,
            git_commit: false,
            typescript: true,
            dark_mode: false,
        }
    }
}

/// An installed feature and the stack it was generated against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRecord {
    pub enabled: bool,
    pub version: String,
    pub installed_at: String,
    pub ui_library: UiLibrary,
    pub state_management: StateManagement,
    /// Project-relative paths written by the feature generator
    #[serde(default)]
    pub files: Vec<String>,
    /// Packages installed for the feature
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl FeatureRecord {
    /// Record a feature generated now against the given stack
    pub fn new(
        ui_library: UiLibrary,
        state_management: StateManagement,
        files: Vec<String>,
        dependencies: Vec<String>,
    ) -> Self {
        Self {
            enabled: true,
            version: FEATURE_VERSION.to_string(),
            installed_at: timestamp(),
            ui_library,
            state_management,
            files,
            dependencies,
        }
    }

    /// True when the project's stack has moved on since this feature was generated
    pub fn needs_regeneration(&self, ui_library: UiLibrary, state_management: StateManagement) -> bool {
        self.ui_library != ui_library || self.state_management != state_management
    }
}

/// A generated screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub ui_library: UiLibrary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_management: Option<StateManagement>,
    pub created_at: String,
    pub file_path: String,
}

/// A generated component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub ui_library: UiLibrary,
    pub created_at: String,
    pub file_path: String,
}

/// The per-project manifest document
///
/// Identity fields (`version`, `projectName`, `uiLibrary`, `stateManagement`)
/// are required on load; the collections and preferences fall back to their
/// defaults when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectManifest {
    pub version: String,
    pub project_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    pub ui_library: UiLibrary,
    pub state_management: StateManagement,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub features: BTreeMap<String, FeatureRecord>,
    #[serde(default)]
    pub screens: BTreeMap<String, ScreenRecord>,
    #[serde(default)]
    pub components: BTreeMap<String, ComponentRecord>,
}

impl ProjectManifest {
    /// A fresh manifest with empty collections and default preferences
    pub fn new_default(
        name: &str,
        template: Option<&str>,
        ui_library: UiLibrary,
        state_management: StateManagement,
        package_manager: PackageManager,
    ) -> Self {
        Self {
            version: MANIFEST_VERSION.to_string(),
            project_name: name.to_string(),
            template: template.map(str::to_string),
            ui_library,
            state_management,
            preferences: Preferences {
                package_manager,
                ..Preferences::default()
            },
            features: BTreeMap::new(),
            screens: BTreeMap::new(),
            components: BTreeMap::new(),
        }
    }

    /// Whether `feature` is installed but was generated against another stack
    pub fn needs_regeneration(&self, feature: &str) -> bool {
        self.features
            .get(feature)
            .is_some_and(|record| record.needs_regeneration(self.ui_library, self.state_management))
    }

    /// First recorded file path that is not a plain project-relative path
    pub fn escaping_path(&self) -> Option<&str> {
        let features = self.features.values().flat_map(|f| f.files.iter().map(String::as_str));
        let screens = self.screens.values().map(|s| s.file_path.as_str());
        let components = self.components.values().map(|c| c.file_path.as_str());
        features
            .chain(screens)
            .chain(components)
            .find(|path| !fsutil::is_contained(path))
    }

    /// Installed features whose snapshot diverges from the current stack
    pub fn stale_features(&self) -> Vec<&str> {
        self.features
            .iter()
            .filter(|(_, record)| record.needs_regeneration(self.ui_library, self.state_management))
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Read the manifest of a project. `Ok(None)` when the file does not exist.
pub async fn load(project: &Path) -> Result<Option<ProjectManifest>, GenieError> {
    let path = paths::manifest_path(project);
    let content = match fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let manifest: ProjectManifest = match serde_json::from_str(&content) {
        Ok(manifest) => manifest,
        Err(source) => return Err(GenieError::ManifestParse { path, source }),
    };
    if let Some(entry) = manifest.escaping_path() {
        return Err(GenieError::ManifestUnsafePath {
            path_entry: entry.to_string(),
            path,
        });
    }
    Ok(Some(manifest))
}

/// Load the manifest or fail with a "not a managed project" error
pub async fn require(project: &Path) -> Result<ProjectManifest, GenieError> {
    load(project)
        .await?
        .ok_or_else(|| GenieError::NotManagedProject(project.to_path_buf()))
}

/// Overwrite the manifest with a pretty-printed (2-space) JSON document
pub async fn save(project: &Path, manifest: &ProjectManifest) -> Result<(), GenieError> {
    let path = paths::manifest_path(project);
    let mut content = serde_json::to_string_pretty(manifest)?;
    content.push('\n');
    fs::write(&path, content).await?;
    tracing::debug!(path = %path.display(), "saved manifest");
    Ok(())
}

/// A directory is managed when it holds a manifest file; content is not inspected
pub async fn is_managed_project(project: &Path) -> bool {
    fs::try_exists(paths::manifest_path(project))
        .await
        .unwrap_or(false)
}

/// Nearest directory at or above `start` that holds a manifest
pub async fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if is_managed_project(dir).await {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

/// Load, apply `change`, save. Returns false (and writes nothing) when there is no manifest.
async fn update<F>(project: &Path, change: F) -> Result<bool, GenieError>
where
    F: FnOnce(&mut ProjectManifest),
{
    let Some(mut manifest) = load(project).await? else {
        tracing::debug!(project = %project.display(), "no manifest, skipping update");
        return Ok(false);
    };
    change(&mut manifest);
    save(project, &manifest).await?;
    Ok(true)
}

/// Set `features[name]`, replacing any previous record wholesale
pub async fn add_feature(project: &Path, name: &str, record: FeatureRecord) -> Result<(), GenieError> {
    update(project, |manifest| {
        manifest.features.insert(name.to_string(), record);
    })
    .await
    .map(|_| ())
}

/// Set `screens[name]`, replacing any previous record wholesale
pub async fn add_screen(project: &Path, name: &str, record: ScreenRecord) -> Result<(), GenieError> {
    update(project, |manifest| {
        manifest.screens.insert(name.to_string(), record);
    })
    .await
    .map(|_| ())
}

/// Set `components[name]`, replacing any previous record wholesale
pub async fn add_component(
    project: &Path,
    name: &str,
    record: ComponentRecord,
) -> Result<(), GenieError> {
    update(project, |manifest| {
        manifest.components.insert(name.to_string(), record);
    })
    .await
    .map(|_| ())
}

/// Drop a feature record; absent names are ignored
pub async fn remove_feature(project: &Path, name: &str) -> Result<(), GenieError> {
    update(project, |manifest| {
        manifest.features.remove(name);
    })
    .await
    .map(|_| ())
}

/// Change the project-wide UI library. Existing records keep their snapshot.
pub async fn update_ui_library(project: &Path, library: UiLibrary) -> Result<(), GenieError> {
    update(project, |manifest| manifest.ui_library = library)
        .await
        .map(|_| ())
}

/// Change the project-wide state library. Existing records keep their snapshot.
pub async fn update_state_management(
    project: &Path,
    library: StateManagement,
) -> Result<(), GenieError> {
    update(project, |manifest| manifest.state_management = library)
        .await
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo() -> ProjectManifest {
        ProjectManifest::new_default(
            "demo",
            Some("blank"),
            UiLibrary::Nativewind,
            StateManagement::Zustand,
            PackageManager::Npm,
        )
    }

    fn record(ui: UiLibrary, files: &[&str]) -> FeatureRecord {
        FeatureRecord {
            enabled: true,
            version: "1.0.0".to_string(),
            installed_at: "2024-05-01T10:00:00.000Z".to_string(),
            ui_library: ui,
            state_management: StateManagement::Zustand,
            files: files.iter().map(|f| f.to_string()).collect(),
            dependencies: vec!["expo-camera".to_string()],
        }
    }

    #[test]
    fn test_default_preferences() {
        let manifest = demo();
        assert!(manifest.preferences.typescript);
        assert!(manifest.preferences.auto_install);
        assert!(!manifest.preferences.git_commit);
        assert!(!manifest.preferences.dark_mode);
        assert!(manifest.features.is_empty());
        assert_eq!(manifest.version, MANIFEST_VERSION);
    }

    #[test]
    fn test_serialized_field_names() {
        let mut manifest = demo();
        manifest.screens.insert(
            "Profile".to_string(),
            ScreenRecord {
                kind: "detail".to_string(),
                ui_library: UiLibrary::Nativewind,
                state_management: Some(StateManagement::Zustand),
                created_at: timestamp(),
                file_path: "src/screens/Profile.tsx".to_string(),
            },
        );
        let value = serde_json::to_value(&manifest).unwrap();

        assert_eq!(value["projectName"], "demo");
        assert_eq!(value["uiLibrary"], "nativewind");
        assert_eq!(value["stateManagement"], "zustand");
        assert_eq!(value["preferences"]["packageManager"], "npm");
        assert_eq!(value["preferences"]["autoInstall"], true);
        assert_eq!(value["screens"]["Profile"]["type"], "detail");
        assert_eq!(value["screens"]["Profile"]["filePath"], "src/screens/Profile.tsx");
    }

    #[tokio::test]
    async fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut manifest = demo();
        manifest
            .features
            .insert("camera".to_string(), record(UiLibrary::Paper, &["a.tsx"]));
        manifest.components.insert(
            "PrimaryButton".to_string(),
            ComponentRecord {
                kind: "button".to_string(),
                ui_library: UiLibrary::Nativewind,
                created_at: timestamp(),
                file_path: "src/components/PrimaryButton.tsx".to_string(),
            },
        );

        save(dir.path(), &manifest).await.unwrap();
        let loaded = load(dir.path()).await.unwrap().unwrap();
        assert_eq!(loaded, manifest);
    }

    #[tokio::test]
    async fn test_saved_file_is_two_space_indented() {
        let dir = tempfile::tempdir().unwrap();
        save(dir.path(), &demo()).await.unwrap();
        let text = std::fs::read_to_string(paths::manifest_path(dir.path())).unwrap();
        assert!(text.starts_with("{\n  \"version\": \"1.0.0\""));
        assert!(text.ends_with("}\n"));
    }

    #[tokio::test]
    async fn test_managed_project_marker() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_managed_project(dir.path()).await);
        assert!(load(dir.path()).await.unwrap().is_none());

        save(dir.path(), &demo()).await.unwrap();
        assert!(is_managed_project(dir.path()).await);
    }

    #[tokio::test]
    async fn test_marker_ignores_content() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(paths::manifest_path(dir.path()), "not json").unwrap();
        assert!(is_managed_project(dir.path()).await);
        assert!(matches!(
            load(dir.path()).await,
            Err(GenieError::ManifestParse { .. })
        ));
    }

    #[tokio::test]
    async fn test_add_feature_replaces_record() {
        let dir = tempfile::tempdir().unwrap();
        save(dir.path(), &demo()).await.unwrap();

        let first = record(UiLibrary::Paper, &["one.tsx", "two.tsx"]);
        let mut second = record(UiLibrary::Nativewind, &["three.tsx"]);
        second.dependencies.clear();

        add_feature(dir.path(), "auth", first).await.unwrap();
        add_feature(dir.path(), "auth", second.clone()).await.unwrap();

        let loaded = load(dir.path()).await.unwrap().unwrap();
        assert_eq!(loaded.features["auth"], second);
    }

    #[tokio::test]
    async fn test_mutations_without_manifest_write_nothing() {
        let dir = tempfile::tempdir().unwrap();

        add_feature(dir.path(), "auth", record(UiLibrary::Paper, &[]))
            .await
            .unwrap();
        add_screen(
            dir.path(),
            "Home",
            ScreenRecord {
                kind: "blank".to_string(),
                ui_library: UiLibrary::None,
                state_management: None,
                created_at: timestamp(),
                file_path: "src/screens/Home.tsx".to_string(),
            },
        )
        .await
        .unwrap();
        add_component(
            dir.path(),
            "Card",
            ComponentRecord {
                kind: "card".to_string(),
                ui_library: UiLibrary::None,
                created_at: timestamp(),
                file_path: "src/components/Card.tsx".to_string(),
            },
        )
        .await
        .unwrap();
        update_ui_library(dir.path(), UiLibrary::Paper).await.unwrap();

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_remove_feature() {
        let dir = tempfile::tempdir().unwrap();
        save(dir.path(), &demo()).await.unwrap();
        add_feature(dir.path(), "maps", record(UiLibrary::Nativewind, &[]))
            .await
            .unwrap();

        remove_feature(dir.path(), "maps").await.unwrap();
        remove_feature(dir.path(), "never-installed").await.unwrap();

        assert!(load(dir.path()).await.unwrap().unwrap().features.is_empty());
    }

    #[tokio::test]
    async fn test_update_ui_library_leaves_records_stale() {
        let dir = tempfile::tempdir().unwrap();
        save(dir.path(), &demo()).await.unwrap();
        add_feature(dir.path(), "chat", record(UiLibrary::Nativewind, &[]))
            .await
            .unwrap();

        update_ui_library(dir.path(), UiLibrary::Paper).await.unwrap();
        update_state_management(dir.path(), StateManagement::Redux)
            .await
            .unwrap();

        let loaded = load(dir.path()).await.unwrap().unwrap();
        assert_eq!(loaded.ui_library, UiLibrary::Paper);
        assert_eq!(loaded.state_management, StateManagement::Redux);
        assert_eq!(loaded.features["chat"].ui_library, UiLibrary::Nativewind);
        assert_eq!(loaded.stale_features(), vec!["chat"]);
    }

    #[test]
    fn test_needs_regeneration_predicate() {
        let mut manifest = demo();
        manifest
            .features
            .insert("auth".to_string(), record(UiLibrary::Paper, &[]));
        assert!(manifest.needs_regeneration("auth"));

        manifest
            .features
            .insert("auth".to_string(), record(UiLibrary::Nativewind, &[]));
        assert!(!manifest.needs_regeneration("auth"));
        assert!(!manifest.needs_regeneration("payments"));
    }

    #[tokio::test]
    async fn test_missing_identity_field_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            paths::manifest_path(dir.path()),
            r#"{"version":"1.0.0","uiLibrary":"paper","stateManagement":"none"}"#,
        )
        .unwrap();

        let err = load(dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("projectName"));
        assert!(err.to_string().contains("delete it"));
    }

    #[tokio::test]
    async fn test_recorded_paths_must_stay_in_project() {
        let dir = tempfile::tempdir().unwrap();
        let feature = |file: &str| {
            format!(
                r#"{{"version":"1.0.0","projectName":"x","uiLibrary":"paper","stateManagement":"none",
                "features":{{"camera":{{"enabled":true,"version":"1.0.0","installedAt":"t",
                "uiLibrary":"paper","stateManagement":"none","files":["src/ok.ts","{}"]}}}}}}"#,
                file
            )
        };

        for bad in ["../outside.txt", "/etc/hosts", "src/../../x"] {
            std::fs::write(paths::manifest_path(dir.path()), feature(bad)).unwrap();
            let err = load(dir.path()).await.unwrap_err();
            assert!(
                matches!(&err, GenieError::ManifestUnsafePath { path_entry, .. } if path_entry == bad),
                "{} accepted",
                bad
            );
        }

        std::fs::write(paths::manifest_path(dir.path()), feature("src/hooks/useCamera.ts")).unwrap();
        let manifest = load(dir.path()).await.unwrap().unwrap();
        assert_eq!(manifest.features["camera"].files.len(), 2);

        std::fs::write(
            paths::manifest_path(dir.path()),
            r#"{"version":"1.0.0","projectName":"x","uiLibrary":"paper","stateManagement":"none",
            "screens":{"Home":{"type":"blank","uiLibrary":"paper","createdAt":"t","filePath":"../Home.tsx"}}}"#,
        )
        .unwrap();
        assert!(matches!(
            load(dir.path()).await,
            Err(GenieError::ManifestUnsafePath { .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_library_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            paths::manifest_path(dir.path()),
            r#"{"version":"1.0.0","projectName":"x","uiLibrary":"bootstrap","stateManagement":"none"}"#,
        )
        .unwrap();
        assert!(matches!(
            load(dir.path()).await,
            Err(GenieError::ManifestParse { .. })
        ));
    }

    #[tokio::test]
    async fn test_optional_sections_default_on_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            paths::manifest_path(dir.path()),
            r#"{"version":"1.0.0","projectName":"x","uiLibrary":"paper","stateManagement":"none"}"#,
        )
        .unwrap();

        let manifest = load(dir.path()).await.unwrap().unwrap();
        assert_eq!(manifest.preferences, Preferences::default());
        assert!(manifest.features.is_empty());
        assert!(manifest.template.is_none());
    }

    #[tokio::test]
    async fn test_find_project_root_from_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        save(dir.path(), &demo()).await.unwrap();
        let nested = dir.path().join("src/screens");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root(&nested).await, Some(dir.path().to_path_buf()));
    }

    #[tokio::test]
    async fn test_require_reports_unmanaged_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            require(dir.path()).await,
            Err(GenieError::NotManagedProject(_))
        ));
    }
}
