//! Scaffold a project from the bundled templates, then add to it the way the
//! commands do, and check what ends up on disk and in the manifest.

use genie_core::generators::{self, GenerateOptions, GeneratorKind};
use genie_core::manifest::{self, FeatureRecord, ScreenRecord};
use genie_core::registry::{FeatureContext, FeatureId, RegistryEntry};
use genie_core::templates::{copy_template, TemplateRegistry};
use genie_core::{PackageManager, ProjectManifest, Registries, StateManagement, UiLibrary};
use std::path::{Path, PathBuf};

fn bundled_templates() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates")
}

async fn scaffold(root: &Path, template: &str, typescript: bool) -> Vec<String> {
    let registry = TemplateRegistry::discover(&bundled_templates()).unwrap();
    let info = registry.require(template).unwrap();
    copy_template(info, registry.language_files(), root, "demo", typescript)
        .await
        .unwrap()
}

#[test]
fn bundled_templates_are_listed_in_index_order() {
    let registry = TemplateRegistry::discover(&bundled_templates()).unwrap();
    let names: Vec<&str> = registry.list_all().iter().map(|t| t.key()).collect();
    assert_eq!(names, vec!["blank", "tabs"]);
    for template in registry.list_all() {
        let warning = genie_core::templates::check_compatibility(
            genie_core::CLI_VERSION,
            &template.manifest.version,
            "upgrade",
        );
        assert!(warning.is_none(), "{} requires a newer CLI", template.key());
    }
}

#[tokio::test]
async fn typescript_scaffold_skips_javascript_sources() {
    let root = tempfile::tempdir().unwrap();
    let copied = scaffold(root.path(), "blank", true).await;

    assert!(copied.contains(&"app/index.tsx".to_string()));
    assert!(copied.contains(&"tsconfig.json".to_string()));
    assert!(copied.contains(&"babel.config.js".to_string()));
    assert!(!copied.iter().any(|f| f.ends_with(".jsx")));
    assert!(!copied.contains(&"jsconfig.json".to_string()));
    assert!(!copied.contains(&"template.yaml".to_string()));

    let package = std::fs::read_to_string(root.path().join("package.json")).unwrap();
    let package: serde_json::Value = serde_json::from_str(&package).unwrap();
    assert_eq!(package["name"], "demo");
}

#[tokio::test]
async fn javascript_scaffold_keeps_nested_route_groups() {
    let root = tempfile::tempdir().unwrap();
    let copied = scaffold(root.path(), "tabs", false).await;

    assert!(copied.contains(&"app/(tabs)/settings.jsx".to_string()));
    assert!(!copied.iter().any(|f| f.ends_with(".tsx")));
    let index = std::fs::read_to_string(root.path().join("app/(tabs)/index.jsx")).unwrap();
    assert!(index.contains("<Text style={styles.title}>demo</Text>"));
}

#[tokio::test]
async fn manifest_tracks_features_screens_and_root_lookup() {
    let root = tempfile::tempdir().unwrap();
    let project = root.path();
    scaffold(project, "blank", true).await;
    assert!(!manifest::is_managed_project(project).await);

    let created = ProjectManifest::new_default(
        "demo",
        Some("blank"),
        UiLibrary::Nativewind,
        StateManagement::Zustand,
        PackageManager::Npm,
    );
    manifest::save(project, &created).await.unwrap();
    assert!(manifest::is_managed_project(project).await);

    let nested = project.join("app");
    assert_eq!(
        manifest::find_project_root(&nested).await.map(|p| p.canonicalize().unwrap()),
        Some(project.canonicalize().unwrap())
    );

    // Feature generation writes the files the record points at
    let registries = Registries::builtin();
    let camera = registries.features.require("camera").unwrap();
    assert_eq!(camera.id, FeatureId::Camera);
    let options = camera.default_options();
    let ctx = FeatureContext {
        ui_library: created.ui_library,
        state_management: created.state_management,
        typescript: true,
        options: options.clone(),
    };
    let files = generators::write_files(project, &(camera.generate)(&ctx)).await.unwrap();
    assert_eq!(
        files,
        vec!["src/features/camera/screens/CameraScreen.tsx", "src/hooks/useCamera.ts"]
    );
    for file in &files {
        assert!(project.join(file).is_file(), "{} was not written", file);
    }
    let dependencies = camera.dependencies_for(&options);
    assert_eq!(dependencies, vec!["expo-camera", "expo-media-library"]);
    manifest::add_feature(
        project,
        "camera",
        FeatureRecord::new(UiLibrary::Nativewind, StateManagement::Zustand, files.clone(), dependencies),
    )
    .await
    .unwrap();

    let mut opts = GenerateOptions::new("profile", UiLibrary::Nativewind, StateManagement::Zustand);
    let screen = generators::generate(project, GeneratorKind::Screen, &opts).await.unwrap();
    assert!(screen.ends_with("src/screens/Profile.tsx"));
    opts.typescript = false;
    let js_screen = generators::render(GeneratorKind::Screen, &opts).unwrap();
    assert!(js_screen.path.ends_with("Profile.jsx"));

    manifest::add_screen(
        project,
        "Profile",
        ScreenRecord {
            kind: "blank".into(),
            ui_library: UiLibrary::Nativewind,
            state_management: Some(StateManagement::Zustand),
            created_at: manifest::timestamp(),
            file_path: "src/screens/Profile.tsx".into(),
        },
    )
    .await
    .unwrap();

    let reloaded = manifest::require(project).await.unwrap();
    assert_eq!(reloaded.template.as_deref(), Some("blank"));
    assert_eq!(reloaded.ui_library, UiLibrary::Nativewind);
    assert_eq!(reloaded.features["camera"].files.len(), 2);
    assert_eq!(reloaded.features["camera"].dependencies.len(), 2);
    assert_eq!(reloaded.screens["Profile"].file_path, "src/screens/Profile.tsx");
    assert!(reloaded.stale_features().is_empty());

    manifest::update_ui_library(project, UiLibrary::Paper).await.unwrap();
    let migrated = manifest::require(project).await.unwrap();
    assert_eq!(migrated.stale_features(), vec!["camera"]);
}
