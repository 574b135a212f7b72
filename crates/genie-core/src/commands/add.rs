//! `expo-genie add`: install a feature module

use super::{cancelled, choose, confirm, install_packages, remove_files, skipped_install_hint, Context};
use crate::generators;
use crate::manifest::{self, FeatureRecord, ProjectManifest};
use crate::registry::{
    FeatureContext, FeatureEntry, FeatureOptions, PromptAnswer, PromptAnswers, PromptKind, PromptSpec,
};
use anyhow::Result;
use clap::Args;
use std::path::Path;

#[derive(Args, Debug, Clone, Default)]
pub struct AddArgs {
    /// Feature to add (auth, payments, chat, camera, maps)
    pub feature: Option<String>,

    /// Regenerate an installed feature without asking
    #[arg(short, long)]
    pub force: bool,

    /// Do not install the feature's dependencies
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    /// Accept default answers for every prompt (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

pub async fn run(args: AddArgs, ctx: &Context) -> Result<()> {
    cliclack::intro("expo-genie add")?;
    let (root, project) = ctx.project().await?;

    let entry = choose(
        &ctx.registries.features,
        args.feature.as_deref(),
        "Select a feature to add",
        None,
    )?;
    let key = entry.id.as_str();

    let previous = project.features.get(key).cloned();
    if let Some(record) = &previous {
        let question = match regeneration_notice(key, record, &project) {
            Some(notice) => {
                cliclack::log::warning(notice)?;
                format!("Regenerate {} for the current stack?", entry.name)
            }
            None => format!("{} is already installed. Regenerate it?", entry.name),
        };
        if !confirm(&question, args.force || args.yes)? {
            return cancelled("Nothing changed.");
        }
    }

    let options = if args.yes {
        entry.default_options()
    } else {
        entry.options_from(&ask(entry.prompts)?)?
    };

    let _lock = ctx.lock()?;
    let written = write_feature(&root, entry, &project, &options, previous.as_ref()).await?;
    cliclack::log::success(format!("Generated {} file(s)", written.len()))?;
    for path in &written {
        cliclack::log::info(path)?;
    }

    // Files are tracked even if the install below fails
    let dependencies = entry.dependencies_for(&options);
    if project.preferences.auto_install && !args.skip_install {
        install_packages(project.preferences.package_manager, &root, &dependencies, &[]).await?;
    } else {
        skipped_install_hint(project.preferences.package_manager, &dependencies, &[])?;
    }
    print_setup_hint(entry)?;

    cliclack::outro(format!("{} added", entry.name))?;
    Ok(())
}

/// Replace a feature's files on disk and record them in the manifest.
/// Returns the project-relative paths written.
async fn write_feature(
    root: &Path,
    entry: &FeatureEntry,
    project: &ProjectManifest,
    options: &FeatureOptions,
    previous: Option<&FeatureRecord>,
) -> Result<Vec<String>> {
    let key = entry.id.as_str();
    if let Some(record) = previous {
        let removed = remove_files(root, &record.files).await?;
        tracing::info!(feature = key, removed, "removed previous feature files");
    }

    let feature_ctx = FeatureContext {
        ui_library: project.ui_library,
        state_management: project.state_management,
        typescript: project.preferences.typescript,
        options: options.clone(),
    };
    let written = generators::write_files(root, &(entry.generate)(&feature_ctx)).await?;
    manifest::add_feature(
        root,
        key,
        FeatureRecord::new(
            project.ui_library,
            project.state_management,
            written.clone(),
            entry.dependencies_for(options),
        ),
    )
    .await?;
    Ok(written)
}

/// Explain why an installed feature is out of date, if it is
fn regeneration_notice(key: &str, record: &FeatureRecord, project: &ProjectManifest) -> Option<String> {
    if !record.needs_regeneration(project.ui_library, project.state_management) {
        return None;
    }
    Some(format!(
        "{} was generated for {} + {}, but the project now uses {} + {}",
        key, record.ui_library, record.state_management, project.ui_library, project.state_management
    ))
}

/// Ask every prompt of a feature interactively
fn ask(prompts: &[PromptSpec]) -> Result<PromptAnswers> {
    let mut answers = PromptAnswers::new();
    for prompt in prompts {
        let answer = match prompt.kind {
            PromptKind::Select { options, default } => {
                let mut select = cliclack::select(prompt.message);
                for option in options {
                    select = select.item(option.value, option.label, option.hint);
                }
                let value: &str = select.initial_value(default).interact()?;
                PromptAnswer::Choice(value.to_string())
            }
            PromptKind::MultiSelect { options, defaults } => {
                let mut multi = cliclack::multiselect(prompt.message);
                for option in options {
                    multi = multi.item(option.value, option.label, option.hint);
                }
                let values: Vec<&str> = multi
                    .initial_values(defaults.to_vec())
                    .required(false)
                    .interact()?;
                PromptAnswer::Choices(values.into_iter().map(str::to_string).collect())
            }
            PromptKind::Confirm { default } => {
                PromptAnswer::Flag(cliclack::confirm(prompt.message).initial_value(default).interact()?)
            }
        };
        answers.insert(prompt.key, answer);
    }
    Ok(answers)
}

fn print_setup_hint(entry: &FeatureEntry) -> Result<()> {
    cliclack::note(
        "Next",
        format!(
            "Fill in the credentials used by src/features/{}/ and wire its screens into your navigator",
            entry.id
        ),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package_manager::PackageManager;
    use crate::registry::Registries;
    use crate::stack::{StateManagement, UiLibrary};

    #[test]
    fn test_regeneration_notice_only_when_stale() {
        let mut project = ProjectManifest::new_default(
            "demo",
            None,
            UiLibrary::Nativewind,
            StateManagement::Zustand,
            PackageManager::Npm,
        );
        let record = FeatureRecord::new(UiLibrary::Paper, StateManagement::Zustand, vec![], vec![]);

        let notice = regeneration_notice("auth", &record, &project).unwrap();
        assert!(notice.contains("paper + zustand"));
        assert!(notice.contains("nativewind + zustand"));

        project.ui_library = UiLibrary::Paper;
        assert!(regeneration_notice("auth", &record, &project).is_none());
    }

    #[tokio::test]
    async fn test_feature_is_recorded_before_packages_are_installed() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let project = ProjectManifest::new_default(
            "demo",
            None,
            UiLibrary::Nativewind,
            StateManagement::Zustand,
            PackageManager::Npm,
        );
        manifest::save(root, &project).await.unwrap();
        std::fs::create_dir_all(root.join("src/old")).unwrap();
        std::fs::write(root.join("src/old/Camera.tsx"), "stale").unwrap();
        let previous = FeatureRecord::new(
            UiLibrary::Paper,
            StateManagement::Zustand,
            vec!["src/old/Camera.tsx".into()],
            vec![],
        );

        let registries = Registries::builtin();
        let camera = registries.features.require("camera").unwrap();
        let written = write_feature(root, camera, &project, &camera.default_options(), Some(&previous))
            .await
            .unwrap();

        assert!(!root.join("src/old/Camera.tsx").exists());
        let recorded = manifest::require(root).await.unwrap();
        let record = &recorded.features["camera"];
        assert_eq!(record.files, written);
        assert_eq!(record.ui_library, UiLibrary::Nativewind);
        assert_eq!(record.dependencies, vec!["expo-camera", "expo-media-library"]);
        for file in &record.files {
            assert!(root.join(file).is_file());
        }
    }
}
