//! `expo-genie generate`: write one file from a code generator

use super::{cancelled, confirm, Context};
use crate::generators::{self, GenerateOptions, GeneratorKind};
use crate::manifest::{self, ComponentRecord, ScreenRecord};
use crate::naming;
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// What to generate (screen, component, hook, api, store, model)
    pub kind: Option<String>,

    /// Name of the generated item, normalized to PascalCase
    pub name: Option<String>,

    /// Screen or component variant (e.g. list, form, button, list-item)
    #[arg(short = 't', long = "type")]
    pub sub_type: Option<String>,

    /// Output directory relative to the project root
    #[arg(short, long = "dir")]
    pub directory: Option<String>,

    /// Add loading state handling
    #[arg(long = "with-loading")]
    pub with_loading: bool,

    /// Add navigation wiring (screens)
    #[arg(long = "with-navigation")]
    pub with_navigation: bool,

    /// Add a typed props interface (components)
    #[arg(long = "with-props")]
    pub with_props: bool,

    /// Overwrite an existing file without asking
    #[arg(short, long)]
    pub force: bool,
}

pub async fn run(args: GenerateArgs, ctx: &Context) -> Result<()> {
    cliclack::intro("expo-genie generate")?;
    let (root, project) = ctx.project().await?;

    let kind = match &args.kind {
        Some(kind) => kind.parse::<GeneratorKind>()?,
        None => {
            let mut select = cliclack::select("What do you want to generate?");
            for kind in GeneratorKind::ALL {
                select = select.item(kind, kind.as_str(), kind.description());
            }
            select.interact()?
        }
    };

    let raw_name = match &args.name {
        Some(name) => name.clone(),
        None => cliclack::input(format!("{} name", naming::format_component_name(kind.as_str())))
            .placeholder("profile")
            .validate(|input: &String| naming::validate_identifier(input).map(|_| ()).map_err(|e| e.to_string()))
            .interact()?,
    };
    let name = naming::validate_identifier(&raw_name)?;

    let sub_type = match (&args.sub_type, kind.sub_types().as_slice()) {
        (Some(given), _) => Some(given.clone()),
        (None, []) => None,
        (None, choices) if args.kind.is_some() && args.name.is_some() => choices.first().map(|c| c.to_string()),
        (None, choices) => {
            let mut select = cliclack::select(format!("{} type", naming::format_component_name(kind.as_str())));
            for choice in choices {
                select = select.item(*choice, *choice, "");
            }
            let chosen: &str = select.interact()?;
            Some(chosen.to_string())
        }
    };

    let opts = GenerateOptions {
        name: raw_name,
        directory: args.directory.clone(),
        typescript: project.preferences.typescript,
        sub_type: sub_type.clone(),
        with_loading: args.with_loading,
        with_navigation: args.with_navigation,
        with_props: args.with_props,
        ui_library: project.ui_library,
        state_management: project.state_management,
    };

    // Render up front so bad options fail before anything is written
    let preview = generators::render(kind, &opts)?;
    if root.join(&preview.path).exists() {
        cliclack::log::warning(format!("{} already exists", preview.path))?;
        if !confirm("Overwrite it?", args.force)? {
            return cancelled("Nothing changed.");
        }
    }

    let _lock = ctx.lock()?;
    generators::generate(&root, kind, &opts).await?;

    let kind_label = sub_type.unwrap_or_else(|| kind.as_str().to_string());
    match kind {
        GeneratorKind::Screen => {
            manifest::add_screen(
                &root,
                &name,
                ScreenRecord {
                    kind: kind_label,
                    ui_library: project.ui_library,
                    state_management: Some(project.state_management),
                    created_at: manifest::timestamp(),
                    file_path: preview.path.clone(),
                },
            )
            .await?
        }
        GeneratorKind::Component => {
            manifest::add_component(
                &root,
                &name,
                ComponentRecord {
                    kind: kind_label,
                    ui_library: project.ui_library,
                    created_at: manifest::timestamp(),
                    file_path: preview.path.clone(),
                },
            )
            .await?
        }
        _ => {}
    }

    cliclack::outro(format!("Created {}", preview.path))?;
    Ok(())
}
