//! Component generator

use super::screen::react_import;
use super::ui::{indent, Element, UiKit};
use super::{jsx_ext, push_unique, GenerateOptions, GeneratedFile};
use crate::error::GenieError;
use crate::naming;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_DIR: &str = "src/components";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComponentType {
    #[default]
    Basic,
    Button,
    Card,
    Input,
    Modal,
    ListItem,
}

impl ComponentType {
    pub const ALL: [ComponentType; 6] = [
        ComponentType::Basic,
        ComponentType::Button,
        ComponentType::Card,
        ComponentType::Input,
        ComponentType::Modal,
        ComponentType::ListItem,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Basic => "basic",
            ComponentType::Button => "button",
            ComponentType::Card => "card",
            ComponentType::Input => "input",
            ComponentType::Modal => "modal",
            ComponentType::ListItem => "list-item",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentType {
    type Err = GenieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('_', "-");
        ComponentType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| {
                GenieError::not_found(
                    "component type",
                    s,
                    ComponentType::ALL.iter().map(|t| t.as_str()),
                )
            })
    }
}

/// A prop and the local it degrades to when the component takes no props
struct Prop {
    name: &'static str,
    ts_type: &'static str,
    fallback: &'static str,
}

const fn prop(name: &'static str, ts_type: &'static str, fallback: &'static str) -> Prop {
    Prop {
        name,
        ts_type,
        fallback,
    }
}

/// Render `<dir>/<Pascal>.<tsx|jsx>`
pub fn render(opts: &GenerateOptions) -> Result<GeneratedFile, GenieError> {
    let component_type = match opts.sub_type.as_deref() {
        Some(value) => value.parse()?,
        None => ComponentType::default(),
    };
    let name = naming::validate_identifier(&opts.name)?;
    let dir = opts.directory.as_deref().unwrap_or(DEFAULT_DIR);
    Ok(GeneratedFile::new(
        format!("{}/{}.{}", dir.trim_end_matches('/'), name, jsx_ext(opts.typescript)),
        source(&name, component_type, opts),
    ))
}

fn source(name: &str, component_type: ComponentType, opts: &GenerateOptions) -> String {
    let kit = UiKit::new(opts.ui_library);
    let ts = opts.typescript;
    let mut react_hooks: Vec<&str> = Vec::new();
    let mut state: Vec<String> = Vec::new();

    let (mut props, mut elements, markup) = match component_type {
        ComponentType::Basic => (
            vec![prop("title", "string", "const title = 'Hello';")],
            vec![Element::Card, Element::Text],
            kit.card(&kit.text("{title}")),
        ),
        ComponentType::Button => (
            vec![
                prop("label", "string", "const label = 'Press me';"),
                prop("onPress", "() => void", "const onPress = () => {};"),
            ],
            vec![Element::Button],
            kit.button("{label}", "onPress"),
        ),
        ComponentType::Card => (
            vec![
                prop("title", "string", "const title = 'Card title';"),
                prop("description", "string", "const description = 'Card description';"),
            ],
            vec![Element::Card, Element::Title, Element::Text],
            kit.card(&format!("{}\n{}", kit.title("{title}"), kit.text("{description}"))),
        ),
        ComponentType::Input => {
            if !opts.with_props {
                push_unique(&mut react_hooks, "useState");
            }
            (
                vec![
                    prop("value", "string", "const [value, onChangeText] = useState('');"),
                    prop("onChangeText", "(text: string) => void", ""),
                ],
                vec![Element::Input],
                kit.input("Type here", "value", "onChangeText"),
            )
        }
        ComponentType::Modal => {
            if !opts.with_props {
                push_unique(&mut react_hooks, "useState");
            }
            (
                vec![
                    prop("visible", "boolean", "const [visible, setVisible] = useState(false);"),
                    prop("onClose", "() => void", "const onClose = () => setVisible(false);"),
                    prop("title", "string", "const title = 'Modal';"),
                ],
                vec![Element::Modal, Element::Card, Element::Title, Element::Button],
                format!(
                    "<Modal visible={{visible}} transparent animationType=\"slide\" onRequestClose={{onClose}}>\n{}\n</Modal>",
                    indent(
                        &kit.card(&format!("{}\n{}", kit.title("{title}"), kit.button("Close", "onClose"))),
                        2
                    )
                ),
            )
        }
        ComponentType::ListItem => (
            vec![
                prop("title", "string", "const title = 'Item';"),
                prop("subtitle", "string", "const subtitle = '';"),
                prop("onPress", "() => void", "const onPress = () => {};"),
            ],
            vec![Element::Touchable, Element::Card, Element::Title, Element::Text],
            format!(
                "<Pressable onPress={{onPress}}>\n{}\n</Pressable>",
                indent(
                    &kit.card(&format!("{}\n{}", kit.text("{title}"), kit.text("{subtitle}"))),
                    2
                )
            ),
        ),
    };

    let markup = if opts.with_loading {
        elements.push(Element::Spinner);
        if opts.with_props {
            props.push(prop("loading", "boolean", ""));
        } else {
            push_unique(&mut react_hooks, "useState");
            state.push("const [loading] = useState(false);".to_string());
        }
        format!(
            "if (loading) {{\n  return <ActivityIndicator />;\n}}\n\nreturn (\n{}\n);",
            indent(&markup, 2)
        )
    } else {
        format!("return (\n{}\n);", indent(&markup, 2))
    };

    let mut out = react_import(&react_hooks);
    out.push_str(&kit.imports(&elements));
    out.push('\n');

    let signature = if opts.with_props {
        let names: Vec<&str> = props.iter().map(|p| p.name).collect();
        if ts {
            out.push_str(&format!("export type {name}Props = {{\n"));
            for p in &props {
                let optional = if p.name == "loading" { "?" } else { "" };
                out.push_str(&format!("  {}{}: {};\n", p.name, optional, p.ts_type));
            }
            out.push_str("};\n\n");
            format!("{{ {} }}: {name}Props", names.join(", "))
        } else {
            format!("{{ {} }}", names.join(", "))
        }
    } else {
        let mut locals: Vec<String> = props
            .iter()
            .filter(|p| !p.fallback.is_empty())
            .map(|p| p.fallback.to_string())
            .collect();
        locals.append(&mut state);
        state = locals;
        String::new()
    };

    out.push_str(&format!("export default function {name}({signature}) {{\n"));
    for statement in &state {
        out.push_str(&indent(statement, 2));
        out.push('\n');
    }
    if !state.is_empty() {
        out.push('\n');
    }
    out.push_str(&indent(&markup, 2));
    out.push_str("\n}\n");
    out.push_str(kit.stylesheet());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::{StateManagement, UiLibrary};

    fn options(name: &str, kind: &str) -> GenerateOptions {
        let mut opts = GenerateOptions::new(name, UiLibrary::Paper, StateManagement::Zustand);
        opts.sub_type = Some(kind.to_string());
        opts
    }

    #[test]
    fn test_component_path() {
        let file = render(&options("primary-button", "button")).unwrap();
        assert_eq!(file.path, "src/components/PrimaryButton.tsx");
    }

    #[test]
    fn test_props_type_in_typescript() {
        let mut opts = options("product card", "card");
        opts.with_props = true;
        let file = render(&opts).unwrap();
        assert!(file.contents.contains("export type ProductCardProps = {"));
        assert!(file.contents.contains("  description: string;"));
        assert!(file
            .contents
            .contains("export default function ProductCard({ title, description }: ProductCardProps)"));
    }

    #[test]
    fn test_without_props_declares_locals() {
        let file = render(&options("picker", "modal")).unwrap();
        assert!(file.contents.contains("export default function Picker() {"));
        let visible = file.contents.find("const [visible, setVisible]").unwrap();
        let on_close = file.contents.find("const onClose").unwrap();
        assert!(visible < on_close);
        assert!(file.contents.contains("import React, { useState } from 'react';"));
    }

    #[test]
    fn test_list_item_alias() {
        assert_eq!("list_item".parse::<ComponentType>().unwrap(), ComponentType::ListItem);
        assert_eq!("List-Item".parse::<ComponentType>().unwrap(), ComponentType::ListItem);
    }

    #[test]
    fn test_loading_prop_is_optional() {
        let mut opts = options("save", "button");
        opts.with_props = true;
        opts.with_loading = true;
        let file = render(&opts).unwrap();
        assert!(file.contents.contains("  loading?: boolean;"));
        assert!(file.contents.contains("return <ActivityIndicator />;"));
    }
}
