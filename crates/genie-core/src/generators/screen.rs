//! Screen generator

use super::ui::{indent, Element, UiKit};
use super::{jsx_ext, push_unique, GenerateOptions, GeneratedFile};
use crate::error::GenieError;
use crate::naming;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_DIR: &str = "src/screens";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenType {
    #[default]
    Blank,
    List,
    Detail,
    Form,
    Settings,
}

impl ScreenType {
    pub const ALL: [ScreenType; 5] = [
        ScreenType::Blank,
        ScreenType::List,
        ScreenType::Detail,
        ScreenType::Form,
        ScreenType::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenType::Blank => "blank",
            ScreenType::List => "list",
            ScreenType::Detail => "detail",
            ScreenType::Form => "form",
            ScreenType::Settings => "settings",
        }
    }
}

impl fmt::Display for ScreenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScreenType {
    type Err = GenieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScreenType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                GenieError::not_found("screen type", s, ScreenType::ALL.iter().map(|t| t.as_str()))
            })
    }
}

/// Render `<dir>/<Pascal>.<tsx|jsx>`
pub fn render(opts: &GenerateOptions) -> Result<GeneratedFile, GenieError> {
    let screen_type = match opts.sub_type.as_deref() {
        Some(value) => value.parse()?,
        None => ScreenType::default(),
    };
    let name = naming::validate_identifier(&opts.name)?;
    let dir = opts.directory.as_deref().unwrap_or(DEFAULT_DIR);
    Ok(GeneratedFile::new(
        format!("{}/{}.{}", dir.trim_end_matches('/'), name, jsx_ext(opts.typescript)),
        source(&name, screen_type, opts),
    ))
}

fn source(name: &str, screen_type: ScreenType, opts: &GenerateOptions) -> String {
    let kit = UiKit::new(opts.ui_library);
    let ts = opts.typescript;
    let mut screen = ScreenParts::new(name);
    let mut router: Vec<&str> = Vec::new();
    screen.children.push(kit.title(&naming::title_case(name)));

    if opts.with_loading {
        screen.hook("useState");
        screen.hook("useEffect");
        screen.elements.push(Element::Spinner);
        screen.setup("const [loading, setLoading] = useState(true);");
    }

    match screen_type {
        ScreenType::Blank => {
            screen.elements.push(Element::Text);
            screen.children.push(kit.text("Start building your screen here."));
        }
        ScreenType::List => {
            screen.hook("useState");
            screen.elements.extend([Element::List, Element::Card, Element::Text]);
            if ts {
                screen.types.push_str("type Item = {\n  id: string;\n  title: string;\n};\n\n");
            }
            screen.setup(&format!(
                "const [items] = useState{}([]);",
                if ts { "<Item[]>" } else { "" }
            ));
            screen.children.push(format!(
                "<FlatList\n  data={{items}}\n  keyExtractor={{(item) => item.id}}\n  renderItem={{({{ item }}) => (\n{}\n  )}}\n/>",
                indent(&kit.card(&kit.text("{item.title}")), 4)
            ));
        }
        ScreenType::Detail => {
            router.push("useLocalSearchParams");
            screen.elements.push(Element::Text);
            screen.setup(&format!(
                "const {{ id }} = useLocalSearchParams{}();",
                if ts { "<{ id: string }>" } else { "" }
            ));
            screen.children.push(kit.text("{`Showing item ${id}`}"));
        }
        ScreenType::Form => {
            screen.hook("useState");
            screen.elements.extend([Element::Input, Element::Button]);
            screen.setup("const [name, setName] = useState('');");
            screen.setup("const [email, setEmail] = useState('');");
            screen.setup("const handleSubmit = () => {\n  console.log('submit', { name, email });\n};");
            screen.children.push(kit.input("Name", "name", "setName"));
            screen.children.push(kit.input("Email", "email", "setEmail"));
            screen.children.push(kit.button("Submit", "handleSubmit"));
        }
        ScreenType::Settings => {
            screen.hook("useState");
            screen.elements.extend([Element::Text, Element::Switch]);
            screen.setup("const [notifications, setNotifications] = useState(true);");
            screen.setup("const [darkMode, setDarkMode] = useState(false);");
            screen.children.push(kit.text("Notifications"));
            screen
                .children
                .push("<Switch value={notifications} onValueChange={setNotifications} />".to_string());
            screen.children.push(kit.text("Dark mode"));
            screen
                .children
                .push("<Switch value={darkMode} onValueChange={setDarkMode} />".to_string());
        }
    }

    if opts.with_navigation {
        router.push("useRouter");
        screen.elements.push(Element::Button);
        screen.setup("const router = useRouter();");
        screen.children.push(kit.button("Go back", "() => router.back()"));
    }

    if opts.with_loading {
        screen.setup("useEffect(() => {\n  // Fetch screen data here\n  setLoading(false);\n}, []);");
        screen.setup("if (loading) {\n  return <ActivityIndicator style={{ flex: 1 }} />;\n}");
    }

    if !router.is_empty() {
        screen
            .imports
            .push(format!("import {{ {} }} from 'expo-router';", router.join(", ")));
    }
    screen.render(&kit)
}

/// Pieces of a screen component, assembled by [`ScreenParts::render`]
#[derive(Debug, Default)]
pub(crate) struct ScreenParts {
    pub name: String,
    pub react_hooks: Vec<&'static str>,
    pub elements: Vec<Element>,
    /// Import lines beyond React and the UI kit
    pub imports: Vec<String>,
    /// Declarations placed above the component
    pub types: String,
    /// Statements at the top of the component body
    pub body: Vec<String>,
    pub children: Vec<String>,
}

impl ScreenParts {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            elements: vec![Element::Container, Element::Title],
            ..Self::default()
        }
    }

    pub fn hook(&mut self, hook: &'static str) {
        push_unique(&mut self.react_hooks, hook);
    }

    pub fn import(&mut self, line: impl Into<String>) {
        self.imports.push(line.into());
    }

    pub fn setup(&mut self, statement: &str) {
        self.body.push(statement.to_string());
    }

    pub fn render(&self, kit: &UiKit) -> String {
        let mut out = react_import(&self.react_hooks);
        out.push_str(&kit.imports(&self.elements));
        for line in &self.imports {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&self.types);
        out.push_str(&format!("export default function {}() {{\n", self.name));
        for statement in &self.body {
            out.push_str(&indent(statement, 2));
            out.push_str("\n\n");
        }
        out.push_str("  return (\n");
        out.push_str(&indent(&kit.container(&self.children.join("\n")), 4));
        out.push_str("\n  );\n}\n");
        out.push_str(kit.stylesheet());
        out
    }
}

pub(crate) fn react_import(hooks: &[&str]) -> String {
    if hooks.is_empty() {
        "import React from 'react';\n".to_string()
    } else {
        format!("import React, {{ {} }} from 'react';\n", hooks.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::{StateManagement, UiLibrary};

    fn options(name: &str) -> GenerateOptions {
        GenerateOptions::new(name, UiLibrary::Nativewind, StateManagement::Zustand)
    }

    #[test]
    fn test_screen_path() {
        let file = render(&options("profile")).unwrap();
        assert_eq!(file.path, "src/screens/Profile.tsx");

        let mut js = options("user-settings");
        js.typescript = false;
        js.directory = Some("app/screens/".into());
        assert_eq!(render(&js).unwrap().path, "app/screens/UserSettings.jsx");
    }

    #[test]
    fn test_screen_uses_pascal_identifier() {
        let file = render(&options("order history")).unwrap();
        assert!(file.contents.contains("export default function OrderHistory()"));
        assert!(file.contents.contains("Order History"));
    }

    #[test]
    fn test_form_screen_has_inputs() {
        let mut opts = options("signup");
        opts.sub_type = Some("form".into());
        let file = render(&opts).unwrap();
        assert!(file.contents.contains("import React, { useState } from 'react';"));
        assert!(file.contents.contains("onChangeText={setEmail}"));
        assert!(file.contents.contains("onPress={handleSubmit}"));
    }

    #[test]
    fn test_loading_and_navigation() {
        let mut opts = options("feed");
        opts.with_loading = true;
        opts.with_navigation = true;
        let file = render(&opts).unwrap();
        assert!(file.contents.contains("useState, useEffect"));
        assert!(file.contents.contains("ActivityIndicator"));
        assert!(file.contents.contains("import { useRouter } from 'expo-router';"));
        assert!(file.contents.contains("router.back()"));
    }

    #[test]
    fn test_javascript_list_has_no_type_annotations() {
        let mut opts = options("products");
        opts.sub_type = Some("list".into());
        opts.typescript = false;
        let file = render(&opts).unwrap();
        assert!(!file.contents.contains("type Item"));
        assert!(file.contents.contains("useState([])"));
    }

    #[test]
    fn test_unknown_screen_type() {
        let mut opts = options("x");
        opts.sub_type = Some("grid".into());
        let err = render(&opts).unwrap_err();
        assert!(err.to_string().contains("blank, list, detail, form, settings"));
    }
}
