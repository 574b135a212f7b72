//! Per-UI-library JSX primitives
//!
//! Generators describe a screen in terms of a few [`Element`]s; the kit turns
//! them into the import lines and markup of the project's UI library.

use crate::stack::UiLibrary;

/// Building blocks a generated file may use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Container,
    Title,
    Text,
    Button,
    Input,
    Card,
    Switch,
    List,
    Spinner,
    Modal,
    Touchable,
}

/// Markup factory for one UI library
#[derive(Debug, Clone, Copy)]
pub struct UiKit {
    library: UiLibrary,
}

impl UiKit {
    pub fn new(library: UiLibrary) -> Self {
        Self { library }
    }

    pub fn library(&self) -> UiLibrary {
        self.library
    }

    fn source(&self, element: Element) -> (&'static str, &'static str) {
        use Element::*;
        use UiLibrary::*;
        match (self.library, element) {
            (_, Switch) => ("react-native", "Switch"),
            (_, List) => ("react-native", "FlatList"),
            (_, Spinner) => ("react-native", "ActivityIndicator"),
            (_, Modal) => ("react-native", "Modal"),
            (_, Touchable) => ("react-native", "Pressable"),

            (Paper, Container) => ("react-native", "View"),
            (Paper, Title | Text) => ("react-native-paper", "Text"),
            (Paper, Button) => ("react-native-paper", "Button"),
            (Paper, Input) => ("react-native-paper", "TextInput"),
            (Paper, Card) => ("react-native-paper", "Card"),

            (Nativebase, Container) => ("native-base", "Box"),
            (Nativebase, Title) => ("native-base", "Heading"),
            (Nativebase, Text) => ("native-base", "Text"),
            (Nativebase, Button) => ("native-base", "Button"),
            (Nativebase, Input) => ("native-base", "Input"),
            (Nativebase, Card) => ("native-base", "Box"),

            (Elements, Container) => ("react-native", "View"),
            (Elements, Title | Text) => ("@rneui/themed", "Text"),
            (Elements, Button) => ("@rneui/themed", "Button"),
            (Elements, Input) => ("@rneui/themed", "Input"),
            (Elements, Card) => ("@rneui/themed", "Card"),

            (Tamagui, Container | Card) => ("tamagui", "YStack"),
            (Tamagui, Title) => ("tamagui", "H2"),
            (Tamagui, Text) => ("tamagui", "Paragraph"),
            (Tamagui, Button) => ("tamagui", "Button"),
            (Tamagui, Input) => ("tamagui", "Input"),

            (Nativewind | None, Container | Card) => ("react-native", "View"),
            (Nativewind | None, Title | Text) => ("react-native", "Text"),
            (Nativewind | None, Button) => ("react-native", "Pressable"),
            (Nativewind | None, Input) => ("react-native", "TextInput"),
        }
    }

    /// Import lines for the given elements, grouped by module in first-use order
    pub fn imports(&self, elements: &[Element]) -> String {
        let mut modules: Vec<(&'static str, Vec<&'static str>)> = Vec::new();
        let mut add = |module: &'static str, symbol: &'static str| {
            match modules.iter_mut().find(|(m, _)| *m == module) {
                Some((_, symbols)) => {
                    if !symbols.contains(&symbol) {
                        symbols.push(symbol);
                    }
                }
                Option::None => modules.push((module, vec![symbol])),
            }
        };

        for element in elements {
            let (module, symbol) = self.source(*element);
            add(module, symbol);
            // Pressable carries its label in a Text child
            if *element == Element::Button && symbol == "Pressable" {
                add("react-native", "Text");
            }
        }
        if self.library == UiLibrary::None {
            add("react-native", "StyleSheet");
        }

        modules
            .iter()
            .map(|(module, symbols)| format!("import {{ {} }} from '{}';\n", symbols.join(", "), module))
            .collect()
    }

    /// Full-screen wrapper around `children`
    pub fn container(&self, children: &str) -> String {
        let (open, close) = match self.library {
            UiLibrary::Nativewind => ("<View className=\"flex-1 bg-white p-4\">", "</View>"),
            UiLibrary::Paper | UiLibrary::Elements => {
                ("<View style={{ flex: 1, padding: 16 }}>", "</View>")
            }
            UiLibrary::Nativebase => ("<Box flex={1} bg=\"white\" p={4}>", "</Box>"),
            UiLibrary::Tamagui => ("<YStack flex={1} padding=\"$4\" gap=\"$3\">", "</YStack>"),
            UiLibrary::None => ("<View style={styles.container}>", "</View>"),
        };
        format!("{open}\n{}\n{close}", indent(children, 2))
    }

    pub fn title(&self, text: &str) -> String {
        match self.library {
            UiLibrary::Nativewind => format!("<Text className=\"text-2xl font-bold\">{text}</Text>"),
            UiLibrary::Paper => format!("<Text variant=\"headlineMedium\">{text}</Text>"),
            UiLibrary::Nativebase => format!("<Heading size=\"lg\">{text}</Heading>"),
            UiLibrary::Elements => format!("<Text h3>{text}</Text>"),
            UiLibrary::Tamagui => format!("<H2>{text}</H2>"),
            UiLibrary::None => format!("<Text style={{styles.title}}>{text}</Text>"),
        }
    }

    pub fn text(&self, text: &str) -> String {
        match self.library {
            UiLibrary::Nativewind => format!("<Text className=\"text-base text-gray-600\">{text}</Text>"),
            UiLibrary::Paper => format!("<Text variant=\"bodyMedium\">{text}</Text>"),
            UiLibrary::Nativebase | UiLibrary::Elements => format!("<Text>{text}</Text>"),
            UiLibrary::Tamagui => format!("<Paragraph>{text}</Paragraph>"),
            UiLibrary::None => format!("<Text style={{styles.text}}>{text}</Text>"),
        }
    }

    /// Button invoking the `on_press` expression
    pub fn button(&self, label: &str, on_press: &str) -> String {
        match self.library {
            UiLibrary::Nativewind => format!(
                "<Pressable className=\"rounded-lg bg-blue-600 px-4 py-3\" onPress={{{on_press}}}>\n  <Text className=\"text-center font-semibold text-white\">{label}</Text>\n</Pressable>"
            ),
            UiLibrary::Paper => {
                format!("<Button mode=\"contained\" onPress={{{on_press}}}>\n  {label}\n</Button>")
            }
            UiLibrary::Nativebase => format!("<Button onPress={{{on_press}}}>{label}</Button>"),
            UiLibrary::Elements => format!("<Button title={} onPress={{{on_press}}} />", attr(label)),
            UiLibrary::Tamagui => format!("<Button theme=\"active\" onPress={{{on_press}}}>\n  {label}\n</Button>"),
            UiLibrary::None => format!(
                "<Pressable style={{styles.button}} onPress={{{on_press}}}>\n  <Text style={{styles.buttonText}}>{label}</Text>\n</Pressable>"
            ),
        }
    }

    /// Controlled text input bound to `value` / `on_change`
    pub fn input(&self, placeholder: &str, value: &str, on_change: &str) -> String {
        match self.library {
            UiLibrary::Nativewind => format!(
                "<TextInput\n  className=\"rounded-lg border border-gray-300 px-4 py-3\"\n  placeholder=\"{placeholder}\"\n  value={{{value}}}\n  onChangeText={{{on_change}}}\n/>"
            ),
            UiLibrary::Paper => format!(
                "<TextInput\n  mode=\"outlined\"\n  label=\"{placeholder}\"\n  value={{{value}}}\n  onChangeText={{{on_change}}}\n/>"
            ),
            UiLibrary::Nativebase | UiLibrary::Elements | UiLibrary::Tamagui => format!(
                "<Input\n  placeholder=\"{placeholder}\"\n  value={{{value}}}\n  onChangeText={{{on_change}}}\n/>"
            ),
            UiLibrary::None => format!(
                "<TextInput\n  style={{styles.input}}\n  placeholder=\"{placeholder}\"\n  value={{{value}}}\n  onChangeText={{{on_change}}}\n/>"
            ),
        }
    }

    /// Bordered surface around `children`
    pub fn card(&self, children: &str) -> String {
        let (open, close) = match self.library {
            UiLibrary::Nativewind => ("<View className=\"rounded-xl bg-gray-50 p-4 shadow-sm\">", "</View>"),
            UiLibrary::Paper => ("<Card>\n  <Card.Content>", "  </Card.Content>\n</Card>"),
            UiLibrary::Nativebase => ("<Box rounded=\"lg\" borderWidth={1} borderColor=\"coolGray.200\" p={4}>", "</Box>"),
            UiLibrary::Elements => ("<Card>", "</Card>"),
            UiLibrary::Tamagui => ("<YStack padding=\"$3\" borderRadius=\"$4\" backgroundColor=\"$background\" elevation=\"$1\">", "</YStack>"),
            UiLibrary::None => ("<View style={styles.card}>", "</View>"),
        };
        let depth = if self.library == UiLibrary::Paper { 4 } else { 2 };
        format!("{open}\n{}\n{close}", indent(children, depth))
    }

    /// `StyleSheet.create` block; only plain React Native needs one
    pub fn stylesheet(&self) -> &'static str {
        if self.library != UiLibrary::None {
            return "";
        }
        r#"
const styles = StyleSheet.create({
  container: { flex: 1, padding: 16, backgroundColor: '#fff' },
  title: { fontSize: 24, fontWeight: 'bold', marginBottom: 8 },
  text: { fontSize: 16, color: '#4b5563' },
  button: { backgroundColor: '#2563eb', borderRadius: 8, paddingVertical: 12, paddingHorizontal: 16 },
  buttonText: { color: '#fff', fontWeight: '600', textAlign: 'center' },
  input: { borderWidth: 1, borderColor: '#d1d5db', borderRadius: 8, paddingHorizontal: 16, paddingVertical: 12 },
  card: { backgroundColor: '#f9fafb', borderRadius: 12, padding: 16, marginBottom: 12 },
});
"#
    }
}

/// JSX attribute value: expressions pass through, plain text is quoted
fn attr(value: &str) -> String {
    if value.starts_with('{') {
        value.to_string()
    } else {
        format!("\"{value}\"")
    }
}

/// Prefix every non-empty line with `depth` spaces
pub fn indent(text: &str, depth: usize) -> String {
    let pad = " ".repeat(depth);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
