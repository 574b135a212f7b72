//! UI, state-management and supporting library tables

use super::RegistryEntry;
use crate::error::GenieError;
use std::fmt;
use std::str::FromStr;

/// Library families known to the registries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LibraryCategory {
    Ui,
    State,
    Icons,
    Animation,
    Forms,
    Validation,
    Http,
    Styling,
    Navigation,
    Testing,
}

impl LibraryCategory {
    pub const ALL: [LibraryCategory; 10] = [
        LibraryCategory::Ui,
        LibraryCategory::State,
        LibraryCategory::Icons,
        LibraryCategory::Animation,
        LibraryCategory::Forms,
        LibraryCategory::Validation,
        LibraryCategory::Http,
        LibraryCategory::Styling,
        LibraryCategory::Navigation,
        LibraryCategory::Testing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LibraryCategory::Ui => "ui",
            LibraryCategory::State => "state",
            LibraryCategory::Icons => "icons",
            LibraryCategory::Animation => "animation",
            LibraryCategory::Forms => "forms",
            LibraryCategory::Validation => "validation",
            LibraryCategory::Http => "http",
            LibraryCategory::Styling => "styling",
            LibraryCategory::Navigation => "navigation",
            LibraryCategory::Testing => "testing",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LibraryCategory::Ui => "UI",
            LibraryCategory::State => "State management",
            LibraryCategory::Icons => "Icons",
            LibraryCategory::Animation => "Animation",
            LibraryCategory::Forms => "Forms",
            LibraryCategory::Validation => "Validation",
            LibraryCategory::Http => "HTTP / data fetching",
            LibraryCategory::Styling => "Styling",
            LibraryCategory::Navigation => "Navigation",
            LibraryCategory::Testing => "Testing",
        }
    }
}

impl fmt::Display for LibraryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LibraryCategory {
    type Err = GenieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LibraryCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                GenieError::not_found(
                    "library category",
                    s,
                    LibraryCategory::ALL.iter().map(|c| c.as_str()),
                )
            })
    }
}

/// A file written into the project when a library is set up
#[derive(Debug, Clone, Copy)]
pub struct ConfigFile {
    /// Project-relative path
    pub path: &'static str,
    pub contents: &'static str,
}

/// A library and what installing it involves
#[derive(Debug, Clone)]
pub struct LibraryEntry {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: LibraryCategory,
    pub packages: &'static [&'static str],
    pub dev_packages: &'static [&'static str],
    pub config_files: &'static [ConfigFile],
    /// Manual steps shown after installation
    pub setup: &'static [&'static str],
}

impl LibraryEntry {
    pub fn package_list(&self) -> Vec<String> {
        self.packages.iter().map(|p| p.to_string()).collect()
    }

    pub fn dev_package_list(&self) -> Vec<String> {
        self.dev_packages.iter().map(|p| p.to_string()).collect()
    }
}

impl RegistryEntry for LibraryEntry {
    fn key(&self) -> &str {
        self.key
    }

    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }
}

const TAILWIND_CONFIG: &str = r#"/** @type {import('tailwindcss').Config} */
module.exports = {
  content: ['./app/**/*.{js,jsx,ts,tsx}', './src/**/*.{js,jsx,ts,tsx}'],
  presets: [require('nativewind/preset')],
  theme: {
    extend: {},
  },
  plugins: [],
};
"#;

const NATIVEWIND_CSS: &str = "@tailwind base;\n@tailwind components;\n@tailwind utilities;\n";

const NATIVEWIND_BABEL: &str = r#"module.exports = function (api) {
  api.cache(true);
  return {
    presets: [
      ['babel-preset-expo', { jsxImportSource: 'nativewind' }],
      'nativewind/babel',
    ],
  };
};
"#;

const NATIVEWIND_METRO: &str = r#"const { getDefaultConfig } = require('expo/metro-config');
const { withNativeWind } = require('nativewind/metro');

const config = getDefaultConfig(__dirname);

module.exports = withNativeWind(config, { input: './global.css' });
"#;

const NATIVEWIND_TYPES: &str = "/// <reference types=\"nativewind/types\" />\n";

const TAMAGUI_CONFIG: &str = r#"import { config } from '@tamagui/config/v3';
import { createTamagui } from 'tamagui';

const tamaguiConfig = createTamagui(config);

export type AppConfig = typeof tamaguiConfig;

declare module 'tamagui' {
  interface TamaguiCustomConfig extends AppConfig {}
}

export default tamaguiConfig;
"#;

const JEST_CONFIG: &str = r#"module.exports = {
  preset: 'jest-expo',
  transformIgnorePatterns: [
    'node_modules/(?!((jest-)?react-native|@react-native(-community)?)|expo(nent)?|@expo(nent)?/.*|@expo-google-fonts/.*|react-navigation|@react-navigation/.*|@unimodules/.*|unimodules|sentry-expo|native-base|react-native-svg)',
  ],
};
"#;

const DETOX_CONFIG: &str = r#"/** @type {Detox.DetoxConfig} */
module.exports = {
  testRunner: {
    args: { $0: 'jest', config: 'e2e/jest.config.js' },
  },
  apps: {
    'ios.debug': {
      type: 'ios.app',
      binaryPath: 'ios/build/Build/Products/Debug-iphonesimulator/app.app',
    },
    'android.debug': {
      type: 'android.apk',
      binaryPath: 'android/app/build/outputs/apk/debug/app-debug.apk',
    },
  },
};
"#;

/// Component/styling libraries, one per [`crate::stack::UiLibrary`] variant
pub fn ui_libraries() -> Vec<LibraryEntry> {
    vec![
        LibraryEntry {
            key: "nativewind",
            name: "NativeWind",
            description: "Tailwind CSS utility classes for React Native",
            category: LibraryCategory::Ui,
            packages: &[
                "nativewind",
                "react-native-reanimated",
                "react-native-safe-area-context",
            ],
            dev_packages: &["tailwindcss@^3.4.0"],
            config_files: &[
                ConfigFile {
                    path: "tailwind.config.js",
                    contents: TAILWIND_CONFIG,
                },
                ConfigFile {
                    path: "global.css",
                    contents: NATIVEWIND_CSS,
                },
                ConfigFile {
                    path: "babel.config.js",
                    contents: NATIVEWIND_BABEL,
                },
                ConfigFile {
                    path: "metro.config.js",
                    contents: NATIVEWIND_METRO,
                },
                ConfigFile {
                    path: "nativewind-env.d.ts",
                    contents: NATIVEWIND_TYPES,
                },
            ],
            setup: &["Import './global.css' at the top of your root layout"],
        },
        LibraryEntry {
            key: "paper",
            name: "React Native Paper",
            description: "Material Design components",
            category: LibraryCategory::Ui,
            packages: &["react-native-paper", "react-native-safe-area-context"],
            dev_packages: &[],
            config_files: &[],
            setup: &["Wrap your root component in <PaperProvider>"],
        },
        LibraryEntry {
            key: "nativebase",
            name: "NativeBase",
            description: "Accessible, themeable component library",
            category: LibraryCategory::Ui,
            packages: &[
                "native-base",
                "react-native-svg",
                "react-native-safe-area-context",
            ],
            dev_packages: &[],
            config_files: &[],
            setup: &["Wrap your root component in <NativeBaseProvider>"],
        },
        LibraryEntry {
            key: "elements",
            name: "React Native Elements",
            description: "Cross-platform UI toolkit (@rneui)",
            category: LibraryCategory::Ui,
            packages: &[
                "@rneui/themed",
                "@rneui/base",
                "react-native-safe-area-context",
            ],
            dev_packages: &[],
            config_files: &[],
            setup: &["Wrap your root component in <ThemeProvider> from @rneui/themed"],
        },
        LibraryEntry {
            key: "tamagui",
            name: "Tamagui",
            description: "Optimizing compiler and universal design system",
            category: LibraryCategory::Ui,
            packages: &["tamagui", "@tamagui/config"],
            dev_packages: &["@tamagui/babel-plugin"],
            config_files: &[ConfigFile {
                path: "tamagui.config.ts",
                contents: TAMAGUI_CONFIG,
            }],
            setup: &[
                "Wrap your root component in <TamaguiProvider config={tamaguiConfig}>",
                "Add '@tamagui/babel-plugin' to babel.config.js plugins",
            ],
        },
        LibraryEntry {
            key: "none",
            name: "None",
            description: "Plain React Native StyleSheet",
            category: LibraryCategory::Ui,
            packages: &[],
            dev_packages: &[],
            config_files: &[],
            setup: &[],
        },
    ]
}

/// State libraries, one per [`crate::stack::StateManagement`] variant
pub fn state_libraries() -> Vec<LibraryEntry> {
    vec![
        LibraryEntry {
            key: "zustand",
            name: "Zustand",
            description: "Small, hook-based stores",
            category: LibraryCategory::State,
            packages: &["zustand"],
            dev_packages: &[],
            config_files: &[],
            setup: &[],
        },
        LibraryEntry {
            key: "redux",
            name: "Redux Toolkit",
            description: "Predictable global state with slices",
            category: LibraryCategory::State,
            packages: &["@reduxjs/toolkit", "react-redux"],
            dev_packages: &[],
            config_files: &[],
            setup: &["Wrap your root component in <Provider store={store}>"],
        },
        LibraryEntry {
            key: "mobx",
            name: "MobX",
            description: "Observable state with automatic tracking",
            category: LibraryCategory::State,
            packages: &["mobx", "mobx-react-lite"],
            dev_packages: &[],
            config_files: &[],
            setup: &["Wrap components that read stores with observer()"],
        },
        LibraryEntry {
            key: "jotai",
            name: "Jotai",
            description: "Primitive, atomic state",
            category: LibraryCategory::State,
            packages: &["jotai"],
            dev_packages: &[],
            config_files: &[],
            setup: &[],
        },
        LibraryEntry {
            key: "context",
            name: "React Context",
            description: "Built-in context + reducer, no extra packages",
            category: LibraryCategory::State,
            packages: &[],
            dev_packages: &[],
            config_files: &[],
            setup: &["Mount generated providers near the root of your app"],
        },
        LibraryEntry {
            key: "none",
            name: "None",
            description: "Local component state only",
            category: LibraryCategory::State,
            packages: &[],
            dev_packages: &[],
            config_files: &[],
            setup: &[],
        },
    ]
}

/// Supporting libraries installable with `expo-genie install`
pub fn extra_libraries() -> Vec<LibraryEntry> {
    vec![
        LibraryEntry {
            key: "vector-icons",
            name: "Expo Vector Icons",
            description: "Icon sets bundled for Expo",
            category: LibraryCategory::Icons,
            packages: &["@expo/vector-icons"],
            dev_packages: &[],
            config_files: &[],
            setup: &[],
        },
        LibraryEntry {
            key: "lucide",
            name: "Lucide",
            description: "Consistent open-source SVG icons",
            category: LibraryCategory::Icons,
            packages: &["lucide-react-native", "react-native-svg"],
            dev_packages: &[],
            config_files: &[],
            setup: &[],
        },
        LibraryEntry {
            key: "reanimated",
            name: "Reanimated",
            description: "Native-thread animations",
            category: LibraryCategory::Animation,
            packages: &["react-native-reanimated"],
            dev_packages: &[],
            config_files: &[],
            setup: &["Add 'react-native-reanimated/plugin' as the last babel plugin"],
        },
        LibraryEntry {
            key: "moti",
            name: "Moti",
            description: "Declarative animations on top of Reanimated",
            category: LibraryCategory::Animation,
            packages: &["moti", "react-native-reanimated"],
            dev_packages: &[],
            config_files: &[],
            setup: &[],
        },
        LibraryEntry {
            key: "lottie",
            name: "Lottie",
            description: "After Effects animations",
            category: LibraryCategory::Animation,
            packages: &["lottie-react-native"],
            dev_packages: &[],
            config_files: &[],
            setup: &[],
        },
        LibraryEntry {
            key: "react-hook-form",
            name: "React Hook Form",
            description: "Performant form state",
            category: LibraryCategory::Forms,
            packages: &["react-hook-form"],
            dev_packages: &[],
            config_files: &[],
            setup: &[],
        },
        LibraryEntry {
            key: "formik",
            name: "Formik",
            description: "Form state and submission",
            category: LibraryCategory::Forms,
            packages: &["formik"],
            dev_packages: &[],
            config_files: &[],
            setup: &[],
        },
        LibraryEntry {
            key: "zod",
            name: "Zod",
            description: "TypeScript-first schema validation",
            category: LibraryCategory::Validation,
            packages: &["zod"],
            dev_packages: &[],
            config_files: &[],
            setup: &[],
        },
        LibraryEntry {
            key: "yup",
            name: "Yup",
            description: "Object schema validation",
            category: LibraryCategory::Validation,
            packages: &["yup"],
            dev_packages: &[],
            config_files: &[],
            setup: &[],
        },
        LibraryEntry {
            key: "axios",
            name: "Axios",
            description: "Promise-based HTTP client",
            category: LibraryCategory::Http,
            packages: &["axios"],
            dev_packages: &[],
            config_files: &[],
            setup: &[],
        },
        LibraryEntry {
            key: "react-query",
            name: "TanStack Query",
            description: "Server-state caching and synchronization",
            category: LibraryCategory::Http,
            packages: &["@tanstack/react-query"],
            dev_packages: &[],
            config_files: &[],
            setup: &["Wrap your root component in <QueryClientProvider client={queryClient}>"],
        },
        LibraryEntry {
            key: "swr",
            name: "SWR",
            description: "Stale-while-revalidate data fetching",
            category: LibraryCategory::Http,
            packages: &["swr"],
            dev_packages: &[],
            config_files: &[],
            setup: &[],
        },
        LibraryEntry {
            key: "styled-components",
            name: "styled-components",
            description: "CSS-in-JS styling",
            category: LibraryCategory::Styling,
            packages: &["styled-components"],
            dev_packages: &[],
            config_files: &[],
            setup: &[],
        },
        LibraryEntry {
            key: "restyle",
            name: "Restyle",
            description: "Type-enforced theme system by Shopify",
            category: LibraryCategory::Styling,
            packages: &["@shopify/restyle"],
            dev_packages: &[],
            config_files: &[],
            setup: &["Wrap your root component in <ThemeProvider theme={theme}>"],
        },
        LibraryEntry {
            key: "expo-router",
            name: "Expo Router",
            description: "File-based routing",
            category: LibraryCategory::Navigation,
            packages: &[
                "expo-router",
                "react-native-screens",
                "react-native-safe-area-context",
                "expo-linking",
                "expo-constants",
            ],
            dev_packages: &[],
            config_files: &[],
            setup: &["Set \"main\": \"expo-router/entry\" in package.json"],
        },
        LibraryEntry {
            key: "react-navigation",
            name: "React Navigation",
            description: "Stack, tab and drawer navigators",
            category: LibraryCategory::Navigation,
            packages: &[
                "@react-navigation/native",
                "@react-navigation/native-stack",
                "react-native-screens",
                "react-native-safe-area-context",
            ],
            dev_packages: &[],
            config_files: &[],
            setup: &["Wrap your app in <NavigationContainer>"],
        },
        LibraryEntry {
            key: "jest",
            name: "Jest + Testing Library",
            description: "Unit and component tests with jest-expo",
            category: LibraryCategory::Testing,
            packages: &[],
            dev_packages: &["jest", "jest-expo", "@testing-library/react-native"],
            config_files: &[ConfigFile {
                path: "jest.config.js",
                contents: JEST_CONFIG,
            }],
            setup: &["Add \"test\": \"jest\" to package.json scripts"],
        },
        LibraryEntry {
            key: "detox",
            name: "Detox",
            description: "Gray-box end-to-end testing",
            category: LibraryCategory::Testing,
            packages: &[],
            dev_packages: &["detox"],
            config_files: &[ConfigFile {
                path: ".detoxrc.js",
                contents: DETOX_CONFIG,
            }],
            setup: &["Run a development build before `detox test`"],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!("HTTP".parse::<LibraryCategory>().unwrap(), LibraryCategory::Http);
        assert!("database".parse::<LibraryCategory>().is_err());
    }

    #[test]
    fn test_every_extra_category_has_entries() {
        let entries = extra_libraries();
        for category in LibraryCategory::ALL {
            if matches!(category, LibraryCategory::Ui | LibraryCategory::State) {
                continue;
            }
            assert!(
                entries.iter().any(|e| e.category == category),
                "no entries for {}",
                category
            );
        }
    }

    #[test]
    fn test_nativewind_ships_config_files() {
        let entries = ui_libraries();
        let nativewind = entries.iter().find(|e| e.key == "nativewind").unwrap();
        let paths: Vec<&str> = nativewind.config_files.iter().map(|f| f.path).collect();
        assert!(paths.contains(&"tailwind.config.js"));
        assert!(paths.contains(&"global.css"));
    }
}
