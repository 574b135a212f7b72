//! Installable feature modules (auth, payments, chat, camera, maps)

use super::prompts::{check_option, PromptAnswers, PromptKind, PromptOption, PromptSpec};
use super::RegistryEntry;
use crate::error::GenieError;
use crate::generators::{features as generate, GeneratedFile};
use crate::stack::{StateManagement, UiLibrary};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureId {
    Auth,
    Payments,
    Chat,
    Camera,
    Maps,
}

impl FeatureId {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureId::Auth => "auth",
            FeatureId::Payments => "payments",
            FeatureId::Chat => "chat",
            FeatureId::Camera => "camera",
            FeatureId::Maps => "maps",
        }
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a feature generator needs to render its files
#[derive(Debug, Clone)]
pub struct FeatureContext {
    pub ui_library: UiLibrary,
    pub state_management: StateManagement,
    pub typescript: bool,
    pub options: FeatureOptions,
}

/// A feature module and how to install it
#[derive(Debug, Clone)]
pub struct FeatureEntry {
    pub id: FeatureId,
    pub name: &'static str,
    pub description: &'static str,
    /// Packages installed regardless of answers
    pub dependencies: &'static [&'static str],
    pub prompts: &'static [PromptSpec],
    /// Produces the feature's files; paths are project-relative
    pub generate: fn(&FeatureContext) -> Vec<GeneratedFile>,
}

impl FeatureEntry {
    /// Base dependencies plus those implied by the options, deduplicated in order
    pub fn dependencies_for(&self, options: &FeatureOptions) -> Vec<String> {
        let mut deps: Vec<String> = Vec::new();
        for dep in self.dependencies.iter().chain(options.extra_dependencies().iter()) {
            if !deps.iter().any(|d| d == dep) {
                deps.push(dep.to_string());
            }
        }
        deps
    }

    /// Typed options from collected answers; missing answers use the prompt default
    pub fn options_from(&self, answers: &PromptAnswers) -> Result<FeatureOptions, GenieError> {
        let mut merged = PromptAnswers::defaults(self.prompts);
        for prompt in self.prompts {
            if let Some(answer) = answers.get(prompt.key) {
                merged.insert(prompt.key, answer.clone());
            }
        }
        for prompt in self.prompts {
            if let Some(value) = merged.choice(prompt.key) {
                check_option(prompt, value)?;
            }
            for value in merged.choices(prompt.key) {
                check_option(prompt, value)?;
            }
        }
        Ok(FeatureOptions::from_answers(self.id, &merged))
    }

    /// Options used in non-interactive mode
    pub fn default_options(&self) -> FeatureOptions {
        FeatureOptions::from_answers(self.id, &PromptAnswers::defaults(self.prompts))
    }
}

impl RegistryEntry for FeatureEntry {
    fn key(&self) -> &str {
        self.id.as_str()
    }

    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthBackend {
    Firebase,
    Supabase,
    Clerk,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialProvider {
    Google,
    Apple,
    Github,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOptions {
    pub backend: AuthBackend,
    pub social: Vec<SocialProvider>,
    pub biometrics: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentProvider {
    Stripe,
    RevenueCat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentsOptions {
    pub provider: PaymentProvider,
    pub subscriptions: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatBackend {
    Firebase,
    Supabase,
    Stream,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatOptions {
    pub backend: ChatBackend,
    pub media: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraOptions {
    pub media_library: bool,
    pub barcode: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapProvider {
    Google,
    Apple,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapsOptions {
    pub provider: MapProvider,
    pub background_location: bool,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            backend: AuthBackend::Firebase,
            social: Vec::new(),
            biometrics: false,
        }
    }
}

impl Default for PaymentsOptions {
    fn default() -> Self {
        Self {
            provider: PaymentProvider::Stripe,
            subscriptions: false,
        }
    }
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            backend: ChatBackend::Firebase,
            media: true,
        }
    }
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            media_library: true,
            barcode: false,
        }
    }
}

impl Default for MapsOptions {
    fn default() -> Self {
        Self {
            provider: MapProvider::Google,
            background_location: false,
        }
    }
}

/// Answers to a feature's prompts, one typed variant per feature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureOptions {
    Auth(AuthOptions),
    Payments(PaymentsOptions),
    Chat(ChatOptions),
    Camera(CameraOptions),
    Maps(MapsOptions),
}

impl FeatureOptions {
    /// Values are assumed validated against the prompt options
    fn from_answers(id: FeatureId, answers: &PromptAnswers) -> Self {
        let flag = |key: &str| answers.flag(key).unwrap_or(false);
        match id {
            FeatureId::Auth => FeatureOptions::Auth(AuthOptions {
                backend: match answers.choice("backend") {
                    Some("supabase") => AuthBackend::Supabase,
                    Some("clerk") => AuthBackend::Clerk,
                    Some("custom") => AuthBackend::Custom,
                    _ => AuthBackend::Firebase,
                },
                social: answers
                    .choices("social")
                    .iter()
                    .filter_map(|value| match value.as_str() {
                        "google" => Some(SocialProvider::Google),
                        "apple" => Some(SocialProvider::Apple),
                        "github" => Some(SocialProvider::Github),
                        _ => None,
                    })
                    .collect(),
                biometrics: flag("biometrics"),
            }),
            FeatureId::Payments => FeatureOptions::Payments(PaymentsOptions {
                provider: match answers.choice("provider") {
                    Some("revenuecat") => PaymentProvider::RevenueCat,
                    _ => PaymentProvider::Stripe,
                },
                subscriptions: flag("subscriptions"),
            }),
            FeatureId::Chat => FeatureOptions::Chat(ChatOptions {
                backend: match answers.choice("backend") {
                    Some("supabase") => ChatBackend::Supabase,
                    Some("stream") => ChatBackend::Stream,
                    _ => ChatBackend::Firebase,
                },
                media: flag("media"),
            }),
            FeatureId::Camera => FeatureOptions::Camera(CameraOptions {
                media_library: flag("mediaLibrary"),
                barcode: flag("barcode"),
            }),
            FeatureId::Maps => FeatureOptions::Maps(MapsOptions {
                provider: match answers.choice("provider") {
                    Some("apple") => MapProvider::Apple,
                    _ => MapProvider::Google,
                },
                background_location: flag("backgroundLocation"),
            }),
        }
    }

    /// Packages required by the chosen options
    pub fn extra_dependencies(&self) -> Vec<&'static str> {
        let mut deps = Vec::new();
        match self {
            FeatureOptions::Auth(opts) => {
                match opts.backend {
                    AuthBackend::Firebase => deps.push("firebase"),
                    AuthBackend::Supabase => {
                        deps.extend(["@supabase/supabase-js", "@react-native-async-storage/async-storage"])
                    }
                    AuthBackend::Clerk => deps.push("@clerk/clerk-expo"),
                    AuthBackend::Custom => {}
                }
                for provider in &opts.social {
                    match provider {
                        SocialProvider::Google | SocialProvider::Github => {
                            deps.extend(["expo-auth-session", "expo-crypto", "expo-web-browser"])
                        }
                        SocialProvider::Apple => deps.push("expo-apple-authentication"),
                    }
                }
                if opts.biometrics {
                    deps.push("expo-local-authentication");
                }
            }
            FeatureOptions::Payments(opts) => match opts.provider {
                PaymentProvider::Stripe => deps.push("@stripe/stripe-react-native"),
                PaymentProvider::RevenueCat => deps.push("react-native-purchases"),
            },
            FeatureOptions::Chat(opts) => {
                match opts.backend {
                    ChatBackend::Firebase => deps.push("firebase"),
                    ChatBackend::Supabase => deps.push("@supabase/supabase-js"),
                    ChatBackend::Stream => deps.push("stream-chat-expo"),
                }
                if opts.media {
                    deps.push("expo-image-picker");
                }
            }
            FeatureOptions::Camera(opts) => {
                if opts.media_library {
                    deps.push("expo-media-library");
                }
            }
            FeatureOptions::Maps(opts) => {
                if opts.background_location {
                    deps.push("expo-task-manager");
                }
            }
        }
        deps
    }
}

const AUTH_BACKENDS: &[PromptOption] = &[
    PromptOption {
        value: "firebase",
        label: "Firebase Auth",
        hint: "email, social and phone sign-in",
    },
    PromptOption {
        value: "supabase",
        label: "Supabase Auth",
        hint: "Postgres-backed auth",
    },
    PromptOption {
        value: "clerk",
        label: "Clerk",
        hint: "hosted user management",
    },
    PromptOption {
        value: "custom",
        label: "Custom API",
        hint: "bring your own endpoints",
    },
];

const SOCIAL_PROVIDERS: &[PromptOption] = &[
    PromptOption {
        value: "google",
        label: "Google",
        hint: "",
    },
    PromptOption {
        value: "apple",
        label: "Apple",
        hint: "required on iOS when offering social login",
    },
    PromptOption {
        value: "github",
        label: "GitHub",
        hint: "",
    },
];

const PAYMENT_PROVIDERS: &[PromptOption] = &[
    PromptOption {
        value: "stripe",
        label: "Stripe",
        hint: "cards, Apple Pay, Google Pay",
    },
    PromptOption {
        value: "revenuecat",
        label: "RevenueCat",
        hint: "in-app purchases and subscriptions",
    },
];

const CHAT_BACKENDS: &[PromptOption] = &[
    PromptOption {
        value: "firebase",
        label: "Firebase Firestore",
        hint: "",
    },
    PromptOption {
        value: "supabase",
        label: "Supabase Realtime",
        hint: "",
    },
    PromptOption {
        value: "stream",
        label: "Stream Chat",
        hint: "hosted chat API",
    },
];

const MAP_PROVIDERS: &[PromptOption] = &[
    PromptOption {
        value: "google",
        label: "Google Maps",
        hint: "both platforms, needs an API key",
    },
    PromptOption {
        value: "apple",
        label: "Apple Maps",
        hint: "iOS only, no key required",
    },
];

const AUTH_PROMPTS: &[PromptSpec] = &[
    PromptSpec {
        key: "backend",
        message: "Which auth backend?",
        kind: PromptKind::Select {
            options: AUTH_BACKENDS,
            default: "firebase",
        },
    },
    PromptSpec {
        key: "social",
        message: "Social sign-in providers",
        kind: PromptKind::MultiSelect {
            options: SOCIAL_PROVIDERS,
            defaults: &[],
        },
    },
    PromptSpec {
        key: "biometrics",
        message: "Enable biometric unlock?",
        kind: PromptKind::Confirm { default: false },
    },
];

const PAYMENTS_PROMPTS: &[PromptSpec] = &[
    PromptSpec {
        key: "provider",
        message: "Which payment provider?",
        kind: PromptKind::Select {
            options: PAYMENT_PROVIDERS,
            default: "stripe",
        },
    },
    PromptSpec {
        key: "subscriptions",
        message: "Include a subscription paywall?",
        kind: PromptKind::Confirm { default: false },
    },
];

const CHAT_PROMPTS: &[PromptSpec] = &[
    PromptSpec {
        key: "backend",
        message: "Which chat backend?",
        kind: PromptKind::Select {
            options: CHAT_BACKENDS,
            default: "firebase",
        },
    },
    PromptSpec {
        key: "media",
        message: "Allow image attachments?",
        kind: PromptKind::Confirm { default: true },
    },
];

const CAMERA_PROMPTS: &[PromptSpec] = &[
    PromptSpec {
        key: "mediaLibrary",
        message: "Save captures to the media library?",
        kind: PromptKind::Confirm { default: true },
    },
    PromptSpec {
        key: "barcode",
        message: "Enable barcode scanning?",
        kind: PromptKind::Confirm { default: false },
    },
];

const MAPS_PROMPTS: &[PromptSpec] = &[
    PromptSpec {
        key: "provider",
        message: "Which map provider?",
        kind: PromptKind::Select {
            options: MAP_PROVIDERS,
            default: "google",
        },
    },
    PromptSpec {
        key: "backgroundLocation",
        message: "Track location in the background?",
        kind: PromptKind::Confirm { default: false },
    },
];

/// Features shipped with the CLI, in menu order
pub fn builtin_features() -> Vec<FeatureEntry> {
    vec![
        FeatureEntry {
            id: FeatureId::Auth,
            name: "Authentication",
            description: "Login and registration screens, session hook and store",
            dependencies: &["expo-secure-store"],
            prompts: AUTH_PROMPTS,
            generate: generate::auth,
        },
        FeatureEntry {
            id: FeatureId::Payments,
            name: "Payments",
            description: "Checkout flow with Stripe or RevenueCat",
            dependencies: &[],
            prompts: PAYMENTS_PROMPTS,
            generate: generate::payments,
        },
        FeatureEntry {
            id: FeatureId::Chat,
            name: "Chat",
            description: "Conversation list, chat room and message store",
            dependencies: &[],
            prompts: CHAT_PROMPTS,
            generate: generate::chat,
        },
        FeatureEntry {
            id: FeatureId::Camera,
            name: "Camera",
            description: "Camera screen with permission handling",
            dependencies: &["expo-camera"],
            prompts: CAMERA_PROMPTS,
            generate: generate::camera,
        },
        FeatureEntry {
            id: FeatureId::Maps,
            name: "Maps",
            description: "Map screen with current location",
            dependencies: &["react-native-maps", "expo-location"],
            prompts: MAPS_PROMPTS,
            generate: generate::maps,
        },
    ]
}
