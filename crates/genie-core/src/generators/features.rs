//! File sets written by `expo-genie add <feature>`
//!
//! Each generator returns its files in write order; the paths end up in the
//! feature's manifest record.

use super::screen::ScreenParts;
use super::ui::{indent, Element, UiKit};
use super::{fill, jsx_ext, script_ext, store, typed, GeneratedFile};
use crate::registry::features::{
    AuthBackend, AuthOptions, CameraOptions, ChatBackend, ChatOptions, FeatureContext, FeatureOptions,
    MapProvider, MapsOptions, PaymentProvider, PaymentsOptions, SocialProvider,
};
use crate::stack::StateManagement;

struct FileSet {
    typescript: bool,
    kit: UiKit,
    files: Vec<GeneratedFile>,
}

impl FileSet {
    fn new(ctx: &FeatureContext) -> Self {
        Self {
            typescript: ctx.typescript,
            kit: UiKit::new(ctx.ui_library),
            files: Vec::new(),
        }
    }

    fn screen(&mut self, stem: &str, parts: &ScreenParts) {
        let contents = parts.render(&self.kit);
        self.push_jsx(stem, contents);
    }

    /// JSX-bearing file from a typed template
    fn component(&mut self, stem: &str, template: &str, vars: &[(&str, &str)]) {
        let contents = fill(&typed(template, self.typescript), vars);
        self.push_jsx(stem, contents);
    }

    /// Plain script file from a typed template
    fn script(&mut self, stem: &str, template: &str, vars: &[(&str, &str)]) {
        let contents = fill(&typed(template, self.typescript), vars);
        self.files.push(GeneratedFile::new(
            format!("{stem}.{}", script_ext(self.typescript)),
            contents,
        ));
    }

    /// Feature store, skipped when the project has no state library
    fn store(&mut self, name: &str, state: StateManagement) {
        if let Ok(contents) = store::source(name, state, self.typescript) {
            self.files
                .push(GeneratedFile::new(store::path(store::DEFAULT_DIR, name, self.typescript), contents));
        }
    }

    fn push_jsx(&mut self, stem: &str, contents: String) {
        self.files.push(GeneratedFile::new(
            format!("{stem}.{}", jsx_ext(self.typescript)),
            contents,
        ));
    }

    fn finish(self) -> Vec<GeneratedFile> {
        self.files
    }
}

fn when(condition: bool, text: &str) -> &str {
    if condition {
        text
    } else {
        ""
    }
}

/// Title, message and a single action, used for permission and empty states
fn prompt_block(kit: &UiKit, title: &str, message: &str, action: &str, on_press: &str) -> String {
    kit.container(&[kit.title(title), kit.text(message), kit.button(action, on_press)].join("\n"))
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

const AUTH_SERVICE_FIREBASE: &str = r#"import { initializeApp } from 'firebase/app';
import {
  createUserWithEmailAndPassword,
  getAuth,
  signInWithEmailAndPassword,
  signOut as firebaseSignOut,
} from 'firebase/auth';

const app = initializeApp({
  apiKey: process.env.EXPO_PUBLIC_FIREBASE_API_KEY,
  authDomain: process.env.EXPO_PUBLIC_FIREBASE_AUTH_DOMAIN,
  projectId: process.env.EXPO_PUBLIC_FIREBASE_PROJECT_ID,
  appId: process.env.EXPO_PUBLIC_FIREBASE_APP_ID,
});

export const auth = getAuth(app);

export async function signIn(email«: string», password«: string») {
  const { user } = await signInWithEmailAndPassword(auth, email, password);
  return { id: user.uid, email: user.email ?? email };
}

export async function signUp(email«: string», password«: string») {
  const { user } = await createUserWithEmailAndPassword(auth, email, password);
  return { id: user.uid, email: user.email ?? email };
}

export async function signOut() {
  await firebaseSignOut(auth);
}
"#;

const AUTH_SERVICE_SUPABASE: &str = r#"import AsyncStorage from '@react-native-async-storage/async-storage';
import { createClient } from '@supabase/supabase-js';

export const supabase = createClient(
  process.env.EXPO_PUBLIC_SUPABASE_URL ?? '',
  process.env.EXPO_PUBLIC_SUPABASE_ANON_KEY ?? '',
  { auth: { storage: AsyncStorage, persistSession: true, detectSessionInUrl: false } },
);

export async function signIn(email«: string», password«: string») {
  const { data, error } = await supabase.auth.signInWithPassword({ email, password });
  if (error) throw error;
  return { id: data.user.id, email: data.user.email ?? email };
}

export async function signUp(email«: string», password«: string») {
  const { data, error } = await supabase.auth.signUp({ email, password });
  if (error) throw error;
  return { id: data.user?.id ?? '', email };
}

export async function signOut() {
  await supabase.auth.signOut();
}
"#;

const AUTH_SERVICE_CLERK: &str = r#"import * as SecureStore from 'expo-secure-store';

export const publishableKey = process.env.EXPO_PUBLIC_CLERK_PUBLISHABLE_KEY ?? '';

export const tokenCache = {
  getToken: (key«: string») => SecureStore.getItemAsync(key),
  saveToken: (key«: string», value«: string») => SecureStore.setItemAsync(key, value),
};
"#;

const AUTH_SERVICE_CUSTOM: &str = r#"import * as SecureStore from 'expo-secure-store';

const API_URL = process.env.EXPO_PUBLIC_API_URL ?? 'https://api.example.com';
const TOKEN_KEY = 'auth_token';

async function post(path«: string», body«: unknown») {
  const response = await fetch(`${API_URL}${path}`, {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify(body),
  });
  if (!response.ok) {
    throw new Error(`Authentication failed with status ${response.status}`);
  }
  const { token, user } = await response.json();
  await SecureStore.setItemAsync(TOKEN_KEY, token);
  return user« as { id: string; email: string }»;
}

export const signIn = (email«: string», password«: string») => post('/auth/login', { email, password });

export const signUp = (email«: string», password«: string») => post('/auth/register', { email, password });

export async function signOut() {
  await SecureStore.deleteItemAsync(TOKEN_KEY);
}
"#;

const USE_AUTH: &str = r#"import { useCallback, useState } from 'react';
import * as authService from '../features/auth/services/authService';

«export type AuthUser = { id: string; email: string };

»export function useAuth() {
  const [user, setUser] = useState«<AuthUser | null>»(null);
  const [loading, setLoading] = useState(false);
  const [error, setError] = useState«<string | null>»(null);

  const run = useCallback(async (action«: () => Promise<AuthUser>») => {
    setLoading(true);
    setError(null);
    try {
      setUser(await action());
    } catch (e) {
      setError(e instanceof Error ? e.message : String(e));
    } finally {
      setLoading(false);
    }
  }, []);

  const signIn = (email«: string», password«: string») => run(() => authService.signIn(email, password));
  const signUp = (email«: string», password«: string») => run(() => authService.signUp(email, password));
  const signOut = async () => {
    await authService.signOut();
    setUser(null);
  };

  return { user, loading, error, signIn, signUp, signOut };
}
"#;

const USE_AUTH_CLERK: &str = r#"import { useAuth as useClerkAuth, useSignIn, useSignUp, useUser } from '@clerk/clerk-expo';

export function useAuth() {
  const { isLoaded, signOut } = useClerkAuth();
  const { user } = useUser();
  const { signIn: clerkSignIn, setActive } = useSignIn();
  const { signUp: clerkSignUp } = useSignUp();

  const signIn = async (email«: string», password«: string») => {
    const attempt = await clerkSignIn«!».create({ identifier: email, password });
    await setActive«!»({ session: attempt.createdSessionId });
  };

  const signUp = async (email«: string», password«: string») => {
    await clerkSignUp«!».create({ emailAddress: email, password });
  };

  return { user, loading: !isLoaded, error: null, signIn, signUp, signOut };
}
"#;

const SOCIAL_BUTTONS: &str = r#"import React from 'react';
import { Pressable, Text, View } from 'react-native';

«type Provider = 'google' | 'apple' | 'github';

»const PROVIDERS«: { id: Provider; label: string }[]» = [
{{providers}}];

export default function SocialButtons({ onPress }«: { onPress: (provider: Provider) => void }») {
  return (
    <View style={{ gap: 8 }}>
      {PROVIDERS.map((provider) => (
        <Pressable key={provider.id} onPress={() => onPress(provider.id)}>
          <Text>{`Continue with ${provider.label}`}</Text>
        </Pressable>
      ))}
    </View>
  );
}
"#;

const BIOMETRICS: &str = r#"import * as LocalAuthentication from 'expo-local-authentication';

export async function isBiometricAvailable() {
  const hasHardware = await LocalAuthentication.hasHardwareAsync();
  return hasHardware && (await LocalAuthentication.isEnrolledAsync());
}

export async function authenticateWithBiometrics(promptMessage = 'Unlock to continue') {
  const result = await LocalAuthentication.authenticateAsync({ promptMessage });
  return result.success;
}
"#;

/// Login/register screens, session hook and backend service
pub fn auth(ctx: &FeatureContext) -> Vec<GeneratedFile> {
    let opts = match &ctx.options {
        FeatureOptions::Auth(opts) => opts.clone(),
        _ => AuthOptions::default(),
    };
    let mut set = FileSet::new(ctx);
    let kit = set.kit;

    let service = match opts.backend {
        AuthBackend::Firebase => AUTH_SERVICE_FIREBASE,
        AuthBackend::Supabase => AUTH_SERVICE_SUPABASE,
        AuthBackend::Clerk => AUTH_SERVICE_CLERK,
        AuthBackend::Custom => AUTH_SERVICE_CUSTOM,
    };
    set.script("src/features/auth/services/authService", service, &[]);

    let hook = if opts.backend == AuthBackend::Clerk { USE_AUTH_CLERK } else { USE_AUTH };
    set.script("src/hooks/useAuth", hook, &[]);

    for (name, action, handler) in [
        ("LoginScreen", "Sign in", "signIn"),
        ("RegisterScreen", "Create account", "signUp"),
    ] {
        let mut screen = ScreenParts::new(name);
        screen.hook("useState");
        screen.elements.extend([Element::Input, Element::Button, Element::Text]);
        screen.import("import { useAuth } from '../../../hooks/useAuth';");
        screen.setup(&format!("const {{ {handler}, loading, error }} = useAuth();"));
        screen.setup("const [email, setEmail] = useState('');");
        screen.setup("const [password, setPassword] = useState('');");
        screen.children.push(kit.title(action));
        screen.children.push(kit.input("Email", "email", "setEmail"));
        screen.children.push(kit.input("Password", "password", "setPassword"));
        screen.children.push(format!("{{error ? {} : null}}", kit.text("{error}")));
        screen
            .children
            .push(kit.button(&format!("{{loading ? 'Please wait…' : '{action}'}}"), &format!("() => {handler}(email, password)")));

        if name == "LoginScreen" && !opts.social.is_empty() {
            screen.import("import SocialButtons from '../components/SocialButtons';");
            screen
                .children
                .push("<SocialButtons onPress={(provider) => console.log('sign in with', provider)} />".to_string());
        }
        if name == "LoginScreen" && opts.biometrics {
            screen.import("import { authenticateWithBiometrics } from '../services/biometrics';");
            screen.children.push(kit.button("Use biometrics", "authenticateWithBiometrics"));
        }
        set.screen(&format!("src/features/auth/screens/{name}"), &screen);
    }

    if !opts.social.is_empty() {
        let providers: String = opts
            .social
            .iter()
            .map(|provider| match provider {
                SocialProvider::Google => "  { id: 'google', label: 'Google' },\n",
                SocialProvider::Apple => "  { id: 'apple', label: 'Apple' },\n",
                SocialProvider::Github => "  { id: 'github', label: 'GitHub' },\n",
            })
            .collect();
        set.component(
            "src/features/auth/components/SocialButtons",
            SOCIAL_BUTTONS,
            &[("providers", &providers)],
        );
    }

    if opts.biometrics {
        set.script("src/features/auth/services/biometrics", BIOMETRICS, &[]);
    }

    set.store("auth", ctx.state_management);
    set.finish()
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

const PAYMENT_SERVICE_STRIPE: &str = r#"const API_URL = process.env.EXPO_PUBLIC_API_URL ?? 'https://api.example.com';

export const publishableKey = process.env.EXPO_PUBLIC_STRIPE_PUBLISHABLE_KEY ?? '';

«export type PaymentSheetParams = {
  paymentIntent: string;
  ephemeralKey: string;
  customer: string;
};

»export async function fetchPaymentSheetParams(amount«: number»)«: Promise<PaymentSheetParams>» {
  const response = await fetch(`${API_URL}/payments/sheet`, {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ amount }),
  });
  if (!response.ok) {
    throw new Error(`Could not create payment sheet (status ${response.status})`);
  }
  return response.json();
}
"#;

const PAYMENT_SERVICE_REVENUECAT: &str = r#"import { Platform } from 'react-native';
import Purchases from 'react-native-purchases';

export function configurePurchases() {
  const apiKey = Platform.select({
    ios: process.env.EXPO_PUBLIC_REVENUECAT_IOS_KEY,
    android: process.env.EXPO_PUBLIC_REVENUECAT_ANDROID_KEY,
  });
  if (apiKey) {
    Purchases.configure({ apiKey });
  }
}

export async function getOfferings() {
  const offerings = await Purchases.getOfferings();
  return offerings.current?.availablePackages ?? [];
}

export async function purchase(pkg«: Awaited<ReturnType<typeof getOfferings>>[number]») {
  const { customerInfo } = await Purchases.purchasePackage(pkg);
  return customerInfo;
}
"#;

const USE_PAYMENTS_STRIPE: &str = r#"import { useState } from 'react';
import { useStripe } from '@stripe/stripe-react-native';
import { fetchPaymentSheetParams } from '../features/payments/services/paymentService';

export function usePayments() {
  const { initPaymentSheet, presentPaymentSheet } = useStripe();
  const [loading, setLoading] = useState(false);

  const checkout = async (amount«: number») => {
    setLoading(true);
    try {
      const { paymentIntent, ephemeralKey, customer } = await fetchPaymentSheetParams(amount);
      const init = await initPaymentSheet({
        merchantDisplayName: process.env.EXPO_PUBLIC_APP_NAME ?? 'My App',
        paymentIntentClientSecret: paymentIntent,
        customerEphemeralKeySecret: ephemeralKey,
        customerId: customer,
      });
      if (init.error) return init.error.message;
      const { error } = await presentPaymentSheet();
      return error ? error.message : null;
    } finally {
      setLoading(false);
    }
  };

  return { loading, checkout };
}
"#;

const USE_PAYMENTS_REVENUECAT: &str = r#"import { useEffect, useState } from 'react';
import { configurePurchases, getOfferings, purchase } from '../features/payments/services/paymentService';

export function usePayments() {
  const [packages, setPackages] = useState«<Awaited<ReturnType<typeof getOfferings>>>»([]);
  const [loading, setLoading] = useState(true);

  useEffect(() => {
    configurePurchases();
    getOfferings()
      .then(setPackages)
      .finally(() => setLoading(false));
  }, []);

  const checkout = async (index = 0) => {
    const pkg = packages[index];
    if (!pkg) return 'No products available';
    await purchase(pkg);
    return null;
  };

  return { packages, loading, checkout };
}
"#;

const STRIPE_PROVIDER: &str = r#"import React«, { type ReactNode }» from 'react';
import { StripeProvider } from '@stripe/stripe-react-native';
import { publishableKey } from './services/paymentService';

export default function PaymentsProvider({ children }«: { children: ReactNode }») {
  return <StripeProvider publishableKey={publishableKey}>{children}</StripeProvider>;
}
"#;

/// Checkout flow for the chosen provider, plus a paywall for subscriptions
pub fn payments(ctx: &FeatureContext) -> Vec<GeneratedFile> {
    let opts = match &ctx.options {
        FeatureOptions::Payments(opts) => opts.clone(),
        _ => PaymentsOptions::default(),
    };
    let mut set = FileSet::new(ctx);
    let kit = set.kit;
    let stripe = opts.provider == PaymentProvider::Stripe;

    let (service, hook) = match opts.provider {
        PaymentProvider::Stripe => (PAYMENT_SERVICE_STRIPE, USE_PAYMENTS_STRIPE),
        PaymentProvider::RevenueCat => (PAYMENT_SERVICE_REVENUECAT, USE_PAYMENTS_REVENUECAT),
    };
    set.script("src/features/payments/services/paymentService", service, &[]);
    set.script("src/hooks/usePayments", hook, &[]);

    let mut checkout = ScreenParts::new("CheckoutScreen");
    checkout.hook("useState");
    checkout.elements.extend([Element::Text, Element::Button]);
    checkout.import("import { usePayments } from '../../../hooks/usePayments';");
    checkout.setup("const { loading, checkout } = usePayments();");
    checkout.setup(&format!(
        "const [message, setMessage] = useState{}(null);",
        when(ctx.typescript, "<string | null>")
    ));
    checkout.children.push(kit.title("Checkout"));
    checkout.children.push(kit.text("{message ?? 'Review your order and pay securely.'}"));
    let pay = if stripe {
        "async () => setMessage((await checkout(1999)) ?? 'Payment complete')"
    } else {
        "async () => setMessage((await checkout()) ?? 'Purchase complete')"
    };
    checkout.children.push(kit.button("{loading ? 'Processing…' : 'Pay now'}", pay));
    set.screen("src/features/payments/screens/CheckoutScreen", &checkout);

    if opts.subscriptions {
        let mut paywall = ScreenParts::new("PaywallScreen");
        paywall.elements.extend([Element::Card, Element::Text, Element::Button]);
        paywall.import("import { usePayments } from '../../../hooks/usePayments';");
        paywall.setup("const { checkout } = usePayments();");
        paywall.children.push(kit.title("Go Premium"));
        for (plan, price) in [("Monthly", "$4.99 / month"), ("Yearly", "$39.99 / year")] {
            paywall
                .children
                .push(kit.card(&format!("{}\n{}", kit.text(plan), kit.text(price))));
        }
        paywall.children.push(kit.button("Subscribe", "() => checkout()"));
        set.screen("src/features/payments/screens/PaywallScreen", &paywall);
    }

    if stripe {
        set.component("src/features/payments/PaymentsProvider", STRIPE_PROVIDER, &[]);
    }
    set.finish()
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

const CHAT_SERVICE_FIREBASE: &str = r#"import { getApp } from 'firebase/app';
import {
  addDoc,
  collection,
  getFirestore,
  onSnapshot,
  orderBy,
  query,
  serverTimestamp,
} from 'firebase/firestore';

«export type Message = { id: string; text: string; senderId: string; imageUri?: string };

»const db = getFirestore(getApp());

export function subscribeToMessages(roomId«: string», onMessages«: (messages: Message[]) => void») {
  const messages = query(collection(db, 'rooms', roomId, 'messages'), orderBy('createdAt'));
  return onSnapshot(messages, (snapshot) =>
    onMessages(snapshot.docs.map((doc) => ({ id: doc.id, ...doc.data() })« as Message[]»)),
  );
}

export async function sendMessage(roomId«: string», message«: Omit<Message, 'id'>») {
  await addDoc(collection(db, 'rooms', roomId, 'messages'), { ...message, createdAt: serverTimestamp() });
}
"#;

const CHAT_SERVICE_SUPABASE: &str = r#"import { createClient } from '@supabase/supabase-js';

«export type Message = { id: string; text: string; senderId: string; imageUri?: string };

»const supabase = createClient(
  process.env.EXPO_PUBLIC_SUPABASE_URL ?? '',
  process.env.EXPO_PUBLIC_SUPABASE_ANON_KEY ?? '',
);

export function subscribeToMessages(roomId«: string», onMessages«: (messages: Message[]) => void») {
  let messages«: Message[]» = [];
  supabase
    .from('messages')
    .select('*')
    .eq('room_id', roomId)
    .order('created_at')
    .then(({ data }) => onMessages((messages = data ?? [])));

  const channel = supabase
    .channel(`room:${roomId}`)
    .on('postgres_changes', { event: 'INSERT', schema: 'public', table: 'messages' }, (payload) => {
      messages = [...messages, payload.new« as Message»];
      onMessages(messages);
    })
    .subscribe();
  return () => {
    supabase.removeChannel(channel);
  };
}

export async function sendMessage(roomId«: string», message«: Omit<Message, 'id'>») {
  await supabase.from('messages').insert({ ...message, room_id: roomId });
}
"#;

const CHAT_SERVICE_STREAM: &str = r#"import { StreamChat } from 'stream-chat';

«export type Message = { id: string; text: string; senderId: string; imageUri?: string };

»export const client = StreamChat.getInstance(process.env.EXPO_PUBLIC_STREAM_API_KEY ?? '');

export function subscribeToMessages(roomId«: string», onMessages«: (messages: Message[]) => void») {
  const channel = client.channel('messaging', roomId);
  const emit = () =>
    onMessages(
      channel.state.messages.map((m) => ({ id: m.id, text: m.text ?? '', senderId: m.user?.id ?? '' })),
    );
  channel.watch().then(emit);
  const { unsubscribe } = channel.on('message.new', emit);
  return unsubscribe;
}

export async function sendMessage(roomId«: string», message«: Omit<Message, 'id'>») {
  await client.channel('messaging', roomId).sendMessage({ text: message.text });
}
"#;

const USE_CHAT: &str = r#"import { useEffect, useState } from 'react';
import { sendMessage, subscribeToMessages } from '../features/chat/services/chatService';
«import type { Message } from '../features/chat/services/chatService';
»
export function useChat(roomId«: string», userId«: string») {
  const [messages, setMessages] = useState«<Message[]>»([]);

  useEffect(() => subscribeToMessages(roomId, setMessages), [roomId]);

  const send = (text«: string», imageUri«?: string») =>
    sendMessage(roomId, { text, senderId: userId, ...(imageUri ? { imageUri } : {}) });

  return { messages, send };
}
"#;

const ATTACHMENT_PICKER: &str = r#"import React from 'react';
import { Pressable, Text } from 'react-native';
import * as ImagePicker from 'expo-image-picker';

export default function AttachmentPicker({ onPick }«: { onPick: (uri: string) => void }») {
  const pick = async () => {
    const result = await ImagePicker.launchImageLibraryAsync({ mediaTypes: ['images'], quality: 0.8 });
    if (!result.canceled) {
      onPick(result.assets[0].uri);
    }
  };

  return (
    <Pressable onPress={pick}>
      <Text>Attach</Text>
    </Pressable>
  );
}
"#;

/// Conversation list, chat room and realtime service
pub fn chat(ctx: &FeatureContext) -> Vec<GeneratedFile> {
    let opts = match &ctx.options {
        FeatureOptions::Chat(opts) => opts.clone(),
        _ => ChatOptions::default(),
    };
    let mut set = FileSet::new(ctx);
    let kit = set.kit;

    let service = match opts.backend {
        ChatBackend::Firebase => CHAT_SERVICE_FIREBASE,
        ChatBackend::Supabase => CHAT_SERVICE_SUPABASE,
        ChatBackend::Stream => CHAT_SERVICE_STREAM,
    };
    set.script("src/features/chat/services/chatService", service, &[]);
    set.script("src/hooks/useChat", USE_CHAT, &[]);

    let mut conversations = ScreenParts::new("ConversationsScreen");
    conversations.elements.extend([Element::List, Element::Touchable, Element::Card, Element::Text]);
    conversations.import("import { useRouter } from 'expo-router';");
    conversations.setup("const router = useRouter();");
    conversations.setup("const rooms = [{ id: 'general', name: 'General' }];");
    conversations.children.push(kit.title("Messages"));
    conversations.children.push(format!(
        "<FlatList\n  data={{rooms}}\n  keyExtractor={{(room) => room.id}}\n  renderItem={{({{ item }}) => (\n    <Pressable onPress={{() => router.push(`/chat/${{item.id}}`)}}>\n{}\n    </Pressable>\n  )}}\n/>",
        indent(&kit.card(&kit.text("{item.name}")), 6)
    ));
    set.screen("src/features/chat/screens/ConversationsScreen", &conversations);

    let mut room = ScreenParts::new("ChatRoomScreen");
    room.hook("useState");
    room.elements.extend([Element::List, Element::Text, Element::Input, Element::Button]);
    room.import("import { useLocalSearchParams } from 'expo-router';");
    room.import("import { useChat } from '../../../hooks/useChat';");
    room.setup(&format!(
        "const {{ roomId }} = useLocalSearchParams{}();",
        when(ctx.typescript, "<{ roomId: string }>")
    ));
    room.setup("const { messages, send } = useChat(roomId ?? 'general', 'me');");
    room.setup("const [draft, setDraft] = useState('');");
    room.children.push(format!(
        "<FlatList\n  data={{messages}}\n  keyExtractor={{(message) => message.id}}\n  renderItem={{({{ item }}) => {}}}\n/>",
        kit.text("{item.text}")
    ));
    room.children.push(kit.input("Message", "draft", "setDraft"));
    if opts.media {
        room.import("import AttachmentPicker from '../components/AttachmentPicker';");
        room.children.push("<AttachmentPicker onPick={(uri) => send('', uri)} />".to_string());
    }
    room.children.push(kit.button("Send", "() => { send(draft); setDraft(''); }"));
    set.screen("src/features/chat/screens/ChatRoomScreen", &room);

    if opts.media {
        set.component("src/features/chat/components/AttachmentPicker", ATTACHMENT_PICKER, &[]);
    }

    set.store("chat", ctx.state_management);
    set.finish()
}

// ---------------------------------------------------------------------------
// Camera
// ---------------------------------------------------------------------------

const USE_CAMERA: &str = r#"import { useRef, useState } from 'react';
import { CameraView, useCameraPermissions } from 'expo-camera';
«import type { CameraType } from 'expo-camera';
»{{mediaImport}}
export function useCamera() {
  const cameraRef = useRef«<CameraView>»(null);
  const [permission, requestPermission] = useCameraPermissions();
  const [facing, setFacing] = useState«<CameraType>»('back');

  const toggleFacing = () => setFacing((current) => (current === 'back' ? 'front' : 'back'));

  const takePicture = async () => {
    const photo = await cameraRef.current?.takePictureAsync();
{{save}}    return photo;
  };

  return { cameraRef, permission, requestPermission, facing, toggleFacing, takePicture };
}
"#;

const SAVE_TO_LIBRARY: &str = r#"    if (photo) {
      const { granted } = await MediaLibrary.requestPermissionsAsync();
      if (granted) {
        await MediaLibrary.saveToLibraryAsync(photo.uri);
      }
    }
"#;

const BARCODE_OVERLAY: &str = r#"import React from 'react';
import { Text, View } from 'react-native';

export default function BarcodeOverlay({ data }«: { data: string | null }») {
  return (
    <View style={{ position: 'absolute', bottom: 120, left: 24, right: 24, padding: 12, borderRadius: 8, backgroundColor: 'rgba(0,0,0,0.6)' }}>
      <Text style={{ color: 'white', textAlign: 'center' }}>{data ?? 'Point the camera at a barcode'}</Text>
    </View>
  );
}
"#;

/// Camera screen with permission handling and capture hook
pub fn camera(ctx: &FeatureContext) -> Vec<GeneratedFile> {
    let opts = match &ctx.options {
        FeatureOptions::Camera(opts) => opts.clone(),
        _ => CameraOptions::default(),
    };
    let mut set = FileSet::new(ctx);
    let kit = set.kit;

    let mut screen = ScreenParts::new("CameraScreen");
    screen.elements.extend([Element::Text, Element::Button]);
    screen.import("import { CameraView } from 'expo-camera';");
    screen.import("import { useCamera } from '../../../hooks/useCamera';");
    screen.setup("const { cameraRef, permission, requestPermission, facing, toggleFacing, takePicture } = useCamera();");

    let mut scanner = String::new();
    if opts.barcode {
        screen.hook("useState");
        screen.import("import BarcodeOverlay from '../components/BarcodeOverlay';");
        screen.setup(&format!(
            "const [scanned, setScanned] = useState{}(null);",
            when(ctx.typescript, "<string | null>")
        ));
        scanner = "\n  barcodeScannerSettings={{ barcodeTypes: ['qr', 'ean13', 'code128'] }}\n  onBarcodeScanned={({ data }) => setScanned(data)}".to_string();
    }
    screen.setup(&format!(
        "if (!permission?.granted) {{\n  return (\n{}\n  );\n}}",
        indent(
            &prompt_block(
                &kit,
                "Camera access",
                "We need your permission to use the camera.",
                "Grant permission",
                "requestPermission"
            ),
            4
        )
    ));

    screen.children.push(format!(
        "<CameraView\n  ref={{cameraRef}}\n  style={{{{ flex: 1 }}}}\n  facing={{facing}}{scanner}\n/>"
    ));
    if opts.barcode {
        screen.children.push("<BarcodeOverlay data={scanned} />".to_string());
    }
    screen.children.push(kit.button("Flip", "toggleFacing"));
    screen.children.push(kit.button("Capture", "takePicture"));
    set.screen("src/features/camera/screens/CameraScreen", &screen);

    let (media_import, save) = if opts.media_library {
        ("import * as MediaLibrary from 'expo-media-library';\n", SAVE_TO_LIBRARY)
    } else {
        ("", "")
    };
    set.script(
        "src/hooks/useCamera",
        USE_CAMERA,
        &[("mediaImport", media_import), ("save", save)],
    );

    if opts.barcode {
        set.component("src/features/camera/components/BarcodeOverlay", BARCODE_OVERLAY, &[]);
    }
    set.finish()
}

// ---------------------------------------------------------------------------
// Maps
// ---------------------------------------------------------------------------

const USE_LOCATION: &str = r#"import { useEffect, useState } from 'react';
import * as Location from 'expo-location';

export function useLocation() {
  const [location, setLocation] = useState«<Location.LocationObject | null>»(null);
  const [error, setError] = useState«<string | null>»(null);

  useEffect(() => {
    (async () => {
      const { status } = await Location.requestForegroundPermissionsAsync();
      if (status !== 'granted') {
        setError('Location permission denied');
        return;
      }
      setLocation(await Location.getCurrentPositionAsync({}));
    })();
  }, []);

  return { location, error };
}
"#;

const LOCATION_TASK: &str = r#"import * as Location from 'expo-location';
import * as TaskManager from 'expo-task-manager';

export const LOCATION_TASK = 'background-location-task';

TaskManager.defineTask(LOCATION_TASK, async ({ data, error }) => {
  if (error) {
    console.warn(error.message);
    return;
  }
  const { locations } = data« as { locations: Location.LocationObject[] }»;
  console.log('background locations', locations.length);
});

export async function startBackgroundTracking() {
  const { status } = await Location.requestBackgroundPermissionsAsync();
  if (status !== 'granted') return false;
  await Location.startLocationUpdatesAsync(LOCATION_TASK, { accuracy: Location.Accuracy.Balanced });
  return true;
}

export async function stopBackgroundTracking() {
  await Location.stopLocationUpdatesAsync(LOCATION_TASK);
}
"#;

/// Map screen centered on the device location
pub fn maps(ctx: &FeatureContext) -> Vec<GeneratedFile> {
    let opts = match &ctx.options {
        FeatureOptions::Maps(opts) => opts.clone(),
        _ => MapsOptions::default(),
    };
    let mut set = FileSet::new(ctx);
    let kit = set.kit;
    let google = opts.provider == MapProvider::Google;

    let mut screen = ScreenParts::new("MapScreen");
    screen.elements.extend([Element::Text, Element::Spinner]);
    screen.import(if google {
        "import MapView, { Marker, PROVIDER_GOOGLE } from 'react-native-maps';"
    } else {
        "import MapView, { Marker } from 'react-native-maps';"
    });
    screen.import("import { useLocation } from '../../../hooks/useLocation';");
    screen.setup("const { location, error } = useLocation();");
    if opts.background_location {
        screen.elements.push(Element::Button);
        screen.import("import { startBackgroundTracking } from '../tasks/locationTask';");
    }
    screen.setup(&format!(
        "if (!location) {{\n  return error ? {} : <ActivityIndicator style={{{{ flex: 1 }}}} />;\n}}",
        kit.text("{error}")
    ));
    screen.setup("const { latitude, longitude } = location.coords;");
    screen.children.push(format!(
        "<MapView\n  style={{{{ flex: 1 }}}}{}\n  initialRegion={{{{ latitude, longitude, latitudeDelta: 0.05, longitudeDelta: 0.05 }}}}\n  showsUserLocation\n>\n  <Marker coordinate={{{{ latitude, longitude }}}} />\n</MapView>",
        when(google, "\n  provider={PROVIDER_GOOGLE}")
    ));
    if opts.background_location {
        screen.children.push(kit.button("Track in background", "startBackgroundTracking"));
    }
    set.screen("src/features/maps/screens/MapScreen", &screen);

    set.script("src/hooks/useLocation", USE_LOCATION, &[]);
    if opts.background_location {
        set.script("src/features/maps/tasks/locationTask", LOCATION_TASK, &[]);
    }
    set.finish()
}
