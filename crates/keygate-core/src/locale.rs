//! UI locales.
//!
//! The locale set is closed: the picker can only ever hand out one of the
//! twelve `Locale` variants.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    Zh,
    ZhTw,
    #[default]
    En,
    Ja,
    Ko,
    Ru,
    Tr,
    Vi,
    Pt,
    Es,
    Ar,
    My,
}

impl Locale {
    /// Every selectable locale, in picker order
    pub const ALL: [Locale; 12] = [
        Locale::Zh,
        Locale::ZhTw,
        Locale::En,
        Locale::Ja,
        Locale::Ko,
        Locale::Ru,
        Locale::Tr,
        Locale::Vi,
        Locale::Pt,
        Locale::Es,
        Locale::Ar,
        Locale::My,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Locale::Zh => "zh",
            Locale::ZhTw => "zh-TW",
            Locale::En => "en",
            Locale::Ja => "ja",
            Locale::Ko => "ko",
            Locale::Ru => "ru",
            Locale::Tr => "tr",
            Locale::Vi => "vi",
            Locale::Pt => "pt",
            Locale::Es => "es",
            Locale::Ar => "ar",
            Locale::My => "my",
        }
    }

    /// Name of the language in that language
    pub fn display_name(&self) -> &'static str {
        match self {
            Locale::Zh => "简体中文",
            Locale::ZhTw => "繁體中文",
            Locale::En => "English",
            Locale::Ja => "日本語",
            Locale::Ko => "한국어",
            Locale::Ru => "Русский",
            Locale::Tr => "Türkçe",
            Locale::Vi => "Tiếng Việt",
            Locale::Pt => "Português",
            Locale::Es => "Español",
            Locale::Ar => "العربية",
            Locale::My => "မြန်မာ",
        }
    }

    /// Parse a locale code. Matching is case-insensitive and accepts `_` for `-`.
    pub fn from_code(code: &str) -> Option<Self> {
        let normalized = code.trim().replace('_', "-").to_lowercase();
        Self::ALL
            .into_iter()
            .find(|l| l.code().to_lowercase() == normalized)
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|l| l == self).unwrap_or(0)
    }
}

impl Serialize for Locale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// Unknown codes deserialize to the default locale rather than failing the
/// whole config.
impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Locale::from_code(&code).unwrap_or_default())
    }
}

/// The process-wide active locale. Clones share the same value.
#[derive(Debug, Clone, Default)]
pub struct LocaleSetting {
    active: Arc<RwLock<Locale>>,
}

impl LocaleSetting {
    pub fn new(locale: Locale) -> Self {
        Self {
            active: Arc::new(RwLock::new(locale)),
        }
    }

    pub fn get(&self) -> Locale {
        self.active.read().map(|l| *l).unwrap_or_default()
    }

    pub fn set(&self, locale: Locale) {
        match self.active.write() {
            Ok(mut active) => {
                *active = locale;
                info!(locale = locale.code(), "Active locale changed");
            }
            Err(_) => {
                warn!(locale = locale.code(), "Locale lock poisoned, keeping previous locale")
            }
        }
    }
}

/// Dropdown state for choosing a locale
#[derive(Debug, Clone, Default)]
pub struct LocalePicker {
    open: bool,
    highlighted: usize,
}

impl LocalePicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open the picker with the currently active locale highlighted
    pub fn open(&mut self, current: Locale) {
        self.open = true;
        self.highlighted = current.index();
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self, current: Locale) {
        if self.open {
            self.close();
        } else {
            self.open(current);
        }
    }

    pub fn highlighted(&self) -> Locale {
        Locale::ALL[self.highlighted.min(Locale::ALL.len() - 1)]
    }

    /// Move the highlight down, wrapping around
    pub fn next(&mut self) {
        self.highlighted = (self.highlighted + 1) % Locale::ALL.len();
    }

    /// Move the highlight up, wrapping around
    pub fn prev(&mut self) {
        self.highlighted = (self.highlighted + Locale::ALL.len() - 1) % Locale::ALL.len();
    }

    /// Pick `locale`, make it active and close the picker
    pub fn select(&mut self, locale: Locale, setting: &LocaleSetting) {
        setting.set(locale);
        self.highlighted = locale.index();
        self.close();
    }

    /// Pick the highlighted locale
    pub fn confirm(&mut self, setting: &LocaleSetting) -> Locale {
        let locale = self.highlighted();
        self.select(locale, setting);
        locale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twelve_unique_codes() {
        assert_eq!(Locale::ALL.len(), 12);
        let mut codes: Vec<&str> = Locale::ALL.iter().map(|l| l.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), 12);
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Locale::from_code("ja"), Some(Locale::Ja));
        assert_eq!(Locale::from_code("zh-TW"), Some(Locale::ZhTw));
        assert_eq!(Locale::from_code("zh_tw"), Some(Locale::ZhTw));
        assert_eq!(Locale::from_code(" EN "), Some(Locale::En));
        assert_eq!(Locale::from_code("fr"), None);
        assert_eq!(Locale::from_code(""), None);
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Locale::ZhTw).unwrap(), "\"zh-TW\"");
        let l: Locale = serde_json::from_str("\"ko\"").unwrap();
        assert_eq!(l, Locale::Ko);
        // Unknown falls back instead of failing
        let l: Locale = serde_json::from_str("\"klingon\"").unwrap();
        assert_eq!(l, Locale::En);
    }

    #[test]
    fn test_select_sets_active_and_closes() {
        let setting = LocaleSetting::new(Locale::En);
        let mut picker = LocalePicker::new();
        picker.open(setting.get());
        assert!(picker.is_open());

        picker.select(Locale::Ja, &setting);

        assert_eq!(setting.get(), Locale::Ja);
        assert_eq!(setting.get().code(), "ja");
        assert!(!picker.is_open());
    }

    #[test]
    fn test_confirm_highlighted() {
        let setting = LocaleSetting::new(Locale::En);
        let shared = setting.clone();
        let mut picker = LocalePicker::new();
        picker.open(setting.get());
        assert_eq!(picker.highlighted(), Locale::En);

        picker.next();
        assert_eq!(picker.confirm(&setting), Locale::Ja);
        assert_eq!(shared.get(), Locale::Ja);
        assert!(!picker.is_open());
    }

    #[test]
    fn test_picker_navigation_wraps() {
        let mut picker = LocalePicker::new();
        picker.open(Locale::Zh);
        picker.prev();
        assert_eq!(picker.highlighted(), Locale::My);
        picker.next();
        assert_eq!(picker.highlighted(), Locale::Zh);
    }

    #[test]
    fn test_set_on_poisoned_lock_keeps_default() {
        let setting = LocaleSetting::new(Locale::Ko);
        let shared = setting.clone();
        let _ = std::thread::spawn(move || {
            let _guard = shared.active.write().unwrap();
            panic!("poison the locale lock");
        })
        .join();

        setting.set(Locale::Ja);
        assert_eq!(setting.get(), Locale::En);
    }

    #[test]
    fn test_toggle() {
        let mut picker = LocalePicker::new();
        picker.toggle(Locale::Ru);
        assert!(picker.is_open());
        assert_eq!(picker.highlighted(), Locale::Ru);
        picker.toggle(Locale::Ru);
        assert!(!picker.is_open());
    }
}
