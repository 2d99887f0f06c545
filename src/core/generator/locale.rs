//! Generator locales

use crate::domain::GeneratorError;
use std::fmt;
use std::str::FromStr;

/// Data set used by the text generators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    /// English
    #[default]
    En,
    /// French (France)
    FrFr,
    /// Chinese (Simplified)
    ZhCn,
    /// Chinese (Traditional)
    ZhTw,
    /// Japanese
    JaJp,
}

impl Locale {
    /// Every supported locale
    pub const ALL: [Locale; 5] = [
        Locale::En,
        Locale::FrFr,
        Locale::ZhCn,
        Locale::ZhTw,
        Locale::JaJp,
    ];

    /// Canonical name
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::FrFr => "fr_FR",
            Locale::ZhCn => "zh_CN",
            Locale::ZhTw => "zh_TW",
            Locale::JaJp => "ja_JP",
        }
    }
}

impl FromStr for Locale {
    type Err = GeneratorError;

    /// Accepts canonical names case-insensitively, `-` or `_` as separator,
    /// plus the short forms `en_US`, `fr`, `zh` and `ja`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_").to_ascii_lowercase();
        match normalized.as_str() {
            "en" | "en_us" => Ok(Locale::En),
            "fr" | "fr_fr" => Ok(Locale::FrFr),
            "zh" | "zh_cn" => Ok(Locale::ZhCn),
            "zh_tw" => Ok(Locale::ZhTw),
            "ja" | "ja_jp" => Ok(Locale::JaJp),
            _ => Err(GeneratorError::UnsupportedLocale(s.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
