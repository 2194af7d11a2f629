use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{de::Deserializer, Deserialize, Serialize};

use crate::ConfigError;

/// User-facing preferences persisted between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default)]
    pub language: Language,
    #[serde(default = "Settings::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_export_date: Option<NaiveDate>,
    /// Calendar months of history kept before old transactions are purged.
    #[serde(default = "Settings::default_retention_months")]
    pub retention_months: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            language: Language::default(),
            currency_symbol: Self::default_currency_symbol(),
            last_export_date: None,
            retention_months: Self::default_retention_months(),
        }
    }
}

impl Settings {
    pub fn default_currency_symbol() -> String {
        "Q".into()
    }

    pub fn default_retention_months() -> u32 {
        12
    }

    /// Returns a copy with every field present in `patch` replaced.
    pub fn merged(&self, patch: &SettingsPatch) -> Result<Settings, ConfigError> {
        let mut next = self.clone();
        if let Some(dark_mode) = patch.dark_mode {
            next.dark_mode = dark_mode;
        }
        if let Some(language) = patch.language {
            next.language = language;
        }
        if let Some(symbol) = &patch.currency_symbol {
            let symbol = symbol.trim();
            if symbol.is_empty() {
                return Err(ConfigError::Invalid("currency symbol cannot be empty".into()));
            }
            next.currency_symbol = symbol.to_string();
        }
        if let Some(date) = patch.last_export_date {
            next.last_export_date = Some(date);
        }
        if let Some(months) = patch.retention_months {
            if !(1..=MAX_RETENTION_MONTHS).contains(&months) {
                return Err(ConfigError::Invalid(format!(
                    "retention must be between 1 and {MAX_RETENTION_MONTHS} months"
                )));
            }
            next.retention_months = months;
        }
        Ok(next)
    }
}

/// Longest history window a user can ask for (100 years).
pub const MAX_RETENTION_MONTHS: u32 = 1200;

/// Partial settings update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub dark_mode: Option<bool>,
    pub language: Option<Language>,
    pub currency_symbol: Option<String>,
    pub last_export_date: Option<NaiveDate>,
    pub retention_months: Option<u32>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == SettingsPatch::default()
    }

    /// Builds a patch for one named field from its textual value, as typed at the prompt.
    pub fn parse_field(field: &str, value: &str) -> Result<SettingsPatch, ConfigError> {
        let value = value.trim();
        let mut patch = SettingsPatch::default();
        match field.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "dark_mode" | "dark" => patch.dark_mode = Some(parse_bool(value)?),
            "language" | "lang" => patch.language = Some(value.parse()?),
            "currency" | "currency_symbol" => patch.currency_symbol = Some(value.to_string()),
            "retention" | "retention_months" => {
                let months = value
                    .parse()
                    .map_err(|_| ConfigError::Invalid(format!("`{value}` is not a month count")))?;
                patch.retention_months = Some(months);
            }
            other => return Err(ConfigError::Invalid(format!("unknown setting `{other}`"))),
        }
        Ok(patch)
    }
}

fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(ConfigError::Invalid(format!("`{other}` is not on/off"))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Es,
    En,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Es => "es",
            Language::En => "en",
        }
    }
}

impl FromStr for Language {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "es" | "spanish" | "español" => Ok(Language::Es),
            "en" | "english" => Ok(Language::En),
            other => Err(ConfigError::Invalid(format!("unsupported language `{other}`"))),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default())
    }
}
