//! Settings document of the wrapped program
//!
//! The document belongs to another program, so it is kept as an untyped JSON
//! object. Only the handful of keys this tool manages are touched; every other
//! key and its value survive a read-modify-write cycle in their original order.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub const ENV_KEY: &str = "env";
pub const AUTH_TOKEN_KEY: &str = "ANTHROPIC_AUTH_TOKEN";
pub const BASE_URL_KEY: &str = "ANTHROPIC_BASE_URL";

/// Character used to hide the middle of a token
pub const MASK_CHAR: char = '*';
const MASK_VISIBLE_PREFIX: usize = 8;
const MASK_VISIBLE_SUFFIX: usize = 8;
/// Tokens up to this length are shown in full
const MASK_MIN_LENGTH: usize = 10;

/// Wrapped program settings, preserved verbatim apart from the managed keys
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetSettings(Map<String, Value>);

impl TargetSettings {
    /// Create an empty settings object
    pub fn new() -> Self {
        Self::default()
    }

    /// Skeleton written when the settings file is created from scratch
    pub fn skeleton() -> Self {
        let mut map = Map::new();
        map.insert(ENV_KEY.to_string(), Value::Object(Map::new()));
        map.insert(
            "permissions".to_string(),
            serde_json::json!({ "allow": [], "deny": [] }),
        );
        Self(map)
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Parse a settings document; the root must be a JSON object
    pub fn from_json_str(content: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(content)? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(AppError::parse(format!(
                "settings root must be a JSON object, found {}",
                json_type_name(&other)
            ))),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Whether an `env` object is present
    pub fn has_env(&self) -> bool {
        matches!(self.0.get(ENV_KEY), Some(Value::Object(_)))
    }

    fn env_str(&self, key: &str) -> Option<&str> {
        self.0
            .get(ENV_KEY)
            .and_then(Value::as_object)
            .and_then(|env| env.get(key))
            .and_then(Value::as_str)
    }

    /// Current auth token, if set
    pub fn auth_token(&self) -> Option<&str> {
        self.env_str(AUTH_TOKEN_KEY).filter(|token| !token.is_empty())
    }

    /// Current base URL, if set
    pub fn base_url(&self) -> Option<&str> {
        self.env_str(BASE_URL_KEY).filter(|url| !url.is_empty())
    }

    /// Top-level legacy mirror of the base URL, if the document carries one
    pub fn legacy_base_url(&self) -> Option<&Value> {
        self.0.get(BASE_URL_KEY)
    }

    /// The `env` object, created when absent or null
    fn env_mut(&mut self) -> Result<&mut Map<String, Value>> {
        let entry = self
            .0
            .entry(ENV_KEY.to_string())
            .or_insert_with(|| Value::Object(Map::new()));

        if entry.is_null() {
            *entry = Value::Object(Map::new());
        }

        match entry {
            Value::Object(env) => Ok(env),
            other => Err(AppError::validation(format!(
                "'{}' in the settings file is a {}, expected an object",
                ENV_KEY,
                json_type_name(other)
            ))),
        }
    }

    /// Set `env.ANTHROPIC_AUTH_TOKEN`
    pub fn set_auth_token(&mut self, token: &str) -> Result<()> {
        self.env_mut()?
            .insert(AUTH_TOKEN_KEY.to_string(), Value::String(token.to_string()));
        Ok(())
    }

    /// Set `env.ANTHROPIC_BASE_URL`, and the top-level mirror only if it already exists
    pub fn set_base_url(&mut self, url: &str) -> Result<()> {
        self.env_mut()?
            .insert(BASE_URL_KEY.to_string(), Value::String(url.to_string()));

        if let Some(legacy) = self.0.get_mut(BASE_URL_KEY) {
            *legacy = Value::String(url.to_string());
        }

        Ok(())
    }

    /// Apply a validated `config set` update
    pub fn apply(&mut self, update: &SettingUpdate) -> Result<()> {
        match update {
            SettingUpdate::Token(token) => self.set_auth_token(token),
            SettingUpdate::BaseUrl(url) => self.set_base_url(url),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Settings that `config set` can change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    /// `token` -> `env.ANTHROPIC_AUTH_TOKEN`
    Token,
    /// `url` -> `env.ANTHROPIC_BASE_URL`
    BaseUrl,
}

impl SettingKey {
    pub const ALL: [SettingKey; 2] = [SettingKey::Token, SettingKey::BaseUrl];

    /// Name accepted on the command line
    pub fn name(&self) -> &'static str {
        match self {
            SettingKey::Token => "token",
            SettingKey::BaseUrl => "url",
        }
    }

    /// Comma-separated list of accepted names, for guidance messages
    pub fn supported_names() -> String {
        Self::ALL.iter().map(SettingKey::name).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SettingKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "token" => Ok(SettingKey::Token),
            "url" => Ok(SettingKey::BaseUrl),
            _ => Err(AppError::validation(format!(
                "Unsupported setting '{}' (supported: {})",
                s,
                Self::supported_names()
            ))),
        }
    }
}

/// A validated `key=value` assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingUpdate {
    Token(String),
    BaseUrl(String),
}

impl SettingUpdate {
    /// Parse `key=value`, splitting on the first `=` only
    pub fn parse(raw: &str) -> Result<Self> {
        let (key, value) = raw.split_once('=').ok_or_else(|| {
            AppError::validation(format!(
                "Expected key=value, got '{}' (e.g. token=xxx or url=https://host)",
                raw
            ))
        })?;

        if key.trim().is_empty() || value.is_empty() {
            return Err(AppError::validation(format!(
                "Both key and value are required, got '{}' (e.g. token=xxx or url=https://host)",
                raw
            )));
        }

        match key.parse::<SettingKey>()? {
            SettingKey::Token => Ok(SettingUpdate::Token(value.to_string())),
            SettingKey::BaseUrl => {
                validate_base_url(value)?;
                Ok(SettingUpdate::BaseUrl(value.to_string()))
            }
        }
    }
}

/// Accept only absolute http(s) URLs with a host.
///
/// `host:port` parses as a URL with scheme `host`, so the scheme is checked
/// explicitly.
fn validate_base_url(value: &str) -> Result<()> {
    let parsed = url::Url::parse(value)
        .map_err(|e| AppError::validation(format!("Invalid URL '{}': {}", value, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::validation(format!(
            "Invalid URL '{}': scheme must be http or https (e.g. url=https://host)",
            value
        )));
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(AppError::validation(format!("Invalid URL '{}': missing host", value)));
    }

    Ok(())
}

/// Hide the middle of a token for display.
///
/// Up to 10 characters the token is shown as is. Above 16 the first and last 8
/// characters stay visible with one mask character per hidden character. In
/// between, only the first 8 characters are shown so the two visible ends never
/// overlap.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    let len = chars.len();

    if len <= MASK_MIN_LENGTH {
        return token.to_string();
    }

    let prefix: String = chars[..MASK_VISIBLE_PREFIX].iter().collect();

    if len <= MASK_VISIBLE_PREFIX + MASK_VISIBLE_SUFFIX {
        let hidden = len - MASK_VISIBLE_PREFIX;
        return format!("{}{}", prefix, MASK_CHAR.to_string().repeat(hidden));
    }

    let hidden = len - MASK_VISIBLE_PREFIX - MASK_VISIBLE_SUFFIX;
    let suffix: String = chars[len - MASK_VISIBLE_SUFFIX..].iter().collect();
    format!("{}{}{}", prefix, MASK_CHAR.to_string().repeat(hidden), suffix)
}
