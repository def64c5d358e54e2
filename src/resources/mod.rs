//! Typed rows for every backend collection the console manages.
//!
//! Rows are decoded from the backend's JSON with serde and never written
//! back wholesale: mutations send only the fields they change.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

pub mod ai_keys;
pub mod github_tokens;
pub mod netlify_keys;
pub mod projects;
pub mod system_status;
pub mod users;
pub mod youtube_keys;

pub use ai_keys::{AI_PROVIDERS, AiKey, AiKeyDraft};
pub use github_tokens::{GithubToken, GithubTokenDraft};
pub use netlify_keys::{NetlifyKey, NetlifyKeyDraft};
pub use projects::{Project, ProjectStatus};
pub use system_status::ServiceStatus;
pub use users::AuthUser;
pub use youtube_keys::{YoutubeKey, YoutubeKeyDraft};

/// Where a resource's rows come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSource {
    /// A table behind the REST endpoint, with realtime change notifications.
    Table(&'static str),
    /// The auth service's admin user list. No change feed.
    AuthUsers,
}

impl RowSource {
    pub fn table(&self) -> Option<&'static str> {
        match self {
            RowSource::Table(table) => Some(table),
            RowSource::AuthUsers => None,
        }
    }
}

pub trait Resource: DeserializeOwned + Clone + Send + Sync + 'static {
    const SOURCE: RowSource;
    /// Human name used in notifications, e.g. "AI API key".
    const LABEL: &'static str;
    /// Column the list is sorted by, newest first.
    const ORDER_BY: &'static str = "created_at";

    fn id(&self) -> &str;
}

/// A resource holding a secret that can be revealed, copied and switched off.
pub trait Credential: Resource {
    /// What the secret is called in notifications, e.g. "API key" or "Token".
    const SECRET_NOUN: &'static str;

    fn display_name(&self) -> &str;
    fn secret(&self) -> &str;
    fn enabled(&self) -> bool;
    /// Used and allowed units for the usage badge.
    fn usage(&self) -> (i64, i64);
    /// Extra facts shown under the name (model, repository, site).
    fn details(&self) -> Vec<String> {
        Vec::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{0} must be a whole number")]
    NotANumber(&'static str),

    #[error("{field} must be one of: {choices}")]
    NotAChoice { field: &'static str, choices: String },

    #[error("{0} rows cannot be created from the console")]
    ReadOnly(&'static str),
}

/// One input of a creation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub required: bool,
    /// Pre-filled value.
    pub default: &'static str,
    /// Rendered masked while typing.
    pub secret: bool,
    /// Allowed values; empty means free text.
    pub choices: &'static [&'static str],
}

impl FieldSpec {
    pub const fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            required: false,
            default: "",
            secret: false,
            choices: &[],
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    pub const fn default_value(mut self, default: &'static str) -> Self {
        self.default = default;
        self
    }

    pub const fn choices(mut self, choices: &'static [&'static str]) -> Self {
        self.choices = choices;
        self
    }
}

/// Raw text entered into a form, keyed by [`FieldSpec::key`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    values: Vec<(&'static str, String)>,
}

impl FieldValues {
    /// Values pre-filled with each field's default.
    pub fn defaults(fields: &[FieldSpec]) -> Self {
        Self {
            values: fields
                .iter()
                .map(|f| (f.key, f.default.to_string()))
                .collect(),
        }
    }

    pub fn set(&mut self, key: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.values.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.values.push((key, value)),
        }
    }

    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Trimmed value; empty when absent.
    pub fn get(&self, key: &str) -> &str {
        self.values
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.trim())
            .unwrap_or("")
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut String> {
        self.values
            .iter_mut()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    /// Value for a field, validated against its [`FieldSpec`].
    pub fn require(&self, field: &FieldSpec) -> Result<&str, DraftError> {
        let value = self.get(field.key);
        if field.required && value.is_empty() {
            return Err(DraftError::Missing(field.label));
        }
        if !field.choices.is_empty() && !value.is_empty() && !field.choices.contains(&value) {
            return Err(DraftError::NotAChoice {
                field: field.label,
                choices: field.choices.join(", "),
            });
        }
        Ok(value)
    }

    /// `None` when the field was left empty.
    pub fn optional(&self, field: &FieldSpec) -> Option<String> {
        let value = self.get(field.key);
        (!value.is_empty()).then(|| value.to_string())
    }

    pub fn number(&self, field: &FieldSpec) -> Result<i64, DraftError> {
        let value = self.require(field)?;
        let value = if value.is_empty() { field.default } else { value };
        value
            .parse::<i64>()
            .ok()
            .filter(|n| *n >= 0)
            .ok_or(DraftError::NotANumber(field.label))
    }
}

/// Validated input for creating a new row of `Target`.
pub trait Draft: Sized + Send + 'static {
    type Target: Resource;

    const FIELDS: &'static [FieldSpec];

    /// Checks required fields and numeric limits.
    fn from_fields(values: &FieldValues) -> Result<Self, DraftError>;

    /// Provider whose unique short name the backend should generate, if any.
    fn provider_type(&self) -> Option<&str> {
        None
    }

    /// Row to insert. Never carries `id`, `enabled` or usage counters.
    fn into_row(self, generated_name: Option<String>) -> Value;
}

/// Serde default for `enabled` columns.
pub(crate) fn enabled_default() -> bool {
    true
}

/// Reads a nullable column, treating `null` like a missing value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Turns an empty string into JSON null for nullable columns.
pub(crate) fn nullable(value: Option<String>) -> Value {
    value.map(Value::String).unwrap_or(Value::Null)
}
