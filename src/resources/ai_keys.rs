use crate::resources::{
    Credential, Draft, DraftError, FieldSpec, FieldValues, Resource, RowSource, enabled_default,
    null_as_default, nullable,
};
use serde::Deserialize;
use serde_json::{Value, json};

/// Providers the console can store keys for.
pub const AI_PROVIDERS: &[&str] = &[
    "openai",
    "groq",
    "openrouter",
    "together",
    "anthropic",
    "cohere",
];

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AiKey {
    pub id: String,
    pub provider: String,
    /// Unique short name generated by the backend, e.g. `openai-2`.
    #[serde(default)]
    pub name: String,
    pub display_name: String,
    pub api_key: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requests_used: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requests_limit: i64,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Resource for AiKey {
    const SOURCE: RowSource = RowSource::Table("ai_api_keys");
    const LABEL: &'static str = "AI API key";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Credential for AiKey {
    const SECRET_NOUN: &'static str = "API key";

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn secret(&self) -> &str {
        &self.api_key
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn usage(&self) -> (i64, i64) {
        (self.requests_used, self.requests_limit)
    }

    fn details(&self) -> Vec<String> {
        let mut details = vec![format!("{} · {}", self.provider, self.name)];
        if let Some(model) = &self.model {
            details.push(format!("model {}", model));
        }
        details
    }
}

const PROVIDER: FieldSpec = FieldSpec::text("provider", "Provider")
    .required()
    .choices(AI_PROVIDERS);
const DISPLAY_NAME: FieldSpec = FieldSpec::text("display_name", "Display name").required();
const API_KEY: FieldSpec = FieldSpec::text("api_key", "API key").required().secret();
const MODEL: FieldSpec = FieldSpec::text("model", "Model");
const REQUESTS_LIMIT: FieldSpec =
    FieldSpec::text("requests_limit", "Requests limit").default_value("1000");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiKeyDraft {
    pub provider: String,
    pub display_name: String,
    pub api_key: String,
    pub model: Option<String>,
    pub requests_limit: i64,
}

impl Draft for AiKeyDraft {
    type Target = AiKey;

    const FIELDS: &'static [FieldSpec] =
        &[PROVIDER, DISPLAY_NAME, API_KEY, MODEL, REQUESTS_LIMIT];

    fn from_fields(values: &FieldValues) -> Result<Self, DraftError> {
        Ok(Self {
            provider: values.require(&PROVIDER)?.to_string(),
            display_name: values.require(&DISPLAY_NAME)?.to_string(),
            api_key: values.require(&API_KEY)?.to_string(),
            model: values.optional(&MODEL),
            requests_limit: values.number(&REQUESTS_LIMIT)?,
        })
    }

    fn provider_type(&self) -> Option<&str> {
        Some(&self.provider)
    }

    fn into_row(self, generated_name: Option<String>) -> Value {
        let name = generated_name.unwrap_or_else(|| self.provider.clone());
        json!({
            "provider": self.provider,
            "name": name,
            "display_name": self.display_name,
            "api_key": self.api_key,
            "model": nullable(self.model),
            "requests_limit": self.requests_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> FieldValues {
        FieldValues::defaults(AiKeyDraft::FIELDS)
            .with("provider", "openai")
            .with("display_name", "Prod Key")
            .with("api_key", "sk-test-123")
    }

    #[test]
    fn test_draft_uses_default_limit_and_generated_name() {
        let draft = AiKeyDraft::from_fields(&filled()).unwrap();
        assert_eq!(draft.requests_limit, 1000);
        assert_eq!(draft.provider_type(), Some("openai"));

        let row = draft.into_row(Some("openai-3".to_string()));
        assert_eq!(row["name"], "openai-3");
        assert_eq!(row["model"], Value::Null);
        assert!(row.get("id").is_none());
        assert!(row.get("enabled").is_none());
        assert!(row.get("requests_used").is_none());
    }

    #[test]
    fn test_missing_generated_name_falls_back_to_provider() {
        let row = AiKeyDraft::from_fields(&filled()).unwrap().into_row(None);
        assert_eq!(row["name"], "openai");
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let values = filled().with("provider", "acme");
        assert!(matches!(
            AiKeyDraft::from_fields(&values),
            Err(DraftError::NotAChoice { .. })
        ));
    }

    #[test]
    fn test_row_decodes_with_defaults() {
        let key: AiKey = serde_json::from_value(json!({
            "id": "k1",
            "provider": "groq",
            "display_name": "Fast",
            "api_key": "gsk_1"
        }))
        .unwrap();
        assert!(key.enabled);
        assert_eq!(key.usage(), (0, 0));
        assert_eq!(key.details(), vec!["groq · ".to_string()]);
    }

    #[test]
    fn test_row_with_null_columns_decodes() {
        let key: AiKey = serde_json::from_value(json!({
            "id": "k2",
            "provider": "openai",
            "name": "openai-1",
            "display_name": "Prod Key",
            "api_key": "sk-test-123",
            "model": null,
            "enabled": true,
            "requests_used": null,
            "requests_limit": null,
            "created_at": "2024-05-01T10:00:00+00:00",
            "updated_at": "2024-05-01T10:00:00+00:00"
        }))
        .unwrap();
        assert_eq!(key.model, None);
        assert_eq!(key.usage(), (0, 0));
    }
}
