use crate::resources::{
    Credential, Draft, DraftError, FieldSpec, FieldValues, Resource, RowSource, enabled_default,
    null_as_default,
};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct YoutubeKey {
    pub id: String,
    pub name: String,
    pub api_key: String,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quota_used: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quota_limit: i64,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Resource for YoutubeKey {
    const SOURCE: RowSource = RowSource::Table("youtube_api_keys");
    const LABEL: &'static str = "YouTube API key";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Credential for YoutubeKey {
    const SECRET_NOUN: &'static str = "API key";

    fn display_name(&self) -> &str {
        &self.name
    }

    fn secret(&self) -> &str {
        &self.api_key
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn usage(&self) -> (i64, i64) {
        (self.quota_used, self.quota_limit)
    }
}

const NAME: FieldSpec = FieldSpec::text("name", "Name").required();
const API_KEY: FieldSpec = FieldSpec::text("api_key", "API key").required().secret();
const QUOTA_LIMIT: FieldSpec = FieldSpec::text("quota_limit", "Daily quota").default_value("10000");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YoutubeKeyDraft {
    pub name: String,
    pub api_key: String,
    pub quota_limit: i64,
}

impl Draft for YoutubeKeyDraft {
    type Target = YoutubeKey;

    const FIELDS: &'static [FieldSpec] = &[NAME, API_KEY, QUOTA_LIMIT];

    fn from_fields(values: &FieldValues) -> Result<Self, DraftError> {
        Ok(Self {
            name: values.require(&NAME)?.to_string(),
            api_key: values.require(&API_KEY)?.to_string(),
            quota_limit: values.number(&QUOTA_LIMIT)?,
        })
    }

    fn into_row(self, _generated_name: Option<String>) -> Value {
        json!({
            "name": self.name,
            "api_key": self.api_key,
            "quota_limit": self.quota_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_defaults_and_validation() {
        let values = FieldValues::defaults(YoutubeKeyDraft::FIELDS)
            .with("name", "Main")
            .with("api_key", "AIza123");
        let draft = YoutubeKeyDraft::from_fields(&values).unwrap();
        assert_eq!(draft.quota_limit, 10_000);
        assert_eq!(draft.provider_type(), None);

        let missing = values.with("api_key", "");
        assert_eq!(
            YoutubeKeyDraft::from_fields(&missing),
            Err(DraftError::Missing("API key"))
        );
    }

    #[test]
    fn test_row_with_null_quota_decodes() {
        let key: YoutubeKey = serde_json::from_value(json!({
            "id": "y1",
            "name": "Main",
            "api_key": "AIza123",
            "enabled": false,
            "quota_used": null,
            "quota_limit": 10000,
            "created_at": "2024-05-01T10:00:00+00:00",
            "updated_at": "2024-05-01T10:00:00+00:00"
        }))
        .unwrap();
        assert!(!key.enabled());
        assert_eq!(key.usage(), (0, 10_000));
    }
}
