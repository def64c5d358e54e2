use crate::resources::{
    Credential, Draft, DraftError, FieldSpec, FieldValues, Resource, RowSource, enabled_default,
    null_as_default, nullable,
};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NetlifyKey {
    pub id: String,
    pub name: String,
    pub api_key: String,
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub site_name: Option<String>,
    #[serde(default)]
    pub site_url: Option<String>,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deployments_count: i64,
    #[serde(default)]
    pub last_deployment: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Resource for NetlifyKey {
    const SOURCE: RowSource = RowSource::Table("netlify_api_keys");
    const LABEL: &'static str = "Netlify API key";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Credential for NetlifyKey {
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
        (self.deployments_count, 0)
    }

    fn details(&self) -> Vec<String> {
        self.site_name
            .iter()
            .chain(self.site_url.iter())
            .cloned()
            .chain(
                self.last_deployment
                    .as_ref()
                    .map(|d| format!("last deploy {}", d)),
            )
            .collect()
    }
}

const NAME: FieldSpec = FieldSpec::text("name", "Name").required();
const API_KEY: FieldSpec = FieldSpec::text("api_key", "API key").required().secret();
const SITE_ID: FieldSpec = FieldSpec::text("site_id", "Site ID");
const SITE_NAME: FieldSpec = FieldSpec::text("site_name", "Site name");
const SITE_URL: FieldSpec = FieldSpec::text("site_url", "Site URL");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetlifyKeyDraft {
    pub name: String,
    pub api_key: String,
    pub site_id: Option<String>,
    pub site_name: Option<String>,
    pub site_url: Option<String>,
}

impl Draft for NetlifyKeyDraft {
    type Target = NetlifyKey;

    const FIELDS: &'static [FieldSpec] = &[NAME, API_KEY, SITE_ID, SITE_NAME, SITE_URL];

    fn from_fields(values: &FieldValues) -> Result<Self, DraftError> {
        Ok(Self {
            name: values.require(&NAME)?.to_string(),
            api_key: values.require(&API_KEY)?.to_string(),
            site_id: values.optional(&SITE_ID),
            site_name: values.optional(&SITE_NAME),
            site_url: values.optional(&SITE_URL),
        })
    }

    fn into_row(self, _generated_name: Option<String>) -> Value {
        json!({
            "name": self.name,
            "api_key": self.api_key,
            "site_id": nullable(self.site_id),
            "site_name": nullable(self.site_name),
            "site_url": nullable(self.site_url),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_keeps_site_metadata() {
        let values = FieldValues::defaults(NetlifyKeyDraft::FIELDS)
            .with("name", "prod")
            .with("api_key", "nfp_1")
            .with("site_name", "acme-site");
        let row = NetlifyKeyDraft::from_fields(&values)
            .unwrap()
            .into_row(None);
        assert_eq!(row["site_name"], "acme-site");
        assert_eq!(row["site_id"], Value::Null);
    }

    #[test]
    fn test_row_with_null_columns_decodes() {
        let key: NetlifyKey = serde_json::from_value(json!({
            "id": "n1",
            "name": "prod",
            "api_key": "nfp_1",
            "site_id": null,
            "site_name": null,
            "site_url": "https://acme.netlify.app",
            "enabled": true,
            "deployments_count": null,
            "last_deployment": null,
            "created_at": "2024-05-01T10:00:00+00:00",
            "updated_at": "2024-05-01T10:00:00+00:00"
        }))
        .unwrap();
        assert_eq!(key.details(), vec!["https://acme.netlify.app".to_string()]);
        assert_eq!(key.usage(), (0, 0));
    }
}
