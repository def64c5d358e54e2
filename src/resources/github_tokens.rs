use crate::resources::{
    Credential, Draft, DraftError, FieldSpec, FieldValues, Resource, RowSource, enabled_default,
    null_as_default, nullable,
};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GithubToken {
    pub id: String,
    pub name: String,
    pub token: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub repo_name: Option<String>,
    #[serde(default)]
    pub repo_url: Option<String>,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub commits_count: i64,
    #[serde(default)]
    pub last_commit: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Resource for GithubToken {
    const SOURCE: RowSource = RowSource::Table("github_tokens");
    const LABEL: &'static str = "GitHub token";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Credential for GithubToken {
    const SECRET_NOUN: &'static str = "Token";

    fn display_name(&self) -> &str {
        &self.name
    }

    fn secret(&self) -> &str {
        &self.token
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    /// Commits have no cap.
    fn usage(&self) -> (i64, i64) {
        (self.commits_count, 0)
    }

    fn details(&self) -> Vec<String> {
        let repo = match (&self.username, &self.repo_name) {
            (Some(user), Some(repo)) => Some(format!("{}/{}", user, repo)),
            (None, Some(repo)) => Some(repo.clone()),
            (Some(user), None) => Some(user.clone()),
            (None, None) => None,
        };
        repo.into_iter()
            .chain(self.repo_url.clone())
            .chain(self.last_commit.as_ref().map(|c| format!("last commit {}", c)))
            .collect()
    }
}

const NAME: FieldSpec = FieldSpec::text("name", "Name").required();
const TOKEN: FieldSpec = FieldSpec::text("token", "Token").required().secret();
const USERNAME: FieldSpec = FieldSpec::text("username", "Username");
const REPO_NAME: FieldSpec = FieldSpec::text("repo_name", "Repository");
const REPO_URL: FieldSpec = FieldSpec::text("repo_url", "Repository URL");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubTokenDraft {
    pub name: String,
    pub token: String,
    pub username: Option<String>,
    pub repo_name: Option<String>,
    pub repo_url: Option<String>,
}

impl Draft for GithubTokenDraft {
    type Target = GithubToken;

    const FIELDS: &'static [FieldSpec] = &[NAME, TOKEN, USERNAME, REPO_NAME, REPO_URL];

    fn from_fields(values: &FieldValues) -> Result<Self, DraftError> {
        Ok(Self {
            name: values.require(&NAME)?.to_string(),
            token: values.require(&TOKEN)?.to_string(),
            username: values.optional(&USERNAME),
            repo_name: values.optional(&REPO_NAME),
            repo_url: values.optional(&REPO_URL),
        })
    }

    fn into_row(self, _generated_name: Option<String>) -> Value {
        json!({
            "name": self.name,
            "token": self.token,
            "username": nullable(self.username),
            "repo_name": nullable(self.repo_name),
            "repo_url": nullable(self.repo_url),
        })
    }
}
