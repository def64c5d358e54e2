use crate::resources::{Resource, RowSource};
use serde::Deserialize;

/// An account known to the auth service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_sign_in_at: Option<String>,
    #[serde(default)]
    pub email_confirmed_at: Option<String>,
}

impl Resource for AuthUser {
    const SOURCE: RowSource = RowSource::AuthUsers;
    const LABEL: &'static str = "User";

    fn id(&self) -> &str {
        &self.id
    }
}

impl AuthUser {
    /// Case-insensitive match on email or id. An empty query matches everyone.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.id.to_lowercase().contains(&query)
            || self
                .email
                .as_deref()
                .is_some_and(|email| email.to_lowercase().contains(&query))
    }

    pub fn is_confirmed(&self) -> bool {
        self.email_confirmed_at.is_some()
    }
}
