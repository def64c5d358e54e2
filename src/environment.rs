use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Default API port of a locally running backend stack.
const LOCAL_BACKEND_URL: &str = "http://127.0.0.1:54321";

/// Represents the backend deployment the console talks to.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Environment {
    /// Local development stack.
    #[default]
    Local,
    /// A hosted project reachable at the given base URL.
    Custom { backend_url: String },
}

impl Environment {
    /// Returns the base URL of the backend, without a trailing slash.
    pub fn backend_url(&self) -> String {
        match self {
            Environment::Local => LOCAL_BACKEND_URL.to_string(),
            Environment::Custom { backend_url } => backend_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL of the table and RPC endpoints.
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.backend_url())
    }

    /// Base URL of the auth service.
    pub fn auth_url(&self) -> String {
        format!("{}/auth/v1", self.backend_url())
    }

    /// Websocket endpoint of the realtime service, authenticated with `api_key`.
    pub fn realtime_url(&self, api_key: &str) -> String {
        let base = self.backend_url();
        let ws_base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            base
        };
        format!(
            "{}/realtime/v1/websocket?apikey={}&vsn=1.0.0",
            ws_base,
            urlencoding::encode(api_key)
        )
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("local") || trimmed.is_empty() {
            return Ok(Environment::Local);
        }
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return Ok(Environment::Custom {
                backend_url: trimmed.trim_end_matches('/').to_string(),
            });
        }
        Err(())
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Local => write!(f, "Local"),
            Environment::Custom { .. } => write!(f, "Hosted"),
        }
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Environment::{}, URL: {}", self, self.backend_url())
    }
}
