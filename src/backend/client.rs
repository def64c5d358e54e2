//! Backend Client
//!
//! Talks to the table, RPC and auth-admin endpoints of the backend over HTTP.

use crate::backend::Backend;
use crate::backend::error::BackendError;
use crate::consts::cli_consts::http;
use crate::environment::Environment;
use reqwest::{Client, ClientBuilder, Method, RequestBuilder, Response};
use serde_json::{Value, json};

// Build timestamp in milliseconds since epoch
const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP", "Build timestamp not available");

// Client identification sent on every request
const CLIENT_INFO: &str = concat!("sitebuilder-console/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    environment: Environment,
    api_key: String,
}

impl BackendClient {
    pub fn new(environment: Environment, api_key: impl Into<String>) -> Result<Self, BackendError> {
        Ok(Self {
            client: ClientBuilder::new()
                .connect_timeout(http::connect_timeout())
                .build()?,
            environment,
            api_key: api_key.into(),
        })
    }

    /// Key used for REST calls and the realtime socket.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    fn rest_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.environment.rest_url(),
            path.trim_start_matches('/')
        )
    }

    fn auth_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.environment.auth_url(),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("X-Client-Info", CLIENT_INFO)
            .header("X-Build-Timestamp", BUILD_TIMESTAMP)
    }

    async fn handle_response_status(response: Response) -> Result<Response, BackendError> {
        if !response.status().is_success() {
            return Err(BackendError::from_response(response).await);
        }
        Ok(response)
    }

    /// Parses a JSON body, treating an empty body as `null`.
    async fn json_body(response: Response) -> Result<Value, BackendError> {
        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn rpc(&self, name: &str, args: Value) -> Result<Value, BackendError> {
        let url = self.rest_url(&format!("rpc/{}", name));
        let response = self.request(Method::POST, &url).json(&args).send().await?;
        let response = Self::handle_response_status(response).await?;
        Self::json_body(response).await
    }

    fn row_filter(id: &str) -> String {
        format!("eq.{}", id)
    }
}

#[async_trait::async_trait]
impl Backend for BackendClient {
    fn environment(&self) -> &Environment {
        &self.environment
    }

    async fn select_all(&self, table: &str, order_by: &str) -> Result<Vec<Value>, BackendError> {
        let url = self.rest_url(table);
        let order = format!("{}.desc", order_by);
        let response = self
            .request(Method::GET, &url)
            .query(&[("select", "*"), ("order", order.as_str())])
            .send()
            .await?;
        let response = Self::handle_response_status(response).await?;
        match Self::json_body(response).await? {
            Value::Array(rows) => Ok(rows),
            Value::Null => Ok(Vec::new()),
            other => Err(BackendError::Procedure(format!(
                "Expected a row array from {}, got {}",
                table, other
            ))),
        }
    }

    async fn insert(&self, table: &str, row: Value) -> Result<(), BackendError> {
        let url = self.rest_url(table);
        let response = self
            .request(Method::POST, &url)
            .header("Prefer", "return=minimal")
            .json(&row)
            .send()
            .await?;
        Self::handle_response_status(response).await?;
        Ok(())
    }

    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<(), BackendError> {
        let url = self.rest_url(table);
        let response = self
            .request(Method::PATCH, &url)
            .query(&[("id", Self::row_filter(id))])
            .header("Prefer", "return=minimal")
            .json(&patch)
            .send()
            .await?;
        Self::handle_response_status(response).await?;
        Ok(())
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), BackendError> {
        let url = self.rest_url(table);
        let response = self
            .request(Method::DELETE, &url)
            .query(&[("id", Self::row_filter(id))])
            .send()
            .await?;
        Self::handle_response_status(response).await?;
        Ok(())
    }

    async fn generate_unique_provider_name(
        &self,
        provider_type: &str,
    ) -> Result<String, BackendError> {
        let payload = self
            .rpc(
                "generate_unique_provider_name",
                json!({ "provider_type": provider_type }),
            )
            .await?;
        match payload {
            Value::String(name) if !name.is_empty() => Ok(name),
            other => Err(BackendError::Procedure(format!(
                "Unexpected provider name payload: {}",
                other
            ))),
        }
    }

    async fn execute_sql(&self, sql_query: &str) -> Result<Value, BackendError> {
        self.rpc("execute_sql", json!({ "sql_query": sql_query }))
            .await
    }

    async fn update_system_status(&self) -> Result<(), BackendError> {
        self.rpc("update_system_status", json!({})).await?;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<Value>, BackendError> {
        let url = self.auth_url("admin/users");
        let response = self.request(Method::GET, &url).send().await?;
        let response = Self::handle_response_status(response).await?;
        match Self::json_body(response).await? {
            Value::Array(users) => Ok(users),
            Value::Object(mut body) => match body.remove("users") {
                Some(Value::Array(users)) => Ok(users),
                _ => Ok(Vec::new()),
            },
            _ => Ok(Vec::new()),
        }
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), BackendError> {
        let url = self.auth_url(&format!(
            "admin/users/{}",
            urlencoding::encode(user_id)
        ));
        let response = self.request(Method::DELETE, &url).send().await?;
        Self::handle_response_status(response).await?;
        Ok(())
    }
}
