use crate::resources::{Resource, RowSource};
use serde::Deserialize;

/// Health of one backing service, as last probed by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceStatus {
    pub id: String,
    pub service: String,
    /// `true` when the service answered.
    pub status: bool,
    #[serde(default)]
    pub last_checked: Option<String>,
    /// Milliseconds.
    #[serde(default)]
    pub response_time: Option<f64>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl Resource for ServiceStatus {
    const SOURCE: RowSource = RowSource::Table("system_status");
    const LABEL: &'static str = "Service status";
    const ORDER_BY: &'static str = "last_checked";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Status of the first row whose service name contains `service`.
pub fn is_up(rows: &[ServiceStatus], service: &str) -> Option<bool> {
    let needle = service.to_lowercase();
    rows.iter()
        .find(|row| row.service.to_lowercase().contains(&needle))
        .map(|row| row.status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_up_matches_service_names_loosely() {
        let rows: Vec<ServiceStatus> = serde_json::from_value(json!([
            {"id": "1", "service": "YouTube API", "status": true},
            {"id": "2", "service": "OpenAI", "status": false, "error_message": "timeout"}
        ]))
        .unwrap();
        assert_eq!(is_up(&rows, "youtube"), Some(true));
        assert_eq!(is_up(&rows, "openai"), Some(false));
        assert_eq!(is_up(&rows, "github"), None);
    }

    #[test]
    fn test_fractional_response_time_decodes() {
        let rows: Vec<ServiceStatus> = serde_json::from_value(json!([
            {"id": "1", "service": "GitHub", "status": true, "response_time": 87.5,
             "last_checked": "2024-05-01T10:00:00+00:00", "error_message": null},
            {"id": "2", "service": "Netlify", "status": true, "response_time": null}
        ]))
        .unwrap();
        assert_eq!(rows[0].response_time, Some(87.5));
        assert_eq!(rows[1].response_time, None);
    }
}
