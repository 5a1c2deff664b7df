use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    pub r#type: String,
    pub code: Option<String>,
}

/// Image as posted by the frontend: base64 payload without the `data:` prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSubmission {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub disease_name: String,
    /// 0.0 - 1.0
    pub disease_confidence: f32,
    pub health_status: HealthStatus,
}

impl AnalysisResult {
    /// Verdict returned when nothing is known about the image.
    pub fn unknown() -> Self {
        Self {
            disease_name: "Unknown".to_string(),
            disease_confidence: 0.0,
            health_status: HealthStatus::Healthy,
        }
    }
}
