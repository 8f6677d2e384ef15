use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformationResult {
    pub text: String,
    pub improvements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub tone: String,
    pub confidence: f32,
}

/// Body of a successful `/process/` reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedResponse {
    pub original_text: String,
    pub transformed_text: String,
    pub improvements: Vec<String>,
    /// Set when the model could not be reached and the input is echoed back.
    pub degraded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisResult>,
}
