use std::sync::Arc;

use positivity_llm::LLMClient;

use super::{
    models::{AnalysisResult, ProcessedResponse, TransformationResult},
    prompt_builder::{
        analysis_messages, build_context_prompt, transformation_messages, ANALYSIS_OPTIONS,
        TRANSFORM_OPTIONS,
    },
    request_validator::InputRequest,
    response_parser::{
        degraded_transformation, extract_tone_label, parse_transformation, DEFAULT_TONE,
    },
};

pub const ANALYSIS_CONFIDENCE: f32 = 0.85;
pub const FALLBACK_CONFIDENCE: f32 = 0.5;

#[derive(Debug)]
pub struct TransformationOutcome {
    pub result: TransformationResult,
    pub degraded: bool,
}

/// Runs the validate-prompt-transform pipeline against the language model.
///
/// Upstream failures never surface as errors here; they produce a degraded
/// outcome that echoes the original text.
#[derive(Clone)]
pub struct ToneTransformationService {
    llm_client: Arc<LLMClient>,
    tone_analysis: bool,
}

impl ToneTransformationService {
    pub fn new(llm_client: Arc<LLMClient>, tone_analysis: bool) -> Self {
        Self {
            llm_client,
            tone_analysis,
        }
    }

    pub fn llm_client(&self) -> &LLMClient {
        &self.llm_client
    }

    pub async fn process(&self, request: &InputRequest) -> ProcessedResponse {
        let (outcome, analysis) = if self.tone_analysis {
            let (outcome, analysis) =
                tokio::join!(self.transform(request), self.analyze_tone(&request.text));
            (outcome, Some(analysis))
        } else {
            (self.transform(request).await, None)
        };

        ProcessedResponse {
            original_text: request.text.clone(),
            transformed_text: outcome.result.text,
            improvements: outcome.result.improvements,
            degraded: outcome.degraded,
            analysis,
        }
    }

    pub async fn transform(&self, request: &InputRequest) -> TransformationOutcome {
        let context_prompt = build_context_prompt(&request.context);
        let messages = transformation_messages(&context_prompt, &request.text);

        match self.llm_client.complete(messages, &TRANSFORM_OPTIONS).await {
            Ok(reply) => TransformationOutcome {
                result: parse_transformation(&reply, &request.text),
                degraded: false,
            },
            Err(e) => {
                tracing::error!("Error in text transformation: {:#}", e);
                tracing::warn!("Returning degraded response with original text");
                TransformationOutcome {
                    result: degraded_transformation(&request.text),
                    degraded: true,
                }
            }
        }
    }

    pub async fn analyze_tone(&self, text: &str) -> AnalysisResult {
        match self
            .llm_client
            .complete(analysis_messages(text), &ANALYSIS_OPTIONS)
            .await
        {
            Ok(reply) => AnalysisResult {
                tone: extract_tone_label(&reply),
                confidence: ANALYSIS_CONFIDENCE,
            },
            Err(e) => {
                tracing::error!("Error in tone analysis: {:#}", e);
                AnalysisResult {
                    tone: DEFAULT_TONE.to_string(),
                    confidence: FALLBACK_CONFIDENCE,
                }
            }
        }
    }
}
