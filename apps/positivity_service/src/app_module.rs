use std::sync::Arc;

use positivity_llm::{LLMClient, LLMClientConfig, LLMProvider};

use crate::{config::AppConfig, tone::tone_service::ToneTransformationService};

#[derive(Clone)]
pub struct AppService {
    pub tone_service: ToneTransformationService,
}

impl AppService {
    pub fn new(config: &AppConfig) -> Self {
        let llm_client = LLMClient::new(
            LLMProvider::ChatCompletion(config.llm.clone()),
            Some(LLMClientConfig {
                timeout: config.llm_timeout,
            }),
        );

        Self::with_client(config, llm_client)
    }

    pub fn with_client(config: &AppConfig, llm_client: LLMClient) -> Self {
        let tone_service =
            ToneTransformationService::new(Arc::new(llm_client), config.tone_analysis);

        Self { tone_service }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub service: AppService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            service: AppService::new(&config),
            config: Arc::new(config),
        }
    }

    pub fn with_client(config: AppConfig, llm_client: LLMClient) -> Self {
        Self {
            service: AppService::with_client(&config, llm_client),
            config: Arc::new(config),
        }
    }
}
