use crate::{
    config::GeminiConfig,
    error::{RelayError, Result},
    gemini::TextGenerator,
    models::{
        gemini::{
            Content, ErrorResponse, GenerateContentRequest, GenerateContentResponse, InlineData,
            Part,
        },
        GenerationOutcome, GenerationRequest,
    },
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct VisionClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl VisionClient {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RelayError::ConfigError(format!("failed to build HTTP client: {}", e)))?;
        Self::with_http_client(http, config)
    }

    pub fn with_http_client(http: reqwest::Client, config: &GeminiConfig) -> Result<Self> {
        let model = config.model();
        Ok(Self {
            http,
            api_key: config.api_key()?.to_string(),
            model: model.strip_prefix("models/").unwrap_or(model).to_string(),
            base_url: config.base_url().to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn build_payload(request: &GenerationRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: None,
                parts: vec![
                    Part::Text {
                        text: request.prompt.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: request.mime_type.clone(),
                            data: STANDARD.encode(&request.data),
                        },
                    },
                ],
            }],
        }
    }

    fn service_error(status: reqwest::StatusCode, body: &str) -> RelayError {
        match serde_json::from_str::<ErrorResponse>(body) {
            Ok(ErrorResponse { error }) => RelayError::ServiceError(format!(
                "{} {} - {}",
                error.code.unwrap_or_else(|| status.as_u16()),
                error.status.as_deref().unwrap_or("UNKNOWN"),
                error.message.as_deref().unwrap_or("no message")
            )),
            Err(_) => RelayError::ServiceError(format!("HTTP {} - {}", status, body.trim())),
        }
    }
}

#[async_trait]
impl TextGenerator for VisionClient {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationOutcome> {
        let payload = Self::build_payload(&request);

        log::info!(
            "Invoking model: {} ({} bytes, {})",
            self.model,
            request.data.len(),
            request.mime_type
        );

        let response = self
            .http
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                log::error!("Gemini transport error: {:?}", e);
                RelayError::RequestError(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RelayError::ResponseError(e.to_string()))?;

        if !status.is_success() {
            let error = Self::service_error(status, &body);
            log::error!("Gemini rejected the request: {}", error);
            return Err(error);
        }

        let decoded: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            RelayError::ResponseError(format!("invalid generateContent body: {}", e))
        })?;

        let outcome = GenerationOutcome::from_text(decoded.text());
        if outcome == GenerationOutcome::Empty {
            log::warn!(
                "Gemini returned no text (finish reason: {}, block reason: {})",
                decoded.finish_reason().unwrap_or("none"),
                decoded.block_reason().unwrap_or("none")
            );
        }

        Ok(outcome)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
