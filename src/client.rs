//! Generation service client.
//!
//! The pipeline talks to the model through [`GenerationService`] so the
//! orchestration can be exercised without a running server. [`OllamaClient`]
//! is the HTTP implementation against an Ollama-compatible API:
//!
//! - `GET  {base_url}/api/tags`      liveness probe
//! - `POST {base_url}/api/generate`  non-streaming completion
use crate::config::GeneratorConfig;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Cannot connect to generation service: {0}")]
    Unreachable(String),

    #[error("generation service returned status {status}")]
    Status { status: u16 },

    #[error("generation request failed: {0}")]
    Transport(String),

    #[error("decode generation response: {0}")]
    Decode(String),
}

/// Body of a completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub system: String,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<GenerateOptions>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateOptions {
    pub num_ctx: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Text-completion backend used by the generator and enhancer.
pub trait GenerationService {
    /// Cheap liveness check; any error means the service is unusable.
    fn probe(&self) -> Result<(), ServiceError>;

    /// Run one completion and return the raw response text.
    fn generate(&self, request: &GenerateRequest) -> Result<String, ServiceError>;
}

/// Blocking HTTP client for an Ollama-compatible server.
pub struct OllamaClient {
    tags_url: String,
    generate_url: String,
    probe_agent: ureq::Agent,
    generate_agent: ureq::Agent,
}

impl OllamaClient {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            tags_url: format!("{}/api/tags", config.base_url),
            generate_url: format!("{}/api/generate", config.base_url),
            probe_agent: agent_with_timeout(config.probe_timeout),
            generate_agent: agent_with_timeout(config.generate_timeout),
        }
    }
}

fn agent_with_timeout(timeout: Duration) -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

impl GenerationService for OllamaClient {
    fn probe(&self) -> Result<(), ServiceError> {
        let response = self
            .probe_agent
            .get(self.tags_url.as_str())
            .call()
            .map_err(|err| ServiceError::Unreachable(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Unreachable(format!(
                "liveness probe returned status {}",
                status.as_u16()
            )));
        }
        Ok(())
    }

    fn generate(&self, request: &GenerateRequest) -> Result<String, ServiceError> {
        let start = Instant::now();
        let mut response = self
            .generate_agent
            .post(self.generate_url.as_str())
            .send_json(request)
            .map_err(|err| ServiceError::Transport(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
            });
        }
        let body: GenerateResponse = response
            .body_mut()
            .read_json()
            .map_err(|err| ServiceError::Decode(err.to_string()))?;

        tracing::info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            prompt_bytes = request.prompt.len(),
            response_bytes = body.response.len(),
            "lm invoke complete"
        );
        Ok(body.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_omits_absent_options() {
        let request = GenerateRequest {
            model: "llama3.2".to_string(),
            prompt: "p".to_string(),
            system: "s".to_string(),
            stream: false,
            options: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"model": "llama3.2", "prompt": "p", "system": "s", "stream": false})
        );
    }

    #[test]
    fn generation_options_skip_unset_sampling() {
        let options = GenerateOptions {
            num_ctx: 8192,
            temperature: None,
            top_p: None,
        };
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({"num_ctx": 8192})
        );
    }

    #[test]
    fn missing_response_field_decodes_as_empty() {
        let body: GenerateResponse = serde_json::from_str(r#"{"done": true}"#).unwrap();
        assert!(body.response.is_empty());
    }

    #[test]
    fn probe_against_closed_port_is_unreachable() {
        let config = GeneratorConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            probe_timeout: Duration::from_secs(2),
            ..GeneratorConfig::default()
        };
        let client = OllamaClient::new(&config);
        assert!(matches!(client.probe(), Err(ServiceError::Unreachable(_))));
    }
}
