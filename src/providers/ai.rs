use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::{DriftOracle, OracleRequest};
use crate::{Config, DriftVerdict};

/// OpenAI client for drift judgment. The request carries a strict JSON
/// schema so the verdict comes back machine-parseable.
pub struct OpenAiOracle {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiOracle {
    /// The timeout must stay below the host's own pipeline budget so an
    /// oracle stall surfaces as "no opinion" rather than a host failure.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.openai_timeout_secs))
            .connect_timeout(Duration::from_secs(config.openai_timeout_secs.min(5)))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.clone(),
            model: config.openai_model.clone(),
            temperature: config.openai_temperature,
            max_tokens: config.openai_max_tokens,
        })
    }

    fn verdict_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "required": ["shouldInterrupt", "confidence", "whatUserAsked", "whatClaudeIsDoing", "reason"],
            "additionalProperties": false,
            "properties": {
                "shouldInterrupt": {
                    "type": "boolean",
                    "description": "Whether the action diverges from user intent badly enough to stop it"
                },
                "confidence": {
                    "type": "number",
                    "minimum": 0.0,
                    "maximum": 1.0
                },
                "whatUserAsked": {
                    "type": "string",
                    "maxLength": 300
                },
                "whatClaudeIsDoing": {
                    "type": "string",
                    "maxLength": 300
                },
                "reason": {
                    "type": "string",
                    "maxLength": 500
                },
                "suggestion": {
                    "type": ["string", "null"],
                    "maxLength": 300
                }
            }
        })
    }
}

impl DriftOracle for OpenAiOracle {
    async fn judge(&self, request: &OracleRequest) -> Result<DriftVerdict> {
        let request_body = serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": request.system_instruction
                },
                {
                    "role": "user",
                    "content": request.user_content
                }
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "DriftVerdict",
                    "schema": Self::verdict_schema(),
                    "strict": true
                }
            },
            "max_tokens": self.max_tokens,
            "temperature": self.temperature
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .context("Failed to send drift judgment request")?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API error: {}", error_text);
        }

        #[derive(Deserialize)]
        struct ApiResponse {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: Message,
        }

        #[derive(Deserialize)]
        struct Message {
            content: String,
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI response")?;

        let content = api_response
            .choices
            .first()
            .ok_or_else(|| anyhow::anyhow!("No choices in OpenAI response"))?
            .message
            .content
            .clone();

        let verdict: DriftVerdict =
            serde_json::from_str(&content).context("Failed to parse drift verdict")?;

        Ok(verdict)
    }
}
