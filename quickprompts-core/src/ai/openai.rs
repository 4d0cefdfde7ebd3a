use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::ai::error::ApiError;
use crate::ai::provider::CompletionProvider;
use crate::ai::types::{CategorySuggestion, EnhanceRole, EnhancementTurn, ModelInfo};
use crate::prompt::types::Prompt;

const CATEGORIZE_SYSTEM_PROMPT: &str = "You are a helpful assistant that categorizes prompts. \
Analyze the provided prompts (a JSON array of objects with id and text) and suggest a concise, \
relevant category (1-3 words max) for each one. Return your response ONLY as a valid JSON object \
of the form {\"suggestions\": [{\"promptId\": \"...\", \"category\": \"...\"}]} with no extra text \
or markdown formatting. Only include prompts that were provided in the input, and use the exact \
promptId from the input.";

const ENHANCE_SYSTEM_PROMPT: &str = "You are an AI assistant specialized in refining and \
enhancing user prompts for Large Language Models. Improve the clarity, detail, effectiveness, \
and overall quality of the prompt based on the user's request and any provided feedback, while \
maintaining the original intent. If earlier iterations are present in the conversation, build on \
them. Respond ONLY with the enhanced prompt text, without any preamble, explanation, or markdown \
formatting.";

#[derive(Clone)]
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, "https://api.openai.com/v1".to_string())
    }

    /// Point the provider at a compatible endpoint (tests, proxies).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            base_url,
        }
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        debug!(model = %request.model, "calling chat completions");
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            debug!(%status, %body, "chat completions returned error");
            return Err(ApiError::from_error_body(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| ApiError::MalformedResponse(format!("{e} - body: {body}")))
    }

    fn message_content(response: ChatResponse) -> Result<String, ApiError> {
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                ApiError::MalformedResponse("response carried no message content".to_string())
            })
    }
}

#[async_trait::async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, ApiError> {
        let response = self
            .client
            .get(format!("{}/models", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            debug!(%status, %body, "model listing returned error");
            return Err(ApiError::from_error_body(status, &body));
        }

        let listing: ModelListing = serde_json::from_str(&body)
            .map_err(|e| ApiError::MalformedResponse(format!("{e} - body: {body}")))?;

        // Only chat-capable GPT variants are useful here.
        let mut models: Vec<ModelInfo> = listing
            .data
            .into_iter()
            .filter(|m| {
                m.id.contains("gpt") && !m.id.contains("instruct") && !m.id.contains("vision")
            })
            .collect();
        models.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(models)
    }

    async fn suggest_categories(
        &self,
        prompts: &[Prompt],
        model_id: &str,
    ) -> Result<Vec<CategorySuggestion>, ApiError> {
        if prompts.is_empty() {
            return Ok(Vec::new());
        }

        // Only id and text leave the device.
        let payload: Vec<PromptPayload> = prompts
            .iter()
            .map(|p| PromptPayload {
                id: &p.id,
                text: &p.text,
            })
            .collect();
        let request = ChatRequest {
            model: model_id.to_string(),
            messages: vec![
                ChatMessage::system(CATEGORIZE_SYSTEM_PROMPT.to_string()),
                ChatMessage::user(
                    serde_json::to_string(&payload).expect("prompt payload should serialize"),
                ),
            ],
            response_format: Some(ResponseFormat::json_object()),
            temperature: Some(0.3),
            max_tokens: Some(1500),
        };

        let response = self.chat(&request).await?;
        let content = Self::message_content(response)?;
        parse_suggestions(&content)
    }

    async fn enhance_prompt(
        &self,
        model_id: &str,
        text: &str,
        history: &[EnhancementTurn],
        feedback: Option<&str>,
    ) -> Result<String, ApiError> {
        let mut messages = vec![ChatMessage::system(ENHANCE_SYSTEM_PROMPT.to_string())];
        for turn in history {
            let role = match turn.role {
                EnhanceRole::User => "user",
                EnhanceRole::Assistant => "assistant",
            };
            messages.push(ChatMessage {
                role: role.to_string(),
                content: turn.content.clone(),
            });
        }
        let instruction = match feedback {
            Some(feedback) => {
                format!("Original prompt: \"{text}\"\nUser feedback for this iteration: \"{feedback}\"")
            }
            None => format!("Original prompt: \"{text}\"\nPlease enhance this prompt."),
        };
        messages.push(ChatMessage::user(instruction));

        let request = ChatRequest {
            model: model_id.to_string(),
            messages,
            response_format: None,
            temperature: Some(0.5),
            max_tokens: Some(500),
        };

        let response = self.chat(&request).await?;
        Self::message_content(response)
    }
}

/// Decode the model's `{"suggestions": [...]}` reply, dropping entries that
/// do not carry both string fields.
fn parse_suggestions(content: &str) -> Result<Vec<CategorySuggestion>, ApiError> {
    let value: Value = serde_json::from_str(content).map_err(|_| {
        ApiError::MalformedResponse("suggestion content is not valid JSON".to_string())
    })?;
    let Some(entries) = value.get("suggestions").and_then(Value::as_array) else {
        return Err(ApiError::MalformedResponse(
            "expected a {\"suggestions\": [...]} object".to_string(),
        ));
    };

    let mut suggestions = Vec::with_capacity(entries.len());
    let mut dropped = 0usize;
    for entry in entries {
        match serde_json::from_value::<CategorySuggestion>(entry.clone()) {
            Ok(suggestion) => suggestions.push(suggestion),
            Err(_) => dropped += 1,
        }
    }
    if dropped > 0 {
        warn!(dropped, "discarded malformed category suggestions");
    }
    Ok(suggestions)
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

impl ChatMessage {
    fn system(content: String) -> Self {
        Self {
            role: "system".to_string(),
            content,
        }
    }

    fn user(content: String) -> Self {
        Self {
            role: "user".to_string(),
            content,
        }
    }
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    r#type: String,
}

impl ResponseFormat {
    fn json_object() -> Self {
        Self {
            r#type: "json_object".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelListing {
    data: Vec<ModelInfo>,
}

#[derive(Debug, Serialize)]
struct PromptPayload<'a> {
    id: &'a str,
    text: &'a str,
}
