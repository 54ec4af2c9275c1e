use repvoice_domain::GatewayError;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::HttpRequest;

const MAX_TOKENS: u32 = 500;
const TEMPERATURE: f32 = 0.1;

/// Request and response shape of one family of text generation APIs.
pub trait Provider {
    fn build_request(&self, instructions: &str, message: &str) -> HttpRequest;
    fn extract_text(&self, body: &str) -> Result<String, GatewayError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[strum(serialize = "openai", serialize = "open-ai")]
    OpenAi,
    Anthropic,
    Gemini,
}

impl ProviderKind {
    /// Guess the family from the endpoint URL. Anything not recognized is
    /// treated as OpenAI compatible, which local model servers implement.
    #[must_use]
    pub fn infer(endpoint: &str) -> Self {
        let endpoint = endpoint.to_lowercase();
        if endpoint.contains("anthropic") || endpoint.ends_with("/messages") {
            ProviderKind::Anthropic
        } else if endpoint.contains("generativelanguage") || endpoint.contains(":generatecontent")
        {
            ProviderKind::Gemini
        } else {
            ProviderKind::OpenAi
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub endpoint: String,
    pub provider: Option<ProviderKind>,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

impl ProviderConfig {
    #[must_use]
    pub fn kind(&self) -> ProviderKind {
        self.provider
            .unwrap_or_else(|| ProviderKind::infer(&self.endpoint))
    }

    /// Select the adapter for this configuration.
    #[must_use]
    pub fn provider(&self) -> Box<dyn Provider> {
        let endpoint = self.endpoint.clone();
        let api_key = self.api_key.clone().filter(|key| !key.is_empty());
        match self.kind() {
            ProviderKind::OpenAi => Box::new(OpenAiCompatible {
                endpoint,
                api_key,
                model: self.model.clone(),
            }),
            ProviderKind::Anthropic => Box::new(Anthropic {
                endpoint,
                api_key,
                model: self
                    .model
                    .clone()
                    .unwrap_or_else(|| Anthropic::DEFAULT_MODEL.to_string()),
            }),
            ProviderKind::Gemini => Box::new(Gemini { endpoint, api_key }),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

impl Message {
    fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }
}

fn shape_error(provider: &str, err: &serde_json::Error) -> GatewayError {
    GatewayError::Shape(format!("{provider} response: {err}"))
}

/// Chat completion API as offered by OpenAI and most local model servers.
#[derive(Debug, Clone)]
pub struct OpenAiCompatible {
    endpoint: String,
    api_key: Option<String>,
    model: Option<String>,
}

impl Provider for OpenAiCompatible {
    fn build_request(&self, instructions: &str, message: &str) -> HttpRequest {
        #[derive(Serialize)]
        struct Request {
            #[serde(skip_serializing_if = "Option::is_none")]
            model: Option<String>,
            messages: Vec<Message>,
            max_tokens: u32,
            temperature: f32,
            stream: bool,
        }

        let request = Request {
            model: self.model.clone(),
            messages: vec![
                Message::new("system", instructions),
                Message::new("user", message),
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            stream: false,
        };

        HttpRequest {
            url: self.endpoint.clone(),
            headers: self
                .api_key
                .iter()
                .map(|key| ("Authorization".to_string(), format!("Bearer {key}")))
                .collect(),
            body: serde_json::to_value(request).unwrap_or_default(),
        }
    }

    fn extract_text(&self, body: &str) -> Result<String, GatewayError> {
        #[derive(Deserialize)]
        struct Response {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: Message,
        }

        let response: Response =
            serde_json::from_str(body).map_err(|err| shape_error("chat completion", &err))?;
        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| GatewayError::Shape("chat completion without choices".to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct Anthropic {
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl Anthropic {
    pub const DEFAULT_MODEL: &'static str = "claude-3-5-haiku-latest";
    const VERSION: &'static str = "2023-06-01";
}

impl Provider for Anthropic {
    fn build_request(&self, instructions: &str, message: &str) -> HttpRequest {
        #[derive(Serialize)]
        struct Request {
            model: String,
            max_tokens: u32,
            temperature: f32,
            system: String,
            messages: Vec<Message>,
        }

        let request = Request {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            system: instructions.to_string(),
            messages: vec![Message::new("user", message)],
        };

        let mut headers = vec![(
            "anthropic-version".to_string(),
            Anthropic::VERSION.to_string(),
        )];
        if let Some(key) = &self.api_key {
            headers.push(("x-api-key".to_string(), key.clone()));
        }

        HttpRequest {
            url: self.endpoint.clone(),
            headers,
            body: serde_json::to_value(request).unwrap_or_default(),
        }
    }

    fn extract_text(&self, body: &str) -> Result<String, GatewayError> {
        #[derive(Deserialize)]
        struct Response {
            content: Vec<ContentBlock>,
        }

        #[derive(Deserialize)]
        struct ContentBlock {
            #[serde(default)]
            text: Option<String>,
        }

        let response: Response =
            serde_json::from_str(body).map_err(|err| shape_error("messages", &err))?;
        response
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| GatewayError::Shape("message without text content".to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct Gemini {
    endpoint: String,
    api_key: Option<String>,
}

impl Provider for Gemini {
    fn build_request(&self, instructions: &str, message: &str) -> HttpRequest {
        #[derive(Serialize)]
        struct Request {
            contents: Vec<Content>,
            #[serde(rename = "generationConfig")]
            generation_config: GenerationConfig,
        }

        #[derive(Serialize)]
        struct GenerationConfig {
            temperature: f32,
            #[serde(rename = "maxOutputTokens")]
            max_output_tokens: u32,
        }

        let request = Request {
            contents: vec![Content {
                parts: vec![Part {
                    text: format!("{instructions}\n\n{message}"),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_TOKENS,
            },
        };

        let url = match &self.api_key {
            Some(key) => {
                let separator = if self.endpoint.contains('?') { '&' } else { '?' };
                format!("{}{separator}key={key}", self.endpoint)
            }
            None => self.endpoint.clone(),
        };

        HttpRequest {
            url,
            headers: vec![],
            body: serde_json::to_value(request).unwrap_or_default(),
        }
    }

    fn extract_text(&self, body: &str) -> Result<String, GatewayError> {
        #[derive(Deserialize)]
        struct Response {
            #[serde(default)]
            candidates: Vec<Candidate>,
        }

        #[derive(Deserialize)]
        struct Candidate {
            content: Content,
        }

        let response: Response =
            serde_json::from_str(body).map_err(|err| shape_error("generate content", &err))?;
        response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| GatewayError::Shape("generate content without candidates".to_string()))
    }
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}
