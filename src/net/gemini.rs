use serde::Deserialize;
use serde_json::json;
use url::Url;

/// Error while talking to the generative text API
#[derive(Debug, thiserror::Error)]
pub enum WishError {
    #[error("no API credential configured")]
    MissingCredential,
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("model replied with null")]
    NullReply,
    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Field of a structured-output schema
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    pub name: &'static str,
    pub description: &'static str,
}

/// One text-generation request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    /// Required string fields of the JSON object the model must return
    pub fields: Vec<SchemaField>,
}

/// A text-generation backend. Returns the raw response text.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, api_key: &str, request: &GenerateRequest) -> Result<String, WishError>;
}

/// Request body for `models/{model}:generateContent`.
pub fn request_body(request: &GenerateRequest) -> serde_json::Value {
    let properties: serde_json::Map<String, serde_json::Value> = request
        .fields
        .iter()
        .map(|f| {
            (
                f.name.to_string(),
                json!({ "type": "STRING", "description": f.description }),
            )
        })
        .collect();
    let required: Vec<&str> = request.fields.iter().map(|f| f.name).collect();

    json!({
        "contents": [{ "role": "user", "parts": [{ "text": request.prompt }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": properties,
                "required": required,
            }
        }
    })
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Concatenated text of the first candidate; empty when there is none.
pub fn response_text(body: &str) -> Result<String, WishError> {
    let parsed: GenerateContentResponse = serde_json::from_str(body)?;
    let text = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default();
    Ok(text)
}

/// Google Generative Language REST client (blocking).
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    endpoint: Url,
}

impl GeminiClient {
    /// `endpoint` is the API base, e.g. `https://generativelanguage.googleapis.com/v1beta/`.
    pub fn new(endpoint: &str, timeout: std::time::Duration) -> Result<Self, WishError> {
        let mut endpoint = Url::parse(endpoint)?;
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("digital-xmas/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { http, endpoint })
    }

    fn model_url(&self, model: &str) -> Result<Url, WishError> {
        Ok(self
            .endpoint
            .join(&format!("models/{}:generateContent", model))?)
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, api_key: &str, request: &GenerateRequest) -> Result<String, WishError> {
        let url = self.model_url(&request.model)?;
        log::debug!("POST {}", url);

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(&request_body(request))
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(WishError::Status {
                status: status.as_u16(),
                body,
            });
        }
        response_text(&body)
    }
}
