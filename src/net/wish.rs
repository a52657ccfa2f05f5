//! Wish fetching: one generative-text call per ornament activation.
//!
//! `WishService::fetch_wish` never fails. A missing credential, a transport
//! error or an unreadable response all resolve to a fixed festive message;
//! a partially valid JSON object keeps whatever fields it has.

use serde_json::Value;

use super::gemini::{GenerateRequest, SchemaField, TextGenerator, WishError};

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Returned when no credential is configured.
pub const OFFLINE_MESSAGE: &str =
    "May your holiday season be filled with digital magic, warmth, and endless joy!";
/// Default message for a response without a usable `message`.
pub const DEFAULT_MESSAGE: &str = "May your holidays be filled with digital magic and warmth!";
/// Default author for a response without a usable `author`.
pub const DEFAULT_AUTHOR: &str = "The Spirit of Christmas";
/// Returned when the request or its parsing fails.
pub const FAILURE_MESSAGE: &str = "May your days be merry and bright, and your heart be light!";
pub const FAILURE_AUTHOR: &str = "Saint Nicholas";

/// A generated wish and its attributed author
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WishResponse {
    pub message: String,
    pub author: String,
}

impl WishResponse {
    pub fn new(message: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            author: author.into(),
        }
    }

    fn offline() -> Self {
        Self::new(OFFLINE_MESSAGE, DEFAULT_AUTHOR)
    }

    fn failure() -> Self {
        Self::new(FAILURE_MESSAGE, FAILURE_AUTHOR)
    }
}

/// Prompt sent for an ornament type label.
pub fn wish_prompt(ornament_type: &str) -> String {
    format!(
        "Generate a heartwarming, magical Christmas wish or a short festive story based on a {} ornament. Make it poetic and cozy.",
        ornament_type
    )
}

/// Fetches wishes through an injected `TextGenerator`.
pub struct WishService<G> {
    generator: G,
    api_key: Option<String>,
    model: String,
}

impl<G: TextGenerator> WishService<G> {
    /// An empty or whitespace-only `api_key` counts as missing.
    pub fn new(generator: G, api_key: Option<String>) -> Self {
        Self {
            generator,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Fetch a wish for `ornament_type` (any label is accepted).
    pub fn fetch_wish(&self, ornament_type: &str) -> WishResponse {
        let Some(api_key) = self.api_key.as_deref() else {
            log::warn!("{}; using offline wish", WishError::MissingCredential);
            return WishResponse::offline();
        };

        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: wish_prompt(ornament_type),
            fields: vec![
                SchemaField {
                    name: "message",
                    description: "The festive wish text",
                },
                SchemaField {
                    name: "author",
                    description: "A festive pseudonym (e.g., 'The North Pole Post')",
                },
            ],
        };

        match self.generator.generate(api_key, &request).and_then(|text| parse_wish(&text)) {
            Ok(wish) => {
                log::info!("wish for {} from {}", ornament_type, wish.author);
                wish
            }
            Err(e) => {
                log::error!("Error generating wish: {}", e);
                WishResponse::failure()
            }
        }
    }
}

/// Parse the model's JSON text, filling absent fields with defaults.
/// Empty text is treated as an empty object; a bare `null` is an error.
pub fn parse_wish(text: &str) -> Result<WishResponse, WishError> {
    let text = if text.trim().is_empty() { "{}" } else { text };
    let json: Value = serde_json::from_str(text)?;
    if json.is_null() {
        return Err(WishError::NullReply);
    }

    let field = |name: &str| {
        json.get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let message = field("message");
    let author = field("author");
    if message.is_none() || author.is_none() {
        log::warn!("wish response missing fields; filling defaults");
    }

    Ok(WishResponse {
        message: message.unwrap_or_else(|| DEFAULT_MESSAGE.to_string()),
        author: author.unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Scripted generator that records what it was asked.
    struct FakeGenerator {
        reply: Result<String, String>,
        calls: Mutex<Vec<(String, GenerateRequest)>>,
    }

    impl FakeGenerator {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                reply: Err(status.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl TextGenerator for FakeGenerator {
        fn generate(&self, api_key: &str, request: &GenerateRequest) -> Result<String, WishError> {
            self.calls
                .lock()
                .unwrap()
                .push((api_key.to_string(), request.clone()));
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(WishError::Status {
                    status: status.parse().unwrap_or(500),
                    body: String::from("boom"),
                }),
            }
        }
    }

    fn service(generator: FakeGenerator) -> WishService<FakeGenerator> {
        WishService::new(generator, Some("test-key".into()))
    }

    #[test]
    fn missing_credential_skips_network() {
        for key in [None, Some(String::new()), Some("   ".into())] {
            let svc = WishService::new(FakeGenerator::replying("{}"), key);
            let wish = svc.fetch_wish("STAR");
            assert_eq!(
                wish,
                WishResponse::new(
                    "May your holiday season be filled with digital magic, warmth, and endless joy!",
                    "The Spirit of Christmas"
                )
            );
            assert_eq!(svc.generator().call_count(), 0);
        }
    }

    #[test]
    fn request_failure_uses_saint_nicholas() {
        let svc = service(FakeGenerator::failing(503));
        let wish = svc.fetch_wish("GIFT");
        assert_eq!(
            wish,
            WishResponse::new(
                "May your days be merry and bright, and your heart be light!",
                "Saint Nicholas"
            )
        );
        assert_eq!(svc.generator().call_count(), 1);
    }

    #[test]
    fn invalid_json_uses_saint_nicholas() {
        let svc = service(FakeGenerator::replying("not json at all"));
        assert_eq!(svc.fetch_wish("BALL").author, "Saint Nicholas");
    }

    #[test]
    fn missing_author_defaults() {
        let svc = service(FakeGenerator::replying(r#"{"message":"X"}"#));
        let wish = svc.fetch_wish("SOCK");
        assert_eq!(wish.message, "X");
        assert_eq!(wish.author, "The Spirit of Christmas");
    }

    #[test]
    fn missing_message_defaults() {
        let svc = service(FakeGenerator::replying(r#"{"author":"Elf","message":""}"#));
        let wish = svc.fetch_wish("SOCK");
        assert_eq!(wish.message, DEFAULT_MESSAGE);
        assert_eq!(wish.author, "Elf");
    }

    #[test]
    fn empty_text_fills_both_fields() {
        let svc = service(FakeGenerator::replying(""));
        assert_eq!(svc.fetch_wish("BEAR"), WishResponse::new(DEFAULT_MESSAGE, DEFAULT_AUTHOR));
    }

    #[test]
    fn non_string_fields_count_as_missing() {
        let wish = parse_wish(r#"{"message": 42, "author": ["a"]}"#).unwrap();
        assert_eq!(wish, WishResponse::new(DEFAULT_MESSAGE, DEFAULT_AUTHOR));
        let wish = parse_wish("[1, 2]").unwrap();
        assert_eq!(wish, WishResponse::new(DEFAULT_MESSAGE, DEFAULT_AUTHOR));
    }

    #[test]
    fn null_reply_uses_saint_nicholas() {
        assert!(matches!(parse_wish("null"), Err(WishError::NullReply)));
        assert!(matches!(parse_wish("  null \n"), Err(WishError::NullReply)));

        let svc = service(FakeGenerator::replying("null"));
        assert_eq!(
            svc.fetch_wish("STAR"),
            WishResponse::new(
                "May your days be merry and bright, and your heart be light!",
                "Saint Nicholas"
            )
        );
    }

    #[test]
    fn full_response_passes_through() {
        let svc = service(FakeGenerator::replying(
            r#"{"message":"Snow falls softly.","author":"The North Pole Post"}"#,
        ));
        assert_eq!(
            svc.fetch_wish("SNOWMAN"),
            WishResponse::new("Snow falls softly.", "The North Pole Post")
        );
    }

    #[test]
    fn any_label_is_embedded_in_prompt() {
        let svc = service(FakeGenerator::replying("{}")).with_model("test-model");
        let wish = svc.fetch_wish("definitely not an ornament");
        assert!(!wish.message.is_empty() && !wish.author.is_empty());

        let calls = svc.generator().calls.lock().unwrap();
        let (key, request) = &calls[0];
        assert_eq!(key, "test-key");
        assert_eq!(request.model, "test-model");
        assert!(request.prompt.contains("based on a definitely not an ornament ornament"));
        let names: Vec<_> = request.fields.iter().map(|f| f.name).collect();
        assert_eq!(names, ["message", "author"]);
    }

    #[test]
    fn every_outcome_is_displayable() {
        let replies = ["", "{}", "null", "\"text\"", "{\"message\":\"m\"}", "{{{"];
        for reply in replies {
            let wish = service(FakeGenerator::replying(reply)).fetch_wish("CANDY_CANE");
            assert!(!wish.message.is_empty(), "empty message for {reply:?}");
            assert!(!wish.author.is_empty(), "empty author for {reply:?}");
        }
    }
}
