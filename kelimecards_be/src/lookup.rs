//! Translation lookup through an OpenAI-compatible chat completion API.
//!
//! The model is asked for a strict JSON object so the reply can be handed
//! straight back to the client as card translations.

use crate::models::Translation;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("OPENAI_API_KEY is not configured")]
    MissingApiKey,
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("completion API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("completion API returned no message content")]
    EmptyResponse,
    #[error("model output is not the expected JSON: {0}")]
    MalformedOutput(#[from] serde_json::Error),
}

/// Fetches candidate translations for a Turkish word. Nothing is persisted.
#[async_trait]
pub trait TranslationLookup: Send + Sync {
    async fn lookup(&self, word: &str) -> Result<Vec<Translation>, LookupError>;
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

pub struct OpenAiLookup {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiLookup {
    pub fn new(config: OpenAiConfig) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelOutput {
    #[serde(default)]
    translations: Vec<Translation>,
}

fn translation_prompt(word: &str) -> String {
    format!(
        r#"Translate the Turkish word "{word}" into its main Ukrainian meanings.
For each meaning, provide one clear and simple example sentence in Turkish and its translation into Ukrainian.
The output must be a valid JSON object with the following structure:
{{
  "translations": [
    {{
      "ukrainian": "...",
      "example_turkish": "...",
      "example_ukrainian": "..."
    }}
  ]
}}"#
    )
}

/// Extracts the translations from a completion response body. A JSON object
/// without a `translations` field yields no translations.
fn parse_completion(body: &str) -> Result<Vec<Translation>, LookupError> {
    let response: CompletionResponse = serde_json::from_str(body)?;
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(LookupError::EmptyResponse)?;
    let output: ModelOutput = serde_json::from_str(&content)?;
    Ok(output.translations)
}

#[async_trait]
impl TranslationLookup for OpenAiLookup {
    async fn lookup(&self, word: &str) -> Result<Vec<Translation>, LookupError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(LookupError::MissingApiKey)?;

        let request = CompletionRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: translation_prompt(word),
            }],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(LookupError::Status { status, body });
        }

        let translations = parse_completion(&body)?;
        log::info!("lookup of {word:?} returned {} translations", translations.len());
        Ok(translations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn completion(content: &str) -> String {
        serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })
        .to_string()
    }

    #[test]
    fn parses_translations_from_message_content() {
        let body = completion(
            r#"{"translations": [{"ukrainian": "привіт", "example_turkish": "Merhaba!", "example_ukrainian": "Привіт!"}]}"#,
        );
        let translations = parse_completion(&body).unwrap();
        assert_eq!(
            translations,
            vec![Translation {
                ukrainian: "привіт".to_string(),
                example_turkish: "Merhaba!".to_string(),
                example_ukrainian: "Привіт!".to_string(),
            }]
        );
    }

    #[test]
    fn missing_translations_field_is_empty() {
        let body = completion(r#"{"meanings": []}"#);
        assert!(parse_completion(&body).unwrap().is_empty());
    }

    #[test]
    fn non_json_content_is_malformed() {
        let body = completion("Sorry, I cannot help with that.");
        assert!(matches!(
            parse_completion(&body),
            Err(LookupError::MalformedOutput(_))
        ));
    }

    #[test]
    fn incomplete_translation_entry_is_malformed() {
        let body = completion(r#"{"translations": [{"ukrainian": "кіт"}]}"#);
        assert!(matches!(
            parse_completion(&body),
            Err(LookupError::MalformedOutput(_))
        ));
    }

    #[test]
    fn no_choices_is_empty_response() {
        assert!(matches!(
            parse_completion(r#"{"choices": []}"#),
            Err(LookupError::EmptyResponse)
        ));
    }

    #[test]
    fn prompt_names_the_word_and_the_json_shape() {
        let prompt = translation_prompt("kitap");
        assert!(prompt.contains("\"kitap\""));
        assert!(prompt.contains("\"example_ukrainian\""));
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let lookup = OpenAiLookup::new(OpenAiConfig {
            api_key: None,
            base_url: "http://localhost:8000/v1/".to_string(),
            model: "gpt-4o".to_string(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();
        assert_eq!(lookup.endpoint(), "http://localhost:8000/v1/chat/completions");
    }

    #[actix_web::test]
    async fn lookup_without_api_key_fails_before_any_request() {
        let lookup = OpenAiLookup::new(OpenAiConfig {
            api_key: None,
            base_url: "http://127.0.0.1:9".to_string(),
            model: "gpt-4o".to_string(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();
        assert!(matches!(
            lookup.lookup("kitap").await,
            Err(LookupError::MissingApiKey)
        ));
    }
}
