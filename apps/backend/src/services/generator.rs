//! LLM-backed sentence generation.
//!
//! The model writes a short French sentence for children and labels its
//! verb and subject words itself. Anything unusable is replaced by the
//! fixed fallback sentences from petit-adam-core.

use async_trait::async_trait;
use petit_adam_core::{sanitize, GeneratedSentence};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::GeminiConfig;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },
}

/// Source of generated sentences.
#[async_trait]
pub trait SentenceGenerator: Send + Sync {
    /// Generate a sentence, optionally about `topic`.
    ///
    /// `Ok(None)` means the model answered without usable output.
    async fn generate(
        &self,
        topic: Option<&str>,
    ) -> Result<Option<GeneratedSentence>, GeneratorError>;
}

/// Generate a playable sentence; failures fall back to fixed sentences.
pub async fn generate_sentence(
    generator: &dyn SentenceGenerator,
    topic: Option<&str>,
) -> GeneratedSentence {
    let output = match generator.generate(topic).await {
        Ok(output) => output,
        Err(err) => {
            tracing::error!(error = %err, ?topic, "sentence generation failed");
            None
        }
    };
    sanitize(output, &mut rand::thread_rng())
}

const PROMPT_RULES: &str = r#"You are an expert French linguist and teacher. Generate one simple French sentence for children aged 5 to 8 who are learning to find verbs and subjects.

The sentence must:
1. Be grammatically correct and simple.
2. Contain a clear subject and at least one main verb. The verb can be a single word ("mange") or a verb phrase ("va manger", "a joué"). For verb + infinitive constructions like "aimons lire", include both words in verbIndices.
3. For imperative sentences where the subject is implied ("Regarde le soleil !", "Mange !"), subjectIndices MUST be empty.
4. Attach punctuation to the preceding word in `words`: "joue." is one token.
5. Split contractions: "n'est pas" becomes ["n'", "est", "pas"], "l'ami" becomes ["l'", "ami"].

Tonic pronouns (Moi, Toi, Lui, Elle, Nous, Vous, Eux, Elles):
- Used for emphasis next to a subject pronoun ("Moi, je mange"), only the subject pronoun ("je") belongs in subjectIndices.
- Used alone as the subject ("Qui veut jouer ? Moi !"), the tonic pronoun is the subject.

Examples:
{"sentence": "Le petit chien joue.", "words": ["Le", "petit", "chien", "joue."], "subjectIndices": [0, 1, 2], "verbIndices": [3]}
{"sentence": "Chante une chanson !", "words": ["Chante", "une", "chanson!"], "subjectIndices": [], "verbIndices": [0]}
{"sentence": "Elle va manger.", "words": ["Elle", "va", "manger."], "subjectIndices": [0], "verbIndices": [1, 2]}
{"sentence": "Ce n'est pas difficile.", "words": ["Ce", "n'", "est", "pas", "difficile."], "subjectIndices": [0], "verbIndices": [2]}
{"sentence": "Moi, je regarde la télé.", "words": ["Moi,", "je", "regarde", "la", "télé."], "subjectIndices": [1], "verbIndices": [2]}

Answer with a single JSON object with the keys sentence, words, subjectIndices and verbIndices, and nothing else."#;

/// Full prompt for an optional topic.
pub fn build_prompt(topic: Option<&str>) -> String {
    let request = match topic.map(str::trim).filter(|t| !t.is_empty()) {
        Some(topic) => format!("The sentence should be related to the topic: {}.", topic),
        None => "Write a new sentence, different from ones you may have written before."
            .to_string(),
    };
    format!("{}\n\n{}", PROMPT_RULES, request)
}

/// Parse model text into a sentence, tolerating a Markdown code fence.
pub fn parse_output(text: &str) -> Option<GeneratedSentence> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);

    match serde_json::from_str(body.trim()) {
        Ok(sentence) => Some(sentence),
        Err(err) => {
            tracing::warn!(error = %err, "model output is not a sentence object");
            None
        }
    }
}

/// Google Gemini client
pub struct GeminiGenerator {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiGenerator {
    pub fn new(config: &GeminiConfig) -> Result<Self, GeneratorError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
        })
    }

    /// Point the client at another endpoint (used by tests and proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl SentenceGenerator for GeminiGenerator {
    async fn generate(
        &self,
        topic: Option<&str>,
    ) -> Result<Option<GeneratedSentence>, GeneratorError> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: build_prompt(topic),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: 0.9,
                response_mime_type: "application/json".to_string(),
            },
        };

        tracing::debug!(model = %self.model, ?topic, "requesting generated sentence");
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", &self.api_key)])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeneratorError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let response: GeminiResponse = response.json().await?;
        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text);

        Ok(text.as_deref().and_then(parse_output))
    }
}

// Gemini API format
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    response_mime_type: String,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiResponseContent,
}

#[derive(Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}
