use super::sections::TagVocabulary;
use super::{
    AdviceContext, AdviceError, AdviceProvider, AdviceResult, MAX_SOURCES, Source, build_prompt,
    extract_footfall_index,
};
use crate::config::AdviceSettings;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const TEMPERATURE: f32 = 0.7;

/// Advice backed by Gemini `generateContent` with Google Search grounding.
#[derive(Debug, Clone)]
pub struct GeminiAdviceProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    vocabulary: TagVocabulary,
}

impl GeminiAdviceProvider {
    pub fn new(settings: &AdviceSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            vocabulary: settings.vocabulary,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    tools: Vec<Tool>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Serialize)]
struct GoogleSearch {}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Content,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Deserialize)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Deserialize)]
struct WebChunk {
    #[serde(default)]
    title: String,
    #[serde(default)]
    uri: String,
}

fn into_result(response: GenerateResponse) -> Result<AdviceResult, AdviceError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(AdviceError::EmptyResponse);
    };

    let text: String = candidate
        .content
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect();
    if text.trim().is_empty() {
        return Err(AdviceError::EmptyResponse);
    }

    let sources = candidate
        .grounding_metadata
        .map(|metadata| metadata.grounding_chunks)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|chunk| chunk.web)
        .map(|web| Source {
            title: web.title,
            uri: web.uri,
        })
        .take(MAX_SOURCES)
        .collect();

    let (raw_response, footfall_index) = extract_footfall_index(&text);
    Ok(AdviceResult {
        raw_response,
        sources,
        footfall_index,
    })
}

#[async_trait]
impl AdviceProvider for GeminiAdviceProvider {
    async fn advise(&self, context: &AdviceContext) -> Result<AdviceResult, AdviceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AdviceError::MissingCredential)?;

        let prompt = build_prompt(context, self.vocabulary);
        debug!(model = %self.model, "sending advice prompt ({} chars)", prompt.len());

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: Some(prompt) }],
            }],
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdviceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let result = into_result(response.json().await?)?;
        info!(
            location = %context.location,
            footfall_index = result.footfall_index,
            sources = result.sources.len(),
            "advice received"
        );
        Ok(result)
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
