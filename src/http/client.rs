use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::config::ApiConfig;
use crate::workflow::{
    EmotionAnalysis, EmotionAnalyzer, RemoteCallError, SelectedImage, SongRecommender,
};

/// HTTP client for the mood-music backend. Implements both remote
/// collaborators of the workflow controller; every call is a single attempt.
#[derive(Debug, Clone)]
pub struct MoodApiClient {
    http: Client,
    analyze_url: Url,
    recommend_url: Url,
}

#[derive(Debug, Serialize)]
struct RecommendRequest<'a> {
    mood_description: &'a str,
}

// Every field is optional: the backend answers 200 with `{"error": ...}`
// when it fails internally.
#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    dominant_emotion: Option<serde_json::Value>,
    emotions: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RecommendResponse {
    suggested_songs: Option<serde_json::Value>,
}

impl MoodApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, RemoteCallError> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            analyze_url: endpoint(&config.base_url, &config.analyze_path)?,
            recommend_url: endpoint(&config.base_url, &config.recommend_path)?,
        })
    }

    pub fn analyze_url(&self) -> &Url {
        &self.analyze_url
    }

    pub fn recommend_url(&self) -> &Url {
        &self.recommend_url
    }
}

#[async_trait]
impl EmotionAnalyzer for MoodApiClient {
    async fn analyze(&self, image: &SelectedImage) -> Result<EmotionAnalysis, RemoteCallError> {
        let part = Part::bytes(image.bytes().to_vec())
            .file_name(image.file_name().to_string())
            .mime_str(image.media_type())?;
        let form = Form::new().part("file", part);

        debug!(url = %self.analyze_url, size_bytes = image.len(), "POST analyze");
        let response = self
            .http
            .post(self.analyze_url.clone())
            .multipart(form)
            .send()
            .await?;

        let body: AnalyzeResponse = decode(response).await?;
        let dominant_emotion = required_text(body.dominant_emotion, "dominant_emotion")?;

        Ok(EmotionAnalysis::new(dominant_emotion).with_scores(scores(body.emotions)))
    }
}

#[async_trait]
impl SongRecommender for MoodApiClient {
    async fn recommend(&self, mood_description: &str) -> Result<String, RemoteCallError> {
        debug!(url = %self.recommend_url, "POST recommend");
        let response = self
            .http
            .post(self.recommend_url.clone())
            .json(&RecommendRequest { mood_description })
            .send()
            .await?;

        let body: RecommendResponse = decode(response).await?;
        // Rendered verbatim, so no trimming here
        required_text(body.suggested_songs, "suggested_songs")
    }
}

/// Join base URL and path without dropping a path prefix on the base
pub(crate) fn endpoint(base_url: &str, path: &str) -> Result<Url, RemoteCallError> {
    let joined = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&joined).map_err(|e| RemoteCallError::InvalidEndpoint(format!("{joined}: {e}")))
}

/// Non-success statuses are failures; their bodies are never read
async fn decode<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T, RemoteCallError> {
    let status = response.status();
    if !status.is_success() {
        return Err(RemoteCallError::Status(status));
    }
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| RemoteCallError::Decode(e.to_string()))
}

/// A present, non-blank string field
pub(crate) fn required_text(
    value: Option<serde_json::Value>,
    field: &'static str,
) -> Result<String, RemoteCallError> {
    match value {
        Some(serde_json::Value::String(text)) if !text.trim().is_empty() => Ok(text),
        _ => Err(RemoteCallError::MalformedResponse { field }),
    }
}

/// Numeric entries of the score map; anything else is ignored
pub(crate) fn scores(value: Option<serde_json::Value>) -> BTreeMap<String, f64> {
    match value {
        Some(serde_json::Value::Object(map)) => map
            .into_iter()
            .filter_map(|(emotion, score)| score.as_f64().map(|score| (emotion, score)))
            .collect(),
        _ => BTreeMap::new(),
    }
}
