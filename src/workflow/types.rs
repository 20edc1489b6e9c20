// Data model for the mood-music pipeline

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::errors::WorkflowError;

/// Media type used when the payload cannot be sniffed
pub const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// The picture the user picked, held as an opaque payload.
///
/// Cloning is cheap: the bytes are shared.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedImage {
    file_name: String,
    media_type: String,
    bytes: Arc<[u8]>,
}

impl SelectedImage {
    pub fn new(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Build an image whose media type is sniffed from its magic bytes
    pub fn sniffed(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let media_type = infer::get(&bytes)
            .map(|kind| kind.mime_type())
            .unwrap_or(FALLBACK_MEDIA_TYPE);
        Self::new(file_name, media_type, bytes)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether the declared media type is an image type
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }

    pub fn info(&self) -> ImageInfo {
        ImageInfo {
            file_name: self.file_name.clone(),
            media_type: self.media_type.clone(),
            size_bytes: self.bytes.len(),
        }
    }
}

// Payloads can be megabytes; keep them out of debug output.
impl fmt::Debug for SelectedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedImage")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("size_bytes", &self.bytes.len())
            .finish()
    }
}

/// Metadata of the selected image, safe to hand to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub file_name: String,
    pub media_type: String,
    pub size_bytes: usize,
}

/// Result of a successful emotion analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionAnalysis {
    pub dominant_emotion: String,
    /// Per-emotion scores as reported by the classifier, when available
    #[serde(default)]
    pub scores: BTreeMap<String, f64>,
}

impl EmotionAnalysis {
    pub fn new(dominant_emotion: impl Into<String>) -> Self {
        Self {
            dominant_emotion: dominant_emotion.into(),
            scores: BTreeMap::new(),
        }
    }

    pub fn with_scores(mut self, scores: BTreeMap<String, f64>) -> Self {
        self.scores = scores;
        self
    }
}

/// Which remote call currently holds the busy flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallTarget {
    Analysis,
    Recommendation,
}

impl CallTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallTarget::Analysis => "analysis",
            CallTarget::Recommendation => "recommendation",
        }
    }
}

impl fmt::Display for CallTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite state derived from the data model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowPhase {
    Idle,
    ImageReady,
    Analyzing,
    EmotionReady,
    Recommending,
    RecommendationReady,
}

impl WorkflowPhase {
    pub fn is_busy(&self) -> bool {
        matches!(self, WorkflowPhase::Analyzing | WorkflowPhase::Recommending)
    }
}

/// Immutable copy of everything the presentation layer renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSnapshot {
    pub phase: WorkflowPhase,
    pub image: Option<ImageInfo>,
    pub analysis: Option<EmotionAnalysis>,
    pub recommendations: Option<String>,
    pub in_flight: Option<CallTarget>,
}

impl WorkflowSnapshot {
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn dominant_emotion(&self) -> Option<&str> {
        self.analysis.as_ref().map(|a| a.dominant_emotion.as_str())
    }

    pub fn can_analyze(&self) -> bool {
        self.image.is_some() && !self.is_busy()
    }

    pub fn can_recommend(&self) -> bool {
        self.dominant_emotion().is_some_and(|e| !e.trim().is_empty()) && !self.is_busy()
    }
}

/// What an action did. The controller has already reported any failure
/// through its notifier, so callers may ignore this.
#[derive(Debug)]
pub enum ActionOutcome {
    Committed,
    NotCommitted(WorkflowError),
}

impl ActionOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, ActionOutcome::Committed)
    }
}
