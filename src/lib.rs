// Mood Music Library - photo emotion detection and song recommendations
// This exposes the pipeline controller and its collaborators for hosts and tests

pub mod cli;
pub mod config;
pub mod http;
pub mod image;
pub mod notifications;
pub mod observability;
pub mod telemetry;
pub mod workflow;

// Re-export key types for easy access
pub use config::{ApiConfig, MoodMusicConfig, NotificationConfig, ObservabilityConfig};
pub use http::MoodApiClient;
pub use image::FileImageSource;
pub use notifications::{Notification, Severity, ToastQueue};
pub use observability::{OperationTimer, PipelineMetrics, PipelineStats};
pub use telemetry::{create_action_span, generate_correlation_id, init_telemetry};
pub use workflow::{
    ActionOutcome, CallTarget, EmotionAnalysis, EmotionAnalyzer, ImageSource, Notifier,
    RemoteCallError, SelectedImage, SongRecommender, ValidationError, WorkflowController,
    WorkflowError, WorkflowPhase, WorkflowSnapshot,
};
