// Traits for dependency injection - the controller only sees these seams

use async_trait::async_trait;

use super::errors::RemoteCallError;
use super::types::{EmotionAnalysis, SelectedImage};
use crate::notifications::Notification;

/// Remote image emotion classifier
#[async_trait]
pub trait EmotionAnalyzer: Send + Sync {
    /// Submit the image and return the detected emotion
    async fn analyze(&self, image: &SelectedImage) -> Result<EmotionAnalysis, RemoteCallError>;
}

/// Remote music recommendation engine
#[async_trait]
pub trait SongRecommender: Send + Sync {
    /// Ask for songs fitting a free-text mood description
    async fn recommend(&self, mood_description: &str) -> Result<String, RemoteCallError>;
}

/// Toast surface of the hosting view
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// File input widget of the hosting view
pub trait ImageSource {
    /// The file currently picked by the user, if any
    fn selected_file(&self) -> Option<SelectedImage>;
}
