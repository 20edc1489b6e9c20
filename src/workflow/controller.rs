// Workflow controller - drives the analyze -> recommend pipeline
//
// All pipeline state lives behind one mutex. The lock is never held across
// an await: the busy check-and-set is one critical section, and committing a
// result together with releasing the busy flag is another.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn, Instrument};

use super::errors::{RemoteCallError, ValidationError, WorkflowError};
use super::traits::{EmotionAnalyzer, ImageSource, Notifier, SongRecommender};
use super::types::{
    ActionOutcome, CallTarget, EmotionAnalysis, SelectedImage, WorkflowPhase, WorkflowSnapshot,
};
use crate::notifications::Notification;
use crate::observability::{OperationTimer, PipelineMetrics};
use crate::telemetry::{create_action_span, generate_correlation_id};

pub const ERROR_TITLE: &str = "Error";
pub const NO_IMAGE_MESSAGE: &str = "Please select an image first";
pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to analyze image";
pub const NO_EMOTION_MESSAGE: &str = "Please analyze an image first";
pub const RECOMMENDATION_FAILED_MESSAGE: &str = "Failed to get recommendations";

#[derive(Debug, Default)]
struct PipelineState {
    image: Option<SelectedImage>,
    analysis: Option<EmotionAnalysis>,
    recommendations: Option<String>,
    in_flight: Option<CallTarget>,
}

impl PipelineState {
    fn phase(&self) -> WorkflowPhase {
        match self.in_flight {
            Some(CallTarget::Analysis) => WorkflowPhase::Analyzing,
            Some(CallTarget::Recommendation) => WorkflowPhase::Recommending,
            None if self.recommendations.is_some() => WorkflowPhase::RecommendationReady,
            None if self.analysis.is_some() => WorkflowPhase::EmotionReady,
            None if self.image.is_some() => WorkflowPhase::ImageReady,
            None => WorkflowPhase::Idle,
        }
    }

    fn usable_emotion(&self) -> Option<String> {
        self.analysis
            .as_ref()
            .map(|a| a.dominant_emotion.clone())
            .filter(|emotion| !emotion.trim().is_empty())
    }
}

/// Holds the busy flag for one in-flight call. Dropping it without
/// `release` (the action future was dropped) frees the flag and commits
/// nothing.
struct BusyGuard<'a> {
    state: &'a Mutex<PipelineState>,
    target: CallTarget,
    armed: bool,
}

impl<'a> BusyGuard<'a> {
    /// Release the flag and apply `commit` under the same lock
    fn release(mut self, commit: impl FnOnce(&mut PipelineState)) {
        let mut state = lock(self.state);
        commit(&mut state);
        state.in_flight = None;
        self.armed = false;
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!(call = %self.target, "In-flight call abandoned, releasing busy flag");
            lock(self.state).in_flight = None;
        }
    }
}

// State is consistent at every unlock, so a poisoned lock is safe to reuse.
fn lock(state: &Mutex<PipelineState>) -> MutexGuard<'_, PipelineState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the pipeline state of one session and sequences the two remote calls
pub struct WorkflowController {
    analyzer: Arc<dyn EmotionAnalyzer>,
    recommender: Arc<dyn SongRecommender>,
    notifier: Arc<dyn Notifier>,
    metrics: Arc<PipelineMetrics>,
    state: Mutex<PipelineState>,
}

impl WorkflowController {
    pub fn new(
        analyzer: Arc<dyn EmotionAnalyzer>,
        recommender: Arc<dyn SongRecommender>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            analyzer,
            recommender,
            notifier,
            metrics: Arc::new(PipelineMetrics::new()),
            state: Mutex::new(PipelineState::default()),
        }
    }

    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }

    /// Record the picked image. Allowed at any time, including while a call
    /// is in flight; downstream results are left as they are.
    pub fn select_image(&self, image: SelectedImage) {
        let mut state = lock(&self.state);
        debug!(
            file_name = %image.file_name(),
            media_type = %image.media_type(),
            size_bytes = image.len(),
            in_flight = ?state.in_flight,
            "Image selected"
        );
        state.image = Some(image);
    }

    /// Take whatever file the image source currently holds.
    /// Returns false (and changes nothing) when it holds none.
    pub fn select_from(&self, source: &dyn ImageSource) -> bool {
        match source.selected_file() {
            Some(image) => {
                self.select_image(image);
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        let state = lock(&self.state);
        WorkflowSnapshot {
            phase: state.phase(),
            image: state.image.as_ref().map(SelectedImage::info),
            analysis: state.analysis.clone(),
            recommendations: state.recommendations.clone(),
            in_flight: state.in_flight,
        }
    }

    pub fn phase(&self) -> WorkflowPhase {
        lock(&self.state).phase()
    }

    pub fn is_busy(&self) -> bool {
        lock(&self.state).in_flight.is_some()
    }

    pub fn dominant_emotion(&self) -> Option<String> {
        lock(&self.state)
            .analysis
            .as_ref()
            .map(|a| a.dominant_emotion.clone())
    }

    pub fn recommendations(&self) -> Option<String> {
        lock(&self.state).recommendations.clone()
    }

    /// Whether the analyze action should be enabled
    pub fn can_analyze(&self) -> bool {
        let state = lock(&self.state);
        state.image.is_some() && state.in_flight.is_none()
    }

    /// Whether the recommend action should be enabled
    pub fn can_recommend(&self) -> bool {
        let state = lock(&self.state);
        state.usable_emotion().is_some() && state.in_flight.is_none()
    }

    /// Submit the selected image for emotion detection
    pub async fn request_analysis(&self) -> ActionOutcome {
        let correlation_id = generate_correlation_id();
        let span = create_action_span(CallTarget::Analysis, &correlation_id);
        self.run_analysis().instrument(span).await
    }

    /// Ask for songs matching the detected emotion
    pub async fn request_recommendation(&self) -> ActionOutcome {
        let correlation_id = generate_correlation_id();
        let span = create_action_span(CallTarget::Recommendation, &correlation_id);
        self.run_recommendation().instrument(span).await
    }

    async fn run_analysis(&self) -> ActionOutcome {
        let (image, guard) = match self.begin(CallTarget::Analysis, |state| {
            state.image.clone().ok_or(ValidationError::NoImageSelected)
        }) {
            Ok(started) => started,
            Err(err) => return self.refuse(err, NO_IMAGE_MESSAGE),
        };

        info!(file_name = %image.file_name(), "Submitting image for analysis");
        let timer = OperationTimer::new(CallTarget::Analysis);
        let result = self.analyzer.analyze(&image).await;
        timer.finish(result.is_ok());

        match result {
            Ok(analysis) => {
                info!(dominant_emotion = %analysis.dominant_emotion, "Emotion detected");
                guard.release(|state| state.analysis = Some(analysis));
                ActionOutcome::Committed
            }
            Err(err) => {
                guard.release(|_| {});
                self.fail(err, ANALYSIS_FAILED_MESSAGE)
            }
        }
    }

    async fn run_recommendation(&self) -> ActionOutcome {
        let (emotion, guard) = match self.begin(CallTarget::Recommendation, |state| {
            state.usable_emotion().ok_or(ValidationError::NoEmotionAvailable)
        }) {
            Ok(started) => started,
            Err(err) => return self.refuse(err, NO_EMOTION_MESSAGE),
        };

        info!(mood_description = %emotion, "Requesting recommendations");
        let timer = OperationTimer::new(CallTarget::Recommendation);
        let result = self.recommender.recommend(&emotion).await;
        timer.finish(result.is_ok());

        match result {
            Ok(songs) => {
                guard.release(|state| state.recommendations = Some(songs));
                ActionOutcome::Committed
            }
            Err(err) => {
                guard.release(|_| {});
                self.fail(err, RECOMMENDATION_FAILED_MESSAGE)
            }
        }
    }

    /// Busy check, precondition check and busy set, under one lock
    fn begin<T>(
        &self,
        target: CallTarget,
        precondition: impl FnOnce(&PipelineState) -> Result<T, ValidationError>,
    ) -> Result<(T, BusyGuard<'_>), WorkflowError> {
        let mut state = lock(&self.state);
        if let Some(in_flight) = state.in_flight {
            return Err(WorkflowError::Busy(in_flight));
        }
        let input = precondition(&state)?;
        state.in_flight = Some(target);
        self.metrics.record_request(target);

        Ok((
            input,
            BusyGuard {
                state: &self.state,
                target,
                armed: true,
            },
        ))
    }

    fn refuse(&self, err: WorkflowError, message: &str) -> ActionOutcome {
        match &err {
            WorkflowError::Busy(in_flight) => {
                // The action is disabled while busy; nothing to tell the user.
                debug!(in_flight = %in_flight, "Action refused while busy");
                self.metrics.record_busy_rejection();
            }
            _ => {
                info!(reason = %err, "Action precondition not met");
                self.metrics.record_validation_rejection();
                self.notifier
                    .notify(Notification::destructive(ERROR_TITLE, message));
            }
        }
        ActionOutcome::NotCommitted(err)
    }

    fn fail(&self, err: RemoteCallError, message: &str) -> ActionOutcome {
        warn!(error = %err, "Remote call failed");
        self.metrics.record_remote_failure();
        self.notifier
            .notify(Notification::destructive(ERROR_TITLE, message));
        ActionOutcome::NotCommitted(WorkflowError::Remote(err))
    }
}
