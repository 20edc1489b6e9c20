// Mock implementations for testing - scripted responses, no network

use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;

use super::errors::RemoteCallError;
use super::traits::{EmotionAnalyzer, ImageSource, Notifier, SongRecommender};
use super::types::{EmotionAnalysis, SelectedImage};
use crate::notifications::Notification;

/// Lets a test hold a remote call in flight until it decides to release it
#[derive(Debug, Default)]
pub struct CallGate {
    entered: Notify,
    released: Notify,
}

impl CallGate {
    /// Wait until the mocked call has started
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    /// Let the mocked call complete
    pub fn release(&self) {
        self.released.notify_one();
    }

    async fn pass(&self) {
        self.entered.notify_one();
        self.released.notified().await;
    }
}

/// Queue of scripted results consumed one per call
#[derive(Debug)]
struct Script<T> {
    responses: Mutex<VecDeque<Result<T, RemoteCallError>>>,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
    gate: Option<CallGate>,
}

impl<T> Script<T> {
    fn new(gated: bool) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            gate: gated.then(CallGate::default),
        }
    }

    fn push(&self, response: Result<T, RemoteCallError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    async fn next(&self, input: String) -> Result<T, RemoteCallError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(input);
        if let Some(gate) = &self.gate {
            gate.pass().await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(RemoteCallError::Status(StatusCode::INTERNAL_SERVER_ERROR)))
    }
}

/// Emotion analyzer returning scripted results; unscripted calls fail with 500
#[derive(Debug)]
pub struct MockEmotionAnalyzer {
    script: Script<EmotionAnalysis>,
}

impl Default for MockEmotionAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEmotionAnalyzer {
    pub fn new() -> Self {
        Self { script: Script::new(false) }
    }

    /// Analyzer whose calls block until `gate().release()`
    pub fn gated() -> Self {
        Self { script: Script::new(true) }
    }

    pub fn gate(&self) -> &CallGate {
        self.script.gate.as_ref().expect("analyzer was not built with gated()")
    }

    pub fn succeed_with(&self, emotion: &str) -> &Self {
        self.script.push(Ok(EmotionAnalysis::new(emotion)));
        self
    }

    pub fn respond(&self, response: Result<EmotionAnalysis, RemoteCallError>) -> &Self {
        self.script.push(response);
        self
    }

    pub fn fail_with_status(&self, status: StatusCode) -> &Self {
        self.script.push(Err(RemoteCallError::Status(status)));
        self
    }

    pub fn call_count(&self) -> usize {
        self.script.calls.load(Ordering::SeqCst)
    }

    /// File names of the images submitted so far
    pub fn submitted_files(&self) -> Vec<String> {
        self.script.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmotionAnalyzer for MockEmotionAnalyzer {
    async fn analyze(&self, image: &SelectedImage) -> Result<EmotionAnalysis, RemoteCallError> {
        self.script.next(image.file_name().to_string()).await
    }
}

/// Recommender returning scripted results; unscripted calls fail with 500
#[derive(Debug)]
pub struct MockSongRecommender {
    script: Script<String>,
}

impl Default for MockSongRecommender {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSongRecommender {
    pub fn new() -> Self {
        Self { script: Script::new(false) }
    }

    pub fn gated() -> Self {
        Self { script: Script::new(true) }
    }

    pub fn gate(&self) -> &CallGate {
        self.script.gate.as_ref().expect("recommender was not built with gated()")
    }

    pub fn succeed_with(&self, songs: &str) -> &Self {
        self.script.push(Ok(songs.to_string()));
        self
    }

    pub fn fail_with_status(&self, status: StatusCode) -> &Self {
        self.script.push(Err(RemoteCallError::Status(status)));
        self
    }

    pub fn call_count(&self) -> usize {
        self.script.calls.load(Ordering::SeqCst)
    }

    /// Mood descriptions sent so far
    pub fn moods(&self) -> Vec<String> {
        self.script.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl SongRecommender for MockSongRecommender {
    async fn recommend(&self, mood_description: &str) -> Result<String, RemoteCallError> {
        self.script.next(mood_description.to_string()).await
    }
}

/// Notifier that keeps every notification it receives
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn received(&self) -> Vec<Notification> {
        self.received.lock().unwrap().clone()
    }

    pub fn descriptions(&self) -> Vec<String> {
        self.received().into_iter().map(|n| n.description).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.received.lock().unwrap().push(notification);
    }
}

/// File input stand-in
#[derive(Debug, Default)]
pub struct MockImageSource {
    pub file: Option<SelectedImage>,
}

impl ImageSource for MockImageSource {
    fn selected_file(&self) -> Option<SelectedImage> {
        self.file.clone()
    }
}

pub fn png_image(file_name: &str) -> SelectedImage {
    SelectedImage::new(file_name, "image/png", vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a])
}
