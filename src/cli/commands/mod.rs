use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::MoodMusicConfig;
use crate::http::MoodApiClient;
use crate::notifications::{Severity, ToastQueue};
use crate::workflow::{ActionOutcome, WorkflowController, WorkflowSnapshot};

pub mod analyze;
pub mod run;
pub mod show_config;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}

/// One interactive session: a controller wired to the real backend and a
/// toast queue rendered on stderr
pub struct Session {
    pub controller: WorkflowController,
    pub toasts: Arc<ToastQueue>,
}

impl Session {
    pub fn start(config: &MoodMusicConfig) -> Result<Self> {
        let client = Arc::new(
            MoodApiClient::new(&config.api).context("Failed to build mood-music API client")?,
        );
        let toasts = Arc::new(ToastQueue::from_config(&config.notifications));
        let controller = WorkflowController::new(client.clone(), client, toasts.clone());

        Ok(Self { controller, toasts })
    }

    /// Print pending toasts and turn a non-committed outcome into an error
    pub fn settle(&self, outcome: ActionOutcome) -> Result<()> {
        for toast in self.toasts.drain() {
            let marker = match toast.severity {
                Severity::Destructive => "❌",
                Severity::Default => "ℹ️ ",
            };
            eprintln!("{marker} {}: {}", toast.title, toast.description);
        }

        match outcome {
            ActionOutcome::Committed => Ok(()),
            ActionOutcome::NotCommitted(err) => Err(err.into()),
        }
    }
}

pub fn print_emotion(snapshot: &WorkflowSnapshot) {
    let Some(analysis) = &snapshot.analysis else {
        return;
    };
    println!("🎭 Detected emotion: {}", analysis.dominant_emotion);

    if !analysis.scores.is_empty() {
        let mut scores: Vec<_> = analysis.scores.iter().collect();
        scores.sort_by(|a, b| b.1.total_cmp(a.1));
        for (emotion, score) in scores {
            println!("   {emotion:<10} {score:>6.2}%");
        }
    }
}

pub fn print_recommendations(snapshot: &WorkflowSnapshot) {
    if let Some(songs) = &snapshot.recommendations {
        println!("🎵 Recommended songs:");
        // Preformatted text from the backend, printed as-is
        println!("{songs}");
    }
}

pub fn show_how_to_get_started() -> Result<()> {
    println!("🎵 Mood Music - songs for the mood in your photo");
    println!();
    println!("To get started:");
    println!("  🎭 mood-music analyze <IMAGE>   # Detect the dominant emotion");
    println!("  🎵 mood-music run <IMAGE>       # Detect the emotion and get songs");
    println!("  ⚙️  mood-music config            # Show the effective configuration");
    println!();
    println!("💡 Point 'api.base_url' in mood-music.toml (or MOOD_MUSIC__API__BASE_URL) at your backend.");
    Ok(())
}
