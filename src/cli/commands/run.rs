use anyhow::Result;
use std::path::PathBuf;

use crate::cli::commands::{print_emotion, print_recommendations, Command, Session};
use crate::config::MoodMusicConfig;
use crate::image::FileImageSource;

/// Full pipeline: analysis, then recommendations for the detected emotion
pub struct RunCommand {
    pub image: PathBuf,
    pub config: MoodMusicConfig,
}

impl RunCommand {
    pub fn new(image: PathBuf, config: MoodMusicConfig) -> Self {
        Self { image, config }
    }
}

impl Command for RunCommand {
    async fn execute(&self) -> Result<()> {
        let session = Session::start(&self.config)?;
        let source = FileImageSource::open(&self.image).await?;
        session.controller.select_from(&source);

        println!("🔍 Analyzing {}...", source.path().display());
        let outcome = session.controller.request_analysis().await;
        session.settle(outcome)?;
        print_emotion(&session.controller.snapshot());

        println!();
        println!("🎧 Fetching recommendations...");
        let outcome = session.controller.request_recommendation().await;
        let settled = session.settle(outcome);
        session.controller.metrics().log_stats();
        settled?;

        print_recommendations(&session.controller.snapshot());
        Ok(())
    }
}
