use anyhow::Result;
use std::path::PathBuf;

use crate::cli::commands::{print_emotion, Command, Session};
use crate::config::MoodMusicConfig;
use crate::image::FileImageSource;

pub struct AnalyzeCommand {
    pub image: PathBuf,
    pub config: MoodMusicConfig,
}

impl AnalyzeCommand {
    pub fn new(image: PathBuf, config: MoodMusicConfig) -> Self {
        Self { image, config }
    }
}

impl Command for AnalyzeCommand {
    async fn execute(&self) -> Result<()> {
        let session = Session::start(&self.config)?;
        let source = FileImageSource::open(&self.image).await?;
        session.controller.select_from(&source);

        println!("🔍 Analyzing {}...", source.path().display());
        let outcome = session.controller.request_analysis().await;
        session.settle(outcome)?;

        print_emotion(&session.controller.snapshot());
        session.controller.metrics().log_stats();
        Ok(())
    }
}
