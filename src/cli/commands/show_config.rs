use anyhow::Result;

use crate::cli::commands::Command;
use crate::config::MoodMusicConfig;

pub struct ShowConfigCommand {
    pub config: MoodMusicConfig,
}

impl ShowConfigCommand {
    pub fn new(config: MoodMusicConfig) -> Self {
        Self { config }
    }
}

impl Command for ShowConfigCommand {
    async fn execute(&self) -> Result<()> {
        print!("{}", self.config.to_toml()?);
        Ok(())
    }
}
