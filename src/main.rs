use anyhow::Result;
use clap::Parser;

use mood_music::cli::commands::analyze::AnalyzeCommand;
use mood_music::cli::commands::run::RunCommand;
use mood_music::cli::commands::show_config::ShowConfigCommand;
use mood_music::cli::commands::{show_how_to_get_started, Command};
use mood_music::cli::{Cli, Commands};
use mood_music::config::MoodMusicConfig;
use mood_music::telemetry::init_telemetry;

fn main() -> Result<()> {
    let cli = Cli::parse();

    MoodMusicConfig::load_env_file()?;
    let config = MoodMusicConfig::load(cli.config.as_deref())?;
    init_telemetry(&config.observability)?;

    match cli.command {
        // No subcommand - explain how to use the tool
        None => show_how_to_get_started(),
        Some(Commands::Analyze { image }) => tokio::runtime::Runtime::new()?
            .block_on(async { AnalyzeCommand::new(image, config).execute().await }),
        Some(Commands::Run { image }) => tokio::runtime::Runtime::new()?
            .block_on(async { RunCommand::new(image, config).execute().await }),
        Some(Commands::Config) => tokio::runtime::Runtime::new()?
            .block_on(async { ShowConfigCommand::new(config).execute().await }),
    }
}
