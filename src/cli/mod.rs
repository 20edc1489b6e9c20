use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

#[derive(Parser)]
#[command(name = "mood-music")]
#[command(about = "Detect the mood of a photo and get songs that fit it")]
#[command(long_about = "Mood Music sends a photo to the emotion analysis backend, then asks the \
                       recommendation backend for songs matching the detected emotion. Get started \
                       with 'mood-music run <IMAGE>'.")]
pub struct Cli {
    /// Configuration file (defaults to ./mood-music.toml when present)
    #[arg(long, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect the dominant emotion in an image
    Analyze {
        /// Image to analyze
        #[arg(help = "Path of the image to submit for emotion detection")]
        image: PathBuf,
    },
    /// Detect the emotion in an image, then fetch matching songs
    Run {
        /// Image to analyze
        #[arg(help = "Path of the image to submit for emotion detection")]
        image: PathBuf,
    },
    /// Print the effective configuration
    Config,
}
