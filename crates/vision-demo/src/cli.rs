use crate::models::InferenceMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vision_client::BuildMode;

#[derive(Parser, Debug)]
#[command(name = "vision-demo")]
#[command(
    author,
    version,
    about = "Image-classification demo client for a remote inference API"
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Inference API base URL
    #[arg(long, global = true, env = "VISION_API_URL")]
    pub api_url: Option<String>,

    /// Build mode: development or production
    #[arg(long, global = true, env = "VISION_BUILD_MODE", value_parser = parse_build_mode)]
    pub build_mode: Option<BuildMode>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check whether the inference service is online and its model loaded
    Health,

    /// Classify an image file or a built-in sample
    Classify {
        /// Image file to upload
        #[arg(required_unless_present = "sample", conflicts_with = "sample")]
        image: Option<PathBuf>,

        /// Built-in sample id (see `samples`)
        #[arg(short, long)]
        sample: Option<String>,

        /// Number of predictions to request (1, 3, 5 or 10)
        #[arg(short = 'k', long, value_parser = parse_top_k)]
        top_k: Option<u32>,

        /// Inference mode preset: fast or deterministic
        #[arg(short, long, value_parser = parse_mode)]
        mode: Option<InferenceMode>,

        /// Show raw probabilities
        #[arg(long)]
        raw: bool,

        /// Host serving the sample images
        #[arg(long)]
        samples_url: Option<String>,
    },

    /// List the built-in sample images
    Samples,

    /// Print the API documentation URL
    Docs,
}

fn parse_mode(s: &str) -> Result<InferenceMode, String> {
    s.parse()
}

fn parse_build_mode(s: &str) -> Result<BuildMode, String> {
    s.parse()
}

fn parse_top_k(s: &str) -> Result<u32, String> {
    let k: u32 = s.parse().map_err(|e| format!("invalid top-k '{s}': {e}"))?;
    if crate::models::TOP_K_CHOICES.contains(&k) {
        Ok(k)
    } else {
        Err(format!(
            "top-k must be one of {:?}",
            crate::models::TOP_K_CHOICES
        ))
    }
}
