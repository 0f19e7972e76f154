use crate::config::{DEFAULT_CURRENT_URL, DEFAULT_HISTORICAL_URL, DEFAULT_METADATA_URL};
use crate::fetcher::SourceLocation;
use clap::Parser;
use std::path::PathBuf;

/// Analyze quiz history and the latest submission, then suggest what to study next
#[derive(Parser, Debug, Clone)]
#[command(name = "Quiz Insights")]
#[command(about = "Analyze quiz performance and generate study recommendations", long_about = None)]
#[command(version)]
pub struct Args {
    /// Historical quiz submissions (URL, file:// URL or path)
    #[arg(long, value_name = "SOURCE", default_value = DEFAULT_HISTORICAL_URL)]
    pub historical_url: String,

    /// Current quiz submission (URL, file:// URL or path)
    #[arg(long, value_name = "SOURCE", default_value = DEFAULT_CURRENT_URL)]
    pub current_url: String,

    /// Quiz metadata (URL, file:// URL or path)
    #[arg(long, value_name = "SOURCE", default_value = DEFAULT_METADATA_URL)]
    pub metadata_url: String,

    /// Directory where chart images are written
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    #[arg(long, help = "Skip chart generation")]
    pub no_charts: bool,

    /// TrueType font for chart text (defaults to a common system font)
    #[arg(long, value_name = "PATH")]
    pub chart_font: Option<PathBuf>,

    #[arg(long, help = "Skip the AI feedback request")]
    pub no_ai: bool,

    #[arg(long, help = "Disable colored console output")]
    pub no_color: bool,

    /// Gemini model used for feedback
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Timeout for each data request, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Check that every source is an http(s) URL, a file:// URL or a path
    pub fn validate_sources(&self) -> Result<(), String> {
        for (flag, value) in [
            ("--historical-url", &self.historical_url),
            ("--current-url", &self.current_url),
            ("--metadata-url", &self.metadata_url),
        ] {
            SourceLocation::parse(value)
                .map_err(|e| format!("Invalid source for {}: {}", flag, e))?;
        }
        Ok(())
    }
}
