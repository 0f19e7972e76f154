use crate::cli::Args;
use crate::error::AnalysisError;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_HISTORICAL_URL: &str = "https://api.jsonserve.com/XgAgFJ";
pub const DEFAULT_CURRENT_URL: &str = "https://api.jsonserve.com/rJvd7g";
pub const DEFAULT_METADATA_URL: &str = "https://www.jsonkeeper.com/b/LLQT";

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Minutes-per-question cut points used by the speed and persona rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Below this pace a low-accuracy quiz counts as rushed.
    pub rush_minutes: f64,
    /// Below this pace a learner counts as fast.
    pub fast_minutes: f64,
    /// Above this pace a learner counts as deliberate.
    pub slow_minutes: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            rush_minutes: 0.20,
            fast_minutes: 0.25,
            slow_minutes: 0.5,
        }
    }
}

/// The three documents every run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoints {
    pub historical: String,
    pub current: String,
    pub metadata: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            historical: DEFAULT_HISTORICAL_URL.to_string(),
            current: DEFAULT_CURRENT_URL.to_string(),
            metadata: DEFAULT_METADATA_URL.to_string(),
        }
    }
}

/// Settings for the Gemini feedback call. The sampling knobs are sent as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    /// `None` disables AI feedback without affecting the rest of the run.
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            temperature: 0.9,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 8192,
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub endpoints: Endpoints,
    pub gemini: GeminiConfig,
    pub thresholds: Thresholds,
    pub fetch_timeout: Duration,
    pub output_dir: PathBuf,
    pub chart_font: Option<PathBuf>,
    pub charts_enabled: bool,
    pub ai_enabled: bool,
    pub color: bool,
}

impl AppConfig {
    /// Build the configuration from parsed arguments and the process
    /// environment. A `.env` file in the working directory is loaded first.
    pub fn load(args: &Args) -> Result<Self, AnalysisError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(args, |key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::load`] with an explicit variable lookup.
    pub fn from_lookup<F>(args: &Args, lookup: F) -> Result<Self, AnalysisError>
    where
        F: Fn(&str) -> Option<String>,
    {
        args.validate_sources().map_err(AnalysisError::Config)?;
        if args.timeout_secs == 0 {
            return Err(AnalysisError::Config(
                "--timeout-secs must be greater than zero".to_string(),
            ));
        }

        let api_key = lookup("GEMINI_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let mut gemini = GeminiConfig {
            api_key,
            ..GeminiConfig::default()
        };
        if let Some(base) = lookup("GEMINI_API_BASE").filter(|b| !b.trim().is_empty()) {
            gemini.api_base = base.trim().trim_end_matches('/').to_string();
        }
        if let Some(model) = &args.model {
            gemini.model = model.clone();
        }

        Ok(AppConfig {
            endpoints: Endpoints {
                historical: args.historical_url.clone(),
                current: args.current_url.clone(),
                metadata: args.metadata_url.clone(),
            },
            gemini,
            thresholds: Thresholds::default(),
            fetch_timeout: Duration::from_secs(args.timeout_secs),
            output_dir: args.output_dir.clone(),
            chart_font: args.chart_font.clone(),
            charts_enabled: !args.no_charts,
            ai_enabled: !args.no_ai,
            color: !args.no_color,
        })
    }
}
