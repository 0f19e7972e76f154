use log::warn;
use quiz_insights::cli::Args;
use quiz_insights::config::AppConfig;
use quiz_insights::error::FeedbackError;
use quiz_insights::feedback::{FeedbackService, GeminiClient};
use quiz_insights::fetcher::HttpJsonSource;
use quiz_insights::pipeline::run;
use quiz_insights::report::render_chart_summary;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse_args();

    let config = match AppConfig::load(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if !config.color {
        colored::control::set_override(false);
    }

    let source = match HttpJsonSource::new(config.fetch_timeout) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error creating HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let client = if config.ai_enabled {
        GeminiClient::new(&config.gemini)
    } else {
        Err(FeedbackError::Disabled)
    };
    if let Err(e) = &client {
        if !matches!(e, FeedbackError::Disabled) {
            warn!("Feedback client unavailable: {}", e);
        }
    }

    let feedback = client.as_ref().map(|c| c as &dyn FeedbackService);

    match run(&config, &source, feedback) {
        Ok(output) => {
            println!("{}", output.report);
            if let Some(charts) = &output.charts {
                println!("{}", render_chart_summary(charts));
            }
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
