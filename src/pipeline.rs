use crate::analytics::{AggregationResult, aggregate};
use crate::charts::{ChartReport, render_all};
use crate::config::AppConfig;
use crate::error::{AnalysisError, FeedbackError};
use crate::feedback::{FeedbackService, FeedbackStatus, request_feedback};
use crate::fetcher::{JsonSource, fetch_all};
use crate::insights::{Insights, derive_insights};
use crate::records::{CurrentSubmission, attempts_from_json};
use crate::report::render_report;
use log::info;

/// Everything one run produced.
#[derive(Debug)]
pub struct RunOutput {
    pub aggregation: AggregationResult,
    pub insights: Insights,
    pub feedback: FeedbackStatus,
    /// Console report text.
    pub report: String,
    /// `None` when charts are turned off.
    pub charts: Option<ChartReport>,
}

/// Fetch, aggregate, classify, ask for feedback, render.
///
/// Only missing sources and malformed records end the run early. A feedback
/// service that is unavailable (`Err`) or fails is reported in the output.
pub fn run(
    config: &AppConfig,
    source: &dyn JsonSource,
    feedback: Result<&dyn FeedbackService, &FeedbackError>,
) -> Result<RunOutput, AnalysisError> {
    let sources = fetch_all(source, &config.endpoints)?;

    let attempts = attempts_from_json(&sources.historical)?;
    let current = CurrentSubmission::from_json(&sources.current)?;
    info!(
        "Parsed {} historical attempt(s) and the current submission",
        attempts.len()
    );

    let aggregation = aggregate(&attempts);
    let insights = derive_insights(&aggregation, &current, &config.thresholds);

    let feedback = match feedback {
        Ok(service) => request_feedback(service, &insights),
        Err(reason) => {
            info!("Skipping AI feedback: {}", reason);
            FeedbackStatus::Unavailable(reason.to_string())
        }
    };

    let report = render_report(&aggregation, &insights, &feedback);

    let charts = if config.charts_enabled {
        info!("Rendering charts into {}", config.output_dir.display());
        Some(render_all(
            &aggregation,
            &config.output_dir,
            config.chart_font.as_deref(),
        ))
    } else {
        None
    };

    Ok(RunOutput {
        aggregation,
        insights,
        feedback,
        report,
        charts,
    })
}
