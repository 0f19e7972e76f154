use thiserror::Error;

/// Failure to obtain a JSON document from one source.
///
/// The fetcher never lets this escape: it is logged and turned into an absent
/// document at the fetch boundary.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("{url} returned status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("could not read {path}: {message}")]
    Io { path: String, message: String },

    #[error("body of {source_name} is not valid JSON: {message}")]
    InvalidJson { source_name: String, message: String },
}

/// A quiz record that cannot be turned into a validated attempt.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("record {record}: {reason}")]
    MalformedRecord { record: String, reason: String },

    #[error("record {record}: malformed timestamp in '{field}': {reason}")]
    MalformedTimestamp {
        record: String,
        field: String,
        reason: String,
    },
}

impl RecordError {
    pub fn malformed(record: &str, reason: impl Into<String>) -> Self {
        RecordError::MalformedRecord {
            record: record.to_string(),
            reason: reason.into(),
        }
    }

    pub fn timestamp(record: &str, field: &str, reason: impl Into<String>) -> Self {
        RecordError::MalformedTimestamp {
            record: record.to_string(),
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum FeedbackError {
    #[error("GEMINI_API_KEY is not set; AI feedback is disabled")]
    MissingApiKey,

    #[error("AI feedback was turned off with --no-ai")]
    Disabled,

    #[error("feedback request failed: {0}")]
    Network(String),

    #[error("feedback service returned status {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("feedback service reply could not be read: {0}")]
    Envelope(String),

    #[error("feedback service returned no candidates")]
    EmptyReply,
}

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("could not create output directory {path}: {message}")]
    OutputDir { path: String, message: String },

    #[error("failed to draw {chart}: {message}")]
    Drawing { chart: String, message: String },

    #[error("skipped {chart}: no data to plot")]
    NoData { chart: String },
}

/// Errors that end a run before any report is produced.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to retrieve data from one or more endpoints ({0}). Exiting.")]
    SourcesUnavailable(String),

    #[error("historical data must be a JSON array, got {0}")]
    UnexpectedShape(String),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_error_names_the_record() {
        let err = RecordError::malformed("#2 (id 17)", "missing field 'accuracy'");
        assert_eq!(
            err.to_string(),
            "record #2 (id 17): missing field 'accuracy'"
        );
    }

    #[test]
    fn test_timestamp_error_names_the_field() {
        let err = RecordError::timestamp("#0", "ended_at", "end precedes start");
        let message = err.to_string();
        assert!(message.contains("ended_at"));
        assert!(message.contains("end precedes start"));
    }

    #[test]
    fn test_sources_unavailable_message() {
        let err = AnalysisError::SourcesUnavailable("historical".to_string());
        assert!(err.to_string().starts_with("Failed to retrieve data"));
    }
}
