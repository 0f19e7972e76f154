use crate::error::{AnalysisError, RecordError};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

/// Parse an accuracy percentage such as `"83 %"` or `"47.5%"`.
///
/// The trailing percent sign is optional. Anything that is not a finite
/// number in `[0, 100]` is rejected.
pub fn parse_accuracy(text: &str) -> Result<f64, String> {
    let trimmed = text.trim();
    let numeric = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    let value: f64 = numeric
        .parse()
        .map_err(|_| format!("accuracy '{}' is not a percentage", text))?;
    check_accuracy_bounds(value)
}

fn check_accuracy_bounds(value: f64) -> Result<f64, String> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("accuracy {} is outside 0..=100", value))
    }
}

/// Parse an ISO-8601 timestamp and normalize it to UTC.
///
/// Timestamps without an offset are taken as UTC.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, String> {
    let trimmed = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(format!("'{}' is not an ISO-8601 timestamp", text))
}

/// One historical quiz submission.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizAttempt {
    pub topic: String,
    pub accuracy: f64,
    pub score: f64,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
    pub submitted_at: DateTime<Utc>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

impl QuizAttempt {
    /// Build an attempt from one element of the historical array.
    ///
    /// `index` is the position in the fetched array and only serves to name the
    /// record in errors.
    pub fn from_json(value: &Value, index: usize) -> Result<Self, RecordError> {
        let fields = Fields::new(value, record_label(Some(index), value));
        fields.attempt()
    }

    /// Elapsed time between start and end, in seconds. Never negative.
    pub fn duration_seconds(&self) -> f64 {
        (self.ended_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

/// The submission being analyzed right now.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentSubmission {
    pub attempt: QuizAttempt,
    pub total_questions: u32,
}

impl CurrentSubmission {
    pub fn from_json(value: &Value) -> Result<Self, RecordError> {
        let fields = Fields::new(value, record_label(None, value));
        let attempt = fields.attempt()?;
        let total_questions = fields.count("total_questions")?;
        Ok(CurrentSubmission {
            attempt,
            total_questions,
        })
    }

    pub fn accuracy(&self) -> f64 {
        self.attempt.accuracy
    }

    /// Seconds spent per question; 0 for a quiz without questions.
    pub fn time_per_question_seconds(&self) -> f64 {
        if self.total_questions > 0 {
            self.attempt.duration_seconds() / self.total_questions as f64
        } else {
            0.0
        }
    }

    pub fn time_per_question_minutes(&self) -> f64 {
        self.time_per_question_seconds() / 60.0
    }
}

/// Parse the historical endpoint body, failing on the first bad record.
pub fn attempts_from_json(value: &Value) -> Result<Vec<QuizAttempt>, AnalysisError> {
    let items = value
        .as_array()
        .ok_or_else(|| AnalysisError::UnexpectedShape(json_kind(value).to_string()))?;

    let attempts = items
        .iter()
        .enumerate()
        .map(|(index, item)| QuizAttempt::from_json(item, index))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(attempts)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn record_label(index: Option<usize>, value: &Value) -> String {
    let base = match index {
        Some(i) => format!("#{}", i),
        None => "current submission".to_string(),
    };
    match value.get("id") {
        Some(Value::String(id)) => format!("{} (id {})", base, id),
        Some(Value::Number(id)) => format!("{} (id {})", base, id),
        _ => base,
    }
}

/// Typed field access over one raw JSON record.
struct Fields<'a> {
    value: &'a Value,
    label: String,
}

impl<'a> Fields<'a> {
    fn new(value: &'a Value, label: String) -> Self {
        Self { value, label }
    }

    fn attempt(&self) -> Result<QuizAttempt, RecordError> {
        if !self.value.is_object() {
            return Err(RecordError::malformed(&self.label, "not a JSON object"));
        }

        let topic = self
            .value
            .get("quiz")
            .and_then(|quiz| quiz.get("topic"))
            .and_then(Value::as_str)
            .map(str::trim)
            .ok_or_else(|| RecordError::malformed(&self.label, "missing field 'quiz.topic'"))?;

        let accuracy = self.accuracy()?;
        let score = self.number("final_score")?;
        let correct_answers = self.count("correct_answers")?;
        let incorrect_answers = self.count("incorrect_answers")?;
        let submitted_at = self.timestamp("submitted_at")?;
        let started_at = self.timestamp("started_at")?;
        let ended_at = self.timestamp("ended_at")?;

        if ended_at < started_at {
            return Err(RecordError::timestamp(
                &self.label,
                "ended_at",
                "end precedes start",
            ));
        }

        Ok(QuizAttempt {
            topic: topic.to_string(),
            accuracy,
            score,
            correct_answers,
            incorrect_answers,
            submitted_at,
            started_at,
            ended_at,
        })
    }

    fn field(&self, key: &str) -> Result<&'a Value, RecordError> {
        match self.value.get(key) {
            Some(Value::Null) | None => Err(RecordError::malformed(
                &self.label,
                format!("missing field '{}'", key),
            )),
            Some(value) => Ok(value),
        }
    }

    fn accuracy(&self) -> Result<f64, RecordError> {
        let result = match self.field("accuracy")? {
            Value::String(text) => parse_accuracy(text),
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| "accuracy is not a number".to_string())
                .and_then(check_accuracy_bounds),
            _ => Err("accuracy must be text or a number".to_string()),
        };
        result.map_err(|reason| RecordError::malformed(&self.label, reason))
    }

    fn number(&self, key: &str) -> Result<f64, RecordError> {
        let parsed = match self.field(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.filter(|v| v.is_finite()).ok_or_else(|| {
            RecordError::malformed(&self.label, format!("field '{}' is not a number", key))
        })
    }

    fn count(&self, key: &str) -> Result<u32, RecordError> {
        let parsed = match self.field(key)? {
            Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
            Value::String(text) => text.trim().parse::<u32>().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| {
            RecordError::malformed(
                &self.label,
                format!("field '{}' is not a non-negative integer", key),
            )
        })
    }

    fn timestamp(&self, key: &str) -> Result<DateTime<Utc>, RecordError> {
        let text = self
            .field(key)?
            .as_str()
            .ok_or_else(|| RecordError::timestamp(&self.label, key, "not a string"))?;
        parse_timestamp(text).map_err(|reason| RecordError::timestamp(&self.label, key, reason))
    }
}
