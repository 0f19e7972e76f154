pub mod gemini;
pub mod prompt;

use crate::insights::Insights;
use log::warn;
use serde::Deserialize;
use serde_json::Value;

pub use gemini::{FeedbackService, GeminiClient};
pub use prompt::build_prompt;

const NO_FEEDBACK: &str = "No feedback generated.";

fn no_feedback() -> String {
    NO_FEEDBACK.to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TopicRecommendation {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub actions: Vec<String>,
}

/// A reply that decoded into the requested JSON shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StructuredFeedback {
    #[serde(default = "no_feedback")]
    pub feedback: String,
    #[serde(default)]
    pub recommendations: Vec<TopicRecommendation>,
    #[serde(default)]
    pub general_recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackOutcome {
    Structured(StructuredFeedback),
    /// The reply did not decode; `diagnostic` says why.
    RawText { text: String, diagnostic: String },
}

/// What the feedback step produced for the report.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackStatus {
    Received(FeedbackOutcome),
    /// No request was made, or the request failed.
    Unavailable(String),
}

/// Remove a surrounding Markdown code fence, with or without a language tag.
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop an info string such as "json", which may run straight into the body
    body.trim_start_matches(|c: char| c.is_ascii_alphabetic()).trim()
}

/// Decode a reply into structured feedback, keeping the raw text when it is
/// not a JSON object of the expected shape.
pub fn parse_feedback_reply(reply: &str) -> FeedbackOutcome {
    let raw = |diagnostic: String| FeedbackOutcome::RawText {
        text: reply.to_string(),
        diagnostic,
    };

    let value: Value = match serde_json::from_str(strip_code_fence(reply)) {
        Ok(value) => value,
        Err(e) => return raw(format!("reply is not valid JSON: {}", e)),
    };

    if !value.is_object() {
        return raw("reply is JSON but not an object".to_string());
    }

    match serde_json::from_value::<StructuredFeedback>(value) {
        Ok(structured) => FeedbackOutcome::Structured(structured),
        Err(e) => raw(format!("reply has an unexpected shape: {}", e)),
    }
}

/// Ask the service for feedback on `insights`. Never fails the run.
pub fn request_feedback(service: &dyn FeedbackService, insights: &Insights) -> FeedbackStatus {
    let prompt = build_prompt(insights);
    match service.generate(&prompt) {
        Ok(reply) => {
            let outcome = parse_feedback_reply(&reply);
            if let FeedbackOutcome::RawText { diagnostic, .. } = &outcome {
                warn!("Could not decode feedback reply: {}", diagnostic);
            }
            FeedbackStatus::Received(outcome)
        }
        Err(e) => {
            warn!("Feedback request failed: {}", e);
            FeedbackStatus::Unavailable(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeedbackError;

    #[test]
    fn test_full_reply() {
        let reply = r#"{
            "feedback": "Good work.",
            "recommendations": [{"topic": "Optics", "actions": ["Review lenses", "Draw ray diagrams"]}],
            "general_recommendations": ["Sleep well"]
        }"#;

        match parse_feedback_reply(reply) {
            FeedbackOutcome::Structured(feedback) => {
                assert_eq!(feedback.feedback, "Good work.");
                assert_eq!(feedback.recommendations[0].topic, "Optics");
                assert_eq!(feedback.recommendations[0].actions.len(), 2);
                assert_eq!(feedback.general_recommendations, vec!["Sleep well"]);
            }
            other => panic!("expected structured feedback, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_keys_default() {
        match parse_feedback_reply("{}") {
            FeedbackOutcome::Structured(feedback) => {
                assert_eq!(feedback.feedback, "No feedback generated.");
                assert!(feedback.recommendations.is_empty());
                assert!(feedback.general_recommendations.is_empty());
            }
            other => panic!("expected structured feedback, got {:?}", other),
        }
    }

    #[test]
    fn test_fenced_reply() {
        let reply = "```json\n{\"feedback\": \"Fenced.\"}\n```";
        match parse_feedback_reply(reply) {
            FeedbackOutcome::Structured(feedback) => assert_eq!(feedback.feedback, "Fenced."),
            other => panic!("expected structured feedback, got {:?}", other),
        }
    }

    #[test]
    fn test_plain_text_is_raw() {
        let outcome = parse_feedback_reply("Keep practicing!");
        match outcome {
            FeedbackOutcome::RawText { text, diagnostic } => {
                assert_eq!(text, "Keep practicing!");
                assert!(diagnostic.contains("not valid JSON"));
            }
            other => panic!("expected raw text, got {:?}", other),
        }
    }

    #[test]
    fn test_json_array_is_raw() {
        assert!(matches!(
            parse_feedback_reply("[1, 2]"),
            FeedbackOutcome::RawText { .. }
        ));
    }

    #[test]
    fn test_wrong_field_type_is_raw() {
        assert!(matches!(
            parse_feedback_reply(r#"{"feedback": 42}"#),
            FeedbackOutcome::RawText { .. }
        ));
    }

    #[test]
    fn test_strip_code_fence_without_fence() {
        assert_eq!(strip_code_fence("  {\"a\": 1} "), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```{}```"), "{}");
    }

    #[test]
    fn test_strip_code_fence_single_line_with_tag() {
        assert_eq!(strip_code_fence("```json{\"a\": 1}```"), "{\"a\": 1}");
        match parse_feedback_reply("```json{\"feedback\": \"Inline.\"}```") {
            FeedbackOutcome::Structured(feedback) => assert_eq!(feedback.feedback, "Inline."),
            other => panic!("expected structured feedback, got {:?}", other),
        }
    }

    #[test]
    fn test_strip_code_fence_keeps_multiline_body() {
        assert_eq!(
            strip_code_fence("```{\"a\": 1,\n\"b\": 2}```"),
            "{\"a\": 1,\n\"b\": 2}"
        );
    }

    struct FailingService;

    impl FeedbackService for FailingService {
        fn generate(&self, _prompt: &str) -> Result<String, FeedbackError> {
            Err(FeedbackError::HttpStatus {
                status: 503,
                message: "overloaded".to_string(),
            })
        }
    }

    #[test]
    fn test_service_failure_is_unavailable() {
        let insights = crate::insights::derive_insights(
            &crate::analytics::aggregate(&[]),
            &test_submission(),
            &crate::config::Thresholds::default(),
        );
        match request_feedback(&FailingService, &insights) {
            FeedbackStatus::Unavailable(reason) => assert!(reason.contains("503")),
            other => panic!("expected unavailable, got {:?}", other),
        }
    }

    fn test_submission() -> crate::records::CurrentSubmission {
        let value = serde_json::json!({
            "quiz": {"topic": "Optics"},
            "accuracy": "50%",
            "final_score": 10,
            "correct_answers": 5,
            "incorrect_answers": 5,
            "submitted_at": "2025-01-17T15:51:29.859+05:30",
            "started_at": "2025-01-17T15:50:00.000+05:30",
            "ended_at": "2025-01-17T15:51:00.000+05:30",
            "total_questions": 10
        });
        crate::records::CurrentSubmission::from_json(&value).unwrap()
    }
}
