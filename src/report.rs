use crate::analytics::AggregationResult;
use crate::charts::ChartReport;
use crate::feedback::{FeedbackOutcome, FeedbackStatus, StructuredFeedback};
use crate::insights::{Insights, Pace};
use crate::time_format::format_minutes;
use colored::Colorize;

fn heading(title: &str) -> String {
    format!("\n{}", format!("--- {} ---", title).bold().cyan())
}

/// `[40.00, 55.50]`
fn format_series(values: &[f64]) -> String {
    let items: Vec<String> = values.iter().map(|v| format!("{:.2}", v)).collect();
    format!("[{}]", items.join(", "))
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

/// Difficulty, pace and mistake sections, in that order.
pub fn render_rule_insights(insights: &Insights) -> String {
    let mut lines = vec![heading("Difficulty Level Recommendations")];
    if insights.difficulty.is_empty() {
        lines.push("No weak topics to recommend a difficulty for.".to_string());
    }
    for rec in &insights.difficulty {
        lines.push(format!(
            "- Topic: {} - Recommended Difficulty Level: {} - Recommendation: {}",
            rec.topic.bold(),
            rec.level.as_str().bold(),
            rec.message()
        ));
    }

    lines.push(heading("Speed vs. Accuracy Analysis"));
    let speed = insights.speed.message();
    lines.push(match insights.speed.pace {
        Pace::Rushing => speed.yellow().to_string(),
        Pace::Balanced => speed,
    });

    lines.push(heading("Mistake Pattern Analysis"));
    for mistake in &insights.mistakes {
        lines.push(format!(
            "- Topic: {} - Total Incorrect Answers in Past Quizzes: {}",
            mistake.topic, mistake.incorrect_answers
        ));
    }

    lines.join("\n")
}

fn render_structured(feedback: &StructuredFeedback, lines: &mut Vec<String>) {
    lines.push(format!("Feedback: {}", feedback.feedback));

    if !feedback.recommendations.is_empty() {
        lines.push(String::new());
        lines.push("Topic-Specific Recommendations:".bold().to_string());
        for rec in &feedback.recommendations {
            lines.push(format!("  - {}:", rec.topic.bold()));
            for action in &rec.actions {
                lines.push(format!("    - {}", action));
            }
        }
    }

    if !feedback.general_recommendations.is_empty() {
        lines.push(String::new());
        lines.push("General Study Recommendations:".bold().to_string());
        for (i, rec) in feedback.general_recommendations.iter().enumerate() {
            lines.push(format!("  {}. {}", i + 1, rec));
        }
    }
}

pub fn render_feedback(status: &FeedbackStatus) -> String {
    let mut lines = Vec::new();
    match status {
        FeedbackStatus::Received(FeedbackOutcome::Structured(feedback)) => {
            lines.push(heading("AI Feedback"));
            render_structured(feedback, &mut lines);
        }
        FeedbackStatus::Received(FeedbackOutcome::RawText { text, diagnostic }) => {
            lines.push(heading("AI Feedback Error"));
            lines.push(
                format!(
                    "Could not decode JSON response ({}). Displaying raw text response:",
                    diagnostic
                )
                .red()
                .to_string(),
            );
            lines.push(text.clone());
        }
        FeedbackStatus::Unavailable(reason) => {
            lines.push(heading("AI Feedback"));
            lines.push(format!("AI feedback unavailable: {}", reason).yellow().to_string());
        }
    }
    lines.join("\n")
}

/// Per-topic statistics, weakest topic first.
pub fn render_topic_performance(result: &AggregationResult) -> String {
    let mut lines = vec![heading("Topic-wise Performance")];
    for stats in result.ranked_weakest() {
        lines.push(format!("- Topic: {}", stats.topic.bold()));
        lines.push(format!("  Average Accuracy: {:.2}%", stats.avg_accuracy));
        lines.push(format!("  Average Score: {:.2}", stats.avg_score));
        lines.push(format!(
            "  Average Duration: {}",
            format_minutes(stats.avg_duration_minutes)
        ));
        lines.push(format!("  Highest Accuracy: {:.2}%", stats.highest_accuracy));
        lines.push(format!("  Lowest Accuracy: {:.2}%", stats.lowest_accuracy));
        lines.push("-".repeat(30));
    }

    lines.push(String::new());
    lines.push(format!(
        "Strongest Topics: {}",
        join_or_none(&to_owned(result.strong_areas())).green()
    ));
    lines.push(format!(
        "Weakest Topics: {}",
        join_or_none(&to_owned(result.weak_areas())).red()
    ));
    lines.push(format!(
        "Performance Trend (Accuracy): {}",
        format_series(&result.history().accuracy_trend())
    ));
    lines.push(format!(
        "Performance Trend (Score): {}",
        format_series(&result.history().score_trend())
    ));

    lines.join("\n")
}

fn to_owned(items: Vec<&str>) -> Vec<String> {
    items.into_iter().map(String::from).collect()
}

/// Insights, fallback recommendations and the persona.
pub fn render_summary(insights: &Insights) -> String {
    let mut lines = vec![heading("Insights")];
    lines.push(format!("Weak Areas: {}", join_or_none(&insights.weak_areas)));
    lines.push(format!("Strong Areas: {}", join_or_none(&insights.strong_areas)));
    lines.push(format!(
        "Improvement Trend: {}",
        insights.accuracy_trend.message()
    ));
    lines.push(format!("Performance Gaps: {}", insights.performance_gaps()));

    lines.push(heading("Recommendations"));
    for (i, rec) in insights.fallback_recommendations().iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, rec));
    }

    lines.push(heading("Student Persona"));
    lines.push(format!(
        "Persona: {}",
        insights.persona.persona.label().bold().green()
    ));
    lines.push(format!("Strengths Insight: {}", insights.persona.strengths));
    lines.push(format!("Weaknesses Insight: {}", insights.persona.weaknesses));

    lines.join("\n")
}

/// The full console report.
pub fn render_report(
    result: &AggregationResult,
    insights: &Insights,
    feedback: &FeedbackStatus,
) -> String {
    [
        render_rule_insights(insights),
        render_feedback(feedback),
        render_topic_performance(result),
        render_summary(insights),
    ]
    .join("\n")
}

pub fn render_chart_summary(charts: &ChartReport) -> String {
    let mut lines = vec![heading("Visualizations")];
    for name in &charts.generated {
        lines.push(format!("Saved {}", name));
    }
    for failure in &charts.failures {
        lines.push(format!("Chart not generated: {}", failure).yellow().to_string());
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::aggregate;
    use crate::config::Thresholds;
    use crate::error::ChartError;
    use crate::feedback::TopicRecommendation;
    use crate::insights::derive_insights;
    use crate::records::{CurrentSubmission, QuizAttempt};
    use chrono::{Duration, TimeZone, Utc};

    fn plain() {
        colored::control::set_override(false);
    }

    fn attempt(topic: &str, accuracy: f64, day: u32) -> QuizAttempt {
        let started_at = Utc.with_ymd_and_hms(2025, 1, day, 8, 0, 0).unwrap();
        QuizAttempt {
            topic: topic.to_string(),
            accuracy,
            score: accuracy / 4.0,
            correct_answers: 6,
            incorrect_answers: 4,
            submitted_at: started_at + Duration::minutes(3),
            started_at,
            ended_at: started_at + Duration::minutes(3),
        }
    }

    fn scenario() -> (AggregationResult, Insights) {
        let result = aggregate(&[
            attempt("Optics", 30.0, 1),
            attempt("Genetics", 50.0, 2),
            attempt("Ecology", 90.0, 3),
        ]);
        let current = CurrentSubmission {
            attempt: attempt("Genetics", 45.0, 4),
            total_questions: 30,
        };
        let insights = derive_insights(&result, &current, &Thresholds::default());
        (result, insights)
    }

    #[test]
    fn test_rule_insights_sections() {
        plain();
        let (_, insights) = scenario();
        let text = render_rule_insights(&insights);

        assert!(text.contains("--- Difficulty Level Recommendations ---"));
        assert!(text.contains("- Topic: Optics - Recommended Difficulty Level: Easy"));
        assert!(text.contains("- Topic: Genetics - Recommended Difficulty Level: Medium"));
        // 3 minutes over 30 questions
        assert!(text.contains("0.10 minutes per question"));
        assert!(text.contains("- Topic: Optics - Total Incorrect Answers in Past Quizzes: 4"));
    }

    #[test]
    fn test_topic_performance_is_weakest_first() {
        plain();
        let (result, _) = scenario();
        let text = render_topic_performance(&result);

        let optics = text.find("- Topic: Optics").unwrap();
        let genetics = text.find("- Topic: Genetics").unwrap();
        let ecology = text.find("- Topic: Ecology").unwrap();
        assert!(optics < genetics && genetics < ecology);
        assert!(text.contains("  Average Duration: 3.00 minutes"));
        assert!(text.contains("Performance Trend (Accuracy): [30.00, 50.00, 90.00]"));
    }

    #[test]
    fn test_structured_feedback_rendering() {
        plain();
        let status = FeedbackStatus::Received(FeedbackOutcome::Structured(StructuredFeedback {
            feedback: "Nice progress.".to_string(),
            recommendations: vec![TopicRecommendation {
                topic: "Optics".to_string(),
                actions: vec!["Draw ray diagrams".to_string()],
            }],
            general_recommendations: vec!["Review daily".to_string(), "Rest".to_string()],
        }));
        let text = render_feedback(&status);

        assert!(text.contains("Feedback: Nice progress."));
        assert!(text.contains("  - Optics:\n    - Draw ray diagrams"));
        assert!(text.contains("  1. Review daily\n  2. Rest"));
    }

    #[test]
    fn test_raw_text_feedback_rendering() {
        plain();
        let status = FeedbackStatus::Received(FeedbackOutcome::RawText {
            text: "Keep going!".to_string(),
            diagnostic: "reply is not valid JSON".to_string(),
        });
        let text = render_feedback(&status);

        assert!(text.contains("--- AI Feedback Error ---"));
        assert!(text.contains("Displaying raw text response:\nKeep going!"));
    }

    #[test]
    fn test_unavailable_feedback_rendering() {
        plain();
        let text = render_feedback(&FeedbackStatus::Unavailable("disabled".to_string()));
        assert!(text.contains("AI feedback unavailable: disabled"));
    }

    #[test]
    fn test_summary_has_five_recommendations_and_persona() {
        plain();
        let (_, insights) = scenario();
        let text = render_summary(&insights);

        assert!(text.contains("1. Focus on improving in the weak areas: Optics, Genetics, Ecology."));
        assert!(text.contains("5. Maintain consistency"));
        assert!(!text.contains("6. "));
        assert!(text.contains("Persona: Needs Support Learner"));
    }

    #[test]
    fn test_full_report_order() {
        plain();
        let (result, insights) = scenario();
        let text = render_report(
            &result,
            &insights,
            &FeedbackStatus::Unavailable("disabled".to_string()),
        );

        let difficulty = text.find("Difficulty Level Recommendations").unwrap();
        let feedback = text.find("AI feedback unavailable").unwrap();
        let topics = text.find("Topic-wise Performance").unwrap();
        let persona = text.find("Student Persona").unwrap();
        assert!(difficulty < feedback && feedback < topics && topics < persona);
    }

    #[test]
    fn test_empty_history_lists_none() {
        plain();
        let text = render_topic_performance(&aggregate(&[]));
        assert!(text.contains("Strongest Topics: None"));
        assert!(text.contains("Performance Trend (Score): []"));
    }

    #[test]
    fn test_chart_summary() {
        plain();
        let charts = ChartReport {
            generated: vec!["topic_accuracy_bar_chart.png".to_string()],
            failures: vec![ChartError::NoData {
                chart: "accuracy_trend_line_chart.png".to_string(),
            }],
        };
        let text = render_chart_summary(&charts);

        assert!(text.contains("Saved topic_accuracy_bar_chart.png"));
        assert!(text.contains("skipped accuracy_trend_line_chart.png: no data to plot"));
    }
}
