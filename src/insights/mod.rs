pub mod difficulty;
pub mod persona;
pub mod speed;
pub mod trend;

use crate::analytics::AggregationResult;
use crate::config::Thresholds;
use crate::records::CurrentSubmission;
use log::info;

pub use difficulty::{DifficultyLevel, DifficultyRecommendation, recommend_difficulty};
pub use persona::{Persona, PersonaProfile, PersonaSignals};
pub use speed::{Pace, SpeedAccuracyInsight};
pub use trend::{PERFORMANCE_GAPS_INSIGHT, TrendInsight};

/// Incorrect answers accumulated for one weak topic.
#[derive(Debug, Clone, PartialEq)]
pub struct MistakePattern {
    pub topic: String,
    pub incorrect_answers: u64,
}

/// All rule outputs of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Insights {
    pub weak_areas: Vec<String>,
    pub strong_areas: Vec<String>,
    pub accuracy_trend: TrendInsight,
    pub difficulty: Vec<DifficultyRecommendation>,
    pub speed: SpeedAccuracyInsight,
    pub mistakes: Vec<MistakePattern>,
    pub persona: PersonaProfile,
    pub time_per_question_minutes: f64,
}

impl Insights {
    pub fn performance_gaps(&self) -> &'static str {
        PERFORMANCE_GAPS_INSIGHT
    }

    /// Study advice that does not depend on the feedback service.
    pub fn fallback_recommendations(&self) -> Vec<String> {
        let weak = self.weak_areas.join(", ");
        vec![
            format!("Focus on improving in the weak areas: {}.", weak),
            format!("Revisit the concepts of {} topics.", weak),
            "Practice more quizzes specifically on the weak topics.".to_string(),
            "Analyze incorrect answers in quizzes to understand mistakes.".to_string(),
            "Maintain consistency in performance across all topics.".to_string(),
        ]
    }
}

pub fn derive_insights(
    result: &AggregationResult,
    current: &CurrentSubmission,
    thresholds: &Thresholds,
) -> Insights {
    let weak_areas: Vec<String> = result.weak_areas().into_iter().map(String::from).collect();
    let strong_areas: Vec<String> = result
        .strong_areas()
        .into_iter()
        .map(String::from)
        .collect();

    let accuracy_trend = TrendInsight::from_trend(&result.history().accuracy_trend());
    let speed = SpeedAccuracyInsight::assess(current, thresholds);

    let mistakes = weak_areas
        .iter()
        .filter_map(|topic| {
            result
                .incorrect_count(topic)
                .map(|incorrect_answers| MistakePattern {
                    topic: topic.clone(),
                    incorrect_answers,
                })
        })
        .collect();

    let signals = PersonaSignals {
        overall_accuracy: result.overall_average_accuracy(),
        minutes_per_question: current.time_per_question_minutes(),
        performance_gap: result.performance_gap(),
    };
    let persona = Persona::classify(&signals, thresholds).profile(&strong_areas, &weak_areas);

    info!(
        "Derived insights: trend={:?} pace={:?} persona={}",
        accuracy_trend,
        speed.pace,
        persona.persona.label()
    );

    Insights {
        difficulty: recommend_difficulty(result),
        weak_areas,
        strong_areas,
        accuracy_trend,
        speed,
        mistakes,
        persona,
        time_per_question_minutes: current.time_per_question_minutes(),
    }
}
