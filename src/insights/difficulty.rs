use crate::analytics::AggregationResult;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DifficultyLevel {
    Easy,
    Medium,
    Normal,
}

impl DifficultyLevel {
    /// Below 40 is Easy, 40 through 60 inclusive is Medium, above 60 is Normal.
    pub fn for_accuracy(avg_accuracy: f64) -> Self {
        if avg_accuracy < 40.0 {
            DifficultyLevel::Easy
        } else if avg_accuracy <= 60.0 {
            DifficultyLevel::Medium
        } else {
            DifficultyLevel::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Easy => "Easy",
            DifficultyLevel::Medium => "Medium",
            DifficultyLevel::Normal => "Normal",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyRecommendation {
    pub topic: String,
    pub avg_accuracy: f64,
    pub level: DifficultyLevel,
}

impl DifficultyRecommendation {
    pub fn new(topic: &str, avg_accuracy: f64) -> Self {
        Self {
            topic: topic.to_string(),
            avg_accuracy,
            level: DifficultyLevel::for_accuracy(avg_accuracy),
        }
    }

    pub fn message(&self) -> String {
        match self.level {
            DifficultyLevel::Easy => format!(
                "Start with Easy quizzes for {} to build foundational understanding.",
                self.topic
            ),
            DifficultyLevel::Medium => format!(
                "Practice Medium quizzes for {} to strengthen your concepts.",
                self.topic
            ),
            DifficultyLevel::Normal => format!(
                "Continue practicing {} at Normal difficulty, focusing on accuracy.",
                self.topic
            ),
        }
    }
}

/// One recommendation per weak area, weakest first.
pub fn recommend_difficulty(result: &AggregationResult) -> Vec<DifficultyRecommendation> {
    result
        .weak_areas()
        .into_iter()
        .filter_map(|topic| result.topic(topic))
        .map(|stats| DifficultyRecommendation::new(&stats.topic, stats.avg_accuracy))
        .collect()
}
