use crate::records::QuizAttempt;

/// Running totals for one topic while attempts are being folded in.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicAccumulator {
    topic: String,
    total_accuracy: f64,
    count: u32,
    total_score: f64,
    total_duration_seconds: f64,
    highest_accuracy: f64,
    lowest_accuracy: f64,
    total_incorrect: u64,
}

impl TopicAccumulator {
    pub fn new(topic: &str) -> Self {
        Self {
            topic: topic.to_string(),
            total_accuracy: 0.0,
            count: 0,
            total_score: 0.0,
            total_duration_seconds: 0.0,
            highest_accuracy: 0.0,
            // Any real accuracy is <= 100, so the first attempt always lowers it
            lowest_accuracy: 100.0,
            total_incorrect: 0,
        }
    }

    pub fn add(&mut self, attempt: &QuizAttempt) {
        self.total_accuracy += attempt.accuracy;
        self.count += 1;
        self.total_score += attempt.score;
        self.total_duration_seconds += attempt.duration_seconds();
        self.highest_accuracy = self.highest_accuracy.max(attempt.accuracy);
        self.lowest_accuracy = self.lowest_accuracy.min(attempt.accuracy);
        self.total_incorrect = self
            .total_incorrect
            .saturating_add(u64::from(attempt.incorrect_answers));
    }

    /// Compute the averages. Returns `None` for an accumulator that never saw
    /// an attempt.
    pub fn finish(self) -> Option<TopicStats> {
        if self.count == 0 {
            return None;
        }
        let count = self.count as f64;
        Some(TopicStats {
            avg_accuracy: self.total_accuracy / count,
            avg_score: self.total_score / count,
            avg_duration_minutes: self.total_duration_seconds / count / 60.0,
            topic: self.topic,
            total_accuracy: self.total_accuracy,
            count: self.count,
            total_score: self.total_score,
            total_duration_seconds: self.total_duration_seconds,
            highest_accuracy: self.highest_accuracy,
            lowest_accuracy: self.lowest_accuracy,
            total_incorrect: self.total_incorrect,
        })
    }
}

/// Final per-topic statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicStats {
    pub topic: String,
    pub total_accuracy: f64,
    pub count: u32,
    pub total_score: f64,
    pub total_duration_seconds: f64,
    pub highest_accuracy: f64,
    pub lowest_accuracy: f64,
    pub total_incorrect: u64,
    pub avg_accuracy: f64,
    pub avg_score: f64,
    pub avg_duration_minutes: f64,
}
