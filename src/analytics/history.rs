use crate::records::QuizAttempt;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub submitted_at: DateTime<Utc>,
    pub accuracy: f64,
    pub score: f64,
    pub topic: String,
    pub duration_seconds: f64,
}

impl From<&QuizAttempt> for HistoryEntry {
    fn from(attempt: &QuizAttempt) -> Self {
        HistoryEntry {
            submitted_at: attempt.submitted_at,
            accuracy: attempt.accuracy,
            score: attempt.score,
            topic: attempt.topic.clone(),
            duration_seconds: attempt.duration_seconds(),
        }
    }
}

/// Historical attempts ordered by submission time, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceHistory {
    entries: Vec<HistoryEntry>,
}

impl PerformanceHistory {
    /// Order entries by parsed submission time. The sort is stable, so entries
    /// submitted at the same instant keep their fetch order.
    pub fn from_entries(mut entries: Vec<HistoryEntry>) -> Self {
        entries.sort_by_key(|entry| entry.submitted_at);
        Self { entries }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn accuracy_trend(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.accuracy).collect()
    }

    pub fn score_trend(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.score).collect()
    }
}
