pub mod history;
pub mod topic_stats;

use crate::records::QuizAttempt;
use log::{debug, info};
use std::cmp::Ordering;
use std::collections::HashMap;

pub use history::{HistoryEntry, PerformanceHistory};
pub use topic_stats::{TopicAccumulator, TopicStats};

/// Number of topics reported as weak or strong areas.
pub const FOCUS_AREA_COUNT: usize = 3;

/// Everything the aggregation pass produces from the historical attempts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationResult {
    /// Per-topic statistics in order of first appearance.
    topics: Vec<TopicStats>,
    /// Indices into `topics`, lowest average accuracy first.
    weakest: Vec<usize>,
    /// Indices into `topics`, highest average accuracy first.
    strongest: Vec<usize>,
    history: PerformanceHistory,
}

impl AggregationResult {
    pub fn topics(&self) -> &[TopicStats] {
        &self.topics
    }

    pub fn topic(&self, name: &str) -> Option<&TopicStats> {
        self.topics.iter().find(|stats| stats.topic == name)
    }

    /// Total incorrect answers recorded for `topic` across past quizzes.
    pub fn incorrect_count(&self, topic: &str) -> Option<u64> {
        self.topic(topic).map(|stats| stats.total_incorrect)
    }

    pub fn incorrect_counts(&self) -> HashMap<String, u64> {
        self.topics
            .iter()
            .map(|stats| (stats.topic.clone(), stats.total_incorrect))
            .collect()
    }

    pub fn history(&self) -> &PerformanceHistory {
        &self.history
    }

    pub fn ranked_weakest(&self) -> Vec<&TopicStats> {
        self.weakest.iter().map(|&i| &self.topics[i]).collect()
    }

    pub fn ranked_strongest(&self) -> Vec<&TopicStats> {
        self.strongest.iter().map(|&i| &self.topics[i]).collect()
    }

    pub fn weak_areas(&self) -> Vec<&str> {
        self.ranked_weakest()
            .into_iter()
            .take(FOCUS_AREA_COUNT)
            .map(|stats| stats.topic.as_str())
            .collect()
    }

    pub fn strong_areas(&self) -> Vec<&str> {
        self.ranked_strongest()
            .into_iter()
            .take(FOCUS_AREA_COUNT)
            .map(|stats| stats.topic.as_str())
            .collect()
    }

    /// Unweighted mean of the per-topic average accuracies; 0 without topics.
    pub fn overall_average_accuracy(&self) -> f64 {
        if self.topics.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.topics.iter().map(|stats| stats.avg_accuracy).sum();
        sum / self.topics.len() as f64
    }

    /// Best topic average minus worst topic average; 0 without topics.
    pub fn performance_gap(&self) -> f64 {
        match (self.strongest.first(), self.weakest.first()) {
            (Some(&best), Some(&worst)) => {
                self.topics[best].avg_accuracy - self.topics[worst].avg_accuracy
            }
            _ => 0.0,
        }
    }
}

/// Fold all historical attempts into per-topic statistics, rankings and the
/// time-ordered history.
pub fn aggregate(attempts: &[QuizAttempt]) -> AggregationResult {
    let mut accumulators: Vec<TopicAccumulator> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut entries = Vec::with_capacity(attempts.len());

    for attempt in attempts {
        let index = *positions.entry(attempt.topic.as_str()).or_insert_with(|| {
            accumulators.push(TopicAccumulator::new(&attempt.topic));
            accumulators.len() - 1
        });
        accumulators[index].add(attempt);
        entries.push(HistoryEntry::from(attempt));

        debug!(
            "Folded attempt: topic={} accuracy={:.1} score={:.1} duration={:.0}s",
            attempt.topic,
            attempt.accuracy,
            attempt.score,
            attempt.duration_seconds()
        );
    }

    // Every accumulator was created together with its first `add`
    let topics: Vec<TopicStats> = accumulators
        .into_iter()
        .filter_map(TopicAccumulator::finish)
        .collect();

    let mut weakest: Vec<usize> = (0..topics.len()).collect();
    weakest.sort_by(|&a, &b| compare_accuracy(&topics[a], &topics[b]));

    let mut strongest: Vec<usize> = (0..topics.len()).collect();
    strongest.sort_by(|&a, &b| compare_accuracy(&topics[b], &topics[a]));

    info!(
        "Aggregated {} attempt(s) across {} topic(s)",
        attempts.len(),
        topics.len()
    );

    AggregationResult {
        topics,
        weakest,
        strongest,
        history: PerformanceHistory::from_entries(entries),
    }
}

fn compare_accuracy(a: &TopicStats, b: &TopicStats) -> Ordering {
    a.avg_accuracy
        .partial_cmp(&b.avg_accuracy)
        .unwrap_or(Ordering::Equal)
}
