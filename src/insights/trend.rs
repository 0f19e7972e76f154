/// Direction of the accuracy trend across historical attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendInsight {
    Improving,
    Fluctuating,
    /// Fewer than two data points.
    Insufficient,
}

/// Shown next to the trend; describes variation across topics.
pub const PERFORMANCE_GAPS_INSIGHT: &str =
    "Significant performance variation across topics. Strong in some, weak in others.";

impl TrendInsight {
    /// Compare the oldest and newest values of a time-ordered series.
    ///
    /// Only a strictly higher newest value counts as improving.
    pub fn from_trend(values: &[f64]) -> Self {
        match (values.first(), values.last()) {
            (Some(first), Some(last)) if values.len() >= 2 => {
                if last > first {
                    TrendInsight::Improving
                } else {
                    TrendInsight::Fluctuating
                }
            }
            _ => TrendInsight::Insufficient,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            TrendInsight::Improving => {
                "Showing improvement in recent quizzes compared to older ones."
            }
            TrendInsight::Fluctuating => {
                "Performance is fluctuating, not showing consistent improvement."
            }
            TrendInsight::Insufficient => {
                "Mixed trends. Accuracy and score are fluctuating. Needs consistent improvement focus."
            }
        }
    }
}
