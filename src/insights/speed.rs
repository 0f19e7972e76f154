use crate::config::Thresholds;
use crate::records::CurrentSubmission;

/// Accuracy below which a fast quiz counts as rushed.
pub const RUSH_ACCURACY_LIMIT: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    Rushing,
    Balanced,
}

/// Pace versus accuracy for the current submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedAccuracyInsight {
    pub pace: Pace,
    pub minutes_per_question: f64,
    pub accuracy: f64,
}

impl SpeedAccuracyInsight {
    pub fn assess(current: &CurrentSubmission, thresholds: &Thresholds) -> Self {
        Self::from_values(
            current.time_per_question_minutes(),
            current.accuracy(),
            thresholds,
        )
    }

    pub fn from_values(minutes_per_question: f64, accuracy: f64, thresholds: &Thresholds) -> Self {
        let pace = if minutes_per_question < thresholds.rush_minutes
            && accuracy < RUSH_ACCURACY_LIMIT
        {
            Pace::Rushing
        } else {
            Pace::Balanced
        };
        Self {
            pace,
            minutes_per_question,
            accuracy,
        }
    }

    pub fn message(&self) -> String {
        match self.pace {
            Pace::Rushing => format!(
                "In your latest quiz you spent only {:.2} minutes per question and finished quickly, \
                 but your accuracy was {:.0}%. The fast pace may be costing you marks. Slow down a \
                 little and make sure you understand each question before answering, especially \
                 in topics you find challenging.",
                self.minutes_per_question, self.accuracy
            ),
            Pace::Balanced => format!(
                "Your speed and accuracy in the latest quiz look balanced: about {:.2} minutes per \
                 question with {:.0}% accuracy. Keep this approach and adjust your pace to the \
                 complexity of each topic.",
                self.minutes_per_question, self.accuracy
            ),
        }
    }
}
