use crate::config::Thresholds;

const MASTER_ACCURACY: f64 = 85.0;
const ACCURACY_SEEKER_ACCURACY: f64 = 80.0;
const COMPETENT_ACCURACY: f64 = 60.0;
const TOPIC_GAP: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persona {
    MasterAchiever,
    SpeedFocusedLearner,
    AccuracySeeker,
    TopicVariedPerformer,
    NeedsSupportLearner,
    InconsistentAchiever,
}

/// The numbers the persona rules look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersonaSignals {
    /// Unweighted mean of per-topic average accuracy.
    pub overall_accuracy: f64,
    /// Pace of the current submission.
    pub minutes_per_question: f64,
    /// Best topic average minus worst topic average.
    pub performance_gap: f64,
}

impl Persona {
    /// Evaluate the rules top-down; the first one that holds decides.
    pub fn classify(signals: &PersonaSignals, thresholds: &Thresholds) -> Self {
        let overall = signals.overall_accuracy;
        let pace = signals.minutes_per_question;

        if overall >= MASTER_ACCURACY {
            Persona::MasterAchiever
        } else if pace < thresholds.fast_minutes && overall >= COMPETENT_ACCURACY {
            Persona::SpeedFocusedLearner
        } else if pace > thresholds.slow_minutes && overall >= ACCURACY_SEEKER_ACCURACY {
            Persona::AccuracySeeker
        } else if signals.performance_gap >= TOPIC_GAP && overall >= COMPETENT_ACCURACY {
            Persona::TopicVariedPerformer
        } else if overall < COMPETENT_ACCURACY {
            Persona::NeedsSupportLearner
        } else {
            Persona::InconsistentAchiever
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Persona::MasterAchiever => "Master Achiever",
            Persona::SpeedFocusedLearner => "Speed Focused Learner",
            Persona::AccuracySeeker => "Accuracy Seeker",
            Persona::TopicVariedPerformer => "Topic Varied Performer",
            Persona::NeedsSupportLearner => "Needs Support Learner",
            Persona::InconsistentAchiever => "Inconsistent Achiever",
        }
    }

    pub fn profile(self, strong_areas: &[String], weak_areas: &[String]) -> PersonaProfile {
        let (strengths, weaknesses) = match self {
            Persona::MasterAchiever => (
                "Mastery Domains: Excels across a wide range of topics.".to_string(),
                "Refinement Areas: Minor areas for improvement to reach complete mastery."
                    .to_string(),
            ),
            Persona::SpeedFocusedLearner => (
                "Swift Solver: Excellent quiz completion speed; excels under time pressure."
                    .to_string(),
                "Accuracy Boost Needed: Can enhance scores by focusing on accuracy and careful review."
                    .to_string(),
            ),
            Persona::AccuracySeeker => (
                "Precision Pro: Prioritizes accuracy and demonstrates strong conceptual understanding."
                    .to_string(),
                "Pace Optimization: Could benefit from slightly increasing speed without sacrificing accuracy."
                    .to_string(),
            ),
            Persona::TopicVariedPerformer => (
                format!(
                    "Topic Strengths: Demonstrates strong grasp in specific topics like {}",
                    strong_areas.join(", ")
                ),
                format!(
                    "Topic Gaps: Needs to bridge performance gaps in topics like {}",
                    weak_areas.join(", ")
                ),
            ),
            Persona::NeedsSupportLearner => (
                "Developing Potential: Showing effort and engagement through quiz participation."
                    .to_string(),
                "Foundational Focus Required: Needs to strengthen foundational concepts across key topics."
                    .to_string(),
            ),
            Persona::InconsistentAchiever => (
                "Variable Strengths: Shows potential in some topics, but performance varies."
                    .to_string(),
                "Inconsistent Performance: Needs to stabilize performance across all topics."
                    .to_string(),
            ),
        };
        PersonaProfile {
            persona: self,
            strengths,
            weaknesses,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonaProfile {
    pub persona: Persona,
    pub strengths: String,
    pub weaknesses: String,
}
