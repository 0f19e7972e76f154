use crate::insights::Insights;
use crate::time_format::format_minutes;
use serde_json::{Map, Value};

const RESPONSE_INSTRUCTIONS: &str = r#"**Instructions for Response:**

1.  Provide overall encouraging and constructive feedback in a paragraph format, incorporating insights about speed vs. accuracy, time spent per question, and difficulty level recommendations where relevant.
2.  For each of the Weakness Topics, suggest:
        - 2-3 specific and actionable study steps.
        - Identify 1-2 potential sub-concepts within the topic where the student might be struggling (if inferable from the topic name).
        - Suggest 1 type of practice question that would be beneficial (e.g., conceptual questions, application-based questions, diagram labeling).
        - Suggest 1 type of learning resource that could be helpful (e.g., video lecture, online article, interactive simulation).
3.  Include 2-3 general study recommendations applicable to all topics, potentially addressing time management if the speed vs. accuracy analysis suggests rushing.
4.  Structure your entire response as a JSON object with the following keys:
    -   "feedback": (string) Overall feedback paragraph
    -   "recommendations": (array of objects) - Each object represents a weak topic with "topic" (string - topic name) and "actions" (array of strings - study actions) keys.
    -   "general_recommendations": (array of strings) - General study recommendations.

**Example JSON Response Structure:**
{
  "feedback": "...",
  "recommendations": [
    {
      "topic": "Weak Topic 1 Name",
      "actions": ["Action 1", "Action 2"]
    }
  ],
  "general_recommendations": ["General recommendation 1", "General recommendation 2"]
}"#;

/// Topic to difficulty level, as sent to the model. Keys keep the
/// weakest-first order of the recommendations.
pub fn difficulty_map(insights: &Insights) -> Value {
    let map: Map<String, Value> = insights
        .difficulty
        .iter()
        .map(|rec| (rec.topic.clone(), Value::from(rec.level.as_str())))
        .collect();
    Value::Object(map)
}

/// Build the single prompt sent to the feedback service.
pub fn build_prompt(insights: &Insights) -> String {
    format!(
        "Generate personalized feedback and specific study recommendations for a student based on their quiz performance.\n\
         \n\
         **Student's Strengths (Topics):** {strengths}\n\
         **Student's Weaknesses (Topics):** {weaknesses}\n\
         **Performance Trend:** {trend}\n\
         **Difficulty Level Recommendations (for Weak Topics):** {difficulty}\n\
         **Speed vs. Accuracy Insight:** {speed}\n\
         **Average time spent per question in latest quiz:** {pace}\n\
         \n\
         {instructions}\n",
        strengths = insights.strong_areas.join(", "),
        weaknesses = insights.weak_areas.join(", "),
        trend = insights.accuracy_trend.message(),
        difficulty = difficulty_map(insights),
        speed = insights.speed.message(),
        pace = format_minutes(insights.time_per_question_minutes),
        instructions = RESPONSE_INSTRUCTIONS,
    )
}
