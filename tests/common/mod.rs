#![allow(dead_code)]

use serde_json::{Value, json};
use std::path::{Path, PathBuf};

/// One historical record in the shape the quiz API returns.
pub fn attempt_json(id: u64, topic: &str, accuracy: &str, score: &str, day: u32, minutes: u32) -> Value {
    json!({
        "id": id,
        "quiz": { "topic": topic },
        "accuracy": accuracy,
        "final_score": score,
        "correct_answers": 6,
        "incorrect_answers": 4,
        "submitted_at": format!("2025-01-{:02}T10:{:02}:30.000+05:30", day, minutes),
        "started_at": format!("2025-01-{:02}T10:00:00.000+05:30", day),
        "ended_at": format!("2025-01-{:02}T10:{:02}:00.000+05:30", day, minutes),
    })
}

/// Optics 30%, Genetics 50%, Ecology 90%, submitted in that order.
pub fn three_topic_history() -> Value {
    json!([
        attempt_json(101, " Optics ", "30 %", "12.0", 1, 5),
        attempt_json(102, "Genetics", "50 %", "20.0", 2, 10),
        attempt_json(103, "Ecology", "90 %", "36.0", 3, 15),
    ])
}

/// Ten questions answered in 60 seconds at 45% accuracy.
pub fn rushed_current_submission() -> Value {
    json!({
        "id": 200,
        "quiz": { "topic": "Genetics" },
        "accuracy": "45 %",
        "final_score": "18.0",
        "correct_answers": 4,
        "incorrect_answers": 6,
        "total_questions": 10,
        "submitted_at": "2025-01-20T09:01:05.000+05:30",
        "started_at": "2025-01-20T09:00:00.000+05:30",
        "ended_at": "2025-01-20T09:01:00.000+05:30",
    })
}

pub fn metadata() -> Value {
    json!({ "title": "Biology practice", "questions_count": 10 })
}

/// Write the three documents into `dir` and return their paths.
pub fn write_fixtures(dir: &Path, historical: &Value, current: &Value) -> (PathBuf, PathBuf, PathBuf) {
    let historical_path = dir.join("historical.json");
    let current_path = dir.join("current.json");
    let metadata_path = dir.join("metadata.json");
    std::fs::write(&historical_path, historical.to_string()).unwrap();
    std::fs::write(&current_path, current.to_string()).unwrap();
    std::fs::write(&metadata_path, metadata().to_string()).unwrap();
    (historical_path, current_path, metadata_path)
}
