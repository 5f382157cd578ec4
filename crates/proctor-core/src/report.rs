//! Result persistence, review, and text rendering.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::ExamResult;

/// Format seconds as `HH:MM:SS`. Negative or non-finite input renders as zero.
pub fn format_duration_hms(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "00:00:00".to_string();
    }
    let total = seconds.floor() as u64;
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

/// One question of a submitted exam, resolved to display text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub question_id: String,
    pub question: String,
    pub topic: String,
    /// Text of the chosen option, `None` when unanswered.
    pub selected: Option<String>,
    pub correct: String,
    pub is_correct: bool,
    pub explanation: String,
    pub time_spent: f64,
}

impl ExamResult {
    /// Save the result as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize result")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write result to {}", path.display()))?;
        Ok(())
    }

    /// Load a result from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read result from {}", path.display()))?;
        let result: ExamResult =
            serde_json::from_str(&content).context("failed to parse result JSON")?;
        Ok(result)
    }

    /// Pair every answer with its question so the attempt can be reviewed.
    pub fn review(&self) -> Vec<ReviewItem> {
        self.original_questions
            .iter()
            .map(|q| {
                let answer = self.answers.iter().find(|a| a.question_id == q.id);
                let selected_label = answer.and_then(|a| a.selected_option_label);
                ReviewItem {
                    question_id: q.id.clone(),
                    question: q.question.question.clone(),
                    topic: q.topic().to_string(),
                    selected: selected_label
                        .and_then(|l| q.question.option(l))
                        .map(|o| o.value.clone()),
                    correct: q
                        .question
                        .correct_option()
                        .map(|o| o.value.clone())
                        .unwrap_or_default(),
                    is_correct: answer.is_some_and(|a| a.is_correct),
                    explanation: q.question.explanation.clone(),
                    time_spent: answer.map(|a| a.time_spent).unwrap_or(0.0),
                }
            })
            .collect()
    }

    /// Format the result as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("## {}\n\n", self.exam_name));
        md.push_str(&format!(
            "**Score:** {}/{} ({:.1}%) in {}\n\n",
            self.correct_answers,
            self.total_questions,
            self.accuracy,
            format_duration_hms(self.total_time_taken)
        ));

        if !self.accuracy_per_topic.is_empty() {
            md.push_str("### Topics\n\n");
            md.push_str("| Topic | Accuracy | Time |\n");
            md.push_str("|-------|----------|------|\n");
            for (topic, acc) in &self.accuracy_per_topic {
                let secs = self.time_per_topic.get(topic).copied().unwrap_or(0);
                md.push_str(&format!(
                    "| {} | {:.1}% | {} |\n",
                    topic,
                    acc * 100.0,
                    format_duration_hms(secs as f64)
                ));
            }
            md.push('\n');
        }

        let sections = [
            ("Strengths", &self.swot.strengths),
            ("Weaknesses", &self.swot.weaknesses),
            ("Opportunities", &self.swot.opportunities),
            ("Threats", &self.swot.threats),
        ];
        for (title, items) in sections {
            if items.is_empty() {
                continue;
            }
            md.push_str(&format!("### {title}\n\n"));
            for item in items {
                md.push_str(&format!("- {item}\n"));
            }
            md.push('\n');
        }

        let review = self.review();
        if !review.is_empty() {
            md.push_str("### Review\n\n");
            for (i, item) in review.iter().enumerate() {
                let verdict = if item.is_correct { "correct" } else { "incorrect" };
                md.push_str(&format!(
                    "{}. **{}** ({}, {})\n",
                    i + 1,
                    item.question,
                    item.topic,
                    verdict
                ));
                md.push_str(&format!(
                    "   - Your answer: {}\n",
                    item.selected.as_deref().unwrap_or("not answered")
                ));
                md.push_str(&format!("   - Correct answer: {}\n", item.correct));
                if !item.explanation.is_empty() {
                    md.push_str(&format!("   - Explanation: {}\n", item.explanation));
                }
            }
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Question, QuestionOption, RuntimeQuestion, SwotAnalysis, UserAnswer};
    use chrono::{DateTime, Utc};
    use std::collections::BTreeMap;

    fn make_result() -> ExamResult {
        let options = vec![
            QuestionOption {
                label: 1,
                value: "Newton".into(),
            },
            QuestionOption {
                label: 2,
                value: "Joule".into(),
            },
        ];
        let q = |id: &str, answer: i64| RuntimeQuestion {
            id: id.into(),
            shuffled_options: options.clone(),
            question: Question {
                question: format!("Question {id}"),
                options: options.clone(),
                answer_label: answer,
                topic: "Mechanics".into(),
                explanation: "Units.".into(),
            },
        };
        ExamResult {
            id: "res-1".into(),
            exam_name: "Physics".into(),
            date: DateTime::<Utc>::UNIX_EPOCH,
            score: 1,
            total_questions: 2,
            correct_answers: 1,
            incorrect_answers: 1,
            accuracy: 50.0,
            total_time_taken: 3725.4,
            time_per_topic: BTreeMap::from([("Mechanics".to_string(), 61)]),
            accuracy_per_topic: BTreeMap::from([("Mechanics".to_string(), 0.5)]),
            swot: SwotAnalysis {
                strengths: vec!["None yet.".into()],
                ..SwotAnalysis::default()
            },
            answers: vec![
                UserAnswer {
                    question_id: "q-0".into(),
                    selected_option_label: Some(1),
                    is_correct: true,
                    time_spent: 20.0,
                },
                UserAnswer {
                    question_id: "q-1".into(),
                    selected_option_label: None,
                    is_correct: false,
                    time_spent: 41.0,
                },
            ],
            original_questions: vec![q("q-0", 1), q("q-1", 2)],
        }
    }

    #[test]
    fn format_hms() {
        assert_eq!(format_duration_hms(0.0), "00:00:00");
        assert_eq!(format_duration_hms(59.9), "00:00:59");
        assert_eq!(format_duration_hms(3725.4), "01:02:05");
        assert_eq!(format_duration_hms(-1.0), "00:00:00");
        assert_eq!(format_duration_hms(f64::NAN), "00:00:00");
    }

    #[test]
    fn json_roundtrip() {
        let result = make_result();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("result.json");

        result.save_json(&path).unwrap();
        let loaded = ExamResult::load_json(&path).unwrap();
        assert_eq!(loaded.id, result.id);
        assert_eq!(loaded.date, result.date);
        assert_eq!(loaded.answers, result.answers);
        assert_eq!(loaded.original_questions, result.original_questions);
        assert_eq!(loaded.swot, result.swot);

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["examName"], "Physics");
        assert_eq!(raw["totalQuestions"], 2);
        assert_eq!(raw["answers"][1]["selectedOptionLabel"], serde_json::Value::Null);
        assert_eq!(raw["originalQuestions"][0]["shuffledOptions"][1]["value"], "Joule");
    }

    #[test]
    fn review_resolves_option_text() {
        let review = make_result().review();
        assert_eq!(review.len(), 2);
        assert_eq!(review[0].selected.as_deref(), Some("Newton"));
        assert!(review[0].is_correct);
        assert_eq!(review[1].selected, None);
        assert_eq!(review[1].correct, "Joule");
        assert_eq!(review[1].time_spent, 41.0);
    }

    #[test]
    fn markdown_output() {
        let md = make_result().to_markdown();
        assert!(md.contains("## Physics"));
        assert!(md.contains("1/2 (50.0%) in 01:02:05"));
        assert!(md.contains("| Mechanics | 50.0% | 00:01:01 |"));
        assert!(md.contains("### Strengths"));
        assert!(!md.contains("### Threats"));
        assert!(md.contains("### Review"));
        assert!(md.contains("1. **Question q-0** (Mechanics, correct)"));
        assert!(md.contains("2. **Question q-1** (Mechanics, incorrect)"));
        assert!(md.contains("   - Your answer: not answered\n   - Correct answer: Joule"));
        assert!(md.contains("   - Explanation: Units."));
    }
}
