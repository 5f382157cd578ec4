//! Core data model types for proctor.
//!
//! Exam definitions come in from outside; runtime questions and results are
//! produced by a session. Results serialize to flat camelCase JSON so any
//! persistence or display collaborator can consume them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One selectable answer of a question.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionOption {
    /// Label unique within the owning question.
    pub label: i64,
    /// Display text.
    pub value: String,
}

/// A multiple-choice question as supplied by an exam definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// The question text.
    pub question: String,
    /// Options in authoring order.
    pub options: Vec<QuestionOption>,
    /// Label of the single correct option.
    pub answer_label: i64,
    /// Free-text topic tag used for aggregate reporting.
    pub topic: String,
    /// Explanation shown when reviewing a result.
    #[serde(default)]
    pub explanation: String,
}

impl Question {
    /// Look up an option by label.
    pub fn option(&self, label: i64) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.label == label)
    }

    /// The option whose label equals `answer_label`.
    pub fn correct_option(&self) -> Option<&QuestionOption> {
        self.option(self.answer_label)
    }
}

/// A named, ordered list of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamDefinition {
    /// Exam name carried into the result.
    pub name: String,
    /// The questions, in authoring order.
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl ExamDefinition {
    /// Distinct topics in order of first appearance.
    pub fn topics(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for q in &self.questions {
            if !seen.contains(&q.topic.as_str()) {
                seen.push(q.topic.as_str());
            }
        }
        seen
    }
}

/// A question bound to a session: stable id plus randomized option order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeQuestion {
    /// Session-unique identifier, stable for the life of the session.
    pub id: String,
    #[serde(flatten)]
    pub question: Question,
    /// Options in the order they are presented.
    pub shuffled_options: Vec<QuestionOption>,
}

impl RuntimeQuestion {
    pub fn topic(&self) -> &str {
        &self.question.topic
    }

    pub fn answer_label(&self) -> i64 {
        self.question.answer_label
    }

    /// Whether `label` belongs to one of this question's options.
    pub fn has_option(&self, label: i64) -> bool {
        self.question.option(label).is_some()
    }
}

/// The graded answer for one runtime question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnswer {
    pub question_id: String,
    /// `None` when the question was left unanswered.
    pub selected_option_label: Option<i64>,
    pub is_correct: bool,
    /// Seconds spent viewing the question.
    pub time_spent: f64,
}

/// Strengths, weaknesses, opportunities, and threats keyed by topic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwotAnalysis {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
    pub threats: Vec<String>,
}

impl SwotAnalysis {
    /// True when all four lists are empty.
    pub fn is_empty(&self) -> bool {
        self.strengths.is_empty()
            && self.weaknesses.is_empty()
            && self.opportunities.is_empty()
            && self.threats.is_empty()
    }
}

/// The terminal, immutable outcome of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamResult {
    /// Unique result identifier.
    pub id: String,
    pub exam_name: String,
    /// When the exam was submitted.
    pub date: DateTime<Utc>,
    /// Number of correct answers.
    pub score: usize,
    pub total_questions: usize,
    pub correct_answers: usize,
    pub incorrect_answers: usize,
    /// Overall accuracy as a percentage (0-100).
    pub accuracy: f64,
    /// Wall-clock seconds between session start and submission.
    pub total_time_taken: f64,
    /// Tick-accumulated seconds per topic.
    pub time_per_topic: BTreeMap<String, u64>,
    /// Fraction (0.0-1.0) of correct answers per topic.
    pub accuracy_per_topic: BTreeMap<String, f64>,
    pub swot: SwotAnalysis,
    pub answers: Vec<UserAnswer>,
    /// The questions as they were presented, for later review.
    pub original_questions: Vec<RuntimeQuestion>,
}

impl ExamResult {
    /// Number of runtime questions tagged with `topic`.
    pub fn questions_in_topic(&self, topic: &str) -> usize {
        self.original_questions
            .iter()
            .filter(|q| q.topic() == topic)
            .count()
    }

    /// Questions left without a selection.
    pub fn unattempted_count(&self) -> usize {
        self.answers
            .iter()
            .filter(|a| a.selected_option_label.is_none())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_question() -> Question {
        Question {
            question: "2 + 2?".into(),
            options: vec![
                QuestionOption {
                    label: 1,
                    value: "3".into(),
                },
                QuestionOption {
                    label: 2,
                    value: "4".into(),
                },
            ],
            answer_label: 2,
            topic: "Math".into(),
            explanation: "Basic addition.".into(),
        }
    }

    #[test]
    fn correct_option_lookup() {
        let q = sample_question();
        assert_eq!(q.correct_option().map(|o| o.value.as_str()), Some("4"));
        assert!(q.option(9).is_none());
    }

    #[test]
    fn topics_in_first_appearance_order() {
        let mut physics = sample_question();
        physics.topic = "Physics".into();
        let exam = ExamDefinition {
            name: "Mixed".into(),
            questions: vec![physics, sample_question(), sample_question()],
        };
        assert_eq!(exam.topics(), vec!["Physics", "Math"]);
    }

    #[test]
    fn runtime_question_serializes_flat() {
        let q = sample_question();
        let rq = RuntimeQuestion {
            id: "q-0".into(),
            shuffled_options: q.options.iter().rev().cloned().collect(),
            question: q,
        };
        let json = serde_json::to_value(&rq).unwrap();
        assert_eq!(json["id"], "q-0");
        assert_eq!(json["answer_label"], 2);
        assert_eq!(json["topic"], "Math");
        assert_eq!(json["shuffledOptions"][0]["label"], 2);
    }

    #[test]
    fn unattempted_counts_missing_selections() {
        let answer = |label: Option<i64>| UserAnswer {
            question_id: "q".into(),
            selected_option_label: label,
            is_correct: false,
            time_spent: 0.0,
        };
        let result = ExamResult {
            id: "res-1".into(),
            exam_name: "Math".into(),
            date: DateTime::<Utc>::UNIX_EPOCH,
            score: 0,
            total_questions: 3,
            correct_answers: 0,
            incorrect_answers: 3,
            accuracy: 0.0,
            total_time_taken: 0.0,
            time_per_topic: BTreeMap::new(),
            accuracy_per_topic: BTreeMap::new(),
            swot: SwotAnalysis::default(),
            answers: vec![answer(Some(1)), answer(None), answer(None)],
            original_questions: vec![],
        };
        assert_eq!(result.unattempted_count(), 2);
    }

    #[test]
    fn question_without_explanation_parses() {
        let json = r#"{
            "question": "Capital of France?",
            "options": [{"label": 1, "value": "Paris"}],
            "answer_label": 1,
            "topic": "Geography"
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert!(q.explanation.is_empty());
    }
}
