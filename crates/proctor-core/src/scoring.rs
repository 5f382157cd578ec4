//! Scoring of a submitted exam.
//!
//! Turns raw answers and timing data into an `ExamResult`. The SWOT analysis
//! is left empty here and filled in by [`crate::swot::classify`].

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::model::{ExamResult, RuntimeQuestion, SwotAnalysis, UserAnswer};

/// Everything the scorer needs from a finished session.
#[derive(Debug, Clone, Copy)]
pub struct ScoringInput<'a> {
    pub exam_name: &'a str,
    pub questions: &'a [RuntimeQuestion],
    /// Question id → selected label. Missing ids are unanswered.
    pub answers: &'a HashMap<String, i64>,
    /// Question id → seconds spent viewing it.
    pub question_times: &'a HashMap<String, f64>,
    /// Topic → tick-accumulated seconds.
    pub topic_times: &'a BTreeMap<String, u64>,
    pub started_at: DateTime<Utc>,
    pub submitted_at: DateTime<Utc>,
}

/// Overall accuracy as a percentage; 0 when there are no questions.
pub fn accuracy_percent(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    correct as f64 / total as f64 * 100.0
}

/// Grade every question and aggregate per topic.
pub fn score(input: &ScoringInput<'_>) -> ExamResult {
    let answers: Vec<UserAnswer> = input
        .questions
        .iter()
        .map(|q| {
            let selected = input.answers.get(&q.id).copied();
            UserAnswer {
                question_id: q.id.clone(),
                selected_option_label: selected,
                is_correct: selected == Some(q.answer_label()),
                time_spent: input.question_times.get(&q.id).copied().unwrap_or(0.0),
            }
        })
        .collect();

    let total = input.questions.len();
    let correct = answers.iter().filter(|a| a.is_correct).count();

    // (correct, total) per topic, counted by runtime question
    let mut per_topic: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for (q, a) in input.questions.iter().zip(&answers) {
        let entry = per_topic.entry(q.topic()).or_insert((0, 0));
        entry.1 += 1;
        if a.is_correct {
            entry.0 += 1;
        }
    }

    let accuracy_per_topic = per_topic
        .iter()
        .map(|(topic, &(c, n))| {
            let acc = if n > 0 { c as f64 / n as f64 } else { 0.0 };
            (topic.to_string(), acc)
        })
        .collect();

    let time_per_topic = per_topic
        .keys()
        .map(|topic| {
            let secs = input.topic_times.get(*topic).copied().unwrap_or(0);
            (topic.to_string(), secs)
        })
        .collect();

    let total_time_taken =
        (input.submitted_at - input.started_at).num_milliseconds().max(0) as f64 / 1000.0;

    ExamResult {
        id: format!("res-{}", Uuid::new_v4()),
        exam_name: input.exam_name.to_string(),
        date: input.submitted_at,
        score: correct,
        total_questions: total,
        correct_answers: correct,
        incorrect_answers: total - correct,
        accuracy: accuracy_percent(correct, total),
        total_time_taken,
        time_per_topic,
        accuracy_per_topic,
        swot: SwotAnalysis::default(),
        answers,
        original_questions: input.questions.to_vec(),
    }
}
