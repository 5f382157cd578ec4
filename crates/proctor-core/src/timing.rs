//! Time attribution for questions and topics.
//!
//! Two independent measures live here:
//! - per-question seconds, accumulated from precise wall-clock deltas
//!   whenever the active question is about to change;
//! - per-topic seconds, bumped by one on every countdown tick.
//!
//! They are not reconciled with each other or with the session's total
//! wall-clock duration.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

/// Accumulated viewing time per question and per topic.
#[derive(Debug, Clone)]
pub struct TimeLedger {
    question_seconds: HashMap<String, f64>,
    topic_seconds: BTreeMap<String, u64>,
    active_since: DateTime<Utc>,
}

impl TimeLedger {
    /// Create a ledger with every topic pre-seeded at zero.
    pub fn new<'a>(topics: impl IntoIterator<Item = &'a str>, now: DateTime<Utc>) -> Self {
        Self {
            question_seconds: HashMap::new(),
            topic_seconds: topics.into_iter().map(|t| (t.to_string(), 0)).collect(),
            active_since: now,
        }
    }

    /// Attribute the time since the last attribution point to `question_id`
    /// and restart attribution at `now`. Returns the seconds added.
    pub fn record_elapsed_for_active_question(
        &mut self,
        question_id: &str,
        now: DateTime<Utc>,
    ) -> f64 {
        let elapsed = (now - self.active_since).num_milliseconds().max(0) as f64 / 1000.0;
        *self
            .question_seconds
            .entry(question_id.to_string())
            .or_insert(0.0) += elapsed;
        self.active_since = now;
        elapsed
    }

    /// Add one tick (one second) to `topic`.
    pub fn tick_topic(&mut self, topic: &str) {
        *self.topic_seconds.entry(topic.to_string()).or_insert(0) += 1;
    }

    /// Seconds recorded so far for a question (0 if never recorded).
    pub fn question_seconds(&self, question_id: &str) -> f64 {
        self.question_seconds.get(question_id).copied().unwrap_or(0.0)
    }

    /// Seconds recorded so far for a topic (0 if unknown).
    pub fn topic_seconds(&self, topic: &str) -> u64 {
        self.topic_seconds.get(topic).copied().unwrap_or(0)
    }

    pub fn question_times(&self) -> &HashMap<String, f64> {
        &self.question_seconds
    }

    pub fn topic_times(&self) -> &BTreeMap<String, u64> {
        &self.topic_seconds
    }

    /// When the active question became active.
    pub fn active_since(&self) -> DateTime<Utc> {
        self.active_since
    }
}
