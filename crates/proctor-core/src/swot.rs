//! SWOT classification of per-topic performance.
//!
//! Each topic is compared against the session averages: accuracy against the
//! overall accuracy, time per question against total time over question
//! count. The first matching rule wins; a topic may match none.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{ExamResult, SwotAnalysis};

pub const DEFAULT_STRENGTH: &str =
    "No standout strengths identified. Focus on overall improvement.";
pub const DEFAULT_WEAKNESS: &str =
    "No major weaknesses identified. Continue to practice consistently.";
pub const DEFAULT_OPPORTUNITY: &str =
    "Keep practicing all topics to improve speed and maintain accuracy.";
pub const DEFAULT_THREAT: &str =
    "Be mindful of careless errors and avoid guessing. Review questions you are unsure about.";

/// Margins used to decide whether a topic stands out from the average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwotThresholds {
    /// Percentage points above average accuracy to count as accurate.
    #[serde(default = "default_accurate_margin")]
    pub accurate_margin_pct: f64,
    /// Percentage points below average accuracy to count as inaccurate.
    #[serde(default = "default_inaccurate_margin")]
    pub inaccurate_margin_pct: f64,
    /// Seconds per question below average to count as fast.
    #[serde(default = "default_fast_margin")]
    pub fast_margin_secs: f64,
    /// Seconds per question above average to count as slow.
    #[serde(default = "default_slow_margin")]
    pub slow_margin_secs: f64,
}

fn default_accurate_margin() -> f64 {
    5.0
}
fn default_inaccurate_margin() -> f64 {
    10.0
}
fn default_fast_margin() -> f64 {
    5.0
}
fn default_slow_margin() -> f64 {
    10.0
}

impl Default for SwotThresholds {
    fn default() -> Self {
        Self {
            accurate_margin_pct: default_accurate_margin(),
            inaccurate_margin_pct: default_inaccurate_margin(),
            fast_margin_secs: default_fast_margin(),
            slow_margin_secs: default_slow_margin(),
        }
    }
}

/// The four SWOT categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwotBucket {
    Strength,
    Weakness,
    Opportunity,
    Threat,
}

impl fmt::Display for SwotBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwotBucket::Strength => write!(f, "strength"),
            SwotBucket::Weakness => write!(f, "weakness"),
            SwotBucket::Opportunity => write!(f, "opportunity"),
            SwotBucket::Threat => write!(f, "threat"),
        }
    }
}

/// Derived numbers for one topic, relative to the session averages.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicMetrics {
    pub topic: String,
    pub questions: usize,
    pub accuracy_pct: f64,
    pub time_per_question: f64,
    pub bucket: Option<SwotBucket>,
}

impl TopicMetrics {
    /// The observation text for this topic, if it was classified.
    pub fn message(&self) -> Option<String> {
        let topic = &self.topic;
        self.bucket.map(|bucket| match bucket {
            SwotBucket::Strength => format!("{topic}: High accuracy with excellent speed."),
            SwotBucket::Opportunity => {
                format!("{topic}: Good accuracy, but speed can be improved.")
            }
            SwotBucket::Weakness => format!(
                "{topic}: Low accuracy and slow speed indicate a need for fundamental review."
            ),
            SwotBucket::Threat => format!(
                "{topic}: Low accuracy with fast speed might suggest guessing or careless errors."
            ),
        })
    }
}

/// Apply the first-match rules to one topic.
fn bucket_for(
    accuracy_pct: f64,
    time_per_question: f64,
    avg_accuracy_pct: f64,
    avg_time_per_question: f64,
    t: &SwotThresholds,
) -> Option<SwotBucket> {
    let is_accurate = accuracy_pct > avg_accuracy_pct + t.accurate_margin_pct;
    let is_inaccurate = accuracy_pct < avg_accuracy_pct - t.inaccurate_margin_pct;
    let is_fast = time_per_question < avg_time_per_question - t.fast_margin_secs;
    let is_slow = time_per_question > avg_time_per_question + t.slow_margin_secs;

    if is_accurate && is_fast {
        Some(SwotBucket::Strength)
    } else if is_accurate {
        Some(SwotBucket::Opportunity)
    } else if is_inaccurate && is_slow {
        Some(SwotBucket::Weakness)
    } else if is_inaccurate {
        Some(SwotBucket::Threat)
    } else {
        None
    }
}

/// Compute per-topic metrics and their bucket, in topic order.
pub fn topic_metrics(result: &ExamResult, thresholds: &SwotThresholds) -> Vec<TopicMetrics> {
    let avg_accuracy_pct = result.accuracy;
    let avg_time_per_question = if result.total_questions > 0 {
        result.total_time_taken / result.total_questions as f64
    } else {
        0.0
    };

    result
        .time_per_topic
        .iter()
        .map(|(topic, &topic_secs)| {
            let accuracy_pct = result.accuracy_per_topic.get(topic).copied().unwrap_or(0.0) * 100.0;
            let questions = result.questions_in_topic(topic);
            let time_per_question = if questions > 0 {
                topic_secs as f64 / questions as f64
            } else {
                0.0
            };
            TopicMetrics {
                topic: topic.clone(),
                questions,
                accuracy_pct,
                time_per_question,
                bucket: bucket_for(
                    accuracy_pct,
                    time_per_question,
                    avg_accuracy_pct,
                    avg_time_per_question,
                    thresholds,
                ),
            }
        })
        .collect()
}

/// Build the SWOT analysis for a scored result.
///
/// Every list is non-empty unless the result has no topics at all, in which
/// case all four are empty.
pub fn classify(result: &ExamResult, thresholds: &SwotThresholds) -> SwotAnalysis {
    let mut swot = SwotAnalysis::default();
    if result.time_per_topic.is_empty() {
        return swot;
    }

    for metrics in topic_metrics(result, thresholds) {
        let (Some(bucket), Some(message)) = (metrics.bucket, metrics.message()) else {
            continue;
        };
        match bucket {
            SwotBucket::Strength => swot.strengths.push(message),
            SwotBucket::Weakness => swot.weaknesses.push(message),
            SwotBucket::Opportunity => swot.opportunities.push(message),
            SwotBucket::Threat => swot.threats.push(message),
        }
    }

    for (list, default) in [
        (&mut swot.strengths, DEFAULT_STRENGTH),
        (&mut swot.weaknesses, DEFAULT_WEAKNESS),
        (&mut swot.opportunities, DEFAULT_OPPORTUNITY),
        (&mut swot.threats, DEFAULT_THREAT),
    ] {
        if list.is_empty() {
            list.push(default.to_string());
        }
    }

    swot
}
