//! The `proctor summary` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use proctor_core::config::load_config_from;
use proctor_core::report::format_duration_hms;
use proctor_core::swot::{topic_metrics, SwotThresholds};
use proctor_core::ExamResult;

pub fn execute(
    result_path: PathBuf,
    format: String,
    review: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let result = ExamResult::load_json(&result_path)?;

    match format.as_str() {
        "text" => {
            print_result(&result, &config.swot);
            if review {
                print_review(&result);
            }
        }
        // The markdown rendering always carries the review section.
        "markdown" | "md" => print!("{}", result.to_markdown()),
        other => anyhow::bail!("unknown format '{other}', expected text or markdown"),
    }

    Ok(())
}

/// Print every question with the chosen and correct answers.
pub fn print_review(result: &ExamResult) {
    let mut table = Table::new();
    table.set_header(vec![
        "#",
        "Question",
        "Topic",
        "Your answer",
        "Correct answer",
        "Result",
        "Time",
        "Explanation",
    ]);
    for (i, item) in result.review().iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&item.question),
            Cell::new(&item.topic),
            Cell::new(item.selected.as_deref().unwrap_or("-")),
            Cell::new(&item.correct),
            Cell::new(if item.is_correct { "correct" } else { "wrong" }),
            Cell::new(format_duration_hms(item.time_spent)),
            Cell::new(&item.explanation),
        ]);
    }
    println!("\nReview:\n{table}");
}

/// Print the score line, the per-topic table, and the SWOT lists.
pub fn print_result(result: &ExamResult, thresholds: &SwotThresholds) {
    println!("Exam: {}", result.exam_name);
    println!(
        "Score: {}/{} ({:.1}%), {} unattempted",
        result.correct_answers,
        result.total_questions,
        result.accuracy,
        result.unattempted_count()
    );
    println!("Time: {}", format_duration_hms(result.total_time_taken));

    let metrics = topic_metrics(result, thresholds);
    if !metrics.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            "Topic",
            "Questions",
            "Accuracy",
            "Time/question",
            "Time on topic",
            "SWOT",
        ]);
        for m in &metrics {
            let topic_secs = result.time_per_topic.get(&m.topic).copied().unwrap_or(0);
            table.add_row(vec![
                Cell::new(&m.topic),
                Cell::new(m.questions),
                Cell::new(format!("{:.1}%", m.accuracy_pct)),
                Cell::new(format!("{:.1}s", m.time_per_question)),
                Cell::new(format_duration_hms(topic_secs as f64)),
                Cell::new(m.bucket.map(|b| b.to_string()).unwrap_or_else(|| "-".into())),
            ]);
        }
        println!("\n{table}");
    }

    let sections = [
        ("Strengths", &result.swot.strengths),
        ("Weaknesses", &result.swot.weaknesses),
        ("Opportunities", &result.swot.opportunities),
        ("Threats", &result.swot.threats),
    ];
    for (title, items) in sections {
        if items.is_empty() {
            continue;
        }
        println!("\n{title}:");
        for item in items {
            println!("  - {item}");
        }
    }
}
