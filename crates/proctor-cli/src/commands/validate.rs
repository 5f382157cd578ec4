//! The `proctor validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(exam_path: PathBuf) -> Result<()> {
    let exams = if exam_path.is_dir() {
        proctor_core::parser::load_exam_directory(&exam_path)?
    } else {
        vec![proctor_core::parser::parse_exam(&exam_path)?]
    };

    anyhow::ensure!(
        !exams.is_empty(),
        "no valid exams found in {}",
        exam_path.display()
    );

    let mut total_warnings = 0;

    for exam in &exams {
        println!(
            "Exam: {} ({} questions, topics: {})",
            exam.name,
            exam.questions.len(),
            exam.topics().join(", ")
        );

        let warnings = proctor_core::parser::lint_exam(exam);
        for w in &warnings {
            let prefix = w
                .question_index
                .map(|i| format!("  [question {}]", i + 1))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All exams valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
