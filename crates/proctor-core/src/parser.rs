//! JSON exam definition loader.
//!
//! Loads exam definitions from JSON files and directories, rejects
//! structurally broken ones, and lints the rest for common authoring issues.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::ExamValidationError;
use crate::model::{ExamDefinition, Question};

/// Accepted on-disk shapes: a full definition, or a bare question array
/// whose exam name is taken from the file stem.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExamFile {
    Definition(ExamDefinition),
    Questions(Vec<Question>),
}

/// Parse a single JSON file into an `ExamDefinition`.
pub fn parse_exam(path: &Path) -> Result<ExamDefinition> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read exam file: {}", path.display()))?;

    parse_exam_str(&content, path)
}

/// Parse a JSON string into a validated `ExamDefinition`.
pub fn parse_exam_str(content: &str, source_path: &Path) -> Result<ExamDefinition> {
    let parsed: ExamFile = serde_json::from_str(content)
        .with_context(|| format!("failed to parse exam JSON: {}", source_path.display()))?;

    let exam = match parsed {
        ExamFile::Definition(def) => def,
        ExamFile::Questions(questions) => ExamDefinition {
            name: exam_name_from_path(source_path),
            questions,
        },
    };

    validate_exam_definition(&exam)
        .with_context(|| format!("invalid exam: {}", source_path.display()))?;

    Ok(exam)
}

fn exam_name_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Untitled exam".to_string())
}

/// Recursively load all `.json` exam files from a directory.
///
/// Files that fail to parse or validate are skipped with a warning.
pub fn load_exam_directory(dir: &Path) -> Result<Vec<ExamDefinition>> {
    let mut exams = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            exams.extend(load_exam_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "json") {
            match parse_exam(&path) {
                Ok(exam) => exams.push(exam),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(exams)
}

/// Check the structural invariants a session relies on.
///
/// Every question needs at least one option, unique option labels, and an
/// answer label that matches exactly one option.
pub fn validate_exam_definition(exam: &ExamDefinition) -> Result<(), ExamValidationError> {
    if exam.questions.is_empty() {
        return Err(ExamValidationError::NoQuestions);
    }

    for (index, q) in exam.questions.iter().enumerate() {
        if q.options.is_empty() {
            return Err(ExamValidationError::NoOptions { index });
        }
        let mut labels = HashSet::new();
        for option in &q.options {
            if !labels.insert(option.label) {
                return Err(ExamValidationError::DuplicateLabel {
                    index,
                    label: option.label,
                });
            }
        }
        if !labels.contains(&q.answer_label) {
            return Err(ExamValidationError::AnswerNotAmongOptions {
                index,
                label: q.answer_label,
            });
        }
    }

    Ok(())
}

/// A non-fatal lint finding.
#[derive(Debug, Clone)]
pub struct LintWarning {
    /// The question index (if applicable).
    pub question_index: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Lint an exam definition for authoring issues that do not block a session.
pub fn lint_exam(exam: &ExamDefinition) -> Vec<LintWarning> {
    let mut warnings = Vec::new();

    if exam.name.trim().is_empty() {
        warnings.push(LintWarning {
            question_index: None,
            message: "exam name is empty".into(),
        });
    }

    for (index, q) in exam.questions.iter().enumerate() {
        if q.question.trim().is_empty() {
            warnings.push(LintWarning {
                question_index: Some(index),
                message: "question text is empty".into(),
            });
        }
        if q.topic.trim().is_empty() {
            warnings.push(LintWarning {
                question_index: Some(index),
                message: "topic is blank".into(),
            });
        }
        if q.explanation.trim().is_empty() {
            warnings.push(LintWarning {
                question_index: Some(index),
                message: "explanation is empty".into(),
            });
        }
        if q.options.len() == 1 {
            warnings.push(LintWarning {
                question_index: Some(index),
                message: "only one option".into(),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_JSON: &str = r#"{
  "name": "Physics Midterm",
  "questions": [
    {
      "question": "Unit of force?",
      "options": [
        {"label": 1, "value": "Newton"},
        {"label": 2, "value": "Joule"},
        {"label": 3, "value": "Watt"}
      ],
      "answer_label": 1,
      "topic": "Mechanics",
      "explanation": "F = ma is measured in newtons."
    },
    {
      "question": "Speed of light in vacuum (approx.)?",
      "options": [
        {"label": 1, "value": "3e8 m/s"},
        {"label": 2, "value": "3e6 m/s"}
      ],
      "answer_label": 1,
      "topic": "Optics",
      "explanation": "About 299,792 km/s."
    }
  ]
}"#;

    #[test]
    fn parse_valid_definition() {
        let exam = parse_exam_str(VALID_JSON, &PathBuf::from("midterm.json")).unwrap();
        assert_eq!(exam.name, "Physics Midterm");
        assert_eq!(exam.questions.len(), 2);
        assert_eq!(exam.questions[0].options.len(), 3);
        assert_eq!(exam.topics(), vec!["Mechanics", "Optics"]);
        assert!(lint_exam(&exam).is_empty());
    }

    #[test]
    fn parse_bare_question_array_names_exam_after_file() {
        let json = r#"[
            {"question": "1+1?", "options": [{"label": 1, "value": "2"}, {"label": 2, "value": "3"}],
             "answer_label": 1, "topic": "Arithmetic", "explanation": "Count."}
        ]"#;
        let exam = parse_exam_str(json, &PathBuf::from("exams/warmup.json")).unwrap();
        assert_eq!(exam.name, "warmup");
        assert_eq!(exam.questions.len(), 1);
    }

    #[test]
    fn reject_answer_not_among_options() {
        let json = r#"{"name": "Bad", "questions": [
            {"question": "?", "options": [{"label": 1, "value": "a"}],
             "answer_label": 7, "topic": "T", "explanation": ""}
        ]}"#;
        let err = parse_exam_str(json, &PathBuf::from("bad.json")).unwrap_err();
        let cause = err.downcast_ref::<ExamValidationError>();
        assert_eq!(
            cause,
            Some(&ExamValidationError::AnswerNotAmongOptions { index: 0, label: 7 })
        );
    }

    #[test]
    fn reject_empty_and_duplicate_labels() {
        let empty = ExamDefinition {
            name: "Empty".into(),
            questions: vec![],
        };
        assert_eq!(
            validate_exam_definition(&empty),
            Err(ExamValidationError::NoQuestions)
        );

        let json = r#"{"name": "Dupes", "questions": [
            {"question": "?", "options": [{"label": 1, "value": "a"}, {"label": 1, "value": "b"}],
             "answer_label": 1, "topic": "T", "explanation": ""}
        ]}"#;
        let err = parse_exam_str(json, &PathBuf::from("dupes.json")).unwrap_err();
        assert!(format!("{err:#}").contains("duplicate option label 1"));
    }

    #[test]
    fn reject_question_without_options() {
        let json = r#"{"name": "NoOpts", "questions": [
            {"question": "?", "options": [], "answer_label": 1, "topic": "T", "explanation": ""}
        ]}"#;
        assert!(parse_exam_str(json, &PathBuf::from("no-opts.json")).is_err());
    }

    #[test]
    fn parse_malformed_json() {
        let bad = "{ this is not json";
        assert!(parse_exam_str(bad, &PathBuf::from("bad.json")).is_err());
    }

    #[test]
    fn lint_reports_authoring_issues() {
        let json = r#"{"name": " ", "questions": [
            {"question": "", "options": [{"label": 1, "value": "a"}],
             "answer_label": 1, "topic": "", "explanation": ""}
        ]}"#;
        let exam = parse_exam_str(json, &PathBuf::from("lint.json")).unwrap();
        let warnings = lint_exam(&exam);
        assert!(warnings.iter().any(|w| w.message == "exam name is empty"));
        assert!(warnings
            .iter()
            .any(|w| w.question_index == Some(0) && w.message.contains("explanation")));
        assert!(warnings.iter().any(|w| w.message == "only one option"));
    }

    #[test]
    fn load_directory_skips_invalid_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("midterm.json"), VALID_JSON).unwrap();
        std::fs::write(dir.path().join("broken.json"), "not json").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let exams = load_exam_directory(dir.path()).unwrap();
        assert_eq!(exams.len(), 1);
        assert_eq!(exams[0].name, "Physics Midterm");
    }
}
