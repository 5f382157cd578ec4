//! Error types for the exam engine.
//!
//! Session errors are fatal construction failures. Validation errors describe
//! why an exam definition was rejected before it ever reaches a session.

use thiserror::Error;

/// Errors that prevent a session from entering `Running`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The exam definition contained no questions.
    #[error("cannot start an exam with no questions")]
    EmptyExam,

    /// The countdown length does not fit in seconds.
    #[error("timer of {hours}h {minutes}m is too long")]
    TimerOverflow { hours: u64, minutes: u64 },

    /// The exam definition broke a structural invariant.
    #[error("invalid exam definition: {0}")]
    Invalid(#[from] ExamValidationError),
}

/// Structural problems that make an exam definition unusable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExamValidationError {
    /// The definition has no questions at all.
    #[error("exam has no questions")]
    NoQuestions,

    /// A question has an empty option list.
    #[error("question {index} has no options")]
    NoOptions { index: usize },

    /// Two options in the same question share a label.
    #[error("question {index} has duplicate option label {label}")]
    DuplicateLabel { index: usize, label: i64 },

    /// The answer label does not match any option.
    #[error("question {index} answer label {label} matches no option")]
    AnswerNotAmongOptions { index: usize, label: i64 },
}

impl ExamValidationError {
    /// Index of the offending question, if the error is question-specific.
    pub fn question_index(&self) -> Option<usize> {
        match self {
            ExamValidationError::NoQuestions => None,
            ExamValidationError::NoOptions { index }
            | ExamValidationError::DuplicateLabel { index, .. }
            | ExamValidationError::AnswerNotAmongOptions { index, .. } => Some(*index),
        }
    }
}
