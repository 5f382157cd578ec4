//! proctor-core: exam session engine, scoring, and SWOT analysis.
//!
//! This crate defines the exam data model, the timer-driven session state
//! machine, and the scoring logic that the proctor CLI builds on.

pub mod clock;
pub mod config;
pub mod driver;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod scoring;
pub mod session;
pub mod shuffle;
pub mod swot;
pub mod timing;
pub mod traits;

pub use error::{ExamValidationError, SessionError};
pub use model::{ExamDefinition, ExamResult, Question, QuestionOption, RuntimeQuestion};
pub use session::{ExamSession, SessionEvent, SessionPhase};
