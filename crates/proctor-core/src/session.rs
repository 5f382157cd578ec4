//! The exam session state machine.
//!
//! A session is created from an exam definition, runs until it is submitted
//! (by the user or by the countdown reaching zero), and then becomes inert.
//! All mutation goes through the transition methods, which process one event
//! to completion and report what happened as a [`SessionEvent`].
//!
//! The countdown is driven from outside: something calls [`ExamSession::tick`]
//! once per second. The session never owns a timer of its own.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::error::{ExamValidationError, SessionError};
use crate::model::{ExamDefinition, ExamResult, RuntimeQuestion};
use crate::parser::validate_exam_definition;
use crate::scoring::{score, ScoringInput};
use crate::shuffle::shuffled;
use crate::swot::{classify, SwotThresholds};
use crate::timing::TimeLedger;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Accepting answers, navigation, and ticks.
    Running,
    /// A submit request is waiting for the user to confirm or cancel.
    AwaitingConfirmation,
    /// Terminal. The result has been produced.
    Submitted,
}

/// Why a session was submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitReason {
    /// Submit requested with every question answered.
    AllAnswered,
    /// Submit confirmed despite unanswered questions.
    Confirmed,
    /// The countdown reached zero.
    TimedOut,
}

/// A user-initiated input to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SelectOption(i64),
    Next,
    Previous,
    RequestSubmit,
    ConfirmSubmit,
    CancelSubmit,
}

/// The observable outcome of a single transition.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The transition was not applicable and changed nothing.
    Ignored,
    AnswerRecorded { question_id: String, label: i64 },
    Navigated { index: usize },
    Ticked { remaining_secs: u64 },
    ConfirmationRequired { unanswered: usize },
    /// A pending submit request was cancelled.
    Resumed,
    Submitted { reason: SubmitReason },
}

/// Knobs for starting a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionOptions {
    /// Countdown length in seconds.
    pub timer_secs: u64,
    pub thresholds: SwotThresholds,
}

impl SessionOptions {
    /// Countdown of `hours` and `minutes`. Fails when the total does not fit
    /// in a `u64` of seconds.
    pub fn from_hours_minutes(hours: u64, minutes: u64) -> Result<Self, SessionError> {
        let timer_secs = hours
            .checked_mul(3600)
            .zip(minutes.checked_mul(60))
            .and_then(|(h, m)| h.checked_add(m))
            .ok_or(SessionError::TimerOverflow { hours, minutes })?;
        Ok(Self {
            timer_secs,
            thresholds: SwotThresholds::default(),
        })
    }

    pub fn with_thresholds(mut self, thresholds: SwotThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
}

/// A single timed attempt at an exam.
pub struct ExamSession<C: Clock = SystemClock> {
    exam_name: String,
    questions: Vec<RuntimeQuestion>,
    index: usize,
    answers: HashMap<String, i64>,
    ledger: TimeLedger,
    remaining_secs: u64,
    phase: SessionPhase,
    started_at: DateTime<Utc>,
    thresholds: SwotThresholds,
    clock: C,
    result: Option<ExamResult>,
}

impl ExamSession<SystemClock> {
    /// Start a session on the system clock with a thread-local RNG.
    pub fn start(
        exam: &ExamDefinition,
        timer_hours: u64,
        timer_minutes: u64,
    ) -> Result<Self, SessionError> {
        Self::start_with(
            exam,
            SessionOptions::from_hours_minutes(timer_hours, timer_minutes)?,
            SystemClock,
            &mut rand::thread_rng(),
        )
    }
}

impl<C: Clock> ExamSession<C> {
    /// Start a session with an explicit clock and RNG.
    ///
    /// Questions and each question's options are shuffled independently, ids
    /// are assigned by shuffled position, and every topic timer starts at 0.
    pub fn start_with<R: Rng + ?Sized>(
        exam: &ExamDefinition,
        options: SessionOptions,
        clock: C,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        validate_exam_definition(exam).map_err(|e| match e {
            ExamValidationError::NoQuestions => SessionError::EmptyExam,
            other => SessionError::Invalid(other),
        })?;

        let questions: Vec<RuntimeQuestion> = shuffled(&exam.questions, &mut *rng)
            .into_iter()
            .enumerate()
            .map(|(i, q)| RuntimeQuestion {
                id: format!("q-{i}"),
                shuffled_options: shuffled(&q.options, &mut *rng),
                question: q,
            })
            .collect();

        let now = clock.now();
        let ledger = TimeLedger::new(exam.topics(), now);

        tracing::info!(
            exam = %exam.name,
            questions = questions.len(),
            timer_secs = options.timer_secs,
            "exam session started"
        );

        Ok(Self {
            exam_name: exam.name.clone(),
            questions,
            index: 0,
            answers: HashMap::new(),
            ledger,
            remaining_secs: options.timer_secs,
            phase: SessionPhase::Running,
            started_at: now,
            thresholds: options.thresholds,
            clock,
            result: None,
        })
    }

    /// Dispatch a user command to the matching transition.
    pub fn apply(&mut self, command: Command) -> SessionEvent {
        match command {
            Command::SelectOption(label) => self.select_option(label),
            Command::Next => self.go_next(),
            Command::Previous => self.go_previous(),
            Command::RequestSubmit => self.request_submit(),
            Command::ConfirmSubmit => self.confirm_submit(),
            Command::CancelSubmit => self.cancel_submit(),
        }
    }

    /// Record `label` as the answer to the active question, replacing any
    /// earlier choice. Labels that belong to no option are ignored.
    pub fn select_option(&mut self, label: i64) -> SessionEvent {
        if self.phase != SessionPhase::Running {
            return self.ignore("select_option");
        }
        let question = &self.questions[self.index];
        if !question.has_option(label) {
            tracing::debug!(question = %question.id, label, "ignoring unknown option label");
            return SessionEvent::Ignored;
        }
        let question_id = question.id.clone();
        self.answers.insert(question_id.clone(), label);
        SessionEvent::AnswerRecorded { question_id, label }
    }

    /// Move to the next question. No-op on the last one.
    pub fn go_next(&mut self) -> SessionEvent {
        if self.phase != SessionPhase::Running || self.index + 1 >= self.questions.len() {
            return self.ignore("go_next");
        }
        self.move_to(self.index + 1)
    }

    /// Move to the previous question. No-op on the first one.
    pub fn go_previous(&mut self) -> SessionEvent {
        if self.phase != SessionPhase::Running || self.index == 0 {
            return self.ignore("go_previous");
        }
        self.move_to(self.index - 1)
    }

    fn move_to(&mut self, index: usize) -> SessionEvent {
        self.flush_active_question();
        self.index = index;
        SessionEvent::Navigated { index }
    }

    /// Advance the countdown by one second.
    ///
    /// Reaching zero forces submission, even while a confirmation is pending.
    /// Otherwise the second is attributed to the active question's topic.
    pub fn tick(&mut self) -> SessionEvent {
        if self.phase == SessionPhase::Submitted {
            return self.ignore("tick");
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            return self.submit(SubmitReason::TimedOut);
        }
        let topic = self.questions[self.index].question.topic.clone();
        self.ledger.tick_topic(&topic);
        SessionEvent::Ticked {
            remaining_secs: self.remaining_secs,
        }
    }

    /// Ask to submit. Submits immediately when everything is answered,
    /// otherwise waits for [`confirm_submit`](Self::confirm_submit) or
    /// [`cancel_submit`](Self::cancel_submit).
    pub fn request_submit(&mut self) -> SessionEvent {
        if self.phase != SessionPhase::Running {
            return self.ignore("request_submit");
        }
        let unanswered = self.unanswered_count();
        if unanswered == 0 {
            return self.submit(SubmitReason::AllAnswered);
        }
        self.phase = SessionPhase::AwaitingConfirmation;
        SessionEvent::ConfirmationRequired { unanswered }
    }

    pub fn confirm_submit(&mut self) -> SessionEvent {
        if self.phase != SessionPhase::AwaitingConfirmation {
            return self.ignore("confirm_submit");
        }
        self.submit(SubmitReason::Confirmed)
    }

    /// Abandon a pending submit request. Nothing else changes.
    pub fn cancel_submit(&mut self) -> SessionEvent {
        if self.phase != SessionPhase::AwaitingConfirmation {
            return self.ignore("cancel_submit");
        }
        self.phase = SessionPhase::Running;
        SessionEvent::Resumed
    }

    fn submit(&mut self, reason: SubmitReason) -> SessionEvent {
        if self.phase == SessionPhase::Submitted {
            return self.ignore("submit");
        }
        self.flush_active_question();

        let submitted_at = self.ledger.active_since();
        let mut result = score(&ScoringInput {
            exam_name: &self.exam_name,
            questions: &self.questions,
            answers: &self.answers,
            question_times: self.ledger.question_times(),
            topic_times: self.ledger.topic_times(),
            started_at: self.started_at,
            submitted_at,
        });
        result.swot = classify(&result, &self.thresholds);

        tracing::info!(
            exam = %self.exam_name,
            ?reason,
            correct = result.correct_answers,
            total = result.total_questions,
            accuracy = result.accuracy,
            "exam submitted"
        );

        self.result = Some(result);
        self.phase = SessionPhase::Submitted;
        SessionEvent::Submitted { reason }
    }

    fn flush_active_question(&mut self) {
        let now = self.clock.now();
        let id = &self.questions[self.index].id;
        self.ledger.record_elapsed_for_active_question(id, now);
    }

    fn ignore(&self, transition: &str) -> SessionEvent {
        tracing::debug!(transition, phase = ?self.phase, index = self.index, "transition ignored");
        SessionEvent::Ignored
    }

    pub fn exam_name(&self) -> &str {
        &self.exam_name
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_submitted(&self) -> bool {
        self.phase == SessionPhase::Submitted
    }

    pub fn questions(&self) -> &[RuntimeQuestion] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn current_question(&self) -> &RuntimeQuestion {
        &self.questions[self.index]
    }

    /// The label chosen for the active question, if any.
    pub fn current_selection(&self) -> Option<i64> {
        self.answers.get(&self.questions[self.index].id).copied()
    }

    pub fn answers(&self) -> &HashMap<String, i64> {
        &self.answers
    }

    pub fn unanswered_count(&self) -> usize {
        self.questions.len() - self.answers.len()
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn ledger(&self) -> &TimeLedger {
        &self.ledger
    }

    /// The result, once submitted.
    pub fn result(&self) -> Option<&ExamResult> {
        self.result.as_ref()
    }

    pub fn into_result(self) -> Option<ExamResult> {
        self.result
    }
}
