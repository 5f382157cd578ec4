//! Async session driver.
//!
//! Owns the one-second countdown for a session and serializes ticks and
//! user commands on a single task, so every transition runs to completion
//! before the next one starts. The ticker is dropped as soon as the session
//! is submitted, and the result is handed to a [`ResultSink`].

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant};

use crate::clock::{Clock, SystemClock};
use crate::model::{ExamResult, RuntimeQuestion};
use crate::session::{Command, ExamSession, SessionEvent, SubmitReason};
use crate::traits::ResultSink;

/// Receives session progress as the driver runs.
///
/// All methods default to doing nothing.
pub trait SessionObserver: Send + Sync {
    /// One second elapsed and the countdown is still running.
    fn on_tick(&self, _remaining_secs: u64) {}

    /// The active question changed, or its selection did.
    fn on_navigate(&self, _index: usize, _question: &RuntimeQuestion, _selection: Option<i64>) {}

    /// A submit request is pending with unanswered questions.
    fn on_confirmation_required(&self, _unanswered: usize) {}

    fn on_submitted(&self, _reason: SubmitReason, _result: &ExamResult) {}
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

/// Runs one [`ExamSession`] to submission.
pub struct SessionDriver<C: Clock = SystemClock> {
    session: ExamSession<C>,
    period: Duration,
}

impl<C: Clock> SessionDriver<C> {
    pub fn new(session: ExamSession<C>) -> Self {
        Self {
            session,
            period: Duration::from_secs(1),
        }
    }

    pub fn session(&self) -> &ExamSession<C> {
        &self.session
    }

    /// Drive the session until it is submitted, then pass the result to `sink`.
    ///
    /// When the command channel closes the countdown keeps running, so an
    /// abandoned session still ends by timing out.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        observer: &dyn SessionObserver,
        sink: &dyn ResultSink,
    ) -> Result<ExamResult> {
        observer.on_navigate(
            self.session.current_index(),
            self.session.current_question(),
            self.session.current_selection(),
        );

        tracing::debug!(exam = %self.session.exam_name(), "driver started");
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        let mut commands_open = true;

        while !self.session.is_submitted() {
            let event = tokio::select! {
                _ = ticker.tick() => self.session.tick(),
                command = commands.recv(), if commands_open => match command {
                    Some(command) => self.session.apply(command),
                    None => {
                        tracing::debug!("command channel closed, waiting for the countdown");
                        commands_open = false;
                        continue;
                    }
                },
            };
            self.notify(observer, &event);
        }
        drop(ticker);

        let result = self
            .session
            .into_result()
            .context("session finished without a result")?;
        sink.accept(&result)
            .await
            .context("failed to hand off exam result")?;
        Ok(result)
    }

    fn notify(&self, observer: &dyn SessionObserver, event: &SessionEvent) {
        match event {
            SessionEvent::Ignored => {}
            SessionEvent::Ticked { remaining_secs } => observer.on_tick(*remaining_secs),
            SessionEvent::Navigated { .. }
            | SessionEvent::AnswerRecorded { .. }
            | SessionEvent::Resumed => observer.on_navigate(
                self.session.current_index(),
                self.session.current_question(),
                self.session.current_selection(),
            ),
            SessionEvent::ConfirmationRequired { unanswered } => {
                observer.on_confirmation_required(*unanswered)
            }
            SessionEvent::Submitted { reason } => {
                if let Some(result) = self.session.result() {
                    observer.on_submitted(*reason, result);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::model::{ExamDefinition, Question, QuestionOption};
    use crate::session::SessionOptions;
    use crate::traits::MemorySink;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<String>>,
    }

    impl RecordingObserver {
        fn push(&self, event: String) {
            self.events.lock().unwrap().push(event);
        }

        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl SessionObserver for RecordingObserver {
        fn on_tick(&self, remaining_secs: u64) {
            self.push(format!("tick {remaining_secs}"));
        }
        fn on_navigate(&self, index: usize, _: &RuntimeQuestion, selection: Option<i64>) {
            self.push(format!("at {index} {selection:?}"));
        }
        fn on_confirmation_required(&self, unanswered: usize) {
            self.push(format!("confirm {unanswered}"));
        }
        fn on_submitted(&self, reason: SubmitReason, _: &ExamResult) {
            self.push(format!("submitted {reason:?}"));
        }
    }

    fn exam(count: usize) -> ExamDefinition {
        ExamDefinition {
            name: "Driver Exam".into(),
            questions: (0..count)
                .map(|i| Question {
                    question: format!("Q{i}"),
                    options: vec![
                        QuestionOption {
                            label: 1,
                            value: "yes".into(),
                        },
                        QuestionOption {
                            label: 2,
                            value: "no".into(),
                        },
                    ],
                    answer_label: 1,
                    topic: "General".into(),
                    explanation: String::new(),
                })
                .collect(),
        }
    }

    fn driver(count: usize, timer_secs: u64) -> SessionDriver<ManualClock> {
        let options = SessionOptions {
            timer_secs,
            thresholds: Default::default(),
        };
        let session = ExamSession::start_with(
            &exam(count),
            options,
            ManualClock::default(),
            &mut StdRng::seed_from_u64(3),
        )
        .unwrap();
        SessionDriver::new(session)
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_submits_when_commands_close() {
        let (tx, rx) = mpsc::channel(8);
        drop(tx);
        let observer = RecordingObserver::default();
        let sink = MemorySink::new();

        let result = driver(2, 3).run(rx, &observer, &sink).await.unwrap();

        assert_eq!(result.total_questions, 2);
        assert_eq!(result.correct_answers, 0);
        assert_eq!(result.time_per_topic["General"], 2);
        assert_eq!(
            observer.events(),
            vec!["at 0 None", "tick 2", "tick 1", "submitted TimedOut"]
        );
        assert_eq!(sink.results().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn queued_commands_answer_and_submit() {
        let driver = driver(1, 60);
        let label = driver.session().current_question().answer_label();
        let (tx, rx) = mpsc::channel(8);
        tx.send(Command::SelectOption(label)).await.unwrap();
        tx.send(Command::RequestSubmit).await.unwrap();
        let observer = RecordingObserver::default();
        let sink = MemorySink::new();

        let result = driver.run(rx, &observer, &sink).await.unwrap();

        assert_eq!(result.correct_answers, 1);
        assert_eq!(result.accuracy, 100.0);
        assert_eq!(
            observer.events(),
            vec![
                "at 0 None".to_string(),
                format!("at 0 Some({label})"),
                "submitted AllAnswered".to_string(),
            ]
        );
        assert_eq!(sink.results()[0].id, result.id);
        drop(tx);
    }

    #[tokio::test(start_paused = true)]
    async fn confirmation_flow() {
        let (tx, rx) = mpsc::channel(8);
        for command in [
            Command::RequestSubmit,
            Command::CancelSubmit,
            Command::Next,
            Command::RequestSubmit,
            Command::ConfirmSubmit,
        ] {
            tx.send(command).await.unwrap();
        }
        let observer = RecordingObserver::default();

        let result = driver(2, 60)
            .run(rx, &observer, &MemorySink::new())
            .await
            .unwrap();

        assert_eq!(result.correct_answers, 0);
        assert_eq!(result.incorrect_answers, 2);
        assert_eq!(
            observer.events(),
            vec![
                "at 0 None",
                "confirm 2",
                "at 0 None",
                "at 1 None",
                "confirm 2",
                "submitted Confirmed",
            ]
        );
        drop(tx);
    }

    #[tokio::test(start_paused = true)]
    async fn noop_observer_still_delivers_result() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(Command::ConfirmSubmit).await.unwrap();
        drop(tx);
        let sink = MemorySink::new();

        let result = driver(1, 5).run(rx, &NoopObserver, &sink).await.unwrap();

        assert_eq!(result.exam_name, "Driver Exam");
        assert_eq!(result.time_per_topic["General"], 4);
        assert_eq!(sink.results(), vec![result]);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_wins_over_pending_confirmation() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(Command::RequestSubmit).await.unwrap();
        let observer = RecordingObserver::default();

        let result = driver(2, 2)
            .run(rx, &observer, &MemorySink::new())
            .await
            .unwrap();

        assert_eq!(result.total_questions, 2);
        assert_eq!(
            observer.events(),
            vec!["at 0 None", "confirm 2", "tick 1", "submitted TimedOut"]
        );
        drop(tx);
    }
}
