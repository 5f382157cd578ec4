//! The `proctor run` command.

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;

use proctor_core::clock::SystemClock;
use proctor_core::config::load_config_from;
use proctor_core::driver::{SessionDriver, SessionObserver};
use proctor_core::report::format_duration_hms;
use proctor_core::session::{Command, ExamSession, SubmitReason};
use proctor_core::traits::{ExamSource, FileExamSource, JsonDirSink};
use proctor_core::{ExamResult, RuntimeQuestion};

use super::summary::print_result;

const HELP: &str = "Commands: <label> select, n next, p previous, s submit, y confirm, c cancel";

/// Renders the session on the terminal.
struct ConsoleObserver {
    total: usize,
}

impl SessionObserver for ConsoleObserver {
    fn on_tick(&self, remaining_secs: u64) {
        if remaining_secs % 60 == 0 || remaining_secs <= 10 {
            eprintln!(
                "  Time remaining: {}",
                format_duration_hms(remaining_secs as f64)
            );
        }
    }

    fn on_navigate(&self, index: usize, question: &RuntimeQuestion, selection: Option<i64>) {
        println!(
            "\nQuestion {}/{} [{}]",
            index + 1,
            self.total,
            question.topic()
        );
        println!("{}", question.question.question);
        for option in &question.shuffled_options {
            let marker = if selection == Some(option.label) {
                "*"
            } else {
                " "
            };
            println!(" {marker} [{}] {}", option.label, option.value);
        }
    }

    fn on_confirmation_required(&self, unanswered: usize) {
        println!("\n{unanswered} question(s) unanswered. Submit anyway? (y confirm, c cancel)");
    }

    fn on_submitted(&self, reason: SubmitReason, _result: &ExamResult) {
        let why = match reason {
            SubmitReason::AllAnswered => "all questions answered",
            SubmitReason::Confirmed => "submitted",
            SubmitReason::TimedOut => "time is up",
        };
        println!("\nExam finished: {why}.\n");
    }
}

pub async fn execute(
    exam_path: PathBuf,
    hours: Option<u64>,
    minutes: Option<u64>,
    output: Option<PathBuf>,
    seed: Option<u64>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let options = config.session_options(hours, minutes)?;

    let source = FileExamSource::new(&exam_path);
    tracing::debug!(source = %source.describe(), "loading exam");
    let exam = source.load().await?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let session = ExamSession::start_with(&exam, options, SystemClock, &mut rng)?;

    eprintln!(
        "proctor v{}: {} ({} questions, {})",
        env!("CARGO_PKG_VERSION"),
        exam.name,
        exam.questions.len(),
        format_duration_hms(options.timer_secs as f64)
    );
    eprintln!("{HELP}");

    let (tx, rx) = mpsc::channel(16);
    spawn_stdin_reader(tx);

    let output_dir = output.unwrap_or_else(|| config.output_dir.clone());
    let sink = JsonDirSink::new(&output_dir);
    let observer = ConsoleObserver {
        total: exam.questions.len(),
    };

    let result = SessionDriver::new(session).run(rx, &observer, &sink).await?;

    print_result(&result, &options.thresholds);
    eprintln!("\nResult saved to: {}", sink.path_for(&result).display());

    Ok(())
}

/// Parse one line of user input.
fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if let Ok(label) = line.parse::<i64>() {
        return Some(Command::SelectOption(label));
    }
    match line.to_ascii_lowercase().as_str() {
        "n" | "next" => Some(Command::Next),
        "p" | "prev" | "previous" => Some(Command::Previous),
        "s" | "submit" => Some(Command::RequestSubmit),
        "y" | "yes" | "confirm" => Some(Command::ConfirmSubmit),
        "c" | "cancel" => Some(Command::CancelSubmit),
        _ => None,
    }
}

/// Read commands from stdin on a detached thread.
///
/// A blocking stdin read cannot be cancelled, so it lives outside the runtime.
/// End of input submits whatever has been answered.
fn spawn_stdin_reader(tx: mpsc::Sender<Command>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match parse_command(&line) {
                Some(command) => {
                    if tx.blocking_send(command).is_err() {
                        return;
                    }
                }
                None => eprintln!("{HELP}"),
            }
        }
        for command in [Command::RequestSubmit, Command::ConfirmSubmit] {
            if tx.blocking_send(command).is_err() {
                return;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command(" 3 "), Some(Command::SelectOption(3)));
        assert_eq!(parse_command("-1"), Some(Command::SelectOption(-1)));
        assert_eq!(parse_command("N"), Some(Command::Next));
        assert_eq!(parse_command("previous"), Some(Command::Previous));
        assert_eq!(parse_command("s"), Some(Command::RequestSubmit));
        assert_eq!(parse_command("yes"), Some(Command::ConfirmSubmit));
        assert_eq!(parse_command("c"), Some(Command::CancelSubmit));
        assert_eq!(parse_command("quit"), None);
    }
}
