//! Boundary traits for exam sources and result sinks.
//!
//! The engine only needs "a list of questions to run" and "somewhere to hand
//! the finished result". Everything behind these seams (files, storage,
//! network) is a collaborator.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::model::{ExamDefinition, ExamResult};
use crate::parser::parse_exam_str;

// ---------------------------------------------------------------------------
// Exam sources
// ---------------------------------------------------------------------------

/// Supplies the exam definition for a session.
#[async_trait]
pub trait ExamSource: Send + Sync {
    /// Human-readable description of where the exam comes from.
    fn describe(&self) -> String;

    /// Load and validate the exam definition.
    async fn load(&self) -> Result<ExamDefinition>;
}

/// Reads an exam definition from a JSON file.
#[derive(Debug, Clone)]
pub struct FileExamSource {
    path: PathBuf,
}

impl FileExamSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ExamSource for FileExamSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> Result<ExamDefinition> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read exam file: {}", self.path.display()))?;
        parse_exam_str(&content, &self.path)
    }
}

// ---------------------------------------------------------------------------
// Result sinks
// ---------------------------------------------------------------------------

/// Receives the result of a submitted session.
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn accept(&self, result: &ExamResult) -> Result<()>;
}

/// Writes each result as `result-<timestamp>-<id>.json` into a directory.
#[derive(Debug, Clone)]
pub struct JsonDirSink {
    dir: PathBuf,
}

impl JsonDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The file a given result is written to. The result id keeps results
    /// submitted within the same second apart.
    pub fn path_for(&self, result: &ExamResult) -> PathBuf {
        let timestamp = result.date.format("%Y-%m-%dT%H%M%S");
        self.dir.join(format!("result-{timestamp}-{}.json", result.id))
    }
}

#[async_trait]
impl ResultSink for JsonDirSink {
    async fn accept(&self, result: &ExamResult) -> Result<()> {
        let json = serde_json::to_string_pretty(result).context("failed to serialize result")?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        let path = self.path_for(result);
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .with_context(|| format!("failed to create result file {}", path.display()))?;
        file.write_all(json.as_bytes())
            .await
            .with_context(|| format!("failed to write result to {}", path.display()))?;
        file.flush()
            .await
            .with_context(|| format!("failed to write result to {}", path.display()))?;
        tracing::info!("result saved to {}", path.display());
        Ok(())
    }
}

/// Keeps results in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    results: Mutex<Vec<ExamResult>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything accepted so far.
    pub fn results(&self) -> Vec<ExamResult> {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ResultSink for MemorySink {
    async fn accept(&self, result: &ExamResult) -> Result<()> {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(result.clone());
        Ok(())
    }
}
