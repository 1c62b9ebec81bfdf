// SPDX-License-Identifier: GPL-3.0-or-later

//! Reads the captured executions, and writes one recognition record for each.
//!
//! Both the input and the output are JSON lines. An input line which is not
//! an execution is logged and skipped, the rest of the input is processed.

use crate::execution::Execution;
use crate::semantic::{RecognitionError, Semantic, ToolChain};
use anyhow::Context;
use serde::Serialize;
use std::fmt;
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// The output record of a single execution.
#[derive(Debug, Serialize)]
pub struct Record<'a> {
    pub executable: &'a Path,
    pub working_dir: &'a Path,
    pub result: Outcome,
}

/// The answer of the tool chain in serializable form.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Recognized(Semantic),
    Failed { kind: &'static str, message: String },
    NotCompilerCall,
}

impl From<Option<Result<Semantic, RecognitionError>>> for Outcome {
    fn from(value: Option<Result<Semantic, RecognitionError>>) -> Self {
        match value {
            Some(Ok(semantic)) => Outcome::Recognized(semantic),
            Some(Err(error)) => Outcome::Failed {
                kind: error.kind(),
                message: error.to_string(),
            },
            None => Outcome::NotCompilerCall,
        }
    }
}

/// Counters of the processed executions by outcome.
#[derive(Debug, Default)]
pub struct Statistics {
    pub lines_read: AtomicUsize,
    pub lines_skipped: AtomicUsize,
    pub recognized: AtomicUsize,
    pub failed: AtomicUsize,
    pub not_compiler_calls: AtomicUsize,
}

impl Statistics {
    fn count(&self, outcome: &Outcome) {
        let counter = match outcome {
            Outcome::Recognized(_) => &self.recognized,
            Outcome::Failed { .. } => &self.failed,
            Outcome::NotCompilerCall => &self.not_compiler_calls,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let read = self.lines_read.load(Ordering::Relaxed);
        let skipped = self.lines_skipped.load(Ordering::Relaxed);
        let recognized = self.recognized.load(Ordering::Relaxed);
        let failed = self.failed.load(Ordering::Relaxed);
        let not_compiler_calls = self.not_compiler_calls.load(Ordering::Relaxed);

        writeln!(f, "Recognition:")?;
        writeln!(f, "  lines read: {read}")?;
        writeln!(f, "  lines skipped: {skipped}")?;
        writeln!(f, "  recognized: {recognized}")?;
        writeln!(f, "  failed: {failed}")?;
        write!(f, "  not compiler calls: {not_compiler_calls}")
    }
}

/// Classifies every execution from the reader, and writes the records.
///
/// Fails only on I/O errors, malformed input lines are skipped.
pub fn process<R, W>(
    chain: &ToolChain,
    reader: R,
    mut writer: W,
    statistics: &Statistics,
) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
{
    // Lines are split as bytes, a line with invalid encoding is skipped like
    // any other malformed line.
    for (index, line) in reader.split(b'\n').enumerate() {
        let line = line.context("Failed to read execution events")?;
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        statistics.lines_read.fetch_add(1, Ordering::Relaxed);

        let execution: Execution = match serde_json::from_slice(&line) {
            Ok(execution) => execution,
            Err(error) => {
                log::warn!("Skipping malformed execution at line {}: {error}", index + 1);
                statistics.lines_skipped.fetch_add(1, Ordering::Relaxed);
                continue;
            }
        };

        let result = Outcome::from(chain.classify(&execution));
        statistics.count(&result);

        let record = Record {
            executable: &execution.executable,
            working_dir: &execution.working_dir,
            result,
        };
        serde_json::to_writer(&mut writer, &record).context("Failed to serialize result")?;
        writeln!(writer).context("Failed to write result")?;
    }
    writer.flush().context("Failed to write result")?;
    Ok(())
}
