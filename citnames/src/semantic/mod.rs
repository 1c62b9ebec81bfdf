// SPDX-License-Identifier: GPL-3.0-or-later

//! This module provides semantic recognition for executed commands, particularly
//! compiler invocations. It identifies what a compiler, linker or archiver call
//! does from the build tooling point of view, so a compilation database writer
//! can decide which executions to record.
//!
//! The main abstractions are:
//! - `Tool`: Recognizes one toolchain family by the program name, and interprets
//!   the arguments with the family's flag grammar.
//! - `ToolChain`: The ordered set of tools, the first one which claims the program
//!   answers the recognition.
//! - `Semantic`: The classified meaning of an execution.

pub mod chain;
pub mod flags;
pub mod parser;
pub mod source;
pub mod tools;

pub use crate::execution::Execution;
pub use chain::ToolChain;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Represents the classified meaning of an execution.
///
/// Executions which are not claimed by any tool have no semantic, those are
/// represented by the absence of this value (see `ToolChain::classify`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Semantic {
    /// Compiles the source files (into object files or assembly).
    Compile {
        source_files: Vec<PathBuf>,
        output_file: Option<PathBuf>,
        flags: Vec<String>,
        language: Option<String>,
    },
    /// Runs only the preprocessor on the source files.
    Preprocess {
        source_files: Vec<PathBuf>,
        flags: Vec<String>,
        language: Option<String>,
    },
    /// Links objects and libraries into an executable, shared object or archive.
    Link {
        inputs: Vec<PathBuf>,
        output_file: Option<PathBuf>,
        flags: Vec<String>,
    },
    /// Asks the tool something (version, configuration), has no build effect.
    QueryOnly,
    /// The program belongs to a known family, but the arguments are not
    /// classified with confidence.
    Unknown,
}

impl Semantic {
    /// The first source file of a compile or preprocess call.
    pub fn source_file(&self) -> Option<&Path> {
        match self {
            Semantic::Compile { source_files, .. } | Semantic::Preprocess { source_files, .. } => {
                source_files.first().map(PathBuf::as_path)
            }
            _ => None,
        }
    }

    /// The variant name, used in logs and statistics.
    pub fn kind(&self) -> &'static str {
        match self {
            Semantic::Compile { .. } => "compile",
            Semantic::Preprocess { .. } => "preprocess",
            Semantic::Link { .. } => "link",
            Semantic::QueryOnly => "query",
            Semantic::Unknown => "unknown",
        }
    }
}

/// Represents the failures of a recognition.
///
/// All of them are about a single execution. None of them is fatal for the
/// processing of other executions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecognitionError {
    /// The program is not a member of the tool's family.
    #[error("The program is not recognized by this tool")]
    NotApplicable,
    /// A flag requires more operands than the command line has.
    #[error("Flag '{flag}' expects {expected} argument(s), but found only {found}")]
    TruncatedFlag {
        flag: String,
        expected: usize,
        found: usize,
    },
    /// The arguments were parsed, but the call has no consistent meaning.
    #[error("Malformed invocation: {0}")]
    MalformedInvocation(String),
}

impl RecognitionError {
    /// A short name of the error, used in the output records.
    pub fn kind(&self) -> &'static str {
        match self {
            RecognitionError::NotApplicable => "not_applicable",
            RecognitionError::TruncatedFlag { .. } => "truncated_flag",
            RecognitionError::MalformedInvocation(_) => "malformed_invocation",
        }
    }
}

/// Responsible for recognizing the semantic meaning of an executed command
/// of a single toolchain family.
///
/// Implementations hold no execution specific state: the same instance is used
/// for every execution, potentially from multiple threads at once.
pub trait Tool: Send + Sync {
    /// The name of the tool, used in logs.
    fn name(&self) -> &'static str;

    /// Decides from the program path alone if this tool understands the call.
    ///
    /// This is a syntactic check, it never touches the filesystem.
    fn is_compiler_call(&self, program: &Path) -> bool;

    /// Interprets the arguments of the execution, assuming the program is a
    /// member of this tool's family.
    fn interpret(&self, execution: &Execution) -> Result<Semantic, RecognitionError>;

    /// Recognizes the execution, or fails with `NotApplicable` if the program
    /// is not a member of this tool's family.
    fn recognize(&self, execution: &Execution) -> Result<Semantic, RecognitionError> {
        if !self.is_compiler_call(&execution.executable) {
            return Err(RecognitionError::NotApplicable);
        }
        self.interpret(execution)
    }
}
