// SPDX-License-Identifier: GPL-3.0-or-later

//! The captured process invocation, as the interception layer reports it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Execution is a representation of a process execution.
///
/// It does not contain information about the outcome of the execution,
/// like the exit code or the duration of the execution. It only contains
/// the information that is necessary to reproduce the execution.
///
/// The `arguments` include the program name (`argv[0]`) as the first element.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct Execution {
    pub executable: PathBuf,
    pub arguments: Vec<String>,
    pub working_dir: PathBuf,
    #[serde(default)]
    pub environment: HashMap<String, String>,
}

impl Execution {
    /// The arguments without the program name.
    pub fn parameters(&self) -> &[String] {
        self.arguments.get(1..).unwrap_or_default()
    }

    /// Creates a new execution which runs a different program with different
    /// parameters, but in the same directory and environment.
    ///
    /// Used by wrappers, which call the real compiler with the rest of their
    /// own arguments.
    pub fn delegate_to(&self, executable: &Path, parameters: &[String]) -> Self {
        let mut arguments = Vec::with_capacity(parameters.len() + 1);
        arguments.push(executable.to_string_lossy().to_string());
        arguments.extend(parameters.iter().cloned());

        Self {
            executable: executable.to_path_buf(),
            arguments,
            working_dir: self.working_dir.clone(),
            environment: self.environment.clone(),
        }
    }

    #[cfg(test)]
    pub fn from_strings(
        executable: &str,
        arguments: Vec<&str>,
        working_dir: &str,
        environment: HashMap<&str, &str>,
    ) -> Self {
        Self {
            executable: PathBuf::from(executable),
            arguments: arguments.iter().map(|s| s.to_string()).collect(),
            working_dir: PathBuf::from(working_dir),
            environment: environment
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl fmt::Display for Execution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Execution path={}, args=[{}]",
            self.executable.display(),
            shell_words::join(&self.arguments)
        )
    }
}
