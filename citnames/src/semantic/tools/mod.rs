// SPDX-License-Identifier: GPL-3.0-or-later

//! Tools recognize the members of one toolchain family.
//!
//! Most families are compiler drivers (GCC, Clang, CUDA, the Fortran compilers
//! and the MPI wrapper scripts). Those differ only in the program names and in
//! the flag grammar, so they share the `CompilerTool` implementation. Linkers,
//! archivers and the compiler cache wrappers have their own `Tool`s.

pub mod archiver;
pub mod clang;
pub mod cray_fortran;
pub mod cuda;
pub mod gcc;
pub mod intel_fortran;
pub mod linker;
pub mod mpi;
pub mod wrapper;

use super::flags::{Category, FlagTable};
use super::parser::{MatchedArgument, parse};
use super::source::looks_like_a_source_file;
use super::{Execution, RecognitionError, Semantic, Tool};
use crate::environment::{GCC_INCLUDE_KEYS, KEY_GCC__OBJC_INCLUDE};
use regex_lite::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Returns the file name of the program, without the `.exe` suffix.
///
/// The extension is not stripped in general, because version suffixes
/// (`gcc-11.2`) and linker flavors (`ld.gold`) look like extensions.
pub fn program_name(program: &Path) -> Option<&str> {
    let name = program.file_name()?.to_str()?;
    Some(name.strip_suffix(".exe").unwrap_or(name))
}

/// A compiler driver, described by its program name pattern and flag grammar.
pub struct CompilerTool {
    name: &'static str,
    program: Regex,
    table: &'static FlagTable,
    environment: bool,
    internal: Option<&'static str>,
}

impl CompilerTool {
    /// Creates a tool which recognizes the programs matching the pattern.
    ///
    /// The pattern is matched against the file name of the program.
    pub fn new(name: &'static str, program: Regex, table: &'static FlagTable) -> Self {
        Self {
            name,
            program,
            table,
            environment: false,
            internal: None,
        }
    }

    /// Include directories from the GCC environment variables are part of the
    /// compile flags.
    pub fn with_environment(mut self) -> Self {
        self.environment = true;
        self
    }

    /// Calls with the given flag are internal calls of the driver itself,
    /// those are not classified.
    pub fn with_internal_marker(mut self, flag: &'static str) -> Self {
        self.internal = Some(flag);
        self
    }
}

impl Tool for CompilerTool {
    fn name(&self) -> &'static str {
        self.name
    }

    fn is_compiler_call(&self, program: &Path) -> bool {
        program_name(program).is_some_and(|name| self.program.is_match(name))
    }

    fn interpret(&self, execution: &Execution) -> Result<Semantic, RecognitionError> {
        let parameters = execution.parameters();
        if let Some(marker) = self.internal
            && parameters.iter().any(|parameter| parameter == marker)
        {
            return Ok(Semantic::Unknown);
        }

        let matched = parse(self.table, parameters)?;
        let environment = if self.environment {
            include_flags_from(&execution.environment)
        } else {
            vec![]
        };
        classify_compiler_call(&matched, environment)
    }
}

/// Summary of a parsed compiler driver command line.
#[derive(Default)]
struct CompilerCall {
    sources: Vec<PathBuf>,
    inputs: Vec<PathBuf>,
    output: Option<PathBuf>,
    compile_flags: Vec<String>,
    link_flags: Vec<String>,
    language: Option<String>,
    stop_after_compile: bool,
    stop_after_preprocess: bool,
    link_only: bool,
    query: bool,
}

impl CompilerCall {
    fn from(matched: &[MatchedArgument]) -> Self {
        let mut call = Self::default();
        // The language selected by `-x` applies to the following positionals.
        let mut current_language: Option<&str> = None;

        for argument in matched {
            match argument {
                MatchedArgument::Positional(value) => {
                    if current_language.is_some() || looks_like_a_source_file(value) {
                        if call.sources.is_empty() {
                            call.language = current_language.map(str::to_string);
                        }
                        call.sources.push(PathBuf::from(value));
                    } else {
                        let input = PathBuf::from(value);
                        if !call.inputs.contains(&input) {
                            call.inputs.push(input);
                        }
                    }
                }
                MatchedArgument::Flag(flag) => {
                    match flag.category {
                        Category::OutputFile => {
                            call.output = flag.operands.last().map(PathBuf::from);
                        }
                        Category::InputFile => {
                            call.sources.extend(flag.operands.iter().map(PathBuf::from));
                        }
                        Category::Language => {
                            current_language = flag
                                .operands
                                .first()
                                .map(String::as_str)
                                .filter(|language| *language != "none");
                        }
                        Category::StopAfterCompile => call.stop_after_compile = true,
                        Category::StopAfterPreprocess => call.stop_after_preprocess = true,
                        Category::LinkOnly => call.link_only = true,
                        Category::Query => call.query = true,
                        _ => {}
                    }
                    if flag.category.kept_for_compile() {
                        call.compile_flags.extend(flag.arguments.iter().cloned());
                    }
                    if flag.category.kept_for_link() {
                        call.link_flags.extend(flag.arguments.iter().cloned());
                    }
                }
            }
        }
        call
    }

    fn stops_before_linking(&self) -> bool {
        self.stop_after_compile || self.stop_after_preprocess
    }
}

/// Classifies a compiler driver call from the parsed arguments.
///
/// The environment flags are appended to the flags of compile and preprocess
/// calls.
pub fn classify_compiler_call(
    matched: &[MatchedArgument],
    environment: Vec<String>,
) -> Result<Semantic, RecognitionError> {
    let mut call = CompilerCall::from(matched);

    if call.stops_before_linking() && call.link_only {
        return Err(RecognitionError::MalformedInvocation(
            "compile only and link only flags in the same call".to_string(),
        ));
    }
    if !call.stops_before_linking()
        && call.sources.is_empty()
        && (call.link_only || !call.inputs.is_empty())
    {
        return Ok(Semantic::Link {
            inputs: call.inputs,
            output_file: call.output,
            flags: call.link_flags,
        });
    }

    call.compile_flags.extend(environment);
    if call.stop_after_preprocess {
        if call.sources.is_empty() {
            return Err(RecognitionError::MalformedInvocation(
                "preprocessing without source files".to_string(),
            ));
        }
        return Ok(Semantic::Preprocess {
            source_files: call.sources,
            flags: call.compile_flags,
            language: call.language,
        });
    }
    if call.stop_after_compile {
        if call.sources.is_empty() {
            return Err(RecognitionError::MalformedInvocation(
                "compilation without source files".to_string(),
            ));
        }
        if call.sources.len() > 1 && call.output.is_some() {
            return Err(RecognitionError::MalformedInvocation(
                "single output file for multiple source files".to_string(),
            ));
        }
    }
    if call.query && call.sources.is_empty() && call.inputs.is_empty() {
        return Ok(Semantic::QueryOnly);
    }
    if call.sources.is_empty() {
        return Ok(Semantic::Unknown);
    }
    Ok(Semantic::Compile {
        source_files: call.sources,
        output_file: call.output,
        flags: call.compile_flags,
        language: call.language,
    })
}

/// Include directories from the GCC compatible environment variables.
///
/// https://gcc.gnu.org/onlinedocs/cpp/Environment-Variables.html
pub fn include_flags_from(environment: &HashMap<String, String>) -> Vec<String> {
    let mut flags = Vec::new();

    let mut append = |key: &str, flag: &str| {
        if let Some(value) = environment.get(key) {
            for path in std::env::split_paths(value) {
                if !path.as_os_str().is_empty() {
                    flags.push(flag.to_string());
                    flags.push(path.to_string_lossy().to_string());
                }
            }
        }
    };

    for key in GCC_INCLUDE_KEYS {
        append(key, "-I");
    }
    append(KEY_GCC__OBJC_INCLUDE, "-isystem");

    flags
}

/// Claims exactly one configured program path, and interprets the call with
/// the tool of the configured family.
pub struct ConfiguredTool {
    path: PathBuf,
    delegate: Arc<dyn Tool>,
}

impl ConfiguredTool {
    pub fn new(path: PathBuf, delegate: Arc<dyn Tool>) -> Self {
        Self { path, delegate }
    }
}

impl Tool for ConfiguredTool {
    fn name(&self) -> &'static str {
        self.delegate.name()
    }

    fn is_compiler_call(&self, program: &Path) -> bool {
        program == self.path
    }

    fn interpret(&self, execution: &Execution) -> Result<Semantic, RecognitionError> {
        self.delegate.interpret(execution)
    }
}
