// SPDX-License-Identifier: GPL-3.0-or-later

//! The ordered set of tools which answers the recognition of an execution.

use super::tools::archiver::ArchiverTool;
use super::tools::linker::LinkerTool;
use super::tools::wrapper::WrapperTool;
use super::tools::{ConfiguredTool, clang, cray_fortran, cuda, gcc, intel_fortran, mpi};
use super::{Execution, RecognitionError, Semantic, Tool};
use crate::config;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Represents a set of tools, where any of them can recognize the semantic.
/// The evaluation is done in the order of the tools. The first one which
/// claims the program answers.
///
/// The chain is immutable after construction, and can be shared between
/// threads.
#[derive(Clone)]
pub struct ToolChain {
    tools: Vec<Arc<dyn Tool>>,
    ignored: HashSet<PathBuf>,
}

impl ToolChain {
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Self {
        Self {
            tools,
            ignored: HashSet::new(),
        }
    }

    /// The executions of these programs are not compiler calls, whatever
    /// tool would claim them.
    pub fn with_ignored(mut self, programs: impl IntoIterator<Item = PathBuf>) -> Self {
        self.ignored.extend(programs);
        self
    }

    /// Classifies the execution.
    ///
    /// Returns `None` when no tool claims the program, otherwise the answer of
    /// the first claiming tool.
    pub fn classify(&self, execution: &Execution) -> Option<Result<Semantic, RecognitionError>> {
        if self.ignored.contains(&execution.executable) {
            log::debug!("Program is ignored by configuration: {}", execution.executable.display());
            return None;
        }

        for tool in &self.tools {
            match tool.recognize(execution) {
                Err(RecognitionError::NotApplicable) => continue,
                Ok(semantic) => {
                    log::debug!("Recognized by {} as {}: {}", tool.name(), semantic.kind(), execution);
                    return Some(Ok(semantic));
                }
                Err(error) => {
                    log::debug!("Recognition by {} failed: {}, {}", tool.name(), error, execution);
                    return Some(Err(error));
                }
            }
        }
        None
    }
}

impl Default for ToolChain {
    fn default() -> Self {
        let delegate = ToolChain::new(compilers());

        let mut tools: Vec<Arc<dyn Tool>> = vec![Arc::new(WrapperTool::new(delegate))];
        tools.extend(compilers());
        ToolChain::new(tools)
    }
}

impl From<&config::Main> for ToolChain {
    fn from(config: &config::Main) -> Self {
        // Configured hints are registered before the built-in tools.
        let mut hints: Vec<Arc<dyn Tool>> = Vec::new();
        let mut wrappers: Vec<PathBuf> = Vec::new();
        let mut ignored: Vec<PathBuf> = Vec::new();
        for compiler in &config.compilers {
            if compiler.ignore {
                ignored.push(compiler.path.clone());
                continue;
            }
            let Some(compiler_type) = compiler.as_ else {
                continue;
            };
            match tool_for(compiler_type) {
                Some(tool) => hints.push(Arc::new(ConfiguredTool::new(compiler.path.clone(), tool))),
                None => wrappers.push(compiler.path.clone()),
            }
        }

        let mut delegate_tools = hints.clone();
        delegate_tools.extend(compilers());
        let delegate = ToolChain::new(delegate_tools);

        let mut tools: Vec<Arc<dyn Tool>> = Vec::new();
        for path in wrappers {
            let wrapper = Arc::new(WrapperTool::new(delegate.clone()));
            tools.push(Arc::new(ConfiguredTool::new(path, wrapper)));
        }
        tools.extend(hints);
        tools.push(Arc::new(WrapperTool::new(delegate)));
        tools.extend(compilers());

        ToolChain::new(tools).with_ignored(ignored)
    }
}

/// The built-in tools, except the wrappers, in the order of evaluation.
///
/// The more specific program name patterns come first.
fn compilers() -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(mpi::tool()),
        Arc::new(cray_fortran::tool()),
        Arc::new(intel_fortran::tool()),
        Arc::new(cuda::tool()),
        Arc::new(clang::tool()),
        Arc::new(gcc::tool()),
        Arc::new(LinkerTool::new()),
        Arc::new(ArchiverTool::new()),
    ]
}

/// The tool which interprets the arguments of the given compiler family.
///
/// Returns `None` for the wrappers, those delegate to a chain which only the
/// caller can build.
fn tool_for(compiler_type: config::CompilerType) -> Option<Arc<dyn Tool>> {
    let tool: Arc<dyn Tool> = match compiler_type {
        config::CompilerType::Gcc => Arc::new(gcc::tool()),
        config::CompilerType::Clang | config::CompilerType::Flang => Arc::new(clang::tool()),
        config::CompilerType::IntelFortran => Arc::new(intel_fortran::tool()),
        config::CompilerType::CrayFortran => Arc::new(cray_fortran::tool()),
        config::CompilerType::Cuda => Arc::new(cuda::tool()),
        config::CompilerType::Mpi => Arc::new(mpi::tool()),
        config::CompilerType::Linker => Arc::new(LinkerTool::new()),
        config::CompilerType::Archiver => Arc::new(ArchiverTool::new()),
        config::CompilerType::Wrapper => return None,
    };
    Some(tool)
}
