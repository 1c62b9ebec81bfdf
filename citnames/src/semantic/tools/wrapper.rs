// SPDX-License-Identifier: GPL-3.0-or-later

//! Compiler cache and distribution wrappers (ccache, distcc, sccache).
//!
//! The wrappers are called with the real compiler as the first argument
//! (`ccache gcc -c main.c`). The tool extracts the real compiler, and
//! recognizes the rest of the call with its own chain of tools.

use super::program_name;
use crate::semantic::{Execution, RecognitionError, Semantic, Tool, ToolChain};
use std::path::Path;

/// Tool for the compiler wrappers.
///
/// The delegate chain must not contain a wrapper tool itself.
pub struct WrapperTool {
    delegate: ToolChain,
}

impl WrapperTool {
    pub fn new(delegate: ToolChain) -> Self {
        Self { delegate }
    }

    /// Returns the index of the real compiler in the parameters, `None` when
    /// the call is about the wrapper itself (`ccache -s`, `distcc --show-hosts`).
    fn real_compiler_index(wrapper: Option<&str>, parameters: &[String]) -> Option<usize> {
        let mut index = 0;
        if wrapper == Some("distcc") {
            // distcc can have its own options before the compiler
            while let Some(parameter) = parameters.get(index) {
                if !Self::is_distcc_option(parameter) {
                    break;
                }
                index += if Self::distcc_option_has_value(parameter) { 2 } else { 1 };
            }
        }
        parameters
            .get(index)
            .filter(|parameter| !parameter.starts_with('-'))
            .map(|_| index)
    }

    fn is_distcc_option(parameter: &str) -> bool {
        matches!(
            parameter,
            "-j" | "--jobs"
                | "-v"
                | "--verbose"
                | "-i"
                | "--show-hosts"
                | "--scan-avail"
                | "--show-principal"
        )
    }

    fn distcc_option_has_value(parameter: &str) -> bool {
        matches!(parameter, "-j" | "--jobs")
    }
}

impl Tool for WrapperTool {
    fn name(&self) -> &'static str {
        "wrapper"
    }

    fn is_compiler_call(&self, program: &Path) -> bool {
        matches!(program_name(program), Some("ccache" | "distcc" | "sccache"))
    }

    fn interpret(&self, execution: &Execution) -> Result<Semantic, RecognitionError> {
        let parameters = execution.parameters();
        let Some(index) = Self::real_compiler_index(program_name(&execution.executable), parameters)
        else {
            return Ok(Semantic::QueryOnly);
        };

        let compiler = Path::new(&parameters[index]);
        let delegated = execution.delegate_to(compiler, &parameters[index + 1..]);
        log::debug!("Wrapper delegates to: {delegated}");

        self.delegate
            .classify(&delegated)
            .unwrap_or(Ok(Semantic::Unknown))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::tools::{clang, gcc};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn create_wrapper() -> WrapperTool {
        WrapperTool::new(ToolChain::new(vec![Arc::new(clang::tool()), Arc::new(gcc::tool())]))
    }

    fn create_execution(executable: &str, args: Vec<&str>) -> Execution {
        Execution::from_strings(executable, args, "/project", HashMap::new())
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn test_program_recognition() {
        let sut = create_wrapper();

        assert!(sut.is_compiler_call(Path::new("/usr/bin/ccache")));
        assert!(sut.is_compiler_call(Path::new("/opt/distcc")));
        assert!(sut.is_compiler_call(Path::new("sccache")));
        assert!(sut.is_compiler_call(Path::new("sccache.exe")));
        assert!(!sut.is_compiler_call(Path::new("/usr/bin/gcc")));
    }

    #[test]
    fn test_real_compiler_index() {
        let args = strings(&["gcc", "-c", "main.c"]);
        assert_eq!(WrapperTool::real_compiler_index(Some("ccache"), &args), Some(0));

        let args = strings(&["-j", "4", "-v", "gcc", "-c", "main.c"]);
        assert_eq!(WrapperTool::real_compiler_index(Some("distcc"), &args), Some(3));

        let args = strings(&["-s"]);
        assert_eq!(WrapperTool::real_compiler_index(Some("ccache"), &args), None);

        let args = strings(&["--show-hosts"]);
        assert_eq!(WrapperTool::real_compiler_index(Some("distcc"), &args), None);

        let args = strings(&["-j"]);
        assert_eq!(WrapperTool::real_compiler_index(Some("distcc"), &args), None);

        assert_eq!(WrapperTool::real_compiler_index(Some("ccache"), &[]), None);
    }

    #[test]
    fn test_ccache_delegates_to_compiler() {
        let execution =
            create_execution("/usr/bin/ccache", vec!["ccache", "gcc", "-c", "main.c", "-o", "main.o"]);

        let result = create_wrapper().recognize(&execution);

        assert_eq!(
            result,
            Ok(Semantic::Compile {
                source_files: vec![PathBuf::from("main.c")],
                output_file: Some(PathBuf::from("main.o")),
                flags: vec![],
                language: None,
            })
        );
    }

    #[test]
    fn test_distcc_with_options() {
        let execution = create_execution(
            "distcc",
            vec!["distcc", "-j", "4", "clang++", "-std=c++17", "-c", "file.cpp"],
        );

        let result = create_wrapper().recognize(&execution);

        assert_eq!(
            result,
            Ok(Semantic::Compile {
                source_files: vec![PathBuf::from("file.cpp")],
                output_file: None,
                flags: strings(&["-std=c++17"]),
                language: None,
            })
        );
    }

    #[test]
    fn test_wrapper_management_call_is_query() {
        let execution = create_execution("ccache", vec!["ccache", "-s"]);

        assert_eq!(create_wrapper().recognize(&execution), Ok(Semantic::QueryOnly));
    }

    #[test]
    fn test_unrecognized_compiler_is_unknown() {
        let execution = create_execution("sccache", vec!["sccache", "rustc", "--crate-name", "foo"]);

        assert_eq!(create_wrapper().recognize(&execution), Ok(Semantic::Unknown));
    }

    #[test]
    fn test_errors_of_the_real_compiler_are_reported() {
        let execution = create_execution("ccache", vec!["ccache", "gcc", "-c"]);

        assert!(matches!(
            create_wrapper().recognize(&execution),
            Err(RecognitionError::MalformedInvocation(_))
        ));
    }
}
