// SPDX-License-Identifier: GPL-3.0-or-later

//! Static library archivers (ar, llvm-ar, gcc-ar).
//!
//! The first argument, which is not an option of the archiver itself, is the
//! operation key: one operation letter with optional modifiers (`rcs`, `-cru`).
//! The archive follows it, then the members. The position modifiers (`a`, `b`,
//! `i`) and the count modifier (`N`) take an extra argument before the archive.
//!
//! https://sourceware.org/binutils/docs/binutils/ar-cmdline.html

use super::program_name;
use crate::semantic::flags::{Category, FlagPattern, FlagRule, FlagTable};
use crate::semantic::parser::{MatchedArgument, parse};
use crate::semantic::{Execution, RecognitionError, Semantic, Tool};
use regex_lite::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const OPERATIONS: &str = "dmpqrstx";

pub struct ArchiverTool {
    program: Regex,
}

impl ArchiverTool {
    pub fn new() -> Self {
        let program = Regex::new(r"^(?:[^/]*-)?(?:ar|llvm-ar|gcc-ar)(?:-[\d.]+)?$")
            .expect("Invalid archiver regex pattern");

        Self { program }
    }

    /// Finds the operation letter of the key.
    ///
    /// The `s` letter is an operation only when there is no other, otherwise
    /// it is the modifier to write the symbol index.
    fn operation(key: &str) -> Option<char> {
        key.chars()
            .find(|letter| *letter != 's' && OPERATIONS.contains(*letter))
            .or_else(|| key.contains('s').then_some('s'))
    }

    /// The number of arguments between the key and the archive.
    fn modifier_arguments(key: &str) -> usize {
        let position = key.chars().any(|letter| matches!(letter, 'a' | 'b' | 'i'));
        let count = key.contains('N');
        usize::from(position) + usize::from(count)
    }
}

impl Default for ArchiverTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for ArchiverTool {
    fn name(&self) -> &'static str {
        "archiver"
    }

    fn is_compiler_call(&self, program: &Path) -> bool {
        program_name(program).is_some_and(|name| self.program.is_match(name))
    }

    fn interpret(&self, execution: &Execution) -> Result<Semantic, RecognitionError> {
        let matched = parse(&ARCHIVER_FLAGS, execution.parameters())?;

        // The key, the archive and the members. A dash-led key (`-rcs`) is
        // not an archiver option, so it comes as an unknown flag.
        let mut operands: Vec<&str> = Vec::new();
        let mut query = false;
        for argument in &matched {
            match argument {
                MatchedArgument::Positional(value) => operands.push(value),
                MatchedArgument::Flag(flag) if flag.rule.is_none() => {
                    operands.extend(flag.arguments.iter().map(String::as_str))
                }
                MatchedArgument::Flag(flag) => query |= flag.category == Category::Query,
            }
        }

        let Some(key) = operands.first().copied() else {
            if query {
                return Ok(Semantic::QueryOnly);
            }
            return Err(RecognitionError::MalformedInvocation(
                "missing operation key".to_string(),
            ));
        };

        let letters = key.trim_start_matches('-');
        let Some(operation) = Self::operation(letters) else {
            return Ok(Semantic::Unknown);
        };
        let archive_index = 1 + Self::modifier_arguments(letters);
        let Some(archive) = operands.get(archive_index) else {
            return Err(RecognitionError::MalformedInvocation(format!(
                "missing archive for operation '{operation}'"
            )));
        };

        match operation {
            'r' | 'q' => {
                let mut inputs: Vec<PathBuf> = Vec::new();
                for member in &operands[archive_index + 1..] {
                    let member = PathBuf::from(member);
                    if !inputs.contains(&member) {
                        inputs.push(member);
                    }
                }
                Ok(Semantic::Link {
                    inputs,
                    output_file: Some(PathBuf::from(archive)),
                    flags: vec![key.to_string()],
                })
            }
            't' | 'p' => Ok(Semantic::QueryOnly),
            _ => Ok(Semantic::Unknown),
        }
    }
}

/// The options of the archiver itself. Those can precede the operation key.
#[rustfmt::skip]
static ARCHIVER_FLAGS: LazyLock<FlagTable> = LazyLock::new(|| {
    FlagTable::new(vec![
        // informational calls
        FlagRule::new(FlagPattern::Exactly("--version", 0), Category::Query),
        FlagRule::new(FlagPattern::Exactly("-V", 0), Category::Query),
        FlagRule::new(FlagPattern::Exactly("--help", 0), Category::Query),
        FlagRule::new(FlagPattern::Exactly("-h", 0), Category::Query),
        // options with operand
        FlagRule::new(FlagPattern::WithEqOrSeparate("--plugin"), Category::ConsumedNoOp),
        FlagRule::new(FlagPattern::WithEq("--target"), Category::ConsumedNoOp),
        FlagRule::new(FlagPattern::WithEq("--output"), Category::ConsumedNoOp),
        FlagRule::new(FlagPattern::WithEq("--format"), Category::ConsumedNoOp),
        // object mode selection on AIX (-X32, -X64, -X32_64)
        FlagRule::new(FlagPattern::Prefix("-X", 0), Category::ConsumedNoOp),
        // switches
        FlagRule::new(FlagPattern::Exactly("--thin", 0), Category::ConsumedNoOp),
        FlagRule::new(FlagPattern::Exactly("--record-libdeps", 0), Category::ConsumedNoOp),
        FlagRule::new(FlagPattern::Prefix("@", 0), Category::ConsumedNoOp),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn create_execution(args: Vec<&str>) -> Execution {
        Execution::from_strings("/usr/bin/ar", args, "/project", HashMap::new())
    }

    #[test]
    fn test_program_recognition() {
        let sut = ArchiverTool::new();

        for program in ["ar", "/usr/bin/llvm-ar", "llvm-ar-17", "gcc-ar", "x86_64-linux-gnu-ar"] {
            assert!(sut.is_compiler_call(Path::new(program)), "{program}");
        }
        for program in ["arch", "tar", "gcc", "ranlib"] {
            assert!(!sut.is_compiler_call(Path::new(program)), "{program}");
        }
    }

    #[test]
    fn test_operation() {
        assert_eq!(ArchiverTool::operation("rcs"), Some('r'));
        assert_eq!(ArchiverTool::operation("cr"), Some('r'));
        assert_eq!(ArchiverTool::operation("qc"), Some('q'));
        assert_eq!(ArchiverTool::operation("s"), Some('s'));
        assert_eq!(ArchiverTool::operation("tv"), Some('t'));
        assert_eq!(ArchiverTool::operation("c"), None);
    }

    #[test]
    fn test_create_archive() {
        let execution = create_execution(vec!["ar", "rcs", "libfoo.a", "a.o", "b.o"]);

        let result = ArchiverTool::new().recognize(&execution);

        assert_eq!(
            result,
            Ok(Semantic::Link {
                inputs: vec![PathBuf::from("a.o"), PathBuf::from("b.o")],
                output_file: Some(PathBuf::from("libfoo.a")),
                flags: vec!["rcs".to_string()],
            })
        );
    }

    #[test]
    fn test_dash_led_key_with_position_modifier() {
        let execution = create_execution(vec!["ar", "-rb", "b.o", "libfoo.a", "a.o"]);

        let result = ArchiverTool::new().recognize(&execution);

        assert_eq!(
            result,
            Ok(Semantic::Link {
                inputs: vec![PathBuf::from("a.o")],
                output_file: Some(PathBuf::from("libfoo.a")),
                flags: vec!["-rb".to_string()],
            })
        );
    }

    #[test]
    fn test_list_and_print_are_queries() {
        for key in ["t", "tv", "p"] {
            let execution = create_execution(vec!["ar", key, "libfoo.a"]);
            assert_eq!(ArchiverTool::new().recognize(&execution), Ok(Semantic::QueryOnly), "{key}");
        }
    }

    #[test]
    fn test_other_operations_are_unknown() {
        let execution = create_execution(vec!["ar", "x", "libfoo.a"]);

        assert_eq!(ArchiverTool::new().recognize(&execution), Ok(Semantic::Unknown));
    }

    #[test]
    fn test_missing_archive() {
        let execution = create_execution(vec!["ar", "rcs"]);

        assert!(matches!(
            ArchiverTool::new().recognize(&execution),
            Err(RecognitionError::MalformedInvocation(_))
        ));
    }

    #[test]
    fn test_options_before_the_key() {
        let execution = create_execution(vec![
            "ar",
            "--plugin",
            "/usr/lib/gcc/x86_64-linux-gnu/13/liblto_plugin.so",
            "rcs",
            "libfoo.a",
            "a.o",
            "b.o",
        ]);

        let result = ArchiverTool::new().recognize(&execution);

        assert_eq!(
            result,
            Ok(Semantic::Link {
                inputs: vec![PathBuf::from("a.o"), PathBuf::from("b.o")],
                output_file: Some(PathBuf::from("libfoo.a")),
                flags: vec!["rcs".to_string()],
            })
        );
    }

    #[test]
    fn test_options_with_equal_sign_before_the_key() {
        let execution = create_execution(vec![
            "ar",
            "--plugin=/usr/lib/liblto_plugin.so",
            "-X32_64",
            "--target=elf64-x86-64",
            "qc",
            "libbar.a",
            "c.o",
        ]);

        let result = ArchiverTool::new().recognize(&execution);

        assert_eq!(
            result,
            Ok(Semantic::Link {
                inputs: vec![PathBuf::from("c.o")],
                output_file: Some(PathBuf::from("libbar.a")),
                flags: vec!["qc".to_string()],
            })
        );
    }

    #[test]
    fn test_truncated_plugin_option() {
        let execution = create_execution(vec!["ar", "--plugin"]);

        assert!(matches!(
            ArchiverTool::new().recognize(&execution),
            Err(RecognitionError::TruncatedFlag { .. })
        ));
    }

    #[test]
    fn test_missing_operation_key() {
        let execution = create_execution(vec!["ar"]);

        assert!(matches!(
            ArchiverTool::new().recognize(&execution),
            Err(RecognitionError::MalformedInvocation(_))
        ));
    }

    #[test]
    fn test_version_query() {
        let execution = create_execution(vec!["ar", "--version"]);

        assert_eq!(ArchiverTool::new().recognize(&execution), Ok(Semantic::QueryOnly));
    }
}
