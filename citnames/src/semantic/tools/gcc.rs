// SPDX-License-Identifier: GPL-3.0-or-later

//! GCC and the GNU compatible compiler drivers.
//!
//! The flag grammar of this module is the base of the other driver families
//! (Clang, MPI wrappers), which extend the rule list with their own flags.
//!
//! https://gcc.gnu.org/onlinedocs/gcc/Option-Summary.html

use super::CompilerTool;
use crate::semantic::flags::{Category, FlagPattern, FlagRule, FlagTable};
use regex_lite::Regex;
use std::sync::LazyLock;

/// Creates the tool for `gcc`, `g++`, `cc`, `c++` and `gfortran` (with
/// cross-compilation prefixes and version suffixes).
pub fn tool() -> CompilerTool {
    let pattern =
        Regex::new(r"^(?:[^/]*-)?(?:gcc|g\+\+|cc|c\+\+|gfortran|f77|f90|f95|f03|f08)(?:-[\d.]+)?$")
            .expect("Invalid GCC regex pattern");

    CompilerTool::new("gcc", pattern, &GCC_FLAGS).with_environment()
}

static GCC_FLAGS: LazyLock<FlagTable> = LazyLock::new(|| FlagTable::new(GCC_RULES.clone()));

/// GCC flag definitions.
#[rustfmt::skip]
pub static GCC_RULES: LazyLock<Vec<FlagRule>> = LazyLock::new(|| {
    vec![
        // overall options
        FlagRule::new(FlagPattern::Exactly("-c", 0), Category::StopAfterCompile),
        FlagRule::new(FlagPattern::Exactly("-S", 0), Category::StopAfterCompile),
        FlagRule::new(FlagPattern::Exactly("-fsyntax-only", 0), Category::StopAfterCompile),
        FlagRule::new(FlagPattern::Exactly("-E", 0), Category::StopAfterPreprocess),
        FlagRule::new(FlagPattern::GluedOrSeparate("-o"), Category::OutputFile),
        FlagRule::new(FlagPattern::GluedOrSeparate("-x"), Category::Language),
        FlagRule::new(FlagPattern::Exactly("-pipe", 0), Category::ConsumedNoOp),
        FlagRule::new(FlagPattern::Exactly("-wrapper", 1), Category::ConsumedNoOp),
        FlagRule::new(FlagPattern::Prefix("-save-temps", 0), Category::ConsumedNoOp),
        FlagRule::new(FlagPattern::WithEqOrSeparate("-specs"), Category::Both),
        FlagRule::new(FlagPattern::Prefix("@", 0), Category::Kept),
        // informational calls
        FlagRule::new(FlagPattern::Exactly("-v", 0), Category::Query),
        FlagRule::new(FlagPattern::Exactly("-###", 0), Category::Query),
        FlagRule::new(FlagPattern::Prefix("--help", 0), Category::Query),
        FlagRule::new(FlagPattern::Exactly("--version", 0), Category::Query),
        FlagRule::new(FlagPattern::Exactly("-dumpversion", 0), Category::Query),
        FlagRule::new(FlagPattern::Exactly("-dumpfullversion", 0), Category::Query),
        FlagRule::new(FlagPattern::Exactly("-dumpmachine", 0), Category::Query),
        FlagRule::new(FlagPattern::Exactly("-dumpspecs", 0), Category::Query),
        FlagRule::new(FlagPattern::Prefix("-print-", 0), Category::Query),
        // language dialect
        FlagRule::new(FlagPattern::Exactly("-ansi", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("-std"), Category::CompileOnly),
        FlagRule::new(FlagPattern::Prefix("-pedantic", 0), Category::Kept),
        // debugging, optimization and code generation
        FlagRule::new(FlagPattern::Prefix("-g", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Prefix("-O", 0), Category::Both),
        FlagRule::new(FlagPattern::Prefix("-f", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Prefix("-fPIC", 0), Category::Both),
        FlagRule::new(FlagPattern::Prefix("-fPIE", 0), Category::Both),
        FlagRule::new(FlagPattern::Prefix("-flto", 0), Category::Both),
        FlagRule::new(FlagPattern::Prefix("-fopenmp", 0), Category::Both),
        FlagRule::new(FlagPattern::Prefix("-fsanitize", 0), Category::Both),
        FlagRule::new(FlagPattern::Prefix("-fprofile-", 0), Category::Both),
        FlagRule::new(FlagPattern::Prefix("-fuse-ld=", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--param"), Category::CompileOnly),
        FlagRule::new(FlagPattern::Prefix("-m", 0), Category::Both),
        FlagRule::new(FlagPattern::Prefix("-d", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-aux-info", 1), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-p", 0), Category::Both),
        FlagRule::new(FlagPattern::Exactly("-pg", 0), Category::Both),
        FlagRule::new(FlagPattern::Exactly("--coverage", 0), Category::Both),
        FlagRule::new(FlagPattern::Exactly("-pthread", 0), Category::Both),
        // warnings
        FlagRule::new(FlagPattern::Exactly("-w", 0), Category::Kept),
        FlagRule::new(FlagPattern::Prefix("-W", 0), Category::Kept),
        // preprocessor
        FlagRule::new(FlagPattern::GluedOrSeparate("-D"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-U"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-include"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-imacros"), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-C", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-CC", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-P", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Prefix("-traditional", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-trigraphs", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-undef", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Prefix("-Wp,", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-Xpreprocessor", 1), Category::CompileOnly),
        // dependency generation
        FlagRule::new(FlagPattern::Exactly("-M", 0), Category::StopAfterPreprocess),
        FlagRule::new(FlagPattern::Exactly("-MM", 0), Category::StopAfterPreprocess),
        FlagRule::new(FlagPattern::Exactly("-MD", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-MMD", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-MG", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-MP", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-MF"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-MT"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-MQ"), Category::CompileOnly),
        // directory search
        FlagRule::new(FlagPattern::GluedOrSeparate("-I"), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-I-", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-iquote"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-isystem"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-idirafter"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-iprefix"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-iwithprefix"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-iwithprefixbefore"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-imultilib"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-isysroot"), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-nostdinc", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-nostdinc++", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--sysroot"), Category::Both),
        FlagRule::new(FlagPattern::GluedOrSeparate("-B"), Category::Both),
        // Fortran module directory
        FlagRule::new(FlagPattern::GluedOrSeparate("-J"), Category::CompileOnly),
        // assembler
        FlagRule::new(FlagPattern::Prefix("-Wa,", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-Xassembler", 1), Category::CompileOnly),
        // linker
        FlagRule::new(FlagPattern::GluedOrSeparate("-L"), Category::LinkOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-l"), Category::LinkOnly),
        FlagRule::new(FlagPattern::Prefix("-Wl,", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-Xlinker", 1), Category::LinkOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-T"), Category::LinkOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-u"), Category::LinkOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-z"), Category::LinkOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-e"), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-r", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-s", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-nostartfiles", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-nodefaultlibs", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-nolibc", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-nostdlib", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-nostdlib++", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-static", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-static-pie", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Prefix("-static-lib", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-shared", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-shared-libgcc", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-pie", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-no-pie", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-rdynamic", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-symbolic", 0), Category::LinkOnly),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::{Execution, RecognitionError, Semantic, Tool};
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    fn create_execution(executable: &str, args: Vec<&str>) -> Execution {
        Execution::from_strings(executable, args, "/project", HashMap::new())
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn test_program_recognition() {
        let sut = tool();

        for program in [
            "gcc",
            "g++",
            "cc",
            "c++",
            "/usr/bin/gcc",
            "arm-linux-gnueabi-gcc",
            "x86_64-w64-mingw32-g++",
            "gcc-11",
            "gcc-11.2",
            "gfortran",
            "gcc.exe",
        ] {
            assert!(sut.is_compiler_call(Path::new(program)), "{program}");
        }
        for program in ["make", "clang", "gcc-ar", "mpicc", "nvcc", "ld", "gccx"] {
            assert!(!sut.is_compiler_call(Path::new(program)), "{program}");
        }
    }

    #[test]
    fn test_simple_compilation() {
        let execution = create_execution("gcc", vec!["gcc", "-c", "foo.c", "-o", "foo.o", "-Wall"]);

        let result = tool().recognize(&execution);

        assert_eq!(
            result,
            Ok(Semantic::Compile {
                source_files: vec![PathBuf::from("foo.c")],
                output_file: Some(PathBuf::from("foo.o")),
                flags: strings(&["-Wall"]),
                language: None,
            })
        );
    }

    #[test]
    fn test_combined_and_separate_flags() {
        let execution = create_execution(
            "/usr/bin/g++",
            vec![
                "g++", "-I/usr/include", "-D", "DEBUG=1", "-std=c++17", "-O2", "-ofoo.o", "-c",
                "foo.cpp", "-MD", "-MF", "foo.d",
            ],
        );

        let result = tool().recognize(&execution);

        assert_eq!(
            result,
            Ok(Semantic::Compile {
                source_files: vec![PathBuf::from("foo.cpp")],
                output_file: Some(PathBuf::from("foo.o")),
                flags: strings(&[
                    "-I/usr/include",
                    "-D",
                    "DEBUG=1",
                    "-std=c++17",
                    "-O2",
                    "-MD",
                    "-MF",
                    "foo.d",
                ]),
                language: None,
            })
        );
    }

    #[test]
    fn test_linking() {
        let execution = create_execution("gcc", vec!["gcc", "foo.o", "bar.o", "-o", "app", "-lm"]);

        let result = tool().recognize(&execution);

        assert_eq!(
            result,
            Ok(Semantic::Link {
                inputs: vec![PathBuf::from("foo.o"), PathBuf::from("bar.o")],
                output_file: Some(PathBuf::from("app")),
                flags: strings(&["-lm"]),
            })
        );
    }

    #[test]
    fn test_shared_library_link() {
        let execution = create_execution(
            "gcc",
            vec!["gcc", "-shared", "-fPIC", "-o", "libfoo.so", "foo.o", "-Wl,-soname,libfoo.so.1"],
        );

        let result = tool().recognize(&execution);

        assert_eq!(
            result,
            Ok(Semantic::Link {
                inputs: vec![PathBuf::from("foo.o")],
                output_file: Some(PathBuf::from("libfoo.so")),
                flags: strings(&["-shared", "-fPIC", "-Wl,-soname,libfoo.so.1"]),
            })
        );
    }

    #[test]
    fn test_queries() {
        for args in [
            vec!["gcc", "--version"],
            vec!["gcc", "-dumpmachine"],
            vec!["gcc", "-print-file-name=libc.a"],
            vec!["gcc", "-v"],
        ] {
            let execution = create_execution("gcc", args.clone());
            assert_eq!(tool().recognize(&execution), Ok(Semantic::QueryOnly), "{args:?}");
        }
    }

    #[test]
    fn test_compile_without_source_is_malformed() {
        let execution = create_execution("gcc", vec!["gcc", "-c"]);

        let result = tool().recognize(&execution);

        assert!(matches!(result, Err(RecognitionError::MalformedInvocation(_))));
    }

    #[test]
    fn test_truncated_flag() {
        let execution = create_execution("gcc", vec!["gcc", "-c", "foo.c", "-o"]);

        let result = tool().recognize(&execution);

        assert_eq!(
            result,
            Err(RecognitionError::TruncatedFlag {
                flag: "-o".to_string(),
                expected: 1,
                found: 0,
            })
        );
    }

    #[test]
    fn test_preprocessing() {
        let execution = create_execution("cc", vec!["cc", "-E", "-DNDEBUG", "main.c"]);

        let result = tool().recognize(&execution);

        assert_eq!(
            result,
            Ok(Semantic::Preprocess {
                source_files: vec![PathBuf::from("main.c")],
                flags: strings(&["-DNDEBUG"]),
                language: None,
            })
        );
    }

    #[test]
    fn test_dependency_generation_is_preprocessing() {
        let execution = create_execution("gcc", vec!["gcc", "-MM", "main.c"]);

        let result = tool().recognize(&execution);

        assert!(matches!(result, Ok(Semantic::Preprocess { .. })));
    }

    #[test]
    fn test_language_override() {
        let execution = create_execution("gcc", vec!["gcc", "-c", "-x", "c++", "source.inc"]);

        let result = tool().recognize(&execution);

        assert_eq!(
            result,
            Ok(Semantic::Compile {
                source_files: vec![PathBuf::from("source.inc")],
                output_file: None,
                flags: strings(&["-x", "c++"]),
                language: Some("c++".to_string()),
            })
        );
    }

    #[test]
    fn test_unknown_flags_are_kept() {
        let execution = create_execution("gcc", vec!["gcc", "-c", "-weird-flag", "main.c"]);

        let result = tool().recognize(&execution);

        assert_eq!(
            result,
            Ok(Semantic::Compile {
                source_files: vec![PathBuf::from("main.c")],
                output_file: None,
                flags: strings(&["-weird-flag"]),
                language: None,
            })
        );
    }

    #[test]
    fn test_environment_include_paths() {
        let execution = Execution::from_strings(
            "gcc",
            vec!["gcc", "-c", "main.c"],
            "/project",
            HashMap::from([("C_INCLUDE_PATH", "/opt/include"), ("OBJC_INCLUDE_PATH", "/opt/objc")]),
        );

        let result = tool().recognize(&execution);

        assert_eq!(
            result,
            Ok(Semantic::Compile {
                source_files: vec![PathBuf::from("main.c")],
                output_file: None,
                flags: strings(&["-I", "/opt/include", "-isystem", "/opt/objc"]),
                language: None,
            })
        );
    }

    #[test]
    fn test_not_applicable() {
        let execution = create_execution("make", vec!["make", "-j4"]);

        assert_eq!(tool().recognize(&execution), Err(RecognitionError::NotApplicable));
    }
}
