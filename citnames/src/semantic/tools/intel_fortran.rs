// SPDX-License-Identifier: GPL-3.0-or-later

//! Intel Fortran compilers (ifort, ifx).
//!
//! The Linux drivers accept a GCC like syntax, but the flag set is their own.
//!
//! https://www.intel.com/content/www/us/en/docs/fortran-compiler/developer-guide-reference/

use super::CompilerTool;
use crate::semantic::flags::{Category, FlagPattern, FlagRule, FlagTable};
use regex_lite::Regex;
use std::sync::LazyLock;

pub fn tool() -> CompilerTool {
    let pattern =
        Regex::new(r"^(?:ifort|ifx)(?:-[\d.]+)?$").expect("Invalid Intel Fortran regex pattern");

    CompilerTool::new("intel_fortran", pattern, &INTEL_FORTRAN_FLAGS)
}

#[rustfmt::skip]
static INTEL_FORTRAN_FLAGS: LazyLock<FlagTable> = LazyLock::new(|| {
    FlagTable::new(vec![
        // overall options
        FlagRule::new(FlagPattern::Exactly("-c", 0), Category::StopAfterCompile),
        FlagRule::new(FlagPattern::Exactly("-S", 0), Category::StopAfterCompile),
        FlagRule::new(FlagPattern::Exactly("-syntax-only", 0), Category::StopAfterCompile),
        FlagRule::new(FlagPattern::Exactly("-E", 0), Category::StopAfterPreprocess),
        FlagRule::new(FlagPattern::Exactly("-EP", 0), Category::StopAfterPreprocess),
        FlagRule::new(FlagPattern::Exactly("-preprocess-only", 0), Category::StopAfterPreprocess),
        FlagRule::new(FlagPattern::GluedOrSeparate("-o"), Category::OutputFile),
        FlagRule::new(FlagPattern::Exactly("-Tf", 1), Category::InputFile),
        FlagRule::new(FlagPattern::Prefix("@", 0), Category::Kept),
        // informational calls
        FlagRule::new(FlagPattern::Exactly("--version", 0), Category::Query),
        FlagRule::new(FlagPattern::Exactly("-V", 0), Category::Query),
        FlagRule::new(FlagPattern::Exactly("-v", 0), Category::Query),
        FlagRule::new(FlagPattern::Prefix("--help", 0), Category::Query),
        FlagRule::new(FlagPattern::Exactly("-help", 0), Category::Query),
        FlagRule::new(FlagPattern::Exactly("-dumpmachine", 0), Category::Query),
        FlagRule::new(FlagPattern::Exactly("-dryrun", 0), Category::Query),
        // language
        FlagRule::new(FlagPattern::Exactly("-fpp", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-nofpp", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Prefix("-free", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Prefix("-fixed", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::WithEq("-std"), Category::CompileOnly),
        FlagRule::new(FlagPattern::Prefix("-stand", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-assume", 1), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-check", 1), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-warn", 1), Category::Kept),
        FlagRule::new(FlagPattern::Prefix("-diag-", 0), Category::Kept),
        FlagRule::new(FlagPattern::Prefix("-W", 0), Category::Kept),
        FlagRule::new(FlagPattern::Prefix("-Wl,", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Prefix("-Wp,", 0), Category::CompileOnly),
        // code generation
        FlagRule::new(FlagPattern::Prefix("-O", 0), Category::Both),
        FlagRule::new(FlagPattern::Prefix("-g", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-debug", 1), Category::CompileOnly),
        FlagRule::new(FlagPattern::Prefix("-f", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Prefix("-m", 0), Category::Both),
        FlagRule::new(FlagPattern::Prefix("-x", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Prefix("-ax", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Prefix("-qopenmp", 0), Category::Both),
        FlagRule::new(FlagPattern::Prefix("-qmkl", 0), Category::Both),
        FlagRule::new(FlagPattern::Exactly("-pthread", 0), Category::Both),
        FlagRule::new(FlagPattern::Exactly("-gen-interfaces", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-nogen-interfaces", 0), Category::CompileOnly),
        // modules and search paths
        FlagRule::new(FlagPattern::Exactly("-module", 1), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-I"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-D"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-U"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-include"), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-isystem", 1), Category::CompileOnly),
        FlagRule::new(FlagPattern::WithEq("--sysroot"), Category::Both),
        FlagRule::new(FlagPattern::Exactly("-MD", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-MMD", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-MF", 1), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-gen-dep", 1), Category::CompileOnly),
        // linker
        FlagRule::new(FlagPattern::GluedOrSeparate("-L"), Category::LinkOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-l"), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-Xlinker", 1), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-shared", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-static", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-shared-intel", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-static-intel", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-static-libgcc", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-nostartfiles", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-nodefaultlibs", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-nostdlib", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-nofor-main", 0), Category::LinkOnly),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::{Execution, Semantic, Tool};
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    fn create_execution(args: Vec<&str>) -> Execution {
        Execution::from_strings("/opt/intel/bin/ifx", args, "/project", HashMap::new())
    }

    #[test]
    fn test_program_recognition() {
        let sut = tool();

        assert!(sut.is_compiler_call(Path::new("ifort")));
        assert!(sut.is_compiler_call(Path::new("/opt/intel/oneapi/bin/ifx")));
        assert!(sut.is_compiler_call(Path::new("ifx-2024.1")));
        assert!(!sut.is_compiler_call(Path::new("gfortran")));
        assert!(!sut.is_compiler_call(Path::new("x86_64-linux-ifort")));
    }

    #[test]
    fn test_compilation_with_module_directory() {
        let execution =
            create_execution(vec!["ifx", "-c", "-fpp", "-module", "mods", "solver.F90", "-o", "solver.o"]);

        let result = tool().recognize(&execution);

        assert_eq!(
            result,
            Ok(Semantic::Compile {
                source_files: vec![PathBuf::from("solver.F90")],
                output_file: Some(PathBuf::from("solver.o")),
                flags: vec!["-fpp".to_string(), "-module".to_string(), "mods".to_string()],
                language: None,
            })
        );
    }

    #[test]
    fn test_explicit_fortran_source() {
        let execution = create_execution(vec!["ifort", "-c", "-Tf", "legacy.src"]);

        let result = tool().recognize(&execution);

        assert_eq!(
            result,
            Ok(Semantic::Compile {
                source_files: vec![PathBuf::from("legacy.src")],
                output_file: None,
                flags: vec![],
                language: None,
            })
        );
    }

    #[test]
    fn test_linking_with_runtime_libraries() {
        let execution = create_execution(vec!["ifx", "main.o", "solver.o", "-qmkl", "-o", "app"]);

        let result = tool().recognize(&execution);

        assert_eq!(
            result,
            Ok(Semantic::Link {
                inputs: vec![PathBuf::from("main.o"), PathBuf::from("solver.o")],
                output_file: Some(PathBuf::from("app")),
                flags: vec!["-qmkl".to_string()],
            })
        );
    }

    #[test]
    fn test_version_query() {
        let execution = create_execution(vec!["ifx", "--version"]);

        assert_eq!(tool().recognize(&execution), Ok(Semantic::QueryOnly));
    }
}
