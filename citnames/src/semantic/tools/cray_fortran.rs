// SPDX-License-Identifier: GPL-3.0-or-later

//! Cray Fortran compiler (crayftn, and the `ftn` driver of the Cray
//! Programming Environment).
//!
//! Most of the Cray flags are single letters with an operand, glued or as a
//! separate argument (`-J dir`, `-hflex_mp=strict`).
//!
//! https://support.hpe.com/hpesc/public/docDisplay?docId=a00115296en_us&page=Fortran_Command-line_Options.html

use super::CompilerTool;
use crate::semantic::flags::{Category, FlagPattern, FlagRule, FlagTable};
use regex_lite::Regex;
use std::sync::LazyLock;

pub fn tool() -> CompilerTool {
    let pattern =
        Regex::new(r"^(?:crayftn|ftn)(?:-[\d.]+)?$").expect("Invalid Cray Fortran regex pattern");

    CompilerTool::new("cray_fortran", pattern, &CRAY_FORTRAN_FLAGS)
}

#[rustfmt::skip]
static CRAY_FORTRAN_FLAGS: LazyLock<FlagTable> = LazyLock::new(|| {
    FlagTable::new(vec![
        // overall options
        FlagRule::new(FlagPattern::Exactly("-c", 0), Category::StopAfterCompile),
        FlagRule::new(FlagPattern::Exactly("-S", 0), Category::StopAfterCompile),
        FlagRule::new(FlagPattern::Exactly("-E", 0), Category::StopAfterPreprocess),
        FlagRule::new(FlagPattern::Exactly("-eZ", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-o"), Category::OutputFile),
        FlagRule::new(FlagPattern::Exactly("-F", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-T", 0), Category::Query),
        FlagRule::new(FlagPattern::Exactly("-V", 0), Category::Query),
        FlagRule::new(FlagPattern::Exactly("--version", 0), Category::Query),
        FlagRule::new(FlagPattern::Exactly("-v", 0), Category::Kept),
        FlagRule::new(FlagPattern::Exactly("-VV", 0), Category::Kept),
        FlagRule::new(FlagPattern::Exactly("-VVV", 0), Category::Kept),
        // compiler behavior, single letter flags with operand
        FlagRule::new(FlagPattern::GluedOrSeparate("-A"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-b"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-d"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-e"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-f"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-G"), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-g", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-h"), Category::Both),
        FlagRule::new(FlagPattern::GluedOrSeparate("-K"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-m"), Category::Kept),
        FlagRule::new(FlagPattern::GluedOrSeparate("-M"), Category::Kept),
        FlagRule::new(FlagPattern::GluedOrSeparate("-N"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-O"), Category::Both),
        FlagRule::new(FlagPattern::GluedOrSeparate("-Q"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-r"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-R"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-s"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-W"), Category::Kept),
        FlagRule::new(FlagPattern::GluedOrSeparate("-x"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-Y"), Category::CompileOnly),
        // preprocessor and modules
        FlagRule::new(FlagPattern::GluedOrSeparate("-D"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-U"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-I"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-J"), Category::CompileOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-p"), Category::CompileOnly),
        // target
        FlagRule::new(FlagPattern::WithEq("-target-cpu"), Category::Both),
        FlagRule::new(FlagPattern::WithEq("-target-accel"), Category::Both),
        FlagRule::new(FlagPattern::WithEq("-target-network"), Category::Both),
        FlagRule::new(FlagPattern::Prefix("--cray", 0), Category::Both),
        FlagRule::new(FlagPattern::Prefix("-cray", 0), Category::Both),
        FlagRule::new(FlagPattern::Exactly("-openmp", 0), Category::Both),
        FlagRule::new(FlagPattern::Exactly("-noopenmp", 0), Category::Both),
        FlagRule::new(FlagPattern::Exactly("-mp", 0), Category::Both),
        FlagRule::new(FlagPattern::Exactly("-Mnoopenmp", 0), Category::Both),
        FlagRule::new(FlagPattern::Exactly("-qno-openmp", 0), Category::Both),
        FlagRule::new(FlagPattern::Exactly("-default64", 0), Category::Both),
        // linker
        FlagRule::new(FlagPattern::GluedOrSeparate("-L"), Category::LinkOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-l"), Category::LinkOnly),
        FlagRule::new(FlagPattern::Prefix("-Wl,", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-dynamic", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-shared", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-static", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-as-needed", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("--as-needed", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-no-as-needed", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("--no-as-needed", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-add-rpath", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-no-add-rpath", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-add-rpath-shared", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-no-add-rpath-shared", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-add-runpath", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-no-add-runpath", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-gcc-rpath", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-no-gcc-rpath", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--custom-ld-script"), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("--no-custom-ld-script", 0), Category::LinkOnly),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::{Execution, Semantic, Tool};
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    fn create_execution(args: Vec<&str>) -> Execution {
        Execution::from_strings("/opt/cray/bin/ftn", args, "/project", HashMap::new())
    }

    #[test]
    fn test_program_recognition() {
        let sut = tool();

        assert!(sut.is_compiler_call(Path::new("ftn")));
        assert!(sut.is_compiler_call(Path::new("/opt/cray/pe/bin/crayftn")));
        assert!(!sut.is_compiler_call(Path::new("gfortran")));
        assert!(!sut.is_compiler_call(Path::new("ftnchek")));
    }

    #[test]
    fn test_module_output_directory() {
        let execution = create_execution(vec!["ftn", "-c", "mod.f90", "-J", "build/"]);

        let result = tool().recognize(&execution);

        assert_eq!(
            result,
            Ok(Semantic::Compile {
                source_files: vec![PathBuf::from("mod.f90")],
                output_file: None,
                flags: vec!["-J".to_string(), "build/".to_string()],
                language: None,
            })
        );
    }

    #[test]
    fn test_glued_and_separate_operands() {
        let execution = create_execution(vec![
            "ftn", "-hflex_mp=strict", "-O", "2", "-e", "Z", "-c", "solver.F90", "-osolver.o",
        ]);

        let result = tool().recognize(&execution);

        assert_eq!(
            result,
            Ok(Semantic::Compile {
                source_files: vec![PathBuf::from("solver.F90")],
                output_file: Some(PathBuf::from("solver.o")),
                flags: vec![
                    "-hflex_mp=strict".to_string(),
                    "-O".to_string(),
                    "2".to_string(),
                    "-e".to_string(),
                    "Z".to_string(),
                ],
                language: None,
            })
        );
    }

    #[test]
    fn test_linking() {
        let execution =
            create_execution(vec!["ftn", "main.o", "mod.o", "-dynamic", "-o", "simulation"]);

        let result = tool().recognize(&execution);

        assert_eq!(
            result,
            Ok(Semantic::Link {
                inputs: vec![PathBuf::from("main.o"), PathBuf::from("mod.o")],
                output_file: Some(PathBuf::from("simulation")),
                flags: vec!["-dynamic".to_string()],
            })
        );
    }

    #[test]
    fn test_version_query() {
        let execution = create_execution(vec!["ftn", "-V"]);

        assert_eq!(tool().recognize(&execution), Ok(Semantic::QueryOnly));
    }
}
