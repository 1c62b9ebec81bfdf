// SPDX-License-Identifier: GPL-3.0-or-later

//! Clang and Flang compiler drivers.
//!
//! The drivers accept the GCC flags, with extensions for cross compilation,
//! the static analyzer, and the Fortran frontend. A call with `-cc1` is the
//! driver calling its own frontend, that is not a build step on its own.
//!
//! https://clang.llvm.org/docs/ClangCommandLineReference.html

use super::CompilerTool;
use super::gcc::GCC_RULES;
use crate::semantic::flags::{Category, FlagPattern, FlagRule, FlagTable};
use regex_lite::Regex;
use std::sync::LazyLock;

pub fn tool() -> CompilerTool {
    let pattern = Regex::new(r"^(?:[^/]*-)?(?:clang(?:\+\+)?|flang(?:-new)?)(?:-[\d.]+)?$")
        .expect("Invalid Clang regex pattern");

    CompilerTool::new("clang", pattern, &CLANG_FLAGS)
        .with_environment()
        .with_internal_marker("-cc1")
}

#[rustfmt::skip]
static CLANG_FLAGS: LazyLock<FlagTable> = LazyLock::new(|| {
    let mut rules = GCC_RULES.clone();
    rules.extend([
        // cross compilation
        FlagRule::new(FlagPattern::Exactly("-target", 1), Category::Both),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--target"), Category::Both),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--gcc-toolchain"), Category::Both),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--gcc-install-dir"), Category::Both),
        FlagRule::new(FlagPattern::Exactly("-arch", 1), Category::Both),
        FlagRule::new(FlagPattern::Prefix("-Xarch_", 1), Category::Kept),
        FlagRule::new(FlagPattern::WithEq("-stdlib"), Category::Both),
        FlagRule::new(FlagPattern::WithEq("--rtlib"), Category::LinkOnly),
        FlagRule::new(FlagPattern::WithEq("-rtlib"), Category::LinkOnly),
        FlagRule::new(FlagPattern::WithEq("--unwindlib"), Category::LinkOnly),
        FlagRule::new(FlagPattern::WithEq("-unwindlib"), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-resource-dir", 1), Category::Both),
        FlagRule::new(FlagPattern::Exactly("--config", 1), Category::Both),
        // frontend and backend pass-through
        FlagRule::new(FlagPattern::Exactly("-Xclang", 1), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-Xflang", 1), Category::CompileOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("-mllvm"), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-Xanalyzer", 1), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-Xopenmp-target", 1), Category::Both),
        FlagRule::new(FlagPattern::Prefix("-Xcuda", 1), Category::CompileOnly),
        // output kinds
        FlagRule::new(FlagPattern::Exactly("--analyze", 0), Category::StopAfterCompile),
        FlagRule::new(FlagPattern::Exactly("-emit-llvm", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-emit-ast", 0), Category::StopAfterCompile),
        FlagRule::new(FlagPattern::Exactly("-MJ", 1), Category::ConsumedNoOp),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--output"), Category::OutputFile),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--language"), Category::Language),
        // CUDA and HIP
        FlagRule::new(FlagPattern::WithEqOrSeparate("--cuda-path"), Category::Both),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--cuda-gpu-arch"), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("--cuda-host-only", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("--cuda-device-only", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--hip-path"), Category::Both),
        FlagRule::new(FlagPattern::Exactly("--hip-link", 0), Category::LinkOnly),
        // Darwin linker
        FlagRule::new(FlagPattern::Exactly("-framework", 1), Category::LinkOnly),
        FlagRule::new(FlagPattern::Prefix("-F", 0), Category::Both),
        FlagRule::new(FlagPattern::Exactly("-dynamiclib", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-bundle", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-install_name", 1), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-force_load", 1), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-all_load", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-dead_strip", 0), Category::LinkOnly),
        // plugins
        FlagRule::new(FlagPattern::Exactly("-load", 1), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-plugin", 1), Category::CompileOnly),
        FlagRule::new(FlagPattern::Prefix("-plugin-arg-", 1), Category::CompileOnly),
        // Flang
        FlagRule::new(FlagPattern::Exactly("-module-dir", 1), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-cpp", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-nocpp", 0), Category::CompileOnly),
    ]);
    FlagTable::new(rules)
});
