// SPDX-License-Identifier: GPL-3.0-or-later

//! NVIDIA CUDA compiler driver (nvcc).
//!
//! nvcc splits the device code from the host code, and compiles the host part
//! with GCC or Clang. It understands most of the GCC flags, and has long and
//! short spellings for its own.
//!
//! https://docs.nvidia.com/cuda/cuda-compiler-driver-nvcc/

use super::CompilerTool;
use super::gcc::GCC_RULES;
use crate::semantic::flags::{Category, FlagPattern, FlagRule, FlagTable};
use regex_lite::Regex;
use std::sync::LazyLock;

pub fn tool() -> CompilerTool {
    let pattern = Regex::new(r"^nvcc(?:-[\d.]+)?$").expect("Invalid CUDA regex pattern");

    CompilerTool::new("cuda", pattern, &CUDA_FLAGS).with_environment()
}

#[rustfmt::skip]
static CUDA_FLAGS: LazyLock<FlagTable> = LazyLock::new(|| {
    let mut rules = GCC_RULES.clone();
    rules.extend([
        // compilation phases
        FlagRule::new(FlagPattern::Exactly("--compile", 0), Category::StopAfterCompile),
        FlagRule::new(FlagPattern::Exactly("--device-c", 0), Category::StopAfterCompile),
        FlagRule::new(FlagPattern::Exactly("-dc", 0), Category::StopAfterCompile),
        FlagRule::new(FlagPattern::Exactly("--device-w", 0), Category::StopAfterCompile),
        FlagRule::new(FlagPattern::Exactly("-dw", 0), Category::StopAfterCompile),
        FlagRule::new(FlagPattern::Exactly("--ptx", 0), Category::StopAfterCompile),
        FlagRule::new(FlagPattern::Exactly("-ptx", 0), Category::StopAfterCompile),
        FlagRule::new(FlagPattern::Exactly("--cubin", 0), Category::StopAfterCompile),
        FlagRule::new(FlagPattern::Exactly("-cubin", 0), Category::StopAfterCompile),
        FlagRule::new(FlagPattern::Exactly("--fatbin", 0), Category::StopAfterCompile),
        FlagRule::new(FlagPattern::Exactly("-fatbin", 0), Category::StopAfterCompile),
        FlagRule::new(FlagPattern::Exactly("--preprocess", 0), Category::StopAfterPreprocess),
        FlagRule::new(FlagPattern::Exactly("--device-link", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-dlink", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("--link", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("--lib", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-lib", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("--run", 0), Category::ConsumedNoOp),
        // output
        FlagRule::new(FlagPattern::WithEqOrSeparate("--output-file"), Category::OutputFile),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--output-directory"), Category::Kept),
        FlagRule::new(FlagPattern::WithEqOrSeparate("-odir"), Category::Kept),
        // target architecture
        FlagRule::new(FlagPattern::WithEqOrSeparate("--gpu-architecture"), Category::Both),
        FlagRule::new(FlagPattern::WithEqOrSeparate("-arch"), Category::Both),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--gpu-code"), Category::Both),
        FlagRule::new(FlagPattern::WithEqOrSeparate("-code"), Category::Both),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--generate-code"), Category::Both),
        FlagRule::new(FlagPattern::WithEqOrSeparate("-gencode"), Category::Both),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--machine"), Category::Both),
        // host compiler
        FlagRule::new(FlagPattern::WithEqOrSeparate("--compiler-bindir"), Category::Both),
        FlagRule::new(FlagPattern::WithEqOrSeparate("-ccbin"), Category::Both),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--compiler-options"), Category::CompileOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("-Xcompiler"), Category::CompileOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--linker-options"), Category::LinkOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--cudart"), Category::LinkOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("-cudart"), Category::LinkOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--cuda-path"), Category::Both),
        // code generation
        FlagRule::new(FlagPattern::WithEqOrSeparate("--relocatable-device-code"), Category::Both),
        FlagRule::new(FlagPattern::WithEqOrSeparate("-rdc"), Category::Both),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--maxrregcount"), Category::CompileOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("-maxrregcount"), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("--use_fast_math", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-use_fast_math", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--ftz"), Category::CompileOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--prec-div"), Category::CompileOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--prec-sqrt"), Category::CompileOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--fmad"), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("--device-debug", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-G", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("--generate-line-info", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-lineinfo", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--optimize"), Category::Both),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--std"), Category::CompileOnly),
        FlagRule::new(FlagPattern::Prefix("--extended-lambda", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("-extended-lambda", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("--expt-extended-lambda", 0), Category::CompileOnly),
        FlagRule::new(FlagPattern::Exactly("--expt-relaxed-constexpr", 0), Category::CompileOnly),
        // preprocessor and search paths
        FlagRule::new(FlagPattern::WithEqOrSeparate("--include-path"), Category::CompileOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--define-macro"), Category::CompileOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--library-path"), Category::LinkOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--library"), Category::LinkOnly),
        // diagnostics and intermediate files
        FlagRule::new(FlagPattern::Prefix("--disable-warnings", 0), Category::Kept),
        FlagRule::new(FlagPattern::Exactly("--keep", 0), Category::ConsumedNoOp),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--keep-dir"), Category::ConsumedNoOp),
        FlagRule::new(FlagPattern::Exactly("--verbose", 0), Category::Query),
        FlagRule::new(FlagPattern::Exactly("--dryrun", 0), Category::Query),
        FlagRule::new(FlagPattern::Exactly("-dryrun", 0), Category::Query),
    ]);
    FlagTable::new(rules)
});
