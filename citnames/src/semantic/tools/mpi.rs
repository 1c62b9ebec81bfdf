// SPDX-License-Identifier: GPL-3.0-or-later

//! MPI compiler wrapper scripts (Open MPI, MPICH, Intel MPI).
//!
//! The wrappers call the underlying compiler with extra include and library
//! flags, so the command line is GCC compatible. The wrapper specific flags
//! print the underlying command line without running it.

use super::CompilerTool;
use super::gcc::GCC_RULES;
use crate::semantic::flags::{Category, FlagPattern, FlagRule, FlagTable};
use regex_lite::Regex;
use std::sync::LazyLock;

pub fn tool() -> CompilerTool {
    let pattern = Regex::new(
        r"^(?:mpicc|mpicxx|mpic\+\+|mpiCC|mpif77|mpif90|mpifort|mpiicc|mpiicpc|mpiicx|mpiicpx|mpiifort|mpiifx)(?:-[\d.]+)?$",
    )
    .expect("Invalid MPI regex pattern");

    CompilerTool::new("mpi", pattern, &MPI_FLAGS).with_environment()
}

static MPI_FLAGS: LazyLock<FlagTable> = LazyLock::new(|| {
    let mut rules = GCC_RULES.clone();
    rules.extend([
        // Open MPI
        FlagRule::new(FlagPattern::Prefix("-showme", 0), Category::Query),
        // MPICH
        FlagRule::new(FlagPattern::Exactly("-show", 0), Category::Query),
        FlagRule::new(FlagPattern::Exactly("-compile_info", 0), Category::Query),
        FlagRule::new(FlagPattern::Exactly("-compile-info", 0), Category::Query),
        FlagRule::new(FlagPattern::Exactly("-link_info", 0), Category::Query),
        FlagRule::new(FlagPattern::Exactly("-link-info", 0), Category::Query),
    ]);
    FlagTable::new(rules)
});
