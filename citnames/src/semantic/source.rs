// SPDX-License-Identifier: GPL-3.0-or-later

//! File kind detection by the extension of the file name.
//!
//! These checks are syntactic. The file is never opened, and it does not
//! need to exist.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

/// Checks if the positional argument names a file which a compiler driver
/// would compile (or preprocess) rather than pass to the linker.
pub fn looks_like_a_source_file(argument: &str) -> bool {
    Path::new(argument)
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| SOURCE_EXTENSIONS.contains(extension))
}

// Upper case variants are listed explicitly, because those mean a different
// language for the drivers (`.F` is Fortran to preprocess, `.C` is C++).
#[rustfmt::skip]
static SOURCE_EXTENSIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        // header files (precompiled header generation)
        "h", "hh", "H", "hp", "hxx", "hpp", "HPP", "h++", "tcc",
        // C
        "c",
        // C++
        "C", "cc", "CC", "c++", "C++", "cxx", "cpp", "cp", "CPP", "ixx", "cppm",
        // CUDA
        "cu",
        // Objective-C and Objective-C++
        "m", "mi", "mm", "M", "mii",
        // preprocessed
        "i", "ii",
        // assembly
        "s", "S", "sx", "asm",
        // Fortran
        "f", "for", "ftn", "fpp",
        "F", "FOR", "FTN", "FPP",
        "f90", "f95", "f03", "f08",
        "F90", "F95", "F03", "F08",
        // D
        "d", "di",
        // Ada
        "ads", "adb",
    ])
});
