// SPDX-License-Identifier: GPL-3.0-or-later

//! Linkers called directly (ld, gold, lld, mold).
//!
//! Linkers have no compile pass: every positional argument is a link input.
//!
//! https://sourceware.org/binutils/docs/ld/Options.html

use super::program_name;
use crate::semantic::flags::{Category, FlagPattern, FlagRule, FlagTable};
use crate::semantic::parser::{MatchedArgument, parse};
use crate::semantic::{Execution, RecognitionError, Semantic, Tool};
use regex_lite::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub struct LinkerTool {
    program: Regex,
}

impl LinkerTool {
    pub fn new() -> Self {
        let program = Regex::new(
            r"^(?:[^/]*-)?(?:ld(?:\.(?:bfd|gold|lld|mold))?|lld|ld64\.lld|ld\.lld|mold)(?:-[\d.]+)?$",
        )
        .expect("Invalid linker regex pattern");

        Self { program }
    }
}

impl Default for LinkerTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for LinkerTool {
    fn name(&self) -> &'static str {
        "linker"
    }

    fn is_compiler_call(&self, program: &Path) -> bool {
        program_name(program).is_some_and(|name| self.program.is_match(name))
    }

    fn interpret(&self, execution: &Execution) -> Result<Semantic, RecognitionError> {
        let matched = parse(&LINKER_FLAGS, execution.parameters())?;

        let mut inputs: Vec<PathBuf> = Vec::new();
        let mut output_file = None;
        let mut flags = Vec::new();
        let mut query = false;
        for argument in matched {
            match argument {
                MatchedArgument::Positional(value) => {
                    let input = PathBuf::from(value);
                    if !inputs.contains(&input) {
                        inputs.push(input);
                    }
                }
                MatchedArgument::Flag(flag) => match flag.category {
                    Category::OutputFile => output_file = flag.operands.last().map(PathBuf::from),
                    Category::Query => query = true,
                    category if category.kept_for_link() => flags.extend(flag.arguments),
                    _ => {}
                },
            }
        }

        if !inputs.is_empty() {
            Ok(Semantic::Link {
                inputs,
                output_file,
                flags,
            })
        } else if query {
            Ok(Semantic::QueryOnly)
        } else {
            Ok(Semantic::Unknown)
        }
    }
}

#[rustfmt::skip]
static LINKER_FLAGS: LazyLock<FlagTable> = LazyLock::new(|| {
    FlagTable::new(vec![
        FlagRule::new(FlagPattern::GluedOrSeparate("-o"), Category::OutputFile),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--output"), Category::OutputFile),
        // informational calls
        FlagRule::new(FlagPattern::Exactly("-v", 0), Category::Query),
        FlagRule::new(FlagPattern::Exactly("-V", 0), Category::Query),
        FlagRule::new(FlagPattern::Exactly("--version", 0), Category::Query),
        FlagRule::new(FlagPattern::Exactly("--help", 0), Category::Query),
        FlagRule::new(FlagPattern::Exactly("--verbose", 0), Category::Query),
        // options with operand
        FlagRule::new(FlagPattern::GluedOrSeparate("-L"), Category::LinkOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-l"), Category::LinkOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--library-path"), Category::LinkOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--library"), Category::LinkOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-T"), Category::LinkOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--script"), Category::LinkOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-e"), Category::LinkOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--entry"), Category::LinkOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-m"), Category::LinkOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-z"), Category::LinkOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-u"), Category::LinkOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--undefined"), Category::LinkOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("-soname"), Category::LinkOnly),
        FlagRule::new(FlagPattern::GluedOrSeparate("-h"), Category::LinkOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("-rpath"), Category::LinkOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("-rpath-link"), Category::LinkOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--sysroot"), Category::LinkOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("-dynamic-linker"), Category::LinkOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--dynamic-linker"), Category::LinkOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("--version-script"), Category::LinkOnly),
        FlagRule::new(FlagPattern::WithEqOrSeparate("-Map"), Category::LinkOnly),
        // link time optimization, added by collect2
        FlagRule::new(FlagPattern::Exactly("-plugin", 1), Category::LinkOnly),
        FlagRule::new(FlagPattern::WithEq("-plugin-opt"), Category::LinkOnly),
        // switches
        FlagRule::new(FlagPattern::Exactly("-shared", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-static", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-pie", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-r", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-s", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Exactly("-g", 0), Category::ConsumedNoOp),
        FlagRule::new(FlagPattern::Prefix("-O", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Prefix("--", 0), Category::LinkOnly),
        FlagRule::new(FlagPattern::Prefix("@", 0), Category::Kept),
    ])
});
