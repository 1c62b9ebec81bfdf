// SPDX-License-Identifier: GPL-3.0-or-later

//! Compiler flag grammar tables.
//!
//! This module separates the concerns of flag pattern matching (HOW to consume
//! arguments from the command line) from the semantic meaning of the flag (WHAT
//! the flag does to the compiler call).
//!
//! Every toolchain family owns one `FlagTable`. The tables are static data, built
//! once and shared read-only between the recognitions.

/// Flag pattern definitions that describe HOW to consume arguments from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagPattern {
    /// Match the flag exactly, followed by the given number of separate arguments:
    /// "-c", "-MF file"
    Exactly(&'static str, usize),

    /// Match anything starting with the flag, followed by the given number of
    /// separate arguments: "-Wall", "-O2"
    Prefix(&'static str, usize),

    /// Match the flag with the value glued to it in the same argument: "-Ipath"
    Glued(&'static str),

    /// Match the flag with the value glued OR as a separate argument: "-Ipath", "-I path"
    GluedOrSeparate(&'static str),

    /// Match the flag with the value glued with '=': "-std=c99"
    WithEq(&'static str),

    /// Match the flag with the value glued with '=' OR as a separate argument:
    /// "-std=c99", "-std c99"
    WithEqOrSeparate(&'static str),
}

impl FlagPattern {
    /// Get the flag string from the pattern
    pub fn flag(&self) -> &'static str {
        match self {
            FlagPattern::Exactly(flag, _) => flag,
            FlagPattern::Prefix(flag, _) => flag,
            FlagPattern::Glued(flag) => flag,
            FlagPattern::GluedOrSeparate(flag) => flag,
            FlagPattern::WithEq(flag) => flag,
            FlagPattern::WithEqOrSeparate(flag) => flag,
        }
    }

    /// Matches the token as the whole spelling of the flag.
    ///
    /// Returns the number of separate arguments the flag takes.
    fn match_exact(&self, token: &str) -> Option<usize> {
        match self {
            FlagPattern::Exactly(flag, count) if token == *flag => Some(*count),
            FlagPattern::GluedOrSeparate(flag) | FlagPattern::WithEqOrSeparate(flag)
                if token == *flag =>
            {
                Some(1)
            }
            _ => None,
        }
    }

    /// Matches the token by the prefix of the spelling.
    fn match_prefix(&self, token: &str) -> Option<Arity> {
        match self {
            FlagPattern::Prefix(flag, count) if token.starts_with(flag) => {
                Some(Arity::Separate(*count))
            }
            FlagPattern::Glued(flag) | FlagPattern::GluedOrSeparate(flag) => token
                .strip_prefix(flag)
                .filter(|value| !value.is_empty())
                .map(|value| Arity::Glued(value.to_string())),
            FlagPattern::WithEq(flag) | FlagPattern::WithEqOrSeparate(flag) => token
                .strip_prefix(flag)
                .and_then(|rest| rest.strip_prefix('='))
                .map(|value| Arity::Glued(value.to_string())),
            _ => None,
        }
    }
}

/// Describes the meaning of a flag: which compiler pass it is relevant for,
/// or how it changes the interpretation of the whole call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Not tied to a pass, preserved verbatim in the output.
    Kept,
    /// Recognized, but has no effect on the output.
    ConsumedNoOp,
    /// The operand of the flag is an input file.
    InputFile,
    /// The operand of the flag is the output file.
    OutputFile,
    /// Relevant for the preprocessing and compilation passes.
    CompileOnly,
    /// Relevant for the linking pass only.
    LinkOnly,
    /// Relevant for compilation and linking too.
    Both,
    /// Selects the language of the following source files.
    Language,
    /// Stops the compiler after compilation (no linking).
    StopAfterCompile,
    /// Stops the compiler after preprocessing.
    StopAfterPreprocess,
    /// Prints information and exits, no build effect.
    Query,
    /// An option-looking argument which is not in the table.
    UnknownFlag,
}

impl Category {
    /// Flags to keep in the output of a compile or preprocess call.
    pub fn kept_for_compile(&self) -> bool {
        matches!(
            self,
            Category::Kept
                | Category::CompileOnly
                | Category::Both
                | Category::Language
                | Category::UnknownFlag
        )
    }

    /// Flags to keep in the output of a link call.
    pub fn kept_for_link(&self) -> bool {
        matches!(
            self,
            Category::Kept | Category::LinkOnly | Category::Both | Category::UnknownFlag
        )
    }
}

/// A flag definition combining the flag pattern and the flag category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagRule {
    /// The flag pattern including name and matching instruction
    pub pattern: FlagPattern,

    /// What this flag represents semantically
    pub category: Category,
}

impl FlagRule {
    /// Create a new flag definition
    pub const fn new(pattern: FlagPattern, category: Category) -> Self {
        Self { pattern, category }
    }
}

/// How the operands of a matched flag are to be taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arity {
    /// The operands are the following N arguments.
    Separate(usize),
    /// The operand is the rest of the same argument.
    Glued(String),
}

/// Result of looking up a single argument in a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup<'a> {
    /// The flag definition that matched
    pub rule: &'a FlagRule,
    /// How to take the operands of the flag
    pub arity: Arity,
}

/// The flag grammar of a toolchain family.
#[derive(Debug)]
pub struct FlagTable {
    rules: Vec<FlagRule>,
    option_prefix: &'static str,
}

impl FlagTable {
    /// Creates a table with the conventional `-` option prefix.
    ///
    /// The order of the rules matters only between rules of the same spelling
    /// length: the one declared earlier wins.
    pub fn new(rules: Vec<FlagRule>) -> Self {
        Self {
            rules,
            option_prefix: "-",
        }
    }

    /// Checks if the argument is option-looking according to this family.
    pub fn looks_like_an_option(&self, token: &str) -> bool {
        token.len() > self.option_prefix.len() && token.starts_with(self.option_prefix)
    }

    /// Finds the most specific rule for the argument.
    ///
    /// An exact match of the spelling beats any prefix match. From the prefix
    /// matches the longest spelling wins, while ties are resolved by the order
    /// of declaration.
    pub fn lookup(&self, token: &str) -> Option<Lookup<'_>> {
        if let Some(result) = self.rules.iter().find_map(|rule| {
            rule.pattern
                .match_exact(token)
                .map(|count| Lookup { rule, arity: Arity::Separate(count) })
        }) {
            return Some(result);
        }

        let mut best: Option<Lookup<'_>> = None;
        for rule in &self.rules {
            if let Some(arity) = rule.pattern.match_prefix(token) {
                let length = rule.pattern.flag().len();
                let longer = best
                    .as_ref()
                    .is_none_or(|current| length > current.rule.pattern.flag().len());
                if longer {
                    best = Some(Lookup { rule, arity });
                }
            }
        }
        best
    }
}
