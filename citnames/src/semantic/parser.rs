// SPDX-License-Identifier: GPL-3.0-or-later

//! Toolchain agnostic argument parser.
//!
//! The parser walks the argument list once, left to right, and partitions it
//! into flags (with the operands they consume) and positional arguments. The
//! meaning of the flags comes from the `FlagTable` of the caller.

use super::RecognitionError;
use super::flags::{Arity, Category, FlagRule, FlagTable};

/// A recognized flag of the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedFlag<'a> {
    /// The matching table entry, `None` for option-looking arguments no rule matches.
    pub rule: Option<&'a FlagRule>,
    /// What the flag represents semantically.
    pub category: Category,
    /// The arguments consumed from the command line, verbatim.
    pub arguments: Vec<String>,
    /// The operands of the flag: the glued value or the separate arguments.
    pub operands: Vec<String>,
}

/// One element of the partitioned command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchedArgument<'a> {
    Flag(MatchedFlag<'a>),
    Positional(String),
}

impl MatchedArgument<'_> {
    /// The number of command line arguments this element represents.
    pub fn consumed(&self) -> usize {
        match self {
            MatchedArgument::Flag(flag) => flag.arguments.len(),
            MatchedArgument::Positional(_) => 1,
        }
    }

    /// The category of the flag, `None` for positional arguments.
    pub fn category(&self) -> Option<Category> {
        match self {
            MatchedArgument::Flag(flag) => Some(flag.category),
            MatchedArgument::Positional(_) => None,
        }
    }
}

/// Parses the arguments (without the program name) with the given table.
///
/// Fails only when a flag requires more separate operands than the argument
/// list has left. On success every argument is accounted for exactly once.
pub fn parse<'a>(
    table: &'a FlagTable,
    args: &[String],
) -> Result<Vec<MatchedArgument<'a>>, RecognitionError> {
    let mut result = Vec::with_capacity(args.len());
    let mut index = 0;

    while index < args.len() {
        let current = &args[index];

        let Some(lookup) = table.lookup(current) else {
            if table.looks_like_an_option(current) {
                result.push(MatchedArgument::Flag(MatchedFlag {
                    rule: None,
                    category: Category::UnknownFlag,
                    arguments: vec![current.clone()],
                    operands: vec![],
                }));
            } else {
                result.push(MatchedArgument::Positional(current.clone()));
            }
            index += 1;
            continue;
        };

        let flag = match lookup.arity {
            Arity::Glued(value) => MatchedFlag {
                rule: Some(lookup.rule),
                category: lookup.rule.category,
                arguments: vec![current.clone()],
                operands: vec![value],
            },
            Arity::Separate(count) => {
                let remaining = args.len() - index - 1;
                if remaining < count {
                    return Err(RecognitionError::TruncatedFlag {
                        flag: current.clone(),
                        expected: count,
                        found: remaining,
                    });
                }
                let consumed = &args[index..=index + count];
                MatchedFlag {
                    rule: Some(lookup.rule),
                    category: lookup.rule.category,
                    arguments: consumed.to_vec(),
                    operands: consumed[1..].to_vec(),
                }
            }
        };

        index += flag.arguments.len();
        result.push(MatchedArgument::Flag(flag));
    }

    Ok(result)
}
