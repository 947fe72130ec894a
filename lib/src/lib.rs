/*! A small regular expression engine that compiles patterns into bytecode.

Patterns are compiled into a compact program for a virtual machine. The
program is produced in a single pass over the pattern, without building any
syntax tree, and the VM executes it without backtracking. Matches are always
anchored at the start of the input: the question answered by the engine is
whether some prefix of the input matches the pattern.

The supported syntax is small:

| Syntax    | Meaning                                            |
|-----------|----------------------------------------------------|
| `a`       | a literal ASCII letter, digit or underscore        |
| `.`       | any character                                      |
| `[x-y]`   | a character between `x` and `y`, both inclusive    |
| `(...)`   | a group                                            |
| `e1\|e2`  | either `e1` or `e2`                                |
| `e*`      | zero or more repetitions of `e`                    |
| `e+`      | one or more repetitions of `e`                     |
| `e?`      | zero or one occurrences of `e`                     |

# Example

```rust
use bcre::{Regex, RegexFlags};

let re = Regex::new("a?([b-e])+", RegexFlags::none()).unwrap();

assert!(re.is_match("abcdebcde"));
assert!(re.is_match("bcdebcde"));
assert!(!re.is_match("rbcdebcde"));
```
*/

use std::fmt::{Display, Formatter};

use bitmask::bitmask;
use itertools::Itertools;
use log::*;

pub use errors::CompileError;
pub use re::instr::{Instr, Opcode};
pub use re::{Program, MAX_GROUPS, MAX_NESTING_DEPTH};

mod errors;
mod re;
mod tokenizer;

#[cfg(test)]
mod tests;

bitmask! {
    /// A set of flags that control the compilation of a regular expression.
    #[derive(Debug)]
    pub mask RegexFlags: u32 where
    /// Each of the flags accepted by [`Regex::new`].
    flags RegexFlag {
        DebugCompilation = 0x01,
    }
}

/// A compiled regular expression.
///
/// A [`Regex`] is immutable once created. Each call to [`Regex::is_match`]
/// uses its own state for the VM, so the same [`Regex`] can be shared by
/// many threads.
#[derive(Clone, Debug)]
pub struct Regex {
    pattern: String,
    program: Program,
}

impl Regex {
    /// Compiles a regular expression.
    ///
    /// When [`RegexFlag::DebugCompilation`] is set, the tokens and the
    /// disassembled program are logged at `info` level. Errors are logged
    /// at `error` level before being returned.
    pub fn new(pattern: &str, flags: RegexFlags) -> Result<Self, CompileError> {
        let debug = flags.contains(RegexFlag::DebugCompilation);

        match Self::compile(pattern, debug) {
            Ok(program) => {
                Ok(Self { pattern: pattern.to_string(), program })
            }
            Err(err) => {
                error!("can't compile regexp `{}`: {}", pattern, err);
                Err(err)
            }
        }
    }

    fn compile(pattern: &str, debug: bool) -> Result<Program, CompileError> {
        let tokens = tokenizer::Tokenizer::new(pattern).tokenize()?;

        if debug {
            info!("tokens for `{}`: {}", pattern, tokens.iter().join(" "));
        }

        let program = Program::new(re::Compiler::new(&tokens).compile()?);

        if debug {
            info!("code for `{}`:\n{}", pattern, program);
        }

        Ok(program)
    }

    /// Returns true if some prefix of `input` matches the regular
    /// expression. The empty prefix is included, so patterns that match the
    /// empty string match any input.
    pub fn is_match<I: AsRef<[u8]>>(&self, input: I) -> bool {
        re::VM::new(self.program.as_bytes(), input.as_ref()).run()
    }

    /// Returns the pattern this regular expression was compiled from.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Returns the program produced for the regular expression.
    #[inline]
    pub fn program(&self) -> &Program {
        &self.program
    }
}

impl Display for Regex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pattern)
    }
}

/// Returns the tokens for a pattern, as shown when
/// [`RegexFlag::DebugCompilation`] is set.
///
/// ```rust
/// assert_eq!(
///     bcre::tokens("a(b)*").unwrap(),
///     "CHAR(a) CONCAT GROUP_BEGIN CHAR(b) GROUP_END STAR"
/// );
/// ```
pub fn tokens(pattern: &str) -> Result<String, CompileError> {
    Ok(tokenizer::Tokenizer::new(pattern).tokenize()?.iter().join(" "))
}
