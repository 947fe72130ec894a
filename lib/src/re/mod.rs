/*! This module compiles and executes regular expressions.

Patterns are first split into tokens by the [tokenizer][crate::tokenizer],
then a [`Compiler`] consumes the tokens and produces code for a [`VM`]. The
code is a flat sequence of bytes described in [`instr`], with no syntax tree
in between: the compiler emits code while it parses the tokens, and patches
the offsets of forward jumps once their targets are known.

The VM executes the code against some input, always trying to match at the
start of the input. There's no backtracking at run time, quantifiers are
compiled into loops and conditional jumps.
*/

use std::fmt::{Display, Formatter};

use crate::re::instr::{Instr, InstrParser, FAIL_TARGET, UNRESOLVED};

pub(crate) use compiler::Compiler;
pub(crate) use vm::VM;

pub mod instr;

mod compiler;
mod vm;


pub use compiler::{MAX_GROUPS, MAX_NESTING_DEPTH};

/// Code produced for a regular expression.
///
/// The code is immutable once compiled, and can be executed by many threads
/// at the same time.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Program {
    code: Vec<u8>,
}

impl Program {
    pub(crate) fn new(code: Vec<u8>) -> Self {
        Self { code }
    }

    /// Returns the code as a slice of bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.code.as_slice()
    }

    /// Size of the code in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.code.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Returns an iterator over the instructions in the program. Each item
    /// is an instruction together with its address.
    pub fn instructions(&self) -> impl Iterator<Item = (Instr, usize)> + '_ {
        InstrParser::new(self.code.as_slice())
    }

    /// Returns true if some jump in the program still has one of the
    /// placeholder offsets used during compilation.
    pub fn has_unresolved_jumps(&self) -> bool {
        self.instructions().any(|(instr, _)| match instr {
            Instr::JumpEq(offset) | Instr::JumpNeq(offset) => {
                offset == UNRESOLVED || offset == FAIL_TARGET
            }
            _ => false,
        })
    }
}

impl AsRef<[u8]> for Program {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (instr, addr) in self.instructions() {
            writeln!(f, "{:05x}: {}", addr, instr)?;
        }
        Ok(())
    }
}
