use super::instr::{Instr, InstrParser, Offset};

/// Executes VM code produced by the [compiler][`crate::re::Compiler`].
///
/// The VM has two positions, `pc` within the code and `sp` within the input,
/// and a single boolean register, the status flag, that holds the outcome of
/// the last test instruction. There's no backtracking, every choice made by
/// quantifiers and alternations was resolved at compile time into loops and
/// conditional jumps.
///
/// A [`VM`] borrows both the code and the input, and is meant to be created
/// for a single execution.
pub(crate) struct VM<'r, 'i> {
    /// The code for the VM. Produced by [`crate::re::Compiler`].
    code: &'r [u8],
    input: &'i [u8],
    /// Program counter.
    pc: usize,
    /// Position within the input of the current character.
    sp: usize,
    status_flag: bool,
}

impl<'r, 'i> VM<'r, 'i> {
    /// Creates a new [`VM`] that will execute `code` against `input`.
    pub fn new(code: &'r [u8], input: &'i [u8]) -> Self {
        Self { code, input, pc: 0, sp: 0, status_flag: false }
    }

    /// Runs the code until it reaches an `ACCEPT` or `FAIL` instruction.
    /// Returns true if the input matches.
    ///
    /// If `pc` runs past the end of the code, or `sp` runs past the end of
    /// the input, the execution stops and the result is the current value of
    /// the status flag.
    ///
    /// # Panics
    ///
    /// If the code contains an invalid instruction. That's never the case for
    /// code produced by the compiler.
    pub fn run(mut self) -> bool {
        loop {
            if self.pc >= self.code.len() || self.sp > self.input.len() {
                return self.status_flag;
            }

            let (instr, size) =
                InstrParser::decode_instr(&self.code[self.pc..]);
            let mut next_pc = self.pc + size;

            match instr {
                Instr::TestSingle(byte) => self.test(|c| c == byte),
                Instr::TestRange { lo, hi } => {
                    self.test(|c| (lo..=hi).contains(&c))
                }
                Instr::TestNegatedRange { lo, hi } => {
                    self.test(|c| !(lo..=hi).contains(&c))
                }
                Instr::TestAny => self.test(|_| true),
                Instr::TestDigit => self.test(|c| c.is_ascii_digit()),
                Instr::TestLowerCase => self.test(|c| c.is_ascii_lowercase()),
                Instr::TestUpperCase => self.test(|c| c.is_ascii_uppercase()),
                Instr::IncPosEq => {
                    if self.status_flag {
                        self.sp += 1;
                    }
                }
                Instr::IncPos => self.sp += 1,
                Instr::DecPos => match self.sp.checked_sub(1) {
                    Some(sp) => self.sp = sp,
                    None => return self.status_flag,
                },
                Instr::JumpPos(offset) => match jump(self.sp, offset) {
                    Some(sp) => self.sp = sp,
                    None => return self.status_flag,
                },
                Instr::JumpEq(offset) if self.status_flag => {
                    match jump(self.pc, offset) {
                        Some(pc) => next_pc = pc,
                        None => return self.status_flag,
                    }
                }
                Instr::JumpNeq(offset) if !self.status_flag => {
                    match jump(self.pc, offset) {
                        Some(pc) => next_pc = pc,
                        None => return self.status_flag,
                    }
                }
                Instr::JumpEq(_) | Instr::JumpNeq(_) => {}
                Instr::SetFlag(value) => self.status_flag = value,
                Instr::GroupStart(_) | Instr::GroupEnd(_) => {}
                Instr::Accept => return true,
                Instr::Fail => return false,
            }

            self.pc = next_pc;
        }
    }

    /// Sets the status flag to the result of `f` for the current character.
    /// At the end of the input there's no current character and the flag is
    /// always unset.
    #[inline]
    fn test<F: Fn(u8) -> bool>(&mut self, f: F) {
        self.status_flag = match self.input.get(self.sp) {
            Some(c) => f(*c),
            None => false,
        };
    }
}

/// Applies a relative offset to a position. Returns `None` if the result
/// is negative or overflows.
#[inline]
fn jump(position: usize, offset: Offset) -> Option<usize> {
    position.checked_add_signed(offset as isize)
}
