/*!
This module defines the instructions executed by the [VM][super::vm::VM],
along with the types that aid in decoding and disassembling them.

Instruction encoding format
---------------------------

Every instruction starts with a one-byte opcode, followed by zero or more
operands. The size of the operands is fixed for each opcode, so the size of
an instruction is fully determined by its opcode. For instance, the code for
the pattern `a?` starts like this:

```text
   0x01       0x61      0x08      0x0D      0x01
TESTSINGLE    'a'     INCPOSEQ   SETFLAG     1
```

Jump instructions ([`Instr::JumpEq`], [`Instr::JumpNeq`]) and
[`Instr::JumpPos`] have a 4-bytes signed operand stored in little-endian. For
jumps, the operand is an offset relative to the address where the jump
instruction starts, so that both forward and backward jumps land exactly on
the start of the target instruction.

While the code is being generated some jump targets are not yet known. These
jumps are emitted with a placeholder offset that is overwritten later. Two
placeholders exist: [`UNRESOLVED`], for forward jumps that will be patched
once the target is emitted, and [`FAIL_TARGET`], for jumps whose target is
the trailing [`Instr::Fail`] instruction of the program. Neither of them can
be a real offset, as programs are never larger than [`MAX_CODE_SIZE`].
*/

use std::fmt::{Display, Formatter};
use std::mem::size_of;

/// Offset for jump instructions. The offset is always relative to the
/// address where the instruction starts.
pub type Offset = i32;

/// Identifier of a group. Group ids start at 1.
pub type GroupId = u8;

/// Placeholder for forward jumps whose target is not known yet.
pub const UNRESOLVED: Offset = Offset::MIN;

/// Placeholder for jumps that go to the trailing `FAIL` instruction.
pub const FAIL_TARGET: Offset = Offset::MAX;

/// Maximum size of the code produced for a single pattern.
pub const MAX_CODE_SIZE: usize = 1 << 24;

/// Opcodes supported by the VM.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Opcode {
    TestSingle = 0x01,
    TestRange = 0x02,
    TestNegatedRange = 0x03,
    TestAny = 0x04,
    TestDigit = 0x05,
    TestLowerCase = 0x06,
    TestUpperCase = 0x07,
    IncPosEq = 0x08,
    IncPos = 0x09,
    DecPos = 0x0A,
    JumpEq = 0x0B,
    JumpNeq = 0x0C,
    SetFlag = 0x0D,
    GroupStart = 0x0E,
    GroupEnd = 0x0F,
    Accept = 0x10,
    Fail = 0x11,
    JumpPos = 0x12,
}

impl Opcode {
    #[inline]
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Returns the opcode represented by the given byte, or [`None`] if the
    /// byte is not a valid opcode.
    #[inline]
    pub fn from_byte(byte: u8) -> Option<Self> {
        let opcode = match byte {
            0x01 => Opcode::TestSingle,
            0x02 => Opcode::TestRange,
            0x03 => Opcode::TestNegatedRange,
            0x04 => Opcode::TestAny,
            0x05 => Opcode::TestDigit,
            0x06 => Opcode::TestLowerCase,
            0x07 => Opcode::TestUpperCase,
            0x08 => Opcode::IncPosEq,
            0x09 => Opcode::IncPos,
            0x0A => Opcode::DecPos,
            0x0B => Opcode::JumpEq,
            0x0C => Opcode::JumpNeq,
            0x0D => Opcode::SetFlag,
            0x0E => Opcode::GroupStart,
            0x0F => Opcode::GroupEnd,
            0x10 => Opcode::Accept,
            0x11 => Opcode::Fail,
            0x12 => Opcode::JumpPos,
            _ => return None,
        };
        Some(opcode)
    }

    /// Size in bytes of an instruction with this opcode, including the
    /// opcode itself.
    pub fn instr_size(self) -> usize {
        1 + match self {
            Opcode::TestSingle
            | Opcode::SetFlag
            | Opcode::GroupStart
            | Opcode::GroupEnd => 1,
            Opcode::TestRange | Opcode::TestNegatedRange => 2,
            Opcode::JumpEq | Opcode::JumpNeq | Opcode::JumpPos => {
                size_of::<Offset>()
            }
            Opcode::TestAny
            | Opcode::TestDigit
            | Opcode::TestLowerCase
            | Opcode::TestUpperCase
            | Opcode::IncPosEq
            | Opcode::IncPos
            | Opcode::DecPos
            | Opcode::Accept
            | Opcode::Fail => 0,
        }
    }
}

/// Instructions supported by the VM.
///
/// Test instructions set the VM's status flag according to the character
/// at the current input position. When the input has been exhausted there's
/// no current character, and every test sets the flag to false.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Instr {
    /// The current character is equal to the given one.
    TestSingle(u8),

    /// The current character is in the range `lo..=hi`.
    TestRange { lo: u8, hi: u8 },

    /// The current character is outside the range `lo..=hi`.
    TestNegatedRange { lo: u8, hi: u8 },

    /// There's a current character, whatever it is.
    TestAny,

    /// The current character is in `0-9`.
    TestDigit,

    /// The current character is in `a-z`.
    TestLowerCase,

    /// The current character is in `A-Z`.
    TestUpperCase,

    /// Advances the input position by one if the status flag is set.
    IncPosEq,

    /// Advances the input position by one.
    IncPos,

    /// Moves the input position one character back.
    DecPos,

    /// Jumps if the status flag is set.
    JumpEq(Offset),

    /// Jumps if the status flag is not set.
    JumpNeq(Offset),

    /// Forces the status flag to the given value.
    SetFlag(bool),

    /// Marks the start of a group. Doesn't change the VM state.
    GroupStart(GroupId),

    /// Marks the end of a group. Doesn't change the VM state.
    GroupEnd(GroupId),

    /// The input matches.
    Accept,

    /// The input doesn't match.
    Fail,

    /// Moves the input position by the given signed amount.
    JumpPos(Offset),
}

impl Instr {
    /// Returns the instruction's opcode.
    pub fn opcode(&self) -> Opcode {
        match self {
            Instr::TestSingle(_) => Opcode::TestSingle,
            Instr::TestRange { .. } => Opcode::TestRange,
            Instr::TestNegatedRange { .. } => Opcode::TestNegatedRange,
            Instr::TestAny => Opcode::TestAny,
            Instr::TestDigit => Opcode::TestDigit,
            Instr::TestLowerCase => Opcode::TestLowerCase,
            Instr::TestUpperCase => Opcode::TestUpperCase,
            Instr::IncPosEq => Opcode::IncPosEq,
            Instr::IncPos => Opcode::IncPos,
            Instr::DecPos => Opcode::DecPos,
            Instr::JumpEq(_) => Opcode::JumpEq,
            Instr::JumpNeq(_) => Opcode::JumpNeq,
            Instr::SetFlag(_) => Opcode::SetFlag,
            Instr::GroupStart(_) => Opcode::GroupStart,
            Instr::GroupEnd(_) => Opcode::GroupEnd,
            Instr::Accept => Opcode::Accept,
            Instr::Fail => Opcode::Fail,
            Instr::JumpPos(_) => Opcode::JumpPos,
        }
    }

    /// Size of the instruction in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.opcode().instr_size()
    }

    /// Appends the encoded instruction to `code`.
    pub fn encode(&self, code: &mut Vec<u8>) {
        code.push(self.opcode().to_byte());
        match *self {
            Instr::TestSingle(byte) => code.push(byte),
            Instr::TestRange { lo, hi }
            | Instr::TestNegatedRange { lo, hi } => {
                code.extend_from_slice(&[lo, hi])
            }
            Instr::JumpEq(offset)
            | Instr::JumpNeq(offset)
            | Instr::JumpPos(offset) => {
                code.extend_from_slice(offset.to_le_bytes().as_slice())
            }
            Instr::SetFlag(value) => code.push(value as u8),
            Instr::GroupStart(id) | Instr::GroupEnd(id) => code.push(id),
            Instr::TestAny
            | Instr::TestDigit
            | Instr::TestLowerCase
            | Instr::TestUpperCase
            | Instr::IncPosEq
            | Instr::IncPos
            | Instr::DecPos
            | Instr::Accept
            | Instr::Fail => {}
        }
    }
}

/// Parses a slice of bytes that contains VM instructions, returning
/// individual instructions and their addresses.
pub struct InstrParser<'a> {
    code: &'a [u8],
    addr: usize,
}

impl<'a> InstrParser<'a> {
    pub fn new(code: &'a [u8]) -> Self {
        Self { code, addr: 0 }
    }

    /// Decodes the instruction at the start of `code`, returning the
    /// instruction and its size.
    ///
    /// # Panics
    ///
    /// If `code` doesn't start with a valid instruction. The code executed by
    /// the VM is always produced by the compiler, so this indicates a bug.
    #[inline(always)]
    pub fn decode_instr(code: &[u8]) -> (Instr, usize) {
        let opcode = match code.first().copied().and_then(Opcode::from_byte) {
            Some(opcode) => opcode,
            None => unreachable!("invalid opcode: {:02x?}", code.first()),
        };

        let operands = &code[1..];

        let instr = match (opcode, operands) {
            (Opcode::TestSingle, [byte, ..]) => Instr::TestSingle(*byte),
            (Opcode::TestRange, [lo, hi, ..]) => {
                Instr::TestRange { lo: *lo, hi: *hi }
            }
            (Opcode::TestNegatedRange, [lo, hi, ..]) => {
                Instr::TestNegatedRange { lo: *lo, hi: *hi }
            }
            (Opcode::TestAny, _) => Instr::TestAny,
            (Opcode::TestDigit, _) => Instr::TestDigit,
            (Opcode::TestLowerCase, _) => Instr::TestLowerCase,
            (Opcode::TestUpperCase, _) => Instr::TestUpperCase,
            (Opcode::IncPosEq, _) => Instr::IncPosEq,
            (Opcode::IncPos, _) => Instr::IncPos,
            (Opcode::DecPos, _) => Instr::DecPos,
            (Opcode::JumpEq, _) => Instr::JumpEq(Self::decode_offset(operands)),
            (Opcode::JumpNeq, _) => {
                Instr::JumpNeq(Self::decode_offset(operands))
            }
            (Opcode::JumpPos, _) => {
                Instr::JumpPos(Self::decode_offset(operands))
            }
            (Opcode::SetFlag, [value, ..]) => Instr::SetFlag(*value != 0),
            (Opcode::GroupStart, [id, ..]) => Instr::GroupStart(*id),
            (Opcode::GroupEnd, [id, ..]) => Instr::GroupEnd(*id),
            (Opcode::Accept, _) => Instr::Accept,
            (Opcode::Fail, _) => Instr::Fail,
            (opcode, _) => unreachable!("truncated instruction: {:?}", opcode),
        };

        (instr, opcode.instr_size())
    }

    fn decode_offset(slice: &[u8]) -> Offset {
        match slice.get(..size_of::<Offset>()) {
            Some(bytes) => {
                let mut buf = [0_u8; size_of::<Offset>()];
                buf.copy_from_slice(bytes);
                Offset::from_le_bytes(buf)
            }
            None => unreachable!("truncated jump offset"),
        }
    }
}

impl<'a> Iterator for InstrParser<'a> {
    type Item = (Instr, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.code.is_empty() {
            return None;
        }
        let (instr, size) = InstrParser::decode_instr(self.code);
        let addr = self.addr;
        self.addr += size;
        self.code = &self.code[size..];
        Some((instr, addr))
    }
}

/// Helper for printing a byte operand. Printable ASCII characters are shown
/// as they are, anything else in hex.
struct Char(u8);

impl Display for Char {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0.is_ascii_graphic() {
            write!(f, "{}", self.0 as char)
        } else {
            write!(f, "{:#04x}", self.0)
        }
    }
}

impl Display for Instr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            Instr::TestSingle(byte) => write!(f, "TESTSINGLE {}", Char(byte)),
            Instr::TestRange { lo, hi } => {
                write!(f, "TESTRANGE {}-{}", Char(lo), Char(hi))
            }
            Instr::TestNegatedRange { lo, hi } => {
                write!(f, "TESTNEGATEDRANGE {}-{}", Char(lo), Char(hi))
            }
            Instr::TestAny => write!(f, "TESTANY"),
            Instr::TestDigit => write!(f, "TESTDIGIT"),
            Instr::TestLowerCase => write!(f, "TESTLOWERCASE"),
            Instr::TestUpperCase => write!(f, "TESTUPPERCASE"),
            Instr::IncPosEq => write!(f, "INCPOSEQ"),
            Instr::IncPos => write!(f, "INCPOS"),
            Instr::DecPos => write!(f, "DECPOS"),
            Instr::JumpEq(offset) => write!(f, "JUMPEQ {}", Target(offset)),
            Instr::JumpNeq(offset) => write!(f, "JUMPNEQ {}", Target(offset)),
            Instr::JumpPos(offset) => write!(f, "JUMPPOS {:+}", offset),
            Instr::SetFlag(value) => write!(f, "SETFLAG {}", value as u8),
            Instr::GroupStart(id) => write!(f, "GROUPSTART {}", id),
            Instr::GroupEnd(id) => write!(f, "GROUPEND {}", id),
            Instr::Accept => write!(f, "ACCEPT"),
            Instr::Fail => write!(f, "FAIL"),
        }
    }
}

/// Helper for printing jump offsets, including the placeholders.
struct Target(Offset);

impl Display for Target {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            UNRESOLVED => write!(f, "<unresolved>"),
            FAIL_TARGET => write!(f, "<fail>"),
            offset => write!(f, "{:+}", offset),
        }
    }
}
