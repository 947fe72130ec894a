/*!
This module provides a compiler that takes the tokens produced by the
[tokenizer][crate::tokenizer::Tokenizer] and emits code for the
[VM][super::vm::VM].

The compiler is a recursive-descent parser for the following grammar, which
emits code directly while it parses, without building a syntax tree:

```text
Alternation   := Concatenation ('|' Concatenation)*
Concatenation := Quantified (CONCAT Quantified)*
Quantified    := Primary ('*' | '+' | '?')?
Primary       := Character | CharacterRange | '(' Alternation ')'
```

The code for each construct leaves the VM's status flag set if the construct
matched, and unset if otherwise. Jumps whose target is not known at the time
they are emitted are written with a placeholder offset and patched later.
*/

use log::*;

use super::instr::{
    GroupId, Instr, InstrParser, Offset, FAIL_TARGET, MAX_CODE_SIZE,
    UNRESOLVED,
};
use crate::tokenizer::{CharClass, Operator, Token, TokenKind};
use crate::CompileError;

/// Maximum number of groups that can be nested one inside another.
pub const MAX_NESTING_DEPTH: u32 = 256;

/// Maximum number of groups in a pattern.
pub const MAX_GROUPS: u8 = u8::MAX;

/// Describes the code emitted for some construct in the pattern.
#[derive(Clone, Copy, Debug)]
struct Fragment {
    /// Location where the code for the construct starts.
    start: usize,
    /// True if the construct can match an empty string.
    nullable: bool,
}

/// Compiles a sequence of tokens into code for the VM.
pub(crate) struct Compiler<'a, 'src> {
    tokens: &'a [Token<'src>],
    /// Index of the next token to be consumed.
    pos: usize,
    /// Code emitted so far.
    code: InstrSeq,
    /// Id for the next group.
    next_group_id: u16,
    /// Number of groups that enclose the current token.
    depth: u32,
    /// Number of constructs enclosing the current token that can recover
    /// from a failed operand, like alternation branches that are followed
    /// by other branches, and operands of quantifiers. When this is zero,
    /// a failed operand means that the whole pattern fails, and the compiler
    /// emits jumps straight to the trailing `FAIL` instruction.
    recoverable: u32,
}

impl<'a, 'src> Compiler<'a, 'src> {
    /// Creates a new compiler for the given tokens.
    pub fn new(tokens: &'a [Token<'src>]) -> Self {
        Self {
            tokens,
            pos: 0,
            code: InstrSeq::new(),
            next_group_id: 1,
            depth: 0,
            recoverable: 0,
        }
    }

    /// Consumes the compiler and returns the code for the VM.
    ///
    /// The code ends with the following instructions:
    ///
    /// ```text
    ///       jumpneq l_fail
    ///       accept
    /// l_fail: fail
    /// ```
    ///
    /// Every placeholder in the code is resolved before returning.
    pub fn compile(mut self) -> Result<Vec<u8>, CompileError> {
        self.alternation()?;

        // The top-level alternation must cover all the tokens.
        if let Some(token) = self.next_token() {
            return Err(match token.kind {
                TokenKind::GroupEnd => {
                    CompileError::UnmatchedParen { offset: token.offset }
                }
                _ => unexpected(&token),
            });
        }

        self.code.emit(Instr::JumpNeq(FAIL_TARGET))?;
        self.code.emit(Instr::Accept)?;

        let fail = self.code.emit(Instr::Fail)?;

        self.code.resolve_placeholders(fail)?;

        Ok(self.code.into_inner())
    }
}

impl<'a, 'src> Compiler<'a, 'src> {
    /// Emits code for `Alternation := Concatenation ('|' Concatenation)*`.
    fn alternation(&mut self) -> Result<Fragment, CompileError> {
        // e1|e2|....|eN
        //
        //       ... code for e1 ...
        //       jumpeq l_end
        //       ... code for e2 ...
        //       jumpeq l_end
        //       ....
        //       ... code for eN ...
        // l_end:
        let start = self.code.location();
        let mut nullable = false;
        let mut exits = Vec::new();

        loop {
            // If the branch fails, but some other branch follows, the next
            // branch is tried instead of failing.
            let recoverable = self.more_branches();

            if recoverable {
                self.recoverable += 1;
            }

            let branch = self.concatenation();

            if recoverable {
                self.recoverable -= 1;
            }

            nullable |= branch?.nullable;

            if !self.eat_operator(Operator::Alternate) {
                break;
            }

            // The branch matched, skip the remaining ones.
            exits.push(self.code.emit(Instr::JumpEq(UNRESOLVED))?);
        }

        let l_end = self.code.location();
        self.code.patch_jumps(&exits, l_end)?;

        Ok(Fragment { start, nullable })
    }

    /// Emits code for `Concatenation := Quantified (CONCAT Quantified)*`.
    fn concatenation(&mut self) -> Result<Fragment, CompileError> {
        // e1 e2 ... eN
        //
        //       ... code for e1 ...
        //       jumpneq l_end  (or l_fail)
        //       ... code for e2 ...
        //       jumpneq l_end  (or l_fail)
        //       ....
        //       ... code for eN ...
        // l_end:
        let start = self.code.location();
        let mut exits = Vec::new();
        let mut nullable = self.quantified()?.nullable;

        while self.eat_operator(Operator::Concatenate) {
            self.emit_fail_jump(&mut exits)?;
            nullable &= self.quantified()?.nullable;
        }

        let l_end = self.code.location();
        self.code.patch_jumps(&exits, l_end)?;

        Ok(Fragment { start, nullable })
    }

    /// Emits code for `Quantified := Primary ('*' | '+' | '?')?`.
    fn quantified(&mut self) -> Result<Fragment, CompileError> {
        let offset = self.peek().map(|token| token.offset).unwrap_or_default();
        let quantifier = self.quantifier_after_primary();

        // The operand of a quantifier can fail without failing the whole
        // pattern.
        if quantifier.is_some() {
            self.recoverable += 1;
        }

        let operand = self.primary();

        if quantifier.is_some() {
            self.recoverable -= 1;
        }

        let operand = operand?;

        let quantifier = match quantifier {
            Some(quantifier) => quantifier,
            None => return Ok(operand),
        };

        // Consume the quantifier.
        self.next_token();

        match quantifier {
            // e*
            //
            // l1: ... code for e ...
            //     jumpeq l1
            //     setflag 1
            Operator::ZeroOrMore => {
                if operand.nullable {
                    return Err(CompileError::EmptyRepetition { offset });
                }
                self.code.emit_jump_back(operand.start)?;
                self.code.emit(Instr::SetFlag(true))?;
                Ok(Fragment { start: operand.start, nullable: true })
            }
            // e+
            //
            //     ... code for e ...
            //     jumpneq l2  (or l_fail)
            // l1: ... code for e ...
            //     jumpeq l1
            //     setflag 1
            // l2:
            Operator::OneOrMore => {
                if operand.nullable {
                    return Err(CompileError::EmptyRepetition { offset });
                }
                let end = self.code.location();
                let mut exits = Vec::new();
                self.emit_fail_jump(&mut exits)?;
                let l1 = self.code.emit_clone(operand.start, end)?;
                self.code.emit_jump_back(l1)?;
                self.code.emit(Instr::SetFlag(true))?;
                let l2 = self.code.location();
                self.code.patch_jumps(&exits, l2)?;
                Ok(Fragment { start: operand.start, nullable: false })
            }
            // e?
            //
            //     ... code for e ...
            //     setflag 1
            Operator::ZeroOrOne => {
                self.code.emit(Instr::SetFlag(true))?;
                Ok(Fragment { start: operand.start, nullable: true })
            }
            Operator::Alternate | Operator::Concatenate => unreachable!(),
        }
    }

    /// Emits code for
    /// `Primary := Character | CharacterRange | '(' Alternation ')'`.
    fn primary(&mut self) -> Result<Fragment, CompileError> {
        let start = self.code.location();

        let token = match self.next_token() {
            Some(token) => token,
            None => return Err(CompileError::UnexpectedEnd),
        };

        match token.kind {
            TokenKind::Character { class: CharClass::Single, text } => {
                let byte = match text.as_bytes() {
                    [byte] => *byte,
                    _ => unreachable!("multi-byte character token: {}", text),
                };
                self.code.emit(Instr::TestSingle(byte))?;
                self.code.emit(Instr::IncPosEq)?;
            }
            TokenKind::Character { class: CharClass::Any, .. } => {
                self.code.emit(Instr::TestAny)?;
                self.code.emit(Instr::IncPosEq)?;
            }
            TokenKind::CharacterRange { text } => {
                self.code.emit(range_test(text, token.offset)?)?;
                self.code.emit(Instr::IncPosEq)?;
            }
            TokenKind::GroupBegin => {
                self.depth += 1;

                if self.depth > MAX_NESTING_DEPTH {
                    return Err(CompileError::TooDeep {
                        max: MAX_NESTING_DEPTH,
                    });
                }

                let id = self.new_group_id()?;

                self.code.emit(Instr::GroupStart(id))?;
                let inner = self.alternation()?;

                match self.next_token() {
                    Some(Token { kind: TokenKind::GroupEnd, .. }) => {}
                    Some(token) => return Err(unexpected(&token)),
                    None => {
                        return Err(CompileError::UnclosedGroup {
                            offset: token.offset,
                        })
                    }
                }

                self.code.emit(Instr::GroupEnd(id))?;
                self.depth -= 1;

                return Ok(Fragment { start, nullable: inner.nullable });
            }
            TokenKind::GroupEnd | TokenKind::Operator(_) => {
                return Err(unexpected(&token));
            }
        }

        Ok(Fragment { start, nullable: false })
    }

    /// Emits a `jumpneq` that is taken when the last operand failed.
    ///
    /// If the failure can't be recovered the jump goes to the trailing `FAIL`
    /// instruction, if not, the jump's location is added to `exits` and the
    /// caller is responsible for patching it.
    fn emit_fail_jump(
        &mut self,
        exits: &mut Vec<usize>,
    ) -> Result<(), CompileError> {
        if self.recoverable == 0 {
            self.code.emit(Instr::JumpNeq(FAIL_TARGET))?;
        } else {
            exits.push(self.code.emit(Instr::JumpNeq(UNRESOLVED))?);
        }
        Ok(())
    }

    fn new_group_id(&mut self) -> Result<GroupId, CompileError> {
        let id = GroupId::try_from(self.next_group_id)
            .map_err(|_| CompileError::TooManyGroups { max: MAX_GROUPS })?;
        self.next_group_id += 1;
        Ok(id)
    }
}

impl<'a, 'src> Compiler<'a, 'src> {
    #[inline]
    fn peek(&self) -> Option<&Token<'src>> {
        self.tokens.get(self.pos)
    }

    fn next_token(&mut self) -> Option<Token<'src>> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Consumes the next token if it is the given operator.
    fn eat_operator(&mut self, op: Operator) -> bool {
        match self.peek() {
            Some(Token { kind: TokenKind::Operator(next), .. })
                if *next == op =>
            {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    /// Returns true if the alternation branch that starts at the current
    /// token is followed by another branch in the same alternation.
    fn more_branches(&self) -> bool {
        let mut depth = 0_u32;
        for token in &self.tokens[self.pos..] {
            match token.kind {
                TokenKind::GroupBegin => depth += 1,
                TokenKind::GroupEnd if depth == 0 => return false,
                TokenKind::GroupEnd => depth -= 1,
                TokenKind::Operator(Operator::Alternate) if depth == 0 => {
                    return true
                }
                _ => {}
            }
        }
        false
    }

    /// Returns the quantifier applied to the primary expression that starts
    /// at the current token, if any. Doesn't consume any token.
    fn quantifier_after_primary(&self) -> Option<Operator> {
        let mut pos = self.pos;

        if let Some(Token { kind: TokenKind::GroupBegin, .. }) = self.peek() {
            let mut depth = 0_u32;
            loop {
                match self.tokens.get(pos)?.kind {
                    TokenKind::GroupBegin => depth += 1,
                    TokenKind::GroupEnd => depth -= 1,
                    _ => {}
                }
                pos += 1;
                if depth == 0 {
                    break;
                }
            }
        } else {
            pos += 1;
        }

        match self.tokens.get(pos)?.kind {
            TokenKind::Operator(
                op @ (Operator::ZeroOrMore
                | Operator::OneOrMore
                | Operator::ZeroOrOne),
            ) => Some(op),
            _ => None,
        }
    }
}

/// Returns the test instruction for the character range with the given
/// text. The text is what appears between the brackets, like `a-z`.
fn range_test(text: &str, offset: usize) -> Result<Instr, CompileError> {
    match text.as_bytes() {
        b"0-9" => Ok(Instr::TestDigit),
        b"a-z" => Ok(Instr::TestLowerCase),
        b"A-Z" => Ok(Instr::TestUpperCase),
        [lo, b'-', hi] if lo <= hi => Ok(Instr::TestRange { lo: *lo, hi: *hi }),
        _ => Err(CompileError::InvalidRange { range: text.to_string(), offset }),
    }
}

fn unexpected(token: &Token) -> CompileError {
    CompileError::UnexpectedToken {
        token: token.source_text(),
        offset: token.offset,
    }
}

/// A sequence of instructions for the VM.
///
/// This type is used by the compiler while emitting code. It is simply a
/// buffer with a set of specialized functions for adding instructions at the
/// end of the buffer, and for patching the offsets of jumps that were emitted
/// before their targets were known.
pub(crate) struct InstrSeq {
    seq: Vec<u8>,
}

impl InstrSeq {
    /// Creates a new [`InstrSeq`].
    pub fn new() -> Self {
        Self { seq: Vec::new() }
    }

    /// Consumes the [`InstrSeq`] and returns the inner vector that contains
    /// the code.
    pub fn into_inner(self) -> Vec<u8> {
        self.seq
    }

    /// Returns the location where the next instruction will be put.
    #[inline]
    pub fn location(&self) -> usize {
        self.seq.len()
    }

    /// Adds an instruction at the end of the sequence and returns the
    /// location where the newly added instruction resides.
    pub fn emit(&mut self, instr: Instr) -> Result<usize, CompileError> {
        let location = self.location();
        instr.encode(&mut self.seq);
        self.check_size()?;
        Ok(location)
    }

    /// Adds a `jumpeq` to some previous location at the end of the sequence
    /// and returns the location of the jump.
    pub fn emit_jump_back(
        &mut self,
        target: usize,
    ) -> Result<usize, CompileError> {
        let location = self.location();
        self.emit(Instr::JumpEq(offset(location, target)?))
    }

    /// Emits a copy of the code that goes from `start` to `end` (not
    /// inclusive) and returns the location where the copy starts.
    ///
    /// Jump offsets are relative, so the copy is valid as long as every jump
    /// in the copied code lands within the copied code. Jumps to the trailing
    /// `FAIL` instruction are placeholders at this point, and they are
    /// resolved for the copy as well.
    pub fn emit_clone(
        &mut self,
        start: usize,
        end: usize,
    ) -> Result<usize, CompileError> {
        let location = self.location();
        self.seq.extend_from_within(start..end);
        self.check_size()?;
        Ok(location)
    }

    /// Patches the jumps at the given locations so that all of them jump
    /// to `target`.
    pub fn patch_jumps(
        &mut self,
        locations: &[usize],
        target: usize,
    ) -> Result<(), CompileError> {
        for location in locations {
            self.patch_jump(*location, offset(*location, target)?);
        }
        Ok(())
    }

    /// Overwrites the offset of the jump instruction at the given location.
    ///
    /// # Panics
    ///
    /// If the instruction at `location` is not a jump.
    fn patch_jump(&mut self, location: usize, offset: Offset) {
        let (instr, size) = InstrParser::decode_instr(&self.seq[location..]);

        assert!(
            matches!(instr, Instr::JumpEq(_) | Instr::JumpNeq(_)),
            "expecting jump at {:#x}, found {}",
            location,
            instr
        );

        self.seq[location + 1..location + size]
            .copy_from_slice(offset.to_le_bytes().as_slice());
    }

    /// Resolves the placeholders remaining in the code. Jumps with the
    /// [`FAIL_TARGET`] placeholder are patched for jumping to `fail`. Any
    /// jump still [`UNRESOLVED`] is patched to continue with the next
    /// instruction.
    pub fn resolve_placeholders(
        &mut self,
        fail: usize,
    ) -> Result<(), CompileError> {
        let placeholders: Vec<(usize, Offset, usize)> =
            InstrParser::new(self.seq.as_slice())
                .filter_map(|(instr, addr)| match instr {
                    Instr::JumpEq(offset) | Instr::JumpNeq(offset)
                        if offset == FAIL_TARGET || offset == UNRESOLVED =>
                    {
                        Some((addr, offset, instr.size()))
                    }
                    _ => None,
                })
                .collect();

        for (addr, placeholder, size) in placeholders.into_iter().rev() {
            if placeholder == FAIL_TARGET {
                self.patch_jump(addr, offset(addr, fail)?);
            } else {
                warn!("unresolved jump at {:#07x}", addr);
                self.patch_jump(addr, offset(addr, addr + size)?);
            }
        }

        Ok(())
    }

    fn check_size(&self) -> Result<(), CompileError> {
        if self.seq.len() > MAX_CODE_SIZE {
            return Err(CompileError::TooLarge);
        }
        Ok(())
    }
}

/// Computes the offset for a jump at `location` that goes to `target`.
fn offset(location: usize, target: usize) -> Result<Offset, CompileError> {
    Offset::try_from(target as isize - location as isize)
        .map_err(|_| CompileError::TooLarge)
}
