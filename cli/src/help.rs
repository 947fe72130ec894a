pub const CHECK_LONG_HELP: &str = r#"Check if regular expressions are correct

Each <PATTERN> is compiled independently, and the result is reported for each
of them. The command fails if any of the patterns can't be compiled."#;

pub const COMPLETION_LONG_HELP: &str = r#"Output shell completion code for the specified shell

Examples:

bcre completion bash > $(brew --prefix)/etc/bash_completion.d/bcre
bcre completion zsh > "${fpath[1]}/_bcre""#;

pub const DEBUG_LONG_HELP: &str = r#"Log the tokens and the code produced for the pattern

The information is logged at the `info` level, use the RUST_LOG environment
variable for enabling it. Example:

RUST_LOG=info bcre match --debug 'a*b|cd' aaacd"#;

pub const DISASM_LONG_HELP: &str = r#"Show the code produced for a regular expression

Each line contains the address of an instruction, followed by the instruction
itself. Jump offsets are relative to the address of the jump.

Example:

bcre disasm 'a|b'

00000: TESTSINGLE a
00002: INCPOSEQ
00003: JUMPEQ +8
00008: TESTSINGLE b
0000a: INCPOSEQ
0000b: JUMPNEQ +6
00010: ACCEPT
00011: FAIL"#;

pub const MATCH_LONG_HELP: &str = r#"Match a regular expression against some inputs

Matches are always anchored at the start of the input, an input matches if
some prefix of it matches <PATTERN>. Each matching input is printed in its own
line. When no <INPUT> is given, the lines read from the standard input are
used as inputs."#;
