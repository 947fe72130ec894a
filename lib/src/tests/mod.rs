/*! End-to-end tests. */
use pretty_assertions::assert_eq;

use crate::{CompileError, Regex, RegexFlag, RegexFlags};

macro_rules! test_re {
    ($re:expr, $input:expr, $expected_result:expr) => {{
        let re = Regex::new($re, RegexFlags::none()).unwrap();

        assert_eq!(
            re.is_match($input),
            $expected_result,
            "\n\n`{}` matching {:?} should be {}, but it is {}",
            $re,
            $input,
            $expected_result,
            !$expected_result
        );
    }};
}

macro_rules! re_true {
    ($re:expr, $input:expr) => {{
        test_re!($re, $input, true);
    }};
}

macro_rules! re_false {
    ($re:expr, $input:expr) => {{
        test_re!($re, $input, false);
    }};
}

#[test]
fn literals() {
    re_true!("abc", "abc");
    re_true!("abc", "abcdef");
    re_true!("a_1", "a_1");
    re_false!("abd", "abcdef");
    re_false!("abc", "ab");
    re_false!("abc", "xabc");
    re_false!("a", "");
}

#[test]
fn any_character() {
    re_true!("a.c", "abc");
    re_true!("a.c", "a_c");
    re_true!("a.c", "a-c");
    re_true!("...", "a b");
    re_false!("a.c", "ac");
    re_false!(".", "");
}

#[test]
fn character_ranges() {
    re_true!("[a-c]", "b");
    re_true!("[a-c]", "c");
    re_false!("[a-c]", "d");
    re_true!("[A-Z][a-z]*", "Hello");
    re_false!("[A-Z][a-z]*", "hello");
    re_true!("[0-9][0-9]", "42");
    re_false!("[0-9][0-9]", "4x");
    re_true!("[!-/]", "%");
    re_false!("[!-/]", "0");
}

#[test]
fn zero_or_more() {
    re_true!("[0-9]*", "123456789");
    re_true!("[0-9]*", "12345abcde");
    re_true!("[0-9]*", "abcde12345");
    re_true!("x[0-9]*y", "x123y");
    re_true!("x[0-9]*y", "xy");
    re_false!("x[0-9]*y", "x12z");
}

#[test]
fn one_or_more() {
    re_true!("[0-9]+", "123456789");
    re_true!("[0-9]+", "12345abcde");
    re_true!("[0-9]+", "1abcde");
    re_true!("[0-9]+", "12abcde");
    re_false!("[0-9]+", "abcde12345");
    re_true!("(ab)+", "ababx");
    re_false!("(ab)+", "ba");
    re_true!("x(ab)+y", "xababy");
    re_false!("x(ab)+y", "xy");
}

#[test]
fn zero_or_one() {
    re_true!("a?b", "b");
    re_true!("a?b", "ab");
    re_false!("a?b", "c");
    re_true!("a?([b-e])+", "abcdebcde");
    re_true!("a?([b-e])+", "bcdebcde");
    re_false!("a?([b-e])+", "rbcdebcde");
}

#[test]
fn alternation() {
    re_true!("a*b|cd", "aaaaaacd");
    re_true!("a*b|cd", "abd");
    re_true!("a*b|cd", "bd");
    re_true!("a*b|cd", "cd");
    re_false!("a*b|cd", "aaaacacd");
    re_true!("cat|dog", "dog");
    re_false!("cat|dog", "cow");
    re_false!("cat|dog", "ca");
    re_true!("a|b|c", "c");
    re_false!("a|b|c", "d");
}

#[test]
fn groups() {
    re_true!("(a|b)(c|d)", "bd");
    re_true!("(a|b)(c|d)", "ac");
    re_false!("(a|b)(c|d)", "ab");
    re_true!("x(a|b)*y", "xababy");
    re_false!("x(a|b)*y", "xabcy");
    re_true!("((a))", "a");
    re_true!("(a(b(c)))", "abc");
    re_false!("(a(b(c)))", "abd");
}

#[test]
fn empty_input() {
    re_true!("[0-9]*", "");
    re_false!("[0-9]+", "");
    re_true!("a?", "");
    re_true!("(ab)*", "");
    re_true!("a|b?", "");
    re_false!("a|b", "");
}

#[test]
fn no_backtracking() {
    // Repetitions consume as much as they can, and never give anything
    // back.
    re_false!("a*a", "aaa");
    re_false!("[a-z]+z", "xyz");
}

#[test]
fn byte_inputs() {
    let re = Regex::new("[a-f]+", RegexFlags::none()).unwrap();

    assert!(re.is_match(b"cafe"));
    assert!(re.is_match(b"f\x00\xff".as_slice()));
    assert!(!re.is_match(vec![0xff_u8, b'a']));
}

#[test]
fn determinism() {
    let patterns = ["a*b|cd", "a?([b-e])+", "((ab|c)+d|e)*f", "[0-9]+"];
    let inputs = ["", "aaaacacd", "bcdebcde", "ababcdf", "123", "cdcdeef"];

    for pattern in patterns {
        let re1 = Regex::new(pattern, RegexFlags::none()).unwrap();
        let re2 = Regex::new(pattern, RegexFlags::none()).unwrap();

        assert_eq!(re1.program(), re2.program());

        for input in inputs {
            let result = re1.is_match(input);
            assert_eq!(result, re1.is_match(input));
            assert_eq!(result, re2.is_match(input));
        }
    }
}

#[test]
fn debug_compilation() {
    let mut flags = RegexFlags::none();
    flags.set(RegexFlag::DebugCompilation);

    let debug = Regex::new("a*b|cd", flags).unwrap();
    let plain = Regex::new("a*b|cd", RegexFlags::none()).unwrap();

    assert_eq!(debug.program(), plain.program());

    for input in ["aaaaaacd", "abd", "bd", "cd", "aaaacacd"] {
        assert_eq!(debug.is_match(input), plain.is_match(input));
    }
}

#[test]
fn program() {
    let re = Regex::new("a+", RegexFlags::none()).unwrap();

    assert_eq!(re.as_str(), "a+");
    assert_eq!(re.to_string(), "a+");
    assert!(!re.program().is_empty());
    assert_eq!(re.program().len(), re.program().as_bytes().len());
    assert!(!re.program().has_unresolved_jumps());
    assert_eq!(
        re.program().to_string(),
        r#"00000: TESTSINGLE a
00002: INCPOSEQ
00003: JUMPNEQ +21
00008: TESTSINGLE a
0000a: INCPOSEQ
0000b: JUMPEQ -3
00010: SETFLAG 1
00012: JUMPNEQ +6
00017: ACCEPT
00018: FAIL
"#
    );
}

#[test]
fn tokens() {
    assert_eq!(
        crate::tokens("a?([b-e])+").unwrap(),
        "CHAR(a) QUESTION CONCAT GROUP_BEGIN RANGE(b-e) GROUP_END PLUS"
    );

    assert_eq!(
        crate::tokens("a-"),
        Err(CompileError::UnsupportedCharacter { character: '-', offset: 1 })
    );
}

#[test]
fn errors() {
    macro_rules! re_error {
        ($re:expr, $msg:expr) => {{
            let err = Regex::new($re, RegexFlags::none()).unwrap_err();
            assert_eq!(err.to_string(), $msg);
        }};
    }

    re_error!("", "unexpected end of pattern");
    re_error!("a b", "unsupported character ` ` at offset 1");
    re_error!("ab[0-9", "unterminated character range starting at offset 2");
    re_error!("[9-0]", "invalid character range `[9-0]` at offset 0");
    re_error!("a+*", "unexpected `*` at offset 2");
    re_error!("(a|b", "missing `)` for group opened at offset 0");
    re_error!("a|b)", "unmatched `)` at offset 3");
    re_error!(
        "(a?)+",
        "repeated expression at offset 0 can match an empty string"
    );
}

#[test]
fn shared_between_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Regex>();

    let re = Regex::new("a*b|cd", RegexFlags::none()).unwrap();

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..100 {
                    assert!(re.is_match("aaaaaacd"));
                    assert!(!re.is_match("aaaacacd"));
                }
            });
        }
    });
}
