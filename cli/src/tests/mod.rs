use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn cli_match() {
    Command::cargo_bin("bcre")
        .unwrap()
        .arg("match")
        .arg("a*b|cd")
        .arg("aaaaaacd")
        .arg("abd")
        .arg("aaaacacd")
        .arg("bd")
        .assert()
        .success()
        .stdout("aaaaaacd\nabd\nbd\n");
}

#[test]
fn cli_match_negate() {
    Command::cargo_bin("bcre")
        .unwrap()
        .arg("match")
        .arg("--negate")
        .arg("a?([b-e])+")
        .arg("abcdebcde")
        .arg("rbcdebcde")
        .assert()
        .success()
        .stdout("rbcdebcde\n");
}

#[test]
fn cli_match_stdin() {
    Command::cargo_bin("bcre")
        .unwrap()
        .arg("match")
        .arg("[0-9]+")
        .write_stdin("123456789\nabcde12345\n1abcde\n")
        .assert()
        .success()
        .stdout("123456789\n1abcde\n");
}

#[test]
fn cli_match_invalid_pattern() {
    Command::cargo_bin("bcre")
        .unwrap()
        .arg("match")
        .arg("(a")
        .arg("a")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "error: can not compile `(a`: missing `)` for group opened at \
             offset 0",
        ));
}

#[test]
fn cli_check() {
    Command::cargo_bin("bcre")
        .unwrap()
        .arg("check")
        .arg("a+")
        .arg("[0-9]*x")
        .assert()
        .success()
        .stdout("[ PASS ] a+\n[ PASS ] [0-9]*x\n");
}

#[test]
fn cli_check_errors() {
    Command::cargo_bin("bcre")
        .unwrap()
        .arg("check")
        .arg("a+")
        .arg("a b")
        .assert()
        .failure()
        .stdout(predicate::str::contains("[ PASS ] a+"))
        .stdout(predicate::str::contains(
            "[ FAIL ] a b\nunsupported character ` ` at offset 1",
        ))
        .stderr(predicate::str::contains("error: 1 pattern(s) failed"));
}

#[test]
fn cli_disasm() {
    Command::cargo_bin("bcre")
        .unwrap()
        .arg("disasm")
        .arg("a|b")
        .assert()
        .success()
        .stdout(
            r#"00000: TESTSINGLE a
00002: INCPOSEQ
00003: JUMPEQ +8
00008: TESTSINGLE b
0000a: INCPOSEQ
0000b: JUMPNEQ +6
00010: ACCEPT
00011: FAIL
"#,
        );
}

#[test]
fn cli_disasm_tokens() {
    Command::cargo_bin("bcre")
        .unwrap()
        .arg("disasm")
        .arg("--tokens")
        .arg("a*")
        .assert()
        .success()
        .stdout(
            r#"tokens: CHAR(a) STAR

00000: TESTSINGLE a
00002: INCPOSEQ
00003: JUMPEQ -3
00008: SETFLAG 1
0000a: JUMPNEQ +6
0000f: ACCEPT
00010: FAIL
"#,
        );
}

#[test]
fn cli_completion() {
    Command::cargo_bin("bcre")
        .unwrap()
        .arg("completion")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("bcre"));
}

#[test]
fn cli_match_debug_logging() {
    Command::cargo_bin("bcre")
        .unwrap()
        .env("RUST_LOG", "info")
        .arg("match")
        .arg("--debug")
        .arg("a|b")
        .arg("a")
        .assert()
        .success()
        .stdout("a\n")
        .stderr(predicate::str::contains("CHAR(a) ALT CHAR(b)"))
        .stderr(predicate::str::contains("TESTSINGLE a"))
        .stderr(predicate::str::contains("JUMPEQ +8"));
}

#[test]
fn cli_match_no_debug_logging() {
    Command::cargo_bin("bcre")
        .unwrap()
        .env("RUST_LOG", "info")
        .arg("match")
        .arg("a|b")
        .arg("a")
        .assert()
        .success()
        .stdout("a\n")
        .stderr(predicate::str::contains("CHAR(a)").not());
}

#[test]
fn cli_compile_error_logging() {
    Command::cargo_bin("bcre")
        .unwrap()
        .env("RUST_LOG", "error")
        .arg("match")
        .arg("a b")
        .arg("a")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "can't compile regexp `a b`: unsupported character ` ` at \
             offset 1",
        ));
}
