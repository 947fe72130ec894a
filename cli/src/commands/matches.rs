use std::io;
use std::io::BufRead;

use anyhow::Context;
use bcre::{Regex, RegexFlag, RegexFlags};
use clap::{arg, ArgAction, ArgMatches, Command};

use crate::commands::compile_pattern;
use crate::help;

pub fn matches() -> Command {
    super::command("match")
        .about("Match a regular expression against some inputs")
        .long_about(help::MATCH_LONG_HELP)
        .arg(arg!(<PATTERN>).help("Regular expression"))
        .arg(
            arg!([INPUT])
                .help("Input to match, one or more")
                .action(ArgAction::Append),
        )
        // Keep options sorted alphabetically by their long name.
        // For instance, --bar goes before --foo.
        .arg(
            arg!(-d --"debug")
                .help("Log the tokens and the code for the pattern")
                .long_help(help::DEBUG_LONG_HELP),
        )
        .arg(arg!(-n --"negate").help("Print non-matching inputs only"))
}

pub fn exec_match(args: &ArgMatches) -> anyhow::Result<()> {
    let pattern = args.get_one::<String>("PATTERN").unwrap();
    let inputs = args.get_many::<String>("INPUT");
    let negate = args.get_flag("negate");

    let mut flags = RegexFlags::none();

    if args.get_flag("debug") {
        flags.set(RegexFlag::DebugCompilation);
    }

    let re = compile_pattern(pattern, flags)?;

    if let Some(inputs) = inputs {
        for input in inputs {
            print_if_match(&re, input, negate);
        }
    } else {
        for line in io::stdin().lock().lines() {
            let line = line.context("can not read from stdin")?;
            print_if_match(&re, &line, negate);
        }
    }

    Ok(())
}

fn print_if_match(re: &Regex, input: &str, negate: bool) {
    if re.is_match(input) != negate {
        println!("{}", input);
    }
}
