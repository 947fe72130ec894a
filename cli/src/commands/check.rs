use anyhow::bail;
use bcre::{Regex, RegexFlags};
use clap::{arg, ArgAction, ArgMatches, Command};
use yansi::Color::{Green, Red};
use yansi::Paint;

use crate::help;

pub fn check() -> Command {
    super::command("check")
        .about("Check if regular expressions are correct")
        .long_about(help::CHECK_LONG_HELP)
        .arg(
            arg!(<PATTERN>)
                .help("Regular expression to check")
                .action(ArgAction::Append),
        )
}

pub fn exec_check(args: &ArgMatches) -> anyhow::Result<()> {
    let patterns = args.get_many::<String>("PATTERN").unwrap();

    let mut errors = 0;

    for pattern in patterns {
        match Regex::new(pattern, RegexFlags::none()) {
            Ok(_) => {
                println!("[ {} ] {}", "PASS".paint(Green).bold(), pattern);
            }
            Err(err) => {
                errors += 1;
                println!(
                    "[ {} ] {}\n{}",
                    "FAIL".paint(Red).bold(),
                    pattern,
                    err
                );
            }
        }
    }

    if errors > 0 {
        bail!("{} pattern(s) failed", errors);
    }

    Ok(())
}
