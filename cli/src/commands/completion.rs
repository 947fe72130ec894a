use std::io;

use clap::{arg, value_parser, ArgMatches, Command};
use clap_complete::{generate, Shell};

use crate::commands::cli;
use crate::help;

/// Name of the binary as it appears in the completion code.
const BIN_NAME: &str = "bcre";

pub fn completion() -> Command {
    super::command("completion")
        .about("Output shell completion code for the specified shell")
        .long_about(help::COMPLETION_LONG_HELP)
        .arg(
            arg!(<SHELL>)
                .help("Shell for which the code is generated")
                .value_parser(value_parser!(Shell)),
        )
}

pub fn exec_completion(args: &ArgMatches) -> anyhow::Result<()> {
    let shell = *args.get_one::<Shell>("SHELL").unwrap();
    generate(shell, &mut cli(), BIN_NAME, &mut io::stdout().lock());
    Ok(())
}
