use bcre::RegexFlags;
use clap::{arg, ArgMatches, Command};

use crate::commands::compile_pattern;
use crate::help;

pub fn disasm() -> Command {
    super::command("disasm")
        .about("Show the code produced for a regular expression")
        .long_about(help::DISASM_LONG_HELP)
        .arg(arg!(<PATTERN>).help("Regular expression"))
        // Keep options sorted alphabetically by their long name.
        .arg(arg!(-t --"tokens").help("Print the tokens before the code"))
}

pub fn exec_disasm(args: &ArgMatches) -> anyhow::Result<()> {
    let pattern = args.get_one::<String>("PATTERN").unwrap();
    let print_tokens = args.get_flag("tokens");

    let re = compile_pattern(pattern, RegexFlags::none())?;

    if print_tokens {
        println!("tokens: {}\n", bcre::tokens(pattern)?);
    }

    print!("{}", re.program());

    Ok(())
}
