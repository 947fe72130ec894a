mod commands;
mod help;

#[cfg(test)]
mod tests;

use crossterm::tty::IsTty;
use std::{io, process};
use yansi::Color::Red;
use yansi::Paint;

use crate::commands::cli;

const APP_HELP_TEMPLATE: &str = r#"bcre {version}, a bytecode regular expression engine.

{author-with-newline}
{before-help}{usage-heading}
  {usage}

{all-args}{after-help}
"#;

const EXIT_ERROR: i32 = 1;

fn main() -> anyhow::Result<()> {
    // Enable support for ANSI escape codes in Windows. In other platforms
    // this is a no-op.
    if let Err(err) = enable_ansi_support::enable_ansi_support() {
        println!("could not enable ANSI support: {}", err)
    }

    #[cfg(feature = "logging")]
    env_logger::init();

    // If stdout is not a tty (for example, because it was redirected to a
    // file) turn off colors.
    if !io::stdout().is_tty() {
        yansi::disable();
    }

    let args = cli().get_matches();

    let result = match args.subcommand() {
        Some(("check", args)) => commands::exec_check(args),
        Some(("disasm", args)) => commands::exec_disasm(args),
        Some(("match", args)) => commands::exec_match(args),
        Some(("completion", args)) => commands::exec_completion(args),
        _ => unreachable!(),
    };

    if let Err(err) = result {
        if let Some(source) = err.source() {
            eprintln!("{} {}: {}", "error:".paint(Red).bold(), err, source);
        } else {
            eprintln!("{} {}", "error:".paint(Red).bold(), err);
        }
        process::exit(EXIT_ERROR);
    }

    Ok(())
}
