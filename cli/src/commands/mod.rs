mod check;
mod completion;
mod disasm;
mod matches;

pub use check::*;
pub use completion::*;
pub use disasm::*;
pub use matches::*;

use anyhow::Context;
use bcre::{Regex, RegexFlags};
use clap::{command, crate_authors, Command};

use crate::{commands, APP_HELP_TEMPLATE};

pub fn command(name: &'static str) -> Command {
    Command::new(name).help_template(
        r#"{about-with-newline}
{usage-heading}
  {usage}

{all-args}
"#,
    )
}

pub fn cli() -> Command {
    command!()
        .author(crate_authors!("\n")) // requires `cargo` feature
        .arg_required_else_help(true)
        .help_template(APP_HELP_TEMPLATE)
        .subcommand_required(true)
        .subcommands(vec![
            commands::matches(),
            commands::check(),
            commands::disasm(),
            commands::completion(),
        ])
}

/// Compiles a pattern, adding the pattern itself to the error message if
/// the compilation fails.
fn compile_pattern(
    pattern: &str,
    flags: RegexFlags,
) -> Result<Regex, anyhow::Error> {
    Regex::new(pattern, flags)
        .with_context(|| format!("can not compile `{}`", pattern))
}
