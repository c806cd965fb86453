use std::fmt::Write as _;

use super::defaults::Output;
use super::registry::{CommandSummary, Descriptions};
use super::spec::CommandSpec;
use crate::params::NoArgs;

const MIN_NAME_WIDTH: usize = 12;

/// `help`: print every registered command with its description.
///
/// With verbose on (any `--` token, e.g. `help --all`) each command's
/// options are listed under it.
pub fn help_command(descriptions: Descriptions, output: Output) -> CommandSpec {
    CommandSpec::new::<NoArgs>("help")
        .description("Display all commands.")
        .check_with(move |args| {
            output(&render_help(&descriptions.entries(), args.verbose));
            Ok(true)
        })
}

pub fn render_help(entries: &[(String, CommandSummary)], verbose: bool) -> String {
    let width = entries
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0)
        .max(MIN_NAME_WIDTH);

    let mut out = String::new();
    let _ = writeln!(out, "{:<width$} | Description", "Command Name", width = width);
    let _ = writeln!(out, "{}-|------------", "-".repeat(width));

    for (name, summary) in entries {
        let _ = writeln!(
            out,
            "{:<width$} | {}",
            name,
            summary.description.as_deref().unwrap_or(""),
            width = width
        );
        if verbose {
            for option in &summary.options {
                let _ = writeln!(out, "    {}", option);
            }
        }
    }

    out
}
