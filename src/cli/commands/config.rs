use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult};
use crate::cli::intent::Intent;
use crate::cli::shell_context::ShellContext;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "config",
        "Show or change settings",
        "config [set <locale|currency|timezone|export-dir> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => context.apply(Intent::ShowConfig),
        ["set", key, value] => context.apply(Intent::SetConfig {
            key: key.to_string(),
            value: value.to_string(),
        }),
        ["set", key] => context.apply(Intent::SetConfig {
            key: key.to_string(),
            value: String::new(),
        }),
        _ => Err(CommandError::InvalidArguments(
            "usage: config [set <key> <value>]".into(),
        )),
    }
}
