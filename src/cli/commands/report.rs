use std::path::PathBuf;

use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult};
use crate::cli::intent::Intent;
use crate::cli::shell_context::ShellContext;
use crate::export::ExportFormat;
use crate::report::{Period, PeriodKind};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "report",
            "Select a report period and preview it",
            "report <daily YYYY-MM-DD|monthly YYYY-MM|yearly YYYY>",
            cmd_report,
        ),
        CommandDefinition::new(
            "export",
            "Export the selected report period",
            "export [pdf|csv] [directory]",
            cmd_export,
        ),
    ]
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() > 2 {
        return Err(CommandError::InvalidArguments(
            "usage: report <daily|monthly|yearly> <value>".into(),
        ));
    }
    let kind = args.first().copied().unwrap_or("").parse::<PeriodKind>()?;
    let period = Period::from_selection(kind, args.get(1).copied())?;
    context.apply(Intent::SelectReportPeriod(period))
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (format, dir) = match args {
        [] => (ExportFormat::default(), None),
        [first] => match first.parse::<ExportFormat>() {
            Ok(format) => (format, None),
            // a lone argument that is not a format names the directory
            Err(_) => (ExportFormat::default(), Some(PathBuf::from(first))),
        },
        [format, dir] => (format.parse::<ExportFormat>()?, Some(PathBuf::from(dir))),
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: export [pdf|csv] [directory]".into(),
            ))
        }
    };
    context.apply(Intent::Export { format, dir })
}
