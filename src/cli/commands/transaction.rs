use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult};
use crate::cli::intent::{DeleteTarget, Intent};
use crate::cli::io;
use crate::cli::shell_context::{CliMode, ShellContext};
use crate::errors::{Field, ValidationError};
use crate::ledger::{parse_amount, Category, TransactionDraft, TransactionKind, TypeFilter};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "add",
            "Record an income or expense",
            "add <description> <amount> <category> <credit|debit>",
            cmd_add,
        ),
        CommandDefinition::new(
            "delete",
            "Delete a transaction by row number or id",
            "delete <row|id>",
            cmd_delete,
        ),
        CommandDefinition::new(
            "list",
            "Show transactions, optionally only income or expenses",
            "list [all|credit|debit]",
            cmd_list,
        ),
        CommandDefinition::new(
            "totals",
            "Show balance, income and expenses",
            "totals",
            cmd_totals,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() > 4 {
        return Err(CommandError::InvalidArguments(
            "usage: add <description> <amount> <category> <credit|debit> (quote multi-word descriptions)"
                .into(),
        ));
    }
    let mut fields: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
    if context.mode == CliMode::Interactive && fields.len() < 4 {
        prompt_missing_fields(context, &mut fields)?;
    }
    fields.resize(4, String::new());
    let draft = draft_from_fields(&fields[0], &fields[1], &fields[2], &fields[3])?;
    context.apply(Intent::AddTransaction(draft))
}

/// Builds a draft, checking fields in form order so the first problem is reported.
pub(crate) fn draft_from_fields(
    description: &str,
    amount: &str,
    category: &str,
    kind: &str,
) -> Result<TransactionDraft, ValidationError> {
    if description.trim().is_empty() {
        return Err(ValidationError::Missing(Field::Description));
    }
    let amount = parse_amount(amount)?;
    Ok(TransactionDraft::new(description, amount, category, kind))
}

fn prompt_missing_fields(context: &ShellContext, fields: &mut Vec<String>) -> CommandResult {
    let theme = &context.theme;
    if fields.is_empty() {
        fields.push(io::prompt_text(theme, "Description")?);
    }
    if fields.len() < 2 {
        fields.push(io::prompt_text(theme, "Amount")?);
    }
    if fields.len() < 3 {
        let labels: Vec<String> = Category::BUILT_IN
            .iter()
            .map(Category::display_label)
            .collect();
        let index = io::select_index(theme, "Category", &labels)?;
        fields.push(Category::BUILT_IN[index].as_str().to_string());
    }
    if fields.len() < 4 {
        let kinds = [TransactionKind::Credit, TransactionKind::Debit];
        let labels: Vec<String> = kinds
            .iter()
            .map(|kind| format!("{} ({})", kind.label(), kind.as_str()))
            .collect();
        let index = io::select_index(theme, "Type", &labels)?;
        fields.push(kinds[index].as_str().to_string());
    }
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [target] = args else {
        return Err(CommandError::InvalidArguments("usage: delete <row|id>".into()));
    };
    let target = match target.parse::<DeleteTarget>() {
        Ok(target) => target,
        Err(never) => match never {},
    };
    context.apply(Intent::DeleteTransaction(target))
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let filter = match args {
        [] => context.filter,
        [value] => value.parse::<TypeFilter>()?,
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: list [all|credit|debit]".into(),
            ))
        }
    };
    context.apply(Intent::SelectFilter(filter))
}

fn cmd_totals(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.apply(Intent::ShowTotals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_is_checked_before_amount() {
        let err = draft_from_fields(" ", "", "food", "debit").unwrap_err();
        assert_eq!(err.field(), Field::Description);
        let err = draft_from_fields("Lunch", "", "food", "debit").unwrap_err();
        assert_eq!(err, ValidationError::Missing(Field::Amount));
    }

    #[test]
    fn fields_become_a_draft() {
        let draft = draft_from_fields("Lunch", "1,250.50", "food", "debit").unwrap();
        assert_eq!(draft, TransactionDraft::new("Lunch", 1250.5, "food", "debit"));
    }
}
