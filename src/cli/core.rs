//! Core CLI dispatch, error reporting and intent handling.

use std::{io, path::PathBuf};

use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;

use crate::{
    config::{Config, ConfigError, ConfigManager, SETTABLE_KEYS},
    core::ledger_manager::LedgerManager,
    currency::CurrencyFormatter,
    errors::{Field, LedgerError, ValidationError},
    export::{export_report, ExportError, ExportFormat, ReportDocument},
    ledger::TypeFilter,
    report::{Period, ReportGenerator, ReportOutcome},
    storage::{json_backend::JsonStorage, LoadRecovery},
    utils::paths::app_data_dir,
};

use super::commands::default_registry;
use super::intent::{DeleteTarget, Intent};
use super::io as cli_io;
use super::shell_context::{CliMode, ShellContext};
use super::view::{self, RowStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Failures that stop the shell itself.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Terminal error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Command failed: {0}")]
    Command(String),
}

/// Failures of a single command; reported and the loop continues.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Ledger(LedgerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<LedgerError> for CommandError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Validation(err) => CommandError::Validation(err),
            other => CommandError::Ledger(other),
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, app_data_dir())
    }

    /// Opens config and ledger stored under `base`.
    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = match config_manager.load() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "falling back to default configuration");
                cli_io::print_warning(format!(
                    "Could not read {}: {err}. Using default settings.",
                    config_manager.path().display()
                ));
                Config::default()
            }
        };
        let (formatter, reports) = presentation_for(&config);

        let storage = JsonStorage::new(Some(base))?;
        let manager = LedgerManager::open(Box::new(storage), config.storage_key.clone());
        if let LoadRecovery::Reset { reason } = manager.load_recovery() {
            cli_io::print_warning(format!(
                "Stored transactions could not be read ({reason}); starting with an empty ledger."
            ));
        }

        Ok(ShellContext {
            mode,
            registry: default_registry(),
            manager,
            reports,
            formatter,
            config_manager,
            config,
            theme: ColorfulTheme::default(),
            filter: TypeFilter::All,
            last_listing: Vec::new(),
            selected_period: None,
            last_command: None,
            running: true,
        })
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn prompt(&self) -> String {
        let balance = self.formatter.format(self.manager.totals().balance);
        match self.filter {
            TypeFilter::All => format!("expenses [{balance}]> "),
            filter => format!("expenses:{filter} [{balance}]> "),
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.get(command).map(|entry| entry.handler) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match super::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                cli_io::print_warning(err.to_string());
                return Ok(LoopControl::Continue);
            }
        };
        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };

        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.last_command = Some(line.trim().to_string());
        tracing::debug!(%command, args = args.len(), "dispatching command");

        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Did you mean `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(&self.theme, "Exit shell?", true)?)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
            }
            CommandError::Validation(err) => {
                tracing::debug!(field = %err.field(), "validation failed");
                cli_io::print_error(capitalize(&err.to_string()));
                if err.field() == Field::ReportPeriod {
                    cli_io::print_hint("Select a period first, e.g. `report monthly 2024-01`.");
                }
            }
            other => {
                tracing::warn!(error = %other, "command failed");
                cli_io::print_error(other.to_string());
            }
        }
    }

    fn row_style(&self) -> RowStyle<'_> {
        let zone = self.reports.zone();
        RowStyle {
            formatter: &self.formatter,
            zone,
            today: zone.local_date(self.manager.now()),
        }
    }

    /// Performs the ledger or report call behind `intent` and renders the result.
    pub fn apply(&mut self, intent: Intent) -> CommandResult {
        match intent {
            Intent::AddTransaction(draft) => {
                let txn = self.manager.add(draft)?;
                cli_io::print_success(format!(
                    "Transaction added successfully! ({} {})",
                    txn.description,
                    view::signed_amount(&txn, &self.formatter)
                ));
                self.render_ledger();
            }
            Intent::DeleteTransaction(target) => {
                let id = match &target {
                    DeleteTarget::Id(id) => id.clone(),
                    DeleteTarget::Row(row) => row
                        .checked_sub(1)
                        .and_then(|index| self.last_listing.get(index))
                        .cloned()
                        .ok_or_else(|| {
                            CommandError::InvalidArguments(format!(
                                "No row {row} in the last listing. Run `list` to see row numbers."
                            ))
                        })?,
                };
                match self.manager.remove(&id)? {
                    Some(_) => cli_io::print_info("Transaction deleted"),
                    None => cli_io::print_warning(format!("No transaction matches {target}.")),
                }
                self.render_ledger();
            }
            Intent::SelectFilter(filter) => {
                self.filter = filter;
                self.render_list();
            }
            Intent::ShowTotals => view::print_totals(&self.manager.totals(), &self.formatter),
            Intent::SelectReportPeriod(period) => {
                self.selected_period = Some(period);
                match self.reports.generate(&period, self.manager.ledger()) {
                    ReportOutcome::Empty { .. } => {
                        cli_io::print_info("No transactions found for the selected period")
                    }
                    ReportOutcome::Ready(report) => {
                        view::print_report_preview(&report, &self.row_style())
                    }
                }
            }
            Intent::Export { format, dir } => self.export(format, dir)?,
            Intent::ShowConfig => self.show_config(),
            Intent::SetConfig { key, value } => {
                let mut updated = self.config.clone();
                updated.set(&key, &value)?;
                self.config_manager.save(&updated)?;
                let (formatter, reports) = presentation_for(&updated);
                self.formatter = formatter;
                self.reports = reports;
                self.config = updated;
                tracing::info!(%key, "updated setting");
                cli_io::print_success(format!("Updated {key}."));
            }
        }
        Ok(())
    }

    fn export(&mut self, format: ExportFormat, dir: Option<PathBuf>) -> CommandResult {
        let period: Period = self
            .selected_period
            .ok_or(ValidationError::Missing(Field::ReportPeriod))?;
        let report = match self.reports.generate(&period, self.manager.ledger()) {
            ReportOutcome::Empty { .. } => {
                cli_io::print_info("No transactions found for the selected period");
                return Ok(());
            }
            ReportOutcome::Ready(report) => report,
        };

        let document = ReportDocument::from_report(&report, &self.formatter, self.reports.zone());
        let dir = dir.unwrap_or_else(|| self.config.export_dir());
        let renderer = format.renderer();
        let path = export_report(&document, renderer.as_ref(), &dir)?;
        cli_io::print_success(format!("Report saved to {}", path.display()));
        Ok(())
    }

    fn render_list(&mut self) {
        let rows = self.manager.list(self.filter);
        self.last_listing = rows.iter().map(|txn| txn.id.clone()).collect();
        view::print_transactions(&rows, self.filter, &self.row_style());
    }

    fn render_ledger(&mut self) {
        view::print_totals(&self.manager.totals(), &self.formatter);
        self.render_list();
    }

    fn show_config(&self) {
        super::output::section("Settings");
        let config = &self.config;
        let entries = [
            ("locale", config.locale.clone()),
            ("currency", config.currency.clone()),
            ("timezone", config.timezone.to_string()),
            ("export-dir", config.export_dir().display().to_string()),
        ];
        for (key, value) in entries {
            super::output::line(format!("  {key:<11} {value}"));
        }
        super::output::line(format!("  {:<11} {}", "storage", self.manager.storage_key()));
        cli_io::print_hint(format!(
            "Change a setting with `config set <{}> <value>`.",
            SETTABLE_KEYS.join("|")
        ));
    }
}

/// Formatter and report generator matching `config`, or defaults when it is unusable.
fn presentation_for(config: &Config) -> (CurrencyFormatter, ReportGenerator) {
    match config.formatter() {
        Ok(formatter) => {
            let reports = ReportGenerator::new(config.timezone, formatter.locale.clone());
            (formatter, reports)
        }
        Err(err) => {
            tracing::warn!(error = %err, "using default formatting");
            cli_io::print_warning(format!("{err}. Using default formatting."));
            let formatter = CurrencyFormatter::default();
            let reports = ReportGenerator::new(config.timezone, formatter.locale.clone());
            (formatter, reports)
        }
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
pub(crate) fn process_script(
    base: &std::path::Path,
    lines: &[&str],
) -> Result<ShellContext, CliError> {
    let mut app = ShellContext::with_base_dir(CliMode::Script, base.to_path_buf())?;
    for line in lines {
        match app.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => app.report_error(err),
        }
    }
    Ok(app)
}
