use dialoguer::theme::ColorfulTheme;

use crate::{
    config::{Config, ConfigManager},
    core::ledger_manager::LedgerManager,
    currency::CurrencyFormatter,
    ledger::{TransactionId, TypeFilter},
    report::{Period, ReportGenerator},
};

use super::commands::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Everything the shell owns for the lifetime of a session.
pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) registry: CommandRegistry,
    pub(crate) manager: LedgerManager,
    pub(crate) reports: ReportGenerator,
    pub(crate) formatter: CurrencyFormatter,
    pub(crate) config_manager: ConfigManager,
    pub(crate) config: Config,
    pub(crate) theme: ColorfulTheme,
    pub(crate) filter: TypeFilter,
    /// Ids in the order they were shown by the last listing.
    pub(crate) last_listing: Vec<TransactionId>,
    pub(crate) selected_period: Option<Period>,
    pub(crate) last_command: Option<String>,
    pub(crate) running: bool,
}
