use std::collections::HashMap;

pub mod config;
pub mod report;
pub mod system;
pub mod transaction;

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    let mut commands = Vec::new();
    commands.extend(transaction::definitions());
    commands.extend(report::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandDefinition {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

/// Commands by name, plus aliases resolving to a canonical command.
pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandDefinition>,
    aliases: HashMap<&'static str, &'static str>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new(definitions: Vec<CommandDefinition>) -> Self {
        let mut commands = HashMap::new();
        let mut order = Vec::new();
        for definition in definitions {
            order.push(definition.name);
            commands.insert(definition.name, definition);
        }
        Self {
            commands,
            aliases: HashMap::new(),
            order,
        }
    }

    pub fn with_alias(mut self, alias: &'static str, target: &'static str) -> Self {
        self.aliases.insert(alias, target);
        self
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        let name = self.aliases.get(name).copied().unwrap_or(name);
        self.commands.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.order
            .iter()
            .filter_map(move |name| self.commands.get(name))
    }

    /// Command names followed by aliases; used for completion and suggestions.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        let mut aliases: Vec<_> = self.aliases.keys().copied().collect();
        aliases.sort_unstable();
        self.order.iter().copied().chain(aliases)
    }
}

pub(crate) fn default_registry() -> CommandRegistry {
    CommandRegistry::new(all_definitions())
        .with_alias("remove", "delete")
        .with_alias("rm", "delete")
        .with_alias("quit", "exit")
}
