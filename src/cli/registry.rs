use std::collections::BTreeMap;
use std::fmt;

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// Help sections, listed in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CommandGroup {
    Ledger,
    Reports,
    Day,
    Settings,
}

impl fmt::Display for CommandGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CommandGroup::Ledger => "Recording units",
            CommandGroup::Reports => "Reports",
            CommandGroup::Day => "Daily output",
            CommandGroup::Settings => "Shell",
        })
    }
}

pub struct CommandEntry {
    pub group: CommandGroup,
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        group: CommandGroup,
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            group,
            name,
            aliases: &[],
            description,
            usage,
            handler,
        }
    }

    pub const fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    /// Usage text after the command word, e.g. `<family> [warranty=qty ...]`.
    pub fn arguments(&self) -> &'static str {
        self.usage
            .strip_prefix(self.name)
            .map(str::trim_start)
            .unwrap_or(self.usage)
    }
}

/// Commands in registration order, reachable by name or alias.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    index: BTreeMap<&'static str, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `entry`. A later entry claiming an existing name or alias takes it over.
    pub fn register(&mut self, entry: CommandEntry) {
        let slot = self.entries.len();
        self.index.insert(entry.name, slot);
        for alias in entry.aliases {
            self.index.insert(*alias, slot);
        }
        self.entries.push(entry);
    }

    pub fn resolve(&self, word: &str) -> Option<&CommandEntry> {
        self.index.get(word).map(|slot| &self.entries[*slot])
    }

    /// Every word that dispatches to a command, names and aliases alike.
    pub fn words(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.index.keys().copied()
    }

    /// Entries grouped by help section, registration order within a group.
    pub fn grouped(&self) -> BTreeMap<CommandGroup, Vec<&CommandEntry>> {
        let mut groups: BTreeMap<CommandGroup, Vec<&CommandEntry>> = BTreeMap::new();
        for entry in &self.entries {
            groups.entry(entry.group).or_default().push(entry);
        }
        groups
    }
}
