use crate::cli::commands::ledger::family_list;
use crate::cli::io;
use crate::cli::output::{detail, section as output_section};
use crate::cli::registry::{CommandEntry, CommandRegistry};

pub fn print_overview(registry: &CommandRegistry) {
    for (group, entries) in registry.grouped() {
        output_section(group);
        for entry in entries {
            detail(format!("  {:<14} {}", entry.name, entry.description));
        }
    }
    io::print_hint(format!(
        "Use `help <command>` for details. Families: {}.",
        family_list()
    ));
}

pub fn print_command(entry: &CommandEntry) {
    output_section(format!("Help: {}", entry.name));
    detail(format!("  Description: {}", entry.description));
    detail(format!("  Usage: {}", entry.usage));
    if !entry.aliases.is_empty() {
        detail(format!("  Aliases: {}", entry.aliases.join(", ")));
    }
}
