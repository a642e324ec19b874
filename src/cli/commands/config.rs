use tracker_config::Config;

use crate::cli::core::{CommandError, CommandResult};
use crate::cli::io;
use crate::cli::output::{detail, section as output_section};
use crate::cli::registry::{CommandEntry, CommandGroup};
use crate::cli::shell_context::ShellContext;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        CommandGroup::Settings,
        "config",
        "View and change shell preferences",
        "config [show | set <key> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => show_config(context),
        ["set", key, value @ ..] if !value.is_empty() => {
            set_config_value(context, key, &value.join(" "))
        }
        _ => Err(CommandError::InvalidArguments(format!(
            "usage: config [show | set <key> <value>]; keys: {}",
            Config::KEYS.join(", ")
        ))),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    output_section("Configuration");
    for key in Config::KEYS {
        detail(format!("  {:<18}: {}", key, context.config.setting(key)?));
    }
    detail(format!(
        "  {:<18}: {}",
        "active data file",
        context.session.location().display()
    ));
    detail(format!(
        "  {:<18}: {}",
        "config file",
        context.config_manager.config_path().display()
    ));
    Ok(())
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    context.config.apply_setting(key, value)?;
    context.persist_config()?;
    io::print_success(format!(
        "Configuration updated: {} = {}",
        key,
        context.config.setting(key)?
    ));
    if key == "data_file" {
        let target = context.config.resolve_data_file(&context.home);
        if target != context.session.location() {
            io::print_info(format!(
                "The data file {} will be used from the next start.",
                target.display()
            ));
        }
    }
    Ok(())
}
