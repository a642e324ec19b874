use tracker_core::parse_quantity;

use crate::cli::core::{CommandError, CommandResult};
use crate::cli::io;
use crate::cli::registry::{CommandEntry, CommandGroup};
use crate::cli::shell_context::ShellContext;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            CommandGroup::Day,
            "start-of-day",
            "Override the start-of-day snapshot",
            "start-of-day <units>",
            cmd_start_of_day,
        ),
        CommandEntry::new(
            CommandGroup::Day,
            "today",
            "Set today's output by moving the start-of-day snapshot",
            "today <units>",
            cmd_today,
        ),
    ]
}

fn single_quantity(args: &[&str], usage: &str) -> Result<u64, CommandError> {
    match args {
        [value] => Ok(parse_quantity(value)?),
        _ => Err(CommandError::InvalidArguments(format!("usage: {}", usage))),
    }
}

fn cmd_start_of_day(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let value = single_quantity(args, "start-of-day <units>")?;
    let total = context.session.state().total_output();
    if value > total && context.can_prompt() {
        let proceed = io::confirm_action(
            &context.theme,
            &format!(
                "Start of day ({}) exceeds total output ({}). Continue?",
                value, total
            ),
            false,
        )?;
        if !proceed {
            io::print_info("Operation cancelled.");
            return Ok(());
        }
    }
    let report = context.session.set_start_of_day(value)?;
    context.print_report(&report);
    Ok(())
}

fn cmd_today(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let value = single_quantity(args, "today <units>")?;
    let report = context.session.set_today_output(value)?;
    context.print_report(&report);
    Ok(())
}
