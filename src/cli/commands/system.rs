use crate::cli::core::{CommandError, CommandResult};
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::{detail, section as output_section};
use crate::cli::registry::{CommandEntry, CommandGroup};
use crate::cli::shell_context::ShellContext;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            CommandGroup::Settings,
            "version",
            "Show build metadata",
            "version",
            cmd_version,
        ),
        CommandEntry::new(
            CommandGroup::Settings,
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new(
            CommandGroup::Settings,
            "exit",
            "Save and exit the shell",
            "exit",
            cmd_exit,
        )
        .with_aliases(&["quit", "q"]),
    ]
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output_section(format!("Output Tracker {}", meta.version));
    detail(format!(
        "  Build hash   : {} ({})",
        meta.git_hash, meta.git_status
    ));
    detail(format!("  Built at     : {}", meta.timestamp));
    detail(format!("  Target       : {}", meta.target));
    detail(format!("  Profile      : {}", meta.profile));
    detail(format!("  Rustc        : {}", meta.rustc));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(command) = args.first().map(|name| name.to_lowercase()) {
        if let Some(command) = context.command(&command) {
            help::print_command(command);
        } else {
            context.suggest_command(args[0]);
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.session.save()?;
    io::print_info(format!("Progress saved to {}", context.session.location().display()));
    Err(CommandError::ExitRequested)
}
