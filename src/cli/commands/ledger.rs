use tracker_core::{parse_assignment, parse_family_quantities};
use tracker_domain::{Batch, Family};

use crate::cli::core::{CommandError, CommandResult};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandGroup};
use crate::cli::shell_context::ShellContext;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            CommandGroup::Ledger,
            "add",
            "Record serviced units for one family",
            "add <family> [warranty=qty ...]   e.g. add 525 qm=2 flat=3",
            cmd_add,
        ),
        CommandEntry::new(
            CommandGroup::Ledger,
            "remove",
            "Remove previously recorded units",
            "remove <family> [warranty=qty ...]",
            cmd_remove,
        )
        .with_aliases(&["rm"]),
        CommandEntry::new(
            CommandGroup::Ledger,
            "init",
            "Replace the category breakdown; entries must sum to total output",
            "init [family:warranty=qty | field=qty ...]   e.g. init 525:qm=4 count_flat=6",
            cmd_init,
        ),
    ]
}

#[derive(Clone, Copy)]
enum Action {
    Add,
    Remove,
}

impl Action {
    fn verb(self) -> &'static str {
        match self {
            Action::Add => "add",
            Action::Remove => "remove",
        }
    }
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    post_family_batch(context, args, Action::Add)
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    post_family_batch(context, args, Action::Remove)
}

fn post_family_batch(context: &mut ShellContext, args: &[&str], action: Action) -> CommandResult {
    let Some((family, entries)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(format!(
            "usage: {} <family> [warranty=qty ...]; families: {}",
            action.verb(),
            family_list()
        )));
    };
    let family: Family = family.parse()?;

    let batch = if !entries.is_empty() {
        parse_family_quantities(family, entries)?
    } else if context.can_prompt() {
        if matches!(action, Action::Remove) && context.session.state().total_output() == 0 {
            Batch::new()
        } else {
            prompt_family_batch(context, family, action)?
        }
    } else {
        return Err(CommandError::InvalidArguments(format!(
            "quantities are required in script mode, e.g. `{} {} {}=1`",
            action.verb(),
            family.aliases()[0],
            family
                .categories()
                .next()
                .map(|category| category.warranty().aliases()[0])
                .unwrap_or("flat")
        )));
    };

    let report = match action {
        Action::Add => context.session.apply_add(&batch)?,
        Action::Remove => context.session.apply_remove(&batch)?,
    };
    context.print_report(&report);
    if report.applied() {
        context.print_status_line();
    }
    Ok(())
}

fn prompt_family_batch(
    context: &ShellContext,
    family: Family,
    action: Action,
) -> Result<Batch, CommandError> {
    io::print_info(format!(
        "Enter quantities to {} for each {} warranty type (blank or 0 allowed):",
        action.verb(),
        family
    ));
    let mut batch = Batch::new();
    for category in family.categories() {
        let prompt = match action {
            Action::Add => category.warranty().label().to_string(),
            Action::Remove => format!(
                "{} (recorded {})",
                category.warranty(),
                context.session.state().count(category)
            ),
        };
        batch.set(category, io::prompt_quantity(&context.theme, &prompt)?);
    }
    Ok(batch)
}

fn cmd_init(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let assignment = if !args.is_empty() {
        parse_assignment(args)?
    } else if context.can_prompt() {
        prompt_assignment(context)?
    } else {
        return Err(CommandError::InvalidArguments(
            "usage: init <family:warranty=qty | field=qty> ...".into(),
        ));
    };

    let report = context.session.apply_initialize(&assignment)?;
    context.print_report(&report);
    if report.applied() {
        context.print_status_line();
    }
    Ok(())
}

fn prompt_assignment(context: &ShellContext) -> Result<Batch, CommandError> {
    let state = context.session.state();
    io::print_info(format!(
        "Enter the full breakdown; entries must sum to total output ({}).",
        state.total_output()
    ));
    let mut batch = Batch::new();
    for family in Family::ALL {
        output_section(family);
        for category in family.categories() {
            let prompt = format!("{} (currently {})", category.warranty(), state.count(category));
            batch.set(category, io::prompt_quantity(&context.theme, &prompt)?);
        }
    }
    Ok(batch)
}

pub(crate) fn family_list() -> String {
    Family::ALL
        .into_iter()
        .map(|family| family.aliases()[0])
        .collect::<Vec<_>>()
        .join(", ")
}
