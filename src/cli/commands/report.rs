use tracker_core::SummaryService;

use crate::cli::core::{CommandError, CommandResult};
use crate::cli::io;
use crate::cli::output::{detail, section as output_section};
use crate::cli::registry::{CommandEntry, CommandGroup};
use crate::cli::shell_context::ShellContext;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            CommandGroup::Reports,
            "totals",
            "Show total, weighted, and today's output",
            "totals",
            cmd_totals,
        ),
        CommandEntry::new(
            CommandGroup::Reports,
            "weighted",
            "Show weighted output",
            "weighted",
            cmd_weighted,
        ),
        CommandEntry::new(
            CommandGroup::Reports,
            "breakdown",
            "Show units per family and warranty type",
            "breakdown [--compact]",
            cmd_breakdown,
        ),
        CommandEntry::new(
            CommandGroup::Reports,
            "points",
            "Show the points awarded per unit",
            "points",
            cmd_points,
        ),
    ]
}

fn cmd_totals(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let totals = context.session.report_totals()?;
    output_section("Totals");
    detail(format!("  Total output        : {}", totals.total_output));
    detail(format!(
        "  Weighted output     : {}",
        context.points(totals.weighted_output)
    ));
    detail(format!("  Today's output      : {}", totals.today_output));
    detail(format!(
        "  Start of day        : {}{}",
        totals.start_of_day_output,
        totals
            .start_date
            .map(|date| format!(" ({})", date.format("%Y-%m-%d")))
            .unwrap_or_default()
    ));
    if totals.unassigned_output > 0 {
        io::print_warning(format!(
            "{} unit(s) have no category breakdown; use `init` to assign them.",
            totals.unassigned_output
        ));
    }
    Ok(())
}

fn cmd_weighted(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let totals = context.session.report_totals()?;
    detail(format!(
        "Weighted Output: {}",
        context.points(totals.weighted_output)
    ));
    Ok(())
}

fn cmd_breakdown(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let compact = match args {
        [] => false,
        ["--compact"] | ["-c"] => true,
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: breakdown [--compact]".into(),
            ))
        }
    };
    let rows = context.session.report_breakdown(!compact)?;
    output_section("Breakdown of Units");
    if rows.is_empty() {
        io::print_info("No units recorded yet.");
    }
    for row in rows {
        detail(format!(
            "- {}: {} ({} points)",
            row.family,
            row.total,
            context.points(row.points)
        ));
        for (category, count) in row.categories {
            if compact && count == 0 {
                continue;
            }
            detail(format!("    - {}: {}", category.warranty(), count));
        }
    }
    let unassigned = context.session.state().unassigned_output();
    if unassigned > 0 {
        detail(format!("- Unassigned: {}", unassigned));
    }
    Ok(())
}

fn cmd_points(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output_section("Points per unit");
    for row in SummaryService::point_table() {
        detail(format!(
            "  {:<34} {:>6}   {}",
            row.category.to_string(),
            context.points(row.points),
            row.field
        ));
    }
    Ok(())
}
