use std::collections::BTreeMap;
use std::io::{self, BufRead, Lines, StdinLock};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Context as ReadlineContext, Editor, Helper,
};
use tracker_domain::{Category, Family};

use crate::cli::core::{CliMode, CommandError, LoopControl};
use crate::cli::output::info as output_info;
use crate::cli::registry::CommandRegistry;
use crate::cli::shell_context::ShellContext;
use crate::core::errors::CliError;

/// Set to run commands from stdin without line editing or prompts.
pub const SCRIPT_ENV_VAR: &str = "OUTPUT_TRACKER_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV_VAR).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    let mut input = match mode {
        CliMode::Interactive => LineSource::editor(&context.registry)?,
        CliMode::Script => LineSource::Stdin(io::stdin().lock().lines()),
    };

    let result = drive(&mut context, &mut input);
    context.session.save()?;
    result
}

fn drive(context: &mut ShellContext, input: &mut LineSource) -> Result<(), CliError> {
    while let Some(line) = input.next_line(context)? {
        match handle_line(context, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

/// Where command lines come from: the line editor, or stdin in script mode.
enum LineSource {
    Editor(Box<Editor<ShellHelper, DefaultHistory>>),
    Stdin(Lines<StdinLock<'static>>),
}

impl LineSource {
    fn editor(registry: &CommandRegistry) -> Result<Self, CliError> {
        let mut editor = Editor::<ShellHelper, DefaultHistory>::new()?;
        editor.set_helper(Some(ShellHelper::new(registry)));
        Ok(LineSource::Editor(Box::new(editor)))
    }

    /// The next line to run, or `None` once input ends or the operator leaves.
    fn next_line(&mut self, context: &mut ShellContext) -> Result<Option<String>, CliError> {
        let editor = match self {
            LineSource::Stdin(lines) => return Ok(lines.next().transpose()?),
            LineSource::Editor(editor) => editor,
        };
        loop {
            match editor.readline(&context.prompt()) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        editor.add_history_entry(line.trim()).ok();
                    }
                    return Ok(Some(line));
                }
                Err(ReadlineError::Interrupted) => {
                    if context.confirm_exit()? {
                        return Ok(None);
                    }
                }
                Err(ReadlineError::Eof) => {
                    output_info("Exiting shell.");
                    return Ok(None);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

pub(crate) fn handle_line(
    context: &mut ShellContext,
    line: &str,
) -> Result<LoopControl, CommandError> {
    let tokens = match shell_words::split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            context.print_warning(&format!("Could not parse `{}`: {}", line.trim(), err));
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    if raw.starts_with('#') {
        return Ok(LoopControl::Continue);
    }

    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    context.dispatch(&raw.to_lowercase(), raw, &args)
}

/// Completion and usage hints for the line editor.
///
/// Completes command words first, then a family after `add`/`remove` followed by
/// that family's `warranty=` entries, and persisted field names after `init`.
struct ShellHelper {
    /// Command word (name or alias) to its canonical name and argument usage.
    commands: BTreeMap<&'static str, (&'static str, &'static str)>,
}

impl ShellHelper {
    fn new(registry: &CommandRegistry) -> Self {
        let commands = registry
            .words()
            .filter_map(|word| {
                registry
                    .resolve(word)
                    .map(|entry| (word, (entry.name, entry.arguments())))
            })
            .collect();
        Self { commands }
    }

    fn canonical(&self, word: &str) -> Option<&'static str> {
        self.commands
            .get(word.to_ascii_lowercase().as_str())
            .map(|(name, _)| *name)
    }

    /// Start offset of the word under the cursor and its candidate replacements.
    fn candidates(&self, prefix: &str) -> (usize, Vec<String>) {
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let words: Vec<&str> = prefix[..start].split_whitespace().collect();

        let pool: Vec<String> = match words.as_slice() {
            [] => self.commands.keys().map(|word| word.to_string()).collect(),
            [command, rest @ ..] => match (self.canonical(command), rest) {
                (Some("add" | "remove"), []) => Family::ALL
                    .into_iter()
                    .map(|family| family.aliases()[0].to_string())
                    .collect(),
                (Some("add" | "remove"), [family, ..]) => match family.parse::<Family>() {
                    Ok(family) => family
                        .categories()
                        .map(|category| format!("{}=", category.warranty().aliases()[0]))
                        .collect(),
                    Err(_) => Vec::new(),
                },
                (Some("init"), _) => Category::all()
                    .map(|category| format!("{}=", category.field_name()))
                    .collect(),
                (Some("help"), []) => self.commands.keys().map(|word| word.to_string()).collect(),
                _ => Vec::new(),
            },
        };

        let needle = prefix[start..].to_ascii_lowercase();
        let matches = pool
            .into_iter()
            .filter(|candidate| candidate.starts_with(&needle))
            .collect();
        (start, matches)
    }

    /// Argument usage once a complete command word and a space have been typed.
    fn usage_hint(&self, line: &str) -> Option<String> {
        let word = line.strip_suffix(' ')?;
        if word.is_empty() || word.contains(char::is_whitespace) {
            return None;
        }
        let (_, arguments) = self.commands.get(word.to_ascii_lowercase().as_str())?;
        (!arguments.is_empty()).then(|| arguments.to_string())
    }
}

impl Helper for ShellHelper {}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, matches) = self.candidates(&line[..pos]);
        let pairs = matches
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        self.usage_hint(line)
    }
}

impl Highlighter for ShellHelper {}

impl Validator for ShellHelper {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    fn helper() -> ShellHelper {
        let mut registry = CommandRegistry::new();
        for entry in commands::all_definitions() {
            registry.register(entry);
        }
        ShellHelper::new(&registry)
    }

    #[test]
    fn completes_command_words_and_aliases() {
        let (start, matches) = helper().candidates("re");
        assert_eq!(start, 0);
        assert_eq!(matches, vec!["remove"]);
        assert_eq!(helper().candidates("q").1, vec!["q", "quit"]);
    }

    #[test]
    fn completes_families_then_their_warranty_types() {
        let helper = helper();
        assert_eq!(helper.candidates("add l").1, vec!["lm5a", "lm5ba", "lm5ca"]);
        assert_eq!(helper.candidates("rm 525 qm=1 f"), (12, vec!["flat=".to_string()]));
        assert_eq!(
            helper.candidates("add perfecto ").1,
            vec!["qm=", "flat=", "manuf="]
        );
        assert!(helper.candidates("add nosuch q").1.is_empty());
    }

    #[test]
    fn completes_field_names_for_init() {
        let (_, matches) = helper().candidates("init count_poc");
        assert_eq!(matches, vec!["count_poc_repair="]);
    }

    #[test]
    fn hints_usage_after_a_command_word() {
        let helper = helper();
        assert_eq!(helper.usage_hint("today "), Some("<units>".to_string()));
        assert_eq!(helper.usage_hint("totals "), None);
        assert_eq!(helper.usage_hint("today"), None);
        assert_eq!(helper.usage_hint("today 3 "), None);
    }
}
