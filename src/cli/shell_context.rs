use std::path::PathBuf;

use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;
use tracker_config::{app_home_dir, Config, ConfigManager};
use tracker_core::{storage::LoadSource, OperationReport, ReportStatus};
use tracker_storage_csv::CsvLedgerStorage;

use crate::cli::core::{CliMode, CommandError, CommandResult, LoopControl};
use crate::cli::io as cli_io;
use crate::cli::output::{self, OutputPreferences};
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::cli::{commands, system_clock::SystemClock};
use crate::core::{errors::CliError, LedgerSession};

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub session: LedgerSession,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub home: PathBuf,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let home = app_home_dir();
        let config_manager = ConfigManager::with_base_dir(&home)?;
        let (config, config_warning) = match config_manager.load() {
            Ok(config) => (config, None),
            Err(err) => (Config::default(), Some(err)),
        };
        apply_config(&config);
        if let Some(err) = config_warning {
            tracing::warn!(%err, "unreadable config; using defaults");
            cli_io::print_warning(format!(
                "Configuration could not be read ({}); using defaults.",
                err
            ));
        }

        let storage = CsvLedgerStorage::new(config.resolve_data_file(&home));
        let session = LedgerSession::open(Box::new(storage), Box::new(SystemClock))?;

        let mut registry = CommandRegistry::new();
        for entry in commands::all_definitions() {
            registry.register(entry);
        }

        let context = Self {
            mode,
            registry,
            session,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            home,
        };
        context.report_load();
        Ok(context)
    }

    fn report_load(&self) {
        let load = self.session.load_metadata();
        for note in &load.migrations {
            cli_io::print_info(format!("Migration: {}", note));
        }
        for warning in &load.warnings {
            cli_io::print_warning(warning);
        }
        match load.source {
            LoadSource::File => {
                cli_io::print_info(format!("Loaded {}", load.path.display()))
            }
            LoadSource::Fresh => cli_io::print_info(format!(
                "No saved progress found; starting a new ledger at {}",
                load.path.display()
            )),
            LoadSource::Recovered => {}
        }
        let unassigned = self.session.state().unassigned_output();
        if unassigned > 0 {
            cli_io::print_warning(format!(
                "{} unit(s) of total output have no category breakdown.",
                unassigned
            ));
            cli_io::print_hint("Use `init` to assign them.");
        }
    }

    pub fn command(&self, word: &str) -> Option<&CommandEntry> {
        self.registry.resolve(word)
    }

    /// Prompt showing today's output; crossing midnight takes the new snapshot first.
    pub fn prompt(&mut self) -> String {
        let today = match self.session.report_totals() {
            Ok(totals) => totals.today_output,
            Err(err) => {
                cli_io::print_warning(err);
                self.session.state().today_output()
            }
        };
        format!("tracker [today {}]> ", today)
    }

    pub fn can_prompt(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    /// Formats points with the configured precision.
    pub fn points(&self, value: f64) -> String {
        format!("{:.*}", usize::from(self.config.decimal_places), value)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let handler = self.registry.resolve(command).map(|entry| entry.handler);
        if let Some(handler) = handler {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .registry
            .words()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(&self.theme, "Exit shell?", true)?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    /// Prints an operation outcome, colored by status.
    pub(crate) fn print_report(&self, report: &OperationReport) {
        match report.status {
            ReportStatus::Applied => cli_io::print_success(&report.message),
            ReportStatus::NoOp => cli_io::print_warning(&report.message),
            ReportStatus::Rejected => cli_io::print_error(&report.message),
        }
    }

    /// Prints a one-line status after a change.
    pub(crate) fn print_status_line(&self) {
        let state = self.session.state();
        cli_io::print_info(format!(
            "Total output: {} | Weighted output: {} | Today: {}",
            state.total_output(),
            self.points(state.weighted_output()),
            state.today_output()
        ));
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        apply_config(&self.config);
        Ok(())
    }
}

/// Pushes display preferences from `config` into the output helpers.
pub fn apply_config(config: &Config) {
    output::set_preferences(OutputPreferences {
        quiet_mode: config.quiet_mode,
        color_enabled: config.ui_color_enabled,
    });
}
