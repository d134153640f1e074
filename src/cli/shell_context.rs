//! Shared runtime state for CLI interactions and command execution.

use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;

use crate::{
    cli::{
        commands,
        core::{CliError, CliMode, CommandError, LoopControl},
        io as cli_io, output,
        registry::CommandRegistry,
    },
    config::{Config, ConfigManager},
    ledger::Ledger,
    storage::JsonStorage,
};

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub ledger: Ledger,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub theme: ColorfulTheme,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        output::set_color_enabled(config.color_enabled && mode == CliMode::Interactive);
        let ledger = open_ledger(&config_manager, &config)?;

        Ok(Self {
            mode,
            registry: commands::registry(),
            ledger,
            config_manager,
            config,
            theme: ColorfulTheme::default(),
            last_command: None,
            running: true,
        })
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn prompt(&self) -> String {
        format!("cashbook [{}]> ", self.ledger.len())
    }

    /// Re-opens the ledger after the configured data file changed.
    pub fn reload_ledger(&mut self) -> Result<(), CommandError> {
        self.ledger = open_ledger(&self.config_manager, &self.config)?;
        Ok(())
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.handler(command) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let lowered = input.to_ascii_lowercase();
        let best = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &lowered), key))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    /// Asks before destructive actions. Script mode always proceeds.
    pub fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true).or(Ok(true))
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(&message);
                output::info("Use `help <command>` for usage details.");
                Ok(())
            }
            other => {
                tracing::debug!(error = ?other, command = ?self.last_command, "command failed");
                output::error(other);
                Ok(())
            }
        }
    }
}

fn open_ledger(manager: &ConfigManager, config: &Config) -> Result<Ledger, crate::LedgerError> {
    let path = manager.data_file(config);
    Ledger::open(Box::new(JsonStorage::new(path)))
}
