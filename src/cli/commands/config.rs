use std::path::PathBuf;

use crate::cli::core::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::ledger::Period;

const USAGE: &str = "config [show|set <period|color|data-file> <value>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change shell preferences",
        USAGE,
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return show_config(context);
    }

    if !args[0].eq_ignore_ascii_case("set") || args.len() < 3 {
        return Err(CommandError::usage(USAGE));
    }

    let value = args[2..].join(" ");
    let value = value.trim();
    match args[1].to_ascii_lowercase().as_str() {
        "period" => {
            context.config.default_period = value.parse::<Period>()?;
        }
        "color" => {
            let enabled = parse_toggle(value)?;
            context.config.color_enabled = enabled;
            output::set_color_enabled(enabled);
        }
        "data-file" | "data_file" => {
            context.config.data_file = if value.is_empty() || value.eq_ignore_ascii_case("default")
            {
                None
            } else {
                Some(PathBuf::from(value))
            };
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown config key `{}` (use period, color or data-file)",
                other
            )))
        }
    }

    context.config_manager.save(&context.config)?;
    if args[1].to_ascii_lowercase().starts_with("data") {
        context.reload_ledger()?;
        output::info(format!(
            "{} transactions loaded from {}",
            context.ledger.len(),
            context.ledger.location().display()
        ));
    }
    output::success("Configuration saved.");
    Ok(())
}

fn show_config(context: &ShellContext) -> CommandResult {
    output::section("Configuration");
    output::info(format!(
        "Config file   : {}",
        context.config_manager.path().display()
    ));
    output::info(format!(
        "Data file     : {}",
        context.ledger.location().display()
    ));
    output::info(format!(
        "Default period: {}",
        context.config.default_period
    ));
    output::info(format!(
        "Color         : {}",
        if context.config.color_enabled {
            "on"
        } else {
            "off"
        }
    ));
    Ok(())
}

fn parse_toggle(value: &str) -> Result<bool, CommandError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(CommandError::InvalidArguments(format!(
            "expected on or off, got `{}`",
            other
        ))),
    }
}
