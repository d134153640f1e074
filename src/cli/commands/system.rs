use std::path::Path;

use crate::cli::core::{CommandError, CommandResult};
use crate::cli::help;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "export",
            "Write all transactions to a JSON file",
            "export <path>",
            cmd_export,
        ),
        CommandEntry::new(
            "import",
            "Replace all transactions with a JSON file",
            "import <path>",
            cmd_import,
        ),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit).with_aliases(&["quit"]),
    ]
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(path) = args.first() else {
        return Err(CommandError::usage("export <path>"));
    };
    context.ledger.export(Path::new(path))?;
    output::success(format!(
        "Exported {} transactions to {}",
        context.ledger.len(),
        path
    ));
    Ok(())
}

fn cmd_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(path) = args.first() else {
        return Err(CommandError::usage("import <path>"));
    };
    let path = Path::new(path);
    if path.exists()
        && !context.confirm(&format!(
            "Replace {} transactions with {}?",
            context.ledger.len(),
            path.display()
        ))?
    {
        output::info("Import cancelled.");
        return Ok(());
    }
    if context.ledger.import(path)? {
        output::success(format!(
            "Imported {} transactions from {}",
            context.ledger.len(),
            path.display()
        ));
    }
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section(format!("Cashbook {}", env!("CARGO_PKG_VERSION")));
    output::info(format!("  Build hash: {}", env!("CASHBOOK_BUILD_HASH")));
    output::info(format!("  Built at  : {}", env!("CASHBOOK_BUILD_TIMESTAMP")));
    output::info(format!("  Profile   : {}", env!("CASHBOOK_BUILD_PROFILE")));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.registry.get(&name.to_ascii_lowercase()) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(name),
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
