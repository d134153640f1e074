use chrono::Local;
use strsim::levenshtein;

use crate::cli::core::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::cli::ui::table_renderer::{Table, TableColumn};
use crate::ledger::{parse_amount, SortKey, SortOrder, TransactionKind};

use super::{format_amount, optional_arg, parse_date, parse_index};

const ADD_USAGE: &str = "add <income|expense> <amount> <category> [date] [description]";
const UPDATE_USAGE: &str =
    "update <index> <income|expense> <amount> <category> <date> [description]";
const DELETE_USAGE: &str = "delete <index> [index...]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("add", "Record an income or expense", ADD_USAGE, cmd_add),
        CommandEntry::new(
            "update",
            "Replace the transaction at an index",
            UPDATE_USAGE,
            cmd_update,
        ),
        CommandEntry::new(
            "delete",
            "Remove the transactions at one or more indices",
            DELETE_USAGE,
            cmd_delete,
        )
        .with_aliases(&["rm"]),
        CommandEntry::new("clear", "Remove every transaction", "clear", cmd_clear),
        CommandEntry::new(
            "list",
            "List transactions, optionally filtered by type and category",
            "list [income|expense|all] [category|all]",
            cmd_list,
        )
        .with_aliases(&["ls"]),
        CommandEntry::new(
            "sort",
            "Reorder the stored transactions",
            "sort <date|amount|category|type|description> [asc|desc]",
            cmd_sort,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 3 {
        return Err(CommandError::usage(ADD_USAGE));
    }
    let kind: TransactionKind = args[0].parse()?;
    let amount = require_amount(args[1])?;
    let category = require_category(args[2])?;
    let date = match args.get(3) {
        Some(raw) => parse_date(raw)?,
        None => Local::now().date_naive().format("%Y-%m-%d").to_string(),
    };
    let description = args.get(4..).map(|rest| rest.join(" ")).unwrap_or_default();

    context
        .ledger
        .add(kind, amount, category, &date, &description)?;
    output::success(format!(
        "Added {} of {} in {} on {} (#{})",
        kind,
        amount,
        category,
        date,
        context.ledger.len() - 1
    ));
    Ok(())
}

fn cmd_update(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 5 {
        return Err(CommandError::usage(UPDATE_USAGE));
    }
    let index = parse_index(args[0])?;
    let kind: TransactionKind = args[1].parse()?;
    let amount = require_amount(args[2])?;
    let category = require_category(args[3])?;
    let date = parse_date(args[4])?;
    let description = args[5..].join(" ");

    if context
        .ledger
        .update(index, kind, amount, category, &date, &description)?
    {
        output::success(format!("Updated transaction #{}", index));
    } else {
        output::warning(format!("No transaction at index {}", index));
    }
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::usage(DELETE_USAGE));
    }
    let mut indices = args
        .iter()
        .map(|raw| parse_index(raw))
        .collect::<Result<Vec<_>, _>>()?;
    indices.sort_unstable();
    indices.dedup();

    let len = context.ledger.len();
    let (present, missing): (Vec<usize>, Vec<usize>) =
        indices.into_iter().partition(|index| *index < len);
    for index in &missing {
        output::warning(format!("No transaction at index {}", index));
    }
    if present.is_empty() {
        return Ok(());
    }

    let prompt = match present.as_slice() {
        [index] => match context.ledger.get(*index) {
            Some(txn) => format!(
                "Delete {} {} {} on {}?",
                txn.kind,
                format_amount(txn.amount),
                txn.category,
                txn.date
            ),
            None => format!("Delete transaction #{}?", index),
        },
        many => format!("Delete {} transactions?", many.len()),
    };
    if !context.confirm(&prompt)? {
        output::info("Delete cancelled.");
        return Ok(());
    }
    context.ledger.delete_many(&present)?;
    for index in present {
        output::success(format!("Deleted transaction #{}", index));
    }
    Ok(())
}

fn cmd_clear(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.ledger.is_empty() {
        output::info("Ledger is already empty.");
        return Ok(());
    }
    let prompt = format!("Remove all {} transactions?", context.ledger.len());
    if !context.confirm(&prompt)? {
        output::info("Clear cancelled.");
        return Ok(());
    }
    context.ledger.clear()?;
    output::success("All transactions removed.");
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let kind = optional_arg(args.first())
        .map(str::parse::<TransactionKind>)
        .transpose()?;
    let category = optional_arg(args.get(1));
    if let Some(name) = category {
        let known = context.ledger.categories();
        if !known.iter().any(|known| known == name) {
            output::warning(format!("No transactions in category `{}`.", name));
            if let Some(close) = closest(name, &known) {
                output::info(format!("Suggestion: `{}`?", close));
            }
            return Ok(());
        }
    }

    let rows = context.ledger.filter_indexed(kind, category);
    if rows.is_empty() {
        output::info("No transactions match.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::right("#"),
        TableColumn::left("Date"),
        TableColumn::left("Type"),
        TableColumn::left("Category").max_width(24),
        TableColumn::right("Amount"),
        TableColumn::left("Description").max_width(40),
    ]);
    for (index, txn) in rows {
        table.push(vec![
            index.to_string(),
            txn.date.clone(),
            txn.kind.to_string(),
            txn.category.clone(),
            format_amount(txn.amount),
            txn.description.clone(),
        ]);
    }
    output::block(table.render());
    Ok(())
}

fn cmd_sort(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw_key) = args.first() else {
        return Err(CommandError::usage(
            "sort <date|amount|category|type|description> [asc|desc]",
        ));
    };
    let key: SortKey = raw_key.parse()?;
    let order: SortOrder = match args.get(1) {
        Some(raw) => raw.parse()?,
        None => SortOrder::default(),
    };
    context.ledger.sort(key, order)?;
    output::success(format!(
        "Sorted by {} ({})",
        key,
        match order {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        }
    ));
    Ok(())
}

fn closest<'a>(input: &str, candidates: &'a [String]) -> Option<&'a str> {
    let lowered = input.to_lowercase();
    candidates
        .iter()
        .map(|name| (levenshtein(&name.to_lowercase(), &lowered), name.as_str()))
        .filter(|(distance, _)| *distance <= 2)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, name)| name)
}

/// Accepts only finite, non-negative amounts; the kind carries the sign.
fn require_amount(raw: &str) -> Result<&str, CommandError> {
    let trimmed = raw.trim();
    if parse_amount(trimmed)? < 0.0 {
        return Err(CommandError::InvalidArguments(format!(
            "amount `{}` must not be negative",
            trimmed
        )));
    }
    Ok(trimmed)
}

fn require_category(raw: &str) -> Result<&str, CommandError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CommandError::InvalidArguments(
            "category must not be empty".into(),
        ));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closest_category_ignores_case_and_far_matches() {
        let known = vec!["Food".to_string(), "Salary".to_string()];
        assert_eq!(closest("fod", &known), Some("Food"));
        assert_eq!(closest("Rent", &known), None);
    }

    #[test]
    fn require_amount_rejects_negatives_and_text() {
        assert_eq!(require_amount(" 12.50 ").unwrap(), "12.50");
        assert_eq!(require_amount("0").unwrap(), "0");
        assert!(matches!(
            require_amount("-5"),
            Err(CommandError::InvalidArguments(message)) if message.contains("negative")
        ));
        assert!(matches!(require_amount("ten"), Err(CommandError::Core(_))));
    }
}
