use std::collections::BTreeMap;

use crate::cli::core::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::cli::ui::table_renderer::{Table, TableColumn};
use crate::ledger::{Period, Totals, TransactionKind};

use super::{format_amount, optional_arg};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "balance",
            "Show total income, expense and balance",
            "balance",
            cmd_balance,
        ),
        CommandEntry::new(
            "summary",
            "Summarize by daily, weekly, isoweekly, monthly, yearly or decade buckets",
            "summary [period] [start|all] [end|all]",
            cmd_summary,
        ),
        CommandEntry::new(
            "categories",
            "Summarize income and expense per category, optionally within a date range",
            "categories [income|expense|all] [start|all] [end|all]",
            cmd_categories,
        ),
    ]
}

fn cmd_balance(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let totals = context.ledger.totals();
    output::info(format!("Income : {}", format_amount(totals.income)));
    output::info(format!("Expense: {}", format_amount(totals.expense)));
    output::success(format!("Balance: {}", format_amount(context.ledger.balance())));
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let period: Period = match args.first() {
        Some(raw) => raw.parse()?,
        None => context.config.default_period,
    };
    let (start, end) = date_range(args.get(1), args.get(2))?;

    let buckets = context.ledger.summarize(period, start, end)?;
    if buckets.is_empty() {
        output::info("No transactions in range.");
        return Ok(());
    }
    output::section(format!("Summary ({})", period));
    output::block(totals_table(period.as_str(), &buckets).render());
    Ok(())
}

fn cmd_categories(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let kind = optional_arg(args.first())
        .map(str::parse::<TransactionKind>)
        .transpose()?;
    let (start, end) = date_range(args.get(1), args.get(2))?;

    let groups = context.ledger.category_totals(kind, start, end);
    if groups.is_empty() {
        output::info("No transactions in range.");
        return Ok(());
    }
    output::section("Categories");
    output::block(totals_table("category", &groups).render());
    Ok(())
}

/// Optional inclusive bounds; a start after the end is rejected.
fn date_range<'a>(
    start: Option<&&'a str>,
    end: Option<&&'a str>,
) -> Result<(Option<&'a str>, Option<&'a str>), CommandError> {
    let start = optional_arg(start);
    let end = optional_arg(end);
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(CommandError::InvalidArguments(format!(
                "start `{}` is after end `{}`",
                start, end
            )));
        }
    }
    Ok((start, end))
}

fn totals_table(label: &str, rows: &BTreeMap<String, Totals>) -> Table {
    let mut table = Table::new(vec![
        TableColumn::left(label).max_width(32),
        TableColumn::right("Income"),
        TableColumn::right("Expense"),
        TableColumn::right("Net"),
    ]);
    for (key, totals) in rows {
        table.push(vec![
            key.clone(),
            format_amount(totals.income),
            format_amount(totals.expense),
            format_amount(totals.net()),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_table_lists_buckets_in_key_order() {
        let mut rows = BTreeMap::new();
        rows.insert(
            "2024-02".to_string(),
            Totals {
                income: 0.0,
                expense: 10.0,
            },
        );
        rows.insert(
            "2024-01".to_string(),
            Totals {
                income: 100.0,
                expense: 40.0,
            },
        );
        let rendered = totals_table("monthly", &rows).render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with(" 2024-01"));
        assert!(lines[2].ends_with("60.00"));
        assert!(lines[3].ends_with("-10.00"));
    }

    #[test]
    fn date_range_treats_wildcards_as_open_and_rejects_inverted_bounds() {
        assert_eq!(
            date_range(Some(&"2024-01-01"), Some(&"all")).unwrap(),
            (Some("2024-01-01"), None)
        );
        assert_eq!(date_range(None, None).unwrap(), (None, None));
        assert!(date_range(Some(&"2024-02-01"), Some(&"2024-01-01")).is_err());
    }
}
