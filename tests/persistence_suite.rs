mod common;

use std::fs;

use cashbook::{SortKey, SortOrder, TransactionKind};
use common::{reopen, seed_reference, setup_ledger, temp_dir};

#[test]
fn missing_file_opens_empty_and_first_add_creates_it() {
    let (mut ledger, path) = setup_ledger();
    assert!(ledger.is_empty());
    assert!(!path.exists());

    ledger
        .add(TransactionKind::Income, "250", "Salary", "2024-04-01", "April")
        .unwrap();
    assert!(path.exists());
    assert_eq!(reopen(&path).transactions(), ledger.transactions());
}

#[test]
fn every_mutation_is_written_through() {
    let (mut ledger, path) = setup_ledger();
    seed_reference(&mut ledger);
    assert_eq!(reopen(&path).len(), 3);

    ledger
        .update(2, TransactionKind::Expense, "12.25", "Snacks", "2024-02-02", "")
        .unwrap();
    assert_eq!(reopen(&path).get(2).unwrap().amount, 12.25);

    ledger.delete(0).unwrap();
    let reloaded = reopen(&path);
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.balance(), -52.25);
}

#[test]
fn sort_order_is_persisted() {
    let (mut ledger, path) = setup_ledger();
    seed_reference(&mut ledger);
    ledger.sort(SortKey::Category, SortOrder::Descending).unwrap();

    let categories: Vec<String> = reopen(&path)
        .transactions()
        .iter()
        .map(|txn| txn.category.clone())
        .collect();
    assert_eq!(categories, vec!["Salary", "Food", "Food"]);
}

#[test]
fn import_replaces_and_persists() {
    let (mut ledger, path) = setup_ledger();
    seed_reference(&mut ledger);

    let source = temp_dir().join("backup.json");
    fs::write(
        &source,
        r#"[{"type":"expense","amount":7,"category":"Bus","date":"2024-05-05"}]"#,
    )
    .unwrap();

    assert!(ledger.import(&source).unwrap());
    assert_eq!(ledger.len(), 1);
    let reloaded = reopen(&path);
    assert_eq!(reloaded.get(0).unwrap().category, "Bus");
    assert_eq!(reloaded.get(0).unwrap().description, "");
}

#[test]
fn import_of_invalid_json_keeps_current_records() {
    let (mut ledger, path) = setup_ledger();
    seed_reference(&mut ledger);

    let source = temp_dir().join("broken.json");
    fs::write(&source, "[{").unwrap();
    assert!(ledger.import(&source).is_err());
    assert_eq!(ledger.len(), 3);
    assert_eq!(reopen(&path).len(), 3);
}

#[test]
fn failed_write_leaves_previous_file_intact() {
    let (mut ledger, path) = setup_ledger();
    seed_reference(&mut ledger);
    let original = fs::read_to_string(&path).unwrap();

    // A directory at the staging path makes File::create fail.
    let staging = path.with_extension("json.tmp");
    fs::create_dir_all(&staging).unwrap();

    let result = ledger.add(TransactionKind::Expense, "1", "Coffee", "2024-02-03", "");
    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), original);

    fs::remove_dir_all(&staging).unwrap();
}

#[test]
fn clear_writes_an_empty_array() {
    let (mut ledger, path) = setup_ledger();
    seed_reference(&mut ledger);
    ledger.clear().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap().trim(), "[]");
    assert!(reopen(&path).is_empty());
}

#[test]
fn multi_delete_is_written_once_with_survivors_in_order() {
    let (mut ledger, path) = setup_ledger();
    seed_reference(&mut ledger);
    assert_eq!(ledger.delete_many(&[0, 2]).unwrap(), 2);

    let reloaded = reopen(&path);
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.get(0).unwrap().amount, 40.0);
    assert_eq!(reloaded.balance(), -40.0);
}
