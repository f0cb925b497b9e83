mod common;

use std::fs;

use common::{draft, json_manager, temp_base};
use expense_ledger::{
    errors::LedgerError,
    ledger::{Category, TransactionId, TransactionKind},
    storage::{LoadRecovery, StorageBackend, DEFAULT_STORAGE_KEY},
};

fn tmp_path_for(path: &std::path::Path) -> std::path::PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.tmp", existing),
        None => String::from("tmp"),
    };
    tmp.set_extension(ext);
    tmp
}

#[test]
fn ledger_survives_reopen() {
    let base = temp_base();
    let (mut manager, _) = json_manager(base.clone());
    manager.add(draft("Lunch", 250.0, "food", "debit")).unwrap();
    manager
        .add(draft("Salary", 50_000.0, "salary", "credit"))
        .unwrap();
    let bus = manager.add(draft("Bus", 30.5, "transport", "debit")).unwrap();
    manager.remove(&bus.id).unwrap();

    let (reopened, _) = json_manager(base);
    assert_eq!(reopened.load_recovery(), &LoadRecovery::Loaded);
    assert_eq!(reopened.ledger(), manager.ledger());
    assert!(reopened.ledger().transaction(&bus.id).is_none());
}

#[test]
fn full_precision_amounts_reload_bit_for_bit() {
    let base = temp_base();
    let (mut manager, storage) = json_manager(base.clone());
    let amounts = [0.1 + 0.2, 271.0 / 3.0, 106_632_686.751_354_05, 1e-7];
    for (i, amount) in amounts.iter().enumerate() {
        manager
            .add(draft(&format!("entry {i}"), *amount, "food", "debit"))
            .unwrap();
    }
    storage
        .write(
            "webAmounts",
            r#"[{"id":"lq2x7m0split1","description":"Split bill","amount":0.30000000000000004,"category":"food","type":"debit","date":"2024-01-15T10:00:00.000Z"}]"#,
        )
        .unwrap();

    let (reopened, storage) = json_manager(base);
    let loaded: Vec<u64> = reopened.ledger().iter().map(|t| t.amount.to_bits()).collect();
    let saved: Vec<u64> = manager.ledger().iter().map(|t| t.amount.to_bits()).collect();
    assert_eq!(loaded, saved);

    let web = expense_ledger::storage::load_ledger(&storage, "webAmounts");
    let amount = web.ledger.iter().next().expect("one entry").amount;
    assert_eq!(amount.to_bits(), 0.30000000000000004f64.to_bits());
}

#[test]
fn stored_payload_uses_browser_field_names() {
    let base = temp_base();
    let (mut manager, storage) = json_manager(base);
    manager.add(draft("Lunch", 250.0, "food", "debit")).unwrap();

    let raw = fs::read_to_string(storage.entry_path(DEFAULT_STORAGE_KEY)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entry = &value.as_array().expect("bare array")[0];
    for field in ["id", "description", "amount", "category", "type", "date"] {
        assert!(entry.get(field).is_some(), "missing field {field}");
    }
    assert_eq!(entry["type"], "debit");
    assert_eq!(entry["category"], "food");
}

#[test]
fn payload_written_by_the_web_app_loads() {
    let base = temp_base();
    let (_, storage) = json_manager(base.clone());
    storage
        .write(
            DEFAULT_STORAGE_KEY,
            r#"[{"id":"lq2x3k9abc12","description":"Lunch","amount":250,"category":"food","type":"debit","date":"2024-01-15T12:30:00.000Z"},
                {"id":"lq2x1aa0zz99","description":"Gift","amount":75.5,"category":"gifts","type":"credit","date":"2024-01-14T08:00:00.000Z"}]"#,
        )
        .unwrap();

    let (manager, _) = json_manager(base);
    let ledger = manager.ledger();
    assert_eq!(ledger.len(), 2);
    let lunch = ledger
        .transaction(&TransactionId::from("lq2x3k9abc12"))
        .expect("id kept verbatim");
    assert_eq!(lunch.amount, 250.0);
    assert_eq!(lunch.kind, TransactionKind::Debit);
    assert_eq!(lunch.category, Category::Food);
    let gift = &ledger.transactions()[1];
    assert_eq!(gift.category, Category::Custom("gifts".into()));
    assert_eq!(manager.totals().balance, -174.5);
}

#[test]
fn corrupt_payload_loads_empty_and_is_preserved() {
    let base = temp_base();
    let (_, storage) = json_manager(base.clone());
    storage.write(DEFAULT_STORAGE_KEY, "{not json").unwrap();

    let (mut manager, storage) = json_manager(base);
    assert!(manager.ledger().is_empty());
    assert!(matches!(
        manager.load_recovery(),
        LoadRecovery::Reset { .. }
    ));

    let backups: Vec<_> = fs::read_dir(storage.backups_dir())
        .expect("backups dir")
        .filter_map(|entry| entry.ok())
        .collect();
    assert_eq!(backups.len(), 1);
    assert_eq!(fs::read_to_string(backups[0].path()).unwrap(), "{not json");

    manager.add(draft("Fresh", 10.0, "other", "credit")).unwrap();
    let raw = fs::read_to_string(storage.entry_path(DEFAULT_STORAGE_KEY)).unwrap();
    assert!(raw.contains("Fresh"));
}

#[test]
fn atomic_save_failure_preserves_original_file() {
    let base = temp_base();
    let (mut manager, storage) = json_manager(base);
    manager.add(draft("Lunch", 250.0, "food", "debit")).unwrap();

    let path = storage.entry_path(DEFAULT_STORAGE_KEY);
    let original = fs::read_to_string(&path).expect("read original file");

    // A directory at the temp file name makes File::create fail.
    let tmp_path = tmp_path_for(&path);
    fs::create_dir_all(&tmp_path).unwrap();

    let result = manager.add(draft("Dinner", 400.0, "food", "debit"));
    assert!(
        matches!(result, Err(LedgerError::Io(_))),
        "expected the write to fail when the temp path is a directory"
    );
    assert_eq!(manager.ledger().len(), 1, "failed add must be rolled back");

    let current = fs::read_to_string(&path).expect("read after failure");
    assert_eq!(
        current, original,
        "atomic save failure must not corrupt the original file"
    );

    let lunch = manager.ledger().transactions()[0].id.clone();
    assert!(manager.remove(&lunch).is_err());
    assert_eq!(manager.ledger().len(), 1, "failed remove must be rolled back");

    let _ = fs::remove_dir_all(&tmp_path);
}
