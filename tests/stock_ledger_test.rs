// ==========================================
// 库存台账测试
// ==========================================
// 覆盖: before+delta=after 全程成立、缓存库存与台账一致、
//       不足扣减失败不留条目、台账只追加
// ==========================================

mod test_helpers;

use inventory_ops::domain::stock::StockSubject;
use inventory_ops::domain::types::TransactionType;
use inventory_ops::engine::stock_ledger::StockLedgerService;
use inventory_ops::logging;
use inventory_ops::repository::part_repo::PartRepository;
use inventory_ops::repository::stock_ledger_repo::StockLedgerRepository;

#[test]
fn test_ledger_chain_stays_consistent_through_operations() {
    logging::init_test();
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let conn = inventory_ops::db::open_sqlite_connection(&db_path).unwrap();

    let part_id = test_helpers::seed_part(&conn, "P-800", 10);
    let subject = StockSubject::part(part_id);
    StockLedgerService::record(&conn, subject, TransactionType::Initial, 0, 10).unwrap();

    StockLedgerService::receive_part_stock(&conn, part_id, 5).unwrap();
    StockLedgerService::issue_part_stock(&conn, part_id, 8).unwrap();
    StockLedgerService::adjust_part_stock(&conn, part_id, 20).unwrap();

    let entries = StockLedgerRepository::find_by_subject(&conn, subject).unwrap();
    assert_eq!(entries.len(), 4);

    // 每条 before + delta == after，且链上前后衔接
    for entry in &entries {
        assert_eq!(entry.before_stock + entry.change_quantity, entry.after_stock);
        assert!(entry.before_stock >= 0);
        assert!(entry.after_stock >= 0);
    }
    for pair in entries.windows(2) {
        assert_eq!(pair[0].after_stock, pair[1].before_stock);
    }

    // 聚合缓存 == 最新台账 after_stock
    let part = PartRepository::find_by_id(&conn, part_id).unwrap().unwrap();
    assert_eq!(part.stock_quantity, 20);
    assert_eq!(
        StockLedgerService::current_stock(&conn, subject).unwrap(),
        Some(20)
    );

    let types: Vec<_> = entries.iter().map(|e| e.transaction_type).collect();
    assert_eq!(
        types,
        vec![
            TransactionType::Initial,
            TransactionType::Inbound,
            TransactionType::Outbound,
            TransactionType::Adjustment,
        ]
    );
}

#[test]
fn test_insufficient_issue_fails_loudly_without_entry() {
    logging::init_test();
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let conn = inventory_ops::db::open_sqlite_connection(&db_path).unwrap();

    let part_id = test_helpers::seed_part(&conn, "P-801", 3);
    let subject = StockSubject::part(part_id);

    let result = StockLedgerService::issue_part_stock(&conn, part_id, 5);
    let err = result.unwrap_err();
    // 错误信息带需求量与现存量
    assert!(err.to_string().contains('5'));
    assert!(err.to_string().contains('3'));

    // 不留任何台账条目，缓存不变
    assert!(StockLedgerRepository::find_by_subject(&conn, subject)
        .unwrap()
        .is_empty());
    let part = PartRepository::find_by_id(&conn, part_id).unwrap().unwrap();
    assert_eq!(part.stock_quantity, 3);
}

#[test]
fn test_adjustment_down_records_negative_delta() {
    logging::init_test();
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let conn = inventory_ops::db::open_sqlite_connection(&db_path).unwrap();

    let product_id = test_helpers::seed_product(&conn, "PR-800", None, 12);
    StockLedgerService::adjust_product_stock(&conn, product_id, 7).unwrap();

    let entries =
        StockLedgerRepository::find_by_subject(&conn, StockSubject::product(product_id)).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].before_stock, 12);
    assert_eq!(entries[0].change_quantity, -5);
    assert_eq!(entries[0].after_stock, 7);
}

#[test]
fn test_produce_increases_product_stock() {
    logging::init_test();
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let conn = inventory_ops::db::open_sqlite_connection(&db_path).unwrap();

    let product_id = test_helpers::seed_product(&conn, "PR-801", None, 4);
    StockLedgerService::produce_product_stock(&conn, product_id, 6).unwrap();

    let subject = StockSubject::product(product_id);
    let entries = StockLedgerRepository::find_by_subject(&conn, subject).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].transaction_type, TransactionType::Produce);
    assert_eq!(
        StockLedgerService::current_stock(&conn, subject).unwrap(),
        Some(10)
    );
}
