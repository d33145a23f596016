// ==========================================
// 交货单流转测试（建单 / 出货 / 取消）
// ==========================================
// 覆盖: 单号签发与软删除后不复用、出货扣减与台账同事务、
//       库存不足整体回滚、取消回冲
// ==========================================

mod test_helpers;

use inventory_ops::domain::stock::StockSubject;
use inventory_ops::domain::types::{Currency, DeliveryStatus, TransactionType};
use inventory_ops::engine::delivery_flow::{DeliveryFlowService, NewDeliveryItem};
use inventory_ops::engine::stock_ledger::StockLedgerService;
use inventory_ops::logging;
use inventory_ops::repository::delivery_repo::DeliveryRepository;
use inventory_ops::repository::product_repo::ProductRepository;
use inventory_ops::repository::stock_ledger_repo::StockLedgerRepository;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;

fn item(product_code: &str, quantity: i64) -> NewDeliveryItem {
    NewDeliveryItem {
        product_code: product_code.to_string(),
        quantity,
        actual_unit_price: None,
        price_note: None,
        is_free: false,
    }
}

fn setup(db_path: &str) {
    let conn = inventory_ops::db::open_sqlite_connection(db_path).unwrap();
    let kr = test_helpers::seed_country(&conn, "KR", "韩国");
    test_helpers::seed_client(&conn, "C-KR", kr, Currency::KRW);
    test_helpers::seed_product(&conn, "PR-X", Some("500"), 10);
    test_helpers::seed_product(&conn, "PR-Y", Some("200"), 2);
}

#[test]
fn test_create_delivery_issues_sequential_numbers() {
    logging::init_test();
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    setup(&db_path);

    let service = DeliveryFlowService::new(test_helpers::open_shared(&db_path));
    let ordered = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let requested = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();

    let first = service
        .create_delivery("C-KR", ordered, requested, vec![item("PR-X", 2)], None)
        .unwrap();
    let second = service
        .create_delivery("C-KR", ordered, requested, vec![item("PR-X", 1)], None)
        .unwrap();

    assert_eq!(first.delivery_number, "SOLM-PO-2025-0001");
    assert_eq!(second.delivery_number, "SOLM-PO-2025-0002");
    // KRW 客户: 汇率 1，应收即 KRW 金额
    assert_eq!(first.total_amount, Decimal::from(1000));
    assert_eq!(first.total_amount_krw, Some(Decimal::from(1000)));
}

#[test]
fn test_number_prefix_and_padding_come_from_config() {
    logging::init_test();
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    setup(&db_path);

    let shared = test_helpers::open_shared(&db_path);
    let config = inventory_ops::config::ConfigManager::from_connection(Arc::clone(&shared));
    config
        .set_config_value("delivery/number_prefix", "SOLM-DN-")
        .unwrap();
    config
        .set_config_value("delivery/sequence_padding", "6")
        .unwrap();

    let service = DeliveryFlowService::from_config(shared, &config).unwrap();
    let delivery = service
        .create_delivery(
            "C-KR",
            NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 9, 8).unwrap(),
            vec![item("PR-X", 1)],
            None,
        )
        .unwrap();

    assert_eq!(delivery.delivery_number, "SOLM-DN-2025-000001");
}

#[test]
fn test_soft_deleted_delivery_number_is_never_reused() {
    logging::init_test();
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    setup(&db_path);

    let service = DeliveryFlowService::new(test_helpers::open_shared(&db_path));
    let ordered = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
    let requested = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();

    let first = service
        .create_delivery("C-KR", ordered, requested, vec![item("PR-X", 1)], None)
        .unwrap();
    assert_eq!(first.delivery_number, "SOLM-PO-2025-0001");

    {
        let conn = inventory_ops::db::open_sqlite_connection(&db_path).unwrap();
        DeliveryRepository::mark_deleted(&conn, first.id).unwrap();
    }

    // 软删除后单号仍被占用，下一单拿 0002
    let second = service
        .create_delivery("C-KR", ordered, requested, vec![item("PR-X", 1)], None)
        .unwrap();
    assert_eq!(second.delivery_number, "SOLM-PO-2025-0002");
}

#[test]
fn test_complete_delivery_deducts_stock_with_ledger() {
    logging::init_test();
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    setup(&db_path);

    let service = DeliveryFlowService::new(test_helpers::open_shared(&db_path));
    let delivery = service
        .create_delivery(
            "C-KR",
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 8).unwrap(),
            vec![item("PR-X", 4)],
            None,
        )
        .unwrap();

    let completed = service.complete_delivery(delivery.id).unwrap();
    assert_eq!(completed.status, DeliveryStatus::Completed);
    assert!(completed.delivered_at.is_some());

    let conn = inventory_ops::db::open_sqlite_connection(&db_path).unwrap();
    let product = ProductRepository::find_by_code(&conn, "PR-X").unwrap().unwrap();
    assert_eq!(product.stock_quantity, 6);

    let entries =
        StockLedgerRepository::find_by_subject(&conn, StockSubject::product(product.id)).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].transaction_type, TransactionType::Delivery);
    assert_eq!(entries[0].before_stock, 10);
    assert_eq!(entries[0].change_quantity, -4);
    assert_eq!(
        StockLedgerService::current_stock(&conn, StockSubject::product(product.id)).unwrap(),
        Some(6)
    );

    // 已完成的单不能再次完成
    assert!(service.complete_delivery(delivery.id).is_err());
}

#[test]
fn test_insufficient_stock_rolls_back_whole_completion() {
    logging::init_test();
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    setup(&db_path);

    let service = DeliveryFlowService::new(test_helpers::open_shared(&db_path));
    // PR-X 充足、PR-Y 只有 2 件 → 第二行扣减失败，整个出货回滚
    let delivery = service
        .create_delivery(
            "C-KR",
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 7, 8).unwrap(),
            vec![item("PR-X", 3), item("PR-Y", 5)],
            None,
        )
        .unwrap();

    let err = service.complete_delivery(delivery.id).unwrap_err();
    assert!(err.to_string().contains("库存不足"));

    let conn = inventory_ops::db::open_sqlite_connection(&db_path).unwrap();
    // PR-X 的扣减也一并回滚
    let product_x = ProductRepository::find_by_code(&conn, "PR-X").unwrap().unwrap();
    assert_eq!(product_x.stock_quantity, 10);
    assert!(StockLedgerRepository::find_by_subject(&conn, StockSubject::product(product_x.id))
        .unwrap()
        .is_empty());
    let reloaded = DeliveryRepository::find_by_id_with_items(&conn, delivery.id)
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.status, DeliveryStatus::Pending);
}

#[test]
fn test_cancel_completed_delivery_restores_stock() {
    logging::init_test();
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    setup(&db_path);

    let service = DeliveryFlowService::new(test_helpers::open_shared(&db_path));
    let delivery = service
        .create_delivery(
            "C-KR",
            NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 8, 8).unwrap(),
            vec![item("PR-X", 4)],
            None,
        )
        .unwrap();
    service.complete_delivery(delivery.id).unwrap();

    let cancelled = service.cancel_delivery(delivery.id).unwrap();
    assert_eq!(cancelled.status, DeliveryStatus::Cancelled);

    let conn = inventory_ops::db::open_sqlite_connection(&db_path).unwrap();
    let product = ProductRepository::find_by_code(&conn, "PR-X").unwrap().unwrap();
    assert_eq!(product.stock_quantity, 10);

    // 回冲条目与扣减条目都在台账上（只追加，不抹历史）
    let entries =
        StockLedgerRepository::find_by_subject(&conn, StockSubject::product(product.id)).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].transaction_type, TransactionType::Delivery);
    assert_eq!(entries[1].transaction_type, TransactionType::DeliveryCancelled);
    assert_eq!(entries[1].after_stock, 10);
}
