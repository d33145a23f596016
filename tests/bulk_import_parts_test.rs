// ==========================================
// 零件批量导入测试
// ==========================================
// 覆盖: 计数不变量、行级失败隔离、重复导入幂等、INITIAL 台账副作用
// ==========================================

mod test_helpers;

use inventory_ops::domain::types::TransactionType;
use inventory_ops::importer::{BulkImportApi, BulkImportService, ImportError, ImportKind};
use inventory_ops::logging;
use inventory_ops::repository::part_repo::PartRepository;
use inventory_ops::repository::stock_ledger_repo::StockLedgerRepository;
use std::path::Path;

#[tokio::test]
async fn test_import_parts_with_blank_name_row() {
    logging::init_test();
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");

    // 第 2 个数据行缺 name（源文件行号 3）
    let csv = test_helpers::csv_file(&[
        "partCode,name,specification,unit,stockQuantity",
        "P-001,支架,SUS304,个,10",
        "P-002,,,个,5",
        "P-003,垫片,,个,0",
    ]);

    let service = BulkImportService::new(test_helpers::open_shared(&db_path));
    let result = service.import_parts(csv.path()).await.unwrap();

    // 计数不变量
    assert_eq!(result.total_count, 3);
    assert_eq!(result.success_count, 2);
    assert_eq!(result.failure_count, 1);
    assert_eq!(result.failures.len(), result.failure_count);
    assert_eq!(
        result.success_count + result.failure_count,
        result.total_count
    );

    // 失败明细带表头偏移后的行号与业务键字段
    let failure = &result.failures[0];
    assert_eq!(failure.row_number, 3);
    assert!(failure.error_message.contains("name"));
    assert!(failure
        .key_fields
        .iter()
        .any(|(field, value)| field == "partCode" && value == "P-002"));

    // 成功行各有一条 INITIAL 台账，失败行没有
    let conn = inventory_ops::db::open_sqlite_connection(&db_path).unwrap();
    let initial_count =
        StockLedgerRepository::count_by_type(&conn, TransactionType::Initial).unwrap();
    assert_eq!(initial_count, 2);
    assert!(PartRepository::find_by_code(&conn, "P-002").unwrap().is_none());
}

#[tokio::test]
async fn test_failing_row_does_not_abort_batch() {
    logging::init_test();
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");

    // 中间行库存为负数，前后行都应成功
    let csv = test_helpers::csv_file(&[
        "partCode,name,unit,stockQuantity",
        "P-100,支架,个,3",
        "P-101,螺栓,个,-1",
        "P-102,螺母,个,7",
    ]);

    let service = BulkImportService::new(test_helpers::open_shared(&db_path));
    let result = service.import_parts(csv.path()).await.unwrap();

    assert_eq!(result.success_count, 2);
    assert_eq!(result.failure_count, 1);
    assert_eq!(result.failures[0].row_number, 3);
    assert!(result.failures[0].error_message.contains("stockQuantity"));

    // 失败行无任何残留副作用
    let conn = inventory_ops::db::open_sqlite_connection(&db_path).unwrap();
    assert!(PartRepository::find_by_code(&conn, "P-101").unwrap().is_none());
    assert!(PartRepository::find_by_code(&conn, "P-100").unwrap().is_some());
    assert!(PartRepository::find_by_code(&conn, "P-102").unwrap().is_some());
    let initial_count =
        StockLedgerRepository::count_by_type(&conn, TransactionType::Initial).unwrap();
    assert_eq!(initial_count, 2);
}

#[tokio::test]
async fn test_reimport_reports_every_row_as_duplicate() {
    logging::init_test();
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");

    let csv = test_helpers::csv_file(&[
        "partCode,name,unit,stockQuantity",
        "P-201,支架,个,4",
        "P-202,垫片,个,6",
    ]);

    let service = BulkImportService::new(test_helpers::open_shared(&db_path));
    let first = service.import_parts(csv.path()).await.unwrap();
    assert_eq!(first.success_count, 2);

    // 重复导入同一文件: 全部按重复失败，不允许部分重建
    let second = service.import_parts(csv.path()).await.unwrap();
    assert_eq!(second.total_count, 2);
    assert_eq!(second.success_count, 0);
    assert_eq!(second.failure_count, 2);
    for failure in &second.failures {
        assert!(failure.error_message.contains("已存在"));
    }

    // 台账没有新增 INITIAL
    let conn = inventory_ops::db::open_sqlite_connection(&db_path).unwrap();
    let initial_count =
        StockLedgerRepository::count_by_type(&conn, TransactionType::Initial).unwrap();
    assert_eq!(initial_count, 2);
}

#[tokio::test]
async fn test_non_numeric_stock_reported_per_row() {
    logging::init_test();
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");

    let csv = test_helpers::csv_file(&[
        "partCode,name,unit,stockQuantity",
        "P-301,支架,个,abc",
    ]);

    let service = BulkImportService::new(test_helpers::open_shared(&db_path));
    let result = service.import_parts(csv.path()).await.unwrap();

    assert_eq!(result.failure_count, 1);
    assert!(result.failures[0].error_message.contains("stockQuantity"));
}

#[tokio::test]
async fn test_unsupported_file_format_is_batch_fatal() {
    logging::init_test();
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");

    let service = BulkImportService::new(test_helpers::open_shared(&db_path));
    let result = service
        .import_file(ImportKind::Part, Path::new("upload.txt"))
        .await;

    assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
}
