// ==========================================
// 客户批量导入测试（两趟处理）
// ==========================================
// 覆盖: 子行先于父行仍成功、父行缺席时子行失败、重复编码、引用缺失
// ==========================================

mod test_helpers;

use inventory_ops::importer::BulkImportService;
use inventory_ops::logging;
use inventory_ops::repository::client_repo::ClientRepository;

#[tokio::test]
async fn test_child_row_before_parent_row_still_succeeds() {
    logging::init_test();
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    {
        let conn = inventory_ops::db::open_sqlite_connection(&db_path).unwrap();
        test_helpers::seed_country(&conn, "KR", "韩国");
        test_helpers::seed_country(&conn, "US", "美国");
    }

    // 子行在文件里先出现，父行在后；两趟处理下子行仍应成功
    let csv = test_helpers::csv_file(&[
        "clientCode,name,countryCode,currency,parentClientCode",
        "C-CHILD,汉阳分部,KR,KRW,C-PARENT",
        "C-PARENT,汉阳总部,KR,KRW,",
        "C-US,北美经销,US,USD,",
    ]);

    let service = BulkImportService::new(test_helpers::open_shared(&db_path));
    let result = service.import_clients(csv.path()).await.unwrap();

    assert_eq!(result.total_count, 3);
    assert_eq!(result.success_count, 3);
    assert_eq!(result.failure_count, 0);

    let conn = inventory_ops::db::open_sqlite_connection(&db_path).unwrap();
    let parent = ClientRepository::find_by_code(&conn, "C-PARENT")
        .unwrap()
        .unwrap();
    let child = ClientRepository::find_by_code(&conn, "C-CHILD")
        .unwrap()
        .unwrap();
    assert_eq!(child.parent_client_id, Some(parent.id));
}

#[tokio::test]
async fn test_child_with_absent_parent_fails_with_reference_error() {
    logging::init_test();
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    {
        let conn = inventory_ops::db::open_sqlite_connection(&db_path).unwrap();
        test_helpers::seed_country(&conn, "KR", "韩国");
    }

    let csv = test_helpers::csv_file(&[
        "clientCode,name,countryCode,currency,parentClientCode",
        "C-ORPHAN,无主分部,KR,KRW,C-MISSING",
        "C-OK,正常客户,KR,KRW,",
    ]);

    let service = BulkImportService::new(test_helpers::open_shared(&db_path));
    let result = service.import_clients(csv.path()).await.unwrap();

    assert_eq!(result.success_count, 1);
    assert_eq!(result.failure_count, 1);
    let failure = &result.failures[0];
    assert_eq!(failure.row_number, 2);
    assert!(failure.error_message.contains("C-MISSING"));
    assert!(failure.error_message.contains("上级客户"));

    // 子行无残留
    let conn = inventory_ops::db::open_sqlite_connection(&db_path).unwrap();
    assert!(ClientRepository::find_by_code(&conn, "C-ORPHAN")
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_failed_parent_means_child_fails_too() {
    logging::init_test();
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    {
        let conn = inventory_ops::db::open_sqlite_connection(&db_path).unwrap();
        test_helpers::seed_country(&conn, "KR", "韩国");
    }

    // 父行缺 countryCode 在第 0 趟失败 → 子行在第 1 趟引用缺失
    let csv = test_helpers::csv_file(&[
        "clientCode,name,countryCode,currency,parentClientCode",
        "C-P1,总部,,KRW,",
        "C-K1,分部,KR,KRW,C-P1",
    ]);

    let service = BulkImportService::new(test_helpers::open_shared(&db_path));
    let result = service.import_clients(csv.path()).await.unwrap();

    assert_eq!(result.success_count, 0);
    assert_eq!(result.failure_count, 2);
    // 失败明细按源文件行号排序
    assert_eq!(result.failures[0].row_number, 2);
    assert_eq!(result.failures[1].row_number, 3);
    assert!(result.failures[0].error_message.contains("countryCode"));
    assert!(result.failures[1].error_message.contains("C-P1"));
}

#[tokio::test]
async fn test_duplicate_and_bad_currency_rows() {
    logging::init_test();
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    {
        let conn = inventory_ops::db::open_sqlite_connection(&db_path).unwrap();
        let kr = test_helpers::seed_country(&conn, "KR", "韩国");
        test_helpers::seed_client(
            &conn,
            "C-DUP",
            kr,
            inventory_ops::domain::types::Currency::KRW,
        );
    }

    let csv = test_helpers::csv_file(&[
        "clientCode,name,countryCode,currency,parentClientCode",
        "C-DUP,重复客户,KR,KRW,",
        "C-BADCUR,货币错误,KR,XYZ,",
        "C-BADCTY,国家错误,JP,KRW,",
    ]);

    let service = BulkImportService::new(test_helpers::open_shared(&db_path));
    let result = service.import_clients(csv.path()).await.unwrap();

    assert_eq!(result.success_count, 0);
    assert_eq!(result.failure_count, 3);
    assert!(result.failures[0].error_message.contains("已存在"));
    assert!(result.failures[1].error_message.contains("货币"));
    assert!(result.failures[2].error_message.contains("JP"));
}
