// ==========================================
// 多文件批量导入测试
// ==========================================
// 测试目标: 验证多个文件并发提交时互不影响，单个文件失败不拖垮其余
// ==========================================

mod test_helpers;

use inventory_ops::importer::{BulkImportApi, BulkImportService, ImportKind};
use inventory_ops::logging;
use std::path::PathBuf;

#[tokio::test]
async fn test_batch_import_multiple_files() {
    logging::init_test();
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    {
        let conn = inventory_ops::db::open_sqlite_connection(&db_path).unwrap();
        test_helpers::seed_country(&conn, "KR", "韩国");
    }

    let parts_csv = test_helpers::csv_file(&[
        "partCode,name,unit,stockQuantity",
        "P-901,支架,个,10",
        "P-902,垫片,个,5",
    ]);
    let products_csv = test_helpers::csv_file(&[
        "productCode,name,stockQuantity",
        "PR-901,控制器,3",
    ]);
    let clients_csv = test_helpers::csv_file(&[
        "clientCode,name,countryCode,currency,parentClientCode",
        "C-901,汉阳商社,KR,KRW,",
    ]);
    // 第 4 个文件扩展名不支持 → 该文件失败，其余不受影响
    let jobs = vec![
        (ImportKind::Part, parts_csv.path().to_path_buf()),
        (ImportKind::Product, products_csv.path().to_path_buf()),
        (ImportKind::Client, clients_csv.path().to_path_buf()),
        (ImportKind::Part, PathBuf::from("missing.txt")),
    ];

    let service = BulkImportService::new(test_helpers::open_shared(&db_path));
    let results = service.batch_import(jobs).await.unwrap();

    assert_eq!(results.len(), 4);

    let success_count = results.iter().filter(|r| r.is_ok()).count();
    let failed_count = results.iter().filter(|r| r.is_err()).count();
    assert_eq!(success_count, 3);
    assert_eq!(failed_count, 1);

    for result in results.iter().take(3) {
        let batch = result.as_ref().unwrap();
        assert_eq!(batch.failure_count, 0);
        assert!(batch.success_count > 0);
    }
}
