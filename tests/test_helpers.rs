#![allow(dead_code)]
// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、基础数据与临时文件
// ==========================================

use inventory_ops::db;
use inventory_ops::domain::client::{Client, Country};
use inventory_ops::domain::part::Part;
use inventory_ops::domain::product::Product;
use inventory_ops::domain::types::Currency;
use inventory_ops::repository::client_repo::{ClientRepository, CountryRepository};
use inventory_ops::repository::part_repo::PartRepository;
use inventory_ops::repository::product_repo::ProductRepository;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::error::Error;
use std::io::Write;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = db::open_and_init(&db_path)?;
    drop(conn);

    Ok((temp_file, db_path))
}

/// 打开共享连接（服务层用 Arc<Mutex<Connection>>）
pub fn open_shared(db_path: &str) -> Arc<Mutex<Connection>> {
    let conn = db::open_sqlite_connection(db_path).expect("Failed to open db");
    Arc::new(Mutex::new(conn))
}

/// 写入临时 CSV 文件（带 .csv 扩展名）
pub fn csv_file(lines: &[&str]) -> NamedTempFile {
    let mut temp_file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("Failed to create temp csv");
    for line in lines {
        writeln!(temp_file, "{}", line).expect("Failed to write temp csv");
    }
    temp_file
}

// ===== 基础数据 =====

pub fn seed_country(conn: &Connection, code: &str, name: &str) -> i64 {
    let country = Country {
        id: 0,
        code: code.to_string(),
        name: name.to_string(),
    };
    CountryRepository::insert(conn, &country).expect("Failed to seed country")
}

pub fn seed_client(conn: &Connection, client_code: &str, country_id: i64, currency: Currency) -> i64 {
    let client = Client::new(
        client_code.to_string(),
        None,
        country_id,
        format!("客户 {}", client_code),
        None,
        None,
        None,
        currency,
    );
    ClientRepository::insert(conn, &client).expect("Failed to seed client")
}

pub fn seed_part(conn: &Connection, part_code: &str, stock: i64) -> i64 {
    let part = Part::new(
        part_code.to_string(),
        format!("零件 {}", part_code),
        None,
        stock,
        "个".to_string(),
    );
    PartRepository::insert(conn, &part).expect("Failed to seed part")
}

pub fn seed_product(
    conn: &Connection,
    product_code: &str,
    default_unit_price: Option<&str>,
    stock: i64,
) -> i64 {
    let product = Product::new(
        product_code.to_string(),
        format!("产品 {}", product_code),
        default_unit_price.map(|p| Decimal::from_str(p).unwrap()),
        None,
        stock,
    );
    ProductRepository::insert(conn, &product).expect("Failed to seed product")
}
