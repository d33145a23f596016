// ==========================================
// 库存运营管理系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免"部分模块外键开启/部分不开启"
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 集中维护 schema DDL：业务编码的唯一性兜底约束都声明在这里
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化数据库 schema（幂等，IF NOT EXISTS）
///
/// 唯一性兜底：
/// - 业务编码（part_code / product_code / client_code）在未删除行上唯一
/// - 交货单号全局唯一（软删除后单号也不释放）
/// - (product_id, part_id) / (client_id, product_id) / (currency, rate_date) 组合唯一
///
/// 导入管道的重复预检只是第一道防线，并发导入同码文件时由这些约束收口。
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS countries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS clients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            client_code TEXT NOT NULL,
            parent_client_id INTEGER REFERENCES clients(id),
            country_id INTEGER NOT NULL REFERENCES countries(id),
            name TEXT NOT NULL,
            address TEXT,
            contact_number TEXT,
            email TEXT,
            currency TEXT NOT NULL,
            created_at TEXT NOT NULL,
            deleted_at TEXT
        );
        CREATE UNIQUE INDEX IF NOT EXISTS uq_clients_client_code
            ON clients(client_code) WHERE deleted_at IS NULL;

        CREATE TABLE IF NOT EXISTS parts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            part_code TEXT NOT NULL,
            name TEXT NOT NULL,
            specification TEXT,
            stock_quantity INTEGER NOT NULL,
            unit TEXT NOT NULL,
            created_at TEXT NOT NULL,
            deleted_at TEXT
        );
        CREATE UNIQUE INDEX IF NOT EXISTS uq_parts_part_code
            ON parts(part_code) WHERE deleted_at IS NULL;

        CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            product_code TEXT NOT NULL,
            name TEXT NOT NULL,
            default_unit_price TEXT,
            description TEXT,
            stock_quantity INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            deleted_at TEXT
        );
        CREATE UNIQUE INDEX IF NOT EXISTS uq_products_product_code
            ON products(product_code) WHERE deleted_at IS NULL;

        CREATE TABLE IF NOT EXISTS product_parts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            product_id INTEGER NOT NULL REFERENCES products(id),
            part_id INTEGER NOT NULL REFERENCES parts(id),
            required_quantity INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE(product_id, part_id)
        );

        CREATE TABLE IF NOT EXISTS client_product_prices (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            client_id INTEGER NOT NULL REFERENCES clients(id),
            product_id INTEGER NOT NULL REFERENCES products(id),
            unit_price TEXT NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE(client_id, product_id)
        );

        CREATE TABLE IF NOT EXISTS deliveries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            delivery_number TEXT NOT NULL UNIQUE,
            client_id INTEGER NOT NULL REFERENCES clients(id),
            status TEXT NOT NULL,
            ordered_at TEXT NOT NULL,
            requested_at TEXT NOT NULL,
            delivered_at TEXT,
            subtotal_amount TEXT NOT NULL,
            discount_amount TEXT,
            discount_rate TEXT,
            discount_note TEXT,
            total_discount_amount TEXT NOT NULL,
            total_amount TEXT NOT NULL,
            exchange_rate TEXT,
            total_amount_krw TEXT,
            memo TEXT,
            created_at TEXT NOT NULL,
            deleted_at TEXT
        );

        CREATE TABLE IF NOT EXISTS delivery_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            delivery_id INTEGER NOT NULL REFERENCES deliveries(id) ON DELETE CASCADE,
            product_id INTEGER NOT NULL REFERENCES products(id),
            quantity INTEGER NOT NULL,
            unit_price TEXT NOT NULL,
            actual_unit_price TEXT NOT NULL,
            total_price TEXT NOT NULL,
            price_note TEXT,
            is_free INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS ix_delivery_items_delivery
            ON delivery_items(delivery_id);

        CREATE TABLE IF NOT EXISTS stock_ledger (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            subject_kind TEXT NOT NULL,
            subject_id INTEGER NOT NULL,
            transaction_type TEXT NOT NULL,
            before_stock INTEGER NOT NULL,
            change_quantity INTEGER NOT NULL,
            after_stock INTEGER NOT NULL,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS ix_stock_ledger_subject
            ON stock_ledger(subject_kind, subject_id, id);

        CREATE TABLE IF NOT EXISTS exchange_rates (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            currency TEXT NOT NULL,
            rate TEXT NOT NULL,
            rate_date TEXT NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE(currency, rate_date)
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;
    Ok(())
}

/// 打开连接、应用 PRAGMA 并初始化 schema（测试与嵌入场景的快捷入口）
pub fn open_and_init(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = open_sqlite_connection(db_path)?;
    init_schema(&conn)?;
    Ok(conn)
}
