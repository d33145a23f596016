// ==========================================
// 库存运营管理系统 - 产品 / 用料映射仓储
// ==========================================
// 红线: 业务键查询只看未删除行（deleted_at IS NULL）
// ==========================================

use crate::domain::product::{Product, ProductPartMapping};
use crate::repository::db_utils::opt_decimal_from_text;
use crate::repository::error::RepositoryResult;
use rusqlite::{params, Connection, OptionalExtension, Row};

const SELECT_COLUMNS: &str = "id, product_code, name, default_unit_price, description, stock_quantity, created_at, deleted_at";

pub struct ProductRepository;

impl ProductRepository {
    /// 插入产品，返回数据库行号
    pub fn insert(conn: &Connection, product: &Product) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO products (product_code, name, default_unit_price, description, stock_quantity, created_at, deleted_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                product.product_code,
                product.name,
                product.default_unit_price.map(|p| p.to_string()),
                product.description,
                product.stock_quantity,
                product.created_at,
                product.deleted_at,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 按业务编码查询（未删除行）
    pub fn find_by_code(
        conn: &Connection,
        product_code: &str,
    ) -> RepositoryResult<Option<Product>> {
        let sql = format!(
            "SELECT {} FROM products WHERE product_code = ?1 AND deleted_at IS NULL",
            SELECT_COLUMNS
        );
        let product = conn
            .query_row(&sql, params![product_code], map_product)
            .optional()?;
        Ok(product)
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> RepositoryResult<Option<Product>> {
        let sql = format!("SELECT {} FROM products WHERE id = ?1", SELECT_COLUMNS);
        let product = conn.query_row(&sql, params![id], map_product).optional()?;
        Ok(product)
    }

    /// 业务编码是否已被未删除行占用
    pub fn exists_by_code(conn: &Connection, product_code: &str) -> RepositoryResult<bool> {
        let exists = conn
            .query_row(
                "SELECT 1 FROM products WHERE product_code = ?1 AND deleted_at IS NULL LIMIT 1",
                params![product_code],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(exists)
    }

    /// 回写库存缓存
    pub fn update_stock(conn: &Connection, id: i64, stock_quantity: i64) -> RepositoryResult<()> {
        conn.execute(
            "UPDATE products SET stock_quantity = ?2 WHERE id = ?1",
            params![id, stock_quantity],
        )?;
        Ok(())
    }
}

fn map_product(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        product_code: row.get(1)?,
        name: row.get(2)?,
        default_unit_price: opt_decimal_from_text(row.get(3)?)?,
        description: row.get(4)?,
        stock_quantity: row.get(5)?,
        created_at: row.get(6)?,
        deleted_at: row.get(7)?,
    })
}

// ==========================================
// ProductPartRepository - 产品用料映射
// ==========================================
pub struct ProductPartRepository;

impl ProductPartRepository {
    pub fn insert(conn: &Connection, mapping: &ProductPartMapping) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO product_parts (product_id, part_id, required_quantity, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                mapping.product_id,
                mapping.part_id,
                mapping.required_quantity,
                mapping.created_at,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 同一 (product, part) 组合是否已有映射
    pub fn exists_mapping(
        conn: &Connection,
        product_id: i64,
        part_id: i64,
    ) -> RepositoryResult<bool> {
        let exists = conn
            .query_row(
                "SELECT 1 FROM product_parts WHERE product_id = ?1 AND part_id = ?2 LIMIT 1",
                params![product_id, part_id],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(exists)
    }

    /// 某产品的全部用料映射
    pub fn find_by_product(
        conn: &Connection,
        product_id: i64,
    ) -> RepositoryResult<Vec<ProductPartMapping>> {
        let mut stmt = conn.prepare(
            "SELECT id, product_id, part_id, required_quantity, created_at
             FROM product_parts WHERE product_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![product_id], |row| {
            Ok(ProductPartMapping {
                id: row.get(0)?,
                product_id: row.get(1)?,
                part_id: row.get(2)?,
                required_quantity: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?;

        let mut mappings = Vec::new();
        for row in rows {
            mappings.push(row?);
        }
        Ok(mappings)
    }
}
