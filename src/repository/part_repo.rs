// ==========================================
// 库存运营管理系统 - 零件仓储
// ==========================================
// 红线: 业务键查询只看未删除行（deleted_at IS NULL）
// ==========================================

use crate::domain::part::Part;
use crate::repository::error::RepositoryResult;
use rusqlite::{params, Connection, OptionalExtension, Row};

const SELECT_COLUMNS: &str =
    "id, part_code, name, specification, stock_quantity, unit, created_at, deleted_at";

pub struct PartRepository;

impl PartRepository {
    /// 插入零件，返回数据库行号
    pub fn insert(conn: &Connection, part: &Part) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO parts (part_code, name, specification, stock_quantity, unit, created_at, deleted_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                part.part_code,
                part.name,
                part.specification,
                part.stock_quantity,
                part.unit,
                part.created_at,
                part.deleted_at,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 按业务编码查询（未删除行）
    pub fn find_by_code(conn: &Connection, part_code: &str) -> RepositoryResult<Option<Part>> {
        let sql = format!(
            "SELECT {} FROM parts WHERE part_code = ?1 AND deleted_at IS NULL",
            SELECT_COLUMNS
        );
        let part = conn
            .query_row(&sql, params![part_code], map_part)
            .optional()?;
        Ok(part)
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> RepositoryResult<Option<Part>> {
        let sql = format!("SELECT {} FROM parts WHERE id = ?1", SELECT_COLUMNS);
        let part = conn.query_row(&sql, params![id], map_part).optional()?;
        Ok(part)
    }

    /// 业务编码是否已被未删除行占用
    pub fn exists_by_code(conn: &Connection, part_code: &str) -> RepositoryResult<bool> {
        let exists = conn
            .query_row(
                "SELECT 1 FROM parts WHERE part_code = ?1 AND deleted_at IS NULL LIMIT 1",
                params![part_code],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(exists)
    }

    /// 回写库存缓存
    pub fn update_stock(conn: &Connection, id: i64, stock_quantity: i64) -> RepositoryResult<()> {
        conn.execute(
            "UPDATE parts SET stock_quantity = ?2 WHERE id = ?1",
            params![id, stock_quantity],
        )?;
        Ok(())
    }

    /// 软删除（编码改写由领域层完成后回写）
    pub fn mark_deleted(conn: &Connection, part: &Part) -> RepositoryResult<()> {
        conn.execute(
            "UPDATE parts SET part_code = ?2, deleted_at = ?3 WHERE id = ?1",
            params![part.id, part.part_code, part.deleted_at],
        )?;
        Ok(())
    }
}

fn map_part(row: &Row<'_>) -> rusqlite::Result<Part> {
    Ok(Part {
        id: row.get(0)?,
        part_code: row.get(1)?,
        name: row.get(2)?,
        specification: row.get(3)?,
        stock_quantity: row.get(4)?,
        unit: row.get(5)?,
        created_at: row.get(6)?,
        deleted_at: row.get(7)?,
    })
}
