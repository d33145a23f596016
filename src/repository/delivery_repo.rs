// ==========================================
// 库存运营管理系统 - 交货单仓储
// ==========================================
// 红线: 交货单号全局唯一，软删除后也不释放（单号序列不回收）
// ==========================================

use crate::domain::delivery::{Delivery, DeliveryItem};
use crate::repository::db_utils::{decimal_from_text, delivery_status_from_text, opt_decimal_from_text};
use crate::repository::error::RepositoryResult;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

const SELECT_COLUMNS: &str = "id, delivery_number, client_id, status, ordered_at, requested_at, delivered_at, \
     subtotal_amount, discount_amount, discount_rate, discount_note, total_discount_amount, \
     total_amount, exchange_rate, total_amount_krw, memo, created_at, deleted_at";

pub struct DeliveryRepository;

impl DeliveryRepository {
    /// 插入交货单头，返回数据库行号（明细另行插入）
    pub fn insert(conn: &Connection, delivery: &Delivery) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO deliveries (delivery_number, client_id, status, ordered_at, requested_at,
                                    delivered_at, subtotal_amount, discount_amount, discount_rate,
                                    discount_note, total_discount_amount, total_amount,
                                    exchange_rate, total_amount_krw, memo, created_at, deleted_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
            "#,
            params![
                delivery.delivery_number,
                delivery.client_id,
                delivery.status.as_str(),
                delivery.ordered_at,
                delivery.requested_at,
                delivery.delivered_at,
                delivery.subtotal_amount.to_string(),
                delivery.discount_amount.map(|v| v.to_string()),
                delivery.discount_rate.map(|v| v.to_string()),
                delivery.discount_note,
                delivery.total_discount_amount.to_string(),
                delivery.total_amount.to_string(),
                delivery.exchange_rate.map(|v| v.to_string()),
                delivery.total_amount_krw.map(|v| v.to_string()),
                delivery.memo,
                delivery.created_at,
                delivery.deleted_at,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 插入明细行（归属单号由调用方给定）
    pub fn insert_item(
        conn: &Connection,
        delivery_id: i64,
        item: &DeliveryItem,
    ) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO delivery_items (delivery_id, product_id, quantity, unit_price,
                                        actual_unit_price, total_price, price_note, is_free, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                delivery_id,
                item.product_id,
                item.quantity,
                item.unit_price.to_string(),
                item.actual_unit_price.to_string(),
                item.total_price.to_string(),
                item.price_note,
                item.is_free as i64,
                item.created_at,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 单号是否已被占用（含软删除行：单号不回收）
    pub fn exists_by_number(conn: &Connection, delivery_number: &str) -> RepositoryResult<bool> {
        let exists = conn
            .query_row(
                "SELECT 1 FROM deliveries WHERE delivery_number = ?1 LIMIT 1",
                params![delivery_number],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(exists)
    }

    /// 按单号加载（未删除行），带全部明细
    pub fn find_by_number_with_items(
        conn: &Connection,
        delivery_number: &str,
    ) -> RepositoryResult<Option<Delivery>> {
        let sql = format!(
            "SELECT {} FROM deliveries WHERE delivery_number = ?1 AND deleted_at IS NULL",
            SELECT_COLUMNS
        );
        let delivery = conn
            .query_row(&sql, params![delivery_number], map_delivery)
            .optional()?;

        match delivery {
            Some(mut delivery) => {
                delivery.items = Self::load_items(conn, delivery.id)?;
                Ok(Some(delivery))
            }
            None => Ok(None),
        }
    }

    pub fn find_by_id_with_items(
        conn: &Connection,
        id: i64,
    ) -> RepositoryResult<Option<Delivery>> {
        let sql = format!("SELECT {} FROM deliveries WHERE id = ?1", SELECT_COLUMNS);
        let delivery = conn.query_row(&sql, params![id], map_delivery).optional()?;

        match delivery {
            Some(mut delivery) => {
                delivery.items = Self::load_items(conn, delivery.id)?;
                Ok(Some(delivery))
            }
            None => Ok(None),
        }
    }

    /// 回写派生金额与折扣字段（明细或折扣变动后）
    pub fn update_totals(conn: &Connection, delivery: &Delivery) -> RepositoryResult<()> {
        conn.execute(
            r#"
            UPDATE deliveries
            SET subtotal_amount = ?2, discount_amount = ?3, discount_rate = ?4, discount_note = ?5,
                total_discount_amount = ?6, total_amount = ?7, exchange_rate = ?8,
                total_amount_krw = ?9, memo = ?10
            WHERE id = ?1
            "#,
            params![
                delivery.id,
                delivery.subtotal_amount.to_string(),
                delivery.discount_amount.map(|v| v.to_string()),
                delivery.discount_rate.map(|v| v.to_string()),
                delivery.discount_note,
                delivery.total_discount_amount.to_string(),
                delivery.total_amount.to_string(),
                delivery.exchange_rate.map(|v| v.to_string()),
                delivery.total_amount_krw.map(|v| v.to_string()),
                delivery.memo,
            ],
        )?;
        Ok(())
    }

    /// 回写状态与出货时间
    pub fn update_status(conn: &Connection, delivery: &Delivery) -> RepositoryResult<()> {
        conn.execute(
            "UPDATE deliveries SET status = ?2, delivered_at = ?3 WHERE id = ?1",
            params![
                delivery.id,
                delivery.status.as_str(),
                delivery.delivered_at,
            ],
        )?;
        Ok(())
    }

    /// 软删除：只打删除标记，单号保留（序列不回收）
    pub fn mark_deleted(conn: &Connection, id: i64) -> RepositoryResult<()> {
        conn.execute(
            "UPDATE deliveries SET deleted_at = ?2 WHERE id = ?1",
            params![id, Utc::now()],
        )?;
        Ok(())
    }

    /// 某前缀下已签发的最大序号（含软删除行）
    ///
    /// 单号格式: {prefix}-{seq:04}，序号从 prefix 长度 + 2 的位置起截取
    pub fn last_sequence_by_prefix(
        conn: &Connection,
        prefix: &str,
    ) -> RepositoryResult<Option<i64>> {
        let start = prefix.len() as i64 + 2;
        let last: Option<i64> = conn.query_row(
            r#"
            SELECT MAX(CAST(SUBSTR(delivery_number, ?2) AS INTEGER))
            FROM deliveries
            WHERE delivery_number LIKE ?1 || '-%'
            "#,
            params![prefix, start],
            |row| row.get(0),
        )?;
        Ok(last)
    }

    fn load_items(conn: &Connection, delivery_id: i64) -> RepositoryResult<Vec<DeliveryItem>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT id, delivery_id, product_id, quantity, unit_price, actual_unit_price,
                   total_price, price_note, is_free, created_at
            FROM delivery_items
            WHERE delivery_id = ?1
            ORDER BY id
            "#,
        )?;
        let rows = stmt.query_map(params![delivery_id], |row| {
            let unit_price: String = row.get(4)?;
            let actual_unit_price: String = row.get(5)?;
            let total_price: String = row.get(6)?;
            let is_free: i64 = row.get(8)?;
            Ok(DeliveryItem {
                id: row.get(0)?,
                delivery_id: row.get(1)?,
                product_id: row.get(2)?,
                quantity: row.get(3)?,
                unit_price: decimal_from_text(&unit_price)?,
                actual_unit_price: decimal_from_text(&actual_unit_price)?,
                total_price: decimal_from_text(&total_price)?,
                price_note: row.get(7)?,
                is_free: is_free != 0,
                created_at: row.get(9)?,
            })
        })?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }
}

fn map_delivery(row: &Row<'_>) -> rusqlite::Result<Delivery> {
    let status: String = row.get(3)?;
    let subtotal: String = row.get(7)?;
    let total_discount: String = row.get(11)?;
    let total: String = row.get(12)?;
    Ok(Delivery {
        id: row.get(0)?,
        delivery_number: row.get(1)?,
        client_id: row.get(2)?,
        status: delivery_status_from_text(&status)?,
        ordered_at: row.get(4)?,
        requested_at: row.get(5)?,
        delivered_at: row.get(6)?,
        items: Vec::new(),
        subtotal_amount: decimal_from_text(&subtotal)?,
        discount_amount: opt_decimal_from_text(row.get(8)?)?,
        discount_rate: opt_decimal_from_text(row.get(9)?)?,
        discount_note: row.get(10)?,
        total_discount_amount: decimal_from_text(&total_discount)?,
        total_amount: decimal_from_text(&total)?,
        exchange_rate: opt_decimal_from_text(row.get(13)?)?,
        total_amount_krw: opt_decimal_from_text(row.get(14)?)?,
        memo: row.get(15)?,
        created_at: row.get(16)?,
        deleted_at: row.get(17)?,
    })
}
