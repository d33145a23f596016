// ==========================================
// 库存运营管理系统 - 客户产品价格仓储
// ==========================================

use crate::domain::price::ClientProductPrice;
use crate::repository::db_utils::decimal_from_text;
use crate::repository::error::RepositoryResult;
use rusqlite::{params, Connection, OptionalExtension};

pub struct PriceRepository;

impl PriceRepository {
    pub fn insert(conn: &Connection, price: &ClientProductPrice) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO client_product_prices (client_id, product_id, unit_price, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                price.client_id,
                price.product_id,
                price.unit_price.to_string(),
                price.created_at,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 同一 (client, product) 组合是否已有价格
    pub fn exists_by_client_and_product(
        conn: &Connection,
        client_id: i64,
        product_id: i64,
    ) -> RepositoryResult<bool> {
        let exists = conn
            .query_row(
                "SELECT 1 FROM client_product_prices WHERE client_id = ?1 AND product_id = ?2 LIMIT 1",
                params![client_id, product_id],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(exists)
    }

    pub fn find_by_client_and_product(
        conn: &Connection,
        client_id: i64,
        product_id: i64,
    ) -> RepositoryResult<Option<ClientProductPrice>> {
        let price = conn
            .query_row(
                r#"
                SELECT id, client_id, product_id, unit_price, created_at
                FROM client_product_prices
                WHERE client_id = ?1 AND product_id = ?2
                "#,
                params![client_id, product_id],
                |row| {
                    let unit_price: String = row.get(3)?;
                    Ok(ClientProductPrice {
                        id: row.get(0)?,
                        client_id: row.get(1)?,
                        product_id: row.get(2)?,
                        unit_price: decimal_from_text(&unit_price)?,
                        created_at: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(price)
    }
}
