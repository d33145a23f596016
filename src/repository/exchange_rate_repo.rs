// ==========================================
// 库存运营管理系统 - 汇率仓储
// ==========================================
// (currency, rate_date) 唯一；并发落库用 ON CONFLICT DO NOTHING 吸收
// ==========================================

use crate::domain::exchange::ExchangeRate;
use crate::domain::types::Currency;
use crate::repository::db_utils::{currency_from_text, decimal_from_text};
use crate::repository::error::RepositoryResult;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

pub struct ExchangeRateRepository;

impl ExchangeRateRepository {
    /// 落库汇率；同 (currency, rate_date) 已存在时保留旧值
    pub fn insert(conn: &Connection, rate: &ExchangeRate) -> RepositoryResult<()> {
        conn.execute(
            r#"
            INSERT INTO exchange_rates (currency, rate, rate_date, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(currency, rate_date) DO NOTHING
            "#,
            params![
                rate.currency.code(),
                rate.rate.to_string(),
                rate.rate_date,
                rate.created_at,
            ],
        )?;
        Ok(())
    }

    pub fn find_by_currency_and_date(
        conn: &Connection,
        currency: Currency,
        rate_date: NaiveDate,
    ) -> RepositoryResult<Option<ExchangeRate>> {
        let rate = conn
            .query_row(
                r#"
                SELECT id, currency, rate, rate_date, created_at
                FROM exchange_rates
                WHERE currency = ?1 AND rate_date = ?2
                "#,
                params![currency.code(), rate_date],
                |row| {
                    let currency: String = row.get(1)?;
                    let rate: String = row.get(2)?;
                    Ok(ExchangeRate {
                        id: row.get(0)?,
                        currency: currency_from_text(&currency)?,
                        rate: decimal_from_text(&rate)?,
                        rate_date: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(rate)
    }
}
