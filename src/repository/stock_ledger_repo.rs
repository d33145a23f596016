// ==========================================
// 库存运营管理系统 - 库存台账仓储
// ==========================================
// 红线: 只有 INSERT 与 SELECT，台账不存在 UPDATE/DELETE 语句
// ==========================================

use crate::domain::stock::{StockLedgerEntry, StockSubject};
use crate::domain::types::TransactionType;
use crate::repository::db_utils::{subject_kind_from_text, transaction_type_from_text};
use crate::repository::error::RepositoryResult;
use rusqlite::{params, Connection, OptionalExtension, Row};

pub struct StockLedgerRepository;

impl StockLedgerRepository {
    /// 追加台账条目，返回数据库行号
    pub fn append(conn: &Connection, entry: &StockLedgerEntry) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO stock_ledger (subject_kind, subject_id, transaction_type,
                                      before_stock, change_quantity, after_stock, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                entry.subject.kind.as_str(),
                entry.subject.id,
                entry.transaction_type.as_str(),
                entry.before_stock,
                entry.change_quantity,
                entry.after_stock,
                entry.created_at,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 某主体最新一条台账的 after_stock（无台账返回 None）
    pub fn latest_after_stock(
        conn: &Connection,
        subject: StockSubject,
    ) -> RepositoryResult<Option<i64>> {
        let after = conn
            .query_row(
                r#"
                SELECT after_stock FROM stock_ledger
                WHERE subject_kind = ?1 AND subject_id = ?2
                ORDER BY id DESC LIMIT 1
                "#,
                params![subject.kind.as_str(), subject.id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(after)
    }

    /// 某主体的全部台账（追加顺序）
    pub fn find_by_subject(
        conn: &Connection,
        subject: StockSubject,
    ) -> RepositoryResult<Vec<StockLedgerEntry>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT id, subject_kind, subject_id, transaction_type,
                   before_stock, change_quantity, after_stock, created_at
            FROM stock_ledger
            WHERE subject_kind = ?1 AND subject_id = ?2
            ORDER BY id
            "#,
        )?;
        let rows = stmt.query_map(params![subject.kind.as_str(), subject.id], map_entry)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    /// 按事务类型统计条目数（测试与对账用）
    pub fn count_by_type(
        conn: &Connection,
        transaction_type: TransactionType,
    ) -> RepositoryResult<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM stock_ledger WHERE transaction_type = ?1",
            params![transaction_type.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn map_entry(row: &Row<'_>) -> rusqlite::Result<StockLedgerEntry> {
    let kind: String = row.get(1)?;
    let tx_type: String = row.get(3)?;
    Ok(StockLedgerEntry {
        id: row.get(0)?,
        subject: StockSubject {
            kind: subject_kind_from_text(&kind)?,
            id: row.get(2)?,
        },
        transaction_type: transaction_type_from_text(&tx_type)?,
        before_stock: row.get(4)?,
        change_quantity: row.get(5)?,
        after_stock: row.get(6)?,
        created_at: row.get(7)?,
    })
}
