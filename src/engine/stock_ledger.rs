// ==========================================
// 库存运营管理系统 - 库存台账记账服务
// ==========================================
// 职责: 在聚合库存变动的同一事务内追加台账条目
// 红线: 条目构造失败（不变量违反）必须让整行/整个操作失败，不做修正
// ==========================================

use crate::domain::part::Part;
use crate::domain::product::Product;
use crate::domain::stock::{StockLedgerEntry, StockSubject};
use crate::domain::types::TransactionType;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::part_repo::PartRepository;
use crate::repository::product_repo::ProductRepository;
use crate::repository::stock_ledger_repo::StockLedgerRepository;
use rusqlite::Connection;
use tracing::debug;

pub struct StockLedgerService;

impl StockLedgerService {
    /// 追加一条台账（after = before + delta，构造时校验）
    ///
    /// # 返回
    /// - Ok(entry): 已落库的条目（含行号）
    /// - Err: 不变量违反或数据库错误
    pub fn record(
        conn: &Connection,
        subject: StockSubject,
        transaction_type: TransactionType,
        before_stock: i64,
        change_quantity: i64,
    ) -> RepositoryResult<StockLedgerEntry> {
        let mut entry =
            StockLedgerEntry::apply(subject, transaction_type, before_stock, change_quantity)?;
        entry.id = StockLedgerRepository::append(conn, &entry)?;

        debug!(
            subject_kind = %subject.kind,
            subject_id = subject.id,
            transaction_type = %transaction_type,
            before = before_stock,
            delta = change_quantity,
            after = entry.after_stock,
            "台账记账完成"
        );
        Ok(entry)
    }

    /// 某主体当前库存（最新台账的 after_stock）
    pub fn current_stock(
        conn: &Connection,
        subject: StockSubject,
    ) -> RepositoryResult<Option<i64>> {
        StockLedgerRepository::latest_after_stock(conn, subject)
    }

    /// 零件入库（INBOUND）：更新缓存并记账
    pub fn receive_part_stock(
        conn: &Connection,
        part_id: i64,
        quantity: i64,
    ) -> RepositoryResult<()> {
        let mut part = Self::load_part(conn, part_id)?;
        let before = part.stock_quantity;
        part.increase_stock(quantity);
        Self::record(
            conn,
            StockSubject::part(part_id),
            TransactionType::Inbound,
            before,
            quantity,
        )?;
        PartRepository::update_stock(conn, part_id, part.stock_quantity)
    }

    /// 零件出库（OUTBOUND）：库存不足时整个操作失败
    pub fn issue_part_stock(
        conn: &Connection,
        part_id: i64,
        quantity: i64,
    ) -> RepositoryResult<()> {
        let mut part = Self::load_part(conn, part_id)?;
        let before = part.stock_quantity;
        part.decrease_stock(quantity)?;
        Self::record(
            conn,
            StockSubject::part(part_id),
            TransactionType::Outbound,
            before,
            -quantity,
        )?;
        PartRepository::update_stock(conn, part_id, part.stock_quantity)
    }

    /// 零件库存人工调整（ADJUSTMENT）：给定目标数量，delta 自动推导
    pub fn adjust_part_stock(
        conn: &Connection,
        part_id: i64,
        new_quantity: i64,
    ) -> RepositoryResult<()> {
        let part = Self::load_part(conn, part_id)?;
        let before = part.stock_quantity;
        Self::record(
            conn,
            StockSubject::part(part_id),
            TransactionType::Adjustment,
            before,
            new_quantity - before,
        )?;
        PartRepository::update_stock(conn, part_id, new_quantity)
    }

    /// 产品生产入库（PRODUCE）
    pub fn produce_product_stock(
        conn: &Connection,
        product_id: i64,
        quantity: i64,
    ) -> RepositoryResult<()> {
        let mut product = Self::load_product(conn, product_id)?;
        let before = product.stock_quantity;
        product.increase_stock(quantity);
        Self::record(
            conn,
            StockSubject::product(product_id),
            TransactionType::Produce,
            before,
            quantity,
        )?;
        ProductRepository::update_stock(conn, product_id, product.stock_quantity)
    }

    /// 产品库存人工调整（ADJUSTMENT）
    pub fn adjust_product_stock(
        conn: &Connection,
        product_id: i64,
        new_quantity: i64,
    ) -> RepositoryResult<()> {
        let product = Self::load_product(conn, product_id)?;
        let before = product.stock_quantity;
        Self::record(
            conn,
            StockSubject::product(product_id),
            TransactionType::Adjustment,
            before,
            new_quantity - before,
        )?;
        ProductRepository::update_stock(conn, product_id, new_quantity)
    }

    fn load_part(conn: &Connection, part_id: i64) -> RepositoryResult<Part> {
        PartRepository::find_by_id(conn, part_id)?.ok_or_else(|| RepositoryError::NotFound {
            entity: "Part".to_string(),
            key: part_id.to_string(),
        })
    }

    fn load_product(conn: &Connection, product_id: i64) -> RepositoryResult<Product> {
        ProductRepository::find_by_id(conn, product_id)?.ok_or_else(|| RepositoryError::NotFound {
            entity: "Product".to_string(),
            key: product_id.to_string(),
        })
    }
}
