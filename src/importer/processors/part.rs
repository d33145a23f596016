// ==========================================
// 库存运营管理系统 - 零件行处理器
// ==========================================
// 行字段: partCode, name, unit, stockQuantity 必填; specification 可选
// 副作用: 落库后追加 INITIAL 台账（0 → 初始库存）
// ==========================================

use crate::domain::part::Part;
use crate::domain::stock::StockSubject;
use crate::domain::types::TransactionType;
use crate::engine::stock_ledger::StockLedgerService;
use crate::importer::error::ImportError;
use crate::importer::processor::{key_field, RowProcessor};
use crate::importer::row::RowRecord;
use crate::repository::part_repo::PartRepository;
use rusqlite::Connection;

pub struct PartRowProcessor;

impl RowProcessor for PartRowProcessor {
    fn entity_name(&self) -> &'static str {
        "part"
    }

    fn key_fields(&self, row: &RowRecord) -> Vec<(String, String)> {
        vec![key_field(row, "partCode"), key_field(row, "name")]
    }

    fn process(&self, conn: &Connection, row: &RowRecord) -> Result<(), ImportError> {
        // 校验
        let part_code = row.require("partCode")?;
        let name = row.require("name")?;
        let unit = row.require("unit")?;
        let specification = row.optional("specification");
        let stock_quantity = row.require_i64("stockQuantity")?;
        if stock_quantity < 0 {
            return Err(ImportError::InvalidValue {
                field: "stockQuantity".to_string(),
                message: "必须大于等于 0".to_string(),
            });
        }

        // 重复预检（兜底是 parts 表的未删除行唯一索引）
        if PartRepository::exists_by_code(conn, &part_code)? {
            return Err(ImportError::Duplicate(format!(
                "零件编码已存在: {}",
                part_code
            )));
        }

        // 构造并落库
        let mut part = Part::new(part_code, name, specification, stock_quantity, unit);
        part.id = PartRepository::insert(conn, &part)?;

        // 初始库存台账
        StockLedgerService::record(
            conn,
            StockSubject::part(part.id),
            TransactionType::Initial,
            0,
            stock_quantity,
        )?;

        Ok(())
    }
}
