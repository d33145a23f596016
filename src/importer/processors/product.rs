// ==========================================
// 库存运营管理系统 - 产品行处理器
// ==========================================
// 行字段: productCode, name, stockQuantity 必填;
//         defaultUnitPrice, description 可选
// 副作用: 落库后追加 INITIAL 台账（0 → 初始库存）
// ==========================================

use crate::domain::product::Product;
use crate::domain::stock::StockSubject;
use crate::domain::types::TransactionType;
use crate::engine::stock_ledger::StockLedgerService;
use crate::importer::error::ImportError;
use crate::importer::processor::{key_field, RowProcessor};
use crate::importer::row::RowRecord;
use crate::repository::product_repo::ProductRepository;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub struct ProductRowProcessor;

impl RowProcessor for ProductRowProcessor {
    fn entity_name(&self) -> &'static str {
        "product"
    }

    fn key_fields(&self, row: &RowRecord) -> Vec<(String, String)> {
        vec![key_field(row, "productCode"), key_field(row, "name")]
    }

    fn process(&self, conn: &Connection, row: &RowRecord) -> Result<(), ImportError> {
        // 校验
        let product_code = row.require("productCode")?;
        let name = row.require("name")?;
        let description = row.optional("description");
        let stock_quantity = row.require_i64("stockQuantity")?;
        if stock_quantity < 0 {
            return Err(ImportError::InvalidValue {
                field: "stockQuantity".to_string(),
                message: "必须大于等于 0".to_string(),
            });
        }
        let default_unit_price = row.optional_decimal("defaultUnitPrice")?;
        if let Some(price) = default_unit_price {
            if price < Decimal::ZERO {
                return Err(ImportError::InvalidValue {
                    field: "defaultUnitPrice".to_string(),
                    message: "必须大于等于 0".to_string(),
                });
            }
        }

        // 重复预检（兜底是 products 表的未删除行唯一索引）
        if ProductRepository::exists_by_code(conn, &product_code)? {
            return Err(ImportError::Duplicate(format!(
                "产品编码已存在: {}",
                product_code
            )));
        }

        // 构造并落库
        let mut product = Product::new(
            product_code,
            name,
            default_unit_price,
            description,
            stock_quantity,
        );
        product.id = ProductRepository::insert(conn, &product)?;

        // 初始库存台账
        StockLedgerService::record(
            conn,
            StockSubject::product(product.id),
            TransactionType::Initial,
            0,
            stock_quantity,
        )?;

        Ok(())
    }
}
