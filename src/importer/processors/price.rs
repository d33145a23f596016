// ==========================================
// 库存运营管理系统 - 客户产品价格行处理器
// ==========================================
// 行字段: clientCode, productCode, unitPrice 必填
// ==========================================

use crate::domain::price::ClientProductPrice;
use crate::importer::error::ImportError;
use crate::importer::processor::{key_field, RowProcessor};
use crate::importer::row::RowRecord;
use crate::repository::client_repo::ClientRepository;
use crate::repository::price_repo::PriceRepository;
use crate::repository::product_repo::ProductRepository;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub struct PriceRowProcessor;

impl RowProcessor for PriceRowProcessor {
    fn entity_name(&self) -> &'static str {
        "client_product_price"
    }

    fn key_fields(&self, row: &RowRecord) -> Vec<(String, String)> {
        vec![key_field(row, "clientCode"), key_field(row, "productCode")]
    }

    fn process(&self, conn: &Connection, row: &RowRecord) -> Result<(), ImportError> {
        // 校验
        let client_code = row.require("clientCode")?;
        let product_code = row.require("productCode")?;
        let unit_price = row.require_decimal("unitPrice")?;
        if unit_price < Decimal::ZERO {
            return Err(ImportError::InvalidValue {
                field: "unitPrice".to_string(),
                message: "必须大于等于 0".to_string(),
            });
        }

        // 引用解析
        let client = ClientRepository::find_by_code(conn, &client_code)?.ok_or_else(|| {
            ImportError::ReferenceNotFound {
                entity: "客户编码".to_string(),
                code: client_code.clone(),
            }
        })?;
        let product = ProductRepository::find_by_code(conn, &product_code)?.ok_or_else(|| {
            ImportError::ReferenceNotFound {
                entity: "产品编码".to_string(),
                code: product_code.clone(),
            }
        })?;

        // 重复预检（兜底是 (client_id, product_id) 唯一约束）
        if PriceRepository::exists_by_client_and_product(conn, client.id, product.id)? {
            return Err(ImportError::Duplicate(format!(
                "该客户-产品价格已存在: {} / {}",
                client_code, product_code
            )));
        }

        let price = ClientProductPrice::new(client.id, product.id, unit_price);
        PriceRepository::insert(conn, &price)?;

        Ok(())
    }
}
