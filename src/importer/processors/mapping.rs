// ==========================================
// 库存运营管理系统 - 产品用料映射行处理器
// ==========================================
// 行字段: productCode, partCode, requiredQuantity 必填
// 引用解析: 产品与零件都按业务编码查找，缺一行失败
// ==========================================

use crate::domain::product::ProductPartMapping;
use crate::importer::error::ImportError;
use crate::importer::processor::{key_field, RowProcessor};
use crate::importer::row::RowRecord;
use crate::repository::part_repo::PartRepository;
use crate::repository::product_repo::{ProductPartRepository, ProductRepository};
use rusqlite::Connection;

pub struct ProductPartMappingRowProcessor;

impl RowProcessor for ProductPartMappingRowProcessor {
    fn entity_name(&self) -> &'static str {
        "product_part_mapping"
    }

    fn key_fields(&self, row: &RowRecord) -> Vec<(String, String)> {
        vec![key_field(row, "productCode"), key_field(row, "partCode")]
    }

    fn process(&self, conn: &Connection, row: &RowRecord) -> Result<(), ImportError> {
        // 校验
        let product_code = row.require("productCode")?;
        let part_code = row.require("partCode")?;
        let required_quantity = row.require_i64("requiredQuantity")?;
        if required_quantity <= 0 {
            return Err(ImportError::InvalidValue {
                field: "requiredQuantity".to_string(),
                message: "必须大于等于 1".to_string(),
            });
        }

        // 引用解析
        let product = ProductRepository::find_by_code(conn, &product_code)?.ok_or_else(|| {
            ImportError::ReferenceNotFound {
                entity: "产品编码".to_string(),
                code: product_code.clone(),
            }
        })?;
        let part = PartRepository::find_by_code(conn, &part_code)?.ok_or_else(|| {
            ImportError::ReferenceNotFound {
                entity: "零件编码".to_string(),
                code: part_code.clone(),
            }
        })?;

        // 重复预检（兜底是 (product_id, part_id) 唯一约束）
        if ProductPartRepository::exists_mapping(conn, product.id, part.id)? {
            return Err(ImportError::Duplicate(format!(
                "该产品已映射此零件: {} -> {}",
                product_code, part_code
            )));
        }

        let mapping = ProductPartMapping::new(product.id, part.id, required_quantity);
        ProductPartRepository::insert(conn, &mapping)?;

        Ok(())
    }
}
