// ==========================================
// 库存运营管理系统 - 交货明细行处理器
// ==========================================
// 行字段: deliveryNumber, productCode, quantity 必填;
//         actualUnitPrice, priceNote, isFreeItem 可选
// 价格解析: 基准价 = 客户专价 → 产品默认价 → 0;
//           实际价 = 显式覆盖 → 基准价; 无偿行恒为 0
// 副作用: 追加明细后重算单头派生金额并回写
// ==========================================

use crate::domain::delivery::DeliveryItem;
use crate::engine::delivery_flow::DeliveryFlowService;
use crate::importer::error::ImportError;
use crate::importer::processor::{key_field, RowProcessor};
use crate::importer::row::RowRecord;
use crate::repository::delivery_repo::DeliveryRepository;
use crate::repository::product_repo::ProductRepository;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub struct DeliveryItemRowProcessor;

impl RowProcessor for DeliveryItemRowProcessor {
    fn entity_name(&self) -> &'static str {
        "delivery_item"
    }

    fn key_fields(&self, row: &RowRecord) -> Vec<(String, String)> {
        vec![
            key_field(row, "deliveryNumber"),
            key_field(row, "productCode"),
        ]
    }

    fn process(&self, conn: &Connection, row: &RowRecord) -> Result<(), ImportError> {
        // 校验
        let delivery_number = row.require("deliveryNumber")?;
        let product_code = row.require("productCode")?;
        let quantity = row.require_i64("quantity")?;
        if quantity <= 0 {
            return Err(ImportError::InvalidValue {
                field: "quantity".to_string(),
                message: "必须大于等于 1".to_string(),
            });
        }
        let actual_unit_price = row.optional_decimal("actualUnitPrice")?;
        if let Some(price) = actual_unit_price {
            if price < Decimal::ZERO {
                return Err(ImportError::InvalidValue {
                    field: "actualUnitPrice".to_string(),
                    message: "必须大于等于 0".to_string(),
                });
            }
        }
        let is_free = row.optional_bool("isFreeItem")?.unwrap_or(false);

        // 引用解析: 交货单（含已导入明细，派生金额要在全量明细上重算）
        let mut delivery = DeliveryRepository::find_by_number_with_items(conn, &delivery_number)?
            .ok_or_else(|| ImportError::ReferenceNotFound {
                entity: "交货单号".to_string(),
                code: delivery_number.clone(),
            })?;

        // 引用解析: 产品
        let product = ProductRepository::find_by_code(conn, &product_code)?.ok_or_else(|| {
            ImportError::ReferenceNotFound {
                entity: "产品编码".to_string(),
                code: product_code.clone(),
            }
        })?;

        // 基准价与实际价
        let base_price = DeliveryFlowService::base_unit_price(conn, delivery.client_id, &product)?;
        let mut item = if is_free {
            DeliveryItem::free(product.id, quantity, base_price, row.optional("priceNote"))
        } else {
            let actual = actual_unit_price.unwrap_or(base_price);
            DeliveryItem::new(
                product.id,
                quantity,
                base_price,
                actual,
                row.optional("priceNote"),
            )
        };

        // 明细落库，再挂回单头重算派生金额并回写
        item.id = DeliveryRepository::insert_item(conn, delivery.id, &item)?;
        delivery.add_item(item);
        DeliveryRepository::update_totals(conn, &delivery)?;

        Ok(())
    }
}
