// ==========================================
// 库存运营管理系统 - 交货单行处理器
// ==========================================
// 行字段: deliveryNumber, clientCode, orderedAt, requestedAt 必填;
//         status, deliveredAt, totalDiscountAmount, discountNote, memo 可选
// 副作用: 按客户结算货币解析成交时点汇率并存到单上（KRW 换算用）
// ==========================================

use crate::domain::delivery::Delivery;
use crate::domain::types::DeliveryStatus;
use crate::engine::exchange::ExchangeRateService;
use crate::importer::error::ImportError;
use crate::importer::processor::{key_field, RowProcessor};
use crate::importer::row::RowRecord;
use crate::repository::client_repo::ClientRepository;
use crate::repository::delivery_repo::DeliveryRepository;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub struct DeliveryRowProcessor {
    exchange: ExchangeRateService,
}

impl DeliveryRowProcessor {
    pub fn new() -> Self {
        Self {
            exchange: ExchangeRateService::new(),
        }
    }

    pub fn with_exchange(exchange: ExchangeRateService) -> Self {
        Self { exchange }
    }
}

impl Default for DeliveryRowProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl RowProcessor for DeliveryRowProcessor {
    fn entity_name(&self) -> &'static str {
        "delivery"
    }

    fn key_fields(&self, row: &RowRecord) -> Vec<(String, String)> {
        vec![key_field(row, "deliveryNumber"), key_field(row, "clientCode")]
    }

    fn process(&self, conn: &Connection, row: &RowRecord) -> Result<(), ImportError> {
        // 校验
        let delivery_number = row.require("deliveryNumber")?;
        let client_code = row.require("clientCode")?;
        let ordered_at = row.require_date("orderedAt")?;
        let requested_at = row.require_date("requestedAt")?;
        let delivered_at = row.optional_datetime("deliveredAt")?;

        let status = match row.optional("status") {
            Some(raw) => {
                DeliveryStatus::parse(&raw).ok_or_else(|| ImportError::InvalidValue {
                    field: "status".to_string(),
                    message: format!("无法识别的交货单状态: {}", raw),
                })?
            }
            None => DeliveryStatus::Pending,
        };

        let discount_amount = row.optional_decimal("totalDiscountAmount")?;
        if let Some(amount) = discount_amount {
            if amount < Decimal::ZERO {
                return Err(ImportError::InvalidValue {
                    field: "totalDiscountAmount".to_string(),
                    message: "必须大于等于 0".to_string(),
                });
            }
        }

        // 引用解析: 客户
        let client = ClientRepository::find_by_code(conn, &client_code)?.ok_or_else(|| {
            ImportError::ReferenceNotFound {
                entity: "客户编码".to_string(),
                code: client_code.clone(),
            }
        })?;

        // 单号重复预检（兜底是 deliveries.delivery_number 全局唯一约束）
        if DeliveryRepository::exists_by_number(conn, &delivery_number)? {
            return Err(ImportError::Duplicate(format!(
                "交货单号已存在: {}",
                delivery_number
            )));
        }

        // 构造
        let mut delivery = Delivery::new(
            delivery_number,
            client.id,
            ordered_at,
            requested_at,
            status,
            delivered_at,
        );
        delivery.update_memo(row.optional("memo"));

        if let Some(amount) = discount_amount {
            if amount > Decimal::ZERO {
                delivery.apply_discount(amount, row.optional("discountNote"));
            }
        }

        // 成交时点汇率
        let rate = self.exchange.latest_rate(conn, client.currency)?;
        delivery.set_exchange_rate(rate);

        DeliveryRepository::insert(conn, &delivery)?;

        Ok(())
    }
}
