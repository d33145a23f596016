// ==========================================
// 库存运营管理系统 - 客户产品价格
// ==========================================
// 对齐: client_product_prices 表
// 同一 (client, product) 组合只允许一条价格
// ==========================================

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientProductPrice {
    pub id: i64,
    pub client_id: i64,
    pub product_id: i64,
    pub unit_price: Decimal, // 客户专属单价
    pub created_at: DateTime<Utc>,
}

impl ClientProductPrice {
    pub fn new(client_id: i64, product_id: i64, unit_price: Decimal) -> Self {
        Self {
            id: 0,
            client_id,
            product_id,
            unit_price,
            created_at: Utc::now(),
        }
    }
}
