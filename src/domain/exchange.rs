// ==========================================
// 库存运营管理系统 - 汇率领域模型
// ==========================================
// 对齐: exchange_rates 表（(currency, rate_date) 唯一）
// 汇率以 KRW 为本位：1 单位外币 = rate KRW
// ==========================================

use crate::domain::types::Currency;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub id: i64,
    pub currency: Currency,
    pub rate: Decimal,        // 1 外币 = rate KRW
    pub rate_date: NaiveDate, // 汇率适用日
    pub created_at: DateTime<Utc>,
}

impl ExchangeRate {
    pub fn new(currency: Currency, rate: Decimal, rate_date: NaiveDate) -> Self {
        Self {
            id: 0,
            currency,
            rate,
            rate_date,
            created_at: Utc::now(),
        }
    }

    /// 外币金额换算为 KRW（不做舍入，舍入由单据侧统一处理）
    pub fn convert_to_krw(&self, amount: Decimal) -> Decimal {
        amount * self.rate
    }
}
