// ==========================================
// 库存运营管理系统 - 交货单领域模型
// ==========================================
// 对齐: deliveries / delivery_items 表
// 红线: 任何明细或折扣变动后必须重算派生金额，顺序固定:
//       小计 → 折扣 → 应收 → KRW 换算；重算幂等，不允许留脏值
// ==========================================

use crate::domain::types::DeliveryStatus;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 交货单状态机错误
#[derive(Error, Debug)]
#[error("当前状态不允许该操作: status={status}, operation={operation}")]
pub struct DeliveryStateError {
    pub status: DeliveryStatus,
    pub operation: &'static str,
}

// ==========================================
// DeliveryItem - 交货明细行
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryItem {
    pub id: i64,
    pub delivery_id: i64,              // 归属交货单（插入时回填）
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: Decimal,           // 基准单价（客户专价 → 默认价 → 0）
    pub actual_unit_price: Decimal,    // 实际适用单价（显式覆盖或基准价）
    pub total_price: Decimal,          // actual_unit_price * quantity
    pub price_note: Option<String>,    // 价格备注
    pub is_free: bool,                 // 无偿提供行
    pub created_at: DateTime<Utc>,
}

impl DeliveryItem {
    pub fn new(
        product_id: i64,
        quantity: i64,
        unit_price: Decimal,
        actual_unit_price: Decimal,
        price_note: Option<String>,
    ) -> Self {
        Self {
            id: 0,
            delivery_id: 0,
            product_id,
            quantity,
            unit_price,
            actual_unit_price,
            total_price: actual_unit_price * Decimal::from(quantity),
            price_note,
            is_free: false,
            created_at: Utc::now(),
        }
    }

    /// 无偿提供行：实际单价与行金额恒为 0，基准价保留用于对账
    pub fn free(
        product_id: i64,
        quantity: i64,
        unit_price: Decimal,
        price_note: Option<String>,
    ) -> Self {
        Self {
            id: 0,
            delivery_id: 0,
            product_id,
            quantity,
            unit_price,
            actual_unit_price: Decimal::ZERO,
            total_price: Decimal::ZERO,
            price_note,
            is_free: true,
            created_at: Utc::now(),
        }
    }

    pub fn is_discounted(&self) -> bool {
        self.actual_unit_price < self.unit_price
    }
}

// ==========================================
// Delivery - 交货单聚合
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delivery {
    pub id: i64,
    pub delivery_number: String,            // 交货单号（业务键，全局唯一）
    pub client_id: i64,
    pub status: DeliveryStatus,
    pub ordered_at: NaiveDate,              // 下单日
    pub requested_at: NaiveDate,            // 要求出货日
    pub delivered_at: Option<DateTime<Utc>>, // 实际出货时间
    pub items: Vec<DeliveryItem>,
    pub subtotal_amount: Decimal,           // 明细小计
    pub discount_amount: Option<Decimal>,   // 显式折扣金额（与折扣率互斥）
    pub discount_rate: Option<Decimal>,     // 折扣率（百分比）
    pub discount_note: Option<String>,
    pub total_discount_amount: Decimal,     // 实际折扣额（派生）
    pub total_amount: Decimal,              // 应收 = 小计 - 折扣
    pub exchange_rate: Option<Decimal>,     // 成交时点汇率（1 外币 = rate KRW）
    pub total_amount_krw: Option<Decimal>,  // KRW 换算金额（派生）
    pub memo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Delivery {
    pub fn new(
        delivery_number: String,
        client_id: i64,
        ordered_at: NaiveDate,
        requested_at: NaiveDate,
        status: DeliveryStatus,
        delivered_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: 0,
            delivery_number,
            client_id,
            status,
            ordered_at,
            requested_at,
            delivered_at,
            items: Vec::new(),
            subtotal_amount: Decimal::ZERO,
            discount_amount: None,
            discount_rate: None,
            discount_note: None,
            total_discount_amount: Decimal::ZERO,
            total_amount: Decimal::ZERO,
            exchange_rate: None,
            total_amount_krw: None,
            memo: None,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    pub fn add_item(&mut self, mut item: DeliveryItem) {
        item.delivery_id = self.id;
        self.items.push(item);
        self.recalculate();
    }

    /// 应用显式折扣金额（清掉折扣率）
    pub fn apply_discount(&mut self, amount: Decimal, note: Option<String>) {
        self.discount_amount = Some(amount);
        self.discount_rate = None;
        self.discount_note = note;
        self.recalculate();
    }

    /// 应用折扣率（百分比，清掉显式金额）
    pub fn apply_discount_rate(&mut self, rate: Decimal, note: Option<String>) {
        self.discount_rate = Some(rate);
        self.discount_amount = None;
        self.discount_note = note;
        self.recalculate();
    }

    pub fn clear_discount(&mut self) {
        self.discount_amount = None;
        self.discount_rate = None;
        self.discount_note = None;
        self.recalculate();
    }

    pub fn set_exchange_rate(&mut self, rate: Decimal) {
        self.exchange_rate = Some(rate);
        self.recalculate();
    }

    pub fn update_memo(&mut self, memo: Option<String>) {
        self.memo = memo;
    }

    pub fn has_discount(&self) -> bool {
        self.total_discount_amount > Decimal::ZERO
    }

    /// 派生金额重算（固定顺序，幂等）
    ///
    /// 1. subtotal = Σ 行金额（无偿行为 0）
    /// 2. 折扣 = 显式金额，否则 subtotal * rate / 100（两位小数，四舍五入），否则 0
    /// 3. total = subtotal - 折扣
    /// 4. total_krw = round(total * 汇率, 0 位，四舍五入)，未设汇率则不计
    pub fn recalculate(&mut self) {
        self.subtotal_amount = self
            .items
            .iter()
            .map(|item| item.total_price)
            .sum::<Decimal>();

        self.total_discount_amount = if let Some(amount) = self.discount_amount {
            amount
        } else if let Some(rate) = self.discount_rate {
            (self.subtotal_amount * rate / Decimal::from(100))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        } else {
            Decimal::ZERO
        };

        self.total_amount = self.subtotal_amount - self.total_discount_amount;

        self.total_amount_krw = self.exchange_rate.map(|rate| {
            (self.total_amount * rate)
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        });
    }

    /// 出货完成: 仅允许 PENDING → COMPLETED
    pub fn complete(&mut self) -> Result<(), DeliveryStateError> {
        if self.status != DeliveryStatus::Pending {
            return Err(DeliveryStateError {
                status: self.status,
                operation: "complete",
            });
        }
        self.status = DeliveryStatus::Completed;
        self.delivered_at = Some(Utc::now());
        Ok(())
    }

    /// 取消交货单（已取消的不可重复取消）
    pub fn cancel(&mut self) -> Result<(), DeliveryStateError> {
        if self.status == DeliveryStatus::Cancelled {
            return Err(DeliveryStateError {
                status: self.status,
                operation: "cancel",
            });
        }
        self.status = DeliveryStatus::Cancelled;
        Ok(())
    }
}
