// ==========================================
// 库存运营管理系统 - 领域类型定义
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 结算货币 (Currency)
// ==========================================
// KRW 为本位币，汇率恒为 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    KRW, // 韩元（本位币）
    USD, // 美元
    JPY, // 日元
    EUR, // 欧元
    CNY, // 人民币
    GBP, // 英镑
}

impl Currency {
    /// 货币代码（与文件列值、数据库存储一致）
    pub fn code(&self) -> &'static str {
        match self {
            Currency::KRW => "KRW",
            Currency::USD => "USD",
            Currency::JPY => "JPY",
            Currency::EUR => "EUR",
            Currency::CNY => "CNY",
            Currency::GBP => "GBP",
        }
    }

    /// 货币符号（用于单据展示）
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::KRW => "₩",
            Currency::USD => "$",
            Currency::JPY => "¥",
            Currency::EUR => "€",
            Currency::CNY => "¥",
            Currency::GBP => "£",
        }
    }

    /// 解析货币代码（大小写不敏感）
    pub fn parse(value: &str) -> Option<Currency> {
        match value.trim().to_uppercase().as_str() {
            "KRW" => Some(Currency::KRW),
            "USD" => Some(Currency::USD),
            "JPY" => Some(Currency::JPY),
            "EUR" => Some(Currency::EUR),
            "CNY" => Some(Currency::CNY),
            "GBP" => Some(Currency::GBP),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ==========================================
// 交货单状态 (Delivery Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    Pending,   // 待出货
    Completed, // 已出货
    Cancelled, // 已取消
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "PENDING",
            DeliveryStatus::Completed => "COMPLETED",
            DeliveryStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(value: &str) -> Option<DeliveryStatus> {
        match value.trim().to_uppercase().as_str() {
            "PENDING" => Some(DeliveryStatus::Pending),
            "COMPLETED" => Some(DeliveryStatus::Completed),
            "CANCELLED" => Some(DeliveryStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 库存事务类型 (Transaction Type)
// ==========================================
// 零件与产品共用一套类型：
// - 零件侧使用 INITIAL / INBOUND / OUTBOUND / ADJUSTMENT
// - 产品侧使用 INITIAL / PRODUCE / DELIVERY / ADJUSTMENT / DELIVERY_CANCELLED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Initial,           // 初始库存
    Inbound,           // 入库
    Outbound,          // 出库
    Produce,           // 生产入库
    Delivery,          // 交货扣减
    Adjustment,        // 人工调整
    DeliveryCancelled, // 交货取消回冲
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Initial => "INITIAL",
            TransactionType::Inbound => "INBOUND",
            TransactionType::Outbound => "OUTBOUND",
            TransactionType::Produce => "PRODUCE",
            TransactionType::Delivery => "DELIVERY",
            TransactionType::Adjustment => "ADJUSTMENT",
            TransactionType::DeliveryCancelled => "DELIVERY_CANCELLED",
        }
    }

    pub fn parse(value: &str) -> Option<TransactionType> {
        match value.trim().to_uppercase().as_str() {
            "INITIAL" => Some(TransactionType::Initial),
            "INBOUND" => Some(TransactionType::Inbound),
            "OUTBOUND" => Some(TransactionType::Outbound),
            "PRODUCE" => Some(TransactionType::Produce),
            "DELIVERY" => Some(TransactionType::Delivery),
            "ADJUSTMENT" => Some(TransactionType::Adjustment),
            "DELIVERY_CANCELLED" => Some(TransactionType::DeliveryCancelled),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 库存主体类别 (Stock Subject Kind)
// ==========================================
// 台账按 (subject_kind, subject_id) 区分零件与产品
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockSubjectKind {
    Part,    // 零件
    Product, // 产品
}

impl StockSubjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockSubjectKind::Part => "PART",
            StockSubjectKind::Product => "PRODUCT",
        }
    }

    pub fn parse(value: &str) -> Option<StockSubjectKind> {
        match value.trim().to_uppercase().as_str() {
            "PART" => Some(StockSubjectKind::Part),
            "PRODUCT" => Some(StockSubjectKind::Product),
            _ => None,
        }
    }
}

impl fmt::Display for StockSubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
