// ==========================================
// 库存运营管理系统 - 仓储层取值辅助
// ==========================================
// 职责: SQLite TEXT 列与领域类型之间的转换
// 说明: 金额以十进制字符串落库（精度无损），枚举以大写字符串落库
// ==========================================

use crate::domain::types::{Currency, DeliveryStatus, StockSubjectKind, TransactionType};
use rust_decimal::Decimal;
use rusqlite::types::Type;
use std::str::FromStr;

fn conversion_error(message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, Type::Text, message.into())
}

/// TEXT → Decimal
pub fn decimal_from_text(value: &str) -> rusqlite::Result<Decimal> {
    Decimal::from_str(value.trim())
        .map_err(|e| conversion_error(format!("金额解析失败: {} ({})", value, e)))
}

/// Option<TEXT> → Option<Decimal>
pub fn opt_decimal_from_text(value: Option<String>) -> rusqlite::Result<Option<Decimal>> {
    value.map(|v| decimal_from_text(&v)).transpose()
}

/// TEXT → Currency
pub fn currency_from_text(value: &str) -> rusqlite::Result<Currency> {
    Currency::parse(value).ok_or_else(|| conversion_error(format!("未知货币代码: {}", value)))
}

/// TEXT → DeliveryStatus
pub fn delivery_status_from_text(value: &str) -> rusqlite::Result<DeliveryStatus> {
    DeliveryStatus::parse(value)
        .ok_or_else(|| conversion_error(format!("未知交货单状态: {}", value)))
}

/// TEXT → TransactionType
pub fn transaction_type_from_text(value: &str) -> rusqlite::Result<TransactionType> {
    TransactionType::parse(value)
        .ok_or_else(|| conversion_error(format!("未知库存事务类型: {}", value)))
}

/// TEXT → StockSubjectKind
pub fn subject_kind_from_text(value: &str) -> rusqlite::Result<StockSubjectKind> {
    StockSubjectKind::parse(value)
        .ok_or_else(|| conversion_error(format!("未知库存主体类别: {}", value)))
}
