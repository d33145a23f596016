// ==========================================
// 库存运营管理系统 - 库存台账
// ==========================================
// 红线: 台账只追加，不更新、不删除
// 红线: before + delta == after 在构造时强制校验，违反即失败，绝不静默修正
// 用途: 库存变动的审计事实来源；聚合上的 stock_quantity 只是读取缓存
// ==========================================

use crate::domain::types::{StockSubjectKind, TransactionType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 库存域错误类型
#[derive(Error, Debug)]
pub enum StockError {
    #[error("库存台账不变量违反: before({before}) + delta({delta}) != after({after})")]
    LedgerArithmetic { before: i64, delta: i64, after: i64 },

    #[error("变动前库存不能为负: before={before}")]
    NegativeBefore { before: i64 },

    #[error("变动后库存不能为负: before={before}, delta={delta}, after={after}")]
    NegativeAfter { before: i64, delta: i64, after: i64 },

    #[error("库存不足: {name} 需要 {requested}，当前库存 {available}")]
    Insufficient {
        name: String,
        requested: i64,
        available: i64,
    },
}

// ==========================================
// StockSubject - 台账主体
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StockSubject {
    pub kind: StockSubjectKind,
    pub id: i64,
}

impl StockSubject {
    pub fn part(id: i64) -> Self {
        Self {
            kind: StockSubjectKind::Part,
            id,
        }
    }

    pub fn product(id: i64) -> Self {
        Self {
            kind: StockSubjectKind::Product,
            id,
        }
    }
}

// ==========================================
// StockLedgerEntry - 台账条目
// ==========================================
// 对齐: stock_ledger 表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockLedgerEntry {
    pub id: i64,                           // 数据库行号（插入前为 0）
    pub subject: StockSubject,             // 台账主体（零件/产品）
    pub transaction_type: TransactionType, // 事务类型
    pub before_stock: i64,                 // 变动前库存
    pub change_quantity: i64,              // 变动量（可为负）
    pub after_stock: i64,                  // 变动后库存
    pub created_at: DateTime<Utc>,         // 记录时间
}

impl StockLedgerEntry {
    /// 构造台账条目，校验全部不变量
    ///
    /// # 返回
    /// - Ok(entry): 校验通过
    /// - Err: 不变量违反（带具体 before/delta/after 数值）
    pub fn new(
        subject: StockSubject,
        transaction_type: TransactionType,
        before_stock: i64,
        change_quantity: i64,
        after_stock: i64,
    ) -> Result<Self, StockError> {
        if before_stock < 0 {
            return Err(StockError::NegativeBefore {
                before: before_stock,
            });
        }
        if after_stock < 0 {
            return Err(StockError::NegativeAfter {
                before: before_stock,
                delta: change_quantity,
                after: after_stock,
            });
        }
        if before_stock + change_quantity != after_stock {
            return Err(StockError::LedgerArithmetic {
                before: before_stock,
                delta: change_quantity,
                after: after_stock,
            });
        }

        Ok(Self {
            id: 0,
            subject,
            transaction_type,
            before_stock,
            change_quantity,
            after_stock,
            created_at: Utc::now(),
        })
    }

    /// 按变动量构造条目（after = before + delta）
    pub fn apply(
        subject: StockSubject,
        transaction_type: TransactionType,
        before_stock: i64,
        change_quantity: i64,
    ) -> Result<Self, StockError> {
        Self::new(
            subject,
            transaction_type,
            before_stock,
            change_quantity,
            before_stock + change_quantity,
        )
    }
}
