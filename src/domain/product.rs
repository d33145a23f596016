// ==========================================
// 库存运营管理系统 - 产品领域模型
// ==========================================
// 对齐: products / product_parts 表
// ==========================================

use crate::domain::stock::StockError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,                            // 数据库行号（插入前为 0）
    pub product_code: String,               // 产品编码（业务键）
    pub name: String,                       // 产品名称
    pub default_unit_price: Option<Decimal>, // 默认单价（无客户专价时的兜底）
    pub description: Option<String>,        // 说明
    pub stock_quantity: i64,                // 当前库存（缓存）
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,  // 软删除标记
}

impl Product {
    pub fn new(
        product_code: String,
        name: String,
        default_unit_price: Option<Decimal>,
        description: Option<String>,
        initial_stock: i64,
    ) -> Self {
        Self {
            id: 0,
            product_code,
            name,
            default_unit_price,
            description,
            stock_quantity: initial_stock,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// 扣减库存；不足时失败，不允许扣成负数
    pub fn decrease_stock(&mut self, quantity: i64) -> Result<(), StockError> {
        if self.stock_quantity < quantity {
            return Err(StockError::Insufficient {
                name: self.name.clone(),
                requested: quantity,
                available: self.stock_quantity,
            });
        }
        self.stock_quantity -= quantity;
        Ok(())
    }

    pub fn increase_stock(&mut self, quantity: i64) {
        self.stock_quantity += quantity;
    }

    /// 软删除：改写编码释放业务键
    pub fn mark_deleted(&mut self) {
        self.product_code = format!(
            "{}_DELETED_{}",
            self.product_code,
            Utc::now().timestamp_millis()
        );
        self.deleted_at = Some(Utc::now());
    }
}

// ==========================================
// ProductPartMapping - 产品用料映射 (BOM 行)
// ==========================================
// 同一 (product, part) 组合只允许一条映射
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPartMapping {
    pub id: i64,
    pub product_id: i64,
    pub part_id: i64,
    pub required_quantity: i64, // 单件产品所需零件数
    pub created_at: DateTime<Utc>,
}

impl ProductPartMapping {
    pub fn new(product_id: i64, part_id: i64, required_quantity: i64) -> Self {
        Self {
            id: 0,
            product_id,
            part_id,
            required_quantity,
            created_at: Utc::now(),
        }
    }

    /// 生产 product_quantity 件产品所需的零件总数
    pub fn total_required(&self, product_quantity: i64) -> i64 {
        self.required_quantity * product_quantity
    }
}
