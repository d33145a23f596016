// ==========================================
// 库存运营管理系统 - 零件领域模型
// ==========================================
// 对齐: parts 表
// 说明: stock_quantity 是读取缓存，事实来源是库存台账
// ==========================================

use crate::domain::stock::StockError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub id: i64,                           // 数据库行号（插入前为 0）
    pub part_code: String,                 // 零件编码（业务键）
    pub name: String,                      // 零件名称
    pub specification: Option<String>,     // 规格
    pub stock_quantity: i64,               // 当前库存（缓存）
    pub unit: String,                      // 单位（个、kg、m 等）
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>, // 软删除标记
}

impl Part {
    pub fn new(
        part_code: String,
        name: String,
        specification: Option<String>,
        initial_stock: i64,
        unit: String,
    ) -> Self {
        Self {
            id: 0,
            part_code,
            name,
            specification,
            stock_quantity: initial_stock,
            unit,
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

    /// 软删除：改写编码释放业务键，单独行上保留历史
    pub fn mark_deleted(&mut self) {
        self.part_code = format!(
            "{}_DELETED_{}",
            self.part_code,
            Utc::now().timestamp_millis()
        );
        self.deleted_at = Some(Utc::now());
    }
}
