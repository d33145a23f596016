// ==========================================
// 库存运营管理系统 - 行处理器接口
// ==========================================
// 职责: 定义单行导入策略接口（每种实体一个实现）
// 编排由 BulkImportOrchestrator 负责，处理器只关心一行:
//   校验 → 业务键解析引用 → 重复预检 → 构造聚合落库 → 副作用
// ==========================================

use crate::importer::error::ImportError;
use crate::importer::row::RowRecord;
use rusqlite::Connection;

// ==========================================
// RowProcessor Trait
// ==========================================
// 多趟支持: 有行间依赖的实体（如上级/下级客户）声明 passes > 1，
// 编排器先跑完第 0 趟（含失败）再进入下一趟
pub trait RowProcessor: Send + Sync {
    /// 实体名（日志与错误信息用）
    fn entity_name(&self) -> &'static str;

    /// 需要的处理趟数（默认 1）
    fn passes(&self) -> usize {
        1
    }

    /// 某行归属哪一趟（取值 0..passes）
    fn pass_of(&self, _row: &RowRecord) -> usize {
        0
    }

    /// 该行的业务键字段（失败明细里带给操作员）
    fn key_fields(&self, row: &RowRecord) -> Vec<(String, String)>;

    /// 处理一行；在调用方开启的行级事务内执行
    ///
    /// # 返回
    /// - Ok(()): 该行全部效果已写入事务
    /// - Err(行级错误): 调用方回滚本行并记失败明细
    /// - Err(批次级错误): 调用方终止整个批次
    fn process(&self, conn: &Connection, row: &RowRecord) -> Result<(), ImportError>;
}

/// 业务键字段提取辅助（取不到的字段给空串，保证失败明细列齐）
pub fn key_field(row: &RowRecord, field: &str) -> (String, String) {
    (field.to_string(), row.optional(field).unwrap_or_default())
}
