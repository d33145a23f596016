// ==========================================
// 库存运营管理系统 - 批量导入编排器
// ==========================================
// 职责: 驱动 RowProcessor 逐行处理，行间严格串行
// 红线: 一行一个事务——该行的聚合、台账、序号要么全部落库要么全不落
// 红线: 单行失败绝不中止批次；total 在处理前定死
// ==========================================

use crate::importer::batch::{BatchResult, FailureDetail};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::processor::RowProcessor;
use crate::importer::row::RowRecord;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};

pub struct BulkImportOrchestrator {
    conn: Arc<Mutex<Connection>>,
}

impl BulkImportOrchestrator {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 对行序列执行一个处理器，产出批次结果
    ///
    /// # 行为
    /// - 按 processor.passes() 分趟，每趟内按源文件顺序处理归属该趟的行
    /// - 行级错误: 回滚该行、记失败明细、继续下一行
    /// - 批次级错误: 直接上抛
    /// - 收尾把失败明细按行号排序，恢复源文件顺序（多趟时趟序会打乱顺序）
    pub fn run(
        &self,
        rows: &[RowRecord],
        processor: &dyn RowProcessor,
    ) -> ImportResult<BatchResult> {
        let total_count = rows.len();
        let mut success_count = 0usize;
        let mut failures: Vec<FailureDetail> = Vec::new();

        info!(
            entity = processor.entity_name(),
            total = total_count,
            passes = processor.passes(),
            "开始批量导入"
        );

        for pass in 0..processor.passes() {
            for row in rows {
                if processor.pass_of(row) != pass {
                    continue;
                }

                match self.process_single_row(processor, row) {
                    Ok(()) => {
                        success_count += 1;
                        debug!(
                            entity = processor.entity_name(),
                            row_number = row.row_number,
                            "行导入成功"
                        );
                    }
                    Err(e) if e.is_row_local() => {
                        warn!(
                            entity = processor.entity_name(),
                            row_number = row.row_number,
                            error = %e,
                            "行导入失败"
                        );
                        failures.push(FailureDetail::new(
                            row.row_number,
                            processor.key_fields(row),
                            e.to_string(),
                        ));
                    }
                    Err(e) => {
                        error!(
                            entity = processor.entity_name(),
                            row_number = row.row_number,
                            error = %e,
                            "批次级错误，终止导入"
                        );
                        return Err(e);
                    }
                }
            }
        }

        // 多趟处理会按趟序收集失败，这里恢复源文件顺序
        failures.sort_by_key(|f| f.row_number);

        let failure_count = failures.len();
        info!(
            entity = processor.entity_name(),
            total = total_count,
            success = success_count,
            failed = failure_count,
            "批量导入完成"
        );

        Ok(BatchResult {
            total_count,
            success_count,
            failure_count,
            failures,
        })
    }

    /// 单行工作单元：锁连接 → 开事务 → 处理 → 提交/回滚
    fn process_single_row(
        &self,
        processor: &dyn RowProcessor,
        row: &RowRecord,
    ) -> Result<(), ImportError> {
        let mut guard = self
            .conn
            .lock()
            .map_err(|e| ImportError::Database(format!("连接锁获取失败: {}", e)))?;

        let tx = guard
            .transaction()
            .map_err(|e| ImportError::Database(format!("事务开启失败: {}", e)))?;

        match processor.process(&tx, row) {
            Ok(()) => tx
                .commit()
                .map_err(|e| ImportError::Database(format!("事务提交失败: {}", e))),
            Err(e) => {
                // Transaction drop 即回滚；显式调用以表达意图
                let _ = tx.rollback();
                Err(e)
            }
        }
    }
}
