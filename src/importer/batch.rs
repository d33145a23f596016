// ==========================================
// 库存运营管理系统 - 批次结果模型
// ==========================================
// 不变量: success_count + failure_count == total_count
// 不变量: failures.len() == failure_count，按源文件行号排序
// 生命周期: 每次导入构造一次返回调用方，不落库
// ==========================================

use serde::{Deserialize, Serialize};

/// 单行失败明细：行号 + 该行的业务键字段（供操作员定位）+ 错误信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureDetail {
    pub row_number: usize,
    pub key_fields: Vec<(String, String)>,
    pub error_message: String,
}

impl FailureDetail {
    pub fn new(
        row_number: usize,
        key_fields: Vec<(String, String)>,
        error_message: String,
    ) -> Self {
        Self {
            row_number,
            key_fields,
            error_message,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub total_count: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub failures: Vec<FailureDetail>,
}

impl BatchResult {
    pub fn is_all_success(&self) -> bool {
        self.failure_count == 0
    }
}
