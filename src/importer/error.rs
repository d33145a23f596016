// ==========================================
// 库存运营管理系统 - 导入模块错误类型
// ==========================================
// 错误分两档:
// - 行级错误: 只终止当前行的工作单元，汇入 BatchResult.failures
// - 批次级错误: 文件不可解析 / 数据库故障，直接上抛终止整个导入
// 工具: thiserror 派生宏
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误（批次级）=====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 行级错误 =====
    #[error("{field} 为必填项")]
    MissingField { field: String },

    #[error("{field} {message}")]
    InvalidValue { field: String, message: String },

    #[error("不存在的{entity}: {code}")]
    ReferenceNotFound { entity: String, code: String },

    #[error("{0}")]
    Duplicate(String),

    #[error("不变量违反: {0}")]
    InvariantViolation(String),

    // ===== 数据库错误（批次级）=====
    #[error("数据库错误: {0}")]
    Database(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 行级错误: 回滚当前行、计入失败明细后继续下一行；
    /// 其余错误终止整个批次
    pub fn is_row_local(&self) -> bool {
        matches!(
            self,
            ImportError::MissingField { .. }
                | ImportError::InvalidValue { .. }
                | ImportError::ReferenceNotFound { .. }
                | ImportError::Duplicate(_)
                | ImportError::InvariantViolation(_)
        )
    }
}

// 实现 From<RepositoryError>
// 唯一约束兜底命中按重复处理（行级）；外键/业务规则按不变量违反处理（行级）；
// 锁与查询故障按批次级数据库错误上抛
impl From<RepositoryError> for ImportError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UniqueConstraintViolation(msg) => {
                ImportError::Duplicate(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::NotFound { entity, key } => ImportError::ReferenceNotFound {
                entity,
                code: key,
            },
            RepositoryError::ForeignKeyViolation(msg) => ImportError::InvariantViolation(msg),
            RepositoryError::BusinessRuleViolation(msg) => ImportError::InvariantViolation(msg),
            other => ImportError::Database(other.to_string()),
        }
    }
}

// 实现 From<StockError>：台账不变量违反是行级错误
impl From<crate::domain::stock::StockError> for ImportError {
    fn from(err: crate::domain::stock::StockError) -> Self {
        ImportError::InvariantViolation(err.to_string())
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
