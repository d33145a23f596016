// ==========================================
// 库存运营管理系统 - 导入层
// ==========================================
// 职责: 外部文件批量导入，逐行隔离失败
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod batch;
pub mod error;
pub mod file_parser;
pub mod orchestrator;
pub mod processor;
pub mod processors;
pub mod row;
pub mod service;

// 重导出核心类型
pub use batch::{BatchResult, FailureDetail};
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, FileParser, UniversalFileParser};
pub use orchestrator::BulkImportOrchestrator;
pub use processor::RowProcessor;
pub use processors::{
    ClientRowProcessor, DeliveryItemRowProcessor, DeliveryRowProcessor, PartRowProcessor,
    PriceRowProcessor, ProductPartMappingRowProcessor, ProductRowProcessor,
};
pub use row::RowRecord;
pub use service::{BulkImportApi, BulkImportService, ImportKind};
