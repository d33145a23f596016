// ==========================================
// 库存运营管理系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 零件/产品/客户/交货的内部运营数据核心
// 核心能力: 批量导入（行级失败隔离）、库存台账、业务单号序列
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/schema）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Currency, DeliveryStatus, StockSubjectKind, TransactionType};

// 领域实体
pub use domain::{
    Client, ClientProductPrice, Country, Delivery, DeliveryItem, ExchangeRate, Part, Product,
    ProductPartMapping, StockLedgerEntry, StockSubject,
};

// 引擎
pub use engine::{
    DeliveryFlowService, ExchangeRateService, SequenceGenerator, StockLedgerService,
};

// 导入
pub use importer::{
    BatchResult, BulkImportApi, BulkImportOrchestrator, BulkImportService, FailureDetail,
    ImportError, ImportKind, RowProcessor, RowRecord,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "库存运营管理系统";

// ==========================================
// 预编译检查
// ==========================================
