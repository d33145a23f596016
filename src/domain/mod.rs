// ==========================================
// 库存运营管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、业务规则
// 红线: 不含数据访问逻辑,不含导入编排逻辑
// ==========================================

pub mod client;
pub mod delivery;
pub mod exchange;
pub mod part;
pub mod price;
pub mod product;
pub mod stock;
pub mod types;

// 重导出核心类型
pub use client::{Client, Country};
pub use delivery::{Delivery, DeliveryItem};
pub use exchange::ExchangeRate;
pub use part::Part;
pub use price::ClientProductPrice;
pub use product::{Product, ProductPartMapping};
pub use stock::{StockError, StockLedgerEntry, StockSubject};
pub use types::{Currency, DeliveryStatus, StockSubjectKind, TransactionType};
