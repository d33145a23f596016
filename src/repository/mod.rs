// ==========================================
// 库存运营管理系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// 约束: 写入函数一律接收 &Connection，便于在单行事务内组合多个仓储
// ==========================================

pub mod client_repo;
pub mod db_utils;
pub mod delivery_repo;
pub mod error;
pub mod exchange_rate_repo;
pub mod part_repo;
pub mod price_repo;
pub mod product_repo;
pub mod stock_ledger_repo;

// 重导出核心仓储
pub use client_repo::{ClientRepository, CountryRepository};
pub use delivery_repo::DeliveryRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use exchange_rate_repo::ExchangeRateRepository;
pub use part_repo::PartRepository;
pub use price_repo::PriceRepository;
pub use product_repo::{ProductPartRepository, ProductRepository};
pub use stock_ledger_repo::StockLedgerRepository;
