// ==========================================
// 库存运营管理系统 - 行处理器实现
// ==========================================
// 每种实体一个处理器，共享 BulkImportOrchestrator 的迭代/隔离/汇总循环
// ==========================================

pub mod client;
pub mod delivery;
pub mod delivery_item;
pub mod mapping;
pub mod part;
pub mod price;
pub mod product;

pub use client::ClientRowProcessor;
pub use delivery::DeliveryRowProcessor;
pub use delivery_item::DeliveryItemRowProcessor;
pub use mapping::ProductPartMappingRowProcessor;
pub use part::PartRowProcessor;
pub use price::PriceRowProcessor;
pub use product::ProductRowProcessor;
