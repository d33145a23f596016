// ==========================================
// 库存运营管理系统 - 引擎层
// ==========================================
// 职责: 实现业务规则（台账记账、单号签发、汇率解析、交货流转）
// 红线: 规则计算在领域对象上完成，引擎只编排与落库
// ==========================================

pub mod delivery_flow;
pub mod exchange;
pub mod sequence;
pub mod stock_ledger;

// 重导出核心服务
pub use delivery_flow::{DeliveryFlowService, NewDeliveryItem};
pub use exchange::{ExchangeRateService, NoRateSource, RateSource};
pub use sequence::{DeliverySequenceQuery, SequenceGenerator, SequenceQuery};
pub use stock_ledger::StockLedgerService;
