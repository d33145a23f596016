// ==========================================
// 库存运营管理系统 - 交货单流转服务
// ==========================================
// 职责: 交互式建单（签发单号）、出货完成（扣减产品库存）、取消（回冲库存）
// 红线: 每个操作一个事务；出货扣减与台账记账必须同事务落库
// ==========================================

use crate::config::DEFAULT_DELIVERY_NUMBER_PREFIX;
use crate::domain::delivery::{Delivery, DeliveryItem};
use crate::domain::stock::StockSubject;
use crate::domain::types::{DeliveryStatus, TransactionType};
use crate::engine::exchange::ExchangeRateService;
use crate::engine::sequence::{DeliverySequenceQuery, SequenceGenerator};
use crate::engine::stock_ledger::StockLedgerService;
use crate::repository::client_repo::ClientRepository;
use crate::repository::delivery_repo::DeliveryRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::price_repo::PriceRepository;
use crate::repository::product_repo::ProductRepository;
use chrono::{Datelike, NaiveDate};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};
use tracing::{info, instrument};

/// 建单时的明细行输入
#[derive(Debug, Clone)]
pub struct NewDeliveryItem {
    pub product_code: String,
    pub quantity: i64,
    pub actual_unit_price: Option<Decimal>, // None 时采用基准价
    pub price_note: Option<String>,
    pub is_free: bool,
}

pub struct DeliveryFlowService {
    conn: Arc<Mutex<Connection>>,
    sequence: Arc<SequenceGenerator>,
    exchange: ExchangeRateService,
    number_prefix: String,
}

impl DeliveryFlowService {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            conn,
            sequence: Arc::new(SequenceGenerator::new()),
            exchange: ExchangeRateService::new(),
            number_prefix: DEFAULT_DELIVERY_NUMBER_PREFIX.to_string(),
        }
    }

    /// 按 config_kv 的单号前缀与补零宽度构建
    pub fn from_config(
        conn: Arc<Mutex<Connection>>,
        config: &crate::config::ConfigManager,
    ) -> RepositoryResult<Self> {
        let number_prefix = config.delivery_number_prefix()?;
        let padding = config.sequence_padding()?;
        Ok(Self {
            conn,
            sequence: Arc::new(SequenceGenerator::with_padding(padding)),
            exchange: ExchangeRateService::new(),
            number_prefix,
        })
    }

    /// 共享同一个序列生成器（并发建单方必须共享实例，前缀锁才有效）
    pub fn with_components(
        conn: Arc<Mutex<Connection>>,
        sequence: Arc<SequenceGenerator>,
        exchange: ExchangeRateService,
        number_prefix: String,
    ) -> Self {
        Self {
            conn,
            sequence,
            exchange,
            number_prefix,
        }
    }

    /// 交互式建单：签发单号、解析基准价与汇率、同事务落库
    #[instrument(skip(self, items, memo))]
    pub fn create_delivery(
        &self,
        client_code: &str,
        ordered_at: NaiveDate,
        requested_at: NaiveDate,
        items: Vec<NewDeliveryItem>,
        memo: Option<String>,
    ) -> RepositoryResult<Delivery> {
        let mut guard = self.lock_conn()?;
        let tx = guard
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let client = ClientRepository::find_by_code(&tx, client_code)?.ok_or_else(|| {
            RepositoryError::NotFound {
                entity: "Client".to_string(),
                key: client_code.to_string(),
            }
        })?;

        let prefix = format!("{}{}", self.number_prefix, ordered_at.year());
        let number = self
            .sequence
            .next(&prefix, &DeliverySequenceQuery::new(&tx))?;

        let mut delivery = Delivery::new(
            number,
            client.id,
            ordered_at,
            requested_at,
            DeliveryStatus::Pending,
            None,
        );
        delivery.update_memo(memo);

        for input in items {
            let product =
                ProductRepository::find_by_code(&tx, &input.product_code)?.ok_or_else(|| {
                    RepositoryError::NotFound {
                        entity: "Product".to_string(),
                        key: input.product_code.clone(),
                    }
                })?;

            let base_price = Self::base_unit_price(&tx, client.id, &product)?;
            let item = if input.is_free {
                DeliveryItem::free(product.id, input.quantity, base_price, input.price_note)
            } else {
                let actual = input.actual_unit_price.unwrap_or(base_price);
                DeliveryItem::new(product.id, input.quantity, base_price, actual, input.price_note)
            };
            delivery.add_item(item);
        }

        let rate = self.exchange.latest_rate(&tx, client.currency)?;
        delivery.set_exchange_rate(rate);

        let delivery_id = DeliveryRepository::insert(&tx, &delivery)?;
        delivery.id = delivery_id;
        for item in &mut delivery.items {
            item.delivery_id = delivery_id;
            item.id = DeliveryRepository::insert_item(&tx, delivery_id, item)?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        info!(
            delivery_number = %delivery.delivery_number,
            client_code = %client_code,
            items = delivery.items.len(),
            total = %delivery.total_amount,
            "交货单创建完成"
        );
        Ok(delivery)
    }

    /// 出货完成：逐行扣减产品库存并记 DELIVERY 台账，全部成功才提交
    #[instrument(skip(self))]
    pub fn complete_delivery(&self, delivery_id: i64) -> RepositoryResult<Delivery> {
        let mut guard = self.lock_conn()?;
        let tx = guard
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut delivery = Self::load_delivery(&tx, delivery_id)?;
        delivery
            .complete()
            .map_err(|e| RepositoryError::BusinessRuleViolation(e.to_string()))?;

        for item in &delivery.items {
            let mut product =
                ProductRepository::find_by_id(&tx, item.product_id)?.ok_or_else(|| {
                    RepositoryError::NotFound {
                        entity: "Product".to_string(),
                        key: item.product_id.to_string(),
                    }
                })?;
            let before = product.stock_quantity;
            product.decrease_stock(item.quantity)?;
            StockLedgerService::record(
                &tx,
                StockSubject::product(product.id),
                TransactionType::Delivery,
                before,
                -item.quantity,
            )?;
            ProductRepository::update_stock(&tx, product.id, product.stock_quantity)?;
        }

        DeliveryRepository::update_status(&tx, &delivery)?;
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        info!(delivery_number = %delivery.delivery_number, "交货单出货完成");
        Ok(delivery)
    }

    /// 取消交货单；已出货的回冲产品库存（DELIVERY_CANCELLED 台账）
    #[instrument(skip(self))]
    pub fn cancel_delivery(&self, delivery_id: i64) -> RepositoryResult<Delivery> {
        let mut guard = self.lock_conn()?;
        let tx = guard
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut delivery = Self::load_delivery(&tx, delivery_id)?;
        let was_completed = delivery.status == DeliveryStatus::Completed;
        delivery
            .cancel()
            .map_err(|e| RepositoryError::BusinessRuleViolation(e.to_string()))?;

        if was_completed {
            for item in &delivery.items {
                let mut product =
                    ProductRepository::find_by_id(&tx, item.product_id)?.ok_or_else(|| {
                        RepositoryError::NotFound {
                            entity: "Product".to_string(),
                            key: item.product_id.to_string(),
                        }
                    })?;
                let before = product.stock_quantity;
                product.increase_stock(item.quantity);
                StockLedgerService::record(
                    &tx,
                    StockSubject::product(product.id),
                    TransactionType::DeliveryCancelled,
                    before,
                    item.quantity,
                )?;
                ProductRepository::update_stock(&tx, product.id, product.stock_quantity)?;
            }
        }

        DeliveryRepository::update_status(&tx, &delivery)?;
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        info!(delivery_number = %delivery.delivery_number, "交货单已取消");
        Ok(delivery)
    }

    /// 基准单价: 客户专价 → 产品默认价 → 0
    pub fn base_unit_price(
        conn: &Connection,
        client_id: i64,
        product: &crate::domain::product::Product,
    ) -> RepositoryResult<Decimal> {
        let price = PriceRepository::find_by_client_and_product(conn, client_id, product.id)?
            .map(|p| p.unit_price)
            .unwrap_or_else(|| product.default_unit_price.unwrap_or(Decimal::ZERO));
        Ok(price)
    }

    fn load_delivery(conn: &Connection, delivery_id: i64) -> RepositoryResult<Delivery> {
        DeliveryRepository::find_by_id_with_items(conn, delivery_id)?.ok_or_else(|| {
            RepositoryError::NotFound {
                entity: "Delivery".to_string(),
                key: delivery_id.to_string(),
            }
        })
    }

    fn lock_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}
