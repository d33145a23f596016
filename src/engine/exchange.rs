// ==========================================
// 库存运营管理系统 - 汇率解析服务
// ==========================================
// 解析顺序: KRW 恒为 1 → 当日已落库汇率 → 外部汇率源 → 固定兜底表
// 说明: 外部源的 HTTP 拉取不在本核心内，RateSource 是它的接缝；
//       默认实现不提供报价，直接走兜底表
// ==========================================

use crate::domain::exchange::ExchangeRate;
use crate::domain::types::Currency;
use crate::repository::error::RepositoryResult;
use crate::repository::exchange_rate_repo::ExchangeRateRepository;
use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::debug;

// ==========================================
// RateSource Trait - 外部汇率源
// ==========================================
pub trait RateSource: Send + Sync {
    /// 取某货币对 KRW 的即期汇率；None 表示源不可用
    fn fetch(&self, currency: Currency) -> Option<Decimal>;
}

/// 默认汇率源：不提供报价
pub struct NoRateSource;

impl RateSource for NoRateSource {
    fn fetch(&self, _currency: Currency) -> Option<Decimal> {
        None
    }
}

// ==========================================
// ExchangeRateService - 汇率解析
// ==========================================
pub struct ExchangeRateService {
    source: Box<dyn RateSource>,
}

impl ExchangeRateService {
    pub fn new() -> Self {
        Self {
            source: Box::new(NoRateSource),
        }
    }

    pub fn with_source(source: Box<dyn RateSource>) -> Self {
        Self { source }
    }

    /// 今日汇率（1 外币 = rate KRW）
    pub fn latest_rate(&self, conn: &Connection, currency: Currency) -> RepositoryResult<Decimal> {
        self.rate_on(conn, currency, Utc::now().date_naive())
    }

    /// 指定日期的汇率；未落库时向源取价或使用兜底表，并落库供后续复用
    pub fn rate_on(
        &self,
        conn: &Connection,
        currency: Currency,
        date: NaiveDate,
    ) -> RepositoryResult<Decimal> {
        // KRW 是本位币
        if currency == Currency::KRW {
            return Ok(Decimal::ONE);
        }

        if let Some(stored) =
            ExchangeRateRepository::find_by_currency_and_date(conn, currency, date)?
        {
            return Ok(stored.rate);
        }

        let rate = match self.source.fetch(currency) {
            Some(rate) => rate,
            None => {
                let fallback = Self::fallback_rate(currency);
                debug!(currency = %currency, rate = %fallback, "汇率源不可用，使用固定兜底汇率");
                fallback
            }
        };

        ExchangeRateRepository::insert(conn, &ExchangeRate::new(currency, rate, date))?;
        Ok(rate)
    }

    /// 固定兜底汇率表
    pub fn fallback_rate(currency: Currency) -> Decimal {
        match currency {
            Currency::USD => Decimal::from(1300),
            Currency::JPY => Decimal::new(95, 1), // 9.5
            Currency::EUR => Decimal::from(1400),
            Currency::CNY => Decimal::from(180),
            Currency::GBP => Decimal::from(1650),
            Currency::KRW => Decimal::ONE,
        }
    }
}

impl Default for ExchangeRateService {
    fn default() -> Self {
        Self::new()
    }
}
