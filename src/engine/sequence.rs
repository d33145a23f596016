// ==========================================
// 库存运营管理系统 - 业务单号序列生成器
// ==========================================
// 职责: 为业务单号前缀签发下一个未占用的数字序号
// 红线: 按前缀串行化（前缀级互斥，不做进程级全局锁），
//       拿到槽位后必须对库中单号复核，冲突则递增重试直到占到号
// 红线: 单号一经签发不再回收，聚合软删除后序号也不复用
// ==========================================

use crate::config::DEFAULT_SEQUENCE_PADDING;
use crate::repository::delivery_repo::DeliveryRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::Connection;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tracing::debug;

// ==========================================
// SequenceQuery Trait - 序列查询协作方
// ==========================================
// 由持久层回答"某前缀下已签发的最大序号"与"某单号是否已占用"
pub trait SequenceQuery {
    /// 前缀下已存在单号的最大序号（含软删除行），无则 None
    fn last_sequence(&self, prefix: &str) -> RepositoryResult<Option<i64>>;

    /// 单号是否已被占用
    fn exists(&self, number: &str) -> RepositoryResult<bool>;
}

// ==========================================
// SequenceGenerator - 序号签发
// ==========================================
// 并发模型: 每个前缀一把互斥锁 + 本进程内已签发序号集合。
// 两个并发调用方基于同一快照各算出 max+1 时，后进入临界区的一方
// 会在已签发集合上撞车并继续递增，从而保证互不重号。
pub struct SequenceGenerator {
    prefixes: Mutex<HashMap<String, Arc<Mutex<HashSet<i64>>>>>,
    padding: usize,
}

impl SequenceGenerator {
    pub fn new() -> Self {
        Self::with_padding(DEFAULT_SEQUENCE_PADDING)
    }

    pub fn with_padding(padding: usize) -> Self {
        Self {
            prefixes: Mutex::new(HashMap::new()),
            padding,
        }
    }

    /// 签发 prefix 下一个未占用单号，格式 {prefix}-{seq:0width}
    ///
    /// # 返回
    /// - Ok(number): 已占到的单号
    /// - Err: 查询失败或锁获取失败
    pub fn next(&self, prefix: &str, query: &dyn SequenceQuery) -> RepositoryResult<String> {
        // 取该前缀的槽位锁（外层 map 锁只用于建槽，立刻释放）
        let slot = {
            let mut prefixes = self
                .prefixes
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            prefixes
                .entry(prefix.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(HashSet::new())))
                .clone()
        };

        let mut claimed = slot
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let mut sequence = query.last_sequence(prefix)?.unwrap_or(0) + 1;
        loop {
            if !claimed.contains(&sequence) {
                let number = format!(
                    "{}-{:0width$}",
                    prefix,
                    sequence,
                    width = self.padding
                );
                // 拿到槽位后复核库中单号，堵住基于陈旧快照的 max+1
                if !query.exists(&number)? {
                    claimed.insert(sequence);
                    debug!(prefix = %prefix, sequence = sequence, "签发业务单号");
                    return Ok(number);
                }
            }
            sequence += 1;
        }
    }
}

impl Default for SequenceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// DeliverySequenceQuery - 交货单号序列查询
// ==========================================
pub struct DeliverySequenceQuery<'a> {
    conn: &'a Connection,
}

impl<'a> DeliverySequenceQuery<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl SequenceQuery for DeliverySequenceQuery<'_> {
    fn last_sequence(&self, prefix: &str) -> RepositoryResult<Option<i64>> {
        DeliveryRepository::last_sequence_by_prefix(self.conn, prefix)
    }

    fn exists(&self, number: &str) -> RepositoryResult<bool> {
        DeliveryRepository::exists_by_number(self.conn, number)
    }
}
