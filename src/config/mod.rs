// ==========================================
// 库存运营管理系统 - 配置层
// ==========================================
// 职责: 系统配置读取（带编译期默认值）
// 存储: config_kv 表 (key-value)
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

/// 交货单号前缀默认值
pub const DEFAULT_DELIVERY_NUMBER_PREFIX: &str = "SOLM-PO-";

/// 序号补零宽度默认值
pub const DEFAULT_SEQUENCE_PADDING: usize = 4;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 从 config_kv 表读取配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 读取配置值，缺省时用默认值
    pub fn get_config_or_default(&self, key: &str, default: &str) -> RepositoryResult<String> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入（覆盖）配置值
    pub fn set_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        conn.execute(
            r#"
            INSERT INTO config_kv (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// 交货单号前缀（key: delivery/number_prefix）
    pub fn delivery_number_prefix(&self) -> RepositoryResult<String> {
        self.get_config_or_default("delivery/number_prefix", DEFAULT_DELIVERY_NUMBER_PREFIX)
    }

    /// 单号序号补零宽度（key: delivery/sequence_padding）
    pub fn sequence_padding(&self) -> RepositoryResult<usize> {
        let raw = self.get_config_or_default(
            "delivery/sequence_padding",
            &DEFAULT_SEQUENCE_PADDING.to_string(),
        )?;
        raw.parse::<usize>().map_err(|_| {
            RepositoryError::InternalError(format!("配置值格式错误: delivery/sequence_padding={}", raw))
        })
    }
}
