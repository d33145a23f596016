// ==========================================
// 库存运营管理系统 - 客户领域模型
// ==========================================
// 对齐: countries / clients 表
// 说明: 客户树只有一层（上级客户 → 下级客户），不存在孙级
// ==========================================

use crate::domain::types::Currency;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Country {
    pub id: i64,
    pub code: String, // 国家代码（业务键，如 KR / US）
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,                           // 数据库行号（插入前为 0）
    pub client_code: String,               // 客户编码（业务键）
    pub parent_client_id: Option<i64>,     // 上级客户（None 即为上级客户本身）
    pub country_id: i64,
    pub name: String,
    pub address: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub currency: Currency,                // 结算货币
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>, // 软删除标记
}

impl Client {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        client_code: String,
        parent_client_id: Option<i64>,
        country_id: i64,
        name: String,
        address: Option<String>,
        contact_number: Option<String>,
        email: Option<String>,
        currency: Currency,
    ) -> Self {
        Self {
            id: 0,
            client_code,
            parent_client_id,
            country_id,
            name,
            address,
            contact_number,
            email,
            currency,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// 软删除：改写编码释放业务键
    pub fn mark_deleted(&mut self) {
        self.client_code = format!(
            "{}_DELETED_{}",
            self.client_code,
            Utc::now().timestamp_millis()
        );
        self.deleted_at = Some(Utc::now());
    }
}
