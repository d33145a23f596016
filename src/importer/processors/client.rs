// ==========================================
// 库存运营管理系统 - 客户行处理器
// ==========================================
// 行字段: clientCode, name, countryCode, currency 必填;
//         address, contactNumber, email, parentClientCode 可选
// 两趟处理: 第 0 趟登记上级客户（parentClientCode 为空的行），
//           第 1 趟登记下级客户并按编码解析上级。
//           上级在第 0 趟缺席或失败，下级行以引用缺失失败——不跨趟重试
// ==========================================

use crate::domain::client::Client;
use crate::domain::types::Currency;
use crate::importer::error::ImportError;
use crate::importer::processor::{key_field, RowProcessor};
use crate::importer::row::RowRecord;
use crate::repository::client_repo::{ClientRepository, CountryRepository};
use rusqlite::Connection;

pub struct ClientRowProcessor;

impl RowProcessor for ClientRowProcessor {
    fn entity_name(&self) -> &'static str {
        "client"
    }

    fn passes(&self) -> usize {
        2
    }

    fn pass_of(&self, row: &RowRecord) -> usize {
        // 上级客户（无 parent 引用）先行
        if row.optional("parentClientCode").is_none() {
            0
        } else {
            1
        }
    }

    fn key_fields(&self, row: &RowRecord) -> Vec<(String, String)> {
        vec![key_field(row, "clientCode"), key_field(row, "name")]
    }

    fn process(&self, conn: &Connection, row: &RowRecord) -> Result<(), ImportError> {
        // 校验
        let client_code = row.require("clientCode")?;
        let name = row.require("name")?;
        let country_code = row.require("countryCode")?;
        let currency_raw = row.require("currency")?;
        let currency =
            Currency::parse(&currency_raw).ok_or_else(|| ImportError::InvalidValue {
                field: "currency".to_string(),
                message: format!("无法识别的货币代码: {}", currency_raw),
            })?;

        // 重复预检（兜底是 clients 表的未删除行唯一索引）
        if ClientRepository::exists_by_code(conn, &client_code)? {
            return Err(ImportError::Duplicate(format!(
                "客户编码已存在: {}",
                client_code
            )));
        }

        // 引用解析: 国家
        let country = CountryRepository::find_by_code(conn, &country_code)?.ok_or_else(|| {
            ImportError::ReferenceNotFound {
                entity: "国家代码".to_string(),
                code: country_code.clone(),
            }
        })?;

        // 引用解析: 上级客户（仅第 1 趟的行带 parent）
        let parent_client_id = match row.optional("parentClientCode") {
            Some(parent_code) => {
                let parent =
                    ClientRepository::find_by_code(conn, &parent_code)?.ok_or_else(|| {
                        ImportError::ReferenceNotFound {
                            entity: "上级客户编码".to_string(),
                            code: parent_code.clone(),
                        }
                    })?;
                Some(parent.id)
            }
            None => None,
        };

        let client = Client::new(
            client_code,
            parent_client_id,
            country.id,
            name,
            row.optional("address"),
            row.optional("contactNumber"),
            row.optional("email"),
            currency,
        );
        ClientRepository::insert(conn, &client)?;

        Ok(())
    }
}
