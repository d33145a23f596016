// ==========================================
// 库存运营管理系统 - 导入行记录
// ==========================================
// 用途: 文件解析产物，一行一条；只在一次导入内存活，不落库
// 行号: 1 基且含表头偏移（首个数据行 = 2）
// ==========================================

use crate::importer::error::ImportError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct RowRecord {
    pub row_number: usize,              // 源文件行号（表头 + 1 基偏移）
    pub fields: HashMap<String, String>, // 列名 → 原始值
}

impl RowRecord {
    pub fn new(row_number: usize, fields: HashMap<String, String>) -> Self {
        Self { row_number, fields }
    }

    /// 可选字段: TRIM 后为空视为缺失
    pub fn optional(&self, field: &str) -> Option<String> {
        self.fields
            .get(field)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// 必填字段
    pub fn require(&self, field: &str) -> Result<String, ImportError> {
        self.optional(field).ok_or_else(|| ImportError::MissingField {
            field: field.to_string(),
        })
    }

    /// 必填整数
    pub fn require_i64(&self, field: &str) -> Result<i64, ImportError> {
        let raw = self.require(field)?;
        raw.parse::<i64>().map_err(|_| ImportError::InvalidValue {
            field: field.to_string(),
            message: format!("必须是整数: {}", raw),
        })
    }

    /// 必填金额
    pub fn require_decimal(&self, field: &str) -> Result<Decimal, ImportError> {
        let raw = self.require(field)?;
        Decimal::from_str(&raw).map_err(|_| ImportError::InvalidValue {
            field: field.to_string(),
            message: format!("必须是数值: {}", raw),
        })
    }

    /// 可选金额
    pub fn optional_decimal(&self, field: &str) -> Result<Option<Decimal>, ImportError> {
        match self.optional(field) {
            Some(raw) => Decimal::from_str(&raw)
                .map(Some)
                .map_err(|_| ImportError::InvalidValue {
                    field: field.to_string(),
                    message: format!("必须是数值: {}", raw),
                }),
            None => Ok(None),
        }
    }

    /// 必填日期（YYYY-MM-DD）
    pub fn require_date(&self, field: &str) -> Result<NaiveDate, ImportError> {
        let raw = self.require(field)?;
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| ImportError::InvalidValue {
            field: field.to_string(),
            message: format!("日期格式应为 YYYY-MM-DD: {}", raw),
        })
    }

    /// 可选时间戳；接受 "YYYY-MM-DD HH:MM:SS" 或日期（按当日零点）
    pub fn optional_datetime(&self, field: &str) -> Result<Option<DateTime<Utc>>, ImportError> {
        let raw = match self.optional(field) {
            Some(raw) => raw,
            None => return Ok(None),
        };

        let naive = NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S"))
            .or_else(|_| {
                NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN))
            })
            .map_err(|_| ImportError::InvalidValue {
                field: field.to_string(),
                message: format!("时间格式应为 YYYY-MM-DD[ HH:MM:SS]: {}", raw),
            })?;

        Ok(Some(Utc.from_utc_datetime(&naive)))
    }

    /// 可选布尔标记（1/0、true/false、Y/N、是/否）
    pub fn optional_bool(&self, field: &str) -> Result<Option<bool>, ImportError> {
        let raw = match self.optional(field) {
            Some(raw) => raw,
            None => return Ok(None),
        };

        match raw.to_uppercase().as_str() {
            "1" | "TRUE" | "Y" | "YES" | "是" => Ok(Some(true)),
            "0" | "FALSE" | "N" | "NO" | "否" => Ok(Some(false)),
            _ => Err(ImportError::InvalidValue {
                field: field.to_string(),
                message: format!("无法识别的布尔值: {}", raw),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> RowRecord {
        let fields = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RowRecord::new(2, fields)
    }

    #[test]
    fn test_require_trims_and_rejects_blank() {
        let row = record(&[("partCode", "  P-001  "), ("name", "   ")]);
        assert_eq!(row.require("partCode").unwrap(), "P-001");
        assert!(matches!(
            row.require("name"),
            Err(ImportError::MissingField { .. })
        ));
        assert!(matches!(
            row.require("unit"),
            Err(ImportError::MissingField { .. })
        ));
    }

    #[test]
    fn test_require_i64_rejects_garbage() {
        let row = record(&[("stockQuantity", "abc")]);
        assert!(matches!(
            row.require_i64("stockQuantity"),
            Err(ImportError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_optional_decimal() {
        let row = record(&[("unitPrice", "12.50"), ("bad", "x")]);
        assert_eq!(
            row.optional_decimal("unitPrice").unwrap(),
            Some(Decimal::new(1250, 2))
        );
        assert_eq!(row.optional_decimal("missing").unwrap(), None);
        assert!(row.optional_decimal("bad").is_err());
    }

    #[test]
    fn test_optional_datetime_accepts_bare_date() {
        let row = record(&[("deliveredAt", "2025-03-01")]);
        let parsed = row.optional_datetime("deliveredAt").unwrap().unwrap();
        assert_eq!(parsed.date_naive(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }

    #[test]
    fn test_optional_bool_variants() {
        let row = record(&[("isFreeItem", "Y"), ("other", "no"), ("bad", "maybe")]);
        assert_eq!(row.optional_bool("isFreeItem").unwrap(), Some(true));
        assert_eq!(row.optional_bool("other").unwrap(), Some(false));
        assert_eq!(row.optional_bool("missing").unwrap(), None);
        assert!(row.optional_bool("bad").is_err());
    }
}
