// ==========================================
// 库存运营管理系统 - 客户 / 国家仓储
// ==========================================
// 红线: 业务键查询只看未删除行（deleted_at IS NULL）
// ==========================================

use crate::domain::client::{Client, Country};
use crate::repository::db_utils::currency_from_text;
use crate::repository::error::RepositoryResult;
use rusqlite::{params, Connection, OptionalExtension, Row};

const SELECT_COLUMNS: &str = "id, client_code, parent_client_id, country_id, name, address, contact_number, email, currency, created_at, deleted_at";

pub struct CountryRepository;

impl CountryRepository {
    pub fn insert(conn: &Connection, country: &Country) -> RepositoryResult<i64> {
        conn.execute(
            "INSERT INTO countries (code, name) VALUES (?1, ?2)",
            params![country.code, country.name],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_code(conn: &Connection, code: &str) -> RepositoryResult<Option<Country>> {
        let country = conn
            .query_row(
                "SELECT id, code, name FROM countries WHERE code = ?1",
                params![code],
                |row| {
                    Ok(Country {
                        id: row.get(0)?,
                        code: row.get(1)?,
                        name: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(country)
    }
}

pub struct ClientRepository;

impl ClientRepository {
    /// 插入客户，返回数据库行号
    pub fn insert(conn: &Connection, client: &Client) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO clients (client_code, parent_client_id, country_id, name, address,
                                 contact_number, email, currency, created_at, deleted_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                client.client_code,
                client.parent_client_id,
                client.country_id,
                client.name,
                client.address,
                client.contact_number,
                client.email,
                client.currency.code(),
                client.created_at,
                client.deleted_at,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 按业务编码查询（未删除行）
    pub fn find_by_code(conn: &Connection, client_code: &str) -> RepositoryResult<Option<Client>> {
        let sql = format!(
            "SELECT {} FROM clients WHERE client_code = ?1 AND deleted_at IS NULL",
            SELECT_COLUMNS
        );
        let client = conn
            .query_row(&sql, params![client_code], map_client)
            .optional()?;
        Ok(client)
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> RepositoryResult<Option<Client>> {
        let sql = format!("SELECT {} FROM clients WHERE id = ?1", SELECT_COLUMNS);
        let client = conn.query_row(&sql, params![id], map_client).optional()?;
        Ok(client)
    }

    /// 业务编码是否已被未删除行占用
    pub fn exists_by_code(conn: &Connection, client_code: &str) -> RepositoryResult<bool> {
        let exists = conn
            .query_row(
                "SELECT 1 FROM clients WHERE client_code = ?1 AND deleted_at IS NULL LIMIT 1",
                params![client_code],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(exists)
    }
}

fn map_client(row: &Row<'_>) -> rusqlite::Result<Client> {
    let currency: String = row.get(8)?;
    Ok(Client {
        id: row.get(0)?,
        client_code: row.get(1)?,
        parent_client_id: row.get(2)?,
        country_id: row.get(3)?,
        name: row.get(4)?,
        address: row.get(5)?,
        contact_number: row.get(6)?,
        email: row.get(7)?,
        currency: currency_from_text(&currency)?,
        created_at: row.get(9)?,
        deleted_at: row.get(10)?,
    })
}
