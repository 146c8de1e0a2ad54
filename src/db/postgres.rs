use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgRow};
use sqlx::{Column, ConnectOptions, Connection, Row, TypeInfo};
use std::str::FromStr;

use crate::db::{ConnectionParams, Connector, Session};
use crate::error::BoxError;

/// Opens a dedicated `PgConnection` per session (no pool: pooling would hide
/// exactly the setup cost being measured).
#[derive(Debug, Default, Clone, Copy)]
pub struct PgConnector;

pub struct PgSession {
    conn: PgConnection,
}

fn build_connect_options(params: &ConnectionParams) -> Result<PgConnectOptions, BoxError> {
    let opts = PgConnectOptions::from_str(&params.url())?
        .username(&params.username)
        .password(&params.password);
    Ok(opts)
}

#[async_trait]
impl Connector for PgConnector {
    type Session = PgSession;

    async fn connect(&self, params: &ConnectionParams) -> Result<PgSession, BoxError> {
        let opts = build_connect_options(params)?;
        let conn = opts.connect().await?;
        Ok(PgSession { conn })
    }
}

/// Integer literals come back as INT4, computed ones may be INT8 or INT2.
fn first_column_as_i64(row: &PgRow) -> Result<i64, BoxError> {
    if let Ok(v) = row.try_get::<i32, _>(0) {
        return Ok(v.into());
    }
    if let Ok(v) = row.try_get::<i64, _>(0) {
        return Ok(v);
    }
    if let Ok(v) = row.try_get::<i16, _>(0) {
        return Ok(v.into());
    }
    let type_name = row
        .columns()
        .first()
        .map(|c| c.type_info().name().to_string())
        .unwrap_or_else(|| "<no columns>".to_string());
    Err(format!("expected an integer column, got {type_name}").into())
}

#[async_trait]
impl Session for PgSession {
    async fn query_scalar(&mut self, sql: &str) -> Result<i64, BoxError> {
        let row = sqlx::query(sql).fetch_one(&mut self.conn).await?;
        first_column_as_i64(&row)
    }

    async fn query_text(&mut self, sql: &str) -> Result<String, BoxError> {
        let text: String = sqlx::query_scalar(sql).fetch_one(&mut self.conn).await?;
        Ok(text)
    }

    async fn close(self) -> Result<(), BoxError> {
        self.conn.close().await?;
        Ok(())
    }
}
