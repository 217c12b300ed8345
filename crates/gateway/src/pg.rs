//! `PostgreSQL` document store.
//!
//! # Tables
//!
//! One table per [`Collection`] in the `portell` schema, all with the same
//! shape:
//!
//! ```sql
//! id         uuid primary key default gen_random_uuid(),
//! created_at timestamptz not null default now(),
//! updated_at timestamptz not null default now(),
//! data       jsonb not null
//! ```
//!
//! Field names in filters and sorts are always bound as parameters
//! (`data -> $1`), never spliced into SQL.
//!
//! # Migrations
//!
//! Migrations live in `crates/gateway/migrations/` and run via:
//! ```bash
//! cargo run -p portell-cli -- migrate
//! ```

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde_json::{Map, Value};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{GatewayError, Result};
use crate::query::{Condition, Criteria, SortSpec};
use crate::store::{BoundedIncrement, Collection, DocumentStore, StoredDocument, strip_system_fields};

/// Embedded migrations for the `portell` schema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> std::result::Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

const COLUMNS: &str = "id, created_at, updated_at, data";

/// [`DocumentStore`] over a `PgPool`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn decode(collection: Collection, row: &PgRow) -> Result<StoredDocument> {
    let id: Uuid = row.try_get("id")?;
    let Json(data): Json<Value> = row.try_get("data")?;
    let Value::Object(data) = data else {
        return Err(GatewayError::DataCorruption {
            collection: collection.name(),
            id: id.to_string(),
            message: "document is not a JSON object".to_owned(),
        });
    };
    Ok(StoredDocument {
        id,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        data,
    })
}

fn push_condition(qb: &mut QueryBuilder<'_, Postgres>, field: &str, condition: &Condition) {
    match (field, condition) {
        ("id", Condition::Eq(value)) => match as_uuid(value) {
            Some(id) => {
                qb.push("id = ").push_bind(id);
            }
            None => {
                qb.push("FALSE");
            }
        },
        ("id", Condition::OneOf(values)) => {
            let ids: Vec<Uuid> = values.iter().filter_map(as_uuid).collect();
            qb.push("id = ANY(").push_bind(ids).push(")");
        }
        ("created_at" | "updated_at", Condition::Eq(value)) => match as_timestamp(value) {
            Some(ts) => {
                qb.push(if field == "created_at" {
                    "created_at = "
                } else {
                    "updated_at = "
                })
                .push_bind(ts);
            }
            None => {
                qb.push("FALSE");
            }
        },
        ("created_at" | "updated_at", Condition::OneOf(values)) => {
            let stamps: Vec<DateTime<Utc>> = values.iter().filter_map(as_timestamp).collect();
            qb.push(if field == "created_at" {
                "created_at = ANY("
            } else {
                "updated_at = ANY("
            })
            .push_bind(stamps)
            .push(")");
        }
        (_, Condition::Eq(value)) => {
            qb.push("data -> ")
                .push_bind(field.to_owned())
                .push(" = ")
                .push_bind(Json(value.clone()));
        }
        (_, Condition::OneOf(values)) => {
            qb.push("jsonb_build_array(data -> ")
                .push_bind(field.to_owned())
                .push(") <@ ")
                .push_bind(Json(Value::Array(values.clone())));
        }
    }
}

fn push_order(qb: &mut QueryBuilder<'_, Postgres>, sort: &SortSpec) {
    let dir = if sort.descending { "DESC" } else { "ASC" };
    qb.push(" ORDER BY ");
    match sort.field.as_str() {
        "id" | "created_at" | "updated_at" => {
            qb.push(match sort.field.as_str() {
                "id" => "id ",
                "created_at" => "created_at ",
                _ => "updated_at ",
            })
            .push(dir);
        }
        field => {
            // decimals are stored as strings; order numeric-looking values numerically
            qb.push("CASE WHEN data ->> ")
                .push_bind(field.to_owned())
                .push(r" ~ '^-?[0-9]+(\.[0-9]+)?$' THEN (data ->> ")
                .push_bind(field.to_owned())
                .push(")::numeric END ")
                .push(dir)
                .push(" NULLS LAST, data -> ")
                .push_bind(field.to_owned())
                .push(" ")
                .push(dir);
        }
    }
    qb.push(", id ASC");
}

fn as_uuid(value: &Value) -> Option<Uuid> {
    value.as_str().and_then(|s| Uuid::parse_str(s).ok())
}

fn as_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|ts| ts.with_timezone(&Utc))
}

#[async_trait]
impl DocumentStore for PgStore {
    #[instrument(skip(self, criteria), fields(collection = %collection))]
    async fn find(
        &self,
        collection: Collection,
        criteria: &Criteria,
        sort: &SortSpec,
        limit: Option<usize>,
    ) -> Result<Vec<StoredDocument>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(COLUMNS).push(" FROM ").push(collection.table());

        for (i, (field, condition)) in criteria.iter().enumerate() {
            qb.push(if i == 0 { " WHERE " } else { " AND " });
            push_condition(&mut qb, field, condition);
        }
        push_order(&mut qb, sort);
        if let Some(limit) = limit {
            qb.push(" LIMIT ")
                .push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(|row| decode(collection, row)).collect()
    }

    #[instrument(skip(self), fields(collection = %collection))]
    async fn get(&self, collection: Collection, id: Uuid) -> Result<Option<StoredDocument>> {
        let sql = format!("SELECT {COLUMNS} FROM {} WHERE id = $1", collection.table());
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(|row| decode(collection, row)).transpose()
    }

    #[instrument(skip(self, data), fields(collection = %collection))]
    async fn insert(
        &self,
        collection: Collection,
        mut data: Map<String, Value>,
    ) -> Result<StoredDocument> {
        strip_system_fields(&mut data);
        let sql = format!(
            "INSERT INTO {} (data) VALUES ($1) RETURNING {COLUMNS}",
            collection.table()
        );
        let row = sqlx::query(&sql)
            .bind(Json(Value::Object(data)))
            .fetch_one(&self.pool)
            .await?;
        decode(collection, &row)
    }

    #[instrument(skip(self, patch), fields(collection = %collection))]
    async fn merge(
        &self,
        collection: Collection,
        id: Uuid,
        mut patch: Map<String, Value>,
    ) -> Result<Option<StoredDocument>> {
        strip_system_fields(&mut patch);
        let sql = format!(
            "UPDATE {} SET data = data || $2, updated_at = now() WHERE id = $1 RETURNING {COLUMNS}",
            collection.table()
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(Json(Value::Object(patch)))
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(|row| decode(collection, row)).transpose()
    }

    #[instrument(skip(self), fields(collection = %collection))]
    async fn delete(&self, collection: Collection, id: Uuid) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", collection.table());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(collection = %collection))]
    async fn increment_bounded(
        &self,
        collection: Collection,
        id: Uuid,
        field: &str,
        by: i64,
        ceiling_field: &str,
    ) -> Result<BoundedIncrement> {
        let sql = format!(
            r"
            UPDATE {table}
            SET data = jsonb_set(
                    data,
                    ARRAY[$2],
                    to_jsonb(COALESCE((data ->> $2)::bigint, 0) + $3)
                ),
                updated_at = now()
            WHERE id = $1
              AND COALESCE((data ->> $2)::bigint, 0) + $3 <= COALESCE((data ->> $4)::bigint, 0)
            RETURNING {COLUMNS}
            ",
            table = collection.table()
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(field)
            .bind(by)
            .bind(ceiling_field)
            .fetch_optional(&self.pool)
            .await?;
        if let Some(row) = row {
            return decode(collection, &row).map(BoundedIncrement::Applied);
        }

        let check = format!(
            r"
            SELECT COALESCE((data ->> $2)::bigint, 0) AS current,
                   COALESCE((data ->> $3)::bigint, 0) AS ceiling
            FROM {}
            WHERE id = $1
            ",
            collection.table()
        );
        let row = sqlx::query(&check)
            .bind(id)
            .bind(field)
            .bind(ceiling_field)
            .fetch_optional(&self.pool)
            .await?;
        Ok(match row {
            Some(row) => BoundedIncrement::Rejected {
                current: row.try_get("current")?,
                ceiling: row.try_get("ceiling")?,
            },
            None => BoundedIncrement::Missing,
        })
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_public_codes_are_unique_in_schema() {
        let sql: String = MIGRATOR.iter().map(|m| m.sql.as_ref()).collect();
        assert!(sql.contains(
            "CREATE UNIQUE INDEX booking_confirmation_code_idx ON portell.booking ((data ->> 'confirmation_code'))"
        ));
        assert!(sql.contains(
            "CREATE UNIQUE INDEX order_number_idx ON portell.\"order\" ((data ->> 'order_number'))"
        ));
    }
}
