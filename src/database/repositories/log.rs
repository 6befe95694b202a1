use anyhow::Result;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};

use crate::database::models::{LogFilter, NewLog, RequestLog, UpdateLogInput};

/// Inserts an audit entry inside an open transaction so the log row
/// commits or rolls back together with the state change it records.
pub async fn append_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    entry: &NewLog,
) -> Result<RequestLog> {
    let log = sqlx::query_as::<_, RequestLog>(
        r#"
        INSERT INTO
            logs (
                staff_id,
                request_id,
                withdraw_request_id,
                processor_id,
                request_type,
                reason,
                status,
                created_at
            )
        VALUES
            ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING
            id,
            staff_id,
            request_id,
            withdraw_request_id,
            processor_id,
            request_type,
            reason,
            status,
            created_at
        "#,
    )
    .bind(entry.staff_id)
    .bind(entry.request_id)
    .bind(entry.withdraw_request_id)
    .bind(entry.processor_id)
    .bind(entry.request_type)
    .bind(entry.reason.clone())
    .bind(entry.status)
    .bind(Utc::now())
    .fetch_one(&mut **tx)
    .await?;

    Ok(log)
}

#[derive(Clone)]
pub struct LogRepository {
    pool: PgPool,
}

impl LogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append a standalone entry, e.g. a delegation record.
    pub async fn append(&self, entry: &NewLog) -> Result<RequestLog> {
        let mut tx = self.pool.begin().await?;
        let log = append_in_tx(&mut tx, entry).await?;
        tx.commit().await?;

        Ok(log)
    }

    /// List entries with optional filtering, oldest first so the audit
    /// trail reads in transition order.
    pub async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<RequestLog>> {
        let mut query = r#"
            SELECT
                id,
                staff_id,
                request_id,
                withdraw_request_id,
                processor_id,
                request_type,
                reason,
                status,
                created_at
            FROM
                logs
            "#
        .to_string();

        let mut params: Vec<i64> = Vec::new();
        let mut conditions = vec![];

        if let Some(staff_id) = filter.staff_id {
            conditions.push(format!("staff_id = ${}", params.len() + 1));
            params.push(i64::from(staff_id));
        }

        if let Some(request_id) = filter.request_id {
            conditions.push(format!("request_id = ${}", params.len() + 1));
            params.push(request_id);
        }

        if let Some(withdraw_request_id) = filter.withdraw_request_id {
            conditions.push(format!("withdraw_request_id = ${}", params.len() + 1));
            params.push(withdraw_request_id);
        }

        if let Some(processor_id) = filter.processor_id {
            conditions.push(format!("processor_id = ${}", params.len() + 1));
            params.push(i64::from(processor_id));
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        query.push_str(" ORDER BY created_at ASC, id ASC");

        let mut prepared = sqlx::query_as::<_, RequestLog>(&query);
        for param in params {
            prepared = prepared.bind(param);
        }

        let logs = prepared.fetch_all(&self.pool).await?;

        Ok(logs)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<RequestLog>> {
        let log = sqlx::query_as::<_, RequestLog>(
            r#"
            SELECT
                id,
                staff_id,
                request_id,
                withdraw_request_id,
                processor_id,
                request_type,
                reason,
                status,
                created_at
            FROM
                logs
            WHERE
                id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(log)
    }

    /// Administrative correction of a recorded entry.
    pub async fn update_log(&self, id: i64, input: UpdateLogInput) -> Result<Option<RequestLog>> {
        let log = sqlx::query_as::<_, RequestLog>(
            r#"
            UPDATE
                logs
            SET
                reason = COALESCE($1, reason),
                status = COALESCE($2, status)
            WHERE
                id = $3
            RETURNING
                id,
                staff_id,
                request_id,
                withdraw_request_id,
                processor_id,
                request_type,
                reason,
                status,
                created_at
            "#,
        )
        .bind(input.reason)
        .bind(input.status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(log)
    }

    pub async fn delete_log(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM logs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
