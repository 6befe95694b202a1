use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;

use crate::database::models::{
    NewLog, UpdateWithdrawRequestInput, WithdrawRequest, WithdrawRequestInput, WithdrawStatus,
    WithdrawnDate,
};
use crate::database::repositories::log::append_in_tx;
use crate::services::lifecycle;

#[derive(Clone)]
pub struct WithdrawRepository {
    pool: PgPool,
}

impl WithdrawRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a withdraw request in the pending state, with its
    /// submission audit entry in the same transaction.
    pub async fn create_withdraw_request(
        &self,
        input: WithdrawRequestInput,
    ) -> Result<WithdrawRequest> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let request = sqlx::query_as::<_, WithdrawRequest>(
            r#"
            INSERT INTO
                withdraw_requests (
                    staff_id,
                    date,
                    timeslot,
                    reason,
                    status,
                    created_at,
                    updated_at
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7)
            RETURNING
                id,
                staff_id,
                date,
                timeslot,
                reason,
                status,
                processed_by,
                processing_note,
                created_at,
                updated_at
            "#,
        )
        .bind(input.staff_id)
        .bind(input.date)
        .bind(input.timeslot)
        .bind(input.reason)
        .bind(WithdrawStatus::Pending)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        append_in_tx(&mut tx, &NewLog::for_withdraw_request(&request, None)).await?;

        tx.commit().await?;

        Ok(request)
    }

    /// Get all withdraw requests with optional filtering.
    pub async fn get_withdraw_requests(
        &self,
        staff_id: Option<i32>,
        status: Option<WithdrawStatus>,
    ) -> Result<Vec<WithdrawRequest>> {
        let mut query = r#"
            SELECT
                id,
                staff_id,
                date,
                timeslot,
                reason,
                status,
                processed_by,
                processing_note,
                created_at,
                updated_at
            FROM
                withdraw_requests
            "#
        .to_string();

        let mut conditions = vec![];
        let mut n = 0;

        if staff_id.is_some() {
            n += 1;
            conditions.push(format!("staff_id = ${n}"));
        }

        if status.is_some() {
            n += 1;
            conditions.push(format!("status = ${n}"));
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        query.push_str(" ORDER BY created_at DESC");

        let mut prepared = sqlx::query_as::<_, WithdrawRequest>(&query);
        if let Some(staff_id) = staff_id {
            prepared = prepared.bind(staff_id);
        }
        if let Some(status) = status {
            prepared = prepared.bind(status);
        }

        let requests = prepared.fetch_all(&self.pool).await?;

        Ok(requests)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<WithdrawRequest>> {
        let request = sqlx::query_as::<_, WithdrawRequest>(
            r#"
            SELECT
                id,
                staff_id,
                date,
                timeslot,
                reason,
                status,
                processed_by,
                processing_note,
                created_at,
                updated_at
            FROM
                withdraw_requests
            WHERE
                id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// Edit a withdraw request that is still pending.
    pub async fn update_withdraw_request(
        &self,
        id: i64,
        input: UpdateWithdrawRequestInput,
    ) -> Result<Option<WithdrawRequest>> {
        let request = sqlx::query_as::<_, WithdrawRequest>(
            r#"
            UPDATE
                withdraw_requests
            SET
                date = COALESCE($1, date),
                timeslot = COALESCE($2, timeslot),
                reason = COALESCE($3, reason),
                updated_at = $4
            WHERE
                id = $5
                AND status = 'pending'
            RETURNING
                id,
                staff_id,
                date,
                timeslot,
                reason,
                status,
                processed_by,
                processing_note,
                created_at,
                updated_at
            "#,
        )
        .bind(input.date)
        .bind(input.timeslot)
        .bind(input.reason)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// Cancel a withdraw request that has not been processed yet.
    pub async fn delete_withdraw_request(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM
                withdraw_requests
            WHERE
                id = $1
                AND status = 'pending'
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Approve a pending withdraw request as one atomic unit: remove
    /// the request row, drop the approved day it targets, record the
    /// withdrawn date, and append the audit entry. Returns `None` when
    /// the request was not pending anymore.
    ///
    /// An approved withdraw request is consumed, not retained, so the
    /// guard is a DELETE whose RETURNING row feeds the effects.
    pub async fn approve_withdraw_request(
        &self,
        id: i64,
        processor_id: i32,
    ) -> Result<Option<WithdrawRequest>> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let request = sqlx::query_as::<_, WithdrawRequest>(
            r#"
            DELETE FROM
                withdraw_requests
            WHERE
                id = $1
                AND status = 'pending'
            RETURNING
                id,
                staff_id,
                date,
                timeslot,
                reason,
                status,
                processed_by,
                processing_note,
                created_at,
                updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(request) = request else {
            return Ok(None);
        };

        let effects = lifecycle::withdrawal_effects(&request, processor_id);

        sqlx::query(
            r#"
            DELETE FROM
                approved_dates
            WHERE
                staff_id = $1
                AND date = $2
            "#,
        )
        .bind(effects.withdrawn_date.staff_id)
        .bind(effects.withdrawn_date.date)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO
                withdrawn_dates (staff_id, withdraw_request_id, date, created_at)
            VALUES
                ($1, $2, $3, $4)
            "#,
        )
        .bind(effects.withdrawn_date.staff_id)
        .bind(effects.withdrawn_date.withdraw_request_id)
        .bind(effects.withdrawn_date.date)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        append_in_tx(&mut tx, &effects.log).await?;

        tx.commit().await?;

        Ok(Some(request))
    }

    /// Reject a pending withdraw request; the approved day is left
    /// untouched. Returns `None` when the request was not pending.
    pub async fn reject_withdraw_request(
        &self,
        id: i64,
        processor_id: i32,
        note: Option<String>,
    ) -> Result<Option<WithdrawRequest>> {
        let mut tx = self.pool.begin().await?;

        let request = sqlx::query_as::<_, WithdrawRequest>(
            r#"
            UPDATE
                withdraw_requests
            SET
                status = $1,
                processed_by = $2,
                processing_note = $3,
                updated_at = $4
            WHERE
                id = $5
                AND status = 'pending'
            RETURNING
                id,
                staff_id,
                date,
                timeslot,
                reason,
                status,
                processed_by,
                processing_note,
                created_at,
                updated_at
            "#,
        )
        .bind(WithdrawStatus::Rejected)
        .bind(processor_id)
        .bind(note)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(request) = request else {
            return Ok(None);
        };

        append_in_tx(
            &mut tx,
            &lifecycle::withdrawal_rejection_log(&request, processor_id),
        )
        .await?;

        tx.commit().await?;

        Ok(Some(request))
    }

    pub async fn get_withdrawn_dates(&self, staff_id: Option<i32>) -> Result<Vec<WithdrawnDate>> {
        let mut query = r#"
            SELECT
                id,
                staff_id,
                withdraw_request_id,
                date,
                created_at
            FROM
                withdrawn_dates
            "#
        .to_string();

        if staff_id.is_some() {
            query.push_str(" WHERE staff_id = $1");
        }

        query.push_str(" ORDER BY date DESC, id DESC");

        let mut prepared = sqlx::query_as::<_, WithdrawnDate>(&query);
        if let Some(staff_id) = staff_id {
            prepared = prepared.bind(staff_id);
        }

        let dates = prepared.fetch_all(&self.pool).await?;

        Ok(dates)
    }
}
