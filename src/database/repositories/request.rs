use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;

use crate::database::models::{
    ApprovalStatus, NewLog, RequestFilter, UpdateWfhRequestInput, WfhRequest, WfhRequestInput,
};
use crate::database::repositories::log::append_in_tx;
use crate::services::lifecycle;

#[derive(Clone)]
pub struct RequestRepository {
    pool: PgPool,
}

impl RequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a request in the pending state. The submission audit
    /// entry commits in the same transaction as the row.
    pub async fn create_request(&self, input: WfhRequestInput) -> Result<WfhRequest> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let request = sqlx::query_as::<_, WfhRequest>(
            r#"
            INSERT INTO
                requests (
                    staff_id,
                    daterange,
                    timeslot,
                    reason,
                    status,
                    document_url,
                    created_at,
                    updated_at
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING
                id,
                staff_id,
                daterange,
                timeslot,
                reason,
                status,
                document_url,
                processed_by,
                processing_note,
                created_at,
                updated_at
            "#,
        )
        .bind(input.staff_id)
        .bind(input.daterange)
        .bind(input.timeslot)
        .bind(input.reason)
        .bind(ApprovalStatus::Pending)
        .bind(input.document_url)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        append_in_tx(&mut tx, &NewLog::for_request(&request, None)).await?;

        tx.commit().await?;

        Ok(request)
    }

    /// Get all requests with optional filtering.
    pub async fn get_requests(&self, filter: &RequestFilter) -> Result<Vec<WfhRequest>> {
        let mut query = r#"
            SELECT
                id,
                staff_id,
                daterange,
                timeslot,
                reason,
                status,
                document_url,
                processed_by,
                processing_note,
                created_at,
                updated_at
            FROM
                requests
            "#
        .to_string();

        let mut conditions = vec![];
        let mut n = 0;

        if filter.staff_id.is_some() {
            n += 1;
            conditions.push(format!("staff_id = ${n}"));
        }

        if filter.status.is_some() {
            n += 1;
            conditions.push(format!("status = ${n}"));
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        query.push_str(" ORDER BY created_at DESC");

        let mut prepared = sqlx::query_as::<_, WfhRequest>(&query);
        if let Some(staff_id) = filter.staff_id {
            prepared = prepared.bind(staff_id);
        }
        if let Some(status) = filter.status {
            prepared = prepared.bind(status);
        }

        let requests = prepared.fetch_all(&self.pool).await?;

        Ok(requests)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<WfhRequest>> {
        let request = sqlx::query_as::<_, WfhRequest>(
            r#"
            SELECT
                id,
                staff_id,
                daterange,
                timeslot,
                reason,
                status,
                document_url,
                processed_by,
                processing_note,
                created_at,
                updated_at
            FROM
                requests
            WHERE
                id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    pub async fn get_requests_by_staff(&self, staff_id: i32) -> Result<Vec<WfhRequest>> {
        let requests = sqlx::query_as::<_, WfhRequest>(
            r#"
            SELECT
                id,
                staff_id,
                daterange,
                timeslot,
                reason,
                status,
                document_url,
                processed_by,
                processing_note,
                created_at,
                updated_at
            FROM
                requests
            WHERE
                staff_id = $1
            ORDER BY
                created_at DESC
            "#,
        )
        .bind(staff_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Requests owned by users who report directly to the given manager.
    pub async fn get_requests_for_manager(&self, manager_staff_id: i32) -> Result<Vec<WfhRequest>> {
        let requests = sqlx::query_as::<_, WfhRequest>(
            r#"
            SELECT
                r.id,
                r.staff_id,
                r.daterange,
                r.timeslot,
                r.reason,
                r.status,
                r.document_url,
                r.processed_by,
                r.processing_note,
                r.created_at,
                r.updated_at
            FROM
                requests r
                INNER JOIN users u ON u.staff_id = r.staff_id
            WHERE
                u.reporting_manager = $1
            ORDER BY
                r.created_at DESC
            "#,
        )
        .bind(manager_staff_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Edit a request that is still pending. The status guard keeps a
    /// concurrent approval from being overwritten; a raced transition
    /// surfaces as `None`.
    pub async fn update_request(
        &self,
        id: i64,
        input: UpdateWfhRequestInput,
    ) -> Result<Option<WfhRequest>> {
        let request = sqlx::query_as::<_, WfhRequest>(
            r#"
            UPDATE
                requests
            SET
                daterange = COALESCE($1, daterange),
                timeslot = COALESCE($2, timeslot),
                reason = COALESCE($3, reason),
                document_url = COALESCE($4, document_url),
                updated_at = $5
            WHERE
                id = $6
                AND status = 'pending'
            RETURNING
                id,
                staff_id,
                daterange,
                timeslot,
                reason,
                status,
                document_url,
                processed_by,
                processing_note,
                created_at,
                updated_at
            "#,
        )
        .bind(input.daterange)
        .bind(input.timeslot)
        .bind(input.reason)
        .bind(input.document_url)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// Remove a request that never took effect. Approved and withdrawn
    /// requests are retained, so the guard only matches pending and
    /// rejected rows.
    pub async fn delete_request(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM
                requests
            WHERE
                id = $1
                AND status IN ('pending', 'rejected')
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Approve a pending request: flip the status, materialize one
    /// approved day per requested date, and append the audit entry, all
    /// in one transaction. Returns `None` when the request was not
    /// pending anymore by the time the update ran.
    pub async fn approve_request(
        &self,
        id: i64,
        processor_id: i32,
        note: Option<String>,
    ) -> Result<Option<WfhRequest>> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let request = sqlx::query_as::<_, WfhRequest>(
            r#"
            UPDATE
                requests
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
                daterange,
                timeslot,
                reason,
                status,
                document_url,
                processed_by,
                processing_note,
                created_at,
                updated_at
            "#,
        )
        .bind(ApprovalStatus::Approved)
        .bind(processor_id)
        .bind(note)
        .bind(now)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(request) = request else {
            return Ok(None);
        };

        let effects = lifecycle::approval_effects(&request, processor_id);

        for key in &effects.approved_dates {
            sqlx::query(
                r#"
                INSERT INTO
                    approved_dates (staff_id, request_id, date, created_at)
                VALUES
                    ($1, $2, $3, $4)
                ON CONFLICT (staff_id, request_id, date) DO NOTHING
                "#,
            )
            .bind(key.staff_id)
            .bind(key.request_id)
            .bind(key.date)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        append_in_tx(&mut tx, &effects.log).await?;

        tx.commit().await?;

        Ok(Some(request))
    }

    /// Reject a pending request and append the audit entry in the same
    /// transaction. Returns `None` when the request was not pending.
    pub async fn reject_request(
        &self,
        id: i64,
        processor_id: i32,
        note: Option<String>,
    ) -> Result<Option<WfhRequest>> {
        let mut tx = self.pool.begin().await?;

        let request = sqlx::query_as::<_, WfhRequest>(
            r#"
            UPDATE
                requests
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
                daterange,
                timeslot,
                reason,
                status,
                document_url,
                processed_by,
                processing_note,
                created_at,
                updated_at
            "#,
        )
        .bind(ApprovalStatus::Rejected)
        .bind(processor_id)
        .bind(note)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(request) = request else {
            return Ok(None);
        };

        append_in_tx(&mut tx, &lifecycle::rejection_log(&request, processor_id)).await?;

        tx.commit().await?;

        Ok(Some(request))
    }
}
