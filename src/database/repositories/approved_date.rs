use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

use crate::database::models::{ApprovedDate, ApprovedDateKey, MoveApprovedDateInput};

#[derive(Clone)]
pub struct ApprovedDateRepository {
    pool: PgPool,
}

impl ApprovedDateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Manually record an approved day. Duplicate keys surface as a
    /// constraint violation rather than being silently ignored.
    pub async fn create(&self, key: ApprovedDateKey) -> Result<ApprovedDate> {
        let approved_date = sqlx::query_as::<_, ApprovedDate>(
            r#"
            INSERT INTO
                approved_dates (staff_id, request_id, date, created_at)
            VALUES
                ($1, $2, $3, $4)
            RETURNING
                staff_id,
                request_id,
                date,
                created_at
            "#,
        )
        .bind(key.staff_id)
        .bind(key.request_id)
        .bind(key.date)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(approved_date)
    }

    pub async fn get_all(&self, staff_id: Option<i32>) -> Result<Vec<ApprovedDate>> {
        let mut query = r#"
            SELECT
                staff_id,
                request_id,
                date,
                created_at
            FROM
                approved_dates
            "#
        .to_string();

        if staff_id.is_some() {
            query.push_str(" WHERE staff_id = $1");
        }

        query.push_str(" ORDER BY date, staff_id");

        let mut prepared = sqlx::query_as::<_, ApprovedDate>(&query);
        if let Some(staff_id) = staff_id {
            prepared = prepared.bind(staff_id);
        }

        let dates = prepared.fetch_all(&self.pool).await?;

        Ok(dates)
    }

    pub async fn get_by_staff(&self, staff_id: i32) -> Result<Vec<ApprovedDate>> {
        let dates = sqlx::query_as::<_, ApprovedDate>(
            r#"
            SELECT
                staff_id,
                request_id,
                date,
                created_at
            FROM
                approved_dates
            WHERE
                staff_id = $1
            ORDER BY
                date
            "#,
        )
        .bind(staff_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(dates)
    }

    /// Approved days of everyone reporting directly to the given lead.
    pub async fn get_for_team(&self, teamlead_staff_id: i32) -> Result<Vec<ApprovedDate>> {
        let dates = sqlx::query_as::<_, ApprovedDate>(
            r#"
            SELECT
                a.staff_id,
                a.request_id,
                a.date,
                a.created_at
            FROM
                approved_dates a
                INNER JOIN users u ON u.staff_id = a.staff_id
            WHERE
                u.reporting_manager = $1
            ORDER BY
                a.date,
                a.staff_id
            "#,
        )
        .bind(teamlead_staff_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(dates)
    }

    pub async fn get_for_department(&self, department: &str) -> Result<Vec<ApprovedDate>> {
        let dates = sqlx::query_as::<_, ApprovedDate>(
            r#"
            SELECT
                a.staff_id,
                a.request_id,
                a.date,
                a.created_at
            FROM
                approved_dates a
                INNER JOIN users u ON u.staff_id = a.staff_id
            WHERE
                u.department = $1
            ORDER BY
                a.date,
                a.staff_id
            "#,
        )
        .bind(department)
        .fetch_all(&self.pool)
        .await?;

        Ok(dates)
    }

    /// Move an approved day to a new date, keyed by the full composite
    /// key so only the intended row can match.
    pub async fn move_date(&self, input: MoveApprovedDateInput) -> Result<Option<ApprovedDate>> {
        let approved_date = sqlx::query_as::<_, ApprovedDate>(
            r#"
            UPDATE
                approved_dates
            SET
                date = $1
            WHERE
                staff_id = $2
                AND request_id = $3
                AND date = $4
            RETURNING
                staff_id,
                request_id,
                date,
                created_at
            "#,
        )
        .bind(input.new_date)
        .bind(input.staff_id)
        .bind(input.request_id)
        .bind(input.date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(approved_date)
    }

    pub async fn delete(&self, key: ApprovedDateKey) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM
                approved_dates
            WHERE
                staff_id = $1
                AND request_id = $2
                AND date = $3
            "#,
        )
        .bind(key.staff_id)
        .bind(key.request_id)
        .bind(key.date)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Whether the staff member has an approved day on the given date,
    /// regardless of which request produced it.
    pub async fn exists_for_staff_date(&self, staff_id: i32, date: NaiveDate) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT
                EXISTS (
                    SELECT
                        1
                    FROM
                        approved_dates
                    WHERE
                        staff_id = $1
                        AND date = $2
                )
            "#,
        )
        .bind(staff_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
