use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;

use crate::database::models::{CreateUserInput, UpdateUserInput, User};

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_user(&self, input: CreateUserInput) -> Result<User> {
        let now = Utc::now();

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO
                users (
                    staff_id,
                    first_name,
                    last_name,
                    department,
                    position,
                    country,
                    email,
                    reporting_manager,
                    role_id,
                    created_at,
                    updated_at
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING
                staff_id,
                first_name,
                last_name,
                department,
                position,
                country,
                email,
                reporting_manager,
                role_id,
                created_at,
                updated_at
            "#,
        )
        .bind(input.staff_id)
        .bind(input.first_name)
        .bind(input.last_name)
        .bind(input.department)
        .bind(input.position)
        .bind(input.country)
        .bind(input.email)
        .bind(input.reporting_manager)
        .bind(input.role_id)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_staff_id(&self, staff_id: i32) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT
                staff_id,
                first_name,
                last_name,
                department,
                position,
                country,
                email,
                reporting_manager,
                role_id,
                created_at,
                updated_at
            FROM
                users
            WHERE
                staff_id = $1
            "#,
        )
        .bind(staff_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get_users(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT
                staff_id,
                first_name,
                last_name,
                department,
                position,
                country,
                email,
                reporting_manager,
                role_id,
                created_at,
                updated_at
            FROM
                users
            ORDER BY
                staff_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn update_user(&self, staff_id: i32, input: UpdateUserInput) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE
                users
            SET
                first_name = COALESCE($1, first_name),
                last_name = COALESCE($2, last_name),
                department = COALESCE($3, department),
                position = COALESCE($4, position),
                country = COALESCE($5, country),
                email = COALESCE($6, email),
                reporting_manager = COALESCE($7, reporting_manager),
                role_id = COALESCE($8, role_id),
                updated_at = $9
            WHERE
                staff_id = $10
            RETURNING
                staff_id,
                first_name,
                last_name,
                department,
                position,
                country,
                email,
                reporting_manager,
                role_id,
                created_at,
                updated_at
            "#,
        )
        .bind(input.first_name)
        .bind(input.last_name)
        .bind(input.department)
        .bind(input.position)
        .bind(input.country)
        .bind(input.email)
        .bind(input.reporting_manager)
        .bind(input.role_id)
        .bind(Utc::now())
        .bind(staff_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn delete_user(&self, staff_id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE staff_id = $1")
            .bind(staff_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
