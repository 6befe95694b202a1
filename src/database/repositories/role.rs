use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use moka::future::Cache;
use sqlx::PgPool;

use crate::database::models::{Role, RoleInput};

/// Roles are a small, rarely-changing lookup table, so reads go through
/// an in-process cache. Writes invalidate the touched entry.
#[derive(Clone)]
pub struct RoleRepository {
    pool: PgPool,
    by_id: Cache<i32, Role>,
}

impl RoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            by_id: Cache::builder()
                .max_capacity(256)
                .time_to_live(Duration::from_secs(300))
                .build(),
        }
    }

    pub async fn create_role(&self, input: RoleInput) -> Result<Role> {
        let now = Utc::now();

        let role = sqlx::query_as::<_, Role>(
            r#"
            INSERT INTO
                roles (title, created_at, updated_at)
            VALUES
                ($1, $2, $3)
            RETURNING
                id,
                title,
                created_at,
                updated_at
            "#,
        )
        .bind(input.title)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(role)
    }

    pub async fn get_roles(&self) -> Result<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>(
            r#"
            SELECT
                id,
                title,
                created_at,
                updated_at
            FROM
                roles
            ORDER BY
                id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(roles)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Role>> {
        if let Some(role) = self.by_id.get(&id).await {
            return Ok(Some(role));
        }

        let role = sqlx::query_as::<_, Role>(
            r#"
            SELECT
                id,
                title,
                created_at,
                updated_at
            FROM
                roles
            WHERE
                id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(role) = &role {
            self.by_id.insert(id, role.clone()).await;
        }

        Ok(role)
    }

    pub async fn update_role(&self, id: i32, input: RoleInput) -> Result<Option<Role>> {
        let role = sqlx::query_as::<_, Role>(
            r#"
            UPDATE
                roles
            SET
                title = $1,
                updated_at = $2
            WHERE
                id = $3
            RETURNING
                id,
                title,
                created_at,
                updated_at
            "#,
        )
        .bind(input.title)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        self.by_id.invalidate(&id).await;

        Ok(role)
    }

    pub async fn delete_role(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.by_id.invalidate(&id).await;

        Ok(result.rows_affected() > 0)
    }
}
