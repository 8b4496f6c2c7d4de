use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub target: f64,
    pub unit: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Goal {
    pub async fn list_by_user(
        db: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Goal>, sqlx::Error> {
        sqlx::query_as::<_, Goal>(
            r#"
            SELECT id, user_id, name, target, unit, created_at, updated_at
            FROM goals
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        name: &str,
        target: f64,
        unit: &str,
    ) -> Result<Goal, sqlx::Error> {
        sqlx::query_as::<_, Goal>(
            r#"
            INSERT INTO goals (user_id, name, target, unit)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, name, target, unit, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(target)
        .bind(unit)
        .fetch_one(db)
        .await
    }

    /// Update a goal owned by `user_id`. Returns `None` when the goal does
    /// not exist or belongs to someone else.
    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        goal_id: Uuid,
        name: &str,
        target: f64,
        unit: &str,
    ) -> Result<Option<Goal>, sqlx::Error> {
        sqlx::query_as::<_, Goal>(
            r#"
            UPDATE goals
            SET name = $3, target = $4, unit = $5, updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, target, unit, created_at, updated_at
            "#,
        )
        .bind(goal_id)
        .bind(user_id)
        .bind(name)
        .bind(target)
        .bind(unit)
        .fetch_optional(db)
        .await
    }

    /// Delete a goal owned by `user_id`. Returns whether a row went away.
    pub async fn delete(db: &PgPool, user_id: Uuid, goal_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM goals
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(goal_id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
