use crate::domain::{models::subscription::Subscription, ports::SubscriptionRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

pub struct PostgresSubscriptionRepo {
    pool: PgPool,
}

impl PostgresSubscriptionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepo {
    async fn create(&self, subscription: &Subscription) -> Result<Subscription, AppError> {
        sqlx::query_as::<_, Subscription>(
            "INSERT INTO subscriptions (id, student_id, plan_id, start_date, end_date, weekly_frequency, amount, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *"
        )
            .bind(&subscription.id).bind(&subscription.student_id).bind(&subscription.plan_id)
            .bind(subscription.start_date).bind(subscription.end_date).bind(subscription.weekly_frequency)
            .bind(subscription.amount).bind(subscription.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Subscription>, AppError> {
        sqlx::query_as::<_, Subscription>("SELECT * FROM subscriptions WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_student(&self, student_id: &str) -> Result<Vec<Subscription>, AppError> {
        sqlx::query_as::<_, Subscription>("SELECT * FROM subscriptions WHERE student_id = $1 ORDER BY start_date DESC").bind(student_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, subscription: &Subscription) -> Result<Subscription, AppError> {
        sqlx::query_as::<_, Subscription>(
            "UPDATE subscriptions SET plan_id=$1, start_date=$2, end_date=$3, weekly_frequency=$4, amount=$5
             WHERE id=$6
             RETURNING *"
        )
            .bind(&subscription.plan_id).bind(subscription.start_date).bind(subscription.end_date)
            .bind(subscription.weekly_frequency).bind(subscription.amount).bind(&subscription.id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Subscription not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE id = $1").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Subscription not found".into())); }
        Ok(())
    }

    async fn find_overlapping(&self, student_id: &str, as_of: NaiveDate, exclude_id: Option<&str>) -> Result<Option<Subscription>, AppError> {
        sqlx::query_as::<_, Subscription>(
            "SELECT * FROM subscriptions
             WHERE student_id = $1 AND start_date <= $2 AND end_date >= $2 AND ($3::text IS NULL OR id <> $3)
             ORDER BY end_date DESC LIMIT 1"
        )
            .bind(student_id).bind(as_of).bind(exclude_id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
}
