use crate::domain::{models::plan::Plan, ports::PlanRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqlitePlanRepo {
    pool: SqlitePool,
}

impl SqlitePlanRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl PlanRepository for SqlitePlanRepo {
    async fn create(&self, plan: &Plan) -> Result<Plan, AppError> {
        sqlx::query_as::<_, Plan>(
            "INSERT INTO plans (id, name, description, price, weekly_frequency, duration_days, active, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&plan.id)
            .bind(&plan.name)
            .bind(&plan.description)
            .bind(plan.price)
            .bind(plan.weekly_frequency)
            .bind(plan.duration_days)
            .bind(plan.active)
            .bind(plan.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Plan>, AppError> {
        sqlx::query_as::<_, Plan>("SELECT * FROM plans WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Plan>, AppError> {
        sqlx::query_as::<_, Plan>("SELECT * FROM plans ORDER BY name ASC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
