use crate::domain::{models::plan::Plan, ports::PlanRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresPlanRepo {
    pool: PgPool,
}

impl PostgresPlanRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl PlanRepository for PostgresPlanRepo {
    async fn create(&self, plan: &Plan) -> Result<Plan, AppError> {
        sqlx::query_as::<_, Plan>(
            "INSERT INTO plans (id, name, description, price, weekly_frequency, duration_days, active, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *"
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
        sqlx::query_as::<_, Plan>("SELECT * FROM plans WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Plan>, AppError> {
        sqlx::query_as::<_, Plan>("SELECT * FROM plans ORDER BY name ASC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
