use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::forms::repository::RepositoryError;
use crate::plans::{Plan, PlanRepository};

#[derive(Debug, Clone)]
pub struct SqlitePlanRepository {
    pool: SqlitePool,
}

impl SqlitePlanRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlanRepository for SqlitePlanRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Plan>, RepositoryError> {
        let row = sqlx::query("SELECT id, name, description, price_cents FROM plans WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Plan {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                description: row.try_get("description")?,
                price_cents: row.try_get("price_cents")?,
            })),
            None => Ok(None),
        }
    }
}
