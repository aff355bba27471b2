//! Repository for the inventory store.

use sqlx::PgConnection;
use tracing::instrument;

use crate::db::errors::Result;
use crate::db::models::stocks::{ProductStock, StockUpsertDBRequest};
use crate::types::StockId;

pub struct Stocks<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Stocks<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Create or update a stock entry, keyed on `product_id`. Stock entries
    /// are never implicitly deleted.
    #[instrument(skip(self, request), fields(product_id = %request.product_id), err)]
    pub async fn upsert(&mut self, request: &StockUpsertDBRequest) -> Result<ProductStock> {
        let stock = sqlx::query_as::<_, ProductStock>(
            r#"
            INSERT INTO product_stocks (product_id, product_name, total_stock)
            VALUES ($1, $2, $3)
            ON CONFLICT (product_id) DO UPDATE
                SET product_name = EXCLUDED.product_name,
                    total_stock = EXCLUDED.total_stock,
                    updated_at = now()
            RETURNING id, product_id, product_name, total_stock, created_at, updated_at
            "#,
        )
        .bind(&request.product_id)
        .bind(&request.product_name)
        .bind(request.total_stock)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(stock)
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_id(&mut self, id: StockId) -> Result<Option<ProductStock>> {
        let stock = sqlx::query_as::<_, ProductStock>(
            "SELECT id, product_id, product_name, total_stock, created_at, updated_at
             FROM product_stocks WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(stock)
    }

    #[instrument(skip(self), err)]
    pub async fn list(&mut self) -> Result<Vec<ProductStock>> {
        let stocks = sqlx::query_as::<_, ProductStock>(
            "SELECT id, product_id, product_name, total_stock, created_at, updated_at
             FROM product_stocks ORDER BY product_name ASC",
        )
        .fetch_all(&mut *self.db)
        .await?;

        Ok(stocks)
    }

    /// Total owned quantity summed across every product; denominator of the
    /// calendar utilization rate.
    #[instrument(skip(self), err)]
    pub async fn total_stock_all(&mut self) -> Result<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COALESCE(SUM(total_stock), 0)::BIGINT FROM product_stocks")
            .fetch_one(&mut *self.db)
            .await?;

        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_upsert_creates_then_updates_in_place(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Stocks::new(&mut conn);

        let created = repo
            .upsert(&StockUpsertDBRequest {
                product_id: "round-table-150".to_string(),
                product_name: "Round table 150cm".to_string(),
                total_stock: 12,
            })
            .await
            .unwrap();
        assert_eq!(created.total_stock, 12);

        let updated = repo
            .upsert(&StockUpsertDBRequest {
                product_id: "round-table-150".to_string(),
                product_name: "Round table 150 cm".to_string(),
                total_stock: 20,
            })
            .await
            .unwrap();

        assert_eq!(updated.id, created.id, "upsert must not mint a new row");
        assert_eq!(updated.total_stock, 20);
        assert_eq!(updated.product_name, "Round table 150 cm");

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_orders_by_product_name(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Stocks::new(&mut conn);

        for (pid, name, qty) in [("c", "Chiavari chair", 40), ("a", "Arch backdrop", 2), ("b", "Bar table", 8)] {
            repo.upsert(&StockUpsertDBRequest {
                product_id: pid.to_string(),
                product_name: name.to_string(),
                total_stock: qty,
            })
            .await
            .unwrap();
        }

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|s| s.product_name).collect();
        assert_eq!(names, vec!["Arch backdrop", "Bar table", "Chiavari chair"]);

        assert_eq!(repo.total_stock_all().await.unwrap(), 50);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_total_stock_all_empty_table(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Stocks::new(&mut conn);
        assert_eq!(repo.total_stock_all().await.unwrap(), 0);
    }
}
