use async_trait::async_trait;
use sqlx::PgPool;

use crate::cart::repo_types::{CartItem, NewCartItem};
use crate::store::StoreResult;

#[async_trait]
pub trait CartStore: Send + Sync {
    async fn list(&self, user_id: i64) -> StoreResult<Vec<CartItem>>;

    /// Inserts the line, or overwrites quantity and price of the existing one.
    async fn upsert(&self, user_id: i64, item: &NewCartItem) -> StoreResult<()>;

    /// Returns the number of rows deleted.
    async fn remove(&self, user_id: i64, product_id: &str) -> StoreResult<u64>;

    async fn clear(&self, user_id: i64) -> StoreResult<u64>;
}

#[derive(Clone)]
pub struct PgCartStore {
    db: PgPool,
}

impl PgCartStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartStore for PgCartStore {
    async fn list(&self, user_id: i64) -> StoreResult<Vec<CartItem>> {
        let rows = sqlx::query_as::<_, CartItem>(
            r#"
            SELECT id, user_id, product_id, name, price, quantity
            FROM cart_items
            WHERE user_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn upsert(&self, user_id: i64, item: &NewCartItem) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO cart_items (user_id, product_id, name, price, quantity)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, product_id) DO UPDATE
               SET quantity = EXCLUDED.quantity,
                   price = EXCLUDED.price
            "#,
        )
        .bind(user_id)
        .bind(&item.product_id)
        .bind(&item.name)
        .bind(item.price)
        .bind(item.quantity)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn remove(&self, user_id: i64, product_id: &str) -> StoreResult<u64> {
        let res = sqlx::query(
            r#"
            DELETE FROM cart_items
            WHERE user_id = $1 AND product_id = $2
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected())
    }

    async fn clear(&self, user_id: i64) -> StoreResult<u64> {
        let res = sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected())
    }
}
