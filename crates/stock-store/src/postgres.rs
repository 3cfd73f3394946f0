use std::collections::HashMap;
use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    PgPool, Row,
    postgres::{PgPoolOptions, PgRow},
};

use crate::{
    DecrementLine, ItemId, Result, StockLevels, StockRecord, StockStoreError, StockUpdate,
    store::{StockStore, plan_decrement, record_decrement, validate_decrement},
};

/// PostgreSQL-backed stock store implementation.
#[derive(Clone)]
pub struct PostgresStockStore {
    pool: PgPool,
}

impl PostgresStockStore {
    /// Creates a new PostgreSQL stock store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects a pool of at most `max_connections` to `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_record(row: PgRow) -> Result<StockRecord> {
        let item_id = ItemId::new(row.try_get::<String, _>("product_id")?);
        let stock = to_stock(&item_id, row.try_get("stock")?)?;
        Ok(StockRecord {
            item_id,
            title: row.try_get("title")?,
            stock,
            last_updated: row.try_get::<DateTime<Utc>, _>("last_updated")?,
        })
    }

    async fn apply_decrement(&self, lines: &[DecrementLine]) -> Result<()> {
        validate_decrement(lines)?;
        if lines.is_empty() {
            return Ok(());
        }

        let mut ids: Vec<String> = lines.iter().map(|l| l.id.as_str().to_string()).collect();
        ids.sort();
        ids.dedup();

        let mut tx = self.pool.begin().await?;

        // Rows are locked in id order so overlapping batches queue instead of deadlocking.
        let rows = sqlx::query(
            "SELECT product_id, stock FROM products WHERE product_id = ANY($1) ORDER BY product_id FOR UPDATE",
        )
        .bind(&ids)
        .fetch_all(&mut *tx)
        .await?;

        let mut committed: HashMap<ItemId, u32> = HashMap::with_capacity(rows.len());
        for row in rows {
            let item_id = ItemId::new(row.try_get::<String, _>("product_id")?);
            let stock = to_stock(&item_id, row.try_get("stock")?)?;
            committed.insert(item_id, stock);
        }

        // Dropping `tx` on the error path rolls the transaction back.
        let plan = plan_decrement(lines, |id| committed.get(id).copied().unwrap_or(0))?;

        let now = Utc::now();
        for (item_id, stock) in plan {
            sqlx::query("UPDATE products SET stock = $2, last_updated = $3 WHERE product_id = $1")
                .bind(item_id.as_str())
                .bind(i64::from(stock))
                .bind(now)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

fn to_stock(item_id: &ItemId, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| StockStoreError::InvalidStoredStock {
        item_id: item_id.clone(),
        value,
    })
}

#[async_trait]
impl StockStore for PostgresStockStore {
    async fn stock_levels(&self) -> Result<StockLevels> {
        let rows = sqlx::query("SELECT product_id, stock FROM products")
            .fetch_all(&self.pool)
            .await?;

        let mut levels = StockLevels::new();
        for row in rows {
            let item_id = ItemId::new(row.try_get::<String, _>("product_id")?);
            let stock = to_stock(&item_id, row.try_get("stock")?)?;
            levels.insert(item_id, stock);
        }
        Ok(levels)
    }

    async fn get(&self, item_id: &ItemId) -> Result<Option<StockRecord>> {
        let row = sqlx::query(
            "SELECT product_id, title, stock, last_updated FROM products WHERE product_id = $1",
        )
        .bind(item_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_record).transpose()
    }

    #[tracing::instrument(skip(self, updates), fields(count = updates.len()))]
    async fn set_stock_batch(&self, updates: Vec<StockUpdate>) -> Result<usize> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        for update in &updates {
            sqlx::query(
                r#"
                INSERT INTO products (product_id, title, stock, last_updated)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (product_id) DO UPDATE
                SET title = COALESCE(EXCLUDED.title, products.title),
                    stock = EXCLUDED.stock,
                    last_updated = EXCLUDED.last_updated
                "#,
            )
            .bind(update.id.as_str())
            .bind(update.title.as_deref())
            .bind(i64::from(update.stock))
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(updates.len())
    }

    #[tracing::instrument(skip(self))]
    async fn set_stock(&self, item_id: &ItemId, stock: u32) -> Result<StockRecord> {
        let row = sqlx::query(
            r#"
            INSERT INTO products (product_id, stock, last_updated)
            VALUES ($1, $2, $3)
            ON CONFLICT (product_id) DO UPDATE
            SET stock = EXCLUDED.stock, last_updated = EXCLUDED.last_updated
            RETURNING product_id, title, stock, last_updated
            "#,
        )
        .bind(item_id.as_str())
        .bind(i64::from(stock))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_record(row)
    }

    #[tracing::instrument(skip(self, lines), fields(lines = lines.len()))]
    async fn decrement(&self, lines: Vec<DecrementLine>) -> Result<()> {
        let started = Instant::now();
        let outcome = self.apply_decrement(&lines).await;

        if let Err(ref err) = outcome {
            tracing::warn!(error = %err, "stock decrement rejected");
        }
        record_decrement(&outcome, started);
        outcome
    }
}
