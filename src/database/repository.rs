use chrono::{SubsecRound, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::database::item::{version_histogram, Item, ItemDraft, ModelSummary};
use crate::database::manager::DatabaseError;

/// Listing options shared by /items and /model/:model
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub show_deleted: bool,
    pub model: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

/// All SQL touching the items table lives here; handlers never build queries.
pub struct ItemRepository {
    pool: PgPool,
}

impl ItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a validated draft and return the stored item
    pub async fn insert(&self, draft: ItemDraft) -> Result<Item, DatabaseError> {
        let item = Item::from_draft(draft);

        sqlx::query(
            "INSERT INTO items (id, model, version, data, created, last_updated, deleted) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(item.id)
        .bind(&item.model)
        .bind(item.version)
        .bind(&item.data)
        .bind(item.created)
        .bind(item.last_updated)
        .bind(item.deleted)
        .execute(&self.pool)
        .await?;

        Ok(item)
    }

    /// Fetch a single item by id, including soft-deleted ones
    pub async fn fetch(&self, id: Uuid) -> Result<Option<Item>, DatabaseError> {
        let item = sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    /// Fetch by id or produce the NotFound error the API maps to 404
    pub async fn fetch_404(&self, id: Uuid) -> Result<Item, DatabaseError> {
        self.fetch(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Item {} not found", id)))
    }

    /// List items, newest last, optionally scoped to one model
    pub async fn list(&self, options: ListOptions) -> Result<Vec<Item>, DatabaseError> {
        let limit = Self::effective_limit(options.limit);
        let offset = options.offset.max(0);

        let items = sqlx::query_as::<_, Item>(
            "SELECT * FROM items \
             WHERE (deleted = FALSE OR $1) AND ($2::TEXT IS NULL OR model = $2) \
             ORDER BY created, id \
             LIMIT $3 OFFSET $4",
        )
        .bind(options.show_deleted)
        .bind(options.model)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Persist every caller-editable field of an existing item and stamp
    /// last_updated. Returns the item as stored.
    pub async fn save(&self, mut item: Item) -> Result<Item, DatabaseError> {
        item.last_updated = Some(Utc::now().trunc_subsecs(6));

        let result = sqlx::query(
            "UPDATE items \
             SET model = $2, version = $3, data = $4, last_updated = $5, deleted = $6 \
             WHERE id = $1",
        )
        .bind(item.id)
        .bind(&item.model)
        .bind(item.version)
        .bind(&item.data)
        .bind(item.last_updated)
        .bind(item.deleted)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Item {} not found", item.id)));
        }
        Ok(item)
    }

    /// Remove a row entirely (the `permanent=true` path)
    pub async fn hard_delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result =
            sqlx::query("DELETE FROM items WHERE id = $1").bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Item {} not found", id)));
        }
        Ok(())
    }

    /// Per-model aggregates for GET /model/list
    pub async fn model_summaries(&self) -> Result<Vec<ModelSummary>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT model, \
                    COUNT(*) AS total_count, \
                    COUNT(*) FILTER (WHERE deleted) AS deleted_count, \
                    MIN(created) AS oldest_created, \
                    MAX(created) AS newest_created, \
                    ARRAY_AGG(version) AS versions \
             FROM items \
             GROUP BY model \
             ORDER BY model",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in rows {
            let total_count: i64 = row.try_get("total_count")?;
            let deleted_count: i64 = row.try_get("deleted_count")?;
            let versions: Vec<f64> = row.try_get("versions")?;

            summaries.push(ModelSummary {
                model: row.try_get("model")?,
                count: total_count - deleted_count,
                deleted_count,
                total_count,
                oldest_created: row.try_get("oldest_created")?,
                newest_created: row.try_get("newest_created")?,
                versions: version_histogram(&versions),
            });
        }

        Ok(summaries)
    }

    /// Apply the configured hard cap to a client-supplied limit
    fn effective_limit(requested: i64) -> i64 {
        let max_limit = crate::config::config().api.max_limit;
        if requested > max_limit {
            tracing::warn!("Limit {} exceeds max {}, capping to max", requested, max_limit);
            max_limit
        } else {
            requested.max(0)
        }
    }
}
