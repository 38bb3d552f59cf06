//! # Sweet Repository
//!
//! Database operations for the sweet catalog.
//!
//! ## Key Operations
//! - CRUD and name-ordered listing
//! - Filtered search (same predicate as `SweetFilter::matches`)
//! - Atomic purchase / restock
//!
//! ## Stock Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                                │
//! │                                                                         │
//! │  ❌ WRONG: read, check in Rust, write back                             │
//! │     SELECT quantity ...;  -- 10                                        │
//! │     UPDATE sweets SET quantity = 8 ...                                 │
//! │     Two buyers both read 10, both write 8. One sale vanishes.          │
//! │                                                                         │
//! │  ✅ CORRECT: one conditional delta update                              │
//! │     UPDATE sweets SET quantity = quantity - 2                          │
//! │     WHERE id = ? AND quantity >= 2 AND quantity <= ceiling             │
//! │     RETURNING ...                                                      │
//! │                                                                         │
//! │  No row back?  SELECT quantity (read-only) to explain why:             │
//! │     no row       → NotFound                                            │
//! │     row present  → StockOperation::apply → InsufficientStock           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use sweetshop_core::{NewSweet, StockChange, StockOperation, Sweet, SweetChanges, SweetFilter};

const SWEET_COLUMNS: &str =
    "id, name, category, price_cents, quantity, description, created_at, updated_at";

/// How often a conditional update is retried when the re-read shows the row
/// changed in between and would now accept the operation.
const MAX_STOCK_ATTEMPTS: usize = 3;

/// Repository for sweet database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.sweets();
///
/// let all = repo.list().await?;
/// let (sweet, change) = repo.purchase(&id, 2).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SweetRepository {
    pool: SqlitePool,
}

impl SweetRepository {
    /// Creates a new SweetRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SweetRepository { pool }
    }

    /// Lists every sweet, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Sweet>> {
        let sql = format!("SELECT {SWEET_COLUMNS} FROM sweets ORDER BY name, id");

        let sweets = sqlx::query_as::<_, Sweet>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = sweets.len(), "Listed sweets");
        Ok(sweets)
    }

    /// Returns the sweets matching every supplied predicate, ordered by name.
    ///
    /// ## Predicates
    /// - `name`: substring, case-insensitive (`instr`, so `%` and `_` are literal)
    /// - `category`: exact, case-insensitive
    /// - `min_price` / `max_price`: inclusive bounds in cents
    pub async fn search(&self, filter: &SweetFilter) -> DbResult<Vec<Sweet>> {
        debug!(?filter, "Searching sweets");

        if filter.is_unsatisfiable() {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {SWEET_COLUMNS} FROM sweets WHERE 1 = 1"));

        if let Some(name) = &filter.name {
            query
                .push(" AND instr(LOWER(name), LOWER(")
                .push_bind(name.clone())
                .push(")) > 0");
        }
        if let Some(category) = &filter.category {
            query
                .push(" AND LOWER(category) = LOWER(")
                .push_bind(category.clone())
                .push(")");
        }
        if let Some(min) = filter.min_price {
            query.push(" AND price_cents >= ").push_bind(min.cents());
        }
        if let Some(max) = filter.max_price {
            query.push(" AND price_cents <= ").push_bind(max.cents());
        }
        query.push(" ORDER BY name, id");

        let sweets = query
            .build_query_as::<Sweet>()
            .fetch_all(&self.pool)
            .await?;

        debug!(count = sweets.len(), "Search returned sweets");
        Ok(sweets)
    }

    /// Gets a sweet by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Sweet))` - Sweet found
    /// * `Ok(None)` - No such id (malformed ids included)
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sweet>> {
        let sql = format!("SELECT {SWEET_COLUMNS} FROM sweets WHERE id = ?1");

        let sweet = sqlx::query_as::<_, Sweet>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sweet)
    }

    /// Inserts a new sweet with a fresh UUID and timestamps.
    ///
    /// The input is expected to have passed `NewSweet::validated`.
    pub async fn insert(&self, new: &NewSweet) -> DbResult<Sweet> {
        let now = Utc::now();
        let sweet = Sweet {
            id: Uuid::new_v4().to_string(),
            name: new.name.clone(),
            category: new.category.clone(),
            price_cents: new.price.cents(),
            quantity: new.quantity,
            description: new.description.clone(),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %sweet.id, name = %sweet.name, "Inserting sweet");

        sqlx::query(
            r#"
            INSERT INTO sweets (
                id, name, category, price_cents, quantity, description,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&sweet.id)
        .bind(&sweet.name)
        .bind(&sweet.category)
        .bind(sweet.price_cents)
        .bind(sweet.quantity)
        .bind(&sweet.description)
        .bind(sweet.created_at)
        .bind(sweet.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(sweet)
    }

    /// Applies a partial update in one statement and returns the new row.
    ///
    /// Untouched columns keep their stored value (`COALESCE`), so a
    /// concurrent purchase is never overwritten by a stale read.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No such sweet
    pub async fn update(&self, id: &str, changes: &SweetChanges) -> DbResult<Sweet> {
        debug!(id = %id, "Updating sweet");

        let description = changes
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        let sql = format!(
            r#"
            UPDATE sweets SET
                name = COALESCE(?2, name),
                category = COALESCE(?3, category),
                price_cents = COALESCE(?4, price_cents),
                quantity = COALESCE(?5, quantity),
                description = CASE WHEN ?6 THEN ?7 ELSE description END,
                updated_at = ?8
            WHERE id = ?1
            RETURNING {SWEET_COLUMNS}
            "#
        );

        let sweet = sqlx::query_as::<_, Sweet>(&sql)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.category)
            .bind(changes.price.map(|p| p.cents()))
            .bind(changes.quantity)
            .bind(changes.description.is_some())
            .bind(description)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;

        sweet.ok_or_else(|| DbError::not_found("Sweet", id))
    }

    /// Hard-deletes a sweet.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No such sweet
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting sweet");

        let result = sqlx::query("DELETE FROM sweets WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sweet", id));
        }

        Ok(())
    }

    /// Decrements stock by `quantity`. See [`Self::apply_stock`].
    pub async fn purchase(&self, id: &str, quantity: i64) -> DbResult<(Sweet, StockChange)> {
        self.apply_stock(id, StockOperation::Purchase(quantity)).await
    }

    /// Increments stock by `quantity`. See [`Self::apply_stock`].
    pub async fn restock(&self, id: &str, quantity: i64) -> DbResult<(Sweet, StockChange)> {
        self.apply_stock(id, StockOperation::Restock(quantity)).await
    }

    /// Runs a stock operation as a single conditional UPDATE.
    ///
    /// ## Errors
    /// * `DbError::Rejected(Validation)` - non-positive amount, or restock overflow
    /// * `DbError::Rejected(InsufficientStock)` - purchase exceeds stock
    /// * `DbError::NotFound` - no such sweet
    ///
    /// On every error path the stored quantity is unchanged.
    pub async fn apply_stock(&self, id: &str, op: StockOperation) -> DbResult<(Sweet, StockChange)> {
        op.validate()?;

        debug!(id = %id, delta = op.delta(), "Applying stock operation");

        let sql = format!(
            r#"
            UPDATE sweets
            SET quantity = quantity + ?2, updated_at = ?3
            WHERE id = ?1 AND quantity >= ?4 AND quantity <= ?5
            RETURNING {SWEET_COLUMNS}
            "#
        );

        for _ in 0..MAX_STOCK_ATTEMPTS {
            let updated = sqlx::query_as::<_, Sweet>(&sql)
                .bind(id)
                .bind(op.delta())
                .bind(Utc::now())
                .bind(op.required_stock())
                .bind(op.ceiling())
                .fetch_optional(&self.pool)
                .await?;

            if let Some(sweet) = updated {
                let change = StockChange {
                    previous_quantity: sweet.quantity - op.delta(),
                    new_quantity: sweet.quantity,
                    amount: op.amount(),
                };
                debug!(
                    id = %id,
                    previous = change.previous_quantity,
                    new = change.new_quantity,
                    "Stock updated"
                );
                return Ok((sweet, change));
            }

            // No row matched: explain why from a fresh read.
            let current: Option<i64> =
                sqlx::query_scalar("SELECT quantity FROM sweets WHERE id = ?1")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?;

            let Some(current) = current else {
                return Err(DbError::not_found("Sweet", id));
            };

            // Err here is the answer. Ok means the row moved between the two
            // statements and the operation would now succeed; try again.
            op.apply(current)?;
        }

        warn!(id = %id, "Stock kept changing under a conditional update");
        Err(DbError::QueryFailed(format!(
            "stock for sweet {id} changed concurrently"
        )))
    }

    /// Counts all sweets.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sweets")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Deletes every sweet. Used by the seed tool.
    pub async fn delete_all(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM sweets")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use std::sync::Arc;
    use sweetshop_core::{CoreError, Money, ValidationError};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn new_sweet(name: &str, category: &str, cents: i64, quantity: i64) -> NewSweet {
        NewSweet {
            name: name.into(),
            category: category.into(),
            price: Money::from_cents(cents),
            quantity,
            description: None,
        }
    }

    async fn seeded(db: &Database) -> Vec<Sweet> {
        let repo = db.sweets();
        let mut out = Vec::new();
        for new in [
            new_sweet("Chocolate Truffle", "Chocolate", 299, 50),
            new_sweet("Gummy Bears", "Gummies", 199, 100),
            new_sweet("Chocolate Bar", "Chocolate", 349, 30),
            new_sweet("Lollipop", "Lollipops", 99, 200),
        ] {
            out.push(repo.insert(&new).await.unwrap());
        }
        out
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.sweets();

        let created = repo
            .insert(&new_sweet("Toffee Candy", "Caramels", 299, 40))
            .await
            .unwrap();
        assert!(Uuid::parse_str(&created.id).is_ok());

        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Toffee Candy");
        assert_eq!(fetched.price(), Money::from_cents(299));
        assert_eq!(fetched.quantity, 40);
    }

    #[tokio::test]
    async fn test_get_unknown_and_malformed_ids() {
        let db = test_db().await;
        let repo = db.sweets();

        assert!(repo
            .get_by_id(&Uuid::new_v4().to_string())
            .await
            .unwrap()
            .is_none());
        assert!(repo.get_by_id("not-a-uuid").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_ordered_by_name() {
        let db = test_db().await;
        seeded(&db).await;

        let names: Vec<String> = db
            .sweets()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();

        assert_eq!(
            names,
            vec!["Chocolate Bar", "Chocolate Truffle", "Gummy Bears", "Lollipop"]
        );
    }

    #[tokio::test]
    async fn test_search_matches_core_predicate() {
        let db = test_db().await;
        let all = seeded(&db).await;
        let repo = db.sweets();

        let filters = [
            SweetFilter::default(),
            SweetFilter {
                name: Some("CHOC".into()),
                ..Default::default()
            },
            SweetFilter {
                category: Some("gummies".into()),
                ..Default::default()
            },
            SweetFilter {
                min_price: Some(Money::from_cents(199)),
                max_price: Some(Money::from_cents(299)),
                ..Default::default()
            },
            SweetFilter {
                name: Some("o".into()),
                category: Some("Chocolate".into()),
                max_price: Some(Money::from_cents(300)),
                ..Default::default()
            },
            SweetFilter {
                name: Some("%".into()),
                ..Default::default()
            },
        ];

        for filter in filters {
            let mut from_db: Vec<String> = repo
                .search(&filter)
                .await
                .unwrap()
                .into_iter()
                .map(|s| s.id)
                .collect();
            let mut expected: Vec<String> = all
                .iter()
                .filter(|s| filter.matches(s))
                .map(|s| s.id.clone())
                .collect();
            from_db.sort();
            expected.sort();
            assert_eq!(from_db, expected, "filter {filter:?}");
        }
    }

    #[tokio::test]
    async fn test_search_min_above_max_is_empty() {
        let db = test_db().await;
        seeded(&db).await;

        let filter = SweetFilter {
            min_price: Some(Money::from_cents(1000)),
            max_price: Some(Money::from_cents(1)),
            ..Default::default()
        };
        assert!(db.sweets().search(&filter).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_partial_update() {
        let db = test_db().await;
        let repo = db.sweets();
        let created = repo
            .insert(&NewSweet {
                description: Some("Chewy".into()),
                ..new_sweet("Gummy Bears", "Gummies", 199, 100)
            })
            .await
            .unwrap();

        let updated = repo
            .update(
                &created.id,
                &SweetChanges {
                    price: Some(Money::from_cents(249)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.price_cents, 249);
        assert_eq!(updated.name, "Gummy Bears");
        assert_eq!(updated.quantity, 100);
        assert_eq!(updated.description.as_deref(), Some("Chewy"));

        let cleared = repo
            .update(
                &created.id,
                &SweetChanges {
                    description: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.description, None);
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown() {
        let db = test_db().await;
        let repo = db.sweets();

        let err = repo
            .update("missing", &SweetChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let err = repo.delete("missing").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let repo = db.sweets();
        let created = repo
            .insert(&new_sweet("Hard Candy", "Hard Candy", 79, 150))
            .await
            .unwrap();

        repo.delete(&created.id).await.unwrap();
        assert!(repo.get_by_id(&created.id).await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_purchase_decrements() {
        let db = test_db().await;
        let repo = db.sweets();
        let created = repo
            .insert(&new_sweet("Caramel Candy", "Caramels", 149, 10))
            .await
            .unwrap();

        let (sweet, change) = repo.purchase(&created.id, 2).await.unwrap();
        assert_eq!(sweet.quantity, 8);
        assert_eq!(change.previous_quantity, 10);
        assert_eq!(change.new_quantity, 8);
        assert_eq!(change.amount, 2);
    }

    #[tokio::test]
    async fn test_purchase_insufficient_leaves_stock() {
        let db = test_db().await;
        let repo = db.sweets();
        let created = repo
            .insert(&new_sweet("Caramel Candy", "Caramels", 149, 10))
            .await
            .unwrap();

        let err = repo.purchase(&created.id, 20).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Rejected(CoreError::InsufficientStock {
                available: 10,
                requested: 20
            })
        ));

        let after = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(after.quantity, 10);
    }

    #[tokio::test]
    async fn test_stock_on_unknown_sweet() {
        let db = test_db().await;
        let err = db.sweets().purchase("missing", 1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let err = db.sweets().restock("missing", 1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_non_positive_amount_rejected() {
        let db = test_db().await;
        let repo = db.sweets();
        let created = repo
            .insert(&new_sweet("Lollipop", "Lollipops", 99, 5))
            .await
            .unwrap();

        let err = repo.purchase(&created.id, 0).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Rejected(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
        let err = repo.restock(&created.id, -3).await.unwrap_err();
        assert!(matches!(err, DbError::Rejected(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_restock_increments() {
        let db = test_db().await;
        let repo = db.sweets();
        let created = repo
            .insert(&new_sweet("Sour Gummy Worms", "Gummies", 249, 5))
            .await
            .unwrap();

        let (sweet, change) = repo.restock(&created.id, 10).await.unwrap();
        assert_eq!(sweet.quantity, 15);
        assert_eq!(change.amount, 10);
    }

    #[tokio::test]
    async fn test_restock_overflow_rejected() {
        let db = test_db().await;
        let repo = db.sweets();
        let created = repo
            .insert(&new_sweet("Bottomless Jar", "Novelty", 100, i64::MAX - 5))
            .await
            .unwrap();

        let err = repo.restock(&created.id, 10).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Rejected(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));

        let after = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(after.quantity, i64::MAX - 5);
    }

    /// Many buyers racing for the last units over a real file-backed pool.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_purchases_never_oversell() {
        let path = std::env::temp_dir().join(format!("sweetshop-race-{}.db", Uuid::new_v4()));
        let db = Database::new(DbConfig::new(&path).max_connections(4))
            .await
            .unwrap();

        let created = db
            .sweets()
            .insert(&new_sweet("Chocolate Truffle", "Chocolate", 299, 10))
            .await
            .unwrap();
        let id = Arc::new(created.id);

        let mut handles = Vec::new();
        for _ in 0..25 {
            let repo = db.sweets();
            let id = Arc::clone(&id);
            handles.push(tokio::spawn(async move { repo.purchase(&id, 1).await }));
        }

        let mut sold = 0;
        let mut refused = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok((sweet, _)) => {
                    assert!(sweet.quantity >= 0);
                    sold += 1;
                }
                Err(DbError::Rejected(CoreError::InsufficientStock { .. })) => refused += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(sold, 10);
        assert_eq!(refused, 15);
        let after = db.sweets().get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(after.quantity, 0);

        db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
        }
    }
}
