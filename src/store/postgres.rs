//! PostgreSQL storage engine (sqlx).

use crate::entity::{Account, AccountChanges, AccountField, CatalogItem, ItemField, ItemPatch};
use crate::error::AppError;
use crate::store::Store;
use async_trait::async_trait;
use sqlx::PgPool;

const ACCOUNT_COLUMNS: &str = "id, handle, password_hash, display_name, email";
const ITEM_COLUMNS: &str = "id, name, price";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }
}

/// Create both tables if missing. Handle uniqueness lives here, on the table,
/// so concurrent creates serialize at the database.
pub async fn ensure_tables(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS accounts (
            id BIGSERIAL PRIMARY KEY,
            handle TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            display_name TEXT NOT NULL DEFAULT '',
            email TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS catalog_items (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            price DOUBLE PRECISION NOT NULL CHECK (price >= 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

fn unique_conflict(e: sqlx::Error, field: &str) -> AppError {
    let is_unique = e
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());
    if is_unique {
        AppError::Conflict(format!("duplicate {}", field))
    } else {
        AppError::Db(e)
    }
}

#[async_trait]
impl Store<Account> for PgStore {
    async fn create(&self, record: Account) -> Result<Account, AppError> {
        let sql = format!(
            "INSERT INTO accounts (handle, password_hash, display_name, email) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            ACCOUNT_COLUMNS
        );
        sqlx::query_as::<_, Account>(&sql)
            .bind(&record.handle)
            .bind(&record.password_hash)
            .bind(&record.display_name)
            .bind(&record.email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| unique_conflict(e, "handle"))
    }

    async fn find_by_id(&self, id: i64) -> Result<Account, AppError> {
        let sql = format!("SELECT {} FROM accounts WHERE id = $1", ACCOUNT_COLUMNS);
        sqlx::query_as::<_, Account>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("account {}", id)))
    }

    async fn find_all(&self) -> Result<Vec<Account>, AppError> {
        let sql = format!("SELECT {} FROM accounts ORDER BY id", ACCOUNT_COLUMNS);
        Ok(sqlx::query_as::<_, Account>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_by_field(&self, field: AccountField, value: &str) -> Result<Account, AppError> {
        let column = match field {
            AccountField::Handle => "handle",
            AccountField::Email => "email",
        };
        let sql = format!("SELECT {} FROM accounts WHERE {} = $1", ACCOUNT_COLUMNS, column);
        sqlx::query_as::<_, Account>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("account with {} '{}'", column, value)))
    }

    // One statement: merge and write atomically, no read-then-write window.
    async fn update(&self, id: i64, changes: AccountChanges) -> Result<Account, AppError> {
        let sql = format!(
            "UPDATE accounts SET \
                 handle = COALESCE($2, handle), \
                 password_hash = COALESCE($3, password_hash), \
                 display_name = COALESCE($4, display_name), \
                 email = COALESCE($5, email) \
             WHERE id = $1 RETURNING {}",
            ACCOUNT_COLUMNS
        );
        sqlx::query_as::<_, Account>(&sql)
            .bind(id)
            .bind(&changes.handle)
            .bind(&changes.password_hash)
            .bind(&changes.display_name)
            .bind(&changes.email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| unique_conflict(e, "handle"))?
            .ok_or_else(|| AppError::NotFound(format!("account {}", id)))
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("account {}", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl Store<CatalogItem> for PgStore {
    async fn create(&self, record: CatalogItem) -> Result<CatalogItem, AppError> {
        let sql = format!(
            "INSERT INTO catalog_items (name, price) VALUES ($1, $2) RETURNING {}",
            ITEM_COLUMNS
        );
        Ok(sqlx::query_as::<_, CatalogItem>(&sql)
            .bind(&record.name)
            .bind(record.price)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<CatalogItem, AppError> {
        let sql = format!("SELECT {} FROM catalog_items WHERE id = $1", ITEM_COLUMNS);
        sqlx::query_as::<_, CatalogItem>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("catalog item {}", id)))
    }

    async fn find_all(&self) -> Result<Vec<CatalogItem>, AppError> {
        let sql = format!("SELECT {} FROM catalog_items ORDER BY id", ITEM_COLUMNS);
        Ok(sqlx::query_as::<_, CatalogItem>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_by_field(&self, field: ItemField, value: &str) -> Result<CatalogItem, AppError> {
        let column = match field {
            ItemField::Name => "name",
        };
        let sql = format!("SELECT {} FROM catalog_items WHERE {} = $1", ITEM_COLUMNS, column);
        sqlx::query_as::<_, CatalogItem>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("catalog item with {} '{}'", column, value)))
    }

    async fn update(&self, id: i64, changes: ItemPatch) -> Result<CatalogItem, AppError> {
        let sql = format!(
            "UPDATE catalog_items SET \
                 name = COALESCE($2, name), \
                 price = COALESCE($3, price) \
             WHERE id = $1 RETURNING {}",
            ITEM_COLUMNS
        );
        sqlx::query_as::<_, CatalogItem>(&sql)
            .bind(id)
            .bind(&changes.name)
            .bind(changes.price)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("catalog item {}", id)))
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM catalog_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("catalog item {}", id)));
        }
        Ok(())
    }
}
