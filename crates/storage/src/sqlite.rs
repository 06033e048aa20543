//! SQLite store.
//!
//! Uses a single SQLite database file with two tables:
//! - `users`: accounts and their cumulative energy metrics
//! - `appliances`: connected devices, owned by a user
//!
//! Both tables carry an integer rowid alias (`iid`) so listings come back in
//! insertion order.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ecowatt_core::error::StoreError;
use ecowatt_core::record::{Appliance, NewAppliance, NewUser, User};
use ecowatt_core::store::EnergyStore;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

/// A production SQLite store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new SQLite store from a URL such as `sqlite://ecowatt.db`.
    ///
    /// The database and all tables/indexes are created automatically.
    /// Pass `"sqlite::memory:"` for an in-process ephemeral database (useful for tests).
    pub async fn new(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let in_memory = url.contains(":memory:");
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| StoreError::Storage(format!("Invalid SQLite URL: {e}")))?
            .create_if_missing(true)
            .journal_mode(if in_memory {
                SqliteJournalMode::Memory
            } else {
                SqliteJournalMode::Wal
            })
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON");

        // Every connection to `:memory:` is a separate database, so keep exactly one alive.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite store initialized at {url}");
        Ok(store)
    }

    /// Create from an existing pool (useful for testing).
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Set the cumulative energy metrics of a user.
    ///
    /// Metrics are computed outside the public API; this is the hook for that
    /// process and for seeding tests.
    pub async fn set_energy_metrics(
        &self,
        user_id: &str,
        energy_points: f64,
        energy_saved: f64,
        coal_saved: f64,
        co2_reduced: f64,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET energy_points = ?2, energy_saved = ?3, coal_saved = ?4, co2_reduced = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(user_id)
        .bind(energy_points)
        .bind(energy_saved)
        .bind(coal_saved)
        .bind(co2_reduced)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("UPDATE users failed: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Run schema migrations; creates tables and indexes.
    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                iid               INTEGER PRIMARY KEY AUTOINCREMENT,
                id                TEXT UNIQUE NOT NULL,
                name              TEXT NOT NULL,
                age               INTEGER,
                email             TEXT UNIQUE NOT NULL,
                phone             TEXT,
                tn_electricity_id TEXT,
                password_hash     TEXT NOT NULL,
                energy_points     REAL NOT NULL DEFAULT 0,
                energy_saved      REAL NOT NULL DEFAULT 0,
                coal_saved        REAL NOT NULL DEFAULT 0,
                co2_reduced       REAL NOT NULL DEFAULT 0,
                created_at        TEXT NOT NULL,
                updated_at        TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("users table: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS appliances (
                iid               INTEGER PRIMARY KEY AUTOINCREMENT,
                id                TEXT UNIQUE NOT NULL,
                user_id           TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name              TEXT NOT NULL,
                brand             TEXT NOT NULL,
                device_id         TEXT NOT NULL,
                power_consumption REAL NOT NULL DEFAULT 0,
                usage_hours       REAL NOT NULL DEFAULT 0,
                status            TEXT,
                is_active         INTEGER NOT NULL DEFAULT 1,
                created_at        TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("appliances table: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_appliances_user ON appliances(user_id, iid)")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::MigrationFailed(format!("user_id index: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }

    fn parse_timestamp(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now())
    }

    /// Parse a `User` from a SQLite row.
    fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User, StoreError> {
        let column = |name: &str, e: sqlx::Error| StoreError::QueryFailed(format!("{name} column: {e}"));

        let age: Option<i64> = row.try_get("age").map_err(|e| column("age", e))?;
        let created_at: String = row.try_get("created_at").map_err(|e| column("created_at", e))?;
        let updated_at: String = row.try_get("updated_at").map_err(|e| column("updated_at", e))?;

        Ok(User {
            id: row.try_get("id").map_err(|e| column("id", e))?,
            name: row.try_get("name").map_err(|e| column("name", e))?,
            age: age.and_then(|a| u32::try_from(a).ok()),
            email: row.try_get("email").map_err(|e| column("email", e))?,
            phone: row.try_get("phone").map_err(|e| column("phone", e))?,
            tn_electricity_id: row
                .try_get("tn_electricity_id")
                .map_err(|e| column("tn_electricity_id", e))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| column("password_hash", e))?,
            energy_points: row.try_get("energy_points").unwrap_or(0.0),
            energy_saved: row.try_get("energy_saved").unwrap_or(0.0),
            coal_saved: row.try_get("coal_saved").unwrap_or(0.0),
            co2_reduced: row.try_get("co2_reduced").unwrap_or(0.0),
            created_at: Self::parse_timestamp(&created_at),
            updated_at: Self::parse_timestamp(&updated_at),
        })
    }

    /// Parse an `Appliance` from a SQLite row.
    fn row_to_appliance(row: &sqlx::sqlite::SqliteRow) -> Result<Appliance, StoreError> {
        let column = |name: &str, e: sqlx::Error| StoreError::QueryFailed(format!("{name} column: {e}"));

        let created_at: String = row.try_get("created_at").map_err(|e| column("created_at", e))?;

        Ok(Appliance {
            id: row.try_get("id").map_err(|e| column("id", e))?,
            user_id: row.try_get("user_id").map_err(|e| column("user_id", e))?,
            name: row.try_get("name").map_err(|e| column("name", e))?,
            brand: row.try_get("brand").map_err(|e| column("brand", e))?,
            device_id: row.try_get("device_id").map_err(|e| column("device_id", e))?,
            power_consumption: row.try_get("power_consumption").unwrap_or(0.0),
            usage_hours: row.try_get("usage_hours").unwrap_or(0.0),
            status: row.try_get("status").map_err(|e| column("status", e))?,
            is_active: row.try_get("is_active").unwrap_or(true),
            created_at: Self::parse_timestamp(&created_at),
        })
    }

    /// Map an INSERT failure onto the store taxonomy.
    fn insert_error(table: &str, e: sqlx::Error) -> StoreError {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                return StoreError::Conflict(format!("{table}: {db_err}"));
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::MissingReference(format!("{table}: {db_err}"));
            }
        }
        StoreError::Storage(format!("INSERT INTO {table} failed: {e}"))
    }
}

#[async_trait]
impl EnergyStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO users (id, name, age, email, phone, tn_electricity_id, password_hash,
                               created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            "#,
        )
        .bind(&id)
        .bind(&new.name)
        .bind(new.age.map(i64::from))
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.tn_electricity_id)
        .bind(&new.password_hash)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::insert_error("users", e))?;

        debug!(user_id = %id, "Created user");
        self.get_user(&id)
            .await?
            .ok_or_else(|| StoreError::QueryFailed(format!("user {id} vanished after insert")))
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("Get user: {e}")))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("Find user by email: {e}")))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn list_appliances(&self, user_id: &str) -> Result<Vec<Appliance>, StoreError> {
        let rows = sqlx::query("SELECT * FROM appliances WHERE user_id = ?1 ORDER BY iid")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("List appliances: {e}")))?;

        rows.iter().map(Self::row_to_appliance).collect()
    }

    async fn add_appliance(&self, new: NewAppliance) -> Result<Appliance, StoreError> {
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO appliances (id, user_id, name, brand, device_id, power_consumption,
                                    usage_hours, status, is_active, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, ?9)
            "#,
        )
        .bind(&id)
        .bind(&new.user_id)
        .bind(&new.name)
        .bind(&new.brand)
        .bind(&new.device_id)
        .bind(new.power_consumption)
        .bind(new.usage_hours)
        .bind(&new.status)
        .bind(created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| Self::insert_error("appliances", e))?;

        debug!(appliance_id = %id, user_id = %new.user_id, "Connected appliance");
        Ok(Appliance {
            id,
            user_id: new.user_id,
            name: new.name,
            brand: new.brand,
            device_id: new.device_id,
            power_consumption: new.power_consumption,
            usage_hours: new.usage_hours,
            status: new.status,
            is_active: true,
            created_at,
        })
    }

    async fn delete_appliance(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM appliances WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(format!("DELETE failed: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> SqliteStore {
        SqliteStore::new("sqlite::memory:", 1).await.unwrap()
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Arun".into(),
            age: Some(40),
            email: email.into(),
            phone: Some("+91-9000000000".into()),
            tn_electricity_id: Some("TN-77".into()),
            password_hash: "$argon2id$test".into(),
        }
    }

    fn new_appliance(user_id: &str, name: &str) -> NewAppliance {
        NewAppliance {
            user_id: user_id.into(),
            name: name.into(),
            brand: "Havells".into(),
            device_id: format!("{name}-42"),
            power_consumption: 0.0,
            usage_hours: 0.0,
            status: None,
        }
    }

    #[tokio::test]
    async fn create_and_get_user() {
        let store = test_store().await;
        let user = store.create_user(new_user("arun@example.com")).await.unwrap();
        assert_eq!(user.age, Some(40));
        assert_eq!(user.tn_electricity_id.as_deref(), Some("TN-77"));
        assert_eq!(user.energy_points, 0.0);

        let loaded = store.get_user(&user.id).await.unwrap().unwrap();
        assert_eq!(loaded.email, "arun@example.com");
        assert_eq!(loaded.password_hash, "$argon2id$test");
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let store = test_store().await;
        store.create_user(new_user("twice@example.com")).await.unwrap();
        let err = store
            .create_user(new_user("twice@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn find_by_email() {
        let store = test_store().await;
        let user = store.create_user(new_user("find@example.com")).await.unwrap();
        let found = store.find_user_by_email("find@example.com").await.unwrap();
        assert_eq!(found.unwrap().id, user.id);
        assert!(store.find_user_by_email("none@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn appliances_listed_in_insertion_order() {
        let store = test_store().await;
        let user = store.create_user(new_user("list@example.com")).await.unwrap();
        for name in ["Washer", "AC", "Bulb"] {
            store.add_appliance(new_appliance(&user.id, name)).await.unwrap();
        }

        let listed = store.list_appliances(&user.id).await.unwrap();
        let names: Vec<&str> = listed.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Washer", "AC", "Bulb"]);
        assert!(listed.iter().all(|a| a.is_active));
    }

    #[tokio::test]
    async fn appliance_for_unknown_user_is_missing_reference() {
        let store = test_store().await;
        let err = store
            .add_appliance(new_appliance("no-such-user", "Fan"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingReference(_)));
    }

    #[tokio::test]
    async fn delete_appliance_reports_existence() {
        let store = test_store().await;
        let user = store.create_user(new_user("delete@example.com")).await.unwrap();
        let appliance = store.add_appliance(new_appliance(&user.id, "TV")).await.unwrap();

        assert!(store.delete_appliance(&appliance.id).await.unwrap());
        assert!(!store.delete_appliance(&appliance.id).await.unwrap());
    }

    #[tokio::test]
    async fn profile_reflects_metrics() {
        let store = test_store().await;
        let user = store.create_user(new_user("metrics@example.com")).await.unwrap();
        assert!(
            store
                .set_energy_metrics(&user.id, 250.0, 31.5, 12.0, 25.8)
                .await
                .unwrap()
        );

        let profile = store.load_user_profile(&user.id).await.unwrap().unwrap();
        assert_eq!(profile.energy_points, 250.0);
        assert_eq!(profile.energy_saved, 31.5);
        assert_eq!(profile.coal_saved, 12.0);
        assert_eq!(profile.co2_reduced, 25.8);
    }

    #[tokio::test]
    async fn file_database_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("ecowatt.db").display());

        let user_id = {
            let store = SqliteStore::new(&url, 2).await.unwrap();
            let user = store.create_user(new_user("persist@example.com")).await.unwrap();
            store.add_appliance(new_appliance(&user.id, "Pump")).await.unwrap();
            user.id
        };

        let reopened = SqliteStore::new(&url, 2).await.unwrap();
        let summaries = reopened.load_appliance_summaries(&user_id).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].name, "Pump");
    }
}
