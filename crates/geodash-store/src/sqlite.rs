//! SQLite storage backend via sqlx.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use geodash_core::error::{DashError, Result};
use geodash_core::models::{Facility, FacilityId, NewFacility, NewUser, Role, UserAccount};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;

use crate::auth::hash_password;
use crate::ports::{FacilityStore, UserStore};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    username   TEXT PRIMARY KEY,
    email      TEXT NOT NULL,
    password   TEXT NOT NULL,
    role       TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS facilities (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    province   TEXT NOT NULL,
    commune    TEXT NOT NULL,
    type       TEXT NOT NULL,
    name       TEXT NOT NULL,
    latitude   REAL NOT NULL,
    longitude  REAL NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE (commune, name)
);
";

/// SQLite-backed implementation of both storage ports.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database file and ensure the schema.
    pub async fn connect(path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new().filename(path).create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(storage_err)?;

        let store = Self { pool };
        store.migrate().await?;
        tracing::debug!(path = %path.display(), "SQLite store ready");
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        for statement in SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            sqlx::query(statement).execute(&self.pool).await.map_err(storage_err)?;
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn create_user(&self, user: &NewUser) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (username, email, password, role, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(hash_password(&user.password))
        .bind(user.role.as_str())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, DashError::DuplicateUser { username: user.username.clone() })
        })?;
        Ok(())
    }

    async fn get_user(&self, username: &str) -> Result<Option<UserAccount>> {
        let row = sqlx::query(
            "SELECT username, email, password, role, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        row.map(user_from_row).transpose()
    }

    async fn list_users(&self) -> Result<Vec<UserAccount>> {
        let rows = sqlx::query(
            "SELECT username, email, password, role, created_at FROM users ORDER BY username",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        rows.into_iter().map(user_from_row).collect()
    }
}

#[async_trait]
impl FacilityStore for SqliteStore {
    async fn create_facility(&self, facility: &NewFacility) -> Result<FacilityId> {
        let result = sqlx::query(
            "INSERT INTO facilities (province, commune, type, name, latitude, longitude, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&facility.province)
        .bind(&facility.commune)
        .bind(&facility.kind)
        .bind(&facility.name)
        .bind(facility.latitude)
        .bind(facility.longitude)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(
                e,
                DashError::DuplicateFacility {
                    name: facility.name.clone(),
                    commune: facility.commune.clone(),
                },
            )
        })?;

        Ok(FacilityId(result.last_insert_rowid()))
    }

    async fn list_facilities(&self) -> Result<Vec<Facility>> {
        let rows = sqlx::query(
            "SELECT id, province, commune, type, name, latitude, longitude, created_at \
             FROM facilities ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        rows.into_iter().map(facility_from_row).collect()
    }
}

fn user_from_row(row: SqliteRow) -> Result<UserAccount> {
    let role_str: String = row.try_get("role").map_err(storage_err)?;
    let role = Role::parse(&role_str)
        .ok_or_else(|| DashError::Storage(format!("unknown role '{}' in users table", role_str)))?;

    Ok(UserAccount {
        username: row.try_get("username").map_err(storage_err)?,
        email: row.try_get("email").map_err(storage_err)?,
        password_digest: row.try_get("password").map_err(storage_err)?,
        role,
        created_at: parse_timestamp(row.try_get::<String, _>("created_at").map_err(storage_err)?)?,
    })
}

fn facility_from_row(row: SqliteRow) -> Result<Facility> {
    Ok(Facility {
        id: FacilityId(row.try_get("id").map_err(storage_err)?),
        province: row.try_get("province").map_err(storage_err)?,
        commune: row.try_get("commune").map_err(storage_err)?,
        kind: row.try_get("type").map_err(storage_err)?,
        name: row.try_get("name").map_err(storage_err)?,
        latitude: row.try_get("latitude").map_err(storage_err)?,
        longitude: row.try_get("longitude").map_err(storage_err)?,
        created_at: parse_timestamp(row.try_get::<String, _>("created_at").map_err(storage_err)?)?,
    })
}

fn parse_timestamp(raw: String) -> Result<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .map_err(|e| DashError::Storage(format!("bad timestamp '{}': {}", raw, e)))
}

fn storage_err(e: sqlx::Error) -> DashError {
    DashError::Storage(e.to_string())
}

fn map_unique_violation(e: sqlx::Error, duplicate: DashError) -> DashError {
    match &e {
        sqlx::Error::Database(db)
            if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
        {
            duplicate
        }
        _ => storage_err(e),
    }
}
