// ABOUTME: SQLite storage backend for tokens, products, grants, and audits
// ABOUTME: Runtime-bound sqlx queries with schema bootstrap on connect
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use mimic_core::{ActionDefinition, AuditRecord, CapabilityToken, ProductDescriptor};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use super::StorageProvider;
use crate::errors::{AppError, AppResult};

/// `SQLite`-backed storage
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Connect to (and if necessary create) the database, then ensure the
    /// schema exists.
    ///
    /// # Errors
    /// Returns a database error when the URL is invalid or the schema
    /// bootstrap fails.
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::database(format!("Invalid database URL: {e}")))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        let storage = Self { pool };
        storage.ensure_schema().await?;
        Ok(storage)
    }

    async fn ensure_schema(&self) -> AppResult<()> {
        let statements = [
            r"
            CREATE TABLE IF NOT EXISTS tokens (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                token TEXT UNIQUE NOT NULL,
                name TEXT NOT NULL,
                user_id INTEGER NOT NULL,
                enabled INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                last_used TEXT
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                category TEXT NOT NULL,
                name TEXT NOT NULL,
                display_name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                behavior_notes TEXT,
                enabled INTEGER NOT NULL DEFAULT 1,
                actions TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE(category, name)
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS product_grants (
                token_id INTEGER NOT NULL,
                product_id INTEGER NOT NULL,
                UNIQUE(token_id, product_id)
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS audit_records (
                record_id TEXT PRIMARY KEY,
                token_id INTEGER,
                token_name TEXT,
                product_id INTEGER,
                category TEXT NOT NULL,
                product TEXT NOT NULL,
                action TEXT NOT NULL,
                parameters TEXT NOT NULL,
                response TEXT NOT NULL,
                success INTEGER NOT NULL,
                source_ip TEXT,
                timestamp TEXT NOT NULL
            )
            ",
        ];
        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Schema bootstrap failed: {e}")))?;
        }
        Ok(())
    }

    fn token_from_row(row: &SqliteRow) -> AppResult<CapabilityToken> {
        Ok(CapabilityToken {
            id: row
                .try_get("id")
                .map_err(|e| AppError::database(format!("Bad token row: {e}")))?,
            token: row
                .try_get("token")
                .map_err(|e| AppError::database(format!("Bad token row: {e}")))?,
            name: row
                .try_get("name")
                .map_err(|e| AppError::database(format!("Bad token row: {e}")))?,
            user_id: row
                .try_get("user_id")
                .map_err(|e| AppError::database(format!("Bad token row: {e}")))?,
            enabled: row
                .try_get("enabled")
                .map_err(|e| AppError::database(format!("Bad token row: {e}")))?,
            created_at: row
                .try_get("created_at")
                .map_err(|e| AppError::database(format!("Bad token row: {e}")))?,
            last_used: row
                .try_get("last_used")
                .map_err(|e| AppError::database(format!("Bad token row: {e}")))?,
        })
    }

    fn product_from_row(row: &SqliteRow) -> AppResult<ProductDescriptor> {
        let actions_json: String = row
            .try_get("actions")
            .map_err(|e| AppError::database(format!("Bad product row: {e}")))?;
        let actions: Vec<ActionDefinition> = serde_json::from_str(&actions_json)
            .map_err(|e| AppError::database(format!("Corrupt action schema: {e}")))?;
        Ok(ProductDescriptor {
            id: row
                .try_get("id")
                .map_err(|e| AppError::database(format!("Bad product row: {e}")))?,
            category: row
                .try_get("category")
                .map_err(|e| AppError::database(format!("Bad product row: {e}")))?,
            name: row
                .try_get("name")
                .map_err(|e| AppError::database(format!("Bad product row: {e}")))?,
            display_name: row
                .try_get("display_name")
                .map_err(|e| AppError::database(format!("Bad product row: {e}")))?,
            description: row
                .try_get("description")
                .map_err(|e| AppError::database(format!("Bad product row: {e}")))?,
            behavior_notes: row
                .try_get("behavior_notes")
                .map_err(|e| AppError::database(format!("Bad product row: {e}")))?,
            enabled: row
                .try_get("enabled")
                .map_err(|e| AppError::database(format!("Bad product row: {e}")))?,
            actions,
            created_at: row
                .try_get("created_at")
                .map_err(|e| AppError::database(format!("Bad product row: {e}")))?,
            updated_at: row
                .try_get("updated_at")
                .map_err(|e| AppError::database(format!("Bad product row: {e}")))?,
        })
    }
}

#[async_trait]
impl StorageProvider for SqliteStorage {
    async fn lookup_token(&self, token: &str) -> AppResult<Option<CapabilityToken>> {
        let row = sqlx::query(
            r"
            SELECT id, token, name, user_id, enabled, created_at, last_used
            FROM tokens WHERE token = $1 AND enabled = 1
            ",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Token lookup failed: {e}")))?;

        row.as_ref().map(Self::token_from_row).transpose()
    }

    async fn lookup_product(
        &self,
        category: &str,
        name: &str,
    ) -> AppResult<Option<ProductDescriptor>> {
        let row = sqlx::query(
            r"
            SELECT id, category, name, display_name, description, behavior_notes,
                   enabled, actions, created_at, updated_at
            FROM products WHERE category = $1 AND name = $2 AND enabled = 1
            ",
        )
        .bind(category)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Product lookup failed: {e}")))?;

        row.as_ref().map(Self::product_from_row).transpose()
    }

    async fn list_granted_products(&self, token: &str) -> AppResult<Vec<ProductDescriptor>> {
        let rows = sqlx::query(
            r"
            SELECT p.id, p.category, p.name, p.display_name, p.description,
                   p.behavior_notes, p.enabled, p.actions, p.created_at, p.updated_at
            FROM products p
            JOIN product_grants g ON g.product_id = p.id
            JOIN tokens t ON t.id = g.token_id
            WHERE t.token = $1 AND t.enabled = 1 AND p.enabled = 1
            ",
        )
        .bind(token)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Grant listing failed: {e}")))?;

        rows.iter().map(Self::product_from_row).collect()
    }

    async fn touch_token(&self, token_id: i64) -> AppResult<()> {
        sqlx::query("UPDATE tokens SET last_used = $2 WHERE id = $1")
            .bind(token_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Token touch failed: {e}")))?;
        Ok(())
    }

    async fn append_audit_record(&self, record: &AuditRecord) -> AppResult<()> {
        let parameters = serde_json::to_string(&record.parameters)
            .map_err(|e| AppError::database(format!("Audit parameter encoding failed: {e}")))?;
        let response = serde_json::to_string(&record.response)
            .map_err(|e| AppError::database(format!("Audit response encoding failed: {e}")))?;
        sqlx::query(
            r"
            INSERT INTO audit_records (
                record_id, token_id, token_name, product_id, category, product,
                action, parameters, response, success, source_ip, timestamp
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(record.record_id.to_string())
        .bind(record.token_id)
        .bind(&record.token_name)
        .bind(record.product_id)
        .bind(&record.category)
        .bind(&record.product)
        .bind(&record.action)
        .bind(parameters)
        .bind(response)
        .bind(record.success)
        .bind(&record.source_ip)
        .bind(record.timestamp)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Audit append failed: {e}")))?;
        Ok(())
    }

    async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Storage unreachable: {e}")))?;
        Ok(())
    }

    async fn create_product(&self, descriptor: &ProductDescriptor) -> AppResult<i64> {
        descriptor
            .validate()
            .map_err(|e| AppError::invalid_input(e.to_string()))?;
        let actions = serde_json::to_string(&descriptor.actions)
            .map_err(|e| AppError::database(format!("Action schema encoding failed: {e}")))?;
        sqlx::query(
            r"
            INSERT INTO products (
                category, name, display_name, description, behavior_notes,
                enabled, actions, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT(category, name) DO UPDATE SET
                display_name = excluded.display_name,
                description = excluded.description,
                behavior_notes = excluded.behavior_notes,
                enabled = excluded.enabled,
                actions = excluded.actions,
                updated_at = excluded.updated_at
            ",
        )
        .bind(&descriptor.category)
        .bind(&descriptor.name)
        .bind(&descriptor.display_name)
        .bind(&descriptor.description)
        .bind(&descriptor.behavior_notes)
        .bind(descriptor.enabled)
        .bind(actions)
        .bind(descriptor.created_at)
        .bind(descriptor.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Product insert failed: {e}")))?;

        // last_insert_rowid is unreliable across the pool after an upsert;
        // resolve the id by its unique key instead
        let row = sqlx::query("SELECT id FROM products WHERE category = $1 AND name = $2")
            .bind(&descriptor.category)
            .bind(&descriptor.name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Product id lookup failed: {e}")))?;
        row.try_get("id")
            .map_err(|e| AppError::database(format!("Bad product row: {e}")))
    }

    async fn create_token(
        &self,
        name: &str,
        user_id: i64,
        token: &str,
    ) -> AppResult<CapabilityToken> {
        let created_at = Utc::now();
        let result = sqlx::query(
            r"
            INSERT INTO tokens (token, name, user_id, enabled, created_at)
            VALUES ($1, $2, $3, 1, $4)
            ",
        )
        .bind(token)
        .bind(name)
        .bind(user_id)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Token insert failed: {e}")))?;

        Ok(CapabilityToken {
            id: result.last_insert_rowid(),
            token: token.to_owned(),
            name: name.to_owned(),
            user_id,
            enabled: true,
            created_at,
            last_used: None,
        })
    }

    async fn grant_product(&self, token_id: i64, product_id: i64) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO product_grants (token_id, product_id)
            VALUES ($1, $2)
            ON CONFLICT(token_id, product_id) DO NOTHING
            ",
        )
        .bind(token_id)
        .bind(product_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Grant insert failed: {e}")))?;
        Ok(())
    }
}
