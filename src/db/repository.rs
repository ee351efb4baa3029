//! Database repository for the shelter registry.
//!
//! Moderation transitions are single conditional statements, so two admins racing on the same
//! shelter cannot both succeed.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{Coordinates, ModerationStatus, Shelter, Source};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== SHELTER OPERATIONS ====================

    /// List approved shelters, oldest first.
    pub async fn list_approved(&self) -> Result<Vec<Shelter>, AppError> {
        self.list_by_status(ModerationStatus::Approved).await
    }

    /// List shelters awaiting moderation, oldest first.
    pub async fn list_pending(&self) -> Result<Vec<Shelter>, AppError> {
        self.list_by_status(ModerationStatus::Pending).await
    }

    async fn list_by_status(&self, status: ModerationStatus) -> Result<Vec<Shelter>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, latitude, longitude, description, status, created_at FROM shelters WHERE status = ? ORDER BY created_at, rowid"
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(shelter_from_row).collect())
    }

    /// Get a shelter by ID.
    pub async fn get_shelter(&self, id: &str) -> Result<Option<Shelter>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, latitude, longitude, description, status, created_at FROM shelters WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(shelter_from_row))
    }

    /// Insert a newly submitted shelter. Submissions always start out pending.
    pub async fn create_shelter(
        &self,
        name: &str,
        coordinates: Coordinates,
    ) -> Result<Shelter, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO shelters (id, name, latitude, longitude, description, status, created_at) VALUES (?, ?, ?, ?, '', ?, ?)"
        )
        .bind(&id)
        .bind(name)
        .bind(coordinates.latitude)
        .bind(coordinates.longitude)
        .bind(ModerationStatus::Pending.as_str())
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Shelter {
            id,
            name: name.to_string(),
            coordinates,
            description: String::new(),
            moderation_status: ModerationStatus::Pending,
            source: Source::Backend,
            created_at: Some(now),
        })
    }

    /// Move a pending shelter to approved.
    pub async fn approve_shelter(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE shelters SET status = ? WHERE id = ? AND status = ?")
            .bind(ModerationStatus::Approved.as_str())
            .bind(id)
            .bind(ModerationStatus::Pending.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Pending shelter {} not found",
                id
            )));
        }
        Ok(())
    }

    /// Reject a pending shelter. Rejected shelters are deleted, not retained.
    pub async fn reject_shelter(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM shelters WHERE id = ? AND status = ?")
            .bind(id)
            .bind(ModerationStatus::Pending.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Pending shelter {} not found",
                id
            )));
        }
        Ok(())
    }

    // ==================== SESSION OPERATIONS ====================

    /// Issue a new admin session token.
    pub async fn create_session(&self, username: &str) -> Result<String, AppError> {
        let token = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query("INSERT INTO admin_sessions (token, username, created_at) VALUES (?, ?, ?)")
            .bind(&token)
            .bind(username)
            .bind(&now)
            .execute(&self.pool)
            .await?;

        Ok(token)
    }

    /// Check whether a bearer token belongs to a live session.
    pub async fn session_exists(&self, token: &str) -> Result<bool, AppError> {
        let row = sqlx::query("SELECT 1 AS found FROM admin_sessions WHERE token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }
}

// ==================== HELPER FUNCTIONS ====================

fn shelter_from_row(row: &sqlx::sqlite::SqliteRow) -> Shelter {
    let status: String = row.get("status");
    Shelter {
        id: row.get("id"),
        name: row.get("name"),
        coordinates: Coordinates::new(row.get("latitude"), row.get("longitude")),
        description: row.get("description"),
        moderation_status: ModerationStatus::from_str(&status).unwrap_or_default(),
        source: Source::Backend,
        created_at: row.get("created_at"),
    }
}
