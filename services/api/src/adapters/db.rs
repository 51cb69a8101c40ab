//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.
//!
//! Every record query filters on the owning account, so rows are only ever
//! visible to and deletable by the account that created them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reskick_core::domain::{
    Account, AccountCredentials, AccountStats, InputMode, NewNote, NewSummary, Note, Summary,
    SummaryInput, SummaryStyle,
};
use reskick_core::ports::{DatabaseService, PortError, PortResult};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn summary_not_found(summary_id: Option<Uuid>) -> PortError {
    let id = summary_id.map(|id| id.to_string()).unwrap_or_default();
    PortError::NotFound(format!("Summary {} not found", id))
}

/// A note may only reference a summary owned by the same account. The check
/// runs inside the INSERT, so no row comes back when it fails.
fn insert_note_sql() -> String {
    format!(
        "INSERT INTO notes (id, user_id, summary_id, content) \
         SELECT $1::uuid, $2::uuid, $3::uuid, $4::text \
         WHERE $3::uuid IS NULL \
            OR EXISTS (SELECT 1 FROM summaries WHERE id = $3::uuid AND user_id = $2::uuid) \
         RETURNING {}",
        NOTE_COLUMNS
    )
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct AccountRecord {
    user_id: Uuid,
    email: String,
}
impl AccountRecord {
    fn to_domain(self) -> Account {
        Account {
            id: self.user_id,
            email: self.email,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    user_id: Uuid,
    email: String,
    hashed_password: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> AccountCredentials {
        AccountCredentials {
            account_id: self.user_id,
            email: self.email,
            hashed_password: self.hashed_password,
        }
    }
}

#[derive(FromRow)]
struct SummaryRecord {
    id: Uuid,
    user_id: Uuid,
    input_text: Option<String>,
    input_url: Option<String>,
    input_mode: String,
    style: String,
    summary: String,
    created_at: DateTime<Utc>,
}
impl SummaryRecord {
    fn to_domain(self) -> PortResult<Summary> {
        let input = InputMode::from_key(&self.input_mode)
            .and_then(|mode| SummaryInput::from_columns(mode, self.input_text, self.input_url))
            .ok_or_else(|| {
                PortError::Unexpected(format!("Summary {} has inconsistent input columns", self.id))
            })?;
        Ok(Summary {
            id: self.id,
            account_id: self.user_id,
            input,
            style: SummaryStyle::from_key(&self.style),
            summary: self.summary,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct NoteRecord {
    id: Uuid,
    user_id: Uuid,
    summary_id: Option<Uuid>,
    content: String,
    created_at: DateTime<Utc>,
}
impl NoteRecord {
    fn to_domain(self) -> Note {
        Note {
            id: self.id,
            account_id: self.user_id,
            summary_id: self.summary_id,
            content: self.content,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct StatsRecord {
    summaries: i64,
    notes: i64,
}

const SUMMARY_COLUMNS: &str =
    "id, user_id, input_text, input_url, input_mode, style, summary, created_at";
const NOTE_COLUMNS: &str = "id, user_id, summary_id, content, created_at";

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_account_with_email(
        &self,
        email: &str,
        hashed_password: &str,
        email_redirect_to: Option<&str>,
    ) -> PortResult<Account> {
        let record = sqlx::query_as::<_, AccountRecord>(
            "INSERT INTO users (user_id, email, hashed_password, email_redirect_to) \
             VALUES ($1, $2, $3, $4) RETURNING user_id, email",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(hashed_password)
        .bind(email_redirect_to)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                PortError::Conflict(format!("Email {} is already registered", email))
            }
            other => unexpected(other),
        })?;
        Ok(record.to_domain())
    }

    async fn get_credentials_by_email(&self, email: &str) -> PortResult<AccountCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT user_id, email, hashed_password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("User {} not found", email)),
            other => unexpected(other),
        })?;
        Ok(record.to_domain())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        account_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(account_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let user_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > NOW()",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        user_id.ok_or(PortError::Unauthorized)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn insert_summary(&self, account_id: Uuid, summary: NewSummary) -> PortResult<Summary> {
        let record = sqlx::query_as::<_, SummaryRecord>(&format!(
            "INSERT INTO summaries (id, user_id, input_text, input_url, input_mode, style, summary) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            SUMMARY_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(account_id)
        .bind(summary.input.text())
        .bind(summary.input.url())
        .bind(summary.input.mode().key())
        .bind(summary.style.key())
        .bind(&summary.summary)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        record.to_domain()
    }

    async fn list_summaries(&self, account_id: Uuid, limit: usize) -> PortResult<Vec<Summary>> {
        let records = sqlx::query_as::<_, SummaryRecord>(&format!(
            "SELECT {} FROM summaries WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
            SUMMARY_COLUMNS
        ))
        .bind(account_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn delete_summary(&self, account_id: Uuid, summary_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM summaries WHERE id = $1 AND user_id = $2")
            .bind(summary_id)
            .bind(account_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Summary {} not found", summary_id)));
        }
        Ok(())
    }

    async fn insert_note(&self, account_id: Uuid, note: NewNote) -> PortResult<Note> {
        let record = sqlx::query_as::<_, NoteRecord>(&insert_note_sql())
            .bind(Uuid::new_v4())
            .bind(account_id)
            .bind(note.summary_id)
            .bind(&note.content)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| match e {
                // The summary was deleted after the ownership guard passed.
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    summary_not_found(note.summary_id)
                }
                e => unexpected(e),
            })?;
        record
            .map(|r| r.to_domain())
            .ok_or_else(|| summary_not_found(note.summary_id))
    }

    async fn list_notes(&self, account_id: Uuid, limit: usize) -> PortResult<Vec<Note>> {
        let records = sqlx::query_as::<_, NoteRecord>(&format!(
            "SELECT {} FROM notes WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
            NOTE_COLUMNS
        ))
        .bind(account_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn delete_note(&self, account_id: Uuid, note_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND user_id = $2")
            .bind(note_id)
            .bind(account_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Note {} not found", note_id)));
        }
        Ok(())
    }

    async fn count_records(&self, account_id: Uuid) -> PortResult<AccountStats> {
        let record = sqlx::query_as::<_, StatsRecord>(
            "SELECT \
               (SELECT COUNT(*) FROM summaries WHERE user_id = $1) AS summaries, \
               (SELECT COUNT(*) FROM notes WHERE user_id = $1) AS notes",
        )
        .bind(account_id)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(AccountStats {
            summaries: record.summaries.max(0) as u64,
            notes: record.notes.max(0) as u64,
        })
    }
}
