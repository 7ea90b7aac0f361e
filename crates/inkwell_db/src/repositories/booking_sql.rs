//! SQL implementation of the booking repository
//!
//! Works against any SQLx `Any` backend. Timestamps travel as RFC 3339 UTC
//! text (the `Any` driver cannot decode `DateTime<Utc>` directly), attached
//! file refs as a JSON array in one TEXT column.

use crate::error::DbError;
use crate::repositories::booking::{
    fmt_utc, parse_utc, Booking, BookingRepository, BookingStatus, ClientInfo, ConfirmUpdate,
    TentativeInsert,
};
use crate::DbClient;
use chrono::{DateTime, Utc};
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::{debug, error, info};

/// SQL implementation of the booking repository
#[derive(Debug, Clone)]
pub struct SqlBookingRepository {
    /// The database client
    db_client: DbClient,
}

impl SqlBookingRepository {
    /// Create a new SQL booking repository
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

const SELECT_COLUMNS: &str = "id, name, age, phone, email, description, attached_files, \
     start_utc, end_utc, status, payment_session_ref, created_at";

fn booking_from_row(row: &AnyRow) -> Result<Booking, DbError> {
    let status_text: String = row
        .try_get("status")
        .map_err(|e| DbError::CorruptRow(e.to_string()))?;
    let status = BookingStatus::parse(&status_text)
        .ok_or_else(|| DbError::CorruptRow(format!("unknown status '{}'", status_text)))?;

    let files_json: String = row
        .try_get("attached_files")
        .map_err(|e| DbError::CorruptRow(e.to_string()))?;
    let attached_files: Vec<String> = serde_json::from_str(&files_json)
        .map_err(|e| DbError::CorruptRow(format!("bad attached_files: {}", e)))?;

    let start_text: String = row
        .try_get("start_utc")
        .map_err(|e| DbError::CorruptRow(e.to_string()))?;
    let end_text: String = row
        .try_get("end_utc")
        .map_err(|e| DbError::CorruptRow(e.to_string()))?;
    let created_text: String = row
        .try_get("created_at")
        .map_err(|e| DbError::CorruptRow(e.to_string()))?;

    Ok(Booking {
        id: row
            .try_get("id")
            .map_err(|e| DbError::CorruptRow(e.to_string()))?,
        client: ClientInfo {
            name: row
                .try_get("name")
                .map_err(|e| DbError::CorruptRow(e.to_string()))?,
            age: row
                .try_get("age")
                .map_err(|e| DbError::CorruptRow(e.to_string()))?,
            phone: row
                .try_get("phone")
                .map_err(|e| DbError::CorruptRow(e.to_string()))?,
            email: row
                .try_get("email")
                .map_err(|e| DbError::CorruptRow(e.to_string()))?,
        },
        description: row
            .try_get("description")
            .map_err(|e| DbError::CorruptRow(e.to_string()))?,
        attached_files,
        start: parse_utc(&start_text)?,
        end: parse_utc(&end_text)?,
        status,
        payment_session_ref: row
            .try_get("payment_session_ref")
            .map_err(|e| DbError::CorruptRow(e.to_string()))?,
        created_at: parse_utc(&created_text)?,
    })
}

impl BookingRepository for SqlBookingRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing bookings schema");

        let query = r#"
            CREATE TABLE IF NOT EXISTS bookings (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                age INTEGER NOT NULL,
                phone TEXT NOT NULL,
                email TEXT NOT NULL,
                description TEXT NOT NULL,
                attached_files TEXT NOT NULL,
                start_utc TEXT NOT NULL,
                end_utc TEXT NOT NULL,
                status TEXT NOT NULL,
                payment_session_ref TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL
            )
        "#;

        self.db_client.execute(query).await?;

        info!("Bookings schema initialized successfully");
        Ok(())
    }

    async fn insert_tentative(&self, booking: &Booking) -> Result<TentativeInsert, DbError> {
        debug!(
            "Inserting tentative booking {} for interval {} - {}",
            booking.id,
            fmt_utc(booking.start),
            fmt_utc(booking.end)
        );

        let files_json = serde_json::to_string(&booking.attached_files)
            .map_err(|e| DbError::QueryError(format!("failed to encode attached_files: {}", e)))?;

        let mut tx = self.db_client.begin().await?;

        // Re-run the confirmed-overlap check inside the transaction so the
        // check and the insert are one serializable read-check-write.
        let conflict = sqlx::query(
            r#"
            SELECT name FROM bookings
            WHERE status = 'confirmed' AND start_utc < $1 AND end_utc > $2
            LIMIT 1
            "#,
        )
        .bind(fmt_utc(booking.end))
        .bind(fmt_utc(booking.start))
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            error!("Overlap check failed: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        if let Some(row) = conflict {
            let taken_by: String = row
                .try_get("name")
                .map_err(|e| DbError::CorruptRow(e.to_string()))?;
            tx.rollback()
                .await
                .map_err(|e| DbError::TransactionError(e.to_string()))?;
            return Ok(TentativeInsert::SlotTaken { taken_by });
        }

        sqlx::query(
            r#"
            INSERT INTO bookings
                (id, name, age, phone, email, description, attached_files,
                 start_utc, end_utc, status, payment_session_ref, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(&booking.id)
        .bind(&booking.client.name)
        .bind(booking.client.age)
        .bind(&booking.client.phone)
        .bind(&booking.client.email)
        .bind(&booking.description)
        .bind(&files_json)
        .bind(fmt_utc(booking.start))
        .bind(fmt_utc(booking.end))
        .bind(booking.status.as_str())
        .bind(&booking.payment_session_ref)
        .bind(fmt_utc(booking.created_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!("Failed to insert booking: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionError(e.to_string()))?;

        info!("Tentative booking {} inserted", booking.id);
        Ok(TentativeInsert::Inserted)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, DbError> {
        let query = format!("SELECT {} FROM bookings WHERE id = $1", SELECT_COLUMNS);

        let result = sqlx::query(&query)
            .bind(id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to find booking by id: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        result.map(|row| booking_from_row(&row)).transpose()
    }

    async fn find_by_payment_session(
        &self,
        session_ref: &str,
    ) -> Result<Option<Booking>, DbError> {
        debug!("Finding booking for payment session: {}", session_ref);

        let query = format!(
            "SELECT {} FROM bookings WHERE payment_session_ref = $1",
            SELECT_COLUMNS
        );

        let result = sqlx::query(&query)
            .bind(session_ref)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to find booking by payment session: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        result.map(|row| booking_from_row(&row)).transpose()
    }

    async fn find_confirmed_overlapping(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<Booking>, DbError> {
        let query = format!(
            r#"
            SELECT {} FROM bookings
            WHERE status = 'confirmed'
              AND start_utc < $1 AND end_utc > $2
            LIMIT 1
            "#,
            SELECT_COLUMNS
        );

        let result = sqlx::query(&query)
            .bind(fmt_utc(end))
            .bind(fmt_utc(start))
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to query confirmed overlap: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        result.map(|row| booking_from_row(&row)).transpose()
    }

    async fn confirm_if_no_overlap(
        &self,
        id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<ConfirmUpdate, DbError> {
        debug!("Confirming booking: {}", id);

        let mut tx = self.db_client.begin().await?;

        // Overlap check and status flip are one read-check-write, so two
        // overlapping paid bookings cannot both slip past the check.
        let conflict = sqlx::query(
            r#"
            SELECT id FROM bookings
            WHERE status = 'confirmed'
              AND start_utc < $1 AND end_utc > $2
              AND id <> $3
            LIMIT 1
            "#,
        )
        .bind(fmt_utc(end))
        .bind(fmt_utc(start))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            error!("Overlap check failed: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        if let Some(row) = conflict {
            let winner_id: String = row
                .try_get("id")
                .map_err(|e| DbError::CorruptRow(e.to_string()))?;
            tx.rollback()
                .await
                .map_err(|e| DbError::TransactionError(e.to_string()))?;
            return Ok(ConfirmUpdate::Overlap { winner_id });
        }

        // Conditional update, not a blind write: concurrent confirmations
        // for the same booking serialize here.
        let result = sqlx::query(
            "UPDATE bookings SET status = 'confirmed' WHERE id = $1 AND status = 'tentative'",
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!("Failed to confirm booking: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        let updated = result.rows_affected() > 0;
        tx.commit()
            .await
            .map_err(|e| DbError::TransactionError(e.to_string()))?;

        if updated {
            info!("Booking {} confirmed", id);
            Ok(ConfirmUpdate::Updated)
        } else {
            Ok(ConfirmUpdate::NotTentative)
        }
    }

    async fn list_from(&self, from: DateTime<Utc>) -> Result<Vec<Booking>, DbError> {
        let query = format!(
            "SELECT {} FROM bookings WHERE start_utc >= $1 ORDER BY start_utc",
            SELECT_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(fmt_utc(from))
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to list bookings: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        rows.iter().map(booking_from_row).collect()
    }
}
