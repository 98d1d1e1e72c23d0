//! Notification repository
//!
//! Notifications with a NULL `user_id` are broadcasts visible to everyone,
//! except anonymous crisis alerts: those are recorded but reach no feed.
//! A broadcast's read state is per user (`notification_reads`); the row's own
//! `is_read` only applies to user-addressed notifications.
//!
//! Other repositories add notifications inside their own transactions via
//! [`insert_statement`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::db::exec::{execute, fetch_optional};
use crate::db::{Db, DbError, Statement};
use crate::models::{Pagination, ValidationError};

const COLUMNS: &str = "id, user_id, title, message, notification_type, is_read, created_at";

/// Columns as seen by one user: a broadcast is read once that user read it.
const USER_VIEW_COLUMNS: &str = "n.id, n.user_id, n.title, n.message, n.notification_type, \
                                 (n.is_read OR r.user_id IS NOT NULL) AS is_read, n.created_at";

/// Broadcasts shown in feeds.
const BROADCAST_AUDIENCE: &str = "(n.user_id IS NULL AND n.notification_type <> 'crisis')";

/// Notification record from database
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub user_id: Option<i64>,
    pub title: String,
    pub message: String,
    pub notification_type: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Shelter,
    Certification,
    Crisis,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Shelter => "shelter",
            Self::Certification => "certification",
            Self::Crisis => "crisis",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "info" => Ok(Self::Info),
            "shelter" => Ok(Self::Shelter),
            "certification" => Ok(Self::Certification),
            "crisis" => Ok(Self::Crisis),
            _ => Err(ValidationError::InvalidFormat {
                field: "notificationType",
                reason: "must be one of info, shelter, certification, crisis",
            }),
        }
    }
}

/// A notification to be written. Text is validated by the caller.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: Option<i64>,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
}

/// `INSERT ... RETURNING id` for a notification, usable inside a transaction.
pub fn insert_statement(n: &NewNotification) -> Statement {
    Statement::new(
        "INSERT INTO realtime_notifications (user_id, title, message, notification_type) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(n.user_id)
    .bind(n.title.as_str())
    .bind(n.message.as_str())
    .bind(n.kind.as_str())
}

/// Notification repository
pub struct NotificationRepo<'a> {
    db: &'a Db,
}

impl<'a> NotificationRepo<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    pub async fn create(&self, n: &NewNotification) -> Result<i64, DbError> {
        self.db.insert(&insert_statement(n)).await
    }

    /// List notifications, newest first.
    ///
    /// With a user id: that user's notifications plus broadcasts, with the
    /// user's own read state. Without: broadcasts only.
    pub async fn list(
        &self,
        user_id: Option<i64>,
        unread_only: bool,
        page: Pagination,
    ) -> Result<Vec<Notification>, DbError> {
        self.db.query(&list_statement(user_id, unread_only, page)).await
    }

    /// Mark a notification read or unread for `user_id`.
    ///
    /// User-addressed rows flip their own flag and must belong to the caller.
    /// Broadcasts record the read in `notification_reads`, leaving every
    /// other user's state alone.
    pub async fn set_read(
        &self,
        id: i64,
        user_id: i64,
        is_read: bool,
    ) -> Result<Notification, DbError> {
        let own = Statement::new(
            "UPDATE realtime_notifications SET is_read = $1 WHERE id = $2 AND user_id = $3",
        )
        .bind(is_read)
        .bind(id)
        .bind(user_id);
        let lookup = Statement::new(
            "SELECT user_id, notification_type FROM realtime_notifications WHERE id = $1",
        )
        .bind(id);
        let broadcast = broadcast_read_statement(id, user_id, is_read);
        let mut view = user_view(user_id);
        view.push(" WHERE n.id = ").push_bind(id);

        self.db
            .transaction(|conn| {
                Box::pin(async move {
                    if execute(&mut *conn, &own).await?.rows_affected == 0 {
                        let row: Option<(Option<i64>, String)> =
                            fetch_optional(&mut *conn, &lookup).await?;
                        match row {
                            None => return Err(DbError::not_found("notification", id)),
                            Some((Some(_), _)) => return Err(DbError::not_owner("notification", id)),
                            Some((None, kind)) if kind == NotificationKind::Crisis.as_str() => {
                                return Err(DbError::not_found("notification", id));
                            }
                            Some((None, _)) => {
                                execute(&mut *conn, &broadcast).await?;
                            }
                        }
                    }
                    fetch_optional(&mut *conn, &view)
                        .await?
                        .ok_or_else(|| DbError::not_found("notification", id))
                })
            })
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let stmt = Statement::new("DELETE FROM realtime_notifications WHERE id = $1").bind(id);
        match self.db.execute(&stmt).await?.rows_affected {
            0 => Err(DbError::not_found("notification", id)),
            _ => Ok(()),
        }
    }
}

/// `SELECT` over notifications joined with `user_id`'s broadcast reads.
fn user_view(user_id: i64) -> Statement {
    let mut stmt = Statement::new(format!(
        "SELECT {USER_VIEW_COLUMNS} FROM realtime_notifications n \
         LEFT JOIN notification_reads r ON r.notification_id = n.id AND r.user_id = "
    ));
    stmt.push_bind(user_id);
    stmt
}

fn list_statement(user_id: Option<i64>, unread_only: bool, page: Pagination) -> Statement {
    let mut stmt = match user_id {
        Some(id) => {
            let mut stmt = user_view(id);
            stmt.push(" WHERE (n.user_id = ")
                .push_bind(id)
                .push(" OR ")
                .push(BROADCAST_AUDIENCE)
                .push(")");
            if unread_only {
                stmt.push(" AND NOT n.is_read AND r.user_id IS NULL");
            }
            stmt
        }
        None => {
            let mut stmt = Statement::new(format!(
                "SELECT {COLUMNS} FROM realtime_notifications n WHERE {BROADCAST_AUDIENCE}"
            ));
            if unread_only {
                stmt.push(" AND NOT n.is_read");
            }
            stmt
        }
    };
    stmt.push(" ORDER BY n.created_at DESC, n.id DESC")
        .limit_offset(page.limit(), page.offset());
    stmt
}

fn broadcast_read_statement(id: i64, user_id: i64, is_read: bool) -> Statement {
    let sql = if is_read {
        "INSERT INTO notification_reads (notification_id, user_id) VALUES ($1, $2) \
         ON CONFLICT DO NOTHING"
    } else {
        "DELETE FROM notification_reads WHERE notification_id = $1 AND user_id = $2"
    };
    Statement::new(sql).bind(id).bind(user_id)
}
