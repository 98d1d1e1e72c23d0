//! Service-dog certification records
//!
//! Applications start `pending`. Every status change notifies the applicant
//! in the same transaction. Approval stamps `issued_at` and sets a one-year
//! expiry. Re-sending the current status changes nothing and sends nothing.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::notifications::{self, NewNotification, NotificationKind};
use crate::db::exec::{execute, fetch_optional};
use crate::db::{Db, DbError, Statement};
use crate::models::{Pagination, RequiredText, ValidationError};

const COLUMNS: &str =
    "id, dog_id, user_id, certification_type, status, issued_at, expires_at, created_at";

/// Approved certifications are valid for this long.
const VALIDITY_DAYS: i64 = 365;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub id: i64,
    pub dog_id: i64,
    pub user_id: i64,
    pub certification_type: String,
    pub status: String,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificationStatus {
    Pending,
    Approved,
    Rejected,
    Expired,
}

impl CertificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "expired" => Ok(Self::Expired),
            _ => Err(ValidationError::InvalidFormat {
                field: "status",
                reason: "must be one of pending, approved, rejected, expired",
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewCertification {
    pub dog_id: i64,
    pub user_id: i64,
    pub certification_type: RequiredText,
}

pub struct CertificationRepo<'a> {
    db: &'a Db,
}

impl<'a> CertificationRepo<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    pub async fn list(
        &self,
        user_id: Option<i64>,
        status: Option<CertificationStatus>,
        page: Pagination,
    ) -> Result<Vec<Certification>, DbError> {
        let mut stmt = Statement::new(format!(
            "SELECT {COLUMNS} FROM service_dog_certifications WHERE 1=1"
        ));
        stmt.and_eq("user_id", user_id)
            .and_eq("status", status.map(|s| s.as_str()))
            .push(" ORDER BY created_at DESC, id DESC")
            .limit_offset(page.limit(), page.offset());
        self.db.query(&stmt).await
    }

    pub async fn get(&self, id: i64) -> Result<Certification, DbError> {
        let stmt = Statement::new(format!(
            "SELECT {COLUMNS} FROM service_dog_certifications WHERE id = $1"
        ))
        .bind(id);
        self.db
            .query_optional(&stmt)
            .await?
            .ok_or_else(|| DbError::not_found("certification", id))
    }

    /// File a pending application and notify the applicant.
    ///
    /// The insert only matches when `user_id` owns the dog; otherwise the
    /// dog is reported missing or not owned and nothing is written.
    pub async fn create(&self, cert: &NewCertification) -> Result<i64, DbError> {
        let insert_cert = insert_statement(cert);
        let dog_owner = Statement::new("SELECT user_id FROM dogs WHERE id = $1").bind(cert.dog_id);
        let notify = notifications::insert_statement(&NewNotification {
            user_id: Some(cert.user_id),
            title: "Certification application received".to_string(),
            message: format!(
                "Your {} application has been received and is pending review",
                cert.certification_type.as_str()
            ),
            kind: NotificationKind::Certification,
        });
        let dog_id = cert.dog_id;

        self.db
            .transaction(|conn| {
                Box::pin(async move {
                    let inserted: Option<(i64,)> = fetch_optional(&mut *conn, &insert_cert).await?;
                    let Some((id,)) = inserted else {
                        let owner: Option<(i64,)> = fetch_optional(&mut *conn, &dog_owner).await?;
                        return Err(match owner {
                            Some(_) => DbError::not_owner("dog", dog_id),
                            None => DbError::not_found("dog", dog_id),
                        });
                    };
                    execute(&mut *conn, &notify).await?;
                    Ok(id)
                })
            })
            .await
    }

    /// Change status and notify the holder, atomically.
    ///
    /// A status equal to the stored one is a no-op and returns the row as is.
    pub async fn update_status(
        &self,
        id: i64,
        status: CertificationStatus,
    ) -> Result<Certification, DbError> {
        let (update, notify) = status_change_statements(id, status, Utc::now());
        let exists = Statement::new("SELECT id FROM service_dog_certifications WHERE id = $1").bind(id);

        let changed = self
            .db
            .transaction(|conn| {
                Box::pin(async move {
                    if execute(&mut *conn, &update).await?.rows_affected == 0 {
                        let found: Option<(i64,)> = fetch_optional(&mut *conn, &exists).await?;
                        return match found {
                            Some(_) => Ok(false),
                            None => Err(DbError::not_found("certification", id)),
                        };
                    }
                    execute(&mut *conn, &notify).await?;
                    Ok(true)
                })
            })
            .await?;

        if changed {
            tracing::info!(certification = id, status = status.as_str(), "certification status changed");
        }
        self.get(id).await
    }
}

fn insert_statement(cert: &NewCertification) -> Statement {
    Statement::new(
        "INSERT INTO service_dog_certifications (dog_id, user_id, certification_type) \
         SELECT id, user_id, $3 FROM dogs WHERE id = $1 AND user_id = $2 RETURNING id",
    )
    .bind(cert.dog_id)
    .bind(cert.user_id)
    .bind(cert.certification_type.as_str())
}

/// The guarded UPDATE (matches nothing when the status is unchanged), then an
/// INSERT ... SELECT addressing the notification to the certification's holder.
fn status_change_statements(
    id: i64,
    status: CertificationStatus,
    now: DateTime<Utc>,
) -> (Statement, Statement) {
    let (issued_at, expires_at) = match status {
        CertificationStatus::Approved => (Some(now), Some(now + Duration::days(VALIDITY_DAYS))),
        _ => (None, None),
    };

    let update = Statement::new(
        "UPDATE service_dog_certifications SET status = $1, \
         issued_at = COALESCE($2, issued_at), expires_at = COALESCE($3, expires_at) \
         WHERE id = $4 AND status IS DISTINCT FROM $1",
    )
    .bind(status.as_str())
    .bind(issued_at)
    .bind(expires_at)
    .bind(id);

    let notify = Statement::new(
        "INSERT INTO realtime_notifications (user_id, title, message, notification_type) \
         SELECT user_id, $1, $2, $3 FROM service_dog_certifications WHERE id = $4",
    )
    .bind("Certification status updated")
    .bind(format!("Your certification is now {}", status.as_str()))
    .bind(NotificationKind::Certification.as_str())
    .bind(id);

    (update, notify)
}
