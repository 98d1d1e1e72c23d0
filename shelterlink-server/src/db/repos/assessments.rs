//! Mental-health self-assessments
//!
//! A submission writes the assessment, its answers and (at or above the
//! crisis threshold) a crisis notification in one transaction.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::notifications::{self, NewNotification, NotificationKind};
use crate::db::exec::{execute, fetch_all, insert};
use crate::db::{Db, DbError, Statement};
use crate::models::{Pagination, RiskLevel, ScoredAssessment};

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub question_text: String,
    pub display_order: i32,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: i64,
    pub user_id: Option<i64>,
    pub total_score: i32,
    pub risk_level: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StoredAnswer {
    pub question_id: i64,
    pub answer_value: i32,
}

/// Assessment with its answers
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentDetail {
    #[serde(flatten)]
    pub assessment: Assessment,
    pub answers: Vec<StoredAnswer>,
}

/// Result of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submitted {
    pub id: i64,
    pub risk_level: RiskLevel,
    pub crisis_alert: bool,
}

pub struct AssessmentRepo<'a> {
    db: &'a Db,
}

impl<'a> AssessmentRepo<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    pub async fn questions(&self) -> Result<Vec<Question>, DbError> {
        let stmt = Statement::new(
            "SELECT id, question_text, display_order FROM mental_health_questions \
             ORDER BY display_order ASC, id ASC",
        );
        self.db.query(&stmt).await
    }

    pub async fn list(
        &self,
        user_id: Option<i64>,
        page: Pagination,
    ) -> Result<Vec<Assessment>, DbError> {
        let mut stmt = Statement::new(
            "SELECT id, user_id, total_score, risk_level, created_at \
             FROM mental_health_assessments WHERE 1=1",
        );
        stmt.and_eq("user_id", user_id)
            .push(" ORDER BY created_at DESC, id DESC")
            .limit_offset(page.limit(), page.offset());
        self.db.query(&stmt).await
    }

    pub async fn get(&self, id: i64) -> Result<AssessmentDetail, DbError> {
        let stmt = Statement::new(
            "SELECT id, user_id, total_score, risk_level, created_at \
             FROM mental_health_assessments WHERE id = $1",
        )
        .bind(id);
        let assessment: Assessment = self
            .db
            .query_optional(&stmt)
            .await?
            .ok_or_else(|| DbError::not_found("assessment", id))?;

        let answers = Statement::new(
            "SELECT question_id, answer_value FROM mental_health_answers \
             WHERE assessment_id = $1 ORDER BY id ASC",
        )
        .bind(id);
        let answers = fetch_all(self.db.pool(), &answers).await?;

        Ok(AssessmentDetail {
            assessment,
            answers,
        })
    }

    /// Persist a scored submission.
    pub async fn create(&self, scored: ScoredAssessment) -> Result<Submitted, DbError> {
        let insert_assessment = Statement::new(
            "INSERT INTO mental_health_assessments (user_id, total_score, risk_level) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(scored.user_id)
        .bind(scored.total_score)
        .bind(scored.risk_level.as_str());
        let alert = scored
            .needs_crisis_alert()
            .then(|| notifications::insert_statement(&crisis_notification(&scored)));
        let crisis_alert = alert.is_some();
        let answers = scored.answers;

        let id = self
            .db
            .transaction(|conn| {
                Box::pin(async move {
                    let id = insert(&mut *conn, &insert_assessment).await?;
                    for answer in &answers {
                        let stmt = Statement::new(
                            "INSERT INTO mental_health_answers \
                             (assessment_id, question_id, answer_value) VALUES ($1, $2, $3)",
                        )
                        .bind(id)
                        .bind(answer.question_id)
                        .bind(answer.value);
                        execute(&mut *conn, &stmt).await?;
                    }
                    if let Some(alert) = &alert {
                        execute(&mut *conn, alert).await?;
                    }
                    Ok(id)
                })
            })
            .await?;

        if crisis_alert {
            tracing::warn!(assessment = id, score = scored.total_score, "crisis alert raised");
        }

        Ok(Submitted {
            id,
            risk_level: scored.risk_level,
            crisis_alert,
        })
    }
}

/// Crisis notification for the submitting user. Anonymous submissions get an
/// unaddressed row, which notification feeds never show.
fn crisis_notification(scored: &ScoredAssessment) -> NewNotification {
    NewNotification {
        user_id: scored.user_id,
        title: "Crisis support available".to_string(),
        message: format!(
            "Your assessment score of {} indicates you may need urgent support. \
             Please contact a crisis line or emergency services.",
            scored.total_score
        ),
        kind: NotificationKind::Crisis,
    }
}
